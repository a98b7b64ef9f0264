//! 포트폴리오 보유 종목(매매 기록 단위).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{slugify, Entity, Resource};
use crate::ports::FilterValue;
use crate::validation::{non_zero, FieldOrder};

/// 포트폴리오 내 보유 종목.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct Holding {
    #[serde(rename = "holdingid")]
    pub id: Uuid,
    #[serde(rename = "portfolioid")]
    pub portfolio_id: Uuid,
    #[serde(rename = "brokerid")]
    pub broker_id: Uuid,
    pub extid: String,
    pub name: String,
    pub description: String,
    pub slug: String,
    pub trade_date: DateTime<Utc>,
    /// 매매 구분 (예: BUY, SELL)
    pub trade_type: String,
    pub quantity: Decimal,
    pub share_price: Decimal,
    pub exchange_rate: Decimal,
    #[serde(rename = "exchange_currencyid")]
    pub exchange_currency_id: Uuid,
    /// 단위당 수수료
    pub brokerage_unit_price: Decimal,
    pub brokerage_currency: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 보유 종목 생성 요청.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct CreateHoldingRequest {
    #[serde(default, rename = "portfolioid")]
    #[validate(required(message = "portfolio id cannot be empty"))]
    pub portfolio_id: Option<Uuid>,
    #[serde(default, rename = "brokerid")]
    #[validate(required(message = "broker id cannot be empty"))]
    pub broker_id: Option<Uuid>,
    #[serde(default)]
    #[validate(length(min = 1, message = "external id cannot be empty"))]
    pub extid: String,
    #[serde(flatten)]
    #[validate(nested)]
    pub details: HoldingDetails,
}

impl FieldOrder for CreateHoldingRequest {
    const FIELDS: &'static [&'static str] = &[
        "portfolio_id",
        "broker_id",
        "extid",
        "name",
        "trade_date",
        "trade_type",
        "quantity",
        "share_price",
        "exchange_rate",
        "exchange_currency_id",
        "brokerage_unit_price",
        "brokerage_currency",
    ];
}

/// 보유 종목 수정 요청. 외부 ID는 변경할 수 없습니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct UpdateHoldingRequest {
    #[serde(default, rename = "portfolioid")]
    #[validate(required(message = "portfolio id cannot be empty"))]
    pub portfolio_id: Option<Uuid>,
    #[serde(default, rename = "brokerid")]
    #[validate(required(message = "broker id cannot be empty"))]
    pub broker_id: Option<Uuid>,
    #[serde(flatten)]
    #[validate(nested)]
    pub details: HoldingDetails,
}

impl FieldOrder for UpdateHoldingRequest {
    const FIELDS: &'static [&'static str] = &[
        "portfolio_id",
        "broker_id",
        "name",
        "trade_date",
        "trade_type",
        "quantity",
        "share_price",
        "exchange_rate",
        "exchange_currency_id",
        "brokerage_unit_price",
        "brokerage_currency",
    ];
}

/// 생성/수정 요청이 공유하는 매매 정보.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct HoldingDetails {
    #[serde(default)]
    #[validate(length(min = 1, message = "name cannot be empty"))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    #[validate(required(message = "trade date cannot be empty"))]
    pub trade_date: Option<DateTime<Utc>>,
    #[serde(default)]
    #[validate(length(min = 1, message = "trade type cannot be empty"))]
    pub trade_type: String,
    #[serde(default)]
    #[validate(custom(function = "non_zero", message = "quantity cannot be zero"))]
    pub quantity: Decimal,
    #[serde(default)]
    #[validate(custom(function = "non_zero", message = "share price cannot be zero"))]
    pub share_price: Decimal,
    #[serde(default)]
    #[validate(custom(function = "non_zero", message = "exchange rate cannot be zero"))]
    pub exchange_rate: Decimal,
    #[serde(default, rename = "exchange_currencyid")]
    #[validate(required(message = "exchange currency id cannot be empty"))]
    pub exchange_currency_id: Option<Uuid>,
    #[serde(default)]
    #[validate(custom(function = "non_zero", message = "brokerage unit price cannot be zero"))]
    pub brokerage_unit_price: Decimal,
    #[serde(default)]
    #[validate(length(min = 1, message = "brokerage currency cannot be empty"))]
    pub brokerage_currency: String,
}

impl Holding {
    fn assign_details(&mut self, details: HoldingDetails) {
        self.slug = slugify(&details.name);
        self.name = details.name;
        self.description = details.description;
        if let Some(trade_date) = details.trade_date {
            self.trade_date = trade_date;
        }
        self.trade_type = details.trade_type;
        self.quantity = details.quantity;
        self.share_price = details.share_price;
        self.exchange_rate = details.exchange_rate;
        if let Some(currency_id) = details.exchange_currency_id {
            self.exchange_currency_id = currency_id;
        }
        self.brokerage_unit_price = details.brokerage_unit_price;
        self.brokerage_currency = details.brokerage_currency;
    }
}

impl Entity for Holding {
    const NAME: &'static str = "holding";
    const FILTERABLE: &'static [&'static str] =
        &["portfolio_id", "broker_id", "extid", "slug", "trade_type"];

    fn id(&self) -> Uuid {
        self.id
    }

    fn filter_value(&self, column: &str) -> Option<FilterValue> {
        match column {
            "portfolio_id" => Some(self.portfolio_id.into()),
            "broker_id" => Some(self.broker_id.into()),
            "extid" => Some(self.extid.as_str().into()),
            "slug" => Some(self.slug.as_str().into()),
            "trade_type" => Some(self.trade_type.as_str().into()),
            _ => None,
        }
    }
}

impl Resource for Holding {
    type Create = CreateHoldingRequest;
    type Update = UpdateHoldingRequest;
    type Response = Holding;

    fn from_create(id: Uuid, request: CreateHoldingRequest, now: DateTime<Utc>) -> Self {
        let mut holding = Self {
            id,
            portfolio_id: request.portfolio_id.unwrap_or_default(),
            broker_id: request.broker_id.unwrap_or_default(),
            extid: request.extid,
            name: String::new(),
            description: String::new(),
            slug: String::new(),
            trade_date: now,
            trade_type: String::new(),
            quantity: Decimal::ZERO,
            share_price: Decimal::ZERO,
            exchange_rate: Decimal::ZERO,
            exchange_currency_id: Uuid::nil(),
            brokerage_unit_price: Decimal::ZERO,
            brokerage_currency: String::new(),
            created_at: now,
            updated_at: now,
        };
        holding.assign_details(request.details);
        holding
    }

    fn apply_update(&mut self, request: UpdateHoldingRequest, now: DateTime<Utc>) {
        if let Some(portfolio_id) = request.portfolio_id {
            self.portfolio_id = portfolio_id;
        }
        if let Some(broker_id) = request.broker_id {
            self.broker_id = broker_id;
        }
        self.assign_details(request.details);
        self.updated_at = now;
    }
}
