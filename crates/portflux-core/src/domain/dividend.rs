//! 배당 기록.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{Entity, Resource};
use crate::ports::FilterValue;
use crate::validation::{non_zero, FieldOrder};

/// 주식 배당.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct Dividend {
    #[serde(rename = "dividendid")]
    pub id: Uuid,
    #[serde(rename = "stockid")]
    pub stock_id: Uuid,
    pub dividend_per_share: Decimal,
    pub dividend_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 배당 생성/수정 요청.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct DividendRequest {
    #[serde(default, rename = "stockid")]
    #[validate(required(message = "stock id cannot be empty"))]
    pub stock_id: Option<Uuid>,
    #[serde(default)]
    #[validate(custom(function = "non_zero", message = "dividend per share cannot be zero"))]
    pub dividend_per_share: Decimal,
    #[serde(default)]
    #[validate(required(message = "dividend date cannot be empty"))]
    pub dividend_date: Option<DateTime<Utc>>,
}

impl FieldOrder for DividendRequest {
    const FIELDS: &'static [&'static str] = &["stock_id", "dividend_per_share", "dividend_date"];
}

impl Entity for Dividend {
    const NAME: &'static str = "dividend";
    const FILTERABLE: &'static [&'static str] = &["stock_id"];

    fn id(&self) -> Uuid {
        self.id
    }

    fn filter_value(&self, column: &str) -> Option<FilterValue> {
        match column {
            "stock_id" => Some(self.stock_id.into()),
            _ => None,
        }
    }
}

impl Resource for Dividend {
    type Create = DividendRequest;
    type Update = DividendRequest;
    type Response = Dividend;

    fn from_create(id: Uuid, request: DividendRequest, now: DateTime<Utc>) -> Self {
        Self {
            id,
            stock_id: request.stock_id.unwrap_or_default(),
            dividend_per_share: request.dividend_per_share,
            dividend_date: request.dividend_date.unwrap_or(now),
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_update(&mut self, request: DividendRequest, now: DateTime<Utc>) {
        if let Some(stock_id) = request.stock_id {
            self.stock_id = stock_id;
        }
        if let Some(date) = request.dividend_date {
            self.dividend_date = date;
        }
        self.dividend_per_share = request.dividend_per_share;
        self.updated_at = now;
    }
}
