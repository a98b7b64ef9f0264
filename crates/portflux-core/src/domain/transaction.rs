//! 매매 거래 기록.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::{Entity, Resource};
use crate::ports::FilterValue;
use crate::validation::{non_zero, FieldOrder};

/// 주식 또는 암호화폐 거래.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct Transaction {
    #[serde(rename = "transactionid")]
    pub id: Uuid,
    #[serde(rename = "stockid")]
    pub stock_id: Option<Uuid>,
    #[serde(rename = "cryptocurrencyid")]
    pub cryptocurrency_id: Option<Uuid>,
    pub quantity: Decimal,
    pub transaction_price: Decimal,
    pub transaction_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 거래 생성/수정 요청.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[validate(schema(function = "validate_asset_reference"))]
pub struct TransactionRequest {
    #[serde(default, rename = "stockid")]
    pub stock_id: Option<Uuid>,
    #[serde(default, rename = "cryptocurrencyid")]
    pub cryptocurrency_id: Option<Uuid>,
    #[serde(default)]
    #[validate(custom(function = "non_zero", message = "quantity cannot be zero"))]
    pub quantity: Decimal,
    #[serde(default)]
    #[validate(custom(function = "non_zero", message = "transaction price cannot be zero"))]
    pub transaction_price: Decimal,
    #[serde(default)]
    #[validate(required(message = "transaction date cannot be empty"))]
    pub transaction_date: Option<DateTime<Utc>>,
}

impl FieldOrder for TransactionRequest {
    const FIELDS: &'static [&'static str] = &["quantity", "transaction_price", "transaction_date"];
}

/// 주식과 암호화폐 중 최소 하나는 지정해야 한다.
fn validate_asset_reference(request: &TransactionRequest) -> Result<(), ValidationError> {
    if request.stock_id.is_none() && request.cryptocurrency_id.is_none() {
        return Err(ValidationError::new("missing_asset")
            .with_message("either stock id or cryptocurrency id must be provided".into()));
    }
    Ok(())
}

impl Entity for Transaction {
    const NAME: &'static str = "transaction";
    const FILTERABLE: &'static [&'static str] = &["stock_id", "cryptocurrency_id"];

    fn id(&self) -> Uuid {
        self.id
    }

    fn filter_value(&self, column: &str) -> Option<FilterValue> {
        match column {
            "stock_id" => self.stock_id.map(FilterValue::from),
            "cryptocurrency_id" => self.cryptocurrency_id.map(FilterValue::from),
            _ => None,
        }
    }
}

impl Resource for Transaction {
    type Create = TransactionRequest;
    type Update = TransactionRequest;
    type Response = Transaction;

    fn from_create(id: Uuid, request: TransactionRequest, now: DateTime<Utc>) -> Self {
        Self {
            id,
            stock_id: request.stock_id,
            cryptocurrency_id: request.cryptocurrency_id,
            quantity: request.quantity,
            transaction_price: request.transaction_price,
            transaction_date: request.transaction_date.unwrap_or(now),
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_update(&mut self, request: TransactionRequest, now: DateTime<Utc>) {
        self.stock_id = request.stock_id;
        self.cryptocurrency_id = request.cryptocurrency_id;
        self.quantity = request.quantity;
        self.transaction_price = request.transaction_price;
        if let Some(date) = request.transaction_date {
            self.transaction_date = date;
        }
        self.updated_at = now;
    }
}
