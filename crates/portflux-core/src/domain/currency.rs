//! 법정 통화.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{Entity, Resource};
use crate::ports::FilterValue;
use crate::validation::FieldOrder;

/// 통화 (예: EUR, USD).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct Currency {
    #[serde(rename = "currencyid")]
    pub id: Uuid,
    /// ISO 4217 코드
    pub code: String,
    pub name: String,
    /// 표시 기호 (예: €)
    pub symbol: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 통화 생성/수정 요청.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct CurrencyRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "code cannot be empty"))]
    pub code: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "name cannot be empty"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "symbol cannot be empty"))]
    pub symbol: String,
}

impl FieldOrder for CurrencyRequest {
    const FIELDS: &'static [&'static str] = &["symbol", "code", "name"];
}

impl Entity for Currency {
    const NAME: &'static str = "currency";
    const FILTERABLE: &'static [&'static str] = &["code", "name", "symbol"];

    fn id(&self) -> Uuid {
        self.id
    }

    fn filter_value(&self, column: &str) -> Option<FilterValue> {
        match column {
            "code" => Some(self.code.as_str().into()),
            "name" => Some(self.name.as_str().into()),
            "symbol" => Some(self.symbol.as_str().into()),
            _ => None,
        }
    }
}

impl Resource for Currency {
    type Create = CurrencyRequest;
    type Update = CurrencyRequest;
    type Response = Currency;

    fn from_create(id: Uuid, request: CurrencyRequest, now: DateTime<Utc>) -> Self {
        Self {
            id,
            code: request.code,
            name: request.name,
            symbol: request.symbol,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_update(&mut self, request: CurrencyRequest, now: DateTime<Utc>) {
        self.code = request.code;
        self.name = request.name;
        self.symbol = request.symbol;
        self.updated_at = now;
    }
}
