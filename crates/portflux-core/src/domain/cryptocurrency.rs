//! 암호화폐.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{Entity, Resource};
use crate::ports::FilterValue;
use crate::validation::FieldOrder;

/// 암호화폐. 보유 종목 연결은 선택 사항입니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct CryptoCurrency {
    #[serde(rename = "cryptocurrencyid")]
    pub id: Uuid,
    #[serde(rename = "holdingid", skip_serializing_if = "Option::is_none")]
    pub holding_id: Option<Uuid>,
    pub symbol: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 암호화폐 생성/수정 요청.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct CryptoCurrencyRequest {
    #[serde(default, rename = "holdingid")]
    pub holding_id: Option<Uuid>,
    #[serde(default)]
    #[validate(length(min = 1, message = "symbol cannot be empty"))]
    pub symbol: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "name cannot be empty"))]
    pub name: String,
}

impl FieldOrder for CryptoCurrencyRequest {
    const FIELDS: &'static [&'static str] = &["symbol", "name"];
}

impl Entity for CryptoCurrency {
    const NAME: &'static str = "cryptocurrency";
    const FILTERABLE: &'static [&'static str] = &["holding_id", "symbol", "name"];

    fn id(&self) -> Uuid {
        self.id
    }

    fn filter_value(&self, column: &str) -> Option<FilterValue> {
        match column {
            "holding_id" => self.holding_id.map(FilterValue::from),
            "symbol" => Some(self.symbol.as_str().into()),
            "name" => Some(self.name.as_str().into()),
            _ => None,
        }
    }
}

impl Resource for CryptoCurrency {
    type Create = CryptoCurrencyRequest;
    type Update = CryptoCurrencyRequest;
    type Response = CryptoCurrency;

    fn from_create(id: Uuid, request: CryptoCurrencyRequest, now: DateTime<Utc>) -> Self {
        Self {
            id,
            holding_id: request.holding_id,
            symbol: request.symbol,
            name: request.name,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_update(&mut self, request: CryptoCurrencyRequest, now: DateTime<Utc>) {
        self.holding_id = request.holding_id;
        self.symbol = request.symbol;
        self.name = request.name;
        self.updated_at = now;
    }
}
