//! 상장 주식.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{slugify, Entity, Resource};
use crate::ports::FilterValue;
use crate::validation::FieldOrder;

/// 보유 종목에 연결된 주식 정보.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct Stock {
    #[serde(rename = "stockid")]
    pub id: Uuid,
    #[serde(rename = "holdingid")]
    pub holding_id: Uuid,
    pub extid: String,
    pub ticker_symbol: String,
    pub company_name: String,
    /// 티커에서 파생된 slug
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 주식 생성/수정 요청.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct StockRequest {
    #[serde(default, rename = "holdingid")]
    #[validate(required(message = "holding id cannot be empty"))]
    pub holding_id: Option<Uuid>,
    #[serde(default)]
    #[validate(length(min = 1, message = "external id cannot be empty"))]
    pub extid: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "ticker symbol cannot be empty"))]
    pub ticker_symbol: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "company name cannot be empty"))]
    pub company_name: String,
}

impl FieldOrder for StockRequest {
    const FIELDS: &'static [&'static str] = &[
        "holding_id",
        "extid",
        "ticker_symbol",
        "company_name",
    ];
}

impl Entity for Stock {
    const NAME: &'static str = "stock";
    const FILTERABLE: &'static [&'static str] = &["holding_id", "extid", "ticker_symbol", "slug"];

    fn id(&self) -> Uuid {
        self.id
    }

    fn filter_value(&self, column: &str) -> Option<FilterValue> {
        match column {
            "holding_id" => Some(self.holding_id.into()),
            "extid" => Some(self.extid.as_str().into()),
            "ticker_symbol" => Some(self.ticker_symbol.as_str().into()),
            "slug" => Some(self.slug.as_str().into()),
            _ => None,
        }
    }
}

impl Resource for Stock {
    type Create = StockRequest;
    type Update = StockRequest;
    type Response = Stock;

    fn from_create(id: Uuid, request: StockRequest, now: DateTime<Utc>) -> Self {
        Self {
            id,
            holding_id: request.holding_id.unwrap_or_default(),
            extid: request.extid,
            slug: slugify(&request.ticker_symbol),
            ticker_symbol: request.ticker_symbol,
            company_name: request.company_name,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_update(&mut self, request: StockRequest, now: DateTime<Utc>) {
        if let Some(holding_id) = request.holding_id {
            self.holding_id = holding_id;
        }
        self.extid = request.extid;
        self.slug = slugify(&request.ticker_symbol);
        self.ticker_symbol = request.ticker_symbol;
        self.company_name = request.company_name;
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate_request;

    #[test]
    fn test_slug_from_ticker() {
        let stock = Stock::from_create(
            Uuid::new_v4(),
            StockRequest {
                holding_id: Some(Uuid::new_v4()),
                extid: "s-1".into(),
                ticker_symbol: "BRK.B".into(),
                company_name: "Berkshire Hathaway".into(),
            },
            Utc::now(),
        );
        assert_eq!(stock.slug, "brk-b");
    }

    #[test]
    fn test_validation_messages() {
        let err = validate_request(&StockRequest::default()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "holding id cannot be empty | external id cannot be empty | \
             ticker symbol cannot be empty | company name cannot be empty"
        );
    }
}
