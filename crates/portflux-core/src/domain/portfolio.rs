//! 사용자 포트폴리오.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{Entity, Resource};
use crate::ports::FilterValue;
use crate::validation::{non_zero_i32, FieldOrder};

/// 사용자 포트폴리오와 알림 설정.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct Portfolio {
    #[serde(rename = "portfolioid")]
    pub id: Uuid,
    #[serde(rename = "userid")]
    pub user_id: Uuid,
    pub name: String,
    pub extid: String,
    /// 세금 거주 국가 ID
    #[serde(rename = "tax_countryid")]
    pub tax_country_id: String,
    /// 회계연도 시작일
    pub financial_year: NaiveDate,
    /// 성과 계산 방식 코드
    pub performance_calculation: i32,
    /// 요약 메일 수신
    pub summary: bool,
    /// 가격 알림 수신
    pub price_alert: bool,
    /// 기업 이벤트 알림 수신
    pub company_event_alert: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 포트폴리오 생성/수정 요청.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct PortfolioRequest {
    #[serde(default, rename = "userid")]
    #[validate(required(message = "user id cannot be empty"))]
    pub user_id: Option<Uuid>,
    #[serde(default)]
    #[validate(length(min = 1, message = "name cannot be empty"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "external id cannot be empty"))]
    pub extid: String,
    #[serde(default, rename = "tax_countryid")]
    #[validate(length(min = 1, message = "tax country id cannot be empty"))]
    pub tax_country_id: String,
    #[serde(default)]
    #[validate(required(message = "financial year cannot be empty"))]
    pub financial_year: Option<NaiveDate>,
    #[serde(default, alias = "performence_calculation")]
    #[validate(custom(
        function = "non_zero_i32",
        message = "performance calculation cannot be zero"
    ))]
    pub performance_calculation: i32,
    #[serde(default)]
    pub summary: bool,
    #[serde(default)]
    pub price_alert: bool,
    #[serde(default)]
    pub company_event_alert: bool,
}

impl FieldOrder for PortfolioRequest {
    const FIELDS: &'static [&'static str] = &[
        "user_id",
        "name",
        "extid",
        "tax_country_id",
        "financial_year",
        "performance_calculation",
    ];
}

impl Entity for Portfolio {
    const NAME: &'static str = "portfolio";
    const FILTERABLE: &'static [&'static str] = &["user_id", "extid", "name"];

    fn id(&self) -> Uuid {
        self.id
    }

    fn filter_value(&self, column: &str) -> Option<FilterValue> {
        match column {
            "user_id" => Some(self.user_id.into()),
            "extid" => Some(self.extid.as_str().into()),
            "name" => Some(self.name.as_str().into()),
            _ => None,
        }
    }
}

impl Resource for Portfolio {
    type Create = PortfolioRequest;
    type Update = PortfolioRequest;
    type Response = Portfolio;

    // 검증을 통과한 요청만 들어오므로 Option 필드는 항상 Some이다.
    fn from_create(id: Uuid, request: PortfolioRequest, now: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id: request.user_id.unwrap_or_default(),
            name: request.name,
            extid: request.extid,
            tax_country_id: request.tax_country_id,
            financial_year: request.financial_year.unwrap_or_default(),
            performance_calculation: request.performance_calculation,
            summary: request.summary,
            price_alert: request.price_alert,
            company_event_alert: request.company_event_alert,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_update(&mut self, request: PortfolioRequest, now: DateTime<Utc>) {
        if let Some(user_id) = request.user_id {
            self.user_id = user_id;
        }
        if let Some(financial_year) = request.financial_year {
            self.financial_year = financial_year;
        }
        self.name = request.name;
        self.extid = request.extid;
        self.tax_country_id = request.tax_country_id;
        self.performance_calculation = request.performance_calculation;
        self.summary = request.summary;
        self.price_alert = request.price_alert;
        self.company_event_alert = request.company_event_alert;
        self.updated_at = now;
    }
}
