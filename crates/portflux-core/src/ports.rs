//! 저장소 포트.
//!
//! 모든 엔티티가 공유하는 범용 저장소 계약과 필터 표현을 정의합니다.
//! PostgreSQL 구현은 API 크레이트에, 인메모리 구현은 [`crate::memory`]에 있습니다.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Entity;
use crate::error::{PortfluxError, PortfluxResult};

/// 필터 조건 값.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Text(String),
    Uuid(Uuid),
    Bool(bool),
    Int(i64),
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Text(value)
    }
}

impl From<Uuid> for FilterValue {
    fn from(value: Uuid) -> Self {
        FilterValue::Uuid(value)
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        FilterValue::Bool(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Int(value)
    }
}

/// 컬럼 동등 비교 조건 목록 (AND 결합).
///
/// 조건은 추가한 순서를 유지합니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    conditions: Vec<(String, FilterValue)>,
}

impl Filter {
    /// 빈 필터 (전체 조회).
    pub fn new() -> Self {
        Self::default()
    }

    /// `column = value` 조건을 추가합니다.
    pub fn eq(mut self, column: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.conditions.push((column.into(), value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn conditions(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.conditions.iter().map(|(c, v)| (c.as_str(), v))
    }

    /// 모든 컬럼이 엔티티의 필터 허용 목록에 있는지 확인합니다.
    pub fn ensure_allowed<E: Entity>(&self) -> PortfluxResult<()> {
        match self
            .conditions
            .iter()
            .find(|(column, _)| !E::FILTERABLE.contains(&column.as_str()))
        {
            Some((column, _)) => Err(PortfluxError::Validation(format!(
                "{} cannot be filtered by {}",
                E::NAME,
                column
            ))),
            None => Ok(()),
        }
    }

    /// 엔티티가 모든 조건을 만족하는지 확인합니다.
    pub fn matches<E: Entity>(&self, entity: &E) -> bool {
        self.conditions
            .iter()
            .all(|(column, value)| entity.filter_value(column).as_ref() == Some(value))
    }
}

/// 목록 조회 범위 (`OFFSET`/`LIMIT`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(
    feature = "utoipa-support",
    derive(utoipa::IntoParams),
    into_params(parameter_in = Query)
)]
pub struct Pagination {
    /// 건너뛸 레코드 수
    pub skip: Option<u32>,
    /// 최대 반환 레코드 수
    pub take: Option<u32>,
}

impl Pagination {
    pub fn new(skip: Option<u32>, take: Option<u32>) -> Self {
        Self { skip, take }
    }

    /// 전체 범위.
    pub fn all() -> Self {
        Self::default()
    }
}

/// 엔티티별 범용 저장소 계약.
///
/// 조회 결과가 없으면 `PortfluxError::NotFound`를 반환합니다.
/// 목록 조회도 빈 결과를 NotFound로 취급하며, 빈 목록 변환은 서비스가 담당합니다.
#[async_trait]
pub trait Repository<E: Entity>: Send + Sync {
    /// 필터와 범위에 맞는 레코드 조회.
    async fn get(&self, filter: &Filter, page: Pagination) -> PortfluxResult<Vec<E>>;

    /// ID로 단건 조회.
    async fn get_by_id(&self, id: Uuid) -> PortfluxResult<E>;

    /// 단건 생성 후 ID 반환.
    async fn create(&self, entity: E) -> PortfluxResult<Uuid>;

    /// 다건 생성. 하나라도 실패하면 아무것도 저장하지 않습니다.
    async fn create_many(&self, entities: Vec<E>) -> PortfluxResult<Vec<Uuid>>;

    /// 전체 필드 갱신.
    async fn update(&self, id: Uuid, entity: E) -> PortfluxResult<()>;

    /// 삭제.
    async fn delete(&self, id: Uuid) -> PortfluxResult<()>;
}

/// 저장소 공통 NotFound 에러.
pub fn not_found<E: Entity>() -> PortfluxError {
    PortfluxError::NotFound(format!("{} not found", E::NAME))
}
