//! 포트폴리오 도메인 모델.
//!
//! 모든 엔티티는 두 트레이트를 통해 공통 파이프라인에 연결됩니다:
//! - [`Entity`]: 저장소 계층이 필요로 하는 식별자와 필터 정보
//! - [`Resource`]: 서비스 계층이 사용하는 요청/응답 모델과 생성/수정 규칙
//!
//! `User`는 비밀번호 해싱이 필요하므로 `Entity`만 구현하고 전용 서비스를 사용합니다.

mod broker;
mod common;
mod cryptocurrency;
mod currency;
mod dividend;
mod holding;
mod portfolio;
mod stock;
mod transaction;
mod user;

pub use broker::*;
pub use common::*;
pub use cryptocurrency::*;
pub use currency::*;
pub use dividend::*;
pub use holding::*;
pub use portfolio::*;
pub use stock::*;
pub use transaction::*;
pub use user::*;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::ports::FilterValue;
use crate::validation::FieldOrder;

/// 저장소에 보관되는 도메인 레코드.
pub trait Entity: Clone + Send + Sync + 'static {
    /// 엔티티 이름 (라우트, 로그, 메트릭 라벨에 사용)
    const NAME: &'static str;

    /// 필터 조건으로 사용할 수 있는 컬럼
    const FILTERABLE: &'static [&'static str];

    /// 레코드 간에 값이 겹칠 수 없는 컬럼 (`FILTERABLE`의 부분집합)
    const UNIQUE: &'static [&'static str] = &[];

    /// 기본 키.
    fn id(&self) -> Uuid;

    /// 주어진 컬럼의 현재 값. 필터 불가 컬럼이면 `None`.
    fn filter_value(&self, column: &str) -> Option<FilterValue>;
}

/// 범용 CRUD 서비스가 다루는 엔티티.
pub trait Resource: Entity {
    /// 생성 요청
    type Create: Validate + FieldOrder + DeserializeOwned + Send + Sync + 'static;
    /// 수정 요청
    type Update: Validate + FieldOrder + DeserializeOwned + Send + Sync + 'static;
    /// API 응답 모델
    type Response: Serialize + From<Self> + Send + 'static;

    /// 검증된 생성 요청으로 새 엔티티를 만듭니다.
    ///
    /// 파생 필드(slug 등)와 `created_at`/`updated_at`을 함께 채웁니다.
    fn from_create(id: Uuid, request: Self::Create, now: DateTime<Utc>) -> Self;

    /// 검증된 수정 요청을 반영하고 `updated_at`을 갱신합니다.
    fn apply_update(&mut self, request: Self::Update, now: DateTime<Utc>);
}
