//! API 라우트.
//!
//! # 라우트 구조
//!
//! - `/health` - 헬스 체크 (liveness)
//! - `/health/ready` - 상세 헬스 체크 (readiness)
//! - `/v1/user` - 가입, 로그인, 사용자 관리
//! - `/v1/broker` - 증권사 (slug 조회 포함)
//! - `/v1/portfolio` - 포트폴리오
//! - `/v1/holding` - 보유 종목
//! - `/v1/stock` - 주식
//! - `/v1/currency` - 통화
//! - `/v1/cryptocurrency` - 암호화폐
//! - `/v1/dividend` - 배당
//! - `/v1/transaction` - 거래 내역

pub mod broker;
pub mod crud;
pub mod health;
pub mod user;

pub use broker::broker_router;
pub use crud::{crud_router, ServedResource};
pub use health::{health_router, ComponentHealth, ComponentStatus, HealthResponse};
pub use user::user_router;

use axum::Router;
use portflux_core::{
    CryptoCurrency, Currency, Dividend, Holding, Portfolio, Stock, Transaction,
};
use std::sync::Arc;

use crate::state::AppState;

/// 전체 API 라우터 생성.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/health", health_router())
        .nest("/v1/user", user_router())
        .nest("/v1/broker", broker_router())
        .nest("/v1/portfolio", crud_router::<Portfolio>())
        .nest("/v1/holding", crud_router::<Holding>())
        .nest("/v1/stock", crud_router::<Stock>())
        .nest("/v1/currency", crud_router::<Currency>())
        .nest("/v1/cryptocurrency", crud_router::<CryptoCurrency>())
        .nest("/v1/dividend", crud_router::<Dividend>())
        .nest("/v1/transaction", crud_router::<Transaction>())
}
