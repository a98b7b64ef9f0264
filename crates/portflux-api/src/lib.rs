//! Portflux REST API 서버.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - Axum 기반 REST API (엔티티별 CRUD, 로그인)
//! - JWT 인증과 Argon2 비밀번호 해싱
//! - PostgreSQL 저장소 (sqlx)
//! - 헬스 체크, Prometheus 메트릭, OpenAPI 문서
//!
//! # 모듈 구성
//!
//! - [`state`]: 애플리케이션 공유 상태 (AppState)
//! - [`routes`]: REST API 엔드포인트
//! - [`services`]: 검증과 비즈니스 규칙
//! - [`repository`]: PostgreSQL 저장소
//! - [`auth`]: JWT 인증 및 권한 관리
//! - [`metrics`]: Prometheus 메트릭 수집
//! - [`middleware`]: HTTP 미들웨어
//! - [`openapi`]: OpenAPI 문서 및 Swagger UI

pub mod auth;
pub mod error;
pub mod metrics;
pub mod middleware;
pub mod openapi;
pub mod repository;
pub mod routes;
pub mod services;
pub mod state;

pub use auth::{hash_password, verify_password, AdminAuth, Claims, JwtAuth, JwtAuthError};
pub use error::{ApiError, ApiErrorResponse, ApiJson, ApiPath, ApiQuery, ApiResult};
pub use metrics::setup_metrics_recorder;
pub use middleware::metrics_layer;
pub use repository::{PgEntity, PgRepository};
pub use routes::create_api_router;
pub use services::{CrudService, UserService};
pub use state::AppState;

#[cfg(any(test, feature = "test-utils"))]
pub use state::create_test_state;
