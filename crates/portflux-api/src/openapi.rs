//! OpenAPI 문서화 설정.
//!
//! utoipa로 REST API의 OpenAPI 3.0 문서를 생성합니다.
//! Swagger UI는 `/swagger-ui` 경로에서 사용 가능합니다.
//!
//! 공통 CRUD 라우트(`/v1/<entity>`)는 제네릭 핸들러라 경로 어노테이션 대신
//! 요청/응답 스키마만 등록합니다. 사용자, 증권사 slug 조회, 헬스 체크는
//! 경로까지 문서화됩니다.

use axum::Router;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use portflux_core::{
    Broker, CreateBrokerRequest, CreateHoldingRequest, CreateUserRequest, CreationResponse,
    CryptoCurrency, CryptoCurrencyRequest, Currency, CurrencyRequest, Dividend, DividendRequest,
    Holding, HoldingDetails, LoginRequest, LoginResponse, MultiCreationResponse, Portfolio,
    PortfolioRequest, Role, Stock, StockRequest, Transaction, TransactionRequest,
    UpdateBrokerRequest, UpdateHoldingRequest, UpdateUserRequest, UserResponse,
};

use crate::error::ApiErrorResponse;
use crate::routes::{ComponentHealth, ComponentStatus, HealthResponse};

/// `Authorization: Bearer <token>` 인증 방식 등록.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("POST /v1/user/login 응답의 token"))
                    .build(),
            ),
        );
    }
}

/// Portflux API 문서.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Portflux API",
        description = r#"
# Portflux 포트폴리오 관리 REST API

사용자, 증권사, 포트폴리오, 보유 종목, 주식, 통화, 암호화폐, 배당, 거래 내역을 관리합니다.

## 인증

생성(`POST /v1/<entity>`, `POST /v1/<entity>/many`)과 로그인을 제외한 모든 엔드포인트는
JWT Bearer 토큰이 필요합니다. 삭제는 admin 역할만 가능합니다.
"#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "로컬 개발 서버"),
    ),
    tags(
        (name = "health", description = "헬스 체크"),
        (name = "user", description = "사용자 - 가입, 로그인, 프로필"),
        (name = "broker", description = "증권사")
    ),
    modifiers(&SecurityAddon),
    components(
        schemas(
            // ===== Common =====
            ApiErrorResponse,
            CreationResponse,
            MultiCreationResponse,
            HealthResponse,
            ComponentHealth,
            ComponentStatus,

            // ===== User =====
            Role,
            UserResponse,
            CreateUserRequest,
            UpdateUserRequest,
            LoginRequest,
            LoginResponse,

            // ===== Entities =====
            Broker,
            CreateBrokerRequest,
            UpdateBrokerRequest,
            Portfolio,
            PortfolioRequest,
            Holding,
            HoldingDetails,
            CreateHoldingRequest,
            UpdateHoldingRequest,
            Stock,
            StockRequest,
            Currency,
            CurrencyRequest,
            CryptoCurrency,
            CryptoCurrencyRequest,
            Dividend,
            DividendRequest,
            Transaction,
            TransactionRequest,
        )
    ),
    paths(
        crate::routes::health::health_check,
        crate::routes::health::health_ready,

        crate::routes::user::create_user,
        crate::routes::user::create_users,
        crate::routes::user::login,
        crate::routes::user::list_users,
        crate::routes::user::get_user,
        crate::routes::user::get_user_by_email,
        crate::routes::user::update_user,
        crate::routes::user::delete_user,

        crate::routes::broker::get_broker_by_slug,
    )
)]
pub struct ApiDoc;

/// Swagger UI 라우터 생성.
///
/// - `/swagger-ui` - Swagger UI 대화형 문서
/// - `/api-docs/openapi.json` - OpenAPI JSON
pub fn swagger_ui_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_spec_valid() {
        let spec = ApiDoc::openapi();
        let json = serde_json::to_string_pretty(&spec).unwrap();

        assert!(json.contains("Portflux API"));
        assert!(json.contains("/health/ready"));
        assert!(json.contains("/v1/user/login"));
        assert!(json.contains("/v1/user/email/{email}"));
        assert!(json.contains("/v1/broker/slug/{slug}"));
        assert!(json.contains("bearer_auth"));
    }

    #[test]
    fn test_openapi_contains_entity_schemas() {
        let json = serde_json::to_string(&ApiDoc::openapi()).unwrap();

        for schema in [
            "ApiErrorResponse",
            "Portfolio",
            "CreateHoldingRequest",
            "CryptoCurrency",
            "TransactionRequest",
            "LoginResponse",
        ] {
            assert!(json.contains(schema), "missing schema {schema}");
        }
    }

    #[test]
    fn test_swagger_ui_router_creates() {
        let _router: Router<()> = swagger_ui_router();
    }
}
