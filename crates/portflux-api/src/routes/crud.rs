//! 엔티티 공통 CRUD 라우터.
//!
//! 증권사, 포트폴리오, 보유 종목, 주식, 통화, 암호화폐, 배당, 거래 라우트가
//! 같은 핸들러를 공유합니다.
//!
//! | method | path | 인증 |
//! |---|---|---|
//! | POST | `/` | 없음 |
//! | POST | `/many` | 없음 |
//! | GET | `/?skip=&take=` | JWT |
//! | GET | `/{id}` | JWT |
//! | PATCH | `/{id}` | JWT |
//! | DELETE | `/{id}` | JWT + admin |

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use portflux_core::{
    Broker, CreationResponse, CryptoCurrency, Currency, Dividend, Holding, MultiCreationResponse,
    Pagination, Portfolio, Resource, Stock, Transaction,
};
use tracing::debug;
use uuid::Uuid;

use crate::auth::{AdminAuth, JwtAuth};
use crate::error::{ApiJson, ApiPath, ApiQuery, ApiResult, RequestContext};
use crate::services::CrudService;
use crate::state::AppState;

/// AppState에서 엔티티 서비스를 찾는 연결 고리.
pub trait ServedResource: Resource {
    fn service(state: &AppState) -> &CrudService<Self>;
}

macro_rules! served_resource {
    ($($entity:ty => $field:ident),+ $(,)?) => {
        $(
            impl ServedResource for $entity {
                fn service(state: &AppState) -> &CrudService<Self> {
                    &state.$field
                }
            }
        )+
    };
}

served_resource! {
    Broker => brokers,
    Portfolio => portfolios,
    Holding => holdings,
    Stock => stocks,
    Currency => currencies,
    CryptoCurrency => cryptocurrencies,
    Dividend => dividends,
    Transaction => transactions,
}

/// 단건 생성.
async fn create_one<E: ServedResource>(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    ApiJson(request): ApiJson<E::Create>,
) -> ApiResult<(StatusCode, Json<CreationResponse>)> {
    let created = E::service(&state)
        .create(request)
        .await
        .map_err(|e| ctx.fail(e))?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// 일괄 생성.
async fn create_many<E: ServedResource>(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    ApiJson(requests): ApiJson<Vec<E::Create>>,
) -> ApiResult<(StatusCode, Json<MultiCreationResponse>)> {
    let created = E::service(&state)
        .create_many(requests)
        .await
        .map_err(|e| ctx.fail(e))?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn list<E: ServedResource>(
    State(state): State<Arc<AppState>>,
    JwtAuth(claims): JwtAuth,
    ctx: RequestContext,
    ApiQuery(page): ApiQuery<Pagination>,
) -> ApiResult<Json<Vec<E::Response>>> {
    debug!(entity = E::NAME, user = %claims.sub, "GET list");
    let records = E::service(&state)
        .get_all(page)
        .await
        .map_err(|e| ctx.fail(e))?;
    Ok(Json(records))
}

async fn get_one<E: ServedResource>(
    State(state): State<Arc<AppState>>,
    _auth: JwtAuth,
    ctx: RequestContext,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<E::Response>> {
    let record = E::service(&state)
        .get_by_id(id)
        .await
        .map_err(|e| ctx.fail(e))?;
    Ok(Json(record))
}

async fn update_one<E: ServedResource>(
    State(state): State<Arc<AppState>>,
    _auth: JwtAuth,
    ctx: RequestContext,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<E::Update>,
) -> ApiResult<StatusCode> {
    E::service(&state)
        .update(id, request)
        .await
        .map_err(|e| ctx.fail(e))?;
    Ok(StatusCode::OK)
}

async fn delete_one<E: ServedResource>(
    State(state): State<Arc<AppState>>,
    AdminAuth(claims): AdminAuth,
    ctx: RequestContext,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<StatusCode> {
    debug!(entity = E::NAME, %id, admin = %claims.sub, "DELETE");
    E::service(&state)
        .delete(id)
        .await
        .map_err(|e| ctx.fail(e))?;
    Ok(StatusCode::OK)
}

/// 엔티티 하나에 대한 CRUD 라우터.
///
/// 엔티티 전용 라우트는 반환된 라우터에 `merge`로 더합니다.
pub fn crud_router<E: ServedResource>() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_one::<E>).get(list::<E>))
        .route("/many", post(create_many::<E>))
        .route(
            "/{id}",
            get(get_one::<E>).patch(update_one::<E>).delete(delete_one::<E>),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{create_token, Claims};
    use crate::state::create_test_state;
    use axum::{
        body::Body,
        http::{header, Method, Request},
    };
    use portflux_core::Role;
    use tower::ServiceExt;

    fn app() -> (Router, Arc<AppState>) {
        let state = Arc::new(create_test_state());
        let router = Router::new()
            .nest("/v1/currency", crud_router::<Currency>())
            .with_state(state.clone());
        (router, state)
    }

    fn bearer(state: &AppState, role: Role) -> String {
        let claims = Claims::new(Uuid::new_v4(), "tester@example.com", role, 5);
        let token = create_token(&claims, &state.auth.jwt_secret).unwrap();
        format!("Bearer {}", token)
    }

    fn json_request(method: Method, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_is_public() {
        let (app, _) = app();
        let response = app
            .oneshot(json_request(
                Method::POST,
                "/v1/currency",
                r#"{"code":"EUR","name":"Euro","symbol":"€"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let created: CreationResponse = serde_json::from_slice(&body).unwrap();
        assert!(!created.inserted_id.is_nil());
    }

    #[tokio::test]
    async fn test_list_requires_token() {
        let (app, state) = app();

        let response = app
            .clone()
            .oneshot(Request::get("/v1/currency").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .oneshot(
                Request::get("/v1/currency?skip=0&take=10")
                    .header(header::AUTHORIZATION, bearer(&state, Role::Member))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"[]");
    }

    #[tokio::test]
    async fn test_delete_requires_admin() {
        let (app, state) = app();
        let id = state
            .currencies
            .create(portflux_core::CurrencyRequest {
                code: "USD".into(),
                name: "US dollar".into(),
                symbol: "$".into(),
            })
            .await
            .unwrap()
            .inserted_id;
        let uri = format!("/v1/currency/{}", id);

        let response = app
            .clone()
            .oneshot(
                Request::delete(&uri)
                    .header(header::AUTHORIZATION, bearer(&state, Role::Member))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app
            .oneshot(
                Request::delete(&uri)
                    .header(header::AUTHORIZATION, bearer(&state, Role::Admin))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_validation_error_body() {
        let (app, _) = app();
        let response = app
            .oneshot(json_request(
                Method::POST,
                "/v1/currency",
                r#"{"code":"","name":"Euro","symbol":"€"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(error["code"], "VALIDATION_ERROR");
        assert_eq!(error["message"], "code cannot be empty");
        assert_eq!(error["path"], "/v1/currency");
        assert_eq!(error["method"], "POST");
    }

    #[tokio::test]
    async fn test_malformed_path_and_query_use_error_body() {
        let (app, state) = app();
        let token = bearer(&state, Role::Member);

        for uri in ["/v1/currency/not-a-uuid", "/v1/currency?take=abc"] {
            let response = app
                .clone()
                .oneshot(
                    Request::get(uri)
                        .header(header::AUTHORIZATION, &token)
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "GET {}", uri);
            assert_eq!(
                response.headers()[header::CONTENT_TYPE],
                "application/json",
                "GET {}",
                uri
            );
            let body = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            let error: serde_json::Value = serde_json::from_slice(&body).unwrap();
            assert_eq!(error["code"], "INVALID_PARAMETER");
            assert_eq!(error["method"], "GET");
            assert!(error["timestamp"].is_i64());
        }
    }
}
