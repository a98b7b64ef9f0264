//! 사용자 endpoint.
//!
//! 가입과 로그인은 인증 없이 호출할 수 있으며, 로그인 응답의 토큰으로
//! 나머지 API를 호출합니다.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use portflux_core::{
    CreateUserRequest, CreationResponse, LoginRequest, LoginResponse, MultiCreationResponse,
    Pagination, UpdateUserRequest, UserResponse,
};
use tracing::debug;
use uuid::Uuid;

use crate::auth::{AdminAuth, JwtAuth};
use crate::error::{ApiErrorResponse, ApiJson, ApiPath, ApiQuery, ApiResult, RequestContext};
use crate::state::AppState;

/// 회원 가입.
#[utoipa::path(
    post,
    path = "/v1/user",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "가입 성공", body = CreationResponse),
        (status = 400, description = "잘못된 요청", body = ApiErrorResponse),
        (status = 409, description = "이미 등록된 이메일", body = ApiErrorResponse)
    ),
    tag = "user"
)]
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    ApiJson(request): ApiJson<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<CreationResponse>)> {
    let created = state.users.create(request).await.map_err(|e| ctx.fail(e))?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// 일괄 가입.
#[utoipa::path(
    post,
    path = "/v1/user/many",
    request_body = Vec<CreateUserRequest>,
    responses(
        (status = 201, description = "가입 성공", body = MultiCreationResponse),
        (status = 400, description = "잘못된 요청", body = ApiErrorResponse),
        (status = 409, description = "이미 등록된 이메일", body = ApiErrorResponse)
    ),
    tag = "user"
)]
pub async fn create_users(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    ApiJson(requests): ApiJson<Vec<CreateUserRequest>>,
) -> ApiResult<(StatusCode, Json<MultiCreationResponse>)> {
    let created = state
        .users
        .create_many(requests)
        .await
        .map_err(|e| ctx.fail(e))?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// 로그인.
#[utoipa::path(
    post,
    path = "/v1/user/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "로그인 성공", body = LoginResponse),
        (status = 400, description = "잘못된 요청", body = ApiErrorResponse),
        (status = 401, description = "이메일 또는 비밀번호 불일치", body = ApiErrorResponse)
    ),
    tag = "user"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    ApiJson(request): ApiJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let response = state.users.login(request).await.map_err(|e| ctx.fail(e))?;
    Ok(Json(response))
}

/// 사용자 목록.
#[utoipa::path(
    get,
    path = "/v1/user",
    params(Pagination),
    responses(
        (status = 200, description = "조회 성공", body = Vec<UserResponse>),
        (status = 401, description = "인증 실패", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "user"
)]
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    JwtAuth(claims): JwtAuth,
    ctx: RequestContext,
    ApiQuery(page): ApiQuery<Pagination>,
) -> ApiResult<Json<Vec<UserResponse>>> {
    debug!(user = %claims.sub, "GET /v1/user");
    let users = state.users.get_all(page).await.map_err(|e| ctx.fail(e))?;
    Ok(Json(users))
}

/// ID로 사용자 조회.
#[utoipa::path(
    get,
    path = "/v1/user/{id}",
    params(("id" = Uuid, Path, description = "사용자 ID")),
    responses(
        (status = 200, description = "조회 성공", body = UserResponse),
        (status = 404, description = "사용자 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "user"
)]
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    _auth: JwtAuth,
    ctx: RequestContext,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<UserResponse>> {
    let user = state.users.get_by_id(id).await.map_err(|e| ctx.fail(e))?;
    Ok(Json(user))
}

/// 이메일로 사용자 조회.
#[utoipa::path(
    get,
    path = "/v1/user/email/{email}",
    params(("email" = String, Path, description = "이메일")),
    responses(
        (status = 200, description = "조회 성공", body = UserResponse),
        (status = 404, description = "사용자 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "user"
)]
pub async fn get_user_by_email(
    State(state): State<Arc<AppState>>,
    _auth: JwtAuth,
    ctx: RequestContext,
    ApiPath(email): ApiPath<String>,
) -> ApiResult<Json<UserResponse>> {
    let user = state
        .users
        .get_by_email(&email)
        .await
        .map_err(|e| ctx.fail(e))?;
    Ok(Json(user))
}

/// 프로필 수정.
///
/// `new_password`를 보내려면 `old_password`도 함께 보내야 합니다.
#[utoipa::path(
    patch,
    path = "/v1/user/{id}",
    params(("id" = Uuid, Path, description = "사용자 ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "수정 성공"),
        (status = 400, description = "잘못된 요청", body = ApiErrorResponse),
        (status = 401, description = "기존 비밀번호 불일치", body = ApiErrorResponse),
        (status = 404, description = "사용자 없음", body = ApiErrorResponse),
        (status = 409, description = "이미 등록된 이메일", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "user"
)]
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    _auth: JwtAuth,
    ctx: RequestContext,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<UpdateUserRequest>,
) -> ApiResult<StatusCode> {
    state
        .users
        .update(id, request)
        .await
        .map_err(|e| ctx.fail(e))?;
    Ok(StatusCode::OK)
}

/// 사용자 삭제 (admin 전용).
#[utoipa::path(
    delete,
    path = "/v1/user/{id}",
    params(("id" = Uuid, Path, description = "사용자 ID")),
    responses(
        (status = 200, description = "삭제 성공"),
        (status = 403, description = "권한 부족", body = ApiErrorResponse),
        (status = 404, description = "사용자 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "user"
)]
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    AdminAuth(claims): AdminAuth,
    ctx: RequestContext,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<StatusCode> {
    debug!(%id, admin = %claims.sub, "DELETE /v1/user");
    state.users.delete(id).await.map_err(|e| ctx.fail(e))?;
    Ok(StatusCode::OK)
}

/// 사용자 라우터 생성.
pub fn user_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_user).get(list_users))
        .route("/many", post(create_users))
        .route("/login", post(login))
        .route("/email/{email}", get(get_user_by_email))
        .route(
            "/{id}",
            get(get_user).patch(update_user).delete(delete_user),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::create_test_state;
    use axum::{
        body::Body,
        http::{header, Request},
    };
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .nest("/v1/user", user_router())
            .with_state(Arc::new(create_test_state()))
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_signup_then_login() {
        let app = app();

        let response = app
            .clone()
            .oneshot(post_json(
                "/v1/user",
                r#"{"firstname":"Ada","lastname":"Lovelace","email":"ada@example.com","password":"engine"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .oneshot(post_json(
                "/v1/user/login",
                r#"{"email":"ada@example.com","password":"engine"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let login: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(login["token"].as_str().is_some_and(|t| !t.is_empty()));
        assert_eq!(login["user"]["email"], "ada@example.com");
        assert!(login["user"].get("password_hash").is_none());
    }

    #[tokio::test]
    async fn test_login_with_wrong_password() {
        let app = app();
        app.clone()
            .oneshot(post_json(
                "/v1/user",
                r#"{"firstname":"Ada","lastname":"Lovelace","email":"ada@example.com","password":"engine"}"#,
            ))
            .await
            .unwrap();

        let response = app
            .oneshot(post_json(
                "/v1/user/login",
                r#"{"email":"ada@example.com","password":"nope"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_lookup_by_email_requires_token() {
        let response = app()
            .oneshot(
                Request::get("/v1/user/email/ada@example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
