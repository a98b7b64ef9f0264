//! 증권사 전용 endpoint.

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use portflux_core::Broker;

use super::crud::crud_router;
use crate::auth::JwtAuth;
use crate::error::{ApiErrorResponse, ApiPath, ApiResult, RequestContext};
use crate::state::AppState;

/// slug로 증권사 조회.
#[utoipa::path(
    get,
    path = "/v1/broker/slug/{slug}",
    params(("slug" = String, Path, description = "증권사 이름에서 만든 slug")),
    responses(
        (status = 200, description = "조회 성공", body = Broker),
        (status = 401, description = "인증 실패", body = ApiErrorResponse),
        (status = 404, description = "증권사 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "broker"
)]
pub async fn get_broker_by_slug(
    State(state): State<Arc<AppState>>,
    _auth: JwtAuth,
    ctx: RequestContext,
    ApiPath(slug): ApiPath<String>,
) -> ApiResult<Json<Broker>> {
    let broker = state
        .brokers
        .get_by_slug(&slug)
        .await
        .map_err(|e| ctx.fail(e))?;
    Ok(Json(broker))
}

/// 증권사 라우터 생성 (공통 CRUD + slug 조회).
pub fn broker_router() -> Router<Arc<AppState>> {
    crud_router::<Broker>().route("/slug/{slug}", get(get_broker_by_slug))
}
