use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::Value;
use sqlx::SqlitePool;
use tracing::warn;

use crate::services::friendship_service;
use crate::web::error::ApiError;
use crate::web::middleware::auth::AuthenticatedUser;

pub async fn list_friends_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(pool): State<SqlitePool>,
) -> Result<Json<Value>, ApiError> {
    let friends = friendship_service::list_friends(&pool, &auth_user.id)
        .await
        .map_err(|e| {
            warn!("Friends list load failed for {}: {}", auth_user.id, e);
            ApiError::from(e)
        })?;

    Ok(Json(serde_json::json!({ "friends": friends })))
}

pub async fn list_requests_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(pool): State<SqlitePool>,
) -> Result<Json<Value>, ApiError> {
    let requests = friendship_service::list_open_requests(&pool, &auth_user.id)
        .await
        .map_err(|e| {
            warn!("Open requests load failed for {}: {}", auth_user.id, e);
            ApiError::from(e)
        })?;

    Ok(Json(serde_json::json!({
        "incoming": requests.incoming,
        "outgoing": requests.outgoing,
    })))
}

#[derive(Debug, Deserialize)]
pub struct SendRequestBody {
    pub recipient_id: String,
}

pub async fn send_request_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(pool): State<SqlitePool>,
    Json(body): Json<SendRequestBody>,
) -> Result<Json<Value>, ApiError> {
    let request =
        friendship_service::send_friend_request(&pool, &auth_user.id, &body.recipient_id)
            .await
            .map_err(|e| {
                warn!(
                    "Friend request from {} to {} failed: {}",
                    auth_user.id, body.recipient_id, e
                );
                ApiError::from(e)
            })?;

    Ok(Json(serde_json::json!({ "request": request })))
}

pub async fn accept_request_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(request_id): Path<String>,
    State(pool): State<SqlitePool>,
) -> Result<Json<Value>, ApiError> {
    let friendship = friendship_service::accept_friend_request(&pool, &request_id, &auth_user.id)
        .await
        .map_err(|e| {
            warn!("Accept of request {} failed: {}", request_id, e);
            ApiError::from(e)
        })?;

    Ok(Json(serde_json::json!({ "friendship": friendship })))
}

pub async fn reject_request_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(request_id): Path<String>,
    State(pool): State<SqlitePool>,
) -> Result<Json<Value>, ApiError> {
    friendship_service::reject_friend_request(&pool, &request_id, &auth_user.id)
        .await
        .map_err(|e| {
            warn!("Reject of request {} failed: {}", request_id, e);
            ApiError::from(e)
        })?;

    Ok(Json(serde_json::json!({ "status": "ok" })))
}

pub async fn cancel_request_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(request_id): Path<String>,
    State(pool): State<SqlitePool>,
) -> Result<Json<Value>, ApiError> {
    friendship_service::cancel_friend_request(&pool, &request_id, &auth_user.id)
        .await
        .map_err(|e| {
            warn!("Cancel of request {} failed: {}", request_id, e);
            ApiError::from(e)
        })?;

    Ok(Json(serde_json::json!({ "status": "ok" })))
}

pub async fn remove_friend_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(friendship_id): Path<String>,
    State(pool): State<SqlitePool>,
) -> Result<Json<Value>, ApiError> {
    friendship_service::remove_friend(&pool, &friendship_id, &auth_user.id)
        .await
        .map_err(|e| {
            warn!("Unfriend of {} failed: {}", friendship_id, e);
            ApiError::from(e)
        })?;

    Ok(Json(serde_json::json!({ "status": "ok" })))
}
