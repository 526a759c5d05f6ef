use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde_json::Value;
use sqlx::SqlitePool;
use tracing::warn;

use crate::services::friendship_service;
use crate::services::user_service;
use crate::web::error::ApiError;
use crate::web::middleware::auth::AuthenticatedUser;

pub async fn user_profile_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(user_id): Path<String>,
    State(pool): State<SqlitePool>,
) -> Result<Json<Value>, ApiError> {
    let view = user_service::load_user_profile_view(&pool, &auth_user.id, &user_id)
        .await
        .map_err(|e| {
            warn!("User profile load failed for {}: {}", user_id, e);
            ApiError::from(e)
        })?;

    let Some(view) = view else {
        return Err(ApiError::not_found("user not found"));
    };

    Ok(Json(serde_json::json!({ "user": view })))
}

pub async fn relationship_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(user_id): Path<String>,
    State(pool): State<SqlitePool>,
) -> Result<Json<friendship_service::RelationshipView>, ApiError> {
    let view = friendship_service::check_friendship_status(&pool, &auth_user.id, &user_id)
        .await
        .map_err(|e| {
            warn!("Relationship check failed for {}: {}", user_id, e);
            ApiError::from(e)
        })?;

    Ok(Json(view))
}
