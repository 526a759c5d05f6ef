use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::Value;
use sqlx::SqlitePool;
use tracing::warn;

use crate::services::hackathon_service::{
    self, BasicsForm, BrowseQuery, DetailsForm, VenueForm,
};
use crate::web::error::ApiError;
use crate::web::middleware::auth::AuthenticatedUser;

pub async fn browse_handler(
    Query(query): Query<BrowseQuery>,
    State(pool): State<SqlitePool>,
) -> Result<Json<Value>, ApiError> {
    let hackathons = hackathon_service::list_published(&pool, &query)
        .await
        .map_err(|e| {
            warn!("Hackathon browse failed: {}", e);
            ApiError::from(e)
        })?;

    Ok(Json(serde_json::json!({ "hackathons": hackathons })))
}

pub async fn detail_handler(
    Path(hackathon_id): Path<String>,
    State(pool): State<SqlitePool>,
) -> Result<Json<Value>, ApiError> {
    let row = hackathon_service::get_published(&pool, &hackathon_id)
        .await
        .map_err(|e| {
            warn!("Hackathon detail load failed for {}: {}", hackathon_id, e);
            ApiError::from(e)
        })?;

    let Some(row) = row else {
        return Err(ApiError::not_found("hackathon not found"));
    };

    Ok(Json(serde_json::json!({ "hackathon": row })))
}

#[derive(Debug, Deserialize)]
pub struct CreateDraftBody {
    pub name: String,
}

pub async fn create_draft_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(pool): State<SqlitePool>,
    Json(body): Json<CreateDraftBody>,
) -> Result<Json<Value>, ApiError> {
    let row = hackathon_service::create_draft(&pool, &auth_user.id, &body.name)
        .await
        .map_err(|e| {
            warn!("Draft creation by {} failed: {}", auth_user.id, e);
            ApiError::from(e)
        })?;

    Ok(Json(serde_json::json!({ "hackathon": row })))
}

pub async fn draft_detail_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(hackathon_id): Path<String>,
    State(pool): State<SqlitePool>,
) -> Result<Json<Value>, ApiError> {
    let row = hackathon_service::get_for_organizer(&pool, &auth_user.id, &hackathon_id)
        .await
        .map_err(|e| {
            warn!("Draft load failed for {}: {}", hackathon_id, e);
            ApiError::from(e)
        })?;

    Ok(Json(serde_json::json!({ "hackathon": row })))
}

pub async fn save_basics_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(hackathon_id): Path<String>,
    State(pool): State<SqlitePool>,
    Json(form): Json<BasicsForm>,
) -> Result<Json<Value>, ApiError> {
    let row = hackathon_service::save_basics(&pool, &auth_user.id, &hackathon_id, &form)
        .await
        .map_err(|e| {
            warn!("Basics save failed for {}: {}", hackathon_id, e);
            ApiError::from(e)
        })?;

    Ok(Json(serde_json::json!({ "hackathon": row })))
}

pub async fn save_details_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(hackathon_id): Path<String>,
    State(pool): State<SqlitePool>,
    Json(form): Json<DetailsForm>,
) -> Result<Json<Value>, ApiError> {
    let row = hackathon_service::save_details(&pool, &auth_user.id, &hackathon_id, &form)
        .await
        .map_err(|e| {
            warn!("Details save failed for {}: {}", hackathon_id, e);
            ApiError::from(e)
        })?;

    Ok(Json(serde_json::json!({ "hackathon": row })))
}

pub async fn save_venue_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(hackathon_id): Path<String>,
    State(pool): State<SqlitePool>,
    Json(form): Json<VenueForm>,
) -> Result<Json<Value>, ApiError> {
    let row = hackathon_service::save_venue(&pool, &auth_user.id, &hackathon_id, &form)
        .await
        .map_err(|e| {
            warn!("Venue save failed for {}: {}", hackathon_id, e);
            ApiError::from(e)
        })?;

    Ok(Json(serde_json::json!({ "hackathon": row })))
}

pub async fn publish_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(hackathon_id): Path<String>,
    State(pool): State<SqlitePool>,
) -> Result<Json<Value>, ApiError> {
    let row = hackathon_service::publish(&pool, &auth_user.id, &hackathon_id)
        .await
        .map_err(|e| {
            warn!("Publish failed for {}: {}", hackathon_id, e);
            ApiError::from(e)
        })?;

    Ok(Json(serde_json::json!({ "hackathon": row })))
}
