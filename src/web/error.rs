use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::services::friendship_service::FriendshipError;
use crate::services::hackathon_service::HackathonError;

/// Uniform JSON failure body: a stable machine-readable `error` code plus a
/// human-readable `message` the frontend can surface as a toast.
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "not_found", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": self.code,
            "message": self.message,
        });
        (self.status, Json(body)).into_response()
    }
}

impl From<FriendshipError> for ApiError {
    fn from(e: FriendshipError) -> Self {
        let (status, code) = match &e {
            FriendshipError::NotFound => (StatusCode::NOT_FOUND, "not_found"),
            FriendshipError::Forbidden => (StatusCode::FORBIDDEN, "forbidden"),
            FriendshipError::InvalidState => (StatusCode::CONFLICT, "invalid_state"),
            FriendshipError::DuplicateRequest => (StatusCode::CONFLICT, "duplicate_request"),
            FriendshipError::AlreadyFriends => (StatusCode::CONFLICT, "already_friends"),
            FriendshipError::SelfRequest => (StatusCode::BAD_REQUEST, "self_request"),
            FriendshipError::Persistence(_) => (StatusCode::INTERNAL_SERVER_ERROR, "storage"),
        };
        let message = match &e {
            FriendshipError::Persistence(_) => {
                "temporary storage problem, please retry".to_string()
            }
            _ => e.to_string(),
        };
        Self::new(status, code, message)
    }
}

impl From<HackathonError> for ApiError {
    fn from(e: HackathonError) -> Self {
        let (status, code) = match &e {
            HackathonError::NotFound => (StatusCode::NOT_FOUND, "not_found"),
            HackathonError::Forbidden => (StatusCode::FORBIDDEN, "forbidden"),
            HackathonError::InvalidState => (StatusCode::CONFLICT, "invalid_state"),
            HackathonError::Validation(_) => (StatusCode::BAD_REQUEST, "validation"),
            HackathonError::Persistence(_) => (StatusCode::INTERNAL_SERVER_ERROR, "storage"),
        };
        let message = match &e {
            HackathonError::Persistence(_) => {
                "temporary storage problem, please retry".to_string()
            }
            _ => e.to_string(),
        };
        Self::new(status, code, message)
    }
}
