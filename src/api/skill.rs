use crate::error::SkillError;
use crate::intent::IntentRouter;
use crate::response::ResponseEnvelope;
use crate::skill::SkillRequest;
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::post,
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

/// Shared application state
#[derive(Clone)]
pub struct SkillAppState {
    pub router: Arc<IntentRouter>,
    pub body_size_limit_bytes: usize,
}

/// Error response
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// Create API router with the skill endpoint
///
/// `body_size_limit_bytes` replaces axum's default body limit, so values
/// above 2 MB are honored too.
pub fn create_skill_router(state: SkillAppState) -> Router {
    let body_limit = state.body_size_limit_bytes;
    Router::new()
        .route("/api/skill", post(handle_skill_request))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// POST /api/skill - Handle one voice-platform request
async fn handle_skill_request(
    State(state): State<Arc<SkillAppState>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, AppError> {
    let body = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge
        } else {
            AppError::BadRequest(rejection.body_text())
        }
    })?;

    let request: SkillRequest = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("invalid request envelope: {}", e)))?;

    match state.router.handle(&request).await? {
        Some(response) => Ok(Json(ResponseEnvelope::from(response)).into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

/// Application error types
enum AppError {
    BadRequest(String),
    Forbidden(String),
    PayloadTooLarge,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::PayloadTooLarge => {
                (StatusCode::PAYLOAD_TOO_LARGE, "payload too large".to_string())
            }
        };

        let body = Json(ErrorResponse {
            error: error_message,
        });

        (status, body).into_response()
    }
}

impl From<SkillError> for AppError {
    fn from(e: SkillError) -> Self {
        match e {
            SkillError::InvalidApplication(_) => {
                error!(error = %e, "Rejected request from unknown application");
                AppError::Forbidden(e.to_string())
            }
            SkillError::UnrecognizedIntent(_) | SkillError::UnsupportedRequest => {
                warn!(error = %e, "Rejected skill request");
                AppError::BadRequest(e.to_string())
            }
        }
    }
}
