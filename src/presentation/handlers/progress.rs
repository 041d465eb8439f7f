use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::domain::{JobProgress, JobStatus, SessionId};
use crate::presentation::state::AppState;

use super::error_response::error_response;

#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    pub session_id: String,
    pub status: JobStatus,
    pub completed: usize,
    pub total: usize,
    pub percent: f64,
    pub error: Option<String>,
    pub started_at: String,
}

impl ProgressResponse {
    fn from_progress(session: SessionId, progress: JobProgress) -> Self {
        Self {
            session_id: session.to_string(),
            status: progress.status,
            completed: progress.completed,
            total: progress.total,
            percent: (progress.percent() * 10.0).round() / 10.0,
            error: progress.error_message,
            started_at: progress.started_at.to_rfc3339(),
        }
    }
}

/// Read-only progress snapshot for a session.
#[tracing::instrument(skip(state))]
pub async fn progress_handler(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Response {
    let Ok(session) = session_id.parse::<SessionId>() else {
        return error_response(
            StatusCode::BAD_REQUEST,
            format!("Invalid session ID: {}", session_id),
        );
    };

    match state.tracker.get(session) {
        Ok(progress) => (
            StatusCode::OK,
            Json(ProgressResponse::from_progress(session, progress)),
        )
            .into_response(),
        Err(e) => error_response(StatusCode::NOT_FOUND, e.to_string()),
    }
}
