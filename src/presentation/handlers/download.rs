use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};

use crate::domain::{JobStatus, OutputFormat, SessionId};
use crate::presentation::state::AppState;

use super::error_response::error_response;

/// Serves the rendered output of a finished session as an attachment.
#[tracing::instrument(skip(state))]
pub async fn download_handler(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Response {
    let Ok(session) = session_id.parse::<SessionId>() else {
        return error_response(
            StatusCode::BAD_REQUEST,
            format!("Invalid session ID: {}", session_id),
        );
    };

    let Some(path) = state.outputs.get(session) else {
        return match state.tracker.get(session) {
            Ok(progress) if progress.status == JobStatus::Failed => error_response(
                StatusCode::CONFLICT,
                format!(
                    "Cleaning failed: {}",
                    progress.error_message.unwrap_or_default()
                ),
            ),
            Ok(progress) => error_response(
                StatusCode::CONFLICT,
                format!("Cleaning not finished: {}", progress.status),
            ),
            Err(_) => error_response(
                StatusCode::NOT_FOUND,
                format!("File not found for session: {}", session_id),
            ),
        };
    };

    let body = match tokio::fs::read(&path).await {
        Ok(body) => body,
        Err(e) => {
            tracing::error!(error = %e, path = %path.display(), "Failed to read rendered output");
            state.outputs.remove(session);
            return error_response(StatusCode::NOT_FOUND, "File not found");
        }
    };

    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("cleaned")
        .to_string();
    let media_type = OutputFormat::from_path(&path)
        .map(|format| format.media_type())
        .unwrap_or("application/octet-stream");

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, media_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
        .into_response()
}
