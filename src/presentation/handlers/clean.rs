use axum::Json;
use axum::extract::multipart::Field;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::services::CleaningMessage;
use crate::domain::{ContentType, Document, SessionId};
use crate::presentation::state::AppState;

use super::error_response::error_response;

const FILE_FIELD: &str = "file";

#[derive(Serialize)]
pub struct CleanResponse {
    pub session_id: String,
    pub filename: String,
    pub message: String,
}

/// Accepts a PDF or text upload and queues it for cleaning.
#[tracing::instrument(skip(state, multipart))]
pub async fn clean_handler(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(f)) => f,
            Ok(None) => {
                tracing::warn!("Clean request with no file");
                return error_response(StatusCode::BAD_REQUEST, "No file provided");
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to read multipart");
                return error_response(e.status(), format!("Failed to read multipart: {}", e));
            }
        };

        if field.name() == Some(FILE_FIELD) {
            return accept_upload(&state, field).await;
        }
    }
}

async fn accept_upload(state: &AppState, field: Field<'_>) -> Response {
    let filename = field.file_name().unwrap_or_default().trim().to_string();
    if filename.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "No file selected");
    }

    let content_type = ContentType::from_filename(&filename)
        .or_else(|| field.content_type().and_then(ContentType::from_mime));
    let Some(content_type) = content_type else {
        tracing::warn!(filename = %filename, "Unsupported upload type");
        return error_response(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "Only PDF and plain text files are allowed",
        );
    };

    let data = match field.bytes().await {
        Ok(d) => d,
        Err(e) => {
            tracing::error!(error = %e, "Failed to read file bytes");
            return error_response(e.status(), format!("Failed to read file: {}", e));
        }
    };

    let max_upload_bytes = state.settings.server.max_upload_bytes;
    if data.len() > max_upload_bytes {
        return error_response(
            StatusCode::PAYLOAD_TOO_LARGE,
            format!("File exceeds the {} byte limit", max_upload_bytes),
        );
    }

    tracing::debug!(bytes = data.len(), "File data received");

    let session = SessionId::new();
    let document = Document::new(filename.clone(), content_type, data.len() as u64);
    state.tracker.enqueue(session);

    let msg = CleaningMessage {
        session,
        document,
        data: data.to_vec(),
    };

    if let Err(e) = state.cleaning_sender.send(msg).await {
        tracing::error!(error = %e, "Failed to enqueue cleaning job");
        state.tracker.fail(session, "cleaning worker unavailable");
        state.tracker.expire(
            session,
            std::time::Duration::from_secs(state.settings.pipeline.progress_retention_seconds),
        );
        return error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            "Cleaning queue full or worker unavailable",
        );
    }

    tracing::info!(session_id = %session, filename = %filename, "Cleaning job enqueued");

    (
        StatusCode::ACCEPTED,
        Json(CleanResponse {
            session_id: session.to_string(),
            filename,
            message: "Document cleaning started".to_string(),
        }),
    )
        .into_response()
}
