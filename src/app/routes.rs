use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::extract::{ExtractionError, extract};
use crate::summary::SummaryError;

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Serialize)]
struct SummaryBody {
    summary: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
        .into_response()
}

pub(super) async fn get_book(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match extract(&state.catalog, &id).await {
        Ok(book) => Json(book).into_response(),
        Err(err) => {
            let status = match &err {
                ExtractionError::InvalidId => StatusCode::BAD_REQUEST,
                ExtractionError::NotFound { .. } => StatusCode::NOT_FOUND,
                ExtractionError::Transport(_) | ExtractionError::Validation(_) => {
                    StatusCode::BAD_GATEWAY
                }
            };
            tracing::warn!(id = %id, %status, error = %err, "book lookup failed");
            error_response(status, err.to_string())
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct TextAnalysisQuery {
    id: Option<String>,
}

pub(super) async fn text_analysis(
    State(state): State<AppState>,
    Query(q): Query<TextAnalysisQuery>,
) -> Response {
    let id = q.id.unwrap_or_default();
    match state.summarizer.summarize(&id).await {
        Ok(summary) => Json(SummaryBody { summary }).into_response(),
        Err(SummaryError::MissingId) => {
            error_response(StatusCode::BAD_REQUEST, SummaryError::MissingId.to_string())
        }
        Err(err) => {
            tracing::warn!(id = %id, error = %err, "text analysis failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}
