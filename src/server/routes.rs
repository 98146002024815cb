// src/server/routes.rs
use crate::pipeline::SummaryResult;
use crate::server::error::error_response;
use crate::server::AppState;
use crate::utils::error::{PipelineError, StorageError};
use axum::{
    body::Body,
    extract::{Path, Request, State},
    http::{header, HeaderValue, StatusCode},
    response::{Html, Response},
    Json,
};
use serde_json::json;
use tower::ServiceExt;
use tower_http::services::ServeFile;

const INDEX_HTML: &str = include_str!("../../static/index.html");

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// GET /analyze/10k/:ticker/:section
pub async fn analyze_10k(
    State(state): State<AppState>,
    Path((ticker, section)): Path<(String, String)>,
) -> Result<Json<SummaryResult>, PipelineError> {
    let result = state.pipeline.analyze(&ticker, &section).await?;
    Ok(Json(result))
}

/// GET /audio/:filename
///
/// Streams the WAV through `ServeFile`, so players get range requests and seeking.
pub async fn serve_audio(
    State(state): State<AppState>,
    Path(filename): Path<String>,
    request: Request,
) -> Response {
    let not_found = || error_response(StatusCode::NOT_FOUND, "Audio file not found");

    let Some(store) = state.pipeline.audio_store() else {
        return not_found();
    };

    let path = match store.resolve(&filename) {
        Ok(path) => path,
        Err(StorageError::InvalidFileName(name)) => {
            tracing::warn!("Rejected audio file name: {}", name);
            return not_found();
        }
        Err(e) => {
            tracing::error!("Error serving audio file {}: {}", filename, e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Error serving audio file");
        }
    };

    let response = match ServeFile::new(&path).oneshot(request).await {
        Ok(response) => response,
        Err(never) => match never {},
    };

    match response.status() {
        StatusCode::NOT_FOUND => {
            tracing::warn!("Audio file not found: {}", filename);
            not_found()
        }
        status if status.is_server_error() => {
            tracing::error!("Error serving audio file {}: {}", filename, status);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Error serving audio file")
        }
        _ => {
            let mut response = response.map(Body::new);
            response
                .headers_mut()
                .insert(header::CONTENT_TYPE, HeaderValue::from_static("audio/wav"));
            response
        }
    }
}
