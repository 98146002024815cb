// src/server/mod.rs
pub mod error;
pub mod routes;

use crate::pipeline::AnalysisPipeline;
use crate::utils::AppError;
use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Shared, read-only state; every request runs its own pipeline pass.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<AnalysisPipeline>,
}

/// Create the application router with all routes and middleware
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/health", get(routes::health))
        .route("/analyze/10k/:ticker/:section", get(routes::analyze_10k))
        .route("/audio/:filename", get(routes::serve_audio))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

pub async fn serve(bind: SocketAddr, state: AppState) -> Result<(), AppError> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::tests::{pipeline, FakeEdgar, FakeOracle};
    use crate::storage::AudioStore;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use std::sync::atomic::Ordering;
    use tower::ServiceExt;

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn app(edgar: Arc<FakeEdgar>, oracle: Arc<FakeOracle>) -> Router {
        router(AppState {
            pipeline: Arc::new(pipeline(edgar, oracle)),
        })
    }

    #[tokio::test]
    async fn test_analyze_returns_exactly_three_keys() {
        let app = app(Arc::new(FakeEdgar::default()), Arc::new(FakeOracle::default()));
        let (status, body) = get_json(app, "/analyze/10k/AAPL/risk%20factors").await;

        assert_eq!(status, StatusCode::OK);
        let mut keys: Vec<&String> = body.as_object().unwrap().keys().collect();
        keys.sort();
        assert_eq!(keys, vec!["section", "summary", "ticker"]);
        assert_eq!(body["ticker"], "AAPL");
        assert_eq!(body["section"], "risk factors");
        assert!(!body["summary"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_ticker_is_404_without_downstream_calls() {
        let edgar = Arc::new(FakeEdgar::default());
        let oracle = Arc::new(FakeOracle::default());
        let (status, body) = get_json(app(edgar.clone(), oracle.clone()), "/analyze/10k/NOPE/business").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, serde_json::json!({"error": "Ticker not found"}));
        assert_eq!(edgar.calls.load(Ordering::SeqCst), 1);
        assert_eq!(oracle.text_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_section_is_404() {
        let app = app(Arc::new(FakeEdgar::default()), Arc::new(FakeOracle::default()));
        let (status, body) = get_json(app, "/analyze/10k/AAPL/Legal%20Proceedings").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Section Legal Proceedings not found");
    }

    #[tokio::test]
    async fn test_upstream_and_generation_failures_are_500() {
        let edgar = Arc::new(FakeEdgar {
            fail_document: true,
            ..Default::default()
        });
        let (status, body) = get_json(app(edgar, Arc::new(FakeOracle::default())), "/analyze/10k/AAPL/business").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to fetch 10-K content");

        let oracle = Arc::new(FakeOracle {
            fail_text: true,
            ..Default::default()
        });
        let (status, body) = get_json(app(Arc::new(FakeEdgar::default()), oracle), "/analyze/10k/AAPL/business").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to generate summary");
    }

    #[tokio::test]
    async fn test_audio_round_trip_and_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = AudioStore::new(dir.path()).unwrap();
        let pipeline = pipeline(Arc::new(FakeEdgar::default()), Arc::new(FakeOracle::default()))
            .with_audio(store);
        let app = router(AppState {
            pipeline: Arc::new(pipeline),
        });

        let (status, body) = get_json(app.clone(), "/analyze/10k/AAPL/business").await;
        assert_eq!(status, StatusCode::OK);
        let filename = body["audio_file"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(Request::builder().uri(format!("/audio/{}", filename)).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "audio/wav");
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..4], b"RIFF");

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!("/audio/{}", filename))
                    .header(header::RANGE, "bytes=0-3")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "audio/wav");
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"RIFF");

        let (status, body) = get_json(app.clone(), "/audio/AAPL_business_missing.wav").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Audio file not found");

        let (status, _) = get_json(app, "/audio/..%2Fsecret.wav").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_landing_page_and_health() {
        let app = app(Arc::new(FakeEdgar::default()), Arc::new(FakeOracle::default()));
        let response = app
            .clone()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&bytes).contains("/analyze/10k/"));

        let (status, body) = get_json(app, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }
}
