//! Request Entry (spec §6.1): accepts a URL from the query string or a JSON
//! body, dispatches to the pipeline, and returns the tagged success/error
//! JSON document.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::app_state::AppState;
use crate::core::types::{ErrorDoc, ErrorType, ScanOutcome};
use crate::pipeline;

#[derive(Debug, Deserialize, Default)]
pub struct ScanQuery {
    #[serde(default)]
    pub url: Option<String>,
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|v| !v.trim().is_empty())
}

async fn scan_handler(
    State(state): State<AppState>,
    Query(query): Query<ScanQuery>,
    body: Option<Json<crate::core::types::ScanRequestBody>>,
) -> impl IntoResponse {
    let body = body.map(|Json(b)| b).unwrap_or_default();

    let raw_url = match non_empty(query.url).or_else(|| non_empty(body.url)) {
        Some(url) => url,
        None => {
            let doc = ErrorDoc::new(
                ErrorType::InvalidUrl,
                "no 'url' provided in query string or request body".to_string(),
            );
            return (StatusCode::BAD_REQUEST, Json(ScanOutcome::Error(doc)));
        }
    };

    match pipeline::run_scan(&state, &raw_url, body.baseline).await {
        Ok(report) => (StatusCode::OK, Json(ScanOutcome::Success(report))),
        Err(err) => {
            tracing::warn!(url = %raw_url, error = %err, "scan returned an error document");
            (StatusCode::BAD_REQUEST, Json(ScanOutcome::Error(err.into())))
        }
    }
}

async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "shadowscreen",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/scan", get(scan_handler).post(scan_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
