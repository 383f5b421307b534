//! HTTP server implementation for the API

use anyhow::Result;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use super::{
    handlers,
    models::{AnalyzeQuery, ErrorResponse, PlanQuery},
};
use crate::config::Config;
use crate::error::AnalyzerError;
use crate::playlist::PlaylistAggregator;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub aggregator: PlaylistAggregator,
    pub config: Arc<Config>,
}

/// Build the router with all routes and middleware
pub fn build_router(app_state: AppState) -> Router {
    // The browser extension calls in from its own origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/health", get(health_handler))
        .route("/api/analyze", get(analyze_handler))
        .route("/api/plan", get(plan_handler))
        .fallback(not_found_handler)
        .with_state(app_state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
}

/// Configure and start the HTTP server
pub async fn start_http_server(config: Arc<Config>, aggregator: PlaylistAggregator) -> Result<()> {
    let address = format!("{}:{}", config.server.host, config.server.port);
    info!("🚀 Starting HTTP server on {}", address);

    let app = build_router(AppState { aggregator, config });

    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("🌐 API server listening on http://{}", address);

    axum::serve(listener, app).await?;

    Ok(())
}

fn error_response(error: AnalyzerError) -> Response {
    let status = if error.is_invalid_input() {
        StatusCode::BAD_REQUEST
    } else {
        warn!("Request failed: {}", error);
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(ErrorResponse::new(error.to_string()))).into_response()
}

/// Malformed query strings get the same `{error}` body as other bad input
fn query_or_error<T>(
    query: std::result::Result<Query<T>, QueryRejection>,
) -> std::result::Result<T, Response> {
    query
        .map(|Query(inner)| inner)
        .map_err(|rejection| error_response(AnalyzerError::invalid_input(rejection.body_text())))
}

/// Health check handler
async fn health_handler() -> impl IntoResponse {
    match handlers::health_check().await {
        Ok(data) => (StatusCode::OK, Json(data)).into_response(),
        Err(e) => error_response(e),
    }
}

/// Playlist analysis handler
async fn analyze_handler(
    State(state): State<AppState>,
    query: std::result::Result<Query<AnalyzeQuery>, QueryRejection>,
) -> impl IntoResponse {
    let query = match query_or_error(query) {
        Ok(query) => query,
        Err(response) => return response,
    };
    match handlers::analyze(&state.aggregator, &query).await {
        Ok(data) => (StatusCode::OK, Json(data)).into_response(),
        Err(e) => error_response(e),
    }
}

/// Study plan handler
async fn plan_handler(
    State(state): State<AppState>,
    query: std::result::Result<Query<PlanQuery>, QueryRejection>,
) -> impl IntoResponse {
    let query = match query_or_error(query) {
        Ok(query) => query,
        Err(response) => return response,
    };
    match handlers::plan(&query, &state.config.schedule).await {
        Ok(data) => (StatusCode::OK, Json(data)).into_response(),
        Err(e) => error_response(e),
    }
}

/// 404 response
async fn not_found_handler() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(ErrorResponse::new("Not Found")))
}
