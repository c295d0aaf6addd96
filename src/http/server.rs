//! HTTP server for the dashboard API and page

use super::handler::{
    chart_handler, companies_handler, create_session_handler, executives_handler,
    get_session_handler, overview_handler, reviews_handler, session_event_handler,
    status_handler, submit_review_handler, summary_handler, SharedState,
};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
    Router,
};
use rust_embed::RustEmbed;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

#[derive(RustEmbed)]
#[folder = "src/http/static/"]
struct Assets;

async fn static_handler() -> impl IntoResponse {
    match Assets::get("index.html") {
        Some(file) => Html(String::from_utf8_lossy(file.data.as_ref()).into_owned()).into_response(),
        None => (StatusCode::NOT_FOUND, "dashboard page missing").into_response(),
    }
}

/// All routes over `state`
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(static_handler))
        .route("/api/status", get(status_handler))
        .route("/api/companies", get(companies_handler))
        .route("/api/companies/:ticker/executives", get(executives_handler))
        .route("/api/companies/:ticker/chart/:executive", get(chart_handler))
        .route("/api/companies/:ticker/overview", get(overview_handler))
        .route(
            "/api/executives/:executive/reviews",
            get(reviews_handler).post(submit_review_handler),
        )
        .route("/api/executives/:executive/reviews/summary", get(summary_handler))
        .route("/api/sessions", post(create_session_handler))
        .route("/api/sessions/:id", get(get_session_handler))
        .route("/api/sessions/:id/events", post(session_event_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// HTTP server for the dashboard
pub struct HttpServer {
    state: SharedState,
}

impl HttpServer {
    pub fn new(state: SharedState) -> Self {
        Self { state }
    }

    /// Bind and serve until the process stops
    pub async fn start(&self) -> Result<(), Box<dyn std::error::Error>> {
        let addr = self.state.config.bind_address();
        let app = build_router(Arc::clone(&self.state));
        let listener = tokio::net::TcpListener::bind(&addr).await?;

        info!("Dashboard available at http://{}", addr);

        axum::serve(listener, app).await?;

        Ok(())
    }
}
