//! HTTP handlers for the dashboard API

use crate::config::DashboardConfig;
use crate::market::{CompanyOverview, MarketDataSource, StockSummary};
use crate::org::{build_chart, CompanyDirectory, ExecutiveStore};
use crate::review::{
    summarize, ReviewDraft, ReviewPage, ReviewStore, ReviewStoreError, SubmissionError,
};
use crate::session::{DashboardEvent, SessionContext};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Duration, Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

/// Everything the handlers share
pub struct AppState {
    pub config: DashboardConfig,
    pub companies: CompanyDirectory,
    pub executives: ExecutiveStore,
    pub reviews: Arc<dyn ReviewStore>,
    pub market: Arc<dyn MarketDataSource>,
    pub sessions: RwLock<HashMap<Uuid, SessionContext>>,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(
        config: DashboardConfig,
        reviews: Arc<dyn ReviewStore>,
        market: Arc<dyn MarketDataSource>,
    ) -> Self {
        let companies = CompanyDirectory::load(&config.companies_file);
        let executives = ExecutiveStore::new(&config.data_dir);
        Self {
            config,
            companies,
            executives,
            reviews,
            market,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_companies(mut self, companies: CompanyDirectory) -> Self {
        self.companies = companies;
        self
    }
}

/// HTTP errors
#[derive(Error, Debug)]
pub enum HttpError {
    /// Nothing to show for the request
    #[error("{0}")]
    NotFound(String),

    /// Submission rejected; nothing was persisted
    #[error(transparent)]
    Rejected(#[from] SubmissionError),

    /// Review file could not be written
    #[error(transparent)]
    Storage(#[from] ReviewStoreError),
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = match &self {
            HttpError::NotFound(_) => StatusCode::NOT_FOUND,
            HttpError::Rejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
            HttpError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub type HttpResult<T> = Result<T, HttpError>;

const NO_EXECUTIVES: &str = "Executive information not available for this company.";

/// Handler for system status
pub async fn status_handler(State(state): State<SharedState>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "version": crate::VERSION,
        "companies": state.companies.len(),
        "reviewed_executives": state.reviews.load().len(),
    }))
}

pub async fn companies_handler(State(state): State<SharedState>) -> impl IntoResponse {
    Json(state.companies.options())
}

pub async fn executives_handler(
    State(state): State<SharedState>,
    Path(ticker): Path<String>,
) -> HttpResult<impl IntoResponse> {
    let executives = state
        .executives
        .load(&ticker)
        .ok_or_else(|| HttpError::NotFound(NO_EXECUTIVES.to_string()))?;

    let listing: Vec<serde_json::Value> = executives
        .iter()
        .map(|(name, record)| {
            json!({
                "name": name,
                "display": format!("{} - {}", name, record.title),
                "title": record.title,
                "role_tag": record.role_tag,
                "bio": record.bio,
                "reports_to": record.reports_to,
                "history": record.history.iter().map(|h| h.describe()).collect::<Vec<_>>(),
            })
        })
        .collect();

    Ok(Json(listing))
}

pub async fn chart_handler(
    State(state): State<SharedState>,
    Path((ticker, executive)): Path<(String, String)>,
) -> HttpResult<impl IntoResponse> {
    let executives = state
        .executives
        .load(&ticker)
        .ok_or_else(|| HttpError::NotFound(NO_EXECUTIVES.to_string()))?;

    let chart = build_chart(&executives, &executive)
        .map_err(|e| HttpError::NotFound(e.to_string()))?;
    Ok(Json(chart))
}

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

pub async fn overview_handler(
    State(state): State<SharedState>,
    Path(ticker): Path<String>,
    Query(range): Query<RangeQuery>,
) -> impl IntoResponse {
    let today = Local::now().date_naive();
    let end = range.end.unwrap_or(today);
    let start = range.start.unwrap_or(end - Duration::days(365));

    let executive_count = state.executives.load(&ticker).map(|e| e.len());
    let metrics = state
        .market
        .ticker_info(&ticker)
        .map(|info| CompanyOverview::derive(&info, executive_count, today))
        .unwrap_or_default();
    let history = state.market.history(&ticker, start, end);
    let stock = StockSummary::from_bars(&history);

    if stock.is_none() {
        info!("No stock data for {} between {} and {}", ticker, start, end);
    }

    Json(json!({
        "ticker": ticker,
        "name": state.companies.name(&ticker),
        "metrics": metrics,
        "stock": stock,
        "history": history,
    }))
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

pub async fn reviews_handler(
    State(state): State<SharedState>,
    Path(executive): Path<String>,
    Query(query): Query<PageQuery>,
) -> impl IntoResponse {
    let reviews = state.reviews.reviews_for(&executive);
    let page_size = query.page_size.unwrap_or(state.config.page_size);
    Json(ReviewPage::new(&reviews, query.page.unwrap_or(1), page_size))
}

pub async fn summary_handler(
    State(state): State<SharedState>,
    Path(executive): Path<String>,
) -> impl IntoResponse {
    let reviews = state.reviews.reviews_for(&executive);
    Json(summarize(&reviews))
}

#[derive(Debug, Deserialize)]
pub struct SessionQuery {
    pub session: Option<Uuid>,
}

pub async fn submit_review_handler(
    State(state): State<SharedState>,
    Path(executive): Path<String>,
    Query(query): Query<SessionQuery>,
    Json(draft): Json<ReviewDraft>,
) -> HttpResult<impl IntoResponse> {
    let review = draft.into_review(Local::now().naive_local()).map_err(|e| {
        warn!("Rejected review for {}: {}", executive, e);
        e
    })?;

    state.reviews.append(&executive, review.clone())?;
    info!("Stored review for {}", executive);

    if let Some(id) = query.session {
        if let Some(ctx) = state.sessions.write().await.get_mut(&id) {
            ctx.apply(DashboardEvent::ReviewSubmitted { executive });
        }
    }

    Ok((StatusCode::CREATED, Json(review)))
}

pub async fn create_session_handler(State(state): State<SharedState>) -> impl IntoResponse {
    let id = Uuid::new_v4();
    let ctx = SessionContext::new();
    state.sessions.write().await.insert(id, ctx.clone());
    (StatusCode::CREATED, Json(json!({ "id": id, "context": ctx })))
}

pub async fn get_session_handler(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> HttpResult<impl IntoResponse> {
    let sessions = state.sessions.read().await;
    let ctx = sessions
        .get(&id)
        .ok_or_else(|| HttpError::NotFound(format!("Session {} not found", id)))?;
    Ok(Json(json!({ "id": id, "context": ctx, "notice": ctx.notice() })))
}

pub async fn session_event_handler(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(event): Json<DashboardEvent>,
) -> HttpResult<impl IntoResponse> {
    let mut sessions = state.sessions.write().await;
    let ctx = sessions
        .get_mut(&id)
        .ok_or_else(|| HttpError::NotFound(format!("Session {} not found", id)))?;
    ctx.apply(event);
    Ok(Json(json!({ "id": id, "context": ctx, "notice": ctx.notice() })))
}
