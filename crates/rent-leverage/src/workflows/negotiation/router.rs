use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;

use super::domain::{Comparable, Violation};
use super::history::SearchRepository;
use super::letter::{compose, email_link, LetterRequest};
use super::providers::{ComparablesProvider, MarketDataProvider, ViolationsProvider};
use super::service::{AnalysisRequest, AnalysisServiceError, RentAnalysisService};
use crate::error::AppError;

pub(crate) const DEFAULT_HISTORY_LIMIT: usize = 25;

/// Standalone letter request; the composer needs no provider lookups.
#[derive(Debug, Clone, Deserialize)]
pub struct LetterPayload {
    pub name: String,
    pub address: String,
    pub current_rent: f64,
    pub market_rate: f64,
    #[serde(default)]
    pub violations: Vec<Violation>,
    #[serde(default)]
    pub comparables: Vec<Comparable>,
    #[serde(default)]
    pub today: Option<NaiveDate>,
}

/// Router builder exposing the analysis, history and letter endpoints.
pub fn analysis_router<M, C, V, R>(service: Arc<RentAnalysisService<M, C, V, R>>) -> Router
where
    M: MarketDataProvider + 'static,
    C: ComparablesProvider + 'static,
    V: ViolationsProvider + 'static,
    R: SearchRepository + 'static,
{
    Router::new()
        .route("/api/v1/rent/analysis", post(analyze_handler::<M, C, V, R>))
        .route(
            "/api/v1/rent/searches/:email",
            get(history_handler::<M, C, V, R>),
        )
        .route("/api/v1/rent/letter", post(letter_handler))
        .with_state(service)
}

pub(crate) async fn analyze_handler<M, C, V, R>(
    State(service): State<Arc<RentAnalysisService<M, C, V, R>>>,
    axum::Json(request): axum::Json<AnalysisRequest>,
) -> Response
where
    M: MarketDataProvider + 'static,
    C: ComparablesProvider + 'static,
    V: ViolationsProvider + 'static,
    R: SearchRepository + 'static,
{
    match service.analyze(request) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn history_handler<M, C, V, R>(
    State(service): State<Arc<RentAnalysisService<M, C, V, R>>>,
    Path(email): Path<String>,
) -> Response
where
    M: MarketDataProvider + 'static,
    C: ComparablesProvider + 'static,
    V: ViolationsProvider + 'static,
    R: SearchRepository + 'static,
{
    match service.history(&email, DEFAULT_HISTORY_LIMIT) {
        Ok(history) => (StatusCode::OK, axum::Json(history)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn letter_handler(axum::Json(payload): axum::Json<LetterPayload>) -> Response {
    let dated = payload.today.unwrap_or_else(|| Local::now().date_naive());
    let letter = compose(
        &LetterRequest {
            name: &payload.name,
            address: &payload.address,
            current_rent: payload.current_rent,
            market_rate: payload.market_rate,
            violations: &payload.violations,
            comparables: &payload.comparables,
        },
        dated,
    );

    let email_link = email_link(&letter);

    (
        StatusCode::OK,
        axum::Json(json!({ "letter": letter, "email_link": email_link })),
    )
        .into_response()
}

fn error_response(err: AnalysisServiceError) -> Response {
    AppError::from(err).into_response()
}
