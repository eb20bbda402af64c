use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::domain::{
    normalize_email, Comparable, MarketSnapshot, NegotiationResult, RentScore, ScoreResult,
    SearchId, SearchRecord, UserIdentity, Violation,
};
use super::history::{RepositoryError, SearchHistory, SearchRepository};
use super::insights::{market_insights, MarketInsights};
use super::letter::{compose, email_link, LetterRequest};
use super::providers::{ComparablesProvider, MarketDataProvider, ViolationsProvider};
use super::scoring::{negotiation_power, negotiation_score, price_metrics, rent_score};
use super::views::{chart_series, ChartSeries};

/// Renter input for one analysis run.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisRequest {
    pub address: String,
    pub zip_code: String,
    pub current_rent: f64,
    pub name: String,
    pub email: String,
    /// Letter date override; defaults to the local date.
    #[serde(default)]
    pub today: Option<NaiveDate>,
}

/// Everything a presentation layer shows after an analysis.
#[derive(Debug, Clone, Serialize)]
pub struct RentAnalysisReport {
    pub user: UserIdentity,
    pub address: String,
    pub zip_code: String,
    pub current_rent: f64,
    pub market_rate: f64,
    pub rent_score: RentScore,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market: Option<MarketSnapshot>,
    pub scores: ScoreResult,
    pub negotiation_power: f64,
    pub negotiation: NegotiationResult,
    pub insights: MarketInsights,
    pub charts: ChartSeries,
    pub comparables: Vec<Comparable>,
    pub violations: Vec<Violation>,
    pub tenant_rights: Vec<String>,
    pub letter: String,
    /// `mailto:` link pre-filled with the letter.
    pub email_link: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_id: Option<SearchId>,
}

/// Service composing the data providers, scoring engine, letter composer and search history.
pub struct RentAnalysisService<M, C, V, R> {
    market: Arc<M>,
    comparables: Arc<C>,
    violations: Arc<V>,
    repository: Arc<R>,
}

static SEARCH_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_search_id() -> SearchId {
    let id = SEARCH_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SearchId(format!("search-{id:06}"))
}

impl<M, C, V, R> RentAnalysisService<M, C, V, R>
where
    M: MarketDataProvider + 'static,
    C: ComparablesProvider + 'static,
    V: ViolationsProvider + 'static,
    R: SearchRepository + 'static,
{
    pub fn new(market: Arc<M>, comparables: Arc<C>, violations: Arc<V>, repository: Arc<R>) -> Self {
        Self {
            market,
            comparables,
            violations,
            repository,
        }
    }

    /// Run the full analysis and record it in the search history.
    ///
    /// Only invalid input fails. Provider and repository outages degrade to
    /// "no data" and an unsaved search respectively.
    pub fn analyze(
        &self,
        request: AnalysisRequest,
    ) -> Result<RentAnalysisReport, AnalysisServiceError> {
        validate(&request)?;

        let user = UserIdentity::new(request.name.as_str(), &request.email);
        let address = request.address.trim().to_string();
        let zip_code = request.zip_code.trim().to_string();
        let current_rent = request.current_rent;

        let market = self.market.snapshot(&zip_code).unwrap_or_else(|err| {
            warn!(%err, zip_code = %zip_code, "market data unavailable; scoring without it");
            None
        });
        let comparables = self
            .comparables
            .comparables(&zip_code, current_rent)
            .unwrap_or_else(|err| {
                warn!(%err, zip_code = %zip_code, "comparables unavailable");
                Vec::new()
            });
        let violations = self.violations.violations(&address).unwrap_or_else(|err| {
            warn!(%err, address = %address, "violation lookup unavailable");
            Vec::new()
        });

        let rent = rent_score(current_rent, market.as_ref());
        let market_rate = market
            .as_ref()
            .map(|snapshot| snapshot.average_rent)
            .unwrap_or(0.0);
        let scores = ScoreResult::from_parts(
            rent,
            price_metrics(current_rent, market.as_ref(), &comparables),
        );
        let power = negotiation_power(market.as_ref(), &violations);
        let negotiation =
            negotiation_score(current_rent, market_rate, power, &violations, &comparables);
        let insights = market_insights(current_rent, market.as_ref(), power, comparables.len());
        let charts = chart_series(current_rent, market_rate, market.as_ref());

        let dated = request.today.unwrap_or_else(|| Local::now().date_naive());
        let letter = compose(
            &LetterRequest {
                name: &user.name,
                address: &address,
                current_rent,
                market_rate,
                violations: &violations,
                comparables: &comparables,
            },
            dated,
        );
        let email_link = email_link(&letter);

        let record = SearchRecord {
            id: next_search_id(),
            user: user.clone(),
            address: address.clone(),
            zip_code: zip_code.clone(),
            current_rent,
            market_rate,
            rent_score: rent.score,
            created_at: Utc::now(),
        };
        let search_id = match self.repository.insert(record) {
            Ok(stored) => Some(stored.id),
            Err(err) => {
                warn!(%err, "unable to save search; continuing with analysis");
                None
            }
        };

        info!(
            zip_code = %zip_code,
            rent_score = rent.score,
            negotiation_score = negotiation.score,
            level = negotiation.level,
            "rent analysis completed"
        );

        Ok(RentAnalysisReport {
            user,
            address,
            zip_code,
            current_rent,
            market_rate,
            rent_score: rent,
            market,
            scores,
            negotiation_power: power,
            negotiation,
            insights,
            charts,
            comparables,
            violations,
            tenant_rights: self.violations.tenant_rights(),
            letter,
            email_link,
            search_id,
        })
    }

    /// Past searches for a renter, newest first.
    pub fn history(&self, email: &str, limit: usize) -> Result<SearchHistory, AnalysisServiceError> {
        let email = normalize_email(email);
        if email.is_empty() {
            return Err(AnalysisServiceError::Validation {
                fields: vec!["email"],
            });
        }

        let total_searches = self.repository.count_for_user(&email)?;
        let searches = self.repository.for_user(&email, limit)?;

        Ok(SearchHistory {
            email,
            total_searches,
            searches,
        })
    }
}

fn validate(request: &AnalysisRequest) -> Result<(), AnalysisServiceError> {
    let mut fields = Vec::new();
    if request.address.trim().is_empty() {
        fields.push("address");
    }
    if request.zip_code.trim().is_empty() {
        fields.push("zip_code");
    }
    if !request.current_rent.is_finite() || request.current_rent <= 0.0 {
        fields.push("current_rent");
    }
    if request.name.trim().is_empty() {
        fields.push("name");
    }
    if !request.email.contains('@') || request.email.trim().len() < 3 {
        fields.push("email");
    }

    if fields.is_empty() {
        Ok(())
    } else {
        Err(AnalysisServiceError::Validation { fields })
    }
}

/// Error raised by the analysis service.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisServiceError {
    #[error("missing or invalid fields: {}", fields.join(", "))]
    Validation { fields: Vec<&'static str> },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
