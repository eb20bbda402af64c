//! Rent negotiation workflow: market scoring, negotiation leverage, letters,
//! and the service that strings them together for one renter request.

pub mod domain;
pub mod history;
mod insights;
pub mod letter;
pub mod providers;
pub mod router;
pub mod scoring;
pub mod service;
mod views;

#[cfg(test)]
mod tests;

pub use domain::{
    Achievement, Comparable, DataSource, MarketSnapshot, NegotiationResult, PriceMetrics,
    RentScore, ScoreBreakdown, ScoreResult, SearchId, SearchRecord, Season, UserIdentity,
    Violation,
};
pub use history::{RepositoryError, SearchHistory, SearchRepository};
pub use insights::{LeverageLevel, MarketInsights, MarketPosition, PriceTrend};
pub use letter::{compose, compose_today, email_link, LetterRequest};
pub use providers::{
    ComparablesProvider, MarketDataProvider, ProviderError, ViolationsProvider,
    STANDARD_TENANT_RIGHTS,
};
pub use router::{analysis_router, LetterPayload};
pub use service::{AnalysisRequest, AnalysisServiceError, RentAnalysisReport, RentAnalysisService};
pub use views::{ChartBar, ChartSeries, SeasonalPoint};
