use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    pub const fn ordered() -> [Self; 4] {
        [Self::Spring, Self::Summer, Self::Fall, Self::Winter]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Spring => "Spring",
            Self::Summer => "Summer",
            Self::Fall => "Fall",
            Self::Winter => "Winter",
        }
    }
}

/// Market conditions for one region as reported by a market data provider.
///
/// Rates and changes are decimal fractions (`0.05` is five percent).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    #[serde(default)]
    pub region: String,
    pub average_rent: f64,
    pub vacancy_rate: f64,
    pub yearly_change: f64,
    #[serde(default)]
    pub seasonal_changes: BTreeMap<Season, f64>,
    #[serde(default)]
    pub source: String,
}

/// Similar rental listing used as a price reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparable {
    pub rent: f64,
    #[serde(alias = "bedrooms")]
    pub bedroom_count: u32,
    pub address: String,
}

/// Recorded building code or maintenance deficiency tied to an address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    #[serde(rename = "type", alias = "category")]
    pub category: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    MarketData,
    NoData,
}

impl DataSource {
    pub const fn label(self) -> &'static str {
        match self {
            Self::MarketData => "Local Market Data",
            Self::NoData => "No Market Data Available",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RentScore {
    pub score: f64,
    pub source: DataSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceMetrics {
    pub price_per_bedroom: f64,
    pub market_percentile: f64,
    pub price_volatility: f64,
    pub value_score: f64,
}

impl PriceMetrics {
    pub(crate) const NEUTRAL: Self = Self {
        price_per_bedroom: 0.0,
        market_percentile: 50.0,
        price_volatility: 0.0,
        value_score: 50.0,
    };
}

/// Derived pricing indicators for one analysis. Scores are on a 0-100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub rent_score: f64,
    pub value_score: f64,
    pub price_per_bedroom: f64,
    pub market_percentile: f64,
    pub price_volatility: f64,
}

impl ScoreResult {
    pub fn from_parts(rent_score: RentScore, metrics: PriceMetrics) -> Self {
        Self {
            rent_score: rent_score.score,
            value_score: metrics.value_score,
            price_per_bedroom: metrics.price_per_bedroom,
            market_percentile: metrics.market_percentile,
            price_volatility: metrics.price_volatility,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Achievement {
    MarketResearcher,
    EvidenceCollector,
    DataAnalyst,
    PowerNegotiator,
}

impl Achievement {
    pub const fn label(self) -> &'static str {
        match self {
            Self::MarketResearcher => "Market Researcher",
            Self::EvidenceCollector => "Evidence Collector",
            Self::DataAnalyst => "Data Analyst",
            Self::PowerNegotiator => "Power Negotiator",
        }
    }
}

impl fmt::Display for Achievement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Points contributed by each negotiation factor, rounded to one decimal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub market_alignment: f64,
    pub evidence_strength: f64,
    pub negotiation_power: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NegotiationResult {
    pub score: f64,
    pub level: u32,
    pub progress_to_next_level: f64,
    pub level_title: &'static str,
    pub achievements: Vec<Achievement>,
    pub tips: Vec<String>,
    pub components: ScoreBreakdown,
}

/// Request-scoped identity of the renter running an analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub name: String,
    pub email: String,
}

impl UserIdentity {
    pub fn new(name: impl Into<String>, email: impl AsRef<str>) -> Self {
        Self {
            name: name.into().trim().to_string(),
            email: normalize_email(email.as_ref()),
        }
    }
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SearchId(pub String);

/// One completed analysis, persisted by the search repository. Never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRecord {
    pub id: SearchId,
    pub user: UserIdentity,
    pub address: String,
    pub zip_code: String,
    pub current_rent: f64,
    pub market_rate: f64,
    pub rent_score: f64,
    pub created_at: DateTime<Utc>,
}
