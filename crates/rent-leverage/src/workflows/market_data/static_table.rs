use crate::workflows::negotiation::{MarketDataProvider, MarketSnapshot, ProviderError, Season};
use std::collections::{BTreeMap, HashMap};

pub const SAMPLE_SOURCE: &str = "Sample Market Table";

/// In-memory market table keyed by exact ZIP code.
#[derive(Debug, Clone, Default)]
pub struct StaticMarketData {
    by_zip: HashMap<String, MarketSnapshot>,
}

impl StaticMarketData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Three Manhattan ZIP codes with representative figures.
    pub fn sample() -> Self {
        Self::new()
            .with_snapshot("10001", sample_snapshot("10001", 3000.0, 0.05, 0.03, [0.02, 0.03, -0.01, -0.02]))
            .with_snapshot("10002", sample_snapshot("10002", 2800.0, 0.04, 0.02, [0.01, 0.02, -0.01, -0.01]))
            .with_snapshot("10003", sample_snapshot("10003", 3200.0, 0.06, 0.04, [0.02, 0.03, -0.02, -0.01]))
    }

    pub fn with_snapshot(mut self, zip_code: impl Into<String>, snapshot: MarketSnapshot) -> Self {
        self.insert(zip_code, snapshot);
        self
    }

    pub fn insert(&mut self, zip_code: impl Into<String>, snapshot: MarketSnapshot) {
        self.by_zip.insert(zip_code.into().trim().to_string(), snapshot);
    }
}

impl MarketDataProvider for StaticMarketData {
    fn snapshot(&self, zip_code: &str) -> Result<Option<MarketSnapshot>, ProviderError> {
        Ok(self.by_zip.get(zip_code.trim()).cloned())
    }
}

fn sample_snapshot(
    zip_code: &str,
    average_rent: f64,
    vacancy_rate: f64,
    yearly_change: f64,
    seasonal: [f64; 4],
) -> MarketSnapshot {
    let seasonal_changes: BTreeMap<Season, f64> =
        Season::ordered().into_iter().zip(seasonal).collect();

    MarketSnapshot {
        region: zip_code.to_string(),
        average_rent,
        vacancy_rate,
        yearly_change,
        seasonal_changes,
        source: SAMPLE_SOURCE.to_string(),
    }
}
