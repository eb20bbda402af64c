use super::domain::{Comparable, MarketSnapshot, Violation};

pub const STANDARD_TENANT_RIGHTS: [&str; 5] = [
    "Right to a habitable dwelling",
    "Right to repairs and maintenance",
    "Right to privacy",
    "Protection against retaliation",
    "Security deposit protection",
];

/// Resolves a ZIP code to the market conditions of its region.
pub trait MarketDataProvider: Send + Sync {
    fn snapshot(&self, zip_code: &str) -> Result<Option<MarketSnapshot>, ProviderError>;
}

/// Supplies comparable listings near a reference rent.
pub trait ComparablesProvider: Send + Sync {
    fn comparables(
        &self,
        zip_code: &str,
        current_rent: f64,
    ) -> Result<Vec<Comparable>, ProviderError>;
}

/// Looks up recorded building violations. An empty list means "none on record".
pub trait ViolationsProvider: Send + Sync {
    fn violations(&self, address: &str) -> Result<Vec<Violation>, ProviderError>;

    fn tenant_rights(&self) -> Vec<String> {
        STANDARD_TENANT_RIGHTS
            .iter()
            .map(|right| right.to_string())
            .collect()
    }
}

/// Failure reported by an external data source.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("data source unavailable: {0}")]
    Unavailable(String),
    #[error("malformed data: {0}")]
    Malformed(String),
}
