//! Market data sources behind the negotiation workflow's provider traits.

mod comparables;
mod normalizer;
mod parser;
mod regions;
mod static_table;
mod violations;

pub use comparables::{ComparablesRegistry, MarketBandComparables};
pub use regions::{RegionDirectory, DEFAULT_FALLBACK_REGION};
pub use static_table::StaticMarketData;
pub use violations::ViolationsRegistry;

use crate::workflows::negotiation::{MarketDataProvider, MarketSnapshot, ProviderError, Season};
use chrono::Datelike;
use normalizer::normalize_key;
use parser::ZoriSeries;
use std::collections::{BTreeMap, HashMap};
use std::io::Read;
use std::path::Path;
use tracing::debug;

pub const ZORI_SOURCE: &str = "Zillow Observed Rent Index";

#[derive(Debug)]
pub enum MarketDataImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Json(serde_json::Error),
    MissingColumn(&'static str),
}

impl std::fmt::Display for MarketDataImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarketDataImportError::Io(err) => write!(f, "failed to read market data: {}", err),
            MarketDataImportError::Csv(err) => write!(f, "invalid market data CSV: {}", err),
            MarketDataImportError::Json(err) => write!(f, "invalid violations JSON: {}", err),
            MarketDataImportError::MissingColumn(column) => {
                write!(f, "market data CSV is missing the '{}' column", column)
            }
        }
    }
}

impl std::error::Error for MarketDataImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MarketDataImportError::Io(err) => Some(err),
            MarketDataImportError::Csv(err) => Some(err),
            MarketDataImportError::Json(err) => Some(err),
            MarketDataImportError::MissingColumn(_) => None,
        }
    }
}

impl From<std::io::Error> for MarketDataImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for MarketDataImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<serde_json::Error> for MarketDataImportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

/// Metro-level market snapshots derived from a Zillow Observed Rent Index export.
#[derive(Debug, Clone)]
pub struct ZoriMarketData {
    snapshots: HashMap<String, MarketSnapshot>,
    regions: RegionDirectory,
}

impl ZoriMarketData {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        vacancy_rate: f64,
        regions: RegionDirectory,
    ) -> Result<Self, MarketDataImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, vacancy_rate, regions)
    }

    /// The export carries no vacancy figures, so every snapshot is stamped
    /// with `vacancy_rate`.
    pub fn from_reader<R: Read>(
        reader: R,
        vacancy_rate: f64,
        regions: RegionDirectory,
    ) -> Result<Self, MarketDataImportError> {
        let snapshots = parser::parse_series(reader)?
            .into_iter()
            .filter_map(|series| build_snapshot(series, vacancy_rate))
            .map(|snapshot| (normalize_key(&snapshot.region), snapshot))
            .collect();

        Ok(Self { snapshots, regions })
    }

    pub fn region(&self, name: &str) -> Option<&MarketSnapshot> {
        self.snapshots.get(&normalize_key(name))
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

impl MarketDataProvider for ZoriMarketData {
    fn snapshot(&self, zip_code: &str) -> Result<Option<MarketSnapshot>, ProviderError> {
        if let Some(snapshot) = self
            .regions
            .metro_for(zip_code)
            .and_then(|metro| self.region(metro))
        {
            return Ok(Some(snapshot.clone()));
        }

        let fallback = self.regions.fallback().and_then(|metro| self.region(metro));
        if let Some(snapshot) = fallback {
            debug!(zip_code, region = %snapshot.region, "zip code unmapped; using fallback region");
        }
        Ok(fallback.cloned())
    }
}

fn build_snapshot(series: ZoriSeries, vacancy_rate: f64) -> Option<MarketSnapshot> {
    let (latest_date, latest_rent) = series
        .observations
        .iter()
        .next_back()
        .map(|(date, rent)| (*date, *rent))?;

    let monthly: BTreeMap<(i32, u32), f64> = series
        .observations
        .iter()
        .map(|(date, rent)| ((date.year(), date.month()), *rent))
        .collect();

    let yearly_change = monthly
        .get(&(latest_date.year() - 1, latest_date.month()))
        .map(|year_ago| (latest_rent - year_ago) / year_ago)
        .unwrap_or(0.0);

    Some(MarketSnapshot {
        region: series.region,
        average_rent: latest_rent,
        vacancy_rate,
        yearly_change,
        seasonal_changes: seasonal_changes(&monthly),
        source: ZORI_SOURCE.to_string(),
    })
}

/// Quarter-over-quarter changes for the most recent year with January, April,
/// July and October readings plus the following January.
fn seasonal_changes(monthly: &BTreeMap<(i32, u32), f64>) -> BTreeMap<Season, f64> {
    let latest_year = monthly.keys().next_back().map(|(year, _)| *year);
    let earliest_year = monthly.keys().next().map(|(year, _)| *year);
    let (Some(latest_year), Some(earliest_year)) = (latest_year, earliest_year) else {
        return BTreeMap::new();
    };

    for year in (earliest_year..latest_year).rev() {
        let readings = [(year, 1), (year, 4), (year, 7), (year, 10), (year + 1, 1)]
            .map(|key| monthly.get(&key).copied());
        if let [Some(jan), Some(apr), Some(jul), Some(oct), Some(next_jan)] = readings {
            return BTreeMap::from([
                (Season::Spring, (apr - jan) / jan),
                (Season::Summer, (jul - apr) / apr),
                (Season::Fall, (oct - jul) / jul),
                (Season::Winter, (next_jan - oct) / oct),
            ]);
        }
    }

    BTreeMap::new()
}
