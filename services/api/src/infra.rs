use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use rent_leverage::config::MarketDataConfig;
use rent_leverage::error::AppError;
use rent_leverage::workflows::market_data::{
    ComparablesRegistry, MarketBandComparables, RegionDirectory, StaticMarketData,
    ViolationsRegistry, ZoriMarketData,
};
use rent_leverage::workflows::negotiation::{
    Comparable, ComparablesProvider, MarketDataProvider, MarketSnapshot, ProviderError,
    RentAnalysisService, RepositoryError, SearchRecord, SearchRepository,
};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type AnalysisService =
    RentAnalysisService<MarketSource, ComparablesSource, ViolationsRegistry, InMemorySearchRepository>;

#[derive(Default, Clone)]
pub(crate) struct InMemorySearchRepository {
    records: Arc<Mutex<Vec<SearchRecord>>>,
}

impl SearchRepository for InMemorySearchRepository {
    fn insert(&self, record: SearchRecord) -> Result<SearchRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.iter().any(|existing| existing.id == record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(record.clone());
        Ok(record)
    }

    fn for_user(&self, email: &str, limit: usize) -> Result<Vec<SearchRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .iter()
            .rev()
            .filter(|record| record.user.email == email)
            .take(limit)
            .cloned()
            .collect())
    }

    fn count_for_user(&self, email: &str) -> Result<usize, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .iter()
            .filter(|record| record.user.email == email)
            .count())
    }
}

/// Market data backing the running service.
pub(crate) enum MarketSource {
    Zori(ZoriMarketData),
    Sample(StaticMarketData),
}

impl MarketSource {
    pub(crate) fn label(&self) -> &'static str {
        match self {
            Self::Zori(_) => "zori",
            Self::Sample(_) => "sample",
        }
    }
}

impl MarketDataProvider for MarketSource {
    fn snapshot(&self, zip_code: &str) -> Result<Option<MarketSnapshot>, ProviderError> {
        match self {
            Self::Zori(data) => data.snapshot(zip_code),
            Self::Sample(data) => data.snapshot(zip_code),
        }
    }
}

pub(crate) enum ComparablesSource {
    Listings(ComparablesRegistry),
    MarketBand(MarketBandComparables<MarketSource>),
}

impl ComparablesSource {
    pub(crate) fn label(&self) -> &'static str {
        match self {
            Self::Listings(_) => "listings",
            Self::MarketBand(_) => "market_band",
        }
    }
}

impl ComparablesProvider for ComparablesSource {
    fn comparables(
        &self,
        zip_code: &str,
        current_rent: f64,
    ) -> Result<Vec<Comparable>, ProviderError> {
        match self {
            Self::Listings(registry) => registry.comparables(zip_code, current_rent),
            Self::MarketBand(band) => band.comparables(zip_code, current_rent),
        }
    }
}

/// Loads the configured data files, falling back to the bundled sample data
/// for anything left unset.
pub(crate) fn build_analysis_service(
    config: &MarketDataConfig,
    repository: Arc<InMemorySearchRepository>,
) -> Result<AnalysisService, AppError> {
    let market = Arc::new(match &config.zori_csv {
        Some(path) => MarketSource::Zori(ZoriMarketData::from_path(
            path,
            config.default_vacancy_rate,
            RegionDirectory::standard().with_fallback(config.fallback_region.clone()),
        )?),
        None => MarketSource::Sample(StaticMarketData::sample()),
    });

    let comparables = Arc::new(match &config.comparables_csv {
        Some(path) => ComparablesSource::Listings(ComparablesRegistry::from_path(
            path,
            config.comparable_tolerance,
        )?),
        None => ComparablesSource::MarketBand(MarketBandComparables::new(
            market.clone(),
            config.comparable_tolerance,
        )),
    });

    let violations = Arc::new(match &config.violations_json {
        Some(path) => ViolationsRegistry::from_path(path)?,
        None => ViolationsRegistry::empty(),
    });

    info!(
        market = market.label(),
        comparables = comparables.label(),
        violations_file = config.violations_json.is_some(),
        "market data loaded"
    );

    Ok(RentAnalysisService::new(
        market,
        comparables,
        violations,
        repository,
    ))
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
