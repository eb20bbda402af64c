use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::workflows::market_data::StaticMarketData;
use crate::workflows::negotiation::{
    AnalysisRequest, Comparable, ComparablesProvider, MarketDataProvider, MarketSnapshot,
    ProviderError, RentAnalysisService, RepositoryError, SearchRecord, SearchRepository, Season,
    Violation, ViolationsProvider,
};

pub(super) const ZIP: &str = "10001";
pub(super) const ADDRESS: &str = "123 Main St";

pub(super) fn snapshot() -> MarketSnapshot {
    let seasonal_changes: BTreeMap<Season, f64> = Season::ordered()
        .into_iter()
        .zip([0.02, 0.03, -0.01, -0.02])
        .collect();

    MarketSnapshot {
        region: "New York, NY".to_string(),
        average_rent: 2800.0,
        vacancy_rate: 0.05,
        yearly_change: -0.02,
        seasonal_changes,
        source: "test".to_string(),
    }
}

pub(super) fn comparable(rent: f64, bedroom_count: u32) -> Comparable {
    Comparable {
        rent,
        bedroom_count,
        address: format!("{rent} Test Ave"),
    }
}

pub(super) fn comparables() -> Vec<Comparable> {
    vec![
        comparable(2700.0, 2),
        comparable(2900.0, 2),
        comparable(2750.0, 2),
    ]
}

pub(super) fn violation(category: &str, description: &str) -> Violation {
    Violation {
        category: category.to_string(),
        description: description.to_string(),
    }
}

pub(super) fn letter_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 15).expect("valid date")
}

pub(super) fn request() -> AnalysisRequest {
    AnalysisRequest {
        address: ADDRESS.to_string(),
        zip_code: ZIP.to_string(),
        current_rent: 3000.0,
        name: "Jordan Tenant".to_string(),
        email: "Renter@Example.com".to_string(),
        today: Some(letter_date()),
    }
}

pub(super) fn market() -> StaticMarketData {
    StaticMarketData::new().with_snapshot(ZIP, snapshot())
}

pub(super) type TestService =
    RentAnalysisService<StaticMarketData, FixedComparables, FixedViolations, MemoryRepository>;

pub(super) fn build_service() -> (TestService, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = RentAnalysisService::new(
        Arc::new(market()),
        Arc::new(FixedComparables(comparables())),
        Arc::new(FixedViolations(Vec::new())),
        repository.clone(),
    );
    (service, repository)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    records: Arc<Mutex<Vec<SearchRecord>>>,
}

impl MemoryRepository {
    pub(super) fn records(&self) -> Vec<SearchRecord> {
        self.records.lock().expect("repository mutex poisoned").clone()
    }
}

impl SearchRepository for MemoryRepository {
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

pub(super) struct UnavailableRepository;

impl SearchRepository for UnavailableRepository {
    fn insert(&self, _record: SearchRecord) -> Result<SearchRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn for_user(&self, _email: &str, _limit: usize) -> Result<Vec<SearchRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn count_for_user(&self, _email: &str) -> Result<usize, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) struct FixedComparables(pub(super) Vec<Comparable>);

impl ComparablesProvider for FixedComparables {
    fn comparables(
        &self,
        _zip_code: &str,
        _current_rent: f64,
    ) -> Result<Vec<Comparable>, ProviderError> {
        Ok(self.0.clone())
    }
}

pub(super) struct FixedViolations(pub(super) Vec<Violation>);

impl ViolationsProvider for FixedViolations {
    fn violations(&self, _address: &str) -> Result<Vec<Violation>, ProviderError> {
        Ok(self.0.clone())
    }
}

/// Every lookup fails, standing in for an outage of all three data sources.
pub(super) struct OfflineProvider;

impl MarketDataProvider for OfflineProvider {
    fn snapshot(&self, _zip_code: &str) -> Result<Option<MarketSnapshot>, ProviderError> {
        Err(ProviderError::Unavailable("market feed offline".to_string()))
    }
}

impl ComparablesProvider for OfflineProvider {
    fn comparables(
        &self,
        _zip_code: &str,
        _current_rent: f64,
    ) -> Result<Vec<Comparable>, ProviderError> {
        Err(ProviderError::Unavailable("listing feed offline".to_string()))
    }
}

impl ViolationsProvider for OfflineProvider {
    fn violations(&self, _address: &str) -> Result<Vec<Violation>, ProviderError> {
        Err(ProviderError::Malformed("unexpected payload".to_string()))
    }
}

pub(super) fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} ± {tolerance}, got {actual}"
    );
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 256 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
