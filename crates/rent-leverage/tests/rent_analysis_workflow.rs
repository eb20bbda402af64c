use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use rent_leverage::workflows::market_data::{
    ComparablesRegistry, MarketBandComparables, RegionDirectory, ViolationsRegistry,
    ZoriMarketData,
};
use rent_leverage::workflows::negotiation::{
    Achievement, AnalysisRequest, LeverageLevel, MarketPosition, RentAnalysisService,
    RepositoryError, SearchRecord, SearchRepository,
};

#[derive(Default)]
struct MemoryRepository {
    records: Mutex<Vec<SearchRecord>>,
}

impl SearchRepository for MemoryRepository {
    fn insert(&self, record: SearchRecord) -> Result<SearchRecord, RepositoryError> {
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .push(record.clone());
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

fn zori() -> Arc<ZoriMarketData> {
    Arc::new(
        ZoriMarketData::from_reader(
            &include_bytes!("fixtures/zori_metro_sample.csv")[..],
            0.05,
            RegionDirectory::standard(),
        )
        .expect("zori fixture imports"),
    )
}

fn violations() -> Arc<ViolationsRegistry> {
    Arc::new(
        ViolationsRegistry::from_reader(&include_bytes!("fixtures/violations_sample.json")[..])
            .expect("violations fixture imports"),
    )
}

fn request(address: &str, zip_code: &str, current_rent: f64) -> AnalysisRequest {
    AnalysisRequest {
        address: address.to_string(),
        zip_code: zip_code.to_string(),
        current_rent,
        name: "Avery Renter".to_string(),
        email: "avery@example.com".to_string(),
        today: NaiveDate::from_ymd_opt(2025, 2, 3),
    }
}

#[test]
fn listing_feed_and_violations_build_a_strong_position() {
    let comparables = Arc::new(
        ComparablesRegistry::from_reader(
            &include_bytes!("fixtures/comparables_sample.csv")[..],
            0.2,
        )
        .expect("comparables fixture imports"),
    );
    let repository = Arc::new(MemoryRepository::default());
    let service = RentAnalysisService::new(zori(), comparables, violations(), repository);

    let report = service
        .analyze(request("123 Main St", "10001", 3300.0))
        .expect("analysis succeeds");

    assert_eq!(report.market_rate, 3240.0);
    assert_eq!(report.comparables.len(), 3);
    assert_eq!(report.violations.len(), 3);
    assert!((report.negotiation_power - 66.5).abs() < 1e-9);
    assert_eq!(report.negotiation.score, 94.3);
    assert_eq!(report.negotiation.level, 9);
    assert_eq!(report.negotiation.level_title, "Master Mediator");
    assert_eq!(
        report.negotiation.achievements,
        vec![Achievement::EvidenceCollector, Achievement::DataAnalyst]
    );
    assert_eq!(report.insights.negotiation_leverage, LeverageLevel::Strong);
    assert!(report.letter.contains("February 03, 2025"));
    assert!(report.letter.contains("1.9% above the market rate"));
    assert!(report
        .letter
        .contains("• Heating: No heat in unit for 5 days"));

    let history = service
        .history("Avery@Example.com", 10)
        .expect("history loads");
    assert_eq!(history.total_searches, 1);
    assert_eq!(history.searches[0].market_rate, 3240.0);
}

#[test]
fn market_band_comparables_fill_in_without_a_listing_feed() {
    let market = zori();
    let comparables = Arc::new(MarketBandComparables::new(market.clone(), 0.2));
    let service = RentAnalysisService::new(
        market,
        comparables,
        violations(),
        Arc::new(MemoryRepository::default()),
    );

    let report = service
        .analyze(request("9 Elm St", "02139", 2600.0))
        .expect("analysis succeeds");

    assert_eq!(report.market_rate, 2780.0);
    assert_eq!(report.comparables.len(), 5);
    assert!(report.violations.is_empty());
    assert_eq!(report.rent_score.score, 100.0);
    assert_eq!(report.insights.market_position, MarketPosition::BelowMarket);
    assert!(report
        .negotiation
        .achievements
        .contains(&Achievement::DataAnalyst));
    assert!(!report.letter.contains("Building Maintenance Considerations"));
}
