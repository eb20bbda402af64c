use super::common::*;
use crate::workflows::negotiation::{
    AnalysisServiceError, DataSource, RentAnalysisService, STANDARD_TENANT_RIGHTS,
};
use std::sync::Arc;

#[test]
fn analyze_scores_and_records_the_search() {
    let (service, repository) = build_service();

    let report = service.analyze(request()).expect("analysis succeeds");

    assert_eq!(report.user.email, "renter@example.com");
    assert_eq!(report.market_rate, 2800.0);
    assert_eq!(report.rent_score.source, DataSource::MarketData);
    assert_close(report.scores.rent_score, 92.857, 1e-3);
    assert_close(report.scores.value_score, 46.3, 0.01);
    assert_close(report.negotiation_power, 51.9, 1e-9);
    assert_eq!(report.negotiation.level, 8);
    assert_eq!(report.comparables.len(), 3);
    assert_eq!(report.tenant_rights.len(), STANDARD_TENANT_RIGHTS.len());
    assert!(report.letter.contains("March 15, 2024"));
    assert!(report.letter.contains("Jordan Tenant"));
    assert_eq!(
        report.email_link,
        crate::workflows::negotiation::email_link(&report.letter)
    );

    let records = repository.records();
    assert_eq!(records.len(), 1);
    assert_eq!(Some(&records[0].id), report.search_id.as_ref());
    assert_eq!(records[0].market_rate, 2800.0);
    assert_eq!(records[0].rent_score, report.rent_score.score);
}

#[test]
fn analyze_rejects_invalid_input_with_every_field() {
    let (service, repository) = build_service();
    let mut request = request();
    request.address = "   ".to_string();
    request.current_rent = -1.0;
    request.email = "nope".to_string();

    match service.analyze(request) {
        Err(AnalysisServiceError::Validation { fields }) => {
            assert_eq!(fields, vec!["address", "current_rent", "email"]);
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert!(repository.records().is_empty());
}

#[test]
fn provider_outages_degrade_to_no_data() {
    let provider = Arc::new(OfflineProvider);
    let repository = Arc::new(MemoryRepository::default());
    let service =
        RentAnalysisService::new(provider.clone(), provider.clone(), provider, repository);

    let report = service.analyze(request()).expect("analysis still succeeds");

    assert_eq!(report.rent_score.score, 50.0);
    assert_eq!(report.rent_score.source, DataSource::NoData);
    assert_eq!(report.market_rate, 0.0);
    assert!(report.market.is_none());
    assert!(report.comparables.is_empty());
    assert!(report.violations.is_empty());
    assert_eq!(report.negotiation_power, 50.0);
    assert_eq!(report.negotiation.score, 65.0);
    assert!(report.letter.contains("not been able to confirm"));
    assert!(!report.letter.contains("NaN"));
}

#[test]
fn repository_outage_keeps_the_report() {
    let service = RentAnalysisService::new(
        Arc::new(market()),
        Arc::new(FixedComparables(comparables())),
        Arc::new(FixedViolations(vec![violation("Heating", "No heat")])),
        Arc::new(UnavailableRepository),
    );

    let report = service.analyze(request()).expect("analysis succeeds");
    assert!(report.search_id.is_none());
    assert_eq!(report.violations.len(), 1);
    assert!(report.letter.contains("• Heating: No heat"));

    match service.history("renter@example.com", 10) {
        Err(AnalysisServiceError::Repository(_)) => {}
        other => panic!("expected repository error, got {other:?}"),
    }
}

#[test]
fn history_is_newest_first_and_normalizes_email() {
    let (service, repository) = build_service();
    service.analyze(request()).expect("first analysis");
    let mut second = request();
    second.current_rent = 2500.0;
    service.analyze(second).expect("second analysis");

    let history = service
        .history("  RENTER@example.com ", 10)
        .expect("history loads");
    let records = repository.records();

    assert_eq!(history.email, "renter@example.com");
    assert_eq!(history.total_searches, 2);
    assert_eq!(history.searches[0].id, records[1].id);
    assert_eq!(history.searches[0].current_rent, 2500.0);

    let limited = service.history("renter@example.com", 1).expect("history");
    assert_eq!(limited.total_searches, 2);
    assert_eq!(limited.searches.len(), 1);
}

#[test]
fn history_requires_an_email() {
    let (service, _) = build_service();
    assert!(matches!(
        service.history("  ", 10),
        Err(AnalysisServiceError::Validation { .. })
    ));
}
