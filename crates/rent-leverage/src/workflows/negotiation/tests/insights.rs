use super::common::*;
use crate::workflows::negotiation::insights::market_insights;
use crate::workflows::negotiation::views::chart_series;
use crate::workflows::negotiation::{LeverageLevel, MarketPosition, PriceTrend, Season};

#[test]
fn insights_read_a_softening_market() {
    let market = snapshot();
    let insights = market_insights(3000.0, Some(&market), 51.9, 3);

    assert_eq!(insights.market_position, MarketPosition::AboveMarket);
    assert_eq!(insights.price_trend, PriceTrend::Decreasing);
    assert_eq!(insights.negotiation_leverage, LeverageLevel::Moderate);
    assert_eq!(insights.best_time_to_negotiate, Some(Season::Winter));
    assert_eq!(insights.confidence_score, 0.9);
    assert_eq!(
        insights.key_insights[0],
        "Your rent is 7.1% above the local average of $2800"
    );
    assert!(insights
        .key_insights
        .iter()
        .any(|line| line == "Rents have fallen 2.0% over the past year"));
}

#[test]
fn insights_without_market_are_low_confidence() {
    let insights = market_insights(3000.0, None, 80.0, 0);
    assert_eq!(insights.market_position, MarketPosition::Unknown);
    assert_eq!(insights.price_trend, PriceTrend::Stable);
    assert_eq!(insights.negotiation_leverage, LeverageLevel::Strong);
    assert!(insights.best_time_to_negotiate.is_none());
    assert_eq!(insights.confidence_score, 0.5);
}

#[test]
fn rent_within_band_is_at_market() {
    let insights = market_insights(2830.0, Some(&snapshot()), 30.0, 1);
    assert_eq!(insights.market_position, MarketPosition::AtMarket);
    assert_eq!(insights.negotiation_leverage, LeverageLevel::Weak);
    assert_eq!(insights.confidence_score, 0.75);
}

#[test]
fn chart_series_follow_season_order() {
    let market = snapshot();
    let charts = chart_series(3000.0, 2800.0, Some(&market));

    assert_eq!(charts.rent_comparison[0].label, "Your Rent");
    assert_eq!(charts.rent_comparison[1].value, 2800.0);
    let seasons: Vec<Season> = charts.seasonal_trend.iter().map(|point| point.season).collect();
    assert_eq!(seasons, Season::ordered().to_vec());
    assert_close(charts.seasonal_trend[1].change_pct, 3.0, 1e-9);

    assert!(chart_series(3000.0, 0.0, None).seasonal_trend.is_empty());
}
