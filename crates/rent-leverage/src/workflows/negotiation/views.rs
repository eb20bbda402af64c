use super::domain::{MarketSnapshot, Season};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartBar {
    pub label: &'static str,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonalPoint {
    pub season: Season,
    pub season_label: &'static str,
    pub change_pct: f64,
}

/// Series a presentation layer needs to draw the rent comparison and
/// seasonal trend charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub rent_comparison: Vec<ChartBar>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub seasonal_trend: Vec<SeasonalPoint>,
}

pub(crate) fn chart_series(
    current_rent: f64,
    market_rate: f64,
    market: Option<&MarketSnapshot>,
) -> ChartSeries {
    let rent_comparison = vec![
        ChartBar {
            label: "Your Rent",
            value: current_rent,
        },
        ChartBar {
            label: "Market Average",
            value: market_rate,
        },
    ];

    let seasonal_trend = market
        .map(|snapshot| {
            Season::ordered()
                .into_iter()
                .filter_map(|season| {
                    snapshot
                        .seasonal_changes
                        .get(&season)
                        .map(|change| SeasonalPoint {
                            season,
                            season_label: season.label(),
                            change_pct: change * 100.0,
                        })
                })
                .collect()
        })
        .unwrap_or_default();

    ChartSeries {
        rent_comparison,
        seasonal_trend,
    }
}
