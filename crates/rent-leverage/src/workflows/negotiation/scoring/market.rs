use super::super::domain::{
    Comparable, DataSource, MarketSnapshot, PriceMetrics, RentScore, ScoreResult,
};
use super::{finite_or, mean, NEUTRAL_SCORE};
use tracing::warn;

/// Scores how the current rent sits against the market average.
///
/// Rent at or below the average scores 100; every percent above it costs one
/// point. Without a usable snapshot the score is the neutral 50 labelled
/// [`DataSource::NoData`], which means "insufficient data", not "market rate".
pub fn rent_score(current_rent: f64, market: Option<&MarketSnapshot>) -> RentScore {
    let Some(market) = market else {
        return RentScore {
            score: NEUTRAL_SCORE,
            source: DataSource::NoData,
        };
    };

    let average_rent = market.average_rent;
    if !current_rent.is_finite() || !average_rent.is_finite() || average_rent <= 0.0 {
        warn!(
            current_rent,
            average_rent,
            region = %market.region,
            "rent score inputs unusable; falling back to neutral score"
        );
        return RentScore {
            score: NEUTRAL_SCORE,
            source: DataSource::NoData,
        };
    }

    let score = if current_rent <= average_rent {
        100.0
    } else {
        let overage_pct = (current_rent - average_rent) / average_rent * 100.0;
        100.0 - overage_pct.min(100.0)
    };

    RentScore {
        score: finite_or("rent_score", score, NEUTRAL_SCORE).clamp(0.0, 100.0),
        source: DataSource::MarketData,
    }
}

/// Blends the market-rate gap (up to ±30 points) and the comparable gap
/// (up to ±20 points) around a base of 50, clamped to 0-100.
pub fn value_score(
    current_rent: f64,
    market: Option<&MarketSnapshot>,
    comparables: &[Comparable],
) -> f64 {
    if !current_rent.is_finite() {
        return finite_or("value_score", current_rent, NEUTRAL_SCORE);
    }

    let mut score = NEUTRAL_SCORE;

    let market_rate = market
        .map(|snapshot| snapshot.average_rent)
        .unwrap_or(current_rent);
    if market_rate > 0.0 {
        score += (market_rate - current_rent) / market_rate * 30.0;
    }

    if let Some(comp_avg) = mean(comparables.iter().map(|comp| comp.rent)) {
        if comp_avg > 0.0 {
            score += (comp_avg - current_rent) / comp_avg * 20.0;
        }
    }

    finite_or("value_score", score, NEUTRAL_SCORE).clamp(0.0, 100.0)
}

/// Derives price-per-bedroom, market percentile, seasonal volatility and the
/// value score from the comparables and snapshot.
///
/// The percentile ranks `current_rent` among the comparable rents plus itself.
/// Ties resolve to the first matching position in ascending order, so a rent
/// equal to a comparable takes the lower percentile.
pub fn price_metrics(
    current_rent: f64,
    market: Option<&MarketSnapshot>,
    comparables: &[Comparable],
) -> PriceMetrics {
    if !current_rent.is_finite() || comparables.iter().any(|comp| !comp.rent.is_finite()) {
        warn!(
            current_rent,
            comparables = comparables.len(),
            "price metrics inputs not finite; returning neutral metrics"
        );
        return PriceMetrics::NEUTRAL;
    }

    let price_per_bedroom = mean(
        comparables
            .iter()
            .filter(|comp| comp.bedroom_count > 0)
            .map(|comp| comp.rent / comp.bedroom_count as f64),
    )
    .unwrap_or(0.0);

    let mut rents: Vec<f64> = comparables.iter().map(|comp| comp.rent).collect();
    rents.push(current_rent);
    rents.sort_by(f64::total_cmp);
    let position = rents.partition_point(|rent| *rent < current_rent);
    let market_percentile = position as f64 / rents.len() as f64 * 100.0;

    let price_volatility = market
        .map(|snapshot| seasonal_spread(snapshot.seasonal_changes.values().copied()))
        .unwrap_or(0.0);

    PriceMetrics {
        price_per_bedroom: finite_or("price_per_bedroom", price_per_bedroom, 0.0),
        market_percentile: market_percentile.clamp(0.0, 100.0),
        price_volatility: finite_or("price_volatility", price_volatility, 0.0).max(0.0),
        value_score: value_score(current_rent, market, comparables),
    }
}

/// Rent score and price metrics in one record.
pub fn score_rent(
    current_rent: f64,
    market: Option<&MarketSnapshot>,
    comparables: &[Comparable],
) -> ScoreResult {
    ScoreResult::from_parts(
        rent_score(current_rent, market),
        price_metrics(current_rent, market, comparables),
    )
}

fn seasonal_spread(changes: impl Iterator<Item = f64>) -> f64 {
    let bounds = changes.fold(None, |bounds: Option<(f64, f64)>, change| match bounds {
        None => Some((change, change)),
        Some((low, high)) => Some((low.min(change), high.max(change))),
    });

    match bounds {
        Some((low, high)) => high - low,
        None => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seasonal_spread_is_zero_without_changes() {
        assert_eq!(seasonal_spread(std::iter::empty()), 0.0);
    }

    #[test]
    fn seasonal_spread_spans_min_to_max() {
        let spread = seasonal_spread([0.02, -0.01, 0.03, -0.02].into_iter());
        assert!((spread - 0.05).abs() < 1e-12);
    }
}
