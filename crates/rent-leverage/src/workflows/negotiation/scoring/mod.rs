//! Pure scoring functions behind a rent analysis.
//!
//! None of these functions fail. Degenerate input (missing market data, zero
//! denominators, non-finite figures) resolves to a neutral value and a `warn`
//! event so callers always have a number to show.

mod leverage;
mod levels;
mod market;

pub use leverage::{negotiation_power, negotiation_score};
pub use levels::{level_for_score, level_title, LEVEL_TITLES, TERMINAL_LEVEL_TITLE};
pub use market::{price_metrics, rent_score, score_rent, value_score};

use tracing::warn;

pub(crate) const NEUTRAL_SCORE: f64 = 50.0;

/// Replaces a non-finite result with `fallback`, recording the substitution.
pub(crate) fn finite_or(operation: &'static str, value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        warn!(operation, value, fallback, "scoring fallback applied");
        fallback
    }
}

pub(crate) fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub(crate) fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}
