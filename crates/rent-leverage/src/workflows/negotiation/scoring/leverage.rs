use super::super::domain::{
    Achievement, Comparable, MarketSnapshot, NegotiationResult, ScoreBreakdown, Violation,
};
use super::levels::{level_for_score, level_title};
use super::{finite_or, round_to_tenth, NEUTRAL_SCORE};
use tracing::warn;

const NEGOTIATION_BASE: f64 = 60.0;
const MARKET_ALIGNMENT_POINTS: f64 = 20.0;
const RESEARCH_THRESHOLD: f64 = 0.10;
const DATA_ANALYST_MIN_COMPARABLES: usize = 3;
const POWER_NEGOTIATOR_THRESHOLD: f64 = 75.0;
const LOW_LEVERAGE_THRESHOLD: f64 = 25.0;

pub(crate) const BELOW_MARKET_TIP: &str = "Your rent is below market rate - great position!";
pub(crate) const USE_MARKET_DATA_TIP: &str =
    "Consider using market rate data in your negotiation";
pub(crate) const FIND_LEVERAGE_TIP: &str =
    "Try finding more leverage points to strengthen your position";

/// Estimates renter leverage on a 0-100 scale.
///
/// Vacancy adds `vacancy_rate * 30` points, a shrinking market adds
/// `-yearly_change * 20` points and each violation adds 5 points up to 20.
pub fn negotiation_power(market: Option<&MarketSnapshot>, violations: &[Violation]) -> f64 {
    let mut score = NEUTRAL_SCORE;

    if let Some(market) = market {
        let vacancy_impact = market.vacancy_rate * 100.0 * 0.3;
        let trend_impact = if market.yearly_change < 0.0 {
            -market.yearly_change * 100.0 * 0.2
        } else {
            0.0
        };
        score += vacancy_impact + trend_impact;
    }

    if !violations.is_empty() {
        score += (violations.len() as f64 * 5.0).min(20.0);
    }

    finite_or("negotiation_power", score, NEUTRAL_SCORE).clamp(0.0, 100.0)
}

/// Scores the renter's overall negotiating position and unlocks achievements.
///
/// The total starts at 60 and adds market alignment (0-20), evidence (0-10)
/// and a tenth of the negotiation power (0-10). Level and progress come from
/// the unrounded total; only the outward-facing fields are rounded.
pub fn negotiation_score(
    current_rent: f64,
    market_rate: f64,
    negotiation_power: f64,
    violations: &[Violation],
    comparables: &[Comparable],
) -> NegotiationResult {
    let mut achievements = Vec::new();
    let mut tips = Vec::new();

    let relative_difference =
        if market_rate.is_finite() && market_rate > 0.0 && current_rent.is_finite() {
            Some((market_rate - current_rent) / market_rate)
        } else {
            warn!(
                current_rent,
                market_rate, "market alignment unavailable; awarding no alignment points"
            );
            None
        };

    let market_points = match relative_difference {
        Some(difference) => {
            if difference > RESEARCH_THRESHOLD {
                achievements.push(Achievement::MarketResearcher);
                tips.push(BELOW_MARKET_TIP.to_string());
            } else if difference < -RESEARCH_THRESHOLD {
                tips.push(USE_MARKET_DATA_TIP.to_string());
            }
            MARKET_ALIGNMENT_POINTS * (1.0 - difference.abs().min(1.0))
        }
        None => 0.0,
    };

    let mut evidence_points = 0.0;
    if !violations.is_empty() {
        evidence_points += violations.len().min(5) as f64;
        achievements.push(Achievement::EvidenceCollector);
    }
    if comparables.len() >= DATA_ANALYST_MIN_COMPARABLES {
        evidence_points += 5.0;
        achievements.push(Achievement::DataAnalyst);
    }

    let power = finite_or("negotiation_score.power", negotiation_power, NEUTRAL_SCORE)
        .clamp(0.0, 100.0);
    let power_bonus = power * 0.1;
    if power >= POWER_NEGOTIATOR_THRESHOLD {
        achievements.push(Achievement::PowerNegotiator);
    } else if power <= LOW_LEVERAGE_THRESHOLD {
        tips.push(FIND_LEVERAGE_TIP.to_string());
    }

    let total = NEGOTIATION_BASE + market_points + evidence_points + power_bonus;
    let level = level_for_score(total);

    NegotiationResult {
        score: round_to_tenth(total),
        level,
        progress_to_next_level: total.rem_euclid(10.0) * 10.0,
        level_title: level_title(level),
        achievements,
        tips,
        components: ScoreBreakdown {
            market_alignment: round_to_tenth(market_points),
            evidence_strength: round_to_tenth(evidence_points),
            negotiation_power: round_to_tenth(power_bonus),
        },
    }
}
