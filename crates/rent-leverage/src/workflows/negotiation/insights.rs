use super::domain::{MarketSnapshot, Season};
use serde::Serialize;

const MARKET_POSITION_BAND: f64 = 0.02;
const PRICE_TREND_BAND: f64 = 0.01;
const STRONG_LEVERAGE: f64 = 65.0;
const WEAK_LEVERAGE: f64 = 35.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketPosition {
    AboveMarket,
    AtMarket,
    BelowMarket,
    Unknown,
}

impl MarketPosition {
    pub const fn label(self) -> &'static str {
        match self {
            Self::AboveMarket => "Above Market",
            Self::AtMarket => "At Market",
            Self::BelowMarket => "Below Market",
            Self::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceTrend {
    Increasing,
    Stable,
    Decreasing,
}

impl PriceTrend {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Increasing => "Increasing",
            Self::Stable => "Stable",
            Self::Decreasing => "Decreasing",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LeverageLevel {
    Strong,
    Moderate,
    Weak,
}

impl LeverageLevel {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Strong => "Strong",
            Self::Moderate => "Moderate",
            Self::Weak => "Weak",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketInsights {
    pub market_position: MarketPosition,
    pub price_trend: PriceTrend,
    pub negotiation_leverage: LeverageLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_time_to_negotiate: Option<Season>,
    pub key_insights: Vec<String>,
    pub confidence_score: f64,
}

/// Rules-based reading of the market for the renter.
pub(crate) fn market_insights(
    current_rent: f64,
    market: Option<&MarketSnapshot>,
    negotiation_power: f64,
    comparable_count: usize,
) -> MarketInsights {
    let negotiation_leverage = if negotiation_power >= STRONG_LEVERAGE {
        LeverageLevel::Strong
    } else if negotiation_power <= WEAK_LEVERAGE {
        LeverageLevel::Weak
    } else {
        LeverageLevel::Moderate
    };

    let Some(market) = market.filter(|snapshot| {
        snapshot.average_rent.is_finite() && snapshot.average_rent > 0.0
    }) else {
        return MarketInsights {
            market_position: MarketPosition::Unknown,
            price_trend: PriceTrend::Stable,
            negotiation_leverage,
            best_time_to_negotiate: None,
            key_insights: vec!["Unable to generate detailed insights without market data".to_string()],
            confidence_score: 0.5,
        };
    };

    let gap = (current_rent - market.average_rent) / market.average_rent;
    let market_position = if !gap.is_finite() {
        MarketPosition::Unknown
    } else if gap > MARKET_POSITION_BAND {
        MarketPosition::AboveMarket
    } else if gap < -MARKET_POSITION_BAND {
        MarketPosition::BelowMarket
    } else {
        MarketPosition::AtMarket
    };

    let price_trend = if market.yearly_change > PRICE_TREND_BAND {
        PriceTrend::Increasing
    } else if market.yearly_change < -PRICE_TREND_BAND {
        PriceTrend::Decreasing
    } else {
        PriceTrend::Stable
    };

    let best_time_to_negotiate = market
        .seasonal_changes
        .iter()
        .filter(|(_, change)| change.is_finite())
        .min_by(|(_, left), (_, right)| left.total_cmp(right))
        .map(|(season, _)| *season);

    let mut key_insights = Vec::new();
    match market_position {
        MarketPosition::AboveMarket | MarketPosition::BelowMarket => key_insights.push(format!(
            "Your rent is {:.1}% {} the local average of ${:.0}",
            gap.abs() * 100.0,
            if gap > 0.0 { "above" } else { "below" },
            market.average_rent
        )),
        MarketPosition::AtMarket => key_insights.push(format!(
            "Your rent is in line with the local average of ${:.0}",
            market.average_rent
        )),
        MarketPosition::Unknown => {}
    }

    key_insights.push(format!(
        "Rents have {} {:.1}% over the past year",
        if market.yearly_change < 0.0 { "fallen" } else { "risen" },
        market.yearly_change.abs() * 100.0
    ));

    key_insights.push(format!(
        "Vacancy is running at {:.1}%",
        market.vacancy_rate * 100.0
    ));

    if let Some(season) = best_time_to_negotiate {
        key_insights.push(format!(
            "{} shows the softest seasonal pricing; time renewal talks accordingly",
            season.label()
        ));
    }

    let confidence_score = if comparable_count >= 3 { 0.9 } else { 0.75 };

    MarketInsights {
        market_position,
        price_trend,
        negotiation_leverage,
        best_time_to_negotiate,
        key_insights,
        confidence_score,
    }
}
