pub const LEVEL_TITLES: [&str; 11] = [
    "Novice Negotiator",
    "Rent Rookie",
    "Market Apprentice",
    "Deal Detective",
    "Savings Seeker",
    "Bargain Baron",
    "Negotiation Ninja",
    "Rental Rockstar",
    "Property Pro",
    "Master Mediator",
    "Legendary Landlord Liaison",
];

pub const TERMINAL_LEVEL_TITLE: &str = "Supreme Negotiator";

/// Title for a negotiation level; every level past the table shares the terminal title.
pub fn level_title(level: u32) -> &'static str {
    usize::try_from(level)
        .ok()
        .and_then(|index| LEVEL_TITLES.get(index).copied())
        .unwrap_or(TERMINAL_LEVEL_TITLE)
}

/// Ten points per level, floored at zero.
pub fn level_for_score(total: f64) -> u32 {
    if !total.is_finite() || total <= 0.0 {
        return 0;
    }
    (total / 10.0).floor().min(u32::MAX as f64) as u32
}
