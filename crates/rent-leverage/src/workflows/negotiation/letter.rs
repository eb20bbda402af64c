use super::domain::{Comparable, Violation};
use super::scoring::mean;
use chrono::{Local, NaiveDate};
use std::fmt::Write as _;

/// Inputs for a negotiation letter.
#[derive(Debug, Clone, Copy)]
pub struct LetterRequest<'a> {
    pub name: &'a str,
    pub address: &'a str,
    pub current_rent: f64,
    pub market_rate: f64,
    pub violations: &'a [Violation],
    pub comparables: &'a [Comparable],
}

const PROPOSED_RESOLUTION: [&str; 3] = [
    "A rent adjustment to better align with current market rates",
    "A review of any outstanding maintenance issues",
    "A meeting to discuss these points in detail",
];

const EMAIL_SUBJECT: &str = "Rent Negotiation Request";

const RETENTION_BENEFITS: [&str; 3] = [
    "Consistent, timely rent payments",
    "Proper maintenance and care of the property",
    "Stability and continuity, saving turnover costs",
];

/// Renders the negotiation letter dated `dated`.
///
/// A market rate that is zero, negative or not finite, or a rent gap too wide
/// to express as a finite percentage, drops the percentage claim in favour of
/// an unqualified request to review the rate.
pub fn compose(request: &LetterRequest<'_>, dated: NaiveDate) -> String {
    let mut letter = String::new();
    let rent_figure = format_monthly(request.current_rent);

    writeln!(letter).expect("write letter line");
    writeln!(letter, "{}", dated.format("%B %d, %Y")).expect("write letter line");
    writeln!(letter).expect("write letter line");
    writeln!(letter, "Dear Property Manager,").expect("write letter line");
    writeln!(letter).expect("write letter line");

    let premises = if request.address.trim().is_empty() {
        "the property".to_string()
    } else {
        format!("the property at {}", request.address.trim())
    };
    let rate_clause = match &rent_figure {
        Some(figure) => format!("the current rental rate of {figure} per month"),
        None => "the current rental rate".to_string(),
    };
    writeln!(
        letter,
        "I hope this letter finds you well. My name is {}, and I am currently renting {premises}. \
I am writing to discuss {rate_clause} and would like to present some market research to support a rate adjustment.",
        request.name.trim()
    )
    .expect("write letter line");
    writeln!(letter).expect("write letter line");

    writeln!(letter, "Market Analysis:").expect("write letter line");
    writeln!(letter, "{}", market_paragraph(request)).expect("write letter line");
    writeln!(letter).expect("write letter line");

    if !request.violations.is_empty() {
        writeln!(letter, "Building Maintenance Considerations:").expect("write letter line");
        for violation in request.violations {
            writeln!(letter, "• {}: {}", violation.category, violation.description)
                .expect("write letter line");
        }
        writeln!(
            letter,
            "\nThese maintenance issues affect the property's value and tenant quality of life, \
and should be considered in our rent discussion."
        )
    .expect("write letter line");
        writeln!(letter).expect("write letter line");
    }

    writeln!(letter, "Proposed Resolution:").expect("write letter line");
    for (index, item) in PROPOSED_RESOLUTION.iter().enumerate() {
        writeln!(letter, "{}. {}", index + 1, item).expect("write letter line");
    }
    writeln!(letter).expect("write letter line");

    writeln!(letter, "Benefits of Retention:").expect("write letter line");
    for item in RETENTION_BENEFITS {
        writeln!(letter, "• {item}").expect("write letter line");
    }
    writeln!(letter).expect("write letter line");

    writeln!(
        letter,
        "I value our landlord-tenant relationship and believe this adjustment would benefit both parties \
by ensuring a fair market rate while maintaining a reliable, long-term tenancy."
    )
    .expect("write letter line");
    writeln!(letter).expect("write letter line");
    writeln!(
        letter,
        "I would appreciate the opportunity to discuss this in person at your earliest convenience. \
Please contact me to schedule a meeting."
    )
    .expect("write letter line");
    writeln!(letter).expect("write letter line");
    writeln!(letter, "Thank you for your time and consideration.").expect("write letter line");
    writeln!(letter).expect("write letter line");
    writeln!(letter, "Best regards,").expect("write letter line");
    writeln!(letter, "{}", request.name.trim()).expect("write letter line");

    letter
}

/// [`compose`] dated with the local calendar date.
pub fn compose_today(request: &LetterRequest<'_>) -> String {
    compose(request, Local::now().date_naive())
}

fn market_paragraph(request: &LetterRequest<'_>) -> String {
    let market_rate = request.market_rate;
    let current_rent = request.current_rent;
    let rent_difference = (current_rent - market_rate) / market_rate * 100.0;
    let rate_is_usable = market_rate.is_finite() && market_rate > 0.0;

    let mut paragraph = if rate_is_usable && rent_difference.is_finite() {
        let direction = if rent_difference > 0.0 { "above" } else { "below" };
        format!(
            "Based on extensive research of the local rental market, I have found that comparable \
properties in our area are renting for an average of {} per month. This indicates that the current \
rent is {:.1}% {direction} the market rate.",
            format_currency(market_rate),
            rent_difference.abs()
        )
    } else {
        "Based on research of the local rental market, I have not been able to confirm a reliable \
market average for comparable properties in our area, so I would like to review the current rate \
together against nearby listings."
            .to_string()
    };

    let listed_rents: Vec<f64> = request
        .comparables
        .iter()
        .map(|comp| comp.rent)
        .filter(|rent| rent.is_finite())
        .collect();
    let comparable_average = mean(listed_rents.iter().copied())
        .filter(|average| average.is_finite() && *average > 0.0);
    if let Some(average) = comparable_average {
        let count = listed_rents.len();
        write!(
            paragraph,
            " I also reviewed {count} comparable listing{} nearby, which average {} per month.",
            if count == 1 { "" } else { "s" },
            format_currency(average)
        )
        .expect("write market paragraph");
    }

    paragraph
}

/// Builds a `mailto:` link carrying the letter as a percent-encoded body.
pub fn email_link(letter: &str) -> String {
    format!(
        "mailto:?subject={}&body={}",
        urlencoding::encode(EMAIL_SUBJECT),
        urlencoding::encode(letter)
    )
}

fn format_monthly(amount: f64) -> Option<String> {
    amount.is_finite().then(|| format_currency(amount))
}

/// Formats a finite amount as `$1,234.56`.
pub(crate) fn format_currency(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{sign}${grouped}.{fraction}")
}
