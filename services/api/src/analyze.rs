use crate::infra::{build_analysis_service, InMemorySearchRepository};
use chrono::NaiveDate;
use clap::Args;
use rent_leverage::config::AppConfig;
use rent_leverage::error::AppError;
use rent_leverage::workflows::negotiation::{AnalysisRequest, RentAnalysisReport};
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct AnalyzeArgs {
    /// Street address of the rented unit
    #[arg(long)]
    pub(crate) address: String,
    /// ZIP code used to resolve the market region
    #[arg(long)]
    pub(crate) zip: String,
    /// Current monthly rent
    #[arg(long)]
    pub(crate) rent: f64,
    /// Renter name used to sign the letter
    #[arg(long)]
    pub(crate) name: String,
    /// Renter email the search is recorded under
    #[arg(long)]
    pub(crate) email: String,
    /// Letter date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Print the full negotiation letter after the scores.
    #[arg(long)]
    pub(crate) show_letter: bool,
}

pub(crate) fn run_analysis(args: AnalyzeArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = build_analysis_service(
        &config.market_data,
        Arc::new(InMemorySearchRepository::default()),
    )?;

    let report = service.analyze(AnalysisRequest {
        address: args.address,
        zip_code: args.zip,
        current_rent: args.rent,
        name: args.name,
        email: args.email,
        today: args.today,
    })?;

    print!("{}", render_report(&report, args.show_letter));
    Ok(())
}

pub(crate) fn render_report(report: &RentAnalysisReport, show_letter: bool) -> String {
    let mut lines = Vec::new();

    lines.push(format!(
        "Rent analysis for {} ({})",
        report.address, report.zip_code
    ));
    match &report.market {
        Some(market) => lines.push(format!(
            "- Market: {} via {} | avg ${:.0} | vacancy {:.1}% | yearly {:+.1}%",
            market.region,
            market.source,
            market.average_rent,
            market.vacancy_rate * 100.0,
            market.yearly_change * 100.0
        )),
        None => lines.push(format!("- Market: {}", report.rent_score.source.label())),
    }

    let scores = &report.scores;
    lines.push(format!(
        "- Rent score {:.1} | value score {:.1} | {:.0}th percentile",
        scores.rent_score, scores.value_score, scores.market_percentile
    ));
    lines.push(format!(
        "- Price per bedroom ${:.0} | seasonal volatility {:.1}%",
        scores.price_per_bedroom,
        scores.price_volatility * 100.0
    ));

    let negotiation = &report.negotiation;
    lines.push(format!(
        "- Negotiation power {:.1} | score {:.1} | level {} {} ({:.0}% to next)",
        report.negotiation_power,
        negotiation.score,
        negotiation.level,
        negotiation.level_title,
        negotiation.progress_to_next_level
    ));
    if !negotiation.achievements.is_empty() {
        let unlocked: Vec<&str> = negotiation
            .achievements
            .iter()
            .map(|achievement| achievement.label())
            .collect();
        lines.push(format!("- Achievements: {}", unlocked.join(", ")));
    }
    for tip in &negotiation.tips {
        lines.push(format!("- Tip: {tip}"));
    }

    let insights = &report.insights;
    lines.push(format!(
        "\nMarket insights ({} | {} | {} leverage | confidence {:.0}%)",
        insights.market_position.label(),
        insights.price_trend.label(),
        insights.negotiation_leverage.label(),
        insights.confidence_score * 100.0
    ));
    for insight in &insights.key_insights {
        lines.push(format!("  - {insight}"));
    }

    if !report.comparables.is_empty() {
        lines.push(format!("\nComparables ({})", report.comparables.len()));
        for comparable in &report.comparables {
            lines.push(format!(
                "  - {}: ${:.0} ({} br)",
                comparable.address, comparable.rent, comparable.bedroom_count
            ));
        }
    }

    if !report.violations.is_empty() {
        lines.push(format!("\nBuilding violations ({})", report.violations.len()));
        for violation in &report.violations {
            lines.push(format!(
                "  - {}: {}",
                violation.category, violation.description
            ));
        }
    }

    lines.push("\nTenant rights".to_string());
    for right in &report.tenant_rights {
        lines.push(format!("  - {right}"));
    }

    if let Some(id) = &report.search_id {
        lines.push(format!("\nSaved as {}", id.0));
    }

    if show_letter {
        lines.push("\nNegotiation letter".to_string());
        lines.push(report.letter.clone());
        lines.push(format!("Send via email: {}", report.email_link));
    }

    let mut rendered = lines.join("\n");
    rendered.push('\n');
    rendered
}
