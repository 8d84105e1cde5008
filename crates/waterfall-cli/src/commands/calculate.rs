use colored::*;
use std::path::Path;
use waterfall_core::money::format_cents_grouped;
use waterfall_core::{calculate_waterfall, result_to_json, DistributionResult, RunStatus};

use super::common::{load_request, report_skipped};
use crate::{print_info, print_success};

pub fn handle(
    request: &Path,
    terms: Option<&Path>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let parsed = load_request(request, terms)?;
    let result = calculate_waterfall(&parsed.request)?;

    if json {
        println!("{}", result_to_json(&result)?);
        return Ok(());
    }

    report_skipped(&parsed);
    print_result(&result);
    Ok(())
}

/// Investor table, tier breakdown and totals for one round.
pub fn print_result(result: &DistributionResult) {
    println!(
        "{} {}",
        "Distribution Date:".bold(),
        result.distribution_date.to_string().cyan()
    );
    println!();

    if result.investors.is_empty() {
        print_info("No investors in request");
    } else {
        println!(
            "{:<14} {:<20} {:<3} {:>16} {:>14} {:>14} {:>16} {:>16}",
            "ID".bold(),
            "Investor".bold(),
            "".bold(),
            "Capital".bold(),
            "Preferred".bold(),
            "Catch-up".bold(),
            "Split".bold(),
            "Total".bold()
        );
        for s in &result.investors {
            println!(
                "{:<14} {:<20} {:<3} {:>16} {:>14} {:>14} {:>16} {:>16}",
                s.investment_id,
                truncate(&s.investor_name, 20),
                if s.is_gp { "GP" } else { "LP" },
                format_cents_grouped(s.capital_return),
                format_cents_grouped(s.preferred_return),
                format_cents_grouped(s.catch_up),
                format_cents_grouped(s.profit_split),
                format_cents_grouped(s.total).green()
            );
        }
        println!();
    }

    if !result.tier_breakdown.is_empty() {
        println!("{}", "Tier Breakdown:".bold());
        for tier in &result.tier_breakdown {
            println!(
                "  {:>3}  {:<18} {:>16}",
                tier.tier_order,
                tier.tier_kind.as_str(),
                format_cents_grouped(tier.amount)
            );
        }
        println!();
    }

    println!(
        "{} {}",
        "Distributable:".bold(),
        format_cents_grouped(result.total_distributable)
    );
    println!(
        "{} {}",
        "Distributed:  ".bold(),
        format_cents_grouped(result.total_distributed).green()
    );
    println!(
        "{} {}",
        "Undistributed:".bold(),
        format_cents_grouped(result.remaining_undistributed).yellow()
    );

    match result.status {
        RunStatus::Completed => print_success("All tiers processed"),
        RunStatus::Exhausted => print_info("Cash exhausted before the last tier"),
        RunStatus::Skipped => print_info("Nothing to distribute"),
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Pension", 20), "Pension");
        assert_eq!(truncate("abcdef", 4), "abc…");
        assert_eq!(truncate("abcd", 4), "abcd");
    }
}
