use chrono::NaiveDate;
use colored::*;
use log::debug;
use std::path::Path;
use waterfall_core::money::format_cents_grouped;
use waterfall_core::{calculate_waterfall, parse_dollars, RoundLedger};

use super::calculate::print_result;
use super::common::{load_request, report_skipped};
use crate::print_success;

/// Pair up `--amounts` and `--dates` into (date, cents) rounds.
pub fn parse_schedule(
    amounts: &[String],
    dates: &[String],
) -> Result<Vec<(NaiveDate, u128)>, Box<dyn std::error::Error>> {
    if amounts.len() != dates.len() {
        return Err(format!(
            "{} amounts but {} dates; each round needs both",
            amounts.len(),
            dates.len()
        )
        .into());
    }

    let mut schedule = Vec::with_capacity(amounts.len());
    for (amount, date) in amounts.iter().zip(dates) {
        let cents = parse_dollars(amount)?;
        let date: NaiveDate = date
            .trim()
            .parse()
            .map_err(|e| format!("Invalid date '{}': {}", date, e))?;
        if let Some((previous, _)) = schedule.last() {
            if date < *previous {
                return Err(format!("Round dated {} precedes {}", date, previous).into());
            }
        }
        schedule.push((date, cents));
    }
    Ok(schedule)
}

pub fn handle(
    request: &Path,
    terms: Option<&Path>,
    amounts: &[String],
    dates: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    let schedule = parse_schedule(amounts, dates)?;
    let parsed = load_request(request, terms)?;
    report_skipped(&parsed);

    let mut ledger = RoundLedger::new();
    let mut investors = parsed.request.investors.clone();

    for (date, cents) in schedule {
        let mut round = parsed.request.clone();
        round.distribution_date = date;
        round.total_distributable = cents;
        round.investors = investors;

        debug!("Round {} on {}", ledger.rounds.len() + 1, date);
        let result = calculate_waterfall(&round)?;

        println!(
            "{}",
            format!("━━━ Round {} ━━━", ledger.rounds.len() + 1).cyan().bold()
        );
        print_result(&result);
        println!();

        investors = ledger.record(&round.investors, &result);
    }

    print_success(&format!(
        "{} rounds: {} distributed, {} undistributed",
        ledger.rounds.len(),
        format_cents_grouped(ledger.cumulative_distributed),
        format_cents_grouped(ledger.cumulative_undistributed)
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_schedule() {
        let schedule = parse_schedule(
            &strings(&["800000", "600000.50"]),
            &strings(&["2024-01-01", "2024-07-01"]),
        )
        .unwrap();
        assert_eq!(schedule.len(), 2);
        assert_eq!(schedule[0].1, 80_000_000);
        assert_eq!(schedule[1].1, 60_000_050);
        assert_eq!(schedule[1].0, NaiveDate::from_ymd_opt(2024, 7, 1).unwrap());
    }

    #[test]
    fn test_parse_schedule_rejects_mismatch() {
        assert!(parse_schedule(&strings(&["1", "2"]), &strings(&["2024-01-01"])).is_err());
    }

    #[test]
    fn test_parse_schedule_rejects_bad_input() {
        assert!(parse_schedule(&strings(&["-5"]), &strings(&["2024-01-01"])).is_err());
        assert!(parse_schedule(&strings(&["5"]), &strings(&["01/01/2024"])).is_err());
        assert!(parse_schedule(
            &strings(&["5", "5"]),
            &strings(&["2024-07-01", "2024-01-01"])
        )
        .is_err());
    }
}
