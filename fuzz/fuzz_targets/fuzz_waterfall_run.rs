//! Fuzz target: structured waterfall runs
//!
//! Builds requests from arbitrary investors and tier stacks, including
//! extreme amounts and dates, and checks the engine's accounting.
//!
//! Run: cargo +nightly fuzz run fuzz_waterfall_run

#![no_main]
use arbitrary::Arbitrary;
use chrono::{Duration, NaiveDate};
use libfuzzer_sys::fuzz_target;
use waterfall_core::{run_waterfall, Bps, DistributionRequest, Investor, TierConfig};

#[derive(Arbitrary, Debug)]
struct FuzzInvestor {
    is_gp: bool,
    called: u64,
    contributed_offset: u16,
    prior_capital: u64,
    prior_pref: u32,
    prior_catch_up: u32,
    prior_split: u32,
}

#[derive(Arbitrary, Debug)]
enum FuzzTier {
    Capital(i8),
    Preferred(i8, u16),
    CatchUp(i8, u16),
    Split(i8, u16, u16),
}

#[derive(Arbitrary, Debug)]
struct FuzzInput {
    total: u64,
    distribution_offset: u16,
    investors: Vec<FuzzInvestor>,
    tiers: Vec<FuzzTier>,
}

fn day(offset: u16) -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or_default() + Duration::days(offset as i64)
}

fuzz_target!(|input: FuzzInput| {
    let mut req = DistributionRequest::new(day(input.distribution_offset), input.total as u128);

    for (i, inv) in input.investors.iter().take(64).enumerate() {
        let mut investor = Investor::new(
            &format!("F{}", i),
            "fuzz",
            inv.is_gp,
            inv.called as u128,
            day(inv.contributed_offset),
        );
        investor.prior_return_of_capital = inv.prior_capital as u128;
        investor.prior_preferred_return = inv.prior_pref as u128;
        investor.prior_catch_up = inv.prior_catch_up as u128;
        investor.prior_profit_split = inv.prior_split as u128;
        req.investors.push(investor);
    }

    for tier in input.tiers.iter().take(8) {
        req.tiers.push(match *tier {
            FuzzTier::Capital(o) => TierConfig::capital_return(o as i64),
            FuzzTier::Preferred(o, r) => TierConfig::preferred_return(o as i64, Bps(r as u32)),
            // Keep below 100% so the stack stays valid
            FuzzTier::CatchUp(o, c) => TierConfig::catch_up(o as i64, Bps(c as u32 % 10_000)),
            FuzzTier::Split(o, gp, lp) => {
                let gp = gp as u32 % 10_001;
                let lp = lp as u32 % (10_001 - gp);
                TierConfig::profit_split(o as i64, Bps(gp), Bps(lp))
            }
        });
    }

    let result = run_waterfall(&req);
    assert_eq!(
        result.total_distributed + result.remaining_undistributed,
        req.total_distributable
    );
    assert_eq!(result.investors.len(), req.investors.len());
    let items: u128 = result.line_items.iter().map(|i| i.amount).sum();
    assert_eq!(items, result.total_distributed);
});
