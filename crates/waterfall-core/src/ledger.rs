// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// FUND WATERFALL - ROUND CARRY-FORWARD
//
// The engine never reads history. Round N+1 must be handed the cumulative
// payouts of rounds 1..N in each investor's prior_* fields. These helpers
// produce that next-round investor list from a round's result; persisting
// it is still the caller's job.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::money;
use crate::types::{DistributionResult, Investor};

/// Return `investors` with this round's per-kind subtotals added to their
/// prior accumulators. Investors without a summary row come back unchanged.
///
/// Positions sharing an investment id share one summary row; the combined
/// payout is credited to the first of them only.
pub fn carry_forward(investors: &[Investor], result: &DistributionResult) -> Vec<Investor> {
    let mut credited: BTreeSet<&str> = BTreeSet::new();
    investors
        .iter()
        .map(|inv| {
            let mut next = inv.clone();
            if !credited.insert(inv.investment_id.as_str()) {
                return next;
            }
            if let Some(summary) = result.summary_for(&inv.investment_id) {
                next.prior_return_of_capital =
                    next.prior_return_of_capital.saturating_add(summary.capital_return);
                next.prior_preferred_return =
                    next.prior_preferred_return.saturating_add(summary.preferred_return);
                next.prior_catch_up = next.prior_catch_up.saturating_add(summary.catch_up);
                next.prior_profit_split =
                    next.prior_profit_split.saturating_add(summary.profit_split);
            }
            next
        })
        .collect()
}

/// One completed round as recorded in the ledger.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RoundRecord {
    pub round: u32,
    pub distribution_date: NaiveDate,
    #[serde(with = "money::cents")]
    pub total_distributable: u128,
    #[serde(with = "money::cents")]
    pub total_distributed: u128,
    #[serde(with = "money::cents")]
    pub remaining_undistributed: u128,
}

/// In-memory sequence of completed rounds with running totals.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundLedger {
    pub rounds: Vec<RoundRecord>,
    #[serde(with = "money::cents")]
    pub cumulative_distributed: u128,
    #[serde(with = "money::cents")]
    pub cumulative_undistributed: u128,
}

impl RoundLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished round and return the investors to feed the next one.
    pub fn record(&mut self, investors: &[Investor], result: &DistributionResult) -> Vec<Investor> {
        let round = self.rounds.len() as u32 + 1;
        self.rounds.push(RoundRecord {
            round,
            distribution_date: result.distribution_date,
            total_distributable: result.total_distributable,
            total_distributed: result.total_distributed,
            remaining_undistributed: result.remaining_undistributed,
        });
        self.cumulative_distributed += result.total_distributed;
        self.cumulative_undistributed += result.remaining_undistributed;
        carry_forward(investors, result)
    }

    pub fn last_round(&self) -> Option<&RoundRecord> {
        self.rounds.last()
    }
}
