// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// FUND WATERFALL - ORCHESTRATOR
//
// Pours one distribution through the tiers in ascending order:
//
//   NotStarted → Processing(i) → … → Exhausted | Completed
//
// Before each tier the pool is checked; once it hits zero the remaining
// tiers are skipped and produce no breakdown entry. Preferred-return and
// catch-up consumption feed the profits-so-far accumulator the catch-up
// tier targets. Capital return and profit split do not.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use log::{debug, info};

use crate::error::WaterfallError;
use crate::money::format_cents;
use crate::summary::summarize;
use crate::tiers::{self, TierOutcome};
use crate::types::{
    DistributionRequest, DistributionResult, LineItem, RunStatus, TierBreakdown, TierConfig,
    TierKind, TierParams,
};

/// Where the tier loop currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    NotStarted,
    Processing(usize),
    Exhausted,
    Completed,
}

/// Validate the request's tier parameters, then run the waterfall.
///
/// Only parameter validation can fail; once it passes the calculation
/// always returns a complete result with one summary row per investor.
pub fn calculate_waterfall(
    request: &DistributionRequest,
) -> Result<DistributionResult, WaterfallError> {
    request.validate()?;
    Ok(run_waterfall(request))
}

/// Run the waterfall without validating tier parameters. Invalid catch-up
/// percentages contribute nothing here rather than an unbounded target.
pub fn run_waterfall(request: &DistributionRequest) -> DistributionResult {
    let total = request.total_distributable;

    if total == 0 || request.investors.is_empty() || request.tiers.is_empty() {
        debug!(
            "Nothing to distribute (amount={}, investors={}, tiers={})",
            format_cents(total),
            request.investors.len(),
            request.tiers.len()
        );
        return DistributionResult {
            distribution_date: request.distribution_date,
            status: RunStatus::Skipped,
            total_distributable: total,
            total_distributed: 0,
            remaining_undistributed: total,
            tier_breakdown: Vec::new(),
            investors: summarize(&request.investors, &[]),
            line_items: Vec::new(),
        };
    }

    // Stable: equal order keys keep their input order
    let mut tiers: Vec<&TierConfig> = request.tiers.iter().collect();
    tiers.sort_by_key(|t| t.order);

    let mut pool = total;
    let mut profits_so_far: u128 = 0;
    let mut line_items: Vec<LineItem> = Vec::new();
    let mut tier_breakdown: Vec<TierBreakdown> = Vec::with_capacity(tiers.len());
    let mut stage = Stage::NotStarted;

    loop {
        let next = match stage {
            Stage::NotStarted => 0,
            Stage::Processing(i) => i + 1,
            Stage::Exhausted | Stage::Completed => break,
        };
        if next >= tiers.len() {
            stage = Stage::Completed;
            continue;
        }
        if pool == 0 {
            stage = Stage::Exhausted;
            continue;
        }
        stage = Stage::Processing(next);

        let tier = tiers[next];
        let mut outcome = process_tier(tier, pool, profits_so_far, request);
        if outcome.consumed > pool {
            tiers::reconcile(&mut outcome.items, pool);
            outcome.consumed = pool;
        }
        let consumed = outcome.consumed;

        debug!(
            "Tier {} ({}) pool={} consumed={} items={}",
            tier.order,
            tier.kind(),
            format_cents(pool),
            format_cents(consumed),
            outcome.items.len()
        );

        pool -= consumed;
        if matches!(tier.kind(), TierKind::PreferredReturn | TierKind::CatchUp) {
            profits_so_far += consumed;
        }
        tier_breakdown.push(TierBreakdown {
            tier_kind: tier.kind(),
            tier_order: tier.order,
            amount: consumed,
        });
        line_items.extend(outcome.items);
    }

    let total_distributed = total - pool;
    let status = if stage == Stage::Exhausted {
        RunStatus::Exhausted
    } else {
        RunStatus::Completed
    };

    info!(
        "Waterfall {} on {}: distributed {} of {}, undistributed {}, {} line items",
        match status {
            RunStatus::Exhausted => "exhausted",
            _ => "completed",
        },
        request.distribution_date,
        format_cents(total_distributed),
        format_cents(total),
        format_cents(pool),
        line_items.len()
    );

    DistributionResult {
        distribution_date: request.distribution_date,
        status,
        total_distributable: total,
        total_distributed,
        remaining_undistributed: pool,
        tier_breakdown,
        investors: summarize(&request.investors, &line_items),
        line_items,
    }
}

fn process_tier(
    tier: &TierConfig,
    pool: u128,
    profits_so_far: u128,
    request: &DistributionRequest,
) -> TierOutcome {
    let investors = &request.investors;
    match tier.params {
        TierParams::CapitalReturn => tiers::capital_return(pool, investors, tier.order),
        TierParams::PreferredReturn { rate } => tiers::preferred_return(
            pool,
            investors,
            tier.order,
            rate,
            request.distribution_date,
        ),
        TierParams::CatchUp { catch_up } => {
            tiers::catch_up(pool, investors, tier.order, catch_up, profits_so_far)
        }
        TierParams::ProfitSplit { gp_share, lp_share } => {
            tiers::profit_split(pool, investors, tier.order, gp_share, lp_share)
        }
    }
}
