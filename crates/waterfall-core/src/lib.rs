// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// FUND WATERFALL - CORE MODULE
//
// Tiered capital distribution engine: allocates one cash distribution across
// a fund's investors through capital return, preferred return, GP catch-up
// and profit split tiers, with multi-round carry-forward via prior
// accumulators supplied by the caller.
//
// Pure and synchronous: no I/O inside the calculation, no clock, no
// randomness. Identical input always yields byte-identical output.
// All currency arithmetic uses u128 cents (no floating-point).
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub mod engine;
pub mod error;
pub mod ledger;
pub mod money;
pub mod request;
pub mod summary;
pub mod terms;
pub mod tiers;
pub mod types;

pub use engine::{calculate_waterfall, run_waterfall};
pub use error::WaterfallError;
pub use ledger::{carry_forward, RoundLedger, RoundRecord};
pub use money::{format_cents, parse_dollars, parse_rate, Bps, BPS_SCALE, CENTS_PER_DOLLAR};
pub use request::{parse_request, ParsedRequest, SkippedTier};
pub use terms::FundTerms;
pub use types::{
    DistributionRequest, DistributionResult, Investor, InvestorSummary, LineItem, RawTier,
    RunStatus, TierBreakdown, TierConfig, TierKind, TierParams,
};

/// Render a result as pretty JSON for the presentation layer.
pub fn result_to_json(result: &DistributionResult) -> Result<String, WaterfallError> {
    Ok(serde_json::to_string_pretty(result)?)
}
