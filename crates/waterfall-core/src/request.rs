// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// FUND WATERFALL - REQUEST PARSING
//
// The one place tier kinds are free strings. Anything not recognised is
// dropped from the typed request and reported back as a SkippedTier so the
// caller sees it instead of a silent no-op.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use chrono::NaiveDate;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::WaterfallError;
use crate::money;
use crate::types::{DistributionRequest, Investor, RawTier, TierConfig};

/// A tier present in the input that the engine will not process.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SkippedTier {
    pub kind: String,
    pub order: i64,
    pub reason: String,
}

/// A typed request plus diagnostics about what was left out of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRequest {
    pub request: DistributionRequest,
    pub skipped: Vec<SkippedTier>,
}

#[derive(Deserialize)]
struct WireRequest {
    distribution_date: NaiveDate,
    #[serde(with = "money::cents")]
    total_distributable: u128,
    #[serde(default)]
    investors: Vec<Investor>,
    #[serde(default)]
    tiers: Vec<RawTier>,
}

/// Parse a request from JSON, tolerating unknown tier kinds.
pub fn parse_request(json: &str) -> Result<ParsedRequest, WaterfallError> {
    let wire: WireRequest = serde_json::from_str(json)?;
    let (tiers, skipped) = resolve_tiers(wire.tiers)?;

    Ok(ParsedRequest {
        request: DistributionRequest {
            distribution_date: wire.distribution_date,
            total_distributable: wire.total_distributable,
            investors: wire.investors,
            tiers,
        },
        skipped,
    })
}

/// Convert loose tiers into typed ones, collecting unknown kinds.
pub fn resolve_tiers(
    raw: Vec<RawTier>,
) -> Result<(Vec<TierConfig>, Vec<SkippedTier>), WaterfallError> {
    let mut tiers = Vec::with_capacity(raw.len());
    let mut skipped = Vec::new();

    for raw_tier in raw {
        let kind = raw_tier.kind.clone();
        let order = raw_tier.order;
        match TierConfig::try_from(raw_tier) {
            Ok(tier) => tiers.push(tier),
            Err(WaterfallError::UnknownTierKind(_)) => {
                warn!("Skipping tier {} with unrecognized kind '{}'", order, kind);
                skipped.push(SkippedTier {
                    kind,
                    order,
                    reason: "unrecognized tier kind".to_string(),
                });
            }
            Err(e) => return Err(e),
        }
    }

    Ok((tiers, skipped))
}
