// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// FUND WATERFALL - DATA MODEL
//
// Investor positions, tier configurations, the distribution request and
// everything the engine hands back. All currency fields are u128 cents and
// travel as decimal dollar strings on the wire.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::WaterfallError;
use crate::money::{self, Bps, BPS_SCALE};
use crate::terms::FundTerms;

/// One investment position in the fund being distributed.
///
/// The four `prior_*` fields are cumulative payouts from previous rounds.
/// They are supplied by the caller's ledger and never computed here.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Investor {
    #[serde(alias = "id")]
    pub investment_id: String,
    #[serde(alias = "investor_name", default)]
    pub name: String,
    #[serde(default)]
    pub is_gp: bool,
    #[serde(with = "money::cents", alias = "called_capital")]
    pub called_amount: u128,
    pub contribution_date: NaiveDate,
    #[serde(with = "money::cents", default)]
    pub prior_return_of_capital: u128,
    #[serde(with = "money::cents", default)]
    pub prior_preferred_return: u128,
    #[serde(with = "money::cents", default)]
    pub prior_catch_up: u128,
    #[serde(with = "money::cents", default)]
    pub prior_profit_split: u128,
}

impl Investor {
    /// New position with zeroed prior accumulators (first round).
    pub fn new(
        investment_id: &str,
        name: &str,
        is_gp: bool,
        called_amount: u128,
        contribution_date: NaiveDate,
    ) -> Self {
        Self {
            investment_id: investment_id.to_string(),
            name: name.to_string(),
            is_gp,
            called_amount,
            contribution_date,
            prior_return_of_capital: 0,
            prior_preferred_return: 0,
            prior_catch_up: 0,
            prior_profit_split: 0,
        }
    }

    /// Capital still owed back to this position.
    pub fn unreturned_capital(&self) -> u128 {
        self.called_amount
            .saturating_sub(self.prior_return_of_capital)
    }
}

// ─────────────────────────────────────────────────────────────────
// TIERS
// ─────────────────────────────────────────────────────────────────

/// The closed set of tier kinds, used to label output.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum TierKind {
    CapitalReturn,
    PreferredReturn,
    CatchUp,
    ProfitSplit,
}

impl TierKind {
    pub const ALL: [TierKind; 4] = [
        TierKind::CapitalReturn,
        TierKind::PreferredReturn,
        TierKind::CatchUp,
        TierKind::ProfitSplit,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TierKind::CapitalReturn => "capital_return",
            TierKind::PreferredReturn => "preferred_return",
            TierKind::CatchUp => "catch_up",
            TierKind::ProfitSplit => "profit_split",
        }
    }

    /// Map a wire kind string (case, dash and space insensitive, legacy
    /// aliases included) to a kind. Unrecognised strings return None.
    pub fn from_wire(kind: &str) -> Option<TierKind> {
        let normalized: String = kind
            .trim()
            .to_ascii_lowercase()
            .chars()
            .map(|c| if c == '-' || c == ' ' { '_' } else { c })
            .collect();
        match normalized.as_str() {
            "capital_return" | "capitalreturn" | "return_of_capital" | "roc" => {
                Some(TierKind::CapitalReturn)
            }
            "preferred_return" | "preferredreturn" | "preferred" | "pref" => {
                Some(TierKind::PreferredReturn)
            }
            "catch_up" | "catchup" | "gp_catch_up" => Some(TierKind::CatchUp),
            "profit_split" | "profitsplit" | "promote" | "carried_interest" => {
                Some(TierKind::ProfitSplit)
            }
            _ => None,
        }
    }
}

impl fmt::Display for TierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind-specific tier parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierParams {
    CapitalReturn,
    /// Annualised simple rate, actual/365
    PreferredReturn { rate: Bps },
    /// Target share of cumulative profit for the GP
    CatchUp { catch_up: Bps },
    /// GP and LP shares of whatever remains
    ProfitSplit { gp_share: Bps, lp_share: Bps },
}

/// One tier slot. `order` is the processing key; ties keep input order.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(try_from = "RawTier", into = "RawTier")]
pub struct TierConfig {
    pub order: i64,
    pub params: TierParams,
}

impl TierConfig {
    pub fn capital_return(order: i64) -> Self {
        Self {
            order,
            params: TierParams::CapitalReturn,
        }
    }

    pub fn preferred_return(order: i64, rate: Bps) -> Self {
        Self {
            order,
            params: TierParams::PreferredReturn { rate },
        }
    }

    pub fn catch_up(order: i64, catch_up: Bps) -> Self {
        Self {
            order,
            params: TierParams::CatchUp { catch_up },
        }
    }

    pub fn profit_split(order: i64, gp_share: Bps, lp_share: Bps) -> Self {
        Self {
            order,
            params: TierParams::ProfitSplit { gp_share, lp_share },
        }
    }

    pub fn kind(&self) -> TierKind {
        match self.params {
            TierParams::CapitalReturn => TierKind::CapitalReturn,
            TierParams::PreferredReturn { .. } => TierKind::PreferredReturn,
            TierParams::CatchUp { .. } => TierKind::CatchUp,
            TierParams::ProfitSplit { .. } => TierKind::ProfitSplit,
        }
    }

    /// Reject parameter combinations the engine cannot give a bounded answer for.
    /// A split summing below 100% is allowed; the remainder stays undistributed.
    pub fn validate(&self) -> Result<(), WaterfallError> {
        match self.params {
            TierParams::CatchUp { catch_up } if catch_up.0 >= BPS_SCALE => {
                Err(WaterfallError::CatchUpTooHigh {
                    order: self.order,
                    catch_up_bps: catch_up.0,
                })
            }
            TierParams::ProfitSplit { gp_share, lp_share }
                if gp_share.0 as u64 + lp_share.0 as u64 > BPS_SCALE as u64 =>
            {
                Err(WaterfallError::SplitExceedsWhole {
                    order: self.order,
                    gp_bps: gp_share.0,
                    lp_bps: lp_share.0,
                })
            }
            _ => Ok(()),
        }
    }
}

/// Loose wire form of a tier: free kind string plus optional parameters.
/// Missing parameters default to zero, which makes the tier pay nothing.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RawTier {
    #[serde(alias = "type", alias = "tier_type")]
    pub kind: String,
    #[serde(alias = "tier_order", default)]
    pub order: i64,
    #[serde(alias = "preferred_rate", default, skip_serializing_if = "Option::is_none")]
    pub pref_rate: Option<Bps>,
    #[serde(alias = "catch_up_percentage", default, skip_serializing_if = "Option::is_none")]
    pub catch_up_pct: Option<Bps>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gp_split_pct: Option<Bps>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lp_split_pct: Option<Bps>,
}

impl TryFrom<RawTier> for TierConfig {
    type Error = WaterfallError;

    fn try_from(raw: RawTier) -> Result<Self, Self::Error> {
        let kind = TierKind::from_wire(&raw.kind)
            .ok_or_else(|| WaterfallError::UnknownTierKind(raw.kind.clone()))?;
        let params = match kind {
            TierKind::CapitalReturn => TierParams::CapitalReturn,
            TierKind::PreferredReturn => TierParams::PreferredReturn {
                rate: raw.pref_rate.unwrap_or_default(),
            },
            TierKind::CatchUp => TierParams::CatchUp {
                catch_up: raw.catch_up_pct.unwrap_or_default(),
            },
            TierKind::ProfitSplit => TierParams::ProfitSplit {
                gp_share: raw.gp_split_pct.unwrap_or_default(),
                lp_share: raw.lp_split_pct.unwrap_or_default(),
            },
        };
        Ok(TierConfig {
            order: raw.order,
            params,
        })
    }
}

impl From<TierConfig> for RawTier {
    fn from(tier: TierConfig) -> Self {
        let mut raw = RawTier {
            kind: tier.kind().as_str().to_string(),
            order: tier.order,
            pref_rate: None,
            catch_up_pct: None,
            gp_split_pct: None,
            lp_split_pct: None,
        };
        match tier.params {
            TierParams::CapitalReturn => {}
            TierParams::PreferredReturn { rate } => raw.pref_rate = Some(rate),
            TierParams::CatchUp { catch_up } => raw.catch_up_pct = Some(catch_up),
            TierParams::ProfitSplit { gp_share, lp_share } => {
                raw.gp_split_pct = Some(gp_share);
                raw.lp_split_pct = Some(lp_share);
            }
        }
        raw
    }
}

// ─────────────────────────────────────────────────────────────────
// REQUEST
// ─────────────────────────────────────────────────────────────────

/// The single input of one calculation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DistributionRequest {
    pub distribution_date: NaiveDate,
    #[serde(with = "money::cents")]
    pub total_distributable: u128,
    #[serde(default)]
    pub investors: Vec<Investor>,
    #[serde(default)]
    pub tiers: Vec<TierConfig>,
}

impl DistributionRequest {
    pub fn new(distribution_date: NaiveDate, total_distributable: u128) -> Self {
        Self {
            distribution_date,
            total_distributable,
            investors: Vec::new(),
            tiers: Vec::new(),
        }
    }

    /// Replace the tier list with a terms template.
    pub fn with_terms(mut self, terms: &FundTerms) -> Self {
        self.tiers = terms.tiers.clone();
        self
    }

    /// Validate every tier's parameters and bound every amount by `MAX_CENTS`.
    pub fn validate(&self) -> Result<(), WaterfallError> {
        money::check_amount(self.total_distributable)?;
        for investor in &self.investors {
            for amount in [
                investor.called_amount,
                investor.prior_return_of_capital,
                investor.prior_preferred_return,
                investor.prior_catch_up,
                investor.prior_profit_split,
            ] {
                money::check_amount(amount).map_err(|e| match e {
                    WaterfallError::InvalidAmount(msg) => WaterfallError::InvalidAmount(format!(
                        "investor '{}': {}",
                        investor.investment_id, msg
                    )),
                    other => other,
                })?;
            }
        }
        self.tiers.iter().try_for_each(TierConfig::validate)
    }
}

// ─────────────────────────────────────────────────────────────────
// RESULT
// ─────────────────────────────────────────────────────────────────

/// One allocation fact; everything else in the result derives from these.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    pub investment_id: String,
    pub investor_name: String,
    pub is_gp: bool,
    pub tier_kind: TierKind,
    pub tier_order: i64,
    #[serde(with = "money::cents")]
    pub amount: u128,
}

impl LineItem {
    pub(crate) fn new(investor: &Investor, tier_kind: TierKind, tier_order: i64, amount: u128) -> Self {
        Self {
            investment_id: investor.investment_id.clone(),
            investor_name: investor.name.clone(),
            is_gp: investor.is_gp,
            tier_kind,
            tier_order,
            amount,
        }
    }
}

/// Total consumed by one processed tier.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TierBreakdown {
    pub tier_kind: TierKind,
    pub tier_order: i64,
    #[serde(with = "money::cents")]
    pub amount: u128,
}

/// Per-investor roll-up of one round.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct InvestorSummary {
    pub investment_id: String,
    pub investor_name: String,
    pub is_gp: bool,
    #[serde(with = "money::cents")]
    pub capital_return: u128,
    #[serde(with = "money::cents")]
    pub preferred_return: u128,
    #[serde(with = "money::cents")]
    pub catch_up: u128,
    #[serde(with = "money::cents")]
    pub profit_split: u128,
    #[serde(with = "money::cents")]
    pub total: u128,
}

impl InvestorSummary {
    pub fn zeroed(investor: &Investor) -> Self {
        Self {
            investment_id: investor.investment_id.clone(),
            investor_name: investor.name.clone(),
            is_gp: investor.is_gp,
            capital_return: 0,
            preferred_return: 0,
            catch_up: 0,
            profit_split: 0,
            total: 0,
        }
    }

    pub fn subtotal(&self, kind: TierKind) -> u128 {
        match kind {
            TierKind::CapitalReturn => self.capital_return,
            TierKind::PreferredReturn => self.preferred_return,
            TierKind::CatchUp => self.catch_up,
            TierKind::ProfitSplit => self.profit_split,
        }
    }

    pub(crate) fn subtotal_mut(&mut self, kind: TierKind) -> &mut u128 {
        match kind {
            TierKind::CapitalReturn => &mut self.capital_return,
            TierKind::PreferredReturn => &mut self.preferred_return,
            TierKind::CatchUp => &mut self.catch_up,
            TierKind::ProfitSplit => &mut self.profit_split,
        }
    }
}

/// How the tier loop ended.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Nothing to distribute, no investors or no tiers
    Skipped,
    /// Pool reached zero before every tier was processed
    Exhausted,
    /// Every tier was processed
    Completed,
}

/// Output of one calculation.
///
/// `total_distributed + remaining_undistributed == total_distributable`
/// and the line items sum to `total_distributed`, both to the cent.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DistributionResult {
    pub distribution_date: NaiveDate,
    pub status: RunStatus,
    #[serde(with = "money::cents")]
    pub total_distributable: u128,
    #[serde(with = "money::cents")]
    pub total_distributed: u128,
    #[serde(with = "money::cents")]
    pub remaining_undistributed: u128,
    pub tier_breakdown: Vec<TierBreakdown>,
    pub investors: Vec<InvestorSummary>,
    pub line_items: Vec<LineItem>,
}

impl DistributionResult {
    pub fn summary_for(&self, investment_id: &str) -> Option<&InvestorSummary> {
        self.investors
            .iter()
            .find(|s| s.investment_id == investment_id)
    }

    pub fn tier_total(&self, kind: TierKind) -> u128 {
        self.tier_breakdown
            .iter()
            .filter(|t| t.tier_kind == kind)
            .map(|t| t.amount)
            .sum()
    }
}
