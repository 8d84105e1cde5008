use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::WaterfallError;
use crate::money::{parse_rate, Bps};
use crate::types::{TierConfig, TierKind};

/// Reusable tier template for a fund ("the LPA terms").
/// Stored as TOML so operators can edit it by hand:
///
/// ```toml
/// name = "Fund II"
///
/// [[tiers]]
/// kind = "capital_return"
/// order = 1
///
/// [[tiers]]
/// kind = "preferred_return"
/// order = 2
/// pref_rate = "0.08"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundTerms {
    pub name: String,
    #[serde(default)]
    pub tiers: Vec<TierConfig>,
}

impl FundTerms {
    /// Canonical American waterfall: capital return, preferred return,
    /// GP catch-up, profit split at orders 1 to 4.
    pub fn standard(name: &str, pref_rate: Bps, catch_up: Bps, gp_share: Bps, lp_share: Bps) -> Self {
        Self {
            name: name.to_string(),
            tiers: vec![
                TierConfig::capital_return(1),
                TierConfig::preferred_return(2, pref_rate),
                TierConfig::catch_up(3, catch_up),
                TierConfig::profit_split(4, gp_share, lp_share),
            ],
        }
    }

    /// Load terms from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self, WaterfallError> {
        let content = fs::read_to_string(path)?;
        let terms: FundTerms = toml::from_str(&content)?;
        Ok(terms)
    }

    /// Build the standard template from environment variables.
    /// Useful for containerized batch runs.
    pub fn load_from_env() -> Result<Self, WaterfallError> {
        let name = std::env::var("WATERFALL_FUND_NAME").unwrap_or_else(|_| "Fund".to_string());
        let rate = |key: &str, default: &str| -> Result<Bps, WaterfallError> {
            let value = std::env::var(key).unwrap_or_else(|_| default.to_string());
            parse_rate(&value)
                .map_err(|e| WaterfallError::Config(format!("{}: {}", key, e)))
        };

        Ok(Self::standard(
            &name,
            rate("WATERFALL_PREF_RATE", "0.08")?,
            rate("WATERFALL_CATCH_UP", "0.2")?,
            rate("WATERFALL_GP_SPLIT", "0.2")?,
            rate("WATERFALL_LP_SPLIT", "0.8")?,
        ))
    }

    /// Save terms to a TOML file
    pub fn save_to_file(&self, path: &Path) -> Result<(), WaterfallError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Validate the template
    pub fn validate(&self) -> Result<(), WaterfallError> {
        if self.name.trim().is_empty() {
            return Err(WaterfallError::Config("name cannot be empty".to_string()));
        }
        if self.tiers.is_empty() {
            return Err(WaterfallError::Config("at least one tier is required".to_string()));
        }
        self.tiers.iter().try_for_each(TierConfig::validate)
    }

    /// Tier kinds in processing order, for display.
    pub fn kinds_in_order(&self) -> Vec<(i64, TierKind)> {
        let mut tiers: Vec<(i64, TierKind)> = self.tiers.iter().map(|t| (t.order, t.kind())).collect();
        tiers.sort_by_key(|(order, _)| *order);
        tiers
    }
}
