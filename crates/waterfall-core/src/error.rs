use std::fmt;

/// Everything that can go wrong before the waterfall itself runs.
/// Business degeneracies (no investors, empty pool, no recipients) are
/// never errors; they simply distribute nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaterfallError {
    /// Currency value that is negative, unparseable or finer than a cent
    InvalidAmount(String),
    /// Rate/share that is negative, unparseable or finer than a basis point
    InvalidRate(String),
    /// Catch-up percentage of 100% or more makes the target unbounded
    CatchUpTooHigh { order: i64, catch_up_bps: u32 },
    /// GP + LP split shares above 100% would pay out more than the pool
    SplitExceedsWhole { order: i64, gp_bps: u32, lp_bps: u32 },
    /// Tier kind string not recognised by a strict deserializer
    UnknownTierKind(String),
    /// Request JSON that does not have the required shape
    MalformedRequest(String),
    /// Terms file could not be read or written
    Io(String),
    /// Terms file could not be parsed or rendered
    Config(String),
}

impl fmt::Display for WaterfallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidAmount(msg) => write!(f, "Invalid amount: {}", msg),
            Self::InvalidRate(msg) => write!(f, "Invalid rate: {}", msg),
            Self::CatchUpTooHigh {
                order,
                catch_up_bps,
            } => write!(
                f,
                "Catch-up tier {} has percentage {} bps; must be below 10000 bps (100%)",
                order, catch_up_bps
            ),
            Self::SplitExceedsWhole {
                order,
                gp_bps,
                lp_bps,
            } => write!(
                f,
                "Profit-split tier {} shares {} + {} bps exceed 10000 bps (100%)",
                order, gp_bps, lp_bps
            ),
            Self::UnknownTierKind(kind) => write!(f, "Unknown tier kind '{}'", kind),
            Self::MalformedRequest(msg) => write!(f, "Malformed request: {}", msg),
            Self::Io(msg) => write!(f, "I/O error: {}", msg),
            Self::Config(msg) => write!(f, "Terms config error: {}", msg),
        }
    }
}

impl std::error::Error for WaterfallError {}

impl From<serde_json::Error> for WaterfallError {
    fn from(e: serde_json::Error) -> Self {
        WaterfallError::MalformedRequest(e.to_string())
    }
}

impl From<std::io::Error> for WaterfallError {
    fn from(e: std::io::Error) -> Self {
        WaterfallError::Io(e.to_string())
    }
}

impl From<toml::de::Error> for WaterfallError {
    fn from(e: toml::de::Error) -> Self {
        WaterfallError::Config(e.to_string())
    }
}

impl From<toml::ser::Error> for WaterfallError {
    fn from(e: toml::ser::Error) -> Self {
        WaterfallError::Config(e.to_string())
    }
}
