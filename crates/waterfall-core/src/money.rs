// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// FUND WATERFALL - MONEY & RATE ARITHMETIC
//
// Currency is integer cents (u128), rates are integer basis points.
// Every "round to the cent" is a single half-up integer division.
// Decimal text only exists at the serde boundary.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::error::WaterfallError;

/// 1 dollar = 100 cents
pub const CENTS_PER_DOLLAR: u128 = 100;
/// 10_000 bps = 100%
pub const BPS_SCALE: u32 = 10_000;
/// Day-count basis for preferred return accrual (actual/365)
pub const DAYS_PER_YEAR: u128 = 365;
/// Largest accepted currency amount: 10^16 dollars. The product of any two
/// accepted amounts fits in u128, so pro-rata shares stay exact.
pub const MAX_CENTS: u128 = 10u128.pow(18);

/// `value × numerator / denominator`, rounded half-up to the nearest integer.
/// A zero denominator yields zero.
pub fn mul_div_round(value: u128, numerator: u128, denominator: u128) -> u128 {
    if denominator == 0 {
        return 0;
    }
    match value.checked_mul(numerator) {
        Some(prod) => div_round(prod, denominator),
        None => {
            // Overflow: divide first, then round only the remainder part
            (value / denominator)
                .saturating_mul(numerator)
                .saturating_add(div_round(
                    (value % denominator).saturating_mul(numerator),
                    denominator,
                ))
        }
    }
}

fn div_round(num: u128, den: u128) -> u128 {
    let q = num / den;
    let r = num % den;
    if r >= den - r {
        q + 1
    } else {
        q
    }
}

/// Render cents as a fixed two-decimal dollar string ("1234.05").
pub fn format_cents(cents: u128) -> String {
    format!(
        "{}.{:02}",
        cents / CENTS_PER_DOLLAR,
        cents % CENTS_PER_DOLLAR
    )
}

/// Same as `format_cents` with thousands separators, for terminal output.
pub fn format_cents_grouped(cents: u128) -> String {
    let whole = (cents / CENTS_PER_DOLLAR).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{}.{:02}", grouped, cents % CENTS_PER_DOLLAR)
}

/// Parse a non-negative decimal string with at most `scale_digits` fractional
/// digits into an integer scaled by 10^scale_digits.
fn parse_scaled(text: &str, scale_digits: u32) -> Result<u128, String> {
    let s = text.trim();
    if s.is_empty() {
        return Err("empty value".to_string());
    }
    if s.starts_with('-') {
        return Err(format!("negative value '{}'", s));
    }
    let s = s.strip_prefix('+').unwrap_or(s);
    let (whole, frac) = match s.split_once('.') {
        Some((w, f)) => (w, f),
        None => (s, ""),
    };
    if whole.is_empty() && frac.is_empty() {
        return Err(format!("'{}' is not a number", text));
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
        return Err(format!("'{}' is not a plain decimal number", text));
    }
    // Trailing zeros beyond the scale are harmless ("0.0800" as a rate)
    let frac = frac.trim_end_matches('0');
    if frac.len() > scale_digits as usize {
        return Err(format!(
            "'{}' has more than {} fractional digits",
            text, scale_digits
        ));
    }

    let scale = 10u128.pow(scale_digits);
    let whole_val: u128 = if whole.is_empty() {
        0
    } else {
        whole
            .parse()
            .map_err(|_| format!("'{}' is out of range", text))?
    };
    let frac_val: u128 = if frac.is_empty() {
        0
    } else {
        let padded = format!("{:0<width$}", frac, width = scale_digits as usize);
        padded
            .parse()
            .map_err(|_| format!("'{}' is out of range", text))?
    };
    whole_val
        .checked_mul(scale)
        .and_then(|v| v.checked_add(frac_val))
        .ok_or_else(|| format!("'{}' is out of range", text))
}

/// Parse a dollar amount ("1200000", "1200000.5", "0.07") into cents.
pub fn parse_dollars(text: &str) -> Result<u128, WaterfallError> {
    let cents = parse_scaled(text, 2).map_err(WaterfallError::InvalidAmount)?;
    check_amount(cents)
}

/// Reject amounts above `MAX_CENTS`.
pub fn check_amount(cents: u128) -> Result<u128, WaterfallError> {
    if cents > MAX_CENTS {
        return Err(WaterfallError::InvalidAmount(format!(
            "{} exceeds the maximum of {}",
            format_cents(cents),
            format_cents(MAX_CENTS)
        )));
    }
    Ok(cents)
}

/// Parse a decimal fraction ("0.08" = 8%) into basis points.
pub fn parse_rate(text: &str) -> Result<Bps, WaterfallError> {
    let bps = parse_scaled(text, 4).map_err(WaterfallError::InvalidRate)?;
    u32::try_from(bps)
        .map(Bps)
        .map_err(|_| WaterfallError::InvalidRate(format!("'{}' is out of range", text)))
}

// ─────────────────────────────────────────────────────────────────
// BASIS POINTS
// ─────────────────────────────────────────────────────────────────

/// A rate or share in basis points. On the wire it is a decimal fraction
/// (`0.08` or `"0.08"`), never a raw bps integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct Bps(pub u32);

impl Bps {
    pub const ZERO: Bps = Bps(0);
    pub const WHOLE: Bps = Bps(BPS_SCALE);

    pub fn as_u128(self) -> u128 {
        self.0 as u128
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Bps {
    /// Shortest decimal fraction: 800 → "0.08", 10000 → "1.0"
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / BPS_SCALE;
        let frac = format!("{:04}", self.0 % BPS_SCALE);
        let frac = frac.trim_end_matches('0');
        if frac.is_empty() {
            write!(f, "{}.0", whole)
        } else {
            write!(f, "{}.{}", whole, frac)
        }
    }
}

impl Serialize for Bps {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Bps {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        struct BpsVisitor;

        impl<'de> de::Visitor<'de> for BpsVisitor {
            type Value = Bps;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a decimal fraction as a string or number")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Bps, E> {
                parse_rate(v).map_err(E::custom)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Bps, E> {
                self.visit_str(&v.to_string())
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Bps, E> {
                self.visit_str(&v.to_string())
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Bps, E> {
                if !v.is_finite() {
                    return Err(E::custom("rate must be finite"));
                }
                // f64 Display is the shortest round-trip form, never exponential
                self.visit_str(&v.to_string())
            }
        }

        d.deserialize_any(BpsVisitor)
    }
}

// ─────────────────────────────────────────────────────────────────
// SERDE ADAPTER: u128 cents ↔ decimal dollars
// ─────────────────────────────────────────────────────────────────

/// Serde adapter for u128 cents: serialize as a "1234.56" string,
/// deserialize from a dollar string or number.
pub mod cents {
    use super::*;

    pub fn serialize<S: Serializer>(val: &u128, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&format_cents(*val))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<u128, D::Error> {
        struct CentsVisitor;

        impl<'de> de::Visitor<'de> for CentsVisitor {
            type Value = u128;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a dollar amount as a string or number")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<u128, E> {
                parse_dollars(v).map_err(E::custom)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<u128, E> {
                check_amount(v as u128 * CENTS_PER_DOLLAR).map_err(E::custom)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<u128, E> {
                if v >= 0 {
                    self.visit_u64(v as u64)
                } else {
                    Err(E::custom(WaterfallError::InvalidAmount(format!(
                        "negative value '{}'",
                        v
                    ))))
                }
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<u128, E> {
                if !v.is_finite() {
                    return Err(E::custom("amount must be finite"));
                }
                self.visit_str(&v.to_string())
            }
        }

        d.deserialize_any(CentsVisitor)
    }
}
