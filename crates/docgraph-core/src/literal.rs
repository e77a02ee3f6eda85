//! Literal values carried by `literal` types
//!
//! Arbitrary-precision integers are kept as a sign plus a base-10 magnitude
//! string rather than a native integer, so values wider than any machine type
//! survive a trip through the wire format untouched.

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// An arbitrary-precision integer stored as sign and decimal magnitude
///
/// The magnitude never carries leading zeros and zero is never negative, so
/// two equal values always compare equal field-for-field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PseudoBigInt {
    negative: bool,
    base10_value: String,
}

impl PseudoBigInt {
    /// Build from a sign and an unsigned decimal magnitude (e.g. `"42"`)
    pub fn new(negative: bool, magnitude: &str) -> Result<Self, CoreError> {
        if magnitude.is_empty() || !magnitude.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CoreError::InvalidBigInt(magnitude.to_string()));
        }

        let trimmed = magnitude.trim_start_matches('0');
        let base10_value = if trimmed.is_empty() { "0" } else { trimmed };

        Ok(Self {
            negative: negative && base10_value != "0",
            base10_value: base10_value.to_string(),
        })
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// The unsigned decimal digits
    pub fn magnitude(&self) -> &str {
        &self.base10_value
    }

    pub fn is_zero(&self) -> bool {
        self.base10_value == "0"
    }
}

impl From<i128> for PseudoBigInt {
    fn from(value: i128) -> Self {
        Self {
            negative: value < 0,
            base10_value: value.unsigned_abs().to_string(),
        }
    }
}

impl From<i64> for PseudoBigInt {
    fn from(value: i64) -> Self {
        Self::from(i128::from(value))
    }
}

impl FromStr for PseudoBigInt {
    type Err = CoreError;

    /// Accepts source syntax like `-42n` as well as plain `-42`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = s.strip_suffix('n').unwrap_or(s);
        match body.strip_prefix('-') {
            Some(magnitude) => Self::new(true, magnitude),
            None => Self::new(false, body),
        }
    }
}

impl fmt::Display for PseudoBigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            write!(f, "-{}", self.base10_value)
        } else {
            write!(f, "{}", self.base10_value)
        }
    }
}

/// The value of a literal type
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    BigInt(PseudoBigInt),
}

impl LiteralValue {
    pub fn is_true(&self) -> bool {
        matches!(self, LiteralValue::Bool(true))
    }

    pub fn is_false(&self) -> bool {
        matches!(self, LiteralValue::Bool(false))
    }
}

impl fmt::Display for LiteralValue {
    /// Source syntax: strings are quoted and escaped, bigints carry an `n` suffix
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::Null => f.write_str("null"),
            LiteralValue::Bool(b) => write!(f, "{}", b),
            LiteralValue::Number(n) if !n.is_finite() => f.write_str("null"),
            // Avoid printing negative zero as "-0"
            LiteralValue::Number(n) if *n == 0.0 => f.write_str("0"),
            LiteralValue::Number(n) => f.write_str(&format_number(*n)),
            LiteralValue::String(s) => write!(f, "{}", serde_json::Value::String(s.clone())),
            LiteralValue::BigInt(big) => write!(f, "{}n", big),
        }
    }
}

/// Shortest round-trip digits laid out the way ECMAScript `Number::toString` does,
/// switching to exponent form below 1e-6 and from 1e21 up
fn format_number(n: f64) -> String {
    if n < 0.0 {
        return format!("-{}", format_number(-n));
    }
    let scientific = format!("{:e}", n);
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((&scientific, "0"));
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let k = digits.len() as i32;
    let point = exponent + 1;

    if k <= point && point <= 21 {
        format!("{}{}", digits, "0".repeat((point - k) as usize))
    } else if 0 < point && point <= 21 {
        let (int, frac) = digits.split_at(point as usize);
        format!("{}.{}", int, frac)
    } else if -6 < point && point <= 0 {
        format!("0.{}{}", "0".repeat((-point) as usize), digits)
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        let (lead, rest) = digits.split_at(1);
        if rest.is_empty() {
            format!("{}e{}{}", lead, sign, exponent.abs())
        } else {
            format!("{}.{}e{}{}", lead, rest, sign, exponent.abs())
        }
    }
}

impl From<&str> for LiteralValue {
    fn from(s: &str) -> Self {
        LiteralValue::String(s.to_string())
    }
}

impl From<String> for LiteralValue {
    fn from(s: String) -> Self {
        LiteralValue::String(s)
    }
}

impl From<bool> for LiteralValue {
    fn from(b: bool) -> Self {
        LiteralValue::Bool(b)
    }
}

impl From<f64> for LiteralValue {
    fn from(n: f64) -> Self {
        LiteralValue::Number(n)
    }
}

impl From<PseudoBigInt> for LiteralValue {
    fn from(big: PseudoBigInt) -> Self {
        LiteralValue::BigInt(big)
    }
}
