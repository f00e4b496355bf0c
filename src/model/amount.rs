use std::fmt;
use std::str::FromStr;

use alloy::primitives::utils::{format_units, parse_units};
use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::error::{Result, RotationError};

/// A token amount in human units, expressed as a decimal string (e.g. "1000.50").
///
/// Parsing only checks the shape of the string. Scaling to base units happens
/// against a concrete token precision in [`Amount::to_base_units`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Amount {
    raw: String,
    whole: String,
    fraction: String,
}

impl Amount {
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_zero(&self) -> bool {
        self.whole.bytes().chain(self.fraction.bytes()).all(|b| b == b'0')
    }

    /// Number of digits after the decimal point.
    pub fn fraction_digits(&self) -> usize {
        self.fraction.len()
    }

    /// Scale to integer base units at the given precision, exactly.
    ///
    /// Rejects amounts carrying more fractional digits than `decimals`
    /// instead of truncating them.
    pub fn to_base_units(&self, decimals: u8) -> Result<U256> {
        if self.fraction.len() > decimals as usize {
            return Err(self.conversion_error(format!(
                "{} fractional digits exceed token precision of {}",
                self.fraction.len(),
                decimals
            )));
        }

        // parse_units truncates excess digits, so precision is checked above.
        let units = parse_units(&self.raw, decimals).map_err(|e| self.conversion_error(e))?;
        Ok(units.into())
    }

    fn conversion_error(&self, reason: impl fmt::Display) -> RotationError {
        RotationError::AmountConversion {
            amount: self.raw.clone(),
            reason: reason.to_string(),
        }
    }
}

impl FromStr for Amount {
    type Err = RotationError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = |reason: &str| RotationError::AmountConversion {
            amount: s.to_string(),
            reason: reason.to_string(),
        };

        let (whole, fraction) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };
        if whole.is_empty() {
            return Err(invalid("missing integer part"));
        }
        if s.contains('.') && fraction.is_empty() {
            return Err(invalid("missing fractional digits after '.'"));
        }
        if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid("expected an unsigned decimal number"));
        }

        Ok(Amount {
            raw: s.to_string(),
            whole: whole.to_string(),
            fraction: fraction.to_string(),
        })
    }
}

impl TryFrom<String> for Amount {
    type Error = RotationError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Amount> for String {
    fn from(amount: Amount) -> Self {
        amount.raw
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Format integer base units as a human decimal string, trailing zeros trimmed.
///
/// `format_base_units(500000, 6)` is `"0.5"`; `format_base_units(1000000, 6)` is `"1"`.
pub fn format_base_units(units: U256, decimals: u8) -> String {
    match format_units(units, decimals) {
        Ok(formatted) if formatted.contains('.') => formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string(),
        Ok(formatted) => formatted,
        Err(_) => units.to_string(),
    }
}

// ── Token handle ─────────────────────────────────────────────────────

/// An ERC20 the orchestrator moves around.
///
/// `decimals` pins a precision for tokens whose `decimals()` is unreliable.
/// When unset, precision is read on-chain on every conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenHandle {
    pub symbol: String,
    pub address: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimals: Option<u8>,
}

impl TokenHandle {
    pub fn new(symbol: impl Into<String>, address: Address) -> Self {
        TokenHandle {
            symbol: symbol.into(),
            address,
            decimals: None,
        }
    }
}
