use thiserror::Error;

/// Failure kinds surfaced by the rotation core.
///
/// Every adapter and scheduler operation either returns a transaction hash or
/// one of these. The only failure absorbed internally is the token decimals
/// lookup, which degrades to a configured fallback precision.
#[derive(Debug, Error)]
pub enum RotationError {
    #[error("{component} not initialized: {reason}")]
    NotInitialized {
        component: &'static str,
        reason: String,
    },

    #[error(
        "Insufficient {token} balance: required {required}, available {available} (short {shortfall})"
    )]
    InsufficientFunds {
        token: String,
        required: String,
        available: String,
        shortfall: String,
    },

    #[error("Cannot convert amount `{amount}`: {reason}")]
    AmountConversion { amount: String, reason: String },

    #[error("Calldata encoding failed for `{call}`: {reason}")]
    CalldataEncoding { call: String, reason: String },

    #[error("{label} submission failed: {reason}")]
    Submission { label: String, reason: String },

    #[error("Contract read `{what}` failed: {reason}")]
    ContractRead { what: String, reason: String },
}

impl RotationError {
    pub fn submission(label: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        RotationError::Submission {
            label: label.into(),
            reason: reason.to_string(),
        }
    }

    pub fn read(what: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        RotationError::ContractRead {
            what: what.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T, E = RotationError> = std::result::Result<T, E>;
