pub mod assembler;
pub mod balance;
pub mod calldata;
pub mod evm;
pub mod lending;
pub mod smart_account;
pub mod units;
pub mod wallet;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{Amount, TxHash};

// ── Execution result ────────────────────────────────────────────────

/// Result of a venue action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionResult {
    /// A confirmed submission; `steps` calls ran inside it.
    Submitted { tx_hash: TxHash, steps: usize },
    /// Nothing to do (e.g. no position to exit).
    Noop,
}

impl ExecutionResult {
    pub fn tx_hash(&self) -> Option<TxHash> {
        match self {
            ExecutionResult::Submitted { tx_hash, .. } => Some(*tx_hash),
            ExecutionResult::Noop => None,
        }
    }
}

/// How much of a position a venue can exit in one withdrawal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WithdrawMode {
    /// Withdraws exactly the requested amount.
    Partial,
    /// Always exits the whole position, whatever amount was requested.
    FullBalance,
}

// ── Venue trait ─────────────────────────────────────────────────────

/// A lending protocol the rotation moves funds into and out of.
///
/// Implementations assemble their steps through the
/// [`TransactionAssembler`](assembler::TransactionAssembler) and submit them
/// with the shared [`Wallet`](wallet::Wallet).
#[async_trait]
pub trait Venue: Send + Sync {
    /// Short name for status lines.
    fn name(&self) -> &str;

    fn withdraw_mode(&self) -> WithdrawMode;

    /// Move `amount` from the account into the venue.
    async fn deposit(&self, amount: &Amount) -> Result<ExecutionResult>;

    /// Move funds back to the account. `FullBalance` venues ignore `amount`
    /// beyond reporting it.
    async fn withdraw(&self, amount: &Amount) -> Result<ExecutionResult>;
}
