use alloy::primitives::{Address, B256, Bytes, U256};
use alloy::sol_types::SolCall;

/// Transaction hash returned by the wallet once a submission is confirmed.
pub type TxHash = B256;

/// One unsubmitted contract call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionStep {
    pub target: Address,
    /// Solidity signature of the called method, e.g. `approve(address,uint256)`.
    pub method: &'static str,
    pub calldata: Bytes,
    pub value: U256,
}

impl TransactionStep {
    /// Encode a typed `sol!` call against `target`.
    pub fn call<C: SolCall>(target: Address, call: C) -> Self {
        TransactionStep {
            target,
            method: C::SIGNATURE,
            calldata: call.abi_encode().into(),
            value: U256::ZERO,
        }
    }
}

/// Steps submitted as one atomic unit through the smart account.
///
/// Order is preserved exactly: an approval must come before the step that
/// spends it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionBatch {
    pub label: &'static str,
    steps: Vec<TransactionStep>,
}

impl TransactionBatch {
    pub fn new(label: &'static str, steps: Vec<TransactionStep>) -> Self {
        TransactionBatch { label, steps }
    }

    pub fn steps(&self) -> &[TransactionStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// A pre-encoded call destined for a router `multicall(bytes[])`.
///
/// An empty payload marks an encoding failure; callers must check
/// [`CalldataBlob::is_empty`] before wrapping blobs into a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalldataBlob {
    pub method: &'static str,
    pub data: Bytes,
}

impl CalldataBlob {
    pub fn encode<C: SolCall>(call: C) -> Self {
        CalldataBlob {
            method: C::SIGNATURE,
            data: call.abi_encode().into(),
        }
    }

    pub fn empty(method: &'static str) -> Self {
        CalldataBlob {
            method,
            data: Bytes::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
