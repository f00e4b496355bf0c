use alloy::primitives::{Address, U256};
use alloy::sol_types::SolCall;

use crate::model::CalldataBlob;
use crate::venues::lending::silo::{CollateralType, ISiloRouter};

/// Encodes the inner calls of a router `multicall(bytes[])`.
///
/// Selectors are taken from the router's own interface, since the router
/// dispatches each blob against itself. Bad arguments yield an empty blob
/// rather than an error; the assembler refuses to submit empty blobs.
pub trait CalldataEncoder: Send + Sync {
    /// Pull `amount` of `token` from the caller into `to`.
    fn encode_transfer_from(&self, token: Address, to: Address, amount: U256) -> CalldataBlob;

    /// Let `spender` pull `amount` of `token` held by the router.
    fn encode_approve(&self, token: Address, spender: Address, amount: U256) -> CalldataBlob;

    /// Deposit `amount` into `silo` under the given collateral type.
    fn encode_deposit(&self, silo: Address, amount: U256, collateral: CollateralType)
    -> CalldataBlob;
}

/// Encoder for the Silo v2 router ABI.
#[derive(Debug, Clone, Copy, Default)]
pub struct SiloRouterCalldata;

impl CalldataEncoder for SiloRouterCalldata {
    fn encode_transfer_from(&self, token: Address, to: Address, amount: U256) -> CalldataBlob {
        if let Some(reason) = invalid_args(&[token, to], amount) {
            tracing::warn!(reason, "transferFrom not encoded");
            return CalldataBlob::empty(ISiloRouter::transferFromCall::SIGNATURE);
        }
        CalldataBlob::encode(ISiloRouter::transferFromCall { token, to, amount })
    }

    fn encode_approve(&self, token: Address, spender: Address, amount: U256) -> CalldataBlob {
        if let Some(reason) = invalid_args(&[token, spender], amount) {
            tracing::warn!(reason, "approve not encoded");
            return CalldataBlob::empty(ISiloRouter::approveCall::SIGNATURE);
        }
        CalldataBlob::encode(ISiloRouter::approveCall {
            token,
            spender,
            amount,
        })
    }

    fn encode_deposit(
        &self,
        silo: Address,
        amount: U256,
        collateral: CollateralType,
    ) -> CalldataBlob {
        if let Some(reason) = invalid_args(&[silo], amount) {
            tracing::warn!(reason, "deposit not encoded");
            return CalldataBlob::empty(ISiloRouter::depositCall::SIGNATURE);
        }
        CalldataBlob::encode(ISiloRouter::depositCall {
            silo,
            amount,
            collateralType: collateral.as_u8(),
        })
    }
}

fn invalid_args(addresses: &[Address], amount: U256) -> Option<&'static str> {
    if addresses.iter().any(|a| a.is_zero()) {
        Some("zero address argument")
    } else if amount.is_zero() {
        Some("zero amount")
    } else {
        None
    }
}
