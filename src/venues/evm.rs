use alloy::network::EthereumWallet;
use alloy::primitives::{Address, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;
use alloy::sol;

use crate::error::{Result, RotationError};
use crate::model::TransactionStep;
use crate::venues::wallet::{ContractReader, read_call};

// ── ERC20 contract interface ───────────────────────────────────────

sol! {
    #[allow(missing_docs)]
    contract IERC20 {
        function approve(address spender, uint256 amount) external returns (bool);
        function balanceOf(address account) external view returns (uint256);
        function decimals() external view returns (uint8);
    }
}

// ── Smart account interface ────────────────────────────────────────

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    contract ISmartAccount {
        function execute(address target, uint256 value, bytes calldata data) external;
        function executeBatch(address[] calldata targets, uint256[] calldata values, bytes[] calldata data) external;
    }
}

// ── Token role ─────────────────────────────────────────────────────

/// Typed view of an ERC20 the rotation approves and reads.
#[derive(Debug, Clone, Copy)]
pub struct TokenContract {
    pub address: Address,
}

impl TokenContract {
    pub fn new(address: Address) -> Self {
        TokenContract { address }
    }

    pub fn approve(&self, spender: Address, amount: U256) -> TransactionStep {
        TransactionStep::call(self.address, IERC20::approveCall { spender, amount })
    }

    pub async fn decimals(&self, reader: &dyn ContractReader) -> Result<u8> {
        read_call(reader, self.address, IERC20::decimalsCall {}, "decimals").await
    }

    pub async fn balance_of(&self, reader: &dyn ContractReader, account: Address) -> Result<U256> {
        read_call(reader, self.address, IERC20::balanceOfCall { account }, "balanceOf").await
    }
}

// ── Provider factory ───────────────────────────────────────────────

/// Read-only HTTP provider.
pub fn read_provider(rpc_url: &str) -> Result<DynProvider> {
    let url = rpc_url
        .parse()
        .map_err(|e| RotationError::NotInitialized {
            component: "rpc provider",
            reason: format!("invalid RPC URL '{rpc_url}': {e}"),
        })?;
    Ok(ProviderBuilder::new().connect_http(url).erased())
}

/// HTTP provider that signs with the given hex private key.
pub fn signer_provider(private_key: &str, rpc_url: &str) -> Result<(DynProvider, Address)> {
    let signer: PrivateKeySigner =
        private_key
            .parse()
            .map_err(|e| RotationError::NotInitialized {
                component: "signer",
                reason: format!("invalid private key: {e}"),
            })?;
    let owner = signer.address();
    let url = rpc_url
        .parse()
        .map_err(|e| RotationError::NotInitialized {
            component: "rpc provider",
            reason: format!("invalid RPC URL '{rpc_url}': {e}"),
        })?;
    let provider = ProviderBuilder::new()
        .wallet(EthereumWallet::from(signer))
        .connect_http(url)
        .erased();
    Ok((provider, owner))
}

// ── Utility functions ──────────────────────────────────────────────

pub fn short_addr(addr: &Address) -> String {
    let s = format!("{addr}");
    if s.len() > 10 {
        format!("{}...{}", &s[..6], &s[s.len() - 4..])
    } else {
        s
    }
}

pub fn require_success(receipt: &alloy::rpc::types::TransactionReceipt, label: &str) -> Result<()> {
    if !receipt.status() {
        return Err(RotationError::submission(
            label,
            format!(
                "tx reverted (hash: {:?}, gas_used: {:?})",
                receipt.transaction_hash, receipt.gas_used
            ),
        ));
    }
    Ok(())
}
