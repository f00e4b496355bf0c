use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, U256};
use alloy::providers::{DynProvider, Provider};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;

use crate::error::{Result, RotationError};
use crate::model::{Chain, TransactionBatch, TransactionStep, TxHash};
use crate::venues::evm::{self, ISmartAccount};
use crate::venues::wallet::{ContractReader, Wallet};

// ── Smart account wallet ────────────────────────────────────────────

/// Submits through a smart account's `execute` / `executeBatch`, signed by
/// its owner EOA. Batches execute inside one on-chain transaction.
pub struct SmartAccountWallet {
    provider: DynProvider,
    account: Address,
}

impl SmartAccountWallet {
    /// Connect the owner key to the smart account at `account`.
    ///
    /// Fails with `NotInitialized` when the endpoint serves a different chain
    /// or no contract is deployed at `account`.
    pub async fn connect(chain: &Chain, private_key: &str, account: Address) -> Result<Self> {
        let (provider, owner) = evm::signer_provider(private_key, chain.rpc_url())?;

        let remote_id = provider
            .get_chain_id()
            .await
            .map_err(|e| RotationError::read("eth_chainId", e))?;
        if remote_id != chain.chain_id() {
            return Err(RotationError::NotInitialized {
                component: "wallet",
                reason: format!(
                    "RPC endpoint serves chain {remote_id}, config expects {} ({})",
                    chain.chain_id(),
                    chain
                ),
            });
        }

        let code = provider
            .get_code_at(account)
            .await
            .map_err(|e| RotationError::read("eth_getCode", e))?;
        if code.is_empty() {
            return Err(RotationError::NotInitialized {
                component: "smart account",
                reason: format!("no contract deployed at {account}"),
            });
        }

        tracing::info!(%account, %owner, chain = %chain, "smart account connected");
        Ok(SmartAccountWallet { provider, account })
    }
}

#[async_trait]
impl Wallet for SmartAccountWallet {
    fn account(&self) -> Address {
        self.account
    }

    async fn send_transaction(&self, step: &TransactionStep) -> Result<TxHash> {
        let smart_account = ISmartAccount::new(self.account, &self.provider);
        let pending = smart_account
            .execute(step.target, step.value, step.calldata.clone())
            .send()
            .await
            .map_err(|e| RotationError::submission(step.method, e))?;
        let receipt = pending
            .get_receipt()
            .await
            .map_err(|e| RotationError::submission(step.method, e))?;
        evm::require_success(&receipt, step.method)?;
        tracing::debug!(tx_hash = %receipt.transaction_hash, method = step.method, "call confirmed");
        Ok(receipt.transaction_hash)
    }

    async fn send_batch(&self, batch: &TransactionBatch) -> Result<TxHash> {
        let targets: Vec<Address> = batch.steps().iter().map(|s| s.target).collect();
        let values: Vec<U256> = batch.steps().iter().map(|s| s.value).collect();
        let data: Vec<Bytes> = batch.steps().iter().map(|s| s.calldata.clone()).collect();

        let smart_account = ISmartAccount::new(self.account, &self.provider);
        let pending = smart_account
            .executeBatch(targets, values, data)
            .send()
            .await
            .map_err(|e| RotationError::submission(batch.label, e))?;
        let receipt = pending
            .get_receipt()
            .await
            .map_err(|e| RotationError::submission(batch.label, e))?;
        evm::require_success(&receipt, batch.label)?;
        tracing::debug!(
            tx_hash = %receipt.transaction_hash,
            label = batch.label,
            steps = batch.len(),
            "batch confirmed"
        );
        Ok(receipt.transaction_hash)
    }
}

// ── RPC reader ──────────────────────────────────────────────────────

/// `eth_call` reader over an HTTP provider.
pub struct RpcReader {
    provider: DynProvider,
}

impl RpcReader {
    pub fn connect(chain: &Chain) -> Result<Self> {
        Ok(RpcReader {
            provider: evm::read_provider(chain.rpc_url())?,
        })
    }
}

#[async_trait]
impl ContractReader for RpcReader {
    async fn read(&self, contract: Address, calldata: Bytes) -> Result<Bytes> {
        let tx = TransactionRequest::default()
            .with_to(contract)
            .with_input(calldata);
        self.provider
            .call(tx)
            .await
            .map_err(|e| RotationError::read(format!("eth_call to {}", evm::short_addr(&contract)), e))
    }
}
