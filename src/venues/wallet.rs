use alloy::primitives::{Address, Bytes};
use alloy::sol_types::SolCall;
use async_trait::async_trait;

use crate::error::{Result, RotationError};
use crate::model::{TransactionBatch, TransactionStep, TxHash};
use crate::venues::evm;

// ── Collaborator traits ─────────────────────────────────────────────

/// The signing account that submits assembled steps.
///
/// Both methods suspend until the chain confirms or rejects the submission.
#[async_trait]
pub trait Wallet: Send + Sync {
    /// Address funds are held at and sent from.
    fn account(&self) -> Address;

    /// Submit a single call.
    async fn send_transaction(&self, step: &TransactionStep) -> Result<TxHash>;

    /// Submit every step in one transaction; all succeed or none apply.
    async fn send_batch(&self, batch: &TransactionBatch) -> Result<TxHash>;
}

/// Generic read-only contract access (`eth_call`).
#[async_trait]
pub trait ContractReader: Send + Sync {
    async fn read(&self, contract: Address, calldata: Bytes) -> Result<Bytes>;
}

/// Encode `call`, read it from `contract`, decode the typed return value.
pub async fn read_call<C: SolCall + Send>(
    reader: &dyn ContractReader,
    contract: Address,
    call: C,
    what: &str,
) -> Result<C::Return> {
    let raw = reader.read(contract, call.abi_encode().into()).await?;
    C::abi_decode_returns(&raw).map_err(|e| {
        RotationError::read(format!("{what} on {}", evm::short_addr(&contract)), e)
    })
}

// ── Dry run ─────────────────────────────────────────────────────────

/// Logs what would be submitted and returns a zero hash.
///
/// Reads still go to the live chain, so balance and precision checks run for real.
pub struct DryRunWallet {
    account: Address,
}

impl DryRunWallet {
    pub fn new(account: Address) -> Self {
        DryRunWallet { account }
    }
}

#[async_trait]
impl Wallet for DryRunWallet {
    fn account(&self) -> Address {
        self.account
    }

    async fn send_transaction(&self, step: &TransactionStep) -> Result<TxHash> {
        println!(
            "  [DRY RUN] would call {} on {} ({} bytes)",
            step.method,
            evm::short_addr(&step.target),
            step.calldata.len()
        );
        Ok(TxHash::ZERO)
    }

    async fn send_batch(&self, batch: &TransactionBatch) -> Result<TxHash> {
        println!(
            "  [DRY RUN] would submit {} batch of {} steps:",
            batch.label,
            batch.len()
        );
        for (i, step) in batch.steps().iter().enumerate() {
            println!(
                "    {}. {} on {} ({} bytes)",
                i + 1,
                step.method,
                evm::short_addr(&step.target),
                step.calldata.len()
            );
        }
        Ok(TxHash::ZERO)
    }
}
