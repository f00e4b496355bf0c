use std::sync::Arc;

use alloy::primitives::{Address, U256};
use alloy::sol;
use async_trait::async_trait;

use crate::error::Result;
use crate::model::{Amount, TokenHandle, TransactionStep};
use crate::venues::assembler::TransactionAssembler;
use crate::venues::evm;
use crate::venues::wallet::Wallet;
use crate::venues::{ExecutionResult, Venue, WithdrawMode};

// ── Aave V3 Pool interface (works for any Aave fork) ────────────

sol! {
    #[allow(missing_docs)]
    contract IAavePool {
        function supply(address asset, uint256 amount, address onBehalfOf, uint16 referralCode) external;
        function withdraw(address asset, uint256 amount, address to) external returns (uint256);
    }
}

/// Typed view of an Aave V3 pool.
#[derive(Debug, Clone, Copy)]
pub struct LendingPool {
    pub address: Address,
}

impl LendingPool {
    pub fn new(address: Address) -> Self {
        LendingPool { address }
    }

    pub fn supply(
        &self,
        asset: Address,
        amount: U256,
        on_behalf_of: Address,
        referral_code: u16,
    ) -> TransactionStep {
        TransactionStep::call(
            self.address,
            IAavePool::supplyCall {
                asset,
                amount,
                onBehalfOf: on_behalf_of,
                referralCode: referral_code,
            },
        )
    }

    pub fn withdraw(&self, asset: Address, amount: U256, to: Address) -> TransactionStep {
        TransactionStep::call(self.address, IAavePool::withdrawCall { asset, amount, to })
    }
}

// ── Aave Lending (direct adapter) ───────────────────────────────

pub struct AaveLending {
    wallet: Arc<dyn Wallet>,
    assembler: Arc<TransactionAssembler>,
    pool: LendingPool,
    token: TokenHandle,
    referral_code: u16,
}

impl AaveLending {
    pub fn new(
        wallet: Arc<dyn Wallet>,
        assembler: Arc<TransactionAssembler>,
        pool: LendingPool,
        token: TokenHandle,
    ) -> Self {
        AaveLending {
            wallet,
            assembler,
            pool,
            token,
            referral_code: 0,
        }
    }

    pub fn with_referral_code(mut self, referral_code: u16) -> Self {
        self.referral_code = referral_code;
        self
    }
}

#[async_trait]
impl Venue for AaveLending {
    fn name(&self) -> &str {
        "aave"
    }

    fn withdraw_mode(&self) -> WithdrawMode {
        WithdrawMode::Partial
    }

    async fn deposit(&self, amount: &Amount) -> Result<ExecutionResult> {
        println!(
            "  AAVE SUPPLY: {} {} to pool {}",
            amount,
            self.token.symbol,
            evm::short_addr(&self.pool.address),
        );

        let batch = self
            .assembler
            .supply_to_pool(&self.pool, &self.token, amount, self.referral_code)
            .await?;
        let tx_hash = self.wallet.send_batch(&batch).await?;
        println!("  AAVE: approve + supply tx: {tx_hash}");
        tracing::info!(%tx_hash, steps = batch.len(), "aave supply confirmed");

        Ok(ExecutionResult::Submitted {
            tx_hash,
            steps: batch.len(),
        })
    }

    async fn withdraw(&self, amount: &Amount) -> Result<ExecutionResult> {
        println!(
            "  AAVE WITHDRAW: {} {} from pool {}",
            amount,
            self.token.symbol,
            evm::short_addr(&self.pool.address),
        );

        let step = self
            .assembler
            .withdraw_from_pool(&self.pool, &self.token, amount)
            .await?;
        let tx_hash = self.wallet.send_transaction(&step).await?;
        println!("  AAVE: withdraw tx: {tx_hash}");
        tracing::info!(%tx_hash, "aave withdraw confirmed");

        Ok(ExecutionResult::Submitted { tx_hash, steps: 1 })
    }
}
