use std::sync::Arc;

use alloy::primitives::{Address, Bytes, U256};
use alloy::sol;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{Amount, CalldataBlob, TokenHandle, TransactionStep};
use crate::venues::assembler::TransactionAssembler;
use crate::venues::evm;
use crate::venues::wallet::{ContractReader, Wallet, read_call};
use crate::venues::{ExecutionResult, Venue, WithdrawMode};

// ── Silo v2 router + silo interfaces ────────────────────────────────

sol! {
    #[allow(missing_docs)]
    contract ISiloRouter {
        function transferFrom(address token, address to, uint256 amount) external payable;
        function approve(address token, address spender, uint256 amount) external payable;
        function deposit(address silo, uint256 amount, uint8 collateralType) external payable returns (uint256 shares);
        function multicall(bytes[] calldata data) external payable returns (bytes[] memory results);
    }
}

sol! {
    #[allow(missing_docs)]
    contract ISilo {
        function redeem(uint256 shares, address receiver, address owner, uint8 collateralType) external returns (uint256 assets);
        function balanceOf(address account) external view returns (uint256);
    }
}

/// Which isolated position a silo deposit or redemption targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollateralType {
    /// Non-borrowable collateral.
    Protected,
    /// Borrowable collateral that earns interest.
    #[default]
    Collateral,
}

impl CollateralType {
    pub fn as_u8(self) -> u8 {
        match self {
            CollateralType::Protected => 0,
            CollateralType::Collateral => 1,
        }
    }
}

// ── Contract roles ──────────────────────────────────────────────────

/// Router whose `multicall` takes raw encoded calls.
#[derive(Debug, Clone, Copy)]
pub struct SiloRouter {
    pub address: Address,
}

impl SiloRouter {
    pub fn new(address: Address) -> Self {
        SiloRouter { address }
    }

    /// Wrap already-checked blobs into one `multicall` step, order preserved.
    pub fn multicall(&self, calls: Vec<CalldataBlob>) -> TransactionStep {
        let data: Vec<Bytes> = calls.into_iter().map(|c| c.data).collect();
        TransactionStep::call(self.address, ISiloRouter::multicallCall { data })
    }
}

/// A silo market and the share token that represents the position in it.
#[derive(Debug, Clone, Copy)]
pub struct SiloVault {
    pub address: Address,
    /// ERC20 holding the account's shares. The silo itself for `Collateral`.
    pub share_token: Address,
    pub collateral: CollateralType,
}

impl SiloVault {
    pub fn new(address: Address, collateral: CollateralType) -> Self {
        SiloVault {
            address,
            share_token: address,
            collateral,
        }
    }

    pub fn with_share_token(mut self, share_token: Address) -> Self {
        self.share_token = share_token;
        self
    }

    pub fn redeem(&self, shares: U256, receiver: Address, owner: Address) -> TransactionStep {
        TransactionStep::call(
            self.address,
            ISilo::redeemCall {
                shares,
                receiver,
                owner,
                collateralType: self.collateral.as_u8(),
            },
        )
    }

    pub async fn share_balance(&self, reader: &dyn ContractReader, account: Address) -> Result<U256> {
        read_call(
            reader,
            self.share_token,
            ISilo::balanceOfCall { account },
            "silo share balanceOf",
        )
        .await
    }
}

// ── Silo Lending (router adapter) ───────────────────────────────────

/// Deposits through the router's multicall; withdraws by redeeming every
/// share the account holds.
pub struct SiloLending {
    wallet: Arc<dyn Wallet>,
    assembler: Arc<TransactionAssembler>,
    router: SiloRouter,
    silo: SiloVault,
    token: TokenHandle,
}

impl SiloLending {
    pub fn new(
        wallet: Arc<dyn Wallet>,
        assembler: Arc<TransactionAssembler>,
        router: SiloRouter,
        silo: SiloVault,
        token: TokenHandle,
    ) -> Self {
        SiloLending {
            wallet,
            assembler,
            router,
            silo,
            token,
        }
    }
}

#[async_trait]
impl Venue for SiloLending {
    fn name(&self) -> &str {
        "silo"
    }

    fn withdraw_mode(&self) -> WithdrawMode {
        WithdrawMode::FullBalance
    }

    async fn deposit(&self, amount: &Amount) -> Result<ExecutionResult> {
        println!(
            "  SILO DEPOSIT: {} {} to silo {} via router {}",
            amount,
            self.token.symbol,
            evm::short_addr(&self.silo.address),
            evm::short_addr(&self.router.address),
        );

        let batch = self
            .assembler
            .deposit_to_router(&self.router, &self.silo, &self.token, amount)
            .await?;
        let tx_hash = self.wallet.send_batch(&batch).await?;
        println!("  SILO: approve + multicall tx: {tx_hash}");
        tracing::info!(%tx_hash, steps = batch.len(), "silo deposit confirmed");

        Ok(ExecutionResult::Submitted {
            tx_hash,
            steps: batch.len(),
        })
    }

    async fn withdraw(&self, requested: &Amount) -> Result<ExecutionResult> {
        let Some(redemption) = self.assembler.redeem_from_silo(&self.silo).await? else {
            println!(
                "  SILO WITHDRAW: no shares in silo {}, nothing to redeem",
                evm::short_addr(&self.silo.address)
            );
            return Ok(ExecutionResult::Noop);
        };

        // The position can only be exited whole; a partial request is informational.
        println!(
            "  SILO WITHDRAW: redeeming all {} shares from silo {} (requested {} {})",
            redemption.shares,
            evm::short_addr(&self.silo.address),
            requested,
            self.token.symbol,
        );

        let tx_hash = self.wallet.send_transaction(&redemption.step).await?;
        println!("  SILO: redeem tx: {tx_hash}");
        tracing::info!(%tx_hash, "silo redeem confirmed");

        Ok(ExecutionResult::Submitted { tx_hash, steps: 1 })
    }
}
