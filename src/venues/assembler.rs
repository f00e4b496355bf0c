use std::sync::Arc;

use alloy::primitives::{Address, U256};

use crate::error::{Result, RotationError};
use crate::model::{Amount, CalldataBlob, TokenHandle, TransactionBatch, TransactionStep};
use crate::venues::balance::BalanceGuard;
use crate::venues::calldata::{CalldataEncoder, SiloRouterCalldata};
use crate::venues::evm::TokenContract;
use crate::venues::lending::{LendingPool, SiloRouter, SiloVault};
use crate::venues::units::UnitConverter;
use crate::venues::wallet::ContractReader;

/// A full-position silo exit: the share count read and the redeem step for it.
#[derive(Debug, Clone)]
pub struct Redemption {
    pub shares: U256,
    pub step: TransactionStep,
}

/// Builds the ordered steps for every protocol interaction of the rotation.
///
/// Capital-moving batches run the balance guard first; nothing is returned
/// (and so nothing can be submitted) when it fails.
pub struct TransactionAssembler {
    account: Address,
    units: UnitConverter,
    guard: BalanceGuard,
    reader: Arc<dyn ContractReader>,
    encoder: Arc<dyn CalldataEncoder>,
}

impl TransactionAssembler {
    pub fn new(account: Address, reader: Arc<dyn ContractReader>, fallback_decimals: u8) -> Self {
        let units = UnitConverter::new(reader.clone(), fallback_decimals);
        let guard = BalanceGuard::new(units.clone(), reader.clone());
        TransactionAssembler {
            account,
            units,
            guard,
            reader,
            encoder: Arc::new(SiloRouterCalldata),
        }
    }

    pub fn with_encoder(mut self, encoder: Arc<dyn CalldataEncoder>) -> Self {
        self.encoder = encoder;
        self
    }

    /// `[approve(pool, amount), supply(token, amount, account, referral)]`.
    pub async fn supply_to_pool(
        &self,
        pool: &LendingPool,
        token: &TokenHandle,
        amount: &Amount,
        referral_code: u16,
    ) -> Result<TransactionBatch> {
        let check = self
            .guard
            .check_before_deposit(amount, token, self.account)
            .await?;
        let units = check.required;

        Ok(TransactionBatch::new(
            "aave-supply",
            vec![
                TokenContract::new(token.address).approve(pool.address, units),
                pool.supply(token.address, units, self.account, referral_code),
            ],
        ))
    }

    /// `withdraw(token, amount, account)` as a single call.
    pub async fn withdraw_from_pool(
        &self,
        pool: &LendingPool,
        token: &TokenHandle,
        amount: &Amount,
    ) -> Result<TransactionStep> {
        let units = self.units.to_base_units(amount, token).await?;
        Ok(pool.withdraw(token.address, units, self.account))
    }

    /// `[approve(router, amount), router.multicall([transferFrom, approve, deposit])]`.
    ///
    /// Inner order is fixed: funds reach the router, the router approves the
    /// silo, then the silo pulls and deposits them.
    pub async fn deposit_to_router(
        &self,
        router: &SiloRouter,
        silo: &SiloVault,
        token: &TokenHandle,
        amount: &Amount,
    ) -> Result<TransactionBatch> {
        let check = self
            .guard
            .check_before_deposit(amount, token, self.account)
            .await?;
        let units = check.required;

        let inner = ensure_encoded(vec![
            self.encoder
                .encode_transfer_from(token.address, router.address, units),
            self.encoder
                .encode_approve(token.address, silo.address, units),
            self.encoder
                .encode_deposit(silo.address, units, silo.collateral),
        ])?;

        Ok(TransactionBatch::new(
            "silo-deposit",
            vec![
                TokenContract::new(token.address).approve(router.address, units),
                router.multicall(inner),
            ],
        ))
    }

    /// Redeem the account's entire share balance. `None` when it holds no shares.
    pub async fn redeem_from_silo(&self, silo: &SiloVault) -> Result<Option<Redemption>> {
        let shares = silo
            .share_balance(self.reader.as_ref(), self.account)
            .await?;
        if shares.is_zero() {
            return Ok(None);
        }
        Ok(Some(Redemption {
            shares,
            step: silo.redeem(shares, self.account, self.account),
        }))
    }
}

/// Reject the whole multicall if any inner call failed to encode.
fn ensure_encoded(calls: Vec<CalldataBlob>) -> Result<Vec<CalldataBlob>> {
    if let Some(bad) = calls.iter().find(|c| c.is_empty()) {
        return Err(RotationError::CalldataEncoding {
            call: bad.method.to_string(),
            reason: "encoder returned empty calldata".to_string(),
        });
    }
    Ok(calls)
}
