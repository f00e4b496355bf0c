use std::sync::Arc;

use alloy::primitives::{Address, U256};

use crate::error::{Result, RotationError};
use crate::model::amount::format_base_units;
use crate::model::{Amount, TokenHandle};
use crate::venues::evm::TokenContract;
use crate::venues::units::UnitConverter;
use crate::venues::wallet::ContractReader;

/// Outcome of comparing an account balance against a required amount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceCheck {
    pub required: U256,
    pub available: U256,
    pub decimals: u8,
}

impl BalanceCheck {
    pub fn is_sufficient(&self) -> bool {
        self.available >= self.required
    }

    pub fn shortfall(&self) -> U256 {
        self.required.saturating_sub(self.available)
    }

    /// Shortfall in human units, e.g. "0.5".
    pub fn shortfall_display(&self) -> String {
        format_base_units(self.shortfall(), self.decimals)
    }
}

/// Asserts the account holds enough of a token before capital moves.
#[derive(Clone)]
pub struct BalanceGuard {
    units: UnitConverter,
    reader: Arc<dyn ContractReader>,
}

impl BalanceGuard {
    pub fn new(units: UnitConverter, reader: Arc<dyn ContractReader>) -> Self {
        BalanceGuard { units, reader }
    }

    /// Convert `amount` and read the account's balance. A failed balance read
    /// is an error, never an implicit "insufficient".
    pub async fn check(
        &self,
        amount: &Amount,
        token: &TokenHandle,
        account: Address,
    ) -> Result<BalanceCheck> {
        let decimals = self.units.resolve_decimals(token).await;
        let required = amount.to_base_units(decimals)?;
        let available = TokenContract::new(token.address)
            .balance_of(self.reader.as_ref(), account)
            .await?;
        Ok(BalanceCheck {
            required,
            available,
            decimals,
        })
    }

    pub async fn has_sufficient_balance(
        &self,
        amount: &Amount,
        token: &TokenHandle,
        account: Address,
    ) -> Result<bool> {
        Ok(self.check(amount, token, account).await?.is_sufficient())
    }

    /// Like [`has_sufficient_balance`](Self::has_sufficient_balance) but fails
    /// with `InsufficientFunds` carrying the shortfall.
    pub async fn check_before_deposit(
        &self,
        amount: &Amount,
        token: &TokenHandle,
        account: Address,
    ) -> Result<BalanceCheck> {
        let check = self.check(amount, token, account).await?;
        if !check.is_sufficient() {
            return Err(RotationError::InsufficientFunds {
                token: token.symbol.clone(),
                required: format_base_units(check.required, check.decimals),
                available: format_base_units(check.available, check.decimals),
                shortfall: check.shortfall_display(),
            });
        }
        Ok(check)
    }
}
