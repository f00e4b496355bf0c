use std::sync::Arc;

use alloy::primitives::U256;

use crate::error::Result;
use crate::model::{Amount, TokenHandle};
use crate::venues::evm::{self, TokenContract};
use crate::venues::wallet::ContractReader;

/// Stable-token precision assumed when `decimals()` can't be read.
pub const DEFAULT_FALLBACK_DECIMALS: u8 = 6;

/// Converts human amounts into a token's integer base units.
#[derive(Clone)]
pub struct UnitConverter {
    reader: Arc<dyn ContractReader>,
    fallback_decimals: u8,
}

impl UnitConverter {
    pub fn new(reader: Arc<dyn ContractReader>, fallback_decimals: u8) -> Self {
        UnitConverter {
            reader,
            fallback_decimals,
        }
    }

    pub fn fallback_decimals(&self) -> u8 {
        self.fallback_decimals
    }

    /// Resolve the token's precision.
    ///
    /// A pinned precision on the handle wins. Otherwise `decimals()` is read on
    /// every call and a failed read degrades to the fallback with a warning.
    pub async fn resolve_decimals(&self, token: &TokenHandle) -> u8 {
        if let Some(decimals) = token.decimals {
            return decimals;
        }
        match TokenContract::new(token.address).decimals(self.reader.as_ref()).await {
            Ok(decimals) => decimals,
            Err(e) => {
                tracing::warn!(
                    token = %token.symbol,
                    address = %evm::short_addr(&token.address),
                    fallback = self.fallback_decimals,
                    error = %e,
                    "decimals() lookup failed, using fallback precision"
                );
                self.fallback_decimals
            }
        }
    }

    pub async fn to_base_units(&self, amount: &Amount, token: &TokenHandle) -> Result<U256> {
        let decimals = self.resolve_decimals(token).await;
        amount.to_base_units(decimals)
    }
}
