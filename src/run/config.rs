use std::time::Duration;

use alloy::primitives::Address;
use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

use crate::model::{Amount, Chain, TokenHandle};
use crate::venues::lending::{CollateralType, SiloVault};
use crate::venues::units::DEFAULT_FALLBACK_DECIMALS;

/// Env var holding the smart account owner's hex private key.
pub const PRIVATE_KEY_ENV: &str = "FUND_ROTATOR_PRIVATE_KEY";

/// Rotation parameters, loaded once from JSON and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotationConfig {
    pub chain: Chain,
    /// Smart account that holds the funds and executes batches.
    pub smart_account: Address,
    /// Stable token being rotated.
    pub token: TokenHandle,
    pub aave: AaveConfig,
    pub silo: SiloConfig,
    /// Amount moved each cycle, in human units (e.g. "100" or "2.5").
    pub amount: Amount,
    pub cycles: u32,
    /// Seconds to hold each position before the next transition.
    pub hold_secs: u64,
    /// Precision assumed when the token's `decimals()` read fails.
    #[serde(default = "default_fallback_decimals")]
    pub fallback_decimals: u8,
    /// Redeem the silo position after the final cycle.
    #[serde(default)]
    pub unwind_on_complete: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AaveConfig {
    pub pool: Address,
    #[serde(default)]
    pub referral_code: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiloConfig {
    pub router: Address,
    pub silo: Address,
    /// Share token to read the position from. Defaults to the silo itself,
    /// which only holds collateral shares, so `protected` must set it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_token: Option<Address>,
    #[serde(default)]
    pub collateral: CollateralType,
}

fn default_fallback_decimals() -> u8 {
    DEFAULT_FALLBACK_DECIMALS
}

impl SiloConfig {
    pub fn vault(&self) -> SiloVault {
        let vault = SiloVault::new(self.silo, self.collateral);
        match self.share_token {
            Some(share_token) => vault.with_share_token(share_token),
            None => vault,
        }
    }
}

impl RotationConfig {
    pub fn hold(&self) -> Duration {
        Duration::from_secs(self.hold_secs)
    }
}

/// Runtime configuration for the `run` command.
pub struct RuntimeConfig {
    pub rotation: RotationConfig,
    /// Absent only in dry-run mode.
    pub private_key: Option<String>,
    pub dry_run: bool,
}

impl RuntimeConfig {
    pub fn from_cli(cli: &crate::run::RunConfig) -> Result<Self> {
        let mut rotation = crate::validate::load_and_validate(&cli.config).map_err(|errors| {
            let msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            anyhow::anyhow!("Config validation failed:\n  {}", msgs.join("\n  "))
        })?;

        if let Some(cycles) = cli.cycles {
            rotation.cycles = cycles;
        }
        if let Some(hold_secs) = cli.hold_secs {
            rotation.hold_secs = hold_secs;
        }
        if let Some(amount) = &cli.amount {
            rotation.amount = amount.parse()?;
        }
        // Overrides go through the same checks as the file.
        crate::validate::validate(&rotation).map_err(|errors| {
            let msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            anyhow::anyhow!("Invalid overrides:\n  {}", msgs.join("\n  "))
        })?;

        let private_key = std::env::var(PRIVATE_KEY_ENV).ok();
        if private_key.is_none() && !cli.dry_run {
            bail!(
                "{PRIVATE_KEY_ENV} env var not set. \
                 Set it to the smart account owner's hex private key, or pass --dry-run."
            );
        }

        Ok(RuntimeConfig {
            rotation,
            private_key,
            dry_run: cli.dry_run,
        })
    }
}
