use alloy::primitives::address;

use crate::model::{Chain, TokenHandle};
use crate::run::config::{AaveConfig, RotationConfig, SiloConfig};
use crate::venues::lending::CollateralType;
use crate::venues::units::DEFAULT_FALLBACK_DECIMALS;

/// An example rotation config. Addresses are placeholders to replace.
pub fn example_config() -> crate::Result<RotationConfig> {
    Ok(RotationConfig {
        chain: Chain::sonic(),
        smart_account: address!("0x1111111111111111111111111111111111111111"),
        token: TokenHandle::new("USDC", address!("0x2222222222222222222222222222222222222222")),
        aave: AaveConfig {
            pool: address!("0x3333333333333333333333333333333333333333"),
            referral_code: 0,
        },
        silo: SiloConfig {
            router: address!("0x4444444444444444444444444444444444444444"),
            silo: address!("0x5555555555555555555555555555555555555555"),
            share_token: None,
            collateral: CollateralType::Collateral,
        },
        amount: "100".parse()?,
        cycles: 3,
        hold_secs: 3600,
        fallback_decimals: DEFAULT_FALLBACK_DECIMALS,
        unwind_on_complete: false,
    })
}

/// Print an example config JSON to stdout.
pub fn run() -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&example_config()?)?);
    Ok(())
}
