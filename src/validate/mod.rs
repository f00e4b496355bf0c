use std::path::Path;

use alloy::primitives::Address;
use thiserror::Error;

use crate::run::config::RotationConfig;
use crate::venues::lending::CollateralType;

/// Highest precision a `uint256` can scale a whole unit to.
const MAX_DECIMALS: u8 = 77;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("`{field}` is the zero address")]
    ZeroAddress { field: &'static str },

    #[error("`{a}` and `{b}` point at the same contract {address}")]
    SameAddress {
        a: &'static str,
        b: &'static str,
        address: Address,
    },

    #[error("`cycles` must be at least 1")]
    NoCycles,

    #[error("`amount` must be greater than zero")]
    ZeroAmount,

    #[error("`{field}` = {value} is outside 0..=77")]
    DecimalsOutOfRange { field: &'static str, value: u8 },

    #[error("`amount` has {digits} fractional digits but the pinned token precision is {decimals}")]
    AmountTooPrecise { digits: usize, decimals: u8 },

    #[error("`silo.collateral` is protected but `silo.share_token` is unset; the silo address only tracks collateral shares")]
    ProtectedWithoutShareToken,

    #[error("RPC URL `{url}` must start with http:// or https://")]
    InvalidRpcUrl { url: String },
}

/// Load and fully validate a rotation config from a JSON file.
pub fn load_and_validate(path: &Path) -> Result<RotationConfig, Vec<ConfigError>> {
    let contents = std::fs::read_to_string(path).map_err(|e| vec![ConfigError::Io(e)])?;
    let config: RotationConfig =
        serde_json::from_str(&contents).map_err(|e| vec![ConfigError::Json(e)])?;
    validate(&config)?;
    Ok(config)
}

/// Validate a rotation config, collecting all errors.
pub fn validate(config: &RotationConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let addresses = [
        ("smart_account", config.smart_account),
        ("token.address", config.token.address),
        ("aave.pool", config.aave.pool),
        ("silo.router", config.silo.router),
        ("silo.silo", config.silo.silo),
    ];
    for (field, address) in addresses {
        if address.is_zero() {
            errors.push(ConfigError::ZeroAddress { field });
        }
    }
    for (i, &(a, addr_a)) in addresses.iter().enumerate() {
        for &(b, addr_b) in addresses.iter().skip(i + 1) {
            if !addr_a.is_zero() && addr_a == addr_b {
                errors.push(ConfigError::SameAddress {
                    a,
                    b,
                    address: addr_a,
                });
            }
        }
    }

    if config.silo.collateral == CollateralType::Protected && config.silo.share_token.is_none() {
        errors.push(ConfigError::ProtectedWithoutShareToken);
    }

    if config.cycles == 0 {
        errors.push(ConfigError::NoCycles);
    }
    if config.amount.is_zero() {
        errors.push(ConfigError::ZeroAmount);
    }
    if config.fallback_decimals > MAX_DECIMALS {
        errors.push(ConfigError::DecimalsOutOfRange {
            field: "fallback_decimals",
            value: config.fallback_decimals,
        });
    }
    if let Some(decimals) = config.token.decimals {
        if decimals > MAX_DECIMALS {
            errors.push(ConfigError::DecimalsOutOfRange {
                field: "token.decimals",
                value: decimals,
            });
        } else if config.amount.fraction_digits() > decimals as usize {
            errors.push(ConfigError::AmountTooPrecise {
                digits: config.amount.fraction_digits(),
                decimals,
            });
        }
    }

    let url = config.chain.rpc_url();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        errors.push(ConfigError::InvalidRpcUrl {
            url: url.to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// CLI entry point for the `validate` subcommand.
pub fn run(path: &Path) -> anyhow::Result<()> {
    match load_and_validate(path) {
        Ok(config) => {
            println!(
                "Config is valid. {} {} x {} cycles on {}, hold {}s.",
                config.amount, config.token.symbol, config.cycles, config.chain, config.hold_secs
            );
            Ok(())
        }
        Err(errors) => {
            eprintln!("Validation failed with {} error(s):", errors.len());
            for (i, e) in errors.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, e);
            }
            std::process::exit(1);
        }
    }
}
