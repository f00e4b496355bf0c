use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::model::amount::format_base_units;
use crate::run::config::RotationConfig;
use crate::venues::balance::BalanceGuard;
use crate::venues::evm::{self, TokenContract};
use crate::venues::smart_account::RpcReader;
use crate::venues::units::UnitConverter;
use crate::venues::wallet::ContractReader;

/// Entry point for the `balance` command: report holdings and run the guard.
pub fn run(path: &Path) -> Result<()> {
    let config = crate::validate::load_and_validate(path).map_err(|errors| {
        let msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        anyhow::anyhow!("Config validation failed:\n  {}", msgs.join("\n  "))
    })?;

    let rt = tokio::runtime::Runtime::new().context("creating tokio runtime")?;
    rt.block_on(report(&config))
}

async fn report(config: &RotationConfig) -> Result<()> {
    let reader: Arc<dyn ContractReader> = Arc::new(RpcReader::connect(&config.chain)?);
    let units = UnitConverter::new(reader.clone(), config.fallback_decimals);
    let guard = BalanceGuard::new(units.clone(), reader.clone());
    let account = config.smart_account;

    let decimals = units.resolve_decimals(&config.token).await;
    let token_balance = TokenContract::new(config.token.address)
        .balance_of(reader.as_ref(), account)
        .await
        .context("reading token balance")?;

    let silo = config.silo.vault();
    let shares = silo
        .share_balance(reader.as_ref(), account)
        .await
        .context("reading silo shares")?;

    println!("Account {} on {}", evm::short_addr(&account), config.chain);
    println!(
        "  {}: {} ({} decimals)",
        config.token.symbol,
        format_base_units(token_balance, decimals),
        decimals
    );
    println!(
        "  silo shares ({}): {}",
        evm::short_addr(&silo.share_token),
        shares
    );

    let check = guard
        .check(&config.amount, &config.token, account)
        .await
        .context("balance guard")?;
    if check.is_sufficient() {
        println!(
            "  Guard: OK, {} {} available for one cycle",
            config.amount, config.token.symbol
        );
    } else {
        println!(
            "  Guard: SHORT by {} {} (need {})",
            check.shortfall_display(),
            config.token.symbol,
            config.amount
        );
    }
    Ok(())
}
