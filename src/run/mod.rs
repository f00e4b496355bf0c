pub mod config;
pub mod scheduler;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::venues::assembler::TransactionAssembler;
use crate::venues::evm;
use crate::venues::lending::{AaveLending, LendingPool, SiloLending, SiloRouter};
use crate::venues::smart_account::{RpcReader, SmartAccountWallet};
use crate::venues::wallet::{ContractReader, DryRunWallet, Wallet};

use config::{RotationConfig, RuntimeConfig};
use scheduler::{RotationReport, RotationScheduler};

/// CLI-facing config struct (before env var resolution).
pub struct RunConfig {
    pub config: PathBuf,
    pub dry_run: bool,
    pub cycles: Option<u32>,
    pub hold_secs: Option<u64>,
    pub amount: Option<String>,
}

/// Entry point for the `run` command.
pub fn run(cli_config: &RunConfig) -> Result<()> {
    let config = RuntimeConfig::from_cli(cli_config)?;
    let rotation = &config.rotation;

    println!("=== fund-rotator run ===");
    println!("Chain:    {} ({})", rotation.chain, rotation.chain.chain_id());
    println!("Account:  {:?}", rotation.smart_account);
    println!("Amount:   {} {}", rotation.amount, rotation.token.symbol);
    println!("Cycles:   {}", rotation.cycles);
    println!("Hold:     {}s", rotation.hold_secs);
    println!("Aave:     {}", evm::short_addr(&rotation.aave.pool));
    println!(
        "Silo:     {} via router {}",
        evm::short_addr(&rotation.silo.silo),
        evm::short_addr(&rotation.silo.router)
    );
    println!("Dry run:  {}", config.dry_run);
    println!();

    let rt = tokio::runtime::Runtime::new().context("creating tokio runtime")?;
    rt.block_on(run_async(config))
}

async fn run_async(config: RuntimeConfig) -> Result<()> {
    let rotation = &config.rotation;
    let reader: Arc<dyn ContractReader> = Arc::new(RpcReader::connect(&rotation.chain)?);

    let wallet: Arc<dyn Wallet> = match (&config.private_key, config.dry_run) {
        (Some(key), false) => Arc::new(
            SmartAccountWallet::connect(&rotation.chain, key, rotation.smart_account)
                .await
                .context("connecting smart account")?,
        ),
        _ => Arc::new(DryRunWallet::new(rotation.smart_account)),
    };

    let mut scheduler = build_scheduler(rotation, wallet, reader);
    let report = scheduler.run().await.context("rotation aborted")?;

    print_report(&report);
    Ok(())
}

/// Wire both venues over a shared wallet, reader and assembler.
pub fn build_scheduler(
    rotation: &RotationConfig,
    wallet: Arc<dyn Wallet>,
    reader: Arc<dyn ContractReader>,
) -> RotationScheduler {
    let assembler = Arc::new(TransactionAssembler::new(
        wallet.account(),
        reader,
        rotation.fallback_decimals,
    ));
    let token = rotation.token.clone();

    let aave = AaveLending::new(
        wallet.clone(),
        assembler.clone(),
        LendingPool::new(rotation.aave.pool),
        token.clone(),
    )
    .with_referral_code(rotation.aave.referral_code);

    let silo = SiloLending::new(
        wallet,
        assembler,
        SiloRouter::new(rotation.silo.router),
        rotation.silo.vault(),
        token,
    );

    RotationScheduler::new(
        Box::new(aave),
        Box::new(silo),
        rotation.amount.clone(),
        rotation.cycles,
        rotation.hold(),
    )
    .with_unwind_on_complete(rotation.unwind_on_complete)
}

fn print_report(report: &RotationReport) {
    println!();
    println!("── Rotation complete: {} cycle(s) ──", report.cycles_completed);
    for step in &report.steps {
        let tx = match step.tx_hash() {
            Some(hash) => hash.to_string(),
            None => "no-op".to_string(),
        };
        println!(
            "  cycle {:>3}  {:<16} {:<6} {}",
            step.cycle + 1,
            step.phase.to_string(),
            step.venue,
            tx
        );
    }
}
