use clap::Parser;

use fund_rotator::{balance, cli, example, logging, run, validate};

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    logging::setup_logging(&cli.log_level, cli.log_json);

    match cli.command {
        cli::Command::Run {
            config,
            dry_run,
            cycles,
            hold_secs,
            amount,
        } => run::run(&run::RunConfig {
            config,
            dry_run,
            cycles,
            hold_secs,
            amount,
        }),
        cli::Command::Validate { config } => validate::run(&config),
        cli::Command::Balance { config } => balance::run(&config),
        cli::Command::Example => example::run(),
    }
}
