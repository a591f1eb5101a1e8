use std::process::ExitCode;

use clap::Parser;

use canieat_cli::cli::{Cli, Commands};
use canieat_cli::commands;
use canieat_cli::context;
use canieat_cli::error::CliError;
use canieat_cli::logging;
use canieat_cli::output::OutputWriter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // A broken config file is reported by the command itself; logging falls back to defaults.
    let general = context::load_config(&cli.config)
        .await
        .map(|config| config.general)
        .unwrap_or_default();

    if let Err(e) = logging::init_tracing(&general, cli.log_level.as_deref()) {
        eprintln!("error: {e}");
        return exit_code(&e);
    }

    tracing::debug!(config = %cli.config.display(), "canieat starting");

    let writer = OutputWriter::new(cli.output);
    let result = match cli.command {
        Commands::Scan(args) => commands::scan::execute(args, &cli.config, &writer).await,
        Commands::Profile(args) => commands::profile::execute(args, &cli.config, &writer).await,
        Commands::Allergens(args) => {
            commands::allergens::execute(args, &cli.config, &writer).await
        }
        Commands::Products(args) => commands::products::execute(args, &cli.config, &writer).await,
        Commands::Config(args) => commands::config::execute(args, &cli.config, &writer).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if e.is_verdict() {
                tracing::debug!(code = e.exit_code(), "{e}");
            } else {
                eprintln!("error: {e}");
            }
            exit_code(&e)
        }
    }
}

fn exit_code(e: &CliError) -> ExitCode {
    ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(1))
}
