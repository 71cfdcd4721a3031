mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use acslink_core::{DeviceService, VendorRegistry};

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    init_tracing(cli.global.verbose);

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(mut cli: Cli) -> Result<(), CliError> {
    // Shell completions generation needs no config
    if let Command::Completions(ref args) = cli.command {
        use clap::CommandFactory;
        use clap_complete::generate;

        let mut cmd = Cli::command();
        generate(args.shell, &mut cmd, "acslink", &mut std::io::stdout());
        return Ok(());
    }

    let cfg = config::load(&cli.global)?;
    cli.global.output = config::output_format(&cli.global, &cfg)?;

    match cli.command {
        // The registry only needs the config file, not an ACS
        Command::Vendors => {
            let registry = VendorRegistry::with_vendors(cfg.vendor_descriptors()?)?;
            commands::vendors::handle(&registry, &cli.global)
        }

        // All other commands talk to the ACS
        cmd => {
            let acs_config = config::build_acs_config(&cli.global, &cfg)?;
            tracing::debug!(url = %acs_config.url, tls = ?acs_config.tls, "using ACS");
            let service = DeviceService::new(acs_config)?;

            commands::dispatch(cmd, &service, &cli.global).await
        }
    }
}
