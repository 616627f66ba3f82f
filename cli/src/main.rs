//! Local Beach CLI - Flow and Neos development environments

use std::process::ExitCode;

use beach_cli::cli::Cli;
use beach_cli::domain::ReadinessError;
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Exit status when a container did not become healthy in time.
const TIMEOUT_EXIT_CODE: u8 = 3;

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            if e.downcast_ref::<ReadinessError>()
                .is_some_and(|e| matches!(e, ReadinessError::Timeout { .. }))
            {
                return ExitCode::from(TIMEOUT_EXIT_CODE);
            }
            ExitCode::FAILURE
        }
    }
}
