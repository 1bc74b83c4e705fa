//! helixis - a command-line multitool for everyday developer chores.

use std::process::ExitCode;

use clap::Parser;
use helixis_core::HelixisError;
use helixis_core::config::Config;

mod cli;
mod logging;
mod output;

use cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            output::print_error(&e);
            let code = e
                .downcast_ref::<HelixisError>()
                .map_or(1, HelixisError::exit_code);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    logging::init(cli.verbose, &config.log);
    tracing::debug!(?config, "loaded configuration");

    cli::run(cli, config).await
}
