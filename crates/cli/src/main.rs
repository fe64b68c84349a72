//! Civica CLI
//!
//! Runs searches against a SQLite database of Civica records.

mod commands;
mod config;

use std::sync::Arc;

use clap::Parser;
use tracing::info;

use civica_search::SearchEngine;

use crate::config::{CliConfig, Command};

/// Initializes the tracing subscriber, writing to stderr.
fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("civica={},civica_search={}", level, level)));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    match &config.command {
        Command::Search(args) => {
            let repo = commands::open_repository(&config)?;
            let engine = SearchEngine::new(Arc::new(repo), config.engine_config());
            info!(module = %args.module, search_type = %args.search_type, "Running search");

            match commands::search(&engine, args).await {
                Ok(body) => println!("{}", serde_json::to_string_pretty(&body)?),
                Err(err) => {
                    eprintln!("{}", serde_json::to_string_pretty(&commands::error_body(&err))?);
                    std::process::exit(commands::exit_code(&err));
                }
            }
        }
        Command::Import(args) => {
            let repo = commands::open_repository(&config)?;
            let counts = commands::import(&repo, args)?;
            println!("{}", serde_json::to_string_pretty(&counts)?);
        }
        Command::Types(args) => {
            let types = commands::list_types(args.module.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&types)?);
        }
    }

    Ok(())
}

#[cfg(not(feature = "sqlite"))]
compile_error!("The civica CLI requires the 'sqlite' feature");
