//! Command-line configuration.

use clap::{Args, Parser, Subcommand};

use civica_search::{EngineConfig, SortDirection};

/// Civica command-line configuration.
///
/// Global options can also be set through `CIVICA_*` environment variables.
#[derive(Debug, Clone, Parser)]
#[command(name = "civica")]
#[command(about = "Search Civica records from the command line")]
#[command(version)]
pub struct CliConfig {
    /// SQLite database path, or `:memory:`.
    #[arg(long, env = "CIVICA_DATABASE", default_value = "civica.db", global = true)]
    pub database: String,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "CIVICA_LOG_LEVEL", default_value = "warn", global = true)]
    pub log_level: String,

    /// Page size used when a search has no limit.
    #[arg(long, env = "CIVICA_DEFAULT_LIMIT", default_value = "10", global = true)]
    pub default_limit: u32,

    /// Largest page size a search may ask for.
    #[arg(long, env = "CIVICA_MAX_LIMIT", default_value = "100", global = true)]
    pub max_limit: u32,

    /// The command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run one search and print the result envelope as JSON.
    Search(SearchArgs),
    /// Load records from a JSON file.
    Import(ImportArgs),
    /// List modules and their search types.
    Types(TypesArgs),
}

/// Arguments of `civica search`.
#[derive(Debug, Clone, Args)]
pub struct SearchArgs {
    /// Module key (members, churches, ministries, users, tithes, ministryMembers).
    pub module: String,

    /// Search type token, e.g. `FirstNames` or `BirthDateRange`.
    pub search_type: String,

    /// The search term.
    pub term: String,

    /// Church the caller belongs to; searches default to it.
    #[arg(long, env = "CIVICA_CHURCH")]
    pub church: Option<String>,

    /// Church to search instead of the caller's own.
    #[arg(long)]
    pub scope: Option<String>,

    /// Maximum number of records.
    #[arg(long)]
    pub limit: Option<u32>,

    /// Number of records to skip.
    #[arg(long)]
    pub offset: Option<u32>,

    /// Sort direction (asc or desc).
    #[arg(long, default_value = "asc")]
    pub order: SortDirection,
}

/// Arguments of `civica import`.
#[derive(Debug, Clone, Args)]
pub struct ImportArgs {
    /// JSON file: an object mapping collections to arrays of records, or
    /// a single array when `--collection` is given.
    pub file: std::path::PathBuf,

    /// Target collection for a top-level array.
    #[arg(long)]
    pub collection: Option<String>,
}

/// Arguments of `civica types`.
#[derive(Debug, Clone, Args)]
pub struct TypesArgs {
    /// Only list this module.
    pub module: Option<String>,
}

impl CliConfig {
    /// Builds the engine configuration.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::default()
            .with_default_limit(self.default_limit)
            .with_max_limit(self.max_limit)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.database.trim().is_empty() {
            errors.push("Database path cannot be empty".to_string());
        }

        if let Err(engine_errors) = self.engine_config().validate() {
            errors.extend(engine_errors);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Creates a configuration suitable for testing.
    #[cfg(test)]
    pub fn for_testing(command: Command) -> Self {
        Self {
            database: ":memory:".to_string(),
            log_level: "debug".to_string(),
            default_limit: 10,
            max_limit: 100,
            command,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search() {
        let config = CliConfig::parse_from([
            "civica",
            "--database",
            ":memory:",
            "search",
            "members",
            "Gender",
            "female",
            "--church",
            "c1",
            "--order",
            "desc",
            "--limit",
            "5",
        ]);

        assert_eq!(config.database, ":memory:");
        match config.command {
            Command::Search(args) => {
                assert_eq!(args.module, "members");
                assert_eq!(args.search_type, "Gender");
                assert_eq!(args.church.as_deref(), Some("c1"));
                assert_eq!(args.order, SortDirection::Descending);
                assert_eq!(args.limit, Some(5));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_option_after_subcommand() {
        let config = CliConfig::parse_from(["civica", "types", "--max-limit", "50"]);
        assert_eq!(config.max_limit, 50);
        assert_eq!(config.engine_config().max_limit, 50);
    }

    #[test]
    fn test_validate() {
        let config = CliConfig::for_testing(Command::Types(TypesArgs { module: None }));
        assert!(config.validate().is_ok());

        let mut bad = config.clone();
        bad.database = " ".to_string();
        bad.default_limit = 0;
        let errors = bad.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
