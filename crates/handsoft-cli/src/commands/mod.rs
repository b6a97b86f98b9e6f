//! CLI command definitions and dispatch.

pub mod migrate;
pub mod role;
pub mod seed;
pub mod serve;

use clap::{Parser, Subcommand};
use sqlx::PgPool;

use crate::output::OutputFormat;
use handsoft_core::config::AppConfig;
use handsoft_core::error::AppError;
use handsoft_database::DatabasePool;

/// Handsoft: accounts, access control and warehousing
#[derive(Debug, Parser)]
#[command(name = "handsoft", version, about, long_about = None)]
pub struct Cli {
    /// Base configuration file, without extension
    #[arg(short, long, default_value = "config/default")]
    pub config: String,

    /// Environment overlay loaded from `config/<env>`
    #[arg(long, default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Log verbosity (-v info, -vv debug, -vvv trace); before the command
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    Serve(serve::ServeArgs),
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Insert the default country and roles
    Seed,
    /// Role and permission management
    Role(role::RoleArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let config = AppConfig::load_from(&self.config, &self.env)?;

        match &self.command {
            Commands::Serve(args) => serve::execute(args, config).await,
            Commands::Migrate(args) => migrate::execute(args, &config).await,
            Commands::Seed => seed::execute(&config).await,
            Commands::Role(args) => role::execute(args, &config, self.format).await,
        }
    }
}

/// Connect using `[database]` and hand back the raw pool.
pub async fn create_db_pool(config: &AppConfig) -> Result<PgPool, AppError> {
    let pool = DatabasePool::connect(&config.database).await?;
    Ok(pool.pool().clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_grant_parses() {
        let cli = Cli::try_parse_from([
            "handsoft",
            "role",
            "grant",
            "--role",
            "warehouse_manager",
            "--permission",
            "warehouse:*",
        ])
        .unwrap();

        assert_eq!(cli.config, "config/default");
        assert_eq!(cli.env, "development");
        match cli.command {
            Commands::Role(args) => match args.command {
                role::RoleCommand::Grant { role, permission } => {
                    assert_eq!(role, "warehouse_manager");
                    assert_eq!(permission, "warehouse:*");
                }
                other => panic!("unexpected role command: {other:?}"),
            },
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_serve_overrides_parse() {
        let cli = Cli::try_parse_from([
            "handsoft", "--env", "production", "-f", "json", "serve", "--port", "9000",
        ])
        .unwrap();

        assert_eq!(cli.env, "production");
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.verbose, 0);
        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.port, Some(9000));
                assert!(args.host.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_verbose_is_counted_before_the_command() {
        let cli = Cli::try_parse_from(["handsoft", "-vv", "migrate", "ping"]).unwrap();
        assert_eq!(cli.verbose, 2);

        let cli = Cli::try_parse_from(["handsoft", "-v", "--verbose", "seed"]).unwrap();
        assert_eq!(cli.verbose, 2);

        assert!(Cli::try_parse_from(["handsoft", "migrate", "ping", "-v"]).is_err());
    }

    #[test]
    fn test_serve_args_apply() {
        let cli = Cli::try_parse_from(["handsoft", "serve", "--host", "127.0.0.1"]).unwrap();
        let Commands::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        let mut config = AppConfig {
            server: Default::default(),
            database: handsoft_core::config::DatabaseConfig::with_url("postgres://localhost/unused"),
            auth: Default::default(),
            api_key: Default::default(),
            logging: Default::default(),
        };
        args.apply(&mut config);
        assert_eq!(config.server.bind_address(), "127.0.0.1:8080");
    }

    #[test]
    fn test_unknown_subcommand_is_rejected() {
        assert!(Cli::try_parse_from(["handsoft", "storage", "list"]).is_err());
    }
}
