//! Database migration management commands.

use clap::{Args, Subcommand};

use crate::output;
use handsoft_core::config::AppConfig;
use handsoft_core::error::AppError;
use handsoft_database::DatabasePool;

/// Arguments for the migrate command
#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Migration subcommand
    #[command(subcommand)]
    pub command: MigrateCommand,
}

/// Migration subcommands
#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Run all pending migrations
    Run,
    /// Check that the database is reachable
    Ping,
}

/// Execute migration commands
pub async fn execute(args: &MigrateArgs, config: &AppConfig) -> Result<(), AppError> {
    let db = DatabasePool::connect(&config.database).await?;

    match &args.command {
        MigrateCommand::Run => {
            println!("Running database migrations...");
            handsoft_database::migration::run_migrations(db.pool()).await?;
            output::Notice::Done.emit("All migrations applied successfully.");
        }
        MigrateCommand::Ping => {
            db.ping().await?;
            output::Notice::Done.emit("Database is reachable.");
        }
    }

    db.close().await;
    Ok(())
}
