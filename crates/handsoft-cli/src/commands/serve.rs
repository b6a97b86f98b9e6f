//! `handsoft serve`: run the HTTP API in the foreground.

use clap::Args;
use tracing::info;

use handsoft_core::config::AppConfig;
use handsoft_core::error::AppError;
use handsoft_database::migration::run_migrations;

use crate::output;

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Listen port, overriding `server.port`
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Bind address, overriding `server.host`
    #[arg(long)]
    pub host: Option<String>,

    /// Start without applying pending migrations
    #[arg(long)]
    pub no_migrate: bool,
}

impl ServeArgs {
    /// Fold command-line overrides into the loaded configuration.
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(host) = &self.host {
            config.server.host.clone_from(host);
        }
    }
}

pub async fn execute(args: &ServeArgs, mut config: AppConfig) -> Result<(), AppError> {
    args.apply(&mut config);

    output::print_fields(&[
        ("listen", config.server.bind_address()),
        ("migrations", if args.no_migrate { "skipped" } else { "apply" }.to_string()),
    ]);

    let pool = super::create_db_pool(&config).await?;
    if args.no_migrate {
        info!("Skipping migrations at operator request");
    } else {
        run_migrations(&pool).await?;
    }

    handsoft_api::run_server(config, pool).await
}
