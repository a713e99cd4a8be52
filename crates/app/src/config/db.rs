//! Database Config

use clap::Args;

/// Application database settings.
#[derive(Debug, Args)]
pub(crate) struct DatabaseConfig {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: String,
}
