use clap::{Args, Parser, Subcommand};
use reserva_app::context::AppContext;

use crate::config::{db::DatabaseConfig, observability::LoggingConfig, policy::PolicyConfig};

mod actor;
mod attendance;
mod cancel;
mod count;
mod list;
mod output;
mod run;
mod summary;
mod sweep;

#[derive(Debug, Parser)]
#[command(name = "reserva-app", about = "Reserva operator CLI", long_about = None)]
pub(crate) struct Cli {
    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the scheduled sweeper until interrupted
    Run(run::RunArgs),

    /// Cancel expired pending reservations once
    Sweep(sweep::SweepArgs),

    /// Print a user's reservation summary
    Summary(summary::SummaryArgs),

    /// List a user's reservations, latest first
    List(list::ListArgs),

    /// Cancel a reservation
    Cancel(cancel::CancelArgs),

    /// Count reservations by status
    Count(count::CountArgs),

    /// Issue a QR attendance pass
    Pass(attendance::PassArgs),

    /// Record attendance from scanned QR content
    CheckIn(attendance::CheckInArgs),
}

impl Cli {
    /// Load `.env` if present, then parse flags and environment.
    pub(crate) fn load() -> Result<Self, clap::Error> {
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Run(args) => run::run(args).await,
            Commands::Sweep(args) => sweep::run(args).await,
            Commands::Summary(args) => summary::run(args).await,
            Commands::List(args) => list::run(args).await,
            Commands::Cancel(args) => cancel::run(args).await,
            Commands::Count(args) => count::run(args).await,
            Commands::Pass(args) => attendance::run_pass(args).await,
            Commands::CheckIn(args) => attendance::run_check_in(args).await,
        }
    }
}

/// Settings every command needs to reach the services.
#[derive(Debug, Args)]
pub(crate) struct ContextArgs {
    #[command(flatten)]
    database: DatabaseConfig,

    #[command(flatten)]
    policy: PolicyConfig,
}

impl ContextArgs {
    pub(crate) async fn connect(&self) -> Result<AppContext, String> {
        let policy = self
            .policy
            .to_policy()
            .map_err(|error| format!("invalid policy configuration: {error}"))?;

        AppContext::from_database_url(&self.database.database_url, policy)
            .await
            .map_err(|error| format!("failed to initialize app context: {error}"))
    }
}
