//! Sweeper Config

use std::time::Duration;

use clap::Args;
use reserva_app::domain::reservations::sweeper::DEFAULT_SWEEP_INTERVAL;

/// Scheduled sweep settings.
#[derive(Debug, Args)]
pub(crate) struct SweeperConfig {
    /// Seconds between scheduled sweeps
    #[arg(
        long,
        env = "SWEEP_INTERVAL_SECONDS",
        default_value_t = DEFAULT_SWEEP_INTERVAL.as_secs(),
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub sweep_interval_seconds: u64,
}

impl SweeperConfig {
    pub(crate) fn interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_seconds)
    }
}
