use clap::Args;
use tokio::sync::watch;
use tracing::info;

use crate::{config::sweeper::SweeperConfig, shutdown};

use super::ContextArgs;

#[derive(Debug, Args)]
pub(crate) struct RunArgs {
    #[command(flatten)]
    context: ContextArgs,

    #[command(flatten)]
    sweeper: SweeperConfig,
}

pub(crate) async fn run(args: RunArgs) -> Result<(), String> {
    let app = args.context.connect().await?;

    let (sender, receiver) = watch::channel(false);
    let sweeper = tokio::spawn(app.sweeper.run(args.sweeper.interval(), receiver));

    shutdown::listen(sender)
        .await
        .map_err(|error| format!("failed to listen for shutdown: {error}"))?;

    sweeper
        .await
        .map_err(|error| format!("sweeper task failed: {error}"))?;

    info!("shutdown complete");

    Ok(())
}
