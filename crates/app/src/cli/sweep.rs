use clap::Args;
use jiff::Timestamp;

use super::ContextArgs;

#[derive(Debug, Args)]
pub(crate) struct SweepArgs {
    #[command(flatten)]
    context: ContextArgs,
}

pub(crate) async fn run(args: SweepArgs) -> Result<(), String> {
    let app = args.context.connect().await?;

    let cancelled = app.sweeper.trigger(Timestamp::now()).await;

    println!("cancelled {cancelled} expired pending reservation(s)");

    Ok(())
}
