use clap::Args;
use reserva::status::ReservationStatus;

use super::ContextArgs;

#[derive(Debug, Args)]
pub(crate) struct CountArgs {
    #[command(flatten)]
    context: ContextArgs,

    /// Status to count; repeat for several, all statuses when omitted
    #[arg(long)]
    pub status: Vec<ReservationStatus>,
}

pub(crate) async fn run(args: CountArgs) -> Result<(), String> {
    let app = args.context.connect().await?;

    let statuses = if args.status.is_empty() {
        ReservationStatus::ALL.to_vec()
    } else {
        args.status
    };

    let count = app
        .reservations
        .count_reservations(&statuses)
        .await
        .map_err(|error| format!("failed to count reservations: {error}"))?;

    println!("{count}");

    Ok(())
}
