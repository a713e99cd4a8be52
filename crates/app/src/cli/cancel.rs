use std::slice;

use clap::Args;
use jiff::Timestamp;
use reserva_app::domain::reservations::models::ReservationUuid;

use super::{
    ContextArgs,
    actor::ActorArgs,
    output::{OutputFormat, json, reservations_table},
};

#[derive(Debug, Args)]
pub(crate) struct CancelArgs {
    #[command(flatten)]
    context: ContextArgs,

    /// Reservation to cancel
    #[arg(long)]
    pub reservation: ReservationUuid,

    /// Reason recorded on the reservation
    #[arg(long)]
    pub reason: String,

    #[command(flatten)]
    pub actor: ActorArgs,

    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
}

pub(crate) async fn run(args: CancelArgs) -> Result<(), String> {
    let app = args.context.connect().await?;
    let actor = args.actor.resolve(&app.policy)?;

    let cancelled = app
        .reservations
        .cancel_reservation(args.reservation, args.reason, actor.role, Timestamp::now())
        .await
        .map_err(|error| format!("failed to cancel reservation: {error}"))?;

    let rendered = match args.format {
        OutputFormat::Table => {
            reservations_table(slice::from_ref(&cancelled), &app.policy.time_zone)
        }
        OutputFormat::Json => json(&cancelled)?,
    };

    println!("{rendered}");

    Ok(())
}
