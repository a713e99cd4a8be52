use std::slice;

use clap::Args;
use jiff::Timestamp;
use reserva_app::domain::{reservations::models::ReservationUuid, users::models::UserUuid};

use super::{
    ContextArgs,
    actor::ActorArgs,
    output::{OutputFormat, json, pass_table, reservations_table},
};

#[derive(Debug, Args)]
pub(crate) struct PassArgs {
    #[command(flatten)]
    context: ContextArgs,

    #[command(flatten)]
    actor: ActorArgs,

    /// Confirmed reservation to issue a pass for
    #[arg(long)]
    reservation: ReservationUuid,

    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
}

#[derive(Debug, Args)]
pub(crate) struct CheckInArgs {
    #[command(flatten)]
    context: ContextArgs,

    #[command(flatten)]
    actor: ActorArgs,

    /// Reservation being checked in
    #[arg(long)]
    reservation: ReservationUuid,

    /// Text content read from the QR code
    #[arg(long)]
    qr: String,

    /// Staff member confirming attendance
    #[arg(long)]
    confirmed_by: UserUuid,

    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
}

pub(crate) async fn run_pass(args: PassArgs) -> Result<(), String> {
    let app = args.context.connect().await?;
    args.actor.resolve(&app.policy)?;

    let pass = app
        .attendance
        .issue_pass(args.reservation, Timestamp::now())
        .await
        .map_err(|error| format!("failed to issue pass: {error}"))?;

    let rendered = match args.format {
        OutputFormat::Table => pass_table(&pass),
        OutputFormat::Json => json(&pass)?,
    };

    println!("{rendered}");

    Ok(())
}

pub(crate) async fn run_check_in(args: CheckInArgs) -> Result<(), String> {
    let app = args.context.connect().await?;
    args.actor.resolve(&app.policy)?;

    let checked_in = app
        .attendance
        .check_in(
            args.reservation,
            args.qr,
            args.confirmed_by,
            Timestamp::now(),
        )
        .await
        .map_err(|error| format!("failed to check in: {error}"))?;

    let rendered = match args.format {
        OutputFormat::Table => {
            reservations_table(slice::from_ref(&checked_in), &app.policy.time_zone)
        }
        OutputFormat::Json => json(&checked_in)?,
    };

    println!("{rendered}");

    Ok(())
}
