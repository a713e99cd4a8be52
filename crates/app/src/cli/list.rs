use clap::Args;
use reserva_app::domain::users::models::UserUuid;

use super::{
    ContextArgs,
    output::{OutputFormat, json, reservations_table},
};

#[derive(Debug, Args)]
pub(crate) struct ListArgs {
    #[command(flatten)]
    context: ContextArgs,

    /// User whose reservations are listed
    #[arg(long)]
    user: UserUuid,

    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
}

pub(crate) async fn run(args: ListArgs) -> Result<(), String> {
    let app = args.context.connect().await?;

    let reservations = app
        .reservations
        .get_reservations_by_user(args.user)
        .await
        .map_err(|error| format!("failed to list reservations: {error}"))?;

    if reservations.is_empty() && args.format == OutputFormat::Table {
        println!("no reservations found for user {}", args.user);
        return Ok(());
    }

    let rendered = match args.format {
        OutputFormat::Table => reservations_table(&reservations, &app.policy.time_zone),
        OutputFormat::Json => json(&reservations)?,
    };

    println!("{rendered}");

    Ok(())
}
