use clap::Args;
use reserva_app::domain::users::models::UserUuid;

use super::{
    ContextArgs,
    output::{OutputFormat, json, summary_table},
};

#[derive(Debug, Args)]
pub(crate) struct SummaryArgs {
    #[command(flatten)]
    context: ContextArgs,

    /// User whose reservations are summarised
    #[arg(long)]
    user: UserUuid,

    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
}

pub(crate) async fn run(args: SummaryArgs) -> Result<(), String> {
    let app = args.context.connect().await?;

    let summary = app
        .reservations
        .generate_reservation_summary(args.user)
        .await
        .map_err(|error| format!("failed to summarise reservations: {error}"))?;

    let rendered = match args.format {
        OutputFormat::Table => summary_table(&summary, app.policy.default_currency),
        OutputFormat::Json => json(&summary)?,
    };

    println!("{rendered}");

    Ok(())
}
