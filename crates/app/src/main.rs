//! Reserva operator CLI

use std::process;

use crate::cli::Cli;

mod cli;
mod config;
mod observability;
mod shutdown;

#[tokio::main]
pub async fn main() {
    let cli = Cli::load().unwrap_or_else(|error| error.exit());

    if let Err(error) = observability::init_subscriber(&cli.logging) {
        eprintln!("{error}");
        process::exit(1);
    }

    if let Err(message) = cli.run().await {
        eprintln!("{message}");
        process::exit(1);
    }
}
