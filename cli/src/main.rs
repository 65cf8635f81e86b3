mod cli;
mod client;
mod commands;

use anyhow::Result;
use clap::{error::ErrorKind, CommandFactory, Parser};
use filectl_core::select::SelectionError;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::{cli::Args, client::FilesClient};

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // A missing .env is fine; the environment may already carry the key.
    dotenvy::dotenv().ok();
    init_tracing();

    let args = Args::parse();
    let client = FilesClient::new(&args.base_url, &args.api_key, args.page_size)?;

    let stdout = std::io::stdout();
    let result = commands::execute(&args, &client, &mut stdout.lock()).await;
    if let Err(error) = &result {
        if let Some(usage) = error.downcast_ref::<SelectionError>() {
            let kind = match usage {
                SelectionError::ModeCount(_) => ErrorKind::ArgumentConflict,
                SelectionError::InvalidPattern(_) => ErrorKind::ValueValidation,
            };
            Args::command().error(kind, usage).exit()
        }
    }
    result
}
