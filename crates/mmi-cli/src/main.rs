use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod bulk;
mod cli;
mod commands;
mod output;
mod settings;

use cli::Cli;
use mmi_core::{TaskManager, TaskStore};
use mmi_db::Database;
use settings::Settings;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mmi=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load environment variables
    dotenv::dotenv().ok();

    // Parse CLI arguments
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::print_error(&describe(&err));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut settings = Settings::load(cli.config.as_deref()).context("Failed to load settings")?;
    if let Some(url) = cli.database_url {
        settings.database.url = url;
    }
    tracing::debug!("Using collection {}", settings.database.collection);

    let database = Database::connect(&settings.database)
        .await
        .context("Failed to connect to the database")?;

    let result = async {
        let collection = database.collection(&settings.database.collection).await?;
        let manager = TaskManager::new(TaskStore::new(Arc::new(collection)));
        commands::execute(cli.command, &manager).await
    }
    .await;

    database.close().await;
    result
}

/// Task errors already carry their cause in the message; everything else
/// gets the full context chain.
fn describe(err: &anyhow::Error) -> String {
    match err.downcast_ref::<mmi_core::Error>() {
        Some(mmi_core::Error::Validation(message)) => format!("Invalid task data: {}", message),
        Some(core) => core.to_string(),
        None => format!("{:#}", err),
    }
}
