use anyhow::Context;
use serde_json::json;

use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::database::DatabaseManager;

pub async fn handle(config: &AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to the catalogue database")?;
    DatabaseManager::migrate(&pool)
        .await
        .context("failed to apply catalogue schema")?;

    match output_format {
        OutputFormat::Json => println!("{}", json!({"success": true, "migrated": true})),
        OutputFormat::Text => println!("Catalogue schema is up to date"),
    }
    Ok(())
}
