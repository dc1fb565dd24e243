use games_catalogue_api::{config, server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, AUTH_*, etc.
    let _ = dotenvy::dotenv();

    games_catalogue_api::init_tracing();

    let config = config::config();
    tracing::info!("Starting games catalogue API in {:?} mode", config.environment);

    server::serve(config, None).await
}
