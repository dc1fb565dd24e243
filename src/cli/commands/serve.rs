use crate::config::AppConfig;

pub async fn handle(config: &AppConfig, port: Option<u16>) -> anyhow::Result<()> {
    tracing::info!("Starting games catalogue API in {:?} mode", config.environment);
    crate::server::serve(config, port).await
}
