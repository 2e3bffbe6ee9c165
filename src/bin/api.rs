use scam_agent_interceptor::{api::start_server, Config, Interceptor};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    // Load environment variables
    dotenv::dotenv().ok();

    let config = Config::from_env();

    info!("Scam Agent Interceptor - API Server");
    info!("Port: {}", config.api_port);

    let interceptor = Arc::new(Interceptor::from_config(&config)?);

    info!("Pipeline initialized");

    start_server(interceptor, config.api_port).await?;

    Ok(())
}
