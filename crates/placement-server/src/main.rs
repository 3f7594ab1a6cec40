//! placement-server - serves `POST /api/reports/download`

use placement_server::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig::from_env()?;
    log::info!("Starting placement report server...");

    if let Err(e) = placement_server::serve(config).await {
        log::error!("Server error: {}", e);
        return Err(e);
    }
    Ok(())
}
