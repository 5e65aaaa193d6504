use quickdraw::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::load()?;
    let server = QuickdrawServer::builder().config(&config).build().await?;
    tracing::info!(addr = %server.local_addr()?, "quickdraw server starting");

    let coordinator = server.coordinator();
    tokio::select! {
        result = server.run() => result?,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("interrupt received, shutting down");
            let _ = coordinator.shutdown().await;
        }
    }

    Ok(())
}
