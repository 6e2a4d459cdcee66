//! DXTALLY 服务入口

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dxtally_server::{AppState, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dxtally=info,dxtally_server=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::discover()?;
    if config.token.is_empty() {
        tracing::warn!("no credential token configured; DWG conversion will be rejected");
    }

    let addr = config.bind_addr.clone();
    let state = AppState::new(&config);

    tracing::info!("starting DXTALLY server");
    dxtally_server::start_server(&addr, state).await?;

    Ok(())
}
