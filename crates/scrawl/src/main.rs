//! Binary entry point: load configuration, wire up the store, run the
//! relay. Missing store credentials abort startup with a non-zero exit.

use scrawl::{RelayError, RelayServerBuilder, ServerConfig};
use scrawl_room::RandomGuessPolicy;
use scrawl_store::RestStore;

#[tokio::main]
async fn main() -> Result<(), RelayError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env()?;
    tracing::info!(?config, "configuration loaded");

    let store = RestStore::new(
        config.store_url.clone(),
        config.store_service_key.clone(),
        config.store_timeout,
    )?;

    let server = RelayServerBuilder::new()
        .bind(&config.bind_addr)
        .build(store, RandomGuessPolicy::default())
        .await?;

    tracing::info!(addr = %config.bind_addr, "scrawl relay listening");
    server.run().await
}
