// Background entry point: runs the relay, the one context that outlives
// every page view.

use std::sync::Arc;

use anyhow::Result;
use octra_wallet_extension::config::load_config;
use octra_wallet_extension::relay::{InstallReason, ViewOpener};
use octra_wallet_extension::runtime::ExtensionRuntime;
use octra_wallet_extension::storage::MemoryStore;

struct TabOpener {
    expanded_url: String,
}

impl ViewOpener for TabOpener {
    fn open_expanded(&self) {
        tracing::info!("opening expanded view: {}", self.expanded_url);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config_path =
        std::env::var("BACKGROUND_CONFIG").unwrap_or_else(|_| "background.toml".to_string());
    let config = load_config(&config_path)?;

    let store = MemoryStore::shared();
    let opener = Arc::new(TabOpener {
        expanded_url: config.expanded_url,
    });

    // A fresh store is a first install: the expanded view opens once.
    let _runtime = ExtensionRuntime::start(store, opener, InstallReason::Install);

    tracing::info!("background relay running");
    tokio::signal::ctrl_c().await?;
    tracing::info!("shutting down");
    Ok(())
}
