// Wires the shared store, the storage observer and the relay into one
// running extension process, and hands out per-context endpoints.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};

use crate::messages::SyncMessage;
use crate::observer::StorageObserver;
use crate::relay::{InstallReason, MessageSink, Relay, RelayHandle, ViewOpener};
use crate::storage::{KeyValueStore, MemoryStore};

pub struct ExtensionRuntime {
    store: Arc<MemoryStore>,
    relay_tx: mpsc::UnboundedSender<SyncMessage>,
    outbound: broadcast::Sender<SyncMessage>,
}

impl ExtensionRuntime {
    /// Spawns the observer and relay tasks. On first install the expanded
    /// view is opened before any message is handled.
    pub fn start(
        store: Arc<MemoryStore>,
        opener: Arc<dyn ViewOpener>,
        reason: InstallReason,
    ) -> Self {
        let (relay_tx, relay_rx) = mpsc::unbounded_channel();
        let (outbound, _) = broadcast::channel(64);

        if reason == InstallReason::Install {
            tracing::info!("first install, opening expanded view");
            opener.open_expanded();
        }

        let observer = StorageObserver::new(store.subscribe_changes(), relay_tx.clone());
        tokio::spawn(observer.run());

        let relay = Relay::new(relay_rx, outbound.clone(), opener);
        tokio::spawn(relay.run());

        Self {
            store,
            relay_tx,
            outbound,
        }
    }

    /// The shared `local` namespace every context reads and writes.
    pub fn store(&self) -> Arc<dyn KeyValueStore> {
        self.store.clone()
    }

    /// Outbound endpoint for one page context.
    pub fn sink(&self) -> Arc<dyn MessageSink> {
        Arc::new(RelayHandle(self.relay_tx.clone()))
    }

    /// Inbound broadcast stream for one page context. Subscribing after a
    /// message was sent misses it by design; the context reads the store
    /// on load instead.
    pub fn subscribe(&self) -> broadcast::Receiver<SyncMessage> {
        self.outbound.subscribe()
    }
}
