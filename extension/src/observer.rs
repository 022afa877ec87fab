// Storage change observer: turns store mutations into STORAGE_CHANGED
// signals for the relay to rebroadcast.

use tokio::sync::{broadcast, mpsc};

use crate::messages::SyncMessage;
use crate::storage::StorageChange;

pub struct StorageObserver {
    changes: broadcast::Receiver<StorageChange>,
    relay: mpsc::UnboundedSender<SyncMessage>,
}

impl StorageObserver {
    pub fn new(
        changes: broadcast::Receiver<StorageChange>,
        relay: mpsc::UnboundedSender<SyncMessage>,
    ) -> Self {
        Self { changes, relay }
    }

    /// Forwards every observed mutation. The payload names the changed key
    /// but consumers reload full state regardless, so a lagged stream only
    /// skips notifications that a later one supersedes.
    pub async fn run(mut self) {
        loop {
            match self.changes.recv().await {
                Ok(change) => {
                    let _ = self.relay.send(SyncMessage::StorageChanged {
                        changes: vec![change.key],
                    });
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "storage change stream lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
        tracing::debug!("storage change stream closed, observer stopping");
    }
}
