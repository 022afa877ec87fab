// Background relay: the one context that is always running.
//
// Receives messages from page contexts over its inbox and rebroadcasts
// state sync to every context, sender included. Delivery is best-effort,
// at-most-once: a send with nobody listening is dropped, never queued or
// retried. Contexts that load later catch up by reading the store.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};

use crate::messages::SyncMessage;

/// Opens the expanded view. The real implementation creates a browser tab;
/// tests record the call.
pub trait ViewOpener: Send + Sync {
    fn open_expanded(&self);
}

/// Why the relay was started, mirroring the install event reason.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InstallReason {
    /// First install: the expanded view is opened once at startup.
    Install,
    /// Ordinary startup of an already-installed extension.
    Startup,
}

/// Fire-and-forget outbound channel handed to each page context. Send
/// returns nothing; a dead relay means the context is shutting down anyway.
pub trait MessageSink: Send + Sync {
    fn send(&self, message: SyncMessage);
}

pub(crate) struct RelayHandle(pub(crate) mpsc::UnboundedSender<SyncMessage>);

impl MessageSink for RelayHandle {
    fn send(&self, message: SyncMessage) {
        let _ = self.0.send(message);
    }
}

pub struct Relay {
    inbox: mpsc::UnboundedReceiver<SyncMessage>,
    outbound: broadcast::Sender<SyncMessage>,
    opener: Arc<dyn ViewOpener>,
}

impl Relay {
    pub fn new(
        inbox: mpsc::UnboundedReceiver<SyncMessage>,
        outbound: broadcast::Sender<SyncMessage>,
        opener: Arc<dyn ViewOpener>,
    ) -> Self {
        Self {
            inbox,
            outbound,
            opener,
        }
    }

    /// Event loop; runs until every inbox sender is dropped.
    pub async fn run(mut self) {
        while let Some(message) = self.inbox.recv().await {
            match message {
                SyncMessage::SyncState(_) | SyncMessage::StorageChanged { .. } => {
                    self.rebroadcast(message);
                }
                SyncMessage::OpenExpanded => {
                    tracing::info!("open-expanded requested");
                    self.opener.open_expanded();
                }
            }
        }
        tracing::debug!("relay inbox closed, shutting down");
    }

    fn rebroadcast(&self, message: SyncMessage) {
        if self.outbound.send(message).is_err() {
            // No context is listening right now; they reload on open.
            tracing::debug!("broadcast dropped, no listeners");
        }
    }
}
