// Persistent store shared by every extension context.
//
// The contract mirrors `chrome.storage.local`: asynchronous string
// key/value access with no transactions and no compare-and-swap. Callers
// tolerate last-writer-wins; convergence comes from reload-on-signal, not
// from locking.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::{broadcast, Mutex};

/// Store keys owned by the wallet core.
pub mod keys {
    /// Serialized [`WalletSet`](crate::wallet::WalletSet).
    pub const WALLETS: &str = "wallets";
    /// Address of the active wallet.
    pub const ACTIVE_WALLET_ID: &str = "activeWalletId";
    /// `"true"` / `"false"` lock flag. Any value other than the exact
    /// string `"false"` counts as locked whenever a password hash exists.
    pub const IS_WALLET_LOCKED: &str = "isWalletLocked";
    /// Opaque password hash, owned by the unlock collaborator.
    pub const WALLET_PASSWORD_HASH: &str = "walletPasswordHash";
}

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;
}

/// Emitted for every store mutation, from any context. Carries no diff:
/// consumers reload full state rather than apply a delta.
#[derive(Clone, Debug)]
pub struct StorageChange {
    pub key: String,
}

/// In-process store backing all contexts. An `Arc<MemoryStore>` is the
/// shared `local` namespace; mutation events fan out through a broadcast
/// channel the observer subscribes to.
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    changes: broadcast::Sender<StorageChange>,
}

impl MemoryStore {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(64);
        Self {
            entries: Mutex::new(HashMap::new()),
            changes,
        }
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    pub fn subscribe_changes(&self) -> broadcast::Receiver<StorageChange> {
        self.changes.subscribe()
    }

    fn notify(&self, key: &str) {
        // No subscriber yet is fine; a context that loads later reads the
        // store directly.
        let _ = self.changes.send(StorageChange {
            key: key.to_string(),
        });
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        self.notify(key);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let removed = self.entries.lock().await.remove(key);
        if removed.is_some() {
            self.notify(key);
        }
        Ok(())
    }
}
