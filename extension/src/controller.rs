// Page controller: one per popup and one per expanded view.
//
// Owns the in-memory mirror of wallet list / active wallet / lock state,
// reconciles it against the persistent store on load and on incoming
// broadcasts, and writes through on every mutation before fanning out a
// sync message. The store is the source of truth; broadcasts are only a
// latency fast path for contexts that are already open.

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::dapp::{ConnectionRequest, DappRequest, TransactionRequest};
use crate::messages::{StatePatch, SyncMessage};
use crate::redirect::{self, Navigator};
use crate::relay::MessageSink;
use crate::storage::{keys, KeyValueStore};
use crate::wallet::{resolve_active, Wallet, WalletSet};

/// In-memory mirror of one context's view of wallet state.
#[derive(Clone, Debug, Default)]
pub struct ViewState {
    pub wallets: WalletSet,
    pub active: Option<Wallet>,
    pub locked: bool,
}

impl ViewState {
    /// Partial merge: each present patch field overwrites, absent fields
    /// are no-ops.
    pub fn apply(&mut self, patch: StatePatch) {
        if let Some(wallets) = patch.wallets {
            self.wallets = wallets;
        }
        if let Some(active) = patch.active_wallet {
            self.active = Some(active);
        }
        if let Some(locked) = patch.is_locked {
            self.locked = locked;
        }
    }
}

pub struct PageController {
    store: Arc<dyn KeyValueStore>,
    sink: Arc<dyn MessageSink>,
    navigator: Arc<dyn Navigator>,
    state: ViewState,
    connection_request: Option<ConnectionRequest>,
    transaction_request: Option<TransactionRequest>,
}

impl PageController {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        sink: Arc<dyn MessageSink>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            store,
            sink,
            navigator,
            state: ViewState::default(),
            connection_request: None,
            transaction_request: None,
        }
    }

    pub fn wallets(&self) -> &WalletSet {
        &self.state.wallets
    }

    pub fn active_wallet(&self) -> Option<&Wallet> {
        self.state.active.as_ref()
    }

    pub fn is_locked(&self) -> bool {
        self.state.locked
    }

    /// Initial load sequence. A store or decode failure is logged and
    /// leaves the context in first-run state rather than crashing.
    pub async fn load(&mut self) {
        if let Err(err) = self.read_stored_state().await {
            tracing::warn!("failed to load wallet data: {err:#}");
        }
    }

    async fn read_stored_state(&mut self) -> Result<()> {
        let locked_flag = self.store.get(keys::IS_WALLET_LOCKED).await?;
        let password = self.store.get(keys::WALLET_PASSWORD_HASH).await?;

        // Locked iff a password exists and the flag is anything but the
        // exact string "false" (including absent or garbage). The wallet
        // list is not read while locked.
        if password.is_some() && locked_flag.as_deref() != Some("false") {
            self.state.locked = true;
            return Ok(());
        }

        let stored_wallets = self.store.get(keys::WALLETS).await?;
        let active_id = self.store.get(keys::ACTIVE_WALLET_ID).await?;

        if let Some(raw) = stored_wallets {
            let wallets: WalletSet =
                serde_json::from_str(&raw).context("stored wallet list is not valid JSON")?;
            self.state.active = resolve_active(&wallets, active_id.as_deref());
            self.state.wallets = wallets;
        }
        Ok(())
    }

    /// Transition out of Locked with the collaborator-decrypted wallet
    /// list. The active wallet is resolved by the same tie-break rule as
    /// cold load.
    pub async fn unlock(&mut self, wallets: Vec<Wallet>) -> Result<()> {
        let wallets = WalletSet::from(wallets);
        self.state.locked = false;
        self.store.set(keys::IS_WALLET_LOCKED, "false").await?;

        let active_id = self.store.get(keys::ACTIVE_WALLET_ID).await?;
        self.state.active = resolve_active(&wallets, active_id.as_deref());
        self.state.wallets = wallets;
        Ok(())
    }

    /// Adds a wallet, or re-selects it if the address is already known.
    /// Only a genuine append persists the wallet list and broadcasts.
    pub async fn add_wallet(&mut self, wallet: Wallet) -> Result<()> {
        if let Some(existing) = self.state.wallets.find(&wallet.address).cloned() {
            self.store
                .set(keys::ACTIVE_WALLET_ID, &existing.address)
                .await?;
            self.state.active = Some(existing);
            return Ok(());
        }

        self.state.wallets.push(wallet.clone());
        self.persist_wallets().await?;
        self.store
            .set(keys::ACTIVE_WALLET_ID, &wallet.address)
            .await?;
        self.state.active = Some(wallet.clone());

        self.sink.send(SyncMessage::SyncState(StatePatch {
            wallets: Some(self.state.wallets.clone()),
            active_wallet: Some(wallet),
            is_locked: None,
        }));
        Ok(())
    }

    /// Selects a wallet as active. Does not re-persist the wallet list.
    pub async fn switch_wallet(&mut self, wallet: Wallet) -> Result<()> {
        self.store
            .set(keys::ACTIVE_WALLET_ID, &wallet.address)
            .await?;
        self.state.active = Some(wallet.clone());

        self.sink
            .send(SyncMessage::SyncState(StatePatch::active_wallet(wallet)));
        Ok(())
    }

    /// Drops a wallet by address. The stored active id is cleared only
    /// when the removed wallet was active and the set became empty.
    pub async fn remove_wallet(&mut self, wallet: &Wallet) -> Result<()> {
        self.state.wallets.remove_by_address(&wallet.address);
        self.persist_wallets().await?;

        let was_active = self
            .state
            .active
            .as_ref()
            .is_some_and(|active| active.address == wallet.address);
        if was_active && self.state.wallets.is_empty() {
            self.state.active = None;
            self.store.remove(keys::ACTIVE_WALLET_ID).await?;
        }

        self.sink.send(SyncMessage::SyncState(StatePatch::wallets(
            self.state.wallets.clone(),
        )));
        Ok(())
    }

    /// Locks the wallet. The in-memory list is cleared but the stored one
    /// is kept: a later unlock recovers it.
    pub async fn disconnect(&mut self) -> Result<()> {
        self.state.active = None;
        self.state.wallets.clear();
        self.state.locked = true;
        self.store.set(keys::IS_WALLET_LOCKED, "true").await?;

        self.sink
            .send(SyncMessage::SyncState(StatePatch::locked(true)));
        Ok(())
    }

    /// Asks the relay to open the expanded view (popup affordance).
    pub fn open_expanded(&self) {
        self.sink.send(SyncMessage::OpenExpanded);
    }

    /// Reacts to a relay broadcast. Self-delivered messages are harmless:
    /// applying our own patch is idempotent.
    pub async fn handle_message(&mut self, message: SyncMessage) {
        match message {
            SyncMessage::SyncState(patch) => self.state.apply(patch),
            SyncMessage::StorageChanged { .. } => {
                // Signal only: discard the mirror and reload from the store.
                self.state = ViewState::default();
                self.load().await;
            }
            SyncMessage::OpenExpanded => {
                // Relay concern, not ours.
            }
        }
    }

    async fn persist_wallets(&self) -> Result<()> {
        let serialized = serde_json::to_string(&self.state.wallets)
            .context("failed to serialize wallet list")?;
        self.store.set(keys::WALLETS, &serialized).await
    }

    // --- dApp authorization -------------------------------------------

    /// Installs the request decoded from this context's launch parameters.
    pub fn present_request(&mut self, request: Option<DappRequest>) {
        match request {
            Some(DappRequest::Connection(req)) => self.connection_request = Some(req),
            Some(DappRequest::Transaction(req)) => self.transaction_request = Some(req),
            None => {}
        }
    }

    pub fn connection_request(&self) -> Option<&ConnectionRequest> {
        self.connection_request.as_ref()
    }

    pub fn transaction_request(&self) -> Option<&TransactionRequest> {
        self.transaction_request.as_ref()
    }

    /// Approves the pending connection with the chosen wallet and
    /// redirects the site. No-op when nothing is pending.
    pub fn approve_connection(&mut self, wallet: &Wallet) {
        let Some(request) = self.connection_request.take() else {
            return;
        };
        match redirect::connection_success_url(&request, wallet) {
            Ok(url) => {
                self.navigator.strip_query();
                self.navigator.navigate(url.as_str());
            }
            Err(err) => {
                tracing::warn!("dropping connection request: {err:#}");
            }
        }
    }

    pub fn reject_connection(&mut self) {
        let Some(request) = self.connection_request.take() else {
            return;
        };
        self.navigator.strip_query();
        self.navigator.navigate(&request.failure_url);
    }

    /// Approves the pending transaction with the hash produced by the
    /// signing collaborator.
    pub fn approve_transaction(&mut self, tx_hash: &str) {
        let Some(request) = self.transaction_request.take() else {
            return;
        };
        match redirect::transaction_success_url(&request, tx_hash) {
            Ok(url) => self.navigator.navigate(url.as_str()),
            Err(err) => {
                tracing::warn!("dropping transaction request: {err:#}");
            }
        }
    }

    pub fn reject_transaction(&mut self) {
        let Some(request) = self.transaction_request.take() else {
            return;
        };
        self.navigator.navigate(&request.failure_url);
    }
}
