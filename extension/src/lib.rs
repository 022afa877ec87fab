//! Octra wallet extension core.
//!
//! Several independent contexts (the always-resident background relay, a
//! popup view and an expanded tab view) present one eventually-consistent
//! view of wallet state. The persistent store is the single source of
//! truth; `SYNC_STATE` broadcasts are a best-effort fast path and every
//! context reconciles by re-reading the store on `STORAGE_CHANGED`.
//! Third-party sites drive an authorization handshake through launch
//! query parameters that terminates in a redirect back to the site.

pub mod config;
pub mod controller;
pub mod dapp;
pub mod messages;
pub mod observer;
pub mod redirect;
pub mod relay;
pub mod runtime;
pub mod storage;
pub mod wallet;

pub use controller::{PageController, ViewState};
pub use dapp::{decode_launch_params, ConnectionRequest, DappRequest, TransactionRequest};
pub use messages::{StatePatch, SyncMessage};
pub use redirect::Navigator;
pub use relay::{InstallReason, MessageSink, ViewOpener};
pub use runtime::ExtensionRuntime;
pub use storage::{KeyValueStore, MemoryStore};
pub use wallet::{Wallet, WalletSet};
