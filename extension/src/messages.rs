// Messages exchanged between extension contexts.
//
// The wire format is a `{"type": ..., "data": ...}` envelope so every
// context agrees on tags, but dispatch is a closed enum: an unhandled
// message kind is a compile error, not a silent drop.

use serde::{Deserialize, Serialize};

use crate::wallet::{Wallet, WalletSet};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum SyncMessage {
    /// Partial state patch, rebroadcast by the relay to every context.
    #[serde(rename = "SYNC_STATE")]
    SyncState(StatePatch),
    /// The persistent store mutated; receivers reload from it. The changed
    /// keys are carried for diagnostics but never applied as a delta.
    #[serde(rename = "STORAGE_CHANGED")]
    StorageChanged { changes: Vec<String> },
    /// Asks the relay to open the expanded view.
    #[serde(rename = "OPEN_EXPANDED")]
    OpenExpanded,
}

/// Partial patch over a context's view state. Only present fields are
/// applied; absent fields leave the receiver's state untouched.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct StatePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallets: Option<WalletSet>,
    #[serde(rename = "activeWallet", skip_serializing_if = "Option::is_none")]
    pub active_wallet: Option<Wallet>,
    #[serde(rename = "isLocked", skip_serializing_if = "Option::is_none")]
    pub is_locked: Option<bool>,
}

impl StatePatch {
    pub fn active_wallet(wallet: Wallet) -> Self {
        Self {
            active_wallet: Some(wallet),
            ..Self::default()
        }
    }

    pub fn wallets(wallets: WalletSet) -> Self {
        Self {
            wallets: Some(wallets),
            ..Self::default()
        }
    }

    pub fn locked(is_locked: bool) -> Self {
        Self {
            is_locked: Some(is_locked),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sync_state_uses_tagged_envelope() {
        let msg = SyncMessage::SyncState(StatePatch::active_wallet(Wallet::new("oct1abc")));
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains(r#""type":"SYNC_STATE""#), "{json}");
        assert!(json.contains(r#""activeWallet""#), "{json}");
        // Absent patch fields stay off the wire entirely.
        assert!(!json.contains("wallets"), "{json}");
        assert!(!json.contains("isLocked"), "{json}");
    }

    #[test]
    fn open_expanded_is_tag_only() {
        let json = serde_json::to_string(&SyncMessage::OpenExpanded).unwrap();
        assert_eq!(json, r#"{"type":"OPEN_EXPANDED"}"#);
    }

    #[test]
    fn storage_changed_round_trips() {
        let msg = SyncMessage::StorageChanged {
            changes: vec!["wallets".into()],
        };
        let json = serde_json::to_string(&msg).unwrap();
        let back: SyncMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, msg);
    }
}
