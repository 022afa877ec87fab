// Wallet records and the ordered, address-deduplicated wallet list.
//
// The core never interprets key material: `address` is the identity key,
// `publicKey` is forwarded when present, and every other field a
// collaborator attaches (label, balance cache, ...) rides along untouched.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Wallet {
    pub address: String,
    #[serde(rename = "publicKey", skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
    /// Collaborator-owned fields, stored and broadcast verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl Wallet {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            public_key: None,
            extra: serde_json::Map::new(),
        }
    }

    pub fn with_public_key(address: impl Into<String>, public_key: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            public_key: Some(public_key.into()),
            extra: serde_json::Map::new(),
        }
    }
}

// Wallets are compared by address alone.
impl PartialEq for Wallet {
    fn eq(&self, other: &Self) -> bool {
        self.address == other.address
    }
}

impl Eq for Wallet {}

/// Ordered wallet list. Insertion order is preserved and no two elements
/// share an address.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(transparent)]
pub struct WalletSet(Vec<Wallet>);

impl WalletSet {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Wallet> {
        self.0.iter()
    }

    pub fn first(&self) -> Option<&Wallet> {
        self.0.first()
    }

    pub fn find(&self, address: &str) -> Option<&Wallet> {
        self.0.iter().find(|w| w.address == address)
    }

    pub fn contains(&self, address: &str) -> bool {
        self.find(address).is_some()
    }

    /// Appends `wallet` unless its address is already present.
    /// Returns `false` on a duplicate (the set is unchanged).
    pub fn push(&mut self, wallet: Wallet) -> bool {
        if self.contains(&wallet.address) {
            return false;
        }
        self.0.push(wallet);
        true
    }

    pub fn remove_by_address(&mut self, address: &str) -> Option<Wallet> {
        let position = self.0.iter().position(|w| w.address == address)?;
        Some(self.0.remove(position))
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl From<Vec<Wallet>> for WalletSet {
    fn from(wallets: Vec<Wallet>) -> Self {
        let mut set = WalletSet::new();
        for wallet in wallets {
            set.push(wallet);
        }
        set
    }
}

impl FromIterator<Wallet> for WalletSet {
    fn from_iter<I: IntoIterator<Item = Wallet>>(iter: I) -> Self {
        iter.into_iter().collect::<Vec<_>>().into()
    }
}

/// Tie-break rule shared by cold load and unlock: the active wallet is the
/// set member matching the stored id, else the first element.
pub fn resolve_active(set: &WalletSet, stored_id: Option<&str>) -> Option<Wallet> {
    match stored_id.and_then(|id| set.find(id)) {
        Some(wallet) => Some(wallet.clone()),
        None => set.first().cloned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_abc() -> WalletSet {
        vec![Wallet::new("A"), Wallet::new("B"), Wallet::new("C")].into()
    }

    #[test]
    fn push_rejects_duplicate_address() {
        let mut set = set_abc();
        assert!(!set.push(Wallet::new("B")));
        assert_eq!(set.len(), 3);
        let order: Vec<_> = set.iter().map(|w| w.address.as_str()).collect();
        assert_eq!(order, ["A", "B", "C"]);
    }

    #[test]
    fn remove_drops_exactly_one_entry() {
        let mut set = set_abc();
        assert!(set.remove_by_address("B").is_some());
        assert!(!set.contains("B"));
        assert_eq!(set.len(), 2);
        assert!(set.remove_by_address("B").is_none());
    }

    #[test]
    fn resolve_active_prefers_stored_id() {
        let set = set_abc();
        let active = resolve_active(&set, Some("B")).unwrap();
        assert_eq!(active.address, "B");
    }

    #[test]
    fn resolve_active_falls_back_to_first() {
        let set = set_abc();
        assert_eq!(resolve_active(&set, Some("Z")).unwrap().address, "A");
        assert_eq!(resolve_active(&set, None).unwrap().address, "A");
        assert!(resolve_active(&WalletSet::new(), Some("A")).is_none());
    }

    #[test]
    fn collaborator_fields_survive_round_trip() {
        let json = r#"{"address":"oct1abc","publicKey":"pk1","label":"Main","balance":"12.5"}"#;
        let wallet: Wallet = serde_json::from_str(json).unwrap();
        assert_eq!(wallet.address, "oct1abc");
        assert_eq!(wallet.public_key.as_deref(), Some("pk1"));
        assert_eq!(wallet.extra["label"], "Main");

        let out = serde_json::to_string(&wallet).unwrap();
        let reparsed: Wallet = serde_json::from_str(&out).unwrap();
        assert_eq!(reparsed.extra["balance"], "12.5");
    }
}
