// Authorization redirect construction.
//
// An approved request redirects the dApp to its `success_url` with result
// parameters appended; a rejection navigates to `failure_url` verbatim,
// never parameterized.

use anyhow::{Context, Result};
use url::Url;

use crate::dapp::{ConnectionRequest, TransactionRequest};
use crate::wallet::Wallet;

/// Navigation seam for the hosting view. The real implementation drives
/// the browser location; tests record what would have happened.
pub trait Navigator: Send + Sync {
    /// Drops the launch query string from the visible address bar.
    fn strip_query(&self);
    /// Points the context at `url`, terminating the current view.
    fn navigate(&self, url: &str);
}

pub fn connection_success_url(request: &ConnectionRequest, wallet: &Wallet) -> Result<Url> {
    let mut url =
        Url::parse(&request.success_url).context("connection success_url is not a valid URL")?;
    url.query_pairs_mut()
        .append_pair("account_id", &wallet.address);
    if let Some(public_key) = &wallet.public_key {
        url.query_pairs_mut().append_pair("public_key", public_key);
    }
    Ok(url)
}

pub fn transaction_success_url(request: &TransactionRequest, tx_hash: &str) -> Result<Url> {
    let mut url =
        Url::parse(&request.success_url).context("transaction success_url is not a valid URL")?;
    url.query_pairs_mut().append_pair("tx_hash", tx_hash);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dapp::CONNECTION_PERMISSIONS;

    fn connection(success_url: &str) -> ConnectionRequest {
        ConnectionRequest {
            origin: "https://dapp.test".into(),
            success_url: success_url.into(),
            failure_url: "https://x.test/fail".into(),
            permissions: CONNECTION_PERMISSIONS.to_vec(),
            app_name: None,
        }
    }

    #[test]
    fn connection_url_carries_account_and_key() {
        let wallet = Wallet::with_public_key("oct1abc", "pk1");
        let url = connection_success_url(&connection("https://x.test/ok"), &wallet).unwrap();
        assert_eq!(url.as_str(), "https://x.test/ok?account_id=oct1abc&public_key=pk1");
    }

    #[test]
    fn public_key_is_omitted_when_absent() {
        let wallet = Wallet::new("oct1abc");
        let url = connection_success_url(&connection("https://x.test/ok"), &wallet).unwrap();
        assert_eq!(url.as_str(), "https://x.test/ok?account_id=oct1abc");
    }

    #[test]
    fn existing_query_parameters_are_preserved() {
        let wallet = Wallet::new("oct1abc");
        let url = connection_success_url(&connection("https://x.test/ok?session=9"), &wallet).unwrap();
        assert_eq!(url.as_str(), "https://x.test/ok?session=9&account_id=oct1abc");
    }

    #[test]
    fn transaction_url_appends_tx_hash() {
        let request = TransactionRequest {
            to: "abc".into(),
            amount: "5".into(),
            origin: "https://dapp.test".into(),
            success_url: "https://x.test/ok".into(),
            failure_url: "https://x.test/fail".into(),
            app_name: None,
            message: None,
        };
        let url = transaction_success_url(&request, "0xdead").unwrap();
        assert_eq!(url.as_str(), "https://x.test/ok?tx_hash=0xdead");
    }

    #[test]
    fn invalid_success_url_is_an_error() {
        let wallet = Wallet::new("oct1abc");
        assert!(connection_success_url(&connection("not a url"), &wallet).is_err());
    }
}
