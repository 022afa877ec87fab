// dApp launch-parameter decoding.
//
// A view launched with a query string may carry either a connection
// request or a transaction request from a third-party site. Decoding is a
// pure function over the query: malformed or partial parameters mean "no
// request", and the normal wallet view is shown.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// Capabilities granted by an approved connection. Fixed set today; sites
/// cannot request a subset.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ViewAddress,
    ViewBalance,
    CallMethods,
}

pub const CONNECTION_PERMISSIONS: [Permission; 3] = [
    Permission::ViewAddress,
    Permission::ViewBalance,
    Permission::CallMethods,
];

/// Account-access request. Single-use: consumed on approve or reject.
#[derive(Clone, Debug, PartialEq)]
pub struct ConnectionRequest {
    pub origin: String,
    pub success_url: String,
    pub failure_url: String,
    pub permissions: Vec<Permission>,
    pub app_name: Option<String>,
}

/// Signing request for a `send` action. Same single-use lifecycle.
#[derive(Clone, Debug, PartialEq)]
pub struct TransactionRequest {
    pub to: String,
    pub amount: String,
    pub origin: String,
    pub success_url: String,
    pub failure_url: String,
    pub app_name: Option<String>,
    pub message: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DappRequest {
    Connection(ConnectionRequest),
    Transaction(TransactionRequest),
}

/// Decodes a view's launch query string into at most one request.
///
/// `action=send` selects the transaction branch exclusively: if any of its
/// required fields is missing the whole query is treated as "no request"
/// rather than falling through to a connection request.
pub fn decode_launch_params(query: &str) -> Option<DappRequest> {
    let query = query.strip_prefix('?').unwrap_or(query);
    let mut params: HashMap<String, String> = HashMap::new();
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        // First occurrence wins, like URLSearchParams.get.
        params.entry(key.into_owned()).or_insert(value.into_owned());
    }

    if params.get("action").map(String::as_str) == Some("send") {
        let request = TransactionRequest {
            to: params.get("to")?.clone(),
            amount: params.get("amount")?.clone(),
            origin: params.get("origin")?.clone(),
            success_url: params.get("success_url")?.clone(),
            failure_url: params.get("failure_url")?.clone(),
            app_name: params.get("app_name").cloned(),
            message: params.get("message").cloned(),
        };
        Some(DappRequest::Transaction(request))
    } else if let (Some(success_url), Some(failure_url), Some(origin)) = (
        params.get("success_url"),
        params.get("failure_url"),
        params.get("origin"),
    ) {
        Some(DappRequest::Connection(ConnectionRequest {
            origin: origin.clone(),
            success_url: success_url.clone(),
            failure_url: failure_url.clone(),
            permissions: CONNECTION_PERMISSIONS.to_vec(),
            app_name: params.get("app_name").cloned(),
        }))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_transaction_request() {
        let query = "action=send&to=abc&amount=5&success_url=https%3A%2F%2Fx.test%2Fok\
                     &failure_url=https%3A%2F%2Fx.test%2Ffail&origin=https%3A%2F%2Fdapp.test";
        let Some(DappRequest::Transaction(tx)) = decode_launch_params(query) else {
            panic!("expected a transaction request");
        };
        assert_eq!(tx.to, "abc");
        assert_eq!(tx.amount, "5");
        assert_eq!(tx.success_url, "https://x.test/ok");
        assert_eq!(tx.failure_url, "https://x.test/fail");
        assert_eq!(tx.origin, "https://dapp.test");
        assert_eq!(tx.app_name, None);
        assert_eq!(tx.message, None);
    }

    #[test]
    fn decodes_connection_request_with_fixed_permissions() {
        let query = "success_url=https%3A%2F%2Fx.test%2Fok&failure_url=https%3A%2F%2Fx.test%2Ffail\
                     &origin=https%3A%2F%2Fdapp.test&app_name=My%20dApp";
        let Some(DappRequest::Connection(conn)) = decode_launch_params(query) else {
            panic!("expected a connection request");
        };
        assert_eq!(conn.origin, "https://dapp.test");
        assert_eq!(conn.app_name.as_deref(), Some("My dApp"));
        assert_eq!(conn.permissions, CONNECTION_PERMISSIONS.to_vec());
    }

    #[test]
    fn partial_send_does_not_fall_through_to_connection() {
        // All connection fields present, but action=send is missing `to`.
        let query = "action=send&amount=5&success_url=https%3A%2F%2Fx.test%2Fok\
                     &failure_url=https%3A%2F%2Fx.test%2Ffail&origin=https%3A%2F%2Fdapp.test";
        assert_eq!(decode_launch_params(query), None);
    }

    #[test]
    fn malformed_or_empty_query_is_no_request() {
        assert_eq!(decode_launch_params(""), None);
        assert_eq!(decode_launch_params("?"), None);
        assert_eq!(decode_launch_params("success_url=https%3A%2F%2Fx.test"), None);
        assert_eq!(decode_launch_params("foo=bar&baz=qux"), None);
    }

    #[test]
    fn leading_question_mark_is_accepted() {
        let query = "?origin=o&success_url=s&failure_url=f";
        assert!(matches!(
            decode_launch_params(query),
            Some(DappRequest::Connection(_))
        ));
    }
}
