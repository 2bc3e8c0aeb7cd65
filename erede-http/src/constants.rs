//! HTTP-specific constants for the e.Rede API.

/// Service path of the OAuth token endpoint (credentials family).
pub const OAUTH_TOKEN_PATH: &str = "oauth2/token";

/// Service path of the transaction collection (payments family).
pub const TRANSACTIONS_PATH: &str = "transactions";

/// Sub-path listing the refunds of a transaction.
pub const REFUNDS_SEGMENT: &str = "refunds";

/// `Accept` value sent with every request.
pub const ACCEPT_JSON: &str = "application/json";

/// `Content-Type` of transaction request bodies.
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf8";

/// `Content-Type` of the OAuth request body.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Header asking the gateway to return the open brand result
/// (`Transaction-Response`, lowercase as header names are stored).
pub const TRANSACTION_RESPONSE_HEADER: &str = "transaction-response";

/// Value of [`TRANSACTION_RESPONSE_HEADER`].
pub const BRAND_RETURN_OPENED: &str = "brand-return-opened";

/// OAuth grant used for the token exchange.
pub const CLIENT_CREDENTIALS_GRANT: &str = "client_credentials";

/// Product token at the start of the `User-Agent` header.
pub const USER_AGENT_PRODUCT: &str = "erede-rust";

/// Builds the `User-Agent` value identifying this client.
///
/// `erede-rust/<version> (<os>; <arch>; filiation <filiation>)`, followed by
/// ` <platform>/<version>` when a platform is given.
#[must_use]
pub fn user_agent(filiation: &str, platform: Option<(&str, &str)>) -> String {
    let mut agent = format!(
        "{USER_AGENT_PRODUCT}/{} ({}; {}; filiation {filiation})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH,
    );
    if let Some((name, version)) = platform.filter(|(n, v)| !n.is_empty() && !v.is_empty()) {
        agent.push_str(&format!(" {name}/{version}"));
    }
    agent
}
