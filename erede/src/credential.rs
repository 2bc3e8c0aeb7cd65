//! Authentication credentials.
//!
//! The gateway accepts exactly two schemes, so [`Credential`] is a closed sum
//! type rather than an extensible trait. Both variants project to the value of
//! an HTTP `Authorization` header and nothing else.

use std::fmt;

use base64::prelude::*;
use serde_json::{Map, Value};

use crate::store::Store;

/// Default `token_type` when the token endpoint omits it.
pub const DEFAULT_TOKEN_TYPE: &str = "Bearer";

/// An HTTP authentication credential.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// Static key/secret pair (filiation and token).
    Basic(BasicCredential),
    /// Short-lived OAuth access token.
    Bearer(BearerToken),
}

impl Credential {
    /// Returns the value for the `Authorization` header.
    #[must_use]
    pub fn authorization_header_value(&self) -> String {
        match self {
            Self::Basic(basic) => basic.authorization_header_value(),
            Self::Bearer(bearer) => bearer.authorization_header_value(),
        }
    }
}

impl From<BasicCredential> for Credential {
    fn from(value: BasicCredential) -> Self {
        Self::Basic(value)
    }
}

impl From<BearerToken> for Credential {
    fn from(value: BearerToken) -> Self {
        Self::Bearer(value)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic(basic) => f.debug_tuple("Basic").field(basic).finish(),
            Self::Bearer(bearer) => f.debug_tuple("Bearer").field(bearer).finish(),
        }
    }
}

/// HTTP Basic credential: `Basic base64(username:password)`.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct BasicCredential {
    username: String,
    password: String,
}

impl BasicCredential {
    /// Creates a credential from a username and password.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Creates a credential from the store's filiation and token.
    #[must_use]
    pub fn from_store(store: &Store) -> Self {
        Self::new(store.filiation(), store.token())
    }

    /// Returns the username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the password.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Replaces the username.
    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    /// Replaces the password.
    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    /// Returns the value for the `Authorization` header.
    #[must_use]
    pub fn authorization_header_value(&self) -> String {
        basic_header_value(&self.username, &self.password)
    }
}

impl fmt::Debug for BasicCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicCredential")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Renders `Basic base64(username:password)`.
#[must_use]
pub fn basic_header_value(username: &str, password: &str) -> String {
    let encoded = BASE64_STANDARD.encode(format!("{username}:{password}"));
    format!("Basic {encoded}")
}

/// OAuth access token returned by the credentials API.
///
/// `expires_in` is `None` when the token endpoint did not report a lifetime,
/// which is distinct from `Some(0)`.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken {
    token: String,
    expires_in: Option<u64>,
    token_type: String,
}

impl Default for BearerToken {
    fn default() -> Self {
        Self {
            token: String::new(),
            expires_in: None,
            token_type: DEFAULT_TOKEN_TYPE.to_owned(),
        }
    }
}

impl BearerToken {
    /// Creates a `Bearer` token with no known lifetime.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self::default().with_token(token)
    }

    /// Builds a token from a parsed token-endpoint response.
    ///
    /// Recognizes `token_type`, `access_token` and `expires_in`; every other
    /// key is ignored. Missing or mistyped values fall back to the defaults.
    #[must_use]
    pub fn from_token_response(fields: &Map<String, Value>) -> Self {
        let mut token = Self::default();
        if let Some(Value::String(token_type)) = fields.get("token_type") {
            token.token_type.clone_from(token_type);
        }
        if let Some(Value::String(access_token)) = fields.get("access_token") {
            token.token.clone_from(access_token);
        }
        token.expires_in = fields.get("expires_in").and_then(lifetime_seconds);
        token
    }

    /// Returns the raw access token.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns the lifetime in seconds, if the gateway reported one.
    #[must_use]
    pub const fn expires_in(&self) -> Option<u64> {
        self.expires_in
    }

    /// Returns the token type (`Bearer` unless the gateway said otherwise).
    #[must_use]
    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    /// Replaces the access token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }

    /// Replaces the lifetime.
    #[must_use]
    pub const fn with_expires_in(mut self, expires_in: Option<u64>) -> Self {
        self.expires_in = expires_in;
        self
    }

    /// Replaces the token type.
    #[must_use]
    pub fn with_token_type(mut self, token_type: impl Into<String>) -> Self {
        self.token_type = token_type.into();
        self
    }

    /// Returns the value for the `Authorization` header.
    #[must_use]
    pub fn authorization_header_value(&self) -> String {
        format!("{} {}", self.token_type, self.token)
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerToken")
            .field("token", &crate::redact::mask_token(&self.token))
            .field("expires_in", &self.expires_in)
            .field("token_type", &self.token_type)
            .finish()
    }
}

fn lifetime_seconds(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode_basic(header: &str) -> String {
        let payload = header.strip_prefix("Basic ").unwrap();
        String::from_utf8(BASE64_STANDARD.decode(payload).unwrap()).unwrap()
    }

    #[test]
    fn basic_header_round_trips() {
        let cases = [
            ("filiation", "token"),
            ("", ""),
            ("user:with:colons", "p@ss word"),
            ("ção", "ünïcode"),
        ];
        for (username, password) in cases {
            let header = BasicCredential::new(username, password).authorization_header_value();
            assert_eq!(decode_basic(&header), format!("{username}:{password}"));
        }
    }

    #[test]
    fn empty_basic_credential_encodes_colon() {
        let header = BasicCredential::default().authorization_header_value();
        assert_eq!(header, "Basic Og==");
    }

    #[test]
    fn bearer_defaults() {
        let token = BearerToken::default();
        assert_eq!(token.token_type(), "Bearer");
        assert_eq!(token.token(), "");
        assert_eq!(token.expires_in(), None);
        assert_eq!(token.authorization_header_value(), "Bearer ");
    }

    #[test]
    fn bearer_header_uses_token_type() {
        let token = BearerToken::new("my-access-token");
        assert_eq!(token.authorization_header_value(), "Bearer my-access-token");

        let custom = token.with_token_type("Custom").with_token("custom-token");
        assert_eq!(custom.authorization_header_value(), "Custom custom-token");
    }

    #[test]
    fn bearer_from_full_token_response() {
        let fields = json!({
            "token_type": "Bearer",
            "access_token": "xyz789token",
            "expires_in": 1800,
            "scope": "ignored"
        });
        let token = BearerToken::from_token_response(fields.as_object().unwrap());
        assert_eq!(token.token(), "xyz789token");
        assert_eq!(token.expires_in(), Some(1800));
        assert_eq!(token.token_type(), "Bearer");
    }

    #[test]
    fn bearer_from_partial_token_response() {
        let fields = json!({ "access_token": "partial-token" });
        let token = BearerToken::from_token_response(fields.as_object().unwrap());
        assert_eq!(token.token(), "partial-token");
        assert_eq!(token.token_type(), "Bearer");
        assert_eq!(token.expires_in(), None);

        let zero = json!({ "expires_in": 0 });
        let token = BearerToken::from_token_response(zero.as_object().unwrap());
        assert_eq!(token.expires_in(), Some(0));
    }

    #[test]
    fn credential_enum_delegates() {
        let basic: Credential = BasicCredential::new("a", "b").into();
        let bearer: Credential = BearerToken::new("t").into();
        assert!(basic.authorization_header_value().starts_with("Basic "));
        assert_eq!(bearer.authorization_header_value(), "Bearer t");
    }

    #[test]
    fn debug_output_hides_secrets() {
        let basic = format!("{:?}", BasicCredential::new("merchant", "s3cret"));
        assert!(!basic.contains("s3cret"));
        let bearer = format!("{:?}", BearerToken::new("abcdefghijklmnop"));
        assert!(!bearer.contains("abcdefghijklmnop"));
    }
}
