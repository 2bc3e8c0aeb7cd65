//! Merchant identity and shared request context.

use std::fmt;
use std::sync::{PoisonError, RwLock};

use crate::credential::{BasicCredential, BearerToken};
use crate::environment::{Environment, Payments};

/// Merchant identity, target environment and an optional cached Bearer token.
///
/// Every transaction operation reads the store. When a Bearer token is cached
/// requests use it; otherwise they fall back to Basic authentication with the
/// filiation and token, so Basic-only integrations never need the OAuth
/// exchange.
///
/// The cached token sits behind a lock so a shared store can be updated from
/// any thread, but the slot is last-writer-wins: the store neither refreshes
/// nor checks expiry, and concurrent callers that replace the token race on
/// which one the next request sees.
pub struct Store {
    filiation: String,
    token: String,
    environment: Environment<Payments>,
    auth: RwLock<Option<BearerToken>>,
}

impl Store {
    /// Creates a store bound to the production payments environment.
    #[must_use]
    pub fn new(filiation: impl Into<String>, token: impl Into<String>) -> Self {
        Self::with_environment(filiation, token, Environment::production())
    }

    /// Creates a store bound to an explicit payments environment.
    #[must_use]
    pub fn with_environment(
        filiation: impl Into<String>,
        token: impl Into<String>,
        environment: Environment<Payments>,
    ) -> Self {
        Self {
            filiation: filiation.into(),
            token: token.into(),
            environment,
            auth: RwLock::new(None),
        }
    }

    /// Returns the merchant identifier.
    #[must_use]
    pub fn filiation(&self) -> &str {
        &self.filiation
    }

    /// Returns the merchant secret.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns the payments environment.
    #[must_use]
    pub const fn environment(&self) -> &Environment<Payments> {
        &self.environment
    }

    /// Replaces the payments environment.
    pub fn set_environment(&mut self, environment: Environment<Payments>) {
        self.environment = environment;
    }

    /// Builder-style [`Store::set_environment`].
    #[must_use]
    pub fn with_env(mut self, environment: Environment<Payments>) -> Self {
        self.environment = environment;
        self
    }

    /// Returns a snapshot of the cached Bearer token.
    #[must_use]
    pub fn auth(&self) -> Option<BearerToken> {
        self.auth
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replaces (or clears) the cached Bearer token.
    pub fn set_auth(&self, auth: Option<BearerToken>) {
        *self.auth.write().unwrap_or_else(PoisonError::into_inner) = auth;
    }

    /// Builder-style [`Store::set_auth`].
    #[must_use]
    pub fn with_auth(self, auth: BearerToken) -> Self {
        self.set_auth(Some(auth));
        self
    }

    /// Returns the static credential derived from filiation and token.
    #[must_use]
    pub fn basic_credential(&self) -> BasicCredential {
        BasicCredential::from_store(self)
    }

    /// Returns the `Authorization` header value requests should carry.
    ///
    /// `Bearer <token>` when a token is cached, otherwise
    /// `Basic base64(filiation:token)`.
    #[must_use]
    pub fn authorization_header_value(&self) -> String {
        match self.auth() {
            Some(bearer) => format!("Bearer {}", bearer.token()),
            None => crate::credential::basic_header_value(&self.filiation, &self.token),
        }
    }
}

impl Clone for Store {
    fn clone(&self) -> Self {
        Self {
            filiation: self.filiation.clone(),
            token: self.token.clone(),
            environment: self.environment.clone(),
            auth: RwLock::new(self.auth()),
        }
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("filiation", &self.filiation)
            .field("token", &"***")
            .field("environment", &self.environment)
            .field("has_auth", &self.auth().is_some())
            .finish()
    }
}
