//! Store configuration.
//!
//! A [`StoreConfig`] can be deserialized from any serde source or read from
//! the process environment.
//!
//! # Environment Variables
//!
//! - `EREDE_FILIATION` - Merchant identifier (required)
//! - `EREDE_TOKEN` - Merchant secret (required)
//! - `EREDE_ENVIRONMENT` - `production` or `sandbox` (default: `sandbox`)

use serde::Deserialize;

use crate::environment::{Environment, Target, UnknownTarget};
use crate::store::Store;

/// Variable holding the merchant identifier.
pub const FILIATION_VAR: &str = "EREDE_FILIATION";
/// Variable holding the merchant secret.
pub const TOKEN_VAR: &str = "EREDE_TOKEN";
/// Variable selecting the deployment target.
pub const ENVIRONMENT_VAR: &str = "EREDE_ENVIRONMENT";

/// Errors raised while reading a [`StoreConfig`] from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required variable is unset or empty.
    #[error("environment variable {0} is not set")]
    Missing(&'static str),
    /// The target variable names an unknown environment.
    #[error(transparent)]
    Target(#[from] UnknownTarget),
}

/// Merchant credentials plus deployment target.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct StoreConfig {
    /// Merchant identifier.
    pub filiation: String,
    /// Merchant secret.
    pub token: String,
    /// Deployment target (default: sandbox).
    #[serde(default, alias = "environment")]
    pub target: Target,
}

impl StoreConfig {
    /// Reads `EREDE_FILIATION`, `EREDE_TOKEN` and `EREDE_ENVIRONMENT`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a credential is missing or the target is
    /// not recognized.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the same variables as [`StoreConfig::from_env`] through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a credential is missing or the target is
    /// not recognized.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::Missing(name))
        };
        let target = match lookup(ENVIRONMENT_VAR) {
            Some(value) if !value.trim().is_empty() => value.parse()?,
            _ => Target::default(),
        };
        Ok(Self {
            filiation: required(FILIATION_VAR)?,
            token: required(TOKEN_VAR)?,
            target,
        })
    }

    /// Builds a [`Store`] bound to the configured target's payments
    /// environment.
    #[must_use]
    pub fn into_store(self) -> Store {
        Store::with_environment(
            self.filiation,
            self.token,
            Environment::for_target(self.target),
        )
    }
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("filiation", &self.filiation)
            .field("token", &"***")
            .field("target", &self.target)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_to_sandbox() {
        let config =
            StoreConfig::from_lookup(lookup(&[(FILIATION_VAR, "123"), (TOKEN_VAR, "secret")]))
                .unwrap();
        assert_eq!(config.target, Target::Sandbox);
        assert!(config.into_store().environment().is_sandbox());
    }

    #[test]
    fn reads_production_target() {
        let config = StoreConfig::from_lookup(lookup(&[
            (FILIATION_VAR, "123"),
            (TOKEN_VAR, "secret"),
            (ENVIRONMENT_VAR, "PRODUCTION"),
        ]))
        .unwrap();
        let store = config.into_store();
        assert_eq!(store.environment(), &Environment::production());
        assert_eq!(store.filiation(), "123");
    }

    #[test]
    fn missing_credentials_are_reported() {
        let err = StoreConfig::from_lookup(lookup(&[(TOKEN_VAR, "secret")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(FILIATION_VAR)));

        let err = StoreConfig::from_lookup(lookup(&[(FILIATION_VAR, "1"), (TOKEN_VAR, "")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Missing(TOKEN_VAR)));
    }

    #[test]
    fn unknown_target_is_rejected() {
        let err = StoreConfig::from_lookup(lookup(&[
            (FILIATION_VAR, "1"),
            (TOKEN_VAR, "2"),
            (ENVIRONMENT_VAR, "staging"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Target(_)));
    }

    #[test]
    fn deserializes_with_default_target() {
        let config: StoreConfig =
            serde_json::from_str(r#"{"filiation":"1","token":"2"}"#).unwrap();
        assert_eq!(config.target, Target::Sandbox);

        let config: StoreConfig =
            serde_json::from_str(r#"{"filiation":"1","token":"2","environment":"production"}"#)
                .unwrap();
        assert_eq!(config.target, Target::Production);
    }

    #[test]
    fn debug_hides_token() {
        let config: StoreConfig =
            serde_json::from_str(r#"{"filiation":"1","token":"merchant-secret"}"#).unwrap();
        let rendered = format!("{config:?}");
        assert!(rendered.contains("filiation"));
        assert!(!rendered.contains("merchant-secret"));
    }
}
