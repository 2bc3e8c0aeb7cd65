//! Client configuration.

use std::sync::Arc;
use std::time::Duration;

use erede::environment::{Credentials, Environment};
use erede::log::{Logger, NoopLogger};

/// Pass-through platform identification appended to the `User-Agent`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    /// Platform name, e.g. the shop software.
    pub name: String,
    /// Platform version.
    pub version: String,
}

/// Configuration for [`RedeClient`](crate::RedeClient).
#[derive(Clone)]
pub struct ClientConfig {
    /// Per-request timeout. `None` leaves timeouts to the HTTP client.
    pub timeout: Option<Duration>,

    /// Optional pre-configured reqwest client. If `None`, one is built that
    /// requires TLS 1.2 or newer.
    pub http_client: Option<reqwest::Client>,

    /// Receives request and response events.
    pub logger: Arc<dyn Logger>,

    /// Optional platform identification.
    pub platform: Option<Platform>,

    /// Credentials environment for the OAuth exchange. If `None`, it follows
    /// the store's payments environment.
    pub credentials_environment: Option<Environment<Credentials>>,

    /// Extra form fields sent with the OAuth exchange.
    pub oauth_fields: Vec<(String, String)>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            http_client: None,
            logger: Arc::new(NoopLogger),
            platform: None,
            credentials_environment: None,
            oauth_fields: Vec::new(),
        }
    }
}

impl ClientConfig {
    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets a pre-configured reqwest client.
    #[must_use]
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Sets the logger.
    #[must_use]
    pub fn with_logger(mut self, logger: impl Logger + 'static) -> Self {
        self.logger = Arc::new(logger);
        self
    }

    /// Sets a shared logger.
    #[must_use]
    pub fn with_shared_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    /// Sets the platform identification.
    #[must_use]
    pub fn with_platform(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.platform = Some(Platform {
            name: name.into(),
            version: version.into(),
        });
        self
    }

    /// Pins the credentials environment used for the OAuth exchange.
    #[must_use]
    pub fn with_credentials_environment(mut self, environment: Environment<Credentials>) -> Self {
        self.credentials_environment = Some(environment);
        self
    }

    /// Adds an extra OAuth form field.
    #[must_use]
    pub fn with_oauth_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.oauth_fields.push((name.into(), value.into()));
        self
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("timeout", &self.timeout)
            .field("has_http_client", &self.http_client.is_some())
            .field("logger", &self.logger)
            .field("platform", &self.platform)
            .field("credentials_environment", &self.credentials_environment)
            .field(
                "oauth_fields",
                &self.oauth_fields.iter().map(|(name, _)| name).collect::<Vec<_>>(),
            )
            .finish()
    }
}
