//! Error types for gateway operations.
//!
//! Every operation fails with a [`RedeError`] of one of four kinds. Callers are
//! expected to branch on [`RedeError::kind`] rather than on message text:
//! retry transport failures, surface gateway messages, and fix preconditions.

use std::error::Error as StdError;

use crate::transaction::{Brand, MergeError};

/// Boxed source of a transport failure.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Base error type for gateway operations.
#[derive(Debug, thiserror::Error)]
pub enum RedeError {
    /// The request never produced a response (connection, TLS, timeout).
    #[error("transport failure: {context}: {source}")]
    Transport {
        /// Human-readable context, e.g. `"POST /oauth2/token"`.
        context: &'static str,
        /// Whether the transport gave up because a timeout elapsed.
        timeout: bool,
        /// The underlying transport error.
        #[source]
        source: BoxError,
    },

    /// A response arrived but its body was not the mandatory JSON object.
    #[error("malformed response: {context}: {source}")]
    MalformedResponse {
        /// Human-readable context.
        context: &'static str,
        /// Why the body was rejected.
        #[source]
        source: MergeError,
    },

    /// The gateway reported a business failure.
    #[error(transparent)]
    Gateway(Box<GatewayError>),

    /// The operation was invoked in a state where it cannot run.
    #[error("precondition failed: {0}")]
    Precondition(String),
}

/// Fieldless discriminant of [`RedeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`RedeError::Transport`].
    Transport,
    /// See [`RedeError::MalformedResponse`].
    MalformedResponse,
    /// See [`RedeError::Gateway`].
    Gateway,
    /// See [`RedeError::Precondition`].
    Precondition,
}

impl RedeError {
    /// Creates a transport failure.
    #[must_use]
    pub fn transport(context: &'static str, timeout: bool, source: impl Into<BoxError>) -> Self {
        Self::Transport {
            context,
            timeout,
            source: source.into(),
        }
    }

    /// Creates a precondition failure.
    #[must_use]
    pub fn precondition(message: impl Into<String>) -> Self {
        Self::Precondition(message.into())
    }

    /// Returns the kind of failure.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport { .. } => ErrorKind::Transport,
            Self::MalformedResponse { .. } => ErrorKind::MalformedResponse,
            Self::Gateway(_) => ErrorKind::Gateway,
            Self::Precondition(_) => ErrorKind::Precondition,
        }
    }

    /// Returns `true` if repeating the request may succeed.
    ///
    /// Only transport failures qualify; the gateway already answered every
    /// other kind.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Returns `true` for a transport failure caused by a timeout.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport { timeout: true, .. })
    }

    /// Returns the gateway error, if this is one.
    #[must_use]
    pub fn as_gateway(&self) -> Option<&GatewayError> {
        match self {
            Self::Gateway(err) => Some(err),
            _ => None,
        }
    }
}

impl From<GatewayError> for RedeError {
    fn from(err: GatewayError) -> Self {
        Self::Gateway(Box::new(err))
    }
}

/// Business failure reported by the gateway (HTTP status 400 or above).
///
/// Produced by response parsing only. When the response body could not be
/// merged completely the merge failure is kept as the [`source`](StdError::source).
#[derive(Debug, thiserror::Error)]
#[error("{}", self.render())]
pub struct GatewayError {
    http_status: u16,
    code: i64,
    error_type: Option<String>,
    message: String,
    brand: Option<Brand>,
    #[source]
    cause: Option<MergeError>,
}

impl GatewayError {
    pub(crate) fn new(http_status: u16, code: i64, message: impl Into<String>) -> Self {
        Self {
            http_status,
            code,
            error_type: None,
            message: message.into(),
            brand: None,
            cause: None,
        }
    }

    #[must_use]
    pub(crate) fn with_error_type(mut self, error_type: impl Into<String>) -> Self {
        self.error_type = Some(error_type.into());
        self
    }

    #[must_use]
    pub(crate) fn with_brand(mut self, brand: Option<Brand>) -> Self {
        self.brand = brand;
        self
    }

    #[must_use]
    pub(crate) fn with_cause(mut self, cause: Option<MergeError>) -> Self {
        self.cause = cause;
        self
    }

    /// HTTP status of the response.
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        self.http_status
    }

    /// Numeric gateway code (`returnCode` or `error_code`), 0 when absent.
    #[must_use]
    pub const fn code(&self) -> i64 {
        self.code
    }

    /// OAuth error type such as `invalid_client`.
    #[must_use]
    pub fn error_type(&self) -> Option<&str> {
        self.error_type.as_deref()
    }

    /// Message reported by the gateway, or a generic fallback.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Card-brand sub-result, when the gateway returned one.
    #[must_use]
    pub const fn brand(&self) -> Option<&Brand> {
        self.brand.as_ref()
    }

    /// Merge failure encountered while reading the body.
    #[must_use]
    pub const fn cause(&self) -> Option<&MergeError> {
        self.cause.as_ref()
    }

    fn render(&self) -> String {
        match &self.error_type {
            Some(error_type) => format!("[{error_type}]: {}", self.message),
            None => self.message.clone(),
        }
    }
}
