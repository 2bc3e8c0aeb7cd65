//! Gateway environments and endpoint resolution.
//!
//! The gateway exposes two API families that are versioned independently:
//!
//! - [`Payments`] - the transaction API (`/v2/transactions/...`)
//! - [`Credentials`] - the OAuth token API (`/oauth2/token`, no version segment)
//!
//! Each family has its own production and sandbox hosts. The family is a type
//! parameter of [`Environment`], so an `Environment<Credentials>` can never be
//! handed to code that expects an `Environment<Payments>`.

use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

mod sealed {
    pub trait Sealed {}
}

/// Constants describing one API family.
///
/// Sealed: the gateway has exactly two families.
pub trait ApiFamily: sealed::Sealed {
    /// Human-readable family name, used in debug output.
    const NAME: &'static str;
    /// Production base URL.
    const PRODUCTION: &'static str;
    /// Sandbox base URL.
    const SANDBOX: &'static str;
    /// Version path segment inserted between base URL and service path.
    const VERSION: &'static str;
}

/// The transaction API family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Payments;

/// The OAuth credentials API family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Credentials;

impl sealed::Sealed for Payments {}
impl sealed::Sealed for Credentials {}

impl ApiFamily for Payments {
    const NAME: &'static str = "payments";
    const PRODUCTION: &'static str = "https://api.userede.com.br/erede";
    const SANDBOX: &'static str = "https://sandbox-erede.useredecloud.com.br";
    const VERSION: &'static str = "v2";
}

impl ApiFamily for Credentials {
    const NAME: &'static str = "credentials";
    const PRODUCTION: &'static str = "https://api.userede.com.br/redelabs";
    const SANDBOX: &'static str = "https://rl7-sandbox-api.useredecloud.com.br";
    const VERSION: &'static str = "";
}

/// Logical deployment target shared by both API families.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    /// Live gateway.
    Production,
    /// Test gateway.
    #[default]
    Sandbox,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Production => f.write_str("production"),
            Self::Sandbox => f.write_str("sandbox"),
        }
    }
}

/// Error returned when parsing an unknown [`Target`] name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown environment target '{0}', expected 'production' or 'sandbox'")]
pub struct UnknownTarget(pub String);

impl FromStr for Target {
    type Err = UnknownTarget;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Self::Production),
            "sandbox" => Ok(Self::Sandbox),
            _ => Err(UnknownTarget(s.to_owned())),
        }
    }
}

/// A base URL bound to one API family.
///
/// Immutable once constructed. Use [`Environment::production`],
/// [`Environment::sandbox`], or [`Environment::with_base_url`] for a custom host.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Environment<F> {
    base_url: String,
    family: PhantomData<F>,
}

impl<F: ApiFamily> Environment<F> {
    /// The family's production environment.
    #[must_use]
    pub fn production() -> Self {
        Self::with_base_url(F::PRODUCTION)
    }

    /// The family's sandbox environment.
    #[must_use]
    pub fn sandbox() -> Self {
        Self::with_base_url(F::SANDBOX)
    }

    /// The family's environment for a deployment target.
    #[must_use]
    pub fn for_target(target: Target) -> Self {
        match target {
            Target::Production => Self::production(),
            Target::Sandbox => Self::sandbox(),
        }
    }

    /// An environment with a custom base URL and the family's version segment.
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            family: PhantomData,
        }
    }

    /// Returns the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the version segment (may be empty).
    #[must_use]
    pub const fn version(&self) -> &'static str {
        F::VERSION
    }

    /// Returns `true` if this is the family's built-in sandbox host.
    #[must_use]
    pub fn is_sandbox(&self) -> bool {
        self.endpoint("") == Self::sandbox().endpoint("")
    }

    /// Builds the full URL of a service path.
    ///
    /// Base URL, version and path are joined with exactly one `/` between
    /// non-empty segments. Doubled separators in the path portion are
    /// collapsed; a query string is appended verbatim.
    ///
    /// ```
    /// use erede::environment::{Credentials, Environment, Payments};
    ///
    /// let payments = Environment::<Payments>::sandbox();
    /// assert_eq!(
    ///     payments.endpoint("transactions"),
    ///     "https://sandbox-erede.useredecloud.com.br/v2/transactions"
    /// );
    ///
    /// let credentials = Environment::<Credentials>::sandbox();
    /// assert_eq!(
    ///     credentials.endpoint("/oauth2/token"),
    ///     "https://rl7-sandbox-api.useredecloud.com.br/oauth2/token"
    /// );
    /// ```
    #[must_use]
    pub fn endpoint(&self, service: &str) -> String {
        let (path, query) = match service.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (service, None),
        };

        let (scheme, authority_and_path) = match self.base_url.split_once("://") {
            Some((scheme, rest)) => (Some(scheme), rest),
            None => (None, self.base_url.as_str()),
        };

        let mut url = String::with_capacity(self.base_url.len() + service.len() + 8);
        if let Some(scheme) = scheme {
            url.push_str(scheme);
            url.push_str("://");
        }

        let segments = [authority_and_path, F::VERSION, path]
            .into_iter()
            .flat_map(|part| part.split('/'))
            .filter(|segment| !segment.is_empty());
        for (i, segment) in segments.enumerate() {
            if i > 0 {
                url.push('/');
            }
            url.push_str(segment);
        }

        if path.ends_with('/') && !url.ends_with('/') {
            url.push('/');
        }
        if let Some(query) = query {
            url.push('?');
            url.push_str(query);
        }
        url
    }
}

impl Environment<Payments> {
    /// Returns the credentials-family environment matching this payments
    /// environment's target.
    ///
    /// The built-in payments sandbox maps to the credentials sandbox; every
    /// other host (production or custom) maps to credentials production.
    #[must_use]
    pub fn credentials_environment(&self) -> Environment<Credentials> {
        if self.is_sandbox() {
            Environment::sandbox()
        } else {
            Environment::production()
        }
    }
}

impl<F: ApiFamily> fmt::Debug for Environment<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("family", &F::NAME)
            .field("base_url", &self.base_url)
            .field("version", &F::VERSION)
            .finish()
    }
}
