//! The [`RedeClient`] facade.

use std::sync::Arc;

use erede::credential::{BasicCredential, BearerToken};
use erede::environment::{Credentials, Environment};
use erede::{RedeError, Store, Transaction};

use crate::auth::AuthenticationService;
use crate::config::{ClientConfig, Platform};
use crate::constants::user_agent;
use crate::service::{Operation, TransactionService};
use crate::transport::Transport;

/// Client for the e.Rede payments API.
///
/// Every operation sends exactly one request. Operations on a caller-owned
/// [`Transaction`] merge the response into it in place; queries return a new
/// one. A gateway answer with status 400 or above is returned as
/// [`RedeError::Gateway`].
///
/// # Example
///
/// ```no_run
/// use erede::{Environment, Store, Transaction};
/// use erede_http::RedeClient;
///
/// # async fn run() -> Result<(), erede::RedeError> {
/// let store = Store::with_environment("filiation", "token", Environment::sandbox());
/// let client = RedeClient::new(store)?;
///
/// client.authenticate().await?;
///
/// let mut tx = Transaction::new(2099, "order-42")
///     .credit_card("5448280000000007", "235", 1, 2030, "John Snow")
///     .with_capture(false);
/// client.create(&mut tx).await?;
/// client.capture(&mut tx).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RedeClient {
    store: Arc<Store>,
    transport: Transport,
    platform: Option<Platform>,
    credentials_environment: Option<Environment<Credentials>>,
    oauth_fields: Vec<(String, String)>,
}

impl RedeClient {
    /// Creates a client with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RedeError::Transport`] if the HTTP client cannot be built.
    pub fn new(store: impl Into<Arc<Store>>) -> Result<Self, RedeError> {
        Self::with_config(store, ClientConfig::default())
    }

    /// Creates a client from a [`ClientConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`RedeError::Transport`] if no HTTP client was supplied and the
    /// default one cannot be built.
    pub fn with_config(
        store: impl Into<Arc<Store>>,
        config: ClientConfig,
    ) -> Result<Self, RedeError> {
        let http_client = match config.http_client {
            Some(client) => client,
            None => Transport::default_client()?,
        };
        Ok(Self {
            store: store.into(),
            transport: Transport::new(http_client, config.timeout, config.logger),
            platform: config.platform,
            credentials_environment: config.credentials_environment,
            oauth_fields: config.oauth_fields,
        })
    }

    /// Sets the platform name and version appended to the `User-Agent`.
    #[must_use]
    pub fn with_platform(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.platform = Some(Platform {
            name: name.into(),
            version: version.into(),
        });
        self
    }

    /// Returns the shared store.
    #[must_use]
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Returns the credentials environment used for the OAuth exchange.
    ///
    /// Unless pinned in the configuration, the built-in payments sandbox maps
    /// to the credentials sandbox and anything else to production.
    #[must_use]
    pub fn credentials_environment(&self) -> Environment<Credentials> {
        self.credentials_environment
            .clone()
            .unwrap_or_else(|| self.store.environment().credentials_environment())
    }

    fn user_agent(&self) -> String {
        let platform = self
            .platform
            .as_ref()
            .map(|p| (p.name.as_str(), p.version.as_str()));
        user_agent(self.store.filiation(), platform)
    }

    /// Exchanges the store's filiation and token for a Bearer token.
    ///
    /// The store is left unchanged; see [`RedeClient::authenticate`].
    ///
    /// # Errors
    ///
    /// Returns [`RedeError::Transport`] if the request fails,
    /// [`RedeError::Gateway`] for an error status, and
    /// [`RedeError::MalformedResponse`] if a successful body is not a JSON
    /// object.
    pub async fn generate_oauth_token(&self) -> Result<BearerToken, RedeError> {
        let credential = self.store.basic_credential();
        let environment = self.credentials_environment();
        self.acquire_token(&credential, &environment).await
    }

    /// Like [`RedeClient::generate_oauth_token`], then caches the token on the
    /// store so later requests use Bearer authentication.
    ///
    /// # Errors
    ///
    /// See [`RedeClient::generate_oauth_token`]. The store is not modified on
    /// failure.
    pub async fn authenticate(&self) -> Result<BearerToken, RedeError> {
        let token = self.generate_oauth_token().await?;
        self.store.set_auth(Some(token.clone()));
        Ok(token)
    }

    /// Exchanges an explicit credential against an explicit credentials
    /// environment.
    ///
    /// # Errors
    ///
    /// See [`RedeClient::generate_oauth_token`].
    pub async fn acquire_token(
        &self,
        credential: &BasicCredential,
        environment: &Environment<Credentials>,
    ) -> Result<BearerToken, RedeError> {
        let user_agent = self.user_agent();
        AuthenticationService::new(&self.transport, credential, environment, &user_agent)
            .with_extra_fields(&self.oauth_fields)
            .execute()
            .await
    }

    async fn run(
        &self,
        operation: &Operation,
        transaction: &mut Transaction,
    ) -> Result<(), RedeError> {
        let user_agent = self.user_agent();
        TransactionService::new(&self.transport, &self.store, &user_agent)
            .execute(operation, transaction)
            .await
    }

    async fn query(&self, operation: Operation) -> Result<Transaction, RedeError> {
        let mut transaction = Transaction::default();
        self.run(&operation, &mut transaction).await?;
        Ok(transaction)
    }

    /// Creates (authorizes) a transaction: `POST transactions`.
    ///
    /// # Errors
    ///
    /// Returns [`RedeError::Transport`] if the request fails and
    /// [`RedeError::Gateway`] for an error status. The response is merged into
    /// `transaction` in both the success and the gateway-error case.
    pub async fn create(&self, transaction: &mut Transaction) -> Result<(), RedeError> {
        self.run(&Operation::Create, transaction).await
    }

    /// Same as [`RedeClient::create`].
    ///
    /// # Errors
    ///
    /// See [`RedeClient::create`].
    pub async fn authorize(&self, transaction: &mut Transaction) -> Result<(), RedeError> {
        self.create(transaction).await
    }

    /// Zero-dollar card verification: forces the amount to 0 and capture off,
    /// then creates the transaction.
    ///
    /// # Errors
    ///
    /// See [`RedeClient::create`].
    pub async fn zero(&self, transaction: &mut Transaction) -> Result<(), RedeError> {
        transaction.amount = Some(0);
        transaction.capture = Some(false);
        self.create(transaction).await
    }

    /// Captures an authorized transaction: `PUT transactions/{tid}`.
    ///
    /// # Errors
    ///
    /// Returns [`RedeError::Precondition`] before any I/O if the transaction
    /// has no tid, otherwise as [`RedeClient::create`].
    pub async fn capture(&self, transaction: &mut Transaction) -> Result<(), RedeError> {
        let operation = Operation::capture(transaction)?;
        self.run(&operation, transaction).await
    }

    /// Cancels (refunds) a transaction: `POST transactions/{tid}/refunds`.
    ///
    /// # Errors
    ///
    /// Returns [`RedeError::Precondition`] before any I/O if the transaction
    /// has no tid, otherwise as [`RedeClient::create`].
    pub async fn cancel(&self, transaction: &mut Transaction) -> Result<(), RedeError> {
        let operation = Operation::cancel(transaction)?;
        self.run(&operation, transaction).await
    }

    /// Fetches a transaction by tid: `GET transactions/{tid}`.
    ///
    /// # Errors
    ///
    /// Returns [`RedeError::Precondition`] for an empty tid, otherwise as
    /// [`RedeClient::create`].
    pub async fn get(&self, tid: &str) -> Result<Transaction, RedeError> {
        self.query(Operation::get(tid)?).await
    }

    /// Same as [`RedeClient::get`].
    ///
    /// # Errors
    ///
    /// See [`RedeClient::get`].
    pub async fn get_by_id(&self, tid: &str) -> Result<Transaction, RedeError> {
        self.get(tid).await
    }

    /// Fetches a transaction by merchant reference:
    /// `GET transactions?reference={reference}`.
    ///
    /// # Errors
    ///
    /// Returns [`RedeError::Precondition`] for an empty reference, otherwise
    /// as [`RedeClient::create`].
    pub async fn get_by_reference(&self, reference: &str) -> Result<Transaction, RedeError> {
        self.query(Operation::get_by_reference(reference)?).await
    }

    /// Lists the refunds of a transaction: `GET transactions/{tid}/refunds`.
    ///
    /// # Errors
    ///
    /// See [`RedeClient::get`].
    pub async fn get_refunds(&self, tid: &str) -> Result<Transaction, RedeError> {
        self.query(Operation::get_refunds(tid)?).await
    }

    /// Fetches one refund: `GET transactions/{tid}/refunds/{refund_id}`.
    ///
    /// # Errors
    ///
    /// Returns [`RedeError::Precondition`] for an empty tid or refund id,
    /// otherwise as [`RedeClient::create`].
    pub async fn get_refund(&self, tid: &str, refund_id: &str) -> Result<Transaction, RedeError> {
        self.query(Operation::get_refund(tid, refund_id)?).await
    }
}
