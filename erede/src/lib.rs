#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Core types for the e.Rede payment gateway client.
//!
//! This crate holds everything that does not touch the network: where requests
//! go, how they are authenticated, what a transaction looks like on the wire,
//! and how a raw gateway response becomes either a [`Transaction`] or a
//! classified [`RedeError`]. The HTTP pipeline lives in `erede-http`.
//!
//! # Modules
//!
//! - [`environment`] - Payment and credentials API families and endpoint resolution
//! - [`credential`] - Basic and Bearer credentials behind one header capability
//! - [`store`] - Merchant identity, environment and cached Bearer token
//! - [`transaction`] - Transaction model with explicit JSON merge
//! - [`response`] - Response parsing and error classification
//! - [`error`] - Error taxonomy shared by every operation
//! - [`log`] - Logger capability with a no-op default
//! - [`redact`] - Masking of card data and tokens in log output
//! - [`config`] - Store configuration from serde or the process environment
//!
//! # Feature Flags
//!
//! - `telemetry` - Enables [`log::TracingLogger`], which forwards events to `tracing`

pub mod config;
pub mod credential;
pub mod environment;
pub mod error;
pub mod log;
pub mod redact;
pub mod response;
pub mod store;
pub mod transaction;

pub use credential::{BasicCredential, BearerToken, Credential};
pub use environment::{Credentials, Environment, Payments};
pub use error::{ErrorKind, GatewayError, RedeError};
pub use store::Store;
pub use transaction::{Transaction, TransactionKind};
