#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! HTTP client for the e.Rede payment gateway.
//!
//! Wraps the core types from `erede` in a `reqwest` pipeline: one request per
//! operation, redacted request and response logging, and classification of
//! every outcome into success or a [`erede::RedeError`].
//!
//! # Modules
//!
//! - [`client`] - The [`RedeClient`] facade with every gateway operation
//! - [`config`] - Client configuration (timeout, HTTP client, logger, platform)
//! - [`constants`] - Service paths, header values and the `User-Agent` format
//!
//! # Feature Flags
//!
//! - `telemetry` - Emits `tracing` spans around the OAuth exchange and every
//!   transaction operation, and enables `erede::log::TracingLogger`

mod auth;
pub mod client;
pub mod config;
pub mod constants;
mod service;
mod transport;

pub use client::RedeClient;
pub use config::{ClientConfig, Platform};
