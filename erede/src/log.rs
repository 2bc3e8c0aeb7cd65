//! Logger capability.
//!
//! The request pipeline reports what it sends and receives through a
//! [`Logger`]. Call sites never check whether one is configured: the default
//! is [`NoopLogger`], which discards everything.

use std::fmt::Debug;

/// Receives debug-level events from the request pipeline.
///
/// Messages are already redacted when they reach the logger.
pub trait Logger: Debug + Send + Sync {
    /// Records one debug-level message.
    fn debug(&self, message: &str);
}

/// A [`Logger`] that discards every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn debug(&self, _message: &str) {}
}

/// A [`Logger`] that forwards every message to `tracing` at debug level.
#[cfg(feature = "telemetry")]
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

#[cfg(feature = "telemetry")]
impl Logger for TracingLogger {
    fn debug(&self, message: &str) {
        tracing::debug!(target: "erede", "{message}");
    }
}
