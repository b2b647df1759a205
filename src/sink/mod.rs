//! Metric sinks - where state updates are delivered.
//!
//! This module provides a trait-based abstraction over the destination of
//! derived metrics, so the forwarder does not care whether updates go to
//! the state store, the log, or an in-memory buffer.

mod log;
mod recording;
mod webhook;

pub use self::log::LogSink;
pub use self::recording::RecordingSink;

use async_trait::async_trait;
use powerwatch_adapters::AdapterError;
use powerwatch_types::StateUpdate;

/// Trait for delivering a single state update.
///
/// Implementations are called once per metric. A failure affects only the
/// update being pushed; the caller decides what to do with it.
#[async_trait]
pub trait MetricSink: Send + Sync {
    /// Deliver one update.
    async fn push(&self, update: &StateUpdate) -> Result<(), AdapterError>;

    /// Returns a human-readable description of the sink.
    ///
    /// Used in log messages.
    fn description(&self) -> String;
}
