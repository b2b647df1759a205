//! In-memory sink.

use async_trait::async_trait;
use parking_lot::Mutex;
use powerwatch_adapters::AdapterError;
use powerwatch_types::StateUpdate;

use super::MetricSink;

/// A sink that keeps every update it receives.
///
/// Backs `--export`, where one cycle's updates are written to a file.
#[derive(Debug, Default)]
pub struct RecordingSink {
    updates: Mutex<Vec<StateUpdate>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far, in push order.
    pub fn updates(&self) -> Vec<StateUpdate> {
        self.updates.lock().clone()
    }

    /// Take the recorded updates, leaving the sink empty.
    pub fn drain(&self) -> Vec<StateUpdate> {
        std::mem::take(&mut *self.updates.lock())
    }

    pub fn len(&self) -> usize {
        self.updates.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.updates.lock().is_empty()
    }
}

#[async_trait]
impl MetricSink for RecordingSink {
    async fn push(&self, update: &StateUpdate) -> Result<(), AdapterError> {
        self.updates.lock().push(update.clone());
        Ok(())
    }

    fn description(&self) -> String {
        "memory".to_string()
    }
}
