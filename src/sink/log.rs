//! Dry-run sink.

use async_trait::async_trait;
use powerwatch_adapters::AdapterError;
use powerwatch_types::StateUpdate;
use tracing::info;

use super::MetricSink;

/// A sink that logs each update instead of sending it.
///
/// Used for `--dry-run` and when the webhook is disabled in the config.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

#[async_trait]
impl MetricSink for LogSink {
    async fn push(&self, update: &StateUpdate) -> Result<(), AdapterError> {
        info!(
            entity_id = %update.entity_id,
            name = %update.friendly_name,
            state = %update.state(),
            unit = %update.unit,
            "State update (dry run)"
        );
        Ok(())
    }

    fn description(&self) -> String {
        "log (dry run)".to_string()
    }
}
