//! State store sink.

use async_trait::async_trait;
use powerwatch_adapters::webhook::WebhookClient;
use powerwatch_adapters::AdapterError;
use powerwatch_types::StateUpdate;
use tracing::debug;

use super::MetricSink;

#[async_trait]
impl MetricSink for WebhookClient {
    async fn push(&self, update: &StateUpdate) -> Result<(), AdapterError> {
        let status = WebhookClient::push(self, update).await?;
        debug!(entity_id = %update.entity_id, %status, "State update accepted");
        Ok(())
    }

    fn description(&self) -> String {
        format!("webhook: {}", self.url())
    }
}
