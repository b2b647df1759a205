//! State store webhook client.
//!
//! Each [`StateUpdate`] becomes one `POST <url><entity_id>` carrying a
//! bearer token and a Home Assistant style state document:
//!
//! ```json
//! {
//!   "state": "240",
//!   "attributes": {
//!     "friendly_name": "Main Pc Total Power",
//!     "unit_of_measurement": "W"
//!   }
//! }
//! ```

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Serialize;

use powerwatch_types::StateUpdate;

use crate::AdapterError;

/// Client that pushes state updates to the state store.
#[derive(Debug, Clone)]
pub struct WebhookClient {
    client: Client,
    url: String,
    token: String,
}

impl WebhookClient {
    /// Create a new builder for configuring the client.
    pub fn builder() -> WebhookClientBuilder {
        WebhookClientBuilder::default()
    }

    /// Base URL that entity ids are appended to.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Push a single update.
    ///
    /// Returns the response status on success. There is no retry: a failed
    /// push is reported to the caller and the next cycle sends fresh values.
    pub async fn push(&self, update: &StateUpdate) -> Result<StatusCode, AdapterError> {
        let url = self.entity_url(&update.entity_id);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&StatePayload::from(update))
            .send()
            .await?;

        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(AdapterError::Auth(format!(
                "State store rejected token for {}",
                update.entity_id
            )));
        }

        if !status.is_success() {
            return Err(AdapterError::Http(format!(
                "State store returned status {} for {}",
                status, update.entity_id
            )));
        }

        Ok(status)
    }

    fn entity_url(&self, entity_id: &str) -> String {
        format!("{}{}", self.url, entity_id)
    }
}

/// Builder for WebhookClient.
#[derive(Debug, Default)]
pub struct WebhookClientBuilder {
    url: Option<String>,
    token: Option<String>,
    timeout: Option<Duration>,
}

impl WebhookClientBuilder {
    /// Set the base URL (default: "http://127.0.0.1:8123/api/states/").
    ///
    /// Entity ids are appended verbatim, so the URL normally ends in `/`.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the bearer token.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<WebhookClient, AdapterError> {
        let timeout = self.timeout.unwrap_or(Duration::from_secs(10));

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AdapterError::Config(e.to_string()))?;

        Ok(WebhookClient {
            client,
            url: self
                .url
                .unwrap_or_else(|| "http://127.0.0.1:8123/api/states/".to_string()),
            token: self.token.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Serialize)]
struct StatePayload<'a> {
    state: String,
    attributes: Attributes<'a>,
}

#[derive(Debug, Serialize)]
struct Attributes<'a> {
    friendly_name: &'a str,
    unit_of_measurement: &'a str,
}

impl<'a> From<&'a StateUpdate> for StatePayload<'a> {
    fn from(update: &'a StateUpdate) -> Self {
        Self {
            state: update.state(),
            attributes: Attributes {
                friendly_name: &update.friendly_name,
                unit_of_measurement: &update.unit,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn total_power() -> StateUpdate {
        StateUpdate::new("main_pc_total_power", "Main Pc Total Power", 240.0, "W")
    }

    #[test]
    fn test_builder_defaults() {
        let client = WebhookClient::builder().build().unwrap();
        assert_eq!(client.url(), "http://127.0.0.1:8123/api/states/");
        assert_eq!(client.token, "");
    }

    #[test]
    fn test_entity_url() {
        let client = WebhookClient::builder()
            .url("http://hass.local:8123/api/states/")
            .token("abc")
            .build()
            .unwrap();
        assert_eq!(
            client.entity_url("main_pc_cpu_load"),
            "http://hass.local:8123/api/states/main_pc_cpu_load"
        );
    }

    #[test]
    fn test_payload_shape() {
        let update = StateUpdate::new("main_pc_cpu_load", "Main Pc CPU Load", 15.4, "%");
        let json = serde_json::to_value(StatePayload::from(&update)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "state": "15.4",
                "attributes": {
                    "friendly_name": "Main Pc CPU Load",
                    "unit_of_measurement": "%"
                }
            })
        );
    }

    #[tokio::test]
    async fn test_push_posts_state() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/states/main_pc_total_power"))
            .and(header("Authorization", "Bearer secret"))
            .and(body_json(serde_json::json!({
                "state": "240",
                "attributes": {
                    "friendly_name": "Main Pc Total Power",
                    "unit_of_measurement": "W"
                }
            })))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = WebhookClient::builder()
            .url(format!("{}/api/states/", mock_server.uri()))
            .token("secret")
            .build()
            .unwrap();

        let status = client.push(&total_power()).await.unwrap();
        assert_eq!(status, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_push_unauthorized() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&mock_server)
            .await;

        let client = WebhookClient::builder()
            .url(format!("{}/api/states/", mock_server.uri()))
            .token("wrong")
            .build()
            .unwrap();

        assert!(matches!(
            client.push(&total_power()).await,
            Err(AdapterError::Auth(_))
        ));
    }

    #[tokio::test]
    async fn test_push_server_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let client = WebhookClient::builder()
            .url(format!("{}/api/states/", mock_server.uri()))
            .build()
            .unwrap();

        assert!(matches!(
            client.push(&total_power()).await,
            Err(AdapterError::Http(_))
        ));
    }
}
