//! remoteHWInfo adapter.
//!
//! remoteHWInfo exposes the HWiNFO shared memory as a JSON document at
//! `http://<host>:<port>/json.json` (port 60005 by default). The document
//! wraps everything in an `hwinfo` object whose `readings` array holds one
//! entry per sensor value.
//!
//! Only the fields powerwatch consumes are parsed:
//!
//! - `labelOriginal`: stable sensor label used for lookups
//! - `labelUser`: label as renamed in HWiNFO
//! - `readingType`: integer code 0-8, see [`ReadingKind`]
//! - `value` and `unit`
//!
//! ## Example
//!
//! ```rust,no_run
//! use powerwatch_adapters::hwinfo::HwInfoAdapter;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let adapter = HwInfoAdapter::builder().host("192.168.1.20").build()?;
//!
//!     for reading in adapter.collect().await?.iter() {
//!         println!("{}: {} {}", reading.label_user, reading.value, reading.unit);
//!     }
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use powerwatch_types::{Reading, ReadingKind, Readings};

use crate::AdapterError;

/// Adapter that polls a remoteHWInfo instance.
#[derive(Debug, Clone)]
pub struct HwInfoAdapter {
    client: Client,
    url: String,
}

impl HwInfoAdapter {
    /// Create a new builder for configuring the adapter.
    pub fn builder() -> HwInfoAdapterBuilder {
        HwInfoAdapterBuilder::default()
    }

    /// The document URL this adapter polls.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the current readings.
    pub async fn collect(&self) -> Result<Readings, AdapterError> {
        let response = self.client.get(&self.url).send().await?;

        if !response.status().is_success() {
            return Err(AdapterError::Http(format!(
                "remoteHWInfo returned status {}",
                response.status()
            )));
        }

        let body = response.text().await?;
        parse_readings(&body)
    }
}

/// Parse a remoteHWInfo document into indexed readings.
///
/// Fails on malformed JSON and on any reading whose `readingType` falls
/// outside the known mapping.
pub fn parse_readings(body: &str) -> Result<Readings, AdapterError> {
    let envelope: Envelope =
        serde_json::from_str(body).map_err(|e| AdapterError::Parse(e.to_string()))?;

    let readings = envelope
        .hwinfo
        .readings
        .into_iter()
        .map(RawReading::into_reading)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Readings::indexed(readings))
}

/// Builder for HwInfoAdapter.
#[derive(Debug, Default)]
pub struct HwInfoAdapterBuilder {
    host: Option<String>,
    port: Option<u16>,
    timeout: Option<Duration>,
}

impl HwInfoAdapterBuilder {
    /// Set the remoteHWInfo host (default: "127.0.0.1").
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Set the remoteHWInfo port (default: 60005).
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set the request timeout (default: 5 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the adapter.
    pub fn build(self) -> Result<HwInfoAdapter, AdapterError> {
        let timeout = self.timeout.unwrap_or(Duration::from_secs(5));

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AdapterError::Config(e.to_string()))?;

        let host = self.host.unwrap_or_else(|| "127.0.0.1".to_string());
        let port = self.port.unwrap_or(60005);

        Ok(HwInfoAdapter {
            client,
            url: document_url(&host, port),
        })
    }
}

fn document_url(host: &str, port: u16) -> String {
    format!("http://{}:{}/json.json", host, port)
}

#[derive(Debug, Deserialize)]
struct Envelope {
    hwinfo: Document,
}

#[derive(Debug, Deserialize)]
struct Document {
    #[serde(default)]
    readings: Vec<RawReading>,
}

/// A reading as it appears on the wire.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReading {
    label_original: String,
    #[serde(default)]
    label_user: Option<String>,
    reading_type: i64,
    value: f64,
    #[serde(default)]
    unit: String,
}

impl RawReading {
    fn into_reading(self) -> Result<Reading, AdapterError> {
        let kind = ReadingKind::try_from(self.reading_type)?;
        let label_user = self
            .label_user
            .unwrap_or_else(|| self.label_original.clone());

        Ok(Reading::new(self.label_original, kind, self.value, self.unit).with_user_label(label_user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use powerwatch_types::UnknownReadingType;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_document() -> &'static str {
        r#"{
            "hwinfo": {
                "sensors": [{ "entryIndex": 0, "sensorNameOriginal": "System" }],
                "readings": [
                    {
                        "readingType": 7,
                        "sensorIndex": 0,
                        "labelOriginal": "Total CPU Usage",
                        "labelUser": "CPU Usage",
                        "unit": "%",
                        "value": 37.4,
                        "valueMin": 1.2,
                        "valueMax": 100.0
                    },
                    {
                        "readingType": 5,
                        "labelOriginal": "CPU Package Power",
                        "labelUser": "CPU Package Power",
                        "unit": "W",
                        "value": 88.25
                    },
                    {
                        "readingType": 8,
                        "labelOriginal": "Physical Memory Used",
                        "unit": "MB",
                        "value": 12034
                    }
                ]
            }
        }"#
    }

    #[test]
    fn test_builder_defaults() {
        let adapter = HwInfoAdapter::builder().build().unwrap();
        assert_eq!(adapter.url(), "http://127.0.0.1:60005/json.json");
    }

    #[test]
    fn test_builder_custom() {
        let adapter = HwInfoAdapter::builder()
            .host("gaming-pc.local")
            .port(8085)
            .timeout(Duration::from_secs(1))
            .build()
            .unwrap();
        assert_eq!(adapter.url(), "http://gaming-pc.local:8085/json.json");
    }

    #[test]
    fn test_parse_readings() {
        let readings = parse_readings(sample_document()).unwrap();
        assert_eq!(readings.len(), 3);

        let usage = readings.get("Total CPU Usage").unwrap();
        assert_eq!(usage.kind, ReadingKind::Usage);
        assert_eq!(usage.label_user, "CPU Usage");
        assert_eq!(usage.value, 37.4);
        assert_eq!(usage.index, Some(0));

        let power = readings.get("CPU Package Power").unwrap();
        assert_eq!(power.kind.name(), "Power");
        assert_eq!(power.unit, "W");
        assert_eq!(power.index, Some(1));

        // labelUser falls back to the original label
        let used = readings.get("Physical Memory Used").unwrap();
        assert_eq!(used.kind.name(), "Other");
        assert_eq!(used.label_user, "Physical Memory Used");
        assert_eq!(used.value, 12034.0);
    }

    #[test]
    fn test_parse_unknown_reading_type() {
        let body = r#"{"hwinfo": {"readings": [
            {"readingType": 12, "labelOriginal": "Mystery", "value": 1.0, "unit": ""}
        ]}}"#;

        let err = parse_readings(body).unwrap_err();
        assert!(matches!(
            err,
            AdapterError::InvalidReadingType(UnknownReadingType(12))
        ));
    }

    #[test]
    fn test_parse_missing_readings_is_empty() {
        let readings = parse_readings(r#"{"hwinfo": {}}"#).unwrap();
        assert!(readings.is_empty());
    }

    #[test]
    fn test_parse_malformed() {
        assert!(matches!(
            parse_readings("not json"),
            Err(AdapterError::Parse(_))
        ));
        assert!(matches!(
            parse_readings(r#"{"readings": []}"#),
            Err(AdapterError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn test_collect_from_server() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json.json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(sample_document(), "application/json"),
            )
            .mount(&mock_server)
            .await;

        let address = mock_server.address();
        let adapter = HwInfoAdapter::builder()
            .host(address.ip().to_string())
            .port(address.port())
            .build()
            .unwrap();

        let readings = adapter.collect().await.unwrap();
        assert_eq!(readings.len(), 3);
        assert_eq!(readings.value_of("CPU Package Power"), 88.25);
    }

    #[tokio::test]
    async fn test_collect_http_error_status() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json.json"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let address = mock_server.address();
        let adapter = HwInfoAdapter::builder()
            .host(address.ip().to_string())
            .port(address.port())
            .build()
            .unwrap();

        assert!(matches!(
            adapter.collect().await,
            Err(AdapterError::Http(_))
        ));
    }
}
