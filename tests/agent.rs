//! End-to-end cycles against mocked remoteHWInfo and state store servers.

use std::path::Path;

use powerwatch::{Agent, Settings};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DOCUMENT: &str = r#"{
    "hwinfo": {
        "readings": [
            { "readingType": 5, "labelOriginal": "CPU Package Power", "labelUser": "CPU Package Power", "unit": "W", "value": 120.0 },
            { "readingType": 5, "labelOriginal": "GPU Power (Total)", "labelUser": "GPU Power (Total)", "unit": "W", "value": 200.0 },
            { "readingType": 7, "labelOriginal": "Total CPU Usage", "labelUser": "Total CPU Usage", "unit": "%", "value": 70.0 },
            { "readingType": 7, "labelOriginal": "GPU Core Load", "labelUser": "GPU Core Load", "unit": "%", "value": 98.04 },
            { "readingType": 7, "labelOriginal": "Physical Memory Load", "labelUser": "Physical Memory Load", "unit": "%", "value": 37.5 },
            { "readingType": 8, "labelOriginal": "Physical Memory Used", "labelUser": "Physical Memory Used", "unit": "MB", "value": 12000.0 },
            { "readingType": 8, "labelOriginal": "Physical Memory Available", "labelUser": "Physical Memory Available", "unit": "MB", "value": 20000.0 }
        ]
    }
}"#;

fn write_config(path: &Path, hwinfo: &MockServer, webhook: &MockServer, detailed: bool) {
    let address = hwinfo.address();
    let ini = format!(
        "[hwinfo]\n\
         host = {}\n\
         port = {}\n\
         timeout_secs = 2\n\
         \n\
         [webhook]\n\
         enabled = true\n\
         token = secret\n\
         url = {}/api/states/\n\
         send_system_load = true\n\
         send_detailed_power_usage = {}\n\
         \n\
         [platform]\n\
         name = Desk\n\
         id = desk\n\
         drives_quantity = 3\n\
         psu_efficiency_percentage = 85\n\
         fan_80mm_quantity = 2\n\
         fan_120mm_quantity = 4\n",
        address.ip(),
        address.port(),
        webhook.uri(),
        detailed,
    );
    std::fs::write(path, ini).unwrap();
}

async fn mock_hwinfo(body: ResponseTemplate) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json.json"))
        .respond_with(body)
        .mount(&server)
        .await;
    server
}

async fn mock_webhook(status: u16) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("Authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(status))
        .mount(&server)
        .await;
    server
}

/// (entity path, state) for every request the webhook received, in order.
async fn posted_states(webhook: &MockServer) -> Vec<(String, String)> {
    webhook
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .map(|request| {
            let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
            (
                request.url.path().to_string(),
                body["state"].as_str().unwrap().to_string(),
            )
        })
        .collect()
}

#[tokio::test]
async fn test_cycle_posts_every_entity() {
    let hwinfo = mock_hwinfo(ResponseTemplate::new(200).set_body_raw(DOCUMENT, "application/json")).await;
    let webhook = mock_webhook(200).await;

    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.ini");
    write_config(&config_path, &hwinfo, &webhook, true);

    let settings = Settings::load(&config_path).unwrap();
    let agent = Agent::from_settings(&settings, false).unwrap();
    let summary = agent.run_cycle().await;

    assert!(summary.online);
    assert!(summary.report.is_success());
    assert_eq!(summary.report.sent(), 9);

    let posted = posted_states(&webhook).await;
    let expected = [
        ("/api/states/desk_cpu_load", "70"),
        ("/api/states/desk_gpu_load", "98"),
        ("/api/states/desk_ram_load", "37.5"),
        ("/api/states/desk_total_power", "417"),
        ("/api/states/desk_cpu_power", "138"),
        ("/api/states/desk_gpu_power", "230"),
        ("/api/states/desk_ram_power", "14"),
        ("/api/states/desk_drives_power", "17"),
        ("/api/states/desk_fans_power", "18"),
    ];
    let expected: Vec<(String, String)> = expected
        .iter()
        .map(|(p, s)| (p.to_string(), s.to_string()))
        .collect();
    assert_eq!(posted, expected);
}

#[tokio::test]
async fn test_unreachable_monitor_sends_zeros() {
    let hwinfo = mock_hwinfo(ResponseTemplate::new(503)).await;
    let webhook = mock_webhook(200).await;

    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.ini");
    write_config(&config_path, &hwinfo, &webhook, false);

    let settings = Settings::load(&config_path).unwrap();
    let summary = Agent::from_settings(&settings, false)
        .unwrap()
        .run_cycle()
        .await;

    assert!(!summary.online);
    let posted = posted_states(&webhook).await;
    assert_eq!(posted.len(), 4);
    assert!(posted.iter().all(|(_, state)| state == "0"));
}

#[tokio::test]
async fn test_rejected_updates_are_reported() {
    let hwinfo = mock_hwinfo(ResponseTemplate::new(200).set_body_raw(DOCUMENT, "application/json")).await;
    let webhook = mock_webhook(401).await;

    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.ini");
    write_config(&config_path, &hwinfo, &webhook, false);

    let settings = Settings::load(&config_path).unwrap();
    let summary = Agent::from_settings(&settings, false)
        .unwrap()
        .run_cycle()
        .await;

    // Every update is still attempted
    assert_eq!(summary.report.failed(), 4);
    assert_eq!(webhook.received_requests().await.unwrap().len(), 4);
}

#[test]
fn test_missing_config_is_created_with_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.ini");

    let settings = Settings::load(&config_path).unwrap();
    assert!(config_path.exists());
    assert_eq!(settings, Settings::default());
}
