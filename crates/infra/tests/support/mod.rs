//! Shared helpers for `qstor-infra` integration tests.

#![allow(dead_code)]

use std::sync::Once;

use qstor_domain::QuantaStorConfig;
use serde_json::Value;
use tracing_subscriber::EnvFilter;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockBuilder, MockServer, ResponseTemplate};

static TRACING: Once = Once::new();

/// Install a test-writer subscriber once; `RUST_LOG` controls the filter.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Client configuration aimed at `server` with every wait set to zero.
pub fn config_for(server: &MockServer) -> QuantaStorConfig {
    let mut config = QuantaStorConfig::new("10.0.0.5", "admin", "secret").with_pool("pool-1");
    config.base_url = Some(format!("{}/qstorapi", server.uri()));
    config.task_delay_unit_ms = 0;
    config.task_poll_interval_ms = 0;
    config.task_poll_attempts = 3;
    config
}

/// `GET /qstorapi/<name>`
pub fn endpoint(name: &str) -> MockBuilder {
    Mock::given(method("GET")).and(path(format!("/qstorapi/{name}")))
}

pub fn ok(body: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}

pub fn rest_error(message: &str) -> ResponseTemplate {
    ok(serde_json::json!({ "RestError": message }))
}

/// Every `taskGet` completes at once with `custom_id`.
pub async fn complete_tasks_with(server: &MockServer, custom_id: &str) {
    endpoint("taskGet")
        .respond_with(ok(serde_json::json!({"taskState": 5, "customId": custom_id})))
        .mount(server)
        .await;
}

/// Endpoints called, in order.
pub async fn endpoints_called(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|request| request.url.path().trim_start_matches("/qstorapi/").to_string())
        .collect()
}
