//! Shared fixtures for integration tests

use chrono::{Duration, TimeZone, Utc};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mount a rating for `asset` on the mock advisory service.
pub async fn mock_rating(server: &MockServer, asset: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/ratings/{}", asset)))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Hourly uptrend bars, one point per hour.
pub fn uptrend_samples_json(count: usize) -> Value {
    let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
    let samples: Vec<Value> = (0..count)
        .map(|i| {
            let close = 100.0 + i as f64;
            json!({
                "open": close - 0.5,
                "high": close + 0.5,
                "low": close - 0.5,
                "close": close,
                "volume": 1000.0,
                "timestamp": (start + Duration::hours(i as i64)).to_rfc3339(),
            })
        })
        .collect();
    Value::Array(samples)
}
