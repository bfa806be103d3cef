//! Integration tests for the HTTP advisory client

use crate::test_utils::mock_rating;
use chrono::{Duration as ChronoDuration, Utc};
use regime_consensus::models::Direction;
use regime_consensus::services::advisory::{AdvisoryAdapter, AdvisoryProvider, HttpAdvisoryClient};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> HttpAdvisoryClient {
    HttpAdvisoryClient::new(&server.uri())
        .expect("valid mock url")
        .with_min_backoff(Duration::from_millis(1))
}

#[test]
fn rating_url_appends_segments() {
    let client = HttpAdvisoryClient::new("http://advisor.local/api").unwrap();
    assert_eq!(
        client.rating_url("BTC").unwrap().as_str(),
        "http://advisor.local/api/ratings/BTC"
    );

    let client = HttpAdvisoryClient::new("http://advisor.local/api/").unwrap();
    assert_eq!(
        client.rating_url("BTC/USD").unwrap().as_str(),
        "http://advisor.local/api/ratings/BTC%2FUSD"
    );
}

#[test]
fn invalid_base_url_is_rejected() {
    assert!(HttpAdvisoryClient::new("not a url").is_err());
    assert!(HttpAdvisoryClient::new("mailto:ops@example.com").is_err());
}

#[tokio::test]
async fn fetches_rating() {
    let server = MockServer::start().await;
    mock_rating(&server, "BTC", json!({"direction": "LONG", "strength": 0.7})).await;

    let rating = client(&server).rate("BTC").await.expect("rating");
    assert_eq!(rating.direction, Direction::Long);
    assert_eq!(rating.strength, 0.7);
}

#[tokio::test]
async fn missing_rating_is_none_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ratings/XRP"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    assert!(client(&server).rate("XRP").await.is_none());
}

#[tokio::test]
async fn server_errors_are_retried_then_give_up() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ratings/ETH"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let client = client(&server).with_max_retries(2);
    assert!(client.rate("ETH").await.is_none());
}

#[tokio::test]
async fn malformed_body_is_none() {
    let server = MockServer::start().await;
    mock_rating(&server, "SOL", json!({"direction": "SIDEWAYS", "strength": 0.5})).await;

    assert!(client(&server).rate("SOL").await.is_none());
}

#[tokio::test]
async fn stale_rating_is_none() {
    let server = MockServer::start().await;
    let as_of = Utc::now() - ChronoDuration::hours(3);
    mock_rating(
        &server,
        "BTC",
        json!({"direction": "SHORT", "strength": 0.4, "as_of": as_of.to_rfc3339()}),
    )
    .await;

    let client = client(&server).with_max_age(ChronoDuration::minutes(15));
    assert!(client.rate("BTC").await.is_none());
}

#[tokio::test]
async fn slow_service_times_out_through_adapter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ratings/BTC"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"direction": "LONG", "strength": 0.9}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let adapter = AdvisoryAdapter::new(Arc::new(client(&server)), Duration::from_millis(50));
    assert!(adapter.rate("BTC").await.is_none());
}
