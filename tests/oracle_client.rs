use std::sync::Arc;
use std::time::Duration;

use pushyswap::domain::price::{PriceBook, PriceOracle};
use pushyswap::domain::registry::TokenRegistry;
use pushyswap::infrastructure::oracle::CoinGeckoClient;
use pushyswap::shared::errors::PriceError;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mock_price(server: &MockServer, id: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/simple/price"))
        .and(query_param("ids", id))
        .and(query_param("vs_currencies", "usd"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_parses_simple_price_response() {
    let server = MockServer::start().await;
    mock_price(&server, "ethereum", json!({"ethereum": {"usd": 3120.42}})).await;

    let client = CoinGeckoClient::new(server.uri(), None).unwrap();
    let price = client.usd_price("ethereum").await.unwrap();

    assert_eq!(price, 3120.42);
}

#[tokio::test]
async fn test_missing_id_is_invalid_data() {
    let server = MockServer::start().await;
    mock_price(&server, "solana", json!({})).await;

    let client = CoinGeckoClient::new(server.uri(), None).unwrap();
    let err = client.usd_price("solana").await.unwrap_err();

    assert!(matches!(err, PriceError::InvalidPriceData(_)));
}

#[tokio::test]
async fn test_http_error_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/simple/price"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let client = CoinGeckoClient::new(server.uri(), None).unwrap();
    let err = client.usd_price("ethereum").await.unwrap_err();

    assert!(matches!(err, PriceError::FeedUnavailable(_)));
}

#[tokio::test]
async fn test_slow_oracle_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/simple/price"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"ethereum": {"usd": 3000.0}}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let client = CoinGeckoClient::new(server.uri(), Some(Duration::from_millis(50))).unwrap();
    assert!(client.usd_price("ethereum").await.is_err());
}

#[tokio::test]
async fn test_price_book_degrades_to_fallback() {
    let server = MockServer::start().await;
    mock_price(&server, "ethereum", json!({"ethereum": {"usd": 3000.0}})).await;
    Mock::given(method("GET"))
        .and(path("/simple/price"))
        .and(query_param("ids", "solana"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mock_price(&server, "usd-coin", json!({"usd-coin": {"usd": 0.0}})).await;

    let registry = Arc::new(TokenRegistry::default());
    let oracle = Arc::new(CoinGeckoClient::new(server.uri(), None).unwrap());
    let prices = PriceBook::new(oracle, registry.clone());

    assert_eq!(prices.get_token_price("pETH").await, 3000.0);
    assert_eq!(
        prices.get_token_price("pSOL").await,
        registry.fallback_price("pSOL").unwrap()
    );
    // non-positive oracle answers are rejected
    assert_eq!(
        prices.get_token_price("pUSDC").await,
        registry.fallback_price("pUSDC").unwrap()
    );
}
