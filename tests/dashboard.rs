//! Dashboard loads against a local axum server.

use axum::{Json, Router, http::StatusCode, routing::get};
use flaretion::config::ApiConfig;
use flaretion::source::{DataSource, LiveSource};
use flaretion::{ApiClient, Error};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio_test::{assert_err, assert_ok};

async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn klines() -> Value {
    json!([
        {"symbol": "BTCUSDT", "interval": "5", "open_time": "2024-05-01T10:00:00Z",
         "open": 42000, "high": 42500, "low": 41900, "close": 42400, "volume": 10},
        {"symbol": "BTCUSDT", "interval": "5", "open_time": "2024-05-01T10:05:00Z",
         "open": 42400, "high": 42600, "low": 42100, "close": 42200, "volume": 8}
    ])
}

fn signals() -> Value {
    json!([{
        "id": 1, "symbol": "BTCUSDT", "signal_type": "buy", "signal_strength": 0.85,
        "price": 42200, "timestamp": "2024-05-01T10:06:00Z", "strategy": "RSI Resonance"
    }])
}

fn market_states() -> Value {
    json!([{
        "symbol": "BTCUSDT", "market_state": "trending_up", "last_analysis": "2024-05-01T10:06:00Z",
        "volatility": 0.12, "trend_direction": "up"
    }])
}

fn healthy_backend() -> Router {
    Router::new()
        .route("/api/klines", get(|| async { Json(klines()) }))
        .route("/api/signals", get(|| async { Json(signals()) }))
        .route("/api/market-state", get(|| async { Json(market_states()) }))
}

fn live_source(base_url: String) -> LiveSource {
    let client = ApiClient::new(ApiConfig {
        base_url,
        ..ApiConfig::default()
    })
    .unwrap();
    LiveSource::new(client, 20, 10)
}

#[tokio::test]
async fn test_dashboard_combines_all_three_endpoints() {
    let source = live_source(serve(healthy_backend()).await);

    let snapshot = assert_ok!(source.dashboard("BTCUSDT", "5").await);
    assert_eq!(snapshot.klines.len(), 2);
    assert_eq!(snapshot.signals.len(), 1);
    assert_eq!(snapshot.market_states.len(), 1);

    // The overview keeps the newest candle per symbol
    let latest = snapshot.latest_klines();
    assert_eq!(latest.len(), 1);
    assert_eq!(latest[0].open_time, "2024-05-01T10:05:00Z");
}

#[tokio::test]
async fn test_dashboard_fails_whole_when_one_part_fails() {
    for broken in ["/api/klines", "/api/signals", "/api/market-state"] {
        let mut router = Router::new();
        for (path, body) in [
            ("/api/klines", klines()),
            ("/api/signals", signals()),
            ("/api/market-state", market_states()),
        ] {
            router = if path == broken {
                router.route(path, get(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
            } else {
                router.route(path, get(move || async move { Json(body) }))
            };
        }

        let source = live_source(serve(router).await);
        let err = assert_err!(source.dashboard("BTCUSDT", "5").await);
        assert!(
            matches!(err, Error::Http { status: 500 }),
            "{broken}: unexpected error {err}"
        );
    }
}

#[tokio::test]
async fn test_unreachable_backend_reports_unhealthy() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let source = live_source(base);
    assert!(!source.health().await);
    let err = assert_err!(source.strategies().await);
    assert!(err.is_recoverable());
}
