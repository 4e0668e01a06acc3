//! HTTP client for the market-data backend.

use super::envelope::unwrap_data;
use super::types::{
    Analysis, DashboardSnapshot, KlineData, MarketState, StrategySummary, SystemStatus,
    TradingSignal,
};
use crate::config::ApiConfig;
use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, instrument, warn};

/// Kline limit used when the caller has no preference.
pub const DEFAULT_KLINE_LIMIT: i64 = 100;
/// Signal limit used when the caller has no preference.
pub const DEFAULT_SIGNAL_LIMIT: i64 = 50;

/// Builder for creating an API client.
pub struct ApiClientBuilder {
    config: ApiConfig,
}

impl ApiClientBuilder {
    /// Create a new builder with default config.
    pub fn new() -> Self {
        Self {
            config: ApiConfig::default(),
        }
    }

    /// Set the API configuration.
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.config = config;
        self
    }

    /// Override the backend base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Override the request timeout (0 disables it).
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = secs;
        self
    }

    /// Override the rate limit (0 disables it).
    pub fn rate_limit(mut self, requests_per_second: u32) -> Self {
        self.config.rate_limit = requests_per_second;
        self
    }

    /// Build the API client.
    pub fn build(self) -> Result<ApiClient> {
        ApiClient::new(self.config)
    }
}

impl Default for ApiClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only client for the backend's `/api/*` endpoints.
///
/// Every JSON call shares one path: GET, reject non-2xx without reading
/// the body, parse, unwrap an optional `data` envelope, deserialize.
/// Failures are logged and returned; nothing is retried.
pub struct ApiClient {
    config: ApiConfig,
    base_url: String,
    http: reqwest::Client,
    rate_limiter: Option<Mutex<RateLimiter>>,
}

impl ApiClient {
    /// Create a new API client.
    pub fn new(config: ApiConfig) -> Result<Self> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(Error::config("api.base_url must not be empty"));
        }

        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("flaretion/", env!("CARGO_PKG_VERSION")));
        if config.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeout_secs));
        }
        let http = builder.build()?;

        let rate_limiter =
            (config.rate_limit > 0).then(|| Mutex::new(RateLimiter::new(config.rate_limit)));

        debug!(%base_url, timeout_secs = config.timeout_secs, "api client initialised");

        Ok(Self {
            config,
            base_url,
            http,
            rate_limiter,
        })
    }

    /// Start building a client.
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::new()
    }

    /// The normalized base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The configuration the client was built from.
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// GET /api/klines.
    #[instrument(skip(self), name = "api::get_kline_data")]
    pub async fn get_kline_data(
        &self,
        symbol: &str,
        interval: &str,
        limit: i64,
    ) -> Result<Vec<KlineData>> {
        self.get_json(
            "/api/klines",
            &[
                ("symbol", symbol.to_string()),
                ("interval", interval.to_string()),
                ("limit", limit.to_string()),
            ],
        )
        .await
    }

    /// GET /api/signals.
    #[instrument(skip(self), name = "api::get_trading_signals")]
    pub async fn get_trading_signals(&self, symbol: &str, limit: i64) -> Result<Vec<TradingSignal>> {
        self.get_json(
            "/api/signals",
            &[("symbol", symbol.to_string()), ("limit", limit.to_string())],
        )
        .await
    }

    /// GET /api/market-state.
    #[instrument(skip(self), name = "api::get_market_state")]
    pub async fn get_market_state(&self, symbol: &str) -> Result<Vec<MarketState>> {
        self.get_json("/api/market-state", &[("symbol", symbol.to_string())])
            .await
    }

    /// GET /api/status.
    #[instrument(skip(self), name = "api::get_system_status")]
    pub async fn get_system_status(&self) -> Result<SystemStatus> {
        self.get_json("/api/status", &[]).await
    }

    /// GET /api/strategies. Accepts a bare array or `{"data": [...]}`.
    #[instrument(skip(self), name = "api::get_strategies")]
    pub async fn get_strategies(&self) -> Result<Vec<StrategySummary>> {
        self.get_json("/api/strategies", &[]).await
    }

    /// GET /api/analysis. Accepts a bare object or `{"data": {...}}`.
    #[instrument(skip(self), name = "api::get_analysis")]
    pub async fn get_analysis(&self) -> Result<Analysis> {
        self.get_json("/api/analysis", &[]).await
    }

    /// GET /api/health. `true` only for a 2xx answer; every failure is `false`.
    #[instrument(skip(self), name = "api::test_connection")]
    pub async fn test_connection(&self) -> bool {
        match self.send("/api/health", &[]).await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                warn!(error = %e, "connection test failed");
                false
            }
        }
    }

    /// Klines, signals and market state for one symbol, fetched in parallel.
    ///
    /// All-or-nothing: if any of the three fails the whole load fails.
    #[instrument(skip(self), name = "api::load_dashboard")]
    pub async fn load_dashboard(
        &self,
        symbol: &str,
        interval: &str,
        klines_limit: i64,
        signals_limit: i64,
    ) -> Result<DashboardSnapshot> {
        let (klines, signals, market_states) = tokio::try_join!(
            self.get_kline_data(symbol, interval, klines_limit),
            self.get_trading_signals(symbol, signals_limit),
            self.get_market_state(symbol),
        )?;

        Ok(DashboardSnapshot {
            klines,
            signals,
            market_states,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let result = self.fetch_json(path, query).await;
        if let Err(e) = &result {
            warn!(path, error = %e, "request failed");
        }
        result
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let response = self.send(path, query).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::http(status.as_u16()));
        }

        let bytes = response.bytes().await?;
        let body: serde_json::Value = serde_json::from_slice(&bytes)?;
        let value = serde_json::from_value(unwrap_data(body))?;

        debug!(path, bytes = bytes.len(), "response parsed");
        Ok(value)
    }

    async fn send(&self, path: &str, query: &[(&str, String)]) -> Result<reqwest::Response> {
        self.rate_limit().await;

        let url = format!("{}{}", self.base_url, path);
        let mut request = self.http.get(&url);
        if !query.is_empty() {
            request = request.query(query);
        }
        Ok(request.send().await?)
    }

    async fn rate_limit(&self) {
        if let Some(limiter) = &self.rate_limiter {
            limiter.lock().await.wait().await;
        }
    }
}

/// Token bucket refilled continuously at `requests_per_second`.
struct RateLimiter {
    requests_per_second: f64,
    last_refill: Instant,
    tokens: f64,
}

impl RateLimiter {
    fn new(requests_per_second: u32) -> Self {
        let rate = f64::from(requests_per_second);
        Self {
            requests_per_second: rate,
            last_refill: Instant::now(),
            tokens: rate,
        }
    }

    async fn wait(&mut self) {
        let elapsed = self.last_refill.elapsed().as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.requests_per_second).min(self.requests_per_second);

        if self.tokens < 1.0 {
            let wait = (1.0 - self.tokens) / self.requests_per_second;
            tokio::time::sleep(Duration::from_secs_f64(wait)).await;
            self.tokens = 1.0;
        }

        self.tokens -= 1.0;
        self.last_refill = Instant::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        let client = ApiClient::builder()
            .base_url(" http://localhost:8000/ ")
            .build()
            .unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[test]
    fn test_empty_base_url_is_rejected() {
        let result = ApiClient::builder().base_url("   ").build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limiter_delays_after_burst() {
        let mut limiter = RateLimiter::new(2);
        let start = tokio::time::Instant::now();

        limiter.wait().await;
        limiter.wait().await;
        assert!(start.elapsed() < Duration::from_millis(10));

        limiter.wait().await;
        assert!(start.elapsed() >= Duration::from_millis(400));
    }
}
