//! Backend-backed data source.

use super::{DataSource, DataSourceKind};
use crate::api::{
    Analysis, ApiClient, DashboardSnapshot, StrategySummary, SystemStatus, TradingSignal,
};
use crate::error::Result;
use async_trait::async_trait;

/// Serves screen data from the backend through an [`ApiClient`].
pub struct LiveSource {
    client: ApiClient,
    klines_limit: i64,
    signals_limit: i64,
}

impl LiveSource {
    pub fn new(client: ApiClient, klines_limit: i64, signals_limit: i64) -> Self {
        Self {
            client,
            klines_limit,
            signals_limit,
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }
}

#[async_trait]
impl DataSource for LiveSource {
    fn kind(&self) -> DataSourceKind {
        DataSourceKind::Live
    }

    async fn dashboard(&self, symbol: &str, interval: &str) -> Result<DashboardSnapshot> {
        self.client
            .load_dashboard(symbol, interval, self.klines_limit, self.signals_limit)
            .await
    }

    async fn signals(&self, symbol: &str) -> Result<Vec<TradingSignal>> {
        self.client
            .get_trading_signals(symbol, self.signals_limit)
            .await
    }

    async fn strategies(&self) -> Result<Vec<StrategySummary>> {
        self.client.get_strategies().await
    }

    async fn analysis(&self) -> Result<Analysis> {
        self.client.get_analysis().await
    }

    async fn system_status(&self) -> Result<SystemStatus> {
        self.client.get_system_status().await
    }

    async fn health(&self) -> bool {
        self.client.test_connection().await
    }
}
