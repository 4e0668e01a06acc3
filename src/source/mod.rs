//! Where screen data comes from.
//!
//! Every screen renders from the store, and the store is filled from a
//! [`DataSource`]. The live source talks to the backend; the mock source
//! serves fixed tables so the UI can be used without one.

mod live;
mod mock;

pub use live::LiveSource;
pub use mock::MockSource;

use crate::api::{
    Analysis, ApiClient, DashboardSnapshot, StrategySummary, SystemStatus, TradingSignal,
};
use crate::config::Config;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Which [`DataSource`] implementation to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSourceKind {
    #[default]
    Live,
    Mock,
}

impl DataSourceKind {
    pub fn toggled(self) -> Self {
        match self {
            Self::Live => Self::Mock,
            Self::Mock => Self::Live,
        }
    }
}

impl std::fmt::Display for DataSourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Live => write!(f, "Live"),
            Self::Mock => write!(f, "Mock"),
        }
    }
}

/// Provider of everything the screens display.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Which implementation this is.
    fn kind(&self) -> DataSourceKind;

    /// Klines, signals and market state for the home screen, all or nothing.
    async fn dashboard(&self, symbol: &str, interval: &str) -> Result<DashboardSnapshot>;

    /// Recent trading signals.
    async fn signals(&self, symbol: &str) -> Result<Vec<TradingSignal>>;

    /// Strategy list.
    async fn strategies(&self) -> Result<Vec<StrategySummary>>;

    /// RSI and market regime analysis.
    async fn analysis(&self) -> Result<Analysis>;

    /// Backend status.
    async fn system_status(&self) -> Result<SystemStatus>;

    /// Whether the backend answers its health check.
    async fn health(&self) -> bool;
}

/// Build the data source selected by `kind`.
pub fn build(kind: DataSourceKind, config: &Config) -> Result<Arc<dyn DataSource>> {
    Ok(match kind {
        DataSourceKind::Live => {
            let client = ApiClient::new(config.api.clone())?;
            Arc::new(LiveSource::new(
                client,
                config.ui.klines_limit,
                config.ui.signals_limit,
            ))
        }
        DataSourceKind::Mock => Arc::new(MockSource::new()),
    })
}
