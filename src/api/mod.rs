//! Backend API integration.
//!
//! This module provides a typed client for the market-data backend and
//! the records it returns.

mod client;
mod envelope;
mod types;

pub use client::{ApiClient, ApiClientBuilder, DEFAULT_KLINE_LIMIT, DEFAULT_SIGNAL_LIMIT};
pub use envelope::unwrap_data;
pub use types::{
    Analysis, DashboardSnapshot, KlineData, MarketRegime, MarketState, RegimeSnapshot,
    RsiSnapshot, RsiZone, SignalKind, StrategySummary, StrengthLevel, SystemStatus,
    TradingSignal, parse_timestamp,
};
