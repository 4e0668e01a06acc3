//! Fixed demo data for running without a backend.

use super::{DataSource, DataSourceKind};
use crate::api::{
    Analysis, DashboardSnapshot, KlineData, MarketState, RegimeSnapshot, RsiSnapshot,
    StrategySummary, SystemStatus, TradingSignal,
};
use crate::error::Result;
use async_trait::async_trait;
use chrono::{Duration, SecondsFormat, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;

/// Serves the same demo tables on every call.
#[derive(Debug, Default)]
pub struct MockSource;

impl MockSource {
    pub fn new() -> Self {
        Self
    }
}

fn minutes_ago(minutes: i64) -> String {
    (Utc::now() - Duration::minutes(minutes)).to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn kline(symbol: &str, interval: &str, open: Decimal, close: Decimal, volume: Decimal) -> KlineData {
    KlineData {
        symbol: symbol.to_string(),
        interval: interval.to_string(),
        open_time: minutes_ago(1),
        open,
        high: open.max(close),
        low: open.min(close),
        close,
        volume,
        data_source: "mock".to_string(),
    }
}

fn signal(
    id: i64,
    symbol: &str,
    signal_type: &str,
    strength: f64,
    price: Decimal,
    minutes: i64,
    strategy: &str,
) -> TradingSignal {
    TradingSignal {
        id,
        symbol: symbol.to_string(),
        signal_type: signal_type.to_string(),
        signal_strength: strength,
        price,
        timestamp: minutes_ago(minutes),
        strategy: strategy.to_string(),
    }
}

fn mock_signals() -> Vec<TradingSignal> {
    vec![
        signal(1, "BTCUSDT", "buy", 0.85, dec!(43250), 2, "RSI Resonance"),
        signal(2, "ETHUSDT", "hold", 0.65, dec!(2680), 5, "MA Crossover"),
        signal(3, "BNBUSDT", "sell", 0.78, dec!(315), 8, "Bollinger Breakout"),
        signal(4, "ADAUSDT", "buy", 0.45, dec!(0.45), 15, "RSI Single Period"),
    ]
}

#[allow(clippy::too_many_arguments)]
fn strategy(
    id: i64,
    name: &str,
    description: &str,
    category: &str,
    symbols: &[&str],
    timeframes: &[&str],
    win_rate: f64,
    status: &str,
    today_signals: u32,
) -> StrategySummary {
    StrategySummary {
        id,
        name: name.to_string(),
        description: description.to_string(),
        category: category.to_string(),
        symbols: symbols.iter().map(|s| s.to_string()).collect(),
        timeframes: timeframes.iter().map(|s| s.to_string()).collect(),
        win_rate,
        status: status.to_string(),
        today_signals,
    }
}

#[async_trait]
impl DataSource for MockSource {
    fn kind(&self) -> DataSourceKind {
        DataSourceKind::Mock
    }

    /// The overview always lists the four demo coins; `symbol` only picks
    /// which market state is reported.
    async fn dashboard(&self, symbol: &str, interval: &str) -> Result<DashboardSnapshot> {
        Ok(DashboardSnapshot {
            klines: vec![
                kline("BTCUSDT", interval, dec!(42195.12), dec!(43250.00), dec!(1520.4)),
                kline("ETHUSDT", interval, dec!(2712.55), dec!(2680.00), dec!(18250.7)),
                kline("BNBUSDT", interval, dec!(312.50), dec!(315.00), dec!(40210.0)),
                kline("ADAUSDT", interval, dec!(0.4365), dec!(0.4500), dec!(2450000)),
            ],
            signals: mock_signals().into_iter().take(3).collect(),
            market_states: vec![MarketState {
                symbol: symbol.to_string(),
                market_state: "sideways".to_string(),
                last_analysis: minutes_ago(3),
                volatility: dec!(0.65),
                trend_direction: "neutral".to_string(),
            }],
        })
    }

    async fn signals(&self, _symbol: &str) -> Result<Vec<TradingSignal>> {
        Ok(mock_signals())
    }

    async fn strategies(&self) -> Result<Vec<StrategySummary>> {
        Ok(vec![
            strategy(
                1,
                "RSI Multi-Period Resonance",
                "Resonance across RSI6/12/24",
                "rsi",
                &["BTC", "ETH", "BNB"],
                &["5m", "1h", "4h"],
                78.0,
                "active",
                3,
            ),
            strategy(
                2,
                "MA Crossover",
                "5MA crossing 20MA",
                "ma",
                &["Majors"],
                &["1h", "4h", "1d"],
                65.0,
                "paused",
                0,
            ),
            strategy(
                3,
                "Bollinger Breakout",
                "Price breaking the upper or lower band",
                "bollinger",
                &["BTC", "ETH"],
                &["15m", "1h"],
                72.0,
                "active",
                1,
            ),
        ])
    }

    async fn analysis(&self) -> Result<Analysis> {
        Ok(Analysis {
            symbol: Some("BTCUSDT".to_string()),
            rsi: Some(RsiSnapshot {
                rsi6: 45.2,
                rsi12: 38.7,
                rsi24: 42.1,
                resonance_level: "partial".to_string(),
                signal_strength: "medium".to_string(),
            }),
            market_state: Some(RegimeSnapshot {
                score: 0.65,
                state: "sideways".to_string(),
                confidence: 78.0,
                timeframes: ["5m", "1h", "4h"].map(String::from).to_vec(),
                weights: BTreeMap::from([
                    ("1h".to_string(), 0.4),
                    ("4h".to_string(), 0.3),
                    ("5m".to_string(), 0.3),
                ]),
            }),
            extra: Map::new(),
        })
    }

    async fn system_status(&self) -> Result<SystemStatus> {
        let extra = match json!({
            "total_requests": 15420,
            "successful_requests": 15380,
            "error_count": 40,
            "cache_hit_rate": 85.5,
        }) {
            Value::Object(map) => map,
            _ => Map::new(),
        };

        Ok(SystemStatus {
            status: "running".to_string(),
            uptime: "2 days, 5 hours, 30 minutes".to_string(),
            version: "1.0.0".to_string(),
            database_status: "connected".to_string(),
            websocket_status: "connected".to_string(),
            redis_status: "connected".to_string(),
            last_update: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            extra,
        })
    }

    async fn health(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{MarketRegime, SignalKind, StrengthLevel};

    #[tokio::test]
    async fn test_mock_dashboard_covers_demo_coins() {
        let snapshot = MockSource::new().dashboard("ETHUSDT", "5").await.unwrap();
        assert_eq!(snapshot.latest_klines().len(), 4);
        assert!(snapshot.klines.iter().all(|k| k.interval == "5"));
        assert_eq!(snapshot.market_states[0].symbol, "ETHUSDT");
        assert_eq!(snapshot.market_states[0].regime(), MarketRegime::Sideways);
    }

    #[tokio::test]
    async fn test_mock_signals_are_classifiable() {
        let signals = MockSource::new().signals("BTCUSDT").await.unwrap();
        assert_eq!(signals.len(), 4);
        assert_eq!(signals[0].kind(), SignalKind::Buy);
        assert_eq!(signals[0].strength(), StrengthLevel::Strong);
        assert!(signals.iter().all(|s| s.issued_at().is_some()));
    }

    #[tokio::test]
    async fn test_mock_status_is_healthy() {
        let source = MockSource::new();
        assert!(source.health().await);
        let status = source.system_status().await.unwrap();
        assert!(status.is_running());
        assert!(status.extra.contains_key("total_requests"));
    }
}
