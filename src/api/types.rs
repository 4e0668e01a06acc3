//! Records exchanged with the backend.
//!
//! These are passive: the client never validates them (a candle with
//! `high < low` is returned as-is). The classification helpers only read.

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A single OHLCV candle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KlineData {
    pub symbol: String,
    pub interval: String,
    pub open_time: String,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
    #[serde(default)]
    pub data_source: String,
}

impl KlineData {
    /// Close at or above open.
    pub fn is_bullish(&self) -> bool {
        self.close >= self.open
    }

    /// Candle body change in percent of the open price.
    pub fn change_percent(&self) -> Decimal {
        self.close
            .checked_sub(self.open)
            .and_then(|body| body.checked_div(self.open))
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .unwrap_or(Decimal::ZERO)
    }

    pub fn opened_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.open_time)
    }
}

/// A generated buy/sell/hold recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradingSignal {
    pub id: i64,
    pub symbol: String,
    pub signal_type: String,
    pub signal_strength: f64,
    pub price: Decimal,
    pub timestamp: String,
    pub strategy: String,
}

impl TradingSignal {
    pub fn kind(&self) -> SignalKind {
        SignalKind::parse(&self.signal_type)
    }

    pub fn strength(&self) -> StrengthLevel {
        StrengthLevel::from_score(self.signal_strength)
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.timestamp)
    }
}

/// Coarse classification of recent price action for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketState {
    pub symbol: String,
    pub market_state: String,
    pub last_analysis: String,
    pub volatility: Decimal,
    pub trend_direction: String,
}

impl MarketState {
    pub fn regime(&self) -> MarketRegime {
        MarketRegime::parse(&self.market_state)
    }
}

/// Backend health summary from `/api/status`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemStatus {
    pub status: String,
    pub uptime: String,
    pub version: String,
    pub database_status: String,
    pub websocket_status: String,
    pub redis_status: String,
    pub last_update: String,
    /// Anything else the backend reports.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SystemStatus {
    /// Whether the backend reports itself as up.
    pub fn is_running(&self) -> bool {
        matches!(
            self.status.to_ascii_lowercase().as_str(),
            "running" | "ok" | "healthy"
        )
    }
}

/// A strategy as listed by `/api/strategies`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategySummary {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub category: String,
    pub symbols: Vec<String>,
    pub timeframes: Vec<String>,
    #[serde(alias = "winRate")]
    pub win_rate: f64,
    pub status: String,
    #[serde(alias = "todaySignals")]
    pub today_signals: u32,
}

impl StrategySummary {
    pub fn is_active(&self) -> bool {
        self.status.eq_ignore_ascii_case("active")
    }
}

/// Multi-period RSI reading.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RsiSnapshot {
    pub rsi6: f64,
    pub rsi12: f64,
    pub rsi24: f64,
    #[serde(alias = "resonanceLevel")]
    pub resonance_level: String,
    #[serde(alias = "signalStrength")]
    pub signal_strength: String,
}

/// Weighted market regime across timeframes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegimeSnapshot {
    pub score: f64,
    pub state: String,
    pub confidence: f64,
    pub timeframes: Vec<String>,
    pub weights: BTreeMap<String, f64>,
}

impl RegimeSnapshot {
    pub fn regime(&self) -> MarketRegime {
        MarketRegime::parse(&self.state)
    }
}

/// Result of `/api/analysis`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Analysis {
    pub symbol: Option<String>,
    pub rsi: Option<RsiSnapshot>,
    #[serde(alias = "marketState")]
    pub market_state: Option<RegimeSnapshot>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The three records a dashboard page load needs, fetched together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardSnapshot {
    pub klines: Vec<KlineData>,
    pub signals: Vec<TradingSignal>,
    pub market_states: Vec<MarketState>,
}

impl DashboardSnapshot {
    /// The most recent candle per symbol, in first-seen order.
    pub fn latest_klines(&self) -> Vec<&KlineData> {
        let mut latest: Vec<&KlineData> = Vec::new();
        for kline in &self.klines {
            match latest.iter_mut().find(|k| k.symbol == kline.symbol) {
                Some(slot) if slot.open_time <= kline.open_time => *slot = kline,
                Some(_) => {}
                None => latest.push(kline),
            }
        }
        latest
    }
}

/// Direction of a trading signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalKind {
    Buy,
    Sell,
    Hold,
    Other(String),
}

impl SignalKind {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "buy" | "long" => Self::Buy,
            "sell" | "short" => Self::Sell,
            "hold" | "neutral" => Self::Hold,
            _ => Self::Other(raw.to_string()),
        }
    }
}

impl std::fmt::Display for SignalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
            Self::Hold => write!(f, "HOLD"),
            Self::Other(raw) => write!(f, "{}", raw.to_uppercase()),
        }
    }
}

/// Bucketed signal strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StrengthLevel {
    Weak,
    Medium,
    Strong,
}

impl StrengthLevel {
    /// Scores are expected in `[0, 1]`; anything above 1 is read as a percentage.
    pub fn from_score(score: f64) -> Self {
        let normalized = if score > 1.0 { score / 100.0 } else { score };
        if normalized >= 0.7 {
            Self::Strong
        } else if normalized >= 0.5 {
            Self::Medium
        } else {
            Self::Weak
        }
    }
}

impl std::fmt::Display for StrengthLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Weak => write!(f, "weak"),
            Self::Medium => write!(f, "medium"),
            Self::Strong => write!(f, "strong"),
        }
    }
}

/// Normalized market regime.
///
/// The backend is inconsistent (`trending` vs `trending_up`), so both
/// spellings are accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarketRegime {
    Trending,
    TrendingUp,
    TrendingDown,
    Sideways,
    Volatile,
    Uncertain,
    Unknown(String),
}

impl MarketRegime {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "trending" | "trend" => Self::Trending,
            "trending_up" | "uptrend" => Self::TrendingUp,
            "trending_down" | "downtrend" => Self::TrendingDown,
            "sideways" | "ranging" | "range" => Self::Sideways,
            "volatile" => Self::Volatile,
            "uncertain" => Self::Uncertain,
            _ => Self::Unknown(raw.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Trending => "Trending",
            Self::TrendingUp => "Trending up",
            Self::TrendingDown => "Trending down",
            Self::Sideways => "Sideways",
            Self::Volatile => "Volatile",
            Self::Uncertain => "Uncertain",
            Self::Unknown(_) => "Unknown",
        }
    }
}

/// Where an RSI value sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RsiZone {
    Oversold,
    Neutral,
    Overbought,
}

impl RsiZone {
    pub fn classify(rsi: f64) -> Self {
        if rsi < 30.0 {
            Self::Oversold
        } else if rsi > 70.0 {
            Self::Overbought
        } else {
            Self::Neutral
        }
    }
}

impl std::fmt::Display for RsiZone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Oversold => write!(f, "oversold"),
            Self::Neutral => write!(f, "neutral"),
            Self::Overbought => write!(f, "overbought"),
        }
    }
}

/// Parse the timestamp formats the backend emits (RFC 3339 or naive UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn kline(symbol: &str, open_time: &str, open: Decimal, close: Decimal) -> KlineData {
        KlineData {
            symbol: symbol.to_string(),
            interval: "1".to_string(),
            open_time: open_time.to_string(),
            open,
            high: open.max(close),
            low: open.min(close),
            close,
            volume: dec!(10),
            data_source: "binance".to_string(),
        }
    }

    #[test]
    fn test_kline_from_backend_json() {
        let raw = r#"{
            "symbol": "BTCUSDT", "interval": "5", "open_time": "2024-05-01T10:00:00Z",
            "open": 43000.5, "high": 43300, "low": 42900, "close": 43250.25,
            "volume": 12.5, "data_source": "binance"
        }"#;
        let kline: KlineData = serde_json::from_str(raw).unwrap();
        assert_eq!(kline.close, dec!(43250.25));
        assert!(kline.is_bullish());
        assert!(kline.opened_at().is_some());
    }

    #[test]
    fn test_inverted_candle_is_not_rejected() {
        let raw = r#"{"symbol":"X","interval":"1","open_time":"t","open":1,"high":1,"low":5,"close":2,"volume":0}"#;
        let kline: KlineData = serde_json::from_str(raw).unwrap();
        assert!(kline.high < kline.low);
        assert_eq!(kline.data_source, "");
    }

    #[test]
    fn test_change_percent() {
        let k = kline("BTCUSDT", "t", dec!(200), dec!(205));
        assert_eq!(k.change_percent(), dec!(2.5));
        let flat = kline("BTCUSDT", "t", dec!(0), dec!(5));
        assert_eq!(flat.change_percent(), Decimal::ZERO);
    }

    #[test]
    fn test_change_percent_out_of_range_is_zero() {
        let extreme: KlineData = serde_json::from_value(serde_json::json!({
            "symbol": "BTCUSDT", "interval": "5", "open_time": "t",
            "open": "0.0000000000000000000000000001", "high": "10000000000",
            "low": "0.0000000000000000000000000001", "close": "10000000000", "volume": "1"
        }))
        .unwrap();
        assert_eq!(extreme.change_percent(), Decimal::ZERO);
    }

    #[test]
    fn test_latest_klines_per_symbol() {
        let snapshot = DashboardSnapshot {
            klines: vec![
                kline("BTCUSDT", "2024-05-01T10:00:00Z", dec!(1), dec!(2)),
                kline("ETHUSDT", "2024-05-01T10:00:00Z", dec!(3), dec!(4)),
                kline("BTCUSDT", "2024-05-01T10:01:00Z", dec!(2), dec!(3)),
            ],
            ..Default::default()
        };
        let latest = snapshot.latest_klines();
        assert_eq!(latest.len(), 2);
        assert_eq!(latest[0].close, dec!(3));
        assert_eq!(latest[1].symbol, "ETHUSDT");
    }

    #[test]
    fn test_signal_kind_is_open_ended() {
        assert_eq!(SignalKind::parse("BUY"), SignalKind::Buy);
        assert_eq!(SignalKind::parse(" sell "), SignalKind::Sell);
        assert_eq!(SignalKind::parse("hold"), SignalKind::Hold);
        assert_eq!(
            SignalKind::parse("scale_in"),
            SignalKind::Other("scale_in".to_string())
        );
    }

    #[test]
    fn test_strength_levels() {
        assert_eq!(StrengthLevel::from_score(0.85), StrengthLevel::Strong);
        assert_eq!(StrengthLevel::from_score(0.65), StrengthLevel::Medium);
        assert_eq!(StrengthLevel::from_score(0.2), StrengthLevel::Weak);
        assert_eq!(StrengthLevel::from_score(78.0), StrengthLevel::Strong);
        assert_eq!(StrengthLevel::from_score(45.0), StrengthLevel::Weak);
    }

    #[test]
    fn test_market_regime_accepts_both_spellings() {
        assert_eq!(MarketRegime::parse("trending"), MarketRegime::Trending);
        assert_eq!(MarketRegime::parse("trending_up"), MarketRegime::TrendingUp);
        assert_eq!(MarketRegime::parse("Trending-Down"), MarketRegime::TrendingDown);
        assert_eq!(MarketRegime::parse("SIDEWAYS"), MarketRegime::Sideways);
        assert_eq!(
            MarketRegime::parse("choppy"),
            MarketRegime::Unknown("choppy".to_string())
        );
    }

    #[test]
    fn test_rsi_zones() {
        assert_eq!(RsiZone::classify(25.0), RsiZone::Oversold);
        assert_eq!(RsiZone::classify(30.0), RsiZone::Neutral);
        assert_eq!(RsiZone::classify(70.0), RsiZone::Neutral);
        assert_eq!(RsiZone::classify(70.1), RsiZone::Overbought);
    }

    #[test]
    fn test_strategy_accepts_camel_case_fields() {
        let raw = r#"{"id":1,"name":"RSI","winRate":78,"todaySignals":3,"status":"active"}"#;
        let strategy: StrategySummary = serde_json::from_str(raw).unwrap();
        assert_eq!(strategy.win_rate, 78.0);
        assert_eq!(strategy.today_signals, 3);
        assert!(strategy.is_active());
        assert!(strategy.symbols.is_empty());
    }

    #[test]
    fn test_analysis_keeps_unknown_fields() {
        let raw = r#"{"rsi":{"rsi6":45.2,"resonanceLevel":"partial"},"generated_by":"v2"}"#;
        let analysis: Analysis = serde_json::from_str(raw).unwrap();
        let rsi = analysis.rsi.unwrap();
        assert_eq!(rsi.rsi6, 45.2);
        assert_eq!(rsi.resonance_level, "partial");
        assert!(analysis.market_state.is_none());
        assert_eq!(analysis.extra.get("generated_by"), Some(&Value::from("v2")));
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert!(parse_timestamp("2024-05-01T10:00:00Z").is_some());
        assert!(parse_timestamp("2024-05-01T10:00:00.123").is_some());
        assert!(parse_timestamp("2024-05-01 10:00:00").is_some());
        assert!(parse_timestamp("2 minutes ago").is_none());
    }
}
