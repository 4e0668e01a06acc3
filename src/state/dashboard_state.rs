//! Home screen state: the symbol/interval selector and the dashboard load.

use crate::api::{DashboardSnapshot, KlineData, MarketState};
use chrono::{DateTime, Utc};

/// State behind the home screen.
#[derive(Debug, Default)]
pub struct DashboardState {
    /// Selected trading pair.
    pub symbol: String,
    /// Selected kline interval.
    pub interval: String,
    /// Pairs offered by the selector.
    pub symbols: Vec<String>,
    /// Intervals offered by the selector.
    pub intervals: Vec<String>,
    /// Last successfully applied load.
    pub snapshot: DashboardSnapshot,
    /// Ticket of the load whose result will be accepted.
    pub pending: Option<u64>,
    /// Selected overview row.
    pub selected_index: Option<usize>,
    /// Last update timestamp.
    pub last_updated: Option<DateTime<Utc>>,
}

impl DashboardState {
    pub fn new(
        symbol: impl Into<String>,
        interval: impl Into<String>,
        symbols: Vec<String>,
        intervals: Vec<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            interval: interval.into(),
            symbols,
            intervals,
            ..Default::default()
        }
    }

    pub fn loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Latest candle per symbol for the overview table.
    pub fn overview(&self) -> Vec<&KlineData> {
        self.snapshot.latest_klines()
    }

    /// Market state reported for the selected symbol, if any.
    pub fn current_market_state(&self) -> Option<&MarketState> {
        self.snapshot
            .market_states
            .iter()
            .find(|m| m.symbol == self.symbol)
            .or_else(|| self.snapshot.market_states.first())
    }

    /// The symbol after the selected one, wrapping around.
    pub fn next_symbol(&self) -> Option<String> {
        cycle(&self.symbols, &self.symbol)
    }

    /// The interval after the selected one, wrapping around.
    pub fn next_interval(&self) -> Option<String> {
        cycle(&self.intervals, &self.interval)
    }
}

fn cycle(options: &[String], current: &str) -> Option<String> {
    if options.is_empty() {
        return None;
    }
    let next = options
        .iter()
        .position(|o| o == current)
        .map(|i| (i + 1) % options.len())
        .unwrap_or(0);
    options.get(next).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> DashboardState {
        DashboardState::new(
            "BTCUSDT",
            "1",
            vec!["BTCUSDT".into(), "ETHUSDT".into()],
            vec!["1".into(), "5".into(), "D".into()],
        )
    }

    #[test]
    fn test_selector_cycles() {
        let mut s = state();
        assert_eq!(s.next_symbol().as_deref(), Some("ETHUSDT"));
        s.symbol = "ETHUSDT".into();
        assert_eq!(s.next_symbol().as_deref(), Some("BTCUSDT"));
        s.interval = "D".into();
        assert_eq!(s.next_interval().as_deref(), Some("1"));
    }

    #[test]
    fn test_unknown_selection_restarts_cycle() {
        let mut s = state();
        s.symbol = "DOGEUSDT".into();
        assert_eq!(s.next_symbol().as_deref(), Some("BTCUSDT"));
        s.symbols.clear();
        assert_eq!(s.next_symbol(), None);
    }
}
