//! Signal list state.

use crate::api::{SignalKind, TradingSignal};
use chrono::{DateTime, Utc};

/// Which signals the list shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignalFilter {
    #[default]
    All,
    Buy,
    Sell,
    Hold,
}

impl SignalFilter {
    pub fn next(self) -> Self {
        match self {
            Self::All => Self::Buy,
            Self::Buy => Self::Sell,
            Self::Sell => Self::Hold,
            Self::Hold => Self::All,
        }
    }

    pub fn matches(self, signal: &TradingSignal) -> bool {
        match self {
            Self::All => true,
            Self::Buy => signal.kind() == SignalKind::Buy,
            Self::Sell => signal.kind() == SignalKind::Sell,
            Self::Hold => signal.kind() == SignalKind::Hold,
        }
    }
}

impl std::fmt::Display for SignalFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "All"),
            Self::Buy => write!(f, "Buy"),
            Self::Sell => write!(f, "Sell"),
            Self::Hold => write!(f, "Hold"),
        }
    }
}

/// State for the signals screen.
#[derive(Debug, Default)]
pub struct SignalState {
    pub signals: Vec<TradingSignal>,
    pub filter: SignalFilter,
    pub selected_index: Option<usize>,
    pub pending: Option<u64>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl SignalState {
    pub fn loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn filtered_signals(&self) -> Vec<&TradingSignal> {
        self.signals
            .iter()
            .filter(|s| self.filter.matches(s))
            .collect()
    }

    pub fn selected_signal(&self) -> Option<&TradingSignal> {
        self.selected_index
            .and_then(|i| self.filtered_signals().get(i).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn signal(id: i64, signal_type: &str) -> TradingSignal {
        TradingSignal {
            id,
            symbol: "BTCUSDT".into(),
            signal_type: signal_type.into(),
            signal_strength: 0.5,
            price: dec!(100),
            timestamp: String::new(),
            strategy: "RSI".into(),
        }
    }

    #[test]
    fn test_filter_by_kind() {
        let mut state = SignalState {
            signals: vec![signal(1, "buy"), signal(2, "SELL"), signal(3, "hold"), signal(4, "x")],
            ..Default::default()
        };
        assert_eq!(state.filtered_signals().len(), 4);

        state.filter = SignalFilter::Sell;
        let ids: Vec<i64> = state.filtered_signals().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![2]);

        state.filter = state.filter.next();
        assert_eq!(state.filter, SignalFilter::Hold);
        state.selected_index = Some(0);
        assert_eq!(state.selected_signal().map(|s| s.id), Some(3));
    }
}
