//! Strategy list state.

use crate::api::StrategySummary;
use chrono::{DateTime, Utc};

/// Strategy category filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Rsi,
    Ma,
    Bollinger,
}

impl CategoryFilter {
    pub fn next(self) -> Self {
        match self {
            Self::All => Self::Rsi,
            Self::Rsi => Self::Ma,
            Self::Ma => Self::Bollinger,
            Self::Bollinger => Self::All,
        }
    }

    /// The backend category key this filter selects.
    pub fn key(self) -> Option<&'static str> {
        match self {
            Self::All => None,
            Self::Rsi => Some("rsi"),
            Self::Ma => Some("ma"),
            Self::Bollinger => Some("bollinger"),
        }
    }
}

impl std::fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "All"),
            Self::Rsi => write!(f, "RSI"),
            Self::Ma => write!(f, "MA"),
            Self::Bollinger => write!(f, "Bollinger"),
        }
    }
}

/// State for the strategy screen.
#[derive(Debug, Default)]
pub struct StrategyState {
    pub strategies: Vec<StrategySummary>,
    pub category: CategoryFilter,
    pub selected_index: Option<usize>,
    pub pending: Option<u64>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl StrategyState {
    pub fn loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn filtered_strategies(&self) -> Vec<&StrategySummary> {
        self.strategies
            .iter()
            .filter(|s| match self.category.key() {
                Some(key) => s.category.eq_ignore_ascii_case(key),
                None => true,
            })
            .collect()
    }

    /// Number of strategies currently running.
    pub fn active_count(&self) -> usize {
        self.strategies.iter().filter(|s| s.is_active()).count()
    }
}
