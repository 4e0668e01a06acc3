//! Analysis screen state.

use crate::api::{Analysis, MarketRegime, RsiZone};
use chrono::{DateTime, Utc};

#[derive(Debug, Default)]
pub struct AnalysisState {
    pub analysis: Option<Analysis>,
    pub pending: Option<u64>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl AnalysisState {
    pub fn loading(&self) -> bool {
        self.pending.is_some()
    }

    /// RSI readings labelled by period, with their zone.
    pub fn rsi_readings(&self) -> Vec<(&'static str, f64, RsiZone)> {
        self.analysis
            .as_ref()
            .and_then(|a| a.rsi.as_ref())
            .map(|rsi| {
                [("RSI 6", rsi.rsi6), ("RSI 12", rsi.rsi12), ("RSI 24", rsi.rsi24)]
                    .into_iter()
                    .map(|(label, value)| (label, value, RsiZone::classify(value)))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn regime(&self) -> Option<MarketRegime> {
        self.analysis
            .as_ref()
            .and_then(|a| a.market_state.as_ref())
            .map(|m| m.regime())
    }
}
