//! Profile screen state: account summary, preferences and backend status.

use crate::api::SystemStatus;
use crate::config::Preferences;
use chrono::{DateTime, Utc};

/// Account summary shown at the top of the profile screen.
#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub subscription: String,
    pub expiry_date: String,
    pub total_signals: u32,
    pub win_rate: f64,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            name: "Zhang San".to_string(),
            email: "user@example.com".to_string(),
            subscription: "Professional".to_string(),
            expiry_date: "2024-12-31".to_string(),
            total_signals: 1247,
            win_rate: 78.0,
        }
    }
}

/// A subscription tier.
#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionPlan {
    pub name: &'static str,
    pub price: &'static str,
    pub features: &'static [&'static str],
}

/// The tiers offered on the profile screen.
pub static PLANS: [SubscriptionPlan; 3] = [
    SubscriptionPlan {
        name: "Free",
        price: "free",
        features: &["Basic RSI analysis", "3 strategies", "Basic alerts"],
    },
    SubscriptionPlan {
        name: "Professional",
        price: "$9/mo",
        features: &[
            "Multi-period RSI resonance",
            "Unlimited strategies",
            "Advanced alerts",
            "Backtesting",
        ],
    },
    SubscriptionPlan {
        name: "Premium",
        price: "$29/mo",
        features: &[
            "AI parameter tuning",
            "On-chain data",
            "Community strategies",
            "Priority support",
        ],
    },
];

#[derive(Debug, Default)]
pub struct ProfileState {
    pub user: UserProfile,
    pub preferences: Preferences,
    /// Backend base URL in use.
    pub base_url: String,
    pub system_status: Option<SystemStatus>,
    pub pending: Option<u64>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl ProfileState {
    pub fn new(preferences: Preferences, base_url: impl Into<String>) -> Self {
        Self {
            preferences,
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn loading(&self) -> bool {
        self.pending.is_some()
    }

    /// The plan matching the user's subscription.
    pub fn current_plan(&self) -> Option<&'static SubscriptionPlan> {
        PLANS
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(&self.user.subscription))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_plan() {
        let state = ProfileState::default();
        assert_eq!(state.current_plan().map(|p| p.price), Some("$9/mo"));
    }
}
