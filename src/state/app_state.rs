//! Application-level state.

use super::Notification;
use crate::source::DataSourceKind;
use chrono::{DateTime, Utc};

/// The current view/screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Home,
    Signals,
    Strategy,
    Analysis,
    Profile,
}

impl View {
    /// Tab order.
    pub const ALL: [View; 5] = [
        View::Home,
        View::Signals,
        View::Strategy,
        View::Analysis,
        View::Profile,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Signals => "Signals",
            Self::Strategy => "Strategy",
            Self::Analysis => "Analysis",
            Self::Profile => "Profile",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|v| *v == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Global application state.
#[derive(Debug, Default)]
pub struct AppState {
    /// Current view.
    pub current_view: View,
    /// Whether to show help overlay.
    pub show_help: bool,
    /// Current notification and when it was shown.
    pub notification: Option<(Notification, DateTime<Utc>)>,
    /// Current error banner.
    pub error: Option<String>,
    /// Result of the last health check (`None` until one completes).
    pub connected: Option<bool>,
    /// Ticket of the outstanding health check.
    pub health_pending: Option<u64>,
    /// Active data source.
    pub data_source: DataSourceKind,
    /// Time any screen last received data.
    pub last_refresh: Option<DateTime<Utc>>,
    /// Whether the app should quit.
    pub should_quit: bool,
}

impl AppState {
    /// Create a new application state.
    pub fn new(data_source: DataSourceKind) -> Self {
        Self {
            data_source,
            ..Default::default()
        }
    }

    /// Whether the current notification has outlived its duration at `now`.
    pub fn notification_expired(&self, now: DateTime<Utc>) -> bool {
        self.notification.as_ref().is_some_and(|(n, shown_at)| {
            now.signed_duration_since(*shown_at).num_seconds() >= n.duration_secs as i64
        })
    }
}
