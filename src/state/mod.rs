//! State management for Flaretion.
//!
//! Unidirectional data flow in the Elm style: actions go into
//! [`Store::reduce`], which updates state and hands back the fetches the
//! new state needs. The reducer never performs I/O; the loader runs the
//! fetches and feeds their results back in as actions.
//!
//! Every fetch is tagged with a sequence number. A screen only accepts the
//! result of the latest fetch it issued, so a slow response for an old
//! symbol can never overwrite newer data.

mod analysis_state;
mod app_state;
mod dashboard_state;
mod profile_state;
mod signal_state;
mod strategy_state;

pub use analysis_state::AnalysisState;
pub use app_state::{AppState, View};
pub use dashboard_state::DashboardState;
pub use profile_state::{PLANS, ProfileState, SubscriptionPlan, UserProfile};
pub use signal_state::{SignalFilter, SignalState};
pub use strategy_state::{CategoryFilter, StrategyState};

use crate::api::{Analysis, DashboardSnapshot, StrategySummary, SystemStatus, TradingSignal};
use crate::config::Config;
use crate::error::Result;
use crate::source::DataSourceKind;
use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

/// Banner shown for any failed load. Details go to the log.
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load data, check your network connection";

/// Actions that can be dispatched to modify state.
#[derive(Debug, Clone)]
pub enum Action {
    // Navigation
    SetView(View),
    NextView,
    PrevView,

    // Selection
    SelectSymbol(String),
    CycleSymbol,
    SelectInterval(String),
    CycleInterval,
    CycleSignalFilter,
    CycleStrategyCategory,

    // Data refresh
    Refresh,
    RefreshAll,

    // Fetch results
    Loaded { seq: u64, data: Loaded },
    LoadFailed {
        seq: u64,
        target: FetchTarget,
        error: String,
    },

    // Data source
    ToggleDataSource,
    DataSourceChanged(DataSourceKind),

    // Settings
    SaveSettings,

    // UI actions
    ScrollUp,
    ScrollDown,
    GoToTop,
    GoToBottom,
    ToggleHelp,
    ShowNotification(Notification),
    DismissNotification,
    Tick(DateTime<Utc>),

    // Error handling
    SetError(String),
    ClearError,

    // Quit
    Quit,
}

/// A read the loader must perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetch {
    Dashboard { symbol: String, interval: String },
    Signals { symbol: String },
    Strategies,
    Analysis,
    SystemStatus,
    Health,
}

impl Fetch {
    pub fn target(&self) -> FetchTarget {
        match self {
            Self::Dashboard { .. } => FetchTarget::Dashboard,
            Self::Signals { .. } => FetchTarget::Signals,
            Self::Strategies => FetchTarget::Strategies,
            Self::Analysis => FetchTarget::Analysis,
            Self::SystemStatus => FetchTarget::SystemStatus,
            Self::Health => FetchTarget::Health,
        }
    }
}

/// The state slice a fetch result belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchTarget {
    Dashboard,
    Signals,
    Strategies,
    Analysis,
    SystemStatus,
    Health,
}

/// A fetch together with the sequence number its result must carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: u64,
    pub fetch: Fetch,
}

/// Successful fetch payloads.
#[derive(Debug, Clone)]
pub enum Loaded {
    Dashboard(DashboardSnapshot),
    Signals(Vec<TradingSignal>),
    Strategies(Vec<StrategySummary>),
    Analysis(Analysis),
    SystemStatus(SystemStatus),
    Health(bool),
}

/// A notification to display to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
    pub duration_secs: u64,
}

/// Notification severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Info,
            duration_secs: 3,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Success,
            duration_secs: 3,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Warning,
            duration_secs: 5,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Error,
            duration_secs: 10,
        }
    }
}

/// The global state store.
#[derive(Debug)]
pub struct Store {
    /// Application state.
    pub app: AppState,
    /// Home screen.
    pub dashboard: DashboardState,
    /// Signals screen.
    pub signals: SignalState,
    /// Strategy screen.
    pub strategies: StrategyState,
    /// Analysis screen.
    pub analysis: AnalysisState,
    /// Profile screen.
    pub profile: ProfileState,
    /// Last issued fetch sequence number.
    seq: u64,
    /// Action sender for dispatching actions.
    action_tx: mpsc::UnboundedSender<Action>,
}

impl Store {
    /// Create a new store seeded from configuration.
    pub fn new(action_tx: mpsc::UnboundedSender<Action>, config: &Config) -> Self {
        Self {
            app: AppState::new(config.ui.data_source),
            dashboard: DashboardState::new(
                config.ui.default_symbol.clone(),
                config.ui.default_interval.clone(),
                config.ui.symbols.clone(),
                config.ui.intervals.clone(),
            ),
            signals: SignalState::default(),
            strategies: StrategyState::default(),
            analysis: AnalysisState::default(),
            profile: ProfileState::new(config.preferences.clone(), config.api.base_url.clone()),
            seq: 0,
            action_tx,
        }
    }

    /// Dispatch an action to the store.
    pub fn dispatch(&self, action: Action) -> Result<()> {
        self.action_tx
            .send(action)
            .map_err(|e| crate::Error::channel(e.to_string()))
    }

    /// Whether any screen is waiting for data.
    pub fn is_loading(&self) -> bool {
        self.dashboard.loading()
            || self.signals.loading()
            || self.strategies.loading()
            || self.analysis.loading()
            || self.profile.loading()
    }

    /// Apply an action and return the fetches it requires.
    pub fn reduce(&mut self, action: Action) -> Vec<FetchTicket> {
        match action {
            // Navigation
            Action::SetView(view) => {
                if self.app.current_view == view {
                    return Vec::new();
                }
                self.app.current_view = view;
                self.fetches_for_view(view)
            }
            Action::NextView => self.reduce(Action::SetView(self.app.current_view.next())),
            Action::PrevView => self.reduce(Action::SetView(self.app.current_view.prev())),

            // Selection
            Action::SelectSymbol(symbol) => {
                if symbol == self.dashboard.symbol {
                    return Vec::new();
                }
                self.dashboard.symbol = symbol.clone();
                let mut tickets = vec![self.issue(self.dashboard_fetch())];
                // The signals screen is filtered by symbol
                if self.app.current_view == View::Signals {
                    tickets.push(self.issue(Fetch::Signals { symbol }));
                }
                tickets
            }
            Action::CycleSymbol => match self.dashboard.next_symbol() {
                Some(symbol) => self.reduce(Action::SelectSymbol(symbol)),
                None => Vec::new(),
            },
            Action::SelectInterval(interval) => {
                if interval == self.dashboard.interval {
                    return Vec::new();
                }
                self.dashboard.interval = interval;
                vec![self.issue(self.dashboard_fetch())]
            }
            Action::CycleInterval => match self.dashboard.next_interval() {
                Some(interval) => self.reduce(Action::SelectInterval(interval)),
                None => Vec::new(),
            },
            Action::CycleSignalFilter => {
                self.signals.filter = self.signals.filter.next();
                self.signals.selected_index = first_index(self.signals.filtered_signals().len());
                Vec::new()
            }
            Action::CycleStrategyCategory => {
                self.strategies.category = self.strategies.category.next();
                self.strategies.selected_index =
                    first_index(self.strategies.filtered_strategies().len());
                Vec::new()
            }

            // Data refresh
            Action::Refresh => self.fetches_for_view(self.app.current_view),
            Action::RefreshAll => View::ALL
                .into_iter()
                .flat_map(|view| self.fetches_for_view(view))
                .collect(),

            // Fetch results
            Action::Loaded { seq, data } => {
                self.apply_loaded(seq, data);
                Vec::new()
            }
            Action::LoadFailed { seq, target, error } => {
                if accept(self.pending_slot(target), seq) {
                    tracing::debug!(?target, seq, %error, "showing load failure");
                    self.app.error = Some(LOAD_FAILED_MESSAGE.to_string());
                } else {
                    tracing::debug!(?target, seq, "ignoring stale failure");
                }
                Vec::new()
            }

            // Data source
            Action::DataSourceChanged(kind) => {
                self.app.data_source = kind;
                self.app.connected = None;
                for target in [
                    FetchTarget::Dashboard,
                    FetchTarget::Signals,
                    FetchTarget::Strategies,
                    FetchTarget::Analysis,
                    FetchTarget::SystemStatus,
                    FetchTarget::Health,
                ] {
                    *self.pending_slot(target) = None;
                }
                let mut fetches = self.fetches_for_view(self.app.current_view);
                if self.app.current_view != View::Profile {
                    fetches.push(self.issue(Fetch::Health));
                }
                fetches
            }

            // Handled by the app, which owns the data source and config
            Action::ToggleDataSource | Action::SaveSettings => Vec::new(),

            // UI actions
            Action::ScrollUp => {
                self.scroll(-1);
                Vec::new()
            }
            Action::ScrollDown => {
                self.scroll(1);
                Vec::new()
            }
            Action::GoToTop => {
                self.scroll(i32::MIN / 2);
                Vec::new()
            }
            Action::GoToBottom => {
                self.scroll(i32::MAX / 2);
                Vec::new()
            }
            Action::ToggleHelp => {
                self.app.show_help = !self.app.show_help;
                Vec::new()
            }
            Action::ShowNotification(notification) => {
                self.app.notification = Some((notification, Utc::now()));
                Vec::new()
            }
            Action::DismissNotification => {
                self.app.notification = None;
                Vec::new()
            }
            Action::Tick(now) => {
                if self.app.notification_expired(now) {
                    self.app.notification = None;
                }
                Vec::new()
            }

            // Error handling
            Action::SetError(error) => {
                self.app.error = Some(error);
                Vec::new()
            }
            Action::ClearError => {
                self.app.error = None;
                Vec::new()
            }

            // Quit
            Action::Quit => {
                self.app.should_quit = true;
                Vec::new()
            }
        }
    }

    fn dashboard_fetch(&self) -> Fetch {
        Fetch::Dashboard {
            symbol: self.dashboard.symbol.clone(),
            interval: self.dashboard.interval.clone(),
        }
    }

    /// What a view loads when it is shown or refreshed.
    fn fetches_for_view(&mut self, view: View) -> Vec<FetchTicket> {
        match view {
            View::Home => vec![self.issue(self.dashboard_fetch())],
            View::Signals => vec![self.issue(Fetch::Signals {
                symbol: self.dashboard.symbol.clone(),
            })],
            View::Strategy => vec![self.issue(Fetch::Strategies)],
            View::Analysis => vec![self.issue(Fetch::Analysis)],
            View::Profile => vec![self.issue(Fetch::SystemStatus), self.issue(Fetch::Health)],
        }
    }

    /// Allocate a sequence number and mark the target slice as waiting for it.
    fn issue(&mut self, fetch: Fetch) -> FetchTicket {
        self.seq += 1;
        let seq = self.seq;
        let target = fetch.target();
        *self.pending_slot(target) = Some(seq);
        if target != FetchTarget::Health {
            self.app.error = None;
        }
        FetchTicket { seq, fetch }
    }

    fn pending_slot(&mut self, target: FetchTarget) -> &mut Option<u64> {
        match target {
            FetchTarget::Dashboard => &mut self.dashboard.pending,
            FetchTarget::Signals => &mut self.signals.pending,
            FetchTarget::Strategies => &mut self.strategies.pending,
            FetchTarget::Analysis => &mut self.analysis.pending,
            FetchTarget::SystemStatus => &mut self.profile.pending,
            FetchTarget::Health => &mut self.app.health_pending,
        }
    }

    fn apply_loaded(&mut self, seq: u64, data: Loaded) {
        let target = match &data {
            Loaded::Dashboard(_) => FetchTarget::Dashboard,
            Loaded::Signals(_) => FetchTarget::Signals,
            Loaded::Strategies(_) => FetchTarget::Strategies,
            Loaded::Analysis(_) => FetchTarget::Analysis,
            Loaded::SystemStatus(_) => FetchTarget::SystemStatus,
            Loaded::Health(_) => FetchTarget::Health,
        };
        if !accept(self.pending_slot(target), seq) {
            tracing::debug!(?target, seq, "discarding stale response");
            return;
        }

        let now = Utc::now();
        match data {
            Loaded::Dashboard(snapshot) => {
                self.dashboard.snapshot = snapshot;
                self.dashboard.last_updated = Some(now);
                self.dashboard.selected_index =
                    clamp_index(self.dashboard.selected_index, self.dashboard.overview().len());
            }
            Loaded::Signals(signals) => {
                self.signals.signals = signals;
                self.signals.last_updated = Some(now);
                self.signals.selected_index = clamp_index(
                    self.signals.selected_index,
                    self.signals.filtered_signals().len(),
                );
            }
            Loaded::Strategies(strategies) => {
                self.strategies.strategies = strategies;
                self.strategies.last_updated = Some(now);
                self.strategies.selected_index = clamp_index(
                    self.strategies.selected_index,
                    self.strategies.filtered_strategies().len(),
                );
            }
            Loaded::Analysis(analysis) => {
                self.analysis.analysis = Some(analysis);
                self.analysis.last_updated = Some(now);
            }
            Loaded::SystemStatus(status) => {
                self.profile.system_status = Some(status);
                self.profile.last_updated = Some(now);
            }
            Loaded::Health(connected) => {
                self.app.connected = Some(connected);
                return;
            }
        }
        self.app.last_refresh = Some(now);
    }

    fn scroll(&mut self, delta: i32) {
        let (selected, len) = match self.app.current_view {
            View::Home => {
                let len = self.dashboard.overview().len();
                (&mut self.dashboard.selected_index, len)
            }
            View::Signals => {
                let len = self.signals.filtered_signals().len();
                (&mut self.signals.selected_index, len)
            }
            View::Strategy => {
                let len = self.strategies.filtered_strategies().len();
                (&mut self.strategies.selected_index, len)
            }
            View::Analysis | View::Profile => return,
        };

        if len == 0 {
            *selected = None;
            return;
        }
        let current = selected.unwrap_or(0) as i64;
        let next = (current + i64::from(delta)).clamp(0, len as i64 - 1);
        *selected = Some(next as usize);
    }
}

/// Clear `pending` and return true if it was waiting for `seq`.
fn accept(pending: &mut Option<u64>, seq: u64) -> bool {
    if *pending == Some(seq) {
        *pending = None;
        true
    } else {
        false
    }
}

fn first_index(len: usize) -> Option<usize> {
    (len > 0).then_some(0)
}

fn clamp_index(selected: Option<usize>, len: usize) -> Option<usize> {
    match (selected, len) {
        (_, 0) => None,
        (None, _) => Some(0),
        (Some(i), len) => Some(i.min(len - 1)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{KlineData, MarketState};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn store() -> Store {
        let (tx, _rx) = mpsc::unbounded_channel();
        Store::new(tx, &Config::default())
    }

    fn snapshot(symbol: &str) -> DashboardSnapshot {
        DashboardSnapshot {
            klines: vec![KlineData {
                symbol: symbol.to_string(),
                interval: "1".to_string(),
                open_time: "2024-05-01T10:00:00Z".to_string(),
                open: dec!(100),
                high: dec!(110),
                low: dec!(95),
                close: dec!(105),
                volume: dec!(3),
                data_source: "test".to_string(),
            }],
            signals: Vec::new(),
            market_states: vec![MarketState {
                symbol: symbol.to_string(),
                market_state: "trending".to_string(),
                last_analysis: String::new(),
                volatility: dec!(0.1),
                trend_direction: "up".to_string(),
            }],
        }
    }

    fn only_dashboard(fetches: &[FetchTicket]) -> (u64, String, String) {
        assert_eq!(fetches.len(), 1, "expected exactly one fetch: {fetches:?}");
        match &fetches[0].fetch {
            Fetch::Dashboard { symbol, interval } => {
                (fetches[0].seq, symbol.clone(), interval.clone())
            }
            other => panic!("expected dashboard fetch, got {other:?}"),
        }
    }

    #[test]
    fn test_symbol_change_issues_one_fetch() {
        let mut store = store();
        let fetches = store.reduce(Action::SelectSymbol("ETHUSDT".into()));
        let (_, symbol, interval) = only_dashboard(&fetches);
        assert_eq!(symbol, "ETHUSDT");
        assert_eq!(interval, "1");
        assert!(store.dashboard.loading());
    }

    #[test]
    fn test_symbol_change_on_signals_view_reloads_signals() {
        let mut store = store();
        store.reduce(Action::SetView(View::Signals));

        let fetches: Vec<Fetch> = store
            .reduce(Action::CycleSymbol)
            .into_iter()
            .map(|ticket| ticket.fetch)
            .collect();
        assert_eq!(
            fetches,
            vec![
                Fetch::Dashboard {
                    symbol: "ETHUSDT".into(),
                    interval: "1".into(),
                },
                Fetch::Signals {
                    symbol: "ETHUSDT".into(),
                },
            ]
        );
        assert!(store.signals.loading());
    }

    #[test]
    fn test_interval_change_issues_one_fetch() {
        let mut store = store();
        let fetches = store.reduce(Action::CycleInterval);
        let (_, symbol, interval) = only_dashboard(&fetches);
        assert_eq!(symbol, "BTCUSDT");
        assert_eq!(interval, "5");
    }

    #[test]
    fn test_reselecting_same_value_issues_nothing() {
        let mut store = store();
        assert!(store.reduce(Action::SelectSymbol("BTCUSDT".into())).is_empty());
        assert!(store.reduce(Action::SelectInterval("1".into())).is_empty());
    }

    #[test]
    fn test_stale_dashboard_response_is_discarded() {
        let mut store = store();
        let (old_seq, ..) = only_dashboard(&store.reduce(Action::SelectSymbol("ETHUSDT".into())));
        let (new_seq, ..) = only_dashboard(&store.reduce(Action::SelectSymbol("BNBUSDT".into())));

        store.reduce(Action::Loaded {
            seq: new_seq,
            data: Loaded::Dashboard(snapshot("BNBUSDT")),
        });
        store.reduce(Action::Loaded {
            seq: old_seq,
            data: Loaded::Dashboard(snapshot("ETHUSDT")),
        });

        assert_eq!(store.dashboard.snapshot.klines[0].symbol, "BNBUSDT");
        assert!(!store.dashboard.loading());
    }

    #[test]
    fn test_failure_keeps_previous_data() {
        let mut store = store();
        let (seq, ..) = only_dashboard(&store.reduce(Action::Refresh));
        store.reduce(Action::Loaded {
            seq,
            data: Loaded::Dashboard(snapshot("BTCUSDT")),
        });

        let (seq, ..) = only_dashboard(&store.reduce(Action::Refresh));
        store.reduce(Action::LoadFailed {
            seq,
            target: FetchTarget::Dashboard,
            error: "HTTP error! status: 500".into(),
        });

        assert_eq!(store.dashboard.snapshot.klines.len(), 1);
        assert_eq!(store.app.error.as_deref(), Some(LOAD_FAILED_MESSAGE));
        assert!(!store.is_loading());
    }

    #[test]
    fn test_stale_failure_does_not_raise_banner() {
        let mut store = store();
        let (old_seq, ..) = only_dashboard(&store.reduce(Action::Refresh));
        store.reduce(Action::Refresh);
        store.reduce(Action::LoadFailed {
            seq: old_seq,
            target: FetchTarget::Dashboard,
            error: "timeout".into(),
        });
        assert_eq!(store.app.error, None);
        assert!(store.dashboard.loading());
    }

    #[test]
    fn test_new_fetch_clears_error_banner() {
        let mut store = store();
        store.reduce(Action::SetError(LOAD_FAILED_MESSAGE.into()));
        store.reduce(Action::Refresh);
        assert_eq!(store.app.error, None);
    }

    #[test]
    fn test_view_switch_loads_view() {
        let mut store = store();
        let fetches = store.reduce(Action::SetView(View::Profile));
        let kinds: Vec<Fetch> = fetches.into_iter().map(|t| t.fetch).collect();
        assert_eq!(kinds, vec![Fetch::SystemStatus, Fetch::Health]);
        assert!(store.reduce(Action::SetView(View::Profile)).is_empty());

        let fetches = store.reduce(Action::NextView);
        assert_eq!(fetches[0].fetch, Fetch::Dashboard {
            symbol: "BTCUSDT".into(),
            interval: "1".into()
        });
    }

    #[test]
    fn test_refresh_all_covers_every_screen_once() {
        let mut store = store();
        let fetches = store.reduce(Action::RefreshAll);
        let targets: Vec<FetchTarget> = fetches.iter().map(|t| t.fetch.target()).collect();
        assert_eq!(
            targets,
            vec![
                FetchTarget::Dashboard,
                FetchTarget::Signals,
                FetchTarget::Strategies,
                FetchTarget::Analysis,
                FetchTarget::SystemStatus,
                FetchTarget::Health,
            ]
        );
        let mut seqs: Vec<u64> = fetches.iter().map(|t| t.seq).collect();
        seqs.dedup();
        assert_eq!(seqs.len(), fetches.len());
    }

    #[test]
    fn test_source_switch_invalidates_in_flight_loads() {
        let mut store = store();
        let (seq, ..) = only_dashboard(&store.reduce(Action::Refresh));

        let fetches = store.reduce(Action::DataSourceChanged(DataSourceKind::Mock));
        assert_eq!(store.app.data_source, DataSourceKind::Mock);
        assert_eq!(fetches.len(), 2);

        store.reduce(Action::Loaded {
            seq,
            data: Loaded::Dashboard(snapshot("ETHUSDT")),
        });
        assert!(store.dashboard.snapshot.klines.is_empty());
    }

    #[test]
    fn test_health_result_updates_connection() {
        let mut store = store();
        let fetches = store.reduce(Action::SetView(View::Profile));
        let health = fetches.iter().find(|t| t.fetch == Fetch::Health).unwrap();
        store.reduce(Action::Loaded {
            seq: health.seq,
            data: Loaded::Health(false),
        });
        assert_eq!(store.app.connected, Some(false));
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut store = store();
        store.reduce(Action::SetView(View::Signals));
        let seq = store.signals.pending.unwrap();
        let signal = |id| TradingSignal {
            id,
            symbol: "BTCUSDT".into(),
            signal_type: "buy".into(),
            signal_strength: 0.9,
            price: dec!(1),
            timestamp: String::new(),
            strategy: "RSI".into(),
        };
        store.reduce(Action::Loaded {
            seq,
            data: Loaded::Signals(vec![signal(1), signal(2), signal(3)]),
        });
        assert_eq!(store.signals.selected_index, Some(0));

        store.reduce(Action::ScrollUp);
        assert_eq!(store.signals.selected_index, Some(0));
        store.reduce(Action::GoToBottom);
        assert_eq!(store.signals.selected_index, Some(2));
        store.reduce(Action::ScrollDown);
        assert_eq!(store.signals.selected_index, Some(2));
        store.reduce(Action::GoToTop);
        assert_eq!(store.signals.selected_index, Some(0));
    }

    #[test]
    fn test_notification_auto_dismiss() {
        let mut store = store();
        store.reduce(Action::ShowNotification(Notification::info("saved")));
        store.reduce(Action::Tick(Utc::now()));
        assert!(store.app.notification.is_some());
        store.reduce(Action::Tick(Utc::now() + chrono::Duration::seconds(5)));
        assert!(store.app.notification.is_none());
    }
}
