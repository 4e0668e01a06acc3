//! Main application module.
//!
//! This module contains the main `App` struct that coordinates
//! the event loop, state management, and rendering.

use crate::config::Config;
use crate::error::Result;
use crate::events::{EventConfig, EventHandler};
use crate::loader::Loader;
use crate::source::{self, DataSource, DataSourceKind, MockSource};
use crate::state::{Action, FetchTicket, Notification, Store};
use crate::ui::Ui;

use chrono::Utc;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::{info, warn};

/// The main application.
pub struct App {
    /// Terminal.
    terminal: Terminal<CrosstermBackend<Stdout>>,
    /// Application store.
    store: Store,
    /// Event handler.
    event_handler: EventHandler,
    /// Action receiver.
    action_rx: mpsc::UnboundedReceiver<Action>,
    /// Runs fetches against the active data source.
    loader: Loader,
    /// Periodic refresh of the current view.
    auto_refresh: Option<Interval>,
    /// Configuration.
    config: Config,
}

impl App {
    /// Create a new application.
    pub async fn new(mut config: Config) -> Result<Self> {
        let data_source = open_source(&mut config);

        // Set up terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if config.ui.mouse_support {
            execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        } else {
            execute!(stdout, EnterAlternateScreen)?;
        }
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        // Create action channel
        let (action_tx, action_rx) = mpsc::unbounded_channel();

        let store = Store::new(action_tx.clone(), &config);
        let event_handler = EventHandler::new(
            config.keybindings.clone(),
            EventConfig::from(&config.ui),
        );
        let loader = Loader::new(data_source, action_tx);
        let auto_refresh = auto_refresh_interval(&config);

        info!(
            source = %loader.source_kind(),
            base_url = %config.api.base_url,
            "application started"
        );

        Ok(Self {
            terminal,
            store,
            event_handler,
            action_rx,
            loader,
            auto_refresh,
            config,
        })
    }

    /// Run the application event loop.
    pub async fn run(&mut self) -> Result<()> {
        // Initial load of every screen plus the health check
        let tickets = self.store.reduce(Action::RefreshAll);
        self.spawn(tickets);

        // Main event loop
        loop {
            // Render UI
            self.terminal.draw(|frame| {
                Ui::render(frame, &self.store, &self.config.keybindings);
            })?;

            // Handle events and actions
            tokio::select! {
                // Handle terminal events
                result = self.event_handler.next() => {
                    if let Some(action) = result? {
                        self.handle_action(action);
                    }
                }

                // Handle actions from the channel
                Some(action) = self.action_rx.recv() => {
                    self.handle_action(action);
                }

                // Periodic refresh
                _ = next_refresh(&mut self.auto_refresh) => {
                    self.handle_action(Action::Refresh);
                }
            }

            self.store.reduce(Action::Tick(Utc::now()));

            // Check if we should quit
            if self.store.app.should_quit {
                info!("quitting");
                break;
            }
        }

        Ok(())
    }

    /// Handle an action.
    fn handle_action(&mut self, action: Action) {
        match action {
            Action::ToggleDataSource => {
                self.switch_source(self.store.app.data_source.toggled());
            }
            Action::SaveSettings => self.save_settings(),
            _ => {
                // Let the store handle the action
                let tickets = self.store.reduce(action);
                self.spawn(tickets);
            }
        }
    }

    fn spawn(&self, tickets: Vec<FetchTicket>) {
        self.loader.spawn_all(tickets);
    }

    /// Swap the data source and reload what is on screen.
    fn switch_source(&mut self, kind: DataSourceKind) {
        match source::build(kind, &self.config) {
            Ok(source) => {
                info!(%kind, "switching data source");
                self.loader.set_source(source);
                let tickets = self.store.reduce(Action::DataSourceChanged(kind));
                self.spawn(tickets);
                self.store.reduce(Action::ShowNotification(Notification::info(format!(
                    "Using {kind} data"
                ))));
            }
            Err(e) => {
                warn!(%kind, error = %e, "failed to switch data source");
                self.store
                    .reduce(Action::ShowNotification(Notification::error(e.to_string())));
            }
        }
    }

    /// Persist the current selection and data source.
    fn save_settings(&mut self) {
        self.config.ui.data_source = self.store.app.data_source;
        self.config.ui.default_symbol = self.store.dashboard.symbol.clone();
        self.config.ui.default_interval = self.store.dashboard.interval.clone();

        let notification = match self.config.save(None) {
            Ok(path) => Notification::success(format!("Settings saved to {}", path.display())),
            Err(e) => {
                warn!(error = %e, "failed to save settings");
                Notification::error(format!("Failed to save settings: {e}"))
            }
        };
        self.store.reduce(Action::ShowNotification(notification));
    }
}

impl Drop for App {
    fn drop(&mut self) {
        // Restore terminal state
        let _ = disable_raw_mode();
        let _ = execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        );
        let _ = self.terminal.show_cursor();
    }
}

/// Build the configured data source, falling back to mock data.
fn open_source(config: &mut Config) -> Arc<dyn DataSource> {
    match source::build(config.ui.data_source, config) {
        Ok(source) => source,
        Err(e) => {
            warn!(error = %e, "live data source unavailable, using mock data");
            config.ui.data_source = DataSourceKind::Mock;
            Arc::new(MockSource::new())
        }
    }
}

fn auto_refresh_interval(config: &Config) -> Option<Interval> {
    if !config.preferences.auto_refresh || config.ui.auto_refresh_secs == 0 {
        return None;
    }
    let period = Duration::from_secs(config.ui.auto_refresh_secs);
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    Some(interval)
}

async fn next_refresh(interval: &mut Option<Interval>) {
    match interval {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_auto_refresh_disabled() {
        let mut config = Config::default();
        config.ui.auto_refresh_secs = 0;
        assert!(auto_refresh_interval(&config).is_none());

        let mut config = Config::default();
        config.preferences.auto_refresh = false;
        assert!(auto_refresh_interval(&config).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_auto_refresh_waits_one_period() {
        let config = Config::default();
        let mut interval = auto_refresh_interval(&config);
        let start = Instant::now();
        next_refresh(&mut interval).await;
        assert_eq!(
            start.elapsed(),
            Duration::from_secs(config.ui.auto_refresh_secs)
        );
    }

    #[test]
    fn test_broken_live_config_falls_back_to_mock() {
        let mut config = Config::default();
        config.api.base_url = String::new();
        let source = open_source(&mut config);
        assert_eq!(source.kind(), DataSourceKind::Mock);
        assert_eq!(config.ui.data_source, DataSourceKind::Mock);
    }
}
