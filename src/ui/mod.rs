//! UI rendering using ratatui.
//!
//! Rendering is a pure function of the [`Store`]; nothing here mutates
//! state or performs I/O.

mod layout;
mod widgets;

pub use layout::{Layout, centered_rect};
pub use widgets::{
    AnalysisView, HelpPanel, HomeView, ProfileView, SignalsView, StatusBar, StrategiesView, TabBar,
};

use crate::config::KeyBindings;
use crate::state::{Store, View};
use ratatui::Frame;

/// Main UI renderer.
pub struct Ui;

impl Ui {
    /// Render the entire UI.
    pub fn render(frame: &mut Frame, store: &Store, keys: &KeyBindings) {
        let layout = Layout::new(frame.area(), store.app.error.is_some());

        StatusBar::render(frame, layout.status_area, store);
        TabBar::render(frame, layout.tab_area, store);

        if let (Some(error), Some(area)) = (&store.app.error, layout.banner_area) {
            widgets::render_error(frame, area, error);
        }

        match store.app.current_view {
            View::Home => HomeView::render(frame, layout.main_area, store),
            View::Signals => SignalsView::render(frame, layout.main_area, store),
            View::Strategy => StrategiesView::render(frame, layout.main_area, store),
            View::Analysis => AnalysisView::render(frame, layout.main_area, store),
            View::Profile => ProfileView::render(frame, layout.main_area, store),
        }

        if store.app.show_help {
            HelpPanel::render(frame, frame.area(), keys);
        }

        if let Some((notification, _)) = &store.app.notification {
            widgets::render_notification(frame, layout.notification_area, notification);
        }
    }
}
