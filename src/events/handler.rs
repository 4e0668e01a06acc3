//! Event handler for processing input events.

use super::{EventConfig, InputEvent};
use crate::config::KeyBindings;
use crate::error::Result;
use crate::state::{Action, View};
use crossterm::event::{
    self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, MouseEvent, MouseEventKind,
};

/// Handles input events and produces actions.
pub struct EventHandler {
    /// Key bindings.
    keybindings: KeyBindings,
    /// Polling and capture settings.
    config: EventConfig,
}

impl EventHandler {
    /// Create a new event handler.
    pub fn new(keybindings: KeyBindings, config: EventConfig) -> Self {
        Self {
            keybindings,
            config,
        }
    }

    /// Get the next action from user input, waiting at most one tick.
    pub async fn next(&mut self) -> Result<Option<Action>> {
        if event::poll(self.config.tick_rate)? {
            let event = event::read()?;
            match event {
                CrosstermEvent::Key(key) => return Ok(self.handle_key(key)),
                CrosstermEvent::Mouse(mouse) if self.config.mouse_capture => {
                    return Ok(self.handle_mouse(mouse));
                }
                CrosstermEvent::Resize(_, _) => {
                    // Terminal will automatically redraw
                }
                _ => {}
            }
        }
        Ok(None)
    }

    /// Map a key press to an action.
    pub fn handle_key(&self, key: KeyEvent) -> Option<Action> {
        // Only process key press events
        if key.kind != KeyEventKind::Press {
            return None;
        }

        let input = InputEvent::from(key);
        let bindings = &self.keybindings;

        // Ctrl+C always quits
        if input.matches("Ctrl+c") || input.matches(&bindings.quit) {
            return Some(Action::Quit);
        }
        if input.matches(&bindings.help) {
            return Some(Action::ToggleHelp);
        }
        if key.code == KeyCode::Esc {
            return Some(Action::DismissNotification);
        }
        if input.matches(&bindings.refresh) {
            return Some(Action::Refresh);
        }

        // View switching
        let views = [
            (&bindings.home, View::Home),
            (&bindings.signals, View::Signals),
            (&bindings.strategy, View::Strategy),
            (&bindings.analysis, View::Analysis),
            (&bindings.profile, View::Profile),
        ];
        if let Some((_, view)) = views.iter().find(|(binding, _)| input.matches(binding)) {
            return Some(Action::SetView(*view));
        }
        if input.matches(&bindings.next_tab) {
            return Some(Action::NextView);
        }
        if input.matches(&bindings.prev_tab) || key.code == KeyCode::BackTab {
            return Some(Action::PrevView);
        }

        // Navigation
        if input.matches(&bindings.up) || key.code == KeyCode::Up {
            return Some(Action::ScrollUp);
        }
        if input.matches(&bindings.down) || key.code == KeyCode::Down {
            return Some(Action::ScrollDown);
        }
        if key.code == KeyCode::Home {
            return Some(Action::GoToTop);
        }
        if key.code == KeyCode::End {
            return Some(Action::GoToBottom);
        }

        // Selectors and settings
        if input.matches(&bindings.symbol) {
            return Some(Action::CycleSymbol);
        }
        if input.matches(&bindings.interval) {
            return Some(Action::CycleInterval);
        }
        if input.matches(&bindings.filter) {
            return Some(Action::CycleSignalFilter);
        }
        if input.matches(&bindings.category) {
            return Some(Action::CycleStrategyCategory);
        }
        if input.matches(&bindings.toggle_source) {
            return Some(Action::ToggleDataSource);
        }
        if input.matches(&bindings.save) {
            return Some(Action::SaveSettings);
        }

        None
    }

    /// Handle a mouse event and return an optional action.
    fn handle_mouse(&self, mouse: MouseEvent) -> Option<Action> {
        match mouse.kind {
            MouseEventKind::ScrollUp => Some(Action::ScrollUp),
            MouseEventKind::ScrollDown => Some(Action::ScrollDown),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventState, KeyModifiers};

    fn handler() -> EventHandler {
        EventHandler::new(KeyBindings::default(), EventConfig::default())
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn test_number_keys_switch_views() {
        let handler = handler();
        assert!(matches!(
            handler.handle_key(press(KeyCode::Char('4'))),
            Some(Action::SetView(View::Analysis))
        ));
        assert!(matches!(
            handler.handle_key(press(KeyCode::Tab)),
            Some(Action::NextView)
        ));
        assert!(matches!(
            handler.handle_key(press(KeyCode::BackTab)),
            Some(Action::PrevView)
        ));
    }

    #[test]
    fn test_selector_keys() {
        let handler = handler();
        assert!(matches!(
            handler.handle_key(press(KeyCode::Char('s'))),
            Some(Action::CycleSymbol)
        ));
        assert!(matches!(
            handler.handle_key(press(KeyCode::Char('i'))),
            Some(Action::CycleInterval)
        ));
        assert!(matches!(
            handler.handle_key(press(KeyCode::Char('m'))),
            Some(Action::ToggleDataSource)
        ));
        assert!(handler.handle_key(press(KeyCode::Char('z'))).is_none());
    }

    #[test]
    fn test_quit_and_release_events() {
        let handler = handler();
        assert!(matches!(
            handler.handle_key(press(KeyCode::Char('q'))),
            Some(Action::Quit)
        ));

        let mut release = press(KeyCode::Char('q'));
        release.kind = KeyEventKind::Release;
        assert!(handler.handle_key(release).is_none());
    }
}
