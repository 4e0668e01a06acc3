//! Key binding strings and the key presses they match.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Modifiers that take part in matching. Others (super, keypad state) are ignored.
const TRACKED: KeyModifiers = KeyModifiers::CONTROL
    .union(KeyModifiers::ALT)
    .union(KeyModifiers::SHIFT);

/// A binding parsed from config, such as `"q"`, `"Ctrl+c"` or `"Shift+BackTab"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    /// Parse a `+`-separated binding. Letters are case-insensitive.
    pub fn parse(spec: &str) -> Option<Self> {
        let mut modifiers = KeyModifiers::NONE;
        let mut code = None;

        for part in spec.split('+').map(str::trim) {
            match part.to_ascii_lowercase().as_str() {
                "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => code = Some(parse_code(part)?),
            }
        }

        code.map(|code| Self { code, modifiers })
    }
}

fn parse_code(name: &str) -> Option<KeyCode> {
    let code = match name.to_ascii_lowercase().as_str() {
        "enter" => KeyCode::Enter,
        "esc" | "escape" => KeyCode::Esc,
        "tab" => KeyCode::Tab,
        "backtab" => KeyCode::BackTab,
        "space" => KeyCode::Char(' '),
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        _ => {
            let mut chars = name.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c.to_ascii_lowercase()),
                _ => return None,
            }
        }
    };
    Some(code)
}

/// A key press reduced to what bindings compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl From<KeyEvent> for InputEvent {
    fn from(event: KeyEvent) -> Self {
        let code = match event.code {
            KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
            other => other,
        };
        Self {
            code,
            modifiers: event.modifiers & TRACKED,
        }
    }
}

impl InputEvent {
    /// The typed character, if any.
    pub fn char(&self) -> Option<char> {
        match self.code {
            KeyCode::Char(c) => Some(c),
            _ => None,
        }
    }

    /// Whether this press matches a binding string.
    ///
    /// Shift is not compared for punctuation, since terminals report
    /// characters like `?` with or without it.
    pub fn matches(&self, binding: &str) -> bool {
        let Some(binding) = KeyBinding::parse(binding) else {
            return false;
        };

        let (mut ours, mut theirs) = (self.modifiers, binding.modifiers);
        if matches!(self.code, KeyCode::Char(c) if !c.is_ascii_alphabetic()) {
            ours.remove(KeyModifiers::SHIFT);
            theirs.remove(KeyModifiers::SHIFT);
        }

        self.code == binding.code && ours == theirs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState};

    fn key(code: KeyCode, modifiers: KeyModifiers) -> InputEvent {
        InputEvent::from(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    #[test]
    fn test_parse_binding() {
        assert_eq!(
            KeyBinding::parse("Ctrl+C"),
            Some(KeyBinding {
                code: KeyCode::Char('c'),
                modifiers: KeyModifiers::CONTROL,
            })
        );
        assert_eq!(KeyBinding::parse("Shift+BackTab").map(|b| b.code), Some(KeyCode::BackTab));
        assert_eq!(KeyBinding::parse("Ctrl+nope"), None);
        assert_eq!(KeyBinding::parse("Ctrl"), None);
    }

    #[test]
    fn test_plain_char_binding() {
        assert!(key(KeyCode::Char('q'), KeyModifiers::NONE).matches("q"));
        assert!(!key(KeyCode::Char('q'), KeyModifiers::CONTROL).matches("q"));
        assert!(key(KeyCode::Char('c'), KeyModifiers::CONTROL).matches("Ctrl+c"));
        assert_eq!(key(KeyCode::Char('w'), KeyModifiers::NONE).char(), Some('w'));
    }

    #[test]
    fn test_punctuation_ignores_shift() {
        assert!(key(KeyCode::Char('?'), KeyModifiers::SHIFT).matches("?"));
        assert!(key(KeyCode::Char('?'), KeyModifiers::NONE).matches("?"));
        assert!(!key(KeyCode::Char('S'), KeyModifiers::SHIFT).matches("s"));
    }

    #[test]
    fn test_named_keys() {
        assert!(key(KeyCode::Tab, KeyModifiers::NONE).matches("Tab"));
        assert!(key(KeyCode::BackTab, KeyModifiers::SHIFT).matches("Shift+BackTab"));
        assert!(key(KeyCode::PageDown, KeyModifiers::NONE).matches("pagedown"));
        assert!(!key(KeyCode::Enter, KeyModifiers::NONE).matches("Esc"));
    }
}
