//! Key bindings and translation of key presses into commands
//!
//! Terminal auto-repeat supplies held-key repeats, so every press maps to
//! exactly one command.

use crate::game::Action;
use crate::settings::Settings;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What a key press asks the host to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// One of the six game controls
    Game(Action),
    /// Start a session if none is running
    Start,
    /// Throw away the current session and begin a new one
    Restart,
    Quit,
}

/// Key bindings configuration - supports multiple keys per action
#[derive(Debug, Clone)]
pub struct KeyBindings {
    pub move_left: Vec<KeyCode>,
    pub move_right: Vec<KeyCode>,
    pub soft_drop: Vec<KeyCode>,
    pub rotate: Vec<KeyCode>,
    pub hard_drop: Vec<KeyCode>,
    pub pause: Vec<KeyCode>,
    pub restart: Vec<KeyCode>,
    pub quit: Vec<KeyCode>,
}

impl KeyBindings {
    /// Parse a key string into KeyCode
    fn parse_key(s: &str) -> Option<KeyCode> {
        let code = match s.to_lowercase().as_str() {
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "space" => KeyCode::Char(' '),
            "enter" => KeyCode::Enter,
            "tab" => KeyCode::Tab,
            "esc" | "escape" => KeyCode::Esc,
            "backspace" => KeyCode::Backspace,
            s => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyCode::Char(c),
                    _ => {
                        tracing::warn!("unknown key name in settings: {:?}", s);
                        return None;
                    }
                }
            }
        };
        Some(code)
    }

    /// Parse a list of key strings into KeyCodes
    fn parse_keys(keys: &[String]) -> Vec<KeyCode> {
        keys.iter().filter_map(|s| Self::parse_key(s)).collect()
    }

    /// Create keybindings from settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            move_left: Self::parse_keys(&settings.keys.move_left),
            move_right: Self::parse_keys(&settings.keys.move_right),
            soft_drop: Self::parse_keys(&settings.keys.soft_drop),
            rotate: Self::parse_keys(&settings.keys.rotate),
            hard_drop: Self::parse_keys(&settings.keys.hard_drop),
            pause: Self::parse_keys(&settings.keys.pause),
            restart: Self::parse_keys(&settings.keys.restart),
            quit: Self::parse_keys(&settings.keys.quit),
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// Maps key events onto commands
#[derive(Debug, Clone, Default)]
pub struct InputHandler {
    bindings: KeyBindings,
}

impl InputHandler {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            bindings: KeyBindings::from_settings(settings),
        }
    }

    /// Handle a key press event
    pub fn key_down(&self, key: KeyEvent) -> Option<Command> {
        // Ctrl+C always quits
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Command::Quit);
        }

        let code = normalize_key(key.code);
        let b = &self.bindings;

        let command = if b.move_left.contains(&code) {
            Command::Game(Action::MoveLeft)
        } else if b.move_right.contains(&code) {
            Command::Game(Action::MoveRight)
        } else if b.soft_drop.contains(&code) {
            Command::Game(Action::SoftDrop)
        } else if b.rotate.contains(&code) {
            Command::Game(Action::Rotate)
        } else if b.hard_drop.contains(&code) {
            Command::Game(Action::HardDrop)
        } else if b.pause.contains(&code) {
            Command::Game(Action::TogglePause)
        } else if b.restart.contains(&code) {
            Command::Restart
        } else if b.quit.contains(&code) {
            Command::Quit
        } else if code == KeyCode::Enter {
            Command::Start
        } else {
            return None;
        };
        Some(command)
    }
}

/// Normalize key codes for consistent handling
fn normalize_key(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_default_bindings() {
        let input = InputHandler::default();
        assert_eq!(input.key_down(press(KeyCode::Left)), Some(Command::Game(Action::MoveLeft)));
        assert_eq!(input.key_down(press(KeyCode::Char('d'))), Some(Command::Game(Action::MoveRight)));
        assert_eq!(input.key_down(press(KeyCode::Down)), Some(Command::Game(Action::SoftDrop)));
        assert_eq!(input.key_down(press(KeyCode::Up)), Some(Command::Game(Action::Rotate)));
        assert_eq!(input.key_down(press(KeyCode::Char(' '))), Some(Command::Game(Action::HardDrop)));
        assert_eq!(input.key_down(press(KeyCode::Esc)), Some(Command::Game(Action::TogglePause)));
        assert_eq!(input.key_down(press(KeyCode::Char('r'))), Some(Command::Restart));
        assert_eq!(input.key_down(press(KeyCode::Enter)), Some(Command::Start));
        assert_eq!(input.key_down(press(KeyCode::Char('z'))), None);
    }

    #[test]
    fn test_uppercase_is_normalized() {
        let input = InputHandler::default();
        assert_eq!(input.key_down(press(KeyCode::Char('Q'))), Some(Command::Quit));
    }

    #[test]
    fn test_ctrl_c_quits() {
        let input = InputHandler::default();
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(input.key_down(key), Some(Command::Quit));
    }

    #[test]
    fn test_custom_bindings_from_settings() {
        let mut settings = Settings::default();
        settings.keys.rotate = vec!["x".to_string(), "bogus".to_string()];
        settings.keys.hard_drop = vec!["Enter".to_string()];
        let input = InputHandler::from_settings(&settings);

        assert_eq!(input.key_down(press(KeyCode::Char('x'))), Some(Command::Game(Action::Rotate)));
        assert_eq!(input.key_down(press(KeyCode::Up)), None);
        // A bound Enter wins over the start fallback
        assert_eq!(input.key_down(press(KeyCode::Enter)), Some(Command::Game(Action::HardDrop)));
    }
}
