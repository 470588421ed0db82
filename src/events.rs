//! Keybindings: crossterm events to palette navigation keys and editing actions.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

use crate::actions::Action;
use crate::nav::{Key, KeyPress, Modifiers};

pub const TICK_RATE: Duration = Duration::from_millis(50);

/// Navigation key for the palette. Printable characters map too so custom
/// handlers and digit shortcuts can see them.
pub fn key_to_press(event: &KeyEvent) -> Option<KeyPress> {
    if event.kind == KeyEventKind::Release {
        return None;
    }
    let mods = event.modifiers;
    let mut modifiers = Modifiers {
        shift: mods.contains(KeyModifiers::SHIFT),
        alt: mods.contains(KeyModifiers::ALT),
        ctrl: mods.contains(KeyModifiers::CONTROL),
    };

    let key = match event.code {
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Tab => Key::Tab,
        KeyCode::BackTab => {
            modifiers.shift = true;
            Key::Tab
        }
        KeyCode::Enter => Key::Enter,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::Esc => Key::Escape,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Char(c @ '1'..='9') => Key::Digit(c as u8 - b'0'),
        KeyCode::Char(c) => Key::Char(c),
        _ => return None,
    };
    Some(KeyPress { key, modifiers })
}

/// Editing and lifecycle action for a key navigation did not consume.
pub fn key_to_action(event: &KeyEvent, palette_visible: bool) -> Option<Action> {
    if event.kind == KeyEventKind::Release {
        return None;
    }
    let (code, mods) = (event.code, event.modifiers);

    if code == KeyCode::Char('c') && mods.contains(KeyModifiers::CONTROL) {
        return Some(Action::Quit);
    }

    if !palette_visible {
        return match code {
            KeyCode::Char('/') if mods.is_empty() => Some(Action::PaletteShow),
            KeyCode::Char('k') if mods.contains(KeyModifiers::CONTROL) => Some(Action::PaletteShow),
            KeyCode::Char('q') if mods.is_empty() => Some(Action::Quit),
            _ => None,
        };
    }

    match code {
        KeyCode::Char('u') if mods.contains(KeyModifiers::CONTROL) => Some(Action::ClearInput),
        KeyCode::Esc => Some(Action::PaletteHide),
        KeyCode::Backspace => Some(Action::Backspace),
        KeyCode::Left => Some(Action::CursorLeft),
        KeyCode::Right => Some(Action::CursorRight),
        // Allow Alt for accented chars; only block Ctrl.
        KeyCode::Char(c) if !mods.contains(KeyModifiers::CONTROL) => Some(Action::Char(c)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, mods: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, mods)
    }

    #[test]
    fn back_tab_is_shift_tab() {
        let press = key_to_press(&key(KeyCode::BackTab, KeyModifiers::SHIFT)).unwrap();
        assert_eq!(press.key, Key::Tab);
        assert!(press.modifiers.shift);
    }

    #[test]
    fn digits_keep_their_modifier() {
        let press = key_to_press(&key(KeyCode::Char('3'), KeyModifiers::ALT)).unwrap();
        assert_eq!(press.key, Key::Digit(3));
        assert!(press.modifiers.alt);
        let zero = key_to_press(&key(KeyCode::Char('0'), KeyModifiers::NONE)).unwrap();
        assert_eq!(zero.key, Key::Char('0'));
    }

    #[test]
    fn typing_goes_to_input_only_when_visible() {
        let slash = key(KeyCode::Char('/'), KeyModifiers::NONE);
        assert_eq!(key_to_action(&slash, false), Some(Action::PaletteShow));
        assert_eq!(key_to_action(&slash, true), Some(Action::Char('/')));
        let ctrl_x = key(KeyCode::Char('x'), KeyModifiers::CONTROL);
        assert_eq!(key_to_action(&ctrl_x, true), None);
    }
}
