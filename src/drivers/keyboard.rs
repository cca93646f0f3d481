//! Terminal key events to physical keys.
//!
//! Terminals report a key once, already combined with its modifiers and
//! without a release. The translator expands each report into the press and
//! release sequence a keyboard would have produced.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, ModifierKeyCode};

use super::InputEvent;
use crate::keys::PhysicalKey;

/// Drops key releases and repeats, and folds BackTab back into Shift+Tab.
#[derive(Default)]
pub struct KeyboardNormalizer {
    esc_down: bool,
}

impl KeyboardNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn normalize(&mut self, evt: Event) -> Option<Event> {
        match evt {
            Event::Key(mut key) => {
                if key.code == KeyCode::BackTab {
                    key.code = KeyCode::Tab;
                    key.modifiers.insert(KeyModifiers::SHIFT);
                }
                match key.kind {
                    KeyEventKind::Release => {
                        if key.code == KeyCode::Esc {
                            self.esc_down = false;
                        }
                        return None;
                    }
                    KeyEventKind::Repeat => return None,
                    KeyEventKind::Press => {}
                }
                if cfg!(windows) {
                    // Windows consoles report a held Esc as repeated presses.
                    if key.code == KeyCode::Esc {
                        if self.esc_down {
                            return None;
                        }
                        self.esc_down = true;
                    } else {
                        self.esc_down = false;
                    }
                }
                Some(Event::Key(key))
            }
            other => Some(other),
        }
    }
}

/// The physical key for a terminal key code, plus whether shift is implied
/// by the character.
pub fn physical_key(code: KeyCode) -> Option<(PhysicalKey, bool)> {
    use PhysicalKey as K;
    let key = match code {
        KeyCode::Char(c) => return PhysicalKey::from_char(c),
        KeyCode::Esc => K::Escape,
        KeyCode::Enter => K::Enter,
        KeyCode::Tab => K::Tab,
        KeyCode::BackTab => return Some((K::Tab, true)),
        KeyCode::Backspace => K::Backspace,
        KeyCode::Delete => K::Delete,
        KeyCode::Insert => K::Insert,
        KeyCode::Home => K::Home,
        KeyCode::End => K::End,
        KeyCode::PageUp => K::PageUp,
        KeyCode::PageDown => K::PageDown,
        KeyCode::Left => K::Left,
        KeyCode::Right => K::Right,
        KeyCode::Up => K::Up,
        KeyCode::Down => K::Down,
        KeyCode::CapsLock => K::CapsLock,
        KeyCode::ScrollLock => K::ScrollLock,
        KeyCode::F(n) => function_key(n)?,
        KeyCode::Modifier(modifier) => match modifier {
            ModifierKeyCode::LeftShift => K::LeftShift,
            ModifierKeyCode::RightShift => K::RightShift,
            ModifierKeyCode::LeftControl => K::LeftControl,
            ModifierKeyCode::RightControl => K::RightControl,
            ModifierKeyCode::LeftAlt => K::LeftAlt,
            ModifierKeyCode::RightAlt => K::RightAlt,
            _ => return None,
        },
        _ => return None,
    };
    Some((key, false))
}

fn function_key(n: u8) -> Option<PhysicalKey> {
    use PhysicalKey::*;
    const KEYS: [PhysicalKey; 12] = [F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12];
    KEYS.get(usize::from(n).checked_sub(1)?).copied()
}

/// Expands one terminal key report into modifier presses, the key press
/// and release, then the modifier releases.
pub fn key_events(key: KeyEvent) -> Vec<InputEvent> {
    let Some((physical, implied_shift)) = physical_key(key.code) else {
        return match key.code {
            KeyCode::Char(c) => vec![InputEvent::Char(c)],
            _ => Vec::new(),
        };
    };

    let mut modifiers = Vec::new();
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        modifiers.push(PhysicalKey::LeftControl);
    }
    if key.modifiers.contains(KeyModifiers::ALT) {
        modifiers.push(PhysicalKey::LeftAlt);
    }
    if implied_shift || key.modifiers.contains(KeyModifiers::SHIFT) {
        modifiers.push(PhysicalKey::LeftShift);
    }
    modifiers.retain(|m| *m != physical);

    let mut events: Vec<InputEvent> = modifiers
        .iter()
        .map(|m| InputEvent::Key {
            key: *m,
            pressed: true,
        })
        .collect();
    events.push(InputEvent::Key {
        key: physical,
        pressed: true,
    });
    events.push(InputEvent::Key {
        key: physical,
        pressed: false,
    });
    events.extend(modifiers.iter().rev().map(|m| InputEvent::Key {
        key: *m,
        pressed: false,
    }));
    events
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(key: PhysicalKey) -> InputEvent {
        InputEvent::Key { key, pressed: true }
    }

    fn release(key: PhysicalKey) -> InputEvent {
        InputEvent::Key {
            key,
            pressed: false,
        }
    }

    #[test]
    fn backtab_becomes_shift_tab() {
        let mut norm = KeyboardNormalizer::new();
        let key = KeyEvent::new(KeyCode::BackTab, KeyModifiers::NONE);
        match norm.normalize(Event::Key(key)) {
            Some(Event::Key(k)) => {
                assert_eq!(k.code, KeyCode::Tab);
                assert!(k.modifiers.contains(KeyModifiers::SHIFT));
            }
            other => panic!("expected key event, got {other:?}"),
        }
    }

    #[test]
    fn release_key_is_ignored() {
        let mut norm = KeyboardNormalizer::new();
        let mut key = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        assert!(norm.normalize(Event::Key(key)).is_none());
    }

    #[test]
    fn non_key_events_pass_through() {
        let mut norm = KeyboardNormalizer::new();
        assert!(norm.normalize(Event::Resize(10, 20)).is_some());
    }

    #[test]
    fn uppercase_letters_imply_shift() {
        let events = key_events(KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT));
        assert_eq!(
            events,
            vec![
                press(PhysicalKey::LeftShift),
                press(PhysicalKey::A),
                release(PhysicalKey::A),
                release(PhysicalKey::LeftShift),
            ]
        );
    }

    #[test]
    fn control_combos_wrap_the_key() {
        let events = key_events(KeyEvent::new(KeyCode::Char('v'), KeyModifiers::CONTROL));
        assert_eq!(events.first(), Some(&press(PhysicalKey::LeftControl)));
        assert_eq!(events.last(), Some(&release(PhysicalKey::LeftControl)));
        assert!(events.contains(&press(PhysicalKey::V)));
    }

    #[test]
    fn unknown_characters_are_typed_literally() {
        assert_eq!(
            key_events(KeyEvent::new(KeyCode::Char('é'), KeyModifiers::NONE)),
            vec![InputEvent::Char('é')]
        );
        assert_eq!(function_key(13), None);
        assert_eq!(physical_key(KeyCode::F(12)), Some((PhysicalKey::F12, false)));
    }
}
