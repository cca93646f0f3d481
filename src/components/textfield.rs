use ratatui::style::Color;

use crate::actions::{KeyAction, KeyType, Mapping};
use crate::constants::CARET_BLINK_TICKS;
use crate::cursor::CursorState;
use crate::geometry::{Point, Rectangle};
use crate::render::Canvas;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldState {
    #[default]
    Normal,
    Disabled,
    Focused,
}

/// Something a field wants its owning window to act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEvent {
    /// Enter was pressed; carries the current text.
    Submit(String),
    /// An action key the field does not handle itself (tab, escape, up,
    /// down).
    Action(KeyAction),
}

/// Single-line text entry.
#[derive(Debug, Clone)]
pub struct Textfield {
    bounds: Rectangle,
    text: String,
    limit: usize,
    crypt: Option<char>,
    state: FieldState,
    caret: usize,
    blink: u32,
    caret_visible: bool,
}

impl Textfield {
    /// `bounds` are relative to the owning window.
    pub fn new(bounds: Rectangle, limit: usize) -> Self {
        Self {
            bounds,
            text: String::new(),
            limit,
            crypt: None,
            state: FieldState::Normal,
            caret: 0,
            blink: 0,
            caret_visible: true,
        }
    }

    /// Shows every character as `c`, for passwords.
    pub fn with_crypt(mut self, c: char) -> Self {
        self.crypt = Some(c);
        self
    }

    pub fn state(&self) -> FieldState {
        self.state
    }

    pub fn set_state(&mut self, state: FieldState) {
        if self.state != state {
            self.state = state;
            self.caret_visible = true;
            self.blink = 0;
            if state == FieldState::Focused {
                self.caret = self.char_count();
            }
        }
    }

    pub fn is_focused(&self) -> bool {
        self.state == FieldState::Focused
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the field masks its text.
    pub fn is_crypted(&self) -> bool {
        self.crypt.is_some()
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    pub fn bounds(&self, parent: Point) -> Rectangle {
        self.bounds.translate(parent)
    }

    /// Replaces the text and moves the caret to its end.
    pub fn change_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.truncate_to_limit();
        self.caret = self.char_count();
    }

    /// Inserts `s` at the caret, up to the limit.
    pub fn add_string(&mut self, s: &str) {
        for c in s.chars().filter(|c| !c.is_control()) {
            if !self.insert_char(c) {
                break;
            }
        }
    }

    pub fn update(&mut self) {
        if self.state != FieldState::Focused {
            return;
        }
        self.blink += 1;
        if self.blink > CARET_BLINK_TICKS {
            self.blink = 0;
            self.caret_visible = !self.caret_visible;
        }
    }

    pub fn draw(&self, canvas: &mut dyn Canvas, parent: Point) {
        let bounds = self.bounds(parent);
        let color = match self.state {
            FieldState::Focused => Color::Yellow,
            FieldState::Normal => Color::Gray,
            FieldState::Disabled => Color::DarkGray,
        };
        let shown: String = match self.crypt {
            Some(c) => std::iter::repeat_n(c, self.char_count()).collect(),
            None => self.text.clone(),
        };
        canvas.text(bounds.origin, &shown, color);
        if self.is_focused() && self.caret_visible {
            let caret_x = bounds.left() + 8 * self.caret as i32;
            canvas.text(Point::new(caret_x, bounds.top()), "|", Color::Yellow);
        }
    }

    /// Handles a translated key. Returns what the owner should act on.
    pub fn send_key(&mut self, mapping: Mapping, pressed: bool) -> Option<FieldEvent> {
        if self.state != FieldState::Focused || !pressed {
            return None;
        }
        match mapping.kind {
            KeyType::Text => {
                if let Some(c) = mapping.char() {
                    self.insert_char(c);
                }
                None
            }
            KeyType::Action => self.send_action(mapping.key_action()?),
            _ => None,
        }
    }

    fn send_action(&mut self, action: KeyAction) -> Option<FieldEvent> {
        match action {
            KeyAction::Left => {
                self.caret = self.caret.saturating_sub(1);
                None
            }
            KeyAction::Right => {
                self.caret = (self.caret + 1).min(self.char_count());
                None
            }
            KeyAction::Back => {
                if self.caret > 0 {
                    self.caret -= 1;
                    self.remove_at(self.caret);
                }
                None
            }
            KeyAction::Delete => {
                self.remove_at(self.caret);
                None
            }
            KeyAction::Home => {
                self.caret = 0;
                None
            }
            KeyAction::End => {
                self.caret = self.char_count();
                None
            }
            KeyAction::Space => {
                self.insert_char(' ');
                None
            }
            KeyAction::Return => Some(FieldEvent::Submit(self.text.clone())),
            other => Some(FieldEvent::Action(other)),
        }
    }

    /// Pointer handling relative to the owning window's origin.
    pub fn send_cursor(&mut self, parent: Point, pos: Point, clicked: bool) -> CursorState {
        if self.state == FieldState::Disabled {
            return CursorState::Idle;
        }
        if self.bounds(parent).contains(pos) {
            if clicked {
                self.set_state(FieldState::Focused);
                CursorState::Clicking
            } else {
                CursorState::CanClick
            }
        } else {
            if clicked && self.state == FieldState::Focused {
                self.set_state(FieldState::Normal);
            }
            CursorState::Idle
        }
    }

    fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    fn insert_char(&mut self, c: char) -> bool {
        if self.char_count() >= self.limit {
            return false;
        }
        let at = self.byte_index(self.caret);
        self.text.insert(at, c);
        self.caret += 1;
        true
    }

    fn remove_at(&mut self, index: usize) {
        if index < self.char_count() {
            let at = self.byte_index(index);
            self.text.remove(at);
        }
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    fn truncate_to_limit(&mut self) {
        if self.char_count() > self.limit {
            self.text = self.text.chars().take(self.limit).collect();
        }
    }
}
