use std::collections::BTreeMap;

use ratatui::style::Color;

use crate::cursor::CursorState;
use crate::geometry::{Point, Rectangle};
use crate::render::Canvas;
use crate::services::{Audio, Sound};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonState {
    #[default]
    Normal,
    Disabled,
    MouseOver,
    Pressed,
}

#[derive(Debug, Clone)]
pub struct Button {
    bounds: Rectangle,
    label: String,
    state: ButtonState,
    active: bool,
}

impl Button {
    /// `bounds` are relative to the owning window.
    pub fn new(bounds: Rectangle, label: impl Into<String>) -> Self {
        Self {
            bounds,
            label: label.into(),
            state: ButtonState::Normal,
            active: true,
        }
    }

    pub fn state(&self) -> ButtonState {
        self.state
    }

    pub fn set_state(&mut self, state: ButtonState) {
        self.state = state;
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn bounds(&self, parent: Point) -> Rectangle {
        self.bounds.translate(parent)
    }

    pub fn draw(&self, canvas: &mut dyn Canvas, parent: Point) {
        if !self.active {
            return;
        }
        let color = match self.state {
            ButtonState::Normal => Color::White,
            ButtonState::Disabled => Color::DarkGray,
            ButtonState::MouseOver => Color::Cyan,
            ButtonState::Pressed => Color::Yellow,
        };
        let bounds = self.bounds(parent);
        canvas.text(bounds.origin, &format!("[{}]", self.label), color);
    }
}

/// The buttons of one window, keyed by an id the window chooses.
#[derive(Debug, Clone, Default)]
pub struct ButtonSet {
    buttons: BTreeMap<u16, Button>,
}

impl ButtonSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: u16, button: Button) {
        self.buttons.insert(id, button);
    }

    pub fn get_mut(&mut self, id: u16) -> Option<&mut Button> {
        self.buttons.get_mut(&id)
    }

    pub fn get(&self, id: u16) -> Option<&Button> {
        self.buttons.get(&id)
    }

    pub fn draw(&self, canvas: &mut dyn Canvas, parent: Point) {
        for button in self.buttons.values() {
            button.draw(canvas, parent);
        }
    }

    /// Hover and press handling. Returns the resulting cursor state and the
    /// id of a button that was clicked, if any.
    pub fn send_cursor(
        &mut self,
        parent: Point,
        clicked: bool,
        pos: Point,
        audio: &mut dyn Audio,
    ) -> (CursorState, Option<u16>) {
        let mut state = if clicked {
            CursorState::Clicking
        } else {
            CursorState::Idle
        };
        let mut pressed = None;
        for (id, button) in self.buttons.iter_mut() {
            if !button.active || button.state == ButtonState::Disabled {
                continue;
            }
            if button.bounds(parent).contains(pos) {
                if button.state == ButtonState::Normal {
                    audio.play(Sound::ButtonOver);
                    button.state = ButtonState::MouseOver;
                    state = CursorState::CanClick;
                } else if button.state == ButtonState::MouseOver {
                    if clicked {
                        audio.play(Sound::ButtonClick);
                        button.state = ButtonState::Normal;
                        pressed = Some(*id);
                        state = CursorState::Idle;
                    } else {
                        state = CursorState::CanClick;
                    }
                }
            } else if button.state == ButtonState::MouseOver {
                button.state = ButtonState::Normal;
            }
        }
        (state, pressed)
    }

    /// Clears hover highlights.
    pub fn remove_cursor(&mut self) {
        for button in self.buttons.values_mut() {
            if button.state == ButtonState::MouseOver {
                button.state = ButtonState::Normal;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::recording::RecordingAudio;

    #[test]
    fn hover_then_click_reports_button() {
        let mut set = ButtonSet::new();
        set.insert(7, Button::new(Rectangle::from_xywh(0, 0, 40, 16), "OK"));
        let mut audio = RecordingAudio::default();
        let parent = Point::new(100, 100);

        let (state, pressed) = set.send_cursor(parent, false, Point::new(110, 105), &mut audio);
        assert_eq!(state, CursorState::CanClick);
        assert_eq!(pressed, None);

        let (_, pressed) = set.send_cursor(parent, true, Point::new(110, 105), &mut audio);
        assert_eq!(pressed, Some(7));
        assert_eq!(audio.sounds(), vec![Sound::ButtonOver, Sound::ButtonClick]);
    }

    #[test]
    fn disabled_buttons_ignore_cursor() {
        let mut set = ButtonSet::new();
        let mut button = Button::new(Rectangle::from_xywh(0, 0, 40, 16), "OK");
        button.set_state(ButtonState::Disabled);
        set.insert(1, button);
        let mut audio = RecordingAudio::default();
        let (_, pressed) = set.send_cursor(Point::ORIGIN, true, Point::new(1, 1), &mut audio);
        assert_eq!(pressed, None);
        assert!(audio.sounds().is_empty());
    }
}
