//! Terminal mouse reports to pointer events.

use std::time::{Duration, Instant};

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use super::InputEvent;
use crate::geometry::Point;
use crate::render::{CELL_SIZE, TerminalCanvas};

/// Two left presses on one cell within this window make a double click.
pub const DOUBLE_CLICK_WINDOW: Duration = Duration::from_millis(400);

/// One wheel notch, in scroll units.
const WHEEL_STEP: f64 = 1.0;

#[derive(Default)]
pub struct MouseTracker {
    last_cell: Option<(u16, u16)>,
    last_press: Option<((u16, u16), Instant)>,
}

impl MouseTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer position at the centre of a cell.
    pub fn pixel(column: u16, row: u16) -> Point {
        TerminalCanvas::pixel_of(column, row) + Point::new(CELL_SIZE.x / 2, CELL_SIZE.y / 2)
    }

    pub fn translate(&mut self, mouse: MouseEvent, now: Instant) -> Vec<InputEvent> {
        let cell = (mouse.column, mouse.row);
        let mut events = Vec::new();
        if self.last_cell != Some(cell) {
            self.last_cell = Some(cell);
            events.push(InputEvent::CursorMoved(Self::pixel(mouse.column, mouse.row)));
        }

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let double = self.last_press.is_some_and(|(last, at)| {
                    last == cell && now.saturating_duration_since(at) <= DOUBLE_CLICK_WINDOW
                });
                events.push(InputEvent::Button { pressed: true });
                if double {
                    events.push(InputEvent::DoubleClick);
                    self.last_press = None;
                } else {
                    self.last_press = Some((cell, now));
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                events.push(InputEvent::Button { pressed: false });
            }
            MouseEventKind::Down(MouseButton::Right) => events.push(InputEvent::RightClick),
            // Wheel up scrolls content towards the top.
            MouseEventKind::ScrollUp => events.push(InputEvent::Scroll(-WHEEL_STEP)),
            MouseEventKind::ScrollDown => events.push(InputEvent::Scroll(WHEEL_STEP)),
            _ => {}
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn movement_is_reported_once_per_cell() {
        let mut tracker = MouseTracker::new();
        let now = Instant::now();
        let first = tracker.translate(mouse(MouseEventKind::Moved, 2, 3), now);
        assert_eq!(first, vec![InputEvent::CursorMoved(Point::new(20, 56))]);
        assert!(tracker.translate(mouse(MouseEventKind::Moved, 2, 3), now).is_empty());
    }

    #[test]
    fn quick_second_press_is_a_double_click() {
        let mut tracker = MouseTracker::new();
        let start = Instant::now();
        tracker.translate(mouse(MouseEventKind::Down(MouseButton::Left), 1, 1), start);
        tracker.translate(mouse(MouseEventKind::Up(MouseButton::Left), 1, 1), start);
        let second = tracker.translate(
            mouse(MouseEventKind::Down(MouseButton::Left), 1, 1),
            start + Duration::from_millis(150),
        );
        assert_eq!(
            second,
            vec![InputEvent::Button { pressed: true }, InputEvent::DoubleClick]
        );
    }

    #[test]
    fn slow_or_moved_presses_stay_single() {
        let mut tracker = MouseTracker::new();
        let start = Instant::now();
        tracker.translate(mouse(MouseEventKind::Down(MouseButton::Left), 1, 1), start);
        let late = tracker.translate(
            mouse(MouseEventKind::Down(MouseButton::Left), 1, 1),
            start + Duration::from_millis(900),
        );
        assert!(!late.contains(&InputEvent::DoubleClick));

        let moved = tracker.translate(
            mouse(MouseEventKind::Down(MouseButton::Left), 5, 1),
            start + Duration::from_millis(950),
        );
        assert!(!moved.contains(&InputEvent::DoubleClick));
    }

    #[test]
    fn wheel_and_right_button() {
        let mut tracker = MouseTracker::new();
        let now = Instant::now();
        tracker.translate(mouse(MouseEventKind::Moved, 0, 0), now);
        assert_eq!(
            tracker.translate(mouse(MouseEventKind::ScrollDown, 0, 0), now),
            vec![InputEvent::Scroll(1.0)]
        );
        assert_eq!(
            tracker.translate(mouse(MouseEventKind::Down(MouseButton::Right), 0, 0), now),
            vec![InputEvent::RightClick]
        );
    }
}
