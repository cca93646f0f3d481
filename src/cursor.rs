use crate::geometry::Point;

/// Visual state of the pointer. Dispatch returns the next state after every
/// cursor event and the facade stores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CursorState {
    #[default]
    Idle,
    CanClick,
    Game,
    House,
    CanClick2,
    CanGrab,
    Gift,
    VScroll,
    HScroll,
    VScrollIdle,
    HScrollIdle,
    Grabbing,
    Clicking,
    RClick,
}

impl CursorState {
    /// Whether an event in this state counts as a press for routing.
    pub fn is_clicked(self) -> bool {
        matches!(self, CursorState::Clicking | CursorState::VScrollIdle)
    }
}

/// Pointer position, button state and idle hiding.
#[derive(Debug, Clone, Default)]
pub struct Cursor {
    position: Point,
    state: CursorState,
    pressed: bool,
    idle_ticks: u32,
    hidden: bool,
}

impl Cursor {
    /// Idle ticks before an idle cursor hides.
    pub const HIDE_TICKS: u32 = 15_000 / crate::constants::TIMESTEP_MS;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn state(&self) -> CursorState {
        self.state
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn set_state(&mut self, state: CursorState) {
        if self.state != state {
            self.state = state;
            self.wake();
        }
    }

    pub fn set_position(&mut self, position: Point) {
        if self.position != position {
            self.position = position;
            self.wake();
        }
    }

    pub fn set_pressed(&mut self, pressed: bool) {
        self.pressed = pressed;
        self.wake();
    }

    pub fn update(&mut self) {
        if self.state != CursorState::Idle {
            return;
        }
        self.idle_ticks = self.idle_ticks.saturating_add(1);
        if self.idle_ticks >= Self::HIDE_TICKS {
            self.hidden = true;
        }
    }

    fn wake(&mut self) {
        self.idle_ticks = 0;
        self.hidden = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_cursor_hides_after_timeout() {
        let mut cursor = Cursor::new();
        for _ in 0..Cursor::HIDE_TICKS {
            cursor.update();
        }
        assert!(cursor.is_hidden());
        cursor.set_position(Point::new(1, 1));
        assert!(!cursor.is_hidden());
    }

    #[test]
    fn busy_cursor_never_hides() {
        let mut cursor = Cursor::new();
        cursor.set_state(CursorState::CanClick);
        for _ in 0..Cursor::HIDE_TICKS * 2 {
            cursor.update();
        }
        assert!(!cursor.is_hidden());
    }
}
