//! Platform adapters.
//!
//! A driver turns raw terminal events into [`InputEvent`]s in the UI's own
//! vocabulary: physical keys, pointer positions in pixels, buttons and
//! scroll steps. Nothing past this module sees a crossterm type.

pub mod console;
pub mod keyboard;
pub mod mouse;

use std::io;
use std::time::Duration;

use crate::geometry::Point;
use crate::keys::PhysicalKey;
use crate::render::TerminalCanvas;

/// One input event, ready for the facade.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Key { key: PhysicalKey, pressed: bool },
    /// A character with no physical key on the layout.
    Char(char),
    CursorMoved(Point),
    Button { pressed: bool },
    DoubleClick,
    RightClick,
    Scroll(f64),
    Resize(Point),
    Close,
}

pub trait InputDriver {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool>;
    fn read(&mut self) -> io::Result<InputEvent>;
    fn set_mouse_capture(&mut self, _enabled: bool) -> io::Result<()> {
        Ok(())
    }
}

impl<T: InputDriver + ?Sized> InputDriver for &mut T {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
        (**self).poll(timeout)
    }

    fn read(&mut self) -> io::Result<InputEvent> {
        (**self).read()
    }

    fn set_mouse_capture(&mut self, enabled: bool) -> io::Result<()> {
        (**self).set_mouse_capture(enabled)
    }
}

pub trait OutputDriver {
    fn enter(&mut self) -> io::Result<()>;
    fn exit(&mut self) -> io::Result<()>;

    fn draw<F>(&mut self, f: F) -> io::Result<()>
    where
        F: FnOnce(&mut TerminalCanvas<'_>);
}
