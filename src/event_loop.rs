use std::io;
use std::time::{Duration, Instant};

use crate::drivers::{InputDriver, InputEvent};

pub enum ControlFlow {
    Continue,
    Quit,
}

/// Fixed-step loop that drives the client's main thread.
///
/// Input is drained as it arrives; the handler is also called with `None`
/// once per elapsed tick so the UI can update and redraw at a steady rate.
pub struct EventLoop<D> {
    driver: D,
    tick: Duration,
}

impl<D: InputDriver> EventLoop<D> {
    pub fn new(driver: D, tick: Duration) -> Self {
        Self { driver, tick }
    }

    pub fn poll(&mut self) -> io::Result<Option<InputEvent>> {
        if self.driver.poll(self.tick)? {
            Ok(Some(self.driver.read()?))
        } else {
            Ok(None)
        }
    }

    pub fn driver(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Runs until the handler returns [`ControlFlow::Quit`].
    ///
    /// The handler is called with `Some(event)` for input and with `None`
    /// for every tick that has elapsed since the last one. Ticks that were
    /// missed while input was being handled are caught up in order.
    pub fn run<F>(&mut self, mut handler: F) -> io::Result<()>
    where
        F: FnMut(&mut D, Option<InputEvent>) -> io::Result<ControlFlow>,
    {
        let mut next_tick = Instant::now();
        loop {
            let now = Instant::now();
            while next_tick <= now {
                if let ControlFlow::Quit = handler(&mut self.driver, None)? {
                    return Ok(());
                }
                next_tick += self.tick;
            }

            let wait = next_tick.saturating_duration_since(Instant::now());
            if self.driver.poll(wait)? {
                // Drain bursts (drags, wheel spins) before the next tick.
                loop {
                    let event = self.driver.read()?;
                    if let ControlFlow::Quit = handler(&mut self.driver, Some(event))? {
                        return Ok(());
                    }
                    if !self.driver.poll(Duration::ZERO)? {
                        break;
                    }
                }
            }
        }
    }
}
