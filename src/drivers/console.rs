use std::collections::VecDeque;
use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use crossterm::event::{DisableMouseCapture, EnableMouseCapture, Event};
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use super::keyboard::{KeyboardNormalizer, key_events};
use super::mouse::MouseTracker;
use super::{InputDriver, InputEvent, OutputDriver};
use crate::render::TerminalCanvas;

pub struct ConsoleInputDriver {
    normalizer: KeyboardNormalizer,
    mouse: MouseTracker,
    event_queue: VecDeque<InputEvent>,
}

impl Default for ConsoleInputDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleInputDriver {
    pub fn new() -> Self {
        Self {
            normalizer: KeyboardNormalizer::new(),
            mouse: MouseTracker::new(),
            event_queue: VecDeque::new(),
        }
    }

    /// Queues the UI events for one terminal event.
    fn enqueue(&mut self, evt: Event) {
        let Some(evt) = self.normalizer.normalize(evt) else {
            return;
        };
        match evt {
            Event::Key(key) => self.event_queue.extend(key_events(key)),
            Event::Mouse(mouse) => {
                let events = self.mouse.translate(mouse, Instant::now());
                self.event_queue.extend(events);
            }
            Event::Resize(columns, rows) => self
                .event_queue
                .push_back(InputEvent::Resize(TerminalCanvas::pixel_of(columns, rows))),
            Event::Paste(text) => self.event_queue.extend(text.chars().map(InputEvent::Char)),
            _ => {}
        }
    }
}

impl InputDriver for ConsoleInputDriver {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
        if !self.event_queue.is_empty() {
            return Ok(true);
        }
        crossterm::event::poll(timeout)
    }

    fn read(&mut self) -> io::Result<InputEvent> {
        loop {
            if let Some(evt) = self.event_queue.pop_front() {
                return Ok(evt);
            }
            let evt = crossterm::event::read()?;
            self.enqueue(evt);
        }
    }

    fn set_mouse_capture(&mut self, enabled: bool) -> io::Result<()> {
        if enabled {
            execute!(io::stdout(), EnableMouseCapture)
        } else {
            execute!(io::stdout(), DisableMouseCapture)
        }
    }
}

pub struct ConsoleOutputDriver {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    entered: bool,
}

impl ConsoleOutputDriver {
    pub fn new() -> io::Result<Self> {
        let backend = CrosstermBackend::new(io::stdout());
        let terminal = Terminal::new(backend)?;
        Ok(Self {
            terminal,
            entered: false,
        })
    }

    /// Size of the terminal in pixels.
    pub fn viewport(&self) -> io::Result<crate::geometry::Point> {
        let size = self.terminal.size()?;
        Ok(TerminalCanvas::pixel_of(size.width, size.height))
    }
}

impl OutputDriver for ConsoleOutputDriver {
    fn enter(&mut self) -> io::Result<()> {
        if self.entered {
            return Ok(());
        }
        execute!(self.terminal.backend_mut(), EnterAlternateScreen, EnableMouseCapture)?;
        terminal::enable_raw_mode()?;
        self.terminal.hide_cursor()?;
        self.entered = true;
        Ok(())
    }

    fn exit(&mut self) -> io::Result<()> {
        if !self.entered {
            return Ok(());
        }
        terminal::disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            DisableMouseCapture,
            LeaveAlternateScreen
        )?;
        self.terminal.show_cursor()?;
        self.entered = false;
        Ok(())
    }

    fn draw<F>(&mut self, f: F) -> io::Result<()>
    where
        F: FnOnce(&mut TerminalCanvas<'_>),
    {
        self.terminal
            .draw(move |frame| {
                let area = frame.area();
                let mut canvas = TerminalCanvas::new(area, frame.buffer_mut());
                f(&mut canvas);
            })
            .map(|_| ())
    }
}

impl Drop for ConsoleOutputDriver {
    fn drop(&mut self) {
        let _ = self.exit();
    }
}
