//! Recording collaborators for tests and headless embedding.
//!
//! Every recorder is a cheap handle over shared state: hand one clone to the
//! facade and keep another to inspect what happened.

use std::cell::RefCell;
use std::rc::Rc;

use super::{Audio, Network, Platform, Request, Services, Sound, Stage};
use crate::actions::Mapping;
use crate::clipboard::MemoryClipboard;
use crate::cursor::CursorState;
use crate::elements::UiContext;
use crate::geometry::Point;
use crate::model::Session;
use crate::settings::MemorySettings;

#[derive(Debug, Clone, Default)]
pub struct RecordingAudio {
    sounds: Rc<RefCell<Vec<Sound>>>,
}

impl RecordingAudio {
    pub fn sounds(&self) -> Vec<Sound> {
        self.sounds.borrow().clone()
    }

    pub fn clear(&self) {
        self.sounds.borrow_mut().clear();
    }
}

impl Audio for RecordingAudio {
    fn play(&mut self, sound: Sound) {
        self.sounds.borrow_mut().push(sound);
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordingNetwork {
    sent: Rc<RefCell<Vec<Request>>>,
}

impl RecordingNetwork {
    pub fn sent(&self) -> Vec<Request> {
        self.sent.borrow().clone()
    }

    /// Removes and returns everything sent so far.
    pub fn take(&self) -> Vec<Request> {
        std::mem::take(&mut *self.sent.borrow_mut())
    }
}

impl Network for RecordingNetwork {
    fn send(&mut self, request: Request) {
        self.sent.borrow_mut().push(request);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageEvent {
    Cursor { clicked: bool, pos: Point },
    Key { mapping: Mapping, pressed: bool },
    DoubleClick(Point),
}

#[derive(Debug, Clone, Default)]
pub struct RecordingStage {
    events: Rc<RefCell<Vec<StageEvent>>>,
}

impl RecordingStage {
    pub fn events(&self) -> Vec<StageEvent> {
        self.events.borrow().clone()
    }

    pub fn keys(&self) -> Vec<Mapping> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                StageEvent::Key {
                    mapping,
                    pressed: true,
                } => Some(*mapping),
                _ => None,
            })
            .collect()
    }
}

impl Stage for RecordingStage {
    fn send_cursor(&mut self, clicked: bool, pos: Point) -> CursorState {
        self.events
            .borrow_mut()
            .push(StageEvent::Cursor { clicked, pos });
        CursorState::Idle
    }

    fn send_key(&mut self, mapping: Mapping, pressed: bool) {
        self.events
            .borrow_mut()
            .push(StageEvent::Key { mapping, pressed });
    }

    fn doubleclick(&mut self, pos: Point) {
        self.events.borrow_mut().push(StageEvent::DoubleClick(pos));
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordingPlatform {
    fullscreen_toggles: Rc<RefCell<u32>>,
}

impl RecordingPlatform {
    pub fn fullscreen_toggles(&self) -> u32 {
        *self.fullscreen_toggles.borrow()
    }
}

impl Platform for RecordingPlatform {
    fn toggle_fullscreen(&mut self) {
        *self.fullscreen_toggles.borrow_mut() += 1;
    }
}

/// Handles onto every recorder behind a [`Services`] bundle.
#[derive(Debug, Clone, Default)]
pub struct Probe {
    pub audio: RecordingAudio,
    pub network: RecordingNetwork,
    pub settings: MemorySettings,
    pub stage: RecordingStage,
    pub platform: RecordingPlatform,
    pub clipboard: MemoryClipboard,
}

impl Probe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(mut self, settings: MemorySettings) -> Self {
        self.settings = settings;
        self
    }

    /// A services bundle wired to clones of this probe's recorders.
    pub fn services(&self) -> Services {
        Services {
            audio: Box::new(self.audio.clone()),
            network: Box::new(self.network.clone()),
            settings: Box::new(self.settings.clone()),
            stage: Box::new(self.stage.clone()),
            platform: Box::new(self.platform.clone()),
            clipboard: Box::new(self.clipboard.clone()),
        }
    }

    /// A dispatch context over these recorders, for driving one window
    /// directly.
    pub fn context(&self, session: Session) -> UiContext {
        UiContext::new(
            Box::new(self.audio.clone()),
            Box::new(self.network.clone()),
            Box::new(self.settings.clone()),
            Box::new(self.stage.clone()),
            session,
        )
    }
}
