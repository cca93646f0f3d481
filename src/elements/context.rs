//! Shared dispatch context
//!
//! `UiContext` carries the collaborators and game data a window may need
//! while handling an event, plus the queue of [`UiRequest`]s it uses to ask
//! the active state for changes. Requests are applied by the facade after
//! the window returns, so a window can safely ask to close itself.

use std::fmt;

use super::{Element, ElementMessage, ElementType};
use crate::components::icon::DraggedIcon;
use crate::components::tooltip::Tooltip;
use crate::constants::{DEFAULT_CHANNEL_COUNT, VIEWPORT};
use crate::geometry::Point;
use crate::keybindings::{Bindings, Keyboard};
use crate::model::Session;
use crate::services::{Audio, Network, Request, Sound, Stage};
use crate::settings::Settings;
use crate::states::UiStateKind;

/// Identifies one text field inside its window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(pub u8);

/// The text field holding keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FocusTarget {
    pub element: ElementType,
    pub field: FieldId,
}

impl FocusTarget {
    pub const fn new(element: ElementType, field: FieldId) -> Self {
        Self { element, field }
    }
}

pub type ElementFactory = Box<dyn FnOnce(&mut UiContext) -> Box<dyn Element>>;

/// Boxes a window constructor as an [`ElementFactory`].
pub fn boxed<T, F>(build: F) -> ElementFactory
where
    T: Element,
    F: FnOnce(&mut UiContext) -> T + 'static,
{
    Box::new(move |ctx: &mut UiContext| -> Box<dyn Element> { Box::new(build(ctx)) })
}

/// Changes a window asks the active state to make.
pub enum UiRequest {
    /// Open `tag`, toggling an existing toggle-capable instance.
    Open {
        tag: ElementType,
        factory: ElementFactory,
    },
    Remove(ElementType),
    /// Deactivate without destroying.
    Hide(ElementType),
    /// Reactivate a hidden instance and raise it.
    Show(ElementType),
    Focus(Option<FocusTarget>),
    DragIcon(DraggedIcon),
    ShowTooltip {
        parent: ElementType,
        content: Tooltip,
    },
    ClearTooltip(ElementType),
    Notify {
        tag: ElementType,
        message: ElementMessage,
    },
    ChangeState(UiStateKind),
    Quit,
}

impl fmt::Debug for UiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UiRequest::Open { tag, .. } => f.debug_struct("Open").field("tag", tag).finish(),
            UiRequest::Remove(tag) => f.debug_tuple("Remove").field(tag).finish(),
            UiRequest::Hide(tag) => f.debug_tuple("Hide").field(tag).finish(),
            UiRequest::Show(tag) => f.debug_tuple("Show").field(tag).finish(),
            UiRequest::Focus(target) => f.debug_tuple("Focus").field(target).finish(),
            UiRequest::DragIcon(icon) => f.debug_tuple("DragIcon").field(icon).finish(),
            UiRequest::ShowTooltip { parent, content } => f
                .debug_struct("ShowTooltip")
                .field("parent", parent)
                .field("content", content)
                .finish(),
            UiRequest::ClearTooltip(parent) => f.debug_tuple("ClearTooltip").field(parent).finish(),
            UiRequest::Notify { tag, message } => f
                .debug_struct("Notify")
                .field("tag", tag)
                .field("message", message)
                .finish(),
            UiRequest::ChangeState(kind) => f.debug_tuple("ChangeState").field(kind).finish(),
            UiRequest::Quit => write!(f, "Quit"),
        }
    }
}

pub struct UiContext {
    pub audio: Box<dyn Audio>,
    pub network: Box<dyn Network>,
    pub settings: Box<dyn Settings>,
    pub stage: Box<dyn Stage>,
    pub keyboard: Keyboard,
    session: Session,
    viewport: Point,
    cursor: Point,
    channel_count: u8,
    requests: Vec<UiRequest>,
}

impl UiContext {
    pub fn new(
        audio: Box<dyn Audio>,
        network: Box<dyn Network>,
        settings: Box<dyn Settings>,
        stage: Box<dyn Stage>,
        session: Session,
    ) -> Self {
        Self {
            audio,
            network,
            settings,
            stage,
            keyboard: Keyboard::with_bindings(Bindings::basic()),
            session,
            viewport: VIEWPORT,
            cursor: Point::ORIGIN,
            channel_count: DEFAULT_CHANNEL_COUNT,
            requests: Vec::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn viewport(&self) -> Point {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Point) {
        self.viewport = viewport;
    }

    /// Last known cursor position.
    pub fn cursor(&self) -> Point {
        self.cursor
    }

    pub(crate) fn set_cursor(&mut self, cursor: Point) {
        self.cursor = cursor;
    }

    /// Channels on the world the character is playing on.
    pub fn channel_count(&self) -> u8 {
        self.channel_count
    }

    pub(crate) fn set_channel_count(&mut self, count: u8) {
        self.channel_count = count;
    }

    pub fn play(&mut self, sound: Sound) {
        self.audio.play(sound);
    }

    pub fn send(&mut self, request: Request) {
        tracing::debug!(?request, "sending request");
        self.network.send(request);
    }

    pub fn request(&mut self, request: UiRequest) {
        self.requests.push(request);
    }

    pub fn open<T, F>(&mut self, tag: ElementType, build: F)
    where
        T: Element,
        F: FnOnce(&mut UiContext) -> T + 'static,
    {
        self.request(UiRequest::Open {
            tag,
            factory: boxed(build),
        });
    }

    /// Opens (or toggles) one of the standard windows by tag.
    pub fn open_window(&mut self, tag: ElementType) {
        match super::factory_for(tag) {
            Some(factory) => self.request(UiRequest::Open { tag, factory }),
            None => tracing::debug!(element = ?tag, "no window registered for tag"),
        }
    }

    pub fn remove(&mut self, tag: ElementType) {
        self.request(UiRequest::Remove(tag));
    }

    pub fn hide(&mut self, tag: ElementType) {
        self.request(UiRequest::Hide(tag));
    }

    pub fn show(&mut self, tag: ElementType) {
        self.request(UiRequest::Show(tag));
    }

    pub fn focus(&mut self, target: Option<FocusTarget>) {
        self.request(UiRequest::Focus(target));
    }

    pub fn drag_icon(&mut self, icon: DraggedIcon) {
        self.request(UiRequest::DragIcon(icon));
    }

    pub fn show_tooltip(&mut self, parent: ElementType, content: Tooltip) {
        self.request(UiRequest::ShowTooltip { parent, content });
    }

    pub fn clear_tooltip(&mut self, parent: ElementType) {
        self.request(UiRequest::ClearTooltip(parent));
    }

    pub fn notify(&mut self, tag: ElementType, message: ElementMessage) {
        self.request(UiRequest::Notify { tag, message });
    }

    pub fn change_state(&mut self, kind: UiStateKind) {
        self.request(UiRequest::ChangeState(kind));
    }

    pub fn quit(&mut self) {
        self.request(UiRequest::Quit);
    }

    pub(crate) fn take_requests(&mut self) -> Vec<UiRequest> {
        std::mem::take(&mut self.requests)
    }

    pub fn has_requests(&self) -> bool {
        !self.requests.is_empty()
    }
}
