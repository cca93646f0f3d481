//! The facade the client shell talks to.
//!
//! `UiFacade` owns the active top-level state, the cursor and the services.
//! Every entry point dispatches into the state and then drains the
//! [`UiRequest`]s the windows queued while handling it, so a window may close
//! itself (or anything else) from inside its own handler.

use ratatui::style::Color;

use crate::actions::{KeyAction, Mapping};
use crate::clipboard::Clipboard;
use crate::constants::MAX_REQUEST_ROUNDS;
use crate::cursor::{Cursor, CursorState};
use crate::elements::login::WorldSelect;
use crate::elements::{
    ElementKind, ElementMessage, ElementType, FocusTarget, InsertOutcome, UiContext, UiRequest,
};
use crate::geometry::Point;
use crate::keybindings::Keyboard;
use crate::keys::PhysicalKey;
use crate::model::Session;
use crate::render::Canvas;
use crate::services::{Platform, Services};
use crate::states::{
    CashShopState, GameState, LoginState, PointerInput, StateCore, UiState, UiStateKind,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Applied {
    Done,
    Opened,
    StateChanged,
}

/// Modifier keys currently held.
#[derive(Debug, Clone, Copy, Default)]
struct Modifiers {
    shift: bool,
    control: bool,
    alt: bool,
}

pub struct UiFacade {
    ctx: UiContext,
    platform: Box<dyn Platform>,
    clipboard: Box<dyn Clipboard>,
    state: Box<dyn UiState>,
    cursor: Cursor,
    modifiers: Modifiers,
    caps_lock: bool,
    quit: bool,
}

impl UiFacade {
    /// Starts at the login screen.
    pub fn new(services: Services, session: Session) -> Self {
        let Services {
            audio,
            network,
            settings,
            stage,
            platform,
            clipboard,
        } = services;
        let mut ctx = UiContext::new(audio, network, settings, stage, session);
        let state: Box<dyn UiState> = Box::new(LoginState::new(&mut ctx));
        let mut ui = Self {
            ctx,
            platform,
            clipboard,
            state,
            cursor: Cursor::new(),
            modifiers: Modifiers::default(),
            caps_lock: false,
            quit: false,
        };
        ui.apply_requests();
        ui
    }

    pub fn draw(&self, canvas: &mut dyn Canvas, alpha: f32) {
        self.state.core().draw(canvas, alpha, self.cursor.position());
        if !self.cursor.is_hidden() {
            canvas.text(self.cursor.position(), cursor_glyph(self.cursor.state()), Color::White);
        }
    }

    /// One fixed timestep.
    pub fn update(&mut self) {
        self.state.update(&mut self.ctx);
        self.cursor.update();
        self.apply_requests();
    }

    /// Switches the top-level state. Only Login to Game, Game to CashShop
    /// and CashShop to Game are accepted.
    pub fn change_state(&mut self, kind: UiStateKind) {
        self.switch_state(kind);
        self.apply_requests();
    }

    fn switch_state(&mut self, kind: UiStateKind) -> bool {
        let from = self.state.kind();
        let allowed = matches!(
            (from, kind),
            (UiStateKind::Login, UiStateKind::Game)
                | (UiStateKind::Game, UiStateKind::CashShop)
                | (UiStateKind::CashShop, UiStateKind::Game)
        );
        if !allowed {
            tracing::warn!(%from, to = %kind, "ignored invalid state transition");
            return false;
        }

        if from == UiStateKind::Login {
            self.carry_login_selection();
        }
        self.state.core_mut().remove_cursors(&mut self.ctx);
        self.state = match kind {
            UiStateKind::Login => Box::new(LoginState::new(&mut self.ctx)),
            UiStateKind::Game => Box::new(GameState::new(&mut self.ctx)),
            UiStateKind::CashShop => Box::new(CashShopState::new(&mut self.ctx)),
        };
        self.cursor.set_state(CursorState::Idle);
        tracing::info!(%from, to = %kind, "changed ui state");
        true
    }

    /// The world and channel picked at login outlive the login screens.
    fn carry_login_selection(&mut self) {
        let Some(select) = self.state.core().registry().get_typed::<WorldSelect>() else {
            return;
        };
        let count = select.channel_count();
        let channel = select.channel();
        let world = select.world_id();
        self.ctx.set_channel_count(count);
        let stats = &mut self.ctx.session_mut().stats;
        stats.channel_id = channel;
        if let Some(world) = world {
            stats.world_id = world;
        }
        tracing::debug!(channels = count, channel, "carried world selection");
    }

    pub fn send_cursor_move(&mut self, pos: Point) {
        self.cursor.set_position(pos);
        self.ctx.set_cursor(pos);
        self.route_pointer(self.cursor.state().is_clicked());
        self.apply_requests();
    }

    pub fn send_cursor_button(&mut self, pressed: bool) {
        self.cursor.set_pressed(pressed);
        self.cursor.set_state(if pressed {
            CursorState::Clicking
        } else {
            CursorState::Idle
        });
        self.route_pointer(pressed);
        self.apply_requests();
    }

    fn route_pointer(&mut self, clicked: bool) {
        let input = PointerInput {
            pos: self.cursor.position(),
            clicked,
            held: self.cursor.is_pressed(),
        };
        let next = self.state.send_cursor(input, &mut self.ctx);
        self.cursor.set_state(next);
    }

    pub fn send_scroll(&mut self, delta: f64) {
        self.state.core_mut().send_scroll(delta, &mut self.ctx);
        self.apply_requests();
    }

    pub fn doubleclick(&mut self) {
        let pos = self.cursor.position();
        self.state.core_mut().doubleclick(pos, &mut self.ctx);
        self.apply_requests();
    }

    pub fn rightclick(&mut self) {
        let pos = self.cursor.position();
        self.state.core_mut().rightclick(pos, &mut self.ctx);
        self.apply_requests();
    }

    /// The platform window was asked to close.
    pub fn send_close(&mut self) {
        self.state.send_close(&mut self.ctx);
        self.apply_requests();
    }

    pub fn send_key(&mut self, key: PhysicalKey, pressed: bool) {
        if key.is_shift() {
            self.modifiers.shift = pressed;
        } else if key.is_control() {
            self.modifiers.control = pressed;
        } else if key.is_alt() {
            self.modifiers.alt = pressed;
        } else if key == PhysicalKey::CapsLock && pressed {
            self.caps_lock = !self.caps_lock;
        }

        if pressed && self.modifiers.alt && key.is_enter() {
            self.platform.toggle_fullscreen();
            self.modifiers.alt = false;
            return;
        }

        let escape = key == PhysicalKey::Escape;
        if let Some(target) = self.state.core_mut().live_text_focus() {
            self.send_text_key(target, key, pressed);
            // Escape ends text entry without reaching any other window.
            if escape && pressed && self.state.core().text_focus() == Some(target) {
                self.state.core_mut().focus_textfield(None);
            }
            self.apply_requests();
            return;
        }

        let mapping = self.ctx.keyboard.translate(key);
        self.dispatch_key(mapping, pressed, escape);
        self.apply_requests();
    }

    fn dispatch_key(&mut self, mapping: Mapping, pressed: bool, escape: bool) {
        match self.state.core().key_target(mapping, escape) {
            Some(tag) => {
                self.state
                    .core_mut()
                    .send_key_to(tag, mapping, pressed, escape, &mut self.ctx);
            }
            None => self.state.send_key(mapping, pressed, escape, &mut self.ctx),
        }
    }

    fn send_text_key(&mut self, target: FocusTarget, key: PhysicalKey, pressed: bool) {
        if self.modifiers.control {
            if pressed {
                match self.ctx.keyboard.ctrl_action(key) {
                    Some(KeyAction::Copy) => self.copy_field(target),
                    Some(KeyAction::Paste) => self.paste_field(target),
                    _ => {}
                }
            }
            return;
        }

        let letter = key.char(false).is_some_and(|c| c.is_ascii_alphabetic());
        let shift = if letter {
            self.modifiers.shift != self.caps_lock
        } else {
            self.modifiers.shift
        };
        let mapping = self.ctx.keyboard.translate_text(key, shift);
        if mapping.is_none() {
            return;
        }

        let Some(element) = self.state.core_mut().registry_mut().get_mut(target.element) else {
            return;
        };
        let event = element
            .textfield_mut(target.field)
            .and_then(|field| field.send_key(mapping, pressed));
        if let Some(event) = event {
            element.field_event(target.field, event, &mut self.ctx);
        }
    }

    fn copy_field(&mut self, target: FocusTarget) {
        let Some(field) = self
            .state
            .core()
            .registry()
            .get(target.element)
            .and_then(|e| e.textfield(target.field))
        else {
            return;
        };
        if field.is_crypted() {
            return;
        }
        if let Err(error) = self.clipboard.set_text(field.text()) {
            tracing::warn!(%error, "copy to clipboard failed");
        }
    }

    fn paste_field(&mut self, target: FocusTarget) {
        let text = match self.clipboard.get_text() {
            Ok(text) => text,
            Err(error) => {
                tracing::warn!(%error, "paste from clipboard failed");
                String::new()
            }
        };
        if let Some(field) = self
            .state
            .core_mut()
            .registry_mut()
            .get_mut(target.element)
            .and_then(|e| e.textfield_mut(target.field))
        {
            field.add_string(&text);
        }
    }

    /// Inserts a literal character into the focused text field.
    pub fn send_char(&mut self, c: char) {
        let Some(target) = self.state.core_mut().live_text_focus() else {
            return;
        };
        if let Some(field) = self
            .state
            .core_mut()
            .registry_mut()
            .get_mut(target.element)
            .and_then(|e| e.textfield_mut(target.field))
        {
            field.add_string(c.encode_utf8(&mut [0; 4]));
        }
    }

    /// Delivers an inbound event to one window. In the game, messages that
    /// open a window (shop, npc dialogue) open it first when it is absent;
    /// anything else addressed to an absent window is dropped.
    pub fn notify(&mut self, tag: ElementType, message: ElementMessage) {
        if !self.state.core().registry().contains(tag) {
            let opens = message.opens() == Some(tag) && self.state.kind() == UiStateKind::Game;
            if !opens {
                tracing::debug!(element = ?tag, ?message, "dropped message for absent element");
                return;
            }
            self.ctx.open_window(tag);
            self.apply_requests();
        }
        self.deliver(tag, &message);
        self.apply_requests();
    }

    /// Delivers an inbound event to every window of the active state.
    pub fn broadcast(&mut self, message: ElementMessage) {
        for tag in self.state.core().registry().order().to_vec() {
            self.deliver(tag, &message);
        }
        self.apply_requests();
    }

    fn deliver(&mut self, tag: ElementType, message: &ElementMessage) {
        match self.state.core_mut().registry_mut().get_mut(tag) {
            Some(element) => element.handle_message(message, &mut self.ctx),
            None => tracing::debug!(element = ?tag, ?message, "dropped message for absent element"),
        }
    }

    /// One entry of the server keymap. Invalid entries are logged and
    /// ignored.
    pub fn add_keymapping(&mut self, index: u8, type_id: u8, action: i32) {
        if let Err(error) = self.ctx.keyboard.assign(index, type_id, action) {
            tracing::warn!(%error, index, type_id, action, "ignored invalid key mapping");
        }
    }

    pub fn resize(&mut self, viewport: Point) {
        self.ctx.set_viewport(viewport);
    }

    pub fn state_kind(&self) -> UiStateKind {
        self.state.kind()
    }

    pub fn core(&self) -> &StateCore {
        self.state.core()
    }

    pub fn element<T: ElementKind>(&self) -> Option<&T> {
        self.state.core().registry().get_typed::<T>()
    }

    pub fn element_mut<T: ElementKind>(&mut self) -> Option<&mut T> {
        self.state.core_mut().registry_mut().get_typed_mut::<T>()
    }

    pub fn is_active(&self, tag: ElementType) -> bool {
        self.state.core().registry().is_active(tag)
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn is_quit(&self) -> bool {
        self.quit
    }

    pub fn session(&self) -> &Session {
        self.ctx.session()
    }

    pub fn session_mut(&mut self) -> &mut Session {
        self.ctx.session_mut()
    }

    pub fn keyboard(&self) -> &Keyboard {
        &self.ctx.keyboard
    }

    pub fn channel_count(&self) -> u8 {
        self.ctx.channel_count()
    }

    /// Runs every queued request. Requests queued while running a batch run
    /// in the next round; a state change drops the rest of its batch.
    fn apply_requests(&mut self) {
        for _ in 0..MAX_REQUEST_ROUNDS {
            let requests = self.ctx.take_requests();
            if requests.is_empty() {
                return;
            }
            let mut opened = false;
            let total = requests.len();
            for (done, request) in requests.into_iter().enumerate() {
                match self.apply(request) {
                    Applied::Done => {}
                    Applied::Opened => opened = true,
                    Applied::StateChanged => {
                        let dropped = total - done - 1;
                        if dropped > 0 {
                            tracing::debug!(dropped, "dropped requests queued for the previous state");
                        }
                        opened = false;
                        break;
                    }
                }
            }
            if opened && !self.cursor.is_pressed() {
                self.route_pointer(false);
            }
        }
        let dropped = self.ctx.take_requests().len();
        if dropped > 0 {
            tracing::warn!(dropped, "request rounds exhausted");
        }
    }

    fn apply(&mut self, request: UiRequest) -> Applied {
        let core = self.state.core_mut();
        match request {
            UiRequest::Open { tag, factory } => {
                match core.emplace(tag, factory, &mut self.ctx) {
                    InsertOutcome::Created | InsertOutcome::Activated => return Applied::Opened,
                    InsertOutcome::Deactivated => {}
                }
            }
            UiRequest::Remove(tag) => core.remove(tag),
            UiRequest::Hide(tag) => core.hide(tag, &mut self.ctx),
            UiRequest::Show(tag) => core.show(tag, &mut self.ctx),
            UiRequest::Focus(target) => core.focus_textfield(target),
            UiRequest::DragIcon(icon) => core.drag_icon(icon, &mut self.ctx),
            UiRequest::ShowTooltip { parent, content } => {
                if core.registry().is_active(parent) && core.icon().is_none() {
                    core.tooltip_mut().show(parent, content);
                }
            }
            UiRequest::ClearTooltip(parent) => core.tooltip_mut().clear(parent),
            UiRequest::Notify { tag, message } => self.deliver(tag, &message),
            UiRequest::ChangeState(kind) => {
                if self.switch_state(kind) {
                    return Applied::StateChanged;
                }
            }
            UiRequest::Quit => {
                tracing::info!("quit requested");
                self.quit = true;
            }
        }
        Applied::Done
    }
}

fn cursor_glyph(state: CursorState) -> &'static str {
    match state {
        CursorState::CanClick | CursorState::CanClick2 => "☝",
        CursorState::CanGrab => "✋",
        CursorState::Grabbing | CursorState::Clicking => "✊",
        _ => "↖",
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::services::recording::Probe;

    fn facade() -> (Probe, UiFacade) {
        let probe = Probe::new();
        let ui = UiFacade::new(probe.services(), Session::sample());
        (probe, ui)
    }

    #[test]
    fn starts_at_login_with_account_focused() {
        let (_probe, ui) = facade();
        assert_eq!(ui.state_kind(), UiStateKind::Login);
        assert_eq!(
            ui.core().text_focus().map(|t| t.element),
            Some(ElementType::Login)
        );
    }

    #[test]
    fn invalid_transitions_are_ignored() {
        let (_probe, mut ui) = facade();
        ui.change_state(UiStateKind::CashShop);
        assert_eq!(ui.state_kind(), UiStateKind::Login);
        ui.change_state(UiStateKind::Game);
        ui.change_state(UiStateKind::Login);
        assert_eq!(ui.state_kind(), UiStateKind::Game);
    }

    #[test]
    fn alt_enter_toggles_fullscreen_once() {
        let (probe, mut ui) = facade();
        ui.send_key(PhysicalKey::LeftAlt, true);
        ui.send_key(PhysicalKey::Enter, true);
        ui.send_key(PhysicalKey::Enter, true);
        assert_eq!(probe.platform.fullscreen_toggles(), 1);
    }

    #[test]
    fn messages_for_absent_windows_are_dropped() {
        let (probe, mut ui) = facade();
        ui.notify(ElementType::ChatBar, ElementMessage::ChatLine("hello".into()));
        assert!(!ui.core().registry().contains(ElementType::ChatBar));
        assert!(probe.network.sent().is_empty());
    }

    /// Re-sends its message to itself until `remaining` runs out.
    struct Relay {
        active: bool,
        remaining: usize,
    }

    impl crate::elements::UiElement for Relay {
        fn element_type(&self) -> ElementType {
            ElementType::BuffList
        }

        fn position(&self) -> Point {
            Point::ORIGIN
        }

        fn size(&self) -> Point {
            Point::ORIGIN
        }

        fn is_active(&self) -> bool {
            self.active
        }

        fn set_active(&mut self, active: bool) {
            self.active = active;
        }

        fn draw(&self, _canvas: &mut dyn Canvas, _alpha: f32) {}

        fn send_cursor(&mut self, _clicked: bool, _pos: Point, _ctx: &mut UiContext) -> CursorState {
            CursorState::Idle
        }

        fn handle_message(&mut self, message: &ElementMessage, ctx: &mut UiContext) {
            if self.remaining > 0 {
                self.remaining -= 1;
                ctx.notify(ElementType::BuffList, message.clone());
            }
        }
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn relay_logs(hops: usize) -> String {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            let (_probe, mut ui) = facade();
            ui.ctx.open(ElementType::BuffList, move |_| Relay {
                active: true,
                remaining: hops,
            });
            ui.apply_requests();
            ui.notify(ElementType::BuffList, ElementMessage::StatsChanged);
        });
        let bytes = captured.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn using_every_request_round_is_not_reported_as_exhaustion() {
        assert!(!relay_logs(MAX_REQUEST_ROUNDS).contains("request rounds exhausted"));
        assert!(relay_logs(MAX_REQUEST_ROUNDS + 1).contains("request rounds exhausted"));
    }

    #[test]
    fn invalid_keymap_entries_leave_bindings_alone() {
        let (_probe, mut ui) = facade();
        let before = ui.keyboard().bindings().clone();
        ui.add_keymapping(23, 99, 0);
        assert_eq!(ui.keyboard().bindings(), &before);
    }
}
