//! Top-level UI states and the window bookkeeping they share.
//!
//! Each state owns one [`StateCore`]: the registry, the focused window, the
//! text field holding keyboard focus, the icon in flight and the tooltip.
//! Switching state drops the whole core.

pub mod cash_shop;
pub mod game;
pub mod login;

use std::fmt;

pub use cash_shop::CashShopState;
pub use game::GameState;
pub use login::LoginState;

use crate::actions::{KeyAction, Mapping};
use crate::components::{DraggedIcon, FieldState, TooltipSlot};
use crate::constants::{REGRAB_COOLDOWN_TICKS, TOOLTIP_OFFSET};
use crate::cursor::CursorState;
use crate::elements::{ElementFactory, ElementType, FocusTarget, InsertOutcome, Registry, UiContext};
use crate::geometry::Point;
use crate::render::Canvas;
use crate::services::Sound;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UiStateKind {
    Login,
    Game,
    CashShop,
}

impl fmt::Display for UiStateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UiStateKind::Login => "login",
            UiStateKind::Game => "game",
            UiStateKind::CashShop => "cash shop",
        };
        write!(f, "{}", s)
    }
}

/// The role a key plays in window routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemanticKey {
    Escape,
    Tab,
    Enter,
    Arrow,
    Other,
}

impl SemanticKey {
    pub fn of(mapping: Mapping, escape: bool) -> Self {
        if escape {
            return SemanticKey::Escape;
        }
        match mapping.key_action() {
            Some(KeyAction::Tab) => SemanticKey::Tab,
            Some(KeyAction::Return) => SemanticKey::Enter,
            Some(KeyAction::Left | KeyAction::Right | KeyAction::Up | KeyAction::Down) => {
                SemanticKey::Arrow
            }
            _ => SemanticKey::Other,
        }
    }
}

/// A window that swallows every key while it intercepts, except the action
/// that toggles it.
#[derive(Debug, Clone, Copy)]
pub struct ModalRule {
    pub element: ElementType,
    pub unless: Option<KeyAction>,
}

impl ModalRule {
    pub const fn always(element: ElementType) -> Self {
        Self {
            element,
            unless: None,
        }
    }

    pub const fn unless(element: ElementType, action: KeyAction) -> Self {
        Self {
            element,
            unless: Some(action),
        }
    }
}

/// Which windows get keys ahead of the state's own handler.
#[derive(Debug, Clone, Copy)]
pub struct KeyRouting {
    /// Checked in order; the first intercepting window takes the key.
    pub modals: &'static [ModalRule],
    pub escape: &'static [ElementType],
    pub tab: &'static [ElementType],
    pub enter: &'static [ElementType],
    pub arrows: &'static [ElementType],
}

impl KeyRouting {
    pub fn candidates(&self, key: SemanticKey) -> &'static [ElementType] {
        match key {
            SemanticKey::Escape => self.escape,
            SemanticKey::Tab => self.tab,
            SemanticKey::Enter => self.enter,
            SemanticKey::Arrow => self.arrows,
            SemanticKey::Other => &[],
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct StatePolicy {
    /// Re-opening a toggle-capable window flips it instead of rebuilding.
    pub toggle_existing: bool,
    /// Play open/close cues.
    pub cues: bool,
    /// Windows that open and close without a cue.
    pub silent: &'static [ElementType],
    pub routing: KeyRouting,
}

impl StatePolicy {
    fn cue(&self, tag: ElementType, opened: bool) -> Option<Sound> {
        if !self.cues || self.silent.contains(&tag) {
            return None;
        }
        Some(match (tag, opened) {
            (ElementType::WorldMap, true) => Sound::WorldMapOpen,
            (ElementType::WorldMap, false) => Sound::WorldMapClose,
            (_, true) => Sound::MenuUp,
            (_, false) => Sound::MenuDown,
        })
    }
}

/// A cursor event as the state sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerInput {
    pub pos: Point,
    /// The cursor reports a press or a drag in progress.
    pub clicked: bool,
    /// The button is physically held down.
    pub held: bool,
}

pub struct StateCore {
    policy: StatePolicy,
    registry: Registry,
    focused: Option<ElementType>,
    text_focus: Option<FocusTarget>,
    captured: Option<ElementType>,
    icon: Option<DraggedIcon>,
    regrab_cooldown: u8,
    tooltip: TooltipSlot,
}

impl StateCore {
    pub fn new(policy: StatePolicy) -> Self {
        Self {
            policy,
            registry: Registry::new(),
            focused: None,
            text_focus: None,
            captured: None,
            icon: None,
            regrab_cooldown: 0,
            tooltip: TooltipSlot::default(),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// The window currently holding exclusive input.
    pub fn focused(&self) -> Option<ElementType> {
        self.focused
    }

    pub fn text_focus(&self) -> Option<FocusTarget> {
        self.text_focus
    }

    pub fn icon(&self) -> Option<&DraggedIcon> {
        self.icon.as_ref()
    }

    pub fn tooltip(&self) -> &TooltipSlot {
        &self.tooltip
    }

    pub fn tooltip_mut(&mut self) -> &mut TooltipSlot {
        &mut self.tooltip
    }

    pub fn routing(&self) -> &KeyRouting {
        &self.policy.routing
    }

    /// Opens `tag`, or flips an existing toggle-capable instance.
    pub fn emplace(
        &mut self,
        tag: ElementType,
        factory: ElementFactory,
        ctx: &mut UiContext,
    ) -> InsertOutcome {
        let replace = self
            .registry
            .get(tag)
            .is_some_and(|e| !self.policy.toggle_existing || !e.is_toggleable());
        if replace {
            self.remove(tag);
        }

        let outcome = self.registry.insert_or_toggle(tag, || factory(ctx));
        tracing::debug!(element = ?tag, ?outcome, "emplaced element");
        match outcome {
            InsertOutcome::Created | InsertOutcome::Activated => {
                if let Some(sound) = self.policy.cue(tag, true) {
                    ctx.play(sound);
                }
                let (claims_focus, initial_focus) = match self.registry.get(tag) {
                    Some(element) => (element.claims_focus(), element.initial_focus()),
                    None => (false, None),
                };
                if claims_focus {
                    self.focused = Some(tag);
                    if self.text_focus.is_some_and(|focus| focus.element != tag) {
                        self.focus_textfield(None);
                    }
                }
                if outcome == InsertOutcome::Created
                    && let Some(field) = initial_focus
                {
                    self.focus_textfield(Some(FocusTarget::new(tag, field)));
                }
            }
            InsertOutcome::Deactivated => {
                if let Some(sound) = self.policy.cue(tag, false) {
                    ctx.play(sound);
                }
                self.deactivated(tag, ctx);
            }
        }
        outcome
    }

    /// Drops `tag` and every reference the state holds to it.
    pub fn remove(&mut self, tag: ElementType) {
        if !self.registry.remove(tag) {
            return;
        }
        tracing::debug!(element = ?tag, "removed element");
        self.forget(tag);
    }

    /// Deactivates without destroying, as if toggled closed.
    pub fn hide(&mut self, tag: ElementType, ctx: &mut UiContext) {
        let Some(element) = self.registry.get_mut(tag) else {
            return;
        };
        if !element.is_active() {
            return;
        }
        element.set_active(false);
        if let Some(sound) = self.policy.cue(tag, false) {
            ctx.play(sound);
        }
        self.deactivated(tag, ctx);
    }

    pub fn show(&mut self, tag: ElementType, ctx: &mut UiContext) {
        let Some(element) = self.registry.get_mut(tag) else {
            return;
        };
        if !element.is_active() {
            element.set_active(true);
            if let Some(sound) = self.policy.cue(tag, true) {
                ctx.play(sound);
            }
        }
        self.registry.bring_to_front(tag);
    }

    fn deactivated(&mut self, tag: ElementType, ctx: &mut UiContext) {
        if let Some(element) = self.registry.get_mut(tag) {
            element.remove_cursor(ctx);
        }
        self.forget(tag);
    }

    fn forget(&mut self, tag: ElementType) {
        if self.focused == Some(tag) {
            self.focused = None;
        }
        if self.captured == Some(tag) {
            self.captured = None;
        }
        if self.text_focus.is_some_and(|focus| focus.element == tag) {
            self.focus_textfield(None);
        }
        if self.icon.as_ref().is_some_and(|icon| icon.source == tag) {
            tracing::debug!(element = ?tag, "cancelled icon drag");
            self.icon = None;
        }
        self.tooltip.clear(tag);
    }

    /// Moves keyboard focus to `target`, unfocusing the previous field.
    pub fn focus_textfield(&mut self, target: Option<FocusTarget>) {
        if let Some(old) = self.text_focus.take()
            && Some(old) != target
            && let Some(field) = self
                .registry
                .get_mut(old.element)
                .and_then(|e| e.textfield_mut(old.field))
            && field.state() == FieldState::Focused
        {
            field.set_state(FieldState::Normal);
        }

        let Some(target) = target else {
            return;
        };
        match self
            .registry
            .get_mut(target.element)
            .filter(|e| e.is_active())
            .and_then(|e| e.textfield_mut(target.field))
        {
            Some(field) if field.state() != FieldState::Disabled => {
                field.set_state(FieldState::Focused);
                self.text_focus = Some(target);
            }
            _ => tracing::debug!(?target, "focus target unavailable"),
        }
    }

    /// Clears a stale text focus, e.g. after a click outside the field.
    fn validate_text_focus(&mut self) {
        let Some(target) = self.text_focus else {
            return;
        };
        let still_focused = self
            .registry
            .get(target.element)
            .filter(|e| e.is_active())
            .and_then(|e| e.textfield(target.field))
            .is_some_and(|field| field.is_focused());
        if !still_focused {
            self.text_focus = None;
        }
    }

    /// Current text focus, dropping it first if the field lost focus.
    pub fn live_text_focus(&mut self) -> Option<FocusTarget> {
        self.validate_text_focus();
        self.text_focus
    }

    /// Starts an icon drag. Ignored while another icon is in flight.
    pub fn drag_icon(&mut self, icon: DraggedIcon, ctx: &mut UiContext) {
        if self.icon.is_some() {
            tracing::debug!(source = ?icon.source, "icon drag already in flight");
            return;
        }
        if !self.registry.is_active(icon.source) {
            return;
        }
        ctx.play(Sound::DragStart);
        self.tooltip.reset();
        self.icon = Some(icon);
    }

    /// Resolves the icon in flight against whatever is under `pos`.
    fn drop_icon(&mut self, pos: Point, ctx: &mut UiContext) -> CursorState {
        let Some(icon) = self.icon.take() else {
            return CursorState::Idle;
        };
        let done = match self
            .registry
            .front_at(pos)
            .and_then(|tag| self.registry.get_mut(tag))
        {
            Some(element) => element.send_icon(&icon, pos, ctx),
            None => icon.drop_on_stage(ctx),
        };
        if done {
            self.regrab_cooldown = REGRAB_COOLDOWN_TICKS;
            CursorState::Idle
        } else {
            self.icon = Some(icon);
            CursorState::Grabbing
        }
    }

    pub fn remove_cursors(&mut self, ctx: &mut UiContext) {
        self.remove_cursor_except(None, ctx);
    }

    fn remove_cursor_except(&mut self, keep: Option<ElementType>, ctx: &mut UiContext) {
        for tag in self.registry.order().to_vec() {
            if Some(tag) == keep {
                continue;
            }
            if let Some(element) = self.registry.get_mut(tag)
                && element.is_active()
            {
                element.remove_cursor(ctx);
            }
        }
    }

    fn clear_foreign_tooltip(&mut self, tag: ElementType) {
        if let Some(owner) = self.tooltip.owner()
            && owner != tag
        {
            self.tooltip.clear(owner);
        }
    }

    fn cursor_to(&mut self, tag: ElementType, clicked: bool, pos: Point, ctx: &mut UiContext) -> CursorState {
        match self.registry.get_mut(tag) {
            Some(element) if element.is_active() => element.send_cursor(clicked, pos, ctx),
            _ => CursorState::Idle,
        }
    }

    /// Cursor routing for in-world states: icon in flight, focused window,
    /// pressed window, hovered window, then the stage.
    pub fn route_cursor(&mut self, input: PointerInput, ctx: &mut UiContext) -> CursorState {
        let PointerInput { pos, clicked, held } = input;

        if self.icon.is_some() {
            if held {
                return CursorState::Grabbing;
            }
            return self.drop_icon(pos, ctx);
        }

        if let Some(tag) = self.focused {
            if self.registry.is_active(tag) {
                self.remove_cursor_except(Some(tag), ctx);
                return self.cursor_to(tag, clicked, pos, ctx);
            }
            self.focused = None;
        }

        if !clicked {
            if let Some(tag) = self.captured.take()
                && self.registry.is_active(tag)
            {
                return self.cursor_to(tag, false, pos, ctx);
            }

            return match self.registry.front_at(pos) {
                Some(tag) => {
                    self.clear_foreign_tooltip(tag);
                    self.remove_cursor_except(Some(tag), ctx);
                    self.cursor_to(tag, false, pos, ctx)
                }
                None => {
                    self.remove_cursors(ctx);
                    self.tooltip.reset();
                    ctx.stage.send_cursor(false, pos)
                }
            };
        }

        if self.regrab_cooldown > 0 {
            return CursorState::Idle;
        }

        if self.captured.is_none()
            && let Some(tag) = self.registry.front_at(pos)
        {
            self.captured = Some(tag);
            self.registry.bring_to_front(tag);
        }

        match self.captured {
            Some(tag) if self.registry.is_active(tag) => {
                self.clear_foreign_tooltip(tag);
                self.remove_cursor_except(Some(tag), ctx);
                self.cursor_to(tag, true, pos, ctx)
            }
            _ => {
                self.captured = None;
                self.remove_cursors(ctx);
                ctx.stage.send_cursor(true, pos)
            }
        }
    }

    /// The window that should receive a key, if any.
    pub fn key_target(&self, mapping: Mapping, escape: bool) -> Option<ElementType> {
        if let Some(tag) = self.focused
            && self.registry.is_active(tag)
        {
            return Some(tag);
        }

        let action = mapping.key_action();
        for rule in self.policy.routing.modals {
            if rule.unless.is_some() && action == rule.unless {
                continue;
            }
            if self
                .registry
                .get(rule.element)
                .is_some_and(|e| e.is_active() && e.intercepts_keys())
            {
                return Some(rule.element);
            }
        }

        let candidates = self.policy.routing.candidates(SemanticKey::of(mapping, escape));
        self.registry.front_of_types(candidates)
    }

    pub fn send_key_to(
        &mut self,
        tag: ElementType,
        mapping: Mapping,
        pressed: bool,
        escape: bool,
        ctx: &mut UiContext,
    ) -> bool {
        match self.registry.get_mut(tag) {
            Some(element) if element.is_active() => {
                element.send_key(mapping, pressed, escape, ctx);
                true
            }
            _ => false,
        }
    }

    pub fn send_scroll(&mut self, delta: f64, ctx: &mut UiContext) {
        for tag in self.registry.order().to_vec() {
            if let Some(element) = self.registry.get_mut(tag)
                && element.is_active()
            {
                element.send_scroll(delta, ctx);
            }
        }
    }

    pub fn doubleclick(&mut self, pos: Point, ctx: &mut UiContext) {
        match self
            .registry
            .front_at(pos)
            .and_then(|tag| self.registry.get_mut(tag))
        {
            Some(element) => element.doubleclick(pos, ctx),
            None => ctx.stage.doubleclick(pos),
        }
    }

    pub fn rightclick(&mut self, pos: Point, ctx: &mut UiContext) {
        if let Some(element) = self
            .registry
            .front_at(pos)
            .and_then(|tag| self.registry.get_mut(tag))
        {
            element.rightclick(pos, ctx);
        }
    }

    pub fn update(&mut self, ctx: &mut UiContext) {
        self.regrab_cooldown = self.regrab_cooldown.saturating_sub(1);
        for tag in self.registry.order().to_vec() {
            if let Some(element) = self.registry.get_mut(tag)
                && element.is_active()
            {
                element.update(ctx);
            }
        }
        self.validate_text_focus();
    }

    /// Windows back to front, then the tooltip, then the dragged icon.
    pub fn draw(&self, canvas: &mut dyn Canvas, alpha: f32, cursor: Point) {
        for tag in self.registry.order() {
            if let Some(element) = self.registry.get(*tag)
                && element.is_active()
            {
                element.draw(canvas, alpha);
            }
        }
        if let Some(content) = self.tooltip.content() {
            content.draw(canvas, cursor + TOOLTIP_OFFSET);
        }
        if let Some(icon) = &self.icon {
            icon.draw(canvas, cursor);
        }
    }
}

/// One top-level screen.
pub trait UiState {
    fn kind(&self) -> UiStateKind;
    fn core(&self) -> &StateCore;
    fn core_mut(&mut self) -> &mut StateCore;

    fn send_cursor(&mut self, input: PointerInput, ctx: &mut UiContext) -> CursorState {
        self.core_mut().route_cursor(input, ctx)
    }

    /// Keys no window claimed.
    fn send_key(&mut self, mapping: Mapping, pressed: bool, escape: bool, ctx: &mut UiContext);

    /// The platform asked to close the client.
    fn send_close(&mut self, ctx: &mut UiContext);

    fn update(&mut self, ctx: &mut UiContext) {
        self.core_mut().update(ctx);
    }
}
