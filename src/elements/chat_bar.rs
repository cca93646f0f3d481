//! Chat log and the chat entry line above the status bar.

use std::collections::VecDeque;

use ratatui::style::Color;

use super::{
    ElementKind, ElementMessage, ElementType, FieldId, FocusTarget, UiContext, UiElement,
    draw_frame,
};
use crate::actions::{KeyAction, Mapping};
use crate::components::{FieldEvent, FieldState, Textfield};
use crate::constants::VIEWPORT;
use crate::cursor::CursorState;
use crate::geometry::{Point, Rectangle};
use crate::render::Canvas;
use crate::services::Request;

pub const CHAT_FIELD: FieldId = FieldId(0);

const MAX_LINES: usize = 64;
const MAX_SENT: usize = 32;
const MESSAGE_LIMIT: usize = 70;
const WIDTH: i32 = 500;
const LOG_ROWS: i32 = 4;
const EXPANDED_ROWS: i32 = 10;

pub struct ChatBar {
    active: bool,
    expanded: bool,
    chat_open: bool,
    field: Textfield,
    lines: VecDeque<String>,
    sent: Vec<String>,
    /// Index into `sent` while browsing history with the arrow keys.
    browsing: Option<usize>,
}

impl ChatBar {
    pub fn new(_ctx: &UiContext) -> Self {
        Self {
            active: true,
            expanded: false,
            chat_open: false,
            field: Textfield::new(Rectangle::from_xywh(8, 0, WIDTH - 16, 16), MESSAGE_LIMIT),
            lines: VecDeque::new(),
            sent: Vec::new(),
            browsing: None,
        }
    }

    pub fn is_chat_open(&self) -> bool {
        self.chat_open
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Grows or shrinks the visible log.
    pub fn toggle_visible(&mut self) {
        self.expanded = !self.expanded;
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    pub fn open_chat(&mut self, ctx: &mut UiContext) {
        self.chat_open = true;
        self.browsing = None;
        if self.field.state() == FieldState::Disabled {
            self.field.set_state(FieldState::Normal);
        }
        ctx.focus(Some(FocusTarget::new(ElementType::ChatBar, CHAT_FIELD)));
    }

    fn close_chat(&mut self, ctx: &mut UiContext) {
        self.chat_open = false;
        self.browsing = None;
        self.field.change_text("");
        if self.field.is_focused() {
            self.field.set_state(FieldState::Normal);
            ctx.focus(None);
        }
    }

    fn rows(&self) -> i32 {
        if self.expanded { EXPANDED_ROWS } else { LOG_ROWS }
    }

    fn field_origin(&self) -> Point {
        self.position() + Point::new(0, self.size().y - 20)
    }

    fn push_line(&mut self, line: String) {
        if self.lines.len() == MAX_LINES {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }

    fn submit(&mut self, text: String, ctx: &mut UiContext) {
        if text.trim().is_empty() {
            self.close_chat(ctx);
            return;
        }
        ctx.send(Request::GeneralChat {
            message: text.clone(),
        });
        if self.sent.len() == MAX_SENT {
            self.sent.remove(0);
        }
        self.sent.push(text);
        self.browsing = None;
        self.field.change_text("");
    }

    fn browse(&mut self, older: bool) {
        if self.sent.is_empty() {
            return;
        }
        let last = self.sent.len() - 1;
        let next = match (self.browsing, older) {
            (None, true) => Some(last),
            (None, false) => None,
            (Some(i), true) => Some(i.saturating_sub(1)),
            (Some(i), false) if i < last => Some(i + 1),
            (Some(_), false) => None,
        };
        self.browsing = next;
        let text = next.and_then(|i| self.sent.get(i)).cloned().unwrap_or_default();
        self.field.change_text(text);
    }
}

impl UiElement for ChatBar {
    fn element_type(&self) -> ElementType {
        ElementType::ChatBar
    }

    fn position(&self) -> Point {
        let height = self.size().y;
        Point::new(0, VIEWPORT.y - 80 - height)
    }

    fn size(&self) -> Point {
        Point::new(WIDTH, self.rows() * 16 + 28)
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    fn draw(&self, canvas: &mut dyn Canvas, _alpha: f32) {
        draw_frame(canvas, self.bounds(), "Chat");
        let rows = self.rows() as usize;
        let skip = self.lines.len().saturating_sub(rows);
        let origin = self.position() + Point::new(8, 4);
        for (row, line) in self.lines.iter().skip(skip).enumerate() {
            canvas.text(origin + Point::new(0, row as i32 * 16), line, Color::White);
        }
        if self.chat_open {
            self.field.draw(canvas, self.field_origin());
        }
    }

    fn update(&mut self, _ctx: &mut UiContext) {
        self.field.update();
    }

    fn send_cursor(&mut self, clicked: bool, pos: Point, ctx: &mut UiContext) -> CursorState {
        if !self.chat_open {
            return CursorState::Idle;
        }
        let was_focused = self.field.is_focused();
        let state = self.field.send_cursor(self.field_origin(), pos, clicked);
        if self.field.is_focused() && !was_focused {
            ctx.focus(Some(FocusTarget::new(ElementType::ChatBar, CHAT_FIELD)));
        }
        state
    }

    fn send_key(&mut self, mapping: Mapping, pressed: bool, escape: bool, ctx: &mut UiContext) {
        if !pressed {
            return;
        }
        if escape {
            self.close_chat(ctx);
        } else if mapping.key_action() == Some(KeyAction::Return) {
            if self.chat_open {
                self.close_chat(ctx);
            } else {
                self.open_chat(ctx);
            }
        }
    }

    fn handle_message(&mut self, message: &ElementMessage, _ctx: &mut UiContext) {
        if let ElementMessage::ChatLine(line) = message {
            self.push_line(line.clone());
        }
    }

    fn textfield(&self, field: FieldId) -> Option<&Textfield> {
        (field == CHAT_FIELD).then_some(&self.field)
    }

    fn textfield_mut(&mut self, field: FieldId) -> Option<&mut Textfield> {
        (field == CHAT_FIELD).then_some(&mut self.field)
    }

    fn field_event(&mut self, _field: FieldId, event: FieldEvent, ctx: &mut UiContext) {
        match event {
            FieldEvent::Submit(text) => self.submit(text, ctx),
            FieldEvent::Action(KeyAction::Escape) => self.close_chat(ctx),
            FieldEvent::Action(KeyAction::Up) => self.browse(true),
            FieldEvent::Action(KeyAction::Down) => self.browse(false),
            FieldEvent::Action(_) => {}
        }
    }
}

impl ElementKind for ChatBar {
    const TYPE: ElementType = ElementType::ChatBar;
}
