//! Modal dialogs: a message, a yes/no question, or a quantity prompt.
//!
//! All three share the `Notice` tag, so opening one replaces whatever notice
//! was showing. Their outcomes are plain data ([`NoticeAction`]) run against
//! the context when the dialog closes.

use ratatui::style::Color;

use super::{
    ElementKind, ElementMessage, ElementType, FieldId, UiContext, UiElement, draw_frame,
};
use crate::actions::{KeyAction, Mapping};
use crate::components::{Button, ButtonSet, FieldEvent, FieldState, Textfield};
use crate::constants::VIEWPORT;
use crate::cursor::CursorState;
use crate::geometry::{Point, Rectangle};
use crate::model::InventoryType;
use crate::render::Canvas;
use crate::services::Request;

/// The quantity field of an `EnterNumber` notice.
pub const NUMBER_FIELD: FieldId = FieldId(0);

const BT_OK: u16 = 0;
const BT_CANCEL: u16 = 1;

const WIDTH: i32 = 300;
const TEXT_TOP: i32 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Ok,
    YesNo,
    EnterNumber { max: i16 },
}

/// What a notice does on confirm or cancel. Quantity-taking actions use
/// the entered number, or 1 outside an `EnterNumber` prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoticeAction {
    None,
    Send(Request),
    DropItem {
        tab: InventoryType,
        slot: i16,
    },
    /// Asks how many to drop, then drops that many.
    PromptDrop {
        tab: InventoryType,
        slot: i16,
        max: i16,
    },
    BuyItem {
        item_id: i32,
    },
    SellItem {
        slot: i16,
        item_id: i32,
    },
    Notify {
        tag: ElementType,
        message: ElementMessage,
    },
    Quit,
}

impl NoticeAction {
    pub fn run(self, quantity: i16, ctx: &mut UiContext) {
        match self {
            NoticeAction::None => {}
            NoticeAction::Send(request) => ctx.send(request),
            NoticeAction::DropItem { tab, slot } => ctx.send(Request::MoveItem {
                tab,
                from: slot,
                to: 0,
                quantity,
            }),
            NoticeAction::PromptDrop { tab, slot, max } => {
                ctx.open(ElementType::Notice, move |_| {
                    Notice::enter_number(
                        "How many will you drop?",
                        max,
                        1,
                        NoticeAction::DropItem { tab, slot },
                    )
                });
            }
            NoticeAction::BuyItem { item_id } => ctx.send(Request::BuyItem { item_id, quantity }),
            NoticeAction::SellItem { slot, item_id } => ctx.send(Request::SellItem {
                slot,
                item_id,
                quantity,
            }),
            NoticeAction::Notify { tag, message } => ctx.notify(tag, message),
            NoticeAction::Quit => ctx.quit(),
        }
    }
}

pub struct Notice {
    kind: NoticeKind,
    message: String,
    position: Point,
    size: Point,
    active: bool,
    buttons: ButtonSet,
    on_confirm: NoticeAction,
    on_cancel: NoticeAction,
    field: Option<Textfield>,
    error: Option<String>,
}

impl Notice {
    fn build(kind: NoticeKind, message: &str, on_confirm: NoticeAction, on_cancel: NoticeAction) -> Self {
        let line_count = message.lines().count().max(1) as i32;
        let field_rows = if matches!(kind, NoticeKind::EnterNumber { .. }) { 2 } else { 0 };
        let height = TEXT_TOP + (line_count + field_rows) * 16 + 40;
        let size = Point::new(WIDTH, height);
        let position = Point::new((VIEWPORT.x - WIDTH) / 2, (VIEWPORT.y - height) / 2);
        let button_y = height - 24;

        let mut buttons = ButtonSet::new();
        match kind {
            NoticeKind::Ok => {
                buttons.insert(BT_OK, Button::new(Rectangle::from_xywh(130, button_y, 40, 16), "OK"));
            }
            NoticeKind::YesNo | NoticeKind::EnterNumber { .. } => {
                buttons.insert(BT_OK, Button::new(Rectangle::from_xywh(156, button_y, 40, 16), "OK"));
                buttons.insert(
                    BT_CANCEL,
                    Button::new(Rectangle::from_xywh(204, button_y, 64, 16), "Cancel"),
                );
            }
        }

        Self {
            kind,
            message: message.to_string(),
            position,
            size,
            active: true,
            buttons,
            on_confirm,
            on_cancel,
            field: None,
            error: None,
        }
    }

    pub fn ok(message: &str) -> Self {
        Self::build(NoticeKind::Ok, message, NoticeAction::None, NoticeAction::None)
    }

    pub fn yes_no(message: &str, on_yes: NoticeAction, on_no: NoticeAction) -> Self {
        Self::build(NoticeKind::YesNo, message, on_yes, on_no)
    }

    /// A quantity prompt accepting 1 up to `max`, prefilled with `default`.
    pub fn enter_number(message: &str, max: i16, default: i16, on_number: NoticeAction) -> Self {
        let mut notice = Self::build(
            NoticeKind::EnterNumber { max },
            message,
            on_number,
            NoticeAction::None,
        );
        let top = TEXT_TOP + message.lines().count().max(1) as i32 * 16 + 8;
        let mut field = Textfield::new(Rectangle::from_xywh(24, top, 208, 16), 10);
        field.change_text(default.to_string());
        field.set_state(FieldState::Focused);
        notice.field = Some(field);
        notice
    }

    pub fn kind(&self) -> NoticeKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Validation message shown under a rejected quantity.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn close(&mut self, action: NoticeAction, quantity: i16, ctx: &mut UiContext) {
        ctx.remove(ElementType::Notice);
        action.run(quantity, ctx);
    }

    fn confirm(&mut self, ctx: &mut UiContext) {
        match self.kind {
            NoticeKind::EnterNumber { max } => {
                let text = self
                    .field
                    .as_ref()
                    .map(|field| field.text().to_string())
                    .unwrap_or_default();
                self.submit_number(&text, max, ctx);
            }
            NoticeKind::Ok | NoticeKind::YesNo => {
                let action = std::mem::replace(&mut self.on_confirm, NoticeAction::None);
                self.close(action, 1, ctx);
            }
        }
    }

    fn cancel(&mut self, ctx: &mut UiContext) {
        let action = std::mem::replace(&mut self.on_cancel, NoticeAction::None);
        self.close(action, 1, ctx);
    }

    fn submit_number(&mut self, text: &str, max: i16, ctx: &mut UiContext) {
        if text.is_empty() || !text.chars().all(|c| c.is_ascii_digit()) {
            self.error = Some("Only numbers are allowed.".to_string());
            return;
        }
        let number = text.parse::<i64>().unwrap_or(i64::MAX);
        if number < 1 {
            self.error = Some("You may only enter a number equal to or higher than 1.".to_string());
            return;
        }
        if number > i64::from(max) {
            self.error = Some(format!(
                "You may only enter a number equal to or lower than {}.",
                max
            ));
            return;
        }
        let action = std::mem::replace(&mut self.on_confirm, NoticeAction::None);
        // `number` is within 1..=max here.
        self.close(action, number as i16, ctx);
    }
}

impl UiElement for Notice {
    fn element_type(&self) -> ElementType {
        ElementType::Notice
    }

    fn position(&self) -> Point {
        self.position
    }

    fn size(&self) -> Point {
        self.size
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    fn claims_focus(&self) -> bool {
        true
    }

    fn draw(&self, canvas: &mut dyn Canvas, _alpha: f32) {
        if !self.active {
            return;
        }
        draw_frame(canvas, self.bounds(), "Notice");
        let mut y = self.position.y + TEXT_TOP;
        for line in self.message.lines() {
            canvas.text(Point::new(self.position.x + 16, y), line, Color::White);
            y += 16;
        }
        if let Some(field) = &self.field {
            field.draw(canvas, self.position);
        }
        if let Some(error) = &self.error {
            canvas.text(Point::new(self.position.x + 16, y + 24), error, Color::LightRed);
        }
        self.buttons.draw(canvas, self.position);
    }

    fn update(&mut self, _ctx: &mut UiContext) {
        if let Some(field) = &mut self.field {
            field.update();
        }
    }

    fn send_cursor(&mut self, clicked: bool, pos: Point, ctx: &mut UiContext) -> CursorState {
        if let Some(field) = &mut self.field
            && field.state() == FieldState::Normal
        {
            let state = field.send_cursor(self.position, pos, clicked);
            if field.is_focused() {
                ctx.focus(Some(super::FocusTarget::new(ElementType::Notice, NUMBER_FIELD)));
            }
            if state != CursorState::Idle {
                return state;
            }
        }

        let (state, pressed) = self
            .buttons
            .send_cursor(self.position, clicked, pos, ctx.audio.as_mut());
        match pressed {
            Some(BT_OK) => self.confirm(ctx),
            Some(BT_CANCEL) => self.cancel(ctx),
            _ => {}
        }
        state
    }

    fn remove_cursor(&mut self, _ctx: &mut UiContext) {
        self.buttons.remove_cursor();
    }

    fn send_key(&mut self, mapping: Mapping, pressed: bool, escape: bool, ctx: &mut UiContext) {
        if !pressed {
            return;
        }
        if mapping.key_action() == Some(KeyAction::Return) {
            self.confirm(ctx);
        } else if escape {
            match self.kind {
                NoticeKind::Ok => self.confirm(ctx),
                NoticeKind::YesNo | NoticeKind::EnterNumber { .. } => self.cancel(ctx),
            }
        }
    }

    fn initial_focus(&self) -> Option<FieldId> {
        self.field.as_ref().map(|_| NUMBER_FIELD)
    }

    fn textfield(&self, field: FieldId) -> Option<&Textfield> {
        if field == NUMBER_FIELD {
            self.field.as_ref()
        } else {
            None
        }
    }

    fn textfield_mut(&mut self, field: FieldId) -> Option<&mut Textfield> {
        if field == NUMBER_FIELD {
            self.field.as_mut()
        } else {
            None
        }
    }

    fn field_event(&mut self, _field: FieldId, event: FieldEvent, ctx: &mut UiContext) {
        match event {
            FieldEvent::Submit(_) => self.confirm(ctx),
            FieldEvent::Action(KeyAction::Escape) => self.cancel(ctx),
            FieldEvent::Action(_) => {}
        }
    }
}

impl ElementKind for Notice {
    const TYPE: ElementType = ElementType::Notice;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::UiRequest;
    use crate::model::Session;
    use crate::services::recording::Probe;

    fn escape() -> Mapping {
        Mapping::of(KeyAction::Escape)
    }

    #[test]
    fn yes_no_escape_runs_the_no_action() {
        let probe = Probe::new();
        let mut ctx = probe.context(Session::default());
        let mut notice = Notice::yes_no(
            "Save?",
            NoticeAction::Send(Request::EnterCashShop),
            NoticeAction::Send(Request::LeaveCashShop),
        );
        notice.send_key(escape(), true, true, &mut ctx);
        assert_eq!(probe.network.sent(), vec![Request::LeaveCashShop]);
        let requests = ctx.take_requests();
        assert!(matches!(requests[0], UiRequest::Remove(ElementType::Notice)));
    }

    #[test]
    fn enter_number_rejects_out_of_range() {
        let probe = Probe::new();
        let mut ctx = probe.context(Session::default());
        let mut notice = Notice::enter_number(
            "How many will you drop?",
            5,
            1,
            NoticeAction::DropItem {
                tab: InventoryType::Use,
                slot: 2,
            },
        );
        assert_eq!(notice.initial_focus(), Some(NUMBER_FIELD));

        if let Some(field) = notice.textfield_mut(NUMBER_FIELD) {
            field.change_text("9");
        }
        notice.field_event(NUMBER_FIELD, FieldEvent::Submit("9".into()), &mut ctx);
        assert_eq!(
            notice.error(),
            Some("You may only enter a number equal to or lower than 5.")
        );
        assert!(probe.network.sent().is_empty());

        if let Some(field) = notice.textfield_mut(NUMBER_FIELD) {
            field.change_text("3");
        }
        notice.field_event(NUMBER_FIELD, FieldEvent::Submit("3".into()), &mut ctx);
        assert_eq!(
            probe.network.sent(),
            vec![Request::MoveItem {
                tab: InventoryType::Use,
                from: 2,
                to: 0,
                quantity: 3,
            }]
        );
    }

    #[test]
    fn non_digits_are_rejected() {
        let probe = Probe::new();
        let mut ctx = probe.context(Session::default());
        let mut notice = Notice::enter_number("How many?", 5, 1, NoticeAction::None);
        if let Some(field) = notice.textfield_mut(NUMBER_FIELD) {
            field.change_text("2a");
        }
        notice.send_key(Mapping::of(KeyAction::Return), true, false, &mut ctx);
        assert_eq!(notice.error(), Some("Only numbers are allowed."));
        assert!(!ctx.has_requests());
    }

    #[test]
    fn prompt_drop_reopens_as_quantity_prompt_after_closing() {
        let probe = Probe::new();
        let mut ctx = probe.context(Session::default());
        let mut notice = Notice::yes_no(
            "Drop?",
            NoticeAction::PromptDrop {
                tab: InventoryType::Use,
                slot: 2,
                max: 4,
            },
            NoticeAction::None,
        );
        notice.send_key(Mapping::of(KeyAction::Return), true, false, &mut ctx);
        let requests = ctx.take_requests();
        assert_eq!(requests.len(), 2);
        assert!(matches!(requests[0], UiRequest::Remove(ElementType::Notice)));
        assert!(matches!(
            requests[1],
            UiRequest::Open {
                tag: ElementType::Notice,
                ..
            }
        ));
    }
}
