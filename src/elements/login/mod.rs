//! The three login screens. Each one replaces or hides the previous screen
//! when the server answers.

mod char_select;
mod world_select;

pub use char_select::CharSelect;
pub use world_select::WorldSelect;

use ratatui::style::Color;

use super::notice::{Notice, NoticeAction};
use super::{
    ElementKind, ElementMessage, ElementType, FieldId, FocusTarget, UiContext, UiElement, draw_frame,
};
use crate::actions::{KeyAction, Mapping};
use crate::components::{Button, ButtonSet, FieldEvent, Textfield};
use crate::constants::VIEWPORT;
use crate::cursor::CursorState;
use crate::geometry::{Point, Rectangle};
use crate::render::Canvas;
use crate::services::Request;

pub const ACCOUNT_FIELD: FieldId = FieldId(0);
pub const PASSWORD_FIELD: FieldId = FieldId(1);

const WIDTH: i32 = 300;
const HEIGHT: i32 = 132;
const FIELD_LIMIT: usize = 12;

const BT_LOGIN: u16 = 0;
const BT_QUIT: u16 = 1;

/// Account and password entry.
pub struct Login {
    position: Point,
    active: bool,
    account: Textfield,
    password: Textfield,
    buttons: ButtonSet,
}

impl Login {
    pub fn new(_ctx: &UiContext) -> Self {
        let mut buttons = ButtonSet::new();
        buttons.insert(BT_LOGIN, Button::new(Rectangle::from_xywh(WIDTH - 128, HEIGHT - 28, 56, 16), "Login"));
        buttons.insert(BT_QUIT, Button::new(Rectangle::from_xywh(WIDTH - 64, HEIGHT - 28, 48, 16), "Quit"));
        Self {
            position: Point::new((VIEWPORT.x - WIDTH) / 2, (VIEWPORT.y - HEIGHT) / 2),
            active: true,
            account: Textfield::new(Rectangle::from_xywh(72, 36, 200, 16), FIELD_LIMIT),
            password: Textfield::new(Rectangle::from_xywh(72, 60, 200, 16), FIELD_LIMIT).with_crypt('*'),
            buttons,
        }
    }

    pub fn account(&self) -> &str {
        self.account.text()
    }

    fn field_mut(&mut self, field: FieldId) -> Option<&mut Textfield> {
        match field {
            ACCOUNT_FIELD => Some(&mut self.account),
            PASSWORD_FIELD => Some(&mut self.password),
            _ => None,
        }
    }

    fn attempt(&mut self, ctx: &mut UiContext) {
        let missing = if self.account.text().is_empty() {
            Some("Please enter your ID.")
        } else if self.password.text().is_empty() {
            Some("Please enter your password.")
        } else {
            None
        };
        if let Some(message) = missing {
            ctx.open(ElementType::Notice, move |_| Notice::ok(message));
            return;
        }
        tracing::info!(account = self.account.text(), "logging in");
        ctx.send(Request::Login {
            account: self.account.text().to_string(),
            password: self.password.text().to_string(),
        });
    }

    fn focus(&self, field: FieldId, ctx: &mut UiContext) {
        ctx.focus(Some(FocusTarget::new(ElementType::Login, field)));
    }
}

fn confirm_quit(ctx: &mut UiContext) {
    ctx.open(ElementType::Notice, |_| {
        Notice::yes_no(
            "Are you sure you want to quit?",
            NoticeAction::Quit,
            NoticeAction::None,
        )
    });
}

impl UiElement for Login {
    fn element_type(&self) -> ElementType {
        ElementType::Login
    }

    fn position(&self) -> Point {
        self.position
    }

    fn size(&self) -> Point {
        Point::new(WIDTH, HEIGHT)
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    fn draw(&self, canvas: &mut dyn Canvas, _alpha: f32) {
        draw_frame(canvas, self.bounds(), "Journey");
        canvas.text(self.position + Point::new(16, 36), "ID", Color::Gray);
        canvas.text(self.position + Point::new(16, 60), "PW", Color::Gray);
        self.account.draw(canvas, self.position);
        self.password.draw(canvas, self.position);
        self.buttons.draw(canvas, self.position);
    }

    fn update(&mut self, _ctx: &mut UiContext) {
        self.account.update();
        self.password.update();
    }

    fn send_cursor(&mut self, clicked: bool, pos: Point, ctx: &mut UiContext) -> CursorState {
        for field in [ACCOUNT_FIELD, PASSWORD_FIELD] {
            let origin = self.position;
            let Some(textfield) = self.field_mut(field) else {
                continue;
            };
            let was_focused = textfield.is_focused();
            let state = textfield.send_cursor(origin, pos, clicked);
            if textfield.is_focused() && !was_focused {
                self.focus(field, ctx);
            }
            if state != CursorState::Idle {
                return state;
            }
        }

        let (state, pressed) = self
            .buttons
            .send_cursor(self.position, clicked, pos, ctx.audio.as_mut());
        match pressed {
            Some(BT_LOGIN) => self.attempt(ctx),
            Some(BT_QUIT) => confirm_quit(ctx),
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
        if escape {
            confirm_quit(ctx);
            return;
        }
        match mapping.key_action() {
            Some(KeyAction::Return) => self.attempt(ctx),
            Some(KeyAction::Tab) => self.focus(ACCOUNT_FIELD, ctx),
            _ => {}
        }
    }

    fn handle_message(&mut self, message: &ElementMessage, ctx: &mut UiContext) {
        if *message == ElementMessage::WorldsLoaded {
            ctx.remove(ElementType::Login);
            ctx.open_window(ElementType::WorldSelect);
        }
    }

    fn initial_focus(&self) -> Option<FieldId> {
        Some(ACCOUNT_FIELD)
    }

    fn textfield(&self, field: FieldId) -> Option<&Textfield> {
        match field {
            ACCOUNT_FIELD => Some(&self.account),
            PASSWORD_FIELD => Some(&self.password),
            _ => None,
        }
    }

    fn textfield_mut(&mut self, field: FieldId) -> Option<&mut Textfield> {
        self.field_mut(field)
    }

    fn field_event(&mut self, field: FieldId, event: FieldEvent, ctx: &mut UiContext) {
        match event {
            FieldEvent::Submit(_) => self.attempt(ctx),
            FieldEvent::Action(KeyAction::Tab) => {
                let next = if field == ACCOUNT_FIELD {
                    PASSWORD_FIELD
                } else {
                    ACCOUNT_FIELD
                };
                self.focus(next, ctx);
            }
            FieldEvent::Action(_) => {}
        }
    }
}

impl ElementKind for Login {
    const TYPE: ElementType = ElementType::Login;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::UiRequest;
    use crate::model::Session;
    use crate::services::recording::Probe;

    fn type_into(login: &mut Login, field: FieldId, text: &str) {
        let textfield = login.textfield_mut(field).unwrap();
        textfield.set_state(crate::components::FieldState::Focused);
        textfield.add_string(text);
    }

    #[test]
    fn tab_alternates_between_fields() {
        let probe = Probe::new();
        let mut ctx = probe.context(Session::sample());
        let mut login = Login::new(&ctx);
        login.field_event(ACCOUNT_FIELD, FieldEvent::Action(KeyAction::Tab), &mut ctx);
        login.field_event(PASSWORD_FIELD, FieldEvent::Action(KeyAction::Tab), &mut ctx);
        let targets: Vec<_> = ctx
            .take_requests()
            .into_iter()
            .filter_map(|r| match r {
                UiRequest::Focus(Some(target)) => Some(target.field),
                _ => None,
            })
            .collect();
        assert_eq!(targets, vec![PASSWORD_FIELD, ACCOUNT_FIELD]);
    }

    #[test]
    fn submit_sends_credentials() {
        let probe = Probe::new();
        let mut ctx = probe.context(Session::sample());
        let mut login = Login::new(&ctx);
        type_into(&mut login, ACCOUNT_FIELD, "admin");
        type_into(&mut login, PASSWORD_FIELD, "hunter2");
        login.field_event(PASSWORD_FIELD, FieldEvent::Submit("hunter2".into()), &mut ctx);
        assert_eq!(
            probe.network.sent(),
            vec![Request::Login {
                account: "admin".into(),
                password: "hunter2".into(),
            }]
        );
    }

    #[test]
    fn empty_account_shows_a_notice_instead() {
        let probe = Probe::new();
        let mut ctx = probe.context(Session::sample());
        let mut login = Login::new(&ctx);
        login.send_key(Mapping::of(KeyAction::Return), true, false, &mut ctx);
        assert!(probe.network.sent().is_empty());
        assert!(matches!(
            ctx.take_requests().as_slice(),
            [UiRequest::Open {
                tag: ElementType::Notice,
                ..
            }]
        ));
    }

    #[test]
    fn worlds_loaded_moves_on_to_world_select() {
        let probe = Probe::new();
        let mut ctx = probe.context(Session::sample());
        let mut login = Login::new(&ctx);
        login.handle_message(&ElementMessage::WorldsLoaded, &mut ctx);
        assert!(matches!(
            ctx.take_requests().as_slice(),
            [
                UiRequest::Remove(ElementType::Login),
                UiRequest::Open {
                    tag: ElementType::WorldSelect,
                    ..
                }
            ]
        ));
    }
}
