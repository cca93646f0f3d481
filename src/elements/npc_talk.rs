use ratatui::style::Color;

use super::{ElementKind, ElementMessage, ElementType, UiContext, UiElement, draw_frame};
use crate::actions::{KeyAction, Mapping};
use crate::components::{Button, ButtonSet};
use crate::constants::VIEWPORT;
use crate::cursor::CursorState;
use crate::geometry::{Point, Rectangle};
use crate::render::Canvas;
use crate::services::Request;

const WIDTH: i32 = 360;
const HEIGHT: i32 = 160;

const BT_NEXT: u16 = 0;
const BT_END: u16 = 1;
const BT_YES: u16 = 2;
const BT_NO: u16 = 3;

const RESPONSE_CONTINUE: i8 = 1;
const RESPONSE_DECLINE: i8 = 0;
const RESPONSE_END: i8 = -1;

/// One page of NPC dialogue. Every page is answered once, after which the
/// window closes until the server sends the next page.
pub struct NpcTalk {
    position: Point,
    active: bool,
    npc_id: i32,
    text: String,
    choice: bool,
    buttons: ButtonSet,
}

impl NpcTalk {
    pub fn new(_ctx: &UiContext) -> Self {
        let mut talk = Self {
            position: Point::new((VIEWPORT.x - WIDTH) / 2, (VIEWPORT.y - HEIGHT) / 2),
            active: true,
            npc_id: 0,
            text: String::new(),
            choice: false,
            buttons: ButtonSet::new(),
        };
        talk.layout_buttons();
        talk
    }

    pub fn npc_id(&self) -> i32 {
        self.npc_id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    fn layout_buttons(&mut self) {
        let y = HEIGHT - 24;
        let mut buttons = ButtonSet::new();
        if self.choice {
            buttons.insert(BT_YES, Button::new(Rectangle::from_xywh(WIDTH - 128, y, 48, 16), "Yes"));
            buttons.insert(BT_NO, Button::new(Rectangle::from_xywh(WIDTH - 64, y, 40, 16), "No"));
        } else {
            buttons.insert(BT_END, Button::new(Rectangle::from_xywh(16, y, 96, 16), "End Chat"));
            buttons.insert(BT_NEXT, Button::new(Rectangle::from_xywh(WIDTH - 72, y, 56, 16), "Next"));
        }
        self.buttons = buttons;
    }

    fn respond(&mut self, response: i8, ctx: &mut UiContext) {
        ctx.send(Request::NpcTalkMore {
            npc_id: self.npc_id,
            response,
        });
        ctx.remove(ElementType::NpcTalk);
    }
}

impl UiElement for NpcTalk {
    fn element_type(&self) -> ElementType {
        ElementType::NpcTalk
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
        draw_frame(canvas, self.bounds(), "NPC");
        for (row, line) in self.text.lines().enumerate() {
            canvas.text(
                self.position + Point::new(16, 24 + row as i32 * 16),
                line,
                Color::White,
            );
        }
        self.buttons.draw(canvas, self.position);
    }

    fn send_cursor(&mut self, clicked: bool, pos: Point, ctx: &mut UiContext) -> CursorState {
        let (state, pressed) = self
            .buttons
            .send_cursor(self.position, clicked, pos, ctx.audio.as_mut());
        match pressed {
            Some(BT_NEXT | BT_YES) => self.respond(RESPONSE_CONTINUE, ctx),
            Some(BT_NO) => self.respond(RESPONSE_DECLINE, ctx),
            Some(BT_END) => self.respond(RESPONSE_END, ctx),
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
            self.respond(RESPONSE_END, ctx);
        } else if mapping.key_action() == Some(KeyAction::Return) {
            self.respond(RESPONSE_CONTINUE, ctx);
        }
    }

    fn handle_message(&mut self, message: &ElementMessage, _ctx: &mut UiContext) {
        if let ElementMessage::NpcTalk {
            npc_id,
            text,
            choice,
        } = message
        {
            self.npc_id = *npc_id;
            self.text = text.clone();
            self.choice = *choice;
            self.active = true;
            self.layout_buttons();
        }
    }
}

impl ElementKind for NpcTalk {
    const TYPE: ElementType = ElementType::NpcTalk;
}
