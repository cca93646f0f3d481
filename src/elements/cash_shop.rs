use ratatui::style::Color;

use super::{ElementKind, ElementType, UiContext, UiElement, draw_frame};
use crate::actions::Mapping;
use crate::components::{Button, ButtonSet};
use crate::constants::VIEWPORT;
use crate::cursor::CursorState;
use crate::geometry::{Point, Rectangle};
use crate::render::Canvas;
use crate::services::Request;

const BT_EXIT: u16 = 0;

/// Full-screen cash shop. Leaving asks the server first; the host switches
/// back to the game once it answers.
pub struct CashShop {
    active: bool,
    name: String,
    meso: i64,
    buttons: ButtonSet,
    leaving: bool,
}

impl CashShop {
    pub fn new(ctx: &UiContext) -> Self {
        let mut buttons = ButtonSet::new();
        buttons.insert(BT_EXIT, Button::new(Rectangle::from_xywh(VIEWPORT.x - 72, 8, 56, 16), "Exit"));
        let stats = &ctx.session().stats;
        Self {
            active: true,
            name: stats.name.clone(),
            meso: stats.meso,
            buttons,
            leaving: false,
        }
    }

    pub fn is_leaving(&self) -> bool {
        self.leaving
    }

    fn leave(&mut self, ctx: &mut UiContext) {
        if self.leaving {
            return;
        }
        self.leaving = true;
        ctx.send(Request::LeaveCashShop);
    }
}

impl UiElement for CashShop {
    fn element_type(&self) -> ElementType {
        ElementType::CashShop
    }

    fn position(&self) -> Point {
        Point::ORIGIN
    }

    fn size(&self) -> Point {
        VIEWPORT
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    fn draw(&self, canvas: &mut dyn Canvas, _alpha: f32) {
        draw_frame(canvas, self.bounds(), "Cash Shop");
        canvas.text(
            Point::new(16, 32),
            &format!("{}  |  {} meso", self.name, self.meso),
            Color::Yellow,
        );
        self.buttons.draw(canvas, Point::ORIGIN);
    }

    fn send_cursor(&mut self, clicked: bool, pos: Point, ctx: &mut UiContext) -> CursorState {
        let (state, pressed) = self
            .buttons
            .send_cursor(Point::ORIGIN, clicked, pos, ctx.audio.as_mut());
        if pressed == Some(BT_EXIT) {
            self.leave(ctx);
        }
        state
    }

    fn remove_cursor(&mut self, _ctx: &mut UiContext) {
        self.buttons.remove_cursor();
    }

    fn send_key(&mut self, _mapping: Mapping, pressed: bool, escape: bool, ctx: &mut UiContext) {
        if pressed && escape {
            self.leave(ctx);
        }
    }
}

impl ElementKind for CashShop {
    const TYPE: ElementType = ElementType::CashShop;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::KeyAction;
    use crate::model::Session;
    use crate::services::recording::Probe;

    #[test]
    fn escape_asks_to_leave_once() {
        let probe = Probe::new();
        let mut ctx = probe.context(Session::sample());
        let mut shop = CashShop::new(&ctx);
        shop.send_key(Mapping::of(KeyAction::MainMenu), true, true, &mut ctx);
        shop.send_key(Mapping::of(KeyAction::MainMenu), true, true, &mut ctx);
        assert!(shop.is_leaving());
        assert_eq!(probe.network.sent(), vec![Request::LeaveCashShop]);
    }
}
