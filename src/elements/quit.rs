use ratatui::style::Color;

use super::{ElementKind, ElementType, UiContext, UiElement, draw_frame};
use crate::actions::{KeyAction, Mapping};
use crate::components::{Button, ButtonSet};
use crate::constants::VIEWPORT;
use crate::cursor::CursorState;
use crate::geometry::{Point, Rectangle};
use crate::render::Canvas;

const WIDTH: i32 = 260;
const HEIGHT: i32 = 96;

const BT_YES: u16 = 0;
const BT_NO: u16 = 1;

/// Asks before leaving the game.
pub struct Quit {
    position: Point,
    active: bool,
    summary: String,
    buttons: ButtonSet,
}

impl Quit {
    pub fn new(ctx: &UiContext) -> Self {
        let stats = &ctx.session().stats;
        let mut buttons = ButtonSet::new();
        buttons.insert(BT_YES, Button::new(Rectangle::from_xywh(WIDTH - 120, HEIGHT - 24, 48, 16), "Yes"));
        buttons.insert(BT_NO, Button::new(Rectangle::from_xywh(WIDTH - 60, HEIGHT - 24, 40, 16), "No"));
        Self {
            position: Point::new((VIEWPORT.x - WIDTH) / 2, (VIEWPORT.y - HEIGHT) / 2),
            active: true,
            summary: format!("{} Lv. {}", stats.name, stats.level),
            buttons,
        }
    }
}

impl UiElement for Quit {
    fn element_type(&self) -> ElementType {
        ElementType::Quit
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
        draw_frame(canvas, self.bounds(), "Quit");
        canvas.text(self.position + Point::new(16, 24), &self.summary, Color::Yellow);
        canvas.text(
            self.position + Point::new(16, 44),
            "Are you sure you want to quit?",
            Color::White,
        );
        self.buttons.draw(canvas, self.position);
    }

    fn send_cursor(&mut self, clicked: bool, pos: Point, ctx: &mut UiContext) -> CursorState {
        let (state, pressed) = self
            .buttons
            .send_cursor(self.position, clicked, pos, ctx.audio.as_mut());
        match pressed {
            Some(BT_YES) => ctx.quit(),
            Some(BT_NO) => ctx.remove(ElementType::Quit),
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
            ctx.remove(ElementType::Quit);
        } else if mapping.key_action() == Some(KeyAction::Return) {
            ctx.quit();
        }
    }
}

impl ElementKind for Quit {
    const TYPE: ElementType = ElementType::Quit;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::UiRequest;
    use crate::model::Session;
    use crate::services::recording::Probe;

    #[test]
    fn enter_quits_and_escape_dismisses() {
        let probe = Probe::new();
        let mut ctx = probe.context(Session::sample());
        let mut quit = Quit::new(&ctx);
        quit.send_key(Mapping::of(KeyAction::Return), true, false, &mut ctx);
        assert!(matches!(ctx.take_requests().as_slice(), [UiRequest::Quit]));
        quit.send_key(Mapping::of(KeyAction::MainMenu), true, true, &mut ctx);
        assert!(matches!(
            ctx.take_requests().as_slice(),
            [UiRequest::Remove(ElementType::Quit)]
        ));
    }
}
