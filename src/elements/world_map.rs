use ratatui::style::Color;

use super::{ElementKind, ElementType, UiContext, UiElement, draw_frame};
use crate::actions::Mapping;
use crate::components::{Button, ButtonSet, DragHelper};
use crate::cursor::CursorState;
use crate::geometry::{Point, Rectangle};
use crate::render::Canvas;

const WIDTH: i32 = 420;
const HEIGHT: i32 = 300;

const BT_CLOSE: u16 = 0;

pub struct WorldMap {
    drag: DragHelper,
    active: bool,
    current: String,
    buttons: ButtonSet,
}

impl WorldMap {
    pub fn new(ctx: &UiContext) -> Self {
        let handle = Rectangle::from_xywh(0, 0, WIDTH - 32, 20);
        let mut buttons = ButtonSet::new();
        buttons.insert(BT_CLOSE, Button::new(Rectangle::from_xywh(WIDTH - 28, 2, 24, 16), "X"));
        Self {
            drag: DragHelper::new(ElementType::WorldMap, Point::new(190, 100), handle, ctx.settings.as_ref()),
            active: true,
            current: ctx.session().map_name.clone(),
            buttons,
        }
    }
}

impl UiElement for WorldMap {
    fn element_type(&self) -> ElementType {
        ElementType::WorldMap
    }

    fn position(&self) -> Point {
        self.drag.position()
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

    fn is_toggleable(&self) -> bool {
        true
    }

    fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    fn draw(&self, canvas: &mut dyn Canvas, _alpha: f32) {
        draw_frame(canvas, self.bounds(), "World Map");
        let center = self.position() + Point::new(WIDTH / 2 - 40, HEIGHT / 2);
        canvas.text(center, &format!("* {}", self.current), Color::LightYellow);
        self.buttons.draw(canvas, self.position());
    }

    fn send_cursor(&mut self, clicked: bool, pos: Point, ctx: &mut UiContext) -> CursorState {
        if self.drag.send_cursor(clicked, pos, ctx.settings.as_mut()) {
            return if clicked {
                CursorState::Clicking
            } else {
                CursorState::Idle
            };
        }
        let (state, pressed) = self
            .buttons
            .send_cursor(self.position(), clicked, pos, ctx.audio.as_mut());
        if pressed == Some(BT_CLOSE) {
            ctx.hide(ElementType::WorldMap);
        }
        state
    }

    fn remove_cursor(&mut self, ctx: &mut UiContext) {
        self.drag.release(ctx.settings.as_mut());
        self.buttons.remove_cursor();
    }

    fn send_key(&mut self, _mapping: Mapping, pressed: bool, escape: bool, ctx: &mut UiContext) {
        if pressed && escape {
            ctx.hide(ElementType::WorldMap);
        }
    }
}

impl ElementKind for WorldMap {
    const TYPE: ElementType = ElementType::WorldMap;
}
