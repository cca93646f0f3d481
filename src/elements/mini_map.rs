use ratatui::style::Color;

use super::{ElementKind, ElementMessage, ElementType, UiContext, UiElement, draw_frame};
use crate::components::{DragHelper, Tooltip};
use crate::constants::VIEWPORT;
use crate::cursor::CursorState;
use crate::geometry::{Point, Rectangle};
use crate::render::Canvas;

const HANDLE_HEIGHT: i32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapSize {
    /// Title strip only.
    Min,
    Normal,
    Max,
}

impl MapSize {
    fn next(self) -> Self {
        match self {
            MapSize::Min => MapSize::Normal,
            MapSize::Normal => MapSize::Max,
            MapSize::Max => MapSize::Min,
        }
    }

    fn dimensions(self) -> Point {
        match self {
            MapSize::Min => Point::new(160, HANDLE_HEIGHT),
            MapSize::Normal => Point::new(160, 128),
            MapSize::Max => Point::new(240, 196),
        }
    }
}

pub struct MiniMap {
    drag: DragHelper,
    active: bool,
    mode: MapSize,
    map_name: String,
    map_id: i32,
    hovered: bool,
}

impl MiniMap {
    pub fn new(ctx: &UiContext) -> Self {
        let default = Point::new(VIEWPORT.x - MapSize::Normal.dimensions().x - 8, 8);
        let handle = Rectangle::from_xywh(0, 0, MapSize::Normal.dimensions().x, HANDLE_HEIGHT);
        let session = ctx.session();
        Self {
            drag: DragHelper::new(ElementType::MiniMap, default, handle, ctx.settings.as_ref()),
            active: true,
            mode: MapSize::Normal,
            map_name: session.map_name.clone(),
            map_id: session.map_id,
            hovered: false,
        }
    }

    pub fn mode(&self) -> MapSize {
        self.mode
    }

    pub fn cycle_size(&mut self) {
        self.mode = self.mode.next();
    }

    fn tooltip(&self) -> Tooltip {
        Tooltip::Map {
            name: self.map_name.clone(),
            description: format!("Map {}", self.map_id),
        }
    }
}

impl UiElement for MiniMap {
    fn element_type(&self) -> ElementType {
        ElementType::MiniMap
    }

    fn position(&self) -> Point {
        self.drag.position()
    }

    fn size(&self) -> Point {
        self.mode.dimensions()
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    fn draw(&self, canvas: &mut dyn Canvas, _alpha: f32) {
        draw_frame(canvas, self.bounds(), &self.map_name);
        if self.mode != MapSize::Min {
            let center = self.position() + Point::new(self.size().x / 2, self.size().y / 2);
            canvas.text(center, "@", Color::LightYellow);
        }
    }

    fn send_cursor(&mut self, clicked: bool, pos: Point, ctx: &mut UiContext) -> CursorState {
        if self.drag.send_cursor(clicked, pos, ctx.settings.as_mut()) {
            return if clicked {
                CursorState::Clicking
            } else {
                CursorState::Idle
            };
        }

        let over_map = self.mode != MapSize::Min && !self.drag.in_handle(pos);
        if over_map && !self.hovered {
            ctx.show_tooltip(ElementType::MiniMap, self.tooltip());
        } else if !over_map && self.hovered {
            ctx.clear_tooltip(ElementType::MiniMap);
        }
        self.hovered = over_map;
        CursorState::Idle
    }

    fn remove_cursor(&mut self, ctx: &mut UiContext) {
        self.drag.release(ctx.settings.as_mut());
        if self.hovered {
            self.hovered = false;
            ctx.clear_tooltip(ElementType::MiniMap);
        }
    }

    fn doubleclick(&mut self, pos: Point, ctx: &mut UiContext) {
        if !self.drag.in_handle(pos) {
            ctx.open_window(ElementType::WorldMap);
        }
    }

    fn handle_message(&mut self, message: &ElementMessage, ctx: &mut UiContext) {
        if *message == ElementMessage::StatsChanged {
            let session = ctx.session();
            self.map_name = session.map_name.clone();
            self.map_id = session.map_id;
        }
    }
}

impl ElementKind for MiniMap {
    const TYPE: ElementType = ElementType::MiniMap;
}
