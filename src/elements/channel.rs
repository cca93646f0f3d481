//! Channel selection dialog.

use ratatui::style::Color;

use super::{ElementKind, ElementType, UiContext, UiElement, draw_frame};
use crate::actions::{KeyAction, Mapping};
use crate::components::{Button, ButtonSet};
use crate::constants::VIEWPORT;
use crate::cursor::CursorState;
use crate::geometry::{Point, Rectangle};
use crate::render::Canvas;
use crate::services::Request;

const COLUMNS: u8 = 5;
const CELL: Point = Point::new(64, 20);
const GRID_ORIGIN: Point = Point::new(12, 32);
const WIDTH: i32 = 12 * 2 + COLUMNS as i32 * 64;

const BT_CHANGE: u16 = 0;
const BT_CANCEL: u16 = 1;

pub struct Channel {
    position: Point,
    active: bool,
    count: u8,
    current: u8,
    selected: u8,
    buttons: ButtonSet,
}

impl Channel {
    pub fn new(ctx: &UiContext) -> Self {
        let count = ctx.channel_count().max(1);
        let current = ctx.session().stats.channel_id.min(count - 1);
        let height = Self::height_for(count);
        let mut buttons = ButtonSet::new();
        buttons.insert(
            BT_CHANGE,
            Button::new(Rectangle::from_xywh(WIDTH - 136, height - 24, 64, 16), "Change"),
        );
        buttons.insert(
            BT_CANCEL,
            Button::new(Rectangle::from_xywh(WIDTH - 64, height - 24, 56, 16), "Cancel"),
        );
        Self {
            position: Point::new((VIEWPORT.x - WIDTH) / 2, (VIEWPORT.y - height) / 2),
            active: true,
            count,
            current,
            selected: current,
            buttons,
        }
    }

    fn height_for(count: u8) -> i32 {
        let rows = count.div_ceil(COLUMNS) as i32;
        GRID_ORIGIN.y + rows * CELL.y + 32
    }

    pub fn selected(&self) -> u8 {
        self.selected
    }

    pub fn count(&self) -> u8 {
        self.count
    }

    fn cell_origin(channel: u8) -> Point {
        GRID_ORIGIN
            + Point::new(
                (channel % COLUMNS) as i32 * CELL.x,
                (channel / COLUMNS) as i32 * CELL.y,
            )
    }

    fn channel_at(&self, pos: Point) -> Option<u8> {
        let local = pos - self.position - GRID_ORIGIN;
        if local.x < 0 || local.y < 0 || local.x >= COLUMNS as i32 * CELL.x {
            return None;
        }
        let channel = (local.x / CELL.x) as u8 + COLUMNS * (local.y / CELL.y) as u8;
        (channel < self.count).then_some(channel)
    }

    fn step(&mut self, delta: i32) {
        let count = i32::from(self.count);
        // Wraps within 0..count, which fits in u8.
        self.selected = (i32::from(self.selected) + delta).rem_euclid(count) as u8;
    }

    fn change(&mut self, ctx: &mut UiContext) {
        if self.selected != self.current {
            ctx.send(Request::ChangeChannel {
                channel: self.selected,
            });
        }
        ctx.remove(ElementType::Channel);
    }
}

impl UiElement for Channel {
    fn element_type(&self) -> ElementType {
        ElementType::Channel
    }

    fn position(&self) -> Point {
        self.position
    }

    fn size(&self) -> Point {
        Point::new(WIDTH, Self::height_for(self.count))
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

    fn draw(&self, canvas: &mut dyn Canvas, _alpha: f32) {
        draw_frame(canvas, self.bounds(), "Change Channel");
        for channel in 0..self.count {
            let color = if channel == self.selected {
                Color::Yellow
            } else if channel == self.current {
                Color::LightGreen
            } else {
                Color::White
            };
            canvas.text(
                self.position + Self::cell_origin(channel),
                &format!("Ch. {}", channel + 1),
                color,
            );
        }
        self.buttons.draw(canvas, self.position);
    }

    fn send_cursor(&mut self, clicked: bool, pos: Point, ctx: &mut UiContext) -> CursorState {
        if let Some(channel) = self.channel_at(pos) {
            if clicked {
                if channel == self.selected {
                    self.change(ctx);
                } else {
                    self.selected = channel;
                }
                return CursorState::Idle;
            }
            return CursorState::CanClick;
        }

        let (state, pressed) = self
            .buttons
            .send_cursor(self.position, clicked, pos, ctx.audio.as_mut());
        match pressed {
            Some(BT_CHANGE) => self.change(ctx),
            Some(BT_CANCEL) => ctx.remove(ElementType::Channel),
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
            ctx.remove(ElementType::Channel);
            return;
        }
        match mapping.key_action() {
            Some(KeyAction::Left) => self.step(-1),
            Some(KeyAction::Right) => self.step(1),
            Some(KeyAction::Up) => self.step(-i32::from(COLUMNS)),
            Some(KeyAction::Down) => self.step(i32::from(COLUMNS)),
            Some(KeyAction::Return) => self.change(ctx),
            _ => {}
        }
    }
}

impl ElementKind for Channel {
    const TYPE: ElementType = ElementType::Channel;
}
