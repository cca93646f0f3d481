use ratatui::style::Color;

use crate::actions::{KeyAction, Mapping};
use crate::components::{Button, ButtonSet};
use crate::constants::{DEFAULT_CHANNEL_COUNT, VIEWPORT};
use crate::cursor::CursorState;
use crate::elements::{ElementKind, ElementMessage, ElementType, UiContext, UiElement, draw_frame};
use crate::geometry::{Point, Rectangle};
use crate::model::World;
use crate::render::Canvas;
use crate::services::{Request, Sound};

const WIDTH: i32 = 380;
const HEIGHT: i32 = 240;
const LIST_TOP: i32 = 32;
const ROW_HEIGHT: i32 = 20;
const LIST_WIDTH: i32 = 120;

const CHANNEL_COLUMNS: u8 = 4;
const CHANNEL_CELL: Point = Point::new(56, 20);
const CHANNEL_GRID: Point = Point::new(LIST_WIDTH + 24, LIST_TOP);

const BT_ENTER: u16 = 0;
const BT_BACK: u16 = 1;

/// World list plus the channel grid of the highlighted world.
pub struct WorldSelect {
    position: Point,
    active: bool,
    worlds: Vec<World>,
    world: usize,
    channel: u8,
    buttons: ButtonSet,
}

impl WorldSelect {
    pub fn new(ctx: &UiContext) -> Self {
        let mut buttons = ButtonSet::new();
        buttons.insert(BT_ENTER, Button::new(Rectangle::from_xywh(WIDTH - 128, HEIGHT - 28, 56, 16), "Enter"));
        buttons.insert(BT_BACK, Button::new(Rectangle::from_xywh(WIDTH - 64, HEIGHT - 28, 48, 16), "Back"));
        Self {
            position: Point::new((VIEWPORT.x - WIDTH) / 2, (VIEWPORT.y - HEIGHT) / 2),
            active: true,
            worlds: ctx.session().worlds.clone(),
            world: 0,
            channel: 0,
            buttons,
        }
    }

    pub fn world_id(&self) -> Option<u8> {
        self.worlds.get(self.world).map(|world| world.id)
    }

    pub fn channel(&self) -> u8 {
        self.channel
    }

    /// Channels on the highlighted world.
    pub fn channel_count(&self) -> u8 {
        self.worlds
            .get(self.world)
            .map(|world| world.channel_count.max(1))
            .unwrap_or(DEFAULT_CHANNEL_COUNT)
    }

    fn select_world(&mut self, index: usize) {
        if index < self.worlds.len() && index != self.world {
            self.world = index;
            self.channel = self.channel.min(self.channel_count() - 1);
        }
    }

    fn step_world(&mut self, delta: i32) {
        let count = self.worlds.len() as i32;
        if count == 0 {
            return;
        }
        self.select_world((self.world as i32 + delta).rem_euclid(count) as usize);
    }

    fn step_channel(&mut self, delta: i32) {
        let count = i32::from(self.channel_count());
        self.channel = (i32::from(self.channel) + delta).rem_euclid(count) as u8;
    }

    fn enter(&mut self, ctx: &mut UiContext) {
        let Some(world) = self.world_id() else {
            return;
        };
        ctx.play(Sound::ButtonClick);
        ctx.send(Request::CharlistRequest {
            world,
            channel: self.channel,
        });
    }

    fn back(&mut self, ctx: &mut UiContext) {
        ctx.remove(ElementType::WorldSelect);
        ctx.open_window(ElementType::Login);
    }

    fn world_at(&self, pos: Point) -> Option<usize> {
        let local = pos - self.position;
        if local.x < 12 || local.x >= 12 + LIST_WIDTH || local.y < LIST_TOP {
            return None;
        }
        let index = ((local.y - LIST_TOP) / ROW_HEIGHT) as usize;
        (index < self.worlds.len()).then_some(index)
    }

    fn channel_origin(channel: u8) -> Point {
        CHANNEL_GRID
            + Point::new(
                (channel % CHANNEL_COLUMNS) as i32 * CHANNEL_CELL.x,
                (channel / CHANNEL_COLUMNS) as i32 * CHANNEL_CELL.y,
            )
    }

    fn channel_at(&self, pos: Point) -> Option<u8> {
        let local = pos - self.position - CHANNEL_GRID;
        if local.x < 0 || local.y < 0 || local.x >= CHANNEL_COLUMNS as i32 * CHANNEL_CELL.x {
            return None;
        }
        let column = (local.x / CHANNEL_CELL.x) as u8;
        let row = u8::try_from(local.y / CHANNEL_CELL.y).ok()?;
        let channel = row.checked_mul(CHANNEL_COLUMNS)?.checked_add(column)?;
        (channel < self.channel_count()).then_some(channel)
    }
}

impl UiElement for WorldSelect {
    fn element_type(&self) -> ElementType {
        ElementType::WorldSelect
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
        draw_frame(canvas, self.bounds(), "Select World");
        for (index, world) in self.worlds.iter().enumerate() {
            let color = if index == self.world {
                Color::Yellow
            } else {
                Color::White
            };
            canvas.text(
                self.position + Point::new(12, LIST_TOP + index as i32 * ROW_HEIGHT),
                &world.name,
                color,
            );
        }
        for channel in 0..self.channel_count() {
            let color = if channel == self.channel {
                Color::Yellow
            } else {
                Color::Gray
            };
            canvas.text(
                self.position + Self::channel_origin(channel),
                &format!("Ch. {}", channel + 1),
                color,
            );
        }
        self.buttons.draw(canvas, self.position);
    }

    fn send_cursor(&mut self, clicked: bool, pos: Point, ctx: &mut UiContext) -> CursorState {
        if let Some(index) = self.world_at(pos) {
            if clicked {
                self.select_world(index);
                return CursorState::Idle;
            }
            return CursorState::CanClick;
        }
        if let Some(channel) = self.channel_at(pos) {
            if clicked {
                if channel == self.channel {
                    self.enter(ctx);
                } else {
                    self.channel = channel;
                }
                return CursorState::Idle;
            }
            return CursorState::CanClick;
        }

        let (state, pressed) = self
            .buttons
            .send_cursor(self.position, clicked, pos, ctx.audio.as_mut());
        match pressed {
            Some(BT_ENTER) => self.enter(ctx),
            Some(BT_BACK) => self.back(ctx),
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
            self.back(ctx);
            return;
        }
        match mapping.key_action() {
            Some(KeyAction::Up) => self.step_world(-1),
            Some(KeyAction::Down) => self.step_world(1),
            Some(KeyAction::Left) => self.step_channel(-1),
            Some(KeyAction::Right) => self.step_channel(1),
            Some(KeyAction::Tab) => self.step_world(1),
            Some(KeyAction::Return) => self.enter(ctx),
            _ => {}
        }
    }

    fn handle_message(&mut self, message: &ElementMessage, ctx: &mut UiContext) {
        match message {
            ElementMessage::CharactersLoaded => {
                ctx.hide(ElementType::WorldSelect);
                ctx.open_window(ElementType::CharSelect);
            }
            ElementMessage::WorldsLoaded => {
                self.worlds = ctx.session().worlds.clone();
                self.world = self.world.min(self.worlds.len().saturating_sub(1));
                self.channel = self.channel.min(self.channel_count() - 1);
            }
            _ => {}
        }
    }
}

impl ElementKind for WorldSelect {
    const TYPE: ElementType = ElementType::WorldSelect;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::UiRequest;
    use crate::model::Session;
    use crate::services::recording::Probe;

    fn key(action: KeyAction) -> Mapping {
        Mapping::of(action)
    }

    #[test]
    fn channel_count_follows_the_highlighted_world() {
        let probe = Probe::new();
        let mut ctx = probe.context(Session::sample());
        let mut select = WorldSelect::new(&ctx);
        assert_eq!(select.channel_count(), 6);
        select.send_key(key(KeyAction::Left), true, false, &mut ctx);
        assert_eq!(select.channel(), 5);
        select.send_key(key(KeyAction::Down), true, false, &mut ctx);
        assert_eq!(select.world_id(), Some(1));
        assert_eq!(select.channel_count(), 3);
        assert_eq!(select.channel(), 2);
    }

    #[test]
    fn no_worlds_falls_back_to_the_default_count() {
        let probe = Probe::new();
        let mut session = Session::sample();
        session.worlds.clear();
        let mut ctx = probe.context(session);
        let mut select = WorldSelect::new(&ctx);
        assert_eq!(select.channel_count(), DEFAULT_CHANNEL_COUNT);
        select.send_key(key(KeyAction::Return), true, false, &mut ctx);
        assert!(probe.network.sent().is_empty());
    }

    #[test]
    fn enter_requests_the_character_list() {
        let probe = Probe::new();
        let mut ctx = probe.context(Session::sample());
        let mut select = WorldSelect::new(&ctx);
        select.send_key(key(KeyAction::Right), true, false, &mut ctx);
        select.send_key(key(KeyAction::Return), true, false, &mut ctx);
        assert_eq!(
            probe.network.sent(),
            vec![Request::CharlistRequest { world: 0, channel: 1 }]
        );
    }

    #[test]
    fn escape_goes_back_to_login() {
        let probe = Probe::new();
        let mut ctx = probe.context(Session::sample());
        let mut select = WorldSelect::new(&ctx);
        select.send_key(key(KeyAction::MainMenu), true, true, &mut ctx);
        assert!(matches!(
            ctx.take_requests().as_slice(),
            [
                UiRequest::Remove(ElementType::WorldSelect),
                UiRequest::Open {
                    tag: ElementType::Login,
                    ..
                }
            ]
        ));
    }
}
