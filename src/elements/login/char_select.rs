use ratatui::style::Color;

use crate::actions::{KeyAction, Mapping};
use crate::components::{Button, ButtonSet};
use crate::constants::VIEWPORT;
use crate::cursor::CursorState;
use crate::elements::{ElementKind, ElementMessage, ElementType, UiContext, UiElement, draw_frame};
use crate::geometry::{Point, Rectangle};
use crate::model::CharEntry;
use crate::render::Canvas;
use crate::services::{Request, Sound};

const WIDTH: i32 = 320;
const HEIGHT: i32 = 220;
const LIST_TOP: i32 = 32;
const ROW_HEIGHT: i32 = 24;

const BT_START: u16 = 0;
const BT_BACK: u16 = 1;

pub struct CharSelect {
    position: Point,
    active: bool,
    characters: Vec<CharEntry>,
    selected: usize,
    buttons: ButtonSet,
}

impl CharSelect {
    pub fn new(ctx: &UiContext) -> Self {
        let mut buttons = ButtonSet::new();
        buttons.insert(BT_START, Button::new(Rectangle::from_xywh(WIDTH - 128, HEIGHT - 28, 56, 16), "Start"));
        buttons.insert(BT_BACK, Button::new(Rectangle::from_xywh(WIDTH - 64, HEIGHT - 28, 48, 16), "Back"));
        Self {
            position: Point::new((VIEWPORT.x - WIDTH) / 2, (VIEWPORT.y - HEIGHT) / 2),
            active: true,
            characters: ctx.session().characters.clone(),
            selected: 0,
            buttons,
        }
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Moves the selection, stopping at either end of the list.
    fn step(&mut self, delta: isize, ctx: &mut UiContext) {
        let last = self.characters.len().saturating_sub(1);
        let next = self.selected.saturating_add_signed(delta).min(last);
        if next != self.selected {
            self.selected = next;
            ctx.play(Sound::CharSelect);
        }
    }

    fn start(&mut self, ctx: &mut UiContext) {
        let Some(character) = self.characters.get(self.selected) else {
            return;
        };
        tracing::info!(character = %character.name, "entering the game");
        ctx.play(Sound::GameStart);
        ctx.send(Request::SelectCharacter {
            char_id: character.id,
        });
    }

    fn back(&mut self, ctx: &mut UiContext) {
        ctx.remove(ElementType::CharSelect);
        ctx.show(ElementType::WorldSelect);
    }

    fn row_at(&self, pos: Point) -> Option<usize> {
        let local = pos - self.position;
        if local.x < 12 || local.x >= WIDTH - 12 || local.y < LIST_TOP {
            return None;
        }
        let index = ((local.y - LIST_TOP) / ROW_HEIGHT) as usize;
        (index < self.characters.len()).then_some(index)
    }
}

impl UiElement for CharSelect {
    fn element_type(&self) -> ElementType {
        ElementType::CharSelect
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
        draw_frame(canvas, self.bounds(), "Select Character");
        if self.characters.is_empty() {
            canvas.text(self.position + Point::new(12, LIST_TOP), "No characters yet.", Color::Gray);
        }
        for (index, character) in self.characters.iter().enumerate() {
            let color = if index == self.selected {
                Color::Yellow
            } else {
                Color::White
            };
            canvas.text(
                self.position + Point::new(12, LIST_TOP + index as i32 * ROW_HEIGHT),
                &format!("{}  Lv. {}  {}", character.name, character.level, character.job),
                color,
            );
        }
        self.buttons.draw(canvas, self.position);
    }

    fn send_cursor(&mut self, clicked: bool, pos: Point, ctx: &mut UiContext) -> CursorState {
        if let Some(index) = self.row_at(pos) {
            if !clicked {
                return CursorState::CanClick;
            }
            if index == self.selected {
                self.start(ctx);
            } else {
                self.selected = index;
                ctx.play(Sound::CharSelect);
            }
            return CursorState::Idle;
        }

        let (state, pressed) = self
            .buttons
            .send_cursor(self.position, clicked, pos, ctx.audio.as_mut());
        match pressed {
            Some(BT_START) => self.start(ctx),
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
            Some(KeyAction::Up | KeyAction::Left) => self.step(-1, ctx),
            Some(KeyAction::Down | KeyAction::Right | KeyAction::Tab) => self.step(1, ctx),
            Some(KeyAction::Return) => self.start(ctx),
            _ => {}
        }
    }

    fn handle_message(&mut self, message: &ElementMessage, ctx: &mut UiContext) {
        if *message == ElementMessage::CharactersLoaded {
            self.characters = ctx.session().characters.clone();
            self.selected = self.selected.min(self.characters.len().saturating_sub(1));
        }
    }
}

impl ElementKind for CharSelect {
    const TYPE: ElementType = ElementType::CharSelect;
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
    fn selection_is_clamped_at_both_ends() {
        let probe = Probe::new();
        let mut ctx = probe.context(Session::sample());
        let mut select = CharSelect::new(&ctx);
        select.send_key(key(KeyAction::Up), true, false, &mut ctx);
        assert_eq!(select.selected(), 0);
        for _ in 0..5 {
            select.send_key(key(KeyAction::Down), true, false, &mut ctx);
        }
        assert_eq!(select.selected(), 1);
        assert_eq!(probe.audio.sounds(), vec![Sound::CharSelect]);
    }

    #[test]
    fn enter_selects_the_character() {
        let probe = Probe::new();
        let mut ctx = probe.context(Session::sample());
        let mut select = CharSelect::new(&ctx);
        select.send_key(key(KeyAction::Down), true, false, &mut ctx);
        select.send_key(key(KeyAction::Return), true, false, &mut ctx);
        assert_eq!(probe.network.sent(), vec![Request::SelectCharacter { char_id: 2 }]);
    }

    #[test]
    fn escape_returns_to_world_select() {
        let probe = Probe::new();
        let mut ctx = probe.context(Session::sample());
        let mut select = CharSelect::new(&ctx);
        select.send_key(key(KeyAction::MainMenu), true, true, &mut ctx);
        assert!(matches!(
            ctx.take_requests().as_slice(),
            [
                UiRequest::Remove(ElementType::CharSelect),
                UiRequest::Show(ElementType::WorldSelect)
            ]
        ));
    }
}
