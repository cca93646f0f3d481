use ratatui::style::Color;

use super::{ElementKind, ElementMessage, ElementType, UiContext, UiElement, draw_frame};
use crate::actions::Mapping;
use crate::components::{DragHelper, DraggedIcon, IconKind, Tooltip};
use crate::cursor::CursorState;
use crate::geometry::{Point, Rectangle};
use crate::model::SkillEntry;
use crate::render::Canvas;

const WIDTH: i32 = 240;
const HEIGHT: i32 = 220;
const LIST_TOP: i32 = 32;
const ROW_HEIGHT: i32 = 20;
const VISIBLE_ROWS: usize = 8;

pub struct SkillBook {
    drag: DragHelper,
    active: bool,
    skills: Vec<SkillEntry>,
    offset: usize,
    hovered: Option<usize>,
}

impl SkillBook {
    pub fn new(ctx: &UiContext) -> Self {
        let handle = Rectangle::from_xywh(0, 0, WIDTH, 20);
        Self {
            drag: DragHelper::new(ElementType::SkillBook, Point::new(40, 80), handle, ctx.settings.as_ref()),
            active: true,
            skills: ctx.session().skills.values().cloned().collect(),
            offset: 0,
            hovered: None,
        }
    }

    pub fn skills(&self) -> &[SkillEntry] {
        &self.skills
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    fn row_at(&self, pos: Point) -> Option<usize> {
        let local = pos - self.position();
        if local.y < LIST_TOP || local.x < 8 || local.x >= WIDTH - 8 {
            return None;
        }
        let row = ((local.y - LIST_TOP) / ROW_HEIGHT) as usize;
        let index = self.offset + row;
        (row < VISIBLE_ROWS && index < self.skills.len()).then_some(index)
    }

    fn row_origin(&self, index: usize) -> Point {
        Point::new(8, LIST_TOP + (index - self.offset) as i32 * ROW_HEIGHT)
    }

    fn clear_hover(&mut self, ctx: &mut UiContext) {
        if self.hovered.take().is_some() {
            ctx.clear_tooltip(ElementType::SkillBook);
        }
    }

    fn max_offset(&self) -> usize {
        self.skills.len().saturating_sub(VISIBLE_ROWS)
    }
}

impl UiElement for SkillBook {
    fn element_type(&self) -> ElementType {
        ElementType::SkillBook
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
        let origin = self.position();
        draw_frame(canvas, self.bounds(), "Skills");
        for (index, skill) in self.skills.iter().enumerate().skip(self.offset).take(VISIBLE_ROWS) {
            let color = match (self.hovered == Some(index), skill.level) {
                (true, _) => Color::Cyan,
                (false, 0) => Color::DarkGray,
                (false, _) => Color::White,
            };
            canvas.text(
                origin + self.row_origin(index),
                &format!("{}  {}/{}", skill.name, skill.level, skill.master_level),
                color,
            );
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

        let Some(index) = self.row_at(pos) else {
            self.clear_hover(ctx);
            return CursorState::Idle;
        };
        let skill = self.skills[index].clone();

        if clicked {
            if skill.level == 0 {
                return CursorState::Idle;
            }
            self.clear_hover(ctx);
            let offset = pos - self.position() - self.row_origin(index);
            ctx.drag_icon(DraggedIcon::new(
                ElementType::SkillBook,
                IconKind::Skill {
                    skill_id: skill.skill_id,
                    name: skill.name,
                },
                offset,
            ));
            return CursorState::Grabbing;
        }

        if self.hovered != Some(index) {
            self.hovered = Some(index);
            ctx.show_tooltip(ElementType::SkillBook, Tooltip::Skill(skill));
        }
        if self.skills[index].level > 0 {
            CursorState::CanGrab
        } else {
            CursorState::Idle
        }
    }

    fn remove_cursor(&mut self, ctx: &mut UiContext) {
        self.drag.release(ctx.settings.as_mut());
        self.clear_hover(ctx);
    }

    /// Scrolls the list when the cursor is over the window.
    fn send_scroll(&mut self, delta: f64, ctx: &mut UiContext) {
        if !self.is_in_range(ctx.cursor()) {
            return;
        }
        if delta > 0.0 {
            self.offset = self.offset.saturating_sub(1);
        } else if delta < 0.0 {
            self.offset = (self.offset + 1).min(self.max_offset());
        }
    }

    fn send_key(&mut self, _mapping: Mapping, pressed: bool, escape: bool, ctx: &mut UiContext) {
        if pressed && escape {
            ctx.hide(ElementType::SkillBook);
        }
    }

    fn handle_message(&mut self, message: &ElementMessage, ctx: &mut UiContext) {
        if *message == ElementMessage::StatsChanged {
            self.skills = ctx.session().skills.values().cloned().collect();
            self.offset = self.offset.min(self.max_offset());
            self.clear_hover(ctx);
        }
    }
}

impl ElementKind for SkillBook {
    const TYPE: ElementType = ElementType::SkillBook;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::UiRequest;
    use crate::model::Session;
    use crate::services::recording::Probe;

    fn row_point(book: &SkillBook, index: usize) -> Point {
        book.position() + book.row_origin(index) + Point::new(4, 4)
    }

    #[test]
    fn learned_skills_can_be_dragged() {
        let probe = Probe::new();
        let mut ctx = probe.context(Session::sample());
        let mut book = SkillBook::new(&ctx);
        let learned = book.skills().iter().position(|s| s.level > 0).unwrap_or(0);
        let at = row_point(&book, learned);
        assert_eq!(book.send_cursor(true, at, &mut ctx), CursorState::Grabbing);
        assert!(matches!(
            ctx.take_requests().as_slice(),
            [UiRequest::DragIcon(DraggedIcon {
                kind: IconKind::Skill { .. },
                ..
            })]
        ));
    }

    #[test]
    fn unlearned_skills_stay_put() {
        let probe = Probe::new();
        let mut ctx = probe.context(Session::sample());
        let mut book = SkillBook::new(&ctx);
        let unlearned = book
            .skills()
            .iter()
            .position(|s| s.level == 0)
            .expect("sample has an unlearned skill");
        let at = row_point(&book, unlearned);
        assert_eq!(book.send_cursor(true, at, &mut ctx), CursorState::Idle);
        assert!(!ctx.has_requests());
    }

    #[test]
    fn hover_shows_skill_tooltip_once() {
        let probe = Probe::new();
        let mut ctx = probe.context(Session::sample());
        let mut book = SkillBook::new(&ctx);
        let at = row_point(&book, 0);
        book.send_cursor(false, at, &mut ctx);
        book.send_cursor(false, at + Point::new(2, 0), &mut ctx);
        let requests = ctx.take_requests();
        assert_eq!(requests.len(), 1);
        assert!(matches!(
            &requests[0],
            UiRequest::ShowTooltip {
                parent: ElementType::SkillBook,
                content: Tooltip::Skill(_),
            }
        ));
    }
}
