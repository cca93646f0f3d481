use ratatui::style::Color;

use super::{ElementKind, ElementMessage, ElementType, UiContext, UiElement, draw_frame};
use crate::actions::Mapping;
use crate::components::DragHelper;
use crate::cursor::CursorState;
use crate::geometry::{Point, Rectangle};
use crate::model::CharStats;
use crate::render::Canvas;

const WIDTH: i32 = 212;
const HEIGHT: i32 = 180;

pub struct StatsInfo {
    drag: DragHelper,
    active: bool,
    stats: CharStats,
}

impl StatsInfo {
    pub fn new(ctx: &UiContext) -> Self {
        let handle = Rectangle::from_xywh(0, 0, WIDTH, 20);
        Self {
            drag: DragHelper::new(ElementType::StatsInfo, Point::new(60, 60), handle, ctx.settings.as_ref()),
            active: true,
            stats: ctx.session().stats.clone(),
        }
    }

    fn rows(&self) -> Vec<(&'static str, String)> {
        let s = &self.stats;
        vec![
            ("Name", s.name.clone()),
            ("Job", s.job.clone()),
            ("Level", s.level.to_string()),
            ("HP", format!("{} / {}", s.hp, s.max_hp)),
            ("MP", format!("{} / {}", s.mp, s.max_mp)),
            ("EXP", format!("{} / {}", s.exp, s.exp_needed)),
            ("Meso", s.meso.to_string()),
        ]
    }
}

impl UiElement for StatsInfo {
    fn element_type(&self) -> ElementType {
        ElementType::StatsInfo
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
        draw_frame(canvas, self.bounds(), "Character Stats");
        for (row, (label, value)) in self.rows().iter().enumerate() {
            let y = 28 + row as i32 * 18;
            canvas.text(origin + Point::new(12, y), label, Color::Gray);
            canvas.text(origin + Point::new(72, y), value, Color::White);
        }
    }

    fn send_cursor(&mut self, clicked: bool, pos: Point, ctx: &mut UiContext) -> CursorState {
        if self.drag.send_cursor(clicked, pos, ctx.settings.as_mut()) && clicked {
            return CursorState::Clicking;
        }
        CursorState::Idle
    }

    fn remove_cursor(&mut self, ctx: &mut UiContext) {
        self.drag.release(ctx.settings.as_mut());
    }

    fn send_key(&mut self, _mapping: Mapping, pressed: bool, escape: bool, ctx: &mut UiContext) {
        if pressed && escape {
            ctx.hide(ElementType::StatsInfo);
        }
    }

    fn handle_message(&mut self, message: &ElementMessage, ctx: &mut UiContext) {
        if *message == ElementMessage::StatsChanged {
            self.stats = ctx.session().stats.clone();
        }
    }
}

impl ElementKind for StatsInfo {
    const TYPE: ElementType = ElementType::StatsInfo;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Session;
    use crate::render::RecordingCanvas;
    use crate::services::recording::Probe;

    #[test]
    fn handle_drag_saves_position_once() {
        let probe = Probe::new();
        let mut ctx = probe.context(Session::sample());
        let mut stats = StatsInfo::new(&ctx);
        let start = stats.position() + Point::new(10, 5);
        assert_eq!(stats.send_cursor(true, start, &mut ctx), CursorState::Clicking);
        for dx in [10, 30, 50] {
            stats.send_cursor(true, start + Point::new(dx, 0), &mut ctx);
        }
        assert!(probe.settings.saves().is_empty());
        stats.send_cursor(false, start + Point::new(50, 0), &mut ctx);
        assert_eq!(stats.position(), Point::new(110, 60));
        assert_eq!(
            probe.settings.saves(),
            vec![(ElementType::StatsInfo, Point::new(110, 60))]
        );
    }

    #[test]
    fn draws_the_stat_rows() {
        let probe = Probe::new();
        let ctx = probe.context(Session::sample());
        let stats = StatsInfo::new(&ctx);
        let mut canvas = RecordingCanvas::new(crate::constants::VIEWPORT);
        stats.draw(&mut canvas, 1.0);
        assert!(canvas.texts().iter().any(|t| t == "Swordman"));
        assert_eq!(canvas.frame_titles(), vec!["Character Stats".to_string()]);
    }
}
