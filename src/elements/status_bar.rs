//! The bottom HUD: level, gauges and the quick menu.

use ratatui::style::Color;

use super::{ElementKind, ElementMessage, ElementType, UiContext, UiElement, draw_frame};
use crate::actions::{KeyAction, Mapping};
use crate::components::{Button, ButtonSet};
use crate::constants::VIEWPORT;
use crate::cursor::CursorState;
use crate::geometry::{Point, Rectangle};
use crate::model::CharStats;
use crate::render::Canvas;
use crate::services::Request;

const HEIGHT: i32 = 80;
const MENU_WIDTH: i32 = 128;
const ROW_HEIGHT: i32 = 16;

const BT_MENU: u16 = 0;
const BT_CASH_SHOP: u16 = 1;

/// Entries of the quick menu, top to bottom.
const MENU: &[(&str, ElementType)] = &[
    ("Character", ElementType::StatsInfo),
    ("Equipment", ElementType::EquipInventory),
    ("Items", ElementType::ItemInventory),
    ("Skills", ElementType::SkillBook),
    ("Key Settings", ElementType::KeyConfig),
    ("Channel", ElementType::Channel),
    ("Quit", ElementType::Quit),
];

/// What the bar draws, copied out of the session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Gauges {
    name: String,
    job: String,
    level: u16,
    hp: (i32, i32),
    mp: (i32, i32),
    exp: (i64, i64),
}

impl Gauges {
    fn of(stats: &CharStats) -> Self {
        Self {
            name: stats.name.clone(),
            job: stats.job.clone(),
            level: stats.level,
            hp: (stats.hp, stats.max_hp),
            mp: (stats.mp, stats.max_mp),
            exp: (stats.exp, stats.exp_needed),
        }
    }

    fn exp_percent(&self) -> f64 {
        let (exp, needed) = self.exp;
        if needed <= 0 {
            return 0.0;
        }
        exp as f64 * 100.0 / needed as f64
    }
}

pub struct StatusBar {
    position: Point,
    size: Point,
    active: bool,
    gauges: Gauges,
    buttons: ButtonSet,
    menu_open: bool,
    selection: usize,
}

impl StatusBar {
    pub fn new(ctx: &UiContext) -> Self {
        let mut buttons = ButtonSet::new();
        buttons.insert(BT_MENU, Button::new(Rectangle::from_xywh(VIEWPORT.x - 160, 48, 56, 16), "Menu"));
        buttons.insert(
            BT_CASH_SHOP,
            Button::new(Rectangle::from_xywh(VIEWPORT.x - 96, 48, 88, 16), "Cash Shop"),
        );
        Self {
            position: Point::new(0, VIEWPORT.y - HEIGHT),
            size: Point::new(VIEWPORT.x, HEIGHT),
            active: true,
            gauges: Gauges::of(&ctx.session().stats),
            buttons,
            menu_open: false,
            selection: 0,
        }
    }

    pub fn is_menu_open(&self) -> bool {
        self.menu_open
    }

    pub fn toggle_menu(&mut self) {
        self.menu_open = !self.menu_open;
        self.selection = 0;
    }

    pub fn selection(&self) -> usize {
        self.selection
    }

    fn menu_bounds(&self) -> Rectangle {
        let height = MENU.len() as i32 * ROW_HEIGHT + 8;
        Rectangle::from_xywh(
            self.position.x + self.size.x - MENU_WIDTH - 8,
            self.position.y - height,
            MENU_WIDTH,
            height,
        )
    }

    fn menu_row_at(&self, pos: Point) -> Option<usize> {
        let menu = self.menu_bounds();
        if !menu.contains(pos) {
            return None;
        }
        let row = ((pos.y - menu.top() - 4) / ROW_HEIGHT) as usize;
        (row < MENU.len()).then_some(row)
    }

    fn run_entry(&mut self, row: usize, ctx: &mut UiContext) {
        self.menu_open = false;
        if let Some((_, tag)) = MENU.get(row) {
            ctx.open_window(*tag);
        }
    }
}

impl UiElement for StatusBar {
    fn element_type(&self) -> ElementType {
        ElementType::StatusBar
    }

    fn position(&self) -> Point {
        self.position
    }

    fn size(&self) -> Point {
        self.size
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    fn is_in_range(&self, pos: Point) -> bool {
        self.bounds().contains(pos) || (self.menu_open && self.menu_bounds().contains(pos))
    }

    fn intercepts_keys(&self) -> bool {
        self.active && self.menu_open
    }

    fn draw(&self, canvas: &mut dyn Canvas, _alpha: f32) {
        draw_frame(canvas, self.bounds(), "");
        let g = &self.gauges;
        let x = self.position.x + 8;
        let y = self.position.y + 8;
        canvas.text(Point::new(x, y), &format!("Lv. {} {}", g.level, g.name), Color::Yellow);
        canvas.text(Point::new(x, y + 16), &g.job, Color::White);
        canvas.text(Point::new(x + 200, y), &format!("HP [{}/{}]", g.hp.0, g.hp.1), Color::LightRed);
        canvas.text(Point::new(x + 200, y + 16), &format!("MP [{}/{}]", g.mp.0, g.mp.1), Color::LightBlue);
        canvas.text(
            Point::new(x + 400, y),
            &format!("EXP {} [{:.2}%]", g.exp.0, g.exp_percent()),
            Color::LightGreen,
        );
        self.buttons.draw(canvas, self.position);

        if self.menu_open {
            let menu = self.menu_bounds();
            draw_frame(canvas, menu, "Menu");
            for (row, (label, _)) in MENU.iter().enumerate() {
                let color = if row == self.selection { Color::Yellow } else { Color::White };
                let origin = Point::new(menu.left() + 8, menu.top() + 4 + row as i32 * ROW_HEIGHT);
                canvas.text(origin, label, color);
            }
        }
    }

    fn send_cursor(&mut self, clicked: bool, pos: Point, ctx: &mut UiContext) -> CursorState {
        if self.menu_open
            && let Some(row) = self.menu_row_at(pos)
        {
            self.selection = row;
            if clicked {
                self.run_entry(row, ctx);
                return CursorState::Idle;
            }
            return CursorState::CanClick;
        }

        let (state, pressed) = self
            .buttons
            .send_cursor(self.position, clicked, pos, ctx.audio.as_mut());
        match pressed {
            Some(BT_MENU) => self.toggle_menu(),
            Some(BT_CASH_SHOP) => ctx.send(Request::EnterCashShop),
            _ => {}
        }
        state
    }

    fn remove_cursor(&mut self, _ctx: &mut UiContext) {
        self.buttons.remove_cursor();
    }

    fn send_key(&mut self, mapping: Mapping, pressed: bool, escape: bool, ctx: &mut UiContext) {
        if !self.menu_open || !pressed {
            return;
        }
        if escape {
            self.menu_open = false;
            return;
        }
        match mapping.key_action() {
            Some(KeyAction::Up) => {
                self.selection = self.selection.checked_sub(1).unwrap_or(MENU.len() - 1);
            }
            Some(KeyAction::Down) => self.selection = (self.selection + 1) % MENU.len(),
            Some(KeyAction::Return) => self.run_entry(self.selection, ctx),
            _ => {}
        }
    }

    fn handle_message(&mut self, message: &ElementMessage, ctx: &mut UiContext) {
        if *message == ElementMessage::StatsChanged {
            self.gauges = Gauges::of(&ctx.session().stats);
        }
    }
}

impl ElementKind for StatusBar {
    const TYPE: ElementType = ElementType::StatusBar;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::UiRequest;
    use crate::model::Session;
    use crate::services::recording::Probe;

    #[test]
    fn menu_wraps_and_opens_selected_window() {
        let probe = Probe::new();
        let mut ctx = probe.context(Session::sample());
        let mut bar = StatusBar::new(&ctx);
        assert!(!bar.intercepts_keys());

        bar.toggle_menu();
        assert!(bar.intercepts_keys());
        bar.send_key(Mapping::of(KeyAction::Up), true, false, &mut ctx);
        assert_eq!(bar.selection(), MENU.len() - 1);
        bar.send_key(Mapping::of(KeyAction::Return), true, false, &mut ctx);
        assert!(!bar.is_menu_open());

        let requests = ctx.take_requests();
        assert!(matches!(
            requests.as_slice(),
            [UiRequest::Open {
                tag: ElementType::Quit,
                ..
            }]
        ));
    }

    #[test]
    fn escape_only_closes_the_menu() {
        let probe = Probe::new();
        let mut ctx = probe.context(Session::sample());
        let mut bar = StatusBar::new(&ctx);
        bar.toggle_menu();
        bar.send_key(Mapping::of(KeyAction::MainMenu), true, true, &mut ctx);
        assert!(!bar.is_menu_open());
        assert!(!ctx.has_requests());
    }

    #[test]
    fn stats_snapshot_refreshes_on_message() {
        let probe = Probe::new();
        let mut ctx = probe.context(Session::sample());
        let mut bar = StatusBar::new(&ctx);
        ctx.session_mut().stats.level = 31;
        bar.handle_message(&ElementMessage::StatsChanged, &mut ctx);
        assert_eq!(bar.gauges.level, 31);
    }
}
