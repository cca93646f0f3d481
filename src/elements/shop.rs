//! NPC shop: the NPC's goods on the left, the player's tab on the right.

use ratatui::style::Color;

use super::notice::{Notice, NoticeAction};
use super::{ElementKind, ElementMessage, ElementType, UiContext, UiElement, draw_frame};
use crate::actions::{KeyAction, Mapping};
use crate::components::{Button, ButtonSet, DraggedIcon, IconKind, Tooltip};
use crate::constants::VIEWPORT;
use crate::cursor::CursorState;
use crate::geometry::{Point, Rectangle};
use crate::model::{InventoryType, Item, ShopItem};
use crate::render::Canvas;
use crate::services::{Request, Sound};

const WIDTH: i32 = 480;
const HEIGHT: i32 = 300;
const LIST_TOP: i32 = 48;
const ROW_HEIGHT: i32 = 18;
const VISIBLE_ROWS: usize = 12;
const COLUMN_WIDTH: i32 = 208;
const BUY_LEFT: i32 = 16;
const SELL_LEFT: i32 = 256;
const MAX_BUY: i64 = 100;

const BT_BUY: u16 = 0;
const BT_SELL: u16 = 1;
const BT_EXIT: u16 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Buy,
    Sell,
}

pub struct Shop {
    position: Point,
    active: bool,
    npc_id: i32,
    goods: Vec<ShopItem>,
    meso: i64,
    sell_tab: InventoryType,
    sellable: Vec<(i16, Item)>,
    buy_selection: Option<usize>,
    sell_selection: Option<usize>,
    hovered: Option<(Column, usize)>,
    buttons: ButtonSet,
}

impl Shop {
    pub fn new(ctx: &UiContext) -> Self {
        let y = HEIGHT - 28;
        let mut buttons = ButtonSet::new();
        buttons.insert(BT_BUY, Button::new(Rectangle::from_xywh(BUY_LEFT, y, 40, 16), "Buy"));
        buttons.insert(BT_SELL, Button::new(Rectangle::from_xywh(SELL_LEFT, y, 48, 16), "Sell"));
        buttons.insert(BT_EXIT, Button::new(Rectangle::from_xywh(WIDTH - 64, y, 48, 16), "Exit"));

        let mut shop = Self {
            position: Point::new((VIEWPORT.x - WIDTH) / 2, 60),
            active: true,
            npc_id: 0,
            goods: Vec::new(),
            meso: 0,
            sell_tab: InventoryType::Equip,
            sellable: Vec::new(),
            buy_selection: None,
            sell_selection: None,
            hovered: None,
            buttons,
        };
        shop.refresh(ctx);
        shop
    }

    pub fn npc_id(&self) -> i32 {
        self.npc_id
    }

    pub fn goods(&self) -> &[ShopItem] {
        &self.goods
    }

    pub fn sell_tab(&self) -> InventoryType {
        self.sell_tab
    }

    fn refresh(&mut self, ctx: &UiContext) {
        let session = ctx.session();
        self.meso = session.stats.meso;
        self.sellable = session
            .inventory
            .items(self.sell_tab)
            .map(|(slot, item)| (slot, item.clone()))
            .collect();
        if self.sell_selection.is_some_and(|i| i >= self.sellable.len()) {
            self.sell_selection = None;
        }
    }

    fn change_tab(&mut self, tab: InventoryType, ctx: &mut UiContext) {
        if tab == self.sell_tab {
            return;
        }
        ctx.play(Sound::Tab);
        self.sell_tab = tab;
        self.sell_selection = None;
        self.refresh(ctx);
    }

    fn row_at(&self, pos: Point) -> Option<(Column, usize)> {
        let local = pos - self.position;
        if local.y < LIST_TOP {
            return None;
        }
        let row = ((local.y - LIST_TOP) / ROW_HEIGHT) as usize;
        if row >= VISIBLE_ROWS {
            return None;
        }
        if (BUY_LEFT..BUY_LEFT + COLUMN_WIDTH).contains(&local.x) && row < self.goods.len() {
            Some((Column::Buy, row))
        } else if (SELL_LEFT..SELL_LEFT + COLUMN_WIDTH).contains(&local.x) && row < self.sellable.len() {
            Some((Column::Sell, row))
        } else {
            None
        }
    }

    fn buy(&mut self, ctx: &mut UiContext) {
        let Some(good) = self.buy_selection.and_then(|i| self.goods.get(i)) else {
            return;
        };
        let buyable = if good.price > 0 {
            (self.meso / good.price).min(MAX_BUY)
        } else {
            MAX_BUY
        };
        let item_id = good.item_id;
        if buyable > 1 {
            // `buyable` is capped at MAX_BUY.
            let max = buyable as i16;
            ctx.open(ElementType::Notice, move |_| {
                Notice::enter_number(
                    "How many are you willing to buy?",
                    max,
                    1,
                    NoticeAction::BuyItem { item_id },
                )
            });
        } else if buyable == 1 {
            ctx.open(ElementType::Notice, move |_| {
                Notice::yes_no(
                    "Are you sure you want to buy it?",
                    NoticeAction::BuyItem { item_id },
                    NoticeAction::None,
                )
            });
        } else {
            tracing::debug!(item_id, meso = self.meso, "not enough meso to buy");
        }
    }

    fn sell_slot(&self, slot: i16, item: &Item, ctx: &mut UiContext) {
        let item_id = item.item_id;
        let sellable = if self.sell_tab == InventoryType::Equip { 1 } else { item.count };
        if sellable > 1 {
            ctx.open(ElementType::Notice, move |_| {
                Notice::enter_number(
                    "How many are you willing to sell?",
                    sellable,
                    1,
                    NoticeAction::SellItem { slot, item_id },
                )
            });
        } else if sellable == 1 {
            ctx.open(ElementType::Notice, move |_| {
                Notice::yes_no(
                    "Are you sure you want to sell it?",
                    NoticeAction::SellItem { slot, item_id },
                    NoticeAction::None,
                )
            });
        }
    }

    fn sell(&mut self, ctx: &mut UiContext) {
        if let Some((slot, item)) = self.sell_selection.and_then(|i| self.sellable.get(i)) {
            self.sell_slot(*slot, item, ctx);
        }
    }

    fn exit(&mut self, ctx: &mut UiContext) {
        ctx.send(Request::CloseShop);
        ctx.remove(ElementType::Shop);
    }

    /// Selecting an already selected row commits it.
    fn select(&mut self, column: Column, row: usize, ctx: &mut UiContext) {
        match column {
            Column::Buy if self.buy_selection == Some(row) => self.buy(ctx),
            Column::Buy => self.buy_selection = Some(row),
            Column::Sell if self.sell_selection == Some(row) => self.sell(ctx),
            Column::Sell => self.sell_selection = Some(row),
        }
    }

    fn show_tooltip(&self, column: Column, row: usize, ctx: &mut UiContext) {
        let content = match column {
            Column::Buy => self.goods.get(row).map(|good| {
                Tooltip::Item(Item::new(good.item_id, good.name.clone()).with_description(format!("{} meso", good.price)))
            }),
            Column::Sell => self.sellable.get(row).map(|(_, item)| Tooltip::Item(item.clone())),
        };
        if let Some(content) = content {
            ctx.show_tooltip(ElementType::Shop, content);
        }
    }
}

impl UiElement for Shop {
    fn element_type(&self) -> ElementType {
        ElementType::Shop
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
        draw_frame(canvas, self.bounds(), "Shop");
        canvas.text(self.position + Point::new(BUY_LEFT, 24), "For sale", Color::Yellow);
        canvas.text(
            self.position + Point::new(SELL_LEFT, 24),
            &format!("{} | {} meso", self.sell_tab, self.meso),
            Color::Yellow,
        );
        for (row, good) in self.goods.iter().take(VISIBLE_ROWS).enumerate() {
            let color = if self.buy_selection == Some(row) { Color::Cyan } else { Color::White };
            canvas.text(
                self.position + Point::new(BUY_LEFT, LIST_TOP + row as i32 * ROW_HEIGHT),
                &format!("{} ({})", good.name, good.price),
                color,
            );
        }
        for (row, (_, item)) in self.sellable.iter().take(VISIBLE_ROWS).enumerate() {
            let color = if self.sell_selection == Some(row) { Color::Cyan } else { Color::White };
            canvas.text(
                self.position + Point::new(SELL_LEFT, LIST_TOP + row as i32 * ROW_HEIGHT),
                &format!("{} x{}", item.name, item.count),
                color,
            );
        }
        self.buttons.draw(canvas, self.position);
    }

    fn send_cursor(&mut self, clicked: bool, pos: Point, ctx: &mut UiContext) -> CursorState {
        let hovered = self.row_at(pos);
        if hovered != self.hovered {
            match hovered {
                Some((column, row)) => self.show_tooltip(column, row, ctx),
                None => ctx.clear_tooltip(ElementType::Shop),
            }
            self.hovered = hovered;
        }
        if let Some((column, row)) = hovered {
            if clicked {
                self.select(column, row, ctx);
                return CursorState::Idle;
            }
            return CursorState::CanClick;
        }

        let (state, pressed) = self
            .buttons
            .send_cursor(self.position, clicked, pos, ctx.audio.as_mut());
        match pressed {
            Some(BT_BUY) => self.buy(ctx),
            Some(BT_SELL) => self.sell(ctx),
            Some(BT_EXIT) => self.exit(ctx),
            _ => {}
        }
        state
    }

    fn remove_cursor(&mut self, ctx: &mut UiContext) {
        self.buttons.remove_cursor();
        if self.hovered.take().is_some() {
            ctx.clear_tooltip(ElementType::Shop);
        }
    }

    fn send_key(&mut self, mapping: Mapping, pressed: bool, escape: bool, ctx: &mut UiContext) {
        if !pressed {
            return;
        }
        if escape {
            self.exit(ctx);
            return;
        }
        match mapping.key_action() {
            Some(KeyAction::Tab) => {
                let next = self.sell_tab.next();
                self.change_tab(next, ctx);
            }
            Some(KeyAction::Up) => {
                self.buy_selection = self.buy_selection.map(|i| i.saturating_sub(1)).or(Some(0));
            }
            Some(KeyAction::Down) if !self.goods.is_empty() => {
                let last = self.goods.len() - 1;
                self.buy_selection = Some(self.buy_selection.map_or(0, |i| (i + 1).min(last)));
            }
            Some(KeyAction::Return) => self.buy(ctx),
            _ => {}
        }
    }

    fn send_icon(&mut self, icon: &DraggedIcon, _pos: Point, ctx: &mut UiContext) -> bool {
        if let IconKind::Item { tab, slot, item } = &icon.kind {
            self.change_tab(*tab, ctx);
            self.sell_slot(*slot, item, ctx);
        }
        true
    }

    fn handle_message(&mut self, message: &ElementMessage, ctx: &mut UiContext) {
        match message {
            ElementMessage::ShopOpened { npc_id, items } => {
                self.npc_id = *npc_id;
                self.goods = items.clone();
                self.buy_selection = None;
                self.sell_selection = None;
                self.active = true;
                self.refresh(ctx);
            }
            ElementMessage::InventoryChanged | ElementMessage::StatsChanged => self.refresh(ctx),
            _ => {}
        }
    }
}

impl ElementKind for Shop {
    const TYPE: ElementType = ElementType::Shop;
}
