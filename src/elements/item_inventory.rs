//! The item inventory: five tabs of 24 slots each.

use std::collections::BTreeMap;

use ratatui::style::Color;

use super::notice::Notice;
use super::{ElementKind, ElementMessage, ElementType, UiContext, UiElement, draw_frame};
use crate::actions::{KeyAction, Mapping};
use crate::components::{DragHelper, DraggedIcon, IconKind, Tooltip};
use crate::cursor::CursorState;
use crate::geometry::{Point, Rectangle};
use crate::model::{CharStats, EquipSlot, Inventory, InventoryType, Item};
use crate::render::Canvas;
use crate::services::{Request, Sound};

const WIDTH: i32 = 216;
const HEIGHT: i32 = 300;
const COLUMNS: i16 = 4;
const CELL: Point = Point::new(48, 36);
const GRID_ORIGIN: Point = Point::new(10, 51);
const TAB_TOP: i32 = 28;
const TAB_WIDTH: i32 = 40;

pub(crate) const LOW_STATS: &str =
    "Your stats are too low to equip this item\nor you do not meet the job requirement.";

pub struct ItemInventory {
    drag: DragHelper,
    active: bool,
    tab: InventoryType,
    items: BTreeMap<i16, Item>,
    meso: i64,
    stats: CharStats,
    hovered: Option<i16>,
}

impl ItemInventory {
    pub fn new(ctx: &UiContext) -> Self {
        let handle = Rectangle::from_xywh(0, 0, WIDTH, 20);
        let mut inventory = Self {
            drag: DragHelper::new(ElementType::ItemInventory, Point::new(480, 80), handle, ctx.settings.as_ref()),
            active: true,
            tab: InventoryType::Equip,
            items: BTreeMap::new(),
            meso: 0,
            stats: CharStats::default(),
            hovered: None,
        };
        inventory.refresh(ctx);
        inventory
    }

    pub fn tab(&self) -> InventoryType {
        self.tab
    }

    pub fn item(&self, slot: i16) -> Option<&Item> {
        self.items.get(&slot)
    }

    fn refresh(&mut self, ctx: &UiContext) {
        let session = ctx.session();
        self.items = session
            .inventory
            .items(self.tab)
            .map(|(slot, item)| (slot, item.clone()))
            .collect();
        self.meso = session.stats.meso;
        self.stats = session.stats.clone();
    }

    fn change_tab(&mut self, tab: InventoryType, ctx: &mut UiContext) {
        if tab == self.tab {
            return;
        }
        ctx.play(Sound::Tab);
        self.tab = tab;
        self.clear_hover(ctx);
        self.refresh(ctx);
    }

    fn clear_hover(&mut self, ctx: &mut UiContext) {
        if self.hovered.take().is_some() {
            ctx.clear_tooltip(ElementType::ItemInventory);
        }
    }

    /// Window-relative origin of a slot.
    fn slot_origin(slot: i16) -> Point {
        let index = slot - 1;
        GRID_ORIGIN
            + Point::new(
                (index % COLUMNS) as i32 * CELL.x,
                (index / COLUMNS) as i32 * CELL.y,
            )
    }

    fn slot_at(&self, pos: Point) -> Option<i16> {
        let local = pos - self.position() - GRID_ORIGIN;
        if local.x < 0 || local.y < 0 || local.x >= COLUMNS as i32 * CELL.x {
            return None;
        }
        let slot = 1 + (local.x / CELL.x) as i16 + COLUMNS * (local.y / CELL.y) as i16;
        (slot <= Inventory::SLOTS_PER_TAB).then_some(slot)
    }

    fn tab_at(&self, pos: Point) -> Option<InventoryType> {
        let local = pos - self.position();
        if !(TAB_TOP..TAB_TOP + 16).contains(&local.y) || local.x < 8 {
            return None;
        }
        InventoryType::ALL.get(((local.x - 8) / TAB_WIDTH) as usize).copied()
    }

    fn first_free_slot(&self) -> Option<i16> {
        (1..=Inventory::SLOTS_PER_TAB).find(|slot| !self.items.contains_key(slot))
    }

    fn tooltip_for(&self, item: &Item) -> Tooltip {
        match EquipSlot::for_item(item.item_id) {
            Some(slot) if self.tab == InventoryType::Equip => Tooltip::Equip {
                slot,
                item: item.clone(),
            },
            _ => Tooltip::Item(item.clone()),
        }
    }
}

impl UiElement for ItemInventory {
    fn element_type(&self) -> ElementType {
        ElementType::ItemInventory
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
        draw_frame(canvas, self.bounds(), "Item Inventory");
        for (i, tab) in InventoryType::ALL.iter().enumerate() {
            let color = if *tab == self.tab { Color::Yellow } else { Color::Gray };
            canvas.text(
                origin + Point::new(8 + i as i32 * TAB_WIDTH, TAB_TOP),
                &tab.to_string(),
                color,
            );
        }
        for (slot, item) in &self.items {
            let label: String = item.name.chars().take(5).collect();
            let color = if self.hovered == Some(*slot) { Color::Cyan } else { Color::White };
            canvas.text(origin + Self::slot_origin(*slot), &label, color);
            if item.count > 1 {
                canvas.text(
                    origin + Self::slot_origin(*slot) + Point::new(0, 16),
                    &item.count.to_string(),
                    Color::LightYellow,
                );
            }
        }
        canvas.text(
            origin + Point::new(10, HEIGHT - 24),
            &format!("{} meso", self.meso),
            Color::White,
        );
    }

    fn send_cursor(&mut self, clicked: bool, pos: Point, ctx: &mut UiContext) -> CursorState {
        if self.drag.send_cursor(clicked, pos, ctx.settings.as_mut()) {
            return if clicked {
                CursorState::Clicking
            } else {
                CursorState::Idle
            };
        }

        if clicked && let Some(tab) = self.tab_at(pos) {
            self.change_tab(tab, ctx);
            return CursorState::Idle;
        }

        let Some((slot, item)) = self
            .slot_at(pos)
            .and_then(|slot| self.items.get(&slot).map(|item| (slot, item.clone())))
        else {
            self.clear_hover(ctx);
            return CursorState::Idle;
        };

        if clicked {
            self.clear_hover(ctx);
            let offset = pos - self.position() - Self::slot_origin(slot);
            ctx.drag_icon(DraggedIcon::new(
                ElementType::ItemInventory,
                IconKind::Item {
                    tab: self.tab,
                    slot,
                    item,
                },
                offset,
            ));
            return CursorState::Grabbing;
        }

        if self.hovered != Some(slot) {
            ctx.show_tooltip(ElementType::ItemInventory, self.tooltip_for(&item));
            self.hovered = Some(slot);
        }
        CursorState::CanGrab
    }

    fn remove_cursor(&mut self, ctx: &mut UiContext) {
        self.drag.release(ctx.settings.as_mut());
        self.clear_hover(ctx);
    }

    fn send_icon(&mut self, icon: &DraggedIcon, pos: Point, ctx: &mut UiContext) -> bool {
        match &icon.kind {
            IconKind::Item { tab, slot, .. } if *tab == self.tab => {
                if let Some(to) = self.slot_at(pos)
                    && to != *slot
                {
                    ctx.send(Request::MoveItem {
                        tab: *tab,
                        from: *slot,
                        to,
                        quantity: 1,
                    });
                }
                ctx.play(Sound::DragEnd);
                true
            }
            IconKind::Equip { slot: equip_slot, .. } => {
                if self.tab != InventoryType::Equip {
                    self.change_tab(InventoryType::Equip, ctx);
                    return false;
                }
                let target = self
                    .slot_at(pos)
                    .filter(|slot| !self.items.contains_key(slot))
                    .or_else(|| self.first_free_slot());
                if let Some(slot) = target {
                    ctx.send(Request::UnequipItem {
                        equip_slot: *equip_slot,
                        slot,
                    });
                }
                ctx.play(Sound::DragEnd);
                true
            }
            _ => true,
        }
    }

    fn doubleclick(&mut self, pos: Point, ctx: &mut UiContext) {
        let Some((slot, item)) = self
            .slot_at(pos)
            .and_then(|slot| self.items.get(&slot).map(|item| (slot, item)))
        else {
            return;
        };
        match self.tab {
            InventoryType::Equip => {
                let Some(equip_slot) = EquipSlot::for_item(item.item_id) else {
                    return;
                };
                if self.stats.can_wear(item) {
                    ctx.send(Request::EquipItem { slot, equip_slot });
                } else {
                    ctx.open(ElementType::Notice, |_| Notice::ok(LOW_STATS));
                }
            }
            InventoryType::Use => ctx.send(Request::UseItem {
                slot,
                item_id: item.item_id,
            }),
            _ => {}
        }
    }

    fn send_key(&mut self, mapping: Mapping, pressed: bool, escape: bool, ctx: &mut UiContext) {
        if !pressed {
            return;
        }
        if escape {
            ctx.hide(ElementType::ItemInventory);
        } else if mapping.key_action() == Some(KeyAction::Tab) {
            let next = self.tab.next();
            self.change_tab(next, ctx);
        }
    }

    fn handle_message(&mut self, message: &ElementMessage, ctx: &mut UiContext) {
        match message {
            ElementMessage::InventoryChanged | ElementMessage::StatsChanged => {
                self.refresh(ctx);
                if self.hovered.is_some_and(|slot| !self.items.contains_key(&slot)) {
                    self.clear_hover(ctx);
                }
            }
            ElementMessage::SwitchTab(tab) => self.change_tab(*tab, ctx),
            _ => {}
        }
    }
}

impl ElementKind for ItemInventory {
    const TYPE: ElementType = ElementType::ItemInventory;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::UiRequest;
    use crate::model::Session;
    use crate::services::recording::Probe;

    fn slot_point(inventory: &ItemInventory, slot: i16) -> Point {
        inventory.position() + ItemInventory::slot_origin(slot) + Point::new(4, 4)
    }

    #[test]
    fn tab_key_cycles_tabs_with_cue() {
        let probe = Probe::new();
        let mut ctx = probe.context(Session::sample());
        let mut inventory = ItemInventory::new(&ctx);
        inventory.send_key(Mapping::of(KeyAction::Tab), true, false, &mut ctx);
        assert_eq!(inventory.tab(), InventoryType::Use);
        assert_eq!(inventory.item(1).map(|i| i.item_id), Some(2000000));
        assert_eq!(probe.audio.sounds(), vec![Sound::Tab]);
    }

    #[test]
    fn pressing_an_item_starts_an_icon_drag() {
        let probe = Probe::new();
        let mut ctx = probe.context(Session::sample());
        let mut inventory = ItemInventory::new(&ctx);
        let at = slot_point(&inventory, 1);
        assert_eq!(inventory.send_cursor(true, at, &mut ctx), CursorState::Grabbing);
        let requests = ctx.take_requests();
        assert!(matches!(
            requests.as_slice(),
            [UiRequest::DragIcon(DraggedIcon {
                source: ElementType::ItemInventory,
                kind: IconKind::Item { slot: 1, .. },
                offset: Point { x: 4, y: 4 },
            })]
        ));
    }

    #[test]
    fn dropping_on_another_slot_moves_one() {
        let probe = Probe::new();
        let mut ctx = probe.context(Session::sample());
        let mut inventory = ItemInventory::new(&ctx);
        let icon = DraggedIcon::new(
            ElementType::ItemInventory,
            IconKind::Item {
                tab: InventoryType::Equip,
                slot: 1,
                item: Item::new(1040002, "White Undershirt"),
            },
            Point::ORIGIN,
        );
        let target = slot_point(&inventory, 7);
        assert!(inventory.send_icon(&icon, target, &mut ctx));
        assert_eq!(
            probe.network.sent(),
            vec![Request::MoveItem {
                tab: InventoryType::Equip,
                from: 1,
                to: 7,
                quantity: 1,
            }]
        );
    }

    #[test]
    fn worn_item_dropped_on_other_tab_switches_first() {
        let probe = Probe::new();
        let mut ctx = probe.context(Session::sample());
        let mut inventory = ItemInventory::new(&ctx);
        inventory.handle_message(&ElementMessage::SwitchTab(InventoryType::Etc), &mut ctx);
        let icon = DraggedIcon::new(
            ElementType::EquipInventory,
            IconKind::Equip {
                slot: EquipSlot::Hat,
                item: Item::new(1002140, "Wizet Invincible Hat"),
            },
            Point::ORIGIN,
        );
        let target = slot_point(&inventory, 5);
        assert!(!inventory.send_icon(&icon, target, &mut ctx));
        assert_eq!(inventory.tab(), InventoryType::Equip);
        assert!(inventory.send_icon(&icon, target, &mut ctx));
        assert_eq!(
            probe.network.sent(),
            vec![Request::UnequipItem {
                equip_slot: EquipSlot::Hat,
                slot: 5,
            }]
        );
    }

    #[test]
    fn doubleclick_checks_requirements_before_equipping() {
        let probe = Probe::new();
        let mut ctx = probe.context(Session::sample());
        let mut inventory = ItemInventory::new(&ctx);
        inventory.doubleclick(slot_point(&inventory, 2), &mut ctx);
        assert!(probe.network.sent().is_empty());
        assert!(matches!(
            ctx.take_requests().as_slice(),
            [UiRequest::Open {
                tag: ElementType::Notice,
                ..
            }]
        ));

        inventory.doubleclick(slot_point(&inventory, 1), &mut ctx);
        assert_eq!(
            probe.network.sent(),
            vec![Request::EquipItem {
                slot: 1,
                equip_slot: EquipSlot::Top,
            }]
        );
    }
}
