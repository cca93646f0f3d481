use std::collections::BTreeMap;

use ratatui::style::Color;

use super::item_inventory::LOW_STATS;
use super::notice::Notice;
use super::{ElementKind, ElementMessage, ElementType, UiContext, UiElement, draw_frame};
use crate::actions::Mapping;
use crate::components::{DragHelper, DraggedIcon, IconKind, Tooltip};
use crate::cursor::CursorState;
use crate::geometry::{Point, Rectangle};
use crate::model::{CharStats, EquipSlot, Inventory, InventoryType, Item};
use crate::render::Canvas;
use crate::services::{Request, Sound};

const WIDTH: i32 = 184;
const HEIGHT: i32 = 240;
const COLUMNS: usize = 3;
const CELL: Point = Point::new(56, 36);
const GRID_ORIGIN: Point = Point::new(10, 32);

/// Worn equipment, one cell per slot.
pub struct EquipInventory {
    drag: DragHelper,
    active: bool,
    equipped: BTreeMap<EquipSlot, Item>,
    /// Occupied slots of the equip tab, for picking an unequip target.
    equip_tab: Vec<i16>,
    stats: CharStats,
    hovered: Option<EquipSlot>,
}

impl EquipInventory {
    pub fn new(ctx: &UiContext) -> Self {
        let handle = Rectangle::from_xywh(0, 0, WIDTH, 20);
        let mut window = Self {
            drag: DragHelper::new(ElementType::EquipInventory, Point::new(260, 80), handle, ctx.settings.as_ref()),
            active: true,
            equipped: BTreeMap::new(),
            equip_tab: Vec::new(),
            stats: CharStats::default(),
            hovered: None,
        };
        window.refresh(ctx);
        window
    }

    pub fn equipped(&self, slot: EquipSlot) -> Option<&Item> {
        self.equipped.get(&slot)
    }

    fn refresh(&mut self, ctx: &UiContext) {
        let session = ctx.session();
        self.equipped = EquipSlot::ALL
            .iter()
            .filter_map(|slot| session.inventory.equipped(*slot).map(|item| (*slot, item.clone())))
            .collect();
        self.equip_tab = session
            .inventory
            .items(InventoryType::Equip)
            .map(|(slot, _)| slot)
            .collect();
        self.stats = session.stats.clone();
    }

    fn cell_origin(index: usize) -> Point {
        GRID_ORIGIN
            + Point::new(
                (index % COLUMNS) as i32 * CELL.x,
                (index / COLUMNS) as i32 * CELL.y,
            )
    }

    fn slot_at(&self, pos: Point) -> Option<EquipSlot> {
        let local = pos - self.position() - GRID_ORIGIN;
        if local.x < 0 || local.y < 0 || local.x >= COLUMNS as i32 * CELL.x {
            return None;
        }
        let index = (local.x / CELL.x) as usize + COLUMNS * (local.y / CELL.y) as usize;
        EquipSlot::ALL.get(index).copied()
    }

    fn free_slot(&self) -> Option<i16> {
        (1..=Inventory::SLOTS_PER_TAB).find(|slot| !self.equip_tab.contains(slot))
    }

    fn clear_hover(&mut self, ctx: &mut UiContext) {
        if self.hovered.take().is_some() {
            ctx.clear_tooltip(ElementType::EquipInventory);
        }
    }

    fn unequip(&mut self, slot: EquipSlot, ctx: &mut UiContext) {
        if !self.equipped.contains_key(&slot) {
            return;
        }
        match self.free_slot() {
            Some(free) => ctx.send(Request::UnequipItem {
                equip_slot: slot,
                slot: free,
            }),
            None => ctx.open(ElementType::Notice, |_| {
                Notice::ok("Your equipment inventory is full.")
            }),
        }
    }
}

impl UiElement for EquipInventory {
    fn element_type(&self) -> ElementType {
        ElementType::EquipInventory
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
        draw_frame(canvas, self.bounds(), "Equipment");
        for (index, slot) in EquipSlot::ALL.iter().enumerate() {
            let cell = origin + Self::cell_origin(index);
            match self.equipped.get(slot) {
                Some(item) => {
                    let label: String = item.name.chars().take(6).collect();
                    let color = if self.hovered == Some(*slot) { Color::Cyan } else { Color::White };
                    canvas.text(cell, &label, color);
                }
                None => canvas.text(cell, &slot.to_string(), Color::DarkGray),
            }
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

        let Some((slot, item)) = self
            .slot_at(pos)
            .and_then(|slot| self.equipped.get(&slot).map(|item| (slot, item.clone())))
        else {
            self.clear_hover(ctx);
            return CursorState::Idle;
        };

        if clicked {
            self.clear_hover(ctx);
            let index = EquipSlot::ALL.iter().position(|s| *s == slot).unwrap_or(0);
            let offset = pos - self.position() - Self::cell_origin(index);
            ctx.drag_icon(DraggedIcon::new(
                ElementType::EquipInventory,
                IconKind::Equip { slot, item },
                offset,
            ));
            return CursorState::Grabbing;
        }

        if self.hovered != Some(slot) {
            ctx.show_tooltip(ElementType::EquipInventory, Tooltip::Equip { slot, item });
            self.hovered = Some(slot);
        }
        CursorState::CanGrab
    }

    fn remove_cursor(&mut self, ctx: &mut UiContext) {
        self.drag.release(ctx.settings.as_mut());
        self.clear_hover(ctx);
    }

    fn send_icon(&mut self, icon: &DraggedIcon, pos: Point, ctx: &mut UiContext) -> bool {
        let Some(target) = self.slot_at(pos) else {
            return true;
        };
        match &icon.kind {
            IconKind::Equip { slot, .. } if *slot == target => ctx.play(Sound::DragEnd),
            IconKind::Item {
                tab: InventoryType::Equip,
                slot,
                item,
            } => {
                if EquipSlot::for_item(item.item_id) != Some(target) {
                    ctx.play(Sound::DragEnd);
                } else if self.stats.can_wear(item) {
                    ctx.send(Request::EquipItem {
                        slot: *slot,
                        equip_slot: target,
                    });
                    ctx.play(Sound::DragEnd);
                } else {
                    ctx.open(ElementType::Notice, |_| Notice::ok(LOW_STATS));
                }
            }
            IconKind::Item {
                tab: InventoryType::Use,
                slot,
                ..
            } if self.equipped.contains_key(&target) => {
                ctx.send(Request::ScrollEquip {
                    slot: *slot,
                    equip_slot: target,
                });
            }
            _ => {}
        }
        true
    }

    fn doubleclick(&mut self, pos: Point, ctx: &mut UiContext) {
        if let Some(slot) = self.slot_at(pos) {
            self.unequip(slot, ctx);
        }
    }

    fn send_key(&mut self, _mapping: Mapping, pressed: bool, escape: bool, ctx: &mut UiContext) {
        if pressed && escape {
            ctx.hide(ElementType::EquipInventory);
        }
    }

    fn handle_message(&mut self, message: &ElementMessage, ctx: &mut UiContext) {
        if matches!(
            message,
            ElementMessage::InventoryChanged | ElementMessage::StatsChanged
        ) {
            self.refresh(ctx);
            if self.hovered.is_some_and(|slot| !self.equipped.contains_key(&slot)) {
                self.clear_hover(ctx);
            }
        }
    }
}

impl ElementKind for EquipInventory {
    const TYPE: ElementType = ElementType::EquipInventory;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::UiRequest;
    use crate::model::Session;
    use crate::services::recording::Probe;

    fn cell_point(window: &EquipInventory, slot: EquipSlot) -> Point {
        let index = EquipSlot::ALL.iter().position(|s| *s == slot).unwrap_or(0);
        window.position() + EquipInventory::cell_origin(index) + Point::new(2, 2)
    }

    fn worn_hat() -> DraggedIcon {
        DraggedIcon::new(
            ElementType::EquipInventory,
            IconKind::Equip {
                slot: EquipSlot::Hat,
                item: Item::new(1002140, "Wizet Invincible Hat"),
            },
            Point::new(2, 2),
        )
    }

    #[test]
    fn dropping_back_on_the_same_slot_only_plays_a_sound() {
        let probe = Probe::new();
        let mut ctx = probe.context(Session::sample());
        let mut window = EquipInventory::new(&ctx);
        let hat = cell_point(&window, EquipSlot::Hat);
        assert!(window.send_icon(&worn_hat(), hat, &mut ctx));
        assert!(probe.network.sent().is_empty());
        assert_eq!(probe.audio.sounds(), vec![Sound::DragEnd]);
    }

    #[test]
    fn worn_item_dropped_on_another_slot_is_silent() {
        let probe = Probe::new();
        let mut ctx = probe.context(Session::sample());
        let mut window = EquipInventory::new(&ctx);
        let weapon = cell_point(&window, EquipSlot::Weapon);
        assert!(window.send_icon(&worn_hat(), weapon, &mut ctx));
        assert!(probe.network.sent().is_empty());
        assert!(probe.audio.sounds().is_empty());
    }

    #[test]
    fn matching_item_is_equipped() {
        let probe = Probe::new();
        let mut ctx = probe.context(Session::sample());
        let mut window = EquipInventory::new(&ctx);
        let icon = DraggedIcon::new(
            ElementType::ItemInventory,
            IconKind::Item {
                tab: InventoryType::Equip,
                slot: 1,
                item: Item::new(1040002, "White Undershirt"),
            },
            Point::ORIGIN,
        );
        window.send_icon(&icon, cell_point(&window, EquipSlot::Top), &mut ctx);
        assert_eq!(
            probe.network.sent(),
            vec![Request::EquipItem {
                slot: 1,
                equip_slot: EquipSlot::Top,
            }]
        );
    }

    #[test]
    fn unmet_requirements_open_a_notice() {
        let probe = Probe::new();
        let mut ctx = probe.context(Session::sample());
        let mut window = EquipInventory::new(&ctx);
        let icon = DraggedIcon::new(
            ElementType::ItemInventory,
            IconKind::Item {
                tab: InventoryType::Equip,
                slot: 2,
                item: Item::new(1002019, "Bronze Helm").with_req_level(60),
            },
            Point::ORIGIN,
        );
        window.send_icon(&icon, cell_point(&window, EquipSlot::Hat), &mut ctx);
        assert!(probe.network.sent().is_empty());
        assert!(matches!(
            ctx.take_requests().as_slice(),
            [UiRequest::Open {
                tag: ElementType::Notice,
                ..
            }]
        ));
    }

    #[test]
    fn doubleclick_unequips_into_first_free_slot() {
        let probe = Probe::new();
        let mut ctx = probe.context(Session::sample());
        let mut window = EquipInventory::new(&ctx);
        window.doubleclick(cell_point(&window, EquipSlot::Weapon), &mut ctx);
        assert_eq!(
            probe.network.sent(),
            vec![Request::UnequipItem {
                equip_slot: EquipSlot::Weapon,
                slot: 3,
            }]
        );
    }
}
