use ratatui::style::Color;

use crate::actions::{KeyType, Mapping};
use crate::elements::notice::{Notice, NoticeAction};
use crate::elements::{ElementMessage, ElementType, KeyConfigCommand, UiContext};
use crate::geometry::Point;
use crate::model::{EquipSlot, InventoryType, Item};
use crate::render::Canvas;
use crate::services::{Request, Sound};

/// What is being dragged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconKind {
    /// A worn item, dragged out of the equipment window.
    Equip { slot: EquipSlot, item: Item },
    Item {
        tab: InventoryType,
        slot: i16,
        item: Item,
    },
    Skill { skill_id: i32, name: String },
    /// A key binding, dragged out of the key configuration window.
    Mapping { mapping: Mapping, label: String },
}

/// The icon currently following the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraggedIcon {
    pub source: ElementType,
    pub kind: IconKind,
    /// Cursor position minus icon origin at press time.
    pub offset: Point,
}

impl DraggedIcon {
    pub fn new(source: ElementType, kind: IconKind, offset: Point) -> Self {
        Self {
            source,
            kind,
            offset,
        }
    }

    /// The binding this icon produces when dropped on a key slot. Only
    /// consumables, setup items and skills are bindable.
    pub fn mapping(&self) -> Option<Mapping> {
        match &self.kind {
            IconKind::Item { tab, item, .. }
                if matches!(tab, InventoryType::Use | InventoryType::Setup) =>
            {
                Some(Mapping::new(KeyType::Item, item.item_id))
            }
            IconKind::Skill { skill_id, .. } => Some(Mapping::new(KeyType::Skill, *skill_id)),
            IconKind::Mapping { mapping, .. } => Some(*mapping),
            _ => None,
        }
    }

    pub fn label(&self) -> &str {
        match &self.kind {
            IconKind::Equip { item, .. } | IconKind::Item { item, .. } => &item.name,
            IconKind::Skill { name, .. } => name,
            IconKind::Mapping { label, .. } => label,
        }
    }

    pub fn draw(&self, canvas: &mut dyn Canvas, cursor: Point) {
        canvas.text(cursor - self.offset, &format!("<{}>", self.label()), Color::LightYellow);
    }

    /// Dropped where no window accepts it. Returns true once the drag is
    /// over.
    pub fn drop_on_stage(&self, ctx: &mut UiContext) -> bool {
        match &self.kind {
            IconKind::Item { tab, slot, item } => {
                drop_item(*tab, *slot, item, ctx);
            }
            IconKind::Equip { .. } => ctx.play(Sound::DragEnd),
            IconKind::Skill { .. } => {}
            IconKind::Mapping { mapping, .. } => {
                if matches!(mapping.kind, KeyType::Item | KeyType::Skill) {
                    ctx.notify(
                        ElementType::KeyConfig,
                        ElementMessage::KeyConfig(KeyConfigCommand::Unstage(*mapping)),
                    );
                }
            }
        }
        true
    }
}

fn drop_item(tab: InventoryType, slot: i16, item: &Item, ctx: &mut UiContext) {
    if item.cash {
        ctx.open(ElementType::Notice, |_| Notice::ok("You can't drop this item."));
        return;
    }

    if item.untradable {
        let count = item.count;
        let on_yes = if count > 1 {
            NoticeAction::PromptDrop {
                tab,
                slot,
                max: count,
            }
        } else {
            NoticeAction::DropItem { tab, slot }
        };
        ctx.open(ElementType::Notice, move |_| {
            Notice::yes_no(
                "This item can't be taken back once thrown away.\nWill you still drop it?",
                on_yes,
                NoticeAction::None,
            )
        });
        return;
    }

    if item.count > 1 {
        let max = item.count;
        ctx.open(ElementType::Notice, move |_| {
            Notice::enter_number(
                "How many will you drop?",
                max,
                1,
                NoticeAction::DropItem { tab, slot },
            )
        });
        return;
    }

    ctx.send(Request::MoveItem {
        tab,
        from: slot,
        to: 0,
        quantity: 1,
    });
}
