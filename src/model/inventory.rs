use std::collections::BTreeMap;
use std::fmt;

/// Inventory tabs, in the order the inventory window shows them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InventoryType {
    Equip,
    Use,
    Setup,
    Etc,
    Cash,
}

impl InventoryType {
    pub const ALL: [InventoryType; 5] = [
        InventoryType::Equip,
        InventoryType::Use,
        InventoryType::Setup,
        InventoryType::Etc,
        InventoryType::Cash,
    ];

    /// The tab an item id belongs to (its leading digit).
    pub fn by_item_id(item_id: i32) -> Option<Self> {
        match item_id / 1_000_000 {
            1 => Some(InventoryType::Equip),
            2 => Some(InventoryType::Use),
            3 => Some(InventoryType::Setup),
            4 => Some(InventoryType::Etc),
            5 => Some(InventoryType::Cash),
            _ => None,
        }
    }

    /// The tab after this one, wrapping around.
    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for InventoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InventoryType::Equip => "Equip",
            InventoryType::Use => "Use",
            InventoryType::Setup => "Setup",
            InventoryType::Etc => "Etc",
            InventoryType::Cash => "Cash",
        };
        write!(f, "{}", s)
    }
}

/// Equipment slots on the character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EquipSlot {
    Hat,
    FaceAcc,
    EyeAcc,
    Earrings,
    Top,
    Bottom,
    Shoes,
    Gloves,
    Shield,
    Cape,
    Ring,
    Pendant,
    Belt,
    Medal,
    Weapon,
}

impl EquipSlot {
    pub const ALL: [EquipSlot; 15] = [
        EquipSlot::Hat,
        EquipSlot::FaceAcc,
        EquipSlot::EyeAcc,
        EquipSlot::Earrings,
        EquipSlot::Top,
        EquipSlot::Bottom,
        EquipSlot::Shoes,
        EquipSlot::Gloves,
        EquipSlot::Shield,
        EquipSlot::Cape,
        EquipSlot::Ring,
        EquipSlot::Pendant,
        EquipSlot::Belt,
        EquipSlot::Medal,
        EquipSlot::Weapon,
    ];

    /// The slot an equip item id is worn in, derived from its category.
    pub fn for_item(item_id: i32) -> Option<Self> {
        let slot = match item_id / 10_000 {
            100 => EquipSlot::Hat,
            101 => EquipSlot::FaceAcc,
            102 => EquipSlot::EyeAcc,
            103 => EquipSlot::Earrings,
            104 | 105 => EquipSlot::Top,
            106 => EquipSlot::Bottom,
            107 => EquipSlot::Shoes,
            108 => EquipSlot::Gloves,
            109 => EquipSlot::Shield,
            110 => EquipSlot::Cape,
            111 => EquipSlot::Ring,
            112 => EquipSlot::Pendant,
            113 => EquipSlot::Belt,
            114 => EquipSlot::Medal,
            130..=170 => EquipSlot::Weapon,
            _ => return None,
        };
        Some(slot)
    }

    /// Slot id sent to the server; equipped slots are negative.
    pub fn id(self) -> i16 {
        let index = Self::ALL.iter().position(|s| *s == self).unwrap_or(0);
        -(index as i16 + 1)
    }
}

impl fmt::Display for EquipSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub item_id: i32,
    pub name: String,
    pub description: String,
    pub count: i16,
    pub untradable: bool,
    pub cash: bool,
    pub req_level: u16,
}

impl Item {
    pub fn new(item_id: i32, name: impl Into<String>) -> Self {
        Self {
            item_id,
            name: name.into(),
            description: String::new(),
            count: 1,
            untradable: false,
            cash: false,
            req_level: 0,
        }
    }

    pub fn with_count(mut self, count: i16) -> Self {
        self.count = count;
        self
    }

    pub fn untradable(mut self) -> Self {
        self.untradable = true;
        self
    }

    pub fn cash(mut self) -> Self {
        self.cash = true;
        self
    }

    pub fn with_req_level(mut self, level: u16) -> Self {
        self.req_level = level;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// The player's inventory: one slot map per tab plus the worn equipment.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    tabs: BTreeMap<InventoryType, BTreeMap<i16, Item>>,
    equipped: BTreeMap<EquipSlot, Item>,
}

impl Inventory {
    pub const SLOTS_PER_TAB: i16 = 24;

    pub fn get(&self, tab: InventoryType, slot: i16) -> Option<&Item> {
        self.tabs.get(&tab).and_then(|items| items.get(&slot))
    }

    pub fn items(&self, tab: InventoryType) -> impl Iterator<Item = (i16, &Item)> {
        self.tabs
            .get(&tab)
            .into_iter()
            .flat_map(|items| items.iter().map(|(slot, item)| (*slot, item)))
    }

    pub fn insert(&mut self, tab: InventoryType, slot: i16, item: Item) {
        self.tabs.entry(tab).or_default().insert(slot, item);
    }

    pub fn remove(&mut self, tab: InventoryType, slot: i16) -> Option<Item> {
        self.tabs.get_mut(&tab).and_then(|items| items.remove(&slot))
    }

    pub fn equipped(&self, slot: EquipSlot) -> Option<&Item> {
        self.equipped.get(&slot)
    }

    pub fn equip(&mut self, slot: EquipSlot, item: Item) -> Option<Item> {
        self.equipped.insert(slot, item)
    }

    pub fn unequip(&mut self, slot: EquipSlot) -> Option<Item> {
        self.equipped.remove(&slot)
    }

    /// Applies an item move reported by the server.
    pub fn move_item(&mut self, tab: InventoryType, from: i16, to: i16) {
        let Some(moving) = self.remove(tab, from) else {
            return;
        };
        if let Some(displaced) = self.remove(tab, to) {
            self.insert(tab, from, displaced);
        }
        self.insert(tab, to, moving);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_cycle_wraps() {
        assert_eq!(InventoryType::Equip.next(), InventoryType::Use);
        assert_eq!(InventoryType::Cash.next(), InventoryType::Equip);
    }

    #[test]
    fn equip_slot_derived_from_item_category() {
        assert_eq!(EquipSlot::for_item(1002140), Some(EquipSlot::Hat));
        assert_eq!(EquipSlot::for_item(1302000), Some(EquipSlot::Weapon));
        assert_eq!(EquipSlot::for_item(2000000), None);
        assert_eq!(InventoryType::by_item_id(2000000), Some(InventoryType::Use));
    }

    #[test]
    fn move_item_swaps_occupied_target() {
        let mut inventory = Inventory::default();
        inventory.insert(InventoryType::Use, 1, Item::new(2000000, "Red Potion"));
        inventory.insert(InventoryType::Use, 2, Item::new(2000001, "Orange Potion"));
        inventory.move_item(InventoryType::Use, 1, 2);
        assert_eq!(inventory.get(InventoryType::Use, 2).map(|i| i.item_id), Some(2000000));
        assert_eq!(inventory.get(InventoryType::Use, 1).map(|i| i.item_id), Some(2000001));
    }
}
