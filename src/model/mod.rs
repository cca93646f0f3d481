//! Read-only game data the windows display.
//!
//! The UI never mutates these directly; inbound server events update the
//! session through the facade and then notify the affected windows.

pub mod inventory;

use std::collections::BTreeMap;

pub use inventory::{EquipSlot, Inventory, InventoryType, Item};

#[derive(Debug, Clone, Default)]
pub struct CharStats {
    pub name: String,
    pub job: String,
    pub level: u16,
    pub hp: i32,
    pub max_hp: i32,
    pub mp: i32,
    pub max_mp: i32,
    pub exp: i64,
    pub exp_needed: i64,
    pub meso: i64,
    pub world_id: u8,
    pub channel_id: u8,
}

impl CharStats {
    pub fn can_wear(&self, item: &Item) -> bool {
        self.level >= item.req_level
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillEntry {
    pub skill_id: i32,
    pub name: String,
    pub level: u8,
    pub master_level: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct World {
    pub id: u8,
    pub name: String,
    pub channel_count: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharEntry {
    pub id: i32,
    pub name: String,
    pub level: u16,
    pub job: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopItem {
    pub item_id: i32,
    pub name: String,
    pub price: i64,
}

/// Everything the UI knows about the logged-in account and character.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub stats: CharStats,
    pub inventory: Inventory,
    pub skills: BTreeMap<i32, SkillEntry>,
    pub worlds: Vec<World>,
    pub characters: Vec<CharEntry>,
    pub map_name: String,
    pub map_id: i32,
}

impl Session {
    /// A fully populated session for offline play in the demo client.
    pub fn sample() -> Self {
        let mut inventory = Inventory::default();
        inventory.equip(
            EquipSlot::Hat,
            Item::new(1002140, "Wizet Invincible Hat").with_req_level(10),
        );
        inventory.equip(EquipSlot::Weapon, Item::new(1302000, "Sword"));
        inventory.insert(
            InventoryType::Equip,
            1,
            Item::new(1040002, "White Undershirt"),
        );
        inventory.insert(
            InventoryType::Equip,
            2,
            Item::new(1002019, "Bronze Helm").with_req_level(60),
        );
        inventory.insert(
            InventoryType::Use,
            1,
            Item::new(2000000, "Red Potion")
                .with_count(50)
                .with_description("Restores 50 HP."),
        );
        inventory.insert(
            InventoryType::Use,
            2,
            Item::new(2040002, "Scroll for Helmet for DEF").untradable(),
        );
        inventory.insert(InventoryType::Etc, 1, Item::new(4000000, "Snail Shell"));
        inventory.insert(
            InventoryType::Cash,
            1,
            Item::new(5000000, "Pet Food").cash(),
        );

        let skills = [
            (1001004, "Power Strike", 5, 20),
            (1001005, "Slash Blast", 1, 20),
            (1000002, "Endure", 0, 8),
        ]
        .into_iter()
        .map(|(skill_id, name, level, master_level)| {
            (
                skill_id,
                SkillEntry {
                    skill_id,
                    name: name.to_string(),
                    level,
                    master_level,
                },
            )
        })
        .collect();

        Self {
            stats: CharStats {
                name: "Journey".to_string(),
                job: "Swordman".to_string(),
                level: 30,
                hp: 740,
                max_hp: 900,
                mp: 120,
                max_mp: 200,
                exp: 5_200,
                exp_needed: 12_000,
                meso: 172_300,
                world_id: 0,
                channel_id: 0,
            },
            inventory,
            skills,
            worlds: vec![
                World {
                    id: 0,
                    name: "Scania".to_string(),
                    channel_count: 6,
                },
                World {
                    id: 1,
                    name: "Bera".to_string(),
                    channel_count: 3,
                },
            ],
            characters: vec![
                CharEntry {
                    id: 1,
                    name: "Journey".to_string(),
                    level: 30,
                    job: "Swordman".to_string(),
                },
                CharEntry {
                    id: 2,
                    name: "Wanderer".to_string(),
                    level: 8,
                    job: "Beginner".to_string(),
                },
            ],
            map_name: "Henesys".to_string(),
            map_id: 100000000,
        }
    }
}
