//! Collaborators the UI core drives but does not own: audio, the network
//! layer, the gameplay stage and the host platform.
//!
//! Each is a narrow trait so a host can plug in its real backend and tests
//! can plug in the recorders from [`recording`].

pub mod recording;

use std::fmt;

use crate::actions::Mapping;
use crate::clipboard::Clipboard;
use crate::cursor::CursorState;
use crate::geometry::Point;
use crate::model::{EquipSlot, InventoryType};
use crate::settings::Settings;

/// UI sound cues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sound {
    ButtonClick,
    ButtonOver,
    CharSelect,
    DragStart,
    DragEnd,
    GameStart,
    MenuUp,
    MenuDown,
    Tab,
    WorldMapOpen,
    WorldMapClose,
}

impl fmt::Display for Sound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Sound::ButtonClick => "BtMouseClick",
            Sound::ButtonOver => "BtMouseOver",
            Sound::CharSelect => "CharSelect",
            Sound::DragStart => "DragStart",
            Sound::DragEnd => "DragEnd",
            Sound::GameStart => "GameIn",
            Sound::MenuUp => "MenuUp",
            Sound::MenuDown => "MenuDown",
            Sound::Tab => "Tab",
            Sound::WorldMapOpen => "WorldmapOpen",
            Sound::WorldMapClose => "WorldmapClose",
        };
        write!(f, "{}", s)
    }
}

/// One changed keymap entry: the server key index and its new binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeymapChange {
    pub index: u8,
    pub mapping: Mapping,
}

/// Fire-and-forget requests the UI sends to the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Login {
        account: String,
        password: String,
    },
    CharlistRequest {
        world: u8,
        channel: u8,
    },
    SelectCharacter {
        char_id: i32,
    },
    ChangeChannel {
        channel: u8,
    },
    EnterCashShop,
    LeaveCashShop,
    ChangeKeymap(Vec<KeymapChange>),
    EquipItem {
        slot: i16,
        equip_slot: EquipSlot,
    },
    UnequipItem {
        equip_slot: EquipSlot,
        slot: i16,
    },
    MoveItem {
        tab: InventoryType,
        from: i16,
        to: i16,
        quantity: i16,
    },
    ScrollEquip {
        slot: i16,
        equip_slot: EquipSlot,
    },
    UseItem {
        slot: i16,
        item_id: i32,
    },
    GeneralChat {
        message: String,
    },
    NpcTalkMore {
        npc_id: i32,
        response: i8,
    },
    BuyItem {
        item_id: i32,
        quantity: i16,
    },
    SellItem {
        slot: i16,
        item_id: i32,
        quantity: i16,
    },
    CloseShop,
}

pub trait Audio {
    fn play(&mut self, sound: Sound);
}

pub trait Network {
    fn send(&mut self, request: Request);
}

/// The gameplay layer: receives cursor and key events nothing in the UI
/// claimed.
pub trait Stage {
    fn send_cursor(&mut self, clicked: bool, pos: Point) -> CursorState;
    fn send_key(&mut self, mapping: Mapping, pressed: bool);
    fn doubleclick(&mut self, _pos: Point) {}
}

pub trait Platform {
    fn toggle_fullscreen(&mut self);
}

/// All collaborators handed to the facade at construction.
pub struct Services {
    pub audio: Box<dyn Audio>,
    pub network: Box<dyn Network>,
    pub settings: Box<dyn Settings>,
    pub stage: Box<dyn Stage>,
    pub platform: Box<dyn Platform>,
    pub clipboard: Box<dyn Clipboard>,
}

/// Audio sink that only logs the cue.
#[derive(Debug, Default)]
pub struct LoggingAudio;

impl Audio for LoggingAudio {
    fn play(&mut self, sound: Sound) {
        tracing::trace!(%sound, "play sound");
    }
}

/// Stage without a world: clicks and keys are logged and dropped.
#[derive(Debug, Default)]
pub struct EmptyStage;

impl Stage for EmptyStage {
    fn send_cursor(&mut self, clicked: bool, pos: Point) -> CursorState {
        if clicked {
            tracing::trace!(?pos, "stage click");
        }
        CursorState::Idle
    }

    fn send_key(&mut self, mapping: Mapping, pressed: bool) {
        if pressed {
            tracing::debug!(%mapping, "stage key");
        }
    }
}

/// Platform that cannot change its window mode.
#[derive(Debug, Default)]
pub struct HeadlessPlatform;

impl Platform for HeadlessPlatform {
    fn toggle_fullscreen(&mut self) {
        tracing::debug!("fullscreen toggle ignored on headless platform");
    }
}
