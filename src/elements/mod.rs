//! Windows and the contract they implement to plug into the UI core.
//!
//! Every window is one `UiElement`. The active state owns them in a
//! [`Registry`], keyed by [`ElementType`], and routes input to them; a
//! window talks back through the [`UiContext`] it is handed on every call.

pub mod cash_shop;
pub mod channel;
pub mod chat_bar;
pub mod context;
pub mod equip_inventory;
pub mod item_inventory;
pub mod key_config;
pub mod login;
pub mod mini_map;
pub mod notice;
pub mod npc_talk;
pub mod quit;
pub mod registry;
pub mod shop;
pub mod skill_book;
pub mod stats_info;
pub mod status_bar;
pub mod world_map;

use std::any::Any;
use std::fmt;

pub use context::{ElementFactory, FieldId, FocusTarget, UiContext, UiRequest, boxed};
pub use registry::{InsertOutcome, Registry};

use crate::actions::Mapping;
use crate::components::icon::DraggedIcon;
use crate::components::textfield::{FieldEvent, Textfield};
use crate::cursor::CursorState;
use crate::geometry::{Point, Rectangle};
use crate::keybindings::KeymapPreset;
use crate::model::{InventoryType, ShopItem};
use crate::render::Canvas;

/// One tag per window kind. At most one instance per tag is alive in a
/// state's registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementType {
    Login,
    WorldSelect,
    CharSelect,
    LoginWait,
    RaceSelect,
    ClassCreation,
    SoftKeyboard,
    LoginNotice,
    StatusBar,
    ChatBar,
    BuffList,
    Notice,
    NpcTalk,
    Shop,
    StatsInfo,
    ItemInventory,
    EquipInventory,
    SkillBook,
    QuestLog,
    WorldMap,
    UserList,
    MiniMap,
    Channel,
    Chat,
    ChatRank,
    Joypad,
    Event,
    KeyConfig,
    OptionMenu,
    Quit,
    CharInfo,
    CashShop,
}

impl ElementType {
    /// Stable name used as the settings key.
    pub fn name(self) -> &'static str {
        match self {
            ElementType::Login => "Login",
            ElementType::WorldSelect => "WorldSelect",
            ElementType::CharSelect => "CharSelect",
            ElementType::LoginWait => "LoginWait",
            ElementType::RaceSelect => "RaceSelect",
            ElementType::ClassCreation => "ClassCreation",
            ElementType::SoftKeyboard => "SoftKeyboard",
            ElementType::LoginNotice => "LoginNotice",
            ElementType::StatusBar => "StatusBar",
            ElementType::ChatBar => "ChatBar",
            ElementType::BuffList => "BuffList",
            ElementType::Notice => "Notice",
            ElementType::NpcTalk => "NpcTalk",
            ElementType::Shop => "Shop",
            ElementType::StatsInfo => "StatsInfo",
            ElementType::ItemInventory => "ItemInventory",
            ElementType::EquipInventory => "EquipInventory",
            ElementType::SkillBook => "SkillBook",
            ElementType::QuestLog => "QuestLog",
            ElementType::WorldMap => "WorldMap",
            ElementType::UserList => "UserList",
            ElementType::MiniMap => "MiniMap",
            ElementType::Channel => "Channel",
            ElementType::Chat => "Chat",
            ElementType::ChatRank => "ChatRank",
            ElementType::Joypad => "Joypad",
            ElementType::Event => "Event",
            ElementType::KeyConfig => "KeyConfig",
            ElementType::OptionMenu => "OptionMenu",
            ElementType::Quit => "Quit",
            ElementType::CharInfo => "CharInfo",
            ElementType::CashShop => "CashShop",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Commands the key configuration window accepts from its dialogs and from
/// icons dropped outside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyConfigCommand {
    SaveAndClose,
    DiscardAndClose,
    LoadPreset(KeymapPreset),
    ClearAll,
    Unstage(Mapping),
}

/// Inbound events delivered to a window through the facade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementMessage {
    /// Session inventory data changed.
    InventoryChanged,
    /// Session stats changed.
    StatsChanged,
    SwitchTab(InventoryType),
    ShopOpened { npc_id: i32, items: Vec<ShopItem> },
    NpcTalk { npc_id: i32, text: String, choice: bool },
    ChatLine(String),
    /// The server accepted the login; worlds are in the session.
    WorldsLoaded,
    /// The server sent the character list for the selected world.
    CharactersLoaded,
    KeyConfig(KeyConfigCommand),
}

/// The capability contract every window implements.
///
/// Implementations must not hold on to anything they find in the context
/// beyond the call: a request they queue may remove them, or another
/// window, before the next event arrives.
pub trait UiElement {
    fn element_type(&self) -> ElementType;
    fn position(&self) -> Point;
    fn size(&self) -> Point;
    fn is_active(&self) -> bool;
    fn set_active(&mut self, active: bool);
    fn draw(&self, canvas: &mut dyn Canvas, alpha: f32);
    fn send_cursor(&mut self, clicked: bool, pos: Point, ctx: &mut UiContext) -> CursorState;

    fn bounds(&self) -> Rectangle {
        Rectangle::new(self.position(), self.size())
    }

    fn is_in_range(&self, pos: Point) -> bool {
        self.bounds().contains(pos)
    }

    fn toggle_active(&mut self) {
        let active = !self.is_active();
        self.set_active(active);
    }

    /// A toggle-capable window is shown/hidden by re-opening it instead of
    /// being rebuilt.
    fn is_toggleable(&self) -> bool {
        false
    }

    /// Opening a window that claims focus routes all cursor and key input
    /// to it until it closes.
    fn claims_focus(&self) -> bool {
        false
    }

    /// Whether the window currently swallows keys as a modal.
    fn intercepts_keys(&self) -> bool {
        self.is_active()
    }

    fn is_dragging(&self) -> bool {
        false
    }

    fn update(&mut self, _ctx: &mut UiContext) {}

    /// Clears hover/press highlights and finishes an interrupted drag.
    fn remove_cursor(&mut self, _ctx: &mut UiContext) {}

    fn send_key(&mut self, _mapping: Mapping, _pressed: bool, _escape: bool, _ctx: &mut UiContext) {}

    fn send_scroll(&mut self, _delta: f64, _ctx: &mut UiContext) {}

    fn send_close(&mut self, _ctx: &mut UiContext) {}

    /// Offers a dragged icon dropped at `pos`. Returning false keeps the
    /// icon in flight.
    fn send_icon(&mut self, _icon: &DraggedIcon, _pos: Point, _ctx: &mut UiContext) -> bool {
        true
    }

    fn doubleclick(&mut self, _pos: Point, _ctx: &mut UiContext) {}

    fn rightclick(&mut self, _pos: Point, _ctx: &mut UiContext) {}

    fn handle_message(&mut self, _message: &ElementMessage, _ctx: &mut UiContext) {}

    /// Field that takes keyboard focus as soon as the window opens.
    fn initial_focus(&self) -> Option<FieldId> {
        None
    }

    fn textfield(&self, _field: FieldId) -> Option<&Textfield> {
        None
    }

    fn textfield_mut(&mut self, _field: FieldId) -> Option<&mut Textfield> {
        None
    }

    /// Something one of this window's text fields wants handled.
    fn field_event(&mut self, _field: FieldId, _event: FieldEvent, _ctx: &mut UiContext) {}
}

/// Object-safe handle stored by the registry, with downcasting for typed
/// lookups.
pub trait Element: UiElement + Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: UiElement + Any> Element for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Windows with a fixed registry tag.
pub trait ElementKind: Element {
    const TYPE: ElementType;
}

/// Constructor for the windows a tag can be opened as without extra
/// arguments. Notices are always built by their caller.
pub fn factory_for(tag: ElementType) -> Option<ElementFactory> {
    let factory = match tag {
        ElementType::Login => boxed(|ctx| login::Login::new(ctx)),
        ElementType::WorldSelect => boxed(|ctx| login::WorldSelect::new(ctx)),
        ElementType::CharSelect => boxed(|ctx| login::CharSelect::new(ctx)),
        ElementType::StatusBar => boxed(|ctx| status_bar::StatusBar::new(ctx)),
        ElementType::ChatBar => boxed(|ctx| chat_bar::ChatBar::new(ctx)),
        ElementType::MiniMap => boxed(|ctx| mini_map::MiniMap::new(ctx)),
        ElementType::NpcTalk => boxed(|ctx| npc_talk::NpcTalk::new(ctx)),
        ElementType::Shop => boxed(|ctx| shop::Shop::new(ctx)),
        ElementType::StatsInfo => boxed(|ctx| stats_info::StatsInfo::new(ctx)),
        ElementType::ItemInventory => boxed(|ctx| item_inventory::ItemInventory::new(ctx)),
        ElementType::EquipInventory => boxed(|ctx| equip_inventory::EquipInventory::new(ctx)),
        ElementType::SkillBook => boxed(|ctx| skill_book::SkillBook::new(ctx)),
        ElementType::WorldMap => boxed(|ctx| world_map::WorldMap::new(ctx)),
        ElementType::Channel => boxed(|ctx| channel::Channel::new(ctx)),
        ElementType::KeyConfig => boxed(|ctx| key_config::KeyConfig::new(ctx)),
        ElementType::Quit => boxed(|ctx| quit::Quit::new(ctx)),
        ElementType::CashShop => boxed(|ctx| cash_shop::CashShop::new(ctx)),
        _ => return None,
    };
    Some(factory)
}

impl ElementMessage {
    /// The window an inbound message opens when it is not already showing.
    pub fn opens(&self) -> Option<ElementType> {
        match self {
            ElementMessage::ShopOpened { .. } => Some(ElementType::Shop),
            ElementMessage::NpcTalk { .. } => Some(ElementType::NpcTalk),
            _ => None,
        }
    }
}

/// Shared draw helper: every window is a titled frame.
pub(crate) fn draw_frame(canvas: &mut dyn Canvas, bounds: Rectangle, title: &str) {
    canvas.fill(bounds, ratatui::style::Color::Black);
    canvas.frame(bounds, title, ratatui::style::Color::White);
}
