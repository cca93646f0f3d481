use std::fmt;

/// Category of a key binding. The numeric ids match what the server stores
/// for each keymap entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum KeyType {
    #[default]
    None,
    Skill,
    Item,
    Cash,
    Menu,
    Action,
    Face,
    Macro,
    Text,
}

impl KeyType {
    pub const fn id(self) -> u8 {
        match self {
            KeyType::None => 0,
            KeyType::Skill => 1,
            KeyType::Item => 2,
            KeyType::Cash => 3,
            KeyType::Menu => 4,
            KeyType::Action => 5,
            KeyType::Face => 6,
            KeyType::Macro => 7,
            KeyType::Text => 8,
        }
    }

    pub fn from_id(id: u8) -> Option<Self> {
        Some(match id {
            0 => KeyType::None,
            1 => KeyType::Skill,
            2 => KeyType::Item,
            3 => KeyType::Cash,
            4 => KeyType::Menu,
            5 => KeyType::Action,
            6 => KeyType::Face,
            7 => KeyType::Macro,
            8 => KeyType::Text,
            _ => return None,
        })
    }

    /// Bindings whose payload is a `KeyAction` id rather than an item or
    /// skill id.
    pub const fn carries_action(self) -> bool {
        matches!(self, KeyType::Menu | KeyType::Action | KeyType::Face)
    }
}

/// Every semantic action a key can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(i32)]
pub enum KeyAction {
    Equipment = 1,
    Items = 2,
    Stats = 3,
    Skills = 4,
    Friends = 5,
    WorldMap = 6,
    MapleChat = 7,
    MiniMap = 8,
    QuestLog = 9,
    KeyBindings = 10,
    ToggleChat = 11,
    Whisper = 12,
    Say = 13,
    PartyChat = 14,
    Menu = 15,
    QuickSlots = 16,
    Guild = 18,
    FriendsChat = 19,
    Party = 20,
    Notifier = 21,
    CashShop = 24,
    GuildChat = 25,
    Medals = 28,
    Bits = 29,
    AllianceChat = 30,
    MapleNews = 31,
    ManageLegion = 32,
    Profession = 33,
    BossParty = 34,
    ItemPot = 35,
    Event = 36,
    SilentCrusade = 37,
    BattleAnalysis = 38,
    Guide = 39,
    ViewersChat = 40,
    EnhanceEquip = 41,
    MonsterCollection = 42,
    SoulWeapon = 43,
    CharInfo = 44,
    ChangeChannel = 45,
    MainMenu = 46,
    Screenshot = 47,
    PictureMode = 48,
    MapleAchievement = 49,
    Pickup = 51,
    Sit = 52,
    Attack = 53,
    Jump = 54,
    InteractHarvest = 55,
    MapleStorage = 56,
    SafeMode = 57,
    Mute = 58,
    MonsterBook = 59,
    ToSpouse = 60,
    Face1 = 100,
    Face2 = 101,
    Face3 = 102,
    Face4 = 103,
    Face5 = 104,
    Face6 = 105,
    Face7 = 106,
    Left = 107,
    Right = 108,
    Up = 109,
    Down = 110,
    Back = 111,
    Tab = 112,
    Return = 113,
    Escape = 114,
    Space = 115,
    Delete = 116,
    Home = 117,
    End = 118,
    Copy = 119,
    Paste = 120,
}

impl KeyAction {
    pub const ALL: [KeyAction; 75] = [
        KeyAction::Equipment,
        KeyAction::Items,
        KeyAction::Stats,
        KeyAction::Skills,
        KeyAction::Friends,
        KeyAction::WorldMap,
        KeyAction::MapleChat,
        KeyAction::MiniMap,
        KeyAction::QuestLog,
        KeyAction::KeyBindings,
        KeyAction::ToggleChat,
        KeyAction::Whisper,
        KeyAction::Say,
        KeyAction::PartyChat,
        KeyAction::Menu,
        KeyAction::QuickSlots,
        KeyAction::Guild,
        KeyAction::FriendsChat,
        KeyAction::Party,
        KeyAction::Notifier,
        KeyAction::CashShop,
        KeyAction::GuildChat,
        KeyAction::Medals,
        KeyAction::Bits,
        KeyAction::AllianceChat,
        KeyAction::MapleNews,
        KeyAction::ManageLegion,
        KeyAction::Profession,
        KeyAction::BossParty,
        KeyAction::ItemPot,
        KeyAction::Event,
        KeyAction::SilentCrusade,
        KeyAction::BattleAnalysis,
        KeyAction::Guide,
        KeyAction::ViewersChat,
        KeyAction::EnhanceEquip,
        KeyAction::MonsterCollection,
        KeyAction::SoulWeapon,
        KeyAction::CharInfo,
        KeyAction::ChangeChannel,
        KeyAction::MainMenu,
        KeyAction::Screenshot,
        KeyAction::PictureMode,
        KeyAction::MapleAchievement,
        KeyAction::Pickup,
        KeyAction::Sit,
        KeyAction::Attack,
        KeyAction::Jump,
        KeyAction::InteractHarvest,
        KeyAction::MapleStorage,
        KeyAction::SafeMode,
        KeyAction::Mute,
        KeyAction::MonsterBook,
        KeyAction::ToSpouse,
        KeyAction::Face1,
        KeyAction::Face2,
        KeyAction::Face3,
        KeyAction::Face4,
        KeyAction::Face5,
        KeyAction::Face6,
        KeyAction::Face7,
        KeyAction::Left,
        KeyAction::Right,
        KeyAction::Up,
        KeyAction::Down,
        KeyAction::Back,
        KeyAction::Tab,
        KeyAction::Return,
        KeyAction::Escape,
        KeyAction::Space,
        KeyAction::Delete,
        KeyAction::Home,
        KeyAction::End,
        KeyAction::Copy,
        KeyAction::Paste,
    ];

    pub const fn id(self) -> i32 {
        self as i32
    }

    pub fn from_id(id: i32) -> Option<Self> {
        Self::ALL.iter().copied().find(|action| action.id() == id)
    }

    /// The category a binding of this action is stored under.
    pub const fn key_type(self) -> KeyType {
        match self {
            KeyAction::Pickup
            | KeyAction::Sit
            | KeyAction::Attack
            | KeyAction::Jump
            | KeyAction::Left
            | KeyAction::Right
            | KeyAction::Up
            | KeyAction::Down
            | KeyAction::Back
            | KeyAction::Tab
            | KeyAction::Return
            | KeyAction::Escape
            | KeyAction::Space
            | KeyAction::Delete
            | KeyAction::Home
            | KeyAction::End
            | KeyAction::Copy
            | KeyAction::Paste => KeyType::Action,
            KeyAction::Face1
            | KeyAction::Face2
            | KeyAction::Face3
            | KeyAction::Face4
            | KeyAction::Face5
            | KeyAction::Face6
            | KeyAction::Face7 => KeyType::Face,
            _ => KeyType::Menu,
        }
    }

    /// Keys that are fixed by the client and never stored in the keymap.
    pub const fn is_static(self) -> bool {
        self.id() >= KeyAction::Left.id()
    }

    /// Actions the key configuration window lets the player bind.
    pub fn bindable() -> impl Iterator<Item = KeyAction> {
        Self::ALL.iter().copied().filter(|action| !action.is_static())
    }
}

impl fmt::Display for KeyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            KeyAction::Equipment => "Equipment",
            KeyAction::Items => "Item inventory",
            KeyAction::Stats => "Character stats",
            KeyAction::Skills => "Skill book",
            KeyAction::Friends => "Friends",
            KeyAction::WorldMap => "World map",
            KeyAction::MapleChat => "Maple chat",
            KeyAction::MiniMap => "Mini map",
            KeyAction::QuestLog => "Quest log",
            KeyAction::KeyBindings => "Key bindings",
            KeyAction::ToggleChat => "Toggle chat",
            KeyAction::Whisper => "Whisper",
            KeyAction::Say => "Say",
            KeyAction::PartyChat => "Party chat",
            KeyAction::Menu => "Menu",
            KeyAction::QuickSlots => "Quick slots",
            KeyAction::Guild => "Guild",
            KeyAction::FriendsChat => "Friends chat",
            KeyAction::Party => "Party",
            KeyAction::Notifier => "Notifier",
            KeyAction::CashShop => "Cash shop",
            KeyAction::GuildChat => "Guild chat",
            KeyAction::Medals => "Medals",
            KeyAction::Bits => "Bits",
            KeyAction::AllianceChat => "Alliance chat",
            KeyAction::MapleNews => "Maple news",
            KeyAction::ManageLegion => "Manage legion",
            KeyAction::Profession => "Profession",
            KeyAction::BossParty => "Boss party",
            KeyAction::ItemPot => "Item pot",
            KeyAction::Event => "Event",
            KeyAction::SilentCrusade => "Silent crusade",
            KeyAction::BattleAnalysis => "Battle analysis",
            KeyAction::Guide => "Guide",
            KeyAction::ViewersChat => "Viewers chat",
            KeyAction::EnhanceEquip => "Enhance equip",
            KeyAction::MonsterCollection => "Monster collection",
            KeyAction::SoulWeapon => "Soul weapon",
            KeyAction::CharInfo => "Character info",
            KeyAction::ChangeChannel => "Change channel",
            KeyAction::MainMenu => "Main menu",
            KeyAction::Screenshot => "Screenshot",
            KeyAction::PictureMode => "Picture mode",
            KeyAction::MapleAchievement => "Achievements",
            KeyAction::Pickup => "Pick up",
            KeyAction::Sit => "Sit",
            KeyAction::Attack => "Attack",
            KeyAction::Jump => "Jump",
            KeyAction::InteractHarvest => "Interact / harvest",
            KeyAction::MapleStorage => "Storage",
            KeyAction::SafeMode => "Safe mode",
            KeyAction::Mute => "Mute",
            KeyAction::MonsterBook => "Monster book",
            KeyAction::ToSpouse => "To spouse",
            KeyAction::Face1 => "Face 1",
            KeyAction::Face2 => "Face 2",
            KeyAction::Face3 => "Face 3",
            KeyAction::Face4 => "Face 4",
            KeyAction::Face5 => "Face 5",
            KeyAction::Face6 => "Face 6",
            KeyAction::Face7 => "Face 7",
            KeyAction::Left => "Left",
            KeyAction::Right => "Right",
            KeyAction::Up => "Up",
            KeyAction::Down => "Down",
            KeyAction::Back => "Backspace",
            KeyAction::Tab => "Tab",
            KeyAction::Return => "Enter",
            KeyAction::Escape => "Escape",
            KeyAction::Space => "Space",
            KeyAction::Delete => "Delete",
            KeyAction::Home => "Home",
            KeyAction::End => "End",
            KeyAction::Copy => "Copy",
            KeyAction::Paste => "Paste",
        };
        write!(f, "{}", s)
    }
}

/// A semantic key binding: the category plus its payload (a `KeyAction` id,
/// an item id or a skill id depending on `kind`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Mapping {
    pub kind: KeyType,
    pub action: i32,
}

impl Mapping {
    pub const NONE: Mapping = Mapping {
        kind: KeyType::None,
        action: 0,
    };

    pub const fn new(kind: KeyType, action: i32) -> Self {
        Self { kind, action }
    }

    pub const fn of(action: KeyAction) -> Self {
        Self {
            kind: action.key_type(),
            action: action.id(),
        }
    }

    pub const fn text(c: char) -> Self {
        Self {
            kind: KeyType::Text,
            action: c as i32,
        }
    }

    pub fn is_none(&self) -> bool {
        self.kind == KeyType::None
    }

    /// The payload as a `KeyAction`, when this binding carries one.
    pub fn key_action(&self) -> Option<KeyAction> {
        if self.kind.carries_action() {
            KeyAction::from_id(self.action)
        } else {
            None
        }
    }

    /// The payload as a literal character for text mappings.
    pub fn char(&self) -> Option<char> {
        if self.kind != KeyType::Text {
            return None;
        }
        u32::try_from(self.action).ok().and_then(char::from_u32)
    }
}

impl fmt::Display for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind, self.key_action()) {
            (KeyType::None, _) => write!(f, "(unbound)"),
            (_, Some(action)) => write!(f, "{}", action),
            (KeyType::Item, None) => write!(f, "item {}", self.action),
            (KeyType::Skill, None) => write!(f, "skill {}", self.action),
            (kind, None) => write!(f, "{:?} {}", kind, self.action),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_ids_round_trip_through_lookup() {
        for action in KeyAction::ALL {
            assert_eq!(KeyAction::from_id(action.id()), Some(action));
        }
        assert_eq!(KeyAction::from_id(17), None);
        assert_eq!(KeyAction::from_id(0), None);
    }

    #[test]
    fn key_type_ids_are_stable() {
        assert_eq!(KeyType::from_id(4), Some(KeyType::Menu));
        assert_eq!(KeyType::Skill.id(), 1);
        assert_eq!(KeyType::from_id(42), None);
    }

    #[test]
    fn text_mapping_distinguishes_chars_from_control_actions() {
        assert_eq!(Mapping::text('q').char(), Some('q'));
        assert_eq!(Mapping::text('q').key_action(), None);
        assert_eq!(Mapping::of(KeyAction::Return).char(), None);
        assert_eq!(Mapping::of(KeyAction::Return).kind, KeyType::Action);
    }

    #[test]
    fn item_mappings_do_not_decode_as_actions() {
        let mapping = Mapping::new(KeyType::Item, 2000000);
        assert_eq!(mapping.key_action(), None);
        assert_eq!(mapping.to_string(), "item 2000000");
    }

    #[test]
    fn bindable_actions_exclude_text_controls() {
        assert!(KeyAction::bindable().all(|a| !a.is_static()));
        assert!(KeyAction::bindable().any(|a| a == KeyAction::Jump));
        assert!(!KeyAction::bindable().any(|a| a == KeyAction::Left));
    }
}
