use super::{KeyRouting, ModalRule, StateCore, StatePolicy, UiState, UiStateKind};
use crate::actions::{KeyAction, KeyType, Mapping};
use crate::elements::chat_bar::ChatBar;
use crate::elements::mini_map::MiniMap;
use crate::elements::status_bar::StatusBar;
use crate::elements::{ElementType, UiContext, UiElement, factory_for};
use crate::services::Request;

const MODALS: &[ModalRule] = &[
    ModalRule::always(ElementType::NpcTalk),
    ModalRule::always(ElementType::StatusBar),
    ModalRule::unless(ElementType::Channel, KeyAction::ChangeChannel),
    ModalRule::unless(ElementType::WorldMap, KeyAction::WorldMap),
    ModalRule::always(ElementType::OptionMenu),
    ModalRule::always(ElementType::Shop),
    ModalRule::always(ElementType::Joypad),
    ModalRule::always(ElementType::ChatRank),
    ModalRule::always(ElementType::Quit),
];

const ESCAPE: &[ElementType] = &[
    ElementType::Notice,
    ElementType::KeyConfig,
    ElementType::Chat,
    ElementType::Event,
    ElementType::StatsInfo,
    ElementType::ItemInventory,
    ElementType::EquipInventory,
    ElementType::SkillBook,
    ElementType::QuestLog,
    ElementType::UserList,
    ElementType::NpcTalk,
    ElementType::CharInfo,
];

const TAB: &[ElementType] = &[
    ElementType::ItemInventory,
    ElementType::EquipInventory,
    ElementType::SkillBook,
    ElementType::QuestLog,
    ElementType::UserList,
];

const ENTER: &[ElementType] = &[ElementType::Notice];

pub const POLICY: StatePolicy = StatePolicy {
    toggle_existing: true,
    cues: true,
    silent: &[
        ElementType::StatusBar,
        ElementType::ChatBar,
        ElementType::MiniMap,
        ElementType::BuffList,
        ElementType::NpcTalk,
        ElementType::Shop,
    ],
    routing: KeyRouting {
        modals: MODALS,
        escape: ESCAPE,
        tab: TAB,
        enter: ENTER,
        arrows: &[],
    },
};

/// In the world: the HUD plus every toggleable window.
pub struct GameState {
    core: StateCore,
}

impl GameState {
    pub fn new(ctx: &mut UiContext) -> Self {
        let mut state = Self {
            core: StateCore::new(POLICY),
        };
        for tag in [ElementType::StatusBar, ElementType::ChatBar, ElementType::MiniMap] {
            state.open(tag, ctx);
        }
        state
    }

    fn open(&mut self, tag: ElementType, ctx: &mut UiContext) {
        if let Some(factory) = factory_for(tag) {
            self.core.emplace(tag, factory, ctx);
        }
    }

    fn send_menu(&mut self, action: KeyAction, ctx: &mut UiContext) {
        match action {
            KeyAction::Equipment => self.open(ElementType::EquipInventory, ctx),
            KeyAction::Items => self.open(ElementType::ItemInventory, ctx),
            KeyAction::Stats => self.open(ElementType::StatsInfo, ctx),
            KeyAction::Skills => self.open(ElementType::SkillBook, ctx),
            KeyAction::WorldMap => self.open(ElementType::WorldMap, ctx),
            KeyAction::KeyBindings => self.open(ElementType::KeyConfig, ctx),
            KeyAction::ChangeChannel => self.open(ElementType::Channel, ctx),
            KeyAction::MiniMap => {
                if let Some(minimap) = self.core.registry_mut().get_typed_mut::<MiniMap>() {
                    minimap.cycle_size();
                }
            }
            KeyAction::MainMenu | KeyAction::Menu => {
                if let Some(status_bar) = self.core.registry_mut().get_typed_mut::<StatusBar>() {
                    status_bar.toggle_menu();
                }
            }
            KeyAction::ToggleChat => {
                if let Some(chat_bar) = self.core.registry_mut().get_typed_mut::<ChatBar>() {
                    chat_bar.toggle_visible();
                }
            }
            KeyAction::Say
            | KeyAction::PartyChat
            | KeyAction::FriendsChat
            | KeyAction::GuildChat
            | KeyAction::AllianceChat => {
                if let Some(chat_bar) = self.core.registry_mut().get_typed_mut::<ChatBar>() {
                    chat_bar.open_chat(ctx);
                }
            }
            KeyAction::CashShop => ctx.send(Request::EnterCashShop),
            other => tracing::debug!(action = %other, "menu action has no window"),
        }
    }
}

impl UiState for GameState {
    fn kind(&self) -> UiStateKind {
        UiStateKind::Game
    }

    fn core(&self) -> &StateCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut StateCore {
        &mut self.core
    }

    fn send_key(&mut self, mapping: Mapping, pressed: bool, escape: bool, ctx: &mut UiContext) {
        if let Some(chat_bar) = self.core.registry_mut().get_typed_mut::<ChatBar>() {
            let to_chat = if escape {
                chat_bar.is_chat_open()
            } else {
                mapping.key_action() == Some(KeyAction::Return) && chat_bar.is_active()
            };
            if to_chat {
                chat_bar.send_key(mapping, pressed, escape, ctx);
                return;
            }
        }

        match mapping.kind {
            KeyType::Menu => {
                if pressed && let Some(action) = mapping.key_action() {
                    self.send_menu(action, ctx);
                }
            }
            KeyType::Action | KeyType::Face | KeyType::Item | KeyType::Skill => {
                ctx.stage.send_key(mapping, pressed);
            }
            _ => {}
        }
    }

    fn send_close(&mut self, ctx: &mut UiContext) {
        ctx.open_window(ElementType::Quit);
    }
}
