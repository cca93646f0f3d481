use super::{KeyRouting, PointerInput, StateCore, StatePolicy, UiState, UiStateKind};
use crate::actions::Mapping;
use crate::cursor::CursorState;
use crate::elements::notice::{Notice, NoticeAction};
use crate::elements::{ElementType, UiContext, factory_for};

const SCREENS: &[ElementType] = &[
    ElementType::WorldSelect,
    ElementType::CharSelect,
    ElementType::Login,
    ElementType::Notice,
];

pub const POLICY: StatePolicy = StatePolicy {
    toggle_existing: false,
    cues: false,
    silent: &[],
    routing: KeyRouting {
        modals: &[],
        escape: SCREENS,
        tab: SCREENS,
        enter: SCREENS,
        arrows: SCREENS,
    },
};

/// The login flow: credentials, world and channel, character.
pub struct LoginState {
    core: StateCore,
}

impl LoginState {
    pub fn new(ctx: &mut UiContext) -> Self {
        let mut core = StateCore::new(POLICY);
        if let Some(factory) = factory_for(ElementType::Login) {
            core.emplace(ElementType::Login, factory, ctx);
        }
        Self { core }
    }
}

impl UiState for LoginState {
    fn kind(&self) -> UiStateKind {
        UiStateKind::Login
    }

    fn core(&self) -> &StateCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut StateCore {
        &mut self.core
    }

    /// The focused window, else the frontmost screen, gets the cursor
    /// wherever it is.
    fn send_cursor(&mut self, input: PointerInput, ctx: &mut UiContext) -> CursorState {
        let registry = self.core.registry();
        let target = self
            .core
            .focused()
            .filter(|tag| registry.is_active(*tag))
            .or_else(|| registry.front());
        let Some(tag) = target else {
            return CursorState::Idle;
        };
        match self.core.registry_mut().get_mut(tag) {
            Some(element) => element.send_cursor(input.clicked, input.pos, ctx),
            None => CursorState::Idle,
        }
    }

    fn send_key(&mut self, _mapping: Mapping, _pressed: bool, _escape: bool, _ctx: &mut UiContext) {}

    fn send_close(&mut self, ctx: &mut UiContext) {
        if self.core.registry().is_active(ElementType::Login) {
            ctx.quit();
            return;
        }
        ctx.open(ElementType::Notice, |_| {
            Notice::yes_no(
                "Are you sure you want to quit?",
                NoticeAction::Quit,
                NoticeAction::None,
            )
        });
    }
}
