use super::{KeyRouting, ModalRule, StateCore, StatePolicy, UiState, UiStateKind};
use crate::actions::{KeyType, Mapping};
use crate::elements::{ElementType, UiContext, factory_for};

pub const POLICY: StatePolicy = StatePolicy {
    toggle_existing: true,
    cues: true,
    silent: &[ElementType::CashShop],
    routing: KeyRouting {
        modals: &[ModalRule::always(ElementType::Quit)],
        escape: &[ElementType::Notice, ElementType::CashShop],
        tab: &[],
        enter: &[ElementType::Notice],
        arrows: &[],
    },
};

pub struct CashShopState {
    core: StateCore,
}

impl CashShopState {
    pub fn new(ctx: &mut UiContext) -> Self {
        let mut core = StateCore::new(POLICY);
        if let Some(factory) = factory_for(ElementType::CashShop) {
            core.emplace(ElementType::CashShop, factory, ctx);
        }
        Self { core }
    }
}

impl UiState for CashShopState {
    fn kind(&self) -> UiStateKind {
        UiStateKind::CashShop
    }

    fn core(&self) -> &StateCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut StateCore {
        &mut self.core
    }

    fn send_key(&mut self, mapping: Mapping, pressed: bool, _escape: bool, ctx: &mut UiContext) {
        if matches!(mapping.kind, KeyType::Action | KeyType::Face) {
            ctx.stage.send_key(mapping, pressed);
        }
    }

    fn send_close(&mut self, ctx: &mut UiContext) {
        ctx.open_window(ElementType::Quit);
    }
}
