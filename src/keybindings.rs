use std::collections::BTreeMap;

use thiserror::Error;

use crate::actions::{KeyAction, KeyType, Mapping};
use crate::keys::PhysicalKey;
use crate::services::{KeymapChange, Network, Request};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeymapError {
    #[error("no physical key has index {0}")]
    UnknownKeyIndex(u8),
    #[error("unknown key type id {0}")]
    UnknownKeyType(u8),
    #[error("{kind:?} binding carries unknown action id {action}")]
    UnknownAction { kind: KeyType, action: i32 },
}

/// Which factory table to restore.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeymapPreset {
    Basic,
    Alternate,
}

/// A physical-key to mapping table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    map: BTreeMap<PhysicalKey, Mapping>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn preset(preset: KeymapPreset) -> Self {
        match preset {
            KeymapPreset::Basic => Self::basic(),
            KeymapPreset::Alternate => Self::alternate(),
        }
    }

    pub fn basic() -> Self {
        use KeyAction::*;
        use PhysicalKey as K;
        let mut kb = Self::new();
        kb.bind(K::Escape, MainMenu);
        kb.bind(K::F1, Face1);
        kb.bind(K::F2, Face2);
        kb.bind(K::F3, Face3);
        kb.bind(K::F5, Face4);
        kb.bind(K::F6, Face5);
        kb.bind(K::F7, Face6);
        kb.bind(K::F8, Face7);
        kb.bind(K::ScrollLock, Screenshot);
        kb.bind(K::GraveAccent, CashShop);
        kb.bind(K::Num1, Say);
        kb.bind(K::Num2, PartyChat);
        kb.bind(K::Num3, FriendsChat);
        kb.bind(K::Num4, GuildChat);
        kb.bind(K::Num5, AllianceChat);
        kb.bind(K::Q, QuestLog);
        kb.bind(K::W, WorldMap);
        kb.bind(K::E, Equipment);
        kb.bind(K::R, Friends);
        kb.bind(K::T, BossParty);
        kb.bind(K::Y, ItemPot);
        kb.bind(K::U, Guide);
        kb.bind(K::I, Items);
        kb.bind(K::O, EnhanceEquip);
        kb.bind(K::P, Party);
        kb.bind(K::LeftBracket, Menu);
        kb.bind(K::RightBracket, QuickSlots);
        kb.bind(K::Backslash, KeyBindings);
        kb.bind(K::S, Stats);
        kb.bind(K::G, Guild);
        kb.bind(K::H, Whisper);
        kb.bind(K::K, Skills);
        kb.bind(K::L, Notifier);
        kb.bind(K::Semicolon, Medals);
        kb.bind(K::Apostrophe, ToggleChat);
        kb.bind(K::Z, Pickup);
        kb.bind(K::X, Sit);
        kb.bind(K::C, MapleChat);
        kb.bind(K::V, Event);
        kb.bind(K::B, Profession);
        kb.bind(K::M, MiniMap);
        kb.bind(K::LeftControl, Attack);
        kb.bind(K::RightControl, Attack);
        kb.bind(K::LeftAlt, Jump);
        kb.bind(K::RightAlt, Jump);
        kb.bind(K::Space, InteractHarvest);
        kb
    }

    pub fn alternate() -> Self {
        use KeyAction::*;
        use PhysicalKey as K;
        let mut kb = Self::new();
        kb.bind(K::Escape, MainMenu);
        kb.bind(K::F1, Face1);
        kb.bind(K::F2, Face2);
        kb.bind(K::F3, Face3);
        kb.bind(K::F5, Face4);
        kb.bind(K::F6, Face5);
        kb.bind(K::F7, Face6);
        kb.bind(K::F8, Face7);
        kb.bind(K::ScrollLock, Screenshot);
        kb.bind(K::GraveAccent, CashShop);
        kb.bind(K::Insert, Say);
        kb.bind(K::Home, PartyChat);
        kb.bind(K::PageUp, FriendsChat);
        kb.bind(K::Delete, GuildChat);
        kb.bind(K::End, AllianceChat);
        kb.bind(K::T, BossParty);
        kb.bind(K::Y, ItemPot);
        kb.bind(K::U, Equipment);
        kb.bind(K::I, Items);
        kb.bind(K::P, Party);
        kb.bind(K::LeftBracket, Menu);
        kb.bind(K::RightBracket, QuickSlots);
        kb.bind(K::Backslash, KeyBindings);
        kb.bind(K::G, Guild);
        kb.bind(K::H, Whisper);
        kb.bind(K::J, QuestLog);
        kb.bind(K::K, Skills);
        kb.bind(K::L, Notifier);
        kb.bind(K::Semicolon, Medals);
        kb.bind(K::Apostrophe, ToggleChat);
        kb.bind(K::Z, Pickup);
        kb.bind(K::X, Sit);
        kb.bind(K::C, Stats);
        kb.bind(K::V, Event);
        kb.bind(K::B, Profession);
        kb.bind(K::N, WorldMap);
        kb.bind(K::M, MiniMap);
        kb.bind(K::Period, Friends);
        kb.bind(K::LeftControl, Attack);
        kb.bind(K::RightControl, Attack);
        kb.bind(K::LeftAlt, Jump);
        kb.bind(K::RightAlt, Jump);
        kb.bind(K::Space, InteractHarvest);
        kb
    }

    fn bind(&mut self, key: PhysicalKey, action: KeyAction) {
        self.map.insert(key, Mapping::of(action));
    }

    pub fn get(&self, key: PhysicalKey) -> Mapping {
        self.map.get(&key).copied().unwrap_or(Mapping::NONE)
    }

    pub fn insert(&mut self, key: PhysicalKey, mapping: Mapping) {
        if mapping.is_none() {
            self.map.remove(&key);
        } else {
            self.map.insert(key, mapping);
        }
    }

    pub fn remove(&mut self, key: PhysicalKey) -> Option<Mapping> {
        self.map.remove(&key)
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Keys currently bound to `mapping`.
    pub fn keys_for(&self, mapping: Mapping) -> Vec<PhysicalKey> {
        self.map
            .iter()
            .filter(|(_, bound)| **bound == mapping)
            .map(|(key, _)| *key)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PhysicalKey, Mapping)> + '_ {
        self.map.iter().map(|(key, mapping)| (*key, *mapping))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// The live key table: fixed client keys plus the player's bindings.
#[derive(Debug, Clone, Default)]
pub struct Keyboard {
    bindings: Bindings,
}

impl Keyboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bindings(bindings: Bindings) -> Self {
        Self { bindings }
    }

    /// Keys the client always binds the same way.
    fn static_mapping(key: PhysicalKey) -> Option<Mapping> {
        let action = match key {
            PhysicalKey::Left => KeyAction::Left,
            PhysicalKey::Right => KeyAction::Right,
            PhysicalKey::Up => KeyAction::Up,
            PhysicalKey::Down => KeyAction::Down,
            PhysicalKey::Enter | PhysicalKey::NumpadEnter => KeyAction::Return,
            PhysicalKey::Tab => KeyAction::Tab,
            _ => return None,
        };
        Some(Mapping::of(action))
    }

    fn text_action(key: PhysicalKey) -> Option<KeyAction> {
        let action = match key {
            PhysicalKey::Backspace => KeyAction::Back,
            PhysicalKey::Enter | PhysicalKey::NumpadEnter => KeyAction::Return,
            PhysicalKey::Space => KeyAction::Space,
            PhysicalKey::Tab => KeyAction::Tab,
            PhysicalKey::Escape => KeyAction::Escape,
            PhysicalKey::Home => KeyAction::Home,
            PhysicalKey::End => KeyAction::End,
            PhysicalKey::Delete => KeyAction::Delete,
            _ => return None,
        };
        Some(action)
    }

    pub fn translate(&self, key: PhysicalKey) -> Mapping {
        Self::static_mapping(key).unwrap_or_else(|| self.bindings.get(key))
    }

    /// Mapping used while a text field has focus.
    pub fn translate_text(&self, key: PhysicalKey, shift: bool) -> Mapping {
        if let Some(action) = Self::text_action(key) {
            return Mapping::of(action);
        }
        if let Some(c) = key.char(shift) {
            return Mapping::text(c);
        }
        match key {
            PhysicalKey::Left | PhysicalKey::Right | PhysicalKey::Up | PhysicalKey::Down => {
                self.translate(key)
            }
            _ => Mapping::NONE,
        }
    }

    pub fn ctrl_action(&self, key: PhysicalKey) -> Option<KeyAction> {
        match key {
            PhysicalKey::C => Some(KeyAction::Copy),
            PhysicalKey::V => Some(KeyAction::Paste),
            _ => None,
        }
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    pub fn replace_bindings(&mut self, bindings: Bindings) {
        self.bindings = bindings;
    }

    /// Applies one keymap entry as stored on the server.
    pub fn assign(&mut self, index: u8, type_id: u8, action: i32) -> Result<(), KeymapError> {
        let key = PhysicalKey::from_index(index).ok_or(KeymapError::UnknownKeyIndex(index))?;
        let kind = KeyType::from_id(type_id).ok_or(KeymapError::UnknownKeyType(type_id))?;
        if kind.carries_action() && KeyAction::from_id(action).is_none() {
            return Err(KeymapError::UnknownAction { kind, action });
        }
        self.bindings.insert(key, Mapping::new(kind, action));
        Ok(())
    }
}

/// Uncommitted edits to the key table, as made in the key configuration
/// window.
#[derive(Debug, Clone, Default)]
pub struct KeymapEditor {
    staged: Bindings,
    dirty: bool,
}

impl KeymapEditor {
    pub fn new(keyboard: &Keyboard) -> Self {
        Self {
            staged: keyboard.bindings().clone(),
            dirty: false,
        }
    }

    pub fn staged(&self, key: PhysicalKey) -> Mapping {
        self.staged.get(key)
    }

    pub fn bindings(&self) -> &Bindings {
        &self.staged
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Whether any key holds `mapping` in the edit buffer.
    pub fn is_staged(&self, mapping: Mapping) -> bool {
        !self.staged.keys_for(mapping).is_empty()
    }

    pub fn stage(&mut self, key: PhysicalKey, mapping: Mapping) {
        let prior = self.staged.get(key);
        if prior == mapping {
            return;
        }
        if !prior.is_none() {
            self.unstage(prior);
        }
        if !mapping.is_none() {
            for other in self.staged.keys_for(mapping) {
                self.staged.remove(other);
            }
        }
        self.staged.insert(key, mapping);
        if let Some(partner) = key.modifier_partner() {
            self.staged.insert(partner, mapping);
        }
        self.dirty = true;
    }

    pub fn unstage(&mut self, mapping: Mapping) {
        let keys = self.staged.keys_for(mapping);
        if keys.is_empty() {
            return;
        }
        for key in keys {
            self.staged.remove(key);
        }
        self.dirty = true;
    }

    pub fn clear(&mut self) {
        self.staged.clear();
        self.dirty = true;
    }

    pub fn load_preset(&mut self, preset: KeymapPreset) {
        self.staged = Bindings::preset(preset);
        self.dirty = true;
    }

    pub fn revert(&mut self, keyboard: &Keyboard) {
        self.staged = keyboard.bindings().clone();
        self.dirty = false;
    }

    /// Sends the differences to the server and makes the edit buffer the
    /// live table. Returns the changes that were sent.
    pub fn commit(&mut self, keyboard: &mut Keyboard, network: &mut dyn Network) -> Vec<KeymapChange> {
        let live = keyboard.bindings();
        let mut changes: Vec<KeymapChange> = self
            .staged
            .iter()
            .filter(|(key, mapping)| live.get(*key) != *mapping)
            .filter_map(|(key, mapping)| Some(KeymapChange { index: key.index()?, mapping }))
            .collect();
        changes.extend(
            live.iter()
                .filter(|(key, _)| self.staged.get(*key).is_none())
                .filter_map(|(key, _)| {
                    Some(KeymapChange {
                        index: key.index()?,
                        mapping: Mapping::NONE,
                    })
                }),
        );
        changes.sort_by_key(|change| change.index);

        if !changes.is_empty() {
            tracing::debug!(changes = changes.len(), "committing keymap changes");
            network.send(Request::ChangeKeymap(changes.clone()));
        }
        keyboard.replace_bindings(self.staged.clone());
        self.dirty = false;
        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::recording::RecordingNetwork;

    fn keyboard() -> Keyboard {
        Keyboard::with_bindings(Bindings::basic())
    }

    #[test]
    fn static_keys_override_bindings() {
        let kb = keyboard();
        assert_eq!(kb.translate(PhysicalKey::Enter), Mapping::of(KeyAction::Return));
        assert_eq!(kb.translate(PhysicalKey::I), Mapping::of(KeyAction::Items));
        assert_eq!(kb.translate(PhysicalKey::F12), Mapping::NONE);
    }

    #[test]
    fn text_translation_handles_controls_chars_and_arrows() {
        let kb = keyboard();
        assert_eq!(
            kb.translate_text(PhysicalKey::Backspace, true),
            Mapping::of(KeyAction::Back)
        );
        assert_eq!(kb.translate_text(PhysicalKey::A, true), Mapping::text('A'));
        assert_eq!(kb.translate_text(PhysicalKey::Num1, false), Mapping::text('1'));
        assert_eq!(
            kb.translate_text(PhysicalKey::Left, false),
            Mapping::of(KeyAction::Left)
        );
        assert_eq!(kb.translate_text(PhysicalKey::F1, false), Mapping::NONE);
    }

    #[test]
    fn ctrl_actions_are_fixed() {
        let kb = keyboard();
        assert_eq!(kb.ctrl_action(PhysicalKey::C), Some(KeyAction::Copy));
        assert_eq!(kb.ctrl_action(PhysicalKey::V), Some(KeyAction::Paste));
        assert_eq!(kb.ctrl_action(PhysicalKey::X), None);
    }

    #[test]
    fn invalid_assignments_leave_table_unchanged() {
        let mut kb = keyboard();
        let before = kb.bindings().clone();
        assert_eq!(kb.assign(0, 4, 1), Err(KeymapError::UnknownKeyIndex(0)));
        assert_eq!(kb.assign(23, 99, 1), Err(KeymapError::UnknownKeyType(99)));
        assert!(matches!(
            kb.assign(23, 4, 17),
            Err(KeymapError::UnknownAction { .. })
        ));
        assert_eq!(kb.bindings(), &before);
        kb.assign(23, 2, 2000000).unwrap();
        assert_eq!(
            kb.translate(PhysicalKey::I),
            Mapping::new(KeyType::Item, 2000000)
        );
    }

    #[test]
    fn staging_moves_binding_and_commit_sends_diff() {
        let mut kb = keyboard();
        let mut editor = KeymapEditor::new(&kb);
        let items = Mapping::of(KeyAction::Items);
        editor.stage(PhysicalKey::F12, items);
        assert!(editor.is_dirty());
        assert_eq!(editor.staged(PhysicalKey::I), Mapping::NONE);
        assert_eq!(kb.translate(PhysicalKey::I), items);

        let mut network = RecordingNetwork::default();
        let changes = editor.commit(&mut kb, &mut network);
        assert_eq!(
            changes,
            vec![
                KeymapChange { index: 23, mapping: Mapping::NONE },
                KeymapChange { index: 70, mapping: items },
            ]
        );
        assert_eq!(network.sent(), vec![Request::ChangeKeymap(changes)]);
        assert_eq!(kb.translate(PhysicalKey::I), Mapping::NONE);
        assert_eq!(kb.translate(PhysicalKey::F12), items);
        assert!(!editor.is_dirty());
    }

    #[test]
    fn revert_discards_staged_edits() {
        let kb = keyboard();
        let mut editor = KeymapEditor::new(&kb);
        editor.stage(PhysicalKey::F12, Mapping::of(KeyAction::Items));
        editor.revert(&kb);
        assert_eq!(editor.bindings(), kb.bindings());
        assert!(!editor.is_dirty());
    }

    #[test]
    fn modifier_pairs_stage_together() {
        let mut kb = keyboard();
        let mut editor = KeymapEditor::new(&kb);
        let pickup = Mapping::of(KeyAction::Pickup);
        editor.stage(PhysicalKey::LeftShift, pickup);
        assert_eq!(editor.staged(PhysicalKey::LeftShift), pickup);
        assert_eq!(editor.staged(PhysicalKey::RightShift), pickup);
        assert_eq!(editor.staged(PhysicalKey::Z), Mapping::NONE);

        editor.stage(PhysicalKey::Z, Mapping::of(KeyAction::Attack));
        assert_eq!(editor.staged(PhysicalKey::LeftControl), Mapping::NONE);
        assert_eq!(editor.staged(PhysicalKey::RightControl), Mapping::NONE);

        editor.commit(&mut kb, &mut RecordingNetwork::default());
        assert_eq!(kb.translate(PhysicalKey::RightShift), pickup);
    }

    #[test]
    fn commit_without_changes_sends_nothing() {
        let mut kb = keyboard();
        let mut editor = KeymapEditor::new(&kb);
        let mut network = RecordingNetwork::default();
        assert!(editor.commit(&mut kb, &mut network).is_empty());
        assert!(network.sent().is_empty());
    }
}
