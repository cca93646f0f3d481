//! Key configuration window.
//!
//! Edits happen on a [`KeymapEditor`] copy of the live table. Nothing
//! reaches the keyboard or the server until the player saves.

use std::collections::HashMap;

use ratatui::style::Color;

use super::notice::{Notice, NoticeAction};
use super::{ElementKind, ElementMessage, ElementType, KeyConfigCommand, UiContext, UiElement, draw_frame};
use crate::actions::{KeyAction, KeyType, Mapping};
use crate::components::{Button, ButtonSet, DragHelper, DraggedIcon, IconKind};
use crate::constants::VIEWPORT;
use crate::cursor::CursorState;
use crate::geometry::{Point, Rectangle};
use crate::keybindings::{KeymapEditor, KeymapPreset};
use crate::keys::PhysicalKey;
use crate::model::InventoryType;
use crate::render::Canvas;
use crate::services::Sound;

const KEY_COLUMNS: usize = 12;
const KEY_CELL: Point = Point::new(44, 20);
const KEY_GRID: Point = Point::new(12, 28);

const POOL_COLUMNS: usize = 6;
const POOL_CELL: Point = Point::new(88, 18);
const POOL_TOP: i32 = 192;

const WIDTH: i32 = 24 + KEY_COLUMNS as i32 * 44;
const HEIGHT: i32 = 420;

const BT_OK: u16 = 0;
const BT_CANCEL: u16 = 1;
const BT_DEFAULT: u16 = 2;
const BT_DELETE: u16 = 3;

pub struct KeyConfig {
    drag: DragHelper,
    active: bool,
    editor: KeymapEditor,
    /// Display names for item and skill bindings.
    labels: HashMap<Mapping, String>,
    selected: Option<PhysicalKey>,
    buttons: ButtonSet,
}

impl KeyConfig {
    pub fn new(ctx: &UiContext) -> Self {
        let handle = Rectangle::from_xywh(0, 0, WIDTH, 20);
        let default = Point::new((VIEWPORT.x - WIDTH) / 2, (VIEWPORT.y - HEIGHT) / 2);
        let mut buttons = ButtonSet::new();
        let y = HEIGHT - 24;
        buttons.insert(BT_DEFAULT, Button::new(Rectangle::from_xywh(12, y, 64, 16), "Default"));
        buttons.insert(BT_DELETE, Button::new(Rectangle::from_xywh(84, y, 56, 16), "Delete"));
        buttons.insert(BT_OK, Button::new(Rectangle::from_xywh(WIDTH - 128, y, 48, 16), "OK"));
        buttons.insert(BT_CANCEL, Button::new(Rectangle::from_xywh(WIDTH - 72, y, 56, 16), "Cancel"));
        let mut config = Self {
            drag: DragHelper::new(ElementType::KeyConfig, default, handle, ctx.settings.as_ref()),
            active: true,
            editor: KeymapEditor::new(&ctx.keyboard),
            labels: HashMap::new(),
            selected: None,
            buttons,
        };
        config.load_labels(ctx);
        config
    }

    pub fn editor(&self) -> &KeymapEditor {
        &self.editor
    }

    pub fn selected(&self) -> Option<PhysicalKey> {
        self.selected
    }

    /// Screen rectangle of a key's cell.
    pub fn key_cell(&self, key: PhysicalKey) -> Option<Rectangle> {
        let slot = PhysicalKey::ALL.iter().position(|k| *k == key)?;
        Some(Rectangle::new(self.position() + Self::key_origin(slot), KEY_CELL))
    }

    fn load_labels(&mut self, ctx: &UiContext) {
        let session = ctx.session();
        self.labels.clear();
        for skill in session.skills.values() {
            self.labels
                .insert(Mapping::new(KeyType::Skill, skill.skill_id), skill.name.clone());
        }
        for tab in [InventoryType::Use, InventoryType::Setup] {
            for (_, item) in session.inventory.items(tab) {
                self.labels
                    .insert(Mapping::new(KeyType::Item, item.item_id), item.name.clone());
            }
        }
    }

    fn label(&self, mapping: Mapping) -> String {
        self.labels
            .get(&mapping)
            .cloned()
            .unwrap_or_else(|| mapping.to_string())
    }

    fn key_origin(slot: usize) -> Point {
        KEY_GRID
            + Point::new(
                (slot % KEY_COLUMNS) as i32 * KEY_CELL.x,
                (slot / KEY_COLUMNS) as i32 * KEY_CELL.y,
            )
    }

    fn key_at(&self, pos: Point) -> Option<(PhysicalKey, Point)> {
        let local = pos - self.position() - KEY_GRID;
        if local.x < 0 || local.y < 0 || local.x >= KEY_COLUMNS as i32 * KEY_CELL.x {
            return None;
        }
        let slot = (local.y / KEY_CELL.y) as usize * KEY_COLUMNS + (local.x / KEY_CELL.x) as usize;
        let key = *PhysicalKey::ALL.get(slot)?;
        Some((key, self.position() + Self::key_origin(slot)))
    }

    /// Bindable actions no key holds yet.
    fn pool(&self) -> Vec<KeyAction> {
        KeyAction::bindable()
            .filter(|action| !self.editor.is_staged(Mapping::of(*action)))
            .collect()
    }

    fn pool_origin(entry: usize) -> Point {
        Point::new(
            12 + (entry % POOL_COLUMNS) as i32 * POOL_CELL.x,
            POOL_TOP + (entry / POOL_COLUMNS) as i32 * POOL_CELL.y,
        )
    }

    fn pool_at(&self, pos: Point) -> Option<(KeyAction, Point)> {
        let local = pos - self.position() - Point::new(12, POOL_TOP);
        if local.x < 0 || local.y < 0 || local.x >= POOL_COLUMNS as i32 * POOL_CELL.x {
            return None;
        }
        let entry = (local.y / POOL_CELL.y) as usize * POOL_COLUMNS + (local.x / POOL_CELL.x) as usize;
        let action = *self.pool().get(entry)?;
        Some((action, self.position() + Self::pool_origin(entry)))
    }

    fn grab(&self, mapping: Mapping, offset: Point, ctx: &mut UiContext) {
        ctx.drag_icon(DraggedIcon::new(
            ElementType::KeyConfig,
            IconKind::Mapping {
                mapping,
                label: self.label(mapping),
            },
            offset,
        ));
    }

    fn save(&mut self, ctx: &mut UiContext) {
        let changes = self.editor.commit(&mut ctx.keyboard, ctx.network.as_mut());
        tracing::info!(changes = changes.len(), "key bindings saved");
    }

    fn close(&mut self, ctx: &mut UiContext) {
        self.selected = None;
        ctx.hide(ElementType::KeyConfig);
    }

    /// Closes right away when nothing is staged, otherwise asks whether to
    /// keep the edits.
    fn safe_close(&mut self, ctx: &mut UiContext) {
        if !self.editor.is_dirty() {
            self.close(ctx);
            return;
        }
        ctx.open(ElementType::Notice, |_| {
            Notice::yes_no(
                "Do you want to save your changes?",
                command(KeyConfigCommand::SaveAndClose),
                command(KeyConfigCommand::DiscardAndClose),
            )
        });
    }

    fn delete(&mut self, ctx: &mut UiContext) {
        if let Some(key) = self.selected
            && !self.editor.staged(key).is_none()
        {
            self.editor.stage(key, Mapping::NONE);
            return;
        }
        ctx.open(ElementType::Notice, |_| {
            Notice::yes_no(
                "Would you like to clear all key bindings?",
                command(KeyConfigCommand::ClearAll),
                NoticeAction::None,
            )
        });
    }

    fn button(&mut self, id: u16, ctx: &mut UiContext) {
        match id {
            BT_OK => {
                self.save(ctx);
                self.close(ctx);
            }
            BT_CANCEL => self.safe_close(ctx),
            BT_DEFAULT => ctx.open(ElementType::Notice, |_| {
                Notice::yes_no(
                    "Would you like to revert to default settings?",
                    command(KeyConfigCommand::LoadPreset(KeymapPreset::Basic)),
                    NoticeAction::None,
                )
            }),
            BT_DELETE => self.delete(ctx),
            _ => {}
        }
    }
}

fn command(cmd: KeyConfigCommand) -> NoticeAction {
    NoticeAction::Notify {
        tag: ElementType::KeyConfig,
        message: ElementMessage::KeyConfig(cmd),
    }
}

fn short(text: &str, width: usize) -> String {
    text.chars().take(width).collect()
}

impl UiElement for KeyConfig {
    fn element_type(&self) -> ElementType {
        ElementType::KeyConfig
    }

    fn position(&self) -> Point {
        self.drag.position()
    }

    fn size(&self) -> Point {
        Point::new(WIDTH, HEIGHT)
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    fn is_toggleable(&self) -> bool {
        true
    }

    fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    fn draw(&self, canvas: &mut dyn Canvas, _alpha: f32) {
        let origin = self.position();
        draw_frame(canvas, self.bounds(), "Keyboard Settings");
        for (slot, key) in PhysicalKey::ALL.iter().enumerate() {
            let at = origin + Self::key_origin(slot);
            let color = if self.selected == Some(*key) {
                Color::Yellow
            } else {
                Color::Gray
            };
            canvas.text(at, &short(&format!("{key:?}"), 5), color);
            let mapping = self.editor.staged(*key);
            if !mapping.is_none() {
                canvas.text(at + Point::new(0, 10), &short(&self.label(mapping), 6), Color::White);
            }
        }
        canvas.text(origin + Point::new(12, POOL_TOP - 16), "Unassigned", Color::Gray);
        for (entry, action) in self.pool().iter().enumerate() {
            canvas.text(
                origin + Self::pool_origin(entry),
                &short(&action.to_string(), 12),
                Color::LightCyan,
            );
        }
        self.buttons.draw(canvas, origin);
    }

    fn send_cursor(&mut self, clicked: bool, pos: Point, ctx: &mut UiContext) -> CursorState {
        if self.drag.send_cursor(clicked, pos, ctx.settings.as_mut()) {
            return if clicked {
                CursorState::Clicking
            } else {
                CursorState::Idle
            };
        }

        if let Some((key, cell)) = self.key_at(pos) {
            let mapping = self.editor.staged(key);
            if clicked {
                self.selected = Some(key);
                if mapping.is_none() {
                    return CursorState::Idle;
                }
                self.grab(mapping, pos - cell, ctx);
                return CursorState::Grabbing;
            }
            return if mapping.is_none() {
                CursorState::Idle
            } else {
                CursorState::CanGrab
            };
        }

        if let Some((action, cell)) = self.pool_at(pos) {
            if clicked {
                self.grab(Mapping::of(action), pos - cell, ctx);
                return CursorState::Grabbing;
            }
            return CursorState::CanGrab;
        }

        let (state, pressed) = self
            .buttons
            .send_cursor(self.position(), clicked, pos, ctx.audio.as_mut());
        if let Some(id) = pressed {
            self.button(id, ctx);
        }
        state
    }

    fn remove_cursor(&mut self, ctx: &mut UiContext) {
        self.drag.release(ctx.settings.as_mut());
        self.buttons.remove_cursor();
    }

    fn send_key(&mut self, _mapping: Mapping, pressed: bool, escape: bool, ctx: &mut UiContext) {
        if pressed && escape {
            self.safe_close(ctx);
        }
    }

    fn send_icon(&mut self, icon: &DraggedIcon, pos: Point, ctx: &mut UiContext) -> bool {
        let Some(mapping) = icon.mapping() else {
            return true;
        };
        if let Some((key, _)) = self.key_at(pos) {
            if !matches!(icon.kind, IconKind::Mapping { .. }) {
                self.labels.insert(mapping, icon.label().to_string());
            }
            self.editor.stage(key, mapping);
            self.selected = Some(key);
            ctx.play(Sound::DragEnd);
        } else if icon.source == ElementType::KeyConfig {
            self.editor.unstage(mapping);
        }
        true
    }

    fn handle_message(&mut self, message: &ElementMessage, ctx: &mut UiContext) {
        match message {
            ElementMessage::KeyConfig(cmd) => match cmd {
                KeyConfigCommand::SaveAndClose => {
                    self.save(ctx);
                    self.close(ctx);
                }
                KeyConfigCommand::DiscardAndClose => {
                    self.editor.revert(&ctx.keyboard);
                    self.close(ctx);
                }
                KeyConfigCommand::LoadPreset(preset) => self.editor.load_preset(*preset),
                KeyConfigCommand::ClearAll => self.editor.clear(),
                KeyConfigCommand::Unstage(mapping) => self.editor.unstage(*mapping),
            },
            ElementMessage::InventoryChanged | ElementMessage::StatsChanged => self.load_labels(ctx),
            _ => {}
        }
    }
}

impl ElementKind for KeyConfig {
    const TYPE: ElementType = ElementType::KeyConfig;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::UiRequest;
    use crate::model::Session;
    use crate::services::Request;
    use crate::services::recording::Probe;

    fn key_center(config: &KeyConfig, key: PhysicalKey) -> Point {
        config.key_cell(key).unwrap().origin + Point::new(4, 4)
    }

    fn mapping_icon(mapping: Mapping) -> DraggedIcon {
        DraggedIcon::new(
            ElementType::KeyConfig,
            IconKind::Mapping {
                mapping,
                label: mapping.to_string(),
            },
            Point::ORIGIN,
        )
    }

    fn opened_notice(request: UiRequest, ctx: &mut UiContext) -> String {
        match request {
            UiRequest::Open { tag, factory } => {
                assert_eq!(tag, ElementType::Notice);
                let element = factory(ctx);
                element
                    .as_any()
                    .downcast_ref::<Notice>()
                    .unwrap()
                    .message()
                    .to_string()
            }
            other => panic!("expected a notice, got {other:?}"),
        }
    }

    #[test]
    fn clean_escape_closes_without_asking() {
        let probe = Probe::new();
        let mut ctx = probe.context(Session::sample());
        let mut config = KeyConfig::new(&ctx);
        config.send_key(Mapping::of(KeyAction::MainMenu), true, true, &mut ctx);
        assert!(matches!(
            ctx.take_requests().as_slice(),
            [UiRequest::Hide(ElementType::KeyConfig)]
        ));
    }

    #[test]
    fn dirty_escape_asks_to_save() {
        let probe = Probe::new();
        let mut ctx = probe.context(Session::sample());
        let mut config = KeyConfig::new(&ctx);
        let items = Mapping::of(KeyAction::Items);
        let at = key_center(&config, PhysicalKey::F12);
        assert!(config.send_icon(&mapping_icon(items), at, &mut ctx));
        assert!(config.editor().is_dirty());

        config.send_key(Mapping::of(KeyAction::MainMenu), true, true, &mut ctx);
        let mut requests = ctx.take_requests();
        assert_eq!(requests.len(), 1);
        let message = opened_notice(requests.remove(0), &mut ctx);
        assert_eq!(message, "Do you want to save your changes?");
        assert!(probe.network.sent().is_empty());
    }

    #[test]
    fn dropping_on_a_key_moves_the_binding() {
        let probe = Probe::new();
        let mut ctx = probe.context(Session::sample());
        let mut config = KeyConfig::new(&ctx);
        let items = Mapping::of(KeyAction::Items);
        let at = key_center(&config, PhysicalKey::F12);
        config.send_icon(&mapping_icon(items), at, &mut ctx);
        assert_eq!(config.editor().staged(PhysicalKey::F12), items);
        assert!(config.editor().staged(PhysicalKey::I).is_none());
        assert_eq!(ctx.keyboard.translate(PhysicalKey::I), items);
    }

    #[test]
    fn save_commits_and_discard_reverts() {
        let probe = Probe::new();
        let mut ctx = probe.context(Session::sample());
        let mut config = KeyConfig::new(&ctx);
        let items = Mapping::of(KeyAction::Items);
        let at = key_center(&config, PhysicalKey::F12);
        config.send_icon(&mapping_icon(items), at, &mut ctx);

        config.handle_message(
            &ElementMessage::KeyConfig(KeyConfigCommand::SaveAndClose),
            &mut ctx,
        );
        assert_eq!(ctx.keyboard.translate(PhysicalKey::F12), items);
        assert!(matches!(
            probe.network.sent().as_slice(),
            [Request::ChangeKeymap(_)]
        ));

        config.handle_message(
            &ElementMessage::KeyConfig(KeyConfigCommand::ClearAll),
            &mut ctx,
        );
        config.handle_message(
            &ElementMessage::KeyConfig(KeyConfigCommand::DiscardAndClose),
            &mut ctx,
        );
        assert!(!config.editor().is_dirty());
        assert_eq!(config.editor().staged(PhysicalKey::F12), items);
    }

    #[test]
    fn pressing_a_bound_key_grabs_its_mapping() {
        let probe = Probe::new();
        let mut ctx = probe.context(Session::sample());
        let mut config = KeyConfig::new(&ctx);
        let at = key_center(&config, PhysicalKey::I);
        assert_eq!(config.send_cursor(true, at, &mut ctx), CursorState::Grabbing);
        assert_eq!(config.selected(), Some(PhysicalKey::I));
        match ctx.take_requests().as_slice() {
            [UiRequest::DragIcon(icon)] => {
                assert_eq!(icon.mapping(), Some(Mapping::of(KeyAction::Items)));
            }
            other => panic!("unexpected requests {other:?}"),
        }
    }

    #[test]
    fn inventory_icons_bind_with_their_names() {
        let probe = Probe::new();
        let mut ctx = probe.context(Session::sample());
        let mut config = KeyConfig::new(&ctx);
        let potion = ctx
            .session()
            .inventory
            .get(InventoryType::Use, 1)
            .cloned()
            .unwrap();
        let icon = DraggedIcon::new(
            ElementType::ItemInventory,
            IconKind::Item {
                tab: InventoryType::Use,
                slot: 1,
                item: potion.clone(),
            },
            Point::ORIGIN,
        );
        let at = key_center(&config, PhysicalKey::F1);
        config.send_icon(&icon, at, &mut ctx);
        let mapping = config.editor().staged(PhysicalKey::F1);
        assert_eq!(mapping, Mapping::new(KeyType::Item, potion.item_id));
        assert_eq!(config.label(mapping), potion.name);
    }
}
