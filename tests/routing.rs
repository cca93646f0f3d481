use journey_ui::UiFacade;
use journey_ui::actions::{KeyAction, KeyType, Mapping};
use journey_ui::clipboard::Clipboard;
use journey_ui::cursor::CursorState;
use journey_ui::elements::chat_bar::ChatBar;
use journey_ui::elements::key_config::KeyConfig;
use journey_ui::elements::login::{ACCOUNT_FIELD, Login, PASSWORD_FIELD};
use journey_ui::elements::{ElementType, FocusTarget, UiElement};
use journey_ui::geometry::Point;
use journey_ui::keys::PhysicalKey;
use journey_ui::model::Session;
use journey_ui::services::recording::{Probe, StageEvent};
use journey_ui::states::UiStateKind;

fn at_login() -> (Probe, UiFacade) {
    let probe = Probe::new();
    let ui = UiFacade::new(probe.services(), Session::sample());
    (probe, ui)
}

fn in_game() -> (Probe, UiFacade) {
    let (probe, mut ui) = at_login();
    ui.change_state(UiStateKind::Game);
    (probe, ui)
}

fn tap(ui: &mut UiFacade, key: PhysicalKey) {
    ui.send_key(key, true);
    ui.send_key(key, false);
}

fn press_at(ui: &mut UiFacade, pos: Point) {
    ui.send_cursor_move(pos);
    ui.send_cursor_button(true);
}

fn field_focused(ui: &UiFacade, field: journey_ui::elements::FieldId) -> bool {
    ui.element::<Login>()
        .and_then(|login| login.textfield(field))
        .is_some_and(|f| f.is_focused())
}

#[test]
fn clicking_a_field_moves_focus_exclusively() {
    let (_probe, mut ui) = at_login();
    assert!(field_focused(&ui, ACCOUNT_FIELD));

    // Password field of the centred login box.
    press_at(&mut ui, Point::new(330, 300));
    ui.send_cursor_button(false);

    assert!(field_focused(&ui, PASSWORD_FIELD));
    assert!(!field_focused(&ui, ACCOUNT_FIELD));
    assert_eq!(
        ui.core().text_focus(),
        Some(FocusTarget::new(ElementType::Login, PASSWORD_FIELD))
    );
}

#[test]
fn typed_keys_follow_shift_and_caps_lock() {
    let (_probe, mut ui) = at_login();
    tap(&mut ui, PhysicalKey::A);
    ui.send_key(PhysicalKey::LeftShift, true);
    tap(&mut ui, PhysicalKey::B);
    tap(&mut ui, PhysicalKey::Num1);
    ui.send_key(PhysicalKey::LeftShift, false);
    tap(&mut ui, PhysicalKey::CapsLock);
    tap(&mut ui, PhysicalKey::C);
    tap(&mut ui, PhysicalKey::Num2);

    let login = ui.element::<Login>().expect("login screen");
    assert_eq!(login.textfield(ACCOUNT_FIELD).map(|f| f.text()), Some("aB!C2"));
}

#[test]
fn paste_inserts_clipboard_text() {
    let (probe, mut ui) = at_login();
    let mut clipboard = probe.clipboard.clone();
    clipboard.set_text("maple").unwrap();

    ui.send_key(PhysicalKey::RightControl, true);
    tap(&mut ui, PhysicalKey::V);
    ui.send_key(PhysicalKey::RightControl, false);

    let login = ui.element::<Login>().expect("login screen");
    assert_eq!(login.textfield(ACCOUNT_FIELD).map(|f| f.text()), Some("maple"));
}

#[test]
fn escape_in_chat_closes_the_chat_and_nothing_else() {
    let (_probe, mut ui) = in_game();
    tap(&mut ui, PhysicalKey::Backslash);
    tap(&mut ui, PhysicalKey::Enter);
    assert_eq!(
        ui.core().text_focus().map(|t| t.element),
        Some(ElementType::ChatBar)
    );

    tap(&mut ui, PhysicalKey::Escape);
    assert_eq!(ui.core().text_focus(), None);
    assert!(ui.is_active(ElementType::KeyConfig));
    assert_eq!(ui.element::<ChatBar>().map(|bar| bar.is_chat_open()), Some(false));
    assert!(!ui.core().registry().contains(ElementType::Notice));
}

#[test]
fn escape_in_a_login_field_stays_in_the_field() {
    let (probe, mut ui) = at_login();
    tap(&mut ui, PhysicalKey::Escape);
    assert!(!ui.core().registry().contains(ElementType::Notice));
    assert!(ui.is_active(ElementType::Login));
    assert!(!ui.is_quit());
    assert!(probe.network.sent().is_empty());
}

#[test]
fn icon_in_flight_blocks_other_pointer_handlers() {
    let (probe, mut ui) = in_game();
    tap(&mut ui, PhysicalKey::E);
    tap(&mut ui, PhysicalKey::I);

    press_at(&mut ui, Point::new(290, 120));
    ui.send_cursor_move(Point::new(280, 120));
    assert!(ui.core().icon().is_some());

    // Over the item inventory's handle with the button still held.
    ui.send_cursor_move(Point::new(500, 90));
    assert_eq!(ui.cursor().state(), CursorState::Grabbing);
    assert!(ui.core().tooltip().owner().is_none());
    assert!(probe.settings.saves().is_empty());

    ui.send_cursor_button(false);
    assert!(ui.core().icon().is_none());
}

#[test]
fn tooltip_belongs_to_the_hovered_window() {
    let (_probe, mut ui) = in_game();
    tap(&mut ui, PhysicalKey::E);

    ui.send_cursor_move(Point::new(280, 120));
    assert_eq!(ui.core().tooltip().owner(), Some(ElementType::EquipInventory));

    ui.send_cursor_move(Point::new(100, 200));
    assert_eq!(ui.core().tooltip().owner(), None);
}

#[test]
fn clicks_raise_the_window_under_the_cursor() {
    let (_probe, mut ui) = in_game();
    tap(&mut ui, PhysicalKey::E);
    tap(&mut ui, PhysicalKey::Backslash);

    let overlap = Point::new(300, 150);
    assert_eq!(ui.core().registry().front_at(overlap), Some(ElementType::KeyConfig));

    // The equipment title bar still shows above the key configuration.
    press_at(&mut ui, Point::new(300, 85));
    ui.send_cursor_button(false);
    assert_eq!(
        ui.core().registry().front_at(overlap),
        Some(ElementType::EquipInventory)
    );
}

#[test]
fn clicks_outside_windows_reach_the_stage() {
    let (probe, mut ui) = in_game();
    press_at(&mut ui, Point::new(100, 200));
    assert!(probe.stage.events().contains(&StageEvent::Cursor {
        clicked: true,
        pos: Point::new(100, 200)
    }));
}

#[test]
fn server_keymap_rebinds_a_key() {
    let (probe, mut ui) = in_game();
    let f12 = PhysicalKey::F12.index().expect("F12 has a server index");
    ui.add_keymapping(f12, KeyType::Menu.id(), KeyAction::Items.id());
    assert_eq!(ui.keyboard().translate(PhysicalKey::F12), Mapping::of(KeyAction::Items));

    tap(&mut ui, PhysicalKey::F12);
    assert!(ui.is_active(ElementType::ItemInventory));

    tap(&mut ui, PhysicalKey::F1);
    assert_eq!(probe.stage.keys(), vec![Mapping::of(KeyAction::Face1)]);
}

#[test]
fn binding_one_modifier_binds_its_partner() {
    let (_probe, mut ui) = in_game();
    tap(&mut ui, PhysicalKey::Backslash);
    let (from, to) = {
        let config = ui.element::<KeyConfig>().expect("key config open");
        let from = config.key_cell(PhysicalKey::I).expect("I cell").origin + Point::new(4, 4);
        let to = config
            .key_cell(PhysicalKey::LeftShift)
            .expect("shift cell")
            .origin
            + Point::new(4, 4);
        (from, to)
    };
    press_at(&mut ui, from);
    ui.send_cursor_move(to);
    ui.send_cursor_button(false);

    let config = ui.element::<KeyConfig>().expect("key config open");
    let items = Mapping::of(KeyAction::Items);
    assert_eq!(config.editor().staged(PhysicalKey::LeftShift), items);
    assert_eq!(config.editor().staged(PhysicalKey::RightShift), items);
    assert!(config.editor().staged(PhysicalKey::I).is_none());
}

#[test]
fn double_clicks_outside_windows_reach_the_stage() {
    let (probe, mut ui) = in_game();
    ui.send_cursor_move(Point::new(100, 200));
    ui.doubleclick();
    assert!(
        probe
            .stage
            .events()
            .contains(&StageEvent::DoubleClick(Point::new(100, 200)))
    );
}
