use journey_ui::UiFacade;
use journey_ui::elements::key_config::KeyConfig;
use journey_ui::elements::login::{ACCOUNT_FIELD, Login};
use journey_ui::elements::notice::Notice;
use journey_ui::elements::{ElementType, UiElement};
use journey_ui::geometry::Point;
use journey_ui::keys::PhysicalKey;
use journey_ui::model::Session;
use journey_ui::services::Sound;
use journey_ui::services::recording::Probe;
use journey_ui::states::UiStateKind;

fn in_game() -> (Probe, UiFacade) {
    let probe = Probe::new();
    let mut ui = UiFacade::new(probe.services(), Session::sample());
    ui.change_state(UiStateKind::Game);
    probe.audio.clear();
    (probe, ui)
}

fn tap(ui: &mut UiFacade, key: PhysicalKey) {
    ui.send_key(key, true);
    ui.send_key(key, false);
}

fn click(ui: &mut UiFacade, pos: Point) {
    ui.send_cursor_move(pos);
    ui.send_cursor_button(true);
    ui.send_cursor_button(false);
}

#[test]
fn inventory_toggles_in_place() {
    let (probe, mut ui) = in_game();
    tap(&mut ui, PhysicalKey::I);
    assert_eq!(ui.core().registry().order().last(), Some(&ElementType::ItemInventory));
    assert!(ui.is_active(ElementType::ItemInventory));
    assert_eq!(probe.audio.sounds(), vec![Sound::MenuUp]);

    tap(&mut ui, PhysicalKey::I);
    assert!(!ui.is_active(ElementType::ItemInventory));
    assert!(ui.core().registry().order().contains(&ElementType::ItemInventory));
    assert_eq!(probe.audio.sounds(), vec![Sound::MenuUp, Sound::MenuDown]);
}

#[test]
fn dropping_an_equip_on_its_own_slot_only_plays_a_cue() {
    let (probe, mut ui) = in_game();
    tap(&mut ui, PhysicalKey::E);
    probe.audio.clear();

    // Hat is the first cell of the equipment grid.
    let hat = Point::new(280, 120);
    ui.send_cursor_move(hat);
    ui.send_cursor_button(true);
    assert!(ui.core().icon().is_some());
    ui.send_cursor_move(hat + Point::new(3, 2));
    ui.send_cursor_button(false);

    assert!(ui.core().icon().is_none());
    assert!(probe.network.sent().is_empty());
    assert_eq!(probe.audio.sounds(), vec![Sound::DragStart, Sound::DragEnd]);
}

#[test]
fn window_drag_saves_once_on_release() {
    let (probe, mut ui) = in_game();
    tap(&mut ui, PhysicalKey::I);

    ui.send_cursor_move(Point::new(500, 90));
    ui.send_cursor_button(true);
    ui.send_cursor_move(Point::new(520, 90));
    ui.send_cursor_move(Point::new(550, 90));
    assert!(probe.settings.saves().is_empty());
    ui.send_cursor_button(false);

    let moved = Point::new(530, 80);
    assert_eq!(
        ui.core()
            .registry()
            .get(ElementType::ItemInventory)
            .map(|e| e.position()),
        Some(moved)
    );
    assert_eq!(probe.settings.saves(), vec![(ElementType::ItemInventory, moved)]);
}

#[test]
fn ctrl_c_copies_the_focused_field() {
    let probe = Probe::new();
    let mut ui = UiFacade::new(probe.services(), Session::sample());
    for c in "hero".chars() {
        ui.send_char(c);
    }

    ui.send_key(PhysicalKey::LeftControl, true);
    tap(&mut ui, PhysicalKey::C);
    ui.send_key(PhysicalKey::LeftControl, false);

    assert_eq!(probe.clipboard.contents(), "hero");
    let login = ui.element::<Login>().expect("login screen");
    assert_eq!(login.textfield(ACCOUNT_FIELD).map(|f| f.text()), Some("hero"));
}

#[test]
fn escape_in_dirty_key_config_asks_to_save() {
    let (probe, mut ui) = in_game();
    tap(&mut ui, PhysicalKey::Backslash);
    let (from, to) = {
        let config = ui.element::<KeyConfig>().expect("key config open");
        let from = config.key_cell(PhysicalKey::I).expect("I cell").origin + Point::new(4, 4);
        let to = config.key_cell(PhysicalKey::F12).expect("F12 cell").origin + Point::new(4, 4);
        (from, to)
    };

    ui.send_cursor_move(from);
    ui.send_cursor_button(true);
    ui.send_cursor_move(to);
    ui.send_cursor_button(false);
    assert!(ui.element::<KeyConfig>().is_some_and(|c| c.editor().is_dirty()));

    tap(&mut ui, PhysicalKey::Escape);
    let notice = ui.element::<Notice>().expect("save prompt");
    assert_eq!(notice.message(), "Do you want to save your changes?");
    assert!(ui.is_active(ElementType::KeyConfig));
    assert!(probe.stage.keys().is_empty());
    assert!(probe.network.sent().is_empty());
}

#[test]
fn notice_closing_itself_leaves_dispatch_intact() {
    let probe = Probe::new();
    let mut ui = UiFacade::new(probe.services(), Session::sample());
    tap(&mut ui, PhysicalKey::Enter);
    assert_eq!(
        ui.element::<Notice>().map(|n| n.message()),
        Some("Please enter your ID.")
    );
    assert_eq!(ui.core().focused(), Some(ElementType::Notice));

    tap(&mut ui, PhysicalKey::Enter);
    assert!(!ui.core().registry().contains(ElementType::Notice));
    assert_eq!(ui.core().focused(), None);
    assert!(ui.core().registry().contains(ElementType::Login));

    // Input after the self-removal still routes normally.
    click(&mut ui, Point::new(330, 300));
    assert!(probe.network.sent().is_empty());
}
