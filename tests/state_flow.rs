use journey_ui::UiFacade;
use journey_ui::elements::login::{CharSelect, WorldSelect};
use journey_ui::elements::notice::Notice;
use journey_ui::elements::{ElementMessage, ElementType, UiElement};
use journey_ui::geometry::Point;
use journey_ui::keys::PhysicalKey;
use journey_ui::model::Session;
use journey_ui::services::Request;
use journey_ui::services::recording::Probe;
use journey_ui::settings::FileSettings;
use journey_ui::states::UiStateKind;

fn tap(ui: &mut UiFacade, key: PhysicalKey) {
    ui.send_key(key, true);
    ui.send_key(key, false);
}

#[test]
fn login_to_game_carries_the_world_selection() {
    let probe = Probe::new();
    let mut ui = UiFacade::new(probe.services(), Session::sample());

    for c in "admin".chars() {
        ui.send_char(c);
    }
    tap(&mut ui, PhysicalKey::Tab);
    for c in "secret".chars() {
        ui.send_char(c);
    }
    tap(&mut ui, PhysicalKey::Enter);
    assert_eq!(
        probe.network.take(),
        vec![Request::Login {
            account: "admin".into(),
            password: "secret".into()
        }]
    );

    ui.notify(ElementType::Login, ElementMessage::WorldsLoaded);
    assert!(!ui.core().registry().contains(ElementType::Login));
    assert!(ui.element::<WorldSelect>().is_some());

    tap(&mut ui, PhysicalKey::Right);
    tap(&mut ui, PhysicalKey::Enter);
    assert_eq!(
        probe.network.take(),
        vec![Request::CharlistRequest { world: 0, channel: 1 }]
    );

    ui.notify(ElementType::WorldSelect, ElementMessage::CharactersLoaded);
    assert!(!ui.is_active(ElementType::WorldSelect));
    assert!(ui.element::<CharSelect>().is_some());

    tap(&mut ui, PhysicalKey::Enter);
    assert_eq!(probe.network.take(), vec![Request::SelectCharacter { char_id: 1 }]);

    ui.change_state(UiStateKind::Game);
    assert_eq!(ui.state_kind(), UiStateKind::Game);
    assert_eq!(ui.channel_count(), 6);
    assert_eq!(ui.session().stats.channel_id, 1);
    for hud in [ElementType::StatusBar, ElementType::ChatBar, ElementType::MiniMap] {
        assert!(ui.is_active(hud), "{hud:?} should be open in game");
    }
}

#[test]
fn cash_shop_round_trip_is_requested_then_driven_by_the_host() {
    let probe = Probe::new();
    let mut ui = UiFacade::new(probe.services(), Session::sample());
    ui.change_state(UiStateKind::Game);

    tap(&mut ui, PhysicalKey::GraveAccent);
    assert_eq!(probe.network.take(), vec![Request::EnterCashShop]);
    assert_eq!(ui.state_kind(), UiStateKind::Game);

    ui.change_state(UiStateKind::CashShop);
    assert!(ui.is_active(ElementType::CashShop));
    assert!(!ui.core().registry().contains(ElementType::StatusBar));

    tap(&mut ui, PhysicalKey::Escape);
    assert_eq!(probe.network.take(), vec![Request::LeaveCashShop]);

    ui.change_state(UiStateKind::Game);
    assert!(ui.is_active(ElementType::StatusBar));
    assert!(!ui.core().registry().contains(ElementType::CashShop));
}

#[test]
fn closing_the_client_quits_from_login_and_asks_in_game() {
    let probe = Probe::new();
    let mut ui = UiFacade::new(probe.services(), Session::sample());
    ui.change_state(UiStateKind::Game);
    ui.send_close();
    assert!(ui.is_active(ElementType::Quit));
    assert!(!ui.is_quit());

    let probe = Probe::new();
    let mut ui = UiFacade::new(probe.services(), Session::sample());
    ui.send_close();
    assert!(ui.is_quit());
}

#[test]
fn closing_at_login_quits_even_under_a_notice() {
    let probe = Probe::new();
    let mut ui = UiFacade::new(probe.services(), Session::sample());
    tap(&mut ui, PhysicalKey::Enter);
    assert!(ui.is_active(ElementType::Notice));
    ui.send_close();
    assert!(ui.is_quit());
}

#[test]
fn closing_past_the_login_window_asks_first() {
    let probe = Probe::new();
    let mut ui = UiFacade::new(probe.services(), Session::sample());
    ui.notify(ElementType::Login, ElementMessage::WorldsLoaded);
    assert!(!ui.core().registry().contains(ElementType::Login));

    ui.send_close();
    assert!(!ui.is_quit());
    assert_eq!(
        ui.element::<Notice>().map(|n| n.message()),
        Some("Are you sure you want to quit?")
    );
}

#[test]
fn window_positions_survive_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");

    let probe = Probe::new();
    let mut services = probe.services();
    services.settings = Box::new(FileSettings::open(&path));
    let mut ui = UiFacade::new(services, Session::sample());
    ui.change_state(UiStateKind::Game);
    tap(&mut ui, PhysicalKey::I);
    ui.send_cursor_move(Point::new(500, 90));
    ui.send_cursor_button(true);
    ui.send_cursor_move(Point::new(400, 140));
    ui.send_cursor_button(false);
    drop(ui);

    let saved = FileSettings::read(&path).unwrap();
    assert_eq!(saved.positions.get("ItemInventory"), Some(&Point::new(380, 130)));

    let mut services = probe.services();
    services.settings = Box::new(FileSettings::open(&path));
    let mut ui = UiFacade::new(services, Session::sample());
    ui.change_state(UiStateKind::Game);
    tap(&mut ui, PhysicalKey::I);
    let position = ui
        .core()
        .registry()
        .get(ElementType::ItemInventory)
        .map(|e| e.position());
    assert_eq!(position, Some(Point::new(380, 130)));
}
