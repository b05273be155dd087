use pretty_assertions::assert_eq;
use tactics_core::{Action, Event, MenuAction, Point, RoomKind, SettingToggle, Settings, UnitId};
use tactics_system_bootstrap::Bootstrap;
use tactics_world::{apply, query, Game, GameRef, Menu, MenuOption, PlayerKind, Unit};

fn play(game: Game, actions: &[Action]) -> (Game, Vec<Event>) {
    let mut bootstrap = Bootstrap;
    let mut events = Vec::new();
    let game = actions.iter().cloned().fold(game, |game, action| {
        apply(game, action, &mut bootstrap, &mut events)
    });
    (game, events)
}

fn labels(menu: &Menu) -> Vec<&str> {
    menu.options().iter().map(MenuOption::label).collect()
}

#[test]
fn starts_on_the_title_menu() {
    let game = Bootstrap.initial_game(Settings::default());
    assert_eq!(query::room_kind(&game), RoomKind::MainMenu);

    let menu = query::active_menu(&game).expect("title menu");
    assert_eq!(labels(menu), vec!["New Game", "Settings", "Quit"]);
}

#[test]
fn new_game_opens_the_stock_skirmish() {
    let game = Bootstrap.initial_game(Settings::default());
    let (game, events) = play(game, &[Action::MainMenu(MenuAction::SelectOption)]);

    assert_eq!(
        events,
        vec![Event::RoomEntered {
            kind: RoomKind::Battlefield,
        }]
    );
    let battle = query::battle(&game).expect("battle running");
    assert!(matches!(
        battle.players()[0].kind(),
        PlayerKind::Human { .. }
    ));
    assert!(battle.players()[1].strategy().is_some());
    assert_eq!(
        GameRef::unit_at(Point::new(0, 0))
            .resolve(&game)
            .map(Unit::name),
        Some("Alm")
    );
}

#[test]
fn settings_toggle_through_the_title_submenu() {
    let game = Bootstrap.initial_game(Settings::default());
    let (game, _) = play(
        game,
        &[
            Action::MainMenu(MenuAction::NextOption),
            Action::MainMenu(MenuAction::SelectOption),
            Action::MainMenu(MenuAction::PreviousOption),
            Action::MainMenu(MenuAction::PreviousOption),
            Action::MainMenu(MenuAction::SelectOption),
            Action::MainMenu(MenuAction::NextOption),
            Action::MainMenu(MenuAction::SelectOption),
        ],
    );

    assert!(query::settings(&game).auto_end);
    assert_eq!(query::room(&game).menu().map(Menu::depth), Some(0));
}

#[test]
fn pause_menu_can_leave_for_the_title() {
    let game = Bootstrap.initial_game(Settings::default());
    let (game, _) = play(game, &[Action::StartBattle, Action::Pause]);
    let menu = query::active_menu(&game).expect("pause menu");
    assert_eq!(labels(menu), vec!["Resume", "Settings", "Main Menu", "Quit"]);

    let (game, events) = play(
        game,
        &[
            Action::PauseMenu(MenuAction::NextOption),
            Action::PauseMenu(MenuAction::NextOption),
            Action::PauseMenu(MenuAction::SelectOption),
        ],
    );
    assert_eq!(query::room_kind(&game), RoomKind::MainMenu);
    assert_eq!(
        events.last(),
        Some(&Event::RoomEntered {
            kind: RoomKind::MainMenu,
        })
    );
}

#[test]
fn pause_settings_apply_to_the_running_game() {
    let game = Bootstrap.initial_game(Settings::default());
    let (game, events) = play(
        game,
        &[
            Action::StartBattle,
            Action::Pause,
            Action::PauseMenu(MenuAction::NextOption),
            Action::PauseMenu(MenuAction::EnterSubmenu),
            Action::PauseMenu(MenuAction::SelectOption),
        ],
    );

    assert!(!query::settings(&game).combat_animations);
    assert!(events.contains(&Event::SettingToggled {
        setting: SettingToggle::CombatAnimations,
        enabled: false,
    }));

    let (game, _) = play(game, &[Action::PauseMenu(MenuAction::LeaveSubmenu), Action::Resume]);
    assert_eq!(query::room_kind(&game), RoomKind::Battlefield);
    assert!(query::battle(&game)
        .and_then(|battle| battle.unit(UnitId::new(1)))
        .is_some());
}
