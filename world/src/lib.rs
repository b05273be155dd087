#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative game state for the tactics engine.
//!
//! The whole game is a single owned tree rooted at [`Game`]. [`apply`] takes
//! the current game by value and returns its replacement, so every action
//! either completes or leaves the game exactly as it was.

pub mod battle;
pub mod menu;
pub mod reference;
pub mod room;

pub use battle::{Battle, Board, BoardError, Player, PlayerKind, Tile, Unit};
pub use menu::{Menu, MenuOption};
pub use reference::{GameRef, RefPath, Referent};
pub use room::{Room, MAX_PAUSE_DEPTH};

use serde::{Deserialize, Serialize};
use tactics_core::{
    Action, BattleAction, BoardPos, Colour, Direction, Event, MenuAction, Point, RoomKind, Settings,
    Sprite, TILE_PIXELS,
};
use tracing::{debug, warn};

/// Maximum nesting of actions triggering further actions.
pub const MAX_ACTION_DEPTH: usize = 32;

const DEFEAT_TINT: Colour = Colour::from_rgb(0xff, 0x60, 0x30);

/// Root of the game tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    settings: Settings,
    graphics: Vec<Sprite>,
    room: Room,
    quit: bool,
}

impl Game {
    /// Creates a running game showing `room`.
    #[must_use]
    pub fn new(settings: Settings, room: Room) -> Self {
        Self {
            settings,
            graphics: Vec::new(),
            room,
            quit: false,
        }
    }
}

/// Capabilities an action may need beyond the game itself.
///
/// Implementors supply freshly built content whenever an action replaces a
/// room, which keeps asset loading and scenario authoring out of the world.
pub trait ActionContext {
    /// Menu shown when entering the title screen.
    fn main_menu(&mut self) -> Menu;

    /// Menu shown over an interrupted room.
    fn pause_menu(&mut self) -> Menu;

    /// Battle started by [`Action::StartBattle`].
    fn new_battle(&mut self) -> Battle;
}

/// Applies `action` to `game`, returning the replacement game.
///
/// Transient effects of the previous action are replaced by those of this
/// one as soon as it changes the game. Actions that change nothing, such as
/// [`Action::Noop`] or an action aimed at another room, return the game
/// exactly as it was, effects included.
pub fn apply<C>(mut game: Game, action: Action, context: &mut C, out_events: &mut Vec<Event>) -> Game
where
    C: ActionContext + ?Sized,
{
    let previous = std::mem::take(&mut game.graphics);
    let first = out_events.len();
    let mut game = apply_nested(game, action, context, out_events, 0);
    if !out_events[first..].iter().any(Event::changes_game) {
        game.graphics = previous;
    }
    game
}

fn apply_nested<C>(
    mut game: Game,
    action: Action,
    context: &mut C,
    out_events: &mut Vec<Event>,
    depth: usize,
) -> Game
where
    C: ActionContext + ?Sized,
{
    if depth > MAX_ACTION_DEPTH {
        warn!(?action, depth, "action nesting limit reached, dropping action");
        return game;
    }
    debug!(?action, depth, room = ?game.room.kind(), "applying action");

    match action {
        Action::Noop => game,
        Action::Quit => {
            game.quit = true;
            out_events.push(Event::QuitRequested);
            game
        }
        Action::StartBattle => {
            let battle = context.new_battle();
            enter_room(game, Room::Battlefield(battle), out_events)
        }
        Action::ReturnToMainMenu => {
            let menu = context.main_menu();
            enter_room(game, Room::MainMenu(menu), out_events)
        }
        Action::Pause => pause(game, context, out_events),
        Action::Resume => resume(game, out_events),
        Action::ToggleSetting(setting) => {
            game.settings = game.settings.toggled(setting);
            out_events.push(Event::SettingToggled {
                setting,
                enabled: game.settings.get(setting),
            });
            game
        }
        Action::Sequence(actions) => actions.into_iter().fold(game, |game, action| {
            apply_nested(game, action, context, out_events, depth + 1)
        }),
        Action::MainMenu(action) => {
            apply_menu(game, RoomKind::MainMenu, action, context, out_events, depth)
        }
        Action::PauseMenu(action) => {
            apply_menu(game, RoomKind::PauseMenu, action, context, out_events, depth)
        }
        Action::Battlefield(action) => apply_battle(game, action, out_events),
    }
}

fn enter_room(mut game: Game, room: Room, out_events: &mut Vec<Event>) -> Game {
    let kind = room.kind();
    game.room = room;
    out_events.push(Event::RoomEntered { kind });
    game
}

fn ignored(game: Game, out_events: &mut Vec<Event>) -> Game {
    let room = game.room.kind();
    debug!(?room, "action does not apply to the current room");
    out_events.push(Event::ActionIgnored { room });
    game
}

fn pause<C>(mut game: Game, context: &mut C, out_events: &mut Vec<Event>) -> Game
where
    C: ActionContext + ?Sized,
{
    if game.room.kind() == RoomKind::MainMenu {
        return ignored(game, out_events);
    }
    if game.room.pause_depth() >= MAX_PAUSE_DEPTH {
        warn!(limit = MAX_PAUSE_DEPTH, "pause overlay limit reached");
        return ignored(game, out_events);
    }

    let menu = context.pause_menu();
    game.room = Room::PauseMenu(menu, Box::new(game.room));
    out_events.push(Event::RoomEntered {
        kind: RoomKind::PauseMenu,
    });
    game
}

fn resume(mut game: Game, out_events: &mut Vec<Event>) -> Game {
    match game.room {
        Room::PauseMenu(_, beneath) => {
            game.room = *beneath;
            out_events.push(Event::RoomEntered {
                kind: game.room.kind(),
            });
            game
        }
        room => {
            game.room = room;
            ignored(game, out_events)
        }
    }
}

fn apply_menu<C>(
    mut game: Game,
    expected: RoomKind,
    action: MenuAction,
    context: &mut C,
    out_events: &mut Vec<Event>,
    depth: usize,
) -> Game
where
    C: ActionContext + ?Sized,
{
    if game.room.kind() != expected {
        return ignored(game, out_events);
    }

    match action {
        MenuAction::SelectOption => {
            let bound = game.room.menu().and_then(Menu::selected_action).cloned();
            match bound {
                Some(bound) => apply_nested(game, bound, context, out_events, depth + 1),
                None => game,
            }
        }
        MenuAction::NextOption | MenuAction::PreviousOption => {
            let selection = |room: &Room| room.menu().map(|menu| menu.active().selection());
            let before = selection(&game.room);
            game.room = game.room.map_menu(|menu| match action {
                MenuAction::NextOption => menu.next_option(),
                _ => menu.previous_option(),
            });
            match selection(&game.room) {
                Some(selection) if Some(selection) != before => {
                    out_events.push(Event::SelectionChanged { selection });
                }
                _ => debug!("menu selection unchanged"),
            }
            game
        }
        MenuAction::EnterSubmenu | MenuAction::LeaveSubmenu => {
            let before = game.room.menu().map_or(0, Menu::depth);
            game.room = game.room.map_menu(|menu| match action {
                MenuAction::EnterSubmenu => menu.enter_submenu(),
                _ => menu.leave_submenu(),
            });
            let after = game.room.menu().map_or(0, Menu::depth);
            if after > before {
                out_events.push(Event::SubmenuEntered { depth: after });
            } else if after < before {
                out_events.push(Event::SubmenuLeft { depth: after });
            }
            game
        }
    }
}

fn apply_battle(mut game: Game, action: BattleAction, out_events: &mut Vec<Event>) -> Game {
    let mut battle = match game.room {
        Room::Battlefield(battle) => battle,
        room => {
            game.room = room;
            return ignored(game, out_events);
        }
    };

    match action {
        BattleAction::EndTurn => end_turn(&mut battle, out_events),
        BattleAction::MoveCursor(direction) => {
            let before = battle.cursor();
            let to = battle.move_cursor(direction);
            if to != before {
                out_events.push(Event::CursorMoved { to });
            }
        }
        BattleAction::Confirm => confirm(&mut battle, &mut game.graphics, game.settings, out_events),
        BattleAction::Cancel => deselect(&mut battle, out_events),
        BattleAction::MoveUnit { from, to } => {
            move_unit(&mut battle, &mut game.graphics, game.settings, from, to, out_events);
        }
        BattleAction::DefeatUnit { at } => match battle.defeat(at) {
            Some(unit) => {
                debug!(unit = unit.id().get(), x = at.x, y = at.y, "unit defeated");
                if game.settings.combat_animations {
                    game.graphics.push(defeat_burst(&unit, at));
                }
                out_events.push(Event::UnitDefeated { unit: unit.id(), at });
            }
            None => debug!(x = at.x, y = at.y, "no unit to defeat"),
        },
    }

    game.room = Room::Battlefield(battle);
    game
}

fn end_turn(battle: &mut Battle, out_events: &mut Vec<Event>) {
    if battle.players().is_empty() {
        debug!("battle without players, turn stays");
        return;
    }
    let turn = battle.end_turn();
    if let Some(player) = battle.active_player().map(Player::id) {
        debug!(turn, player = player.get(), "turn advanced");
        out_events.push(Event::TurnAdvanced { turn, player });
    }
}

fn deselect(battle: &mut Battle, out_events: &mut Vec<Event>) {
    if let Some(unit) = battle.selected() {
        battle.select(None);
        out_events.push(Event::UnitDeselected { unit });
    }
}

fn confirm(
    battle: &mut Battle,
    graphics: &mut Vec<Sprite>,
    settings: Settings,
    out_events: &mut Vec<Event>,
) {
    let cursor = battle.cursor();
    let origin = battle
        .selected()
        .and_then(|unit| battle.board().position_of_unit(unit));

    match origin {
        Some(from) if from == cursor => deselect(battle, out_events),
        Some(from) => move_unit(battle, graphics, settings, from, cursor, out_events),
        None => match battle.selectable(cursor) {
            Some(unit) => {
                battle.select(Some(unit));
                out_events.push(Event::UnitSelected { unit, at: cursor });
            }
            None => debug!(x = cursor.x, y = cursor.y, "nothing to select"),
        },
    }
}

fn move_unit(
    battle: &mut Battle,
    graphics: &mut Vec<Sprite>,
    settings: Settings,
    from: BoardPos,
    to: BoardPos,
    out_events: &mut Vec<Event>,
) {
    let unit = match battle.validate_move(from, to) {
        Ok(unit) => unit,
        Err(reason) => {
            debug!(?reason, "move rejected");
            out_events.push(Event::MoveRejected { reason });
            return;
        }
    };
    if let Err(error) = battle.relocate(unit, from, to) {
        warn!(%error, "validated move left the board");
        return;
    }

    out_events.push(Event::UnitMoved { unit, from, to });
    if settings.movement_animations {
        if let Some(moved) = battle.unit(unit) {
            graphics.push(
                moved
                    .sprite()
                    .clone()
                    .moving(tile_offset(from), tile_offset(to)),
            );
        }
    }
    if settings.auto_end && battle.active_player_done() {
        end_turn(battle, out_events);
    }
}

fn defeat_burst(unit: &Unit, at: BoardPos) -> Sprite {
    let spread = TILE_PIXELS / 2;
    let points = [Direction::UP, Direction::RIGHT, Direction::DOWN, Direction::LEFT]
        .into_iter()
        .map(|step| Point::new(0, 0).offset(Direction::new(step.dx * spread, step.dy * spread)))
        .collect();
    unit.sprite()
        .clone()
        .tinted(DEFEAT_TINT)
        .emitted(tile_offset(at), points)
}

fn tile_offset(pos: BoardPos) -> Point<i32> {
    let scale = |value: u32| i32::try_from(value).unwrap_or(i32::MAX).saturating_mul(TILE_PIXELS);
    Point::new(scale(pos.x), scale(pos.y))
}

/// Query functions that provide read-only access to the game state.
pub mod query {
    use tactics_core::{RoomKind, Settings, Sprite};

    use super::{Battle, Game, Menu, Player, Room};

    /// Room currently receiving input.
    #[must_use]
    pub fn room(game: &Game) -> &Room {
        &game.room
    }

    /// Variant of the current room.
    #[must_use]
    pub fn room_kind(game: &Game) -> RoomKind {
        game.room.kind()
    }

    /// Feature toggles in effect.
    #[must_use]
    pub fn settings(game: &Game) -> Settings {
        game.settings
    }

    /// Transient effects produced by the most recent action.
    #[must_use]
    pub fn graphics(game: &Game) -> &[Sprite] {
        &game.graphics
    }

    /// Innermost open menu of the current room, if it is a menu.
    #[must_use]
    pub fn active_menu(game: &Game) -> Option<&Menu> {
        game.room.menu().map(Menu::active)
    }

    /// Battle underneath any pause overlays.
    #[must_use]
    pub fn battle(game: &Game) -> Option<&Battle> {
        game.room.battle()
    }

    /// Player in control of the running battle.
    #[must_use]
    pub fn active_player(game: &Game) -> Option<&Player> {
        game.room.battle().and_then(Battle::active_player)
    }

    /// Reports whether the control loop must stop before the next tick.
    #[must_use]
    pub fn should_terminate(game: &Game) -> bool {
        game.quit
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;
    use tactics_core::{
        PlayerId, Rectangle, Role, SettingToggle, Stats, StrategyKind, Terrain, TextureKey, UnitId,
    };

    use super::*;

    const BLUE: PlayerId = PlayerId::new(0);
    const RED: PlayerId = PlayerId::new(1);

    struct Fixture;

    impl ActionContext for Fixture {
        fn main_menu(&mut self) -> Menu {
            Menu::new(vec![
                MenuOption::new("New Game", Action::StartBattle),
                MenuOption::new("Quit", Action::Quit),
            ])
        }

        fn pause_menu(&mut self) -> Menu {
            Menu::new(vec![
                MenuOption::new("Resume", Action::Resume),
                MenuOption::new("Main Menu", Action::ReturnToMainMenu),
            ])
        }

        fn new_battle(&mut self) -> Battle {
            let sprite = Sprite::cycle(
                TextureKey::new("units/lord"),
                vec![Rectangle::new(0, 0, 16, 16), Rectangle::new(16, 0, 16, 16)],
                Duration::from_millis(200),
            );
            let unit = |id| {
                Unit::new(
                    UnitId::new(id),
                    Role::Lord,
                    "Lord",
                    Stats {
                        movement: 3,
                        ..Stats::default()
                    },
                    sprite.clone(),
                )
            };
            let mut battle = Battle::new(
                vec![
                    Player::human(BLUE, "Blue", Colour::from_rgb(0, 0, 255)),
                    Player::cpu(RED, StrategyKind::Passive, Colour::from_rgb(255, 0, 0)),
                ],
                Board::new(5, 5, Terrain::Plain),
            );
            let _ = battle
                .place_unit(BLUE, unit(1), Point::new(0, 0))
                .expect("free tile");
            let _ = battle
                .place_unit(RED, unit(2), Point::new(4, 4))
                .expect("free tile");
            battle
        }
    }

    fn run(game: Game, actions: impl IntoIterator<Item = Action>) -> (Game, Vec<Event>) {
        let mut events = Vec::new();
        let game = actions.into_iter().fold(game, |game, action| {
            apply(game, action, &mut Fixture, &mut events)
        });
        (game, events)
    }

    fn in_battle(settings: Settings) -> Game {
        Game::new(settings, Room::Battlefield(Fixture.new_battle()))
    }

    #[test]
    fn pause_stacks_until_the_limit() {
        let (game, events) = run(
            in_battle(Settings::default()),
            std::iter::repeat(Action::Pause).take(MAX_PAUSE_DEPTH + 2),
        );

        assert_eq!(game.room.pause_depth(), MAX_PAUSE_DEPTH);
        assert_eq!(
            events.last(),
            Some(&Event::ActionIgnored {
                room: RoomKind::PauseMenu,
            })
        );
    }

    #[test]
    fn resume_restores_the_interrupted_battle() {
        let game = in_battle(Settings::default());
        let (resumed, _) = run(game.clone(), [Action::Pause, Action::Resume]);
        assert_eq!(resumed, game);
    }

    #[test]
    fn pause_is_ignored_on_the_main_menu() {
        let game = Game::new(Settings::default(), Room::MainMenu(Fixture.main_menu()));
        let (paused, events) = run(game.clone(), [Action::Pause, Action::Resume]);
        assert_eq!(paused, game);
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn self_selecting_menu_terminates() {
        let looping = Menu::new(vec![MenuOption::new(
            "again",
            Action::MainMenu(MenuAction::SelectOption),
        )]);
        let game = Game::new(Settings::default(), Room::MainMenu(looping));

        let (after, _) = run(game.clone(), [Action::MainMenu(MenuAction::SelectOption)]);
        assert_eq!(after, game);
    }

    #[test]
    fn toggling_a_setting_reports_its_new_value() {
        let (game, events) = run(
            in_battle(Settings::default()),
            [Action::ToggleSetting(SettingToggle::AutoEnd)],
        );
        assert!(query::settings(&game).auto_end);
        assert_eq!(
            events,
            vec![Event::SettingToggled {
                setting: SettingToggle::AutoEnd,
                enabled: true,
            }]
        );
    }

    #[test]
    fn move_emits_movement_sprite_only_when_enabled() {
        let step = Action::Battlefield(BattleAction::MoveUnit {
            from: Point::new(0, 0),
            to: Point::new(1, 2),
        });

        let (animated, _) = run(in_battle(Settings::default()), [step.clone()]);
        assert!(matches!(
            query::graphics(&animated),
            [Sprite::Movement { from, to, .. }]
                if *from == Point::new(0, 0) && *to == Point::new(16, 32)
        ));

        let still = Settings {
            movement_animations: false,
            ..Settings::default()
        };
        let (quiet, _) = run(in_battle(still), [step]);
        assert!(query::graphics(&quiet).is_empty());
    }

    #[test]
    fn graphics_are_cleared_by_the_next_change() {
        let (game, _) = run(
            in_battle(Settings::default()),
            [
                Action::Battlefield(BattleAction::DefeatUnit {
                    at: Point::new(4, 4),
                }),
                Action::Battlefield(BattleAction::EndTurn),
            ],
        );
        assert!(query::graphics(&game).is_empty());
    }

    #[test]
    fn unchanged_game_keeps_its_graphics() {
        let (moved, _) = run(
            in_battle(Settings::default()),
            [Action::Battlefield(BattleAction::MoveUnit {
                from: Point::new(0, 0),
                to: Point::new(0, 2),
            })],
        );
        assert_eq!(query::graphics(&moved).len(), 1);

        let untouched = [
            Action::Noop,
            Action::MainMenu(MenuAction::NextOption),
            Action::PauseMenu(MenuAction::SelectOption),
            Action::Resume,
            Action::Battlefield(BattleAction::Cancel),
            Action::Battlefield(BattleAction::DefeatUnit {
                at: Point::new(3, 3),
            }),
            Action::Battlefield(BattleAction::MoveUnit {
                from: Point::new(0, 2),
                to: Point::new(0, 3),
            }),
            Action::Sequence(vec![Action::Noop, Action::Resume]),
        ];
        for action in untouched {
            let (after, _) = run(moved.clone(), [action.clone()]);
            assert_eq!(after, moved, "{action:?} changed the game");
        }
    }

    #[test]
    fn cancel_reports_the_cleared_selection() {
        let (game, events) = run(
            in_battle(Settings::default()),
            [
                Action::Battlefield(BattleAction::Confirm),
                Action::Battlefield(BattleAction::Cancel),
                Action::Battlefield(BattleAction::Cancel),
            ],
        );
        assert_eq!(query::battle(&game).and_then(Battle::selected), None);
        assert_eq!(
            events,
            vec![
                Event::UnitSelected {
                    unit: UnitId::new(1),
                    at: Point::new(0, 0),
                },
                Event::UnitDeselected {
                    unit: UnitId::new(1),
                },
            ]
        );
    }

    #[test]
    fn defeat_emits_a_particle_burst() {
        let (game, events) = run(
            in_battle(Settings::default()),
            [Action::Battlefield(BattleAction::DefeatUnit {
                at: Point::new(4, 4),
            })],
        );
        assert!(matches!(
            query::graphics(&game),
            [Sprite::ParticleSystem { origin, points, .. }]
                if *origin == Point::new(64, 64) && points.len() == 4
        ));
        assert_eq!(
            events,
            vec![Event::UnitDefeated {
                unit: UnitId::new(2),
                at: Point::new(4, 4),
            }]
        );
    }

    #[test]
    fn auto_end_passes_the_turn_once_every_unit_moved() {
        let settings = Settings {
            auto_end: true,
            ..Settings::default()
        };
        let (game, events) = run(
            in_battle(settings),
            [Action::Battlefield(BattleAction::MoveUnit {
                from: Point::new(0, 0),
                to: Point::new(0, 1),
            })],
        );

        assert_eq!(query::active_player(&game).map(Player::id), Some(RED));
        assert_eq!(
            events.last(),
            Some(&Event::TurnAdvanced {
                turn: 1,
                player: RED,
            })
        );
    }

    #[test]
    fn cursor_confirm_selects_then_moves() {
        let (game, events) = run(
            in_battle(Settings::default()),
            [
                Action::Battlefield(BattleAction::Confirm),
                Action::Battlefield(BattleAction::MoveCursor(Direction::RIGHT)),
                Action::Battlefield(BattleAction::MoveCursor(Direction::DOWN)),
                Action::Battlefield(BattleAction::Confirm),
            ],
        );

        let battle = query::battle(&game).expect("battle running");
        assert_eq!(battle.board().occupant(Point::new(1, 1)), Some(UnitId::new(1)));
        assert_eq!(battle.selected(), None);
        assert_eq!(
            events.first(),
            Some(&Event::UnitSelected {
                unit: UnitId::new(1),
                at: Point::new(0, 0),
            })
        );
    }

    #[test]
    fn enemy_units_cannot_be_selected() {
        let (game, events) = run(
            in_battle(Settings::default()),
            [
                Action::Battlefield(BattleAction::EndTurn),
                Action::Battlefield(BattleAction::EndTurn),
                Action::Battlefield(BattleAction::MoveUnit {
                    from: Point::new(4, 4),
                    to: Point::new(4, 3),
                }),
            ],
        );

        assert_eq!(query::battle(&game).map(Battle::turn_count), Some(2));
        assert_eq!(
            events.last(),
            Some(&Event::MoveRejected {
                reason: tactics_core::MoveRejection::NotActivePlayer,
            })
        );
    }
}
