#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure bootstrap system that prepares the tactics experience.
//!
//! Supplies the stock menus and the stock battle whenever an action asks the
//! world for fresh content.

use std::time::Duration;

use tactics_core::{
    Action, Colour, Equipment, MenuAction, PlayerId, Point, Rectangle, Role, SettingToggle,
    Settings, Skill, Sprite, Stats, StrategyKind, Terrain, TextureKey, UnitId,
};
use tactics_world::{
    ActionContext, Battle, Board, BoardError, Game, Menu, MenuOption, Player, Room, Unit,
};
use tracing::error;

const SKIRMISH_MAP: [&str; 6] = [
    "..T...^^",
    "..TT..^.",
    "######..",
    "...~~#..",
    ".n.~~#T.",
    "%%.==...",
];

const FRAME_SIZE: i32 = 16;
const IDLE_FRAMES: i32 = 2;
const IDLE_FRAME_DURATION: Duration = Duration::from_millis(400);

const HUMAN_ID: PlayerId = PlayerId::new(0);
const CPU_ID: PlayerId = PlayerId::new(1);
const HUMAN_COLOUR: Colour = Colour::from_rgb(0x3a, 0x6e, 0xe8);
const CPU_COLOUR: Colour = Colour::from_rgb(0xd8, 0x3a, 0x3a);

/// Produces the content the world requests when rooms are replaced.
#[derive(Debug, Default)]
pub struct Bootstrap;

impl Bootstrap {
    /// Builds the game shown when the experience starts: the title menu.
    #[must_use]
    pub fn initial_game(&mut self, settings: Settings) -> Game {
        Game::new(settings, Room::MainMenu(self.main_menu()))
    }

    /// Authors the stock skirmish: one human and one computer player.
    pub fn skirmish() -> Result<Battle, BoardError> {
        let board = Board::from_rows(&SKIRMISH_MAP)?;
        let mut battle = Battle::new(
            vec![
                Player::human(HUMAN_ID, "Player", HUMAN_COLOUR),
                Player::cpu(CPU_ID, StrategyKind::Passive, CPU_COLOUR),
            ],
            board,
        );

        let roster = [
            (HUMAN_ID, Role::Lord, "Alm", Point::new(0, 0)),
            (HUMAN_ID, Role::Knight, "Lukas", Point::new(1, 0)),
            (HUMAN_ID, Role::Archer, "Python", Point::new(0, 1)),
            (CPU_ID, Role::Mage, "Kamui", Point::new(7, 5)),
            (CPU_ID, Role::Cleric, "Silque", Point::new(6, 5)),
            (CPU_ID, Role::Thief, "Saber", Point::new(7, 4)),
        ];
        for (index, (owner, role, name, at)) in (1..).zip(roster) {
            let colour = if owner == HUMAN_ID {
                HUMAN_COLOUR
            } else {
                CPU_COLOUR
            };
            let unit = recruit(UnitId::new(index), role, name, colour);
            let _ = battle.place_unit(owner, unit, at)?;
        }

        Ok(battle)
    }
}

impl ActionContext for Bootstrap {
    fn main_menu(&mut self) -> Menu {
        Menu::new(vec![
            MenuOption::new("New Game", Action::StartBattle),
            MenuOption::new("Settings", Action::MainMenu(MenuAction::EnterSubmenu))
                .with_child(settings_menu(Action::MainMenu(MenuAction::LeaveSubmenu))),
            MenuOption::new("Quit", Action::Quit),
        ])
    }

    fn pause_menu(&mut self) -> Menu {
        Menu::new(vec![
            MenuOption::new("Resume", Action::Resume),
            MenuOption::new("Settings", Action::PauseMenu(MenuAction::EnterSubmenu))
                .with_child(settings_menu(Action::PauseMenu(MenuAction::LeaveSubmenu))),
            MenuOption::new("Main Menu", Action::ReturnToMainMenu),
            MenuOption::new("Quit", Action::Quit),
        ])
    }

    fn new_battle(&mut self) -> Battle {
        Self::skirmish().unwrap_or_else(|error| {
            error!(%error, "stock skirmish is malformed, starting an empty battle");
            Battle::new(Vec::new(), Board::new(0, 0, Terrain::Plain))
        })
    }
}

fn settings_menu(back: Action) -> Menu {
    Menu::new(vec![
        MenuOption::new(
            "Combat Animations",
            Action::ToggleSetting(SettingToggle::CombatAnimations),
        ),
        MenuOption::new(
            "Movement Animations",
            Action::ToggleSetting(SettingToggle::MovementAnimations),
        ),
        MenuOption::new("Auto End Turn", Action::ToggleSetting(SettingToggle::AutoEnd)),
        MenuOption::new("Back", back),
    ])
}

fn recruit(id: UnitId, role: Role, name: &str, colour: Colour) -> Unit {
    let unit = Unit::new(id, role, name, base_stats(role), idle_sprite(role, colour));
    match role {
        Role::Lord => unit
            .with_equipment(Equipment {
                name: "Iron Sword".to_owned(),
            })
            .with_skill(Skill {
                name: "Charisma".to_owned(),
            }),
        Role::Knight => unit.with_equipment(Equipment {
            name: "Iron Lance".to_owned(),
        }),
        Role::Archer => unit.with_equipment(Equipment {
            name: "Iron Bow".to_owned(),
        }),
        Role::Mage => unit.with_equipment(Equipment {
            name: "Fire".to_owned(),
        }),
        Role::Cleric => unit.with_equipment(Equipment {
            name: "Heal".to_owned(),
        }),
        Role::Thief => unit.with_skill(Skill {
            name: "Steal".to_owned(),
        }),
    }
}

fn base_stats(role: Role) -> Stats {
    let (max_hp, attack, magic, defense, resistance, speed, movement) = match role {
        Role::Lord => (20, 6, 1, 5, 1, 7, 5),
        Role::Knight => (24, 8, 0, 10, 0, 2, 4),
        Role::Archer => (18, 6, 0, 4, 0, 6, 5),
        Role::Mage => (16, 1, 6, 2, 5, 6, 5),
        Role::Cleric => (16, 0, 5, 1, 6, 6, 5),
        Role::Thief => (16, 4, 0, 3, 1, 11, 6),
    };
    Stats {
        max_hp,
        hp: max_hp,
        attack,
        magic,
        defense,
        resistance,
        speed,
        movement,
        luck: 3,
        skill: 5,
    }
}

fn idle_sprite(role: Role, colour: Colour) -> Sprite {
    let frames = (0..IDLE_FRAMES)
        .map(|frame| Rectangle::new(frame * FRAME_SIZE, 0, FRAME_SIZE, FRAME_SIZE))
        .collect();
    Sprite::cycle(
        TextureKey::new(format!("units/{}", role.name())),
        frames,
        IDLE_FRAME_DURATION,
    )
    .tinted(colour)
}
