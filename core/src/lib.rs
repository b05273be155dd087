#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the tactics engine.
//!
//! This crate defines the value types and the message surface that connect
//! adapters, the authoritative game tree and pure systems. Adapters translate
//! raw input into [`Action`] values, the world applies each action to the
//! current game via its `apply` entry point and reports what happened as
//! [`Event`] values. Renderers only ever read the resulting state and the
//! [`Sprite`] trees it carries.

pub mod geometry;
pub mod grid;
pub mod sprite;

pub use geometry::{BoardPos, Direction, Point, Rectangle};
pub use grid::{Grid, GridError};
pub use sprite::{Sprite, SpriteBase, TextureKey};

use serde::{Deserialize, Serialize};

/// Title shown by adapters when the experience boots.
pub const GAME_TITLE: &str = "Tactics";

/// Side length of a board tile in sprite offset units.
pub const TILE_PIXELS: i32 = 16;

/// Commands expressing every permissible transition of the game.
///
/// Room-scoped families only act when the current room matches; applied in
/// any other room they leave the game unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Leaves the game unchanged.
    Noop,
    /// Flags the game for termination.
    Quit,
    /// Replaces the current room with a freshly prepared battle.
    StartBattle,
    /// Replaces the current room with the main menu.
    ReturnToMainMenu,
    /// Covers the current battle (or pause overlay) with the pause menu.
    Pause,
    /// Removes the topmost pause overlay, restoring the room beneath.
    Resume,
    /// Flips a single feature toggle.
    ToggleSetting(SettingToggle),
    /// Applies each action in order.
    Sequence(Vec<Action>),
    /// Navigation within the main menu.
    MainMenu(MenuAction),
    /// Navigation within the pause menu.
    PauseMenu(MenuAction),
    /// Gameplay on the battlefield.
    Battlefield(BattleAction),
}

/// Navigation commands understood by every menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MenuAction {
    /// Moves the selection to the following option, wrapping around.
    NextOption,
    /// Moves the selection to the preceding option, wrapping around.
    PreviousOption,
    /// Applies the action bound to the selected option.
    SelectOption,
    /// Opens the submenu designated by the selected option.
    EnterSubmenu,
    /// Closes the innermost open submenu.
    LeaveSubmenu,
}

/// Gameplay commands understood while a battle is active.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattleAction {
    /// Hands control to the next player.
    EndTurn,
    /// Moves the board cursor, clamped to the board.
    MoveCursor(Direction<i32>),
    /// Selects the unit under the cursor or moves the selected unit to it.
    Confirm,
    /// Clears the current selection.
    Cancel,
    /// Moves a unit between two tiles.
    MoveUnit {
        /// Tile currently holding the unit.
        from: BoardPos,
        /// Destination tile.
        to: BoardPos,
    },
    /// Removes the unit at the given tile from the battle.
    DefeatUnit {
        /// Tile holding the defeated unit.
        at: BoardPos,
    },
}

/// Feature toggle that can be flipped by [`Action::ToggleSetting`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SettingToggle {
    /// [`Settings::combat_animations`].
    CombatAnimations,
    /// [`Settings::movement_animations`].
    MovementAnimations,
    /// [`Settings::auto_end`].
    AutoEnd,
}

/// Player-facing feature toggles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Whether defeats emit combat effects.
    pub combat_animations: bool,
    /// Whether unit moves emit movement effects.
    pub movement_animations: bool,
    /// Whether a turn ends once every unit of the active player has acted.
    pub auto_end: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            combat_animations: true,
            movement_animations: true,
            auto_end: false,
        }
    }
}

impl Settings {
    /// Reports the current value of a toggle.
    #[must_use]
    pub const fn get(&self, toggle: SettingToggle) -> bool {
        match toggle {
            SettingToggle::CombatAnimations => self.combat_animations,
            SettingToggle::MovementAnimations => self.movement_animations,
            SettingToggle::AutoEnd => self.auto_end,
        }
    }

    /// Returns a copy with the toggle flipped.
    #[must_use]
    pub fn toggled(mut self, toggle: SettingToggle) -> Self {
        match toggle {
            SettingToggle::CombatAnimations => self.combat_animations = !self.combat_animations,
            SettingToggle::MovementAnimations => {
                self.movement_animations = !self.movement_animations;
            }
            SettingToggle::AutoEnd => self.auto_end = !self.auto_end,
        }
        self
    }
}

/// Discriminant of the room variants, used where the payload is irrelevant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoomKind {
    /// The title menu.
    MainMenu,
    /// A menu overlaying an interrupted room.
    PauseMenu,
    /// An active battle.
    Battlefield,
}

/// Events reported by the world after applying an action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// The current room changed variant or was replaced.
    RoomEntered {
        /// Variant of the new room.
        kind: RoomKind,
    },
    /// The active menu moved its selection.
    SelectionChanged {
        /// Index of the newly selected option.
        selection: usize,
    },
    /// A submenu was opened.
    SubmenuEntered {
        /// Nesting depth after opening, the root menu being zero.
        depth: usize,
    },
    /// The innermost submenu was closed.
    SubmenuLeft {
        /// Nesting depth after closing.
        depth: usize,
    },
    /// A feature toggle was flipped.
    SettingToggled {
        /// Toggle that changed.
        setting: SettingToggle,
        /// New value.
        enabled: bool,
    },
    /// Control passed to the next player.
    TurnAdvanced {
        /// Turn counter after advancing.
        turn: u32,
        /// Player now in control.
        player: PlayerId,
    },
    /// The board cursor moved.
    CursorMoved {
        /// New cursor position.
        to: BoardPos,
    },
    /// A unit was selected for movement.
    UnitSelected {
        /// Selected unit.
        unit: UnitId,
        /// Tile holding the unit.
        at: BoardPos,
    },
    /// The selection was cleared.
    UnitDeselected {
        /// Unit that was selected.
        unit: UnitId,
    },
    /// A unit moved between two tiles.
    UnitMoved {
        /// Unit that moved.
        unit: UnitId,
        /// Tile left behind.
        from: BoardPos,
        /// Tile now occupied.
        to: BoardPos,
    },
    /// A move request was refused.
    MoveRejected {
        /// Why the move was refused.
        reason: MoveRejection,
    },
    /// A unit was removed from the battle.
    UnitDefeated {
        /// Unit that was removed.
        unit: UnitId,
        /// Tile it occupied.
        at: BoardPos,
    },
    /// The game was flagged for termination.
    QuitRequested,
    /// An action did not apply to the current room and was ignored.
    ActionIgnored {
        /// Room that was active when the action arrived.
        room: RoomKind,
    },
}

impl Event {
    /// Reports whether the event accompanies a change of the game.
    ///
    /// Ignored actions and refused moves leave the game as it was.
    #[must_use]
    pub const fn changes_game(&self) -> bool {
        !matches!(self, Self::ActionIgnored { .. } | Self::MoveRejected { .. })
    }
}

/// Reasons a unit move may be refused by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveRejection {
    /// One of the positions lies outside the board.
    OutOfBounds,
    /// No unit stands on the origin tile.
    NoUnit,
    /// The unit belongs to a player who is not in control.
    NotActivePlayer,
    /// The unit already acted this turn.
    AlreadyActed,
    /// The destination tile holds another unit.
    Occupied,
    /// The destination lies beyond the unit's movement range.
    OutOfRange,
}

/// Unique identifier assigned to a unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(u32);

impl UnitId {
    /// Creates a new unit identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(u32);

impl PlayerId {
    /// Creates a new player identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Opaque RGB colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Colour {
    red: u8,
    green: u8,
    blue: u8,
}

impl Colour {
    /// Pure white, the identity tint.
    pub const WHITE: Self = Self::from_rgb(0xff, 0xff, 0xff);

    /// Creates a new colour from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the colour.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the colour.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the colour.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Ground covering a single board tile.
///
/// Movement and defense modifiers are deliberately absent; rules that need
/// them attach their own tables to these variants.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "char", into = "char")]
pub enum Terrain {
    /// Open ground.
    #[default]
    Plain,
    /// Impassable high ground.
    Mountain,
    /// Woodland.
    Forest,
    /// Marshland.
    Swamp,
    /// Shallow running water.
    River,
    /// Deep water.
    Water,
    /// Raised ground.
    Hill,
    /// Paved path.
    Road,
}

impl TryFrom<char> for Terrain {
    type Error = &'static str;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            '.' => Ok(Self::Plain),
            '^' => Ok(Self::Mountain),
            'T' => Ok(Self::Forest),
            '%' => Ok(Self::Swamp),
            '~' => Ok(Self::River),
            '=' => Ok(Self::Water),
            'n' => Ok(Self::Hill),
            '#' => Ok(Self::Road),
            _ => Err("invalid terrain glyph"),
        }
    }
}

impl From<Terrain> for char {
    fn from(value: Terrain) -> Self {
        // NB. Must mirror the `TryFrom<char>` table above.
        match value {
            Terrain::Plain => '.',
            Terrain::Mountain => '^',
            Terrain::Forest => 'T',
            Terrain::Swamp => '%',
            Terrain::River => '~',
            Terrain::Water => '=',
            Terrain::Hill => 'n',
            Terrain::Road => '#',
        }
    }
}

/// Battle role of a unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Commander of an army.
    Lord,
    /// Armoured melee fighter.
    Knight,
    /// Ranged fighter.
    Archer,
    /// Offensive spellcaster.
    Mage,
    /// Healer.
    Cleric,
    /// Light skirmisher.
    Thief,
}

impl Role {
    /// Lowercase name used to derive texture keys.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Lord => "lord",
            Self::Knight => "knight",
            Self::Archer => "archer",
            Self::Mage => "mage",
            Self::Cleric => "cleric",
            Self::Thief => "thief",
        }
    }
}

/// Fixed record of a unit's numeric attributes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stats {
    /// Maximum hit points.
    pub max_hp: u32,
    /// Current hit points.
    pub hp: u32,
    /// Physical attack.
    pub attack: u32,
    /// Magical attack.
    pub magic: u32,
    /// Physical defense.
    pub defense: u32,
    /// Magical resistance.
    pub resistance: u32,
    /// Speed.
    pub speed: u32,
    /// Number of tiles the unit may travel in one turn.
    pub movement: u32,
    /// Luck.
    pub luck: u32,
    /// Skill.
    pub skill: u32,
}

/// Item carried by a unit. Only named; effects are not modelled.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Equipment {
    /// Display name.
    pub name: String,
}

/// Ability known by a unit. Only named; effects are not modelled.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Skill {
    /// Display name.
    pub name: String,
}

/// Policy a computer-controlled player follows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrategyKind {
    /// Never acts; ends every turn immediately.
    #[default]
    Passive,
}
