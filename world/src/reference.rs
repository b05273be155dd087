//! Non-owning keys into the game tree.
//!
//! A [`GameRef`] stores where to look, never what was found. Every call to
//! [`GameRef::resolve`] walks the game it is given, so a reference survives
//! any number of state replacements and reports absence once its target is
//! gone.

use std::{
    fmt,
    hash::{Hash, Hasher},
    marker::PhantomData,
};

use serde::{Deserialize, Serialize};
use tactics_core::{BoardPos, PlayerId, UnitId};

use crate::{
    battle::{Battle, Player, Tile, Unit},
    Game,
};

/// Lookup path stored by a [`GameRef`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RefPath {
    /// Whichever unit stands on the tile.
    UnitAt(BoardPos),
    /// The unit with the identifier, wherever it stands.
    Unit(UnitId),
    /// The tile at the position.
    TileAt(BoardPos),
    /// The player with the identifier.
    Player(PlayerId),
}

/// Part of a battle that a [`GameRef`] can point at.
pub trait Referent {
    /// Follows `path` through `battle`.
    fn lookup<'battle>(path: &RefPath, battle: &'battle Battle) -> Option<&'battle Self>;
}

impl Referent for Unit {
    fn lookup<'battle>(path: &RefPath, battle: &'battle Battle) -> Option<&'battle Self> {
        match *path {
            RefPath::UnitAt(pos) => battle.unit_at(pos),
            RefPath::Unit(id) => battle.unit(id),
            RefPath::TileAt(_) | RefPath::Player(_) => None,
        }
    }
}

impl Referent for Tile {
    fn lookup<'battle>(path: &RefPath, battle: &'battle Battle) -> Option<&'battle Self> {
        match *path {
            RefPath::TileAt(pos) => battle.board().tile(pos).ok(),
            RefPath::UnitAt(_) | RefPath::Unit(_) | RefPath::Player(_) => None,
        }
    }
}

impl Referent for Player {
    fn lookup<'battle>(path: &RefPath, battle: &'battle Battle) -> Option<&'battle Self> {
        match *path {
            RefPath::Player(id) => battle.player(id),
            RefPath::UnitAt(_) | RefPath::Unit(_) | RefPath::TileAt(_) => None,
        }
    }
}

/// Typed, serializable key resolving to a `T` inside a [`Game`].
#[derive(Serialize, Deserialize)]
#[serde(bound = "")]
pub struct GameRef<T> {
    path: RefPath,
    #[serde(skip)]
    target: PhantomData<fn() -> T>,
}

impl<T> GameRef<T> {
    const fn from_path(path: RefPath) -> Self {
        Self {
            path,
            target: PhantomData,
        }
    }

    /// Lookup path followed on resolution.
    #[must_use]
    pub const fn path(&self) -> RefPath {
        self.path
    }
}

impl<T: Referent> GameRef<T> {
    /// Re-derives the target from the current game.
    ///
    /// Returns `None` when no battle is running or the target no longer exists.
    #[must_use]
    pub fn resolve<'game>(&self, game: &'game Game) -> Option<&'game T> {
        T::lookup(&self.path, game.room.battle()?)
    }
}

impl GameRef<Unit> {
    /// Refers to whichever unit stands at `pos`.
    #[must_use]
    pub const fn unit_at(pos: BoardPos) -> Self {
        Self::from_path(RefPath::UnitAt(pos))
    }

    /// Refers to the unit with identifier `id`.
    #[must_use]
    pub const fn unit(id: UnitId) -> Self {
        Self::from_path(RefPath::Unit(id))
    }
}

impl GameRef<Tile> {
    /// Refers to the tile at `pos`.
    #[must_use]
    pub const fn tile_at(pos: BoardPos) -> Self {
        Self::from_path(RefPath::TileAt(pos))
    }
}

impl GameRef<Player> {
    /// Refers to the player with identifier `id`.
    #[must_use]
    pub const fn player(id: PlayerId) -> Self {
        Self::from_path(RefPath::Player(id))
    }
}

// Manual impls: derives would demand the same traits of `T`.
impl<T> Clone for GameRef<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for GameRef<T> {}

impl<T> PartialEq for GameRef<T> {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl<T> Eq for GameRef<T> {}

impl<T> Hash for GameRef<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state);
    }
}

impl<T> fmt::Debug for GameRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("GameRef").field(&self.path).finish()
    }
}
