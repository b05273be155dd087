//! Top-level navigable contexts of the game.

use serde::{Deserialize, Serialize};
use tactics_core::RoomKind;

use crate::{battle::Battle, menu::Menu};

/// Maximum number of pause overlays stacked on top of each other.
pub const MAX_PAUSE_DEPTH: usize = 16;

/// Room currently receiving input.
///
/// Rooms form a tree: a pause overlay owns the room it interrupted and hands
/// it back untouched on resume.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Room {
    /// Title menu.
    MainMenu(Menu),
    /// Menu shown over the interrupted room.
    PauseMenu(Menu, Box<Room>),
    /// Active battle.
    Battlefield(Battle),
}

impl Room {
    /// Discriminant of the room.
    #[must_use]
    pub const fn kind(&self) -> RoomKind {
        match self {
            Self::MainMenu(_) => RoomKind::MainMenu,
            Self::PauseMenu(..) => RoomKind::PauseMenu,
            Self::Battlefield(_) => RoomKind::Battlefield,
        }
    }

    /// Menu receiving input when the room is a menu.
    #[must_use]
    pub fn menu(&self) -> Option<&Menu> {
        match self {
            Self::MainMenu(menu) | Self::PauseMenu(menu, _) => Some(menu),
            Self::Battlefield(_) => None,
        }
    }

    /// Room interrupted by a pause overlay.
    #[must_use]
    pub fn beneath(&self) -> Option<&Room> {
        match self {
            Self::PauseMenu(_, beneath) => Some(beneath.as_ref()),
            Self::MainMenu(_) | Self::Battlefield(_) => None,
        }
    }

    /// Battle underneath any pause overlays, if one exists.
    #[must_use]
    pub fn battle(&self) -> Option<&Battle> {
        let mut room = self;
        loop {
            match room {
                Self::Battlefield(battle) => return Some(battle),
                Self::PauseMenu(_, beneath) => room = beneath.as_ref(),
                Self::MainMenu(_) => return None,
            }
        }
    }

    /// Returns the room with `f` applied to its menu; battles are returned as is.
    #[must_use]
    pub fn map_menu(self, f: impl FnOnce(Menu) -> Menu) -> Self {
        match self {
            Self::MainMenu(menu) => Self::MainMenu(f(menu)),
            Self::PauseMenu(menu, beneath) => Self::PauseMenu(f(menu), beneath),
            battlefield @ Self::Battlefield(_) => battlefield,
        }
    }

    /// Number of pause overlays stacked on top of the base room.
    #[must_use]
    pub fn pause_depth(&self) -> usize {
        let mut depth = 0;
        let mut room = self;
        while let Self::PauseMenu(_, beneath) = room {
            depth += 1;
            room = beneath.as_ref();
        }
        depth
    }
}
