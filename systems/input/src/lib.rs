#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure input system translating key presses into game actions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tactics_core::{Action, BattleAction, Direction, MenuAction, RoomKind};

/// Logical key understood by the game, independent of the physical layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum InputKey {
    /// Move up.
    Up,
    /// Move down.
    Down,
    /// Move left.
    Left,
    /// Move right.
    Right,
    /// Accept the current choice.
    Confirm,
    /// Back out of the current choice.
    Cancel,
    /// Open or close the pause menu.
    Pause,
    /// Hand control to the next player.
    EndTurn,
    /// Leave the game.
    Quit,
}

/// Mapping from raw key names to logical keys.
///
/// Names are matched case-insensitively.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, InputKey>",
    into = "BTreeMap<String, InputKey>"
)]
pub struct KeyBindings {
    bindings: BTreeMap<String, InputKey>,
}

impl KeyBindings {
    /// Bindings with no keys bound.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            bindings: BTreeMap::new(),
        }
    }

    /// Returns the bindings with `name` bound to `key`, replacing any previous binding.
    #[must_use]
    pub fn bind(mut self, name: &str, key: InputKey) -> Self {
        let _ = self.bindings.insert(name.to_lowercase(), key);
        self
    }

    /// Returns the bindings extended by `overrides`, which win on conflicts.
    #[must_use]
    pub fn merged(self, overrides: &KeyBindings) -> Self {
        overrides
            .bindings
            .iter()
            .fold(self, |bindings, (name, key)| bindings.bind(name, *key))
    }

    /// Logical key bound to the raw key `name`.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<InputKey> {
        self.bindings.get(&name.to_lowercase()).copied()
    }

    /// Raw key names with their logical keys, ordered by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, InputKey)> + '_ {
        self.bindings.iter().map(|(name, key)| (name.as_str(), *key))
    }
}

impl From<BTreeMap<String, InputKey>> for KeyBindings {
    fn from(bindings: BTreeMap<String, InputKey>) -> Self {
        bindings
            .into_iter()
            .fold(Self::empty(), |bindings, (name, key)| bindings.bind(&name, key))
    }
}

impl From<KeyBindings> for BTreeMap<String, InputKey> {
    fn from(bindings: KeyBindings) -> Self {
        bindings.bindings
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        [
            ("up", InputKey::Up),
            ("w", InputKey::Up),
            ("down", InputKey::Down),
            ("s", InputKey::Down),
            ("left", InputKey::Left),
            ("a", InputKey::Left),
            ("right", InputKey::Right),
            ("d", InputKey::Right),
            ("enter", InputKey::Confirm),
            ("space", InputKey::Confirm),
            ("escape", InputKey::Cancel),
            ("backspace", InputKey::Cancel),
            ("p", InputKey::Pause),
            ("e", InputKey::EndTurn),
            ("q", InputKey::Quit),
        ]
        .into_iter()
        .fold(Self::empty(), |bindings, (name, key)| bindings.bind(name, key))
    }
}

/// Translates raw key presses into actions for the current room.
#[derive(Clone, Debug, Default)]
pub struct Input {
    bindings: KeyBindings,
}

impl Input {
    /// Creates an input system using `bindings`.
    #[must_use]
    pub fn new(bindings: KeyBindings) -> Self {
        Self { bindings }
    }

    /// Resolves the raw key `name` and translates it for `room`.
    #[must_use]
    pub fn handle(&self, room: RoomKind, name: &str) -> Option<Action> {
        Self::translate(room, self.bindings.lookup(name)?)
    }

    /// Action a logical key triggers in `room`, if any.
    #[must_use]
    pub fn translate(room: RoomKind, key: InputKey) -> Option<Action> {
        if key == InputKey::Quit {
            return Some(Action::Quit);
        }

        match room {
            RoomKind::MainMenu => menu_action(key).map(Action::MainMenu),
            RoomKind::PauseMenu => match key {
                InputKey::Pause => Some(Action::Resume),
                _ => menu_action(key).map(Action::PauseMenu),
            },
            RoomKind::Battlefield => match key {
                InputKey::Pause => Some(Action::Pause),
                _ => battle_action(key).map(Action::Battlefield),
            },
        }
    }
}

fn menu_action(key: InputKey) -> Option<MenuAction> {
    match key {
        InputKey::Up => Some(MenuAction::PreviousOption),
        InputKey::Down => Some(MenuAction::NextOption),
        InputKey::Right => Some(MenuAction::EnterSubmenu),
        InputKey::Left | InputKey::Cancel => Some(MenuAction::LeaveSubmenu),
        InputKey::Confirm => Some(MenuAction::SelectOption),
        InputKey::Pause | InputKey::EndTurn | InputKey::Quit => None,
    }
}

fn battle_action(key: InputKey) -> Option<BattleAction> {
    match key {
        InputKey::Up => Some(BattleAction::MoveCursor(Direction::UP)),
        InputKey::Down => Some(BattleAction::MoveCursor(Direction::DOWN)),
        InputKey::Left => Some(BattleAction::MoveCursor(Direction::LEFT)),
        InputKey::Right => Some(BattleAction::MoveCursor(Direction::RIGHT)),
        InputKey::Confirm => Some(BattleAction::Confirm),
        InputKey::Cancel => Some(BattleAction::Cancel),
        InputKey::EndTurn => Some(BattleAction::EndTurn),
        InputKey::Pause | InputKey::Quit => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_ignores_case() {
        let bindings = KeyBindings::default();
        assert_eq!(bindings.lookup("Enter"), Some(InputKey::Confirm));
        assert_eq!(bindings.lookup("W"), Some(InputKey::Up));
        assert_eq!(bindings.lookup("f1"), None);
    }

    #[test]
    fn merged_overrides_win() {
        let overrides = KeyBindings::empty().bind("q", InputKey::Cancel);
        let bindings = KeyBindings::default().merged(&overrides);
        assert_eq!(bindings.lookup("q"), Some(InputKey::Cancel));
        assert_eq!(bindings.lookup("p"), Some(InputKey::Pause));
    }

    #[test]
    fn down_advances_menus_but_moves_the_cursor_in_battle() {
        assert_eq!(
            Input::translate(RoomKind::MainMenu, InputKey::Down),
            Some(Action::MainMenu(MenuAction::NextOption))
        );
        assert_eq!(
            Input::translate(RoomKind::PauseMenu, InputKey::Down),
            Some(Action::PauseMenu(MenuAction::NextOption))
        );
        assert_eq!(
            Input::translate(RoomKind::Battlefield, InputKey::Down),
            Some(Action::Battlefield(BattleAction::MoveCursor(Direction::DOWN)))
        );
    }

    #[test]
    fn pause_toggles_between_battle_and_pause_menu() {
        assert_eq!(
            Input::translate(RoomKind::Battlefield, InputKey::Pause),
            Some(Action::Pause)
        );
        assert_eq!(
            Input::translate(RoomKind::PauseMenu, InputKey::Pause),
            Some(Action::Resume)
        );
        assert_eq!(Input::translate(RoomKind::MainMenu, InputKey::Pause), None);
    }

    #[test]
    fn end_turn_only_applies_in_battle() {
        assert_eq!(Input::translate(RoomKind::MainMenu, InputKey::EndTurn), None);
        assert_eq!(
            Input::translate(RoomKind::Battlefield, InputKey::EndTurn),
            Some(Action::Battlefield(BattleAction::EndTurn))
        );
    }
}
