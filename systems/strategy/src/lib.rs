#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Decision seam for computer-controlled players.
//!
//! A strategy looks at the battle and answers with the action its player
//! takes next. Only the passive policy exists; richer policies plug in by
//! implementing [`Strategy`] and registering under a new [`StrategyKind`].

use tactics_core::{Action, BattleAction, PlayerId, RoomKind, StrategyKind};
use tactics_world::{query, Battle, Game};
use tracing::debug;

/// Policy choosing a computer player's next action.
pub trait Strategy {
    /// Action `player` takes in `battle`.
    fn decide(&mut self, battle: &Battle, player: PlayerId) -> Action;
}

/// Strategy that never acts and ends every turn immediately.
#[derive(Clone, Copy, Debug, Default)]
pub struct PassiveStrategy;

impl Strategy for PassiveStrategy {
    fn decide(&mut self, _battle: &Battle, _player: PlayerId) -> Action {
        Action::Battlefield(BattleAction::EndTurn)
    }
}

/// Registry mapping each [`StrategyKind`] to its implementation.
#[derive(Debug, Default)]
pub struct Strategies {
    passive: PassiveStrategy,
}

impl Strategies {
    /// Implementation of `kind`.
    pub fn for_kind(&mut self, kind: StrategyKind) -> &mut dyn Strategy {
        match kind {
            StrategyKind::Passive => &mut self.passive,
        }
    }

    /// Action of the computer player in control, if one is.
    ///
    /// Paused battles and human turns yield `None`.
    pub fn cpu_action(&mut self, game: &Game) -> Option<Action> {
        if query::room_kind(game) != RoomKind::Battlefield {
            return None;
        }
        let battle = query::battle(game)?;
        let player = battle.active_player()?;
        let kind = player.strategy()?;

        let action = self.for_kind(kind).decide(battle, player.id());
        debug!(player = player.id().get(), ?kind, ?action, "cpu decided");
        Some(action)
    }
}

#[cfg(test)]
mod tests {
    use tactics_core::{Settings, Terrain};
    use tactics_world::{Board, Player, Room};

    use super::*;

    #[test]
    fn passive_strategy_ends_the_turn() {
        let battle = Battle::new(Vec::new(), Board::new(1, 1, Terrain::Plain));
        assert_eq!(
            PassiveStrategy.decide(&battle, PlayerId::new(0)),
            Action::Battlefield(BattleAction::EndTurn)
        );
    }

    #[test]
    fn human_turns_are_left_to_input() {
        let battle = Battle::new(
            vec![Player::human(
                PlayerId::new(0),
                "Human",
                tactics_core::Colour::WHITE,
            )],
            Board::new(2, 2, Terrain::Plain),
        );
        let game = Game::new(Settings::default(), Room::Battlefield(battle));
        assert_eq!(Strategies::default().cpu_action(&game), None);
    }
}
