//! Turns key presses into world updates.

use tactics_core::{Action, Event};
use tactics_system_bootstrap::Bootstrap;
use tactics_system_input::Input;
use tactics_system_strategy::Strategies;
use tactics_world::{apply, query, Game};
use tracing::{debug, info, warn};

/// Number of consecutive computer actions tolerated after a single key press.
pub(crate) const DEFAULT_CPU_LIMIT: usize = 64;

/// Systems that feed actions into the world on behalf of a terminal session.
#[derive(Debug)]
pub(crate) struct Session {
    bootstrap: Bootstrap,
    strategies: Strategies,
    input: Input,
    cpu_limit: usize,
}

impl Session {
    pub(crate) fn new(input: Input, cpu_limit: usize) -> Self {
        Self {
            bootstrap: Bootstrap,
            strategies: Strategies::default(),
            input,
            cpu_limit,
        }
    }

    pub(crate) fn bootstrap(&mut self) -> &mut Bootstrap {
        &mut self.bootstrap
    }

    /// Applies the action bound to `key`, then lets computer players act
    /// until control returns to a human.
    ///
    /// Returns `None` when the key is unbound or meaningless in the current
    /// room; the game is handed back untouched in that case.
    pub(crate) fn press(&mut self, game: Game, key: &str) -> (Game, Option<Vec<Event>>) {
        let Some(action) = self.input.handle(query::room_kind(&game), key) else {
            warn!(key, room = ?query::room_kind(&game), "key has no action here");
            return (game, None);
        };

        let mut events = Vec::new();
        let game = self.dispatch(game, action, &mut events);
        (game, Some(events))
    }

    fn dispatch(&mut self, game: Game, action: Action, events: &mut Vec<Event>) -> Game {
        let mut game = self.step(game, action, events);

        let mut cpu_actions = 0;
        while let Some(action) = self.strategies.cpu_action(&game) {
            if query::should_terminate(&game) {
                break;
            }
            if cpu_actions == self.cpu_limit {
                warn!(limit = self.cpu_limit, "computer players keep acting, handing control back");
                break;
            }
            cpu_actions += 1;
            game = self.step(game, action, events);
        }
        game
    }

    fn step(&mut self, game: Game, action: Action, events: &mut Vec<Event>) -> Game {
        let first = events.len();
        let game = apply(game, action, &mut self.bootstrap, events);
        for event in &events[first..] {
            match event {
                Event::TurnAdvanced { .. } | Event::UnitDefeated { .. } | Event::QuitRequested => {
                    info!(?event, "game event");
                }
                _ => debug!(?event, "game event"),
            }
        }
        if events[first..].iter().any(Event::changes_game) {
            for effect in query::graphics(&game) {
                debug!(depth = effect.depth(), "effect produced");
            }
        }
        game
    }
}
