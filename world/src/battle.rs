//! Tile-grid battlefield, its units and the players commanding them.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tactics_core::{
    BoardPos, Colour, Direction, Equipment, Grid, GridError, MoveRejection, PlayerId, Point,
    Role, Skill, Sprite, Stats, StrategyKind, Terrain, UnitId,
};
use thiserror::Error;

use crate::reference::GameRef;

/// Failures raised while authoring a board or placing units on it.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    /// A coordinate lies outside the board.
    #[error(transparent)]
    Grid(#[from] GridError),
    /// The glyph map contained no rows.
    #[error("board map contains no rows")]
    EmptyMap,
    /// A glyph map row differs in length from the first row.
    #[error("row {row} holds {actual} tiles, expected {expected}")]
    RaggedRow {
        /// Zero-based index of the offending row.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of the offending row.
        actual: usize,
    },
    /// A glyph map contained a character that names no terrain.
    #[error("unknown terrain glyph {glyph:?} at ({x}, {y})")]
    UnknownGlyph {
        /// Offending character.
        glyph: char,
        /// Column of the character.
        x: usize,
        /// Row of the character.
        y: usize,
    },
    /// A unit was placed on a tile that already holds one.
    #[error("tile ({}, {}) is already occupied", .0.x, .0.y)]
    Occupied(BoardPos),
    /// The owner of a placed unit does not take part in the battle.
    #[error("player {} does not take part in the battle", .0.get())]
    UnknownPlayer(PlayerId),
    /// A unit with the same identifier is already on the board.
    #[error("unit {} is already on the board", .0.get())]
    DuplicateUnit(UnitId),
}

/// Single square of the board.
///
/// The occupant is stored as a key into the players' rosters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    terrain: Terrain,
    unit: Option<UnitId>,
}

impl Tile {
    /// Creates an empty tile.
    #[must_use]
    pub const fn new(terrain: Terrain) -> Self {
        Self {
            terrain,
            unit: None,
        }
    }

    /// Returns the tile with its occupant replaced.
    #[must_use]
    pub const fn with_unit(self, unit: Option<UnitId>) -> Self {
        Self {
            terrain: self.terrain,
            unit,
        }
    }

    /// Ground covering the tile.
    #[must_use]
    pub const fn terrain(&self) -> Terrain {
        self.terrain
    }

    /// Unit standing on the tile.
    #[must_use]
    pub const fn unit(&self) -> Option<UnitId> {
        self.unit
    }
}

/// Rectangular field of tiles.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    grid: Grid<Tile>,
}

impl Board {
    /// Creates a board covered entirely by `terrain`.
    #[must_use]
    pub fn new(width: u32, height: u32, terrain: Terrain) -> Self {
        Self {
            grid: Grid::new(width, height, Tile::new(terrain)),
        }
    }

    /// Authors a board from rows of terrain glyphs, top row first.
    pub fn from_rows(rows: &[&str]) -> Result<Self, BoardError> {
        let expected = rows.first().ok_or(BoardError::EmptyMap)?.chars().count();
        let mut cells = Vec::with_capacity(expected * rows.len());

        for (y, row) in rows.iter().enumerate() {
            let actual = row.chars().count();
            if actual != expected {
                return Err(BoardError::RaggedRow {
                    row: y,
                    expected,
                    actual,
                });
            }
            for (x, glyph) in row.chars().enumerate() {
                let terrain = Terrain::try_from(glyph)
                    .map_err(|_| BoardError::UnknownGlyph { glyph, x, y })?;
                cells.push(Tile::new(terrain));
            }
        }

        let width = dimension(expected)?;
        let height = dimension(rows.len())?;
        Ok(Self {
            grid: Grid::from_cells(width, height, cells)?,
        })
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.grid.width()
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.grid.height()
    }

    /// Reports whether `pos` lies on the board.
    #[must_use]
    pub const fn contains(&self, pos: BoardPos) -> bool {
        pos.x < self.grid.width() && pos.y < self.grid.height()
    }

    /// Tile at `pos`.
    pub fn tile(&self, pos: BoardPos) -> Result<&Tile, GridError> {
        self.grid.get(pos.x, pos.y)
    }

    /// Returns a board equal to this one except for the tile at `pos`.
    pub fn with_tile(&self, pos: BoardPos, tile: Tile) -> Result<Self, GridError> {
        Ok(Self {
            grid: self.grid.with_replaced(pos.x, pos.y, tile)?,
        })
    }

    /// Unit standing at `pos`, `None` for empty or off-board tiles.
    #[must_use]
    pub fn occupant(&self, pos: BoardPos) -> Option<UnitId> {
        self.tile(pos).ok().and_then(Tile::unit)
    }

    /// Tile currently holding `unit`.
    #[must_use]
    pub fn position_of_unit(&self, unit: UnitId) -> Option<BoardPos> {
        self.grid
            .iter()
            .find(|(_, tile)| tile.unit() == Some(unit))
            .map(|(pos, _)| pos)
    }

    /// Every tile with its coordinate, in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = (BoardPos, &Tile)> + '_ {
        self.grid.iter()
    }

    fn set_occupant(&mut self, pos: BoardPos, unit: Option<UnitId>) -> Result<(), GridError> {
        let tile = self.grid.get_mut(pos.x, pos.y)?;
        *tile = tile.with_unit(unit);
        Ok(())
    }
}

fn dimension(len: usize) -> Result<u32, BoardError> {
    u32::try_from(len).map_err(|_| {
        BoardError::Grid(GridError::IndexOutOfBounds {
            index: len,
            len: u32::MAX as usize,
        })
    })
}

/// Combatant placed on the board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    id: UnitId,
    role: Role,
    name: String,
    stats: Stats,
    equipment: Option<Equipment>,
    skills: Vec<Skill>,
    sprite: Sprite,
}

impl Unit {
    /// Creates a unit without equipment or skills.
    #[must_use]
    pub fn new(id: UnitId, role: Role, name: impl Into<String>, stats: Stats, sprite: Sprite) -> Self {
        Self {
            id,
            role,
            name: name.into(),
            stats,
            equipment: None,
            skills: Vec::new(),
            sprite,
        }
    }

    /// Equips the unit.
    #[must_use]
    pub fn with_equipment(mut self, equipment: Equipment) -> Self {
        self.equipment = Some(equipment);
        self
    }

    /// Teaches the unit an additional skill.
    #[must_use]
    pub fn with_skill(mut self, skill: Skill) -> Self {
        self.skills.push(skill);
        self
    }

    /// Identifier of the unit.
    #[must_use]
    pub const fn id(&self) -> UnitId {
        self.id
    }

    /// Battle role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Numeric attributes.
    #[must_use]
    pub const fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Carried item, if any.
    #[must_use]
    pub const fn equipment(&self) -> Option<&Equipment> {
        self.equipment.as_ref()
    }

    /// Known skills.
    #[must_use]
    pub fn skills(&self) -> &[Skill] {
        &self.skills
    }

    /// Idle appearance of the unit.
    #[must_use]
    pub const fn sprite(&self) -> &Sprite {
        &self.sprite
    }
}

/// Who decides a player's actions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerKind {
    /// Controlled through input.
    Human {
        /// Display name.
        name: String,
    },
    /// Controlled by a strategy.
    Cpu {
        /// Policy choosing the player's actions.
        strategy: StrategyKind,
    },
}

/// Side of the battle owning a roster of units.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    id: PlayerId,
    colour: Colour,
    units: Vec<Unit>,
    kind: PlayerKind,
}

impl Player {
    /// Creates a human player with an empty roster.
    #[must_use]
    pub fn human(id: PlayerId, name: impl Into<String>, colour: Colour) -> Self {
        Self {
            id,
            colour,
            units: Vec::new(),
            kind: PlayerKind::Human { name: name.into() },
        }
    }

    /// Creates a computer-controlled player with an empty roster.
    #[must_use]
    pub fn cpu(id: PlayerId, strategy: StrategyKind, colour: Colour) -> Self {
        Self {
            id,
            colour,
            units: Vec::new(),
            kind: PlayerKind::Cpu { strategy },
        }
    }

    /// Identifier of the player.
    #[must_use]
    pub const fn id(&self) -> PlayerId {
        self.id
    }

    /// Team colour.
    #[must_use]
    pub const fn colour(&self) -> Colour {
        self.colour
    }

    /// Units owned by the player still on the board.
    #[must_use]
    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// Controller of the player.
    #[must_use]
    pub const fn kind(&self) -> &PlayerKind {
        &self.kind
    }

    /// Strategy followed by a computer-controlled player.
    #[must_use]
    pub const fn strategy(&self) -> Option<StrategyKind> {
        match self.kind {
            PlayerKind::Cpu { strategy } => Some(strategy),
            PlayerKind::Human { .. } => None,
        }
    }

    /// Unit of this player's roster with the given identifier.
    #[must_use]
    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.iter().find(|unit| unit.id == id)
    }
}

/// Active battle: players, the board and the turn bookkeeping.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Battle {
    players: Vec<Player>,
    board: Board,
    turn_count: u32,
    cursor: BoardPos,
    selected: Option<UnitId>,
    acted: BTreeSet<UnitId>,
}

impl Battle {
    /// Creates a battle at turn zero with the cursor in the top-left corner.
    #[must_use]
    pub fn new(players: Vec<Player>, board: Board) -> Self {
        Self {
            players,
            board,
            turn_count: 0,
            cursor: Point::new(0, 0),
            selected: None,
            acted: BTreeSet::new(),
        }
    }

    /// Adds `unit` to `owner`'s roster and stands it on `at`.
    ///
    /// Returns the reference describing "the unit at `at`".
    pub fn place_unit(
        &mut self,
        owner: PlayerId,
        unit: Unit,
        at: BoardPos,
    ) -> Result<GameRef<Unit>, BoardError> {
        if self.unit(unit.id).is_some() {
            return Err(BoardError::DuplicateUnit(unit.id));
        }
        if self.board.tile(at)?.unit().is_some() {
            return Err(BoardError::Occupied(at));
        }
        let player = self
            .players
            .iter_mut()
            .find(|player| player.id == owner)
            .ok_or(BoardError::UnknownPlayer(owner))?;

        self.board.set_occupant(at, Some(unit.id))?;
        player.units.push(unit);
        Ok(GameRef::unit_at(at))
    }

    /// Participants in turn order.
    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Battlefield.
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Number of turns ended so far.
    #[must_use]
    pub const fn turn_count(&self) -> u32 {
        self.turn_count
    }

    /// Tile highlighted by the cursor.
    #[must_use]
    pub const fn cursor(&self) -> BoardPos {
        self.cursor
    }

    /// Unit picked for movement.
    #[must_use]
    pub const fn selected(&self) -> Option<UnitId> {
        self.selected
    }

    /// Reports whether `unit` already moved this turn.
    #[must_use]
    pub fn has_acted(&self, unit: UnitId) -> bool {
        self.acted.contains(&unit)
    }

    /// Player in control of the current turn.
    #[must_use]
    pub fn active_player(&self) -> Option<&Player> {
        let len = self.players.len();
        if len == 0 {
            return None;
        }
        self.players.get(self.turn_count as usize % len)
    }

    /// Player with the given identifier.
    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|player| player.id == id)
    }

    /// Player owning `unit`.
    #[must_use]
    pub fn owner_of(&self, unit: UnitId) -> Option<&Player> {
        self.players
            .iter()
            .find(|player| player.unit(unit).is_some())
    }

    /// Unit with the given identifier, whoever owns it.
    #[must_use]
    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.players.iter().find_map(|player| player.unit(id))
    }

    /// Unit standing at `pos`.
    #[must_use]
    pub fn unit_at(&self, pos: BoardPos) -> Option<&Unit> {
        self.board.occupant(pos).and_then(|id| self.unit(id))
    }

    /// Reports whether every unit of the active player has moved this turn.
    #[must_use]
    pub fn active_player_done(&self) -> bool {
        self.active_player().map_or(false, |player| {
            !player.units.is_empty() && player.units.iter().all(|unit| self.has_acted(unit.id))
        })
    }

    /// Unit at `pos` that the active player may still move this turn.
    #[must_use]
    pub fn selectable(&self, pos: BoardPos) -> Option<UnitId> {
        let active = self.active_player()?;
        active
            .unit(self.board.occupant(pos)?)
            .map(Unit::id)
            .filter(|unit| !self.has_acted(*unit))
    }

    /// Checks a move of the unit at `from` to `to` against the turn rules.
    pub fn validate_move(&self, from: BoardPos, to: BoardPos) -> Result<UnitId, MoveRejection> {
        if !self.board.contains(from) || !self.board.contains(to) {
            return Err(MoveRejection::OutOfBounds);
        }
        let unit = self.unit_at(from).ok_or(MoveRejection::NoUnit)?;
        let active = self.active_player().map(Player::id);
        if self.owner_of(unit.id).map(Player::id) != active {
            return Err(MoveRejection::NotActivePlayer);
        }
        if self.has_acted(unit.id) {
            return Err(MoveRejection::AlreadyActed);
        }
        if self.board.occupant(to).is_some() {
            return Err(MoveRejection::Occupied);
        }
        if from.manhattan_distance(to) > unit.stats.movement {
            return Err(MoveRejection::OutOfRange);
        }
        Ok(unit.id)
    }

    pub(crate) fn end_turn(&mut self) -> u32 {
        self.turn_count = self.turn_count.wrapping_add(1);
        self.acted.clear();
        self.selected = None;
        self.turn_count
    }

    pub(crate) fn move_cursor(&mut self, direction: Direction<i32>) -> BoardPos {
        let stepped = self.cursor.checked_step(direction).unwrap_or(self.cursor);
        self.cursor = Point::new(
            stepped.x.min(self.board.width().saturating_sub(1)),
            stepped.y.min(self.board.height().saturating_sub(1)),
        );
        self.cursor
    }

    pub(crate) fn select(&mut self, unit: Option<UnitId>) {
        self.selected = unit;
    }

    /// Moves a unit already checked by [`Battle::validate_move`].
    pub(crate) fn relocate(
        &mut self,
        unit: UnitId,
        from: BoardPos,
        to: BoardPos,
    ) -> Result<(), GridError> {
        self.board.set_occupant(from, None)?;
        self.board.set_occupant(to, Some(unit))?;
        let _ = self.acted.insert(unit);
        self.selected = None;
        Ok(())
    }

    /// Removes the unit at `at` from the board and its owner's roster.
    pub(crate) fn defeat(&mut self, at: BoardPos) -> Option<Unit> {
        let id = self.board.occupant(at)?;
        self.board.set_occupant(at, None).ok()?;
        let _ = self.acted.remove(&id);
        if self.selected == Some(id) {
            self.selected = None;
        }
        self.players.iter_mut().find_map(|player| {
            let index = player.units.iter().position(|unit| unit.id == id)?;
            Some(player.units.remove(index))
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;
    use tactics_core::{Rectangle, TextureKey};

    use super::*;

    const HUMAN: PlayerId = PlayerId::new(0);
    const CPU: PlayerId = PlayerId::new(1);

    fn soldier(id: u32, movement: u32) -> Unit {
        let sprite = Sprite::cycle(
            TextureKey::new("units/knight"),
            vec![Rectangle::new(0, 0, 16, 16)],
            Duration::from_millis(250),
        );
        Unit::new(
            UnitId::new(id),
            Role::Knight,
            format!("Soldier {id}"),
            Stats {
                movement,
                ..Stats::default()
            },
            sprite,
        )
    }

    fn skirmish() -> Battle {
        let mut battle = Battle::new(
            vec![
                Player::human(HUMAN, "Alm", Colour::from_rgb(0, 0, 255)),
                Player::cpu(CPU, StrategyKind::Passive, Colour::from_rgb(255, 0, 0)),
            ],
            Board::new(4, 4, Terrain::Plain),
        );
        let _ = battle
            .place_unit(HUMAN, soldier(1, 2), Point::new(0, 0))
            .expect("free tile");
        let _ = battle
            .place_unit(CPU, soldier(2, 2), Point::new(3, 3))
            .expect("free tile");
        battle
    }

    #[test]
    fn from_rows_reads_glyphs_row_by_row() {
        let board = Board::from_rows(&["..^", "T~#"]).expect("valid map");
        assert_eq!(board.width(), 3);
        assert_eq!(board.height(), 2);
        assert_eq!(board.tile(Point::new(2, 0)).map(Tile::terrain), Ok(Terrain::Mountain));
        assert_eq!(board.tile(Point::new(1, 1)).map(Tile::terrain), Ok(Terrain::River));
    }

    #[test]
    fn from_rows_rejects_malformed_maps() {
        assert_eq!(Board::from_rows(&[]), Err(BoardError::EmptyMap));
        assert_eq!(
            Board::from_rows(&["...", ".."]),
            Err(BoardError::RaggedRow {
                row: 1,
                expected: 3,
                actual: 2,
            })
        );
        assert_eq!(
            Board::from_rows(&[".?"]),
            Err(BoardError::UnknownGlyph {
                glyph: '?',
                x: 1,
                y: 0,
            })
        );
    }

    #[test]
    fn place_unit_rejects_conflicts() {
        let mut battle = skirmish();
        assert_eq!(
            battle.place_unit(HUMAN, soldier(3, 1), Point::new(0, 0)),
            Err(BoardError::Occupied(Point::new(0, 0)))
        );
        assert_eq!(
            battle.place_unit(HUMAN, soldier(1, 1), Point::new(1, 0)),
            Err(BoardError::DuplicateUnit(UnitId::new(1)))
        );
        assert_eq!(
            battle.place_unit(PlayerId::new(9), soldier(4, 1), Point::new(1, 0)),
            Err(BoardError::UnknownPlayer(PlayerId::new(9)))
        );
        assert!(matches!(
            battle.place_unit(HUMAN, soldier(5, 1), Point::new(7, 7)),
            Err(BoardError::Grid(GridError::OutOfBounds { .. }))
        ));
    }

    #[test]
    fn validate_move_applies_turn_rules_in_order() {
        let battle = skirmish();
        let origin = Point::new(0, 0);

        assert_eq!(battle.validate_move(origin, Point::new(1, 1)), Ok(UnitId::new(1)));
        assert_eq!(
            battle.validate_move(origin, Point::new(4, 0)),
            Err(MoveRejection::OutOfBounds)
        );
        assert_eq!(
            battle.validate_move(Point::new(1, 0), Point::new(2, 0)),
            Err(MoveRejection::NoUnit)
        );
        assert_eq!(
            battle.validate_move(Point::new(3, 3), Point::new(3, 2)),
            Err(MoveRejection::NotActivePlayer)
        );
        assert_eq!(
            battle.validate_move(origin, Point::new(2, 1)),
            Err(MoveRejection::OutOfRange)
        );
    }

    #[test]
    fn relocated_unit_cannot_act_again_until_turn_ends() {
        let mut battle = skirmish();
        battle
            .relocate(UnitId::new(1), Point::new(0, 0), Point::new(1, 0))
            .expect("on board");

        assert_eq!(battle.board().occupant(Point::new(1, 0)), Some(UnitId::new(1)));
        assert_eq!(battle.board().occupant(Point::new(0, 0)), None);
        assert!(battle.active_player_done());
        assert_eq!(
            battle.validate_move(Point::new(1, 0), Point::new(2, 0)),
            Err(MoveRejection::AlreadyActed)
        );

        assert_eq!(battle.end_turn(), 1);
        assert_eq!(battle.active_player().map(Player::id), Some(CPU));
        assert!(!battle.has_acted(UnitId::new(1)));
    }

    #[test]
    fn move_cursor_clamps_to_board() {
        let mut battle = skirmish();
        assert_eq!(battle.move_cursor(Direction::UP), Point::new(0, 0));
        for _ in 0..10 {
            let _ = battle.move_cursor(Direction::RIGHT);
        }
        assert_eq!(battle.cursor(), Point::new(3, 0));
    }

    #[test]
    fn defeat_removes_unit_from_tile_and_roster() {
        let mut battle = skirmish();
        let defeated = battle.defeat(Point::new(3, 3)).expect("unit present");

        assert_eq!(defeated.id(), UnitId::new(2));
        assert_eq!(battle.board().occupant(Point::new(3, 3)), None);
        assert!(battle.player(CPU).map_or(false, |player| player.units().is_empty()));
        assert!(battle.defeat(Point::new(3, 3)).is_none());
    }
}
