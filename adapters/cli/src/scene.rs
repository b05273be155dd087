//! Converts the game tree into rendering descriptors.

use tactics_core::{Colour, GAME_TITLE, TILE_PIXELS};
use tactics_rendering::{
    BoardPresentation, Color, MenuLevel, MenuPresentation, Presentation, RenderingError, Scene,
    UnitPresentation,
};
use tactics_world::{query, Battle, Game, Menu, PlayerKind, Room};

const CLEAR_COLOUR: Colour = Colour::from_rgb(0x10, 0x10, 0x18);
const PAUSE_TITLE: &str = "Paused";

/// Describes the frame showing `game`.
pub(crate) fn presentation(game: &Game) -> Result<Presentation, RenderingError> {
    let mut scene = scene_for(query::room(game))?;
    if let Scene::Battlefield(board) = &mut scene {
        board.effects = query::graphics(game).to_vec();
    }
    Ok(Presentation::new(GAME_TITLE, Color::from(CLEAR_COLOUR), scene))
}

fn scene_for(room: &Room) -> Result<Scene, RenderingError> {
    match room {
        Room::MainMenu(menu) => Ok(Scene::Menu(menu_presentation(GAME_TITLE, menu)?)),
        Room::PauseMenu(menu, beneath) => Ok(Scene::Paused {
            menu: menu_presentation(PAUSE_TITLE, menu)?,
            beneath: Box::new(scene_for(beneath)?),
        }),
        Room::Battlefield(battle) => Ok(Scene::Battlefield(board_presentation(battle)?)),
    }
}

fn menu_presentation(title: &str, menu: &Menu) -> Result<MenuPresentation, RenderingError> {
    let mut levels = Vec::with_capacity(menu.depth() + 1);
    let mut level = Some(menu);
    while let Some(current) = level {
        let labels = current
            .options()
            .iter()
            .map(|option| option.label().to_owned())
            .collect();
        levels.push(MenuLevel::new(labels, current.selection())?);
        level = current.submenu();
    }
    Ok(MenuPresentation::new(title, levels))
}

fn board_presentation(battle: &Battle) -> Result<BoardPresentation, RenderingError> {
    let board = battle.board();
    let terrain = board.tiles().map(|(_, tile)| tile.terrain()).collect();
    let mut presentation =
        BoardPresentation::new(board.width(), board.height(), TILE_PIXELS as f32, terrain)?;

    for (position, tile) in board.tiles() {
        let Some(id) = tile.unit() else {
            continue;
        };
        let (Some(unit), Some(owner)) = (battle.unit(id), battle.owner_of(id)) else {
            continue;
        };
        presentation.units.push(UnitPresentation {
            position,
            glyph: glyph(unit.role().name(), owner.kind()),
            color: Color::from(owner.colour()),
            sprite: unit.sprite().clone(),
            selected: battle.selected() == Some(id),
            exhausted: battle.has_acted(id),
        });
    }
    presentation.cursor = battle.cursor();
    presentation.status = status(battle);
    Ok(presentation)
}

/// Role initial, uppercase for human armies and lowercase for computer ones.
fn glyph(role: &str, kind: &PlayerKind) -> char {
    let initial = role.chars().next().unwrap_or('?');
    match kind {
        PlayerKind::Human { .. } => initial.to_ascii_uppercase(),
        PlayerKind::Cpu { .. } => initial.to_ascii_lowercase(),
    }
}

fn status(battle: &Battle) -> String {
    let controller = match battle.active_player().map(|player| player.kind()) {
        Some(PlayerKind::Human { name }) => name.clone(),
        Some(PlayerKind::Cpu { strategy }) => format!("CPU ({strategy:?})"),
        None => "nobody".to_owned(),
    };
    format!("Turn {}: {controller}", battle.turn_count())
}
