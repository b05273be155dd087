#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for tactics adapters.
//!
//! Backends receive a [`Presentation`] describing one frame. Texture and font
//! loading, blitting and windowing stay with the backend; this crate only
//! describes what to draw and offers the menu layout and sprite sampling
//! every backend needs.

pub mod text;
pub mod visuals;

use anyhow::Result as AnyResult;
use std::{error::Error, fmt};
use tactics_core::{BoardPos, Colour, Sprite, Terrain};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Opaque white, the identity of [`Color::multiply`].
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Channel-wise product, used to apply tints.
    #[must_use]
    pub fn multiply(self, other: Self) -> Self {
        Self {
            red: self.red * other.red,
            green: self.green * other.green,
            blue: self.blue * other.blue,
            alpha: self.alpha * other.alpha,
        }
    }
}

impl From<Colour> for Color {
    fn from(colour: Colour) -> Self {
        Self::from_rgb_u8(colour.red(), colour.green(), colour.blue())
    }
}

/// One level of an open menu tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuLevel {
    /// Option labels in display order.
    pub labels: Vec<String>,
    /// Index of the highlighted label.
    pub selection: usize,
}

impl MenuLevel {
    /// Creates a menu level, validating the selection.
    pub fn new(labels: Vec<String>, selection: usize) -> Result<Self, RenderingError> {
        if !labels.is_empty() && selection >= labels.len() {
            return Err(RenderingError::SelectionOutOfRange {
                selection,
                len: labels.len(),
            });
        }
        Ok(Self { labels, selection })
    }
}

/// Menu to draw, outermost level first.
///
/// Only the last level receives input; earlier levels show the path taken.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuPresentation {
    /// Heading drawn above the options.
    pub title: String,
    /// Open levels, the root menu first.
    pub levels: Vec<MenuLevel>,
}

impl MenuPresentation {
    /// Creates a menu descriptor.
    #[must_use]
    pub fn new<T>(title: T, levels: Vec<MenuLevel>) -> Self
    where
        T: Into<String>,
    {
        Self {
            title: title.into(),
            levels,
        }
    }
}

/// Unit drawn on the board.
#[derive(Clone, Debug, PartialEq)]
pub struct UnitPresentation {
    /// Tile the unit stands on.
    pub position: BoardPos,
    /// Character used by text backends.
    pub glyph: char,
    /// Team color.
    pub color: Color,
    /// Idle appearance.
    pub sprite: Sprite,
    /// Whether the unit is picked for movement.
    pub selected: bool,
    /// Whether the unit already moved this turn.
    pub exhausted: bool,
}

/// Battlefield to draw.
#[derive(Clone, Debug, PartialEq)]
pub struct BoardPresentation {
    /// Number of tile columns.
    pub columns: u32,
    /// Number of tile rows.
    pub rows: u32,
    /// Side length of a tile in pixels.
    pub tile_length: f32,
    /// Terrain in row-major order.
    pub terrain: Vec<Terrain>,
    /// Units standing on the board.
    pub units: Vec<UnitPresentation>,
    /// Tile under the cursor.
    pub cursor: BoardPos,
    /// Transient effects produced by the latest action, in pixel offsets from the board origin.
    pub effects: Vec<Sprite>,
    /// One-line summary of the turn.
    pub status: String,
}

impl BoardPresentation {
    /// Creates a board descriptor without units or effects.
    pub fn new(
        columns: u32,
        rows: u32,
        tile_length: f32,
        terrain: Vec<Terrain>,
    ) -> Result<Self, RenderingError> {
        if !(tile_length > 0.0) {
            return Err(RenderingError::InvalidTileLength { tile_length });
        }
        let expected = columns as usize * rows as usize;
        if terrain.len() != expected {
            return Err(RenderingError::TerrainSizeMismatch {
                expected,
                actual: terrain.len(),
            });
        }

        Ok(Self {
            columns,
            rows,
            tile_length,
            terrain,
            units: Vec::new(),
            cursor: BoardPos::new(0, 0),
            effects: Vec::new(),
            status: String::new(),
        })
    }

    /// Terrain of the tile at `pos`.
    #[must_use]
    pub fn terrain_at(&self, pos: BoardPos) -> Option<Terrain> {
        if pos.x >= self.columns || pos.y >= self.rows {
            return None;
        }
        let index = pos.y as usize * self.columns as usize + pos.x as usize;
        self.terrain.get(index).copied()
    }

    /// Unit standing on `pos`.
    #[must_use]
    pub fn unit_at(&self, pos: BoardPos) -> Option<&UnitPresentation> {
        self.units.iter().find(|unit| unit.position == pos)
    }
}

/// Content of a frame.
#[derive(Clone, Debug, PartialEq)]
pub enum Scene {
    /// Title menu.
    Menu(MenuPresentation),
    /// Pause menu drawn over the interrupted scene.
    Paused {
        /// Pause menu.
        menu: MenuPresentation,
        /// Scene shown underneath.
        beneath: Box<Scene>,
    },
    /// Active battle.
    Battlefield(BoardPresentation),
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting tactics scenes.
pub trait RenderingBackend {
    /// Draws one frame.
    fn present(&mut self, presentation: &Presentation) -> AnyResult<()>;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Tiles must have a positive side length.
    InvalidTileLength {
        /// Provided length that failed validation.
        tile_length: f32,
    },
    /// The terrain list does not cover the board exactly.
    TerrainSizeMismatch {
        /// `columns * rows`.
        expected: usize,
        /// Number of terrain entries supplied.
        actual: usize,
    },
    /// A menu selection points past its labels.
    SelectionOutOfRange {
        /// Provided selection.
        selection: usize,
        /// Number of labels.
        len: usize,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTileLength { tile_length } => {
                write!(f, "tile_length must be positive (received {tile_length})")
            }
            Self::TerrainSizeMismatch { expected, actual } => {
                write!(
                    f,
                    "board needs {expected} terrain entries (received {actual})"
                )
            }
            Self::SelectionOutOfRange { selection, len } => {
                write!(f, "selection {selection} exceeds {len} menu labels")
            }
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn plains(columns: u32, rows: u32) -> Vec<Terrain> {
        vec![Terrain::Plain; columns as usize * rows as usize]
    }

    #[test]
    fn board_creation_rejects_non_positive_tile_length_without_panicking() {
        let error = BoardPresentation::new(2, 2, 0.0, plains(2, 2))
            .expect_err("zero tile_length must be rejected");

        assert_eq!(error, RenderingError::InvalidTileLength { tile_length: 0.0 });
        assert!(BoardPresentation::new(2, 2, f32::NAN, plains(2, 2)).is_err());
    }

    #[test]
    fn board_creation_rejects_partial_terrain() {
        let error = BoardPresentation::new(3, 2, 16.0, plains(2, 2))
            .expect_err("terrain must cover the board");

        assert_eq!(
            error,
            RenderingError::TerrainSizeMismatch {
                expected: 6,
                actual: 4,
            }
        );
    }

    #[test]
    fn terrain_at_reads_row_major_order() {
        let mut terrain = plains(3, 2);
        terrain[4] = Terrain::Forest;
        let board = BoardPresentation::new(3, 2, 16.0, terrain).expect("valid board");

        assert_eq!(board.terrain_at(BoardPos::new(1, 1)), Some(Terrain::Forest));
        assert_eq!(board.terrain_at(BoardPos::new(3, 0)), None);
    }

    #[test]
    fn menu_level_rejects_selection_past_labels() {
        let labels = vec!["Resume".to_owned(), "Quit".to_owned()];
        assert!(MenuLevel::new(labels.clone(), 1).is_ok());
        assert_eq!(
            MenuLevel::new(labels, 2),
            Err(RenderingError::SelectionOutOfRange {
                selection: 2,
                len: 2,
            })
        );
        assert!(MenuLevel::new(Vec::new(), 0).is_ok());
    }

    #[test]
    fn multiply_by_white_is_identity() {
        let teal = Color::from_rgb_u8(0, 128, 128);
        assert_eq!(teal.multiply(Color::WHITE), teal);
        assert_eq!(Color::from(Colour::WHITE), Color::WHITE);
    }
}
