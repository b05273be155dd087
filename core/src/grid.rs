//! Dense, fixed-size, row-major container addressed by coordinate or linear index.

use serde::{de, Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::geometry::Point;

/// Failures raised when addressing a [`Grid`].
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum GridError {
    /// The requested coordinate lies outside the grid.
    #[error("cell ({x}, {y}) lies outside the {width}x{height} grid")]
    OutOfBounds {
        /// Requested column.
        x: u32,
        /// Requested row.
        y: u32,
        /// Grid width.
        width: u32,
        /// Grid height.
        height: u32,
    },
    /// The requested linear index lies past the last cell.
    #[error("index {index} lies outside a grid of {len} cells")]
    IndexOutOfBounds {
        /// Requested linear index.
        index: usize,
        /// Number of cells held by the grid.
        len: usize,
    },
    /// The supplied cell vector does not match the requested dimensions.
    #[error("expected {expected} cells for the grid, received {actual}")]
    SizeMismatch {
        /// `width * height`.
        expected: usize,
        /// Number of cells supplied.
        actual: usize,
    },
}

/// Immutable `width` by `height` grid stored in row-major order.
///
/// Every `(x, y)` with `x < width` and `y < height` maps to the linear index
/// `y * width + x`. Replacing a cell produces a new grid.
///
/// Deserialization goes through [`Grid::from_cells`], so a payload whose
/// cells do not cover the dimensions is rejected.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Grid<T> {
    width: u32,
    height: u32,
    cells: Vec<T>,
}

impl<T: Clone> Grid<T> {
    /// Creates a grid with every cell set to `fill`.
    #[must_use]
    pub fn new(width: u32, height: u32, fill: T) -> Self {
        let len = cell_count(width, height);
        Self {
            width,
            height,
            cells: vec![fill; len],
        }
    }

    /// Returns a grid equal to this one except at `(x, y)`.
    ///
    /// The receiver is left untouched.
    pub fn with_replaced(&self, x: u32, y: u32, value: T) -> Result<Self, GridError> {
        self.clone().replaced(x, y, value)
    }
}

impl<T> Grid<T> {
    /// Creates a grid from cells already laid out in row-major order.
    pub fn from_cells(width: u32, height: u32, cells: Vec<T>) -> Result<Self, GridError> {
        let expected = cell_count(width, height);
        if cells.len() != expected {
            return Err(GridError::SizeMismatch {
                expected,
                actual: cells.len(),
            });
        }

        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Total number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether the grid has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns the cell stored at `(x, y)`.
    pub fn get(&self, x: u32, y: u32) -> Result<&T, GridError> {
        let index = self.index_of(x, y)?;
        let len = self.cells.len();
        self.cells
            .get(index)
            .ok_or(GridError::IndexOutOfBounds { index, len })
    }

    /// Mutable access to the cell at `(x, y)` of an owned grid.
    pub fn get_mut(&mut self, x: u32, y: u32) -> Result<&mut T, GridError> {
        let index = self.index_of(x, y)?;
        let len = self.cells.len();
        self.cells
            .get_mut(index)
            .ok_or(GridError::IndexOutOfBounds { index, len })
    }

    /// Consumes the grid and returns it with `(x, y)` replaced by `value`.
    ///
    /// Observably identical to [`Grid::with_replaced`] but reuses the
    /// storage of an owned grid.
    pub fn replaced(mut self, x: u32, y: u32, value: T) -> Result<Self, GridError> {
        *self.get_mut(x, y)? = value;
        Ok(self)
    }

    /// Converts a coordinate into its linear index.
    pub fn index_of(&self, x: u32, y: u32) -> Result<usize, GridError> {
        if x >= self.width || y >= self.height {
            return Err(GridError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }

        Ok(y as usize * self.width as usize + x as usize)
    }

    /// Converts a linear index back into its coordinate.
    pub fn position_of(&self, index: usize) -> Result<Point<u32>, GridError> {
        if index >= self.cells.len() {
            return Err(GridError::IndexOutOfBounds {
                index,
                len: self.cells.len(),
            });
        }

        let width = self.width as usize;
        let x = u32::try_from(index % width).map_err(|_| GridError::IndexOutOfBounds {
            index,
            len: self.cells.len(),
        })?;
        let y = u32::try_from(index / width).map_err(|_| GridError::IndexOutOfBounds {
            index,
            len: self.cells.len(),
        })?;
        Ok(Point::new(x, y))
    }

    /// Iterates over every cell together with its coordinate in linear order.
    pub fn iter(&self) -> impl Iterator<Item = (Point<u32>, &T)> + '_ {
        let width = self.width.max(1);
        (0_u32..).zip(self.cells.iter()).map(move |(index, cell)| {
            (Point::new(index % width, index / width), cell)
        })
    }
}

impl<'de, T> Deserialize<'de> for Grid<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw<T> {
            width: u32,
            height: u32,
            cells: Vec<T>,
        }

        let raw = Raw::deserialize(deserializer)?;
        Self::from_cells(raw.width, raw.height, raw.cells).map_err(de::Error::custom)
    }
}

fn cell_count(width: u32, height: u32) -> usize {
    let count = u64::from(width) * u64::from(height);
    usize::try_from(count).unwrap_or(usize::MAX)
}
