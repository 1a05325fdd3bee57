//! Viewport framing rules shared by the world and presentation adapters.

use serde::{Deserialize, Serialize};

use crate::{CellId, Direction, GridDimensions};

/// Fixed width and height of the visible window measured in cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViewportSize {
    width: u32,
    height: u32,
}

impl ViewportSize {
    /// Creates a new viewport size.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of visible columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of visible rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }
}

/// Visible sub-rectangle of the full grid.
///
/// `x` and `y` always satisfy `0 <= x <= columns - width` and
/// `0 <= y <= rows - height` once produced by any of the framing policies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViewportWindow {
    x: u32,
    y: u32,
    width: u32,
    height: u32,
}

impl ViewportWindow {
    /// Creates a window at the provided origin, clamped to the grid.
    #[must_use]
    pub fn new(x: u32, y: u32, size: ViewportSize, dimensions: GridDimensions) -> Self {
        Self {
            x,
            y,
            width: size.width(),
            height: size.height(),
        }
        .clamped(dimensions)
    }

    /// Window centered on `cell`, clamped to the grid.
    #[must_use]
    pub fn centered_on(dimensions: GridDimensions, size: ViewportSize, cell: CellId) -> Self {
        let column = dimensions.column_of(cell);
        let row = dimensions.row_of(cell);
        Self::new(
            column.saturating_sub(size.width() / 2),
            row.saturating_sub(size.height() / 2),
            size,
            dimensions,
        )
    }

    /// Scrolls the smallest amount that brings `cell` back into view.
    ///
    /// A cell left of (above) the window becomes the first visible column
    /// (row); a cell at or past the right (bottom) edge becomes the last.
    #[must_use]
    pub fn follow(self, dimensions: GridDimensions, cell: CellId) -> Self {
        let column = dimensions.column_of(cell);
        let row = dimensions.row_of(cell);

        let mut x = self.x;
        if column < self.x {
            x = column;
        } else if column >= self.x + self.width {
            x = column + 1 - self.width;
        }

        let mut y = self.y;
        if row < self.y {
            y = row;
        } else if row >= self.y + self.height {
            y = row + 1 - self.height;
        }

        Self { x, y, ..self }.clamped(dimensions)
    }

    /// Shifts the window by a single cell, clamped to the grid.
    #[must_use]
    pub fn pan(self, dimensions: GridDimensions, direction: Direction) -> Self {
        let (x, y) = match direction {
            Direction::North => (self.x, self.y.saturating_sub(1)),
            Direction::South => (self.x, self.y.saturating_add(1)),
            Direction::West => (self.x.saturating_sub(1), self.y),
            Direction::East => (self.x.saturating_add(1), self.y),
        };
        Self { x, y, ..self }.clamped(dimensions)
    }

    /// Restricts the origin to the valid range for the grid.
    #[must_use]
    pub fn clamped(self, dimensions: GridDimensions) -> Self {
        Self {
            x: self.x.min(dimensions.columns().saturating_sub(self.width)),
            y: self.y.min(dimensions.rows().saturating_sub(self.height)),
            ..self
        }
    }

    /// Leftmost visible column.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Topmost visible row.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.y
    }

    /// Number of visible columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of visible rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Reports whether `cell` lies inside the window.
    #[must_use]
    pub fn contains(&self, dimensions: GridDimensions, cell: CellId) -> bool {
        let column = dimensions.column_of(cell);
        let row = dimensions.row_of(cell);
        (self.x..self.x + self.width).contains(&column)
            && (self.y..self.y + self.height).contains(&row)
    }

    /// Visible cells in row-major order, skipping any outside the grid.
    #[must_use]
    pub fn visible_cells(&self, dimensions: GridDimensions) -> Vec<CellId> {
        let mut cells = Vec::with_capacity((self.width * self.height) as usize);
        for row in self.y..self.y + self.height {
            for column in self.x..self.x + self.width {
                if column < dimensions.columns() && row < dimensions.rows() {
                    cells.push(dimensions.index_of(row, column));
                }
            }
        }
        cells
    }
}
