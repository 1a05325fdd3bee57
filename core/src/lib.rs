#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the grid explorer.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative session world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! for systems to react to deterministically. Grid addressing and viewport
//! framing live here because every layer needs the same arithmetic.

use std::time::Duration;

use serde::{Deserialize, Serialize};

mod viewport;

pub use viewport::{ViewportSize, ViewportWindow};

/// Canonical banner emitted when a session boots.
pub const WELCOME_BANNER: &str = "Welcome to Grid Explorer.";

/// Short description of the click controls shown next to the map.
pub const CONTROLS_HINT: &str =
    "Click to select path, click again to move. Click resource once to select, again to collect.";

/// Fixed cadence between two consecutive steps of a walking token.
pub const STEP_INTERVAL: Duration = Duration::from_millis(300);

/// Commands that express all permissible session mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Places the token on its starting cell. Honoured once per session.
    PlaceToken {
        /// Cell the token should occupy.
        cell: CellId,
    },
    /// Stores a pending destination together with the path planned toward it.
    SelectDestination {
        /// Cell the player selected.
        target: CellId,
        /// Planned path starting at the token's current cell.
        path: Vec<CellId>,
    },
    /// Drops any pending destination and planned path.
    ClearSelection,
    /// Starts walking along the currently planned path.
    ///
    /// Without a planned path or a placed token the request is rejected and
    /// the pending selection is cleared.
    BeginWalk {
        /// Resource cell to collect on arrival, if the walk approaches one.
        collect: Option<CellId>,
    },
    /// Advances the active walk by exactly one cell.
    AdvanceWalk,
    /// Advances the session clock by the provided delta time.
    Tick {
        /// Duration of time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Shifts the viewport by a single cell in the provided direction.
    PanViewport {
        /// Direction the viewport should move toward.
        direction: Direction,
    },
    /// Tears the session down, cancelling any pending step.
    Dispose,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// Confirms that the token was placed on its starting cell.
    TokenPlaced {
        /// Cell the token occupies.
        cell: CellId,
    },
    /// Announces that the visible window moved.
    ViewportMoved {
        /// Window that became visible.
        window: ViewportWindow,
    },
    /// Announces a new pending destination.
    SelectionChanged {
        /// Cell the player selected.
        target: CellId,
        /// Path planned toward the destination.
        path: Vec<CellId>,
    },
    /// Announces that the pending destination and path were dropped.
    SelectionCleared,
    /// Confirms that the token started walking.
    WalkStarted {
        /// Number of steps required to reach the end of the path.
        steps: usize,
        /// Resource cell that will be collected on arrival, if any.
        collect: Option<CellId>,
    },
    /// Confirms that the token moved between two adjacent cells.
    TokenAdvanced {
        /// Cell the token occupied before the step.
        from: CellId,
        /// Cell the token occupies after the step.
        to: CellId,
    },
    /// Confirms that a resource was picked up and added to the tally.
    ResourceCollected {
        /// Cell the resource was removed from.
        cell: CellId,
        /// Kind of resource that was collected.
        kind: ResourceKind,
        /// Tally for the kind after the pickup.
        total: u32,
    },
    /// Announces that the token reached the end of its path.
    WalkCompleted {
        /// Cell the token rests on.
        cell: CellId,
    },
    /// Indicates that the session clock advanced.
    TimeAdvanced {
        /// Duration of time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that the session was torn down.
    SessionDisposed,
}

/// Cardinal directions used for panning and step classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Toward decreasing row indices.
    North,
    /// Toward increasing column indices.
    East,
    /// Toward increasing row indices.
    South,
    /// Toward decreasing column indices.
    West,
}

/// Row-major index of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellId(u32);

impl CellId {
    /// Creates a new cell identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Position of the cell inside a row-major cell slice.
    #[must_use]
    pub const fn slot(&self) -> usize {
        self.0 as usize
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }
}

/// Base terrain classification of a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrainKind {
    /// Ordinary open ground.
    Grass,
    /// Soft ground; walkable like grass.
    Sand,
    /// Impassable liquid.
    Water,
    /// Impassable solid rock.
    Mountain,
}

impl TerrainKind {
    /// Reports whether the terrain can ever be entered.
    #[must_use]
    pub const fn is_passable(self) -> bool {
        matches!(self, Self::Grass | Self::Sand)
    }
}

/// Collectible resources that may rest on a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    /// Timber.
    Wood,
    /// Quarried stone.
    Stone,
    /// Sulfur deposits. Recognised but never generated by the default map.
    Sulfur,
}

impl ResourceKind {
    /// Every resource kind in tally order.
    pub const ALL: [ResourceKind; 3] = [Self::Wood, Self::Stone, Self::Sulfur];
}

/// One addressable unit of the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    terrain: TerrainKind,
    resource: Option<ResourceKind>,
}

impl Cell {
    /// Creates a cell with the provided terrain and optional resource.
    #[must_use]
    pub const fn new(terrain: TerrainKind, resource: Option<ResourceKind>) -> Self {
        Self { terrain, resource }
    }

    /// Plain grass cell without a resource.
    #[must_use]
    pub const fn open() -> Self {
        Self::new(TerrainKind::Grass, None)
    }

    /// Terrain that forms the cell's base.
    #[must_use]
    pub const fn terrain(&self) -> TerrainKind {
        self.terrain
    }

    /// Resource resting on the cell, if any.
    #[must_use]
    pub const fn resource(&self) -> Option<ResourceKind> {
        self.resource
    }

    /// Returns a copy of the cell with its resource removed.
    #[must_use]
    pub const fn without_resource(self) -> Self {
        Self {
            terrain: self.terrain,
            resource: None,
        }
    }
}

/// Fixed width and height of a row-major grid.
///
/// Every addressing helper assumes the supplied [`CellId`] lies inside the
/// grid; ids are only ever produced by these helpers or validated with
/// [`GridDimensions::contains`] at the session boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridDimensions {
    columns: u32,
    rows: u32,
}

impl GridDimensions {
    /// Creates a new dimension descriptor.
    #[must_use]
    pub const fn new(columns: u32, rows: u32) -> Self {
        Self { columns, rows }
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Total number of cells contained in the grid.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        let count = u64::from(self.columns) * u64::from(self.rows);
        usize::try_from(count).unwrap_or(usize::MAX)
    }

    /// Reports whether the identifier addresses a cell inside the grid.
    #[must_use]
    pub fn contains(&self, cell: CellId) -> bool {
        cell.slot() < self.cell_count()
    }

    /// Row containing the cell.
    #[must_use]
    pub const fn row_of(&self, cell: CellId) -> u32 {
        cell.get() / self.columns
    }

    /// Column containing the cell.
    #[must_use]
    pub const fn column_of(&self, cell: CellId) -> u32 {
        cell.get() % self.columns
    }

    /// Identifier of the cell at the provided row and column.
    #[must_use]
    pub const fn index_of(&self, row: u32, column: u32) -> CellId {
        CellId::new(row * self.columns + column)
    }

    /// Column/row coordinate of the cell.
    #[must_use]
    pub const fn coord_of(&self, cell: CellId) -> CellCoord {
        CellCoord::new(self.column_of(cell), self.row_of(cell))
    }

    /// Identifier of the cell at the coordinate, if it lies inside the grid.
    #[must_use]
    pub const fn cell_at(&self, coord: CellCoord) -> Option<CellId> {
        if coord.column() < self.columns && coord.row() < self.rows {
            Some(self.index_of(coord.row(), coord.column()))
        } else {
            None
        }
    }

    /// In-bounds orthogonal neighbours in up, down, left, right order.
    #[must_use]
    pub fn neighbors_of(&self, cell: CellId) -> Neighbors {
        let row = self.row_of(cell);
        let column = self.column_of(cell);
        let mut neighbors = Neighbors::default();

        if row > 0 {
            neighbors.push(self.index_of(row - 1, column));
        }
        if row + 1 < self.rows {
            neighbors.push(self.index_of(row + 1, column));
        }
        if column > 0 {
            neighbors.push(self.index_of(row, column - 1));
        }
        if column + 1 < self.columns {
            neighbors.push(self.index_of(row, column + 1));
        }

        neighbors
    }

    /// Reports whether two cells share an edge.
    #[must_use]
    pub fn are_adjacent(&self, a: CellId, b: CellId) -> bool {
        self.coord_of(a).manhattan_distance(self.coord_of(b)) == 1
    }
}

/// Fixed-capacity iterator over the orthogonal neighbours of a cell.
#[derive(Clone, Debug, Default)]
pub struct Neighbors {
    buffer: [Option<CellId>; 4],
    len: usize,
    cursor: usize,
}

impl Neighbors {
    fn push(&mut self, cell: CellId) {
        if self.len < self.buffer.len() {
            self.buffer[self.len] = Some(cell);
            self.len += 1;
        }
    }
}

impl Iterator for Neighbors {
    type Item = CellId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.len {
            return None;
        }

        let value = self.buffer[self.cursor];
        self.cursor += 1;
        value
    }
}

/// Read-only view over a grid snapshot.
#[derive(Clone, Copy, Debug)]
pub struct GridView<'a> {
    dimensions: GridDimensions,
    cells: &'a [Cell],
}

impl<'a> GridView<'a> {
    /// Captures a new view backed by the provided row-major cell slice.
    #[must_use]
    pub const fn new(dimensions: GridDimensions, cells: &'a [Cell]) -> Self {
        Self { dimensions, cells }
    }

    /// Dimensions of the viewed grid.
    #[must_use]
    pub const fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    /// Cell stored at the identifier, if it lies inside the grid.
    #[must_use]
    pub fn cell(&self, cell: CellId) -> Option<&'a Cell> {
        self.cells.get(cell.slot())
    }

    /// Underlying row-major cells.
    #[must_use]
    pub const fn cells(&self) -> &'a [Cell] {
        self.cells
    }
}

/// Running count of collected resources, one entry per kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceTally {
    wood: u32,
    stone: u32,
    sulfur: u32,
}

impl ResourceTally {
    /// Number of collected resources of the provided kind.
    #[must_use]
    pub const fn get(&self, kind: ResourceKind) -> u32 {
        match kind {
            ResourceKind::Wood => self.wood,
            ResourceKind::Stone => self.stone,
            ResourceKind::Sulfur => self.sulfur,
        }
    }

    /// Records a single pickup and returns the new total for the kind.
    pub fn record(&mut self, kind: ResourceKind) -> u32 {
        let slot = match kind {
            ResourceKind::Wood => &mut self.wood,
            ResourceKind::Stone => &mut self.stone,
            ResourceKind::Sulfur => &mut self.sulfur,
        };
        *slot = slot.saturating_add(1);
        *slot
    }

    /// Sum of every entry.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.wood + self.stone + self.sulfur
    }
}
