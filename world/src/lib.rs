#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative session state management for the grid explorer.

use std::time::Duration;

use grid_explorer_core::{
    Cell, CellId, Command, Direction, Event, GridDimensions, GridView, ResourceTally,
    ViewportSize, ViewportWindow,
};
use thiserror::Error;
use tracing::{debug, info};

pub mod generation;
pub mod navigation;

/// Errors raised while constructing a session.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum WorldError {
    /// The grid must contain at least one row and one column.
    #[error("grid must have positive dimensions (received {columns}x{rows})")]
    EmptyGrid {
        /// Requested number of columns.
        columns: u32,
        /// Requested number of rows.
        rows: u32,
    },
    /// The viewport must contain at least one row and one column.
    #[error("viewport must have positive dimensions (received {width}x{height})")]
    EmptyViewport {
        /// Requested viewport width.
        width: u32,
        /// Requested viewport height.
        height: u32,
    },
    /// The viewport cannot be larger than the grid it frames.
    #[error(
        "viewport {width}x{height} does not fit inside the {columns}x{rows} grid"
    )]
    ViewportExceedsGrid {
        /// Requested viewport width.
        width: u32,
        /// Requested viewport height.
        height: u32,
        /// Grid columns.
        columns: u32,
        /// Grid rows.
        rows: u32,
    },
    /// The supplied cells do not cover the grid exactly.
    #[error("expected {expected} cells for the grid but received {actual}")]
    CellCountMismatch {
        /// Number of cells the dimensions require.
        expected: usize,
        /// Number of cells supplied.
        actual: usize,
    },
}

/// Validated grid and viewport dimensions for a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MapConfig {
    dimensions: GridDimensions,
    viewport: ViewportSize,
}

impl MapConfig {
    /// Validates the provided grid and viewport dimensions.
    pub fn new(dimensions: GridDimensions, viewport: ViewportSize) -> Result<Self, WorldError> {
        if dimensions.columns() == 0 || dimensions.rows() == 0 {
            return Err(WorldError::EmptyGrid {
                columns: dimensions.columns(),
                rows: dimensions.rows(),
            });
        }
        if viewport.width() == 0 || viewport.height() == 0 {
            return Err(WorldError::EmptyViewport {
                width: viewport.width(),
                height: viewport.height(),
            });
        }
        if viewport.width() > dimensions.columns() || viewport.height() > dimensions.rows() {
            return Err(WorldError::ViewportExceedsGrid {
                width: viewport.width(),
                height: viewport.height(),
                columns: dimensions.columns(),
                rows: dimensions.rows(),
            });
        }

        Ok(Self {
            dimensions,
            viewport,
        })
    }

    /// Dimensions of the full grid.
    #[must_use]
    pub const fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    /// Size of the visible window.
    #[must_use]
    pub const fn viewport(&self) -> ViewportSize {
        self.viewport
    }
}

/// Represents the authoritative state of a single exploration session.
#[derive(Debug)]
pub struct World {
    config: MapConfig,
    cells: Vec<Cell>,
    token: Option<CellId>,
    viewport: ViewportWindow,
    selection: Selection,
    walk: Option<Walk>,
    tally: ResourceTally,
    clock: Duration,
    disposed: bool,
}

impl World {
    /// Creates a session over the provided row-major cells.
    ///
    /// The token starts unset; submit [`Command::PlaceToken`] to place it.
    pub fn new(config: MapConfig, cells: Vec<Cell>) -> Result<Self, WorldError> {
        let expected = config.dimensions().cell_count();
        if cells.len() != expected {
            return Err(WorldError::CellCountMismatch {
                expected,
                actual: cells.len(),
            });
        }

        Ok(Self {
            viewport: ViewportWindow::new(0, 0, config.viewport(), config.dimensions()),
            config,
            cells,
            token: None,
            selection: Selection::default(),
            walk: None,
            tally: ResourceTally::default(),
            clock: Duration::ZERO,
            disposed: false,
        })
    }

    fn grid(&self) -> GridView<'_> {
        GridView::new(self.config.dimensions(), &self.cells)
    }

    fn is_walking(&self) -> bool {
        self.walk.is_some()
    }

    fn place_token(&mut self, cell: CellId, out_events: &mut Vec<Event>) {
        if self.token.is_some() {
            debug!(cell = cell.get(), "token already placed; ignoring placement");
            return;
        }

        let Some(tile) = self.grid().cell(cell) else {
            debug!(cell = cell.get(), "token placement outside grid");
            return;
        };
        if !tile.terrain().is_passable() || tile.resource().is_some() {
            debug!(cell = cell.get(), "token placement on blocked cell");
            return;
        }

        self.token = Some(cell);
        self.viewport =
            ViewportWindow::centered_on(self.config.dimensions(), self.config.viewport(), cell);
        out_events.push(Event::TokenPlaced { cell });
        out_events.push(Event::ViewportMoved {
            window: self.viewport,
        });
    }

    fn select_destination(
        &mut self,
        target: CellId,
        path: Vec<CellId>,
        out_events: &mut Vec<Event>,
    ) {
        if self.is_walking() {
            debug!(target = target.get(), "selection ignored while walking");
            return;
        }

        let Some(token) = self.token else {
            debug!(target = target.get(), "selection ignored without a token");
            return;
        };

        if !self.is_well_formed(token, &path) {
            debug!(target = target.get(), len = path.len(), "rejecting malformed path");
            return;
        }

        self.selection = Selection {
            target: Some(target),
            path: path.clone(),
        };
        out_events.push(Event::SelectionChanged { target, path });
    }

    fn is_well_formed(&self, token: CellId, path: &[CellId]) -> bool {
        let dimensions = self.config.dimensions();
        if path.first() != Some(&token) {
            return false;
        }
        if !path.iter().all(|cell| dimensions.contains(*cell)) {
            return false;
        }
        path.windows(2)
            .all(|pair| dimensions.are_adjacent(pair[0], pair[1]))
    }

    fn clear_selection(&mut self, out_events: &mut Vec<Event>) {
        self.selection = Selection::default();
        out_events.push(Event::SelectionCleared);
    }

    fn begin_walk(&mut self, collect: Option<CellId>, out_events: &mut Vec<Event>) {
        if self.is_walking() {
            debug!("walk already in progress; ignoring request");
            return;
        }

        if self.selection.path.is_empty() || self.token.is_none() {
            debug!("walk rejected: no planned path or token");
            self.clear_selection(out_events);
            return;
        }

        let steps = self.selection.path.len() - 1;
        self.selection.target = None;
        self.walk = Some(Walk { cursor: 0, collect });
        info!(steps, collect = ?collect.map(|cell| cell.get()), "walk_started");
        out_events.push(Event::WalkStarted { steps, collect });

        if steps == 0 {
            self.arrive(out_events);
        }
    }

    fn advance_walk(&mut self, out_events: &mut Vec<Event>) {
        let Some(walk) = self.walk else {
            debug!("no active walk to advance");
            return;
        };
        let Some(from) = self.token else {
            return;
        };

        let cursor = walk.cursor + 1;
        if let Some(&to) = self.selection.path.get(cursor) {
            self.token = Some(to);
            out_events.push(Event::TokenAdvanced { from, to });

            let window = self.viewport.follow(self.config.dimensions(), to);
            if window != self.viewport {
                self.viewport = window;
                out_events.push(Event::ViewportMoved { window });
            }
        }

        if cursor + 1 >= self.selection.path.len() {
            self.arrive(out_events);
        } else {
            self.walk = Some(Walk { cursor, ..walk });
        }
    }

    fn arrive(&mut self, out_events: &mut Vec<Event>) {
        let collect = self.walk.take().and_then(|walk| walk.collect);
        if let Some(cell) = collect {
            self.collect_resource(cell, out_events);
        }

        self.selection = Selection::default();
        if let Some(cell) = self.token {
            info!(cell = cell.get(), "walk_completed");
            out_events.push(Event::WalkCompleted { cell });
        }
    }

    fn collect_resource(&mut self, cell: CellId, out_events: &mut Vec<Event>) {
        let Some(slot) = self.cells.get_mut(cell.slot()) else {
            return;
        };
        let Some(kind) = slot.resource() else {
            debug!(cell = cell.get(), "resource already gone");
            return;
        };

        *slot = slot.without_resource();
        let total = self.tally.record(kind);
        info!(cell = cell.get(), ?kind, total, "resource_collected");
        out_events.push(Event::ResourceCollected { cell, kind, total });
    }

    fn pan_viewport(&mut self, direction: Direction, out_events: &mut Vec<Event>) {
        if self.is_walking() {
            debug!(?direction, "panning disabled while walking");
            return;
        }

        let window = self.viewport.pan(self.config.dimensions(), direction);
        if window != self.viewport {
            self.viewport = window;
            out_events.push(Event::ViewportMoved { window });
        }
    }

    fn dispose(&mut self, out_events: &mut Vec<Event>) {
        if self.walk.take().is_some() {
            debug!("cancelling active walk on dispose");
        }
        self.disposed = true;
        out_events.push(Event::SessionDisposed);
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Invalid requests never fail; they leave the session untouched apart from
/// the fail-soft selection reset documented on [`Command::BeginWalk`].
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    if world.disposed {
        debug!(?command, "session disposed; ignoring command");
        return;
    }

    match command {
        Command::PlaceToken { cell } => world.place_token(cell, out_events),
        Command::SelectDestination { target, path } => {
            world.select_destination(target, path, out_events);
        }
        Command::ClearSelection => {
            if world.is_walking() {
                debug!("selection reset ignored while walking");
            } else {
                world.clear_selection(out_events);
            }
        }
        Command::BeginWalk { collect } => world.begin_walk(collect, out_events),
        Command::AdvanceWalk => world.advance_walk(out_events),
        Command::Tick { dt } => {
            world.clock = world.clock.saturating_add(dt);
            out_events.push(Event::TimeAdvanced { dt });
        }
        Command::PanViewport { direction } => world.pan_viewport(direction, out_events),
        Command::Dispose => world.dispose(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use grid_explorer_core::{
        Cell, CellId, GridDimensions, GridView, ResourceTally, ViewportWindow,
    };

    use super::{navigation, MapConfig, World};

    /// Validated dimensions the session was created with.
    #[must_use]
    pub fn map_config(world: &World) -> MapConfig {
        world.config
    }

    /// Dimensions of the full grid.
    #[must_use]
    pub fn dimensions(world: &World) -> GridDimensions {
        world.config.dimensions()
    }

    /// Read-only view of the current grid snapshot.
    #[must_use]
    pub fn grid(world: &World) -> GridView<'_> {
        world.grid()
    }

    /// Cell stored at the identifier, if it lies inside the grid.
    #[must_use]
    pub fn cell(world: &World, cell: CellId) -> Option<Cell> {
        world.grid().cell(cell).copied()
    }

    /// Cell currently occupied by the token, if it was placed.
    #[must_use]
    pub fn token(world: &World) -> Option<CellId> {
        world.token
    }

    /// Window currently visible to the player.
    #[must_use]
    pub fn viewport(world: &World) -> ViewportWindow {
        world.viewport
    }

    /// Pending destination awaiting confirmation, if any.
    #[must_use]
    pub fn target(world: &World) -> Option<CellId> {
        world.selection.target
    }

    /// Planned path, or the path being walked.
    #[must_use]
    pub fn path(world: &World) -> &[CellId] {
        &world.selection.path
    }

    /// Index into [`path`] of the token while walking; zero when idle.
    #[must_use]
    pub fn walk_cursor(world: &World) -> usize {
        world.walk.map_or(0, |walk| walk.cursor)
    }

    /// Reports whether the token is currently walking.
    #[must_use]
    pub fn is_walking(world: &World) -> bool {
        world.is_walking()
    }

    /// Resource cell the active walk will collect on arrival.
    #[must_use]
    pub fn pending_collection(world: &World) -> Option<CellId> {
        world.walk.and_then(|walk| walk.collect)
    }

    /// Resources collected so far.
    #[must_use]
    pub fn tally(world: &World) -> ResourceTally {
        world.tally
    }

    /// Total time advanced through ticks.
    #[must_use]
    pub fn elapsed(world: &World) -> Duration {
        world.clock
    }

    /// Reports whether the session was torn down.
    #[must_use]
    pub fn is_disposed(world: &World) -> bool {
        world.disposed
    }

    /// Shortest path from `start` to `goal` over the current grid.
    ///
    /// See [`navigation::find_path`] for the exact contract.
    #[must_use]
    pub fn find_path(
        world: &World,
        start: CellId,
        goal: CellId,
        exempt: Option<CellId>,
    ) -> Vec<CellId> {
        navigation::find_path(world.grid(), start, goal, exempt)
    }

    /// Shortest path from `start` to a free cell next to `resource`.
    #[must_use]
    pub fn find_approach_path(
        world: &World,
        start: CellId,
        resource: CellId,
        exempt: Option<CellId>,
    ) -> Vec<CellId> {
        navigation::find_approach_path(world.grid(), start, resource, exempt)
    }
}

#[derive(Clone, Debug, Default)]
struct Selection {
    target: Option<CellId>,
    path: Vec<CellId>,
}

#[derive(Clone, Copy, Debug)]
struct Walk {
    cursor: usize,
    collect: Option<CellId>,
}
