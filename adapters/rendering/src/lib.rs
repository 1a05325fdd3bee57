#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for grid explorer adapters.

use anyhow::Result as AnyResult;
use grid_explorer_core::{
    CellCoord, CellId, Direction, GridView, ResourceKind, ResourceTally, TerrainKind,
    ViewportWindow,
};
use std::time::Duration;

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

    /// Byte RGB channels, rounded to the nearest value.
    #[must_use]
    pub fn to_rgb_u8(self) -> (u8, u8, u8) {
        (
            channel_to_u8(self.red),
            channel_to_u8(self.green),
            channel_to_u8(self.blue),
        )
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

fn channel_to_u8(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Fill color of a terrain kind.
#[must_use]
pub const fn terrain_color(terrain: TerrainKind) -> Color {
    match terrain {
        TerrainKind::Grass => Color::from_rgb_u8(0x7c, 0xfc, 0x00),
        TerrainKind::Sand => Color::from_rgb_u8(0xf0, 0xe6, 0x8c),
        TerrainKind::Water => Color::from_rgb_u8(0x1e, 0x90, 0xff),
        TerrainKind::Mountain => Color::from_rgb_u8(0x8b, 0x45, 0x13),
    }
}

/// Marker color of a resource kind.
#[must_use]
pub const fn resource_color(resource: ResourceKind) -> Color {
    match resource {
        ResourceKind::Wood => Color::from_rgb_u8(0x8b, 0x45, 0x13),
        ResourceKind::Stone => Color::from_rgb_u8(0x80, 0x80, 0x80),
        ResourceKind::Sulfur => Color::from_rgb_u8(0x22, 0xa2, 0xc9),
    }
}

/// Disc drawn on the token's cell.
pub const TOKEN_COLOR: Color = Color::from_rgb_u8(0x00, 0x00, 0xff);

/// Outline of the pending destination.
pub const TARGET_OUTLINE: Color = Color::from_rgb_u8(0xff, 0x00, 0x00);

/// Outline of the token's cell.
pub const TOKEN_OUTLINE: Color = Color::from_rgb_u8(0xff, 0xff, 0x00);

/// Inset drawn on path cells the token has not passed yet.
pub const PATH_OUTLINE: Color = Color::from_rgb_u8(0x80, 0x00, 0x80);

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Clicked tile expressed relative to the visible window.
    pub click: Option<CellCoord>,
    /// Requested single-cell viewport pan.
    pub pan: Option<Direction>,
}

/// Token, selection, and walk state overlaid on the terrain.
#[derive(Clone, Copy, Debug, Default)]
pub struct Overlay<'a> {
    /// Cell occupied by the token.
    pub token: Option<CellId>,
    /// Pending destination.
    pub target: Option<CellId>,
    /// Planned or active path.
    pub path: &'a [CellId],
    /// Index of the token inside `path` while walking.
    pub walk_cursor: usize,
}

impl Overlay<'_> {
    fn is_future_path(&self, cell: CellId) -> bool {
        self.path
            .iter()
            .position(|step| *step == cell)
            .is_some_and(|index| index >= self.walk_cursor)
    }
}

/// Visual description of a single visible cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TilePresentation {
    /// Identifier of the cell in the full grid.
    pub cell: CellId,
    /// Absolute column/row of the cell.
    pub coord: CellCoord,
    /// Terrain forming the tile background.
    pub terrain: TerrainKind,
    /// Resource resting on the tile.
    pub resource: Option<ResourceKind>,
    /// Whether the token occupies the tile.
    pub token: bool,
    /// Whether the tile is the pending destination.
    pub target: bool,
    /// Whether the tile lies on the part of the path still ahead.
    pub future_path: bool,
}

impl TilePresentation {
    /// Background color of the tile.
    #[must_use]
    pub const fn fill(&self) -> Color {
        terrain_color(self.terrain)
    }

    /// Border color, preferring the target outline over the token outline.
    #[must_use]
    pub const fn outline(&self) -> Option<Color> {
        if self.target {
            Some(TARGET_OUTLINE)
        } else if self.token {
            Some(TOKEN_OUTLINE)
        } else if self.future_path {
            Some(PATH_OUTLINE)
        } else {
            None
        }
    }

    /// Color of the resource marker drawn on the tile.
    #[must_use]
    pub fn marker(&self) -> Option<Color> {
        self.resource.map(resource_color)
    }
}

/// Status readout displayed next to the map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Hud {
    /// Column/row of the token, once placed.
    pub token: Option<CellCoord>,
    /// Resources collected so far.
    pub tally: ResourceTally,
}

impl Hud {
    /// Human readable token position.
    #[must_use]
    pub fn position_line(&self) -> String {
        match self.token {
            Some(coord) => format!("Player position: ({}, {})", coord.column(), coord.row()),
            None => "Player position: ...".to_owned(),
        }
    }

    /// Human readable resource tally.
    #[must_use]
    pub fn resources_line(&self) -> String {
        format!(
            "Resources: Wood: {}, Stone: {}, Sulfur: {}",
            self.tally.get(ResourceKind::Wood),
            self.tally.get(ResourceKind::Stone),
            self.tally.get(ResourceKind::Sulfur),
        )
    }
}

/// Scene description combining the visible tiles and the HUD.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scene {
    /// Window the tiles were captured from.
    pub window: ViewportWindow,
    /// Visible tiles in row-major order.
    pub tiles: Vec<TilePresentation>,
    /// Status readout.
    pub hud: Hud,
}

impl Scene {
    /// Captures the visible part of `grid` with the overlay applied.
    #[must_use]
    pub fn compose(
        grid: GridView<'_>,
        window: ViewportWindow,
        overlay: Overlay<'_>,
        tally: ResourceTally,
    ) -> Self {
        let dimensions = grid.dimensions();
        let tiles = window
            .visible_cells(dimensions)
            .into_iter()
            .filter_map(|cell| {
                let tile = grid.cell(cell)?;
                Some(TilePresentation {
                    cell,
                    coord: dimensions.coord_of(cell),
                    terrain: tile.terrain(),
                    resource: tile.resource(),
                    token: overlay.token == Some(cell),
                    target: overlay.target == Some(cell),
                    future_path: overlay.is_future_path(cell),
                })
            })
            .collect();

        Self {
            window,
            tiles,
            hud: Hud {
                token: overlay.token.map(|cell| dimensions.coord_of(cell)),
                tally,
            },
        }
    }

    /// Tile shown at a column/row relative to the window's origin.
    #[must_use]
    pub fn tile_at(&self, relative: CellCoord) -> Option<&TilePresentation> {
        if relative.column() >= self.window.width() || relative.row() >= self.window.height() {
            return None;
        }
        let column = self.window.x() + relative.column();
        let row = self.window.y() + relative.row();
        self.tiles
            .iter()
            .find(|tile| tile.coord == CellCoord::new(column, row))
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Control instructions shown with the map.
    pub controls_hint: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T, H>(window_title: T, controls_hint: H, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
        H: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            controls_hint: controls_hint.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting grid explorer scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the simulated frame delta,
    /// per-frame input captured by the adapter, and may mutate the scene before
    /// it is rendered, allowing adapters to animate world snapshots
    /// deterministically.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene);
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_explorer_core::{Cell, GridDimensions, ViewportSize};

    fn sample_grid() -> (GridDimensions, Vec<Cell>) {
        let dimensions = GridDimensions::new(4, 3);
        let mut cells = vec![Cell::open(); dimensions.cell_count()];
        cells[5] = Cell::new(TerrainKind::Water, None);
        cells[6] = Cell::new(TerrainKind::Sand, Some(ResourceKind::Stone));
        (dimensions, cells)
    }

    #[test]
    fn palette_matches_reference_colors() {
        assert_eq!(terrain_color(TerrainKind::Grass).to_rgb_u8(), (124, 252, 0));
        assert_eq!(terrain_color(TerrainKind::Water).to_rgb_u8(), (30, 144, 255));
        assert_eq!(resource_color(ResourceKind::Sulfur).to_rgb_u8(), (34, 162, 201));
    }

    #[test]
    fn lighten_moves_channels_towards_white() {
        let color = Color::from_rgb_u8(0, 0, 0).lighten(0.5);
        assert_eq!(color.to_rgb_u8(), (128, 128, 128));
        assert_eq!(Color::from_rgb_u8(10, 20, 30).lighten(2.0).to_rgb_u8(), (255, 255, 255));
    }

    #[test]
    fn compose_marks_token_target_and_remaining_path() {
        let (dimensions, cells) = sample_grid();
        let grid = GridView::new(dimensions, &cells);
        let window = ViewportWindow::new(0, 0, ViewportSize::new(4, 3), dimensions);
        let path = [CellId::new(0), CellId::new(1), CellId::new(2)];
        let overlay = Overlay {
            token: Some(CellId::new(1)),
            target: Some(CellId::new(3)),
            path: &path,
            walk_cursor: 1,
        };

        let scene = Scene::compose(grid, window, overlay, ResourceTally::default());

        assert_eq!(scene.tiles.len(), 12);
        assert!(!scene.tiles[0].future_path, "already walked");
        assert!(scene.tiles[1].future_path && scene.tiles[1].token);
        assert!(scene.tiles[2].future_path);
        assert_eq!(scene.tiles[3].outline(), Some(TARGET_OUTLINE));
        assert_eq!(scene.tiles[1].outline(), Some(TOKEN_OUTLINE));
        assert_eq!(scene.tiles[6].marker(), Some(resource_color(ResourceKind::Stone)));
        assert_eq!(scene.hud.token, Some(CellCoord::new(1, 0)));
    }

    #[test]
    fn tile_lookup_is_relative_to_the_window() {
        let (dimensions, cells) = sample_grid();
        let grid = GridView::new(dimensions, &cells);
        let window = ViewportWindow::new(2, 1, ViewportSize::new(2, 2), dimensions);

        let scene = Scene::compose(grid, window, Overlay::default(), ResourceTally::default());

        let tile = scene.tile_at(CellCoord::new(0, 0)).expect("visible tile");
        assert_eq!(tile.cell, CellId::new(6));
        assert!(scene.tile_at(CellCoord::new(2, 0)).is_none());
    }

    #[test]
    fn hud_lines_describe_position_and_resources() {
        let mut tally = ResourceTally::default();
        let _ = tally.record(ResourceKind::Wood);
        let hud = Hud {
            token: Some(CellCoord::new(3, 7)),
            tally,
        };

        assert_eq!(hud.position_line(), "Player position: (3, 7)");
        assert_eq!(hud.resources_line(), "Resources: Wood: 1, Stone: 0, Sulfur: 0");
        assert_eq!(Hud::default().position_line(), "Player position: ...");
    }
}
