//! Seedable procedural terrain and resource fill.

use grid_explorer_core::{Cell, CellId, GridDimensions, ResourceKind, TerrainKind};
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Probabilities and pass counts steering map generation.
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationSettings {
    /// Chance that a cell is seeded with water.
    pub water_chance: f64,
    /// Chance that a cell not seeded with water becomes a mountain.
    pub mountain_chance: f64,
    /// Number of in-place passes that grow water into grass.
    pub spread_passes: u32,
    /// Per-water-neighbour chance that grass floods during a spread pass.
    pub spread_factor: f64,
    /// Chance that remaining grass turns to sand.
    pub sand_chance: f64,
    /// Chance that a walkable cell carries wood.
    pub wood_chance: f64,
    /// Chance that a walkable cell without wood carries stone.
    pub stone_chance: f64,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            water_chance: 0.03,
            mountain_chance: 0.02,
            spread_passes: 4,
            spread_factor: 0.3,
            sand_chance: 0.2,
            wood_chance: 0.04,
            stone_chance: 0.04,
        }
    }
}

/// Output of a generation run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedMap {
    /// Row-major cells covering the requested dimensions.
    pub cells: Vec<Cell>,
    /// Uniformly chosen walkable, resource-free starting cell.
    pub start: Option<CellId>,
}

/// Generates a map for the provided dimensions from a seed.
///
/// Identical inputs always produce identical maps.
#[must_use]
pub fn generate(
    dimensions: GridDimensions,
    settings: &GenerationSettings,
    seed: u64,
) -> GeneratedMap {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let cells = generate_cells(dimensions, settings, &mut rng);
    let start = choose_start(&cells, &mut rng);
    GeneratedMap { cells, start }
}

fn generate_cells<R: Rng>(
    dimensions: GridDimensions,
    settings: &GenerationSettings,
    rng: &mut R,
) -> Vec<Cell> {
    let mut terrain = vec![TerrainKind::Grass; dimensions.cell_count()];

    for kind in terrain.iter_mut() {
        if rng.gen::<f64>() < settings.water_chance {
            *kind = TerrainKind::Water;
        } else if rng.gen::<f64>() < settings.mountain_chance {
            *kind = TerrainKind::Mountain;
        }
    }

    // Passes mutate in place, so water placed earlier in a pass feeds later cells.
    for _ in 0..settings.spread_passes {
        for index in 0..terrain.len() {
            if terrain[index] != TerrainKind::Grass {
                continue;
            }
            let water_neighbors = dimensions
                .neighbors_of(CellId::new(index as u32))
                .filter(|neighbor| terrain[neighbor.slot()] == TerrainKind::Water)
                .count();
            if rng.gen::<f64>() < water_neighbors as f64 * settings.spread_factor {
                terrain[index] = TerrainKind::Water;
            }
        }
    }

    for kind in terrain.iter_mut() {
        if *kind == TerrainKind::Grass && rng.gen::<f64>() < settings.sand_chance {
            *kind = TerrainKind::Sand;
        }
    }

    terrain
        .into_iter()
        .map(|kind| {
            if !kind.is_passable() {
                return Cell::new(kind, None);
            }
            let roll = rng.gen::<f64>();
            let resource = if roll < settings.wood_chance {
                Some(ResourceKind::Wood)
            } else if roll < settings.wood_chance + settings.stone_chance {
                Some(ResourceKind::Stone)
            } else {
                None
            };
            Cell::new(kind, resource)
        })
        .collect()
}

fn choose_start<R: Rng>(cells: &[Cell], rng: &mut R) -> Option<CellId> {
    let candidates: Vec<CellId> = cells
        .iter()
        .enumerate()
        .filter(|(_, cell)| cell.terrain().is_passable() && cell.resource().is_none())
        .map(|(index, _)| CellId::new(index as u32))
        .collect();
    candidates.choose(rng).copied()
}
