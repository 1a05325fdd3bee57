#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure bootstrap system that prepares a fresh exploration session.

use grid_explorer_core::{Command, Event, CONTROLS_HINT, WELCOME_BANNER};
use grid_explorer_world::{
    self as world,
    generation::{generate, GenerationSettings},
    MapConfig, World, WorldError,
};
use thiserror::Error;
use tracing::info;

/// Errors raised while launching a session.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BootstrapError {
    /// The generated map could not back a session.
    #[error(transparent)]
    World(#[from] WorldError),
    /// Generation left no walkable, resource-free cell for the token.
    #[error("generated map (seed {seed}) has no free starting cell")]
    NoStartingCell {
        /// Seed that produced the map.
        seed: u64,
    },
}

/// Generates maps and places the token to start a session.
#[derive(Debug, Default)]
pub struct Bootstrap {
    settings: GenerationSettings,
}

impl Bootstrap {
    /// Creates a bootstrap system using the provided generation settings.
    #[must_use]
    pub fn new(settings: GenerationSettings) -> Self {
        Self { settings }
    }

    /// Derives the banner that should be shown when the experience starts.
    #[must_use]
    pub fn welcome_banner(&self) -> &'static str {
        WELCOME_BANNER
    }

    /// Short description of the click controls.
    #[must_use]
    pub fn controls_hint(&self) -> &'static str {
        CONTROLS_HINT
    }

    /// Generates a map for `config` from `seed` and places the token on it.
    ///
    /// Events produced by the placement are appended to `out_events`.
    pub fn launch(
        &self,
        config: MapConfig,
        seed: u64,
        out_events: &mut Vec<Event>,
    ) -> Result<World, BootstrapError> {
        let map = generate(config.dimensions(), &self.settings, seed);
        let start = map.start.ok_or(BootstrapError::NoStartingCell { seed })?;

        let mut world = World::new(config, map.cells)?;
        world::apply(&mut world, Command::PlaceToken { cell: start }, out_events);
        info!(
            seed,
            columns = config.dimensions().columns(),
            rows = config.dimensions().rows(),
            start = start.get(),
            "session launched"
        );
        Ok(world)
    }
}
