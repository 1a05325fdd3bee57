//! Drives the world, movement, and interaction systems frame by frame.

use std::time::Duration;

use grid_explorer_core::{CellCoord, Command, Event};
use grid_explorer_rendering::{FrameInput, Overlay, Scene};
use grid_explorer_system_interaction::Interaction;
use grid_explorer_system_movement::Movement;
use grid_explorer_world::{self as world, query, World};
use tracing::{debug, info};

/// Owns a running session and the systems that react to it.
#[derive(Debug)]
pub(crate) struct Session {
    world: World,
    movement: Movement,
    interaction: Interaction,
}

impl Session {
    /// Wraps a launched world, forwarding the launch events to the systems.
    pub(crate) fn new(world: World, launch_events: Vec<Event>) -> Self {
        let mut session = Self {
            world,
            movement: Movement::default(),
            interaction: Interaction::new(),
        };
        session.dispatch(launch_events);
        session
    }

    /// Applies one frame of input followed by `dt` of simulated time.
    pub(crate) fn advance(&mut self, dt: Duration, input: FrameInput) {
        if let Some(direction) = input.pan {
            self.submit(Command::PanViewport { direction });
        }

        if let Some(relative) = input.click {
            self.click(relative);
        }

        if !dt.is_zero() {
            self.submit(Command::Tick { dt });
        }
    }

    /// Scene describing the current viewport.
    pub(crate) fn scene(&self) -> Scene {
        Scene::compose(
            query::grid(&self.world),
            query::viewport(&self.world),
            Overlay {
                token: query::token(&self.world),
                target: query::target(&self.world),
                path: query::path(&self.world),
                walk_cursor: query::walk_cursor(&self.world),
            },
            query::tally(&self.world),
        )
    }

    /// Tears the session down, cancelling any walk in progress.
    pub(crate) fn dispose(&mut self) {
        self.submit(Command::Dispose);
        let tally = query::tally(&self.world);
        info!(
            collected = tally.total(),
            elapsed_ms = query::elapsed(&self.world).as_millis() as u64,
            "session disposed"
        );
    }

    fn click(&mut self, relative: CellCoord) {
        let window = query::viewport(&self.world);
        if relative.column() >= window.width() || relative.row() >= window.height() {
            debug!(
                column = relative.column(),
                row = relative.row(),
                "click outside viewport"
            );
            return;
        }

        let absolute = CellCoord::new(window.x() + relative.column(), window.y() + relative.row());
        let Some(cell) = query::dimensions(&self.world).cell_at(absolute) else {
            return;
        };

        let mut commands = Vec::new();
        self.interaction.handle_click(&self.world, cell, &mut commands);
        for command in commands {
            self.submit(command);
        }
    }

    fn submit(&mut self, command: Command) {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        self.dispatch(events);
    }

    fn dispatch(&mut self, mut events: Vec<Event>) {
        while !events.is_empty() {
            for event in &events {
                debug!(?event, "event");
            }

            let mut commands = Vec::new();
            self.movement.handle(&events, &mut commands);
            events.clear();
            for command in commands {
                world::apply(&mut self.world, command, &mut events);
            }
        }
    }
}
