#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure click-resolution system that turns player clicks into session commands.
//!
//! A first click on a walkable cell plans a route and stores it as the
//! pending destination; a second click on the same cell confirms it. Clicking
//! a resource plans an approach to a neighbouring cell and a second click on
//! the resource walks there and collects it.

use grid_explorer_core::{CellId, Command};
use grid_explorer_world::{query, World};
use tracing::debug;

/// Click-resolution system that reads the world and proposes commands.
#[derive(Clone, Copy, Debug, Default)]
pub struct Interaction;

impl Interaction {
    /// Creates a new interaction system instance.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Resolves a click on `cell` into zero or more commands.
    ///
    /// Clicks are ignored before the token is placed, while it is walking,
    /// after the session is disposed, and outside the grid.
    pub fn handle_click(&self, world: &World, cell: CellId, out: &mut Vec<Command>) {
        if query::is_disposed(world) || query::is_walking(world) {
            debug!(cell = cell.get(), "click ignored while session is busy");
            return;
        }
        let Some(token) = query::token(world) else {
            return;
        };
        let Some(tile) = query::cell(world, cell) else {
            debug!(cell = cell.get(), "click outside grid");
            return;
        };

        if !tile.terrain().is_passable() {
            out.push(Command::ClearSelection);
            return;
        }

        let target = query::target(world);

        if tile.resource().is_some() {
            let path = query::find_approach_path(world, token, cell, target);
            if path.is_empty() {
                debug!(cell = cell.get(), "resource has no reachable approach");
                return;
            }
            out.push(Command::SelectDestination { target: cell, path });
            if target == Some(cell) {
                out.push(Command::BeginWalk {
                    collect: Some(cell),
                });
            }
            return;
        }

        match target {
            None => {
                let path = query::find_path(world, token, cell, None);
                if !path.is_empty() {
                    out.push(Command::SelectDestination { target: cell, path });
                }
            }
            Some(current) if current == cell => {
                out.push(Command::BeginWalk { collect: None });
            }
            Some(current) => {
                let path = query::find_path(world, token, cell, Some(current));
                if path.is_empty() {
                    out.push(Command::ClearSelection);
                } else {
                    out.push(Command::SelectDestination { target: cell, path });
                }
            }
        }
    }
}
