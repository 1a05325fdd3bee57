//! Breadth-first route planning over the session grid.
//!
//! Both planners share [`is_enterable`] so that a cell is judged the same way
//! whether it is a goal, an intermediate step, or an approach stop.

use std::collections::VecDeque;

use grid_explorer_core::{CellId, GridView};

/// Decides whether a cell may be stepped onto.
///
/// Impassable terrain is never enterable. A cell carrying a resource is only
/// enterable when it is the `exempt` cell, which lets a path end on a
/// confirmed resource target without ever crossing an unrelated one. Cells
/// outside the grid are not enterable.
#[must_use]
pub fn is_enterable(grid: GridView<'_>, cell: CellId, exempt: Option<CellId>) -> bool {
    let Some(tile) = grid.cell(cell) else {
        return false;
    };

    if !tile.terrain().is_passable() {
        return false;
    }

    tile.resource().is_none() || exempt == Some(cell)
}

/// Shortest path from `start` to `goal`, both ends included.
///
/// Returns `[start]` when the two coincide and an empty path when `goal` is
/// not enterable or cannot be reached. Neighbours are expanded in the grid's
/// fixed up, down, left, right order, which decides between paths of equal
/// length.
#[must_use]
pub fn find_path(
    grid: GridView<'_>,
    start: CellId,
    goal: CellId,
    exempt: Option<CellId>,
) -> Vec<CellId> {
    if start == goal {
        return vec![start];
    }

    if !is_enterable(grid, goal, exempt) {
        return Vec::new();
    }

    let dimensions = grid.dimensions();
    let cell_count = dimensions.cell_count();
    if !dimensions.contains(start) {
        return Vec::new();
    }

    let mut visited = vec![false; cell_count];
    let mut parents: Vec<Option<CellId>> = vec![None; cell_count];
    let mut queue = VecDeque::new();

    visited[start.slot()] = true;
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        for neighbor in dimensions.neighbors_of(current) {
            if visited[neighbor.slot()] || !is_enterable(grid, neighbor, exempt) {
                continue;
            }

            visited[neighbor.slot()] = true;
            parents[neighbor.slot()] = Some(current);

            if neighbor == goal {
                return trace_back(&parents, start, goal);
            }

            queue.push_back(neighbor);
        }
    }

    Vec::new()
}

/// Shortest path from `start` to any free cell adjacent to `resource`.
///
/// Candidate stops are the resource's neighbours that are enterable without
/// an exemption, tried in neighbour order; the first shortest route wins.
/// The returned path never ends on the resource cell itself and is empty when
/// no stop exists or none is reachable.
#[must_use]
pub fn find_approach_path(
    grid: GridView<'_>,
    start: CellId,
    resource: CellId,
    exempt: Option<CellId>,
) -> Vec<CellId> {
    let dimensions = grid.dimensions();
    if !dimensions.contains(resource) {
        return Vec::new();
    }

    let mut best: Vec<CellId> = Vec::new();
    for stop in dimensions
        .neighbors_of(resource)
        .filter(|stop| is_enterable(grid, *stop, None))
    {
        let candidate = find_path(grid, start, stop, exempt);
        if candidate.is_empty() {
            continue;
        }
        if best.is_empty() || candidate.len() < best.len() {
            best = candidate;
        }
    }

    best
}

fn trace_back(parents: &[Option<CellId>], start: CellId, goal: CellId) -> Vec<CellId> {
    let mut path = vec![goal];
    let mut current = goal;

    while current != start {
        let Some(parent) = parents.get(current.slot()).copied().flatten() else {
            return Vec::new();
        };
        path.push(parent);
        current = parent;
    }

    path.reverse();
    path
}
