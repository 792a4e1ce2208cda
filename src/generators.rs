use bit_set::BitSet;
use rand::Rng;
use tracing::debug;

use crate::cells::Cartesian2DCoordinate;
use crate::errors::*;
use crate::grid::Grid;

/// Which spanning tree carving algorithm builds the maze.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum GeneratorKind {
    RandomizedPrim,
    RecursiveBacktracker,
}

impl Default for GeneratorKind {
    fn default() -> Self {
        GeneratorKind::RandomizedPrim
    }
}

impl GeneratorKind {
    /// Carve a perfect maze into `grid`, returning the number of passages opened.
    pub fn generate<R: Rng>(self,
                            grid: &mut Grid,
                            rng: &mut R,
                            seed_cell: Cartesian2DCoordinate)
                            -> Result<usize> {
        match self {
            GeneratorKind::RandomizedPrim => randomized_prim(grid, rng, seed_cell),
            GeneratorKind::RecursiveBacktracker => recursive_backtracker(grid, rng, seed_cell),
        }
    }
}

/// Apply the randomized Prim's maze generation algorithm to a grid.
///
/// All walls are put back first. Starting from `seed_cell` we keep a frontier of edges
/// leading from visited cells to unvisited neighbours. Each step takes one frontier edge
/// uniformly at random; if its far cell has been visited since the edge was queued it is
/// thrown away, otherwise the wall is carved and the far cell's own edges join the frontier.
/// Every cell is visited exactly once and every carve joins a new cell, so the passages form
/// a spanning tree. Mazes come out with lots of short dead ends.
pub fn randomized_prim<R: Rng>(grid: &mut Grid,
                               rng: &mut R,
                               seed_cell: Cartesian2DCoordinate)
                               -> Result<usize> {
    grid.cell_at(seed_cell)?;
    let seed_index = grid_index(grid, seed_cell);
    grid.close_all_walls();

    let mut visited = BitSet::with_capacity(grid.size());
    visited.insert(seed_index);

    let mut frontier = Vec::with_capacity(4 * grid.size());
    push_frontier_edges(grid, &visited, seed_cell, &mut frontier);

    let mut carved = 0;
    while !frontier.is_empty() {
        let pick = rng.gen_range(0..frontier.len());
        let (from, to) = frontier.swap_remove(pick);

        let to_index = grid_index(grid, to);
        if visited.contains(to_index) {
            continue;
        }

        grid.remove_wall_between(from, to)?;
        visited.insert(to_index);
        carved += 1;
        push_frontier_edges(grid, &visited, to, &mut frontier);
    }

    debug!(width = grid.width().0, height = grid.height().0, carved, "randomized prim maze carved");
    Ok(carved)
}

/// Apply the recursive backtracker (randomized depth first search) algorithm to a grid.
///
/// Walk randomly to unvisited neighbours carving as we go; when stuck, back up the stack to
/// the most recent cell that still has an unvisited neighbour. The stack is explicit so large
/// grids cannot overflow the call stack. Mazes come out with long twisty corridors.
pub fn recursive_backtracker<R: Rng>(grid: &mut Grid,
                                     rng: &mut R,
                                     seed_cell: Cartesian2DCoordinate)
                                     -> Result<usize> {
    grid.cell_at(seed_cell)?;
    let seed_index = grid_index(grid, seed_cell);
    grid.close_all_walls();

    let mut visited = BitSet::with_capacity(grid.size());
    visited.insert(seed_index);
    let mut stack = vec![seed_cell];
    let mut carved = 0;

    while let Some(&current) = stack.last() {
        let unvisited_neighbours = grid.neighbours(current)
            .into_iter()
            .filter(|coord| !visited.contains(grid_index(grid, *coord)))
            .collect::<Vec<_>>();

        if unvisited_neighbours.is_empty() {
            stack.pop();
        } else {
            let next = unvisited_neighbours[rng.gen_range(0..unvisited_neighbours.len())];
            grid.remove_wall_between(current, next)?;
            visited.insert(grid_index(grid, next));
            carved += 1;
            stack.push(next);
        }
    }

    debug!(width = grid.width().0, height = grid.height().0, carved, "recursive backtracker maze carved");
    Ok(carved)
}

fn push_frontier_edges(grid: &Grid,
                       visited: &BitSet,
                       from: Cartesian2DCoordinate,
                       frontier: &mut Vec<(Cartesian2DCoordinate, Cartesian2DCoordinate)>) {
    for neighbour in grid.neighbours(from) {
        if !visited.contains(grid_index(grid, neighbour)) {
            frontier.push((from, neighbour));
        }
    }
}

// Only called with coordinates already known to be on the grid.
#[inline]
fn grid_index(grid: &Grid, coord: Cartesian2DCoordinate) -> usize {
    grid.grid_coordinate_to_index(coord).unwrap_or(usize::MAX)
}
