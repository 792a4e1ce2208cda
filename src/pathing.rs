use error_chain::bail;
use fnv::FnvHashMap;
use smallvec::SmallVec;
use tracing::trace;

use crate::cells::Cartesian2DCoordinate;
use crate::errors::*;
use crate::grid::Grid;
use crate::units::ReachDistance;

/// Breadth first flood fill distances from one start cell through open passages.
#[derive(Debug, Clone)]
pub struct Distances {
    start_coordinate: Cartesian2DCoordinate,
    distances: FnvHashMap<Cartesian2DCoordinate, u32>,
    discovery_order: Vec<Cartesian2DCoordinate>,
    max_distance: u32,
}

impl Distances {
    /// Distances from `start_coordinate` to every cell connected to it.
    pub fn for_grid(grid: &Grid, start_coordinate: Cartesian2DCoordinate) -> Result<Distances> {
        Distances::flood_fill(grid, start_coordinate, None)
    }

    /// Distances from `start_coordinate` to the cells at most `limit` passage crossings away.
    pub fn within(grid: &Grid,
                  start_coordinate: Cartesian2DCoordinate,
                  limit: ReachDistance)
                  -> Result<Distances> {
        Distances::flood_fill(grid, start_coordinate, Some(limit))
    }

    fn flood_fill(grid: &Grid,
                  start_coordinate: Cartesian2DCoordinate,
                  limit: Option<ReachDistance>)
                  -> Result<Distances> {
        grid.cell_at(start_coordinate)?;

        let mut distances = FnvHashMap::with_capacity_and_hasher(grid.size(), Default::default());
        let mut discovery_order = vec![start_coordinate];
        distances.insert(start_coordinate, 0);

        // Every step costs one, so the first time a cell is reached is along a shortest
        // route and it never needs updating. The map doubles as the visited set.
        let mut frontier = vec![start_coordinate];
        let mut layer = 0usize;
        while !frontier.is_empty() && limit.map_or(true, |ReachDistance(max)| layer < max) {

            let mut new_frontier = vec![];
            for cell_coord in &frontier {
                for link_coordinate in grid.links(*cell_coord)? {
                    if !distances.contains_key(&link_coordinate) {
                        distances.insert(link_coordinate, layer as u32 + 1);
                        discovery_order.push(link_coordinate);
                        new_frontier.push(link_coordinate);
                    }
                }
            }
            if !new_frontier.is_empty() {
                layer += 1;
            }
            frontier = new_frontier;
        }

        Ok(Distances {
            start_coordinate,
            distances,
            discovery_order,
            max_distance: layer as u32,
        })
    }

    #[inline(always)]
    pub fn start(&self) -> Cartesian2DCoordinate {
        self.start_coordinate
    }

    /// The largest distance found from the start.
    #[inline(always)]
    pub fn max(&self) -> u32 {
        self.max_distance
    }

    #[inline(always)]
    pub fn distance_from_start_to(&self, coord: Cartesian2DCoordinate) -> Option<u32> {
        self.distances.get(&coord).cloned()
    }

    /// Every cell found, in breadth first discovery order starting with the start cell.
    #[inline]
    pub fn reachable(&self) -> &[Cartesian2DCoordinate] {
        &self.discovery_order
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.discovery_order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.discovery_order.is_empty()
    }

    /// The cells at the maximum distance, in discovery order.
    pub fn furthest_points_on_grid(&self) -> SmallVec<[Cartesian2DCoordinate; 8]> {
        let furthest_distance = self.max();
        self.discovery_order
            .iter()
            .cloned()
            .filter(|coord| self.distances.get(coord) == Some(&furthest_distance))
            .collect()
    }
}

/// Cells reachable from `start` by crossing at most `reach` open passages.
///
/// The start cell always comes first; the rest follow in breadth first discovery order so
/// the result is repeatable for the same grid.
pub fn reachable_entries(grid: &Grid,
                         start: Cartesian2DCoordinate,
                         reach: ReachDistance)
                         -> Result<Vec<Cartesian2DCoordinate>> {
    let distances = Distances::within(grid, start, reach)?;
    trace!(x = start.x, y = start.y, reach = reach.0, found = distances.len(), "reachable entries");
    Ok(distances.discovery_order)
}

/// The route from the start of `distances_from_start` to `end_point`, both ends included.
///
/// Walks back from the end through linked neighbours whose distance is exactly one less,
/// checking neighbours in North, East, South, West order. Finding no route means the
/// distances do not belong to this grid or the grid is disconnected, both of which are
/// broken invariants for a generated maze.
pub fn shortest_path(grid: &Grid,
                     distances_from_start: &Distances,
                     end_point: Cartesian2DCoordinate)
                     -> Result<Vec<Cartesian2DCoordinate>> {
    grid.cell_at(end_point)?;
    let start = distances_from_start.start();

    let end_distance = match distances_from_start.distance_from_start_to(end_point) {
        Some(d) => d,
        None => {
            bail!(ErrorKind::InvariantViolation(format!("no route from ({}, {}) to ({}, {})",
                                                        start.x, start.y, end_point.x, end_point.y)))
        }
    };

    let mut path = Vec::with_capacity(end_distance as usize + 1);
    path.push(end_point);
    let mut current_coord = end_point;
    let mut current_distance = end_distance;

    while current_coord != start {
        let closer = grid.links(current_coord)?
            .into_iter()
            .find(|coord| {
                current_distance > 0 &&
                distances_from_start.distance_from_start_to(*coord) == Some(current_distance - 1)
            });

        match closer {
            Some(closer_coord) => {
                current_coord = closer_coord;
                current_distance -= 1;
                path.push(current_coord);
            }
            None => {
                // The distances were computed for a different wall layout.
                bail!(ErrorKind::InvariantViolation(format!("route to ({}, {}) broken at ({}, {})",
                                                            end_point.x, end_point.y,
                                                            current_coord.x, current_coord.y)))
            }
        }
    }

    path.reverse();
    trace!(steps = path.len() - 1, "shortest path");
    Ok(path)
}

/// Shortest route between two cells of the grid, both ends included.
pub fn shortest_path_between(grid: &Grid,
                             source: Cartesian2DCoordinate,
                             destination: Cartesian2DCoordinate)
                             -> Result<Vec<Cartesian2DCoordinate>> {
    let distances = Distances::for_grid(grid, source)?;
    shortest_path(grid, &distances, destination)
}

/// The longest route in the maze.
///
/// Only guaranteed to be the longest on a perfect maze: the cell furthest from an arbitrary
/// cell is one end of the longest path, and the cell furthest from that is the other end.
pub fn longest_path(grid: &Grid) -> Result<Vec<Cartesian2DCoordinate>> {
    let arbitrary_start_point = Cartesian2DCoordinate::new(0, 0);
    let first_distances = Distances::for_grid(grid, arbitrary_start_point)?;
    let long_path_start_coordinate = first_distances.furthest_points_on_grid()[0];

    let distances_from_start = Distances::for_grid(grid, long_path_start_coordinate)?;
    let end_point = distances_from_start.furthest_points_on_grid()[0];

    shortest_path(grid, &distances_from_start, end_point)
}
