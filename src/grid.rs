use error_chain::bail;
use petgraph::algo;
use petgraph::graph::{self, UnGraph};
use rand::Rng;
use std::fmt;
use std::slice;

use crate::annotations::Annotations;
use crate::cells::{BorderMask, Cartesian2DCoordinate, CompassPrimary, CoordinatePairSmallVec, CoordinateSmallVec,
                   MazeCell};
use crate::errors::*;
use crate::grid_iterators::{BatchIter, CellIter};
use crate::units::{EdgesCount, Height, NodesCount, Width};

/// A `width * height` rectangle of square cells separated by walls.
///
/// Walls are stored per cell as a `BorderMask`, so every wall between two neighbours is
/// recorded twice. The only ways to change a wall are `remove_wall_between`,
/// `add_wall_between` and `close_all_walls`, which always update both sides together.
#[derive(Clone)]
pub struct Grid {
    width: Width,
    height: Height,
    cells: Vec<MazeCell>,
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Grid :: width: {:?}, height: {:?}, passages: {:?}",
               self.width, self.height, self.links_count())
    }
}

impl Grid {
    /// Creates a grid with every wall in place.
    pub fn new(width: Width, height: Height) -> Result<Grid> {
        let (Width(w), Height(h)) = (width, height);
        if w == 0 || h == 0 {
            bail!(ErrorKind::InvalidConfiguration(format!("grid dimensions {}x{} must be non zero", w, h)));
        }
        if w > u32::MAX as usize || h > u32::MAX as usize {
            bail!(ErrorKind::InvalidConfiguration(format!("grid dimensions {}x{} are too large", w, h)));
        }

        let cells = CellIter::new(width, height).map(MazeCell::new).collect();
        Ok(Grid { width, height, cells })
    }

    #[inline]
    pub fn width(&self) -> Width {
        self.width
    }

    #[inline]
    pub fn height(&self) -> Height {
        self.height
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    /// Node and edge counts of the passage graph of a perfect maze on this grid.
    pub fn spanning_tree_size(&self) -> (NodesCount, EdgesCount) {
        (NodesCount(self.size()), EdgesCount(self.size() - 1))
    }

    /// Is the grid coordinate valid for this grid - within the grid's dimensions
    #[inline]
    pub fn is_valid_coordinate(&self, coord: Cartesian2DCoordinate) -> bool {
        (coord.x as usize) < self.width.0 && (coord.y as usize) < self.height.0
    }

    /// Convert a grid coordinate to a one dimensional index in the range 0...grid.size().
    /// Returns None if the grid coordinate is invalid.
    #[inline]
    pub fn grid_coordinate_to_index(&self, coord: Cartesian2DCoordinate) -> Option<usize> {
        if self.is_valid_coordinate(coord) {
            Some(coord.y as usize * self.width.0 + coord.x as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn index_to_grid_coordinate(&self, index: usize) -> Option<Cartesian2DCoordinate> {
        if index < self.size() {
            let x = index % self.width.0;
            let y = index / self.width.0;
            Some(Cartesian2DCoordinate::new(x as u32, y as u32))
        } else {
            None
        }
    }

    pub fn cell_at(&self, coord: Cartesian2DCoordinate) -> Result<&MazeCell> {
        let index = self.checked_index(coord)?;
        Ok(&self.cells[index])
    }

    pub fn cell_at_xy(&self, x: u32, y: u32) -> Result<&MazeCell> {
        self.cell_at(Cartesian2DCoordinate::new(x, y))
    }

    /// Mutable access to a cell's annotations. Walls stay untouched.
    pub fn annotations_mut(&mut self, coord: Cartesian2DCoordinate) -> Result<&mut Annotations> {
        let index = self.checked_index(coord)?;
        Ok(self.cells[index].annotations_mut())
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> slice::Iter<MazeCell> {
        self.cells.iter()
    }

    /// Opens the passage between two orthogonally adjacent cells.
    ///
    /// Out of bounds coordinates and non-adjacent pairs are rejected without changing any
    /// wall. Removing a wall that is already open succeeds and changes nothing.
    pub fn remove_wall_between(&mut self, a: Cartesian2DCoordinate, b: Cartesian2DCoordinate) -> Result<()> {
        self.set_wall_between(a, b, false)
    }

    /// Closes the passage between two orthogonally adjacent cells, the inverse of
    /// `remove_wall_between` with the same validation rules.
    pub fn add_wall_between(&mut self, a: Cartesian2DCoordinate, b: Cartesian2DCoordinate) -> Result<()> {
        self.set_wall_between(a, b, true)
    }

    /// Puts back every wall on every cell.
    pub fn close_all_walls(&mut self) {
        for cell in &mut self.cells {
            cell.border_mask = BorderMask::ALL;
        }
    }

    /// Cells that are to the North, East, South or West of a particular cell, but not
    /// necessarily linked by a passage.
    pub fn neighbours(&self, coord: Cartesian2DCoordinate) -> CoordinateSmallVec {
        CompassPrimary::ALL
            .iter()
            .filter_map(|dir| self.neighbour_at_direction(coord, *dir))
            .collect()
    }

    pub fn neighbour_at_direction(&self,
                                  coord: Cartesian2DCoordinate,
                                  direction: CompassPrimary)
                                  -> Option<Cartesian2DCoordinate> {
        if !self.is_valid_coordinate(coord) {
            return None;
        }
        coord.offset(direction)
             .filter(|neighbour_coord| self.is_valid_coordinate(*neighbour_coord))
    }

    /// Cells that are linked to a particular cell by an open passage, in N, E, S, W order.
    pub fn links(&self, coord: Cartesian2DCoordinate) -> Result<CoordinateSmallVec> {
        let cell = self.cell_at(coord)?;
        Ok(CompassPrimary::ALL
            .iter()
            .filter(|dir| !cell.has_border(**dir))
            .filter_map(|dir| self.neighbour_at_direction(coord, *dir))
            .collect())
    }

    /// Are two cells in the grid linked by an open passage?
    pub fn is_linked(&self, a: Cartesian2DCoordinate, b: Cartesian2DCoordinate) -> bool {
        match (CompassPrimary::between(a, b), self.cell_at(a), self.cell_at(b)) {
            (Some(dir), Ok(cell_a), Ok(cell_b)) => {
                !cell_a.has_border(dir) && !cell_b.has_border(dir.opposite())
            }
            _ => false,
        }
    }

    pub fn is_neighbour_linked(&self, coord: Cartesian2DCoordinate, direction: CompassPrimary) -> bool {
        self.neighbour_at_direction(coord, direction)
            .map_or(false, |neighbour_coord| self.is_linked(coord, neighbour_coord))
    }

    /// Number of open passages between cells.
    pub fn links_count(&self) -> usize {
        self.iter_links().count()
    }

    #[inline]
    pub fn iter(&self) -> CellIter {
        CellIter::new(self.width, self.height)
    }

    #[inline]
    pub fn iter_row(&self) -> BatchIter {
        BatchIter::rows(self.width, self.height)
    }

    #[inline]
    pub fn iter_column(&self) -> BatchIter {
        BatchIter::columns(self.width, self.height)
    }

    /// Every open passage once, as a (west or north cell, east or south cell) pair.
    pub fn iter_links(&self) -> impl Iterator<Item = (Cartesian2DCoordinate, Cartesian2DCoordinate)> + '_ {
        self.iter().flat_map(move |coord| {
            [CompassPrimary::East, CompassPrimary::South]
                .iter()
                .filter_map(move |dir| {
                    self.neighbour_at_direction(coord, *dir)
                        .filter(|neighbour| self.is_linked(coord, *neighbour))
                        .map(|neighbour| (coord, neighbour))
                })
                .collect::<CoordinatePairSmallVec>()
                .into_iter()
        })
    }

    pub fn random_cell<R: Rng>(&self, rng: &mut R) -> Cartesian2DCoordinate {
        let index = rng.gen_range(0..self.size());
        let row_length = self.width.0;
        Cartesian2DCoordinate::new((index % row_length) as u32, (index / row_length) as u32)
    }

    /// The open passages as an undirected graph. Node `i` is the cell with row-major index `i`.
    pub fn passage_graph(&self) -> UnGraph<Cartesian2DCoordinate, ()> {
        let mut graph = UnGraph::with_capacity(self.size(), self.size());
        for coord in self.iter() {
            graph.add_node(coord);
        }
        for (a, b) in self.iter_links() {
            if let (Some(index_a), Some(index_b)) = (self.grid_coordinate_to_index(a),
                                                     self.grid_coordinate_to_index(b)) {
                graph.add_edge(graph::NodeIndex::new(index_a),
                               graph::NodeIndex::new(index_b),
                               ());
            }
        }
        graph
    }

    /// True when the passages form a spanning tree: one connected component and no cycles.
    pub fn is_perfect_maze(&self) -> bool {
        let graph = self.passage_graph();
        let (_, EdgesCount(tree_edges)) = self.spanning_tree_size();
        graph.edge_count() == tree_edges &&
        algo::connected_components(&graph) == 1 &&
        !algo::is_cyclic_undirected(&graph)
    }

    fn checked_index(&self, coord: Cartesian2DCoordinate) -> Result<usize> {
        self.grid_coordinate_to_index(coord)
            .ok_or_else(|| ErrorKind::OutOfBounds(coord.x, coord.y, self.width.0, self.height.0).into())
    }

    fn set_wall_between(&mut self,
                        a: Cartesian2DCoordinate,
                        b: Cartesian2DCoordinate,
                        wall_present: bool)
                        -> Result<()> {
        let index_a = self.checked_index(a)?;
        let index_b = self.checked_index(b)?;
        let dir = CompassPrimary::between(a, b)
            .ok_or_else(|| Error::from(ErrorKind::NotAdjacent(a, b)))?;

        let (a_side, b_side) = (dir.border(), dir.opposite().border());
        self.cells[index_a].border_mask.set(a_side, wall_present);
        self.cells[index_b].border_mask.set(b_side, wall_present);
        Ok(())
    }
}

#[cfg(test)]
mod tests {

    use itertools::Itertools;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    use super::*;
    use crate::annotations::{AnnotationKind, AnnotationValue};

    fn small_grid(w: usize, h: usize) -> Grid {
        Grid::new(Width(w), Height(h)).expect("valid grid dimensions")
    }

    fn gc(x: u32, y: u32) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate::new(x, y)
    }

    #[test]
    fn zero_sized_grids_are_rejected() {
        for &(w, h) in &[(0, 3), (3, 0), (0, 0)] {
            let err = Grid::new(Width(w), Height(h)).unwrap_err();
            assert!(matches!(err.kind(), ErrorKind::InvalidConfiguration(_)));
        }
    }

    #[test]
    fn neighbour_cells() {
        let g = small_grid(10, 10);

        let check_expected_neighbours = |coord, expected_neighbours: &[Cartesian2DCoordinate]| {
            let neighbours: Vec<Cartesian2DCoordinate> =
                g.neighbours(coord).iter().cloned().sorted().collect();
            let expected: Vec<Cartesian2DCoordinate> =
                expected_neighbours.iter().cloned().sorted().collect();
            assert_eq!(neighbours, expected);
        };

        // corners
        check_expected_neighbours(gc(0, 0), &[gc(1, 0), gc(0, 1)]);
        check_expected_neighbours(gc(9, 0), &[gc(8, 0), gc(9, 1)]);
        check_expected_neighbours(gc(0, 9), &[gc(0, 8), gc(1, 9)]);
        check_expected_neighbours(gc(9, 9), &[gc(9, 8), gc(8, 9)]);

        // side element examples
        check_expected_neighbours(gc(1, 0), &[gc(0, 0), gc(1, 1), gc(2, 0)]);
        check_expected_neighbours(gc(0, 8), &[gc(1, 8), gc(0, 7), gc(0, 9)]);

        // Some place with 4 neighbours inside the grid
        check_expected_neighbours(gc(1, 1), &[gc(0, 1), gc(1, 0), gc(2, 1), gc(1, 2)]);

        // Outside the grid there are no neighbours at all
        assert!(g.neighbours(gc(10, 10)).is_empty());
    }

    #[test]
    fn neighbour_at_dir() {
        let g = small_grid(2, 2);
        let check_neighbour = |coord, dir: CompassPrimary, expected| {
            assert_eq!(g.neighbour_at_direction(coord, dir), expected);
        };
        check_neighbour(gc(0, 0), CompassPrimary::North, None);
        check_neighbour(gc(0, 0), CompassPrimary::South, Some(gc(0, 1)));
        check_neighbour(gc(0, 0), CompassPrimary::East, Some(gc(1, 0)));
        check_neighbour(gc(0, 0), CompassPrimary::West, None);

        check_neighbour(gc(1, 1), CompassPrimary::North, Some(gc(1, 0)));
        check_neighbour(gc(1, 1), CompassPrimary::South, None);
        check_neighbour(gc(1, 1), CompassPrimary::East, None);
        check_neighbour(gc(1, 1), CompassPrimary::West, Some(gc(0, 1)));
    }

    #[test]
    fn grid_size() {
        let g = small_grid(10, 7);
        assert_eq!(g.size(), 70);
        assert_eq!(g.width(), Width(10));
        assert_eq!(g.height(), Height(7));
    }

    #[test]
    fn grid_coordinate_as_index() {
        let g = small_grid(3, 3);
        let coords = &[gc(0, 0), gc(1, 0), gc(2, 0), gc(0, 1), gc(1, 1), gc(2, 1), gc(0, 2),
                       gc(1, 2), gc(2, 2)];
        let indices: Vec<Option<usize>> = coords.iter()
            .map(|coord| g.grid_coordinate_to_index(*coord))
            .collect();
        let expected = (0..9).map(Some).collect::<Vec<Option<usize>>>();
        assert_eq!(expected, indices);

        assert_eq!(g.grid_coordinate_to_index(gc(2, 3)), None);
        assert_eq!(g.grid_coordinate_to_index(gc(3, 2)), None);
        assert_eq!(g.grid_coordinate_to_index(gc(u32::MAX, u32::MAX)), None);

        for index in 0..9 {
            let coord = g.index_to_grid_coordinate(index).unwrap();
            assert_eq!(g.grid_coordinate_to_index(coord), Some(index));
        }
        assert_eq!(g.index_to_grid_coordinate(9), None);
    }

    #[test]
    fn cell_lookup_is_bounds_checked() {
        let g = small_grid(3, 2);
        assert_eq!(g.cell_at_xy(2, 1).unwrap().position(), gc(2, 1));

        for &(x, y) in &[(3, 0), (0, 2), (u32::MAX, 0)] {
            let err = g.cell_at_xy(x, y).unwrap_err();
            match *err.kind() {
                ErrorKind::OutOfBounds(ex, ey, 3, 2) => assert_eq!((ex, ey), (x, y)),
                ref other => panic!("unexpected error {:?}", other),
            }
        }
    }

    #[test]
    fn cell_lookup_is_idempotent() {
        let g = small_grid(4, 4);
        let first = g.cell_at_xy(1, 2).unwrap() as *const MazeCell;
        let second = g.cell_at_xy(1, 2).unwrap() as *const MazeCell;
        assert_eq!(first, second);
        assert_eq!(g.cell_at_xy(1, 2).unwrap(), g.cell_at(gc(1, 2)).unwrap());
    }

    #[test]
    fn random_cell() {
        let g = small_grid(4, 3);
        let mut rng = XorShiftRng::seed_from_u64(42);
        for _ in 0..1000 {
            let coord = g.random_cell(&mut rng);
            assert!(g.is_valid_coordinate(coord));
        }
    }

    #[test]
    fn cell_iter() {
        let g = small_grid(2, 2);
        assert_eq!(g.iter().collect::<Vec<Cartesian2DCoordinate>>(),
                   &[gc(0, 0), gc(1, 0), gc(0, 1), gc(1, 1)]);
        assert_eq!(g.cells().map(|cell| cell.position()).collect::<Vec<_>>(),
                   g.iter().collect::<Vec<_>>());
    }

    #[test]
    fn new_grid_has_no_passages() {
        let g = small_grid(3, 3);
        assert_eq!(g.links_count(), 0);
        assert!(g.cells().all(|cell| cell.border_mask() == BorderMask::ALL));
        assert!(!g.is_perfect_maze());
    }

    #[test]
    fn removing_walls() {
        let mut g = small_grid(4, 4);
        let a = gc(0, 1);
        let b = gc(0, 2);
        let c = gc(0, 3);

        let sorted_links = |grid: &Grid, coord| -> Vec<Cartesian2DCoordinate> {
            grid.links(coord).expect("coordinate is invalid").iter().cloned().sorted().collect()
        };

        assert!(!g.is_linked(a, b));
        assert_eq!(sorted_links(&g, a), vec![]);

        g.remove_wall_between(a, b).expect("wall removal failed");
        assert!(g.is_linked(a, b) && g.is_linked(b, a));
        assert!(!g.cell_at(a).unwrap().has_border(CompassPrimary::South));
        assert!(!g.cell_at(b).unwrap().has_border(CompassPrimary::North));
        assert_eq!(sorted_links(&g, a), vec![b]);
        assert_eq!(sorted_links(&g, b), vec![a]);
        assert!(g.is_neighbour_linked(a, CompassPrimary::South));
        assert!(g.is_neighbour_linked(b, CompassPrimary::North));

        g.remove_wall_between(c, b).expect("wall removal failed");
        assert!(g.is_linked(b, c));
        assert!(!g.is_linked(a, c));
        assert_eq!(sorted_links(&g, b), vec![a, c]);
        assert_eq!(g.links_count(), 2);

        // removing an open wall again changes nothing
        g.remove_wall_between(a, b).expect("wall removal failed");
        assert_eq!(g.links_count(), 2);

        g.add_wall_between(b, a).expect("adding wall failed");
        assert!(!g.is_linked(a, b));
        assert_eq!(sorted_links(&g, a), vec![]);
        assert_eq!(sorted_links(&g, b), vec![c]);
        assert_eq!(g.cell_at(a).unwrap().border_mask(), BorderMask::ALL);
    }

    #[test]
    fn removing_walls_between_non_adjacent_cells_is_rejected() {
        let mut g = small_grid(5, 5);
        let before = g.cells().map(|cell| cell.border_mask()).collect::<Vec<_>>();

        let err = g.remove_wall_between(gc(0, 0), gc(2, 2)).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::NotAdjacent(a, b) if *a == gc(0, 0) && *b == gc(2, 2)));

        let err = g.remove_wall_between(gc(1, 1), gc(1, 1)).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::NotAdjacent(..)));

        let err = g.remove_wall_between(gc(4, 4), gc(5, 4)).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::OutOfBounds(5, 4, 5, 5)));

        let after = g.cells().map(|cell| cell.border_mask()).collect::<Vec<_>>();
        assert_eq!(before, after);
    }

    #[test]
    fn close_all_walls_resets_passages() {
        let mut g = small_grid(3, 3);
        g.remove_wall_between(gc(0, 0), gc(1, 0)).unwrap();
        g.remove_wall_between(gc(1, 0), gc(1, 1)).unwrap();
        g.close_all_walls();
        assert_eq!(g.links_count(), 0);
    }

    #[test]
    fn annotations_survive_wall_changes() {
        let mut g = small_grid(2, 1);
        g.annotations_mut(gc(0, 0))
         .unwrap()
         .insert(AnnotationKind::Highlight, AnnotationValue::Flag(true));
        g.remove_wall_between(gc(0, 0), gc(1, 0)).unwrap();
        g.close_all_walls();
        assert_eq!(g.cell_at(gc(0, 0)).unwrap().annotations().get(AnnotationKind::Highlight),
                   Some(&AnnotationValue::Flag(true)));
        assert!(g.annotations_mut(gc(2, 0)).is_err());
    }

    #[test]
    fn links_iter_and_passage_graph() {
        let mut g = small_grid(2, 2);
        g.remove_wall_between(gc(0, 0), gc(1, 0)).unwrap();
        g.remove_wall_between(gc(0, 0), gc(0, 1)).unwrap();
        assert!(!g.is_perfect_maze());

        g.remove_wall_between(gc(1, 1), gc(1, 0)).unwrap();
        let links = g.iter_links().sorted().collect::<Vec<_>>();
        assert_eq!(links,
                   vec![(gc(0, 0), gc(0, 1)), (gc(0, 0), gc(1, 0)), (gc(1, 0), gc(1, 1))]);
        assert!(g.is_perfect_maze());

        // closing the loop breaks the tree property
        g.remove_wall_between(gc(0, 1), gc(1, 1)).unwrap();
        assert_eq!(g.passage_graph().edge_count(), 4);
        assert!(!g.is_perfect_maze());
    }
}
