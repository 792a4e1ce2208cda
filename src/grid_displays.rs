use fnv::FnvHashSet;
use std::fmt;

use crate::cells::{Cartesian2DCoordinate, CompassPrimary};
use crate::grid::Grid;
use crate::pathing::Distances;
use crate::snapshot::MazeSnapshot;
use crate::units::{Height, Width};

/// Supplies the 3 character body of each cell when a grid is drawn as text.
pub trait GridDisplay {
    fn render_cell_body(&self, coord: Cartesian2DCoordinate) -> String;
}

const EMPTY_BODY: &str = "   ";

impl GridDisplay for Distances {
    fn render_cell_body(&self, coord: Cartesian2DCoordinate) -> String {
        if let Some(d) = self.distance_from_start_to(coord) {
            // centre align, padding 3, lowercase hexadecimal
            format!("{:^3x}", d)
        } else {
            String::from(EMPTY_BODY)
        }
    }
}

#[derive(Debug)]
pub struct PathDisplay {
    on_path_coordinates: FnvHashSet<Cartesian2DCoordinate>,
}
impl PathDisplay {
    pub fn new(path: &[Cartesian2DCoordinate]) -> Self {
        PathDisplay { on_path_coordinates: path.iter().cloned().collect() }
    }
}
impl GridDisplay for PathDisplay {
    fn render_cell_body(&self, coord: Cartesian2DCoordinate) -> String {
        if self.on_path_coordinates.contains(&coord) {
            String::from(" . ")
        } else {
            String::from(EMPTY_BODY)
        }
    }
}

/// Marks the cells a player could move to, with the player's own cell as `@`.
#[derive(Debug)]
pub struct ReachableDisplay {
    origin: Option<Cartesian2DCoordinate>,
    reachable: FnvHashSet<Cartesian2DCoordinate>,
}
impl ReachableDisplay {
    /// `reachable` in the order returned by the reachability queries, origin first.
    pub fn new(reachable: &[Cartesian2DCoordinate]) -> Self {
        ReachableDisplay {
            origin: reachable.first().cloned(),
            reachable: reachable.iter().cloned().collect(),
        }
    }
}
impl GridDisplay for ReachableDisplay {
    fn render_cell_body(&self, coord: Cartesian2DCoordinate) -> String {
        if self.origin == Some(coord) {
            String::from(" @ ")
        } else if self.reachable.contains(&coord) {
            String::from(" * ")
        } else {
            String::from(EMPTY_BODY)
        }
    }
}

/// Tokens on the board: dragons `D`, enabled players by index digit, treasure `T`.
#[derive(Debug)]
pub struct ActorsDisplay {
    snapshot: MazeSnapshot,
}
impl ActorsDisplay {
    pub fn new(snapshot: MazeSnapshot) -> Self {
        ActorsDisplay { snapshot }
    }
}
impl GridDisplay for ActorsDisplay {
    fn render_cell_body(&self, coord: Cartesian2DCoordinate) -> String {
        let mut tokens = String::new();
        for _ in self.snapshot.dragons.iter().filter(|dragon| dragon.position == coord) {
            tokens.push('D');
        }
        for player in self.snapshot.players.iter().filter(|player| player.enabled && player.position == coord) {
            tokens.push_str(&(player.index % 10).to_string());
        }
        if self.snapshot.treasure == coord {
            tokens.push('T');
        }
        format!("{:^3.3}", tokens)
    }
}

/// A grid paired with an optional cell body renderer, ready to format.
pub struct GridRender<'a> {
    grid: &'a Grid,
    display: Option<&'a dyn GridDisplay>,
}

impl Grid {
    pub fn render_with<'a>(&'a self, display: &'a dyn GridDisplay) -> GridRender<'a> {
        GridRender { grid: self, display: Some(display) }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&GridRender { grid: self, display: None }, f)
    }
}

// Box drawing glyph for a wall junction, by which of its four arms are present.
fn junction(left: bool, right: bool, up: bool, down: bool) -> &'static str {
    match (left, right, up, down) {
        (true, true, true, true) => "┼",
        (true, true, true, false) => "┴",
        (true, true, false, true) => "┬",
        (true, false, true, true) => "┤",
        (false, true, true, true) => "├",
        (true, true, false, false) => "─",
        (false, false, true, true) => "│",
        (false, true, true, false) => "└",
        (true, false, false, true) => "┐",
        (true, false, true, false) => "┘",
        (false, true, false, true) => "┌",
        (true, false, false, false) => "╴",
        (false, true, false, false) => "╶",
        (false, false, true, false) => "╵",
        (false, false, false, true) => "╷",
        (false, false, false, false) => " ",
    }
}

impl<'a> GridRender<'a> {
    fn has_wall(&self, x: usize, y: usize, direction: CompassPrimary) -> bool {
        self.grid
            .cell_at_xy(x as u32, y as u32)
            .map_or(true, |cell| cell.has_border(direction))
    }
}

impl<'a> fmt::Display for GridRender<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        const WALL_LR_3: &str = "───";
        const WALL_UD: &str = "│";

        let Width(width) = self.grid.width();
        let Height(height) = self.grid.height();

        // Each cell draws its body, its east wall and its south wall plus south east junction.
        // The north boundary and the west boundary are drawn up front.
        let mut output = String::from("┌");
        for x in 0..width {
            output.push_str(WALL_LR_3);
            output.push_str(junction(true, x + 1 < width, false, self.has_wall(x, 0, CompassPrimary::East)));
        }
        output.push('\n');

        for (y, row) in self.grid.iter_row().enumerate() {
            let is_last_row = y + 1 == height;
            let mut middle = String::from(WALL_UD);
            let mut bottom = String::from(junction(false,
                                                   self.has_wall(0, y, CompassPrimary::South),
                                                   true,
                                                   !is_last_row));

            for (x, coord) in row.into_iter().enumerate() {
                let is_last_column = x + 1 == width;

                match self.display {
                    Some(display) => middle.push_str(&display.render_cell_body(coord)),
                    None => middle.push_str(EMPTY_BODY),
                }
                let east_wall = self.has_wall(x, y, CompassPrimary::East);
                middle.push_str(if east_wall { WALL_UD } else { " " });

                let south_wall = self.has_wall(x, y, CompassPrimary::South);
                bottom.push_str(if south_wall { WALL_LR_3 } else { EMPTY_BODY });

                let right = !is_last_column && self.has_wall(x + 1, y, CompassPrimary::South);
                let down = !is_last_row && self.has_wall(x, y + 1, CompassPrimary::East);
                bottom.push_str(junction(south_wall, right, east_wall, down));
            }

            output.push_str(&middle);
            output.push('\n');
            output.push_str(&bottom);
            output.push('\n');
        }

        write!(f, "{}", output)
    }
}
