//! **tabletop_maze** generates and runs the maze for a projected tabletop game: a perfect
//! maze on a grid, how far players and dragons can move through it, and the routes they take.

pub mod annotations;
pub mod cells;
pub mod config;
pub mod engine;
pub mod errors;
pub mod generators;
pub mod grid;
pub mod grid_displays;
pub mod grid_iterators;
pub mod pathing;
pub mod snapshot;
pub mod units;
