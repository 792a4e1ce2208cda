//! Error types for every fallible maze operation.
//!
//! `error_chain!` creates the `Error`, `ErrorKind`, `ResultExt` and `Result` types. The other
//! modules in this crate `use crate::errors::*;` to get at them.

use std::fmt;

use error_chain::error_chain;

use crate::cells::Cartesian2DCoordinate;

/// Which kind of token an actor index refers to.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum ActorKind {
    Player,
    Dragon,
}

impl fmt::Display for ActorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ActorKind::Player => write!(f, "player"),
            ActorKind::Dragon => write!(f, "dragon"),
        }
    }
}

error_chain! {
    errors {
        OutOfBounds(x: u32, y: u32, width: usize, height: usize) {
            description("coordinate outside the grid")
            display("coordinate ({}, {}) is outside the {}x{} grid", x, y, width, height)
        }
        NotAdjacent(a: Cartesian2DCoordinate, b: Cartesian2DCoordinate) {
            description("cells are not orthogonally adjacent")
            display("cells ({}, {}) and ({}, {}) are not adjacent", a.x, a.y, b.x, b.y)
        }
        InvariantViolation(reason: String) {
            description("maze invariant violated")
            display("maze invariant violated: {}", reason)
        }
        InvalidActorIndex(kind: ActorKind, index: usize) {
            description("unknown or disabled actor")
            display("{} {} does not exist or is disabled", kind, index)
        }
        InvalidConfiguration(reason: String) {
            description("invalid maze configuration")
            display("invalid maze configuration: {}", reason)
        }
    }
}
