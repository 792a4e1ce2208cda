use bitflags::bitflags;
use serde_derive::Serialize;
use smallvec::SmallVec;

use crate::annotations::Annotations;

pub type CoordinateSmallVec = SmallVec<[Cartesian2DCoordinate; 4]>;
pub type CoordinatePairSmallVec = SmallVec<[(Cartesian2DCoordinate, Cartesian2DCoordinate); 2]>;

#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd, Serialize)]
pub struct Cartesian2DCoordinate {
    pub x: u32,
    pub y: u32,
}

impl Cartesian2DCoordinate {
    pub fn new(x: u32, y: u32) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate { x, y }
    }

    pub fn manhattan_distance(&self, other: Cartesian2DCoordinate) -> u32 {
        let dx = if self.x > other.x { self.x - other.x } else { other.x - self.x };
        let dy = if self.y > other.y { self.y - other.y } else { other.y - self.y };
        dx + dy
    }

    /// Creates a new coordinate offset 1 cell away in the given direction.
    /// Returns None if the coordinate is not representable (moving off the top or left edge).
    /// The result is not checked against any grid's far boundaries.
    pub fn offset(&self, dir: CompassPrimary) -> Option<Cartesian2DCoordinate> {
        let (x, y) = (self.x, self.y);
        match dir {
            CompassPrimary::North => {
                if y > 0 {
                    Some(Cartesian2DCoordinate::new(x, y - 1))
                } else {
                    None
                }
            }
            CompassPrimary::South => y.checked_add(1).map(|y| Cartesian2DCoordinate::new(x, y)),
            CompassPrimary::East => x.checked_add(1).map(|x| Cartesian2DCoordinate::new(x, y)),
            CompassPrimary::West => {
                if x > 0 {
                    Some(Cartesian2DCoordinate::new(x - 1, y))
                } else {
                    None
                }
            }
        }
    }
}

impl From<(u32, u32)> for Cartesian2DCoordinate {
    fn from(x_y_pair: (u32, u32)) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate::new(x_y_pair.0, x_y_pair.1)
    }
}

/// The four sides of a square cell. North is towards `y == 0`, West is towards `x == 0`.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub enum CompassPrimary {
    North,
    East,
    South,
    West,
}

impl CompassPrimary {
    /// Fixed examination order used wherever determinism matters.
    pub const ALL: [CompassPrimary; 4] = [CompassPrimary::North,
                                          CompassPrimary::East,
                                          CompassPrimary::South,
                                          CompassPrimary::West];

    pub fn opposite(self) -> CompassPrimary {
        match self {
            CompassPrimary::North => CompassPrimary::South,
            CompassPrimary::East => CompassPrimary::West,
            CompassPrimary::South => CompassPrimary::North,
            CompassPrimary::West => CompassPrimary::East,
        }
    }

    /// The wall bit guarding this side of a cell.
    pub fn border(self) -> BorderMask {
        match self {
            CompassPrimary::North => BorderMask::UP,
            CompassPrimary::East => BorderMask::RIGHT,
            CompassPrimary::South => BorderMask::DOWN,
            CompassPrimary::West => BorderMask::LEFT,
        }
    }

    /// The direction to step from `a` to reach `b`, if they are orthogonally adjacent.
    pub fn between(a: Cartesian2DCoordinate, b: Cartesian2DCoordinate) -> Option<CompassPrimary> {
        CompassPrimary::ALL
            .iter()
            .cloned()
            .find(|dir| a.offset(*dir) == Some(b))
    }
}

bitflags! {
    /// Which sides of a cell are walled. A set bit is a wall, a clear bit a passage.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct BorderMask: u8 {
        const UP    = 1 << 1;
        const RIGHT = 1 << 2;
        const DOWN  = 1 << 3;
        const LEFT  = 1 << 4;
    }
}

impl BorderMask {
    /// No walls, all four sides open.
    pub const NONE: BorderMask = BorderMask::empty();
    pub const ALL: BorderMask = BorderMask::all();
}

/// One grid position with its wall configuration and collaborator annotations.
#[derive(Debug, Clone, PartialEq)]
pub struct MazeCell {
    coordinate: Cartesian2DCoordinate,
    pub(crate) border_mask: BorderMask,
    annotations: Annotations,
}

impl MazeCell {
    pub(crate) fn new(coordinate: Cartesian2DCoordinate) -> MazeCell {
        MazeCell {
            coordinate,
            border_mask: BorderMask::ALL,
            annotations: Annotations::default(),
        }
    }

    #[inline]
    pub fn x(&self) -> u32 {
        self.coordinate.x
    }

    #[inline]
    pub fn y(&self) -> u32 {
        self.coordinate.y
    }

    #[inline]
    pub fn position(&self) -> Cartesian2DCoordinate {
        self.coordinate
    }

    #[inline]
    pub fn border_mask(&self) -> BorderMask {
        self.border_mask
    }

    #[inline]
    pub fn has_border(&self, dir: CompassPrimary) -> bool {
        self.border_mask.contains(dir.border())
    }

    #[inline]
    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    #[inline]
    pub(crate) fn annotations_mut(&mut self) -> &mut Annotations {
        &mut self.annotations
    }
}
