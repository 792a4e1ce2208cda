//! Plain data views of a game session for renderers and save files.

use serde_derive::Serialize;

use crate::cells::{BorderMask, Cartesian2DCoordinate};
use crate::errors::*;

#[derive(PartialEq, Eq, Clone, Debug, Serialize)]
pub struct PlayerSnapshot {
    pub index: usize,
    pub position: Cartesian2DCoordinate,
    pub enabled: bool,
}

#[derive(PartialEq, Eq, Clone, Debug, Serialize)]
pub struct DragonSnapshot {
    pub index: usize,
    pub position: Cartesian2DCoordinate,
    pub target: Cartesian2DCoordinate,
}

/// The board at one moment. `walls` holds one border mask per cell in row-major order.
#[derive(PartialEq, Eq, Clone, Debug, Serialize)]
pub struct MazeSnapshot {
    pub width: usize,
    pub height: usize,
    pub walls: Vec<u8>,
    pub players: Vec<PlayerSnapshot>,
    pub dragons: Vec<DragonSnapshot>,
    pub treasure: Cartesian2DCoordinate,
    pub current_player: usize,
    pub current_dragon: usize,
}

impl MazeSnapshot {
    pub fn border_mask_at(&self, coord: Cartesian2DCoordinate) -> Option<BorderMask> {
        let (x, y) = (coord.x as usize, coord.y as usize);
        if x < self.width && y < self.height {
            self.walls.get(y * self.width + x).map(|bits| BorderMask::from_bits_truncate(*bits))
        } else {
            None
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).chain_err(|| "unable to serialize the maze snapshot")
    }
}
