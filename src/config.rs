//! Settings for a game session, fixed before or at maze creation time.

use error_chain::bail;

use crate::cells::Cartesian2DCoordinate;
use crate::errors::*;
use crate::generators::GeneratorKind;
use crate::units::{Height, ReachDistance, Width};

/// Where every player token starts a new maze.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum StartRule {
    TopLeftCorner,
    Centre,
    Fixed(Cartesian2DCoordinate),
}

/// Where the treasure is hidden in a new maze.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum TreasureRule {
    /// Any cell except the start cell.
    Random,
    /// The cell with the longest passage route from the start cell.
    FurthestFromStart,
    Fixed(Cartesian2DCoordinate),
}

/// Where dragons wake up in a new maze.
#[derive(Eq, PartialEq, Clone, Debug)]
pub enum DragonPlacement {
    /// Random cells further than `exclusion_radius` (Manhattan distance) from the start cell.
    Random { exclusion_radius: u32 },
    /// One cell per dragon, by dragon index.
    Fixed(Vec<Cartesian2DCoordinate>),
}

#[derive(PartialEq, Clone, Debug)]
pub struct MazeConfig {
    pub width: Width,
    pub height: Height,
    pub player_count: usize,
    pub dragon_count: usize,
    pub player_reach_distance: ReachDistance,
    pub dragon_reach_distance: ReachDistance,
    pub generator: GeneratorKind,
    pub start: StartRule,
    pub treasure: TreasureRule,
    pub dragon_placement: DragonPlacement,
    /// Pins the random generator; `None` seeds from the operating system.
    pub seed: Option<u64>,
}

impl Default for MazeConfig {
    fn default() -> Self {
        MazeConfig {
            width: Width(10),
            height: Height(10),
            player_count: 4,
            dragon_count: 1,
            player_reach_distance: ReachDistance(4),
            dragon_reach_distance: ReachDistance(2),
            generator: GeneratorKind::RandomizedPrim,
            start: StartRule::TopLeftCorner,
            treasure: TreasureRule::FurthestFromStart,
            dragon_placement: DragonPlacement::Random { exclusion_radius: 2 },
            seed: None,
        }
    }
}

impl MazeConfig {
    pub fn builder() -> MazeConfigBuilder {
        MazeConfigBuilder::new()
    }

    /// The cell players start on, which also seeds maze generation.
    pub fn start_cell(&self) -> Cartesian2DCoordinate {
        match self.start {
            StartRule::TopLeftCorner => Cartesian2DCoordinate::new(0, 0),
            StartRule::Centre => {
                Cartesian2DCoordinate::new((self.width.0 / 2) as u32, (self.height.0 / 2) as u32)
            }
            StartRule::Fixed(coord) => coord,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let (Width(w), Height(h)) = (self.width, self.height);
        if w == 0 || h == 0 {
            bail!(ErrorKind::InvalidConfiguration(format!("grid dimensions {}x{} must be non zero", w, h)));
        }
        if self.player_count == 0 {
            bail!(ErrorKind::InvalidConfiguration("at least one player is required".into()));
        }

        let in_bounds = |coord: Cartesian2DCoordinate| (coord.x as usize) < w && (coord.y as usize) < h;
        if !in_bounds(self.start_cell()) {
            bail!(ErrorKind::InvalidConfiguration(format!("start cell {:?} is outside the grid",
                                                          self.start_cell())));
        }
        if let TreasureRule::Fixed(coord) = self.treasure {
            if !in_bounds(coord) {
                bail!(ErrorKind::InvalidConfiguration(format!("treasure cell {:?} is outside the grid", coord)));
            }
        }
        if let DragonPlacement::Fixed(ref cells) = self.dragon_placement {
            if cells.len() != self.dragon_count {
                bail!(ErrorKind::InvalidConfiguration(format!("{} dragon cells given for {} dragons",
                                                              cells.len(),
                                                              self.dragon_count)));
            }
            if let Some(coord) = cells.iter().find(|coord| !in_bounds(**coord)) {
                bail!(ErrorKind::InvalidConfiguration(format!("dragon cell {:?} is outside the grid", coord)));
            }
        }
        Ok(())
    }
}

/// Builds a validated `MazeConfig`, starting from the defaults.
#[derive(Clone, Debug, Default)]
pub struct MazeConfigBuilder {
    config: MazeConfig,
}

impl MazeConfigBuilder {
    pub fn new() -> MazeConfigBuilder {
        MazeConfigBuilder::default()
    }

    pub fn dimensions(mut self, width: Width, height: Height) -> Self {
        self.config.width = width;
        self.config.height = height;
        self
    }

    pub fn players(mut self, count: usize) -> Self {
        self.config.player_count = count;
        self
    }

    pub fn dragons(mut self, count: usize) -> Self {
        self.config.dragon_count = count;
        self
    }

    pub fn player_reach_distance(mut self, reach: ReachDistance) -> Self {
        self.config.player_reach_distance = reach;
        self
    }

    pub fn dragon_reach_distance(mut self, reach: ReachDistance) -> Self {
        self.config.dragon_reach_distance = reach;
        self
    }

    pub fn generator(mut self, generator: GeneratorKind) -> Self {
        self.config.generator = generator;
        self
    }

    pub fn start(mut self, start: StartRule) -> Self {
        self.config.start = start;
        self
    }

    pub fn treasure(mut self, treasure: TreasureRule) -> Self {
        self.config.treasure = treasure;
        self
    }

    pub fn dragon_placement(mut self, placement: DragonPlacement) -> Self {
        self.config.dragon_placement = placement;
        self
    }

    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn build(self) -> Result<MazeConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
