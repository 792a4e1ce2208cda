//! Game session state: the maze, every token on it and the turn bookkeeping.
//!
//! A `MazeEngine` is built once by the hosting application and handed by reference to the
//! rendering layer, the practice helper and the turn controller. It does no locking, callers
//! process one turn at a time.

use bit_set::BitSet;
use error_chain::bail;
use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;
use tracing::{debug, trace, warn};

use crate::annotations::Annotations;
use crate::cells::{Cartesian2DCoordinate, MazeCell};
use crate::config::{DragonPlacement, MazeConfig, TreasureRule};
use crate::errors::*;
use crate::grid::Grid;
use crate::pathing::{self, Distances};
use crate::snapshot::{DragonSnapshot, MazeSnapshot, PlayerSnapshot};
use crate::units::{DragonIndex, Height, PlayerIndex, ReachDistance, Width};

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
struct DragonSlot {
    position: Cartesian2DCoordinate,
    target: Cartesian2DCoordinate,
}

/// What happened when a dragon took its turn.
#[derive(Eq, PartialEq, Clone, Debug)]
pub struct DragonMove {
    dragon: DragonIndex,
    path: Vec<Cartesian2DCoordinate>,
    destination: Cartesian2DCoordinate,
    retargeted: bool,
}

impl DragonMove {
    pub fn dragon(&self) -> DragonIndex {
        self.dragon
    }

    /// Cells walked through, from where the dragon stood to where it stopped.
    pub fn path(&self) -> &[Cartesian2DCoordinate] {
        &self.path
    }

    pub fn destination(&self) -> Cartesian2DCoordinate {
        self.destination
    }

    pub fn steps(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    /// The dragon reached its target and picked a new one.
    pub fn retargeted(&self) -> bool {
        self.retargeted
    }
}

pub struct MazeEngine {
    config: MazeConfig,
    grid: Grid,
    rng: XorShiftRng,
    player_positions: Vec<Cartesian2DCoordinate>,
    enabled_players: BitSet,
    dragons: Vec<DragonSlot>,
    treasure: Cartesian2DCoordinate,
    current_player: PlayerIndex,
    current_dragon: DragonIndex,
    player_reach_distance: ReachDistance,
    dragon_reach_distance: ReachDistance,
}

impl MazeEngine {
    /// Validates `config`, then generates the first maze. Every player starts enabled.
    pub fn new(config: MazeConfig) -> Result<MazeEngine> {
        config.validate()?;

        let seed = config.seed.unwrap_or_else(rand::random);
        let start = config.start_cell();
        let mut enabled_players = BitSet::with_capacity(config.player_count);
        for player in 0..config.player_count {
            enabled_players.insert(player);
        }

        let mut engine = MazeEngine {
            grid: Grid::new(config.width, config.height)?,
            rng: XorShiftRng::seed_from_u64(seed),
            player_positions: vec![start; config.player_count],
            enabled_players,
            dragons: vec![DragonSlot { position: start, target: start }; config.dragon_count],
            treasure: start,
            current_player: PlayerIndex(0),
            current_dragon: DragonIndex(0),
            player_reach_distance: config.player_reach_distance,
            dragon_reach_distance: config.dragon_reach_distance,
            config,
        };
        debug!(seed, "maze engine seeded");
        engine.create_random_maze()?;
        Ok(engine)
    }

    /// Restart the random generator from `seed`; the next maze and every random pick after
    /// it become repeatable.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = XorShiftRng::seed_from_u64(seed);
    }

    /// Throws the old grid away and carves a new perfect maze.
    ///
    /// All players go back to the start cell, the treasure is hidden again and the dragons
    /// wake up somewhere new with fresh targets. Paths and reachable sets returned before this
    /// call describe the old maze.
    pub fn create_random_maze(&mut self) -> Result<()> {
        let start = self.config.start_cell();
        let mut grid = Grid::new(self.config.width, self.config.height)?;
        let carved = self.config.generator.generate(&mut grid, &mut self.rng, start)?;
        self.grid = grid;

        for position in &mut self.player_positions {
            *position = start;
        }
        self.treasure = self.place_treasure(start)?;
        self.place_dragons(start)?;

        self.current_player = self.first_enabled_player().unwrap_or(PlayerIndex(0));
        self.current_dragon = DragonIndex(0);

        debug!(width = self.config.width.0,
               height = self.config.height.0,
               carved,
               treasure_x = self.treasure.x,
               treasure_y = self.treasure.y,
               "new maze created");
        Ok(())
    }

    #[inline]
    pub fn config(&self) -> &MazeConfig {
        &self.config
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    pub fn width(&self) -> Width {
        self.grid.width()
    }

    #[inline]
    pub fn height(&self) -> Height {
        self.grid.height()
    }

    pub fn cell_at(&self, x: u32, y: u32) -> Result<&MazeCell> {
        self.grid.cell_at_xy(x, y)
    }

    pub fn cell_at_position(&self, position: Cartesian2DCoordinate) -> Result<&MazeCell> {
        self.grid.cell_at(position)
    }

    /// Per-cell annotations for the rendering and practice layers.
    pub fn annotations_mut(&mut self, position: Cartesian2DCoordinate) -> Result<&mut Annotations> {
        self.grid.annotations_mut(position)
    }

    /// Opens an extra passage. On a generated maze this adds a loop, so routes may get shorter.
    pub fn remove_wall_between(&mut self, a: Cartesian2DCoordinate, b: Cartesian2DCoordinate) -> Result<()> {
        self.grid.remove_wall_between(a, b)
    }

    pub fn player_reach_distance(&self) -> ReachDistance {
        self.player_reach_distance
    }

    pub fn set_player_reach_distance(&mut self, reach: ReachDistance) {
        self.player_reach_distance = reach;
    }

    pub fn dragon_reach_distance(&self) -> ReachDistance {
        self.dragon_reach_distance
    }

    pub fn set_dragon_reach_distance(&mut self, reach: ReachDistance) {
        self.dragon_reach_distance = reach;
    }

    pub fn player_count(&self) -> usize {
        self.player_positions.len()
    }

    pub fn dragon_count(&self) -> usize {
        self.dragons.len()
    }

    // Players

    pub fn enable_player(&mut self, player: PlayerIndex) -> Result<()> {
        self.check_player(player)?;
        self.enabled_players.insert(player.0);
        Ok(())
    }

    /// Takes a player out of the game. Its position stays readable. If it was the current
    /// player, the turn moves on to the next enabled player.
    pub fn disable_player(&mut self, player: PlayerIndex) -> Result<()> {
        self.check_player(player)?;
        self.enabled_players.remove(player.0);
        if self.current_player == player {
            if let Some(next) = self.next_enabled_player_after(player) {
                self.current_player = next;
            }
        }
        Ok(())
    }

    pub fn is_player_enabled(&self, player: PlayerIndex) -> bool {
        self.enabled_players.contains(player.0)
    }

    /// Enabled players in index order.
    pub fn enabled_players(&self) -> Vec<PlayerIndex> {
        self.enabled_players.iter().map(PlayerIndex).collect()
    }

    pub fn current_player(&self) -> PlayerIndex {
        self.current_player
    }

    pub fn set_current_player(&mut self, player: PlayerIndex) -> Result<()> {
        self.check_enabled_player(player)?;
        self.current_player = player;
        Ok(())
    }

    /// Hands the turn to the next enabled player, wrapping around.
    pub fn advance_to_next_player(&mut self) -> Result<PlayerIndex> {
        match self.next_enabled_player_after(self.current_player) {
            Some(next) => {
                self.current_player = next;
                Ok(next)
            }
            None => bail!(ErrorKind::InvalidActorIndex(ActorKind::Player, self.current_player.0)),
        }
    }

    pub fn position_of_player(&self, player: PlayerIndex) -> Result<Cartesian2DCoordinate> {
        self.check_player(player)?;
        Ok(self.player_positions[player.0])
    }

    pub fn set_position_of_player(&mut self,
                                  player: PlayerIndex,
                                  position: Cartesian2DCoordinate)
                                  -> Result<()> {
        self.check_enabled_player(player)?;
        self.grid.cell_at(position)?;

        let occupied = self.enabled_players
            .iter()
            .any(|other| other != player.0 && self.player_positions[other] == position);
        if occupied {
            warn!(player = player.0, x = position.x, y = position.y, "player placed on an occupied cell");
        }
        trace!(player = player.0, x = position.x, y = position.y, "player moved");
        self.player_positions[player.0] = position;
        Ok(())
    }

    /// The cell the player currently stands on.
    pub fn entry_for_player(&self, player: PlayerIndex) -> Result<&MazeCell> {
        let position = self.position_of_player(player)?;
        self.grid.cell_at(position)
    }

    pub fn is_treasure_found_by(&self, player: PlayerIndex) -> Result<bool> {
        self.check_enabled_player(player)?;
        Ok(self.player_positions[player.0] == self.treasure)
    }

    /// Enabled players sharing a cell with any dragon, in index order.
    pub fn players_caught_by_dragons(&self) -> Vec<PlayerIndex> {
        self.enabled_players
            .iter()
            .filter(|player| self.dragons.iter().any(|dragon| dragon.position == self.player_positions[*player]))
            .map(PlayerIndex)
            .collect()
    }

    // Dragons

    pub fn current_dragon(&self) -> DragonIndex {
        self.current_dragon
    }

    pub fn set_current_dragon(&mut self, dragon: DragonIndex) -> Result<()> {
        self.check_dragon(dragon)?;
        self.current_dragon = dragon;
        Ok(())
    }

    pub fn advance_to_next_dragon(&mut self) -> Result<DragonIndex> {
        if self.dragons.is_empty() {
            bail!(ErrorKind::InvalidActorIndex(ActorKind::Dragon, self.current_dragon.0));
        }
        self.current_dragon = DragonIndex((self.current_dragon.0 + 1) % self.dragons.len());
        Ok(self.current_dragon)
    }

    pub fn position_of_dragon(&self, dragon: DragonIndex) -> Result<Cartesian2DCoordinate> {
        self.check_dragon(dragon)?;
        Ok(self.dragons[dragon.0].position)
    }

    pub fn set_position_of_dragon(&mut self,
                                  dragon: DragonIndex,
                                  position: Cartesian2DCoordinate)
                                  -> Result<()> {
        self.check_dragon(dragon)?;
        self.grid.cell_at(position)?;
        self.dragons[dragon.0].position = position;
        Ok(())
    }

    pub fn target_position_of_dragon(&self, dragon: DragonIndex) -> Result<Cartesian2DCoordinate> {
        self.check_dragon(dragon)?;
        Ok(self.dragons[dragon.0].target)
    }

    pub fn set_target_position_of_dragon(&mut self,
                                         dragon: DragonIndex,
                                         target: Cartesian2DCoordinate)
                                         -> Result<()> {
        self.check_dragon(dragon)?;
        self.grid.cell_at(target)?;
        self.dragons[dragon.0].target = target;
        Ok(())
    }

    /// Picks a new target uniformly from every cell except the one the dragon is on. On a
    /// single cell maze that cell is the only choice.
    pub fn set_random_target_position_of_dragon(&mut self,
                                                dragon: DragonIndex)
                                                -> Result<Cartesian2DCoordinate> {
        self.check_dragon(dragon)?;
        let current = self.dragons[dragon.0].position;
        let target = self.random_cell_except(current);
        self.dragons[dragon.0].target = target;
        trace!(dragon = dragon.0, x = target.x, y = target.y, "dragon target picked");
        Ok(target)
    }

    /// Moves a dragon up to its reach distance along the shortest route to its target,
    /// picking a new target once the old one is reached.
    pub fn move_dragon(&mut self, dragon: DragonIndex) -> Result<DragonMove> {
        self.check_dragon(dragon)?;
        let DragonSlot { position, target } = self.dragons[dragon.0];

        let mut path = self.shortest_path(position, target)?;
        let ReachDistance(reach) = self.dragon_reach_distance;
        path.truncate(reach.saturating_add(1));

        let destination = path.last().cloned().unwrap_or(position);
        self.dragons[dragon.0].position = destination;

        let retargeted = destination == target;
        if retargeted {
            self.set_random_target_position_of_dragon(dragon)?;
        }
        trace!(dragon = dragon.0, steps = path.len().saturating_sub(1), retargeted, "dragon moved");

        Ok(DragonMove { dragon, path, destination, retargeted })
    }

    /// Every dragon takes its turn in index order.
    pub fn move_dragons(&mut self) -> Result<Vec<DragonMove>> {
        (0..self.dragons.len())
            .map(|dragon| self.move_dragon(DragonIndex(dragon)))
            .collect()
    }

    pub fn position_of_treasure(&self) -> Cartesian2DCoordinate {
        self.treasure
    }

    // Queries

    /// Cells reachable from `position` crossing at most `reach` open passages.
    pub fn reachable_entries(&self,
                             position: Cartesian2DCoordinate,
                             reach: ReachDistance)
                             -> Result<Vec<Cartesian2DCoordinate>> {
        pathing::reachable_entries(&self.grid, position, reach)
    }

    /// Where an enabled player may move this turn, using the player reach distance.
    pub fn reachable_entries_for_player(&self, player: PlayerIndex) -> Result<Vec<Cartesian2DCoordinate>> {
        self.check_enabled_player(player)?;
        self.reachable_entries(self.player_positions[player.0], self.player_reach_distance)
    }

    /// Reachable cells for every enabled player; disabled players are left out.
    pub fn reachable_entries_for_enabled_players(&self)
                                                 -> Result<Vec<(PlayerIndex, Vec<Cartesian2DCoordinate>)>> {
        self.enabled_players()
            .into_iter()
            .map(|player| self.reachable_entries_for_player(player).map(|cells| (player, cells)))
            .collect()
    }

    /// Cells a detected token for `player` may legally be placed on: reachable this turn and
    /// not occupied by another enabled player.
    pub fn valid_positions_for_player(&self, player: PlayerIndex) -> Result<Vec<Cartesian2DCoordinate>> {
        let occupied = self.enabled_players
            .iter()
            .filter(|other| *other != player.0)
            .map(|other| self.player_positions[other])
            .collect::<Vec<_>>();
        Ok(self.reachable_entries_for_player(player)?
            .into_iter()
            .filter(|coord| !occupied.contains(coord))
            .collect())
    }

    /// Shortest route between two cells, both ends included.
    pub fn shortest_path(&self,
                         source: Cartesian2DCoordinate,
                         destination: Cartesian2DCoordinate)
                         -> Result<Vec<Cartesian2DCoordinate>> {
        pathing::shortest_path_between(&self.grid, source, destination)
    }

    /// Everything the rendering layer needs to draw the board.
    pub fn snapshot(&self) -> MazeSnapshot {
        MazeSnapshot {
            width: self.width().0,
            height: self.height().0,
            walls: self.grid.cells().map(|cell| cell.border_mask().bits()).collect(),
            players: self.player_positions
                .iter()
                .enumerate()
                .map(|(index, position)| {
                    PlayerSnapshot {
                        index,
                        position: *position,
                        enabled: self.enabled_players.contains(index),
                    }
                })
                .collect(),
            dragons: self.dragons
                .iter()
                .enumerate()
                .map(|(index, dragon)| {
                    DragonSnapshot {
                        index,
                        position: dragon.position,
                        target: dragon.target,
                    }
                })
                .collect(),
            treasure: self.treasure,
            current_player: self.current_player.0,
            current_dragon: self.current_dragon.0,
        }
    }

    fn place_treasure(&mut self, start: Cartesian2DCoordinate) -> Result<Cartesian2DCoordinate> {
        match self.config.treasure {
            TreasureRule::Random => Ok(self.random_cell_except(start)),
            TreasureRule::FurthestFromStart => {
                let distances = Distances::for_grid(&self.grid, start)?;
                Ok(distances.furthest_points_on_grid()[0])
            }
            TreasureRule::Fixed(coord) => {
                self.grid.cell_at(coord)?;
                Ok(coord)
            }
        }
    }

    fn place_dragons(&mut self, start: Cartesian2DCoordinate) -> Result<()> {
        let positions = match self.config.dragon_placement {
            DragonPlacement::Random { exclusion_radius } => {
                let mut candidates = self.grid
                    .iter()
                    .filter(|coord| coord.manhattan_distance(start) > exclusion_radius)
                    .collect::<Vec<_>>();
                if candidates.is_empty() {
                    warn!(exclusion_radius, "no cell outside the dragon exclusion radius");
                    candidates = self.grid.iter().filter(|coord| *coord != start).collect();
                }
                if candidates.is_empty() {
                    candidates.push(start);
                }
                (0..self.dragons.len())
                    .map(|_| candidates[self.rng.gen_range(0..candidates.len())])
                    .collect::<Vec<_>>()
            }
            DragonPlacement::Fixed(ref cells) => cells.clone(),
        };

        for (dragon, position) in positions.into_iter().enumerate() {
            self.grid.cell_at(position)?;
            self.dragons[dragon].position = position;
            self.set_random_target_position_of_dragon(DragonIndex(dragon))?;
        }
        Ok(())
    }

    fn random_cell_except(&mut self, excluded: Cartesian2DCoordinate) -> Cartesian2DCoordinate {
        let size = self.grid.size();
        match self.grid.grid_coordinate_to_index(excluded) {
            Some(excluded_index) if size > 1 => {
                let mut index = self.rng.gen_range(0..size - 1);
                if index >= excluded_index {
                    index += 1;
                }
                self.grid.index_to_grid_coordinate(index).unwrap_or(excluded)
            }
            _ => self.grid.random_cell(&mut self.rng),
        }
    }

    fn first_enabled_player(&self) -> Option<PlayerIndex> {
        self.enabled_players.iter().next().map(PlayerIndex)
    }

    fn next_enabled_player_after(&self, player: PlayerIndex) -> Option<PlayerIndex> {
        let count = self.player_positions.len();
        (1..=count)
            .map(|offset| (player.0 + offset) % count)
            .find(|candidate| self.enabled_players.contains(*candidate))
            .map(PlayerIndex)
    }

    fn check_player(&self, player: PlayerIndex) -> Result<()> {
        if player.0 < self.player_positions.len() {
            Ok(())
        } else {
            bail!(ErrorKind::InvalidActorIndex(ActorKind::Player, player.0))
        }
    }

    fn check_enabled_player(&self, player: PlayerIndex) -> Result<()> {
        self.check_player(player)?;
        if self.is_player_enabled(player) {
            Ok(())
        } else {
            bail!(ErrorKind::InvalidActorIndex(ActorKind::Player, player.0))
        }
    }

    fn check_dragon(&self, dragon: DragonIndex) -> Result<()> {
        if dragon.0 < self.dragons.len() {
            Ok(())
        } else {
            bail!(ErrorKind::InvalidActorIndex(ActorKind::Dragon, dragon.0))
        }
    }
}
