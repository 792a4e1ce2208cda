use docopt::Docopt;
use error_chain::bail;
use serde_derive::Deserialize;
use tabletop_maze::{
    config::MazeConfig,
    engine::MazeEngine,
    generators::GeneratorKind,
    grid_displays::{ActorsDisplay, GridDisplay, PathDisplay, ReachableDisplay},
    pathing::{self, Distances},
    units::{Height, PlayerIndex, ReachDistance, Width},
};
use tracing::info;

const USAGE: &str = "Tabletop maze

Usage:
    maze_driver -h | --help
    maze_driver [--width=<w> --height=<h>] [--seed=<s>] [--players=<n>] [--dragons=<n>] [--player-reach=<r>] [--dragon-reach=<r>] [--generator=<g>] [--show=<view>] [--turns=<n>] [--json]

Options:
    -h --help              Show this screen.
    --width=<w>            The grid width in a w*h grid [default: 10].
    --height=<h>           The grid height in a w*h grid [default: 10].
    --seed=<s>             Pin the random generator so the same maze comes out every run.
    --players=<n>          Number of player tokens [default: 4].
    --dragons=<n>          Number of dragons [default: 1].
    --player-reach=<r>     Passages a player may cross per move [default: 4].
    --dragon-reach=<r>     Passages a dragon may cross per move [default: 2].
    --generator=<g>        Maze carving algorithm: prim or backtracker [default: prim].
    --show=<view>          What to draw in the cells: actors, reach, path, distances or longest [default: actors].
    --turns=<n>            Play n rounds, each player walking toward the treasure and every dragon chasing its target [default: 0].
    --json                 Print the final board as JSON instead of drawing it.
";

#[derive(Debug, Deserialize)]
struct MazeArgs {
    flag_width: usize,
    flag_height: usize,
    flag_seed: Option<u64>,
    flag_players: usize,
    flag_dragons: usize,
    flag_player_reach: usize,
    flag_dragon_reach: usize,
    flag_generator: String,
    flag_show: String,
    flag_turns: usize,
    flag_json: bool,
}

mod errors {
    use error_chain::*;
    error_chain! {
        links {
            Maze(::tabletop_maze::errors::Error, ::tabletop_maze::errors::ErrorKind);
        }
    }
}
use crate::errors::*;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive(tracing::Level::INFO.into()))
        .with_writer(std::io::stderr)
        .init();

    let args: MazeArgs = Docopt::new(USAGE)
        .and_then(|d| d.deserialize())
        .unwrap_or_else(|e| e.exit());

    let config = MazeConfig::builder()
        .dimensions(Width(args.flag_width), Height(args.flag_height))
        .players(args.flag_players)
        .dragons(args.flag_dragons)
        .player_reach_distance(ReachDistance(args.flag_player_reach))
        .dragon_reach_distance(ReachDistance(args.flag_dragon_reach))
        .generator(parse_generator(&args.flag_generator)?)
        .seed(args.flag_seed)
        .build()?;

    let mut engine = MazeEngine::new(config)?;
    info!(width = args.flag_width, height = args.flag_height, "maze ready");

    for turn in 0..args.flag_turns {
        if !play_round(&mut engine, turn)? {
            break;
        }
    }

    if args.flag_json {
        println!("{}", engine.snapshot().to_json()?);
    } else {
        let display = cell_display(&engine, &args.flag_show)?;
        println!("{}", engine.grid().render_with(display.as_ref()));
    }
    Ok(())
}

fn parse_generator(name: &str) -> Result<GeneratorKind> {
    match name {
        "prim" => Ok(GeneratorKind::RandomizedPrim),
        "backtracker" => Ok(GeneratorKind::RecursiveBacktracker),
        other => bail!("unknown generator '{}', expected prim or backtracker", other),
    }
}

fn cell_display(engine: &MazeEngine, view: &str) -> Result<Box<dyn GridDisplay>> {
    let start = engine.config().start_cell();
    let display: Box<dyn GridDisplay> = match view {
        "actors" => Box::new(ActorsDisplay::new(engine.snapshot())),
        "reach" => {
            let player = engine.current_player();
            Box::new(ReachableDisplay::new(&engine.reachable_entries_for_player(player)?))
        }
        "path" => Box::new(PathDisplay::new(&engine.shortest_path(start, engine.position_of_treasure())?)),
        "distances" => Box::new(Distances::for_grid(engine.grid(), start)?),
        "longest" => Box::new(PathDisplay::new(&pathing::longest_path(engine.grid())?)),
        other => bail!("unknown view '{}', expected actors, reach, path, distances or longest", other),
    };
    Ok(display)
}

/// One round: every enabled player steps toward the treasure, then the dragons move.
/// Returns false once the game is over.
fn play_round(engine: &mut MazeEngine, turn: usize) -> Result<bool> {
    for player in engine.enabled_players() {
        let position = engine.position_of_player(player)?;
        let route = engine.shortest_path(position, engine.position_of_treasure())?;
        let ReachDistance(reach) = engine.player_reach_distance();
        let destination = route[reach.min(route.len().saturating_sub(1))];
        engine.set_position_of_player(player, destination)?;

        if engine.is_treasure_found_by(player)? {
            info!(turn, player = player.0, "treasure found");
            return Ok(false);
        }
    }

    for dragon_move in engine.move_dragons()? {
        info!(turn,
              dragon = dragon_move.dragon().0,
              steps = dragon_move.steps(),
              retargeted = dragon_move.retargeted(),
              "dragon moved");
    }

    for PlayerIndex(caught) in engine.players_caught_by_dragons() {
        info!(turn, player = caught, "player caught by a dragon");
        engine.disable_player(PlayerIndex(caught))?;
    }

    if engine.enabled_players().is_empty() {
        info!(turn, "every player has been caught");
        return Ok(false);
    }
    engine.advance_to_next_player()?;
    Ok(true)
}
