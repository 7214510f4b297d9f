#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Tidewrap over the standard streams.
//!
//! Standard input carries the transport's frames and standard output carries
//! the bot name followed by one line of commands per turn. Logs go to
//! standard error so they never corrupt the protocol.

mod game;
mod transport;

use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use clap::Parser;
use tidewrap_core::{Command, DEFAULT_BOT_NAME};
use tidewrap_system_harvest::{Config, Harvest};
use tracing::{debug, info, warn};

use self::game::Game;
use self::transport::{read_game_start, read_turn, TokenReader};

/// Options accepted by the bot binary.
#[derive(Debug, Parser)]
#[command(name = "tidewrap", about = "Toroidal harvesting bot")]
struct Args {
    /// Seed for the navigator's axis-order coin flips.
    #[arg(long, default_value_t = 0x5eed_1e55)]
    seed: u64,
    /// Radius of the scan for richer cells.
    #[arg(long, default_value_t = 8)]
    search_radius: u32,
    /// Ships keep mining a cell holding at least this much halite.
    #[arg(long, default_value_t = 100)]
    minimum_cell_halite: u32,
    /// Share of the game, in percent, during which new ships are spawned.
    #[arg(long, default_value_t = 50)]
    spawn_turn_limit_percent: u32,
    /// Name reported to the transport after the game start.
    #[arg(long, default_value = DEFAULT_BOT_NAME)]
    bot_name: String,
}

/// Entry point for the Tidewrap command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let stdin = io::stdin();
    let mut reader = TokenReader::new(stdin.lock());
    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());

    let start = read_game_start(&mut reader).context("failed to decode game start")?;
    let mut game = Game::new(start);
    info!(
        width = game.map.width(),
        height = game.map.height(),
        players = game.player_count(),
        total_halite = game.map.total_halite(),
        seed = args.seed,
        "Game started"
    );

    writeln!(writer, "{}", args.bot_name).context("failed to register bot name")?;
    writer.flush().context("failed to flush bot name")?;

    let config = Config::new(
        args.search_radius,
        args.minimum_cell_halite,
        args.spawn_turn_limit_percent,
    );
    let mut harvest = Harvest::seeded(config, args.seed);

    while let Some(frame) =
        read_turn(&mut reader, game.player_count()).context("failed to decode turn frame")?
    {
        game.update(frame)
            .with_context(|| format!("failed to apply turn {}", game.turn))?;

        let mut commands = Vec::new();
        if game.decide(&mut harvest, &mut commands) {
            debug!(turn = game.turn, commands = commands.len(), "Turn decided");
        } else {
            warn!(turn = game.turn, "Own player missing from game start");
        }

        write_commands(&mut writer, &commands)
            .with_context(|| format!("failed to send commands for turn {}", game.turn))?;
    }

    info!(turn = game.turn, "Transport closed, shutting down");
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .try_init();
}

fn write_commands<W>(writer: &mut W, commands: &[Command]) -> io::Result<()>
where
    W: Write,
{
    let line = commands
        .iter()
        .map(Command::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    writeln!(writer, "{line}")?;
    writer.flush()
}
