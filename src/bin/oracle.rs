//! Command-line front end to the MCTS oracle.
//!
//! Reads a board in the text encoding from `--board` or stdin and prints
//! either the winner value (`score`) or a recommended column (`best-move`).

use std::io::Read;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use connect_four_mcts::config::AppConfig;
use connect_four_mcts::game::{EncodedBoard, Player};
use connect_four_mcts::logging;
use connect_four_mcts::oracle::{MctsOracle, Oracle};

#[derive(Parser)]
#[command(name = "connect-four-oracle", about = "Query the Connect Four MCTS oracle")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Board file; stdin when omitted
    #[arg(long)]
    board: Option<PathBuf>,

    /// Override the RNG seed
    #[arg(long)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print 1 or -1 for a winner, 0 otherwise
    Score,
    /// Print the recommended column (0-based)
    BestMove {
        /// Player to move: 1 (X) or -1 (O)
        #[arg(long, allow_hyphen_values = true)]
        player: i8,
        /// Search iterations
        #[arg(long, default_value_t = 1000)]
        effort: u32,
    },
}

fn read_board(path: Option<&PathBuf>) -> Result<EncodedBoard> {
    let text = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading board from {}", path.display()))?,
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("reading board from stdin")?;
            text
        }
    };
    Ok(EncodedBoard::from_raw(text))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;
    if cli.seed.is_some() {
        config.oracle.seed = cli.seed;
    }
    logging::init_stderr(&config.logging);

    let board = read_board(cli.board.as_ref())?;
    let oracle = MctsOracle::new(config.oracle);

    let runtime = tokio::runtime::Runtime::new().context("starting async runtime")?;
    runtime.block_on(async {
        match cli.command {
            Command::Score => {
                let signal = oracle.evaluate_terminal(&board).await?;
                println!("{}", signal.wire_value());
            }
            Command::BestMove { player, effort } => {
                let Some(player) = Player::from_wire(player) else {
                    bail!("player must be 1 or -1, got {player}");
                };
                let column = oracle.recommend_move(&board, player, effort).await?;
                println!("{column}");
            }
        }
        Ok::<_, anyhow::Error>(())
    })
}
