//! # Connect Four MCTS
//!
//! Connect Four in the terminal against a Monte Carlo tree search bot.
//! The game session validates moves and keeps scores; every decision about
//! winners and bot moves is delegated to an oracle that reads a text encoding
//! of the board.
//!
//! ## Modules
//!
//! - [`game`]: Board, codec, bot roster, and the game session state machine
//! - [`oracle`]: Oracle trait, MCTS oracle, late-bound and scripted oracles
//! - [`play`]: Background session worker and its message types
//! - [`ui`]: Terminal UI
//! - [`config`]: TOML configuration loading and validation
//! - [`logging`]: `tracing` subscriber setup
//! - [`error`]: Structured error types

pub mod config;
pub mod error;
pub mod game;
pub mod logging;
pub mod oracle;
pub mod play;
pub mod ui;
