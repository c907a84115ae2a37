//! Core Connect Four game logic: board representation, the text encoding sent
//! to the decision oracle, the bot catalogue, and the session state machine.

mod board;
pub mod bots;
pub mod codec;
mod player;
mod session;

pub use board::{Board, BoardError, Cell, COLS, ROWS};
pub use bots::BotProfile;
pub use codec::EncodedBoard;
pub use player::Player;
pub use session::{
    AppliedMove, GameSession, MoveOutcome, Outcome, Phase, Scores, Status, TurnReport,
};
