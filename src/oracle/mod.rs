//! Decision oracle: the move-search and win-detection service a game session
//! delegates to. Sessions talk to it only through the text board encoding.

mod mcts;
mod position;
mod scripted;
mod shared;

use crate::error::OracleError;
use crate::game::{EncodedBoard, Player};

pub use mcts::{MctsConfig, MctsOracle, MAX_ROLLOUTS_PER_ITERATION};
pub use position::Position;
pub use scripted::{OracleCall, ScriptedOracle};
pub use shared::SharedOracle;

/// Result of asking the oracle whether a position is decided.
///
/// Draws are never reported here; the session infers them from a full board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalSignal {
    None,
    Wins(Player),
}

impl TerminalSignal {
    /// Wire form: 0 for no winner, otherwise the winner's player value.
    pub fn wire_value(self) -> i8 {
        match self {
            TerminalSignal::None => 0,
            TerminalSignal::Wins(player) => player.wire_value(),
        }
    }

    pub fn from_wire(value: i8) -> Option<Self> {
        match value {
            0 => Some(TerminalSignal::None),
            other => Player::from_wire(other).map(TerminalSignal::Wins),
        }
    }
}

/// Both calls may take time proportional to the work asked of them and are
/// the only suspension points of a game session. Implementations hold no
/// per-session state.
#[async_trait::async_trait]
pub trait Oracle: Send + Sync {
    /// Report whether either player has connected four on `board`.
    async fn evaluate_terminal(&self, board: &EncodedBoard) -> Result<TerminalSignal, OracleError>;

    /// Pick a column for `player` to play. `effort` is the search budget; it
    /// must be positive.
    async fn recommend_move(
        &self,
        board: &EncodedBoard,
        player: Player,
        effort: u32,
    ) -> Result<usize, OracleError>;

    /// Display name for logs.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_signal_wire_values() {
        assert_eq!(TerminalSignal::None.wire_value(), 0);
        assert_eq!(TerminalSignal::Wins(Player::Human).wire_value(), 1);
        assert_eq!(TerminalSignal::Wins(Player::Automated).wire_value(), -1);
        assert_eq!(
            TerminalSignal::from_wire(-1),
            Some(TerminalSignal::Wins(Player::Automated))
        );
        assert_eq!(TerminalSignal::from_wire(2), None);
    }
}
