use crate::error::SessionError;
use crate::game::{Board, BoardError, BotProfile, GameSession, Outcome, Phase, Player, Scores, Status};

/// Everything the UI needs to draw one frame of the game.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub generation: u64,
    pub board: Board,
    pub status: Status,
    pub current_player: Player,
    pub scores: Scores,
    pub bot: BotProfile,
    /// The bot's reply has been requested and not yet applied.
    pub thinking: bool,
    pub halted: bool,
}

impl SessionSnapshot {
    pub fn of(session: &GameSession) -> Self {
        SessionSnapshot {
            generation: session.generation(),
            board: *session.board(),
            status: session.status(),
            current_player: session.current_player(),
            scores: session.scores(),
            bot: session.active_bot(),
            thinking: false,
            halted: session.is_halted(),
        }
    }

    pub fn accepts_human_move(&self) -> bool {
        !self.thinking && !self.halted && self.status == Status::Active(Phase::WaitingForHuman)
    }
}

/// Updates sent from the session worker to the UI. Each carries the game
/// generation it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionUpdate {
    Snapshot(SessionSnapshot),
    Rejected {
        generation: u64,
        error: BoardError,
    },
    /// Recoverable oracle failure; nothing was applied.
    OracleFailed {
        generation: u64,
        error: SessionError,
    },
    /// The oracle broke its contract; only a new game helps.
    Halted {
        generation: u64,
        error: SessionError,
    },
    /// Sent after the result delay once a game has ended.
    GameOver {
        generation: u64,
        outcome: Outcome,
        bot: BotProfile,
    },
}

impl SessionUpdate {
    pub fn generation(&self) -> u64 {
        match self {
            SessionUpdate::Snapshot(snapshot) => snapshot.generation,
            SessionUpdate::Rejected { generation, .. }
            | SessionUpdate::OracleFailed { generation, .. }
            | SessionUpdate::Halted { generation, .. }
            | SessionUpdate::GameOver { generation, .. } => *generation,
        }
    }
}

/// Commands sent from the UI to the session worker.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    Drop(usize),
    NewGame,
    SelectBot(BotProfile),
    /// Ask again for a bot reply that failed.
    RetryReply,
    Shutdown,
}

/// Result popup text.
pub fn outcome_message(outcome: Outcome, bot: &BotProfile) -> String {
    match outcome {
        Outcome::HumanWin => "You won!".to_string(),
        Outcome::AutomatedWin => format!("{} won!", bot.display_name()),
        Outcome::Draw => "Draw!".to_string(),
    }
}
