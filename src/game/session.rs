use std::fmt;
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::board::{Board, BoardError};
use super::bots::BotProfile;
use super::codec;
use super::player::Player;
use crate::error::SessionError;
use crate::oracle::{Oracle, TerminalSignal};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    HumanWin,
    AutomatedWin,
    Draw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    WaitingForHuman,
    WaitingForAutomated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Active(Phase),
    Ended(Outcome),
}

impl Phase {
    fn for_player(player: Player) -> Phase {
        match player {
            Player::Human => Phase::WaitingForHuman,
            Player::Automated => Phase::WaitingForAutomated,
        }
    }
}

/// Running tallies across games. A draw is worth half a point to each side.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Scores {
    pub human: f64,
    pub automated: f64,
}

impl Scores {
    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::HumanWin => self.human += 1.0,
            Outcome::AutomatedWin => self.automated += 1.0,
            Outcome::Draw => {
                self.human += 0.5;
                self.automated += 0.5;
            }
        }
    }
}

impl fmt::Display for Scores {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} : {}", self.human, self.automated)
    }
}

/// A move that made it onto the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedMove {
    pub player: Player,
    pub column: usize,
    pub row: usize,
    /// Session status right after the move.
    pub status: Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Not this player's turn, or the game is over. Nothing changed.
    Ignored,
    /// The column cannot take a token. Nothing changed.
    Rejected(BoardError),
    Applied(AppliedMove),
}

impl MoveOutcome {
    pub fn applied(&self) -> Option<&AppliedMove> {
        match self {
            MoveOutcome::Applied(applied) => Some(applied),
            _ => None,
        }
    }
}

/// What happened during [`GameSession::play_turn`].
#[derive(Debug, Clone, PartialEq)]
pub struct TurnReport {
    pub human: MoveOutcome,
    /// `None` when no reply was due.
    pub reply: Option<Result<MoveOutcome, SessionError>>,
}

/// One human-versus-bot game table: the board, whose turn it is, the running
/// score and the selected bot.
///
/// Every move goes through a candidate copy of the board. The oracle calls are
/// awaited against the candidate and the session only changes once they have
/// all succeeded, so a failed or dropped call leaves it exactly as it was.
pub struct GameSession {
    board: Board,
    current_player: Player,
    status: Status,
    scores: Scores,
    bot: BotProfile,
    oracle: Arc<dyn Oracle>,
    halted: bool,
    generation: u64,
}

impl GameSession {
    pub fn new(oracle: Arc<dyn Oracle>, bot: BotProfile) -> Self {
        GameSession {
            board: Board::new(),
            current_player: Player::Human,
            status: Status::Active(Phase::WaitingForHuman),
            scores: Scores::default(),
            bot,
            oracle,
            halted: false,
            generation: 0,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_active(&self) -> bool {
        matches!(self.status, Status::Active(_))
    }

    pub fn scores(&self) -> Scores {
        self.scores
    }

    pub fn active_bot(&self) -> BotProfile {
        self.bot
    }

    /// True after the oracle broke its contract; cleared by [`Self::new_game`].
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Number of times [`Self::new_game`] has run.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Switch opponents. Takes effect from the bot's next move; the board is
    /// left alone.
    pub fn select_bot(&mut self, bot: BotProfile) {
        info!(bot = bot.name(), effort = bot.effort(), "bot selected");
        self.bot = bot;
    }

    /// Clear the board and give the first move to the human. Scores carry over.
    pub fn new_game(&mut self) {
        self.board.reset();
        self.current_player = Player::Human;
        self.status = Status::Active(Phase::WaitingForHuman);
        self.halted = false;
        self.generation += 1;
        info!(generation = self.generation, scores = %self.scores, "new game");
    }

    /// Drop a human token into `column`.
    ///
    /// Ignored unless the human is to move. A full or missing column is
    /// reported as [`MoveOutcome::Rejected`]. Oracle failures leave the session
    /// untouched and may be retried.
    pub async fn submit_human_move(&mut self, column: usize) -> Result<MoveOutcome, SessionError> {
        if self.halted {
            return Err(SessionError::Halted);
        }
        if self.status != Status::Active(Phase::WaitingForHuman) {
            debug!(column, status = ?self.status, "human move ignored");
            return Ok(MoveOutcome::Ignored);
        }

        let mut candidate = self.board;
        let row = match candidate.drop_token(column, Player::Human) {
            Ok(row) => row,
            Err(err) => {
                debug!(column, %err, "human move rejected");
                return Ok(MoveOutcome::Rejected(err));
            }
        };

        self.conclude_move(candidate, Player::Human, column, row).await
    }

    /// Ask the oracle for the bot's move and play it.
    ///
    /// Ignored unless the bot is to move. A recommendation the board cannot
    /// take halts the session.
    pub async fn play_automated_move(&mut self) -> Result<MoveOutcome, SessionError> {
        if self.halted {
            return Err(SessionError::Halted);
        }
        if self.status != Status::Active(Phase::WaitingForAutomated) {
            debug!(status = ?self.status, "automated move ignored");
            return Ok(MoveOutcome::Ignored);
        }

        let encoded = codec::encode(&self.board);
        let effort = self.bot.effort();
        let column = self
            .oracle
            .recommend_move(&encoded, Player::Automated, effort)
            .await
            .inspect_err(|err| warn!(%err, bot = self.bot.name(), "move recommendation failed"))?;

        let mut candidate = self.board;
        let row = match candidate.drop_token(column, Player::Automated) {
            Ok(row) => row,
            Err(source) => {
                error!(
                    column,
                    %source,
                    oracle = self.oracle.name(),
                    board = %encoded,
                    "oracle recommended an illegal move"
                );
                self.halted = true;
                return Err(SessionError::OracleContractViolation { column, source });
            }
        };

        self.conclude_move(candidate, Player::Automated, column, row).await
    }

    /// A human move followed by the bot's reply when one is due.
    pub async fn play_turn(&mut self, column: usize) -> Result<TurnReport, SessionError> {
        let human = self.submit_human_move(column).await?;
        let reply = if self.status == Status::Active(Phase::WaitingForAutomated) {
            Some(self.play_automated_move().await)
        } else {
            None
        };
        Ok(TurnReport { human, reply })
    }

    async fn conclude_move(
        &mut self,
        candidate: Board,
        player: Player,
        column: usize,
        row: usize,
    ) -> Result<MoveOutcome, SessionError> {
        let encoded = codec::encode(&candidate);
        let signal = self
            .oracle
            .evaluate_terminal(&encoded)
            .await
            .inspect_err(|err| warn!(%err, "terminal evaluation failed"))?;

        let status = match signal {
            TerminalSignal::Wins(Player::Human) => Status::Ended(Outcome::HumanWin),
            TerminalSignal::Wins(Player::Automated) => Status::Ended(Outcome::AutomatedWin),
            TerminalSignal::None if candidate.is_full() => Status::Ended(Outcome::Draw),
            TerminalSignal::None => Status::Active(Phase::for_player(player.other())),
        };

        self.board = candidate;
        self.current_player = player.other();
        self.status = status;
        debug!(player = player.name(), column, row, "move applied");

        if let Status::Ended(outcome) = status {
            self.scores.record(outcome);
            info!(?outcome, scores = %self.scores, bot = self.bot.name(), "game over");
        }

        Ok(MoveOutcome::Applied(AppliedMove {
            player,
            column,
            row,
            status,
        }))
    }
}

impl fmt::Debug for GameSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameSession")
            .field("board", &self.board)
            .field("current_player", &self.current_player)
            .field("status", &self.status)
            .field("scores", &self.scores)
            .field("bot", &self.bot.name())
            .field("oracle", &self.oracle.name())
            .field("halted", &self.halted)
            .field("generation", &self.generation)
            .finish()
    }
}
