use std::collections::VecDeque;
use std::sync::Mutex;

use super::position::Position;
use super::{Oracle, TerminalSignal};
use crate::error::OracleError;
use crate::game::{EncodedBoard, Player};

/// A recorded oracle call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OracleCall {
    EvaluateTerminal(EncodedBoard),
    RecommendMove {
        board: EncodedBoard,
        player: Player,
        effort: u32,
    },
}

#[derive(Default)]
struct Script {
    terminals: VecDeque<Result<TerminalSignal, OracleError>>,
    moves: VecDeque<Result<usize, OracleError>>,
    calls: Vec<OracleCall>,
}

/// Oracle that replays queued answers and records every call.
///
/// With nothing queued, `evaluate_terminal` looks for four in a row on the
/// encoded board and `recommend_move` answers its leftmost open column.
#[derive(Default)]
pub struct ScriptedOracle {
    script: Mutex<Script>,
}

impl ScriptedOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_terminal(&self, answer: Result<TerminalSignal, OracleError>) -> &Self {
        self.lock().terminals.push_back(answer);
        self
    }

    pub fn push_move(&self, answer: Result<usize, OracleError>) -> &Self {
        self.lock().moves.push_back(answer);
        self
    }

    pub fn calls(&self) -> Vec<OracleCall> {
        self.lock().calls.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Script> {
        // A panicking test thread cannot leave the script half-updated.
        self.script.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn leftmost_open_column(board: &EncodedBoard) -> Option<usize> {
    board
        .as_str()
        .lines()
        .next()
        .and_then(|top| top.chars().position(|c| c == '.'))
}

#[async_trait::async_trait]
impl Oracle for ScriptedOracle {
    async fn evaluate_terminal(&self, board: &EncodedBoard) -> Result<TerminalSignal, OracleError> {
        let mut script = self.lock();
        script.calls.push(OracleCall::EvaluateTerminal(board.clone()));
        match script.terminals.pop_front() {
            Some(answer) => answer,
            None => {
                let winner = Position::parse(board.as_str())?.winner();
                TerminalSignal::from_wire(winner)
                    .ok_or_else(|| OracleError::Rejected("winner out of range".into()))
            }
        }
    }

    async fn recommend_move(
        &self,
        board: &EncodedBoard,
        player: Player,
        effort: u32,
    ) -> Result<usize, OracleError> {
        let mut script = self.lock();
        script.calls.push(OracleCall::RecommendMove {
            board: board.clone(),
            player,
            effort,
        });
        match script.moves.pop_front() {
            Some(answer) => answer,
            None => leftmost_open_column(board).ok_or(OracleError::NoMove),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
