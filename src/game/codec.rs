//! Text encoding of a board, the only input format the decision oracle reads.
//!
//! Six lines of seven characters, top row first, each terminated by `\n`:
//! `.` for an empty cell, `X` for a human token, `O` for a bot token.

use std::fmt;

use super::board::{Board, Cell, COLS, ROWS};

pub const EMPTY_SYMBOL: char = '.';
pub const HUMAN_SYMBOL: char = 'X';
pub const AUTOMATED_SYMBOL: char = 'O';

/// Byte length of every encoded board.
pub const ENCODED_LEN: usize = ROWS * (COLS + 1);

/// A board rendered in the oracle's text format.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EncodedBoard(String);

impl EncodedBoard {
    /// Wrap text that is already in the oracle format (e.g. read from a file).
    /// No validation happens here; the oracle rejects malformed input itself.
    pub fn from_raw(text: impl Into<String>) -> Self {
        EncodedBoard(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EncodedBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn symbol(cell: Cell) -> char {
    match cell {
        Cell::Empty => EMPTY_SYMBOL,
        Cell::Human => HUMAN_SYMBOL,
        Cell::Automated => AUTOMATED_SYMBOL,
    }
}

pub fn encode(board: &Board) -> EncodedBoard {
    let mut out = String::with_capacity(ENCODED_LEN);
    for row in 0..ROWS {
        for col in 0..COLS {
            out.push(symbol(board.get(row, col)));
        }
        out.push('\n');
    }
    EncodedBoard(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Player;

    #[test]
    fn test_empty_board_encoding() {
        let encoded = encode(&Board::new());
        assert_eq!(encoded.as_str(), ".......\n".repeat(ROWS));
        assert_eq!(encoded.as_str().len(), ENCODED_LEN);
    }

    #[test]
    fn test_top_row_comes_first() {
        let mut board = Board::new();
        board.drop_token(0, Player::Human).unwrap();
        board.drop_token(0, Player::Automated).unwrap();
        board.drop_token(6, Player::Automated).unwrap();

        let expected = "\
.......
.......
.......
.......
O......
X.....O
";
        assert_eq!(encode(&board).as_str(), expected);
        assert_eq!(encode(&board).to_string(), expected);
    }

    #[test]
    fn test_every_line_is_terminated() {
        let mut board = Board::new();
        for col in 0..COLS {
            board.drop_token(col, Player::Human).unwrap();
        }
        let encoded = encode(&board);
        let lines: Vec<&str> = encoded.as_str().split_terminator('\n').collect();
        assert_eq!(lines.len(), ROWS);
        assert!(lines.iter().all(|line| line.len() == COLS));
        assert!(encoded.as_str().ends_with('\n'));
    }

    #[test]
    fn test_symbol_counts_match_drops() {
        let mut board = Board::new();
        let moves = [3, 3, 2, 4, 4, 4, 0, 6, 5, 3, 3, 1, 2];
        let mut player = Player::Human;
        for &col in &moves {
            board.drop_token(col, player).unwrap();
            player = player.other();
        }

        let encoded = encode(&board);
        let count = |ch| encoded.as_str().chars().filter(|&c| c == ch).count();
        assert_eq!(count(HUMAN_SYMBOL), 7);
        assert_eq!(count(AUTOMATED_SYMBOL), 6);
        assert_eq!(count(EMPTY_SYMBOL), ROWS * COLS - moves.len());
        assert_eq!(count(HUMAN_SYMBOL), board.token_count(Player::Human));
    }
}
