//! The search engine's own view of a board, parsed from the text encoding.

use crate::error::OracleError;
use crate::game::codec::{AUTOMATED_SYMBOL, EMPTY_SYMBOL, HUMAN_SYMBOL};
use crate::game::{COLS, ROWS};

const CONNECT: usize = 4;

/// Grid of wire values (1, -1, 0). Row 0 is the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    cells: [[i8; COLS]; ROWS],
}

impl Position {
    pub fn empty() -> Self {
        Position {
            cells: [[0; COLS]; ROWS],
        }
    }

    /// Parse the oracle text format. Lines may end in `\n` or `\r\n`; the last
    /// terminator is optional.
    pub fn parse(text: &str) -> Result<Self, OracleError> {
        let mut position = Position::empty();
        let mut rows = 0;

        for (row, line) in text.lines().enumerate() {
            if row >= ROWS {
                return Err(OracleError::Rejected(format!(
                    "expected {ROWS} rows, found more"
                )));
            }
            let width = line.chars().count();
            if width != COLS {
                return Err(OracleError::Rejected(format!(
                    "row {row} has {width} cells, expected {COLS}"
                )));
            }
            for (col, ch) in line.chars().enumerate() {
                position.cells[row][col] = match ch {
                    EMPTY_SYMBOL => 0,
                    HUMAN_SYMBOL => 1,
                    AUTOMATED_SYMBOL => -1,
                    other => {
                        return Err(OracleError::Rejected(format!(
                            "unexpected character {other:?} at row {row}, column {col}"
                        )))
                    }
                };
            }
            rows += 1;
        }

        if rows != ROWS {
            return Err(OracleError::Rejected(format!(
                "expected {ROWS} rows, found {rows}"
            )));
        }

        // Tokens must rest on the bottom or on another token.
        for col in 0..COLS {
            let mut gap = false;
            for row in (0..ROWS).rev() {
                if position.cells[row][col] == 0 {
                    gap = true;
                } else if gap {
                    return Err(OracleError::Rejected(format!(
                        "floating token at row {row}, column {col}"
                    )));
                }
            }
        }

        Ok(position)
    }

    pub fn get(&self, row: usize, col: usize) -> i8 {
        self.cells[row][col]
    }

    /// Columns with room left, in ascending order.
    pub fn available(&self) -> Vec<usize> {
        (0..COLS).filter(|&col| self.cells[0][col] == 0).collect()
    }

    /// Drop `player`'s token into `col`. Returns false if the column is full.
    pub fn play(&mut self, col: usize, player: i8) -> bool {
        for row in (0..ROWS).rev() {
            if self.cells[row][col] == 0 {
                self.cells[row][col] = player;
                return true;
            }
        }
        false
    }

    /// 1 or -1 if that player has four in a row, otherwise 0.
    pub fn winner(&self) -> i8 {
        // (row step, col step): horizontal, vertical, diagonal \, diagonal /
        const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (-1, 1)];

        for row in 0..ROWS {
            for col in 0..COLS {
                let first = self.cells[row][col];
                if first == 0 {
                    continue;
                }
                for &(dr, dc) in &DIRECTIONS {
                    if self.line_from(row, col, dr, dc, first) {
                        return first;
                    }
                }
            }
        }
        0
    }

    fn line_from(&self, row: usize, col: usize, dr: isize, dc: isize, value: i8) -> bool {
        (1..CONNECT as isize).all(|step| {
            let r = row as isize + dr * step;
            let c = col as isize + dc * step;
            r >= 0
                && c >= 0
                && (r as usize) < ROWS
                && (c as usize) < COLS
                && self.cells[r as usize][c as usize] == value
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Position {
        Position::parse(text).unwrap()
    }

    #[test]
    fn parses_encoded_board() {
        let position = parse(
            "\
.......
.......
.......
.......
......O
.OXX.XO
",
        );
        assert_eq!(position.get(5, 1), -1);
        assert_eq!(position.get(5, 2), 1);
        assert_eq!(position.get(4, 6), -1);
        assert_eq!(position.get(0, 0), 0);
    }

    #[test]
    fn accepts_crlf_and_missing_final_newline() {
        let text = ".......\r\n".repeat(5) + "X......";
        let position = parse(&text);
        assert_eq!(position.get(5, 0), 1);
    }

    #[test]
    fn rejects_malformed_boards() {
        let five_rows = ".......\n".repeat(5);
        assert!(Position::parse(&five_rows).is_err());

        let seven_rows = ".......\n".repeat(7);
        assert!(Position::parse(&seven_rows).is_err());

        let wide = ".......\n".repeat(5) + "........\n";
        assert!(Position::parse(&wide).is_err());

        let bad_char = ".......\n".repeat(5) + "...Z...\n";
        assert!(matches!(
            Position::parse(&bad_char),
            Err(OracleError::Rejected(_))
        ));
    }

    #[test]
    fn rejects_floating_tokens() {
        let text = "\
.......
.......
.......
...X...
.......
...O...
";
        assert!(Position::parse(text).is_err());
    }

    #[test]
    fn available_skips_full_columns() {
        let position = parse(
            "\
X.....O
O.....X
X.....O
O.....X
X.....O
O.....X
",
        );
        assert_eq!(position.available(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn play_stacks_tokens() {
        let mut position = Position::empty();
        assert!(position.play(2, 1));
        assert!(position.play(2, -1));
        assert_eq!(position.get(5, 2), 1);
        assert_eq!(position.get(4, 2), -1);
        for _ in 0..4 {
            assert!(position.play(2, 1));
        }
        assert!(!position.play(2, 1));
    }

    #[test]
    fn winner_horizontal_and_vertical() {
        let horizontal = parse(
            "\
.......
.......
.......
.......
.......
OOOO...
",
        );
        assert_eq!(horizontal.winner(), -1);

        let vertical = parse(
            "\
.......
.......
......X
......X
......X
O.O...X
",
        );
        assert_eq!(vertical.winner(), 1);
    }

    #[test]
    fn winner_diagonals() {
        let rising = parse(
            "\
X.XO...
O.OX...
XOOOX..
OXXXOO.
XOOXXO.
XOXOXO.
",
        );
        assert_eq!(rising.winner(), -1);

        let falling = parse(
            "\
.......
.......
X......
OX.....
OOX....
OOXX...
",
        );
        assert_eq!(falling.winner(), 1);
    }

    #[test]
    fn no_winner_with_three() {
        let position = parse(
            "\
.......
.......
.......
.......
.......
XXX.OO.
",
        );
        assert_eq!(position.winner(), 0);
    }
}
