use super::player::Player;

pub const ROWS: usize = 6;
pub const COLS: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Human,
    Automated,
}

/// The grid plus a fill pointer per column.
///
/// Row 0 is the top, row 5 is the bottom. `heights[col]` is the number of free
/// cells left in `col`, so a full column has height 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    cells: [[Cell; COLS]; ROWS],
    heights: [usize; COLS],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("column {0} is full")]
    ColumnFull(usize),

    #[error("column {0} does not exist (expected 0..7)")]
    InvalidColumn(usize),
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Board {
            cells: [[Cell::Empty; COLS]; ROWS],
            heights: [ROWS; COLS],
        }
    }

    /// Discard every token.
    pub fn reset(&mut self) {
        *self = Board::new();
    }

    /// Get the cell at a specific position
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    /// Remaining capacity of a column (0 when full).
    pub fn height(&self, col: usize) -> usize {
        self.heights[col]
    }

    pub fn is_column_playable(&self, col: usize) -> bool {
        col < COLS && self.heights[col] > 0
    }

    /// Drop a token in a column, returns the row where it landed.
    ///
    /// Nothing is modified when the move is rejected.
    pub fn drop_token(&mut self, col: usize, player: Player) -> Result<usize, BoardError> {
        if col >= COLS {
            return Err(BoardError::InvalidColumn(col));
        }
        if self.heights[col] == 0 {
            return Err(BoardError::ColumnFull(col));
        }

        let row = self.heights[col] - 1;
        self.cells[row][col] = player.to_cell();
        self.heights[col] = row;
        Ok(row)
    }

    /// Check if the board is completely full
    pub fn is_full(&self) -> bool {
        self.heights.iter().all(|&h| h == 0)
    }

    /// Number of tokens `player` has on the board.
    pub fn token_count(&self, player: Player) -> usize {
        let cell = player.to_cell();
        self.cells
            .iter()
            .flat_map(|row| row.iter())
            .filter(|&&c| c == cell)
            .count()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
