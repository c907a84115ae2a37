use super::board::Cell;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    Human,
    Automated,
}

impl Player {
    /// Get the other player
    pub fn other(self) -> Player {
        match self {
            Player::Human => Player::Automated,
            Player::Automated => Player::Human,
        }
    }

    /// Convert player to cell type
    pub fn to_cell(self) -> Cell {
        match self {
            Player::Human => Cell::Human,
            Player::Automated => Cell::Automated,
        }
    }

    /// Value used for this player in oracle calls: Human is 1, Automated is -1.
    pub fn wire_value(self) -> i8 {
        match self {
            Player::Human => 1,
            Player::Automated => -1,
        }
    }

    /// Inverse of [`Player::wire_value`].
    pub fn from_wire(value: i8) -> Option<Player> {
        match value {
            1 => Some(Player::Human),
            -1 => Some(Player::Automated),
            _ => None,
        }
    }

    /// Get player name for display
    pub fn name(self) -> &'static str {
        match self {
            Player::Human => "Human",
            Player::Automated => "Bot",
        }
    }
}
