use serde::{Deserialize, Serialize};

pub use board::*;
pub use clock::*;
pub use color::*;
pub use cursor::*;
pub use engine::*;
pub use error::*;
pub use grid::*;
pub use hand::*;
pub use refill::*;
pub use tile::*;
pub use types::*;

mod board;
mod clock;
mod color;
mod cursor;
mod engine;
mod error;
mod grid;
mod hand;
mod refill;
mod tile;
mod types;

/// Plays per level before the level advances.
pub const PLAYS_PER_LEVEL: u32 = 10;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Side of the square board.
    pub board_size: Coord,
    /// Hand width and height.
    pub hand_size: Coord2,
    pub plays_per_level: u32,
    pub start_level: Level,
}

impl GameConfig {
    pub const MIN_BOARD_SIZE: Coord = 2;

    pub const fn new_unchecked(
        board_size: Coord,
        hand_size: Coord2,
        plays_per_level: u32,
        start_level: Level,
    ) -> Self {
        Self {
            board_size,
            hand_size,
            plays_per_level,
            start_level,
        }
    }

    pub fn new(
        board_size: Coord,
        (hand_x, hand_y): Coord2,
        plays_per_level: u32,
        start_level: Level,
    ) -> Self {
        let board_size = board_size.max(Self::MIN_BOARD_SIZE);
        let hand_size = (hand_x.max(1), hand_y.max(1));
        let plays_per_level = plays_per_level.max(1);
        let start_level = start_level.max(1);
        Self::new_unchecked(board_size, hand_size, plays_per_level, start_level)
    }

    pub fn with_start_level(self, start_level: Level) -> Self {
        Self::new(
            self.board_size,
            self.hand_size,
            self.plays_per_level,
            start_level,
        )
    }

    /// Checks a config that bypassed [`GameConfig::new`], e.g. after deserializing.
    pub fn validate(&self) -> Result<Self> {
        if self.board_size < Self::MIN_BOARD_SIZE {
            Err(GameError::InvalidConfig("board_size must be at least 2"))
        } else if self.hand_size.0 == 0 || self.hand_size.1 == 0 {
            Err(GameError::InvalidConfig("hand_size must be non-empty"))
        } else if self.plays_per_level == 0 {
            Err(GameError::InvalidConfig("plays_per_level must be at least 1"))
        } else if self.start_level == 0 {
            Err(GameError::InvalidConfig("start_level must be at least 1"))
        } else {
            Ok(*self)
        }
    }

    pub const fn board_cells(&self) -> CellCount {
        mult(self.board_size, self.board_size)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new_unchecked(4, (4, 2), PLAYS_PER_LEVEL, 1)
    }
}

/// Final standing of a session, handed to whatever keeps the high scores.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub name: String,
    pub level: Level,
    pub score: Score,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_clamps_out_of_range_values() {
        let config = GameConfig::new(0, (0, 3), 0, 0);
        assert_eq!(config, GameConfig::new_unchecked(2, (1, 3), 1, 1));
        assert_eq!(config.validate(), Ok(config));
    }

    #[test]
    fn validate_rejects_deserialized_garbage() {
        let config: GameConfig = serde_json::from_str(r#"{"board_size": 1}"#).unwrap();
        assert!(matches!(config.validate(), Err(GameError::InvalidConfig(_))));

        let config: GameConfig = serde_json::from_str(r#"{"start_level": 12}"#).unwrap();
        assert_eq!(config.validate(), Ok(GameConfig::default().with_start_level(12)));
    }
}
