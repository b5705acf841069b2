use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Board must be a non-empty square grid")]
    InvalidBoardShape,
    #[error("Neighbor pattern must have exactly 9 slots, got {0}")]
    InvalidPattern(usize),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = core::result::Result<T, GameError>;
