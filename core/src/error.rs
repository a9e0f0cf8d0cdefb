use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Board must have at least one row and one column")]
    InvalidSize,
    #[error("Too many mines")]
    TooManyMines,
    #[error("Board shape does not fit the coordinate range")]
    InvalidBoardShape,
    #[error("Cell state is inconsistent")]
    InvalidCellState,
    #[error("Mine count does not match the board")]
    MineCountMismatch,
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
    #[error("Game is paused")]
    Paused,
}

pub type Result<T> = core::result::Result<T, GameError>;
