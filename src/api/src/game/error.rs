use thiserror::Error;

use super::board::PlacementError;
use super::rack::RackError;

/// Why a turn was refused. A refused turn never changes the game.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("You are not a participant in this game.")]
    NotAParticipant,
    #[error("It's not your turn.")]
    NotYourTurn,
    #[error("The game is not currently active.")]
    GameNotActive,
    #[error("No tiles selected.")]
    NoTilesSelected,
    #[error("Invalid placement: {0}.")]
    InvalidPlacement(String),
    #[error("\"{word}\" is not a valid word. {reason}")]
    InvalidWord { word: String, reason: String },
    #[error("Played tiles do not match your rack.")]
    TilesNotOwned,
    #[error("Not enough tiles left in the bag to exchange ({remaining} left).")]
    BagTooSmall { remaining: usize },
    #[error("A game needs two different players.")]
    InvalidPlayers,
    #[error("Word service unavailable: {0}")]
    Oracle(String),
}

impl From<PlacementError> for GameError {
    fn from(err: PlacementError) -> Self {
        GameError::InvalidPlacement(err.to_string())
    }
}

impl From<RackError> for GameError {
    fn from(_: RackError) -> Self {
        GameError::TilesNotOwned
    }
}
