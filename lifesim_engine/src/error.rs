/// Lifesim Engine: Construction-time Errors
///
/// Only precondition violations live here. Turn-level rejections
/// (wrong player, not enough time, not enough cash) are reported through
/// `ActionResponse` and never become errors.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("position ({x}, {y}) is outside the {size}x{size} grid")]
    OutOfBounds { x: i32, y: i32, size: i32 },

    #[error("invalid route: {0}")]
    InvalidRoute(String),

    #[error("invalid player color {0:?}: expected #RRGGBB")]
    InvalidColor(String),

    #[error("measure delta must be non-negative, got {0}")]
    NegativeDelta(f64),

    #[error("cell ({x}, {y}) is already occupied by {occupant:?}")]
    CellOccupied { x: i32, y: i32, occupant: String },

    #[error("building {0:?} already exists on the map")]
    DuplicateBuilding(String),

    #[error("unknown player {0:?}")]
    UnknownPlayer(String),

    #[error("game configuration must contain at least one player")]
    EmptyRoster,

    #[error("failed to serialize game: {0}")]
    Serialize(String),

    #[error("failed to deserialize game at `{path}`: {message}")]
    Deserialize { path: String, message: String },

    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}

impl EngineError {
    pub(crate) fn from_path_error(err: serde_path_to_error::Error<serde_json::Error>) -> Self {
        let path = err.path().to_string();
        EngineError::Deserialize {
            path,
            message: err.into_inner().to_string(),
        }
    }
}
