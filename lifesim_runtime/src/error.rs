//! Runtime errors: file system, save integrity, session lookup, replay.
//!
//! Turns the engine rejects are not errors; they come back as
//! `ActionResponse { success: false, .. }`.

use std::path::PathBuf;

use lifesim_engine::EngineError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("save file is corrupt: {0}")]
    CorruptSave(String),

    #[error("save written by engine v{found}, this build reads v{expected}")]
    VersionMismatch { found: u32, expected: u32 },

    #[error("session {0:?} already exists")]
    SessionExists(String),

    #[error("session {0:?} not found")]
    SessionNotFound(String),

    #[error("action {action_id:?} is not available to {player_id:?}")]
    UnknownAction { player_id: String, action_id: String },

    #[error("replay diverged at turn {index}: {reason}")]
    ReplayDiverged { index: usize, reason: String },

    #[error("non-deterministic replay: {first} != {second}")]
    NonDeterministic { first: String, second: String },
}

impl RuntimeError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RuntimeError::Io {
            path: path.into(),
            source,
        }
    }
}
