#![forbid(unsafe_code)]

/// Lifesim Engine: turn-processing kernel.
///
/// Players move across a small grid, enter buildings, work, study, shop and
/// pay rent while racing towards five victory thresholds. Everything that
/// mutates a player flows through `transitions`; buildings and jobs only
/// describe intended changes.

/// Snapshot format version. Bumped whenever the serialized layout changes.
pub const ENGINE_VERSION: u32 = 1;

pub mod error;
pub mod position;
pub mod measure;
pub mod map;
pub mod economy;
pub mod possession;
pub mod jobs;
pub mod action;
pub mod state_change;
pub mod buildings;
pub mod player;
pub mod config;
pub mod transitions;
pub mod invariants;
pub mod snapshot;
pub mod hashing;
pub mod game;

pub use error::EngineError;
pub use game::Game;
