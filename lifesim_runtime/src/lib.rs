#![forbid(unsafe_code)]

//! Lifesim Runtime
//!
//! Wraps the kernel with sessions, a single-file JSON save, in-memory
//! turn replay and drift reports between two games.
//!
//! No game rules live here; every turn is delegated to `lifesim_engine`.

pub mod error;
pub mod replay;
pub mod save_file;
pub mod session;
pub mod drift;

pub use error::RuntimeError;
