//! Save file: one JSON blob per game.
//!
//! The blob carries the engine version, the game snapshot, its canonical
//! hash and, when known, the config and turn history the game came from.
//! Loading re-validates invariants and rejects a hash mismatch.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use lifesim_engine::config::GameConfig;
use lifesim_engine::hashing::canonical_hash;
use lifesim_engine::snapshot::GameSnapshot;
use lifesim_engine::{Game, ENGINE_VERSION};

use crate::error::RuntimeError;
use crate::replay::TurnRecord;

/// On-disk format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveFile {
    pub engine_version: u32,
    /// Canonical hash of `game`.
    pub hash: String,
    pub game: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<GameConfig>,
    #[serde(default)]
    pub turns: Vec<TurnRecord>,
}

/// A decoded, verified save.
#[derive(Debug, Clone)]
pub struct LoadedSave {
    pub game: Game,
    pub hash: String,
    pub config: Option<GameConfig>,
    pub turns: Vec<TurnRecord>,
}

pub fn encode_save(
    game: &Game,
    config: Option<&GameConfig>,
    turns: &[TurnRecord],
) -> Result<String, RuntimeError> {
    let snapshot = serde_json::to_value(GameSnapshot::capture(game))
        .map_err(|e| RuntimeError::CorruptSave(e.to_string()))?;
    let save = SaveFile {
        engine_version: ENGINE_VERSION,
        hash: canonical_hash(game),
        game: snapshot,
        config: config.cloned(),
        turns: turns.to_vec(),
    };
    serde_json::to_string_pretty(&save).map_err(|e| RuntimeError::CorruptSave(e.to_string()))
}

pub fn decode_save(text: &str) -> Result<LoadedSave, RuntimeError> {
    let save: SaveFile =
        serde_json::from_str(text).map_err(|e| RuntimeError::CorruptSave(e.to_string()))?;
    if save.engine_version != ENGINE_VERSION {
        return Err(RuntimeError::VersionMismatch {
            found: save.engine_version,
            expected: ENGINE_VERSION,
        });
    }

    let game = Game::deserialize(&save.game.to_string())?;
    let hash = canonical_hash(&game);
    if hash != save.hash {
        return Err(RuntimeError::CorruptSave(format!(
            "hash mismatch: file says {}, contents hash to {}",
            save.hash, hash
        )));
    }

    Ok(LoadedSave {
        game,
        hash,
        config: save.config,
        turns: save.turns,
    })
}

/// Write the save, creating parent directories as needed.
pub fn write_save(
    path: &Path,
    game: &Game,
    config: Option<&GameConfig>,
    turns: &[TurnRecord],
) -> Result<(), RuntimeError> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|e| RuntimeError::io(dir, e))?;
    }
    let content = encode_save(game, config, turns)?;

    // atomic replace
    let tmp = path.with_extension("json.tmp");
    let mut file = File::create(&tmp).map_err(|e| RuntimeError::io(&tmp, e))?;
    file.write_all(content.as_bytes())
        .map_err(|e| RuntimeError::io(&tmp, e))?;
    file.sync_all().map_err(|e| RuntimeError::io(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| RuntimeError::io(path, e))?;

    debug!(path = %path.display(), week = game.current_week(), "game saved");
    Ok(())
}

pub fn read_save(path: &Path) -> Result<LoadedSave, RuntimeError> {
    let text = fs::read_to_string(path).map_err(|e| RuntimeError::io(path, e))?;
    decode_save(&text)
}
