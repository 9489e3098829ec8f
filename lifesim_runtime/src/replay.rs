//! Replay: rebuild a game from its config and recorded turns.
//!
//! Turns are recorded by action id, not by action payload: every replayed
//! turn re-resolves the id against what the game offers at that moment,
//! so a recording can never smuggle in an action the rules would not
//! have produced.

use serde::{Deserialize, Serialize};

use lifesim_engine::action::ActionResponse;
use lifesim_engine::config::GameConfig;
use lifesim_engine::hashing::canonical_hash;
use lifesim_engine::Game;

use crate::error::RuntimeError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum TurnCommand {
    Act {
        #[serde(rename = "actionId")]
        action_id: String,
    },
    EndTurn,
}

/// One accepted player command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnRecord {
    pub player_id: String,
    #[serde(flatten)]
    pub command: TurnCommand,
}

impl TurnRecord {
    pub fn act(player_id: &str, action_id: &str) -> Self {
        Self {
            player_id: player_id.to_string(),
            command: TurnCommand::Act {
                action_id: action_id.to_string(),
            },
        }
    }

    pub fn end_turn(player_id: &str) -> Self {
        Self {
            player_id: player_id.to_string(),
            command: TurnCommand::EndTurn,
        }
    }
}

/// Run one record against `game`. An action id the player is not offered
/// is an error; a rule rejection comes back as an unsuccessful response.
pub fn apply_record(game: &mut Game, record: &TurnRecord) -> Result<ActionResponse, RuntimeError> {
    match &record.command {
        TurnCommand::Act { action_id } => {
            let action = game.find_action(&record.player_id, action_id).ok_or_else(|| {
                RuntimeError::UnknownAction {
                    player_id: record.player_id.clone(),
                    action_id: action_id.clone(),
                }
            })?;
            Ok(game.process_turn(&record.player_id, &action))
        }
        TurnCommand::EndTurn => Ok(game.end_turn(&record.player_id)),
    }
}

/// Rebuild a game from scratch.
///
/// 1. Initialize a fresh game from `config`
/// 2. Apply each record in order; every one must succeed
/// 3. Return (final game, canonical hash)
pub fn rebuild_game(config: &GameConfig, records: &[TurnRecord]) -> Result<(Game, String), RuntimeError> {
    let mut game = Game::new();
    game.initialize(config.clone())?;

    for (index, record) in records.iter().enumerate() {
        let response = apply_record(&mut game, record).map_err(|e| RuntimeError::ReplayDiverged {
            index,
            reason: e.to_string(),
        })?;
        if !response.success {
            return Err(RuntimeError::ReplayDiverged {
                index,
                reason: response.message,
            });
        }
    }

    let hash = canonical_hash(&game);
    Ok((game, hash))
}

/// Rebuild and return only the canonical hash.
pub fn rebuild_hash(config: &GameConfig, records: &[TurnRecord]) -> Result<String, RuntimeError> {
    rebuild_game(config, records).map(|(_, hash)| hash)
}

/// Replay twice and require identical hashes. Returns the hash.
pub fn verify_determinism(config: &GameConfig, records: &[TurnRecord]) -> Result<String, RuntimeError> {
    let first = rebuild_hash(config, records)?;
    let second = rebuild_hash(config, records)?;
    if first != second {
        return Err(RuntimeError::NonDeterministic { first, second });
    }
    Ok(first)
}
