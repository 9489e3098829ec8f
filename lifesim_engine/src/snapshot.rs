/// Lifesim Engine: Snapshots
///
/// Serialized game snapshot.
///
/// Only the match itself is stored: clock, turn, players, thresholds and
/// the game-over flag. The map, economy and job catalog are rebuilt fresh
/// on restore.

use serde::{Deserialize, Serialize};

use crate::config::{EngineConstants, VictoryConditions};
use crate::economy::EconomyModel;
use crate::error::EngineError;
use crate::game::Game;
use crate::jobs::{Job, JobCatalog};
use crate::map::GameMap;
use crate::player::{ExperienceEntry, Player, PlayerColor, PlayerState};
use crate::position::Position;
use crate::possession::Possession;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub id: String,
    pub current_week: u32,
    pub time_units_remaining: u32,
    pub current_player_index: usize,
    pub players: Vec<PlayerRecord>,
    pub victory_conditions: VictoryConditions,
    pub is_game_over: bool,
    /// Absent in older snapshots; the defaults apply.
    #[serde(default)]
    pub constants: EngineConstants,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRecord {
    pub id: String,
    pub name: String,
    pub color: PlayerColor,
    #[serde(rename = "isAI", default)]
    pub is_ai: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_type: Option<String>,
    pub state: PlayerStateRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStateRecord {
    pub player_id: String,
    pub cash: i64,
    pub health: f64,
    pub happiness: f64,
    pub education: f64,
    pub career: f64,
    pub position: Position,
    #[serde(default)]
    pub current_building: Option<String>,
    #[serde(default)]
    pub job: Option<Job>,
    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,
    #[serde(default)]
    pub possessions: Vec<Possession>,
    #[serde(default)]
    pub rented_home: Option<String>,
    #[serde(default)]
    pub rent_debt: i64,
}

impl From<&PlayerState> for PlayerStateRecord {
    fn from(state: &PlayerState) -> Self {
        Self {
            player_id: state.player_id().to_string(),
            cash: state.cash(),
            health: state.health().value(),
            happiness: state.happiness().value(),
            education: state.education().value(),
            career: state.career().value(),
            position: state.position(),
            current_building: state.current_building().map(str::to_string),
            job: state.job().cloned(),
            experience: state.experience(),
            possessions: state.possessions().to_vec(),
            rented_home: state.rented_home().map(str::to_string),
            rent_debt: state.rent_debt(),
        }
    }
}

impl PlayerStateRecord {
    /// Rebuild live state. Career must agree with the experience ledger.
    pub fn restore(self) -> Result<PlayerState, EngineError> {
        let state = PlayerState::restore(
            self.player_id,
            self.cash,
            self.health,
            self.happiness,
            self.education,
            self.position,
            self.current_building,
            self.job,
            &self.experience,
            self.possessions,
            self.rented_home,
            self.rent_debt,
        );
        if state.career().value() != self.career {
            return Err(EngineError::InvariantViolation(format!(
                "player {:?} stored career {} but experience totals {}",
                state.player_id(),
                self.career,
                state.career().value()
            )));
        }
        Ok(state)
    }
}

impl GameSnapshot {
    pub fn capture(game: &Game) -> Self {
        Self {
            id: game.id().to_string(),
            current_week: game.current_week(),
            time_units_remaining: game.time_units_remaining(),
            current_player_index: game.current_player_index(),
            players: game
                .players()
                .iter()
                .map(|p| PlayerRecord {
                    id: p.id.clone(),
                    name: p.name.clone(),
                    color: p.color.clone(),
                    is_ai: p.is_ai,
                    ai_type: p.ai_type.clone(),
                    state: PlayerStateRecord::from(p.state()),
                })
                .collect(),
            victory_conditions: *game.victory_conditions(),
            is_game_over: game.is_game_over(),
            constants: *game.constants(),
        }
    }

    /// Build a game around this snapshot with a fresh map, economy and
    /// job catalog. Invariants are not checked here.
    pub fn restore(self) -> Result<Game, EngineError> {
        let mut players = Vec::with_capacity(self.players.len());
        for record in self.players {
            players.push(Player {
                id: record.id,
                name: record.name,
                color: record.color,
                is_ai: record.is_ai,
                ai_type: record.ai_type,
                state: record.state.restore()?,
            });
        }
        Ok(Game {
            id: self.id,
            current_week: self.current_week,
            time_units_remaining: self.time_units_remaining,
            current_player_index: self.current_player_index,
            players,
            map: GameMap::standard(),
            economy: EconomyModel::new(),
            jobs: JobCatalog::standard(),
            victory_conditions: self.victory_conditions,
            constants: self.constants,
            is_game_over: self.is_game_over,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> PlayerStateRecord {
        PlayerStateRecord {
            player_id: "p1".to_string(),
            cash: 120,
            health: 80.0,
            happiness: 60.0,
            education: 15.0,
            career: 24.0,
            position: Position::new(2, 4).unwrap(),
            current_building: Some("bank".to_string()),
            job: None,
            experience: vec![
                ExperienceEntry { rank: 1, points: 16 },
                ExperienceEntry { rank: 2, points: 8 },
            ],
            possessions: Vec::new(),
            rented_home: Some("low-cost-apartment".to_string()),
            rent_debt: 30,
        }
    }

    #[test]
    fn state_record_round_trips_through_live_state() {
        let original = record();
        let state = original.clone().restore().unwrap();
        assert_eq!(PlayerStateRecord::from(&state), original);
    }

    #[test]
    fn career_must_match_ledger() {
        let mut bad = record();
        bad.career = 99.0;
        assert!(matches!(bad.restore(), Err(EngineError::InvariantViolation(_))));
    }

    #[test]
    fn json_field_names() {
        let value = serde_json::to_value(record()).unwrap();
        for key in [
            "playerId",
            "cash",
            "currentBuilding",
            "rentedHome",
            "rentDebt",
            "experience",
        ] {
            assert!(value.get(key).is_some(), "missing {}", key);
        }
        assert_eq!(value["position"]["x"], 2);
    }
}
