/// Lifesim Engine: Configuration
///
/// The match setup handed to `Game::initialize`, plus engine tuning
/// constants. Everything has a default so partial JSON is accepted.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerConfig {
    pub id: String,
    pub name: String,
    pub color: String,
    #[serde(rename = "isAI", default)]
    pub is_ai: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_type: Option<String>,
}

impl PlayerConfig {
    pub fn human(id: &str, name: &str, color: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            color: color.to_string(),
            is_ai: false,
            ai_type: None,
        }
    }
}

/// Thresholds a player must meet, all at once, to win.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VictoryConditions {
    pub target_wealth: i64,
    pub target_health: f64,
    pub target_happiness: f64,
    pub target_career: f64,
    pub target_education: f64,
}

impl Default for VictoryConditions {
    fn default() -> Self {
        Self {
            target_wealth: 10_000,
            target_health: 100.0,
            target_happiness: 100.0,
            target_career: 850.0,
            target_education: 100.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StartingStats {
    pub health: f64,
    pub happiness: f64,
    pub education: f64,
}

impl Default for StartingStats {
    fn default() -> Self {
        Self {
            health: 100.0,
            happiness: 50.0,
            education: 0.0,
        }
    }
}

/// Engine tuning. Defaults reproduce the standard rules.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConstants {
    pub time_units_per_week: u32,
    pub travel_cost_per_step: u32,
    pub missed_rent_health_penalty: f64,
    pub missed_rent_happiness_penalty: f64,
}

impl Default for EngineConstants {
    fn default() -> Self {
        Self {
            time_units_per_week: 600,
            travel_cost_per_step: 10,
            missed_rent_health_penalty: 5.0,
            missed_rent_happiness_penalty: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameConfig {
    pub players: Vec<PlayerConfig>,
    #[serde(default)]
    pub victory_conditions: VictoryConditions,
    #[serde(default = "default_starting_cash")]
    pub starting_cash: i64,
    #[serde(default)]
    pub starting_stats: StartingStats,
    #[serde(default)]
    pub constants: EngineConstants,
}

fn default_starting_cash() -> i64 {
    200
}

impl GameConfig {
    pub fn new(players: Vec<PlayerConfig>) -> Self {
        Self {
            players,
            victory_conditions: VictoryConditions::default(),
            starting_cash: default_starting_cash(),
            starting_stats: StartingStats::default(),
            constants: EngineConstants::default(),
        }
    }

    /// Parse JSON, reporting the failing field path.
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let de = &mut serde_json::Deserializer::from_str(json);
        serde_path_to_error::deserialize(de).map_err(EngineError::from_path_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_config_with_defaults() {
        let json = r##"{"players":[{"id":"p1","name":"Ada","color":"#112233","isAI":true,"aiType":"greedy"}]}"##;
        let config = GameConfig::from_json(json).unwrap();
        assert_eq!(config.players.len(), 1);
        assert!(config.players[0].is_ai);
        assert_eq!(config.players[0].ai_type.as_deref(), Some("greedy"));
        assert_eq!(config.starting_cash, 200);
        assert_eq!(config.victory_conditions, VictoryConditions::default());
        assert_eq!(config.constants.time_units_per_week, 600);
    }

    #[test]
    fn reports_path_of_bad_field() {
        let json = r##"{"players":[],"victoryConditions":{"targetWealth":"lots"}}"##;
        match GameConfig::from_json(json) {
            Err(EngineError::Deserialize { path, .. }) => {
                assert_eq!(path, "victoryConditions.targetWealth");
            }
            other => panic!("expected a deserialize error, got {:?}", other),
        }
    }
}
