/// Lifesim Engine: Invariant Checks
///
/// Structural validation of a whole game. Used after restoring a snapshot
/// and by tests after every turn. Returns the first failure.

use std::collections::BTreeSet;

use crate::error::EngineError;
use crate::game::Game;
use crate::measure::MeasureKind;
use crate::player::PlayerState;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run every check. `Err` carries the first violation found.
pub fn try_validate_invariants(game: &Game) -> Result<(), EngineError> {
    check_unique_player_ids(game)?;
    check_turn_index(game)?;
    check_clock(game)?;
    for player in game.players() {
        check_measure_bounds(player.state())?;
        check_career_ledger(player.state())?;
        check_position(game, player.state())?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Individual checks (private)
// ---------------------------------------------------------------------------

fn violation(message: String) -> Result<(), EngineError> {
    Err(EngineError::InvariantViolation(message))
}

fn check_unique_player_ids(game: &Game) -> Result<(), EngineError> {
    let mut seen = BTreeSet::new();
    for player in game.players() {
        if !seen.insert(player.id.as_str()) {
            return violation(format!("duplicate player id {:?}", player.id));
        }
        if player.id != player.state().player_id() {
            return violation(format!(
                "player {:?} carries state for {:?}",
                player.id,
                player.state().player_id()
            ));
        }
    }
    Ok(())
}

fn check_turn_index(game: &Game) -> Result<(), EngineError> {
    let count = game.players().len();
    if count > 0 && game.current_player_index() >= count {
        return violation(format!(
            "current player index {} out of range for {} players",
            game.current_player_index(),
            count
        ));
    }
    Ok(())
}

fn check_clock(game: &Game) -> Result<(), EngineError> {
    if game.current_week() == 0 {
        return violation("week numbering starts at 1".to_string());
    }
    if game.time_units_remaining() > game.constants().time_units_per_week {
        return violation(format!(
            "{} time units remaining exceeds the weekly budget of {}",
            game.time_units_remaining(),
            game.constants().time_units_per_week
        ));
    }
    Ok(())
}

fn check_measure_bounds(state: &PlayerState) -> Result<(), EngineError> {
    for kind in MeasureKind::ALL {
        let m = state.measure(kind);
        if m.value().is_nan() || m.value() < m.min() || m.value() > m.max() {
            return violation(format!(
                "player {:?} {} = {} outside [{}, {}]",
                state.player_id(),
                kind.as_str(),
                m.value(),
                m.min(),
                m.max()
            ));
        }
    }
    Ok(())
}

fn check_career_ledger(state: &PlayerState) -> Result<(), EngineError> {
    let total = state.total_experience() as f64;
    if state.career().value() != total {
        return violation(format!(
            "player {:?} career {} does not match experience total {}",
            state.player_id(),
            state.career().value(),
            total
        ));
    }
    Ok(())
}

fn check_position(game: &Game, state: &PlayerState) -> Result<(), EngineError> {
    let pos = state.position();
    if !pos.is_within(game.map().size()) {
        return violation(format!(
            "player {:?} at ({}, {}) is off the map",
            state.player_id(),
            pos.x(),
            pos.y()
        ));
    }
    if let Some(building_id) = state.current_building() {
        match game.map().building(building_id) {
            Some(b) if b.position == pos => {}
            Some(_) => {
                return violation(format!(
                    "player {:?} is inside {:?} but not standing on it",
                    state.player_id(),
                    building_id
                ))
            }
            None => {
                return violation(format!(
                    "player {:?} is inside unknown building {:?}",
                    state.player_id(),
                    building_id
                ))
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GameConfig, PlayerConfig};

    fn game() -> Game {
        let mut game = Game::new();
        game.initialize(GameConfig::new(vec![
            PlayerConfig::human("p1", "Ada", "#FF0000"),
            PlayerConfig::human("p2", "Brin", "#0000FF"),
        ]))
        .unwrap();
        game
    }

    #[test]
    fn fresh_game_is_valid() {
        assert!(try_validate_invariants(&game()).is_ok());
    }

    #[test]
    fn detects_bad_turn_index() {
        let mut game = game();
        game.current_player_index = 2;
        assert!(matches!(
            try_validate_invariants(&game),
            Err(EngineError::InvariantViolation(_))
        ));
    }

    #[test]
    fn detects_career_drift() {
        let mut game = game();
        game.players[0].state.measure_mut(MeasureKind::Career).update(10.0);
        let err = try_validate_invariants(&game).unwrap_err();
        assert!(err.to_string().contains("career"));
    }

    #[test]
    fn detects_phantom_building() {
        let mut game = game();
        let pos = game.players[0].state.position();
        game.players[0]
            .state
            .set_position(pos, Some("nowhere".to_string()));
        assert!(try_validate_invariants(&game).is_err());
    }
}
