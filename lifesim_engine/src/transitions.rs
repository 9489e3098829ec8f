/// Lifesim Engine: Centralized Transition Logic
///
/// ALL player-state mutation lives here. Actions describe changes,
/// the game decides when to apply them, this module applies them.

use tracing::{debug, warn};

use crate::config::EngineConstants;
use crate::measure::MeasureKind;
use crate::player::PlayerState;
use crate::state_change::StateChange;

// ---------------------------------------------------------------------------
// State changes
// ---------------------------------------------------------------------------

/// Apply `changes` in order. Returns how many were applied; unknown
/// change types are logged and skipped.
pub fn apply_state_changes(state: &mut PlayerState, changes: &[StateChange]) -> usize {
    let mut applied = 0;
    for change in changes {
        if apply_one(state, change) {
            applied += 1;
        }
    }
    applied
}

fn apply_one(state: &mut PlayerState, change: &StateChange) -> bool {
    match change {
        StateChange::Cash { value, .. } => {
            state.set_cash(*value);
        }
        StateChange::Measure { measure, value, .. } => {
            // career follows the experience ledger, wealth follows cash
            if matches!(measure, MeasureKind::Career | MeasureKind::Wealth) {
                warn!(
                    player = state.player_id(),
                    measure = measure.as_str(),
                    "measure is derived and cannot be set directly; skipped"
                );
                return false;
            }
            let current = state.measure(*measure).value();
            let applied = state.measure_mut(*measure).update(value - current);
            if (current + applied - value).abs() > f64::EPSILON {
                debug!(
                    player = state.player_id(),
                    measure = measure.as_str(),
                    target = value,
                    reached = current + applied,
                    "measure change capped at bound"
                );
            }
        }
        StateChange::PossessionAdd { possession, .. } => {
            state.add_possession(possession.clone());
        }
        StateChange::PossessionRemove { possession_id, .. } => {
            if state.remove_possession(possession_id).is_none() {
                warn!(player = state.player_id(), possession_id, "possession to remove not found");
            }
        }
        StateChange::Job { job, .. } => {
            state.set_job(job.clone());
        }
        StateChange::Position {
            position,
            current_building,
            ..
        } => {
            state.set_position(*position, current_building.clone());
        }
        StateChange::Experience { rank, points, .. } => {
            state.add_experience(*rank, *points);
        }
        StateChange::RentedHome { home, .. } => {
            state.set_rented_home(home.clone());
        }
        StateChange::RentDebt { value, .. } => {
            state.set_rent_debt(*value);
        }
        StateChange::Unknown => {
            warn!(player = state.player_id(), "skipping unknown state change type");
            return false;
        }
    }
    debug!(
        player = state.player_id(),
        kind = change.type_name(),
        description = change.description(),
        "state change applied"
    );
    true
}

// ---------------------------------------------------------------------------
// Rent
// ---------------------------------------------------------------------------

/// What happened when a week's rent came due.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RentOutcome {
    Paid { amount: i64 },
    Missed { paid: i64, shortfall: i64 },
}

/// Charge `rent`. A player who cannot cover it is left with zero cash,
/// carries the shortfall as debt and takes a health and happiness penalty.
/// An overdraft is part of the shortfall.
pub fn charge_rent(state: &mut PlayerState, rent: i64, constants: &EngineConstants) -> RentOutcome {
    let cash = state.cash();
    if cash >= rent {
        state.set_cash(cash - rent);
        return RentOutcome::Paid { amount: rent };
    }

    let paid = cash.max(0);
    let shortfall = rent - cash;
    state.set_cash(0);
    state.set_rent_debt(state.rent_debt() + shortfall);
    state
        .measure_mut(MeasureKind::Health)
        .update(-constants.missed_rent_health_penalty);
    state
        .measure_mut(MeasureKind::Happiness)
        .update(-constants.missed_rent_happiness_penalty);
    RentOutcome::Missed { paid, shortfall }
}
