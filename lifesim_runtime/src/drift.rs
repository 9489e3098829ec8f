//! Drift: structured comparison of two games.
//!
//! Typical use is week over week: the session keeps the game as it stood
//! when the current week began. Measure deltas are fixed-point i64
//! thousandths (SCALE = 1_000) so reports compare exactly.

use std::collections::BTreeSet;

use lifesim_engine::player::PlayerState;
use lifesim_engine::Game;

pub const SCALE: f64 = 1_000.0;

fn fixed(value: f64) -> i64 {
    (value * SCALE).round() as i64
}

/// How one player changed between two games.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerDrift {
    pub player_id: String,
    pub cash_delta: i64,
    pub health_delta: i64,
    pub happiness_delta: i64,
    pub education_delta: i64,
    pub career_delta: i64,
    pub rent_debt_delta: i64,
    pub job_a: Option<String>,
    pub job_b: Option<String>,
    pub home_a: Option<String>,
    pub home_b: Option<String>,
    pub possessions_gained: Vec<String>,
    pub possessions_lost: Vec<String>,
}

impl PlayerDrift {
    pub fn job_changed(&self) -> bool {
        self.job_a != self.job_b
    }

    pub fn home_changed(&self) -> bool {
        self.home_a != self.home_b
    }

    pub fn is_unchanged(&self) -> bool {
        self.cash_delta == 0
            && self.health_delta == 0
            && self.happiness_delta == 0
            && self.education_delta == 0
            && self.career_delta == 0
            && self.rent_debt_delta == 0
            && !self.job_changed()
            && !self.home_changed()
            && self.possessions_gained.is_empty()
            && self.possessions_lost.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriftReport {
    pub week_a: u32,
    pub week_b: u32,
    pub week_delta: i64,
    /// Players present in both games, in `b`'s roster order.
    pub players: Vec<PlayerDrift>,
    pub joined: Vec<String>,
    pub left: Vec<String>,
    pub game_over_a: bool,
    pub game_over_b: bool,
}

impl DriftReport {
    pub fn player(&self, player_id: &str) -> Option<&PlayerDrift> {
        self.players.iter().find(|p| p.player_id == player_id)
    }

    pub fn is_unchanged(&self) -> bool {
        self.week_delta == 0
            && self.joined.is_empty()
            && self.left.is_empty()
            && self.game_over_a == self.game_over_b
            && self.players.iter().all(PlayerDrift::is_unchanged)
    }
}

pub fn compare_games(a: &Game, b: &Game) -> DriftReport {
    let ids_a: BTreeSet<&str> = a.players().iter().map(|p| p.id.as_str()).collect();
    let ids_b: BTreeSet<&str> = b.players().iter().map(|p| p.id.as_str()).collect();

    let players = b
        .players()
        .iter()
        .filter_map(|pb| {
            let pa = a.player(&pb.id)?;
            Some(compare_players(pa.state(), pb.state()))
        })
        .collect();

    DriftReport {
        week_a: a.current_week(),
        week_b: b.current_week(),
        week_delta: i64::from(b.current_week()) - i64::from(a.current_week()),
        players,
        joined: ids_b.difference(&ids_a).map(|s| s.to_string()).collect(),
        left: ids_a.difference(&ids_b).map(|s| s.to_string()).collect(),
        game_over_a: a.is_game_over(),
        game_over_b: b.is_game_over(),
    }
}

fn compare_players(a: &PlayerState, b: &PlayerState) -> PlayerDrift {
    let owned_a: BTreeSet<&str> = a.possessions().iter().map(|p| p.id.as_str()).collect();
    let owned_b: BTreeSet<&str> = b.possessions().iter().map(|p| p.id.as_str()).collect();

    PlayerDrift {
        player_id: b.player_id().to_string(),
        cash_delta: b.cash() - a.cash(),
        health_delta: fixed(b.health().value()) - fixed(a.health().value()),
        happiness_delta: fixed(b.happiness().value()) - fixed(a.happiness().value()),
        education_delta: fixed(b.education().value()) - fixed(a.education().value()),
        career_delta: fixed(b.career().value()) - fixed(a.career().value()),
        rent_debt_delta: b.rent_debt() - a.rent_debt(),
        job_a: a.job().map(|j| j.id.clone()),
        job_b: b.job().map(|j| j.id.clone()),
        home_a: a.rented_home().map(str::to_string),
        home_b: b.rented_home().map(str::to_string),
        possessions_gained: owned_b.difference(&owned_a).map(|s| s.to_string()).collect(),
        possessions_lost: owned_a.difference(&owned_b).map(|s| s.to_string()).collect(),
    }
}
