/// Lifesim Engine: Players
///
/// Players and their mutable per-player state.
///
/// Mutators on `PlayerState` are crate-private: outside code reads through
/// accessors, and the engine writes through `transitions`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::jobs::Job;
use crate::measure::{Measure, MeasureKind};
use crate::position::Position;
use crate::possession::{Possession, PossessionType};

/// Points earned at one job rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub rank: u32,
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerState {
    player_id: String,
    cash: Measure,
    health: Measure,
    happiness: Measure,
    education: Measure,
    career: Measure,
    position: Position,
    current_building: Option<String>,
    job: Option<Job>,
    experience: BTreeMap<u32, u32>,
    possessions: Vec<Possession>,
    rented_home: Option<String>,
    rent_debt: i64,
}

impl PlayerState {
    /// Fresh state at the origin, unemployed, owning nothing.
    pub fn new(player_id: &str, cash: i64, health: f64, happiness: f64, education: f64) -> Self {
        Self {
            player_id: player_id.to_string(),
            cash: MeasureKind::Wealth.measure(cash as f64),
            health: MeasureKind::Health.measure(health),
            happiness: MeasureKind::Happiness.measure(happiness),
            education: MeasureKind::Education.measure(education),
            career: MeasureKind::Career.measure(0.0),
            position: Position::origin(),
            current_building: None,
            job: None,
            experience: BTreeMap::new(),
            possessions: Vec::new(),
            rented_home: None,
            rent_debt: 0,
        }
    }

    // ── read accessors ──────────────────────────────────────────────

    pub fn player_id(&self) -> &str {
        &self.player_id
    }

    pub fn cash(&self) -> i64 {
        self.cash.value().round() as i64
    }

    pub fn health(&self) -> &Measure {
        &self.health
    }

    pub fn happiness(&self) -> &Measure {
        &self.happiness
    }

    pub fn education(&self) -> &Measure {
        &self.education
    }

    pub fn career(&self) -> &Measure {
        &self.career
    }

    pub fn wealth(&self) -> &Measure {
        &self.cash
    }

    pub fn measure(&self, kind: MeasureKind) -> &Measure {
        match kind {
            MeasureKind::Health => &self.health,
            MeasureKind::Happiness => &self.happiness,
            MeasureKind::Education => &self.education,
            MeasureKind::Career => &self.career,
            MeasureKind::Wealth => &self.cash,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn current_building(&self) -> Option<&str> {
        self.current_building.as_deref()
    }

    pub fn is_inside(&self, building_id: &str) -> bool {
        self.current_building.as_deref() == Some(building_id)
    }

    pub fn job(&self) -> Option<&Job> {
        self.job.as_ref()
    }

    pub fn experience_at(&self, rank: u32) -> u32 {
        self.experience.get(&rank).copied().unwrap_or(0)
    }

    pub fn experience(&self) -> Vec<ExperienceEntry> {
        self.experience
            .iter()
            .map(|(rank, points)| ExperienceEntry { rank: *rank, points: *points })
            .collect()
    }

    pub fn total_experience(&self) -> u64 {
        self.experience.values().map(|p| u64::from(*p)).sum()
    }

    pub fn possessions(&self) -> &[Possession] {
        &self.possessions
    }

    pub fn possession(&self, id: &str) -> Option<&Possession> {
        self.possessions.iter().find(|p| p.id == id)
    }

    pub fn possessions_of(&self, kind: PossessionType) -> impl Iterator<Item = &Possession> {
        self.possessions.iter().filter(move |p| p.possession_type == kind)
    }

    /// Best clothes owned, 0 without any.
    pub fn max_clothes_level(&self) -> u32 {
        self.possessions_of(PossessionType::Clothes)
            .filter_map(|p| p.clothes_level)
            .max()
            .unwrap_or(0)
    }

    pub fn rented_home(&self) -> Option<&str> {
        self.rented_home.as_deref()
    }

    pub fn rent_debt(&self) -> i64 {
        self.rent_debt
    }

    pub fn can_afford(&self, amount: i64) -> bool {
        self.cash() >= amount
    }

    // ── mutators (engine only) ──────────────────────────────────────

    pub(crate) fn set_cash(&mut self, value: i64) {
        self.cash.reset(value as f64);
    }

    pub(crate) fn measure_mut(&mut self, kind: MeasureKind) -> &mut Measure {
        match kind {
            MeasureKind::Health => &mut self.health,
            MeasureKind::Happiness => &mut self.happiness,
            MeasureKind::Education => &mut self.education,
            MeasureKind::Career => &mut self.career,
            MeasureKind::Wealth => &mut self.cash,
        }
    }

    pub(crate) fn set_position(&mut self, position: Position, current_building: Option<String>) {
        self.position = position;
        self.current_building = current_building;
    }

    pub(crate) fn set_job(&mut self, job: Option<Job>) {
        self.job = job;
    }

    /// Credit points at `rank` and resync career with the ledger total.
    pub(crate) fn add_experience(&mut self, rank: u32, points: u32) {
        let entry = self.experience.entry(rank).or_insert(0);
        *entry = entry.saturating_add(points);
        self.career.reset(self.total_experience() as f64);
    }

    pub(crate) fn add_possession(&mut self, possession: Possession) {
        self.possessions.push(possession);
    }

    pub(crate) fn remove_possession(&mut self, id: &str) -> Option<Possession> {
        let idx = self.possessions.iter().position(|p| p.id == id)?;
        Some(self.possessions.remove(idx))
    }

    pub(crate) fn set_rented_home(&mut self, home: Option<String>) {
        self.rented_home = home;
    }

    pub(crate) fn set_rent_debt(&mut self, debt: i64) {
        self.rent_debt = debt;
    }

    /// Rebuild from snapshot fields. Career is taken from the ledger.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn restore(
        player_id: String,
        cash: i64,
        health: f64,
        happiness: f64,
        education: f64,
        position: Position,
        current_building: Option<String>,
        job: Option<Job>,
        experience: &[ExperienceEntry],
        possessions: Vec<Possession>,
        rented_home: Option<String>,
        rent_debt: i64,
    ) -> Self {
        let mut state = Self::new(&player_id, cash, health, happiness, education);
        state.position = position;
        state.current_building = current_building;
        state.job = job;
        for entry in experience {
            state.add_experience(entry.rank, entry.points);
        }
        state.possessions = possessions;
        state.rented_home = rented_home;
        state.rent_debt = rent_debt;
        state
    }
}

/// A validated `#RRGGBB` color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlayerColor(String);

impl PlayerColor {
    pub fn parse(raw: &str) -> Result<Self, EngineError> {
        let valid = raw.len() == 7
            && raw.starts_with('#')
            && raw[1..].chars().all(|c| c.is_ascii_hexdigit());
        if !valid {
            return Err(EngineError::InvalidColor(raw.to_string()));
        }
        Ok(Self(raw.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PlayerColor {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PlayerColor> for String {
    fn from(color: PlayerColor) -> Self {
        color.0
    }
}

/// Identity wrapper around a `PlayerState`.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub id: String,
    pub name: String,
    pub color: PlayerColor,
    pub is_ai: bool,
    pub ai_type: Option<String>,
    pub(crate) state: PlayerState,
}

impl Player {
    pub fn state(&self) -> &PlayerState {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::possession::PossessionEffects;
    use proptest::prelude::*;

    fn clothes(id: &str, level: u32) -> Possession {
        Possession {
            id: id.to_string(),
            possession_type: PossessionType::Clothes,
            name: id.to_string(),
            value: 10,
            purchase_price: 10,
            clothes_level: Some(level),
            symbol: None,
            effects: PossessionEffects::default(),
        }
    }

    #[test]
    fn new_state_starts_at_origin() {
        let state = PlayerState::new("p1", 200, 80.0, 70.0, 150.0);
        assert_eq!(state.position(), Position::origin());
        assert_eq!(state.cash(), 200);
        assert_eq!(state.education().value(), 100.0);
        assert!(state.job().is_none());
        assert_eq!(state.career().value(), 0.0);
    }

    #[test]
    fn clothes_level_is_max_of_owned_clothes() {
        let mut state = PlayerState::new("p1", 0, 50.0, 50.0, 0.0);
        assert_eq!(state.max_clothes_level(), 0);
        state.add_possession(clothes("a", 1));
        state.add_possession(clothes("b", 3));
        assert_eq!(state.max_clothes_level(), 3);
        assert!(state.remove_possession("b").is_some());
        assert_eq!(state.max_clothes_level(), 1);
        assert!(state.remove_possession("missing").is_none());
    }

    #[test]
    fn cash_may_go_negative() {
        let mut state = PlayerState::new("p1", 10, 50.0, 50.0, 0.0);
        state.set_cash(-40);
        assert_eq!(state.cash(), -40);
        assert!(!state.can_afford(1));
    }

    #[test]
    fn color_must_be_hex() {
        assert!(PlayerColor::parse("#ff0000").is_ok());
        assert_eq!(PlayerColor::parse("#ff0000").unwrap().as_str(), "#FF0000");
        assert!(matches!(PlayerColor::parse("red"), Err(EngineError::InvalidColor(_))));
        assert!(PlayerColor::parse("#12345").is_err());
        assert!(PlayerColor::parse("#GG0000").is_err());
    }

    proptest! {
        #[test]
        fn career_tracks_experience_ledger(
            grants in proptest::collection::vec((0u32..8, 0u32..500), 0..30)
        ) {
            let mut state = PlayerState::new("p1", 0, 50.0, 50.0, 0.0);
            for (rank, points) in grants {
                state.add_experience(rank, points);
                let total: u64 = state.experience().iter().map(|e| u64::from(e.points)).sum();
                prop_assert_eq!(state.career().value(), total as f64);
            }
        }
    }
}
