/// Lifesim Engine: State Change Definitions
///
/// State changes are pure data. They describe an intended mutation and
/// carry ZERO application logic; `transitions` interprets them.
///
/// Tags this build does not know deserialize to `Unknown` and are skipped.

use serde::{Deserialize, Serialize};

use crate::jobs::Job;
use crate::measure::MeasureKind;
use crate::position::Position;
use crate::possession::Possession;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StateChange {
    /// Absolute cash balance.
    Cash {
        value: i64,
        #[serde(default)]
        description: String,
    },
    /// Target value for a measure; applied as a clamped delta.
    Measure {
        measure: MeasureKind,
        value: f64,
        #[serde(default)]
        description: String,
    },
    PossessionAdd {
        possession: Possession,
        #[serde(default)]
        description: String,
    },
    PossessionRemove {
        possession_id: String,
        #[serde(default)]
        description: String,
    },
    /// `None` clears the current job.
    Job {
        job: Option<Job>,
        #[serde(default)]
        description: String,
    },
    /// Moves the player and sets which building, if any, they are inside.
    Position {
        position: Position,
        current_building: Option<String>,
        #[serde(default)]
        description: String,
    },
    /// Points credited at a job rank.
    Experience {
        rank: u32,
        points: u32,
        #[serde(default)]
        description: String,
    },
    RentedHome {
        home: Option<String>,
        #[serde(default)]
        description: String,
    },
    /// Absolute outstanding rent debt.
    RentDebt {
        value: i64,
        #[serde(default)]
        description: String,
    },
    #[serde(other)]
    Unknown,
}

impl StateChange {
    pub fn type_name(&self) -> &'static str {
        match self {
            StateChange::Cash { .. } => "cash",
            StateChange::Measure { .. } => "measure",
            StateChange::PossessionAdd { .. } => "possession_add",
            StateChange::PossessionRemove { .. } => "possession_remove",
            StateChange::Job { .. } => "job",
            StateChange::Position { .. } => "position",
            StateChange::Experience { .. } => "experience",
            StateChange::RentedHome { .. } => "rented_home",
            StateChange::RentDebt { .. } => "rent_debt",
            StateChange::Unknown => "unknown",
        }
    }

    pub fn description(&self) -> &str {
        match self {
            StateChange::Cash { description, .. }
            | StateChange::Measure { description, .. }
            | StateChange::PossessionAdd { description, .. }
            | StateChange::PossessionRemove { description, .. }
            | StateChange::Job { description, .. }
            | StateChange::Position { description, .. }
            | StateChange::Experience { description, .. }
            | StateChange::RentedHome { description, .. }
            | StateChange::RentDebt { description, .. } => description,
            StateChange::Unknown => "",
        }
    }
}
