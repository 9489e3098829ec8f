/// Lifesim Engine: Measures
///
/// One bounded value type shared by every player stat.
/// The kinds only differ in bounds, decay and status tiers.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// A numeric stat clamped to `[min, max]` after every mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct Measure {
    value: f64,
    min: f64,
    max: f64,
    decay_rate: f64,
}

impl Measure {
    pub fn new(value: f64, min: f64, max: f64, decay_rate: f64) -> Self {
        Self {
            value: value.clamp(min, max),
            min,
            max,
            decay_rate,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn decay_rate(&self) -> f64 {
        self.decay_rate
    }

    /// Add `amount` and return how much was actually applied.
    pub fn increase(&mut self, amount: f64) -> Result<f64, EngineError> {
        if amount < 0.0 {
            return Err(EngineError::NegativeDelta(amount));
        }
        Ok(self.update(amount))
    }

    /// Subtract `amount` and return how much was actually removed.
    pub fn decrease(&mut self, amount: f64) -> Result<f64, EngineError> {
        if amount < 0.0 {
            return Err(EngineError::NegativeDelta(amount));
        }
        Ok(-self.update(-amount))
    }

    /// Signed, clamped change. Returns the applied delta.
    pub fn update(&mut self, delta: f64) -> f64 {
        let before = self.value;
        self.value = (self.value + delta).clamp(self.min, self.max);
        self.value - before
    }

    /// Returns the amount lost.
    pub fn apply_decay(&mut self) -> f64 {
        if self.decay_rate == 0.0 {
            return 0.0;
        }
        -self.update(-self.decay_rate)
    }

    /// Share of `max`, 0 when the measure is unbounded above.
    pub fn percentage(&self) -> f64 {
        if self.max.is_infinite() || self.max == 0.0 {
            return 0.0;
        }
        self.value / self.max * 100.0
    }

    pub fn reset(&mut self, value: f64) {
        self.value = value.clamp(self.min, self.max);
    }
}

/// The five player stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasureKind {
    Health,
    Happiness,
    Education,
    Career,
    Wealth,
}

impl MeasureKind {
    pub const ALL: [MeasureKind; 5] = [
        MeasureKind::Health,
        MeasureKind::Happiness,
        MeasureKind::Education,
        MeasureKind::Career,
        MeasureKind::Wealth,
    ];

    pub fn bounds(self) -> (f64, f64) {
        match self {
            MeasureKind::Health | MeasureKind::Happiness | MeasureKind::Education => (0.0, 100.0),
            MeasureKind::Career => (0.0, f64::INFINITY),
            MeasureKind::Wealth => (f64::NEG_INFINITY, f64::INFINITY),
        }
    }

    /// A fresh measure of this kind. Health and happiness may decay,
    /// the rest never do.
    pub fn measure(self, initial: f64) -> Measure {
        self.measure_with_decay(initial, 0.0)
    }

    pub fn measure_with_decay(self, initial: f64, decay_rate: f64) -> Measure {
        let (min, max) = self.bounds();
        let decay = match self {
            MeasureKind::Health | MeasureKind::Happiness => decay_rate,
            _ => 0.0,
        };
        Measure::new(initial, min, max, decay)
    }

    /// Tiered label for UI display.
    pub fn status(self, value: f64) -> &'static str {
        match self {
            MeasureKind::Health => tier(value, [20.0, 40.0, 60.0, 80.0], [
                "Critical", "Poor", "Fair", "Good", "Excellent",
            ]),
            MeasureKind::Happiness => tier(value, [20.0, 40.0, 60.0, 80.0], [
                "Miserable", "Unhappy", "Content", "Happy", "Joyful",
            ]),
            MeasureKind::Education => tier(value, [20.0, 40.0, 60.0, 80.0], [
                "Uneducated", "Basic", "Educated", "Graduate", "Scholar",
            ]),
            MeasureKind::Career => tier(value, [50.0, 150.0, 300.0, 600.0], [
                "Unemployed", "Entry Level", "Junior", "Experienced", "Senior",
            ]),
            MeasureKind::Wealth => tier(value, [0.0, 500.0, 2000.0, 10000.0], [
                "In Debt", "Broke", "Modest", "Comfortable", "Wealthy",
            ]),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MeasureKind::Health => "health",
            MeasureKind::Happiness => "happiness",
            MeasureKind::Education => "education",
            MeasureKind::Career => "career",
            MeasureKind::Wealth => "wealth",
        }
    }
}

fn tier(value: f64, cuts: [f64; 4], labels: [&'static str; 5]) -> &'static str {
    cuts.iter()
        .position(|cut| value < *cut)
        .map_or(labels[4], |idx| labels[idx])
}
