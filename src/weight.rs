//! Weight resolution (spec §4.10): turn a `WeightPrescription` plus a
//! one-rep-max cache into a display weight.

use crate::config::OneRmCache;
use crate::program::{round_to_nearest, WeightPrescription, WeightUnit};
use rust_decimal::Decimal;

/// A resolved weight, ready to display to the athlete.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedWeight {
    Text(String),
    Value { value: Decimal, unit: WeightUnit },
}

impl ResolvedWeight {
    pub fn display(&self) -> String {
        match self {
            ResolvedWeight::Text(s) => s.clone(),
            ResolvedWeight::Value { value, unit } => {
                let unit_str = match unit {
                    WeightUnit::Lbs => "lbs",
                    WeightUnit::Kg => "kg",
                };
                format!("{} {}", value, unit_str)
            }
        }
    }
}

/// Resolve a weight prescription for `exercise_name` against an athlete's
/// one-rep-max cache.
pub fn resolve_weight(prescription: &WeightPrescription, exercise_name: &str, cache: &OneRmCache) -> ResolvedWeight {
    match prescription {
        WeightPrescription::Qualitative { descriptor } => ResolvedWeight::Text(descriptor.clone()),
        WeightPrescription::PercentBodyweight { percent } => ResolvedWeight::Text(format!("{}% bodyweight", percent)),
        WeightPrescription::Absolute { value, unit } => ResolvedWeight::Value { value: *value, unit: *unit },
        WeightPrescription::PercentTrainingMax { percent } => {
            let trm = cache
                .entries
                .get(exercise_name)
                .map(|entry| entry.training_max())
                .unwrap_or(Decimal::ZERO);

            if trm > Decimal::ZERO {
                let weight = round_to_nearest(trm * percent / Decimal::from(100), Decimal::from(5));
                ResolvedWeight::Value { value: weight, unit: WeightUnit::Lbs }
            } else {
                ResolvedWeight::Text(format!("{}%", percent))
            }
        }
    }
}
