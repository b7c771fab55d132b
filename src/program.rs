//! The structural and parameterized program data model (spec §3, §9).
//!
//! Structural and parameterized exercises form a strictly one-level tree —
//! a compound parent's children are never themselves compounds — represented
//! here with tagged variants rather than a self-referential pointer, so the
//! "never nest" invariant is enforced by the type rather than by convention.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The four compound block kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompoundKind {
    Emom,
    Amrap,
    Circuit,
    Interval,
}

impl CompoundKind {
    pub fn as_key(&self) -> &'static str {
        match self {
            CompoundKind::Emom => "emom",
            CompoundKind::Amrap => "amrap",
            CompoundKind::Circuit => "circuit",
            CompoundKind::Interval => "interval",
        }
    }

    pub fn all() -> [CompoundKind; 4] {
        [CompoundKind::Emom, CompoundKind::Amrap, CompoundKind::Circuit, CompoundKind::Interval]
    }

    /// Typical constituent count per spec §4.6.
    pub fn base_constituent_count(&self) -> usize {
        match self {
            CompoundKind::Emom => 2,
            CompoundKind::Interval => 2,
            CompoundKind::Amrap => 3,
            CompoundKind::Circuit => 4,
        }
    }
}

/// Progression scheme selector (spec §4.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressionScheme {
    Linear,
    Density,
    WaveLoading,
    Volume,
    Static,
}

impl ProgressionScheme {
    pub fn as_key(&self) -> &'static str {
        match self {
            ProgressionScheme::Linear => "linear",
            ProgressionScheme::Density => "density",
            ProgressionScheme::WaveLoading => "wave_loading",
            ProgressionScheme::Volume => "volume",
            ProgressionScheme::Static => "static",
        }
    }
}

/// Unit a `TimeValue` is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeUnit {
    Seconds,
    Minutes,
}

/// A unit-bearing time value. Arithmetic and rounding must stay unit-aware
/// (spec §4.7, §9) — never collapse to a bare number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeValue {
    pub value: Decimal,
    pub unit: TimeUnit,
}

impl TimeValue {
    pub fn seconds(value: Decimal) -> Self {
        TimeValue { value, unit: TimeUnit::Seconds }
    }

    pub fn minutes(value: Decimal) -> Self {
        TimeValue { value, unit: TimeUnit::Minutes }
    }

    /// Round per the spec's invariant: seconds round to the nearest 5;
    /// minutes round to the nearest 0.5 when above 1 minute, exact otherwise.
    pub fn rounded(&self) -> TimeValue {
        let value = match self.unit {
            TimeUnit::Seconds => round_to_nearest(self.value, Decimal::from(5)),
            TimeUnit::Minutes => {
                if self.value > Decimal::ONE {
                    round_to_nearest(self.value, Decimal::new(5, 1))
                } else {
                    self.value
                }
            }
        };
        TimeValue { value, unit: self.unit }
    }
}

/// Round `value` to the nearest multiple of `step`.
pub fn round_to_nearest(value: Decimal, step: Decimal) -> Decimal {
    if step.is_zero() {
        return value;
    }
    (value / step).round() * step
}

/// A weight prescription: how a week's weight field should be interpreted.
/// Modeled as a tagged variant instead of the source's polymorphic
/// string-or-object shape, so the resolver can exhaustively match it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WeightPrescription {
    Qualitative { descriptor: String },
    PercentTrainingMax { percent: Decimal },
    PercentBodyweight { percent: Decimal },
    Absolute { value: Decimal, unit: WeightUnit },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightUnit {
    Lbs,
    Kg,
}

/// Reps can be a concrete count or a free-form literal ("AMRAP", "8-12").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reps {
    Count(i32),
    Literal(String),
}

/// One week's parameters for a single exercise. Variants encode the
/// mutual-exclusion invariants (set_blocks XOR flat sets/reps; sub-exercises
/// never carry `sets`) directly in the type rather than via runtime checks
/// spread across callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekParams {
    pub sets: Option<i32>,
    pub reps: Option<Reps>,
    pub work_time: Option<TimeValue>,
    pub rest_time: Option<TimeValue>,
    pub weight: Option<WeightPrescription>,
    pub tempo: Option<String>,
    pub set_blocks: Option<Vec<SetBlock>>,
}

impl WeekParams {
    pub fn empty() -> Self {
        WeekParams {
            sets: None,
            reps: None,
            work_time: None,
            rest_time: None,
            weight: None,
            tempo: None,
            set_blocks: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetBlock {
    pub reps: Reps,
    pub weight: Option<WeightPrescription>,
}

/// A single block specification from `day_structure_by_equipment`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSpec {
    pub block_type: String,
    pub count: usize,
}

/// An exercise as placed by Phase 1, before parameterization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuralExercise {
    pub exercise_name: String,
    pub compound_category: Option<CompoundKind>,
    pub progression_scheme: ProgressionScheme,
    pub intensity_profile: String,
    pub sub_exercises: Vec<StructuralExercise>,
}

impl StructuralExercise {
    pub fn leaf(name: impl Into<String>, scheme: ProgressionScheme, profile: impl Into<String>) -> Self {
        StructuralExercise {
            exercise_name: name.into(),
            compound_category: None,
            progression_scheme: scheme,
            intensity_profile: profile.into(),
            sub_exercises: Vec::new(),
        }
    }

    pub fn is_compound(&self) -> bool {
        self.compound_category.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuralDay {
    pub day_number: u8,
    pub day_type: String,
    pub focus: String,
    pub exercises: Vec<StructuralExercise>,
}

/// A fully parameterized exercise: every week 1..N is present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterizedExercise {
    pub name: String,
    pub category: Option<CompoundKind>,
    pub weeks: Vec<WeekParams>,
    pub sub_exercises: Vec<ParameterizedExercise>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterizedDay {
    pub day_number: u8,
    pub day_type: String,
    pub focus: String,
    pub exercises: Vec<ParameterizedExercise>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ProgramMetadata {
    pub difficulty: String,
    pub equipment: Vec<String>,
    pub estimated_duration_minutes: u32,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterizedProgram {
    pub id: String,
    pub name: String,
    pub description: String,
    pub version: String,
    pub weeks: u32,
    pub days_per_week: u8,
    pub metadata: ProgramMetadata,
    /// Keyed and iterated in day-number order — a `HashMap` here would make
    /// serialized output order-unstable across runs of the same seed.
    pub days: BTreeMap<u8, ParameterizedDay>,
}
