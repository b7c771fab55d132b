//! The rules document: the config-driven decision tree that the rest of
//! the engine consults instead of hard-coding goal/progression/intensity
//! tables in source (spec §4.1, §9).
//!
//! Dynamic lookup keys (goal, frequency, equipment profile, day type,
//! category, progression scheme name) are kept as `String` map keys rather
//! than enum keys, deliberately: it keeps `serde_json`'s map deserialization
//! straightforward and matches the "open, data-driven" nature of the
//! document described in spec §9 ("resist hard-coding... in source").

use crate::error::{Result, WorkoutGenError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DayStructureProfile {
    #[serde(flatten)]
    pub day_types: HashMap<String, DayStructureSpec>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DayStructureSpec {
    pub blocks: Vec<RawBlockSpec>,
}

/// `count` may be a literal integer or the sentinel string `"time_based"`,
/// resolved at build time via `compound_blocks_by_time`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawBlockSpec {
    #[serde(rename = "type")]
    pub block_type: String,
    pub count: CountSpec,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum CountSpec {
    Fixed(usize),
    TimeBased(String),
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CompoundConstruction {
    pub base_constituent_exercises: usize,
    #[serde(default)]
    pub exclude_equipment: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct IntensityProfile {
    pub sets: Option<Decimal>,
    pub reps: Option<RepsSpec>,
    pub work_time_seconds: Option<Decimal>,
    pub work_time_minutes: Option<Decimal>,
    pub base_work_time_minutes: Option<Decimal>,
    pub base_work_time_unit: Option<String>,
    pub block_time_minutes: Option<Decimal>,
    pub rest_time_seconds: Option<Decimal>,
    pub rest_time_minutes: Option<Decimal>,
    pub weight_descriptor: Option<String>,
    pub weight_percent_tm: Option<Decimal>,
    pub sub_work_mode: Option<String>,
    pub sub_work_time_seconds: Option<Decimal>,
    pub sub_rest_time_seconds: Option<Decimal>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RepsSpec {
    Count(Decimal),
    Literal(String),
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ProgressionRules {
    pub reps_delta_per_week: Option<Decimal>,
    pub reps_minimum: Option<Decimal>,
    pub weight_percent_delta_per_week: Option<Decimal>,
    pub rest_time_delta_per_week_minutes: Option<Decimal>,
    pub rest_time_delta_per_week_seconds: Option<Decimal>,
    pub rest_time_minimum_seconds: Option<Decimal>,
    pub rest_time_minimum_minutes: Option<Decimal>,
    pub work_time_increase_percent_total: Option<Decimal>,
    pub reps_increase_percent_total: Option<Decimal>,
    pub work_time_delta_per_week_seconds: Option<Decimal>,
    pub rest_time_delta_interval_seconds: Option<Decimal>,
    pub sets_increase_every_n_weeks: Option<u32>,
    pub sets_maximum: Option<i32>,
    pub wave_patterns: Option<HashMap<String, WavePattern>>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WavePattern {
    pub weight_percent_deltas: Vec<Decimal>,
    pub reps_deltas: Vec<Decimal>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProgressionSchemeEntry {
    pub rules: ProgressionRules,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightType {
    Descriptor,
    PercentTm,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExperienceModifier {
    pub weight_type: WeightType,
    pub volume_multiplier: Decimal,
    pub rest_time_multiplier: Decimal,
    pub complexity_filter: Vec<String>,
    pub external_load_filter: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct MuscleGroupMapping {
    pub include_muscle_groups: Vec<String>,
    #[serde(default)]
    pub exclude_muscle_groups: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ExerciseCountConstraints {
    pub min_per_day: Option<usize>,
    pub max_per_day: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct EquipmentQuotas {
    pub barbell_max_per_day: Option<usize>,
}

/// The rules document, fully typed (dynamic sections keyed by `String`).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RulesDocument {
    pub prescriptive_splits: HashMap<String, HashMap<String, Vec<String>>>,
    pub day_structure_by_equipment: HashMap<String, DayStructureProfile>,
    pub compound_blocks_by_time: HashMap<String, usize>,
    pub compound_exercise_construction: HashMap<String, CompoundConstruction>,
    pub intensity_profiles: HashMap<String, HashMap<String, IntensityProfile>>,
    pub progression_schemes: HashMap<String, ProgressionSchemeEntry>,
    pub progression_by_goal: HashMap<String, String>,
    pub experience_modifiers: HashMap<String, ExperienceModifier>,
    pub intensity_profile_by_layer_and_category: HashMap<String, HashMap<String, String>>,
    pub split_muscle_group_mapping: HashMap<String, MuscleGroupMapping>,
    #[serde(default)]
    pub exercise_count_constraints: ExerciseCountConstraints,
    #[serde(default)]
    pub equipment_quotas: EquipmentQuotas,
}

fn missing(path: &str) -> WorkoutGenError {
    WorkoutGenError::Configuration(path.to_string())
}

impl RulesDocument {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Arc<Self>> {
        let raw = std::fs::read_to_string(path)?;
        Self::load_from_str(&raw)
    }

    pub fn load_from_str(raw: &str) -> Result<Arc<Self>> {
        let doc: RulesDocument = serde_json::from_str(raw)?;
        doc.validate()?;
        Ok(Arc::new(doc))
    }

    /// Structural validation: every progression scheme named by
    /// `progression_by_goal` must actually exist, and every experience level
    /// must have modifiers — a malformed document fails loudly at load time
    /// rather than surfacing as a confusing lookup failure mid-generation.
    fn validate(&self) -> Result<()> {
        for (goal, scheme) in &self.progression_by_goal {
            if !self.progression_schemes.contains_key(scheme) {
                return Err(missing(&format!("progression_by_goal.{} -> {}", goal, scheme)));
            }
        }
        if self.experience_modifiers.is_empty() {
            return Err(missing("experience_modifiers"));
        }
        if self.prescriptive_splits.is_empty() {
            return Err(missing("prescriptive_splits"));
        }
        Ok(())
    }

    pub fn get_prescriptive_split(&self, goal: &str, frequency: u8) -> Result<&Vec<String>> {
        self.prescriptive_splits
            .get(goal)
            .and_then(|by_freq| by_freq.get(&frequency.to_string()))
            .ok_or_else(|| missing(&format!("prescriptive_splits.{}.{}", goal, frequency)))
    }

    pub fn progression_scheme_for_goal(&self, goal: &str) -> Result<&str> {
        self.progression_by_goal
            .get(goal)
            .map(|s| s.as_str())
            .ok_or_else(|| missing(&format!("progression_by_goal.{}", goal)))
    }

    pub fn progression_rules(&self, scheme: &str) -> Result<&ProgressionRules> {
        self.progression_schemes
            .get(scheme)
            .map(|e| &e.rules)
            .ok_or_else(|| missing(&format!("progression_schemes.{}", scheme)))
    }

    pub fn experience_modifier(&self, level: &str) -> Result<&ExperienceModifier> {
        self.experience_modifiers
            .get(level)
            .ok_or_else(|| missing(&format!("experience_modifiers.{}", level)))
    }
}
