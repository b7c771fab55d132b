//! The flat input record the generator consumes, and the small enums that
//! key into the rules document.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Training goal; keys `prescriptive_splits` and `progression_by_goal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    BuildMuscle,
    Tone,
    LoseWeight,
}

impl Goal {
    pub fn as_key(&self) -> &'static str {
        match self {
            Goal::BuildMuscle => "build_muscle",
            Goal::Tone => "tone",
            Goal::LoseWeight => "lose_weight",
        }
    }
}

/// Experience level; keys `experience_modifiers`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Experience {
    CompleteBeginner,
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl Experience {
    pub fn as_key(&self) -> &'static str {
        match self {
            Experience::CompleteBeginner => "complete_beginner",
            Experience::Beginner => "beginner",
            Experience::Intermediate => "intermediate",
            Experience::Advanced => "advanced",
            Experience::Expert => "expert",
        }
    }
}

/// Target session length; used to resolve the `compound_blocks_by_time` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionDuration {
    Short,
    Medium,
    Long,
}

impl SessionDuration {
    /// Midpoint minute value used as the lookup key into
    /// `compound_blocks_by_time`.
    pub fn minutes(&self) -> u32 {
        match self {
            SessionDuration::Short => 25,
            SessionDuration::Medium => 45,
            SessionDuration::Long => 75,
        }
    }
}

/// How many weeks the generated program should span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgramDuration {
    ThreeWeeks,
    FourWeeks,
    SixWeeks,
    EightWeeks,
    TwelveWeeks,
    SixteenWeeks,
}

impl ProgramDuration {
    pub fn weeks(&self) -> u32 {
        match self {
            ProgramDuration::ThreeWeeks => 3,
            ProgramDuration::FourWeeks => 4,
            ProgramDuration::SixWeeks => 6,
            ProgramDuration::EightWeeks => 8,
            ProgramDuration::TwelveWeeks => 12,
            ProgramDuration::SixteenWeeks => 16,
        }
    }
}

impl Default for ProgramDuration {
    fn default() -> Self {
        ProgramDuration::TwelveWeeks
    }
}

/// Either a discrete named profile or an explicit set of equipment tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EquipmentAccess {
    Profile(EquipmentProfile),
    Tokens(HashSet<String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentProfile {
    FullGym,
    DumbbellsOnly,
    BodyweightOnly,
}

impl EquipmentProfile {
    pub fn as_key(&self) -> &'static str {
        match self {
            EquipmentProfile::FullGym => "full_gym",
            EquipmentProfile::DumbbellsOnly => "dumbbells_only",
            EquipmentProfile::BodyweightOnly => "bodyweight_only",
        }
    }

    /// Derive a profile from a raw set of available equipment tokens, per
    /// the rule: barbell AND rack implies full gym, else dumbbells implies
    /// dumbbells-only, else bodyweight-only.
    pub fn from_tokens(tokens: &HashSet<String>) -> Self {
        let has = |t: &str| tokens.iter().any(|x| x.eq_ignore_ascii_case(t));
        if has("barbell") && has("rack") {
            EquipmentProfile::FullGym
        } else if has("dumbbell") {
            EquipmentProfile::DumbbellsOnly
        } else {
            EquipmentProfile::BodyweightOnly
        }
    }
}

impl EquipmentAccess {
    pub fn profile(&self) -> EquipmentProfile {
        match self {
            EquipmentAccess::Profile(p) => *p,
            EquipmentAccess::Tokens(tokens) => EquipmentProfile::from_tokens(tokens),
        }
    }

    /// The concrete equipment tokens available, used by the selector's
    /// per-exercise equipment filter. "None" is always implicitly available.
    pub fn tokens(&self) -> HashSet<String> {
        match self {
            EquipmentAccess::Tokens(t) => t.clone(),
            EquipmentAccess::Profile(EquipmentProfile::FullGym) => [
                "Barbell", "Rack", "Bench", "Dumbbell", "Cable", "Machine", "Pull-up Bar", "Mat",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            EquipmentAccess::Profile(EquipmentProfile::DumbbellsOnly) => {
                ["Dumbbell", "Bench", "Chair", "Mat"].iter().map(|s| s.to_string()).collect()
            }
            EquipmentAccess::Profile(EquipmentProfile::BodyweightOnly) => {
                ["Mat", "Pull-up Bar"].iter().map(|s| s.to_string()).collect()
            }
        }
    }
}

/// The flat input record the generator consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Questionnaire {
    pub goal: Goal,
    pub experience: Experience,
    pub training_frequency: u8,
    pub session_duration: SessionDuration,
    pub equipment_access: EquipmentAccess,
    #[serde(default)]
    pub program_duration: ProgramDuration,
    pub seed: Option<u32>,
}

impl Questionnaire {
    /// Number of minutes used for the `compound_blocks_by_time` lookup.
    pub fn duration_minutes(&self) -> u32 {
        self.session_duration.minutes()
    }
}
