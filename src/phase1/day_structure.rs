//! Focus-to-blocks resolution (spec §4.5).

use crate::error::{Result, WorkoutGenError};
use crate::program::{BlockSpec, ProgressionScheme};
use crate::rules::{CountSpec, RulesDocument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayType {
    Standard,
    Hiit,
    Volume,
    Strength,
    Mobility,
}

impl DayType {
    pub fn as_key(&self) -> &'static str {
        match self {
            DayType::Standard => "standard",
            DayType::Hiit => "hiit",
            DayType::Volume => "volume",
            DayType::Strength => "strength",
            DayType::Mobility => "mobility",
        }
    }
}

/// `get_prescriptive_split(goal, frequency) -> [focus]` (direct passthrough
/// onto the rules document; kept as a free function for symmetry with the
/// other Phase 1 operations named in the spec).
pub fn get_prescriptive_split<'a>(
    rules: &'a RulesDocument,
    goal: &str,
    frequency: u8,
) -> Result<&'a Vec<String>> {
    rules.get_prescriptive_split(goal, frequency)
}

/// Split a focus string into its base and optional suffix
/// (`-HIIT` | `-Volume` | `-Strength` | `-Mobility`).
pub fn parse_focus(focus: &str) -> (&str, Option<DayType>) {
    for (suffix, day_type) in [
        ("-HIIT", DayType::Hiit),
        ("-Volume", DayType::Volume),
        ("-Strength", DayType::Strength),
        ("-Mobility", DayType::Mobility),
    ] {
        if let Some(base) = focus.strip_suffix(suffix) {
            return (base, Some(day_type));
        }
    }
    (focus, None)
}

/// The key used to look up a focus's muscle-group inclusion/exclusion sets.
/// "Flexibility" and "FullBody-Mobility" both collapse to "Mobility".
pub fn muscle_group_lookup_key(focus: &str) -> String {
    if focus == "Flexibility" || focus == "FullBody-Mobility" {
        "Mobility".to_string()
    } else {
        parse_focus(focus).0.to_string()
    }
}

/// Build the ordered block list for a day given its focus, equipment
/// profile, and session duration.
pub fn build_day_structure(
    focus: &str,
    equipment_profile: &str,
    duration_minutes: u32,
    rules: &RulesDocument,
) -> Result<Vec<BlockSpec>> {
    let (base, suffix) = parse_focus(focus);
    if base == "Flexibility" {
        return Ok(vec![
            BlockSpec { block_type: "mobility".to_string(), count: 3 },
            BlockSpec { block_type: "compound".to_string(), count: 1 },
        ]);
    }

    let day_type = suffix.unwrap_or(DayType::Standard);
    let profile = rules.day_structure_by_equipment.get(equipment_profile).ok_or_else(|| {
        WorkoutGenError::Configuration(format!("day_structure_by_equipment.{}", equipment_profile))
    })?;

    let spec = profile
        .day_types
        .get(day_type.as_key())
        .or_else(|| profile.day_types.get(DayType::Standard.as_key()))
        .ok_or_else(|| {
            WorkoutGenError::Configuration(format!(
                "day_structure_by_equipment.{}.{}",
                equipment_profile,
                day_type.as_key()
            ))
        })?;

    spec.blocks
        .iter()
        .map(|raw| {
            let count = match &raw.count {
                CountSpec::Fixed(n) => *n,
                CountSpec::TimeBased(_) => *rules
                    .compound_blocks_by_time
                    .get(&duration_minutes.to_string())
                    .unwrap_or(&2),
            };
            Ok(BlockSpec { block_type: raw.block_type.clone(), count })
        })
        .collect()
}

/// Resolve an intensity profile name for (layer, category), falling through
/// category-default and layer-under-default before the final `moderate`
/// fallback (spec §4.5).
pub fn assign_intensity_profile(layer: &str, category: &str, rules: &RulesDocument) -> String {
    if let Some(profile) = rules
        .intensity_profile_by_layer_and_category
        .get(category)
        .and_then(|by_layer| by_layer.get(layer))
    {
        return profile.clone();
    }
    if let Some(profile) = rules
        .intensity_profile_by_layer_and_category
        .get(category)
        .and_then(|by_layer| by_layer.get("default"))
    {
        return profile.clone();
    }
    if let Some(profile) = rules
        .intensity_profile_by_layer_and_category
        .get("default")
        .and_then(|by_layer| by_layer.get(layer))
    {
        return profile.clone();
    }
    "moderate".to_string()
}

/// Resolve the progression scheme for (goal, category): mobility,
/// flexibility, and cardio categories always progress statically.
pub fn progression_from_goal(goal: &str, category: &str, rules: &RulesDocument) -> Result<ProgressionScheme> {
    if matches!(category, "mobility" | "flexibility" | "cardio") {
        return Ok(ProgressionScheme::Static);
    }
    let scheme_key = rules.progression_scheme_for_goal(goal)?;
    scheme_from_key(scheme_key)
}

pub fn scheme_from_key(key: &str) -> Result<ProgressionScheme> {
    Ok(match key {
        "linear" => ProgressionScheme::Linear,
        "density" => ProgressionScheme::Density,
        "wave_loading" => ProgressionScheme::WaveLoading,
        "volume" => ProgressionScheme::Volume,
        "static" => ProgressionScheme::Static,
        other => {
            return Err(WorkoutGenError::Configuration(format!(
                "progression_schemes.{} (unknown scheme key)",
                other
            )))
        }
    })
}
