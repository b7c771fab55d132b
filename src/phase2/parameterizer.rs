//! Week-1 baselines and the recursive walk over sub-exercises (spec §4.7).

use crate::catalogue::ExerciseCatalogue;
use crate::error::{Result, WorkoutGenError};
use crate::metadata::MetadataService;
use crate::phase2::progression;
use crate::program::{
    ParameterizedExercise, Reps, StructuralExercise, TimeValue, WeekParams, WeightPrescription,
};
use crate::rules::{IntensityProfile, ProgressionRules, RulesDocument, WeightType};
use crate::rules::ExperienceModifier;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

fn round_to_i32(value: Decimal) -> i32 {
    value.round().to_i32().unwrap_or(1)
}

/// Build week 1 from an intensity profile.
fn week1_from_profile(
    profile: &IntensityProfile,
    experience: &ExperienceModifier,
    is_parent: bool,
    is_interval_parent: bool,
    is_interval_sub: bool,
    has_external_load: bool,
) -> WeekParams {
    let mut week = WeekParams::empty();

    if is_parent && !is_interval_parent {
        if let Some(sets) = profile.sets {
            week.sets = Some(round_to_i32(sets * experience.volume_multiplier));
        }
    }

    if !is_interval_sub {
        match &profile.reps {
            Some(crate::rules::RepsSpec::Count(n)) => {
                week.reps = Some(Reps::Count(round_to_i32(*n * experience.volume_multiplier)));
            }
            Some(crate::rules::RepsSpec::Literal(lit)) => {
                week.reps = Some(Reps::Literal(lit.clone()));
            }
            None => {}
        }
    }

    if is_parent && !is_interval_parent {
        if let Some(minutes) = profile.block_time_minutes {
            week.work_time = Some(TimeValue::minutes(minutes).rounded());
        } else if let Some(seconds) = profile.work_time_seconds {
            week.work_time = Some(TimeValue::seconds(seconds).rounded());
        } else if let Some(minutes) = profile.work_time_minutes {
            week.work_time = Some(TimeValue::minutes(minutes).rounded());
        } else if let Some(minutes) = profile.base_work_time_minutes {
            week.work_time = Some(TimeValue::minutes(minutes).rounded());
        }
    }

    if is_parent && !is_interval_parent {
        if let Some(seconds) = profile.rest_time_seconds {
            let value = seconds * experience.rest_time_multiplier;
            week.rest_time = Some(TimeValue::seconds(value).rounded());
        } else if let Some(minutes) = profile.rest_time_minutes {
            let value = minutes * experience.rest_time_multiplier;
            week.rest_time = Some(TimeValue::minutes(value).rounded());
        }
    }

    if is_interval_sub {
        if let Some(seconds) = profile.sub_work_time_seconds {
            week.work_time = Some(TimeValue::seconds(seconds).rounded());
        }
        if let Some(seconds) = profile.sub_rest_time_seconds {
            week.rest_time = Some(TimeValue::seconds(seconds).rounded());
        }
    }

    if has_external_load {
        week.weight = Some(match experience.weight_type {
            WeightType::Descriptor => WeightPrescription::Qualitative {
                descriptor: profile.weight_descriptor.clone().unwrap_or_else(|| "moderate".to_string()),
            },
            WeightType::PercentTm => WeightPrescription::PercentTrainingMax {
                percent: profile.weight_percent_tm.unwrap_or(Decimal::from(65)),
            },
        });
    }

    week
}

fn apply_scheme(
    week1: &WeekParams,
    rules: &ProgressionRules,
    scheme: crate::program::ProgressionScheme,
    week_index: u32,
    total_weeks: u32,
    is_compound_parent: bool,
    is_interval_sub: bool,
) -> WeekParams {
    use crate::program::ProgressionScheme::*;
    if week_index == 1 {
        return week1.clone();
    }
    if is_interval_sub {
        return progression::interval(week1, rules, week_index);
    }
    match scheme {
        Linear => progression::linear(week1, rules, week_index),
        Density => progression::density(week1, rules, week_index, total_weeks, is_compound_parent),
        WaveLoading => progression::wave_loading(week1, rules, week_index, total_weeks),
        Volume => progression::volume(week1, rules, week_index, total_weeks),
        Static => progression::static_scheme(week1),
    }
}

/// Parameterize a single structural exercise (and, recursively, its
/// sub-exercises) across all weeks.
pub fn parameterize_exercise(
    structural: &StructuralExercise,
    catalogue: &ExerciseCatalogue,
    metadata: &MetadataService,
    rules: &RulesDocument,
    experience: &ExperienceModifier,
    total_weeks: u32,
    day_number: u8,
) -> Result<ParameterizedExercise> {
    parameterize_inner(structural, catalogue, metadata, rules, experience, total_weeks, day_number, false, None)
}

#[allow(clippy::too_many_arguments)]
fn parameterize_inner(
    structural: &StructuralExercise,
    catalogue: &ExerciseCatalogue,
    metadata: &MetadataService,
    rules: &RulesDocument,
    experience: &ExperienceModifier,
    total_weeks: u32,
    day_number: u8,
    is_sub_exercise: bool,
    parent_sub_work_mode: Option<&str>,
) -> Result<ParameterizedExercise> {
    let is_interval_parent = structural.compound_category == Some(crate::program::CompoundKind::Interval);
    let is_interval_sub = is_sub_exercise && parent_sub_work_mode == Some("time");

    let (category_key, has_external_load) = if structural.is_compound() {
        (structural.compound_category.unwrap().as_key().to_string(), false)
    } else {
        let exercise = catalogue.get(&structural.exercise_name).ok_or_else(|| {
            WorkoutGenError::CatalogueReference {
                day: day_number,
                block_type: structural.intensity_profile.clone(),
                name: structural.exercise_name.clone(),
            }
        })?;
        let meta = metadata.get_or_compute(exercise);
        (
            crate::catalogue::category_key(exercise.category).to_string(),
            meta.assign_weight_on_generation,
        )
    };

    let profile = resolve_profile(rules, &category_key, &structural.intensity_profile)?;

    let week1 = week1_from_profile(
        &profile,
        experience,
        !is_sub_exercise,
        is_interval_parent,
        is_interval_sub,
        has_external_load,
    );

    let scheme_key = structural.progression_scheme.as_key();
    let progression_rules = rules.progression_rules(scheme_key)?;

    let mut weeks = Vec::with_capacity(total_weeks as usize);
    for week_index in 1..=total_weeks {
        weeks.push(apply_scheme(
            &week1,
            progression_rules,
            structural.progression_scheme,
            week_index,
            total_weeks,
            structural.is_compound(),
            is_interval_sub,
        ));
    }

    let sub_work_mode = profile.sub_work_mode.clone();
    let mut sub_exercises = Vec::with_capacity(structural.sub_exercises.len());
    for sub in &structural.sub_exercises {
        sub_exercises.push(parameterize_inner(
            sub,
            catalogue,
            metadata,
            rules,
            experience,
            total_weeks,
            day_number,
            true,
            sub_work_mode.as_deref(),
        )?);
    }

    Ok(ParameterizedExercise {
        name: structural.exercise_name.clone(),
        category: structural.compound_category,
        weeks,
        sub_exercises,
    })
}

/// Resolve an intensity profile for a category, falling back through
/// `moderate`, `heavy`, then the first available profile for that category
/// (spec §4.7 sub-exercise recursion).
fn resolve_profile(rules: &RulesDocument, category_key: &str, requested: &str) -> Result<IntensityProfile> {
    let by_category = rules.intensity_profiles.get(category_key).ok_or_else(|| {
        WorkoutGenError::Configuration(format!("intensity_profiles.{}", category_key))
    })?;
    if let Some(p) = by_category.get(requested) {
        return Ok(p.clone());
    }
    for fallback in ["moderate", "heavy"] {
        if let Some(p) = by_category.get(fallback) {
            return Ok(p.clone());
        }
    }
    by_category
        .values()
        .next()
        .cloned()
        .ok_or_else(|| WorkoutGenError::Configuration(format!("intensity_profiles.{}.{}", category_key, requested)))
}
