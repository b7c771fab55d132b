//! Candidate filtering, shuffled selection, and compound-block construction
//! (spec §4.6). The override/merge idiom here — building a final value by
//! chaining `.filter()`/`.collect()` passes rather than nested loops with
//! early mutation — follows the resolver style used for plan/day template
//! merging in the wider example pack.

use crate::catalogue::{category_key, Category, Difficulty, Exercise, ExerciseCatalogue, ExternalLoad};
use crate::error::{Result, WorkoutGenError};
use crate::phase1::day_structure::{assign_intensity_profile, progression_from_goal};
use crate::program::{BlockSpec, CompoundKind, StructuralExercise};
use crate::questionnaire::Questionnaire;
use crate::rules::{ExperienceModifier, RulesDocument};
use crate::rng::SeededRng;

const LAYERS: [&str; 6] = ["first", "primary", "secondary", "tertiary", "finisher", "last"];

fn layer_for_index(index: usize) -> &'static str {
    LAYERS.get(index).copied().unwrap_or("last")
}

fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn difficulty_allowed(difficulty: Difficulty, filter: &[String]) -> bool {
    let key = match difficulty {
        Difficulty::Beginner => "beginner",
        Difficulty::Intermediate => "intermediate",
        Difficulty::Advanced => "advanced",
    };
    filter.iter().any(|f| f == key)
}

fn external_load_allowed(load: ExternalLoad, filter: &[String]) -> bool {
    let key = match load {
        ExternalLoad::Never => "never",
        ExternalLoad::Sometimes => "sometimes",
        ExternalLoad::Always => "always",
    };
    filter.iter().any(|f| f == key)
}

fn equipment_satisfied(required: &std::collections::HashSet<String>, available: &std::collections::HashSet<String>) -> bool {
    required.iter().all(|req| req.eq_ignore_ascii_case("none") || available.iter().any(|a| a.eq_ignore_ascii_case(req)))
}

fn categories_for_block_type(block_type: &str) -> &'static [Category] {
    match block_type {
        "strength" => &[Category::Strength, Category::Bodyweight],
        "bodyweight" => &[Category::Bodyweight],
        "mobility" => &[Category::Mobility, Category::Flexibility],
        "cardio" => &[Category::Cardio],
        _ => &[Category::Strength, Category::Bodyweight],
    }
}

struct FilterContext<'a> {
    focus_key: String,
    rules: &'a RulesDocument,
    experience: &'a ExperienceModifier,
    equipment: &'a std::collections::HashSet<String>,
    exclude_equipment: &'a [String],
}

fn filter_candidates<'a>(
    catalogue: &'a ExerciseCatalogue,
    allowed_categories: &[Category],
    already_chosen: &std::collections::HashSet<String>,
    ctx: &FilterContext,
) -> Vec<&'a Exercise> {
    let mapping = ctx.rules.split_muscle_group_mapping.get(&ctx.focus_key);
    catalogue
        .iter()
        .filter(|ex| allowed_categories.contains(&ex.category))
        .filter(|ex| !already_chosen.contains(&normalize_name(&ex.name)))
        .filter(|ex| difficulty_allowed(ex.difficulty, &ctx.experience.complexity_filter))
        .filter(|ex| external_load_allowed(ex.external_load, &ctx.experience.external_load_filter))
        .filter(|ex| equipment_satisfied(&ex.equipment, ctx.equipment))
        .filter(|ex| !ex.equipment.iter().any(|e| ctx.exclude_equipment.iter().any(|x| x.eq_ignore_ascii_case(e))))
        .filter(|ex| match mapping {
            None => true,
            Some(m) => {
                let included = m.include_muscle_groups.iter().any(|g| g == "all")
                    || ex.muscle_groups.iter().any(|g| m.include_muscle_groups.contains(g));
                let excluded = ex.muscle_groups.iter().any(|g| m.exclude_muscle_groups.contains(g));
                included && !excluded
            }
        })
        .collect()
}

/// Select the exercises for one day, in block order.
pub fn select_day_exercises(
    day_number: u8,
    focus: &str,
    blocks: &[BlockSpec],
    questionnaire: &Questionnaire,
    rules: &RulesDocument,
    catalogue: &ExerciseCatalogue,
    rng: &mut SeededRng,
) -> Result<Vec<StructuralExercise>> {
    let goal_key = questionnaire.goal.as_key();
    let experience_key = questionnaire.experience.as_key();
    let experience = rules.experience_modifier(experience_key)?;
    let equipment = questionnaire.equipment_access.tokens();
    let focus_key = super::day_structure::muscle_group_lookup_key(focus);

    let barbell_max = rules.equipment_quotas.barbell_max_per_day;
    let mut barbell_used = 0usize;
    let mut chosen_normalized: std::collections::HashSet<String> = std::collections::HashSet::new();
    let mut result = Vec::new();
    let mut compound_rotation = 0usize;
    let mut layer_index = 0usize;

    let max_per_day = rules.exercise_count_constraints.max_per_day;

    for block in blocks {
        if let Some(max) = max_per_day {
            if result.len() >= max {
                break;
            }
        }
        match block.block_type.as_str() {
            "compound" | "interval" => {
                let kind = if block.block_type == "interval" {
                    CompoundKind::Interval
                } else {
                    let kinds = CompoundKind::all();
                    let k = kinds[compound_rotation % kinds.len()];
                    compound_rotation += 1;
                    k
                };
                match build_compound(
                    kind,
                    day_number,
                    &focus_key,
                    rules,
                    catalogue,
                    experience,
                    &equipment,
                    &mut chosen_normalized,
                    rng,
                ) {
                    Ok(mut parent) => {
                        let layer = layer_for_index(layer_index);
                        layer_index += 1;
                        parent.intensity_profile =
                            assign_intensity_profile(layer, kind.as_key(), rules);
                        parent.progression_scheme =
                            progression_from_goal(goal_key, kind.as_key(), rules)?;
                        for sub in parent.sub_exercises.iter_mut() {
                            sub.progression_scheme = parent.progression_scheme;
                            sub.intensity_profile = parent.intensity_profile.clone();
                        }
                        result.push(parent);
                    }
                    Err(WorkoutGenError::InsufficientConstituents { kind, valid_found }) => {
                        tracing::warn!(day = day_number, kind = %kind, valid_found, "dropping compound block: insufficient constituents");
                    }
                    Err(other) => return Err(other),
                }
            }
            block_type => {
                let allowed = categories_for_block_type(block_type);
                for _ in 0..block.count {
                    if let Some(max) = max_per_day {
                        if result.len() >= max {
                            break;
                        }
                    }
                    let ctx = FilterContext {
                        focus_key: focus_key.clone(),
                        rules,
                        experience,
                        equipment: &equipment,
                        exclude_equipment: &[],
                    };
                    let mut candidates = filter_candidates(catalogue, allowed, &chosen_normalized, &ctx);
                    if let Some(max) = barbell_max {
                        if barbell_used >= max {
                            candidates.retain(|ex| !ex.equipment.iter().any(|e| e.eq_ignore_ascii_case("barbell")));
                        }
                    }
                    if candidates.is_empty() {
                        return Err(WorkoutGenError::ExhaustedPool {
                            focus: focus.to_string(),
                            block_type: block_type.to_string(),
                            pool_size: 0,
                            filters_applied: "category,difficulty,external_load,equipment,muscle_group,uniqueness".to_string(),
                        });
                    }
                    rng.shuffle(&mut candidates);
                    let chosen = candidates[0];
                    if chosen.equipment.iter().any(|e| e.eq_ignore_ascii_case("barbell")) {
                        barbell_used += 1;
                    }
                    chosen_normalized.insert(normalize_name(&chosen.name));
                    let layer = layer_for_index(layer_index);
                    layer_index += 1;
                    let category = category_key(chosen.category);
                    let profile = assign_intensity_profile(layer, category, rules);
                    let scheme = progression_from_goal(goal_key, category, rules)?;
                    result.push(StructuralExercise::leaf(chosen.name.clone(), scheme, profile));
                }
            }
        }
    }

    if let Some(min) = rules.exercise_count_constraints.min_per_day {
        if result.len() < min {
            return Err(WorkoutGenError::TooFewExercises {
                day: day_number,
                focus: focus.to_string(),
                found: result.len(),
                minimum: min,
            });
        }
    }

    Ok(result)
}

#[allow(clippy::too_many_arguments)]
fn build_compound(
    kind: CompoundKind,
    day_number: u8,
    focus_key: &str,
    rules: &RulesDocument,
    catalogue: &ExerciseCatalogue,
    experience: &ExperienceModifier,
    equipment: &std::collections::HashSet<String>,
    chosen_normalized: &mut std::collections::HashSet<String>,
    rng: &mut SeededRng,
) -> Result<StructuralExercise> {
    let construction = rules
        .compound_exercise_construction
        .get(kind.as_key())
        .ok_or_else(|| WorkoutGenError::Configuration(format!("compound_exercise_construction.{}", kind.as_key())))?;
    let wanted = construction.base_constituent_exercises.max(kind.base_constituent_count());

    let ctx = FilterContext {
        focus_key: focus_key.to_string(),
        rules,
        experience,
        equipment,
        exclude_equipment: &construction.exclude_equipment,
    };
    let allowed = [Category::Strength, Category::Mobility, Category::Flexibility, Category::Cardio];
    let mut candidates = filter_candidates(catalogue, &allowed, chosen_normalized, &ctx);
    rng.shuffle(&mut candidates);

    let mut seen_local: std::collections::HashSet<String> = std::collections::HashSet::new();
    let mut constituents = Vec::new();
    for ex in candidates {
        let norm = normalize_name(&ex.name);
        if seen_local.contains(&norm) {
            continue;
        }
        seen_local.insert(norm.clone());
        constituents.push(ex);
        if constituents.len() >= wanted {
            break;
        }
    }

    if constituents.len() < 2 {
        return Err(WorkoutGenError::InsufficientConstituents {
            kind: kind.as_key().to_string(),
            valid_found: constituents.len(),
        });
    }

    for ex in &constituents {
        chosen_normalized.insert(normalize_name(&ex.name));
    }

    let names: Vec<&str> = constituents.iter().map(|e| e.name.as_str()).collect();
    let synthesized_name = format!("{}: {}", kind.as_key().to_uppercase(), names.join(" + "));

    let sub_exercises: Vec<StructuralExercise> = constituents
        .iter()
        .map(|ex| {
            let category = category_key(ex.category);
            StructuralExercise::leaf(ex.name.clone(), crate::program::ProgressionScheme::Static, category)
        })
        .collect();

    let _ = day_number;

    Ok(StructuralExercise {
        exercise_name: synthesized_name,
        compound_category: Some(kind),
        progression_scheme: crate::program::ProgressionScheme::Static,
        intensity_profile: "moderate".to_string(),
        sub_exercises,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questionnaire::{EquipmentAccess, EquipmentProfile, Experience, Goal};
    use std::collections::HashSet;

    fn catalogue() -> ExerciseCatalogue {
        ExerciseCatalogue::load_from_str(
            r#"{
                "exercise_database": {
                    "categories": {
                        "strength": {
                            "exercises": {
                                "Barbell Squat": {"category": "strength", "muscle_groups": ["quads"], "equipment": [], "difficulty": "intermediate", "external_load": "always"},
                                "Bench Press": {"category": "strength", "muscle_groups": ["chest"], "equipment": [], "difficulty": "intermediate", "external_load": "always"},
                                "Dumbbell Row": {"category": "strength", "muscle_groups": ["back"], "equipment": [], "difficulty": "intermediate", "external_load": "always"}
                            }
                        }
                    }
                }
            }"#,
        )
        .unwrap()
    }

    fn rules_with_constraints(min_per_day: Option<usize>, max_per_day: Option<usize>) -> std::sync::Arc<RulesDocument> {
        let constraints = format!(
            r#"{{"min_per_day": {}, "max_per_day": {}}}"#,
            min_per_day.map(|n| n.to_string()).unwrap_or_else(|| "null".to_string()),
            max_per_day.map(|n| n.to_string()).unwrap_or_else(|| "null".to_string()),
        );
        let doc = format!(
            r#"{{
                "prescriptive_splits": {{"build_muscle": {{"3": ["Push", "Pull", "Legs"]}}}},
                "day_structure_by_equipment": {{"full_gym": {{"standard": {{"blocks": [{{"type": "strength", "count": 3}}]}}}}}},
                "compound_blocks_by_time": {{"45": 2}},
                "compound_exercise_construction": {{}},
                "intensity_profiles": {{"strength": {{"moderate": {{"sets": 3, "reps": 10, "rest_time_seconds": 60, "weight_percent_tm": 70}}}}}},
                "progression_schemes": {{"linear": {{"rules": {{}}}}}},
                "progression_by_goal": {{"build_muscle": "linear"}},
                "experience_modifiers": {{"intermediate": {{"weight_type": "percent_tm", "volume_multiplier": 1.0, "rest_time_multiplier": 1.0, "complexity_filter": ["beginner", "intermediate"], "external_load_filter": ["never", "sometimes", "always"]}}}},
                "intensity_profile_by_layer_and_category": {{}},
                "split_muscle_group_mapping": {{}},
                "exercise_count_constraints": {constraints}
            }}"#
        );
        RulesDocument::load_from_str(&doc).unwrap()
    }

    fn questionnaire() -> Questionnaire {
        Questionnaire {
            goal: Goal::BuildMuscle,
            experience: Experience::Intermediate,
            training_frequency: 3,
            session_duration: crate::questionnaire::SessionDuration::Medium,
            equipment_access: EquipmentAccess::Profile(EquipmentProfile::FullGym),
            program_duration: crate::questionnaire::ProgramDuration::FourWeeks,
            seed: Some(1),
        }
    }

    #[test]
    fn max_per_day_caps_the_selected_exercises() {
        let cat = catalogue();
        let rules = rules_with_constraints(None, Some(2));
        let blocks = vec![BlockSpec { block_type: "strength".to_string(), count: 3 }];
        let mut rng = SeededRng::new(1);
        let result = select_day_exercises(1, "Push", &blocks, &questionnaire(), &rules, &cat, &mut rng).unwrap();
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn min_per_day_below_minimum_is_an_error() {
        let cat = catalogue();
        let rules = rules_with_constraints(Some(5), None);
        let blocks = vec![BlockSpec { block_type: "strength".to_string(), count: 3 }];
        let mut rng = SeededRng::new(1);
        let err = select_day_exercises(1, "Push", &blocks, &questionnaire(), &rules, &cat, &mut rng).unwrap_err();
        assert!(matches!(err, WorkoutGenError::TooFewExercises { found: 3, minimum: 5, .. }));
    }

    #[test]
    fn normalize_name_strips_punctuation_and_case() {
        assert_eq!(normalize_name("Push-Up (Wide)"), "pushup wide");
        assert_eq!(normalize_name("push up wide"), "push up wide");
    }

    #[test]
    fn equipment_satisfied_treats_none_as_always_available() {
        let required: HashSet<String> = ["None"].iter().map(|s| s.to_string()).collect();
        let available: HashSet<String> = HashSet::new();
        assert!(equipment_satisfied(&required, &available));
    }

    #[test]
    fn equipment_satisfied_requires_subset() {
        let required: HashSet<String> = ["Barbell"].iter().map(|s| s.to_string()).collect();
        let available: HashSet<String> = ["Dumbbell"].iter().map(|s| s.to_string()).collect();
        assert!(!equipment_satisfied(&required, &available));
    }

    #[test]
    fn layer_index_overflow_falls_back_to_last() {
        assert_eq!(layer_for_index(0), "first");
        assert_eq!(layer_for_index(100), "last");
    }
}
