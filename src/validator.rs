//! Structural validation of an assembled program (spec §4.9). No business
//! semantics — just shape and reference checks, with dotted location paths.

use crate::catalogue::ExerciseCatalogue;
use crate::program::{ParameterizedExercise, ParameterizedProgram};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueLevel {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub level: IssueLevel,
    pub path: String,
    pub message: String,
}

impl ValidationIssue {
    fn error(path: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationIssue { level: IssueLevel::Error, path: path.into(), message: message.into() }
    }

    fn warning(path: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationIssue { level: IssueLevel::Warning, path: path.into(), message: message.into() }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

/// Run every structural check against `program`, recursing through days,
/// exercises, and weeks.
pub fn validate(program: &ParameterizedProgram, catalogue: &ExerciseCatalogue) -> ValidationReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if program.name.trim().is_empty() {
        errors.push(ValidationIssue::error("name", "program name is empty"));
    }
    if program.version.trim().is_empty() {
        errors.push(ValidationIssue::error("version", "program version is empty"));
    }
    if program.weeks < 1 {
        errors.push(ValidationIssue::error("weeks", "program must have at least 1 week"));
    }
    if !(1..=7).contains(&program.days_per_week) {
        errors.push(ValidationIssue::error("days_per_week", "must be between 1 and 7"));
    }
    if program.metadata.equipment.is_empty() {
        errors.push(ValidationIssue::error("metadata.equipment", "equipment list is empty"));
    }

    let mut day_numbers: Vec<&u8> = program.days.keys().collect();
    day_numbers.sort();
    for day_number in day_numbers {
        let day = &program.days[day_number];
        let day_path = format!("days.{}", day_number);

        if day.day_number < 1 {
            errors.push(ValidationIssue::error(format!("{}.day_number", day_path), "day_number must be >= 1"));
        }
        if day.focus.trim().is_empty() {
            errors.push(ValidationIssue::error(format!("{}.focus", day_path), "focus is empty"));
        }
        if day.day_type.trim().is_empty() {
            errors.push(ValidationIssue::error(format!("{}.day_type", day_path), "day_type is empty"));
        }
        if day.exercises.is_empty() {
            warnings.push(ValidationIssue::warning(format!("{}.exercises", day_path), "day has no exercises"));
        }

        for (idx, exercise) in day.exercises.iter().enumerate() {
            validate_exercise(exercise, &format!("{}.exercises.{}", day_path, idx), catalogue, &mut errors, &mut warnings);
        }
    }

    ValidationReport { valid: errors.is_empty(), errors, warnings }
}

fn validate_exercise(
    exercise: &ParameterizedExercise,
    path: &str,
    catalogue: &ExerciseCatalogue,
    errors: &mut Vec<ValidationIssue>,
    warnings: &mut Vec<ValidationIssue>,
) {
    if exercise.name.trim().is_empty() {
        errors.push(ValidationIssue::error(format!("{}.name", path), "exercise name is empty"));
    }

    let is_compound_parent = !exercise.sub_exercises.is_empty();

    if is_compound_parent {
        if exercise.category.is_none() {
            errors.push(ValidationIssue::error(
                format!("{}.category", path),
                "compound parent is missing its category (emom/amrap/circuit/interval)",
            ));
        }
    } else if !catalogue.contains(&exercise.name) {
        errors.push(ValidationIssue::error(
            format!("{}.name", path),
            format!("'{}' is not in the catalogue", exercise.name),
        ));
    }

    for (week_idx, week) in exercise.weeks.iter().enumerate() {
        let week_path = format!("{}.weeks.{}", path, week_idx);

        if week.set_blocks.is_some() && (week.sets.is_some() || week.reps.is_some()) {
            errors.push(ValidationIssue::error(
                &week_path,
                "set_blocks and flat sets/reps are mutually exclusive",
            ));
        }

        if !is_compound_parent && week.reps.is_none() && week.work_time.is_none() && week.set_blocks.is_none() {
            errors.push(ValidationIssue::error(
                &week_path,
                "leaf exercise must carry one of reps, work_time, or set_blocks",
            ));
        }
    }

    for (idx, sub) in exercise.sub_exercises.iter().enumerate() {
        validate_exercise(sub, &format!("{}.sub_exercises.{}", path, idx), catalogue, errors, warnings);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::{ProgramMetadata, Reps, WeekParams};
    use std::collections::BTreeMap;

    fn catalogue() -> ExerciseCatalogue {
        ExerciseCatalogue::load_from_str(
            r#"{"exercise_database":{"categories":{"strength":{"exercises":{"Barbell Squat":{
                "category":"strength","difficulty":"intermediate","external_load":"always"
            }}}}}}"#,
        )
        .unwrap()
    }

    fn base_program(exercises: Vec<ParameterizedExercise>) -> ParameterizedProgram {
        let mut days = BTreeMap::new();
        days.insert(
            1,
            crate::program::ParameterizedDay {
                day_number: 1,
                day_type: "standard".to_string(),
                focus: "Push".to_string(),
                exercises,
            },
        );
        ParameterizedProgram {
            id: "p1".to_string(),
            name: "Test Program".to_string(),
            description: String::new(),
            version: "1.0".to_string(),
            weeks: 4,
            days_per_week: 3,
            metadata: ProgramMetadata { equipment: vec!["barbell".to_string()], ..Default::default() },
            days,
        }
    }

    fn week_with_reps() -> WeekParams {
        let mut w = WeekParams::empty();
        w.reps = Some(Reps::Count(8));
        w
    }

    #[test]
    fn valid_program_has_no_errors() {
        let exercise = ParameterizedExercise {
            name: "Barbell Squat".to_string(),
            category: None,
            weeks: vec![week_with_reps(); 4],
            sub_exercises: Vec::new(),
        };
        let report = validate(&base_program(vec![exercise]), &catalogue());
        assert!(report.valid);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn unknown_leaf_exercise_is_an_error() {
        let exercise = ParameterizedExercise {
            name: "Unknown Exercise".to_string(),
            category: None,
            weeks: vec![week_with_reps(); 4],
            sub_exercises: Vec::new(),
        };
        let report = validate(&base_program(vec![exercise]), &catalogue());
        assert!(!report.valid);
        assert!(report.errors.iter().any(|e| e.path.ends_with(".name")));
    }

    #[test]
    fn compound_parent_without_category_is_an_error() {
        let sub = ParameterizedExercise {
            name: "Barbell Squat".to_string(),
            category: None,
            weeks: vec![week_with_reps(); 4],
            sub_exercises: Vec::new(),
        };
        let parent = ParameterizedExercise {
            name: "EMOM: Barbell Squat".to_string(),
            category: None,
            weeks: vec![WeekParams::empty(); 4],
            sub_exercises: vec![sub],
        };
        let report = validate(&base_program(vec![parent]), &catalogue());
        assert!(!report.valid);
        assert!(report.errors.iter().any(|e| e.path.ends_with(".category")));
    }

    #[test]
    fn set_blocks_and_flat_sets_are_mutually_exclusive() {
        let mut week = week_with_reps();
        week.sets = Some(3);
        week.set_blocks = Some(vec![crate::program::SetBlock { reps: Reps::Count(8), weight: None }]);
        let exercise = ParameterizedExercise {
            name: "Barbell Squat".to_string(),
            category: None,
            weeks: vec![week],
            sub_exercises: Vec::new(),
        };
        let report = validate(&base_program(vec![exercise]), &catalogue());
        assert!(!report.valid);
    }

    #[test]
    fn empty_day_produces_a_warning_not_an_error() {
        let report = validate(&base_program(vec![]), &catalogue());
        assert!(report.valid);
        assert_eq!(report.warnings.len(), 1);
    }
}
