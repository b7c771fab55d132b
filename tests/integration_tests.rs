//! End-to-end coverage of the generator pipeline against a realistic rules
//! document and catalogue fixture.

use std::collections::HashSet;
use workout_gen::generator::{FixedClock, Generator};
use workout_gen::metadata::MetadataService;
use workout_gen::program::{Reps, WeightPrescription};
use workout_gen::questionnaire::{EquipmentAccess, EquipmentProfile, Experience, Goal, ProgramDuration, Questionnaire, SessionDuration};
use workout_gen::{validate, ExerciseCatalogue, RulesDocument};

fn catalogue() -> ExerciseCatalogue {
    ExerciseCatalogue::load_from_str(
        r#"{
            "exercise_database": {
                "categories": {
                    "strength": {
                        "exercises": {
                            "Barbell Squat": {"category": "strength", "muscle_groups": ["quads", "glutes"], "equipment": ["Barbell", "Rack"], "difficulty": "intermediate", "external_load": "always"},
                            "Barbell Bench Press": {"category": "strength", "muscle_groups": ["chest", "triceps"], "equipment": ["Barbell", "Bench"], "difficulty": "intermediate", "external_load": "always"},
                            "Dumbbell Row": {"category": "strength", "muscle_groups": ["back"], "equipment": ["Dumbbell"], "difficulty": "beginner", "external_load": "always"},
                            "Dumbbell Shoulder Press": {"category": "strength", "muscle_groups": ["shoulders"], "equipment": ["Dumbbell", "Bench"], "difficulty": "beginner", "external_load": "always"},
                            "Goblet Squat": {"category": "strength", "muscle_groups": ["quads"], "equipment": ["Dumbbell"], "difficulty": "beginner", "external_load": "always"},
                            "Deadlift": {"category": "strength", "muscle_groups": ["back", "glutes"], "equipment": ["Barbell"], "difficulty": "advanced", "external_load": "always"}
                        }
                    },
                    "bodyweight": {
                        "exercises": {
                            "Push-up": {"category": "bodyweight", "muscle_groups": ["chest", "triceps"], "equipment": [], "difficulty": "beginner", "external_load": "never"},
                            "Incline Push-up": {"category": "bodyweight", "muscle_groups": ["chest", "shoulders"], "equipment": [], "difficulty": "beginner", "external_load": "never"},
                            "Pull-up": {"category": "bodyweight", "muscle_groups": ["back"], "equipment": ["Pull-up Bar"], "difficulty": "intermediate", "external_load": "never"},
                            "Superman": {"category": "bodyweight", "muscle_groups": ["back"], "equipment": [], "difficulty": "beginner", "external_load": "never"},
                            "Bird Dog": {"category": "bodyweight", "muscle_groups": ["back", "core"], "equipment": [], "difficulty": "beginner", "external_load": "never"},
                            "Bodyweight Squat": {"category": "bodyweight", "muscle_groups": ["quads", "glutes"], "equipment": [], "difficulty": "beginner", "external_load": "never"},
                            "Lunge": {"category": "bodyweight", "muscle_groups": ["quads", "glutes"], "equipment": [], "difficulty": "beginner", "external_load": "never"}
                        }
                    },
                    "mobility": {
                        "exercises": {
                            "Plank": {"category": "mobility", "muscle_groups": ["core"], "equipment": ["Mat"], "difficulty": "beginner", "external_load": "never", "isometric": true},
                            "Cat-Cow Stretch": {"category": "mobility", "muscle_groups": ["spine"], "equipment": ["Mat"], "difficulty": "beginner", "external_load": "never", "isometric": true},
                            "Hip Flexor Stretch": {"category": "mobility", "muscle_groups": ["hips"], "equipment": ["Mat"], "difficulty": "beginner", "external_load": "never", "isometric": true}
                        }
                    },
                    "cardio": {
                        "exercises": {
                            "Jumping Jacks": {"category": "cardio", "muscle_groups": ["full_body"], "equipment": [], "difficulty": "beginner", "external_load": "never"},
                            "Mountain Climbers": {"category": "cardio", "muscle_groups": ["core"], "equipment": [], "difficulty": "beginner", "external_load": "never"},
                            "Burpees": {"category": "cardio", "muscle_groups": ["full_body"], "equipment": [], "difficulty": "intermediate", "external_load": "never"}
                        }
                    }
                }
            }
        }"#,
    )
    .unwrap()
}

fn rules() -> std::sync::Arc<RulesDocument> {
    RulesDocument::load_from_str(
        r#"{
            "prescriptive_splits": {
                "tone": {"3": ["Push", "Pull", "Legs"]},
                "build_muscle": {"3": ["Push", "Pull", "Legs"], "4": ["Push", "Pull", "Legs", "Upper"]},
                "lose_weight": {"4": ["Upper-HIIT", "Lower-HIIT", "Push", "Pull"]}
            },
            "day_structure_by_equipment": {
                "full_gym": {
                    "standard": {"blocks": [{"type": "strength", "count": 2}, {"type": "bodyweight", "count": 1}]},
                    "hiit": {"blocks": [{"type": "interval", "count": 1}, {"type": "bodyweight", "count": 1}]}
                },
                "dumbbells_only": {
                    "standard": {"blocks": [{"type": "strength", "count": 2}, {"type": "bodyweight", "count": 1}]}
                }
            },
            "compound_blocks_by_time": {"30": 1, "45": 2, "60": 2},
            "compound_exercise_construction": {
                "emom": {"base_constituent_exercises": 2, "exclude_equipment": []},
                "amrap": {"base_constituent_exercises": 3, "exclude_equipment": []},
                "circuit": {"base_constituent_exercises": 4, "exclude_equipment": []},
                "interval": {"base_constituent_exercises": 2, "exclude_equipment": ["Barbell"]}
            },
            "intensity_profiles": {
                "strength": {
                    "heavy": {"sets": 4, "reps": 6, "rest_time_seconds": 90, "weight_percent_tm": 80, "weight_descriptor": "heavy"},
                    "moderate": {"sets": 3, "reps": 10, "rest_time_seconds": 60, "weight_percent_tm": 70, "weight_descriptor": "moderate"}
                },
                "bodyweight": {
                    "moderate": {"sets": 3, "reps": 12, "rest_time_seconds": 45}
                },
                "mobility": {
                    "moderate": {"reps": "AMRAP", "work_time_seconds": 30}
                },
                "cardio": {
                    "moderate": {"work_time_seconds": 30, "rest_time_seconds": 15}
                },
                "interval": {
                    "moderate": {"sub_work_mode": "time", "sub_work_time_seconds": 40, "sub_rest_time_seconds": 20, "block_time_minutes": 10}
                },
                "emom": {
                    "moderate": {"block_time_minutes": 10}
                },
                "amrap": {
                    "moderate": {"block_time_minutes": 12}
                },
                "circuit": {
                    "moderate": {"block_time_minutes": 15}
                }
            },
            "progression_schemes": {
                "linear": {"rules": {"reps_delta_per_week": 1, "reps_minimum": 6, "weight_percent_delta_per_week": 1, "rest_time_delta_per_week_seconds": 5, "rest_time_minimum_seconds": 30}},
                "volume": {"rules": {"sets_increase_every_n_weeks": 4, "sets_maximum": 5, "reps_increase_percent_total": 20}},
                "static": {"rules": {}}
            },
            "progression_by_goal": {"tone": "static", "build_muscle": "linear", "lose_weight": "volume"},
            "experience_modifiers": {
                "beginner": {"weight_type": "descriptor", "volume_multiplier": 1.0, "rest_time_multiplier": 1.0, "complexity_filter": ["beginner"], "external_load_filter": ["never", "sometimes", "always"]},
                "intermediate": {"weight_type": "percent_tm", "volume_multiplier": 1.0, "rest_time_multiplier": 1.0, "complexity_filter": ["beginner", "intermediate"], "external_load_filter": ["never", "sometimes", "always"]},
                "complete_beginner": {"weight_type": "descriptor", "volume_multiplier": 0.8, "rest_time_multiplier": 1.2, "complexity_filter": ["beginner"], "external_load_filter": ["never", "sometimes", "always"]}
            },
            "intensity_profile_by_layer_and_category": {},
            "split_muscle_group_mapping": {
                "Push": {"include_muscle_groups": ["chest", "triceps", "shoulders", "full_body"]},
                "Pull": {"include_muscle_groups": ["back", "core", "full_body"]},
                "Legs": {"include_muscle_groups": ["quads", "glutes", "full_body"]},
                "Upper": {"include_muscle_groups": ["chest", "triceps", "shoulders", "back", "core", "full_body"]}
            },
            "equipment_quotas": {"barbell_max_per_day": 1}
        }"#,
    )
    .unwrap()
}

fn questionnaire(goal: Goal, experience: Experience, frequency: u8, duration: SessionDuration, equipment: EquipmentProfile, weeks: ProgramDuration, seed: u32) -> Questionnaire {
    Questionnaire {
        goal,
        experience,
        training_frequency: frequency,
        session_duration: duration,
        equipment_access: EquipmentAccess::Profile(equipment),
        program_duration: weeks,
        seed: Some(seed),
    }
}

#[test]
fn s1_tone_dumbbells_three_days_produces_valid_program_with_descriptor_weights() {
    let cat = catalogue();
    let rules = rules();
    let metadata = MetadataService::new();
    let generator = Generator::new(&rules, &cat, &metadata);
    let clock = FixedClock(1_700_000_000_000);

    let q = questionnaire(Goal::Tone, Experience::Beginner, 3, SessionDuration::Short, EquipmentProfile::DumbbellsOnly, ProgramDuration::ThreeWeeks, 42);
    let program = generator.generate(&q, &clock).unwrap();

    assert_eq!(program.weeks, 3);
    assert_eq!(program.days_per_week, 3);
    assert_eq!(program.days.len(), 3);

    let allowed_equipment: HashSet<&str> = ["Dumbbell", "Bench", "Chair", "Mat"].into_iter().collect();
    for day in program.days.values() {
        assert!(!day.exercises.is_empty());
        for exercise in &day.exercises {
            if let Some(ex) = cat.get(&exercise.name) {
                assert!(
                    ex.equipment.is_empty() || ex.equipment.iter().all(|e| allowed_equipment.contains(e.as_str())),
                    "exercise {} uses disallowed equipment",
                    exercise.name
                );
            }
            for week in &exercise.weeks {
                if let Some(WeightPrescription::PercentTrainingMax { .. }) = &week.weight {
                    panic!("beginner weight should be a qualitative descriptor, found percent_training_max");
                }
            }
        }
    }

    let report = validate(&program, &cat);
    assert!(report.valid, "expected valid program, got errors: {:?}", report.errors);
}

#[test]
fn determinism_same_seed_produces_byte_identical_program() {
    let cat = catalogue();
    let rules = rules();
    let metadata = MetadataService::new();
    let generator = Generator::new(&rules, &cat, &metadata);
    let clock = FixedClock(42);

    let q = questionnaire(Goal::BuildMuscle, Experience::Intermediate, 3, SessionDuration::Medium, EquipmentProfile::FullGym, ProgramDuration::FourWeeks, 12345);
    let a = serde_json::to_string(&generator.generate(&q, &clock).unwrap()).unwrap();
    let b = serde_json::to_string(&generator.generate(&q, &clock).unwrap()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn generate_then_validate_is_always_valid_for_every_frequency_boundary() {
    let cat = catalogue();
    let rules = rules();
    let metadata = MetadataService::new();
    let generator = Generator::new(&rules, &cat, &metadata);
    let clock = FixedClock(1);

    for frequency in [3u8, 4] {
        let q = questionnaire(Goal::BuildMuscle, Experience::Intermediate, frequency, SessionDuration::Medium, EquipmentProfile::FullGym, ProgramDuration::FourWeeks, 7);
        let program = generator.generate(&q, &clock).unwrap();
        assert_eq!(program.days.len(), frequency as usize);
        let report = validate(&program, &cat);
        assert!(report.valid, "frequency {} produced invalid program: {:?}", frequency, report.errors);
    }
}

#[test]
fn every_exercise_has_a_week_entry_for_every_program_week() {
    let cat = catalogue();
    let rules = rules();
    let metadata = MetadataService::new();
    let generator = Generator::new(&rules, &cat, &metadata);
    let clock = FixedClock(1);

    let q = questionnaire(Goal::BuildMuscle, Experience::Intermediate, 4, SessionDuration::Long, EquipmentProfile::FullGym, ProgramDuration::SixWeeks, 9);
    let program = generator.generate(&q, &clock).unwrap();

    for day in program.days.values() {
        for exercise in &day.exercises {
            assert_eq!(exercise.weeks.len(), 6);
            for sub in &exercise.sub_exercises {
                assert_eq!(sub.weeks.len(), 6);
            }
        }
    }
}

#[test]
fn never_external_load_exercise_never_carries_a_weight_field() {
    let cat = catalogue();
    let rules = rules();
    let metadata = MetadataService::new();
    let generator = Generator::new(&rules, &cat, &metadata);
    let clock = FixedClock(1);

    let q = questionnaire(Goal::Tone, Experience::Beginner, 3, SessionDuration::Short, EquipmentProfile::DumbbellsOnly, ProgramDuration::ThreeWeeks, 5);
    let program = generator.generate(&q, &clock).unwrap();

    for day in program.days.values() {
        for exercise in &day.exercises {
            if let Some(ex) = cat.get(&exercise.name) {
                if ex.external_load == workout_gen::catalogue::ExternalLoad::Never {
                    for week in &exercise.weeks {
                        assert!(week.weight.is_none(), "{} should never carry a weight field", exercise.name);
                    }
                }
            }
        }
    }
}

#[test]
fn lose_weight_interval_day_exists_and_runs_cleanly() {
    let cat = catalogue();
    let rules = rules();
    let metadata = MetadataService::new();
    let generator = Generator::new(&rules, &cat, &metadata);
    let clock = FixedClock(1);

    let q = questionnaire(Goal::LoseWeight, Experience::Intermediate, 4, SessionDuration::Short, EquipmentProfile::FullGym, ProgramDuration::ThreeWeeks, 7);
    let program = generator.generate(&q, &clock).unwrap();
    let report = validate(&program, &cat);
    assert!(report.valid, "expected valid program, got errors: {:?}", report.errors);

    let has_interval_compound = program
        .days
        .values()
        .flat_map(|d| d.exercises.iter())
        .any(|e| !e.sub_exercises.is_empty());
    assert!(has_interval_compound, "expected at least one compound block across the interval-focused days");
}

#[test]
fn reps_never_vanish_into_empty_count() {
    let cat = catalogue();
    let rules = rules();
    let metadata = MetadataService::new();
    let generator = Generator::new(&rules, &cat, &metadata);
    let clock = FixedClock(1);

    let q = questionnaire(Goal::BuildMuscle, Experience::Intermediate, 3, SessionDuration::Medium, EquipmentProfile::FullGym, ProgramDuration::FourWeeks, 3);
    let program = generator.generate(&q, &clock).unwrap();

    for day in program.days.values() {
        for exercise in &day.exercises {
            for week in &exercise.weeks {
                if let Some(Reps::Count(n)) = &week.reps {
                    assert!(*n > 0, "reps count should never drop to zero or below");
                }
            }
        }
    }
}
