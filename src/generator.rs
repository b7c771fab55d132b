//! Top-level orchestration (spec §4.8): wires the rules document, catalogue,
//! Phase 1 selector, and Phase 2 parameterizer into one `generate` call.

use crate::catalogue::ExerciseCatalogue;
use crate::error::Result;
use crate::metadata::MetadataService;
use crate::phase1::{build_day_structure, get_prescriptive_split, parse_focus};
use crate::phase1::selector::select_day_exercises;
use crate::phase2::parameterize_exercise;
use crate::program::{ParameterizedDay, ParameterizedProgram, ProgramMetadata};
use crate::questionnaire::{EquipmentProfile, Questionnaire};
use crate::rng::SeededRng;
use crate::rules::RulesDocument;
use std::collections::BTreeMap;

/// Injected clock, so the only non-deterministic input to the program `id`
/// is swappable in tests.
pub trait Clock {
    fn now_millis(&self) -> i64;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.0
    }
}

/// The day's location type (spec §3's structural day `type` field), derived
/// from equipment profile; a `Flexibility`-focused day is always `recovery`
/// regardless of equipment.
fn day_type_for(equipment_profile: EquipmentProfile, focus: &str) -> &'static str {
    let (base, _) = parse_focus(focus);
    if base == "Flexibility" {
        return "recovery";
    }
    match equipment_profile {
        EquipmentProfile::FullGym => "gym",
        EquipmentProfile::BodyweightOnly => "outdoor",
        EquipmentProfile::DumbbellsOnly => "home",
    }
}

pub struct Generator<'a> {
    pub rules: &'a RulesDocument,
    pub catalogue: &'a ExerciseCatalogue,
    pub metadata: &'a MetadataService,
}

impl<'a> Generator<'a> {
    pub fn new(rules: &'a RulesDocument, catalogue: &'a ExerciseCatalogue, metadata: &'a MetadataService) -> Self {
        Generator { rules, catalogue, metadata }
    }

    #[tracing::instrument(skip(self, questionnaire, clock), fields(goal = questionnaire.goal.as_key(), experience = questionnaire.experience.as_key()))]
    pub fn generate(&self, questionnaire: &Questionnaire, clock: &dyn Clock) -> Result<ParameterizedProgram> {
        let total_weeks = questionnaire.program_duration.weeks();
        let goal_key = questionnaire.goal.as_key();
        let experience_key = questionnaire.experience.as_key();
        let experience = self.rules.experience_modifier(experience_key)?;
        let equipment_profile = questionnaire.equipment_access.profile();
        let duration_minutes = questionnaire.duration_minutes();

        let focuses = get_prescriptive_split(self.rules, goal_key, questionnaire.training_frequency)?.clone();

        let (mut rng, used_seed) = match questionnaire.seed {
            Some(seed) => (SeededRng::new(seed), seed),
            None => SeededRng::from_system_entropy(),
        };

        let structural_days = {
            let _span = tracing::info_span!("phase", phase = "structure").entered();
            let mut days = Vec::with_capacity(focuses.len());
            for (idx, focus) in focuses.iter().enumerate() {
                let day_number = (idx + 1) as u8;
                let blocks = build_day_structure(focus, equipment_profile.as_key(), duration_minutes, self.rules)?;
                let exercises = select_day_exercises(
                    day_number,
                    focus,
                    &blocks,
                    questionnaire,
                    self.rules,
                    self.catalogue,
                    &mut rng,
                )?;
                days.push((day_number, day_type_for(equipment_profile, focus), focus.clone(), exercises));
            }
            days
        };

        let mut parameterized_days: BTreeMap<u8, ParameterizedDay> = BTreeMap::new();
        {
            let _span = tracing::info_span!("phase", phase = "parameterize").entered();
            for (day_number, day_type, focus, exercises) in structural_days {
                let mut parameterized_exercises = Vec::with_capacity(exercises.len());
                for structural in &exercises {
                    parameterized_exercises.push(parameterize_exercise(
                        structural,
                        self.catalogue,
                        self.metadata,
                        self.rules,
                        experience,
                        total_weeks,
                        day_number,
                    )?);
                }
                parameterized_days.insert(
                    day_number,
                    ParameterizedDay {
                        day_number,
                        day_type: day_type.to_string(),
                        focus,
                        exercises: parameterized_exercises,
                    },
                );
            }
        }

        let equipment_tokens: Vec<String> = {
            let mut tokens: Vec<String> = questionnaire.equipment_access.tokens().into_iter().collect();
            tokens.sort();
            tokens
        };

        let id = format!(
            "workout_{}_{}_{}",
            &goal_key[..goal_key.len().min(4)],
            &experience_key[..experience_key.len().min(3)],
            clock.now_millis()
        );

        tracing::info!(seed = used_seed, days = parameterized_days.len(), "program generated");

        Ok(ParameterizedProgram {
            id,
            name: format!("{} Program ({})", title_case(goal_key), title_case(experience_key)),
            description: format!(
                "A {}-week {} program for {} lifters, {} days per week.",
                total_weeks,
                title_case(goal_key),
                experience_key.replace('_', " "),
                questionnaire.training_frequency
            ),
            version: "1.0".to_string(),
            weeks: total_weeks,
            days_per_week: questionnaire.training_frequency,
            metadata: ProgramMetadata {
                difficulty: experience_key.to_string(),
                equipment: equipment_tokens,
                estimated_duration_minutes: duration_minutes,
                tags: vec![
                    goal_key.to_string(),
                    experience_key.to_string(),
                    format!("{}x_per_week", questionnaire.training_frequency),
                    equipment_profile.as_key().to_string(),
                ],
            },
            days: parameterized_days,
        })
    }
}

fn title_case(key: &str) -> String {
    key.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
