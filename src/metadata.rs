//! Metadata service: centralized, cached answers derived purely from
//! catalogue flags (spec §4.3, §5).

use crate::catalogue::{Exercise, ExternalLoad};
use std::collections::HashMap;
use std::sync::RwLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightVisibility {
    Always,
    Never,
    IfPresent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultWorkMode {
    WorkTime,
    Reps,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExerciseMetadata {
    pub assign_weight_on_generation: bool,
    pub show_weight_field: WeightVisibility,
    pub can_toggle_to_reps_mode: bool,
    pub default_work_mode: DefaultWorkMode,
}

fn derive(exercise: &Exercise) -> ExerciseMetadata {
    ExerciseMetadata {
        assign_weight_on_generation: exercise.external_load != ExternalLoad::Never,
        show_weight_field: match exercise.external_load {
            ExternalLoad::Always => WeightVisibility::Always,
            ExternalLoad::Never => WeightVisibility::Never,
            ExternalLoad::Sometimes => WeightVisibility::IfPresent,
        },
        can_toggle_to_reps_mode: !exercise.isometric,
        default_work_mode: if exercise.isometric {
            DefaultWorkMode::WorkTime
        } else {
            DefaultWorkMode::Reps
        },
    }
}

/// Process-wide, write-once-per-key cache. The catalogue is immutable after
/// load, so a read-biased lock is sufficient — warm it eagerly at startup to
/// avoid lock contention entirely (spec §5, §9).
pub struct MetadataService {
    cache: RwLock<HashMap<String, ExerciseMetadata>>,
}

impl MetadataService {
    pub fn new() -> Self {
        MetadataService { cache: RwLock::new(HashMap::new()) }
    }

    pub fn get_or_compute(&self, exercise: &Exercise) -> ExerciseMetadata {
        if let Some(meta) = self.cache.read().unwrap().get(&exercise.name) {
            return *meta;
        }
        let meta = derive(exercise);
        self.cache.write().unwrap().insert(exercise.name.clone(), meta);
        meta
    }

    /// Pre-populate the cache for every catalogue entry.
    pub fn warm(&self, catalogue: &crate::catalogue::ExerciseCatalogue) {
        let mut guard = self.cache.write().unwrap();
        for exercise in catalogue.iter() {
            guard.entry(exercise.name.clone()).or_insert_with(|| derive(exercise));
        }
    }

    #[cfg(test)]
    pub fn clear(&self) {
        self.cache.write().unwrap().clear();
    }
}

impl Default for MetadataService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::{Category, Difficulty};
    use std::collections::HashSet;

    fn exercise(external_load: ExternalLoad, isometric: bool) -> Exercise {
        Exercise {
            name: "Test Exercise".to_string(),
            category: Category::Strength,
            muscle_groups: HashSet::new(),
            equipment: HashSet::new(),
            difficulty: Difficulty::Beginner,
            external_load,
            isometric,
            typical_sets: None,
            typical_reps: None,
            variations: Vec::new(),
        }
    }

    #[test]
    fn never_loaded_hides_weight_and_defaults_to_reps() {
        let service = MetadataService::new();
        let meta = service.get_or_compute(&exercise(ExternalLoad::Never, false));
        assert!(!meta.assign_weight_on_generation);
        assert_eq!(meta.show_weight_field, WeightVisibility::Never);
        assert_eq!(meta.default_work_mode, DefaultWorkMode::Reps);
    }

    #[test]
    fn isometric_defaults_to_work_time_and_cannot_toggle() {
        let service = MetadataService::new();
        let meta = service.get_or_compute(&exercise(ExternalLoad::Sometimes, true));
        assert!(!meta.can_toggle_to_reps_mode);
        assert_eq!(meta.default_work_mode, DefaultWorkMode::WorkTime);
        assert_eq!(meta.show_weight_field, WeightVisibility::IfPresent);
    }

    #[test]
    fn result_is_cached_across_calls() {
        let service = MetadataService::new();
        let ex = exercise(ExternalLoad::Always, false);
        let first = service.get_or_compute(&ex);
        let second = service.get_or_compute(&ex);
        assert_eq!(first, second);
    }
}
