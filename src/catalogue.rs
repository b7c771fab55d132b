//! Static exercise catalogue (spec §4.2, §6).

use crate::error::{Result, WorkoutGenError};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Strength,
    Bodyweight,
    Mobility,
    Flexibility,
    Cardio,
    Lifestyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExternalLoad {
    Never,
    Sometimes,
    Always,
}

/// An immutable catalogue entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exercise {
    pub name: String,
    pub category: Category,
    #[serde(default)]
    pub muscle_groups: HashSet<String>,
    #[serde(default)]
    pub equipment: HashSet<String>,
    pub difficulty: Difficulty,
    pub external_load: ExternalLoad,
    #[serde(default)]
    pub isometric: bool,
    #[serde(default)]
    pub typical_sets: Option<i32>,
    #[serde(default)]
    pub typical_reps: Option<String>,
    #[serde(default)]
    pub variations: Vec<String>,
}

/// JSON wire shape: `exercise_database.categories.<cat>.exercises.<name>`.
#[derive(Debug, Deserialize)]
struct CatalogueFile {
    exercise_database: ExerciseDatabase,
}

#[derive(Debug, Deserialize)]
struct ExerciseDatabase {
    categories: HashMap<String, CategoryBlock>,
}

#[derive(Debug, Deserialize)]
struct CategoryBlock {
    exercises: HashMap<String, ExerciseRecord>,
}

#[derive(Debug, Deserialize)]
struct ExerciseRecord {
    category: Category,
    #[serde(default)]
    muscle_groups: HashSet<String>,
    #[serde(default)]
    equipment: HashSet<String>,
    difficulty: Difficulty,
    external_load: ExternalLoad,
    #[serde(default)]
    isometric: bool,
    #[serde(default)]
    typical_sets: Option<i32>,
    #[serde(default)]
    typical_reps: Option<String>,
    #[serde(default)]
    variations: Vec<String>,
}

/// Read-only after load; name → record lookup plus flat iteration.
#[derive(Debug, Clone)]
pub struct ExerciseCatalogue {
    exercises: HashMap<String, Exercise>,
}

/// The rules-document lookup key for a catalogue category.
pub fn category_key(category: Category) -> &'static str {
    match category {
        Category::Strength => "strength",
        Category::Bodyweight => "bodyweight",
        Category::Mobility => "mobility",
        Category::Flexibility => "flexibility",
        Category::Cardio => "cardio",
        Category::Lifestyle => "lifestyle",
    }
}

impl ExerciseCatalogue {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::load_from_str(&raw)
    }

    pub fn load_from_str(raw: &str) -> Result<Self> {
        let file: CatalogueFile = serde_json::from_str(raw)?;
        let mut exercises = HashMap::new();
        for (_cat_key, block) in file.exercise_database.categories {
            for (name, record) in block.exercises {
                exercises.insert(
                    name.clone(),
                    Exercise {
                        name,
                        category: record.category,
                        muscle_groups: record.muscle_groups,
                        equipment: record.equipment,
                        difficulty: record.difficulty,
                        external_load: record.external_load,
                        isometric: record.isometric,
                        typical_sets: record.typical_sets,
                        typical_reps: record.typical_reps,
                        variations: record.variations,
                    },
                );
            }
        }
        if exercises.is_empty() {
            return Err(WorkoutGenError::Configuration(
                "exercise_database.categories: no exercises found".to_string(),
            ));
        }
        Ok(ExerciseCatalogue { exercises })
    }

    pub fn get(&self, name: &str) -> Option<&Exercise> {
        self.exercises.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.exercises.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Exercise> {
        self.exercises.values()
    }

    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }
}
