//! Phase 1: structural generation — day shape and exercise selection
//! (spec §4.5, §4.6).

pub mod day_structure;
pub mod selector;

pub use day_structure::{
    assign_intensity_profile, build_day_structure, get_prescriptive_split, parse_focus,
    progression_from_goal, scheme_from_key, DayType,
};
pub use selector::select_day_exercises;
