//! Week-to-week progression transforms (spec §4.7).
//!
//! All arithmetic happens on `Decimal` so that two runs with the same seed
//! produce byte-identical weeks — floating point would drift depending on
//! operation order.

use crate::program::{Reps, TimeUnit, TimeValue, WeekParams, WeightPrescription};
use crate::rules::ProgressionRules;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

fn round_reps(value: Decimal, fallback: i32) -> i32 {
    value.round().to_i32().unwrap_or(fallback)
}

/// Apply a per-unit-aware delta to a time value, clamping at a minimum.
fn step_time(base: &TimeValue, delta_seconds: Option<Decimal>, delta_minutes: Option<Decimal>, min_seconds: Option<Decimal>, min_minutes: Option<Decimal>, steps: i64) -> TimeValue {
    let steps = Decimal::from(steps);
    match base.unit {
        TimeUnit::Seconds => {
            let delta = delta_seconds.unwrap_or(Decimal::ZERO);
            let mut v = base.value + delta * steps;
            if let Some(min) = min_seconds {
                if v < min {
                    v = min;
                }
            }
            TimeValue::seconds(v).rounded()
        }
        TimeUnit::Minutes => {
            let delta = delta_minutes.unwrap_or(Decimal::ZERO);
            let mut v = base.value + delta * steps;
            if let Some(min) = min_minutes {
                if v < min {
                    v = min;
                }
            }
            TimeValue::minutes(v).rounded()
        }
    }
}

fn step_rest(base: &TimeValue, rules: &ProgressionRules, steps: i64) -> TimeValue {
    step_time(
        base,
        rules.rest_time_delta_per_week_seconds.map(|d| -d),
        rules.rest_time_delta_per_week_minutes.map(|d| -d),
        rules.rest_time_minimum_seconds,
        rules.rest_time_minimum_minutes,
        steps,
    )
}

/// Linear progression (spec §4.7): reps decrease toward a floor, weight
/// percentage climbs, rest shrinks. Non-numeric reps pass through unchanged.
pub fn linear(week1: &WeekParams, rules: &ProgressionRules, week_index: u32) -> WeekParams {
    let steps = (week_index.saturating_sub(1)) as i64;
    let mut week = week1.clone();

    if let Some(Reps::Count(n)) = &week1.reps {
        let delta = rules.reps_delta_per_week.unwrap_or(Decimal::ONE);
        let min = rules.reps_minimum.unwrap_or(Decimal::ZERO);
        let mut value = Decimal::from(*n) - delta * Decimal::from(steps);
        if value < min {
            value = min;
        }
        week.reps = Some(Reps::Count(round_reps(value, *n)));
    }

    if let Some(WeightPrescription::PercentTrainingMax { percent }) = &week1.weight {
        let delta = rules.weight_percent_delta_per_week.unwrap_or(Decimal::ZERO);
        week.weight = Some(WeightPrescription::PercentTrainingMax {
            percent: percent + delta * Decimal::from(steps),
        });
    }

    if let Some(rest) = &week1.rest_time {
        week.rest_time = Some(step_rest(rest, rules, steps));
    }

    week
}

/// Density progression (spec §4.7). `is_compound_parent` freezes `work_time`
/// across all weeks — density for those exercises comes entirely from the
/// sub-exercises' reps growing.
pub fn density(week1: &WeekParams, rules: &ProgressionRules, week_index: u32, total_weeks: u32, is_compound_parent: bool) -> WeekParams {
    let mut week = week1.clone();
    if is_compound_parent {
        return week;
    }

    let span = Decimal::from((total_weeks.saturating_sub(1)).max(1));
    let step_fraction = Decimal::from(week_index.saturating_sub(1)) / span;

    if let Some(work_time) = &week1.work_time {
        let total_increase = rules.work_time_increase_percent_total.unwrap_or(Decimal::ZERO);
        let increase = total_increase * step_fraction / Decimal::from(100);
        week.work_time = Some(TimeValue { value: work_time.value * (Decimal::ONE + increase), unit: work_time.unit }.rounded());
    }

    if let Some(Reps::Count(n)) = &week1.reps {
        let total_increase = rules.reps_increase_percent_total.unwrap_or(Decimal::ZERO);
        let increase = total_increase * step_fraction / Decimal::from(100);
        let value = Decimal::from(*n) * (Decimal::ONE + increase);
        week.reps = Some(Reps::Count(round_reps(value, *n)));
    }

    if let Some(rest) = &week1.rest_time {
        week.rest_time = Some(step_rest(rest, rules, (week_index.saturating_sub(1)) as i64));
    }

    week
}

/// Interval sub-exercise progression: work grows, rest shrinks, by a
/// configured symmetric per-week delta (spec §4.7).
pub fn interval(week1: &WeekParams, rules: &ProgressionRules, week_index: u32) -> WeekParams {
    let steps = (week_index.saturating_sub(1)) as i64;
    let mut week = week1.clone();
    if let Some(work_time) = &week1.work_time {
        let delta = rules.work_time_delta_per_week_seconds.unwrap_or(Decimal::ZERO);
        week.work_time = Some(step_time(work_time, Some(delta), None, None, None, steps));
    }
    if let Some(rest_time) = &week1.rest_time {
        let delta = rules.rest_time_delta_interval_seconds.unwrap_or(Decimal::ZERO);
        week.rest_time = Some(step_time(rest_time, Some(-delta), None, rules.rest_time_minimum_seconds, None, steps));
    }
    week
}

/// Wave-loading progression: reads a week-indexed delta table; falls back
/// to linear when no pattern exists for this program length.
pub fn wave_loading(week1: &WeekParams, rules: &ProgressionRules, week_index: u32, total_weeks: u32) -> WeekParams {
    let pattern = rules
        .wave_patterns
        .as_ref()
        .and_then(|patterns| patterns.get(&total_weeks.to_string()));

    let Some(pattern) = pattern else {
        return linear(week1, rules, week_index);
    };

    let idx = (week_index.saturating_sub(1)) as usize;
    let mut week = week1.clone();

    if let (Some(WeightPrescription::PercentTrainingMax { percent }), Some(delta)) =
        (&week1.weight, pattern.weight_percent_deltas.get(idx))
    {
        week.weight = Some(WeightPrescription::PercentTrainingMax { percent: percent + *delta });
    }

    if let (Some(Reps::Count(n)), Some(delta)) = (&week1.reps, pattern.reps_deltas.get(idx)) {
        let value = Decimal::from(*n) + *delta;
        week.reps = Some(Reps::Count(round_reps(value, *n)));
    }

    week
}

/// Volume progression: sets climb every N weeks (clamped), reps climb by a
/// per-week share of a total percentage, weight is held constant.
pub fn volume(week1: &WeekParams, rules: &ProgressionRules, week_index: u32, total_weeks: u32) -> WeekParams {
    let mut week = week1.clone();
    let every_n = rules.sets_increase_every_n_weeks.unwrap_or(4).max(1);

    if let Some(sets) = week1.sets {
        let increments = ((week_index.saturating_sub(1)) / every_n) as i32;
        let mut value = sets + increments;
        if let Some(max) = rules.sets_maximum {
            value = value.min(max);
        }
        week.sets = Some(value);
    }

    if let Some(Reps::Count(n)) = &week1.reps {
        let span = Decimal::from((total_weeks.saturating_sub(1)).max(1));
        let fraction = Decimal::from(week_index.saturating_sub(1)) / span;
        let total_increase = rules.reps_increase_percent_total.unwrap_or(Decimal::ZERO);
        let increase = total_increase * fraction / Decimal::from(100);
        let value = Decimal::from(*n) * (Decimal::ONE + increase);
        week.reps = Some(Reps::Count(round_reps(value, *n)));
    }

    week
}

/// Static progression: identical to week 1 every week.
pub fn static_scheme(week1: &WeekParams) -> WeekParams {
    week1.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::TimeUnit;
    use rust_decimal_macros::dec;

    fn rules() -> ProgressionRules {
        ProgressionRules {
            reps_delta_per_week: Some(dec!(1)),
            reps_minimum: Some(dec!(6)),
            weight_percent_delta_per_week: Some(dec!(2)),
            rest_time_delta_per_week_minutes: Some(dec!(0)),
            rest_time_delta_per_week_seconds: Some(dec!(5)),
            rest_time_minimum_seconds: Some(dec!(30)),
            rest_time_minimum_minutes: Some(dec!(0.5)),
            work_time_increase_percent_total: Some(dec!(25)),
            reps_increase_percent_total: Some(dec!(20)),
            work_time_delta_per_week_seconds: Some(dec!(5)),
            rest_time_delta_interval_seconds: Some(dec!(5)),
            sets_increase_every_n_weeks: Some(4),
            sets_maximum: Some(5),
            wave_patterns: None,
        }
    }

    #[test]
    fn linear_decreases_reps_and_clamps_at_minimum() {
        let mut week1 = WeekParams::empty();
        week1.reps = Some(Reps::Count(10));
        let r = rules();
        let week6 = linear(&week1, &r, 6);
        if let Some(Reps::Count(n)) = week6.reps {
            assert_eq!(n, 6);
        } else {
            panic!("expected numeric reps");
        }
        let week20 = linear(&week1, &r, 20);
        if let Some(Reps::Count(n)) = week20.reps {
            assert_eq!(n, 6, "reps should clamp at the configured minimum");
        } else {
            panic!("expected numeric reps");
        }
    }

    #[test]
    fn density_keeps_compound_parent_work_time_static() {
        let mut week1 = WeekParams::empty();
        week1.work_time = Some(TimeValue { value: dec!(60), unit: TimeUnit::Seconds });
        let r = rules();
        let week6 = density(&week1, &r, 6, 6, true);
        assert_eq!(week6.work_time.unwrap().value, dec!(60));
    }

    #[test]
    fn density_grows_work_time_for_regular_exercise() {
        let mut week1 = WeekParams::empty();
        week1.work_time = Some(TimeValue { value: dec!(40), unit: TimeUnit::Seconds });
        let r = rules();
        let week6 = density(&week1, &r, 6, 6, false);
        assert!(week6.work_time.unwrap().value > dec!(40));
    }

    #[test]
    fn interval_sum_of_work_and_rest_is_preserved() {
        let mut week1 = WeekParams::empty();
        week1.work_time = Some(TimeValue { value: dec!(40), unit: TimeUnit::Seconds });
        week1.rest_time = Some(TimeValue { value: dec!(20), unit: TimeUnit::Seconds });
        let r = rules();
        let week2 = interval(&week1, &r, 2);
        let sum = week2.work_time.unwrap().value + week2.rest_time.unwrap().value;
        assert_eq!(sum, dec!(60));
    }

    #[test]
    fn wave_loading_falls_back_to_linear_without_a_pattern() {
        let mut week1 = WeekParams::empty();
        week1.reps = Some(Reps::Count(10));
        let r = rules();
        let week3 = wave_loading(&week1, &r, 3, 3);
        if let Some(Reps::Count(n)) = week3.reps {
            assert_eq!(n, 8);
        } else {
            panic!("expected numeric reps");
        }
    }

    #[test]
    fn volume_clamps_sets_at_maximum() {
        let mut week1 = WeekParams::empty();
        week1.sets = Some(3);
        let r = rules();
        let week20 = volume(&week1, &r, 20, 20);
        assert_eq!(week20.sets, Some(5));
    }

    #[test]
    fn static_scheme_never_changes() {
        let mut week1 = WeekParams::empty();
        week1.sets = Some(3);
        assert_eq!(static_scheme(&week1), week1);
    }
}
