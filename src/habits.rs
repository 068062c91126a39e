//! Habit sensitivity analysis
//!
//! Profiles each tracked habit (diet logging, exercise routine, sleep
//! schedule) for fragility, resilience, and impact. Fragility comes from how
//! often and how evenly the habit shows up in the window; impact comes from
//! correlating the habit's presence series against day-over-day weight change
//! with the same machinery the correlation analyzer uses.
//!
//! Impact is scaled as `50 + 50*r`, so a habit with no statistical signal
//! centers at exactly 50 rather than zero.

use crate::config::{EngineConfig, HabitConfig};
use crate::correlation::pearson;
use crate::error::AnalysisError;
use crate::types::{HabitCategory, HabitKind, HabitProfile, HabitReport, HealthLogEntry};
use crate::window::AnalysisWindow;
use chrono::NaiveDate;

/// Habit sensitivity analyzer
pub struct HabitSensitivityAnalyzer;

impl HabitSensitivityAnalyzer {
    /// Profile all habit kinds over a window.
    ///
    /// Fails with `InsufficientData` when the window has fewer entries than
    /// the configured minimum (default 7).
    pub fn analyze(
        window: &AnalysisWindow,
        config: &EngineConfig,
    ) -> Result<HabitReport, AnalysisError> {
        if window.len() < config.minimums.habit_entries {
            return Err(AnalysisError::InsufficientData {
                required: config.minimums.habit_entries,
                actual: window.len(),
            });
        }
        let window_end = window
            .end_date()
            .ok_or_else(|| AnalysisError::InvalidWindow("empty window".to_string()))?;

        let habits = HabitKind::all()
            .iter()
            .map(|&kind| {
                profile_habit(window, kind, &config.habits, config.minimums.paired_observations)
            })
            .collect();

        Ok(HabitReport { habits, window_end })
    }
}

/// Whether the habit was observed on a given entry's day
fn habit_present(entry: &HealthLogEntry, kind: HabitKind) -> bool {
    match kind {
        HabitKind::DietTracking => entry.calories_consumed.is_some(),
        HabitKind::ExerciseRoutine => entry.exercise_minutes.is_some_and(|m| m > 0),
        HabitKind::SleepSchedule => entry.sleep_hours.is_some(),
    }
}

fn profile_habit(
    window: &AnalysisWindow,
    kind: HabitKind,
    config: &HabitConfig,
    min_paired: usize,
) -> HabitProfile {
    let expected_days = window.span_days();
    let habit_dates: Vec<NaiveDate> = window
        .entries()
        .iter()
        .filter(|e| habit_present(e, kind))
        .map(|e| e.date)
        .collect();

    let frequency = (habit_dates.len() as f64 / f64::from(expected_days)).clamp(0.0, 1.0);

    let duration_days = match (habit_dates.first(), window.end_date()) {
        (Some(&first), Some(end)) => (end - first).num_days() as u32,
        _ => 0,
    };

    let consistency = habit_consistency(window, &habit_dates, expected_days);

    let fragility = 100.0 * (1.0 - 0.5 * frequency - 0.5 * consistency);
    let fragility_score = (fragility.round() as i64).clamp(0, 100) as u8;

    let impact_score = impact_score(window, kind, min_paired);

    let category = if fragility_score >= config.fragile_threshold {
        HabitCategory::Fragile
    } else {
        HabitCategory::Resilient
    };
    let is_high_impact = impact_score >= config.high_impact_threshold;

    HabitProfile {
        kind,
        fragility_score,
        impact_score,
        frequency,
        duration_days,
        category,
        is_high_impact,
        recommendation: recommendation_for(category, is_high_impact).to_string(),
    }
}

/// Longest-gap-normalized consistency: `1 - longest_gap / expected_days`,
/// clamped to [0, 1]. Gaps at the window edges count too; a habit never
/// observed has a gap spanning the whole window.
fn habit_consistency(window: &AnalysisWindow, habit_dates: &[NaiveDate], expected_days: u32) -> f64 {
    if expected_days == 0 {
        return 0.0;
    }
    let (Some(start), Some(end)) = (window.start_date(), window.end_date()) else {
        return 0.0;
    };

    let longest_gap = if habit_dates.is_empty() {
        i64::from(expected_days)
    } else {
        let mut longest = (habit_dates[0] - start).num_days();
        for pair in habit_dates.windows(2) {
            longest = longest.max((pair[1] - pair[0]).num_days() - 1);
        }
        longest.max((end - habit_dates[habit_dates.len() - 1]).num_days())
    };

    (1.0 - longest_gap as f64 / f64::from(expected_days)).clamp(0.0, 1.0)
}

/// Impact of a habit on the outcome metric: `clamp(50 + 50*r)` where `r` is
/// the Pearson coefficient of the habit's presence series (0/1) against
/// day-over-day weight change. Too few pairs or zero variance yield r = 0,
/// centering the score at exactly 50.
fn impact_score(window: &AnalysisWindow, kind: HabitKind, min_paired: usize) -> u8 {
    let deltas = window.weight_deltas();
    let (presence, changes): (Vec<f64>, Vec<f64>) = window
        .entries()
        .iter()
        .zip(deltas.iter())
        .filter_map(|(entry, delta)| {
            let delta = (*delta)?;
            let present = if habit_present(entry, kind) { 1.0 } else { 0.0 };
            Some((present, delta))
        })
        .unzip();

    let r = if presence.len() < min_paired {
        0.0
    } else {
        pearson(&presence, &changes)
    };

    ((50.0 + 50.0 * r).round() as i64).clamp(0, 100) as u8
}

/// Fixed recommendation template per category/impact combination
fn recommendation_for(category: HabitCategory, is_high_impact: bool) -> &'static str {
    match (category, is_high_impact) {
        (HabitCategory::Fragile, true) => {
            "This habit breaks easily and strongly affects your outcomes - protect it with daily reminders"
        }
        (HabitCategory::Fragile, false) => {
            "This habit breaks easily - simplify it and aim for daily practice"
        }
        (HabitCategory::Resilient, true) => {
            "This habit is well-established and drives your results - keep it up"
        }
        (HabitCategory::Resilient, false) => {
            "This habit is well-established - maintain your consistency"
        }
    }
}
