//! Feature extraction
//!
//! This module derives per-user behavioral signals from an analysis window:
//! - Tracking consistency and missed days
//! - Adherence to exercise/sleep targets
//! - Current tracking streak
//!
//! Extraction is a pure function of the window; no hidden state.

use crate::config::{AdherenceTargets, EngineConfig};
use crate::error::AnalysisError;
use crate::types::DerivedSignals;
use crate::window::AnalysisWindow;

/// Feature extractor for computing derived signals
pub struct FeatureExtractor;

impl FeatureExtractor {
    /// Extract derived signals from a window.
    ///
    /// Fails with `InsufficientData` when the window has fewer entries than
    /// the configured minimum (default 7).
    pub fn extract(
        window: &AnalysisWindow,
        config: &EngineConfig,
    ) -> Result<DerivedSignals, AnalysisError> {
        if window.len() < config.minimums.stability_entries {
            return Err(AnalysisError::InsufficientData {
                required: config.minimums.stability_entries,
                actual: window.len(),
            });
        }

        let expected_days = window.span_days();
        let total_tracked_days = window.len() as u32;
        let consistency_score =
            (f64::from(total_tracked_days) / f64::from(expected_days)).clamp(0.0, 1.0);
        let missed_days = expected_days.saturating_sub(total_tracked_days);

        Ok(DerivedSignals {
            consistency_score,
            adherence_rate: compute_adherence_rate(window, &config.adherence),
            current_streak_days: compute_current_streak(window),
            missed_days,
            total_tracked_days,
            expected_days,
        })
    }
}

/// Fraction of tracked days whose exercise and sleep both meet targets.
/// Days missing either field do not count as adherent.
fn compute_adherence_rate(window: &AnalysisWindow, targets: &AdherenceTargets) -> f64 {
    let adherent = window
        .entries()
        .iter()
        .filter(|e| {
            matches!(
                (e.exercise_minutes, e.sleep_hours),
                (Some(exercise), Some(sleep))
                    if exercise >= targets.min_exercise_minutes
                        && sleep >= targets.min_sleep_hours
            )
        })
        .count();

    adherent as f64 / window.len() as f64
}

/// Consecutive calendar days with an entry, counted backward from the most
/// recent entry until the first gap or the window start
fn compute_current_streak(window: &AnalysisWindow) -> u32 {
    let entries = window.entries();
    let mut streak = 1u32;
    for pair in entries.windows(2).rev() {
        if (pair[1].date - pair[0].date).num_days() == 1 {
            streak += 1;
        } else {
            break;
        }
    }
    streak
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::HealthLogEntry;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn entry(day: u32, exercise: Option<u32>, sleep: Option<f64>) -> HealthLogEntry {
        HealthLogEntry {
            exercise_minutes: exercise,
            sleep_hours: sleep,
            ..HealthLogEntry::new(date(day))
        }
    }

    fn window(days: &[u32]) -> AnalysisWindow {
        AnalysisWindow::new(
            days.iter()
                .map(|&d| entry(d, Some(30), Some(8.0)))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_fails_below_minimum_entries() {
        let result = FeatureExtractor::extract(&window(&[1, 2, 3, 4, 5, 6]), &Default::default());
        assert!(matches!(
            result,
            Err(AnalysisError::InsufficientData { required: 7, actual: 6 })
        ));
    }

    #[test]
    fn test_succeeds_at_minimum_entries() {
        let signals =
            FeatureExtractor::extract(&window(&[1, 2, 3, 4, 5, 6, 7]), &Default::default())
                .unwrap();
        assert_eq!(signals.total_tracked_days, 7);
        assert_eq!(signals.expected_days, 7);
        assert_eq!(signals.missed_days, 0);
    }

    #[test]
    fn test_fully_tracked_window() {
        let days: Vec<u32> = (1..=14).collect();
        let signals = FeatureExtractor::extract(&window(&days), &Default::default()).unwrap();

        assert_eq!(signals.consistency_score, 1.0);
        assert_eq!(signals.missed_days, 0);
        assert_eq!(signals.current_streak_days, 14);
    }

    #[test]
    fn test_gap_window_consistency() {
        // 9 tracked days over a 20-day span: days 1-6 missing after day 1,
        // then an 8-day streak at the end
        let days = [1, 7, 8, 9, 14, 17, 18, 19, 20];
        let signals = FeatureExtractor::extract(&window(&days), &Default::default()).unwrap();

        assert_eq!(signals.expected_days, 20);
        assert_eq!(signals.total_tracked_days, 9);
        assert_eq!(signals.missed_days, 11);
        assert!((signals.consistency_score - 0.45).abs() < 1e-9);
        assert_eq!(signals.current_streak_days, 4);
    }

    #[test]
    fn test_streak_stops_at_gap() {
        let signals =
            FeatureExtractor::extract(&window(&[1, 2, 3, 4, 5, 8, 9, 10]), &Default::default())
                .unwrap();
        assert_eq!(signals.current_streak_days, 3);
    }

    #[test]
    fn test_adherence_requires_both_targets() {
        let entries = vec![
            entry(1, Some(30), Some(8.0)),  // adherent
            entry(2, Some(20), Some(6.0)),  // adherent (at thresholds)
            entry(3, Some(10), Some(8.0)),  // exercise below target
            entry(4, Some(30), Some(5.0)),  // sleep below target
            entry(5, None, Some(8.0)),      // missing exercise
            entry(6, Some(30), None),       // missing sleep
            entry(7, Some(45), Some(7.5)),  // adherent
        ];
        let window = AnalysisWindow::new(entries).unwrap();
        let signals = FeatureExtractor::extract(&window, &Default::default()).unwrap();

        // 3 adherent of 7 tracked
        assert!((signals.adherence_rate - 3.0 / 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_minimum_entries_is_configurable() {
        let config =
            EngineConfig::from_json(r#"{"minimums": {"stability_entries": 9}}"#).unwrap();
        let days: Vec<u32> = (1..=8).collect();

        let result = FeatureExtractor::extract(&window(&days), &config);
        assert!(matches!(
            result,
            Err(AnalysisError::InsufficientData { required: 9, actual: 8 })
        ));

        let nine: Vec<u32> = (1..=9).collect();
        assert!(FeatureExtractor::extract(&window(&nine), &config).is_ok());
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let days = [1, 3, 4, 5, 9, 10, 11, 12];
        let a = FeatureExtractor::extract(&window(&days), &Default::default()).unwrap();
        let b = FeatureExtractor::extract(&window(&days), &Default::default()).unwrap();
        assert_eq!(a, b);
    }
}
