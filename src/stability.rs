//! Stability and recovery analysis
//!
//! Scores how stable a user's tracking behavior is, locates the most recent
//! setback (weight gain or tracking gap), and produces a recovery-time figure:
//! measured from history when a completed recovery is visible, otherwise
//! predicted from derived signals and the user profile.
//!
//! The recovery estimator is the pluggable locus for a learned model. The
//! default is a versioned weighted-feature formula that honors the contract:
//! monotone non-decreasing in missed days, non-increasing in consistency and
//! adherence, output integer in [1, 14].

use crate::config::{EngineConfig, StabilityConfig};
use crate::error::AnalysisError;
use crate::features::FeatureExtractor;
use crate::types::{DerivedSignals, RecoverySource, RiskLevel, StabilityResult, UserProfile};
use crate::window::AnalysisWindow;
use serde::{Deserialize, Serialize};

/// Recovery time bounds (days)
pub const MIN_RECOVERY_DAYS: u8 = 1;
pub const MAX_RECOVERY_DAYS: u8 = 14;

/// Estimator for recovery time when no completed recovery is observed.
///
/// Implementations must be deterministic, monotone non-decreasing in
/// `missed_days`, monotone non-increasing in `consistency_score` and
/// `adherence_rate`, and return an integer in [1, 14].
pub trait RecoveryEstimator {
    fn estimate(&self, signals: &DerivedSignals, profile: &UserProfile) -> u8;
}

/// Default recovery estimator: a versioned weighted-feature formula.
///
/// Kept as an explicit configuration object so a trained replacement can be
/// loaded externally without adding mutable analyzer state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedRecoveryEstimator {
    /// Estimator config version
    pub version: u32,
    /// Baseline recovery time (days)
    pub base_days: f64,
    /// Penalty scale for low consistency
    pub consistency_weight: f64,
    /// Penalty scale for low adherence
    pub adherence_weight: f64,
    /// Penalty per missed day
    pub missed_day_weight: f64,
    /// Credit per streak day (capped)
    pub streak_weight: f64,
    /// Penalty per year of age above the reference age
    pub age_weight: f64,
    /// Reference age (years)
    pub reference_age: f64,
    /// Credit per activity-level rank
    pub activity_weight: f64,
}

impl Default for WeightedRecoveryEstimator {
    fn default() -> Self {
        Self {
            version: 1,
            base_days: 3.0,
            consistency_weight: 5.0,
            adherence_weight: 4.0,
            missed_day_weight: 0.1,
            streak_weight: 0.05,
            age_weight: 0.02,
            reference_age: 30.0,
            activity_weight: 0.3,
        }
    }
}

impl RecoveryEstimator for WeightedRecoveryEstimator {
    fn estimate(&self, signals: &DerivedSignals, profile: &UserProfile) -> u8 {
        let streak = f64::from(signals.current_streak_days.min(30));
        let age_above_reference = (f64::from(profile.age) - self.reference_age).max(0.0);

        let days = self.base_days
            + self.consistency_weight * (1.0 - signals.consistency_score)
            + self.adherence_weight * (1.0 - signals.adherence_rate)
            + self.missed_day_weight * f64::from(signals.missed_days)
            - self.streak_weight * streak
            + self.age_weight * age_above_reference
            - self.activity_weight * f64::from(profile.activity_level.rank());

        (days.round() as i64).clamp(i64::from(MIN_RECOVERY_DAYS), i64::from(MAX_RECOVERY_DAYS))
            as u8
    }
}

/// Stability and recovery analyzer
pub struct StabilityAnalyzer {
    estimator: Box<dyn RecoveryEstimator>,
}

impl Default for StabilityAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl StabilityAnalyzer {
    /// Create an analyzer with the default recovery estimator
    pub fn new() -> Self {
        Self {
            estimator: Box::new(WeightedRecoveryEstimator::default()),
        }
    }

    /// Create an analyzer with a custom recovery estimator
    pub fn with_estimator(estimator: Box<dyn RecoveryEstimator>) -> Self {
        Self { estimator }
    }

    /// Analyze stability and recovery over a window.
    ///
    /// Fails with `InsufficientData` below the configured minimum entry count
    /// (default 7) and with `InvalidWindow` if the ordering invariant is
    /// violated.
    pub fn analyze(
        &self,
        window: &AnalysisWindow,
        profile: &UserProfile,
        config: &EngineConfig,
    ) -> Result<StabilityResult, AnalysisError> {
        window.validate()?;
        let signals = FeatureExtractor::extract(window, config)?;
        let window_end = window
            .end_date()
            .ok_or_else(|| AnalysisError::InvalidWindow("empty window".to_string()))?;

        let stability_score = compute_stability_score(&signals, &config.stability);
        let risk_level = risk_level_for(stability_score, &config.stability);
        let is_stable = risk_level == RiskLevel::Low;

        let (recovery_days, recovery_source) =
            match observed_recovery_days(window, &config.stability) {
                Some(days) => (days, RecoverySource::Observed),
                None => (
                    self.estimator.estimate(&signals, profile),
                    RecoverySource::Predicted,
                ),
            };

        let recommendations =
            build_recommendations(&signals, recovery_days, risk_level, &config.adherence);

        Ok(StabilityResult {
            stability_score,
            risk_level,
            recovery_days,
            recovery_source,
            is_stable,
            recommendations,
            signals,
            window_end,
        })
    }
}

/// Composite stability score:
/// `round(100 * (w1*consistency + w2*adherence + w3*(1 - missed/expected)))`
pub fn compute_stability_score(signals: &DerivedSignals, config: &StabilityConfig) -> u8 {
    let normalized_missed = if signals.expected_days == 0 {
        0.0
    } else {
        (f64::from(signals.missed_days) / f64::from(signals.expected_days)).clamp(0.0, 1.0)
    };

    let score = config.consistency_weight * signals.consistency_score
        + config.adherence_weight * signals.adherence_rate
        + config.missed_weight * (1.0 - normalized_missed);

    ((score * 100.0).round() as i64).clamp(0, 100) as u8
}

/// Risk tier from fixed thresholds
pub fn risk_level_for(stability_score: u8, config: &StabilityConfig) -> RiskLevel {
    if stability_score >= config.low_risk_threshold {
        RiskLevel::Low
    } else if stability_score >= config.medium_risk_threshold {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}

/// A detected setback: the entry index where it occurred and the last weight
/// observed before it
struct Setback {
    entry_index: usize,
    baseline_weight: Option<f64>,
}

/// Find the most recent setback: a day-over-day weight gain beyond the
/// configured delta, or a missed-day run of at least the configured length
fn detect_most_recent_setback(window: &AnalysisWindow, config: &StabilityConfig) -> Option<Setback> {
    let entries = window.entries();
    let mut setback = None;

    for i in 1..entries.len() {
        let gap_days = (entries[i].date - entries[i - 1].date).num_days() - 1;
        let weight_gain = match (entries[i - 1].weight_kg, entries[i].weight_kg) {
            (Some(prev), Some(curr)) => curr - prev,
            _ => 0.0,
        };

        if gap_days >= i64::from(config.setback_missed_run_days)
            || weight_gain > config.setback_weight_gain_kg
        {
            setback = Some(Setback {
                entry_index: i,
                baseline_weight: entries[..i].iter().rev().find_map(|e| e.weight_kg),
            });
        }
    }

    setback
}

/// Days from the most recent setback until weight returned to within the
/// recovery band of the pre-setback baseline. `None` when no setback exists,
/// no baseline weight is known, or the recovery never completed.
fn observed_recovery_days(window: &AnalysisWindow, config: &StabilityConfig) -> Option<u8> {
    let setback = detect_most_recent_setback(window, config)?;
    let baseline = setback.baseline_weight?;
    let entries = window.entries();
    let setback_date = entries[setback.entry_index].date;

    for entry in &entries[setback.entry_index + 1..] {
        if let Some(weight) = entry.weight_kg {
            if weight <= baseline + config.recovery_band_kg {
                let days = (entry.date - setback_date).num_days();
                return Some(
                    days.clamp(i64::from(MIN_RECOVERY_DAYS), i64::from(MAX_RECOVERY_DAYS)) as u8,
                );
            }
        }
    }

    None
}

/// Ordered rule list; each rule contributes at most one string, with a
/// maintenance fallback when none fire
fn build_recommendations(
    signals: &DerivedSignals,
    recovery_days: u8,
    risk_level: RiskLevel,
    targets: &crate::config::AdherenceTargets,
) -> Vec<String> {
    let mut recommendations = Vec::new();

    if f64::from(signals.missed_days) > f64::from(signals.expected_days) * 0.3 {
        recommendations.push("Increase tracking frequency - log your metrics every day".to_string());
    }
    if signals.adherence_rate < 0.5 {
        recommendations.push(format!(
            "Improve adherence to your daily targets ({} min exercise, {:.0}h sleep)",
            targets.min_exercise_minutes, targets.min_sleep_hours
        ));
    }
    if recovery_days > 7 {
        recommendations
            .push("Focus on rebuilding consistency with small daily habits".to_string());
    }
    if risk_level == RiskLevel::High {
        recommendations.push("Identify and remove barriers that break your routine".to_string());
    }

    if recommendations.is_empty() {
        recommendations.push("Habits look stable - maintain your current routine".to_string());
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ActivityLevel, HealthLogEntry};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    fn entry(day: u32, weight: Option<f64>) -> HealthLogEntry {
        HealthLogEntry {
            weight_kg: weight,
            sleep_hours: Some(7.5),
            exercise_minutes: Some(30),
            ..HealthLogEntry::new(date(day))
        }
    }

    fn profile() -> UserProfile {
        UserProfile {
            age: 30,
            activity_level: ActivityLevel::Moderate,
        }
    }

    fn signals(consistency: f64, adherence: f64, missed: u32, expected: u32) -> DerivedSignals {
        DerivedSignals {
            consistency_score: consistency,
            adherence_rate: adherence,
            current_streak_days: 5,
            missed_days: missed,
            total_tracked_days: expected - missed,
            expected_days: expected,
        }
    }

    #[test]
    fn test_fails_below_minimum_entries() {
        let window =
            AnalysisWindow::new((1..=6).map(|d| entry(d, Some(80.0))).collect()).unwrap();
        let result = StabilityAnalyzer::new().analyze(&window, &profile(), &Default::default());
        assert!(matches!(
            result,
            Err(AnalysisError::InsufficientData { required: 7, actual: 6 })
        ));
    }

    #[test]
    fn test_minimum_entries_is_configurable() {
        let config =
            EngineConfig::from_json(r#"{"minimums": {"stability_entries": 9}}"#).unwrap();
        let window =
            AnalysisWindow::new((1..=8).map(|d| entry(d, Some(80.0))).collect()).unwrap();

        let result = StabilityAnalyzer::new().analyze(&window, &profile(), &config);
        assert!(matches!(
            result,
            Err(AnalysisError::InsufficientData { required: 9, actual: 8 })
        ));
    }

    #[test]
    fn test_perfect_window_is_low_risk() {
        let window =
            AnalysisWindow::new((1..=14).map(|d| entry(d, Some(80.0))).collect()).unwrap();
        let result = StabilityAnalyzer::new()
            .analyze(&window, &profile(), &Default::default())
            .unwrap();

        assert_eq!(result.stability_score, 100);
        assert_eq!(result.risk_level, RiskLevel::Low);
        assert!(result.is_stable);
        assert_eq!(result.window_end, date(14));
        assert_eq!(
            result.recommendations,
            vec!["Habits look stable - maintain your current routine".to_string()]
        );
    }

    #[test]
    fn test_score_monotone_in_missed_days() {
        let config = StabilityConfig::default();
        let mut last = u8::MAX;
        for missed in 0..=20 {
            let score = compute_stability_score(&signals(0.8, 0.7, missed, 20), &config);
            assert!(score <= last, "score must not increase with missed days");
            last = score;
        }
    }

    #[test]
    fn test_risk_tier_thresholds() {
        let config = StabilityConfig::default();
        assert_eq!(risk_level_for(70, &config), RiskLevel::Low);
        assert_eq!(risk_level_for(69, &config), RiskLevel::Medium);
        assert_eq!(risk_level_for(40, &config), RiskLevel::Medium);
        assert_eq!(risk_level_for(39, &config), RiskLevel::High);
    }

    #[test]
    fn test_observed_recovery_after_weight_setback() {
        // Gain of 0.8 kg on day 3, back within the 0.3 kg band on day 6
        let weights = [80.0, 80.0, 80.8, 80.6, 80.5, 80.2, 80.1, 80.0];
        let entries: Vec<_> = weights
            .iter()
            .enumerate()
            .map(|(i, &w)| entry(i as u32 + 1, Some(w)))
            .collect();
        let window = AnalysisWindow::new(entries).unwrap();

        let result = StabilityAnalyzer::new()
            .analyze(&window, &profile(), &Default::default())
            .unwrap();
        assert_eq!(result.recovery_source, RecoverySource::Observed);
        assert_eq!(result.recovery_days, 3);
    }

    #[test]
    fn test_predicted_recovery_without_setback() {
        let window =
            AnalysisWindow::new((1..=10).map(|d| entry(d, Some(80.0))).collect()).unwrap();
        let result = StabilityAnalyzer::new()
            .analyze(&window, &profile(), &Default::default())
            .unwrap();

        assert_eq!(result.recovery_source, RecoverySource::Predicted);
        assert!(result.recovery_days >= MIN_RECOVERY_DAYS);
        assert!(result.recovery_days <= MAX_RECOVERY_DAYS);
    }

    #[test]
    fn test_missed_run_counts_as_setback() {
        // 4-day tracking gap between day 5 and day 10, never any weight data,
        // so recovery falls back to prediction
        let days = [1, 2, 3, 4, 5, 10, 11, 12];
        let window =
            AnalysisWindow::new(days.iter().map(|&d| entry(d, None)).collect()).unwrap();

        let setback =
            detect_most_recent_setback(&window, &StabilityConfig::default()).unwrap();
        assert_eq!(window.entries()[setback.entry_index].date, date(10));
        assert_eq!(setback.baseline_weight, None);

        let result = StabilityAnalyzer::new()
            .analyze(&window, &profile(), &Default::default())
            .unwrap();
        assert_eq!(result.recovery_source, RecoverySource::Predicted);
    }

    #[test]
    fn test_estimator_contract() {
        let estimator = WeightedRecoveryEstimator::default();
        let p = profile();

        // Non-increasing in consistency
        let low = estimator.estimate(&signals(0.2, 0.7, 5, 20), &p);
        let high = estimator.estimate(&signals(0.9, 0.7, 5, 20), &p);
        assert!(high <= low);

        // Non-increasing in adherence
        let low = estimator.estimate(&signals(0.7, 0.2, 5, 20), &p);
        let high = estimator.estimate(&signals(0.7, 0.9, 5, 20), &p);
        assert!(high <= low);

        // Non-decreasing in missed days
        let few = estimator.estimate(&signals(0.7, 0.7, 2, 20), &p);
        let many = estimator.estimate(&signals(0.7, 0.7, 15, 20), &p);
        assert!(many >= few);

        // Always in bounds
        for consistency in [0.0, 0.5, 1.0] {
            for missed in [0, 10, 50] {
                let days = estimator.estimate(&signals(consistency, 0.5, missed, 60), &p);
                assert!((MIN_RECOVERY_DAYS..=MAX_RECOVERY_DAYS).contains(&days));
            }
        }
    }

    #[test]
    fn test_analysis_is_idempotent() {
        let weights = [80.0, 80.2, 80.9, 80.6, 80.3, 80.1, 80.0, 79.9, 79.8, 79.7];
        let entries: Vec<_> = weights
            .iter()
            .enumerate()
            .map(|(i, &w)| entry(i as u32 + 1, Some(w)))
            .collect();
        let window = AnalysisWindow::new(entries).unwrap();
        let analyzer = StabilityAnalyzer::new();

        let a = analyzer.analyze(&window, &profile(), &Default::default()).unwrap();
        let b = analyzer.analyze(&window, &profile(), &Default::default()).unwrap();
        assert_eq!(a, b);
    }
}
