//! Engine configuration
//!
//! Thresholds, weights, and targets used across the analyzers. The values
//! here are tuned defaults, not physical constants; callers can load an
//! alternative configuration from JSON and pass it to the engine.

use serde::{Deserialize, Serialize};

/// Minimum data requirements before an analyzer will run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinimumsConfig {
    /// Entries required for feature extraction and stability analysis
    pub stability_entries: usize,
    /// Entries required for habit analysis
    pub habit_entries: usize,
    /// Entries required for correlation analysis
    pub correlation_entries: usize,
    /// Paired observations required to report a correlation pair
    pub paired_observations: usize,
}

impl Default for MinimumsConfig {
    fn default() -> Self {
        Self {
            stability_entries: 7,
            habit_entries: 7,
            correlation_entries: 10,
            paired_observations: 5,
        }
    }
}

/// Daily targets a tracked day must meet to count as adherent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdherenceTargets {
    /// Minimum exercise duration (minutes)
    pub min_exercise_minutes: u32,
    /// Minimum sleep duration (hours)
    pub min_sleep_hours: f64,
}

impl Default for AdherenceTargets {
    fn default() -> Self {
        Self {
            min_exercise_minutes: 20,
            min_sleep_hours: 6.0,
        }
    }
}

/// Stability scoring weights and setback detection parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StabilityConfig {
    /// Weight of consistency_score in the stability score
    pub consistency_weight: f64,
    /// Weight of adherence_rate in the stability score
    pub adherence_weight: f64,
    /// Weight of (1 - normalized missed days) in the stability score
    pub missed_weight: f64,
    /// Scores at or above this are Low risk
    pub low_risk_threshold: u8,
    /// Scores at or above this (but below low) are Medium risk
    pub medium_risk_threshold: u8,
    /// Day-over-day weight gain (kg) that counts as a setback
    pub setback_weight_gain_kg: f64,
    /// A run of this many consecutive missed days counts as a setback
    pub setback_missed_run_days: u32,
    /// Recovery is complete when weight returns within this band (kg) of the
    /// pre-setback baseline
    pub recovery_band_kg: f64,
}

impl Default for StabilityConfig {
    fn default() -> Self {
        Self {
            consistency_weight: 1.0 / 3.0,
            adherence_weight: 1.0 / 3.0,
            missed_weight: 1.0 / 3.0,
            low_risk_threshold: 70,
            medium_risk_threshold: 40,
            setback_weight_gain_kg: 0.5,
            setback_missed_run_days: 3,
            recovery_band_kg: 0.3,
        }
    }
}

/// Correlation strength cutoffs and reporting thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationConfig {
    /// |r| at or above this is Strong
    pub strong_threshold: f64,
    /// |r| at or above this (but below strong) is Moderate
    pub moderate_threshold: f64,
    /// Consistency below this triggers the data-consistency insight
    pub low_consistency_threshold: f64,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            strong_threshold: 0.6,
            moderate_threshold: 0.3,
            low_consistency_threshold: 0.7,
        }
    }
}

/// Habit classification thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitConfig {
    /// Fragility scores at or above this classify the habit as Fragile
    pub fragile_threshold: u8,
    /// Impact scores at or above this mark the habit as high impact
    pub high_impact_threshold: u8,
}

impl Default for HabitConfig {
    fn default() -> Self {
        Self {
            fragile_threshold: 50,
            high_impact_threshold: 70,
        }
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub minimums: MinimumsConfig,
    pub adherence: AdherenceTargets,
    pub stability: StabilityConfig,
    pub correlation: CorrelationConfig,
    pub habits: HabitConfig,
}

impl EngineConfig {
    /// Load configuration from JSON; missing sections fall back to defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_weights_sum_to_one() {
        let config = StabilityConfig::default();
        let sum = config.consistency_weight + config.adherence_weight + config.missed_weight;
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_json_round_trip() {
        let config = EngineConfig::default();
        let json = config.to_json().unwrap();
        let loaded = EngineConfig::from_json(&json).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let loaded =
            EngineConfig::from_json(r#"{"habits": {"fragile_threshold": 60, "high_impact_threshold": 70}}"#)
                .unwrap();
        assert_eq!(loaded.habits.fragile_threshold, 60);
        assert_eq!(loaded.adherence, AdherenceTargets::default());
    }

    #[test]
    fn test_minimums_load_from_json() {
        let loaded =
            EngineConfig::from_json(r#"{"minimums": {"stability_entries": 9}}"#).unwrap();
        assert_eq!(loaded.minimums.stability_entries, 9);
        // Unset minimums keep their defaults
        assert_eq!(loaded.minimums.correlation_entries, 10);
        assert_eq!(loaded.minimums.paired_observations, 5);
    }
}
