//! Core types for the Vitalytics analysis pipeline
//!
//! This module defines the data structures that flow through each analyzer:
//! raw log entries, derived signals, and the immutable result records each
//! analysis run produces.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One calendar-day observation from a user's health log.
///
/// Missing fields mean "not tracked that day", which is distinct from a
/// tracked value of zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthLogEntry {
    /// Calendar date of the observation (unique per user)
    pub date: NaiveDate,
    /// Body weight (kg)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    /// Sleep duration (hours)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sleep_hours: Option<f64>,
    /// Exercise duration (minutes)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exercise_minutes: Option<u32>,
    /// Calories consumed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories_consumed: Option<f64>,
}

impl HealthLogEntry {
    /// Create an entry with no tracked metrics
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            weight_kg: None,
            sleep_hours: None,
            exercise_minutes: None,
            calories_consumed: None,
        }
    }
}

/// Behavior metrics considered by the correlation analyzer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    SleepHours,
    ExerciseMinutes,
    CaloriesConsumed,
    /// Day-over-day weight change, the outcome metric
    WeightDelta,
}

impl Metric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::SleepHours => "sleep_hours",
            Metric::ExerciseMinutes => "exercise_minutes",
            Metric::CaloriesConsumed => "calories_consumed",
            Metric::WeightDelta => "weight_delta",
        }
    }

    /// Fixed priority used as the final tie-breaker when ranking root causes.
    /// Lower value wins: calories > exercise > sleep.
    pub(crate) fn root_cause_priority(&self) -> u8 {
        match self {
            Metric::CaloriesConsumed => 0,
            Metric::ExerciseMinutes => 1,
            Metric::SleepHours => 2,
            Metric::WeightDelta => 3,
        }
    }
}

/// Self-reported activity level from the user profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

impl ActivityLevel {
    /// Ordinal rank (0 = sedentary .. 4 = very active)
    pub fn rank(&self) -> u8 {
        match self {
            ActivityLevel::Sedentary => 0,
            ActivityLevel::Light => 1,
            ActivityLevel::Moderate => 2,
            ActivityLevel::Active => 3,
            ActivityLevel::VeryActive => 4,
        }
    }
}

/// Minimal user profile supplied by the profile-store collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// Age in years
    pub age: u32,
    /// Self-reported activity level
    pub activity_level: ActivityLevel,
}

/// Per-user signals derived from an analysis window (feature extractor output)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedSignals {
    /// Fraction of expected days actually tracked (0-1)
    pub consistency_score: f64,
    /// Fraction of tracked days meeting exercise and sleep targets (0-1)
    pub adherence_rate: f64,
    /// Consecutive calendar days tracked, counted back from the most recent entry
    pub current_streak_days: u32,
    /// Expected days with no entry
    pub missed_days: u32,
    /// Number of entries in the window
    pub total_tracked_days: u32,
    /// Calendar span of the window (last date - first date + 1)
    pub expected_days: u32,
}

/// Risk tier derived from the stability score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// How the recovery-time figure was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoverySource {
    /// Measured from a completed recovery after the most recent setback
    Observed,
    /// Estimated from derived signals and the user profile
    Predicted,
}

/// Stability and recovery forecast for one analysis run.
///
/// Immutable; superseded (not mutated) by later runs. Keyed by the window's
/// end date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StabilityResult {
    /// Composite stability score (0-100)
    pub stability_score: u8,
    /// Risk tier from fixed thresholds
    pub risk_level: RiskLevel,
    /// Days to recover from the most recent setback (1-14)
    pub recovery_days: u8,
    /// Whether recovery_days was observed or predicted
    pub recovery_source: RecoverySource,
    /// True iff risk_level is Low
    pub is_stable: bool,
    /// Ordered, rule-generated recommendation strings
    pub recommendations: Vec<String>,
    /// Signals the score was computed from
    pub signals: DerivedSignals,
    /// End date of the triggering window
    pub window_end: NaiveDate,
}

/// Qualitative strength bucket for a correlation coefficient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Magnitude {
    Strong,
    Moderate,
    Weak,
}

/// Effect direction (sign of the coefficient against the outcome metric)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectDirection {
    /// Higher behavior values coincide with weight gain
    Positive,
    /// Higher behavior values coincide with weight loss
    Negative,
}

/// Pearson coefficient for one metric pair, with the sample size used
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricCorrelation {
    /// The metric pair, stored in a canonical order
    pub pair: (Metric, Metric),
    /// Signed coefficient in [-1, 1]; zero-variance series are reported as 0
    pub coefficient: f64,
    /// Number of paired observations the coefficient was computed over
    pub sample_size: usize,
}

/// One ranked root-cause candidate for the outcome metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootCause {
    /// The behavior metric
    pub metric: Metric,
    /// Sign of the coefficient against weight delta
    pub direction: EffectDirection,
    /// Qualitative strength bucket
    pub magnitude: Magnitude,
    /// Signed coefficient in [-1, 1]
    pub coefficient: f64,
    /// Paired observations used
    pub sample_size: usize,
}

/// Correlation analysis output for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationResult {
    /// All reported pairwise correlations
    pub correlations: Vec<MetricCorrelation>,
    /// Ranked root causes (top 3, weak pairs excluded)
    pub root_causes: Vec<RootCause>,
    /// Templated, ordered insight strings
    pub insights: Vec<String>,
    /// Number of entries analyzed
    pub data_points: usize,
    /// End date of the triggering window
    pub window_end: NaiveDate,
}

impl CorrelationResult {
    /// Look up a reported coefficient, ignoring pair order
    pub fn coefficient(&self, a: Metric, b: Metric) -> Option<f64> {
        self.correlations
            .iter()
            .find(|c| c.pair == (a, b) || c.pair == (b, a))
            .map(|c| c.coefficient)
    }
}

/// Habit kinds tracked by the sensitivity analyzer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HabitKind {
    DietTracking,
    ExerciseRoutine,
    SleepSchedule,
}

impl HabitKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            HabitKind::DietTracking => "diet_tracking",
            HabitKind::ExerciseRoutine => "exercise_routine",
            HabitKind::SleepSchedule => "sleep_schedule",
        }
    }

    /// All analyzed habit kinds, in reporting order
    pub fn all() -> [HabitKind; 3] {
        [
            HabitKind::DietTracking,
            HabitKind::ExerciseRoutine,
            HabitKind::SleepSchedule,
        ]
    }
}

/// Fragility classification of a habit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HabitCategory {
    Fragile,
    Resilient,
}

/// Fragility, resilience, and impact profile for one habit kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitProfile {
    pub kind: HabitKind,
    /// 0-100; higher = lower frequency/consistency, breaks more easily
    pub fragility_score: u8,
    /// 0-100; 50 = no statistical signal against the outcome metric
    pub impact_score: u8,
    /// Fraction of expected days the habit was observed (0-1)
    pub frequency: f64,
    /// Days since the habit was first observed in the window (0 if never)
    pub duration_days: u32,
    /// Fragile iff fragility_score meets the fragile threshold
    pub category: HabitCategory,
    /// True iff impact_score meets the high-impact threshold
    pub is_high_impact: bool,
    /// Template recommendation for the category/impact combination
    pub recommendation: String,
}

/// Habit sensitivity analysis output for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitReport {
    /// One profile per habit kind, in `HabitKind::all()` order
    pub habits: Vec<HabitProfile>,
    /// End date of the triggering window
    pub window_end: NaiveDate,
}

impl HabitReport {
    /// Look up the profile for a habit kind
    pub fn habit(&self, kind: HabitKind) -> Option<&HabitProfile> {
        self.habits.iter().find(|h| h.kind == kind)
    }
}
