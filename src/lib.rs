//! Vitalytics - Behavioral analytics engine for longitudinal health logs
//!
//! Vitalytics turns a user's raw day-by-day health log into three kinds of
//! analysis, each a deterministic pure function of an immutable window
//! snapshot:
//!
//! - **Stability & Recovery**: a stability score, risk tier, and a
//!   recovery-time figure after a detected setback
//! - **Correlation**: pairwise behavior-outcome correlations with ranked
//!   root causes and templated insights
//! - **Habit Sensitivity**: per-habit fragility, resilience, and impact
//!   profiles
//!
//! The analyzers are independent and may run concurrently; none depends on
//! another's output. Data flows one way: raw log → feature extraction →
//! analyzers → immutable result records keyed by user and window end date.

pub mod config;
pub mod correlation;
pub mod engine;
pub mod error;
pub mod features;
pub mod habits;
pub mod report;
pub mod stability;
pub mod types;
pub mod window;

pub use config::EngineConfig;
pub use correlation::CorrelationAnalyzer;
pub use engine::{analyze_log_json, AnalyticsEngine};
pub use error::AnalysisError;
pub use features::FeatureExtractor;
pub use habits::HabitSensitivityAnalyzer;
pub use report::{AnalysisReport, ReportEncoder};
pub use stability::{RecoveryEstimator, StabilityAnalyzer, WeightedRecoveryEstimator};
pub use types::{
    CorrelationResult, DerivedSignals, HabitProfile, HabitReport, HealthLogEntry, RiskLevel,
    StabilityResult, UserProfile,
};
pub use window::AnalysisWindow;

/// Engine version embedded in all report payloads
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for report payloads
pub const PRODUCER_NAME: &str = "vitalytics";
