//! Engine orchestration
//!
//! This module provides the public API of Vitalytics. It runs the three
//! analyzers over one immutable window snapshot and assembles their outputs
//! into a single report.
//!
//! Each analyzer is an independent pure computation over the same window;
//! callers that only need one result can invoke it directly and a failure in
//! one analyzer never affects the others.

use crate::config::EngineConfig;
use crate::correlation::CorrelationAnalyzer;
use crate::error::AnalysisError;
use crate::features::FeatureExtractor;
use crate::habits::HabitSensitivityAnalyzer;
use crate::report::{AnalysisReport, ReportEncoder};
use crate::stability::{RecoveryEstimator, StabilityAnalyzer};
use crate::types::{CorrelationResult, DerivedSignals, HabitReport, StabilityResult, UserProfile};
use crate::window::AnalysisWindow;
use tracing::debug;

/// Behavioral analytics engine.
///
/// Holds configuration and the report encoder; all analysis methods are
/// read-only with respect to the engine itself.
pub struct AnalyticsEngine {
    config: EngineConfig,
    stability: StabilityAnalyzer,
    encoder: ReportEncoder,
}

impl Default for AnalyticsEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalyticsEngine {
    /// Create an engine with default configuration
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create an engine with a specific configuration
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            stability: StabilityAnalyzer::new(),
            encoder: ReportEncoder::new(),
        }
    }

    /// Replace the recovery estimator (e.g. with an externally trained model)
    pub fn with_recovery_estimator(mut self, estimator: Box<dyn RecoveryEstimator>) -> Self {
        self.stability = StabilityAnalyzer::with_estimator(estimator);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Extract derived signals only
    pub fn extract_signals(&self, window: &AnalysisWindow) -> Result<DerivedSignals, AnalysisError> {
        FeatureExtractor::extract(window, &self.config)
    }

    /// Run the stability & recovery analyzer
    pub fn analyze_stability(
        &self,
        window: &AnalysisWindow,
        profile: &UserProfile,
    ) -> Result<StabilityResult, AnalysisError> {
        debug!(entries = window.len(), "running stability analysis");
        self.stability.analyze(window, profile, &self.config)
    }

    /// Run the correlation analyzer
    pub fn analyze_correlations(
        &self,
        window: &AnalysisWindow,
    ) -> Result<CorrelationResult, AnalysisError> {
        debug!(entries = window.len(), "running correlation analysis");
        CorrelationAnalyzer::analyze(window, &self.config)
    }

    /// Run the habit sensitivity analyzer
    pub fn analyze_habits(&self, window: &AnalysisWindow) -> Result<HabitReport, AnalysisError> {
        debug!(entries = window.len(), "running habit analysis");
        HabitSensitivityAnalyzer::analyze(window, &self.config)
    }

    /// Run all three analyzers and assemble a complete report.
    ///
    /// Requires the correlation minimum (10 entries); use the individual
    /// methods when less data is available.
    pub fn analyze(
        &self,
        user_id: &str,
        window: &AnalysisWindow,
        profile: &UserProfile,
    ) -> Result<AnalysisReport, AnalysisError> {
        window.validate()?;
        let window_start = window
            .start_date()
            .ok_or_else(|| AnalysisError::InvalidWindow("empty window".to_string()))?;
        let window_end = window
            .end_date()
            .ok_or_else(|| AnalysisError::InvalidWindow("empty window".to_string()))?;

        let signals = self.extract_signals(window)?;
        let stability = self.analyze_stability(window, profile)?;
        let correlation = self.analyze_correlations(window)?;
        let habits = self.analyze_habits(window)?;

        debug!(
            user_id,
            %window_end,
            stability_score = stability.stability_score,
            root_causes = correlation.root_causes.len(),
            "assembled analysis report"
        );

        Ok(self.encoder.encode(
            user_id,
            window_start,
            window_end,
            window.len(),
            signals,
            stability,
            correlation,
            habits,
        ))
    }
}

/// Convenience: parse a JSON log, run the full analysis, and return the
/// report as JSON.
///
/// # Arguments
/// * `log_json` - JSON array of health log entries (any order)
/// * `profile` - User profile from the profile-store collaborator
/// * `user_id` - Owner of the log
pub fn analyze_log_json(
    log_json: &str,
    profile: &UserProfile,
    user_id: &str,
) -> Result<String, AnalysisError> {
    let window = AnalysisWindow::from_json(log_json)?;
    let engine = AnalyticsEngine::new();
    let report = engine.analyze(user_id, &window, profile)?;
    report.to_json()
}
