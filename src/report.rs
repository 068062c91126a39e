//! Analysis report encoding
//!
//! Assembles analyzer outputs into one immutable report record, stamped with
//! producer metadata and keyed by user and window end date. This is the
//! concrete form of the output collaborator contract: the persistence or
//! presentation layer stores the report as-is for later read-only display.

use crate::error::AnalysisError;
use crate::types::{CorrelationResult, DerivedSignals, HabitReport, StabilityResult};
use crate::{ENGINE_VERSION, PRODUCER_NAME};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Current report schema version
pub const REPORT_VERSION: &str = "1.0.0";

/// Producer metadata embedded in every report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// Complete analysis report for one user and window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub report_version: String,
    pub producer: ReportProducer,
    /// User the analyzed log belongs to
    pub user_id: String,
    /// First date in the analyzed window
    pub window_start: NaiveDate,
    /// End date of the analyzed window (the report key, with user_id)
    pub window_end: NaiveDate,
    /// When the report was computed (RFC 3339)
    pub computed_at_utc: String,
    /// Entries analyzed
    pub data_points: usize,
    pub signals: DerivedSignals,
    pub stability: StabilityResult,
    pub correlation: CorrelationResult,
    pub habits: HabitReport,
}

/// Report encoder carrying a stable instance ID for provenance
pub struct ReportEncoder {
    instance_id: String,
}

impl Default for ReportEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportEncoder {
    /// Create an encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    /// Assemble analyzer outputs into a report
    #[allow(clippy::too_many_arguments)]
    pub fn encode(
        &self,
        user_id: &str,
        window_start: NaiveDate,
        window_end: NaiveDate,
        data_points: usize,
        signals: DerivedSignals,
        stability: StabilityResult,
        correlation: CorrelationResult,
        habits: HabitReport,
    ) -> AnalysisReport {
        AnalysisReport {
            report_version: REPORT_VERSION.to_string(),
            producer: ReportProducer {
                name: PRODUCER_NAME.to_string(),
                version: ENGINE_VERSION.to_string(),
                instance_id: self.instance_id.clone(),
            },
            user_id: user_id.to_string(),
            window_start,
            window_end,
            computed_at_utc: Utc::now().to_rfc3339(),
            data_points,
            signals,
            stability,
            correlation,
            habits,
        }
    }
}

impl AnalysisReport {
    /// Serialize the report to pretty JSON
    pub fn to_json(&self) -> Result<String, AnalysisError> {
        serde_json::to_string_pretty(self).map_err(AnalysisError::JsonError)
    }

    /// Parse a report from JSON
    pub fn from_json(json: &str) -> Result<Self, AnalysisError> {
        serde_json::from_str(json).map_err(AnalysisError::JsonError)
    }
}
