//! Analysis windows
//!
//! An [`AnalysisWindow`] is a validated, ordered, gap-aware sequence of
//! [`HealthLogEntry`] records for one user. Construction enforces the window
//! invariant (strictly increasing, unique dates) so the analyzers can assume
//! it downstream.

use crate::error::AnalysisError;
use crate::types::HealthLogEntry;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Validated, date-ordered snapshot of one user's health log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<HealthLogEntry>", into = "Vec<HealthLogEntry>")]
pub struct AnalysisWindow {
    entries: Vec<HealthLogEntry>,
}

impl AnalysisWindow {
    /// Create a window from entries already ordered by date.
    ///
    /// Fails with `InvalidWindow` if dates are non-monotonic or duplicated.
    pub fn new(entries: Vec<HealthLogEntry>) -> Result<Self, AnalysisError> {
        for pair in entries.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(AnalysisError::InvalidWindow(format!(
                    "dates must be strictly increasing: {} followed by {}",
                    pair[0].date, pair[1].date
                )));
            }
        }
        Ok(Self { entries })
    }

    /// Create a window from entries in arbitrary order.
    ///
    /// Sorts by date; duplicate dates still fail with `InvalidWindow`.
    pub fn from_unsorted(mut entries: Vec<HealthLogEntry>) -> Result<Self, AnalysisError> {
        entries.sort_by_key(|e| e.date);
        Self::new(entries)
    }

    /// Parse a window from a JSON array of entries (arbitrary order)
    pub fn from_json(json: &str) -> Result<Self, AnalysisError> {
        let entries: Vec<HealthLogEntry> = serde_json::from_str(json)?;
        Self::from_unsorted(entries)
    }

    /// Serialize the window to a JSON array of entries
    pub fn to_json(&self) -> Result<String, AnalysisError> {
        serde_json::to_string(&self.entries).map_err(AnalysisError::JsonError)
    }

    /// Restrict the window to the last `n` calendar days, counted back from
    /// the most recent entry
    pub fn last_n_days(&self, n: u32) -> Self {
        match self.end_date() {
            Some(end) => {
                let cutoff = end - chrono::Duration::days(i64::from(n.saturating_sub(1)));
                Self {
                    entries: self
                        .entries
                        .iter()
                        .filter(|e| e.date >= cutoff)
                        .cloned()
                        .collect(),
                }
            }
            None => self.clone(),
        }
    }

    /// Re-check the ordering invariant.
    ///
    /// Construction already enforces it; analyzers call this defensively so a
    /// violation surfaces as `InvalidWindow` instead of a wrong result.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        for pair in self.entries.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(AnalysisError::InvalidWindow(format!(
                    "dates must be strictly increasing: {} followed by {}",
                    pair[0].date, pair[1].date
                )));
            }
        }
        Ok(())
    }

    pub fn entries(&self) -> &[HealthLogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Date of the earliest entry
    pub fn start_date(&self) -> Option<NaiveDate> {
        self.entries.first().map(|e| e.date)
    }

    /// Date of the most recent entry
    pub fn end_date(&self) -> Option<NaiveDate> {
        self.entries.last().map(|e| e.date)
    }

    /// Calendar span of the window in days (last - first + 1), 0 when empty
    pub fn span_days(&self) -> u32 {
        match (self.start_date(), self.end_date()) {
            (Some(start), Some(end)) => ((end - start).num_days() + 1) as u32,
            _ => 0,
        }
    }

    /// Day-over-day weight change per entry.
    ///
    /// `delta[i]` is the difference between entry `i` and the previous entry,
    /// defined only when both carry a weight. Index 0 is always `None`.
    pub fn weight_deltas(&self) -> Vec<Option<f64>> {
        let mut deltas = vec![None; self.entries.len()];
        for i in 1..self.entries.len() {
            if let (Some(prev), Some(curr)) =
                (self.entries[i - 1].weight_kg, self.entries[i].weight_kg)
            {
                deltas[i] = Some(curr - prev);
            }
        }
        deltas
    }
}

impl TryFrom<Vec<HealthLogEntry>> for AnalysisWindow {
    type Error = AnalysisError;

    fn try_from(entries: Vec<HealthLogEntry>) -> Result<Self, Self::Error> {
        Self::from_unsorted(entries)
    }
}

impl From<AnalysisWindow> for Vec<HealthLogEntry> {
    fn from(window: AnalysisWindow) -> Self {
        window.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn entry(day: u32, weight: Option<f64>) -> HealthLogEntry {
        HealthLogEntry {
            weight_kg: weight,
            ..HealthLogEntry::new(date(day))
        }
    }

    #[test]
    fn test_rejects_duplicate_dates() {
        let result = AnalysisWindow::new(vec![entry(1, None), entry(1, None)]);
        assert!(matches!(result, Err(AnalysisError::InvalidWindow(_))));
    }

    #[test]
    fn test_rejects_decreasing_dates() {
        let result = AnalysisWindow::new(vec![entry(5, None), entry(3, None)]);
        assert!(matches!(result, Err(AnalysisError::InvalidWindow(_))));
    }

    #[test]
    fn test_from_unsorted_orders_entries() {
        let window =
            AnalysisWindow::from_unsorted(vec![entry(5, None), entry(1, None), entry(3, None)])
                .unwrap();
        assert_eq!(window.start_date(), Some(date(1)));
        assert_eq!(window.end_date(), Some(date(5)));
        assert_eq!(window.span_days(), 5);
    }

    #[test]
    fn test_last_n_days_truncates() {
        let window = AnalysisWindow::new(vec![
            entry(1, None),
            entry(5, None),
            entry(9, None),
            entry(10, None),
        ])
        .unwrap();

        let recent = window.last_n_days(6);
        assert_eq!(recent.len(), 3);
        assert_eq!(recent.start_date(), Some(date(5)));
    }

    #[test]
    fn test_weight_deltas_skip_missing() {
        let window = AnalysisWindow::new(vec![
            entry(1, Some(80.0)),
            entry(2, Some(79.5)),
            entry(3, None),
            entry(4, Some(79.0)),
        ])
        .unwrap();

        let deltas = window.weight_deltas();
        assert_eq!(deltas[0], None);
        assert!((deltas[1].unwrap() - (-0.5)).abs() < 1e-9);
        assert_eq!(deltas[2], None);
        // Entry 4 has no weighted predecessor on the immediately previous entry
        assert_eq!(deltas[3], None);
    }

    #[test]
    fn test_json_round_trip() {
        let window = AnalysisWindow::new(vec![entry(1, Some(80.0)), entry(2, None)]).unwrap();
        let json = window.to_json().unwrap();
        let loaded = AnalysisWindow::from_json(&json).unwrap();
        assert_eq!(window, loaded);
    }
}
