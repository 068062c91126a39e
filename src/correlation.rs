//! Behavior-outcome correlation analysis
//!
//! Computes pairwise Pearson correlations between behavior metrics and the
//! outcome metric (day-over-day weight change), ranks candidate root causes,
//! and emits templated insight strings.
//!
//! Correlations are pairwise-complete: each coefficient is computed over the
//! subset of days where both series have values. Zero-variance series are
//! reported as a coefficient of 0, never as NaN.

use crate::config::EngineConfig;
use crate::error::AnalysisError;
use crate::features::FeatureExtractor;
use crate::types::{
    CorrelationResult, EffectDirection, Magnitude, Metric, MetricCorrelation, RootCause,
};
use crate::window::AnalysisWindow;

/// Metrics considered, in canonical pair-enumeration order
const CANDIDATE_METRICS: [Metric; 4] = [
    Metric::SleepHours,
    Metric::ExerciseMinutes,
    Metric::CaloriesConsumed,
    Metric::WeightDelta,
];

/// Maximum number of root causes reported
const MAX_ROOT_CAUSES: usize = 3;

/// Correlation analyzer for root-cause insights
pub struct CorrelationAnalyzer;

impl CorrelationAnalyzer {
    /// Analyze correlations over a window.
    ///
    /// Fails with `InsufficientData` when the window has fewer entries than
    /// the configured minimum (default 10).
    pub fn analyze(
        window: &AnalysisWindow,
        config: &EngineConfig,
    ) -> Result<CorrelationResult, AnalysisError> {
        if window.len() < config.minimums.correlation_entries {
            return Err(AnalysisError::InsufficientData {
                required: config.minimums.correlation_entries,
                actual: window.len(),
            });
        }
        let window_end = window
            .end_date()
            .ok_or_else(|| AnalysisError::InvalidWindow("empty window".to_string()))?;

        let mut correlations = Vec::new();
        for (i, &a) in CANDIDATE_METRICS.iter().enumerate() {
            for &b in &CANDIDATE_METRICS[i + 1..] {
                if let Some(corr) =
                    correlate_pair(window, a, b, config.minimums.paired_observations)
                {
                    correlations.push(corr);
                }
            }
        }

        let root_causes = rank_root_causes(&correlations, &config.correlation);

        let mut insights: Vec<String> = root_causes.iter().map(insight_for).collect();
        // The data-consistency insight reuses the feature extractor rather
        // than duplicating the consistency computation
        let signals = FeatureExtractor::extract(window, config)?;
        insights.push(consistency_insight(
            signals.consistency_score,
            config.correlation.low_consistency_threshold,
        ));

        Ok(CorrelationResult {
            correlations,
            root_causes,
            insights,
            data_points: window.len(),
            window_end,
        })
    }
}

/// Per-entry series for a metric; `None` where the metric was not tracked
fn metric_series(window: &AnalysisWindow, metric: Metric) -> Vec<Option<f64>> {
    match metric {
        Metric::SleepHours => window.entries().iter().map(|e| e.sleep_hours).collect(),
        Metric::ExerciseMinutes => window
            .entries()
            .iter()
            .map(|e| e.exercise_minutes.map(f64::from))
            .collect(),
        Metric::CaloriesConsumed => window
            .entries()
            .iter()
            .map(|e| e.calories_consumed)
            .collect(),
        Metric::WeightDelta => window.weight_deltas(),
    }
}

/// Correlate a metric pair over pairwise-complete observations.
/// Returns `None` when fewer than `min_paired` observations exist.
fn correlate_pair(
    window: &AnalysisWindow,
    a: Metric,
    b: Metric,
    min_paired: usize,
) -> Option<MetricCorrelation> {
    let series_a = metric_series(window, a);
    let series_b = metric_series(window, b);

    let (xs, ys): (Vec<f64>, Vec<f64>) = series_a
        .iter()
        .zip(series_b.iter())
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .unzip();

    if xs.len() < min_paired {
        return None;
    }

    Some(MetricCorrelation {
        pair: (a, b),
        coefficient: pearson(&xs, &ys),
        sample_size: xs.len(),
    })
}

/// Pearson correlation coefficient.
///
/// A zero-variance series yields 0 by definition here, so constant inputs
/// never propagate NaN into results.
pub(crate) fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    debug_assert_eq!(xs.len(), ys.len());
    let n = xs.len() as f64;
    if xs.is_empty() {
        return 0.0;
    }

    let mean_x: f64 = xs.iter().sum::<f64>() / n;
    let mean_y: f64 = ys.iter().sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut variance_x = 0.0;
    let mut variance_y = 0.0;
    for (x, y) in xs.iter().zip(ys.iter()) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        covariance += dx * dy;
        variance_x += dx * dx;
        variance_y += dy * dy;
    }

    if variance_x < 1e-12 || variance_y < 1e-12 {
        return 0.0;
    }

    (covariance / (variance_x.sqrt() * variance_y.sqrt())).clamp(-1.0, 1.0)
}

/// Rank pairs involving the outcome metric into root causes.
///
/// Order: |r| descending, ties by larger sample size, then by fixed metric
/// priority (calories > exercise > sleep). Weak pairs are excluded; at most
/// three are reported.
fn rank_root_causes(
    correlations: &[MetricCorrelation],
    config: &crate::config::CorrelationConfig,
) -> Vec<RootCause> {
    let mut candidates: Vec<RootCause> = correlations
        .iter()
        .filter_map(|c| {
            let metric = match c.pair {
                (m, Metric::WeightDelta) | (Metric::WeightDelta, m) => m,
                _ => return None,
            };
            Some(RootCause {
                metric,
                direction: if c.coefficient >= 0.0 {
                    EffectDirection::Positive
                } else {
                    EffectDirection::Negative
                },
                magnitude: magnitude_bucket(c.coefficient, config),
                coefficient: c.coefficient,
                sample_size: c.sample_size,
            })
        })
        .filter(|rc| rc.magnitude != Magnitude::Weak)
        .collect();

    candidates.sort_by(|a, b| {
        b.coefficient
            .abs()
            .partial_cmp(&a.coefficient.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(b.sample_size.cmp(&a.sample_size))
            .then(a.metric.root_cause_priority().cmp(&b.metric.root_cause_priority()))
    });
    candidates.truncate(MAX_ROOT_CAUSES);
    candidates
}

/// Qualitative strength bucket for a coefficient
fn magnitude_bucket(coefficient: f64, config: &crate::config::CorrelationConfig) -> Magnitude {
    let r = coefficient.abs();
    if r >= config.strong_threshold {
        Magnitude::Strong
    } else if r >= config.moderate_threshold {
        Magnitude::Moderate
    } else {
        Magnitude::Weak
    }
}

fn metric_label(metric: Metric) -> &'static str {
    match metric {
        Metric::SleepHours => "sleep duration",
        Metric::ExerciseMinutes => "exercise time",
        Metric::CaloriesConsumed => "calorie intake",
        Metric::WeightDelta => "weight change",
    }
}

/// Templated insight string for one root cause
fn insight_for(cause: &RootCause) -> String {
    let strength = match cause.magnitude {
        Magnitude::Strong => "strong",
        Magnitude::Moderate => "moderate",
        Magnitude::Weak => "weak",
    };
    let trend = match cause.direction {
        EffectDirection::Positive => "weight gain",
        EffectDirection::Negative => "weight loss",
    };
    format!(
        "Higher {} shows a {} association with {} (r={:+.2}, n={})",
        metric_label(cause.metric),
        strength,
        trend,
        cause.coefficient,
        cause.sample_size
    )
}

/// Data-consistency impact insight derived from the consistency score
fn consistency_insight(consistency_score: f64, threshold: f64) -> String {
    let pct = (consistency_score * 100.0).round();
    if consistency_score < threshold {
        format!(
            "Irregular tracking ({pct:.0}% of days logged) makes patterns harder to detect - log daily for better insights"
        )
    } else {
        format!("Consistent tracking ({pct:.0}% of days logged) supports reliable pattern detection")
    }
}
