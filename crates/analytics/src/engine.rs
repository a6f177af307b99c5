use crate::error::AnalyticsError;
use crate::summary::ScoreSummary;
use core_types::ExamResultRecord;

/// A stateless calculator for deriving descriptive statistics from a
/// filtered record set.
#[derive(Debug, Default)]
pub struct StatisticsEngine {}

impl StatisticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes `{total, mean, max, min, std_dev}` over `percent_correct`.
    ///
    /// The input must be non-empty: validating that precondition is the
    /// responsibility of the caller composing the pipeline, and calling this
    /// on an empty set is an `EmptyInput` error rather than a degenerate
    /// all-zero summary. Computation happens at full precision; rounding is
    /// applied by the caller at the display boundary via
    /// [`ScoreSummary::rounded`].
    pub fn compute(&self, records: &[ExamResultRecord]) -> Result<ScoreSummary, AnalyticsError> {
        if records.is_empty() {
            return Err(AnalyticsError::EmptyInput);
        }

        let n = records.len();
        let scores: Vec<f64> = records.iter().map(|r| r.percent_correct).collect();

        let sum: f64 = scores.iter().sum();
        let mean = sum / n as f64;

        let max = scores.iter().copied().fold(f64::MIN, f64::max);
        let min = scores.iter().copied().fold(f64::MAX, f64::min);

        // Sample standard deviation: undefined for a single record.
        let std_dev = if n < 2 {
            None
        } else {
            let variance = scores
                .iter()
                .map(|score| {
                    let deviation = score - mean;
                    deviation * deviation
                })
                .sum::<f64>()
                / (n - 1) as f64;
            Some(variance.sqrt())
        };

        Ok(ScoreSummary {
            total: n,
            mean,
            max,
            min,
            std_dev,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn record(pct: f64) -> ExamResultRecord {
        ExamResultRecord {
            timestamp: NaiveDateTime::parse_from_str("2025-03-01 10:00:00", "%Y-%m-%d %H:%M:%S")
                .unwrap()
                .and_utc(),
            student_id: "s1".to_string(),
            exam_id: "E1".to_string(),
            percent_correct: pct,
        }
    }

    #[test]
    fn five_record_scenario_matches_expected_summary() {
        let records: Vec<_> = [60.0, 70.0, 80.0, 90.0, 100.0]
            .iter()
            .map(|&p| record(p))
            .collect();

        let summary = StatisticsEngine::new().compute(&records).unwrap().rounded();
        assert_eq!(summary.total, 5);
        assert_eq!(summary.mean, 80.0);
        assert_eq!(summary.max, 100.0);
        assert_eq!(summary.min, 60.0);
        assert_eq!(summary.std_dev, Some(15.81));
    }

    #[test]
    fn single_record_collapses_to_its_score_with_undefined_std_dev() {
        let records = vec![record(73.5)];

        let summary = StatisticsEngine::new().compute(&records).unwrap();
        assert_eq!(summary.total, 1);
        assert_eq!(summary.mean, 73.5);
        assert_eq!(summary.max, 73.5);
        assert_eq!(summary.min, 73.5);
        assert_eq!(summary.std_dev, None);
    }

    #[test]
    fn empty_input_is_an_error_not_a_zero_summary() {
        assert_eq!(
            StatisticsEngine::new().compute(&[]).unwrap_err(),
            AnalyticsError::EmptyInput
        );
    }

    #[test]
    fn rounding_only_applies_at_the_display_boundary() {
        let records: Vec<_> = [33.333, 66.667].iter().map(|&p| record(p)).collect();

        let summary = StatisticsEngine::new().compute(&records).unwrap();
        // Full precision internally...
        assert!((summary.mean - 50.0).abs() < 1e-9);
        assert!(summary.std_dev.unwrap().fract() != 0.0);
        // ...two decimals once rounded.
        let rounded = summary.rounded();
        assert_eq!(rounded.mean, 50.0);
        assert_eq!(rounded.std_dev, Some(23.57));
    }
}
