use serde::{Deserialize, Serialize};

/// Descriptive statistics over the score column of one filtered record set.
///
/// This struct is the output of the `StatisticsEngine` and the data transfer
/// object for summary results throughout the system. Values are held at full
/// precision; callers that display or export a summary go through
/// [`ScoreSummary::rounded`] so every surface shows the same two-decimal
/// figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSummary {
    /// Number of records the summary was computed over.
    pub total: usize,
    pub mean: f64,
    pub max: f64,
    pub min: f64,
    /// Sample standard deviation (Bessel's correction, n - 1 denominator).
    /// `None` when fewer than two records exist: the quantity is undefined
    /// there and must be reported as such, never as zero.
    pub std_dev: Option<f64>,
}

impl ScoreSummary {
    /// Returns a copy with every statistic rounded to two decimal places.
    pub fn rounded(&self) -> Self {
        Self {
            total: self.total,
            mean: round2(self.mean),
            max: round2(self.max),
            min: round2(self.min),
            std_dev: self.std_dev.map(round2),
        }
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
