use crate::error::CoreError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::BTreeSet;

/// One evaluated exam attempt, as persisted by the grading pipeline.
///
/// Records are created externally and are read-only from this system's
/// perspective. The `timestamp` is the moment of evaluation and is the source
/// of the global newest-first ordering as well as of date-range filtering.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct ExamResultRecord {
    pub timestamp: DateTime<Utc>,
    /// Opaque student identifier. Not unique across records: a student may
    /// retake an exam, producing several records with the same id.
    pub student_id: String,
    /// Opaque exam identifier, used for categorical filtering.
    pub exam_id: String,
    /// Score in percent, expected to lie within [0, 100].
    pub percent_correct: f64,
}

impl ExamResultRecord {
    /// Checks the data-quality invariant on the score column.
    ///
    /// A violating record is a data-quality error surfaced to the caller,
    /// never silently dropped.
    pub fn validate(&self) -> Result<(), CoreError> {
        if !self.percent_correct.is_finite()
            || self.percent_correct < 0.0
            || self.percent_correct > 100.0
        {
            return Err(CoreError::ScoreOutOfRange {
                student_id: self.student_id.clone(),
                exam_id: self.exam_id.clone(),
                value: self.percent_correct,
            });
        }
        Ok(())
    }
}

/// An inclusive calendar-date range. Both bounds are compared against the
/// calendar date of each record's timestamp, not the full timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Derives the widest range covered by a record set, i.e. the calendar
    /// dates of its earliest and latest timestamps. This is the default range
    /// presented to callers before they narrow it. Returns `None` for an
    /// empty set, which has no meaningful bounds.
    pub fn spanning(records: &[ExamResultRecord]) -> Option<Self> {
        let min = records.iter().map(|r| r.timestamp).min()?;
        let max = records.iter().map(|r| r.timestamp).max()?;
        Some(Self {
            start: min.date_naive(),
            end: max.date_naive(),
        })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// The filter a caller applies to the loaded result set.
///
/// `exam_ids` of `None` means "no exam predicate" (all exams pass). A
/// present-but-empty set is a caller input error: it would silently match
/// nothing, so the filter engine rejects it at the boundary instead of
/// correcting it implicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub exam_ids: Option<BTreeSet<String>>,
    pub date_range: DateRange,
}

impl FilterCriteria {
    pub fn all_exams(date_range: DateRange) -> Self {
        Self {
            exam_ids: None,
            date_range,
        }
    }
}

/// The authentication state of the single operator session.
///
/// Created at login, cleared at logout, never persisted. It is passed into
/// the boundary explicitly rather than held in ambient process state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub authenticated: bool,
    pub user: Option<String>,
}

impl AuthSession {
    pub fn logged_out() -> Self {
        Self::default()
    }

    pub fn logged_in(user: impl Into<String>) -> Self {
        Self {
            authenticated: true,
            user: Some(user.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn record(ts: &str, student: &str, exam: &str, pct: f64) -> ExamResultRecord {
        ExamResultRecord {
            timestamp: NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S")
                .unwrap()
                .and_utc(),
            student_id: student.to_string(),
            exam_id: exam.to_string(),
            percent_correct: pct,
        }
    }

    #[test]
    fn validate_accepts_boundary_scores() {
        assert!(record("2025-03-01 10:00:00", "s1", "E1", 0.0).validate().is_ok());
        assert!(record("2025-03-01 10:00:00", "s1", "E1", 100.0).validate().is_ok());
    }

    #[test]
    fn validate_rejects_out_of_range_scores() {
        assert!(record("2025-03-01 10:00:00", "s1", "E1", 100.5).validate().is_err());
        assert!(record("2025-03-01 10:00:00", "s1", "E1", -1.0).validate().is_err());
        assert!(record("2025-03-01 10:00:00", "s1", "E1", f64::NAN).validate().is_err());
    }

    #[test]
    fn spanning_covers_earliest_and_latest_dates() {
        let records = vec![
            record("2025-03-05 09:00:00", "s1", "E1", 80.0),
            record("2025-03-01 23:59:59", "s2", "E1", 90.0),
            record("2025-03-03 12:00:00", "s3", "E2", 70.0),
        ];
        let range = DateRange::spanning(&records).unwrap();
        assert_eq!(range.start, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert_eq!(range.end, NaiveDate::from_ymd_opt(2025, 3, 5).unwrap());
    }

    #[test]
    fn spanning_of_empty_set_is_none() {
        assert!(DateRange::spanning(&[]).is_none());
    }
}
