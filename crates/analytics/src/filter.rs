use crate::error::AnalyticsError;
use core_types::{ExamResultRecord, FilterCriteria};

/// Narrows the loaded result set to the records matching the criteria.
///
/// A record passes when its `exam_id` is in the criteria's exam set (no exam
/// predicate is applied when the set is absent) AND the calendar date of its
/// timestamp falls within the inclusive date range. The input order is
/// preserved, which keeps the datastore's newest-first ordering intact.
///
/// Two criteria shapes are caller input errors and are rejected here rather
/// than corrected implicitly: a present-but-empty exam set, and a date range
/// whose start is after its end. An empty *result* is not an error; callers
/// must treat "no matches" as a distinct informational state.
pub fn apply_filters(
    records: &[ExamResultRecord],
    criteria: &FilterCriteria,
) -> Result<Vec<ExamResultRecord>, AnalyticsError> {
    if let Some(exam_ids) = &criteria.exam_ids {
        if exam_ids.is_empty() {
            return Err(AnalyticsError::EmptyExamSelection);
        }
    }

    let range = criteria.date_range;
    if range.start > range.end {
        return Err(AnalyticsError::InvalidDateRange {
            start: range.start,
            end: range.end,
        });
    }

    let filtered = records
        .iter()
        .filter(|record| {
            let exam_matches = match &criteria.exam_ids {
                Some(exam_ids) => exam_ids.contains(&record.exam_id),
                None => true,
            };
            exam_matches && range.contains(record.timestamp.date_naive())
        })
        .cloned()
        .collect();

    Ok(filtered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use core_types::DateRange;
    use std::collections::BTreeSet;

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

    fn sample_records() -> Vec<ExamResultRecord> {
        vec![
            record("2025-03-05 10:00:00", "s1", "E1", 60.0),
            record("2025-03-04 10:00:00", "s2", "E2", 70.0),
            record("2025-03-03 10:00:00", "s3", "E1", 80.0),
            record("2025-03-02 10:00:00", "s1", "E3", 90.0),
            record("2025-03-01 10:00:00", "s4", "E1", 100.0),
        ]
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn criteria(exams: Option<&[&str]>, from: &str, to: &str) -> FilterCriteria {
        FilterCriteria {
            exam_ids: exams.map(|ids| {
                ids.iter()
                    .map(|s| s.to_string())
                    .collect::<BTreeSet<String>>()
            }),
            date_range: DateRange::new(date(from), date(to)),
        }
    }

    #[test]
    fn every_match_satisfies_both_predicates_and_order_is_preserved() {
        let records = sample_records();
        let c = criteria(Some(&["E1"]), "2025-03-01", "2025-03-04");

        let filtered = apply_filters(&records, &c).unwrap();
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|r| r.exam_id == "E1"));
        // Newest-first input order survives filtering.
        assert_eq!(filtered[0].student_id, "s3");
        assert_eq!(filtered[1].student_id, "s4");
    }

    #[test]
    fn filtering_is_idempotent() {
        let records = sample_records();
        let c = criteria(Some(&["E1", "E2"]), "2025-03-02", "2025-03-05");

        let once = apply_filters(&records, &c).unwrap();
        let twice = apply_filters(&once, &c).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn absent_exam_set_applies_no_exam_predicate() {
        let records = sample_records();
        let c = criteria(None, "2025-03-01", "2025-03-05");

        let filtered = apply_filters(&records, &c).unwrap();
        assert_eq!(filtered.len(), records.len());
    }

    #[test]
    fn date_bounds_are_inclusive() {
        let records = sample_records();
        let c = criteria(None, "2025-03-01", "2025-03-01");

        let filtered = apply_filters(&records, &c).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].student_id, "s4");
    }

    #[test]
    fn zero_matches_is_an_empty_sequence_not_an_error() {
        let records = sample_records();
        let c = criteria(Some(&["E9"]), "2025-03-01", "2025-03-05");

        let filtered = apply_filters(&records, &c).unwrap();
        assert!(filtered.is_empty());
    }

    #[test]
    fn empty_exam_selection_is_rejected() {
        let records = sample_records();
        let c = criteria(Some(&[]), "2025-03-01", "2025-03-05");

        assert_eq!(
            apply_filters(&records, &c).unwrap_err(),
            AnalyticsError::EmptyExamSelection
        );
    }

    #[test]
    fn inverted_date_range_is_rejected() {
        let records = sample_records();
        let c = criteria(None, "2025-03-05", "2025-03-01");

        assert!(matches!(
            apply_filters(&records, &c).unwrap_err(),
            AnalyticsError::InvalidDateRange { .. }
        ));
    }
}
