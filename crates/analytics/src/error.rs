use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AnalyticsError {
    #[error("Cannot compute statistics over an empty record set")]
    EmptyInput,

    #[error("An exam filter was supplied but selects no exams")]
    EmptyExamSelection,

    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
}
