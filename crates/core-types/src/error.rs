use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error(
        "Record for student '{student_id}' on exam '{exam_id}' has a score of {value}, \
         which is outside the valid range [0, 100]"
    )]
    ScoreOutOfRange {
        student_id: String,
        exam_id: String,
        value: f64,
    },
}
