use crate::TIMESTAMP_FORMAT;
use core_types::ExamResultRecord;

/// Column order shared by the delimited-text and spreadsheet exports.
pub const COLUMNS: [&str; 4] = ["timestamp", "student_id", "exam_id", "percent_correct"];

/// Serializes the filtered set as delimited text: a header row followed by
/// one row per record, in the order the records were given.
pub fn render_csv(records: &[ExamResultRecord]) -> String {
    let mut csv = String::new();
    csv.push_str(&COLUMNS.join(","));
    csv.push('\n');

    for record in records {
        let row = [
            record.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            record.student_id.clone(),
            record.exam_id.clone(),
            format!("{:.2}", record.percent_correct),
        ];
        let line = row
            .iter()
            .map(|field| escape_field(field))
            .collect::<Vec<_>>()
            .join(",");
        csv.push_str(&line);
        csv.push('\n');
    }

    csv
}

fn escape_field(value: &str) -> String {
    let needs_quotes = value.contains(',')
        || value.contains('"')
        || value.contains('\n')
        || value.contains('\r');
    if needs_quotes {
        let escaped = value.replace('"', "\"\"");
        format!("\"{escaped}\"")
    } else {
        value.to_string()
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
    fn header_and_row_order_match_the_input() {
        let records = vec![
            record("2025-03-05 10:30:00", "s1", "E1", 72.25),
            record("2025-03-01 08:00:00", "s2", "E2", 100.0),
        ];

        let csv = render_csv(&records);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "timestamp,student_id,exam_id,percent_correct");
        assert_eq!(lines[1], "2025-03-05 10:30:00,s1,E1,72.25");
        assert_eq!(lines[2], "2025-03-01 08:00:00,s2,E2,100.00");
    }

    #[test]
    fn round_trip_preserves_every_tuple() {
        let records = vec![
            record("2025-03-05 10:30:00", "s1", "E1", 72.25),
            record("2025-03-04 09:00:00", "s2", "E1", 60.0),
            record("2025-03-01 08:00:00", "s3", "E2", 99.99),
        ];

        let csv = render_csv(&records);
        for (line, original) in csv.lines().skip(1).zip(&records) {
            let fields: Vec<&str> = line.split(',').collect();
            assert_eq!(fields.len(), 4);
            let timestamp = NaiveDateTime::parse_from_str(fields[0], TIMESTAMP_FORMAT)
                .unwrap()
                .and_utc();
            assert_eq!(timestamp, original.timestamp);
            assert_eq!(fields[1], original.student_id);
            assert_eq!(fields[2], original.exam_id);
            let pct: f64 = fields[3].parse().unwrap();
            assert!((pct - original.percent_correct).abs() < 0.005);
        }
    }

    #[test]
    fn fields_containing_the_delimiter_are_quoted() {
        let records = vec![record("2025-03-05 10:30:00", "last, first", "E\"1", 50.0)];

        let csv = render_csv(&records);
        let line = csv.lines().nth(1).unwrap();
        assert!(line.contains("\"last, first\""));
        assert!(line.contains("\"E\"\"1\""));
    }
}
