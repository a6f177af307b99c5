use crate::csv::COLUMNS;
use crate::error::ExportError;
use crate::TIMESTAMP_FORMAT;
use core_types::ExamResultRecord;
use rust_xlsxwriter::{DocProperties, ExcelDateTime, Workbook};

/// Builds the single-worksheet workbook export.
///
/// Column set and order are identical to the delimited-text export; no
/// styling is applied beyond data fidelity. The creation timestamp in the
/// document properties is pinned so that identical input yields identical
/// bytes.
pub fn render_workbook(records: &[ExamResultRecord]) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();

    let created = ExcelDateTime::from_ymd(2000, 1, 1)?;
    let properties = DocProperties::new().set_creation_datetime(&created);
    workbook.set_properties(&properties);

    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Resultados")?;

    for (col, header) in COLUMNS.iter().enumerate() {
        worksheet.write(0, col as u16, *header)?;
    }

    for (i, record) in records.iter().enumerate() {
        let row = (i + 1) as u32;
        worksheet.write(row, 0, record.timestamp.format(TIMESTAMP_FORMAT).to_string())?;
        worksheet.write(row, 1, record.student_id.as_str())?;
        worksheet.write(row, 2, record.exam_id.as_str())?;
        worksheet.write(row, 3, record.percent_correct)?;
    }

    let bytes = workbook.save_to_buffer()?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn record(student: &str, pct: f64) -> ExamResultRecord {
        ExamResultRecord {
            timestamp: NaiveDateTime::parse_from_str("2025-03-01 10:00:00", "%Y-%m-%d %H:%M:%S")
                .unwrap()
                .and_utc(),
            student_id: student.to_string(),
            exam_id: "E1".to_string(),
            percent_correct: pct,
        }
    }

    #[test]
    fn workbook_bytes_are_a_zip_container() {
        let bytes = render_workbook(&[record("s1", 80.0)]).unwrap();
        // XLSX is a ZIP archive; check the local-file-header magic.
        assert_eq!(&bytes[..4], b"PK\x03\x04");
    }

    #[test]
    fn workbook_generation_is_deterministic() {
        let records = vec![record("s1", 80.0), record("s2", 61.5)];
        let first = render_workbook(&records).unwrap();
        let second = render_workbook(&records).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn empty_record_set_still_produces_a_header_only_sheet() {
        let bytes = render_workbook(&[]).unwrap();
        assert!(!bytes.is_empty());
    }
}
