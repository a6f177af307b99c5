use crate::error::ExportError;
use crate::TIMESTAMP_FORMAT;
use analytics::ScoreSummary;
use charting::ChartImage;
use core_types::ExamResultRecord;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

// A4 portrait, in points.
const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 40.0;
/// Fixed content width the chart is scaled to, regardless of its pixel size.
const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;

const TITLE_SIZE: f32 = 16.0;
const STAT_SIZE: f32 = 12.0;
const LINE_SIZE: f32 = 10.0;
const LINE_LEADING: f32 = 14.0;

/// Builds the paginated PDF report.
///
/// Page 1 carries the title, one labeled line per statistic, and the chart
/// image scaled to the fixed content width. The following pages list every
/// record, one line each, in the order the records were given; page breaks
/// happen whenever the cursor reaches the bottom margin. The document
/// carries no generation timestamp, so identical input yields identical
/// bytes.
pub fn render_document(
    records: &[ExamResultRecord],
    summary: &ScoreSummary,
    chart: &ChartImage,
) -> Result<Vec<u8>, ExportError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold_font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });

    // The chart arrives as PNG; PDF wants the raw samples.
    let pixels = image::load_from_memory(&chart.png)?.to_rgb8();
    let (image_width, image_height) = pixels.dimensions();
    let image_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => image_width as i64,
            "Height" => image_height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        },
        pixels.into_raw(),
    ));

    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular_font_id,
            "F2" => bold_font_id,
        },
        "XObject" => dictionary! {
            "Im1" => image_id,
        },
    });

    let mut page_ids: Vec<Object> = Vec::new();

    // --- Page 1: title, statistics, chart ---
    let mut ops: Vec<Operation> = Vec::new();
    let title = "Reporte Estadístico de Evaluaciones";
    let title_x = (PAGE_WIDTH - approximate_text_width(title, TITLE_SIZE)) / 2.0;
    push_text(&mut ops, "F2", TITLE_SIZE, title_x, PAGE_HEIGHT - MARGIN - TITLE_SIZE, title);

    let rounded = summary.rounded();
    let std_dev_line = match rounded.std_dev {
        Some(value) => format!("Desviación estándar: {value:.2}"),
        None => "Desviación estándar: no definida (menos de dos registros)".to_string(),
    };
    let stat_lines = [
        format!("Total Exámenes: {}", rounded.total),
        format!("Promedio (%): {:.2}", rounded.mean),
        format!("Máximo (%): {:.2}", rounded.max),
        format!("Mínimo (%): {:.2}", rounded.min),
        std_dev_line,
    ];
    let mut cursor = PAGE_HEIGHT - MARGIN - 50.0;
    for line in &stat_lines {
        push_text(&mut ops, "F1", STAT_SIZE, MARGIN, cursor, line);
        cursor -= 20.0;
    }

    // Chart scaled to the fixed content width, anchored below the statistics.
    let scale = CONTENT_WIDTH / image_width as f32;
    let drawn_height = image_height as f32 * scale;
    let image_bottom = cursor - drawn_height;
    ops.push(Operation::new("q", vec![]));
    ops.push(Operation::new(
        "cm",
        vec![
            CONTENT_WIDTH.into(),
            0.into(),
            0.into(),
            drawn_height.into(),
            MARGIN.into(),
            image_bottom.into(),
        ],
    ));
    ops.push(Operation::new("Do", vec!["Im1".into()]));
    ops.push(Operation::new("Q", vec![]));

    page_ids.push(add_page(&mut doc, pages_id, ops)?);

    // --- Pages 2+: the per-record listing ---
    let top = PAGE_HEIGHT - MARGIN - STAT_SIZE;
    let mut ops: Vec<Operation> = Vec::new();
    push_text(&mut ops, "F2", STAT_SIZE, MARGIN, top, "Resultados Individuales");
    let mut cursor = top - 24.0;

    for record in records {
        if cursor < MARGIN {
            page_ids.push(add_page(&mut doc, pages_id, std::mem::take(&mut ops))?);
            cursor = top;
        }
        let line = format!(
            "{} | {} | {} | {:.2}%",
            record.timestamp.format(TIMESTAMP_FORMAT),
            record.student_id,
            record.exam_id,
            record.percent_correct,
        );
        push_text(&mut ops, "F1", LINE_SIZE, MARGIN, cursor, &line);
        cursor -= LINE_LEADING;
    }
    if !ops.is_empty() {
        page_ids.push(add_page(&mut doc, pages_id, ops)?);
    }

    let page_count = page_ids.len() as i64;
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => page_ids,
        "Count" => page_count,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}

fn add_page(
    doc: &mut Document,
    pages_id: lopdf::ObjectId,
    ops: Vec<Operation>,
) -> Result<Object, ExportError> {
    let content = Content { operations: ops };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });
    Ok(page_id.into())
}

fn push_text(ops: &mut Vec<Operation>, font: &str, size: f32, x: f32, y: f32, text: &str) {
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new("Tf", vec![font.into(), size.into()]));
    ops.push(Operation::new("Td", vec![x.into(), y.into()]));
    ops.push(Operation::new(
        "Tj",
        vec![Object::string_literal(encode_win_ansi(text))],
    ));
    ops.push(Operation::new("ET", vec![]));
}

/// Maps the label strings onto WinAnsi bytes. The Latin-1 block covers every
/// accented character the labels use; anything outside it degrades to '?'.
fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| {
            let code = ch as u32;
            if code <= 0xFF {
                code as u8
            } else {
                b'?'
            }
        })
        .collect()
}

/// Helvetica metrics without embedding the font program: a flat average
/// glyph width is close enough for centering the one title line.
fn approximate_text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;
    use analytics::StatisticsEngine;
    use charting::render_overview;
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

    fn render(records: &[ExamResultRecord]) -> Vec<u8> {
        let summary = StatisticsEngine::new().compute(records).unwrap();
        let chart = render_overview(records).unwrap();
        render_document(records, &summary, &chart).unwrap()
    }

    #[test]
    fn document_is_a_pdf_with_statistics_and_listing_pages() {
        let bytes = render(&[record("s1", 80.0), record("s2", 60.0)]);
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let parsed = Document::load_mem(&bytes).unwrap();
        assert_eq!(parsed.get_pages().len(), 2);
    }

    #[test]
    fn long_listings_spill_onto_additional_pages() {
        let few: Vec<_> = (0..3).map(|i| record(&format!("s{i}"), 70.0)).collect();
        let many: Vec<_> = (0..200).map(|i| record(&format!("s{i}"), 70.0)).collect();

        let few_pages = Document::load_mem(&render(&few)).unwrap().get_pages().len();
        let many_pages = Document::load_mem(&render(&many)).unwrap().get_pages().len();
        assert_eq!(few_pages, 2);
        assert!(many_pages > few_pages);
    }

    #[test]
    fn document_generation_is_deterministic() {
        let records = vec![record("s1", 55.5), record("s2", 91.0), record("s3", 73.25)];
        assert_eq!(render(&records), render(&records));
    }
}
