use crate::error::ChartError;
use crate::glyphs::{self, Canvas};
use core_types::ExamResultRecord;
use image::{ImageBuffer, Rgba};

const WIDTH: u32 = 1200;
const HEIGHT: u32 = 460;

/// Number of equal-width histogram bins over the observed score range.
const HISTOGRAM_BINS: usize = 10;

const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);
const AXIS: Rgba<u8> = Rgba([60, 60, 60, 255]);
const LABEL: Rgba<u8> = Rgba([30, 30, 30, 255]);
// Bar fills follow the original panel: sky blue distribution, light green ranking.
const HISTOGRAM_FILL: Rgba<u8> = Rgba([135, 206, 235, 255]);
const HISTOGRAM_EDGE: Rgba<u8> = Rgba([40, 70, 90, 255]);
const RANKING_FILL: Rgba<u8> = Rgba([144, 238, 144, 255]);

/// Geometry of one chart panel: the plot rectangle the bars live in.
struct Panel {
    left: u32,
    right: u32,
    top: u32,
    bottom: u32,
}

impl Panel {
    fn width(&self) -> u32 {
        self.right - self.left
    }

    fn height(&self) -> u32 {
        self.bottom - self.top
    }
}

/// A finished composite chart: both visualizations rendered side by side
/// into one PNG buffer. Rendering is fully deterministic for a given input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartImage {
    pub width: u32,
    pub height: u32,
    pub png: Vec<u8>,
}

/// Renders the score-distribution histogram and the per-student ranking bar
/// chart for the given filtered set.
///
/// Bin boundaries span the observed min/max of *this* set and are recomputed
/// on every call; nothing is cached across filter changes. A single-record
/// set degenerates to one populated bin and one bar.
pub fn render_overview(records: &[ExamResultRecord]) -> Result<ChartImage, ChartError> {
    if records.is_empty() {
        return Err(ChartError::EmptyInput);
    }

    let mut canvas: Canvas = ImageBuffer::from_pixel(WIDTH, HEIGHT, BACKGROUND);

    let histogram_panel = Panel {
        left: 70,
        right: 570,
        top: 70,
        bottom: 380,
    };
    let ranking_panel = Panel {
        left: 670,
        right: 1170,
        top: 70,
        bottom: 380,
    };

    draw_histogram(&mut canvas, &histogram_panel, records);
    draw_ranking(&mut canvas, &ranking_panel, records);

    let png = encode_png(canvas)?;
    Ok(ChartImage {
        width: WIDTH,
        height: HEIGHT,
        png,
    })
}

/// Equal-width bins over the observed range of the scores.
pub(crate) struct HistogramBins {
    pub low: f64,
    pub high: f64,
    pub counts: Vec<usize>,
}

pub(crate) fn histogram_bins(scores: &[f64], bin_count: usize) -> HistogramBins {
    let low = scores.iter().copied().fold(f64::MAX, f64::min);
    let high = scores.iter().copied().fold(f64::MIN, f64::max);
    let span = high - low;

    // A zero span (single record, or all scores equal) collapses into one
    // populated bin; computing a bin width would divide by zero.
    if span == 0.0 {
        return HistogramBins {
            low,
            high,
            counts: vec![scores.len()],
        };
    }

    let width = span / bin_count as f64;
    let mut counts = vec![0usize; bin_count];
    for &score in scores {
        let mut index = ((score - low) / width) as usize;
        // The maximum value lands exactly on the upper edge of the last bin.
        if index >= bin_count {
            index = bin_count - 1;
        }
        counts[index] += 1;
    }

    HistogramBins { low, high, counts }
}

fn draw_histogram(canvas: &mut Canvas, panel: &Panel, records: &[ExamResultRecord]) {
    let scores: Vec<f64> = records.iter().map(|r| r.percent_correct).collect();
    let bins = histogram_bins(&scores, HISTOGRAM_BINS);
    let max_count = bins.counts.iter().copied().max().unwrap_or(1).max(1);

    draw_panel_frame(
        canvas,
        panel,
        "Distribución de porcentajes de aciertos",
        "Porcentaje de aciertos",
    );

    let bin_count = bins.counts.len() as u32;
    let slot = panel.width() / bin_count;
    for (i, &count) in bins.counts.iter().enumerate() {
        if count == 0 {
            continue;
        }
        let bar_height = (count as f64 / max_count as f64 * panel.height() as f64) as u32;
        let x = panel.left + i as u32 * slot;
        let y = panel.bottom - bar_height;
        fill_rect(canvas, x + 1, y, slot.saturating_sub(2), bar_height, HISTOGRAM_FILL);
        rect_outline(canvas, x + 1, y, slot.saturating_sub(2), bar_height, HISTOGRAM_EDGE);

        // Count on top of the bar.
        let label = count.to_string();
        let label_x = x + slot / 2 - glyphs::text_width(&label, 1) / 2;
        if y > glyphs::text_height(1) + 2 {
            glyphs::draw_text(canvas, label_x, y - glyphs::text_height(1) - 2, &label, 1, LABEL);
        }
    }

    // Range labels at both ends of the x axis.
    let low_label = format!("{:.0}", bins.low);
    let high_label = format!("{:.0}", bins.high);
    glyphs::draw_text(canvas, panel.left, panel.bottom + 6, &low_label, 1, LABEL);
    let high_x = panel.right - glyphs::text_width(&high_label, 1);
    glyphs::draw_text(canvas, high_x, panel.bottom + 6, &high_label, 1, LABEL);
}

fn draw_ranking(canvas: &mut Canvas, panel: &Panel, records: &[ExamResultRecord]) {
    draw_panel_frame(canvas, panel, "Ranking de desempeño", "Estudiante");

    // Best scores first; ties keep their input order (stable sort), so equal
    // inputs always produce the same bar sequence. Duplicate student ids stay
    // as separate bars.
    let mut ranked: Vec<&ExamResultRecord> = records.iter().collect();
    ranked.sort_by(|a, b| b.percent_correct.total_cmp(&a.percent_correct));

    let n = ranked.len() as u32;
    let slot = (panel.width() / n).max(1);
    for (i, record) in ranked.iter().enumerate() {
        let fraction = (record.percent_correct / 100.0).clamp(0.0, 1.0);
        let bar_height = (fraction * panel.height() as f64) as u32;
        let x = panel.left + i as u32 * slot;
        if x >= panel.right {
            break;
        }
        let y = panel.bottom - bar_height;
        let bar_width = slot.saturating_sub(2).max(1);
        fill_rect(canvas, x + 1, y, bar_width, bar_height, RANKING_FILL);
        rect_outline(canvas, x + 1, y, bar_width, bar_height, AXIS);

        // Score above, student id below; both only when the slot fits them.
        let score_label = format!("{:.0}", record.percent_correct);
        if glyphs::text_width(&score_label, 1) <= bar_width && y > glyphs::text_height(1) + 2 {
            let label_x = x + slot / 2 - glyphs::text_width(&score_label, 1) / 2;
            glyphs::draw_text(canvas, label_x, y - glyphs::text_height(1) - 2, &score_label, 1, LABEL);
        }
        if glyphs::text_width(&record.student_id, 1) <= slot {
            let label_x = x + slot / 2 - glyphs::text_width(&record.student_id, 1) / 2;
            glyphs::draw_text(canvas, label_x, panel.bottom + 6, &record.student_id, 1, LABEL);
        }
    }
}

fn draw_panel_frame(canvas: &mut Canvas, panel: &Panel, title: &str, x_caption: &str) {
    let title_x = panel.left + panel.width() / 2 - glyphs::text_width(title, 2).min(panel.width()) / 2;
    glyphs::draw_text(canvas, title_x, 24, title, 2, LABEL);

    // Axes.
    vline(canvas, panel.left - 1, panel.top, panel.bottom, AXIS);
    hline(canvas, panel.left - 1, panel.right, panel.bottom, AXIS);

    let caption_x = panel.left + panel.width() / 2 - glyphs::text_width(x_caption, 1) / 2;
    glyphs::draw_text(canvas, caption_x, panel.bottom + 24, x_caption, 1, LABEL);
}

fn fill_rect(canvas: &mut Canvas, x: u32, y: u32, w: u32, h: u32, color: Rgba<u8>) {
    for py in y..y.saturating_add(h).min(canvas.height()) {
        for px in x..x.saturating_add(w).min(canvas.width()) {
            canvas.put_pixel(px, py, color);
        }
    }
}

fn rect_outline(canvas: &mut Canvas, x: u32, y: u32, w: u32, h: u32, color: Rgba<u8>) {
    if w == 0 || h == 0 {
        return;
    }
    hline(canvas, x, x + w, y, color);
    hline(canvas, x, x + w, y + h - 1, color);
    vline(canvas, x, y, y + h, color);
    vline(canvas, x + w - 1, y, y + h, color);
}

fn hline(canvas: &mut Canvas, x0: u32, x1: u32, y: u32, color: Rgba<u8>) {
    if y >= canvas.height() {
        return;
    }
    for px in x0..x1.min(canvas.width()) {
        canvas.put_pixel(px, y, color);
    }
}

fn vline(canvas: &mut Canvas, x: u32, y0: u32, y1: u32, color: Rgba<u8>) {
    if x >= canvas.width() {
        return;
    }
    for py in y0..y1.min(canvas.height()) {
        canvas.put_pixel(x, py, color);
    }
}

fn encode_png(canvas: Canvas) -> Result<Vec<u8>, ChartError> {
    let (width, height) = (canvas.width(), canvas.height());
    let mut buffer = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut buffer, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.write_header()?.write_image_data(&canvas.into_raw())?;
    }
    Ok(buffer)
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
    fn bins_span_observed_range_and_count_every_score() {
        let scores = [60.0, 70.0, 80.0, 90.0, 100.0];
        let bins = histogram_bins(&scores, 10);
        assert_eq!(bins.low, 60.0);
        assert_eq!(bins.high, 100.0);
        assert_eq!(bins.counts.len(), 10);
        assert_eq!(bins.counts.iter().sum::<usize>(), scores.len());
        // The maximum lands in the last bin, not out of range.
        assert_eq!(bins.counts[9], 1);
    }

    #[test]
    fn zero_span_collapses_to_a_single_populated_bin() {
        let scores = [85.0, 85.0, 85.0];
        let bins = histogram_bins(&scores, 10);
        assert_eq!(bins.counts, vec![3]);
    }

    #[test]
    fn single_record_renders_without_panicking() {
        let image = render_overview(&[record("s1", 77.0)]).unwrap();
        assert_eq!(image.width, 1200);
        // PNG signature.
        assert_eq!(&image.png[..8], &[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n']);
    }

    #[test]
    fn rendering_is_deterministic() {
        let records = vec![record("s1", 60.0), record("s2", 95.5), record("s1", 72.25)];
        let first = render_overview(&records).unwrap();
        let second = render_overview(&records).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(render_overview(&[]), Err(ChartError::EmptyInput)));
    }
}
