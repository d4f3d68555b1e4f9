// PDF report rendering
//
// A4 portrait, built-in Helvetica fonts with WinAnsi encoding. Coordinates are in
// points from the bottom-left corner, as PDF expects.
use crate::domain::summary::DatasetSummary;
use anyhow::Result;
use chrono::{DateTime, Utc};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};

const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN: i64 = 57;
const CONTENT_WIDTH: i64 = PAGE_WIDTH - 2 * MARGIN;
const CELL_PADDING: i64 = 4;

const DATE_FORMAT: &str = "%d %b %Y, %H:%M";

#[derive(Debug, Clone, Copy)]
enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource(self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }
}

struct Column {
    title: &'static str,
    width: i64,
}

const fn column(title: &'static str, width: i64) -> Column {
    Column { title, width }
}

/// Render the full report for a dataset
pub fn render(summary: &DatasetSummary, generated_at: DateTime<Utc>) -> Result<Vec<u8>> {
    let mut pages = PageWriter::new();

    pages.centered_text("Chemical Equipment Report", 20, Font::Bold);
    pages.gap(6);
    pages.centered_text(&format!("Generated from: {}", summary.file_name), 10, Font::Regular);
    pages.centered_text(
        &format!("Upload Date: {}", summary.uploaded_at.format(DATE_FORMAT)),
        10,
        Font::Regular,
    );
    pages.centered_text(
        &format!("Report Generated: {}", generated_at.format(DATE_FORMAT)),
        10,
        Font::Regular,
    );
    pages.gap(6);
    pages.rule();

    pages.section("Summary Statistics");
    pages.table(
        &[column("Metric", 280), column("Value", CONTENT_WIDTH - 280)],
        summary_rows(summary),
        10,
    );

    pages.section("Equipment Type Distribution");
    pages.table(
        &[
            column("Equipment Type", 201),
            column("Count", 140),
            column("Percentage", CONTENT_WIDTH - 341),
        ],
        type_rows(summary),
        10,
    );

    pages.new_page();
    pages.section("Equipment Data");
    pages.table(
        &[
            column("Name", 161),
            column("Type", 80),
            column("Flowrate", 80),
            column("Pressure", 80),
            column("Temperature", CONTENT_WIDTH - 401),
        ],
        record_rows(summary),
        8,
    );

    build_document(pages.finish())
}

fn summary_rows(summary: &DatasetSummary) -> Vec<Vec<String>> {
    vec![
        vec!["Total Equipment".to_string(), summary.total_count.to_string()],
        vec![
            "Average Flowrate".to_string(),
            format!("{:.2} m³/h", summary.average_flowrate),
        ],
        vec![
            "Average Pressure".to_string(),
            format!("{:.2} bar", summary.average_pressure),
        ],
        vec![
            "Average Temperature".to_string(),
            format!("{:.2} °C", summary.average_temperature),
        ],
    ]
}

fn type_rows(summary: &DatasetSummary) -> Vec<Vec<String>> {
    summary
        .type_distribution
        .iter()
        .map(|(label, count)| {
            vec![
                label.clone(),
                count.to_string(),
                format!("{:.1}%", summary.type_percentage(label)),
            ]
        })
        .collect()
}

fn record_rows(summary: &DatasetSummary) -> Vec<Vec<String>> {
    summary
        .records
        .iter()
        .map(|r| {
            vec![
                r.name.clone(),
                r.equipment_type.clone(),
                format_value(r.flowrate, "m³/h"),
                format_value(r.pressure, "bar"),
                format_value(r.temperature, "°C"),
            ]
        })
        .collect()
}

/// At most two fraction digits, trailing zeros dropped
pub fn format_value(value: f64, unit: &str) -> String {
    let fixed = format!("{:.2}", value);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, unit)
}

/// Accumulates content-stream operations page by page with a top-down cursor
struct PageWriter {
    finished: Vec<Vec<Operation>>,
    ops: Vec<Operation>,
    y: i64,
}

impl PageWriter {
    fn new() -> Self {
        Self {
            finished: Vec::new(),
            ops: Vec::new(),
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    fn new_page(&mut self) {
        let ops = std::mem::take(&mut self.ops);
        self.finished.push(ops);
        self.y = PAGE_HEIGHT - MARGIN;
    }

    /// Break the page when fewer than `height` points remain. Returns true on a break.
    fn ensure_space(&mut self, height: i64) -> bool {
        if self.y - height < MARGIN {
            self.new_page();
            return true;
        }
        false
    }

    fn gap(&mut self, height: i64) {
        self.y -= height;
    }

    fn text_at(&mut self, x: i64, baseline: i64, size: i64, font: Font, text: &str) {
        self.ops.extend([
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![font.resource().into(), size.into()]),
            Operation::new("Td", vec![x.into(), baseline.into()]),
            Operation::new("Tj", vec![Object::String(win_ansi(text), StringFormat::Literal)]),
            Operation::new("ET", vec![]),
        ]);
    }

    fn centered_text(&mut self, text: &str, size: i64, font: Font) {
        let line_height = size + size / 2;
        self.ensure_space(line_height);
        self.y -= line_height;
        let x = ((PAGE_WIDTH - text_width(text, size)) / 2).max(MARGIN);
        self.text_at(x, self.y, size, font, text);
    }

    fn section(&mut self, title: &str) {
        // keep a heading together with at least a couple of table rows
        self.ensure_space(80);
        self.y -= 20;
        self.text_at(MARGIN, self.y - 14, 14, Font::Bold, title);
        self.y -= 24;
    }

    fn rule(&mut self) {
        self.line(MARGIN, self.y, PAGE_WIDTH - MARGIN, self.y);
        self.y -= 4;
    }

    fn line(&mut self, x1: i64, y1: i64, x2: i64, y2: i64) {
        self.ops.extend([
            Operation::new("w", vec![Object::Integer(1)]),
            Operation::new("m", vec![x1.into(), y1.into()]),
            Operation::new("l", vec![x2.into(), y2.into()]),
            Operation::new("S", vec![]),
        ]);
    }

    fn row(&mut self, columns: &[Column], cells: &[String], size: i64, font: Font) {
        let row_height = size + 2 * CELL_PADDING + 2;
        let baseline = self.y - row_height + CELL_PADDING + 2;
        let mut x = MARGIN;
        for (column, cell) in columns.iter().zip(cells) {
            let text = fit(cell, column.width - 2 * CELL_PADDING, size);
            self.text_at(x + CELL_PADDING, baseline, size, font, &text);
            x += column.width;
        }
        self.y -= row_height;
        self.line(MARGIN, self.y, MARGIN + table_width(columns), self.y);
    }

    /// Table with its header repeated at the top of every page it spans
    fn table(&mut self, columns: &[Column], rows: Vec<Vec<String>>, size: i64) {
        let row_height = size + 2 * CELL_PADDING + 2;
        let header: Vec<String> = columns.iter().map(|c| c.title.to_string()).collect();

        self.ensure_space(2 * row_height);
        self.header_row(columns, &header, size);

        for cells in rows {
            if self.ensure_space(row_height) {
                self.header_row(columns, &header, size);
            }
            self.row(columns, &cells, size, Font::Regular);
        }
    }

    fn header_row(&mut self, columns: &[Column], header: &[String], size: i64) {
        self.line(MARGIN, self.y, MARGIN + table_width(columns), self.y);
        self.row(columns, header, size, Font::Bold);
    }

    fn finish(mut self) -> Vec<Vec<Operation>> {
        if !self.ops.is_empty() || self.finished.is_empty() {
            self.new_page();
        }
        self.finished
    }
}

fn table_width(columns: &[Column]) -> i64 {
    columns.iter().map(|c| c.width).sum()
}

// Helvetica averages roughly half an em per glyph
fn text_width(text: &str, size: i64) -> i64 {
    text.chars().count() as i64 * size / 2
}

fn fit(text: &str, width: i64, size: i64) -> String {
    let max_chars = (width * 2 / size.max(1)).max(1) as usize;
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut fitted: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    fitted.push_str("...");
    fitted
}

/// Latin-1 subset of WinAnsi; anything outside becomes '?'
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c as u32 {
            code @ 0x20..=0x7E | code @ 0xA0..=0xFF => code as u8,
            _ => b'?',
        })
        .collect()
}

fn build_document(pages: Vec<Vec<Operation>>) -> Result<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            Font::Regular.resource() => regular_id,
            Font::Bold.resource() => bold_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for operations in pages {
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![Object::Integer(0), Object::Integer(0), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::equipment::EquipmentRecord;

    fn dataset(n: usize) -> DatasetSummary {
        let records = (0..n)
            .map(|i| {
                EquipmentRecord::new(
                    format!("r{}", i),
                    format!("Pump-{}", i),
                    if i % 3 == 0 { "Pump" } else { "Valve" }.to_string(),
                    100.0 + i as f64,
                    4.25,
                    30.0,
                )
            })
            .collect();
        DatasetSummary::summarize("plant.csv", records)
    }

    fn page_count(bytes: &[u8]) -> usize {
        Document::load_mem(bytes).unwrap().get_pages().len()
    }

    #[test]
    fn test_small_report_has_summary_and_data_pages() {
        let bytes = render(&dataset(3), Utc::now()).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        assert_eq!(page_count(&bytes), 2);
    }

    #[test]
    fn test_large_report_paginates() {
        let bytes = render(&dataset(200), Utc::now()).unwrap();
        assert!(page_count(&bytes) > 3);
    }

    #[test]
    fn test_empty_dataset_renders() {
        let bytes = render(&dataset(0), Utc::now()).unwrap();
        assert_eq!(page_count(&bytes), 2);
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(80.0, "m³/h"), "80 m³/h");
        assert_eq!(format_value(4.25, "bar"), "4.25 bar");
        assert_eq!(format_value(4.2, "bar"), "4.2 bar");
        assert_eq!(format_value(0.0, "°C"), "0 °C");
    }

    #[test]
    fn test_win_ansi_keeps_latin1() {
        assert_eq!(win_ansi("°C"), vec![0xB0, b'C']);
        assert_eq!(win_ansi("m³"), vec![b'm', 0xB3]);
        assert_eq!(win_ansi("Δp"), vec![b'?', b'p']);
    }

    #[test]
    fn test_fit_truncates_long_cells() {
        assert_eq!(fit("short", 100, 10), "short");
        let fitted = fit("a very long equipment name indeed", 60, 10);
        assert_eq!(fitted.chars().count(), 12);
        assert!(fitted.ends_with("..."));
    }
}
