//! Paginated A4 report: title block, applied filters, one table that
//! continues on new pages with its header repeated.

use super::ExportError;
use contracts::dashboards::d400_production_report::{ReportCell, ReportTable};
use printpdf::{
    BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
    Point,
};

const PAGE_W: f32 = 210.0;
const PAGE_H: f32 = 297.0;
const MARGIN_X: f32 = 15.0;
const CONTENT_W: f32 = 180.0;
const TOP_Y: f32 = 280.0;
const BOTTOM_Y: f32 = 20.0;
const ROW_H: f32 = 5.5;
const BODY_SIZE: f32 = 8.0;
/// Average Helvetica glyph width at 8pt, in mm
const CHAR_W: f32 = 1.55;

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

struct PdfWriter<'a> {
    doc: &'a PdfDocumentReference,
    fonts: Fonts,
    layer: PdfLayerReference,
    y: f32,
    page: usize,
    footer: String,
}

impl<'a> PdfWriter<'a> {
    fn text(&self, x: f32, y: f32, size: f32, bold: bool, text: &str) {
        let font = if bold { &self.fonts.bold } else { &self.fonts.regular };
        self.layer.begin_text_section();
        self.layer.set_font(font, size);
        self.layer.set_text_cursor(Mm(x), Mm(y));
        self.layer.write_text(text, font);
        self.layer.end_text_section();
    }

    fn rule(&self, y: f32) {
        let line = Line::from_iter(vec![
            (Point::new(Mm(MARGIN_X), Mm(y)), false),
            (Point::new(Mm(MARGIN_X + CONTENT_W), Mm(y)), false),
        ]);
        self.layer.add_line(line);
    }

    fn draw_footer(&self) {
        self.text(
            MARGIN_X,
            10.0,
            7.0,
            false,
            &format!("{} | página {}", self.footer, self.page),
        );
    }

    fn new_page(&mut self) {
        self.draw_footer();
        let (page, layer) = self.doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.page += 1;
        self.y = TOP_Y;
    }

    fn ensure_room(&mut self, height: f32) -> bool {
        if self.y - height < BOTTOM_Y {
            self.new_page();
            true
        } else {
            false
        }
    }

    fn row(&self, cells: &[String], widths: &[f32], numeric: &[bool], bold: bool) {
        let mut x = MARGIN_X;
        for ((cell, width), right) in cells.iter().zip(widths).zip(numeric) {
            let text = fit(cell, *width);
            let cx = if *right {
                x + width - 2.0 - text.chars().count() as f32 * CHAR_W
            } else {
                x
            };
            self.text(cx.max(x), self.y, BODY_SIZE, bold, &text);
            x += width;
        }
    }
}

/// Truncate to what fits in `width` mm, with a trailing ".."
fn fit(text: &str, width: f32) -> String {
    let max = ((width - 2.0) / CHAR_W).floor().max(3.0) as usize;
    if text.chars().count() > max {
        text.chars().take(max - 2).collect::<String>() + ".."
    } else {
        text.to_string()
    }
}

/// Column widths proportional to content length, summing to the content width
fn column_widths(table: &ReportTable) -> Vec<f32> {
    let mut lengths: Vec<usize> = table.headers.iter().map(|h| h.chars().count()).collect();
    for cells in table.rows.iter().chain(table.totals.iter()) {
        for (col, cell) in cells.iter().enumerate() {
            if let Some(len) = lengths.get_mut(col) {
                *len = (*len).max(cell.display().chars().count());
            }
        }
    }
    let lengths: Vec<f32> = lengths.into_iter().map(|l| l.clamp(6, 40) as f32).collect();
    let sum: f32 = lengths.iter().sum();
    if sum == 0.0 {
        return Vec::new();
    }
    lengths.iter().map(|l| l / sum * CONTENT_W).collect()
}

fn numeric_columns(table: &ReportTable) -> Vec<bool> {
    (0..table.column_count())
        .map(|col| {
            table
                .rows
                .iter()
                .filter_map(|r| r.get(col))
                .any(ReportCell::is_numeric)
        })
        .collect()
}

fn render(cells: &[ReportCell]) -> Vec<String> {
    cells.iter().map(ReportCell::display).collect()
}

/// Serialize `table` into PDF bytes. `generated_at` goes into the footer.
pub fn build_report_pdf(table: &ReportTable, generated_at: &str) -> Result<Vec<u8>, ExportError> {
    if table.is_empty() {
        return Err(ExportError::Empty);
    }

    let (doc, page, layer) = PdfDocument::new(&table.title, Mm(PAGE_W), Mm(PAGE_H), "Layer 1");
    let fonts = Fonts {
        regular: doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ExportError::Pdf(e.to_string()))?,
        bold: doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ExportError::Pdf(e.to_string()))?,
    };
    let layer = doc.get_page(page).get_layer(layer);

    let mut w = PdfWriter {
        doc: &doc,
        fonts,
        layer,
        y: TOP_Y,
        page: 1,
        footer: format!("Colmeia | gerado em {}", generated_at),
    };

    w.text(MARGIN_X, w.y, 16.0, true, &table.title);
    w.y -= 8.0;
    if table.filters.is_empty() {
        w.text(MARGIN_X, w.y, 9.0, false, "Sem filtros aplicados");
        w.y -= 5.0;
    }
    for filter in &table.filters {
        w.text(MARGIN_X, w.y, 9.0, false, filter);
        w.y -= 5.0;
    }
    w.y -= 5.0;

    let widths = column_widths(table);
    let numeric = numeric_columns(table);
    let header_numeric = vec![false; table.column_count()];

    let draw_header = |w: &mut PdfWriter<'_>| {
        w.row(&table.headers, &widths, &header_numeric, true);
        w.y -= 2.0;
        w.rule(w.y);
        w.y -= ROW_H - 1.0;
    };
    draw_header(&mut w);

    for cells in &table.rows {
        if w.ensure_room(ROW_H) {
            draw_header(&mut w);
        }
        w.row(&render(cells), &widths, &numeric, false);
        w.y -= ROW_H;
    }

    if let Some(totals) = &table.totals {
        if w.ensure_room(ROW_H + 3.0) {
            draw_header(&mut w);
        }
        w.rule(w.y + ROW_H - 1.5);
        w.row(&render(totals), &widths, &numeric, true);
    }
    w.draw_footer();
    drop(w);

    let bytes = doc
        .save_to_bytes()
        .map_err(|e| ExportError::Pdf(e.to_string()))?;
    log::debug!("pdf built: {} bytes", bytes.len());
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: usize) -> ReportTable {
        ReportTable {
            title: "Relatório por produtor".into(),
            headers: vec!["Produtor".into(), "Produção (kg)".into()],
            rows: (0..rows)
                .map(|i| vec![ReportCell::text(format!("Produtor {}", i)), ReportCell::Weight(i as f64)])
                .collect(),
            totals: Some(vec![ReportCell::text("Total"), ReportCell::Weight(0.0)]),
            filters: vec!["Período: 01/01/2024 a 31/01/2024".into()],
        }
    }

    #[test]
    fn test_pdf_signature() {
        let bytes = build_report_pdf(&table(3), "01/03/2024").unwrap();
        assert_eq!(&bytes[..4], b"%PDF");
    }

    #[test]
    fn test_long_table_paginates() {
        let short = build_report_pdf(&table(3), "01/03/2024").unwrap();
        let long = build_report_pdf(&table(200), "01/03/2024").unwrap();
        assert!(long.len() > short.len());
    }

    #[test]
    fn test_empty_rejected() {
        assert_eq!(build_report_pdf(&table(0), "x"), Err(ExportError::Empty));
    }

    #[test]
    fn test_fit_truncates() {
        assert_eq!(fit("curto", 40.0), "curto");
        let cut = fit(&"a".repeat(100), 20.0);
        assert!(cut.ends_with(".."));
        assert!(cut.chars().count() < 20);
    }

    #[test]
    fn test_column_widths_sum_to_content() {
        let widths = column_widths(&table(3));
        let sum: f32 = widths.iter().sum();
        assert!((sum - CONTENT_W).abs() < 0.01);
    }
}
