//! Report workbook: the report itself on the first sheet, raw data and two
//! fixed summaries on the following ones.

use super::ExportError;
use contracts::dashboards::d400_production_report::aggregation::{
    group_by_color, group_by_location, ReportRows,
};
use contracts::dashboards::d400_production_report::table::{
    entry_list_table, producer_list_table,
};
use contracts::dashboards::d400_production_report::{ReportCell, ReportTable};
use contracts::domain::a001_producer::Producer;
use contracts::domain::a002_entry::Entry;
use contracts::domain::a004_color::Color;
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet};

/// Raw rows behind the report, already filtered
pub struct WorkbookSources<'a> {
    pub producers: &'a [Producer],
    pub entries: &'a [Entry],
    pub colors: &'a [Color],
}

struct Formats {
    title: Format,
    note: Format,
    header: Format,
    weight: Format,
    money: Format,
    percent: Format,
    count: Format,
    total_text: Format,
    total_weight: Format,
    total_money: Format,
    total_percent: Format,
    total_count: Format,
}

impl Formats {
    fn new() -> Self {
        let weight = "#,##0.00";
        let money = "\"R$\" #,##0.00";
        let percent = "0.0%";
        let count = "0";
        let total = || Format::new().set_bold().set_border_top(FormatBorder::Thin);
        Self {
            title: Format::new()
                .set_bold()
                .set_font_size(14)
                .set_align(FormatAlign::Center),
            note: Format::new().set_italic(),
            header: Format::new()
                .set_bold()
                .set_border_bottom(FormatBorder::Thin),
            weight: Format::new().set_num_format(weight),
            money: Format::new().set_num_format(money),
            percent: Format::new().set_num_format(percent),
            count: Format::new().set_num_format(count),
            total_text: total(),
            total_weight: total().set_num_format(weight),
            total_money: total().set_num_format(money),
            total_percent: total().set_num_format(percent),
            total_count: total().set_num_format(count),
        }
    }

    fn for_cell(&self, cell: &ReportCell, total: bool) -> &Format {
        match (cell, total) {
            (ReportCell::Weight(_) | ReportCell::Decimal(_), false) => &self.weight,
            (ReportCell::Weight(_) | ReportCell::Decimal(_), true) => &self.total_weight,
            (ReportCell::Money(_), false) => &self.money,
            (ReportCell::Money(_), true) => &self.total_money,
            (ReportCell::Percent(_), false) => &self.percent,
            (ReportCell::Percent(_), true) => &self.total_percent,
            (ReportCell::Count(_), false) => &self.count,
            (ReportCell::Count(_), true) => &self.total_count,
            (_, true) => &self.total_text,
            (_, false) => &self.note,
        }
    }
}

fn write_cell(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &ReportCell,
    formats: &Formats,
    total: bool,
) -> Result<(), ExportError> {
    let format = formats.for_cell(cell, total);
    match cell {
        ReportCell::Text(s) if total => {
            sheet.write_string_with_format(row, col, s, format)?;
        }
        ReportCell::Text(s) => {
            sheet.write_string(row, col, s)?;
        }
        ReportCell::Empty => {
            if total {
                sheet.write_blank(row, col, format)?;
            }
        }
        _ => match cell.number().filter(|v| v.is_finite()) {
            // spreadsheet percent formats expect a fraction
            Some(v) if matches!(cell, ReportCell::Percent(_)) => {
                sheet.write_number_with_format(row, col, v / 100.0, format)?;
            }
            Some(v) => {
                sheet.write_number_with_format(row, col, v, format)?;
            }
            None => {
                sheet.write_string(row, col, "-")?;
            }
        },
    }
    Ok(())
}

fn sheet_name(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
        .collect();
    cleaned.chars().take(31).collect()
}

/// Title, filter notes, header, rows and totals, top to bottom
fn write_table_sheet(
    table: &ReportTable,
    name: &str,
    formats: &Formats,
) -> Result<Worksheet, ExportError> {
    let mut sheet = Worksheet::new();
    sheet.set_name(sheet_name(name))?;

    let last_col = table.column_count().saturating_sub(1) as u16;
    let mut row: u32 = 0;

    if last_col > 0 {
        sheet.merge_range(row, 0, row, last_col, &table.title, &formats.title)?;
    } else {
        sheet.write_string_with_format(row, 0, &table.title, &formats.title)?;
    }
    row += 1;

    for filter in &table.filters {
        sheet.write_string_with_format(row, 0, filter, &formats.note)?;
        row += 1;
    }
    row += 1;

    for (col, header) in table.headers.iter().enumerate() {
        sheet.write_string_with_format(row, col as u16, header, &formats.header)?;
    }
    row += 1;

    for cells in &table.rows {
        for (col, cell) in cells.iter().enumerate() {
            write_cell(&mut sheet, row, col as u16, cell, formats, false)?;
        }
        row += 1;
    }

    if let Some(totals) = &table.totals {
        for (col, cell) in totals.iter().enumerate() {
            write_cell(&mut sheet, row, col as u16, cell, formats, true)?;
        }
    }

    for (col, width) in column_widths(table).into_iter().enumerate() {
        sheet.set_column_width(col as u16, width)?;
    }

    Ok(sheet)
}

/// Character widths from the longest rendered value per column, clamped
fn column_widths(table: &ReportTable) -> Vec<f64> {
    let mut widths: Vec<usize> = table.headers.iter().map(|h| h.chars().count()).collect();
    for cells in table.rows.iter().chain(table.totals.iter()) {
        for (col, cell) in cells.iter().enumerate() {
            if let Some(w) = widths.get_mut(col) {
                *w = (*w).max(cell.display().chars().count());
            }
        }
    }
    widths
        .into_iter()
        .map(|w| (w as f64 + 2.0).clamp(8.0, 60.0))
        .collect()
}

/// Serialize the report and its auxiliary sheets to xlsx bytes
pub fn build_report_workbook(
    table: &ReportTable,
    sources: &WorkbookSources<'_>,
) -> Result<Vec<u8>, ExportError> {
    if table.is_empty() {
        return Err(ExportError::Empty);
    }

    let formats = Formats::new();
    let mut workbook = Workbook::new();

    workbook.push_worksheet(write_table_sheet(table, &table.title, &formats)?);

    let aux = [
        (
            "Produtores",
            producer_list_table(sources.producers, Vec::new()),
        ),
        (
            "Entradas",
            entry_list_table(sources.entries, sources.colors, Vec::new()),
        ),
        (
            "Por município",
            ReportRows::Municipality(group_by_location(sources.entries, |e| {
                Some(e.municipality.as_str())
            }))
            .to_table(Vec::new()),
        ),
        (
            "Por cor",
            ReportRows::Color(group_by_color(sources.entries, sources.colors)).to_table(Vec::new()),
        ),
    ];
    for (name, aux_table) in &aux {
        workbook.push_worksheet(write_table_sheet(aux_table, name, &formats)?);
    }

    let bytes = workbook.save_to_buffer()?;
    log::debug!("workbook built: {} bytes", bytes.len());
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::dashboards::d400_production_report::ReportType;

    fn table() -> ReportTable {
        ReportTable {
            title: ReportType::Color.title().to_string(),
            headers: vec!["Cor".into(), "Produção (kg)".into(), "Percentual".into()],
            rows: vec![vec![
                ReportCell::text("Âmbar"),
                ReportCell::Weight(30.0),
                ReportCell::Percent(100.0),
            ]],
            totals: Some(vec![
                ReportCell::text("Total"),
                ReportCell::Weight(30.0),
                ReportCell::Percent(100.0),
            ]),
            filters: vec!["Município: Picos".into()],
        }
    }

    fn empty_sources() -> WorkbookSources<'static> {
        WorkbookSources {
            producers: &[],
            entries: &[],
            colors: &[],
        }
    }

    #[test]
    fn test_workbook_is_zip() {
        let bytes = build_report_workbook(&table(), &empty_sources()).unwrap();
        assert!(bytes.len() > 100);
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_empty_report_rejected() {
        let mut t = table();
        t.rows.clear();
        assert_eq!(
            build_report_workbook(&t, &empty_sources()),
            Err(ExportError::Empty)
        );
    }

    #[test]
    fn test_sheet_name_sanitized() {
        assert_eq!(sheet_name("Produção [2024/01]"), "Produção 202401");
        assert_eq!(sheet_name(&"x".repeat(40)).len(), 31);
    }

    #[test]
    fn test_column_widths_clamped() {
        let widths = column_widths(&table());
        assert_eq!(widths.len(), 3);
        assert!(widths.iter().all(|w| (8.0..=60.0).contains(w)));
    }
}
