//! Report export: xlsx workbooks, paginated PDFs and CSV lists, handed to the
//! browser as a download.

pub mod csv;
pub mod download;
pub mod pdf;
pub mod xlsx;

use thiserror::Error;

pub use csv::{export_to_csv, CsvExportable};
pub use download::download_bytes;
pub use pdf::build_report_pdf;
pub use xlsx::{build_report_workbook, WorkbookSources};

pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const PDF_MIME: &str = "application/pdf";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportError {
    #[error("Nenhum dado para exportar")]
    Empty,

    #[error("Falha ao gerar planilha: {0}")]
    Xlsx(String),

    #[error("Falha ao gerar PDF: {0}")]
    Pdf(String),

    #[error("Falha ao baixar arquivo: {0}")]
    Download(String),
}

impl From<rust_xlsxwriter::XlsxError> for ExportError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        ExportError::Xlsx(e.to_string())
    }
}

/// `relatorio_produtor_2024-03-01.xlsx`
pub fn export_filename(stem: &str, date: &str, extension: &str) -> String {
    let stem: String = stem
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    format!("{}_{}.{}", stem.to_lowercase(), date, extension)
}

/// Build the workbook for `table` and download it
pub fn export_workbook(
    table: &contracts::dashboards::d400_production_report::ReportTable,
    sources: &WorkbookSources<'_>,
    filename: &str,
) -> Result<(), ExportError> {
    let bytes = build_report_workbook(table, sources)?;
    download_bytes(&bytes, XLSX_MIME, filename)
}

/// Build the PDF for `table` and download it
pub fn export_pdf(
    table: &contracts::dashboards::d400_production_report::ReportTable,
    generated_at: &str,
    filename: &str,
) -> Result<(), ExportError> {
    let bytes = build_report_pdf(table, generated_at)?;
    download_bytes(&bytes, PDF_MIME, filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_filename() {
        assert_eq!(
            export_filename("Relatório por cor", "2024-03-01", "pdf"),
            "relatório_por_cor_2024-03-01.pdf"
        );
    }
}
