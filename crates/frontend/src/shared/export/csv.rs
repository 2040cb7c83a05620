use super::{download_bytes, ExportError};

/// Row type that can be flattened into a `;`-separated CSV line
pub trait CsvExportable {
    fn headers() -> Vec<&'static str>;

    fn to_csv_row(&self) -> Vec<String>;
}

/// CSV text with a UTF-8 BOM so spreadsheet apps pick up the accents
pub fn build_csv<T: CsvExportable>(data: &[T]) -> String {
    let mut out = String::from('\u{FEFF}');
    out.push_str(&T::headers().join(";"));
    out.push('\n');
    for item in data {
        let cells: Vec<String> = item.to_csv_row().iter().map(|c| escape_csv_cell(c)).collect();
        out.push_str(&cells.join(";"));
        out.push('\n');
    }
    out
}

pub fn export_to_csv<T: CsvExportable>(data: &[T], filename: &str) -> Result<(), ExportError> {
    if data.is_empty() {
        return Err(ExportError::Empty);
    }
    let content = build_csv(data);
    download_bytes(content.as_bytes(), "text/csv;charset=utf-8;", filename)
}

fn escape_csv_cell(cell: &str) -> String {
    if cell.contains([';', '"', '\n', '\r']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row(&'static str, &'static str);

    impl CsvExportable for Row {
        fn headers() -> Vec<&'static str> {
            vec!["Nome", "Obs"]
        }

        fn to_csv_row(&self) -> Vec<String> {
            vec![self.0.to_string(), self.1.to_string()]
        }
    }

    #[test]
    fn test_build_csv_escapes() {
        let csv = build_csv(&[Row("Ana", "mel; claro"), Row("Zé", "\"extra\"")]);
        assert_eq!(
            csv,
            "\u{FEFF}Nome;Obs\nAna;\"mel; claro\"\nZé;\"\"\"extra\"\"\"\n"
        );
    }
}
