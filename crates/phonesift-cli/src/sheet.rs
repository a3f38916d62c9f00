use phonesift_core::{CellValue, Row};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SheetError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SheetFormat {
    Csv,
    Json,
}

impl SheetFormat {
    pub fn detect(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "csv" => Some(SheetFormat::Csv),
            "json" => Some(SheetFormat::Json),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            SheetFormat::Csv => "csv",
            SheetFormat::Json => "json",
        }
    }
}

pub fn read_rows(path: &Path, format: SheetFormat) -> Result<Vec<Row>> {
    match format {
        SheetFormat::Csv => read_csv(path),
        SheetFormat::Json => {
            let file = File::open(path)?;
            Ok(serde_json::from_reader(BufReader::new(file))?)
        }
    }
}

fn read_csv(path: &Path) -> Result<Vec<Row>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let headers = reader.headers()?.clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row = headers
            .iter()
            .zip(record.iter())
            .map(|(column, value)| (column, CellValue::from(value)))
            .collect::<Row>();
        rows.push(row);
    }
    Ok(rows)
}

/// Keeps only `columns`, in that order. Missing cells become empty.
pub fn project(row: &Row, columns: &[&str]) -> Row {
    columns
        .iter()
        .map(|column| {
            let value = row.get(column).cloned().unwrap_or(CellValue::Empty);
            (*column, value)
        })
        .collect()
}

/// Writes rows using the columns of the first row as the header.
pub fn write_rows<W: Write>(writer: W, rows: &[Row], format: SheetFormat) -> Result<()> {
    match format {
        SheetFormat::Csv => write_csv(writer, rows),
        SheetFormat::Json => {
            let mut writer = writer;
            serde_json::to_writer_pretty(&mut writer, rows)?;
            writeln!(writer)?;
            Ok(())
        }
    }
}

fn write_csv<W: Write>(writer: W, rows: &[Row]) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    let Some(first) = rows.first() else {
        out.flush()?;
        return Ok(());
    };
    let columns: Vec<&str> = first.columns().collect();
    out.write_record(&columns)?;
    for row in rows {
        out.write_record(columns.iter().map(|column| {
            row.get(column)
                .map(|value| value.to_string())
                .unwrap_or_default()
        }))?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{project, read_rows, write_rows, SheetFormat};
    use phonesift_core::{CellValue, Row};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    #[test]
    fn detect_uses_extension() {
        assert_eq!(
            SheetFormat::detect(Path::new("contacts.CSV")),
            Some(SheetFormat::Csv)
        );
        assert_eq!(
            SheetFormat::detect(Path::new("contacts.json")),
            Some(SheetFormat::Json)
        );
        assert_eq!(SheetFormat::detect(Path::new("contacts.xlsx")), None);
        assert_eq!(SheetFormat::detect(Path::new("contacts")), None);
    }

    #[test]
    fn read_csv_keeps_header_order() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("contacts.csv");
        fs::write(&path, "CID,AID,Name,Phone\n1,A,Ada,\"012 345 678, 077123456\"\n")
            .expect("write csv");

        let rows = read_rows(&path, SheetFormat::Csv).expect("read");
        assert_eq!(rows.len(), 1);
        let columns: Vec<&str> = rows[0].columns().collect();
        assert_eq!(columns, ["CID", "AID", "Name", "Phone"]);
        assert_eq!(rows[0].get_text("Phone"), Some("012 345 678, 077123456"));
    }

    #[test]
    fn read_json_maps_numbers_and_nulls() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("contacts.json");
        fs::write(&path, r#"[{"CID": 1, "Phone": null}]"#).expect("write json");

        let rows = read_rows(&path, SheetFormat::Json).expect("read");
        assert_eq!(rows[0].get("CID"), Some(&CellValue::Integer(1)));
        assert_eq!(rows[0].get("Phone"), Some(&CellValue::Empty));
    }

    #[test]
    fn project_orders_and_fills_columns() {
        let row = Row::from_iter([("Phone", "077123456;"), ("Extra", "x"), ("CID", "1")]);
        let projected = project(&row, &["CID", "AID", "Phone"]);
        let columns: Vec<&str> = projected.columns().collect();
        assert_eq!(columns, ["CID", "AID", "Phone"]);
        assert_eq!(projected.get("AID"), Some(&CellValue::Empty));
    }

    #[test]
    fn write_csv_emits_header_and_values() {
        let rows = vec![
            Row::from_iter([
                ("CID", CellValue::from(1)),
                ("Phone", CellValue::from("077123456;")),
            ]),
            Row::from_iter([("CID", CellValue::from(2)), ("Phone", CellValue::Empty)]),
        ];
        let mut buffer = Vec::new();
        write_rows(&mut buffer, &rows, SheetFormat::Csv).expect("write");
        let text = String::from_utf8(buffer).expect("utf8");
        assert_eq!(text, "CID,Phone\n1,077123456;\n2,\n");
    }
}
