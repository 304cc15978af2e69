//! Rendering of list pages as text tables, CSV or JSON

use anyhow::{Context, Result};
use std::io::Write;

use crate::resources::common::pad;
use crate::resources::{Column, Record};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
    Json,
}

/// Write `rows` in the requested format; `first_number` is the serial of the first row
pub fn write_rows<T: Record, W: Write>(
    writer: &mut W,
    format: OutputFormat,
    columns: &[Column<T>],
    rows: &[&T],
    first_number: u64,
) -> Result<()> {
    match format {
        OutputFormat::Table => {
            writer.write_all(render_table(columns, rows, first_number).as_bytes())?;
            Ok(())
        }
        OutputFormat::Csv => write_csv(writer, columns, rows),
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *writer, rows).context("Failed to write JSON")?;
            writeln!(writer)?;
            Ok(())
        }
    }
}

/// Fixed-width table with a serial number column
pub fn render_table<T>(columns: &[Column<T>], rows: &[&T], first_number: u64) -> String {
    let number_width = (first_number + rows.len() as u64).to_string().len().max(1);
    let mut out = String::new();

    let mut header = pad("#", number_width);
    for column in columns {
        header.push_str("  ");
        header.push_str(&pad(column.label, column.width as usize));
    }
    out.push_str(header.trim_end());
    out.push('\n');

    let rule_width: usize =
        number_width + columns.iter().map(|c| c.width as usize + 2).sum::<usize>();
    out.push_str(&"-".repeat(rule_width));
    out.push('\n');

    for (index, row) in rows.iter().enumerate() {
        let mut line = pad(&(first_number + index as u64).to_string(), number_width);
        for column in columns {
            line.push_str("  ");
            line.push_str(&pad(&column.value(row), column.width as usize));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }

    if rows.is_empty() {
        out.push_str("No records found\n");
    }
    out
}

/// CSV with the column labels as header and untruncated cell values
pub fn write_csv<T, W: Write>(writer: W, columns: &[Column<T>], rows: &[&T]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer
        .write_record(columns.iter().map(|c| c.label))
        .context("Failed to write CSV header")?;
    for row in rows {
        csv_writer
            .write_record(columns.iter().map(|c| c.value(row)))
            .context("Failed to write CSV row")?;
    }
    csv_writer.flush().context("Failed to flush CSV output")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::{Brand, Brands, Resource};
    use serde_json::json;

    fn brands() -> Vec<Brand> {
        serde_json::from_value(json!([
            {"_id": "b1", "name": "Acme, Inc", "website": "https://acme.test"},
            {"_id": "b2", "name": "Globex"}
        ]))
        .unwrap()
    }

    #[test]
    fn test_csv_quotes_and_headers() {
        let rows = brands();
        let refs: Vec<&Brand> = rows.iter().collect();
        let mut out = Vec::new();
        write_csv(&mut out, &Brands.columns(), &refs).unwrap();

        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Name,Description,Website"));
        assert_eq!(lines.next(), Some("\"Acme, Inc\",N/A,https://acme.test"));
        assert_eq!(lines.next(), Some("Globex,N/A,N/A"));
    }

    #[test]
    fn test_table_numbers_rows_from_offset() {
        let rows = brands();
        let refs: Vec<&Brand> = rows.iter().collect();
        let table = render_table(&Brands.columns(), &refs, 11);
        let lines: Vec<&str> = table.lines().collect();
        assert!(lines[0].starts_with("#"));
        assert!(lines[2].starts_with("11"));
        assert!(lines[3].starts_with("12"));
        assert!(lines[3].contains("Globex"));
    }

    #[test]
    fn test_empty_table_says_so() {
        let table = render_table::<Brand>(&Brands.columns(), &[], 1);
        assert!(table.ends_with("No records found\n"));
    }
}
