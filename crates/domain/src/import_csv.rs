use estatery_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::import_row::{CellValue, HEADER_ROW_NUMBER, LocalizedText, MappedRow};
use crate::import_schema::{FieldKind, ImportSchema};

const UTF8_BOM: char = '\u{feff}';

/// One data line of the uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    /// CSV row number, starting at 2 for the first data row.
    pub row_number: usize,
    /// Cells in column order.
    pub cells: Vec<String>,
}

/// Data row mapped onto the schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedRow {
    /// CSV row number, starting at 2 for the first data row.
    pub row_number: usize,
    /// Values keyed by base field.
    pub mapped: MappedRow,
}

/// Result of parsing an uploaded CSV against a schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedCsv {
    /// Canonical base-field names from the schema.
    pub headers: Vec<String>,
    /// Header cells as written in the file.
    pub raw_header: Vec<String>,
    /// Mapped data rows.
    pub rows: Vec<ParsedRow>,
}

/// Splits CSV text into the header and raw data rows.
///
/// Blank lines are dropped before numbering, so row numbers count
/// non-blank lines with the header as row 1.
pub fn read_rows(csv_text: &str) -> AppResult<(Vec<String>, Vec<RawRow>)> {
    let text = csv_text.strip_prefix(UTF8_BOM).unwrap_or(csv_text);
    let mut lines = text
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.trim().is_empty());

    let header = lines
        .next()
        .map(split_cells)
        .ok_or_else(|| AppError::Validation("csv file is empty".to_owned()))?;

    let rows = lines
        .enumerate()
        .map(|(index, line)| RawRow {
            row_number: index + HEADER_ROW_NUMBER + 1,
            cells: split_cells(line),
        })
        .collect();

    Ok((header, rows))
}

/// Parses CSV text into rows keyed by the schema's base fields.
///
/// Base field `i` reads English from column `2 * i` and Vietnamese from
/// column `2 * i + 1`. Scalar fields keep the English cell only. Non-empty
/// cells past the schema's columns are kept as extras.
pub fn parse(csv_text: &str, schema: &ImportSchema) -> AppResult<ParsedCsv> {
    let (raw_header, raw_rows) = read_rows(csv_text)?;

    let rows = raw_rows
        .into_iter()
        .map(|raw_row| ParsedRow {
            row_number: raw_row.row_number,
            mapped: map_row(&raw_row.cells, &raw_header, schema),
        })
        .collect();

    Ok(ParsedCsv {
        headers: schema.field_names(),
        raw_header,
        rows,
    })
}

/// Maps raw cells onto the schema's base fields.
#[must_use]
pub fn map_row(cells: &[String], raw_header: &[String], schema: &ImportSchema) -> MappedRow {
    let cell = |index: usize| cells.get(index).map(|value| value.trim()).unwrap_or_default();
    let mut mapped = MappedRow::new();

    for (index, field) in schema.fields().iter().enumerate() {
        let value = match field.kind() {
            FieldKind::Localized => {
                CellValue::Localized(LocalizedText::new(cell(index * 2), cell(index * 2 + 1)))
            }
            FieldKind::Scalar(_) => CellValue::Scalar(cell(index * 2).to_owned()),
        };
        mapped.insert(field.name(), value);
    }

    for (index, value) in cells.iter().enumerate().skip(schema.column_count()) {
        let value = value.trim();
        if value.is_empty() {
            continue;
        }

        let label = raw_header
            .get(index)
            .map(|label| label.trim())
            .filter(|label| !label.is_empty())
            .map(str::to_owned)
            .unwrap_or_else(|| format!("Column {}", index + 1));
        mapped.push_extra(label, value);
    }

    mapped
}

/// Renders the downloadable template for a schema.
///
/// The output starts with a UTF-8 BOM so spreadsheet tools detect the
/// encoding, followed by the interleaved EN/VI header and one sample row.
#[must_use]
pub fn render_template(schema: &ImportSchema) -> String {
    let mut header = Vec::with_capacity(schema.column_count());
    let mut sample = Vec::with_capacity(schema.column_count());

    for field in schema.fields() {
        header.push(escape_cell(&field.en_label()));
        header.push(escape_cell(&field.vi_label()));

        let (sample_en, sample_vi) = field.samples();
        sample.push(escape_cell(sample_en));
        sample.push(escape_cell(sample_vi));
    }

    let mut output = String::new();
    output.push(UTF8_BOM);
    output.push_str(&header.join(","));
    output.push('\n');
    output.push_str(&sample.join(","));
    output.push('\n');
    output
}

/// Escapes one cell for CSV output.
#[must_use]
pub fn escape_cell(value: &str) -> String {
    // Spreadsheet tools evaluate cells starting with these as formulas.
    let mut value = value.to_owned();
    if matches!(value.chars().next(), Some('=' | '+' | '@')) {
        value.insert(0, '\'');
    }

    let needs_quotes =
        value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r');
    if !needs_quotes {
        return value;
    }

    format!("\"{}\"", value.replace('"', "\"\""))
}

fn split_cells(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut characters = line.chars().peekable();

    while let Some(character) = characters.next() {
        match character {
            '"' if in_quotes && characters.peek() == Some(&'"') => {
                current.push('"');
                characters.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => cells.push(std::mem::take(&mut current)),
            _ => current.push(character),
        }
    }
    cells.push(current);

    cells
}
