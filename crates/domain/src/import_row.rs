use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::import_schema::{FieldKind, ImportSchema, MANDATORY_FIELDS, ScalarKind};

/// Row number the header occupies.
pub const HEADER_ROW_NUMBER: usize = 1;

/// English and Vietnamese variants of one free-text cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedText {
    /// English text.
    pub en: String,
    /// Vietnamese text.
    pub vi: String,
}

impl LocalizedText {
    /// Creates a localized pair with surrounding whitespace removed.
    #[must_use]
    pub fn new(en: impl Into<String>, vi: impl Into<String>) -> Self {
        let en: String = en.into();
        let vi: String = vi.into();
        Self {
            en: en.trim().to_owned(),
            vi: vi.trim().to_owned(),
        }
    }
}

/// Value of one base field in a mapped row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Bilingual free text.
    Localized(LocalizedText),
    /// English-only scalar such as a number or date.
    Scalar(String),
}

impl CellValue {
    /// Returns whether no usable value is present.
    ///
    /// A localized value is blank only when both languages are blank.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Localized(text) => text.en.trim().is_empty() && text.vi.trim().is_empty(),
            Self::Scalar(value) => value.trim().is_empty(),
        }
    }

    /// Returns the scalar text, if this is a scalar value.
    #[must_use]
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Self::Scalar(value) => Some(value.as_str()),
            Self::Localized(_) => None,
        }
    }
}

/// CSV row mapped onto base fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappedRow {
    values: BTreeMap<String, CellValue>,
    extras: Vec<(String, String)>,
}

impl MappedRow {
    /// Creates an empty row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value of a base field.
    pub fn insert(&mut self, field: impl Into<String>, value: CellValue) {
        self.values.insert(field.into(), value);
    }

    /// Records a non-empty cell from a column the schema does not know.
    pub fn push_extra(&mut self, label: impl Into<String>, value: impl Into<String>) {
        self.extras.push((label.into(), value.into()));
    }

    /// Returns the value of a base field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&CellValue> {
        self.values.get(field)
    }

    /// Returns all mapped values.
    #[must_use]
    pub fn values(&self) -> &BTreeMap<String, CellValue> {
        &self.values
    }

    /// Returns cells from unknown columns in column order.
    #[must_use]
    pub fn extras(&self) -> &[(String, String)] {
        &self.extras
    }

    /// Consumes the row and returns the mapped values.
    #[must_use]
    pub fn into_values(self) -> BTreeMap<String, CellValue> {
        self.values
    }
}

/// Category of a bulk import validation problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationErrorKind {
    /// One or more mandatory values or columns are missing.
    MissingFields,
    /// Cells were found in columns the schema does not know.
    ExtraFields,
    /// A value does not match its field's format.
    InvalidFormat,
    /// The file structure does not match the expected layout.
    ValidationError,
}

impl ValidationErrorKind {
    /// Returns a stable transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingFields => "missing_fields",
            Self::ExtraFields => "extra_fields",
            Self::InvalidFormat => "invalid_format",
            Self::ValidationError => "validation_error",
        }
    }
}

/// One validation problem found on a row or on the header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowValidationError {
    /// CSV row number, where the header is row 1.
    pub row_number: usize,
    /// Problem category.
    pub kind: ValidationErrorKind,
    /// Human-readable explanation.
    pub message: String,
    /// Offending base fields or column labels.
    pub fields: Vec<String>,
}

impl RowValidationError {
    fn new(
        row_number: usize,
        kind: ValidationErrorKind,
        message: impl Into<String>,
        fields: Vec<String>,
    ) -> Self {
        Self {
            row_number,
            kind,
            message: message.into(),
            fields,
        }
    }

    /// Returns whether the problem prevents the row from being committed.
    ///
    /// Extra fields are warnings only.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        self.kind != ValidationErrorKind::ExtraFields
    }
}

/// Checks the raw header row against the schema's mandatory columns.
///
/// Each mandatory field must have its English column at position `2 * i`.
/// Labels compare case-insensitively and may carry an `(EN)` marker.
#[must_use]
pub fn validate_header(raw_header: &[String], schema: &ImportSchema) -> Option<RowValidationError> {
    let normalized: Vec<String> = raw_header.iter().map(|cell| header_key(cell)).collect();
    let mut missing = Vec::new();
    let mut misplaced = Vec::new();

    for mandatory in MANDATORY_FIELDS {
        let Some(index) = schema.position(mandatory) else {
            continue;
        };
        let expected = header_key(mandatory);

        if normalized.get(index * 2) == Some(&expected) {
            continue;
        }
        if normalized.contains(&expected) {
            misplaced.push((*mandatory).to_owned());
        } else {
            missing.push((*mandatory).to_owned());
        }
    }

    if !missing.is_empty() {
        return Some(RowValidationError::new(
            HEADER_ROW_NUMBER,
            ValidationErrorKind::MissingFields,
            format!("missing mandatory columns: {}", missing.join(", ")),
            missing,
        ));
    }

    if !misplaced.is_empty() {
        return Some(RowValidationError::new(
            HEADER_ROW_NUMBER,
            ValidationErrorKind::ValidationError,
            format!(
                "mandatory columns are out of order: {}; download the template for the expected layout",
                misplaced.join(", ")
            ),
            misplaced,
        ));
    }

    None
}

/// Validates one mapped row, accumulating every problem found.
#[must_use]
pub fn validate_row(
    mapped_row: &MappedRow,
    row_number: usize,
    schema: &ImportSchema,
) -> Vec<RowValidationError> {
    let mut errors = Vec::new();

    let missing: Vec<String> = MANDATORY_FIELDS
        .iter()
        .filter(|field| mapped_row.get(field).is_none_or(CellValue::is_blank))
        .map(|field| (*field).to_owned())
        .collect();
    if !missing.is_empty() {
        errors.push(RowValidationError::new(
            row_number,
            ValidationErrorKind::MissingFields,
            format!("missing mandatory fields: {}", missing.join(", ")),
            missing,
        ));
    }

    let mut extra: Vec<String> = mapped_row
        .values()
        .keys()
        .filter(|field| schema.field(field).is_none())
        .cloned()
        .collect();
    extra.extend(mapped_row.extras().iter().map(|(label, _)| label.clone()));
    if !extra.is_empty() {
        errors.push(RowValidationError::new(
            row_number,
            ValidationErrorKind::ExtraFields,
            format!("unknown fields ignored: {}", extra.join(", ")),
            extra,
        ));
    }

    for field in schema.fields() {
        let FieldKind::Scalar(kind) = field.kind() else {
            continue;
        };
        let Some(value) = mapped_row.get(field.name()).and_then(CellValue::as_scalar) else {
            continue;
        };
        let value = value.trim();
        if value.is_empty() {
            continue;
        }

        let message = match kind {
            ScalarKind::Number | ScalarKind::Currency if !is_finite_number(value) => {
                Some(format!("{} must be a number, got '{value}'", field.name()))
            }
            ScalarKind::Date if !is_iso_date(value) => Some(format!(
                "{} must be a date in YYYY-MM-DD format, got '{value}'",
                field.name()
            )),
            _ => None,
        };

        if let Some(message) = message {
            errors.push(RowValidationError::new(
                row_number,
                ValidationErrorKind::InvalidFormat,
                message,
                vec![field.name().to_owned()],
            ));
        }
    }

    errors
}

fn header_key(label: &str) -> String {
    let lowered = label.trim().trim_start_matches('\u{feff}').to_lowercase();
    let without_marker = lowered
        .strip_suffix("(en)")
        .unwrap_or(lowered.as_str())
        .trim_end();
    without_marker.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_finite_number(value: &str) -> bool {
    value.parse::<f64>().is_ok_and(f64::is_finite)
}

fn is_iso_date(value: &str) -> bool {
    let bytes = value.as_bytes();
    let shaped = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(index, byte)| index == 4 || index == 7 || byte.is_ascii_digit());
    shaped && NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}
