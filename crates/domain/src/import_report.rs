use std::collections::BTreeSet;

use estatery_core::AppResult;
use serde::{Deserialize, Serialize};

use crate::import_csv::{ParsedRow, parse};
use crate::import_row::{RowValidationError, validate_header, validate_row};
use crate::import_schema::ImportSchema;

/// Terminal outcome of a validation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationOutcome {
    /// Every row can be committed.
    AllValid,
    /// Some rows can be committed.
    PartiallyValid,
    /// Nothing can be committed.
    AllInvalid,
}

impl ValidationOutcome {
    /// Returns whether a commit may follow this outcome.
    #[must_use]
    pub fn is_committable(&self) -> bool {
        !matches!(self, Self::AllInvalid)
    }
}

/// Aggregated result of validating an uploaded file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Data rows examined.
    pub total: usize,
    /// Rows without fatal problems.
    pub successful: usize,
    /// Rows with at least one fatal problem.
    pub failed: usize,
    /// Problems in row order, warnings included.
    pub errors: Vec<RowValidationError>,
    /// Row numbers eligible for commit.
    pub valid_rows: Vec<usize>,
}

impl ValidationReport {
    /// Builds a report for a file rejected at the header.
    #[must_use]
    pub fn rejected_header(error: RowValidationError) -> Self {
        Self {
            errors: vec![error],
            ..Self::default()
        }
    }

    /// Validates parsed rows and aggregates the results.
    #[must_use]
    pub fn from_rows(rows: &[ParsedRow], schema: &ImportSchema) -> Self {
        let mut report = Self {
            total: rows.len(),
            ..Self::default()
        };

        for row in rows {
            let errors = validate_row(&row.mapped, row.row_number, schema);
            if errors.iter().any(RowValidationError::is_fatal) {
                report.failed += 1;
            } else {
                report.successful += 1;
                report.valid_rows.push(row.row_number);
            }
            report.errors.extend(errors);
        }

        report
    }

    /// Returns the outcome class of the report.
    #[must_use]
    pub fn outcome(&self) -> ValidationOutcome {
        if self.successful == 0 {
            ValidationOutcome::AllInvalid
        } else if self.failed == 0 {
            ValidationOutcome::AllValid
        } else {
            ValidationOutcome::PartiallyValid
        }
    }

    /// Returns whether the file was rejected before row processing.
    #[must_use]
    pub fn is_header_rejection(&self) -> bool {
        self.total == 0 && self.errors.iter().any(|error| error.row_number == 1)
    }

    /// Groups problems by row number, preserving order.
    #[must_use]
    pub fn errors_by_row(&self) -> Vec<(usize, Vec<&RowValidationError>)> {
        let mut grouped: Vec<(usize, Vec<&RowValidationError>)> = Vec::new();
        for error in &self.errors {
            match grouped.last_mut() {
                Some((row_number, errors)) if *row_number == error.row_number => {
                    errors.push(error);
                }
                _ => grouped.push((error.row_number, vec![error])),
            }
        }
        grouped
    }
}

/// Parsed file together with its validation report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedImport {
    /// Rows mapped from the file, empty on header rejection.
    pub rows: Vec<ParsedRow>,
    /// Validation report for the rows.
    pub report: ValidationReport,
}

impl ValidatedImport {
    /// Returns the rows eligible for commit.
    pub fn valid_rows(&self) -> impl Iterator<Item = &ParsedRow> {
        let valid: BTreeSet<usize> = self.report.valid_rows.iter().copied().collect();
        self.rows
            .iter()
            .filter(move |row| valid.contains(&row.row_number))
    }
}

/// Validates parsed rows and aggregates them into a report.
#[must_use]
pub fn build_report(rows: &[ParsedRow], schema: &ImportSchema) -> ValidationReport {
    ValidationReport::from_rows(rows, schema)
}

/// Parses and validates a CSV file against a schema.
///
/// A header problem aborts before any row is validated.
pub fn validate_file(csv_text: &str, schema: &ImportSchema) -> AppResult<ValidatedImport> {
    let parsed = parse(csv_text, schema)?;

    if let Some(header_error) = validate_header(&parsed.raw_header, schema) {
        return Ok(ValidatedImport {
            rows: Vec::new(),
            report: ValidationReport::rejected_header(header_error),
        });
    }

    let report = build_report(&parsed.rows, schema);
    Ok(ValidatedImport {
        rows: parsed.rows,
        report,
    })
}

#[cfg(test)]
mod tests {
    use crate::import_csv::render_template;
    use crate::import_row::ValidationErrorKind;
    use crate::import_schema::{ImportSchema, TransactionType};

    use super::{ValidationOutcome, validate_file};

    fn lease_file(rows: &[&str]) -> String {
        let schema = ImportSchema::for_transaction(TransactionType::Lease);
        let template = render_template(&schema);
        let header = template.lines().next().unwrap_or_default().to_owned();

        let mut text = header;
        text.push('\n');
        for row in rows {
            text.push_str(row);
            text.push('\n');
        }
        text
    }

    #[test]
    fn partial_file_counts_successful_and_failed_rows() {
        let text = lease_file(&[
            "P1,,A1,,B1,,U1",
            ",,A2,,B2,,U2",
            "P3,,A3,,B3,,U3,,,,2",
            "P4,,A4,,B4,,U4,,,,,,,,,,,,2024-13-01",
        ]);
        let schema = ImportSchema::for_transaction(TransactionType::Lease);

        let Ok(validated) = validate_file(&text, &schema) else {
            panic!("file should parse");
        };
        let report = &validated.report;

        assert_eq!(report.total, 4);
        assert_eq!(report.successful, 2);
        assert_eq!(report.failed, 2);
        assert_eq!(report.valid_rows, vec![2, 4]);
        assert_eq!(report.outcome(), ValidationOutcome::PartiallyValid);
        assert_eq!(validated.valid_rows().count(), 2);
        assert_eq!(
            report
                .errors_by_row()
                .iter()
                .map(|(row, _)| *row)
                .collect::<Vec<_>>(),
            vec![3, 5]
        );
    }

    #[test]
    fn missing_block_column_aborts_before_rows() {
        let text = "Project / Community (EN),Project / Community (VI),Area / Zone (EN),Area / Zone (VI)\n\
                    P1,,A1,\n\
                    ,,,\n";
        let schema = ImportSchema::for_transaction(TransactionType::Sale);

        let Ok(validated) = validate_file(text, &schema) else {
            panic!("file should parse");
        };

        assert!(validated.report.is_header_rejection());
        assert!(validated.rows.is_empty());
        assert_eq!(validated.report.errors.len(), 1);
        assert_eq!(
            validated.report.errors[0].kind,
            ValidationErrorKind::MissingFields
        );
        assert_eq!(validated.report.outcome(), ValidationOutcome::AllInvalid);
    }

    #[test]
    fn valid_rows_scale_to_large_files() {
        let rows: Vec<String> = (0..60_000)
            .map(|index| {
                if index % 2 == 0 {
                    format!("P{index},,A,,B")
                } else {
                    ",,A,,B".to_owned()
                }
            })
            .collect();
        let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
        let schema = ImportSchema::for_transaction(TransactionType::Lease);

        let Ok(validated) = validate_file(&lease_file(&rows), &schema) else {
            panic!("file should parse");
        };

        assert_eq!(validated.report.successful, 30_000);
        assert!(
            validated
                .valid_rows()
                .map(|row| row.row_number)
                .eq((0..30_000).map(|index| index * 2 + 2))
        );
    }

    #[test]
    fn all_valid_and_all_invalid_outcomes() {
        let schema = ImportSchema::for_transaction(TransactionType::Lease);

        let valid = validate_file(&lease_file(&["P,,A,,B"]), &schema);
        assert_eq!(
            valid.map(|validated| validated.report.outcome()).ok(),
            Some(ValidationOutcome::AllValid)
        );

        let invalid = validate_file(&lease_file(&[",,A,,B"]), &schema);
        assert_eq!(
            invalid.map(|validated| validated.report.outcome()).ok(),
            Some(ValidationOutcome::AllInvalid)
        );
    }
}
