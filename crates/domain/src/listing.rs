use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use estatery_core::RecordId;
use serde::{Deserialize, Serialize};

use crate::import_csv::ParsedRow;
use crate::import_row::CellValue;
use crate::import_schema::{FIELD_BLOCK, FIELD_PROJECT, FIELD_UNIT_NUMBER, TransactionType};

/// Property listing created from a bulk import row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyListing {
    listing_id: RecordId,
    transaction_type: TransactionType,
    source_row: usize,
    values: BTreeMap<String, CellValue>,
    created_at: DateTime<Utc>,
}

impl PropertyListing {
    /// Creates a listing from a row that passed validation.
    #[must_use]
    pub fn from_import_row(transaction_type: TransactionType, row: &ParsedRow) -> Self {
        Self {
            listing_id: RecordId::new(),
            transaction_type,
            source_row: row.row_number,
            values: row.mapped.values().clone(),
            created_at: Utc::now(),
        }
    }

    /// Rebuilds a persisted listing.
    #[must_use]
    pub fn restore(
        listing_id: RecordId,
        transaction_type: TransactionType,
        source_row: usize,
        values: BTreeMap<String, CellValue>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            listing_id,
            transaction_type,
            source_row,
            values,
            created_at,
        }
    }

    /// Returns the listing identifier.
    #[must_use]
    pub fn listing_id(&self) -> RecordId {
        self.listing_id
    }

    /// Returns the transaction type.
    #[must_use]
    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    /// Returns the CSV row the listing came from.
    #[must_use]
    pub fn source_row(&self) -> usize {
        self.source_row
    }

    /// Returns the listing field values.
    #[must_use]
    pub fn values(&self) -> &BTreeMap<String, CellValue> {
        &self.values
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns a short label such as `U1, B1, Sunrise City`.
    #[must_use]
    pub fn headline(&self) -> String {
        [FIELD_UNIT_NUMBER, FIELD_BLOCK, FIELD_PROJECT]
            .iter()
            .filter_map(|field| match self.values.get(*field)? {
                CellValue::Scalar(value) => Some(value.clone()),
                CellValue::Localized(text) if !text.en.is_empty() => Some(text.en.clone()),
                CellValue::Localized(text) => Some(text.vi.clone()),
            })
            .filter(|value| !value.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use crate::import_csv::ParsedRow;
    use crate::import_row::{CellValue, LocalizedText, MappedRow};
    use crate::import_schema::{FIELD_BLOCK, FIELD_PROJECT, FIELD_UNIT_NUMBER, TransactionType};

    use super::PropertyListing;

    #[test]
    fn headline_prefers_english_and_falls_back_to_vietnamese() {
        let mut mapped = MappedRow::new();
        mapped.insert(FIELD_UNIT_NUMBER, CellValue::Scalar("U1".to_owned()));
        mapped.insert(
            FIELD_BLOCK,
            CellValue::Localized(LocalizedText::new("", "Tòa B")),
        );
        mapped.insert(
            FIELD_PROJECT,
            CellValue::Localized(LocalizedText::new("Sunrise City", "")),
        );

        let listing = PropertyListing::from_import_row(
            TransactionType::Lease,
            &ParsedRow {
                row_number: 2,
                mapped,
            },
        );

        assert_eq!(listing.headline(), "U1, Tòa B, Sunrise City");
        assert_eq!(listing.source_row(), 2);
    }
}
