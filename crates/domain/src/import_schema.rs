use std::str::FromStr;

use estatery_core::AppError;
use serde::{Deserialize, Serialize};

/// Project or community the unit belongs to.
pub const FIELD_PROJECT: &str = "Project / Community";
/// Area or zone inside the project.
pub const FIELD_AREA: &str = "Area / Zone";
/// Building block name.
pub const FIELD_BLOCK: &str = "Block Name";
/// Unit number inside the block.
pub const FIELD_UNIT_NUMBER: &str = "Unit Number";
/// Apartment, villa, townhouse and similar.
pub const FIELD_PROPERTY_TYPE: &str = "Property Type";
/// Bedroom count.
pub const FIELD_BEDROOMS: &str = "Bedrooms";
/// Bathroom count.
pub const FIELD_BATHROOMS: &str = "Bathrooms";
/// Floor area in square meters.
pub const FIELD_UNIT_SIZE: &str = "Unit Size";
/// Monthly rent for lease listings.
pub const FIELD_MONTHLY_RENT: &str = "Monthly Rent";
/// Asking price for sale listings.
pub const FIELD_SALE_PRICE: &str = "Sale Price";
/// Nightly rate for homestay listings.
pub const FIELD_NIGHTLY_RATE: &str = "Nightly Rate";
/// First date the unit is available.
pub const FIELD_AVAILABLE_FROM: &str = "Available From";
/// Furnishing level for lease listings.
pub const FIELD_FURNISHING: &str = "Furnishing";
/// Ownership paperwork status for sale listings.
pub const FIELD_LEGAL_STATUS: &str = "Legal Status";
/// Amenities offered by a homestay.
pub const FIELD_AMENITIES: &str = "Amenities";
/// Free-text description.
pub const FIELD_DESCRIPTION: &str = "Description";

/// Fields required on every row whatever the transaction type.
pub const MANDATORY_FIELDS: &[&str] = &[FIELD_PROJECT, FIELD_AREA, FIELD_BLOCK];

/// Listing transaction type selecting the CSV field list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    /// Long-term rental.
    Lease,
    /// Outright sale.
    Sale,
    /// Short-stay rental.
    Homestay,
}

impl TransactionType {
    /// Returns a stable storage value for this transaction type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lease => "lease",
            Self::Sale => "sale",
            Self::Homestay => "homestay",
        }
    }

    /// Returns all transaction types.
    #[must_use]
    pub fn all() -> &'static [Self] {
        &[Self::Lease, Self::Sale, Self::Homestay]
    }

    /// Returns the price field that applies to this transaction type.
    #[must_use]
    pub fn price_field(&self) -> &'static str {
        match self {
            Self::Lease => FIELD_MONTHLY_RENT,
            Self::Sale => FIELD_SALE_PRICE,
            Self::Homestay => FIELD_NIGHTLY_RATE,
        }
    }

    /// Returns the permission path gating listings of this type.
    #[must_use]
    pub fn permission_path(&self) -> &'static str {
        match self {
            Self::Lease => "properties.lease",
            Self::Sale => "properties.sale",
            Self::Homestay => "properties.homestay",
        }
    }
}

impl FromStr for TransactionType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "lease" => Ok(Self::Lease),
            "sale" => Ok(Self::Sale),
            "homestay" => Ok(Self::Homestay),
            _ => Err(AppError::Validation(format!(
                "unknown transaction type '{value}'"
            ))),
        }
    }
}

/// Format rule applied to a scalar field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// Non-negative number such as a room count or area.
    Number,
    /// Non-negative monetary amount.
    Currency,
    /// Calendar date written as `YYYY-MM-DD`.
    Date,
    /// Free-form identifier without format rules.
    Identifier,
}

/// Whether a base field is bilingual or single-valued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Free text read from both the EN and VI columns.
    Localized,
    /// Single value read from the EN column only.
    Scalar(ScalarKind),
}

/// Domain column before it is split into EN/VI columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseField {
    name: &'static str,
    kind: FieldKind,
    sample_en: &'static str,
    sample_vi: &'static str,
}

impl BaseField {
    const fn localized(name: &'static str, sample_en: &'static str, sample_vi: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Localized,
            sample_en,
            sample_vi,
        }
    }

    const fn scalar(name: &'static str, kind: ScalarKind, sample: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Scalar(kind),
            sample_en: sample,
            sample_vi: "",
        }
    }

    /// Returns the base field name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the field kind.
    #[must_use]
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Returns whether the field is required on every row.
    #[must_use]
    pub fn is_mandatory(&self) -> bool {
        MANDATORY_FIELDS.contains(&self.name)
    }

    /// Returns the English column header label.
    #[must_use]
    pub fn en_label(&self) -> String {
        format!("{} (EN)", self.name)
    }

    /// Returns the Vietnamese column header label.
    #[must_use]
    pub fn vi_label(&self) -> String {
        format!("{} (VI)", self.name)
    }

    /// Returns the sample values written into the downloadable template.
    #[must_use]
    pub fn samples(&self) -> (&'static str, &'static str) {
        (self.sample_en, self.sample_vi)
    }
}

const PROJECT: BaseField = BaseField::localized(FIELD_PROJECT, "Vinhomes Central Park", "Vinhomes Central Park");
const AREA: BaseField = BaseField::localized(FIELD_AREA, "Binh Thanh District", "Quận Bình Thạnh");
const BLOCK: BaseField = BaseField::localized(FIELD_BLOCK, "Landmark 2", "Landmark 2");
const UNIT_NUMBER: BaseField = BaseField::scalar(FIELD_UNIT_NUMBER, ScalarKind::Identifier, "L2-1205");
const PROPERTY_TYPE: BaseField = BaseField::localized(FIELD_PROPERTY_TYPE, "Apartment", "Căn hộ");
const BEDROOMS: BaseField = BaseField::scalar(FIELD_BEDROOMS, ScalarKind::Number, "2");
const BATHROOMS: BaseField = BaseField::scalar(FIELD_BATHROOMS, ScalarKind::Number, "2");
const UNIT_SIZE: BaseField = BaseField::scalar(FIELD_UNIT_SIZE, ScalarKind::Number, "85.5");
const MONTHLY_RENT: BaseField = BaseField::scalar(FIELD_MONTHLY_RENT, ScalarKind::Currency, "18000000");
const SALE_PRICE: BaseField = BaseField::scalar(FIELD_SALE_PRICE, ScalarKind::Currency, "6500000000");
const NIGHTLY_RATE: BaseField = BaseField::scalar(FIELD_NIGHTLY_RATE, ScalarKind::Currency, "1200000");
const AVAILABLE_FROM: BaseField = BaseField::scalar(FIELD_AVAILABLE_FROM, ScalarKind::Date, "2024-01-01");
const FURNISHING: BaseField = BaseField::localized(FIELD_FURNISHING, "Fully furnished", "Đầy đủ nội thất");
const LEGAL_STATUS: BaseField = BaseField::localized(FIELD_LEGAL_STATUS, "Pink book issued", "Đã có sổ hồng");
const AMENITIES: BaseField = BaseField::localized(FIELD_AMENITIES, "Pool, gym", "Hồ bơi, phòng gym");
const DESCRIPTION: BaseField = BaseField::localized(
    FIELD_DESCRIPTION,
    "River view, high floor",
    "View sông, tầng cao",
);

const LEASE_FIELDS: &[BaseField] = &[
    PROJECT,
    AREA,
    BLOCK,
    UNIT_NUMBER,
    PROPERTY_TYPE,
    BEDROOMS,
    BATHROOMS,
    UNIT_SIZE,
    MONTHLY_RENT,
    AVAILABLE_FROM,
    FURNISHING,
    DESCRIPTION,
];

const SALE_FIELDS: &[BaseField] = &[
    PROJECT,
    AREA,
    BLOCK,
    UNIT_NUMBER,
    PROPERTY_TYPE,
    BEDROOMS,
    BATHROOMS,
    UNIT_SIZE,
    SALE_PRICE,
    AVAILABLE_FROM,
    LEGAL_STATUS,
    DESCRIPTION,
];

const HOMESTAY_FIELDS: &[BaseField] = &[
    PROJECT,
    AREA,
    BLOCK,
    UNIT_NUMBER,
    PROPERTY_TYPE,
    BEDROOMS,
    BATHROOMS,
    UNIT_SIZE,
    NIGHTLY_RATE,
    AMENITIES,
    DESCRIPTION,
];

/// Ordered CSV field list for one transaction type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSchema {
    transaction_type: TransactionType,
    fields: &'static [BaseField],
}

impl ImportSchema {
    /// Returns the field list for a transaction type.
    #[must_use]
    pub fn for_transaction(transaction_type: TransactionType) -> Self {
        let fields = match transaction_type {
            TransactionType::Lease => LEASE_FIELDS,
            TransactionType::Sale => SALE_FIELDS,
            TransactionType::Homestay => HOMESTAY_FIELDS,
        };

        Self {
            transaction_type,
            fields,
        }
    }

    /// Returns the transaction type the schema belongs to.
    #[must_use]
    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    /// Returns base fields in column order.
    #[must_use]
    pub fn fields(&self) -> &'static [BaseField] {
        self.fields
    }

    /// Returns canonical header names in column order.
    #[must_use]
    pub fn field_names(&self) -> Vec<String> {
        self.fields
            .iter()
            .map(|field| field.name().to_owned())
            .collect()
    }

    /// Finds a base field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&'static BaseField> {
        self.fields.iter().find(|field| field.name() == name)
    }

    /// Returns the index of a base field.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.name() == name)
    }

    /// Returns the number of raw CSV columns the schema occupies.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.fields.len() * 2
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::{
        FIELD_AVAILABLE_FROM, FieldKind, ImportSchema, MANDATORY_FIELDS, ScalarKind,
        TransactionType,
    };

    #[test]
    fn every_schema_starts_with_the_mandatory_fields() {
        for transaction_type in TransactionType::all() {
            let schema = ImportSchema::for_transaction(*transaction_type);
            for (index, mandatory) in MANDATORY_FIELDS.iter().enumerate() {
                assert_eq!(schema.position(mandatory), Some(index));
            }
        }
    }

    #[test]
    fn homestay_has_no_availability_date() {
        let schema = ImportSchema::for_transaction(TransactionType::Homestay);
        assert!(schema.field(FIELD_AVAILABLE_FROM).is_none());

        let lease = ImportSchema::for_transaction(TransactionType::Lease);
        assert_eq!(
            lease.field(FIELD_AVAILABLE_FROM).map(|field| field.kind()),
            Some(FieldKind::Scalar(ScalarKind::Date))
        );
    }

    #[test]
    fn price_field_is_part_of_each_schema() {
        for transaction_type in TransactionType::all() {
            let schema = ImportSchema::for_transaction(*transaction_type);
            assert_eq!(
                schema
                    .field(transaction_type.price_field())
                    .map(|field| field.kind()),
                Some(FieldKind::Scalar(ScalarKind::Currency))
            );
        }
    }

    #[test]
    fn transaction_type_parses_transport_values() {
        assert_eq!(
            TransactionType::from_str(" Sale ").ok(),
            Some(TransactionType::Sale)
        );
        assert!(TransactionType::from_str("auction").is_err());
    }
}
