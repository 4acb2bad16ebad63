//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod import_csv;
mod import_report;
mod import_row;
mod import_schema;
mod listing;
mod permission;
mod role;
mod staff;

pub use import_csv::{
    ParsedCsv, ParsedRow, RawRow, escape_cell, map_row, parse, read_rows, render_template,
};
pub use import_report::{
    ValidatedImport, ValidationOutcome, ValidationReport, build_report, validate_file,
};
pub use import_row::{
    CellValue, HEADER_ROW_NUMBER, LocalizedText, MappedRow, RowValidationError,
    ValidationErrorKind, validate_header, validate_row,
};
pub use import_schema::{
    BaseField, FIELD_AMENITIES, FIELD_AREA, FIELD_AVAILABLE_FROM, FIELD_BATHROOMS,
    FIELD_BEDROOMS, FIELD_BLOCK, FIELD_DESCRIPTION, FIELD_FURNISHING, FIELD_LEGAL_STATUS,
    FIELD_MONTHLY_RENT, FIELD_NIGHTLY_RATE, FIELD_PROJECT, FIELD_PROPERTY_TYPE,
    FIELD_SALE_PRICE, FIELD_UNIT_NUMBER, FIELD_UNIT_SIZE, FieldKind, ImportSchema,
    MANDATORY_FIELDS, ScalarKind, TransactionType,
};
pub use listing::PropertyListing;
pub use permission::{
    CONTROL_ADD, CONTROL_BULK_UPLOAD, CONTROL_COPY, CONTROL_DELETE, CONTROL_EDIT, CONTROL_HIDE,
    CONTROL_PREVIEW, CONTROL_VIEW, ControlMap, ModuleSection, ModuleStructure, PermissionPath,
    PermissionTree, SectionPermissions, SectionShape, TreeLookup, default_control_value,
};
pub use role::{
    ADMIN_ROLE_NAME, Role, RoleStatus, SUPER_ADMIN_ROLE_NAME, is_admin_role, is_super_admin_role,
    normalize_role_name, role_names_match,
};
pub use staff::Staff;
