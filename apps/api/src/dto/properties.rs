use estatery_domain::PropertyListing;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

/// Query for listing imported properties.
#[derive(Debug, Default, Deserialize)]
pub struct ListPropertiesQuery {
    pub transaction_type: Option<String>,
}

/// API representation of an imported listing.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/property-listing-response.ts"
)]
pub struct PropertyListingResponse {
    pub listing_id: String,
    pub transaction_type: String,
    pub source_row: usize,
    pub headline: String,
    #[ts(type = "Record<string, string | { en: string, vi: string }>")]
    pub values: Value,
    pub created_at: String,
}

impl From<PropertyListing> for PropertyListingResponse {
    fn from(value: PropertyListing) -> Self {
        Self {
            listing_id: value.listing_id().to_string(),
            transaction_type: value.transaction_type().as_str().to_owned(),
            source_row: value.source_row(),
            headline: value.headline(),
            values: serde_json::to_value(value.values()).unwrap_or(Value::Null),
            created_at: value.created_at().to_rfc3339(),
        }
    }
}
