use async_trait::async_trait;
use estatery_core::AppResult;
use estatery_domain::{PropertyListing, TransactionType};

/// Repository port for listings created by bulk imports.
#[async_trait]
pub trait PropertyRepository: Send + Sync {
    /// Persists listings from one committed upload.
    async fn save_listings(&self, listings: Vec<PropertyListing>) -> AppResult<()>;

    /// Lists listings, newest first, optionally for one transaction type.
    async fn list_listings(
        &self,
        transaction_type: Option<TransactionType>,
    ) -> AppResult<Vec<PropertyListing>>;
}
