use async_trait::async_trait;
use estatery_application::PropertyRepository;
use estatery_core::AppResult;
use estatery_domain::{PropertyListing, TransactionType};
use tokio::sync::RwLock;

/// In-memory listing repository implementation.
#[derive(Debug, Default)]
pub struct InMemoryPropertyRepository {
    listings: RwLock<Vec<PropertyListing>>,
}

impl InMemoryPropertyRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PropertyRepository for InMemoryPropertyRepository {
    async fn save_listings(&self, listings: Vec<PropertyListing>) -> AppResult<()> {
        self.listings.write().await.extend(listings);
        Ok(())
    }

    async fn list_listings(
        &self,
        transaction_type: Option<TransactionType>,
    ) -> AppResult<Vec<PropertyListing>> {
        let mut listings: Vec<PropertyListing> = self
            .listings
            .read()
            .await
            .iter()
            .filter(|listing| {
                transaction_type.is_none_or(|value| listing.transaction_type() == value)
            })
            .cloned()
            .collect();
        listings.sort_by(|left, right| {
            right
                .created_at()
                .cmp(&left.created_at())
                .then_with(|| left.source_row().cmp(&right.source_row()))
        });
        Ok(listings)
    }
}
