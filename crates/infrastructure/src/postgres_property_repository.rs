use std::collections::BTreeMap;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use estatery_application::PropertyRepository;
use estatery_core::{AppError, AppResult, RecordId};
use estatery_domain::{CellValue, PropertyListing, TransactionType};
use serde_json::Value;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// PostgreSQL-backed listing repository.
#[derive(Clone)]
pub struct PostgresPropertyRepository {
    pool: PgPool,
}

impl PostgresPropertyRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ListingRow {
    id: Uuid,
    transaction_type: String,
    source_row: i64,
    field_values: Value,
    created_at: DateTime<Utc>,
}

impl TryFrom<ListingRow> for PropertyListing {
    type Error = AppError;

    fn try_from(row: ListingRow) -> Result<Self, Self::Error> {
        let transaction_type = TransactionType::from_str(row.transaction_type.as_str())?;
        let source_row = usize::try_from(row.source_row).map_err(|error| {
            AppError::Internal(format!(
                "invalid source row {} for listing '{}': {error}",
                row.source_row, row.id
            ))
        })?;
        let values: BTreeMap<String, CellValue> = serde_json::from_value(row.field_values)
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to decode values for listing '{}': {error}",
                    row.id
                ))
            })?;

        Ok(PropertyListing::restore(
            RecordId::from_uuid(row.id),
            transaction_type,
            source_row,
            values,
            row.created_at,
        ))
    }
}

#[async_trait]
impl PropertyRepository for PostgresPropertyRepository {
    async fn save_listings(&self, listings: Vec<PropertyListing>) -> AppResult<()> {
        let mut transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!("failed to start listing transaction: {error}"))
        })?;

        for listing in &listings {
            let values = serde_json::to_value(listing.values()).map_err(|error| {
                AppError::Internal(format!(
                    "failed to encode values for listing '{}': {error}",
                    listing.listing_id()
                ))
            })?;
            let source_row = i64::try_from(listing.source_row()).map_err(|error| {
                AppError::Internal(format!("invalid source row for listing: {error}"))
            })?;

            sqlx::query(
                r#"
                INSERT INTO property_listings (id, transaction_type, source_row, field_values, created_at)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(listing.listing_id().as_uuid())
            .bind(listing.transaction_type().as_str())
            .bind(source_row)
            .bind(values)
            .bind(listing.created_at())
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to insert listing '{}': {error}",
                    listing.listing_id()
                ))
            })?;
        }

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit listing transaction: {error}"))
        })
    }

    async fn list_listings(
        &self,
        transaction_type: Option<TransactionType>,
    ) -> AppResult<Vec<PropertyListing>> {
        let rows = sqlx::query_as::<_, ListingRow>(
            r#"
            SELECT id, transaction_type, source_row, field_values, created_at
            FROM property_listings
            WHERE $1::TEXT IS NULL OR transaction_type = $1
            ORDER BY created_at DESC, source_row ASC
            "#,
        )
        .bind(transaction_type.map(|value| value.as_str()))
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list listings: {error}")))?;

        rows.into_iter().map(PropertyListing::try_from).collect()
    }
}
