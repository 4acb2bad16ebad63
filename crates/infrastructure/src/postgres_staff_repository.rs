use async_trait::async_trait;
use estatery_application::StaffRepository;
use estatery_core::{AppError, AppResult, RecordId};
use estatery_domain::{Staff, normalize_role_name};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// PostgreSQL-backed staff repository.
#[derive(Clone)]
pub struct PostgresStaffRepository {
    pool: PgPool,
}

impl PostgresStaffRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct StaffRow {
    id: Uuid,
    display_name: String,
    email: Option<String>,
    role_name: String,
}

impl TryFrom<StaffRow> for Staff {
    type Error = AppError;

    fn try_from(row: StaffRow) -> Result<Self, Self::Error> {
        Staff::new(
            RecordId::from_uuid(row.id),
            row.display_name,
            row.email,
            row.role_name,
        )
    }
}

#[async_trait]
impl StaffRepository for PostgresStaffRepository {
    async fn list_staff(&self) -> AppResult<Vec<Staff>> {
        let rows = sqlx::query_as::<_, StaffRow>(
            r#"
            SELECT id, display_name, email, role_name
            FROM staff
            ORDER BY display_name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list staff: {error}")))?;

        rows.into_iter().map(Staff::try_from).collect()
    }

    async fn find_staff(&self, staff_id: RecordId) -> AppResult<Option<Staff>> {
        sqlx::query_as::<_, StaffRow>(
            r#"
            SELECT id, display_name, email, role_name
            FROM staff
            WHERE id = $1
            "#,
        )
        .bind(staff_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to find staff '{staff_id}': {error}"))
        })?
        .map(Staff::try_from)
        .transpose()
    }

    async fn save_staff(&self, staff: Staff) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO staff (id, display_name, email, role_name, role_key)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE
            SET display_name = EXCLUDED.display_name,
                email = EXCLUDED.email,
                role_name = EXCLUDED.role_name,
                role_key = EXCLUDED.role_key
            "#,
        )
        .bind(staff.staff_id().as_uuid())
        .bind(staff.display_name().as_str())
        .bind(staff.email())
        .bind(staff.role_name().as_str())
        .bind(normalize_role_name(staff.role_name().as_str()))
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to save staff '{}': {error}",
                staff.staff_id()
            ))
        })?;

        Ok(())
    }

    async fn count_with_role(&self, role_name: &str) -> AppResult<usize> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM staff WHERE role_key = $1")
            .bind(normalize_role_name(role_name))
            .fetch_one(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to count staff with role '{role_name}': {error}"
                ))
            })?;

        usize::try_from(count)
            .map_err(|error| AppError::Internal(format!("invalid staff count {count}: {error}")))
    }

    async fn reassign_role(&self, from_role_name: &str, to_role_name: &str) -> AppResult<usize> {
        let result = sqlx::query(
            r#"
            UPDATE staff
            SET role_name = $2,
                role_key = $3
            WHERE role_key = $1
            "#,
        )
        .bind(normalize_role_name(from_role_name))
        .bind(to_role_name.trim())
        .bind(normalize_role_name(to_role_name))
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to move staff from role '{from_role_name}' to '{to_role_name}': {error}"
            ))
        })?;

        usize::try_from(result.rows_affected()).map_err(|error| {
            AppError::Internal(format!("invalid reassigned staff count: {error}"))
        })
    }
}
