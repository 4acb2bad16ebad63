use std::str::FromStr;

use async_trait::async_trait;
use estatery_application::RoleRepository;
use estatery_core::{AppError, AppResult, RecordId};
use estatery_domain::{
    ModuleStructure, PermissionTree, Role, RoleStatus, normalize_role_name,
};
use serde_json::Value;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// PostgreSQL-backed role repository.
///
/// Trees are stored as JSONB and coerced into the strict form on load.
#[derive(Clone)]
pub struct PostgresRoleRepository {
    pool: PgPool,
    structure: &'static ModuleStructure,
}

impl PostgresRoleRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool, structure: &'static ModuleStructure) -> Self {
        Self { pool, structure }
    }
}

#[derive(Debug, FromRow)]
struct RoleRow {
    id: Uuid,
    name: String,
    status: String,
    is_approver: bool,
    permissions: Value,
}

impl RoleRow {
    fn into_role(self, structure: &ModuleStructure) -> AppResult<Role> {
        let status = RoleStatus::from_str(self.status.as_str()).map_err(|error| {
            AppError::Internal(format!(
                "failed to decode status for role '{}': {error}",
                self.id
            ))
        })?;

        Role::restore(
            RecordId::from_uuid(self.id),
            self.name,
            status,
            self.is_approver,
            PermissionTree::from_loose_value(structure, &self.permissions),
            structure,
        )
    }
}

#[async_trait]
impl RoleRepository for PostgresRoleRepository {
    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        let rows = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id, name, status, is_approver, permissions
            FROM roles
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list roles: {error}")))?;

        rows.into_iter()
            .map(|row| row.into_role(self.structure))
            .collect()
    }

    async fn find_role(&self, role_id: RecordId) -> AppResult<Option<Role>> {
        sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id, name, status, is_approver, permissions
            FROM roles
            WHERE id = $1
            "#,
        )
        .bind(role_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find role '{role_id}': {error}")))?
        .map(|row| row.into_role(self.structure))
        .transpose()
    }

    async fn find_role_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id, name, status, is_approver, permissions
            FROM roles
            WHERE name_key = $1
            "#,
        )
        .bind(normalize_role_name(name))
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find role '{name}': {error}")))?
        .map(|row| row.into_role(self.structure))
        .transpose()
    }

    async fn save_role(&self, role: Role) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO roles (id, name, name_key, status, is_approver, permissions)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE
            SET name = EXCLUDED.name,
                name_key = EXCLUDED.name_key,
                status = EXCLUDED.status,
                is_approver = EXCLUDED.is_approver,
                permissions = EXCLUDED.permissions,
                updated_at = now()
            "#,
        )
        .bind(role.role_id().as_uuid())
        .bind(role.name().as_str())
        .bind(normalize_role_name(role.name().as_str()))
        .bind(role.status().as_str())
        .bind(role.is_approver())
        .bind(role.permissions().to_value())
        .execute(&self.pool)
        .await
        .map_err(|error| match &error {
            sqlx::Error::Database(database_error) if database_error.is_unique_violation() => {
                AppError::Conflict(format!("role '{}' already exists", role.name()))
            }
            _ => AppError::Internal(format!("failed to save role '{}': {error}", role.name())),
        })?;

        Ok(())
    }

    async fn delete_role(&self, role_id: RecordId) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(role_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to delete role '{role_id}': {error}"))
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("role '{role_id}' does not exist")));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
