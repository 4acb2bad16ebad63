use estatery_application::RoleRepository;
use estatery_core::AppError;
use estatery_domain::{CONTROL_VIEW, ModuleStructure, PermissionPath, Role, RoleStatus};
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;

use super::PostgresRoleRepository;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

async fn test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        return None;
    };

    let pool = match PgPoolOptions::new()
        .max_connections(2)
        .connect(database_url.as_str())
        .await
    {
        Ok(pool) => pool,
        Err(error) => panic!("failed to connect to DATABASE_URL in test: {error}"),
    };

    if let Err(error) = MIGRATOR.run(&pool).await {
        panic!("failed to run migrations for postgres role tests: {error}");
    }

    Some(pool)
}

fn unique_role(prefix: &str) -> Role {
    let name = format!("{prefix} {}", uuid::Uuid::new_v4().simple());
    match Role::new(name, RoleStatus::Active, false, ModuleStructure::standard()) {
        Ok(role) => role,
        Err(error) => panic!("invalid test role: {error}"),
    }
}

#[tokio::test]
async fn saved_tree_round_trips_and_name_lookup_ignores_case() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresRoleRepository::new(pool, ModuleStructure::standard());
    let structure = ModuleStructure::standard();

    let mut role = unique_role("Leasing");
    let Ok(dashboard) = PermissionPath::parse(structure, "dashboard") else {
        panic!("dashboard path should parse");
    };
    assert!(
        role.permissions_mut()
            .set_control(structure, &dashboard, CONTROL_VIEW, true)
            .is_ok()
    );
    assert!(repository.save_role(role.clone()).await.is_ok());

    let found = repository
        .find_role_by_name(&role.name().as_str().to_uppercase())
        .await;
    assert_eq!(found, Ok(Some(role.clone())));

    assert!(repository.delete_role(role.role_id()).await.is_ok());
    let missing = repository.delete_role(role.role_id()).await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn duplicate_name_is_a_conflict() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresRoleRepository::new(pool, ModuleStructure::standard());

    let role = unique_role("Sales");
    assert!(repository.save_role(role.clone()).await.is_ok());

    let Ok(twin) = Role::new(
        role.name().as_str().to_lowercase(),
        RoleStatus::Inactive,
        true,
        ModuleStructure::standard(),
    ) else {
        panic!("twin role should build");
    };
    let duplicate = repository.save_role(twin).await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    assert!(repository.delete_role(role.role_id()).await.is_ok());
}
