use estatery_core::{AppResult, RecordId};
use estatery_domain::{
    CONTROL_ADD, CONTROL_BULK_UPLOAD, CONTROL_EDIT, CONTROL_VIEW, ModuleStructure, PermissionPath,
    Role, RoleStatus, SUPER_ADMIN_ROLE_NAME, Staff,
};
use tracing::info;

use crate::api_services::Repositories;

pub(crate) const DEV_SEED_ADMIN_STAFF_ID: &str = "a2c8ea5f-4f39-4724-97f5-932f97f54f76";
const DEV_SEED_ADMIN_DISPLAY_NAME: &str = "Back Office Admin";
const DEV_SEED_ADMIN_EMAIL: &str = "admin@estatery.local";

pub(crate) const DEV_SEED_AGENT_STAFF_ID: &str = "96d11e90-7403-4654-9727-cb1043f8bd31";
const DEV_SEED_AGENT_DISPLAY_NAME: &str = "Leasing Agent";
const DEV_SEED_AGENT_EMAIL: &str = "agent@estatery.local";
const DEV_SEED_AGENT_ROLE: &str = "Leasing Agent";

/// Seeds a super admin and a lease-only agent. Safe to run repeatedly.
pub async fn run(repositories: &Repositories) -> AppResult<()> {
    let structure = ModuleStructure::standard();

    let admin_role = ensure_role(repositories, SUPER_ADMIN_ROLE_NAME, |_| Ok(())).await?;
    let agent_role = ensure_role(repositories, DEV_SEED_AGENT_ROLE, |role| {
        let lease = PermissionPath::parse(structure, "properties.lease")?;
        let tree = role.permissions_mut();
        tree.set_access(structure, &lease, true)?;
        for control in [CONTROL_VIEW, CONTROL_ADD, CONTROL_EDIT, CONTROL_BULK_UPLOAD] {
            tree.set_control(structure, &lease, control, true)?;
        }
        Ok(())
    })
    .await?;

    ensure_staff(
        repositories,
        DEV_SEED_ADMIN_STAFF_ID,
        DEV_SEED_ADMIN_DISPLAY_NAME,
        DEV_SEED_ADMIN_EMAIL,
        &admin_role,
    )
    .await?;
    ensure_staff(
        repositories,
        DEV_SEED_AGENT_STAFF_ID,
        DEV_SEED_AGENT_DISPLAY_NAME,
        DEV_SEED_AGENT_EMAIL,
        &agent_role,
    )
    .await?;

    info!(
        admin_staff_id = DEV_SEED_ADMIN_STAFF_ID,
        agent_staff_id = DEV_SEED_AGENT_STAFF_ID,
        "dev seed applied; send one of these ids as x-staff-id"
    );
    Ok(())
}

async fn ensure_role(
    repositories: &Repositories,
    name: &str,
    grant: impl FnOnce(&mut Role) -> AppResult<()>,
) -> AppResult<Role> {
    if let Some(role) = repositories.roles.find_role_by_name(name).await? {
        return Ok(role);
    }

    let mut role = Role::new(name, RoleStatus::Active, false, ModuleStructure::standard())?;
    grant(&mut role)?;
    repositories.roles.save_role(role.clone()).await?;
    info!(role = name, "seeded role");

    Ok(role)
}

async fn ensure_staff(
    repositories: &Repositories,
    staff_id: &str,
    display_name: &str,
    email: &str,
    role: &Role,
) -> AppResult<()> {
    let staff_id = RecordId::parse(staff_id)?;
    if repositories.staff.find_staff(staff_id).await?.is_some() {
        return Ok(());
    }

    let staff = Staff::new(
        staff_id,
        display_name,
        Some(email.to_owned()),
        role.name().as_str(),
    )?;
    repositories.staff.save_staff(staff).await?;
    info!(staff = display_name, "seeded staff member");

    Ok(())
}
