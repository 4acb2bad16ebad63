use async_trait::async_trait;
use estatery_core::{AppResult, RecordId};
use estatery_domain::Staff;

/// Repository port for staff persistence.
#[async_trait]
pub trait StaffRepository: Send + Sync {
    /// Lists staff members ordered by display name.
    async fn list_staff(&self) -> AppResult<Vec<Staff>>;

    /// Finds a staff member by identifier.
    async fn find_staff(&self, staff_id: RecordId) -> AppResult<Option<Staff>>;

    /// Inserts or replaces a staff member.
    async fn save_staff(&self, staff: Staff) -> AppResult<()>;

    /// Counts staff members assigned to a role name.
    async fn count_with_role(&self, role_name: &str) -> AppResult<usize>;

    /// Moves every assignment from one role name to another.
    async fn reassign_role(&self, from_role_name: &str, to_role_name: &str) -> AppResult<usize>;
}
