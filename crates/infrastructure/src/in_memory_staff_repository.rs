use std::collections::HashMap;

use async_trait::async_trait;
use estatery_application::StaffRepository;
use estatery_core::{AppResult, RecordId};
use estatery_domain::{Staff, role_names_match};
use tokio::sync::RwLock;

/// In-memory staff repository implementation.
#[derive(Debug, Default)]
pub struct InMemoryStaffRepository {
    staff: RwLock<HashMap<RecordId, Staff>>,
}

impl InMemoryStaffRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StaffRepository for InMemoryStaffRepository {
    async fn list_staff(&self) -> AppResult<Vec<Staff>> {
        let mut staff: Vec<Staff> = self.staff.read().await.values().cloned().collect();
        staff.sort_by(|left, right| {
            left.display_name()
                .as_str()
                .cmp(right.display_name().as_str())
        });
        Ok(staff)
    }

    async fn find_staff(&self, staff_id: RecordId) -> AppResult<Option<Staff>> {
        Ok(self.staff.read().await.get(&staff_id).cloned())
    }

    async fn save_staff(&self, staff: Staff) -> AppResult<()> {
        self.staff.write().await.insert(staff.staff_id(), staff);
        Ok(())
    }

    async fn count_with_role(&self, role_name: &str) -> AppResult<usize> {
        Ok(self
            .staff
            .read()
            .await
            .values()
            .filter(|staff| role_names_match(staff.role_name().as_str(), role_name))
            .count())
    }

    async fn reassign_role(&self, from_role_name: &str, to_role_name: &str) -> AppResult<usize> {
        let mut staff = self.staff.write().await;
        let mut moved = 0;

        for member in staff.values_mut() {
            if !role_names_match(member.role_name().as_str(), from_role_name) {
                continue;
            }
            *member = Staff::new(
                member.staff_id(),
                member.display_name().as_str(),
                member.email().map(str::to_owned),
                to_role_name,
            )?;
            moved += 1;
        }

        Ok(moved)
    }
}
