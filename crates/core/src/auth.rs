use serde::{Deserialize, Serialize};

use crate::RecordId;

/// Back-office staff member acting on a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffIdentity {
    staff_id: RecordId,
    display_name: String,
    role_name: String,
}

impl StaffIdentity {
    /// Creates a staff identity from directory data.
    #[must_use]
    pub fn new(
        staff_id: RecordId,
        display_name: impl Into<String>,
        role_name: impl Into<String>,
    ) -> Self {
        Self {
            staff_id,
            display_name: display_name.into(),
            role_name: role_name.into(),
        }
    }

    /// Returns the stable staff identifier.
    #[must_use]
    pub fn staff_id(&self) -> RecordId {
        self.staff_id
    }

    /// Returns the display name for the current staff member.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Returns the role name assigned to the staff member.
    #[must_use]
    pub fn role_name(&self) -> &str {
        self.role_name.as_str()
    }

    /// Returns the subject string recorded in audit events.
    #[must_use]
    pub fn subject(&self) -> String {
        self.staff_id.to_string()
    }
}
