use estatery_core::{AppResult, NonEmptyString, RecordId, StaffIdentity};
use serde::{Deserialize, Serialize};

/// Back-office staff member with an assigned role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Staff {
    staff_id: RecordId,
    display_name: NonEmptyString,
    email: Option<String>,
    role_name: NonEmptyString,
}

impl Staff {
    /// Creates a validated staff member.
    pub fn new(
        staff_id: RecordId,
        display_name: impl Into<String>,
        email: Option<String>,
        role_name: impl Into<String>,
    ) -> AppResult<Self> {
        let email = email.and_then(|value| {
            let trimmed = value.trim().to_owned();
            (!trimmed.is_empty()).then_some(trimmed)
        });

        Ok(Self {
            staff_id,
            display_name: NonEmptyString::trimmed(display_name)?,
            email,
            role_name: NonEmptyString::trimmed(role_name)?,
        })
    }

    /// Returns the staff identifier.
    #[must_use]
    pub fn staff_id(&self) -> RecordId {
        self.staff_id
    }

    /// Returns the display name.
    #[must_use]
    pub fn display_name(&self) -> &NonEmptyString {
        &self.display_name
    }

    /// Returns the optional email.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Returns the assigned role name.
    #[must_use]
    pub fn role_name(&self) -> &NonEmptyString {
        &self.role_name
    }

    /// Projects the staff member into a request identity.
    #[must_use]
    pub fn identity(&self) -> StaffIdentity {
        StaffIdentity::new(
            self.staff_id,
            self.display_name.as_str(),
            self.role_name.as_str(),
        )
    }
}
