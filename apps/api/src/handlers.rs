pub mod bulk_upload;
pub mod health;
pub mod permissions;
pub mod properties;
pub mod roles;
pub mod staff;
