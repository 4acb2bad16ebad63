mod audit;
mod directory;
mod properties;
mod roles;
mod staff;

pub use audit::{AuditAction, AuditEvent, AuditRepository};
pub use directory::{BulkUploadGateway, BulkUploadResult, RoleDirectory};
pub use properties::PropertyRepository;
pub use roles::RoleRepository;
pub use staff::StaffRepository;
