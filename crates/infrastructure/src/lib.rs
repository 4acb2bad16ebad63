//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod http_backend_client;
mod in_memory_property_repository;
mod in_memory_role_repository;
mod in_memory_staff_repository;
mod postgres_audit_repository;
mod postgres_property_repository;
mod postgres_role_repository;
mod postgres_staff_repository;
mod tracing_audit_repository;

pub use http_backend_client::HttpBackendClient;
pub use in_memory_property_repository::InMemoryPropertyRepository;
pub use in_memory_role_repository::InMemoryRoleRepository;
pub use in_memory_staff_repository::InMemoryStaffRepository;
pub use postgres_audit_repository::PostgresAuditRepository;
pub use postgres_property_repository::PostgresPropertyRepository;
pub use postgres_role_repository::PostgresRoleRepository;
pub use postgres_staff_repository::PostgresStaffRepository;
pub use tracing_audit_repository::TracingAuditRepository;
