//! Application services and ports.

#![forbid(unsafe_code)]

mod authorization_service;
mod bulk_import_service;
mod bulk_import_session;
mod message_catalog;
mod permission_context;
mod permission_resolver;
mod ports;
mod role_service;
mod staff_service;

pub use authorization_service::AuthorizationService;
pub use bulk_import_service::{BulkImportService, DEFAULT_MAX_UPLOAD_BYTES};
pub use bulk_import_session::{BulkImportSession, ImportState};
pub use message_catalog::{Language, MessageCatalog, Notice, NoticeLevel, ReportStage};
pub use permission_context::PermissionContext;
pub use permission_resolver::PermissionResolver;
pub use ports::{
    AuditAction, AuditEvent, AuditRepository, BulkUploadGateway, BulkUploadResult,
    PropertyRepository, RoleDirectory, RoleRepository, StaffRepository,
};
pub use role_service::{CreateRoleInput, RoleService, UpdateRoleInput};
pub use staff_service::{CreateStaffInput, StaffService};
