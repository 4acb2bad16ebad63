use estatery_domain::{ModuleSection, SectionShape};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

/// One top-level section of the permission structure.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/module-section-response.ts"
)]
pub struct ModuleSectionResponse {
    pub key: String,
    /// Controls of a direct section, empty for composite sections.
    pub controls: Vec<String>,
    pub sub_modules: Vec<SubModuleResponse>,
}

/// One sub-module of a composite section.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/sub-module-response.ts"
)]
pub struct SubModuleResponse {
    pub key: String,
    pub controls: Vec<String>,
}

impl From<&ModuleSection> for ModuleSectionResponse {
    fn from(value: &ModuleSection) -> Self {
        match value.shape() {
            SectionShape::Direct(controls) => Self {
                key: value.key().to_owned(),
                controls: owned_controls(controls),
                sub_modules: Vec::new(),
            },
            SectionShape::Composite(sub_modules) => Self {
                key: value.key().to_owned(),
                controls: Vec::new(),
                sub_modules: sub_modules
                    .iter()
                    .map(|(key, controls)| SubModuleResponse {
                        key: (*key).to_owned(),
                        controls: owned_controls(controls),
                    })
                    .collect(),
            },
        }
    }
}

fn owned_controls(controls: &[&str]) -> Vec<String> {
    controls.iter().map(|control| (*control).to_owned()).collect()
}

/// Query for checking the caller's own permissions.
#[derive(Debug, Default, Deserialize)]
pub struct MyPermissionsQuery {
    pub path: Option<String>,
    pub action: Option<String>,
}

/// The caller's role, tree and an optional single check.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/my-permissions-response.ts"
)]
pub struct MyPermissionsResponse {
    pub role_name: Option<String>,
    #[ts(type = "Record<string, Record<string, unknown>> | null")]
    pub permissions: Option<Value>,
    pub check: Option<PermissionCheckResponse>,
}

/// Result of resolving one path for the caller.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/permission-check-response.ts"
)]
pub struct PermissionCheckResponse {
    pub path: String,
    pub action: Option<String>,
    /// Present when an action was asked for.
    pub allowed: Option<bool>,
    pub hidden: bool,
}
