use std::collections::BTreeMap;

use estatery_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Control that hides a node from navigation when set.
pub const CONTROL_HIDE: &str = "hide";
/// Control that allows reading a node.
pub const CONTROL_VIEW: &str = "view";
/// Control that allows creating records under a node.
pub const CONTROL_ADD: &str = "add";
/// Control that allows editing records under a node.
pub const CONTROL_EDIT: &str = "edit";
/// Control that allows deleting records under a node.
pub const CONTROL_DELETE: &str = "delete";
/// Control that allows CSV bulk uploads for a listing type.
pub const CONTROL_BULK_UPLOAD: &str = "bulkUpload";
/// Control that allows duplicating a listing.
pub const CONTROL_COPY: &str = "copy";
/// Control that allows previewing unpublished content.
pub const CONTROL_PREVIEW: &str = "preview";

const VISIBILITY_CONTROLS: &[&str] = &[CONTROL_HIDE, CONTROL_VIEW];
const CRUD_CONTROLS: &[&str] = &[
    CONTROL_HIDE,
    CONTROL_VIEW,
    CONTROL_ADD,
    CONTROL_EDIT,
    CONTROL_DELETE,
];
const LISTING_CONTROLS: &[&str] = &[
    CONTROL_HIDE,
    CONTROL_VIEW,
    CONTROL_ADD,
    CONTROL_EDIT,
    CONTROL_DELETE,
    CONTROL_BULK_UPLOAD,
    CONTROL_COPY,
    CONTROL_PREVIEW,
];
const CONTENT_CONTROLS: &[&str] = &[
    CONTROL_HIDE,
    CONTROL_VIEW,
    CONTROL_ADD,
    CONTROL_EDIT,
    CONTROL_DELETE,
    CONTROL_PREVIEW,
];
const SUBSCRIPTION_CONTROLS: &[&str] = &[CONTROL_HIDE, CONTROL_VIEW, CONTROL_DELETE];
const USER_CONTROLS: &[&str] = &[CONTROL_HIDE, CONTROL_VIEW, CONTROL_EDIT, CONTROL_DELETE];

static STANDARD_SECTIONS: &[ModuleSection] = &[
    ModuleSection::direct("dashboard", VISIBILITY_CONTROLS),
    ModuleSection::composite(
        "properties",
        &[
            ("lease", LISTING_CONTROLS),
            ("sale", LISTING_CONTROLS),
            ("homestay", LISTING_CONTROLS),
        ],
    ),
    ModuleSection::direct("landlords", CRUD_CONTROLS),
    ModuleSection::composite(
        "cms",
        &[("blogs", CONTENT_CONTROLS), ("testimonials", CRUD_CONTROLS)],
    ),
    ModuleSection::composite(
        "menuStaffs",
        &[("staffs", CRUD_CONTROLS), ("roles", CRUD_CONTROLS)],
    ),
    ModuleSection::direct("subscriptions", SUBSCRIPTION_CONTROLS),
    ModuleSection::direct("users", USER_CONTROLS),
];

static STANDARD_STRUCTURE: ModuleStructure = ModuleStructure {
    sections: STANDARD_SECTIONS,
};

/// Returns the value a control takes before anyone grants it.
///
/// Everything starts denied and hidden.
#[must_use]
pub fn default_control_value(control: &str) -> bool {
    control == CONTROL_HIDE
}

/// Shape of one top-level section of the module structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionShape {
    /// Section carries its controls directly.
    Direct(&'static [&'static str]),
    /// Section groups sub-modules, each carrying its own controls.
    Composite(&'static [(&'static str, &'static [&'static str])]),
}

/// One top-level section of the module structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleSection {
    key: &'static str,
    shape: SectionShape,
}

impl ModuleSection {
    /// Declares a section with direct controls.
    #[must_use]
    pub const fn direct(key: &'static str, controls: &'static [&'static str]) -> Self {
        Self {
            key,
            shape: SectionShape::Direct(controls),
        }
    }

    /// Declares a section made of sub-modules.
    #[must_use]
    pub const fn composite(
        key: &'static str,
        sub_modules: &'static [(&'static str, &'static [&'static str])],
    ) -> Self {
        Self {
            key,
            shape: SectionShape::Composite(sub_modules),
        }
    }

    /// Returns the section key.
    #[must_use]
    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Returns the section shape.
    #[must_use]
    pub fn shape(&self) -> SectionShape {
        self.shape
    }
}

/// Static shape every role's permission tree must follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleStructure {
    sections: &'static [ModuleSection],
}

impl ModuleStructure {
    /// Returns the back-office module structure.
    #[must_use]
    pub fn standard() -> &'static Self {
        &STANDARD_STRUCTURE
    }

    /// Creates a structure from a custom section list.
    #[must_use]
    pub const fn from_sections(sections: &'static [ModuleSection]) -> Self {
        Self { sections }
    }

    /// Returns sections in declaration order.
    #[must_use]
    pub fn sections(&self) -> &'static [ModuleSection] {
        self.sections
    }

    /// Finds a section by key.
    #[must_use]
    pub fn section(&self, key: &str) -> Option<&'static ModuleSection> {
        self.sections.iter().find(|section| section.key == key)
    }

    /// Returns the controls declared on the node addressed by `path`.
    ///
    /// Composite sections only carry controls on their sub-modules.
    #[must_use]
    pub fn controls_at(&self, path: &PermissionPath) -> Option<&'static [&'static str]> {
        let section = self.section(path.section())?;
        match (section.shape, path.sub_module()) {
            (SectionShape::Direct(controls), None) => Some(controls),
            (SectionShape::Composite(sub_modules), Some(sub_module)) => sub_modules
                .iter()
                .find(|(key, _)| *key == sub_module)
                .map(|(_, controls)| *controls),
            _ => None,
        }
    }

    /// Returns whether `path` names a section or sub-module of the structure.
    #[must_use]
    pub fn contains_node(&self, path: &str) -> bool {
        let segments: Vec<&str> = path.split('.').collect();
        let Some(section) = segments.first().and_then(|key| self.section(key)) else {
            return false;
        };

        match (section.shape, segments.len()) {
            (_, 1) => true,
            (SectionShape::Composite(sub_modules), 2) => {
                sub_modules.iter().any(|(key, _)| *key == segments[1])
            }
            _ => false,
        }
    }

    /// Returns every control-bearing path with its controls.
    #[must_use]
    pub fn leaf_paths(&self) -> Vec<(String, &'static [&'static str])> {
        let mut paths = Vec::new();
        for section in self.sections {
            match section.shape {
                SectionShape::Direct(controls) => paths.push((section.key.to_owned(), controls)),
                SectionShape::Composite(sub_modules) => {
                    for (sub_module, controls) in sub_modules {
                        paths.push((format!("{}.{sub_module}", section.key), *controls));
                    }
                }
            }
        }
        paths
    }
}

/// Validated address of a control-bearing node, such as `menuStaffs.roles`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PermissionPath {
    section: String,
    sub_module: Option<String>,
}

impl PermissionPath {
    /// Parses a dot-separated path and checks it against the structure.
    pub fn parse(structure: &ModuleStructure, value: &str) -> AppResult<Self> {
        let mut segments = value.trim().split('.');
        let section = segments.next().unwrap_or_default().to_owned();
        let sub_module = segments.next().map(str::to_owned);

        if segments.next().is_some() {
            return Err(AppError::Validation(format!(
                "permission path '{value}' is nested too deeply"
            )));
        }

        let path = Self {
            section,
            sub_module,
        };
        if structure.controls_at(&path).is_none() {
            return Err(AppError::Validation(format!(
                "permission path '{value}' does not exist in the module structure"
            )));
        }

        Ok(path)
    }

    /// Returns the section key.
    #[must_use]
    pub fn section(&self) -> &str {
        self.section.as_str()
    }

    /// Returns the sub-module key for composite sections.
    #[must_use]
    pub fn sub_module(&self) -> Option<&str> {
        self.sub_module.as_deref()
    }
}

impl std::fmt::Display for PermissionPath {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.sub_module {
            Some(sub_module) => write!(formatter, "{}.{sub_module}", self.section),
            None => formatter.write_str(self.section.as_str()),
        }
    }
}

/// Boolean capabilities stored on one node.
pub type ControlMap = BTreeMap<String, bool>;

/// Permissions stored for one section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SectionPermissions {
    /// Controls stored directly on the section.
    Direct(ControlMap),
    /// Controls stored per sub-module.
    Composite(BTreeMap<String, ControlMap>),
}

/// Node reached by walking a permission tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeLookup<'a> {
    /// Path ended on a control-bearing node.
    Controls(&'a ControlMap),
    /// Path ended on a composite section without naming a sub-module.
    Group(&'a BTreeMap<String, ControlMap>),
    /// A path segment was absent from the tree.
    Miss,
}

/// Strictly typed permission tree for one role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionTree {
    sections: BTreeMap<String, SectionPermissions>,
}

impl PermissionTree {
    /// Builds the tree a freshly created role receives.
    #[must_use]
    pub fn skeleton(structure: &ModuleStructure) -> Self {
        Self::from_loose_value(structure, &Value::Null)
    }

    /// Coerces a loosely typed stored value into a strict tree.
    ///
    /// Only `true` and `"true"` count as set. Nodes missing from the value are
    /// backfilled with defaults and keys unknown to the structure are dropped.
    #[must_use]
    pub fn from_loose_value(structure: &ModuleStructure, value: &Value) -> Self {
        let mut sections = BTreeMap::new();

        for section in structure.sections() {
            let stored_section = value.get(section.key());
            let permissions = match section.shape() {
                SectionShape::Direct(controls) => {
                    SectionPermissions::Direct(coerce_controls(controls, stored_section))
                }
                SectionShape::Composite(sub_modules) => SectionPermissions::Composite(
                    sub_modules
                        .iter()
                        .map(|(sub_module, controls)| {
                            let stored = stored_section.and_then(|node| node.get(*sub_module));
                            ((*sub_module).to_owned(), coerce_controls(controls, stored))
                        })
                        .collect(),
                ),
            };
            sections.insert(section.key().to_owned(), permissions);
        }

        Self { sections }
    }

    /// Returns a copy conforming to `structure`, with gaps backfilled.
    #[must_use]
    pub fn backfilled(&self, structure: &ModuleStructure) -> Self {
        Self::from_loose_value(structure, &self.to_value())
    }

    /// Walks the tree along dot-separated path segments.
    #[must_use]
    pub fn lookup(&self, path: &str) -> TreeLookup<'_> {
        let segments: Vec<&str> = path.split('.').collect();
        let Some(section) = segments.first().and_then(|key| self.sections.get(*key)) else {
            return TreeLookup::Miss;
        };

        match (section, segments.len()) {
            (SectionPermissions::Direct(controls), 1) => TreeLookup::Controls(controls),
            (SectionPermissions::Composite(sub_modules), 1) => TreeLookup::Group(sub_modules),
            (SectionPermissions::Composite(sub_modules), 2) => sub_modules
                .get(segments[1])
                .map(TreeLookup::Controls)
                .unwrap_or(TreeLookup::Miss),
            _ => TreeLookup::Miss,
        }
    }

    /// Returns a stored control value.
    #[must_use]
    pub fn control(&self, path: &PermissionPath, control: &str) -> Option<bool> {
        self.controls(path)?.get(control).copied()
    }

    /// Stores a control value after checking it exists in the structure.
    pub fn set_control(
        &mut self,
        structure: &ModuleStructure,
        path: &PermissionPath,
        control: &str,
        value: bool,
    ) -> AppResult<()> {
        let declared = structure.controls_at(path).ok_or_else(|| {
            AppError::Validation(format!("permission path '{path}' is not declared"))
        })?;
        if !declared.contains(&control) {
            return Err(AppError::Validation(format!(
                "control '{control}' is not declared on '{path}'"
            )));
        }

        let controls = self.controls_mut(path).ok_or_else(|| {
            AppError::Validation(format!("permission path '{path}' is missing from the tree"))
        })?;
        controls.insert(control.to_owned(), value);
        Ok(())
    }

    /// Returns the UI-facing access toggle, which is the inverse of `hide`.
    #[must_use]
    pub fn access_enabled(&self, path: &PermissionPath) -> Option<bool> {
        self.control(path, CONTROL_HIDE).map(|hidden| !hidden)
    }

    /// Stores the UI-facing access toggle as `hide = !enabled`.
    pub fn set_access(
        &mut self,
        structure: &ModuleStructure,
        path: &PermissionPath,
        enabled: bool,
    ) -> AppResult<()> {
        self.set_control(structure, path, CONTROL_HIDE, !enabled)
    }

    /// Serializes the tree into its nested JSON form.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut root = Map::new();
        for (section, permissions) in &self.sections {
            let node = match permissions {
                SectionPermissions::Direct(controls) => controls_to_value(controls),
                SectionPermissions::Composite(sub_modules) => Value::Object(
                    sub_modules
                        .iter()
                        .map(|(key, controls)| (key.clone(), controls_to_value(controls)))
                        .collect(),
                ),
            };
            root.insert(section.clone(), node);
        }
        Value::Object(root)
    }

    fn controls(&self, path: &PermissionPath) -> Option<&ControlMap> {
        match (self.sections.get(path.section())?, path.sub_module()) {
            (SectionPermissions::Direct(controls), None) => Some(controls),
            (SectionPermissions::Composite(sub_modules), Some(sub_module)) => {
                sub_modules.get(sub_module)
            }
            _ => None,
        }
    }

    fn controls_mut(&mut self, path: &PermissionPath) -> Option<&mut ControlMap> {
        match (self.sections.get_mut(path.section())?, path.sub_module()) {
            (SectionPermissions::Direct(controls), None) => Some(controls),
            (SectionPermissions::Composite(sub_modules), Some(sub_module)) => {
                sub_modules.get_mut(sub_module)
            }
            _ => None,
        }
    }
}

fn coerce_controls(controls: &[&str], stored: Option<&Value>) -> ControlMap {
    controls
        .iter()
        .map(|control| {
            let value = match stored.and_then(|node| node.get(*control)) {
                Some(Value::Bool(flag)) => *flag,
                Some(Value::String(text)) => text == "true",
                Some(_) => false,
                None => default_control_value(control),
            };
            ((*control).to_owned(), value)
        })
        .collect()
}

fn controls_to_value(controls: &ControlMap) -> Value {
    Value::Object(
        controls
            .iter()
            .map(|(key, value)| (key.clone(), Value::Bool(*value)))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use serde_json::json;

    use super::{
        CONTROL_BULK_UPLOAD, CONTROL_EDIT, CONTROL_HIDE, CONTROL_VIEW, ModuleStructure,
        PermissionPath, PermissionTree, TreeLookup,
    };

    fn path(value: &str) -> PermissionPath {
        match PermissionPath::parse(ModuleStructure::standard(), value) {
            Ok(path) => path,
            Err(error) => panic!("invalid test path '{value}': {error}"),
        }
    }

    #[test]
    fn skeleton_is_hidden_and_denied_everywhere() {
        let structure = ModuleStructure::standard();
        let tree = PermissionTree::skeleton(structure);

        for (leaf, controls) in structure.leaf_paths() {
            let leaf = path(leaf.as_str());
            for control in controls {
                let expected = *control == CONTROL_HIDE;
                assert_eq!(tree.control(&leaf, control), Some(expected), "{leaf}.{control}");
            }
        }
    }

    #[test]
    fn loose_values_are_coerced_once() {
        let structure = ModuleStructure::standard();
        let tree = PermissionTree::from_loose_value(
            structure,
            &json!({
                "landlords": { "view": "true", "edit": true, "delete": "yes", "hide": false },
                "properties": { "lease": { "bulkUpload": "true" } },
                "legacyReports": { "view": true }
            }),
        );

        let landlords = path("landlords");
        assert_eq!(tree.control(&landlords, CONTROL_VIEW), Some(true));
        assert_eq!(tree.control(&landlords, CONTROL_EDIT), Some(true));
        assert_eq!(tree.control(&landlords, "delete"), Some(false));
        assert_eq!(tree.control(&landlords, CONTROL_HIDE), Some(false));
        assert_eq!(tree.control(&landlords, "add"), Some(false));

        let lease = path("properties.lease");
        assert_eq!(tree.control(&lease, CONTROL_BULK_UPLOAD), Some(true));
        assert_eq!(tree.control(&lease, CONTROL_HIDE), Some(true));
        assert_eq!(tree.lookup("legacyReports"), TreeLookup::Miss);
    }

    #[test]
    fn hide_toggle_is_inverted() {
        let structure = ModuleStructure::standard();
        let mut tree = PermissionTree::skeleton(structure);
        let roles = path("menuStaffs.roles");

        assert!(tree.set_access(structure, &roles, true).is_ok());
        assert_eq!(tree.control(&roles, CONTROL_HIDE), Some(false));
        assert_eq!(tree.access_enabled(&roles), Some(true));

        assert!(tree.set_access(structure, &roles, false).is_ok());
        assert_eq!(tree.control(&roles, CONTROL_HIDE), Some(true));
        assert_eq!(tree.access_enabled(&roles), Some(false));
    }

    #[test]
    fn set_control_rejects_undeclared_control() {
        let structure = ModuleStructure::standard();
        let mut tree = PermissionTree::skeleton(structure);

        let result = tree.set_control(structure, &path("dashboard"), CONTROL_EDIT, true);
        assert!(result.is_err());
    }

    #[test]
    fn path_parse_rejects_unknown_and_partial_paths() {
        let structure = ModuleStructure::standard();
        assert!(PermissionPath::parse(structure, "properties").is_err());
        assert!(PermissionPath::parse(structure, "properties.rental").is_err());
        assert!(PermissionPath::parse(structure, "landlords.view.extra").is_err());
        assert!(PermissionPath::parse(structure, "menuStaffs.roles").is_ok());
    }

    #[test]
    fn lookup_distinguishes_groups_leaves_and_misses() {
        let tree = PermissionTree::skeleton(ModuleStructure::standard());

        assert!(matches!(tree.lookup("cms"), TreeLookup::Group(_)));
        assert!(matches!(tree.lookup("cms.blogs"), TreeLookup::Controls(_)));
        assert_eq!(tree.lookup("cms.podcasts"), TreeLookup::Miss);
        assert_eq!(tree.lookup("landlords.archive"), TreeLookup::Miss);
    }

    #[test]
    fn serialized_tree_round_trips_through_loose_form() {
        let structure = ModuleStructure::standard();
        let mut tree = PermissionTree::skeleton(structure);
        assert!(
            tree.set_control(structure, &path("cms.blogs"), CONTROL_VIEW, true)
                .is_ok()
        );

        let restored = PermissionTree::from_loose_value(structure, &tree.to_value());
        assert_eq!(restored, tree);
    }

    proptest! {
        #[test]
        fn coercion_only_accepts_strict_truthy_values(
            raw in prop_oneof![
                any::<bool>().prop_map(serde_json::Value::Bool),
                "[a-zA-Z0-9]{0,6}".prop_map(serde_json::Value::String),
                any::<i32>().prop_map(|number| json!(number)),
            ]
        ) {
            let structure = ModuleStructure::standard();
            let tree = PermissionTree::from_loose_value(
                structure,
                &json!({ "subscriptions": { "view": raw.clone() } }),
            );
            let expected = raw == json!(true) || raw == json!("true");

            prop_assert_eq!(
                tree.control(&path("subscriptions"), CONTROL_VIEW),
                Some(expected)
            );
        }
    }
}
