use std::str::FromStr;

use async_trait::async_trait;
use estatery_application::{BulkUploadGateway, BulkUploadResult, RoleDirectory};
use estatery_core::{AppError, AppResult, RecordId};
use estatery_domain::{
    ModuleStructure, PermissionTree, Role, RoleStatus, RowValidationError, TransactionType,
    ValidationErrorKind, ValidationReport,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

const STAFF_ID_HEADER: &str = "x-staff-id";

/// Client for the back-office HTTP API.
///
/// Serves the role directory behind a permission context and the bulk
/// upload gateway behind an import session.
#[derive(Clone)]
pub struct HttpBackendClient {
    http_client: reqwest::Client,
    base_url: Url,
    staff_id: Option<String>,
    structure: &'static ModuleStructure,
}

impl HttpBackendClient {
    /// Creates a client against the given API base URL.
    #[must_use]
    pub fn new(
        http_client: reqwest::Client,
        base_url: Url,
        structure: &'static ModuleStructure,
    ) -> Self {
        Self {
            http_client,
            base_url,
            staff_id: None,
            structure,
        }
    }

    /// Sends requests on behalf of the given staff member.
    #[must_use]
    pub fn with_staff_id(mut self, staff_id: impl Into<String>) -> Self {
        self.staff_id = Some(staff_id.into());
        self
    }

    fn endpoint(&self, path: &str) -> AppResult<Url> {
        self.base_url.join(path).map_err(|error| {
            AppError::Internal(format!("invalid backend endpoint '{path}': {error}"))
        })
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.staff_id {
            Some(staff_id) => builder.header(STAFF_ID_HEADER, staff_id.as_str()),
            None => builder,
        }
    }

    async fn read_json<T>(&self, response: reqwest::Response, what: &str) -> AppResult<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorResponse>()
                .await
                .map(|body| body.message)
                .unwrap_or_else(|_| format!("{what} failed with status {status}"));
            return Err(AppError::Upstream(message));
        }

        response
            .json::<T>()
            .await
            .map_err(|error| AppError::Upstream(format!("invalid {what} response: {error}")))
    }
}

#[async_trait]
impl RoleDirectory for HttpBackendClient {
    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        let url = self.endpoint("api/roles")?;
        let response = self
            .authorized(self.http_client.get(url))
            .send()
            .await
            .map_err(|error| AppError::Upstream(format!("failed to reach role list: {error}")))?;

        let roles: Vec<RoleResponse> = self.read_json(response, "role list").await?;
        roles
            .into_iter()
            .map(|role| role.into_role(self.structure))
            .collect()
    }
}

#[async_trait]
impl BulkUploadGateway for HttpBackendClient {
    async fn upload(
        &self,
        csv_text: &str,
        transaction_type: TransactionType,
        validate_only: bool,
    ) -> AppResult<BulkUploadResult> {
        let url = self.endpoint("api/properties/bulk-upload")?;
        let request = BulkUploadRequest {
            csv: csv_text,
            transaction_type: transaction_type.as_str(),
            validate_only,
        };
        let response = self
            .authorized(self.http_client.post(url))
            .json(&request)
            .send()
            .await
            .map_err(|error| AppError::Upstream(format!("failed to reach bulk upload: {error}")))?;

        let body: BulkUploadResponse = self.read_json(response, "bulk upload").await?;
        Ok(body.into_result())
    }
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    message: String,
}

#[derive(Debug, Deserialize)]
struct RoleResponse {
    role_id: String,
    name: String,
    status: String,
    is_approver: bool,
    #[serde(default)]
    permissions: Value,
}

impl RoleResponse {
    fn into_role(self, structure: &ModuleStructure) -> AppResult<Role> {
        let role_id = RecordId::parse(self.role_id.as_str())
            .map_err(|error| AppError::Upstream(format!("invalid role id: {error}")))?;
        let status = RoleStatus::from_str(self.status.as_str())
            .map_err(|error| AppError::Upstream(format!("invalid role status: {error}")))?;

        Role::restore(
            role_id,
            self.name,
            status,
            self.is_approver,
            PermissionTree::from_loose_value(structure, &self.permissions),
            structure,
        )
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BulkUploadRequest<'a> {
    csv: &'a str,
    transaction_type: &'a str,
    validate_only: bool,
}

#[derive(Debug, Deserialize)]
struct BulkUploadResponse {
    data: BulkUploadData,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BulkUploadData {
    total: usize,
    successful: usize,
    failed: usize,
    #[serde(default)]
    valid_rows: Vec<usize>,
    #[serde(default)]
    errors: Vec<RowErrorsPayload>,
    #[serde(default)]
    successful_properties: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RowErrorsPayload {
    row: usize,
    errors: Vec<FieldErrorPayload>,
}

#[derive(Debug, Deserialize)]
struct FieldErrorPayload {
    field: String,
    #[serde(default)]
    fields: Vec<String>,
    message: String,
    #[serde(rename = "type")]
    kind: ValidationErrorKind,
}

impl BulkUploadResponse {
    fn into_result(self) -> BulkUploadResult {
        let data = self.data;
        let errors = data
            .errors
            .into_iter()
            .flat_map(|row| {
                let row_number = row.row;
                row.errors
                    .into_iter()
                    .map(move |error| RowValidationError {
                        row_number,
                        kind: error.kind,
                        message: error.message,
                        fields: if error.fields.is_empty() {
                            split_fields(error.field.as_str())
                        } else {
                            error.fields
                        },
                    })
            })
            .collect();

        BulkUploadResult {
            report: ValidationReport {
                total: data.total,
                successful: data.successful,
                failed: data.failed,
                errors,
                valid_rows: data.valid_rows,
            },
            successful_properties: data.successful_properties.unwrap_or_default(),
        }
    }
}

fn split_fields(value: &str) -> Vec<String> {
    value
        .split(", ")
        .map(str::trim)
        .filter(|field| !field.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use estatery_domain::{
        CONTROL_HIDE, CONTROL_VIEW, ModuleStructure, PermissionPath, ValidationErrorKind,
    };
    use serde_json::json;

    use super::{BulkUploadRequest, BulkUploadResponse, RoleResponse, split_fields};

    #[test]
    fn bulk_upload_response_flattens_grouped_errors() {
        let body = json!({
            "success": true,
            "data": {
                "total": 3,
                "successful": 1,
                "failed": 2,
                "validRows": [2],
                "errors": [
                    {"row": 3, "errors": [
                        {"field": "project, block", "message": "missing", "type": "missing_fields"},
                        {"field": "bedrooms", "message": "not a number", "type": "invalid_format"}
                    ]},
                    {"row": 4, "errors": [
                        {"field": "unit_number", "message": "missing", "type": "missing_fields"}
                    ]}
                ]
            }
        });

        let Ok(response) = serde_json::from_value::<BulkUploadResponse>(body) else {
            panic!("response should decode");
        };
        let result = response.into_result();

        assert_eq!(result.report.total, 3);
        assert_eq!(result.report.valid_rows, vec![2]);
        assert_eq!(result.report.errors.len(), 3);
        assert_eq!(result.report.errors[0].row_number, 3);
        assert_eq!(result.report.errors[0].fields, vec!["project", "block"]);
        assert_eq!(
            result.report.errors[1].kind,
            ValidationErrorKind::InvalidFormat
        );
        assert_eq!(result.report.errors[2].row_number, 4);
        assert!(result.successful_properties.is_empty());
    }

    #[test]
    fn bulk_upload_request_uses_camel_case() {
        let request = BulkUploadRequest {
            csv: "a,b",
            transaction_type: "lease",
            validate_only: true,
        };

        assert_eq!(
            serde_json::to_value(&request).ok(),
            Some(json!({"csv": "a,b", "transactionType": "lease", "validateOnly": true}))
        );
    }

    #[test]
    fn role_response_coerces_loose_permission_values() {
        let structure = ModuleStructure::standard();
        let body = json!({
            "role_id": "6f9619ff-8b86-d011-b42d-00cf4fc964ff",
            "name": "Sales",
            "status": "Active",
            "is_approver": false,
            "permissions": {"menuStaffs": {"roles": {"view": "true", "hide": false}}}
        });

        let Ok(response) = serde_json::from_value::<RoleResponse>(body) else {
            panic!("role should decode");
        };
        let Ok(role) = response.into_role(structure) else {
            panic!("role should convert");
        };
        let Ok(path) = PermissionPath::parse(structure, "menuStaffs.roles") else {
            panic!("path should parse");
        };

        assert_eq!(role.permissions().control(&path, CONTROL_VIEW), Some(true));
        assert_eq!(role.permissions().control(&path, CONTROL_HIDE), Some(false));
    }

    #[test]
    fn role_response_rejects_bad_identifier() {
        let body = json!({
            "role_id": "not-a-uuid",
            "name": "Sales",
            "status": "Active",
            "is_approver": false
        });

        let Ok(response) = serde_json::from_value::<RoleResponse>(body) else {
            panic!("role should decode");
        };
        assert!(response.into_role(ModuleStructure::standard()).is_err());
    }

    #[test]
    fn field_list_keeps_labels_containing_commas() {
        let body = json!({
            "success": true,
            "data": {
                "total": 1,
                "successful": 1,
                "failed": 0,
                "validRows": [2],
                "errors": [
                    {"row": 2, "errors": [{
                        "field": "Parking, covered, Notes",
                        "fields": ["Parking, covered", "Notes"],
                        "message": "unexpected columns",
                        "type": "extra_fields"
                    }]}
                ]
            }
        });

        let Ok(response) = serde_json::from_value::<BulkUploadResponse>(body) else {
            panic!("response should decode");
        };
        let result = response.into_result();

        assert_eq!(
            result.report.errors[0].fields,
            vec!["Parking, covered", "Notes"]
        );
    }

    #[test]
    fn split_fields_drops_empty_entries() {
        assert_eq!(split_fields("project, block"), vec!["project", "block"]);
        assert!(split_fields("").is_empty());
    }
}
