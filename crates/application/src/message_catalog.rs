use estatery_core::AppError;
use estatery_domain::{ValidationOutcome, ValidationReport};

/// Display language for user-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    /// English.
    #[default]
    En,
    /// Vietnamese.
    Vi,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CatalogEntry {
    fragment: String,
    en: String,
    vi: String,
}

/// Maps backend error messages to readable, localized text.
///
/// Entries match on a case-insensitive fragment of the backend message.
/// Messages without an entry pass through verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageCatalog {
    entries: Vec<CatalogEntry>,
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl MessageCatalog {
    /// Returns an empty catalog.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Returns the catalog for messages produced by the back-office API.
    #[must_use]
    pub fn standard() -> Self {
        Self::empty()
            .with_entry(
                "csv file is empty",
                "The selected file has no rows.",
                "Tệp đã chọn không có dữ liệu.",
            )
            .with_entry(
                "byte limit",
                "The file is too large to upload.",
                "Tệp quá lớn để tải lên.",
            )
            .with_entry(
                "missing mandatory columns",
                "The file is missing required columns. Download the template and try again.",
                "Tệp thiếu các cột bắt buộc. Vui lòng tải tệp mẫu và thử lại.",
            )
            .with_entry(
                "mandatory columns are out of order",
                "Required columns are in the wrong order. Download the template and try again.",
                "Các cột bắt buộc không đúng thứ tự. Vui lòng tải tệp mẫu và thử lại.",
            )
            .with_entry(
                "select a csv file first",
                "Please choose a CSV file first.",
                "Vui lòng chọn tệp CSV trước.",
            )
            .with_entry(
                "fix every error before importing",
                "There are no valid rows to import.",
                "Không có dòng hợp lệ để nhập.",
            )
            .with_entry(
                "already in progress",
                "An upload is already in progress.",
                "Đang có một lượt tải lên khác.",
            )
            .with_entry(
                "already committed",
                "This file has already been imported. Start a new upload.",
                "Tệp này đã được nhập. Vui lòng bắt đầu lượt tải mới.",
            )
            .with_entry(
                "is missing '",
                "You do not have permission to perform this action.",
                "Bạn không có quyền thực hiện thao tác này.",
            )
            .with_entry(
                "cannot view any property listings",
                "You do not have permission to view listings.",
                "Bạn không có quyền xem danh sách bất động sản.",
            )
            .with_entry(
                "super admin role",
                "The Super Admin role cannot be changed this way.",
                "Không thể thay đổi vai trò Super Admin theo cách này.",
            )
            .with_entry(
                "staff member(s)",
                "This role is still assigned to staff members.",
                "Vai trò này vẫn đang được gán cho nhân viên.",
            )
            .with_entry(
                "already exists",
                "This name is already in use.",
                "Tên này đã được sử dụng.",
            )
            .with_entry(
                "failed to reach",
                "Cannot reach the server. Check your connection and try again.",
                "Không thể kết nối máy chủ. Vui lòng kiểm tra kết nối và thử lại.",
            )
    }

    /// Adds an entry. Earlier entries win when several match.
    #[must_use]
    pub fn with_entry(
        mut self,
        fragment: impl Into<String>,
        en: impl Into<String>,
        vi: impl Into<String>,
    ) -> Self {
        self.entries.push(CatalogEntry {
            fragment: fragment.into().to_lowercase(),
            en: en.into(),
            vi: vi.into(),
        });
        self
    }

    /// Translates a backend message, falling back to the message itself.
    #[must_use]
    pub fn translate(&self, message: &str, language: Language) -> String {
        let lowered = message.to_lowercase();
        self.entries
            .iter()
            .find(|entry| lowered.contains(entry.fragment.as_str()))
            .map(|entry| match language {
                Language::En => entry.en.clone(),
                Language::Vi => entry.vi.clone(),
            })
            .unwrap_or_else(|| message.to_owned())
    }
}

/// Severity of a user-visible notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeLevel {
    /// Operation fully succeeded.
    Success,
    /// Operation partly succeeded.
    Warning,
    /// Operation failed.
    Error,
}

/// Stage a report notice describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportStage {
    /// Phase 1 finished.
    Validated,
    /// Phase 2 finished and created `created` listings.
    Committed {
        /// Listings created by the commit.
        created: usize,
    },
}

/// Notification shown to the user after an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity.
    pub level: NoticeLevel,
    /// Localized text.
    pub message: String,
}

impl Notice {
    /// Builds an error notice from a failed operation.
    #[must_use]
    pub fn from_error(error: &AppError, catalog: &MessageCatalog, language: Language) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: catalog.translate(error.message(), language),
        }
    }

    /// Builds the notice for a validation or commit report.
    #[must_use]
    pub fn for_report(report: &ValidationReport, stage: ReportStage, language: Language) -> Self {
        let total = report.total;
        let successful = report.successful;
        let failed = report.failed;

        let (level, en, vi) = match stage {
            ReportStage::Validated if report.is_header_rejection() => (
                NoticeLevel::Error,
                "The file header does not match the template.".to_owned(),
                "Tiêu đề tệp không khớp với tệp mẫu.".to_owned(),
            ),
            ReportStage::Validated => match report.outcome() {
                ValidationOutcome::AllValid => (
                    NoticeLevel::Success,
                    format!("All {total} rows are valid and ready to import."),
                    format!("Tất cả {total} dòng hợp lệ và sẵn sàng để nhập."),
                ),
                ValidationOutcome::PartiallyValid => (
                    NoticeLevel::Warning,
                    format!(
                        "{successful} of {total} rows are valid; {failed} rows with errors will be skipped."
                    ),
                    format!("{successful}/{total} dòng hợp lệ; {failed} dòng có lỗi sẽ bị bỏ qua."),
                ),
                ValidationOutcome::AllInvalid => (
                    NoticeLevel::Error,
                    "No valid rows found. Fix the errors and upload again.".to_owned(),
                    "Không có dòng hợp lệ. Vui lòng sửa lỗi và tải lên lại.".to_owned(),
                ),
            },
            ReportStage::Committed { created: 0 } => (
                NoticeLevel::Error,
                "No listings were imported.".to_owned(),
                "Không có bất động sản nào được nhập.".to_owned(),
            ),
            ReportStage::Committed { created } if failed == 0 => (
                NoticeLevel::Success,
                format!("Imported {created} listings."),
                format!("Đã nhập {created} bất động sản."),
            ),
            ReportStage::Committed { created } => (
                NoticeLevel::Warning,
                format!("Imported {created} listings; {failed} rows were skipped."),
                format!("Đã nhập {created} bất động sản; bỏ qua {failed} dòng."),
            ),
        };

        Self {
            level,
            message: match language {
                Language::En => en,
                Language::Vi => vi,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use estatery_core::AppError;
    use estatery_domain::ValidationReport;

    use super::{Language, MessageCatalog, Notice, NoticeLevel, ReportStage};

    #[test]
    fn mapped_messages_are_translated_and_unmapped_pass_through() {
        let catalog = MessageCatalog::standard();

        assert_eq!(
            catalog.translate(
                "missing mandatory columns: Block Name",
                Language::Vi
            ),
            "Tệp thiếu các cột bắt buộc. Vui lòng tải tệp mẫu và thử lại."
        );
        assert_eq!(
            catalog.translate("listing quota reached", Language::En),
            "listing quota reached"
        );
    }

    #[test]
    fn error_notice_uses_message_without_category_prefix() {
        let error = AppError::Forbidden(
            "staff 'x' with role 'Sales' is missing 'bulkUpload' on 'properties.sale'".to_owned(),
        );
        let notice = Notice::from_error(&error, &MessageCatalog::standard(), Language::En);

        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(
            notice.message,
            "You do not have permission to perform this action."
        );
    }

    #[test]
    fn every_report_outcome_produces_a_notice() {
        let partial = ValidationReport {
            total: 10,
            successful: 8,
            failed: 2,
            errors: Vec::new(),
            valid_rows: (2..10).collect(),
        };

        let validated = Notice::for_report(&partial, ReportStage::Validated, Language::En);
        assert_eq!(validated.level, NoticeLevel::Warning);
        assert_eq!(
            validated.message,
            "8 of 10 rows are valid; 2 rows with errors will be skipped."
        );

        let committed =
            Notice::for_report(&partial, ReportStage::Committed { created: 8 }, Language::Vi);
        assert_eq!(committed.level, NoticeLevel::Warning);
        assert_eq!(committed.message, "Đã nhập 8 bất động sản; bỏ qua 2 dòng.");

        let empty = ValidationReport::default();
        let nothing = Notice::for_report(&empty, ReportStage::Committed { created: 0 }, Language::En);
        assert_eq!(nothing.level, NoticeLevel::Error);
    }
}
