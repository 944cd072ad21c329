use crate::{Field, LoadingStates, SaveStatus, UploadStatus};

pub const SETTINGS_HEADING: &str = "General";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsViewModel {
    pub heading: &'static str,
    pub loading: LoadingStates,
    pub load_error: Option<String>,
    pub fields: Vec<FieldRowView>,
    pub logo: LogoRowView,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRowView {
    pub field: Field,
    pub label: &'static str,
    pub placeholder: &'static str,
    pub value: String,
    pub error: Option<&'static str>,
    pub save: SaveStatus,
    /// Render a loading placeholder instead of the input.
    pub skeleton: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoRowView {
    pub label: &'static str,
    pub url: Option<String>,
    pub file_name: Option<String>,
    pub upload: UploadStatus,
    pub skeleton: bool,
}

impl SettingsViewModel {
    pub fn field(&self, field: Field) -> Option<&FieldRowView> {
        self.fields.iter().find(|row| row.field == field)
    }
}
