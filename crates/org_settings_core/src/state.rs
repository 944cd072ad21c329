use std::collections::BTreeMap;

use crate::view_model::{FieldRowView, LogoRowView, SettingsViewModel, SETTINGS_HEADING};
use crate::{Field, LoadingStates, OrgSnapshot, ValidationError};

pub type UploadId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SaveStatus {
    #[default]
    Idle,
    /// Edited; waiting for the debounce interval.
    Pending,
    Saving,
    Saved,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UploadStatus {
    #[default]
    Idle,
    InProgress { percentage: u8 },
    Complete,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct FieldState {
    value: String,
    error: Option<ValidationError>,
    save: SaveStatus,
    in_flight: usize,
    /// Value of the most recently dispatched save.
    last_sent: Option<String>,
    last_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ActiveUpload {
    upload_id: UploadId,
    file_name: String,
    status: UploadStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    org_id: String,
    org: Option<OrgSnapshot>,
    loading: LoadingStates,
    load_error: Option<String>,
    fields: BTreeMap<Field, FieldState>,
    upload: Option<ActiveUpload>,
    next_upload_id: UploadId,
    dirty: bool,
}

impl AppState {
    pub fn new(org_id: impl Into<String>) -> Self {
        Self {
            org_id: org_id.into(),
            ..Self::default()
        }
    }

    pub fn org_id(&self) -> &str {
        &self.org_id
    }

    pub fn org(&self) -> Option<&OrgSnapshot> {
        self.org.as_ref()
    }

    pub fn loading(&self) -> LoadingStates {
        LoadingStates {
            is_fetching_org: self.loading.is_fetching_org,
            is_saving_org: self
                .fields
                .values()
                .any(|field| field.save == SaveStatus::Saving),
        }
    }

    pub fn view(&self) -> SettingsViewModel {
        let skeleton = self.loading.is_fetching_org;
        let fields = Field::ALL
            .into_iter()
            .map(|field| {
                let state = self.fields.get(&field).cloned().unwrap_or_default();
                FieldRowView {
                    field,
                    label: field.label(),
                    placeholder: field.placeholder(),
                    value: state.value,
                    error: state.error.map(|err| err.message()),
                    save: state.save,
                    skeleton,
                }
            })
            .collect();

        let logo = LogoRowView {
            label: "Upload Logo",
            url: self.org.as_ref().and_then(|org| org.logo_url.clone()),
            file_name: self.upload.as_ref().map(|upload| upload.file_name.clone()),
            upload: self
                .upload
                .as_ref()
                .map(|upload| upload.status.clone())
                .unwrap_or_default(),
            skeleton,
        };

        SettingsViewModel {
            heading: SETTINGS_HEADING,
            loading: self.loading(),
            load_error: self.load_error.clone(),
            fields,
            logo,
            dirty: self.dirty,
        }
    }

    /// Returns whether the state changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn begin_fetch(&mut self) {
        self.loading.is_fetching_org = true;
        self.load_error = None;
        self.mark_dirty();
    }

    pub(crate) fn apply_org(&mut self, org: OrgSnapshot) {
        self.loading.is_fetching_org = false;
        self.load_error = None;
        self.fields = Field::ALL
            .into_iter()
            .map(|field| {
                let state = FieldState {
                    value: org.value(field).to_string(),
                    ..FieldState::default()
                };
                (field, state)
            })
            .collect();
        self.org = Some(org);
        self.mark_dirty();
    }

    pub(crate) fn fail_fetch(&mut self, message: String) {
        self.loading.is_fetching_org = false;
        self.load_error = Some(message);
        self.mark_dirty();
    }

    /// Records the edit and returns its validation result.
    pub(crate) fn edit_field(
        &mut self,
        field: Field,
        value: String,
    ) -> Result<(), ValidationError> {
        let validation = field.validate(&value);
        let state = self.fields.entry(field).or_default();
        state.value = value;
        state.error = validation.err();
        state.save = if validation.is_ok() {
            SaveStatus::Pending
        } else {
            SaveStatus::Idle
        };
        self.mark_dirty();
        validation
    }

    pub(crate) fn set_saving(&mut self, field: Field, value: String) {
        let state = self.fields.entry(field).or_default();
        state.in_flight += 1;
        state.last_sent = Some(value);
        state.last_error = None;
        state.save = SaveStatus::Saving;
        self.mark_dirty();
    }

    /// Applies a save result. Only the most recently dispatched value reaches
    /// the snapshot; the status settles once no save of the field is in flight.
    pub(crate) fn finish_save(&mut self, field: Field, value: String, result: Result<(), String>) {
        let state = self.fields.entry(field).or_default();
        state.in_flight = state.in_flight.saturating_sub(1);
        let latest = state.last_sent.as_deref() == Some(value.as_str());
        match result {
            Ok(()) if latest => {
                if let Some(org) = self.org.as_mut() {
                    org.set_value(field, value);
                }
            }
            Err(message) if latest => state.last_error = Some(message),
            // Results of superseded saves only settle the in-flight count.
            Ok(()) | Err(_) => {}
        }
        // A newer edit keeps its own pending status.
        if state.save == SaveStatus::Saving && state.in_flight == 0 {
            state.save = match state.last_error.take() {
                Some(message) => SaveStatus::Failed(message),
                None => SaveStatus::Saved,
            };
        }
        self.mark_dirty();
    }

    pub(crate) fn start_upload(&mut self, file_name: String) -> UploadId {
        self.next_upload_id += 1;
        let upload_id = self.next_upload_id;
        self.upload = Some(ActiveUpload {
            upload_id,
            file_name,
            status: UploadStatus::InProgress { percentage: 0 },
        });
        self.mark_dirty();
        upload_id
    }

    /// Applies a status to the live upload. Stale or settled uploads are left alone.
    pub(crate) fn update_upload(&mut self, upload_id: UploadId, status: UploadStatus) -> bool {
        let Some(upload) = self.upload.as_mut() else {
            return false;
        };
        if upload.upload_id != upload_id
            || matches!(upload.status, UploadStatus::Complete | UploadStatus::Failed(_))
        {
            return false;
        }
        if upload.status != status {
            upload.status = status;
            self.mark_dirty();
        }
        true
    }

    pub(crate) fn set_logo_url(&mut self, logo_url: String) {
        if let Some(org) = self.org.as_mut() {
            org.logo_url = Some(logo_url);
            self.mark_dirty();
        }
    }
}
