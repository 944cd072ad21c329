use std::path::PathBuf;

use crate::{Field, OrgSnapshot, UploadId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Settings page opened; the organization must be fetched.
    PageOpened,
    /// Organization snapshot arrived from the API.
    OrgLoaded(OrgSnapshot),
    /// Organization fetch failed.
    OrgLoadFailed { message: String },
    /// Raw input event on a text field (every keystroke).
    FieldChanged { field: Field, value: String },
    /// A debounced save for the field was dispatched.
    SaveStarted { field: Field, value: String },
    /// A dispatched save finished.
    SaveCompleted {
        field: Field,
        value: String,
        result: Result<(), String>,
    },
    /// User picked a logo file.
    LogoSelected { path: PathBuf },
    /// Upload percentage tick.
    UploadProgress { upload_id: UploadId, percentage: u8 },
    /// Upload finished and returned the new logo URL.
    UploadCompleted { upload_id: UploadId, logo_url: String },
    UploadFailed { upload_id: UploadId, message: String },
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
