use std::path::PathBuf;

use crate::{Field, UploadId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    LoadOrg { org_id: String },
    /// Feed a validated value to the debounced updater.
    EditField { field: Field, value: String },
    /// Drop the field's pending save.
    CancelFieldEdit { field: Field },
    UploadLogo { upload_id: UploadId, path: PathBuf },
}
