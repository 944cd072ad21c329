use std::fmt;

use org_settings_core::{Field, OrgSnapshot, UploadId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    OrgLoaded(Result<OrgSnapshot, ApiError>),
    /// A debounced intent left the updater and is being saved.
    SaveStarted { field: Field, value: String },
    SaveCompleted {
        field: Field,
        value: String,
        result: Result<(), ApiError>,
    },
    UploadProgress { upload_id: UploadId, percentage: u8 },
    UploadCompleted { upload_id: UploadId, logo_url: String },
    UploadFailed { upload_id: UploadId, error: ApiError },
}

/// Result of a finished logo upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOutput {
    pub logo_url: String,
    pub bytes_sent: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    InvalidResponse,
    TooLarge { max_bytes: u64, actual: u64 },
    Io,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::InvalidResponse => write!(f, "invalid response"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "file too large (max {max_bytes}, actual {actual})")
            }
            FailureKind::Io => write!(f, "io error"),
        }
    }
}
