//! Org settings engine: debounced saves, upload relay and API transport.
mod api;
mod engine;
mod relay;
mod settings;
mod types;
mod updater;

pub use api::{LogoFile, LogoUploader, OrgApi, OrgBackend, ProgressSink, ReqwestOrgApi};
pub use engine::EngineHandle;
pub use relay::{upload_file, UploadObserver, UploadProgressRelay};
pub use settings::{ApiSettings, EngineSettings};
pub use types::{ApiError, EngineEvent, FailureKind, UploadOutput};
pub use updater::{DebouncedFieldUpdater, IntentSink};
