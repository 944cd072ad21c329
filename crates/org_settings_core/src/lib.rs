//! Org settings core: pure state machine, debounce and upload bookkeeping.
mod debounce;
mod effect;
mod field;
mod msg;
mod org;
mod state;
mod update;
mod upload;
mod view_model;

pub use debounce::{FieldDebouncer, Rearm, TimerToken, DEFAULT_DEBOUNCE_MS};
pub use effect::Effect;
pub use field::{Field, FieldEditIntent, ValidationError};
pub use msg::Msg;
pub use org::{LoadingStates, OrgSnapshot};
pub use state::{AppState, SaveStatus, UploadId, UploadStatus};
pub use update::update;
pub use upload::{RelaySignal, UploadPhase, UploadProgress, UploadTracker};
pub use view_model::{FieldRowView, LogoRowView, SettingsViewModel, SETTINGS_HEADING};
