use std::path::PathBuf;
use std::sync::{mpsc, Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use org_logging::{org_error, org_info, org_warn};
use org_settings_core::{Field, FieldEditIntent, UploadId};
use tokio::runtime::{Handle, Runtime};
use tokio_util::task::TaskTracker;

use crate::api::{LogoFile, OrgApi, OrgBackend, ReqwestOrgApi};
use crate::relay::{upload_file, UploadObserver};
use crate::updater::{DebouncedFieldUpdater, IntentSink};
use crate::{ApiError, EngineEvent, EngineSettings, FailureKind};

enum EngineCommand {
    LoadOrg { org_id: String },
    EditField { field: Field, value: String },
    CancelFieldEdit { field: Field },
    UploadLogo { upload_id: UploadId, path: PathBuf },
    /// Flush pending edits, wait for in-flight work, then stop.
    Shutdown { done: mpsc::Sender<()> },
}

#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: Arc<Mutex<mpsc::Receiver<EngineEvent>>>,
}

impl EngineHandle {
    pub fn new(settings: EngineSettings) -> Result<Self, ApiError> {
        let api = ReqwestOrgApi::new(settings.api.clone())?;
        Self::with_backend(settings, Arc::new(api))
    }

    pub fn with_backend(
        settings: EngineSettings,
        backend: Arc<dyn OrgBackend>,
    ) -> Result<Self, ApiError> {
        let runtime = Runtime::new().map_err(|err| {
            org_error!("Failed to start engine runtime: {}", err);
            ApiError::new(FailureKind::Io, format!("engine runtime: {err}"))
        })?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || run_commands(&runtime, settings, backend, cmd_rx, event_tx));

        Ok(Self {
            cmd_tx,
            event_rx: Arc::new(Mutex::new(event_rx)),
        })
    }

    pub fn load_org(&self, org_id: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::LoadOrg {
            org_id: org_id.into(),
        });
    }

    pub fn edit_field(&self, field: Field, value: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::EditField {
            field,
            value: value.into(),
        });
    }

    pub fn cancel_field_edit(&self, field: Field) {
        let _ = self.cmd_tx.send(EngineCommand::CancelFieldEdit { field });
    }

    pub fn upload_logo(&self, upload_id: UploadId, path: impl Into<PathBuf>) {
        let _ = self.cmd_tx.send(EngineCommand::UploadLogo {
            upload_id,
            path: path.into(),
        });
    }

    /// Saves pending edits and waits up to `timeout` for in-flight requests.
    /// Returns false if the engine did not finish in time.
    pub fn shutdown(&self, timeout: Duration) -> bool {
        let (done_tx, done_rx) = mpsc::channel();
        if self
            .cmd_tx
            .send(EngineCommand::Shutdown { done: done_tx })
            .is_err()
        {
            return true;
        }
        done_rx.recv_timeout(timeout).is_ok()
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .try_recv()
            .ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .recv_timeout(timeout)
            .ok()
    }
}

fn run_commands(
    runtime: &Runtime,
    settings: EngineSettings,
    backend: Arc<dyn OrgBackend>,
    cmd_rx: mpsc::Receiver<EngineCommand>,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let tracker = TaskTracker::new();
    let saver = Arc::new(SaveDispatcher {
        backend: backend.clone(),
        event_tx: event_tx.clone(),
        tracker: tracker.clone(),
        runtime: runtime.handle().clone(),
    });
    let updater = DebouncedFieldUpdater::new(
        settings.org_id.clone(),
        settings.debounce_interval,
        saver,
        runtime.handle().clone(),
    );

    while let Ok(command) = cmd_rx.recv() {
        match command {
            EngineCommand::LoadOrg { org_id } => {
                let backend = backend.clone();
                let event_tx = event_tx.clone();
                tracker.spawn_on(
                    async move {
                        let result = backend.fetch_org(&org_id).await;
                        if let Err(err) = &result {
                            org_warn!("Loading org {} failed: {}", org_id, err);
                        }
                        let _ = event_tx.send(EngineEvent::OrgLoaded(result));
                    },
                    runtime.handle(),
                );
            }
            EngineCommand::EditField { field, value } => updater.on_field_change(field, value),
            EngineCommand::CancelFieldEdit { field } => updater.cancel(field),
            EngineCommand::UploadLogo { upload_id, path } => {
                let backend = backend.clone();
                let org_id = settings.org_id.clone();
                let max_bytes = settings.api.max_logo_bytes;
                let observer = ChannelUploadObserver {
                    upload_id,
                    event_tx: event_tx.clone(),
                };
                tracker.spawn_on(
                    async move {
                        let file = match LogoFile::read(&path, max_bytes).await {
                            Ok(file) => file,
                            Err(err) => {
                                observer.failed(&err);
                                return;
                            }
                        };
                        let _ = upload_file(backend.as_ref(), &org_id, file, &observer).await;
                    },
                    runtime.handle(),
                );
            }
            EngineCommand::Shutdown { done } => {
                let flushed = updater.flush();
                org_info!("Engine shutting down; flushed {} pending edits", flushed);
                tracker.close();
                runtime.block_on(tracker.wait());
                let _ = done.send(());
                return;
            }
        }
    }
}

/// Sends debounced intents to the backend without waiting for the result.
struct SaveDispatcher {
    backend: Arc<dyn OrgBackend>,
    event_tx: mpsc::Sender<EngineEvent>,
    tracker: TaskTracker,
    runtime: Handle,
}

impl IntentSink for SaveDispatcher {
    fn dispatch(&self, intent: FieldEditIntent) {
        let field = intent.field;
        let _ = self.event_tx.send(EngineEvent::SaveStarted {
            field,
            value: intent.value.clone(),
        });
        let backend = self.backend.clone();
        let event_tx = self.event_tx.clone();
        self.tracker.spawn_on(
            async move {
                let result = backend.save_field(&intent).await;
                if let Err(err) = &result {
                    org_warn!("Saving {} failed: {}", field, err);
                }
                let _ = event_tx.send(EngineEvent::SaveCompleted {
                    field,
                    value: intent.value,
                    result,
                });
            },
            &self.runtime,
        );
    }
}

struct ChannelUploadObserver {
    upload_id: UploadId,
    event_tx: mpsc::Sender<EngineEvent>,
}

impl UploadObserver for ChannelUploadObserver {
    fn report_progress(&self, percentage: u8) {
        let _ = self.event_tx.send(EngineEvent::UploadProgress {
            upload_id: self.upload_id,
            percentage,
        });
    }

    fn uploaded(&self, logo_url: &str) {
        let _ = self.event_tx.send(EngineEvent::UploadCompleted {
            upload_id: self.upload_id,
            logo_url: logo_url.to_string(),
        });
    }

    fn failed(&self, error: &ApiError) {
        let _ = self.event_tx.send(EngineEvent::UploadFailed {
            upload_id: self.upload_id,
            error: error.clone(),
        });
    }
}
