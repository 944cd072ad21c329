use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use org_logging::{org_debug, org_info, org_warn};
use org_settings_core::{Effect, Msg};
use org_settings_engine::{EngineEvent, EngineHandle};

use super::app::AppInput;

pub(crate) struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, input_tx: mpsc::Sender<AppInput>) -> Self {
        let runner = Self { engine };
        runner.spawn_event_loop(input_tx);
        runner
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::LoadOrg { org_id } => {
                    org_info!("LoadOrg org_id={}", org_id);
                    self.engine.load_org(org_id);
                }
                Effect::EditField { field, value } => {
                    org_debug!("EditField field={} value_len={}", field, value.len());
                    self.engine.edit_field(field, value);
                }
                Effect::CancelFieldEdit { field } => {
                    self.engine.cancel_field_edit(field);
                }
                Effect::UploadLogo { upload_id, path } => {
                    org_info!("UploadLogo upload_id={} path={:?}", upload_id, path);
                    self.engine.upload_logo(upload_id, path);
                }
            }
        }
    }

    pub fn engine(&self) -> &EngineHandle {
        &self.engine
    }

    fn spawn_event_loop(&self, input_tx: mpsc::Sender<AppInput>) {
        let engine = self.engine.clone();
        thread::spawn(move || loop {
            if let Some(event) = engine.try_recv() {
                if input_tx.send(AppInput::Msg(map_event(event))).is_err() {
                    break;
                }
            } else {
                thread::sleep(Duration::from_millis(20));
            }
        });
    }
}

pub(crate) fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::OrgLoaded(Ok(org)) => Msg::OrgLoaded(org),
        EngineEvent::OrgLoaded(Err(err)) => Msg::OrgLoadFailed {
            message: err.to_string(),
        },
        EngineEvent::SaveStarted { field, value } => Msg::SaveStarted { field, value },
        EngineEvent::SaveCompleted {
            field,
            value,
            result,
        } => Msg::SaveCompleted {
            field,
            value,
            result: result.map_err(|err| err.kind.to_string()),
        },
        EngineEvent::UploadProgress {
            upload_id,
            percentage,
        } => Msg::UploadProgress {
            upload_id,
            percentage,
        },
        EngineEvent::UploadCompleted {
            upload_id,
            logo_url,
        } => Msg::UploadCompleted {
            upload_id,
            logo_url,
        },
        EngineEvent::UploadFailed { upload_id, error } => {
            org_warn!("Upload {} failed: {}", upload_id, error);
            Msg::UploadFailed {
                upload_id,
                message: error.kind.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use org_settings_core::Field;
    use org_settings_engine::{ApiError, FailureKind};

    #[test]
    fn failed_save_maps_to_short_reason() {
        let msg = map_event(EngineEvent::SaveCompleted {
            field: Field::Name,
            value: "Acme".to_string(),
            result: Err(ApiError {
                kind: FailureKind::HttpStatus(403),
                message: "403 Forbidden".to_string(),
            }),
        });

        assert_eq!(
            msg,
            Msg::SaveCompleted {
                field: Field::Name,
                value: "Acme".to_string(),
                result: Err("http status 403".to_string()),
            }
        );
    }

    #[test]
    fn load_failure_keeps_full_message() {
        let msg = map_event(EngineEvent::OrgLoaded(Err(ApiError {
            kind: FailureKind::Timeout,
            message: "operation timed out".to_string(),
        })));

        assert_eq!(
            msg,
            Msg::OrgLoadFailed {
                message: "timeout: operation timed out".to_string()
            }
        );
    }
}
