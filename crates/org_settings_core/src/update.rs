use crate::{AppState, Effect, Msg, UploadStatus};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::PageOpened => {
            state.begin_fetch();
            vec![Effect::LoadOrg {
                org_id: state.org_id().to_string(),
            }]
        }
        Msg::OrgLoaded(org) => {
            // Ignore a snapshot for another organization.
            if org.id != state.org_id() {
                return (state, Vec::new());
            }
            state.apply_org(org);
            Vec::new()
        }
        Msg::OrgLoadFailed { message } => {
            state.fail_fetch(message);
            Vec::new()
        }
        Msg::FieldChanged { field, value } => {
            // Inputs are not rendered while the organization is loading.
            if state.loading().is_fetching_org {
                return (state, Vec::new());
            }
            match state.edit_field(field, value.clone()) {
                Ok(()) => vec![Effect::EditField { field, value }],
                Err(_) => vec![Effect::CancelFieldEdit { field }],
            }
        }
        Msg::SaveStarted { field, value } => {
            state.set_saving(field, value);
            Vec::new()
        }
        Msg::SaveCompleted {
            field,
            value,
            result,
        } => {
            state.finish_save(field, value, result);
            Vec::new()
        }
        Msg::LogoSelected { path } => {
            if state.loading().is_fetching_org {
                return (state, Vec::new());
            }
            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            let upload_id = state.start_upload(file_name);
            vec![Effect::UploadLogo { upload_id, path }]
        }
        Msg::UploadProgress {
            upload_id,
            percentage,
        } => {
            state.update_upload(
                upload_id,
                UploadStatus::InProgress {
                    percentage: percentage.min(100),
                },
            );
            Vec::new()
        }
        Msg::UploadCompleted {
            upload_id,
            logo_url,
        } => {
            if state.update_upload(upload_id, UploadStatus::Complete) {
                state.set_logo_url(logo_url);
            }
            Vec::new()
        }
        Msg::UploadFailed { upload_id, message } => {
            state.update_upload(upload_id, UploadStatus::Failed(message));
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
