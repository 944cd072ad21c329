use std::fmt::Write;

use org_settings_core::{Field, FieldRowView, SaveStatus, SettingsViewModel, UploadStatus};

const LABEL_WIDTH: usize = 20;
const SKELETON: &str = "░░░░░░░░";

/// Renders the page as plain text, rows in page order: name, logo, website, email.
pub(crate) fn render(view: &SettingsViewModel) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {} ==", view.heading);
    if let Some(err) = &view.load_error {
        let _ = writeln!(out, "! could not load organization: {err}");
    }

    if let Some(row) = view.field(Field::Name) {
        render_field(&mut out, row);
    }
    render_logo(&mut out, view);
    for field in [Field::Website, Field::Email] {
        if let Some(row) = view.field(field) {
            render_field(&mut out, row);
        }
    }
    out
}

fn render_field(out: &mut String, row: &FieldRowView) {
    if row.skeleton {
        let _ = writeln!(out, "{:<LABEL_WIDTH$}{SKELETON}", row.label);
        return;
    }
    let value = if row.value.is_empty() {
        format!("({})", row.placeholder)
    } else {
        row.value.clone()
    };
    let mut line = format!("{:<LABEL_WIDTH$}{value}", row.label);
    match &row.save {
        SaveStatus::Idle => {}
        SaveStatus::Pending => line.push_str("  [editing]"),
        SaveStatus::Saving => line.push_str("  [saving]"),
        SaveStatus::Saved => line.push_str("  [saved]"),
        SaveStatus::Failed(err) => {
            let _ = write!(line, "  [save failed: {err}]");
        }
    }
    if let Some(error) = row.error {
        let _ = write!(line, "  ! {error}");
    }
    let _ = writeln!(out, "{line}");
}

fn render_logo(out: &mut String, view: &SettingsViewModel) {
    let logo = &view.logo;
    if logo.skeleton {
        let _ = writeln!(out, "{:<LABEL_WIDTH$}{SKELETON}", logo.label);
        return;
    }
    let url = logo.url.as_deref().unwrap_or("(no logo)");
    let mut line = format!("{:<LABEL_WIDTH$}{url}", logo.label);
    let file = logo.file_name.as_deref().unwrap_or("file");
    match &logo.upload {
        UploadStatus::Idle => {}
        UploadStatus::InProgress { percentage } => {
            let _ = write!(line, "  [uploading {file} {percentage}%]");
        }
        UploadStatus::Complete => {
            let _ = write!(line, "  [uploaded {file}]");
        }
        UploadStatus::Failed(err) => {
            let _ = write!(line, "  [upload of {file} failed: {err}]");
        }
    }
    let _ = writeln!(out, "{line}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use org_settings_core::{update, AppState, Msg, OrgSnapshot};

    fn loaded() -> AppState {
        let (state, _) = update(AppState::new("org-1"), Msg::PageOpened);
        let (state, _) = update(
            state,
            Msg::OrgLoaded(OrgSnapshot {
                id: "org-1".to_string(),
                name: "Acme".to_string(),
                website: None,
                email: None,
                logo_url: None,
            }),
        );
        state
    }

    #[test]
    fn skeleton_rows_while_fetching() {
        let (state, _) = update(AppState::new("org-1"), Msg::PageOpened);
        let text = render(&state.view());

        assert!(text.starts_with("== General ==\n"));
        assert_eq!(text.matches(SKELETON).count(), 4);
    }

    #[test]
    fn rows_follow_page_order_with_placeholders() {
        let text = render(&loaded().view());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 5);
        assert!(lines[1].starts_with("Organization Name") && lines[1].ends_with("Acme"));
        assert!(lines[2].starts_with("Upload Logo") && lines[2].ends_with("(no logo)"));
        assert!(lines[3].ends_with("(Your website)"));
        assert!(lines[4].ends_with("(Email)"));
    }

    #[test]
    fn validation_and_upload_status_are_shown() {
        let (state, _) = update(
            loaded(),
            Msg::FieldChanged {
                field: Field::Email,
                value: "ops@".to_string(),
            },
        );
        let (state, _) = update(
            state,
            Msg::LogoSelected {
                path: "acme.png".into(),
            },
        );
        let (state, _) = update(
            state,
            Msg::UploadProgress {
                upload_id: 1,
                percentage: 42,
            },
        );

        let text = render(&state.view());
        assert!(text.contains("ops@  ! Please enter a valid email"));
        assert!(text.contains("[uploading acme.png 42%]"));
    }
}
