use std::time::Duration;

use org_settings_core::DEFAULT_DEBOUNCE_MS;

#[derive(Debug, Clone)]
pub struct ApiSettings {
    /// Base URL of the API; `v1/organizations/...` is appended.
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_logo_bytes: u64,
    /// Size of the body chunks a logo is streamed in; one progress tick per chunk.
    pub upload_chunk_bytes: usize,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api/".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_logo_bytes: 5 * 1024 * 1024,
            upload_chunk_bytes: 64 * 1024,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub org_id: String,
    pub debounce_interval: Duration,
    pub api: ApiSettings,
}

impl EngineSettings {
    pub fn new(org_id: impl Into<String>) -> Self {
        Self {
            org_id: org_id.into(),
            debounce_interval: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            api: ApiSettings::default(),
        }
    }
}
