use std::path::Path;

use bytes::Bytes;
use futures_util::StreamExt;
use org_logging::{org_debug, org_info};
use org_settings_core::{FieldEditIntent, OrgSnapshot, UploadProgress};
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::{ApiError, ApiSettings, FailureKind, UploadOutput};

/// Receives byte-level progress of a running upload.
pub trait ProgressSink: Send + Sync {
    fn emit(&self, progress: UploadProgress);
}

#[async_trait::async_trait]
pub trait OrgApi: Send + Sync {
    async fn fetch_org(&self, org_id: &str) -> Result<OrgSnapshot, ApiError>;

    async fn save_field(&self, intent: &FieldEditIntent) -> Result<(), ApiError>;
}

/// The external upload operation observed by the relay.
#[async_trait::async_trait]
pub trait LogoUploader: Send + Sync {
    async fn upload_logo(
        &self,
        org_id: &str,
        file: LogoFile,
        sink: &dyn ProgressSink,
    ) -> Result<UploadOutput, ApiError>;
}

/// Everything the engine needs from the organization service.
pub trait OrgBackend: OrgApi + LogoUploader {}

impl<T: OrgApi + LogoUploader + ?Sized> OrgBackend for T {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl LogoFile {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        let file_name = file_name.into();
        Self {
            content_type: content_type_for(&file_name).to_string(),
            file_name,
            bytes: bytes.into(),
        }
    }

    /// Reads the file at `path`. Files above `max_bytes` are rejected from
    /// their metadata without being read.
    pub async fn read(path: &Path, max_bytes: u64) -> Result<Self, ApiError> {
        let io_error = |err: std::io::Error| {
            ApiError::new(FailureKind::Io, format!("{}: {err}", path.display()))
        };
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "logo".to_string());

        let actual = tokio::fs::metadata(path).await.map_err(io_error)?.len();
        check_logo_size(&file_name, actual, max_bytes)?;
        let bytes = tokio::fs::read(path).await.map_err(io_error)?;
        Ok(Self::new(file_name, bytes))
    }

    pub(crate) fn len(&self) -> u64 {
        self.bytes.len() as u64
    }
}

fn check_logo_size(file_name: &str, actual: u64, max_bytes: u64) -> Result<(), ApiError> {
    if actual > max_bytes {
        return Err(ApiError::new(
            FailureKind::TooLarge { max_bytes, actual },
            file_name,
        ));
    }
    Ok(())
}

fn content_type_for(file_name: &str) -> &'static str {
    let extension = Path::new(file_name)
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase());
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrgDto {
    id: String,
    #[serde(default)]
    name: String,
    website: Option<String>,
    email: Option<String>,
    logo_url: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LogoDto {
    logo_url: Option<String>,
}

#[derive(Serialize)]
struct SaveOrgRequest<'a> {
    id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    website: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
}

impl<'a> SaveOrgRequest<'a> {
    fn from_intent(intent: &'a FieldEditIntent) -> Self {
        use org_settings_core::Field;

        let value = Some(intent.value.as_str());
        let mut request = Self {
            id: &intent.org_id,
            name: None,
            website: None,
            email: None,
        };
        match intent.field {
            Field::Name => request.name = value,
            Field::Website => request.website = value,
            Field::Email => request.email = value,
        }
        request
    }
}

#[derive(Debug, Clone)]
pub struct ReqwestOrgApi {
    settings: ApiSettings,
    client: reqwest::Client,
}

impl ReqwestOrgApi {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        Url::parse(&settings.base_url)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    /// `{base}/v1/organizations/{org_id}[/{tail}]`, with the id percent-encoded.
    fn endpoint(&self, org_id: &str, tail: Option<&str>) -> Result<Url, ApiError> {
        let mut url = Url::parse(&self.settings.base_url)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                ApiError::new(FailureKind::InvalidUrl, "base url cannot carry a path")
            })?;
            segments.pop_if_empty().extend(["v1", "organizations", org_id]);
            if let Some(tail) = tail {
                segments.push(tail);
            }
        }
        Ok(url)
    }
}

#[async_trait::async_trait]
impl OrgApi for ReqwestOrgApi {
    async fn fetch_org(&self, org_id: &str) -> Result<OrgSnapshot, ApiError> {
        let url = self.endpoint(org_id, None)?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let org: OrgDto = read_envelope(response).await?;
        Ok(OrgSnapshot {
            id: org.id,
            name: org.name,
            website: org.website,
            email: org.email,
            logo_url: org.logo_url,
        })
    }

    async fn save_field(&self, intent: &FieldEditIntent) -> Result<(), ApiError> {
        let url = self.endpoint(&intent.org_id, None)?;
        let body = serde_json::to_vec(&SaveOrgRequest::from_intent(intent))
            .map_err(|err| ApiError::new(FailureKind::InvalidResponse, err.to_string()))?;
        org_debug!("PUT {} field={}", url, intent.field);
        let response = self
            .client
            .put(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        check_status(&response)?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl LogoUploader for ReqwestOrgApi {
    async fn upload_logo(
        &self,
        org_id: &str,
        file: LogoFile,
        sink: &dyn ProgressSink,
    ) -> Result<UploadOutput, ApiError> {
        let total = file.len();
        check_logo_size(&file.file_name, total, self.settings.max_logo_bytes)?;

        let url = self.endpoint(org_id, Some("logo"))?;
        let chunk_len = self.settings.upload_chunk_bytes.max(1);
        let chunks: Vec<Bytes> = (0..file.bytes.len())
            .step_by(chunk_len)
            .map(|start| {
                let end = (start + chunk_len).min(file.bytes.len());
                file.bytes.slice(start..end)
            })
            .collect();

        // Ticks are produced as the client pulls body chunks.
        let (progress_tx, mut progress_rx) = tokio::sync::mpsc::unbounded_channel();
        let mut sent = 0u64;
        let body = futures_util::stream::iter(chunks).map(move |chunk| {
            sent += chunk.len() as u64;
            let _ = progress_tx.send(UploadProgress::new(sent, total));
            Ok::<Bytes, std::io::Error>(chunk)
        });

        let part = Part::stream_with_length(Body::wrap_stream(body), total)
            .file_name(file.file_name.clone())
            .mime_str(&file.content_type)
            .map_err(map_reqwest_error)?;
        let form = Form::new().part("file", part);

        org_info!(
            "Uploading logo {} ({} bytes) for org {}",
            file.file_name,
            total,
            org_id
        );
        let request = self.client.post(url).multipart(form).send();
        tokio::pin!(request);
        let response = loop {
            tokio::select! {
                Some(progress) = progress_rx.recv() => sink.emit(progress),
                result = &mut request => break result.map_err(map_reqwest_error)?,
            }
        };
        while let Ok(progress) = progress_rx.try_recv() {
            sink.emit(progress);
        }

        let logo: LogoDto = read_envelope(response).await?;
        let logo_url = logo.logo_url.ok_or_else(|| {
            ApiError::new(FailureKind::InvalidResponse, "response carries no logoUrl")
        })?;
        Ok(UploadOutput {
            logo_url,
            bytes_sent: total,
        })
    }
}

fn check_status(response: &reqwest::Response) -> Result<(), ApiError> {
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(ApiError::new(
            FailureKind::HttpStatus(status.as_u16()),
            status.to_string(),
        ))
    }
}

async fn read_envelope<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    check_status(&response)?;
    let body = response.bytes().await.map_err(map_reqwest_error)?;
    let envelope: Envelope<T> = serde_json::from_slice(&body)
        .map_err(|err| ApiError::new(FailureKind::InvalidResponse, err.to_string()))?;
    Ok(envelope.data)
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}
