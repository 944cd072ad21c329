//! Bridges byte-level upload progress to percentage callbacks.
//!
//! The observer sees `report_progress` on every tick, then exactly one of
//! `uploaded` (with the URL the upload returned) or `failed`.

use std::sync::{Mutex, PoisonError};

use org_logging::{org_debug, org_warn};
use org_settings_core::{RelaySignal, UploadProgress, UploadTracker};

use crate::{ApiError, LogoFile, LogoUploader, ProgressSink, UploadOutput};

pub trait UploadObserver: Send + Sync {
    fn report_progress(&self, percentage: u8);
    fn uploaded(&self, logo_url: &str);
    fn failed(&self, error: &ApiError);
}

pub struct UploadProgressRelay<'a> {
    tracker: Mutex<UploadTracker>,
    observer: &'a dyn UploadObserver,
}

impl<'a> UploadProgressRelay<'a> {
    pub fn new(observer: &'a dyn UploadObserver) -> Self {
        Self {
            tracker: Mutex::new(UploadTracker::new()),
            observer,
        }
    }

    pub fn finish(&self, result: &Result<UploadOutput, ApiError>) {
        let signals = {
            let mut tracker = self.tracker.lock().unwrap_or_else(PoisonError::into_inner);
            match result {
                Ok(output) => tracker.on_uploaded(output.logo_url.clone()),
                Err(err) => tracker.on_failed(err.to_string()),
            }
        };
        for signal in signals {
            match (signal, result) {
                (RelaySignal::Progress(percentage), _) => self.observer.report_progress(percentage),
                (RelaySignal::Uploaded(logo_url), _) => self.observer.uploaded(&logo_url),
                (RelaySignal::Failed(_), Err(err)) => self.observer.failed(err),
                (RelaySignal::Failed(reason), Ok(_)) => {
                    org_warn!("Unexpected failure signal for a successful upload: {}", reason)
                }
            }
        }
    }
}

impl ProgressSink for UploadProgressRelay<'_> {
    fn emit(&self, progress: UploadProgress) {
        let signals = self
            .tracker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .on_progress(progress);
        for signal in signals {
            if let RelaySignal::Progress(percentage) = signal {
                self.observer.report_progress(percentage);
            }
        }
    }
}

/// Runs one upload and relays its progress and outcome to `observer`.
pub async fn upload_file<U>(
    uploader: &U,
    org_id: &str,
    file: LogoFile,
    observer: &dyn UploadObserver,
) -> Result<UploadOutput, ApiError>
where
    U: LogoUploader + ?Sized,
{
    let file_name = file.file_name.clone();
    let relay = UploadProgressRelay::new(observer);
    let result = uploader.upload_logo(org_id, file, &relay).await;
    match &result {
        Ok(output) => org_debug!(
            "Upload of {} ({} bytes) finished at {}",
            file_name,
            output.bytes_sent,
            output.logo_url
        ),
        Err(err) => org_warn!("Upload of {} failed: {}", file_name, err),
    }
    relay.finish(&result);
    result
}
