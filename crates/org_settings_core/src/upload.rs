//! Upload progress bookkeeping shared by the relay and the page state.

/// Byte-level progress of a single transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadProgress {
    pub loaded: u64,
    pub total: u64,
}

impl UploadProgress {
    pub fn new(loaded: u64, total: u64) -> Self {
        Self { loaded, total }
    }

    /// `round(100 * loaded / total)`, clamped to `0..=100`. An unknown total reads as 0.
    pub fn percentage(self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        let loaded = u128::from(self.loaded);
        let total = u128::from(self.total);
        let scaled = (loaded * 200 + total) / (2 * total);
        scaled.min(100) as u8
    }

    /// Whether the transfer counts as complete. Uses `>= 100` so a rounding
    /// overshoot still completes.
    pub fn is_transferred(self) -> bool {
        self.percentage() >= 100
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadPhase {
    Idle,
    InProgress { percentage: u8 },
    /// All bytes sent; waiting for the upload to return the new URL.
    Transferred,
    Complete { logo_url: String },
    Failed { reason: String },
}

impl UploadPhase {
    pub fn is_settled(&self) -> bool {
        matches!(self, UploadPhase::Complete { .. } | UploadPhase::Failed { .. })
    }
}

/// Callback to deliver to the upload observer, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelaySignal {
    Progress(u8),
    Uploaded(String),
    Failed(String),
}

/// State machine for one upload: `Idle -> InProgress -> Transferred -> Complete`,
/// with `Failed` reachable from any unsettled phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTracker {
    phase: UploadPhase,
}

impl Default for UploadTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadTracker {
    pub fn new() -> Self {
        Self {
            phase: UploadPhase::Idle,
        }
    }

    pub fn phase(&self) -> &UploadPhase {
        &self.phase
    }

    /// Every tick is reported while the upload is unsettled.
    pub fn on_progress(&mut self, progress: UploadProgress) -> Vec<RelaySignal> {
        if self.phase.is_settled() {
            return Vec::new();
        }
        let percentage = progress.percentage();
        if progress.is_transferred() {
            self.phase = UploadPhase::Transferred;
        } else if self.phase != UploadPhase::Transferred {
            self.phase = UploadPhase::InProgress { percentage };
        }
        vec![RelaySignal::Progress(percentage)]
    }

    /// The upload returned the new resource URL. Completion fires once; a
    /// missing 100% tick is reported first.
    pub fn on_uploaded(&mut self, logo_url: impl Into<String>) -> Vec<RelaySignal> {
        let logo_url = logo_url.into();
        let signals = match self.phase {
            UploadPhase::Complete { .. } | UploadPhase::Failed { .. } => return Vec::new(),
            UploadPhase::Transferred => vec![RelaySignal::Uploaded(logo_url.clone())],
            UploadPhase::Idle | UploadPhase::InProgress { .. } => vec![
                RelaySignal::Progress(100),
                RelaySignal::Uploaded(logo_url.clone()),
            ],
        };
        self.phase = UploadPhase::Complete { logo_url };
        signals
    }

    pub fn on_failed(&mut self, reason: impl Into<String>) -> Vec<RelaySignal> {
        if self.phase.is_settled() {
            return Vec::new();
        }
        let reason = reason.into();
        self.phase = UploadPhase::Failed {
            reason: reason.clone(),
        };
        vec![RelaySignal::Failed(reason)]
    }
}
