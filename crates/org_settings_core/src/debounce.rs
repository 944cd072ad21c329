//! Per-field debounce bookkeeping.
//!
//! A [`FieldDebouncer`] does not own a clock. Callers arm a real timer for the
//! token returned by [`FieldDebouncer::on_change`] and report back through
//! [`FieldDebouncer::on_timer_elapsed`]. Only the most recently armed token can
//! release a value, so a cancelled timer that still fires is a no-op.

use crate::Field;

/// Quiet interval before a field edit is saved.
pub const DEFAULT_DEBOUNCE_MS: u64 = 1000;

/// Identifies one armed timer of one debouncer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(u64);

/// Result of a change: the timer to cancel (if any) and the one to arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rearm {
    pub cancelled: Option<TimerToken>,
    pub armed: TimerToken,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDebouncer {
    field: Field,
    last_value: Option<String>,
    pending: Option<TimerToken>,
    next_token: u64,
}

impl FieldDebouncer {
    pub fn new(field: Field) -> Self {
        Self {
            field,
            last_value: None,
            pending: None,
            next_token: 0,
        }
    }

    pub fn field(&self) -> Field {
        self.field
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_value(&self) -> Option<&str> {
        self.last_value.as_deref()
    }

    /// Records the latest value and replaces any pending timer.
    pub fn on_change(&mut self, value: impl Into<String>) -> Rearm {
        self.next_token += 1;
        let armed = TimerToken(self.next_token);
        let cancelled = self.pending.replace(armed);
        self.last_value = Some(value.into());
        Rearm { cancelled, armed }
    }

    /// Releases the latest value if `token` is the live timer.
    pub fn on_timer_elapsed(&mut self, token: TimerToken) -> Option<String> {
        if self.pending != Some(token) {
            return None;
        }
        self.pending = None;
        self.last_value.take()
    }

    /// Drops the pending value without releasing it.
    pub fn cancel(&mut self) -> Option<TimerToken> {
        self.last_value = None;
        self.pending.take()
    }

    /// Releases the pending value immediately, if any.
    pub fn flush(&mut self) -> Option<String> {
        self.pending.take()?;
        self.last_value.take()
    }
}
