//! Per-field debounced autosave.
//!
//! Every field owns one [`FieldDebouncer`] and at most one armed timer task.
//! A change aborts the field's timer and arms a new one; other fields are
//! untouched.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::Duration;

use org_logging::{org_debug, org_trace};
use org_settings_core::{Field, FieldDebouncer, FieldEditIntent, TimerToken};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Fire-and-forget consumer of field edit intents.
///
/// `dispatch` may run while the updater holds its internal lock, so it must
/// not call back into the updater.
pub trait IntentSink: Send + Sync {
    fn dispatch(&self, intent: FieldEditIntent);
}

struct Slot {
    debouncer: FieldDebouncer,
    timer: Option<JoinHandle<()>>,
}

impl Slot {
    fn new(field: Field) -> Self {
        Self {
            debouncer: FieldDebouncer::new(field),
            timer: None,
        }
    }

    fn abort_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

struct Inner {
    org_id: String,
    interval: Duration,
    sink: Arc<dyn IntentSink>,
    runtime: Handle,
    slots: Mutex<HashMap<Field, Slot>>,
}

impl Inner {
    fn timer_elapsed(&self, field: Field, token: TimerToken) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(slot) = slots.get_mut(&field) else {
            return;
        };
        if let Some(value) = slot.debouncer.on_timer_elapsed(token) {
            slot.timer = None;
            // Dispatched under the lock so a concurrent flush observes it.
            self.dispatch(field, value);
        }
    }

    fn dispatch(&self, field: Field, value: String) {
        org_debug!("Saving {} for org {}", field, self.org_id);
        self.sink
            .dispatch(FieldEditIntent::new(self.org_id.clone(), field, value));
    }
}

pub struct DebouncedFieldUpdater {
    inner: Arc<Inner>,
}

impl DebouncedFieldUpdater {
    /// Timers are spawned on `runtime`. Dropping the updater disarms every
    /// pending timer without dispatching; call [`flush`](Self::flush) first to
    /// keep the last values.
    pub fn new(
        org_id: impl Into<String>,
        interval: Duration,
        sink: Arc<dyn IntentSink>,
        runtime: Handle,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                org_id: org_id.into(),
                interval,
                sink,
                runtime,
                slots: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Called on every raw input event for `field`.
    pub fn on_field_change(&self, field: Field, value: impl Into<String>) {
        let mut slots = self
            .inner
            .slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let slot = slots.entry(field).or_insert_with(|| Slot::new(field));
        let rearm = slot.debouncer.on_change(value);
        slot.abort_timer();
        org_trace!("Armed {} timer {:?}", field, rearm.armed);

        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        let interval = self.inner.interval;
        let token = rearm.armed;
        slot.timer = Some(self.inner.runtime.spawn(async move {
            tokio::time::sleep(interval).await;
            if let Some(inner) = weak.upgrade() {
                inner.timer_elapsed(field, token);
            }
        }));
    }

    /// Drops the pending save of `field`, if any.
    pub fn cancel(&self, field: Field) {
        let mut slots = self
            .inner
            .slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(slot) = slots.get_mut(&field) {
            slot.abort_timer();
            if slot.debouncer.cancel().is_some() {
                org_debug!("Cancelled pending {} save", field);
            }
        }
    }

    /// Dispatches every pending value now. Returns how many were dispatched.
    pub fn flush(&self) -> usize {
        let released: Vec<(Field, String)> = {
            let mut slots = self
                .inner
                .slots
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            let mut released = Vec::new();
            for field in Field::ALL {
                if let Some(slot) = slots.get_mut(&field) {
                    slot.abort_timer();
                    if let Some(value) = slot.debouncer.flush() {
                        released.push((field, value));
                    }
                }
            }
            released
        };
        let count = released.len();
        for (field, value) in released {
            self.inner.dispatch(field, value);
        }
        count
    }

    pub fn pending_fields(&self) -> Vec<Field> {
        let slots = self
            .inner
            .slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Field::ALL
            .into_iter()
            .filter(|field| {
                slots
                    .get(field)
                    .is_some_and(|slot| slot.debouncer.is_pending())
            })
            .collect()
    }
}

impl Drop for DebouncedFieldUpdater {
    fn drop(&mut self) {
        let mut slots = self
            .inner
            .slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        for slot in slots.values_mut() {
            slot.abort_timer();
        }
    }
}
