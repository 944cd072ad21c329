use std::sync::{Arc, Mutex};
use std::time::Duration;

use org_settings_core::{Field, FieldEditIntent};
use org_settings_engine::{DebouncedFieldUpdater, IntentSink};
use pretty_assertions::assert_eq;
use tokio::runtime::Handle;
use tokio::time::sleep;

const INTERVAL: Duration = Duration::from_millis(1000);

#[derive(Default)]
struct RecordingSink {
    intents: Mutex<Vec<FieldEditIntent>>,
}

impl RecordingSink {
    fn take(&self) -> Vec<FieldEditIntent> {
        self.intents.lock().unwrap().drain(..).collect()
    }
}

impl IntentSink for RecordingSink {
    fn dispatch(&self, intent: FieldEditIntent) {
        self.intents.lock().unwrap().push(intent);
    }
}

fn updater(sink: &Arc<RecordingSink>) -> DebouncedFieldUpdater {
    org_logging::initialize_for_tests();
    DebouncedFieldUpdater::new("org-1", INTERVAL, sink.clone(), Handle::current())
}

fn intent(field: Field, value: &str) -> FieldEditIntent {
    FieldEditIntent::new("org-1", field, value)
}

#[tokio::test(start_paused = true)]
async fn rapid_email_input_yields_single_intent_with_last_value() {
    let sink = Arc::new(RecordingSink::default());
    let updater = updater(&sink);

    updater.on_field_change(Field::Email, "a");
    sleep(Duration::from_millis(100)).await;
    updater.on_field_change(Field::Email, "ab");
    sleep(Duration::from_millis(100)).await;
    updater.on_field_change(Field::Email, "abc");

    sleep(Duration::from_millis(990)).await;
    assert!(sink.take().is_empty());
    assert_eq!(updater.pending_fields(), vec![Field::Email]);

    sleep(Duration::from_millis(20)).await;
    assert_eq!(sink.take(), vec![intent(Field::Email, "abc")]);
    assert!(updater.pending_fields().is_empty());

    sleep(Duration::from_millis(5000)).await;
    assert!(sink.take().is_empty());
}

#[tokio::test(start_paused = true)]
async fn changes_further_apart_than_interval_yield_two_intents() {
    let sink = Arc::new(RecordingSink::default());
    let updater = updater(&sink);

    updater.on_field_change(Field::Name, "Acme");
    sleep(Duration::from_millis(1100)).await;
    updater.on_field_change(Field::Name, "Acme Inc");
    sleep(Duration::from_millis(1100)).await;

    assert_eq!(
        sink.take(),
        vec![intent(Field::Name, "Acme"), intent(Field::Name, "Acme Inc")]
    );
}

#[tokio::test(start_paused = true)]
async fn name_changes_do_not_delay_website_save() {
    let sink = Arc::new(RecordingSink::default());
    let updater = updater(&sink);

    updater.on_field_change(Field::Website, "https://acme.io");
    updater.on_field_change(Field::Name, "A");
    sleep(Duration::from_millis(900)).await;
    updater.on_field_change(Field::Name, "Ac");

    sleep(Duration::from_millis(200)).await;
    assert_eq!(sink.take(), vec![intent(Field::Website, "https://acme.io")]);

    sleep(Duration::from_millis(850)).await;
    assert_eq!(sink.take(), vec![intent(Field::Name, "Ac")]);
}

#[tokio::test(start_paused = true)]
async fn cancel_discards_pending_value() {
    let sink = Arc::new(RecordingSink::default());
    let updater = updater(&sink);

    updater.on_field_change(Field::Email, "ops@acme.io");
    updater.cancel(Field::Email);
    sleep(Duration::from_millis(2000)).await;

    assert!(sink.take().is_empty());
}

#[tokio::test(start_paused = true)]
async fn flush_dispatches_pending_values_immediately() {
    let sink = Arc::new(RecordingSink::default());
    let updater = updater(&sink);

    updater.on_field_change(Field::Name, "Acme");
    updater.on_field_change(Field::Email, "ops@acme.io");

    assert_eq!(updater.flush(), 2);
    assert_eq!(
        sink.take(),
        vec![
            intent(Field::Name, "Acme"),
            intent(Field::Email, "ops@acme.io")
        ]
    );

    sleep(Duration::from_millis(2000)).await;
    assert!(sink.take().is_empty());
    assert_eq!(updater.flush(), 0);
}

#[tokio::test(start_paused = true)]
async fn dropping_updater_disarms_timers() {
    let sink = Arc::new(RecordingSink::default());
    let updater = updater(&sink);

    updater.on_field_change(Field::Website, "acme.io");
    drop(updater);
    sleep(Duration::from_millis(2000)).await;

    assert!(sink.take().is_empty());
}
