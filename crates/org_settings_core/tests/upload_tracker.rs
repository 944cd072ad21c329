use org_settings_core::{RelaySignal, UploadPhase, UploadProgress, UploadTracker};
use pretty_assertions::assert_eq;

#[test]
fn percentage_rounds_half_up_and_clamps() {
    assert_eq!(UploadProgress::new(0, 100).percentage(), 0);
    assert_eq!(UploadProgress::new(50, 100).percentage(), 50);
    assert_eq!(UploadProgress::new(1, 3).percentage(), 33);
    assert_eq!(UploadProgress::new(2, 3).percentage(), 67);
    assert_eq!(UploadProgress::new(99, 100).percentage(), 99);
    assert_eq!(UploadProgress::new(995, 1000).percentage(), 100);
    assert_eq!(UploadProgress::new(150, 100).percentage(), 100);
    assert_eq!(UploadProgress::new(10, 0).percentage(), 0);
}

#[test]
fn half_then_full_completes_once_with_returned_url() {
    let mut tracker = UploadTracker::new();

    assert_eq!(
        tracker.on_progress(UploadProgress::new(50, 100)),
        vec![RelaySignal::Progress(50)]
    );
    assert_eq!(tracker.phase(), &UploadPhase::InProgress { percentage: 50 });

    assert_eq!(
        tracker.on_progress(UploadProgress::new(100, 100)),
        vec![RelaySignal::Progress(100)]
    );
    assert_eq!(tracker.phase(), &UploadPhase::Transferred);

    assert_eq!(
        tracker.on_uploaded("https://cdn.example.com/new.png"),
        vec![RelaySignal::Uploaded(
            "https://cdn.example.com/new.png".to_string()
        )]
    );
    assert!(tracker.on_uploaded("https://cdn.example.com/again.png").is_empty());
    assert!(tracker.on_progress(UploadProgress::new(100, 100)).is_empty());
}

#[test]
fn stalled_at_99_never_transfers() {
    let mut tracker = UploadTracker::new();

    tracker.on_progress(UploadProgress::new(99, 100));

    assert_eq!(tracker.phase(), &UploadPhase::InProgress { percentage: 99 });
}

#[test]
fn overshoot_counts_as_transferred() {
    let mut tracker = UploadTracker::new();

    let signals = tracker.on_progress(UploadProgress::new(101, 100));

    assert_eq!(signals, vec![RelaySignal::Progress(100)]);
    assert_eq!(tracker.phase(), &UploadPhase::Transferred);
}

#[test]
fn completion_without_full_tick_reports_100_first() {
    let mut tracker = UploadTracker::new();
    tracker.on_progress(UploadProgress::new(40, 100));

    assert_eq!(
        tracker.on_uploaded("u"),
        vec![RelaySignal::Progress(100), RelaySignal::Uploaded("u".to_string())]
    );
}

#[test]
fn failure_settles_and_blocks_completion() {
    let mut tracker = UploadTracker::new();
    tracker.on_progress(UploadProgress::new(30, 100));

    assert_eq!(
        tracker.on_failed("network error"),
        vec![RelaySignal::Failed("network error".to_string())]
    );
    assert!(tracker.on_failed("again").is_empty());
    assert!(tracker.on_uploaded("u").is_empty());
    assert_eq!(
        tracker.phase(),
        &UploadPhase::Failed {
            reason: "network error".to_string()
        }
    );
}
