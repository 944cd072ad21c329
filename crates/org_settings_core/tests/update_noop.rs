use org_settings_core::{update, AppState, Msg};

#[test]
fn update_is_noop() {
    let state = AppState::new("org-1");
    let (next, effects) = update(state.clone(), Msg::NoOp);

    assert_eq!(state, next);
    assert!(effects.is_empty());
}

#[test]
fn tick_does_not_mark_dirty() {
    let (mut next, effects) = update(AppState::new("org-1"), Msg::Tick);

    assert!(effects.is_empty());
    assert!(!next.consume_dirty());
}
