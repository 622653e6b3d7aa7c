use super::*;

#[test]
fn ready_state_maps_dom_strings() {
    assert_eq!(ReadyState::parse("loading"), ReadyState::Loading);
    assert_eq!(ReadyState::parse("interactive"), ReadyState::Interactive);
    assert_eq!(ReadyState::parse("complete"), ReadyState::Complete);
    assert_eq!(ReadyState::parse(""), ReadyState::Loading);
}

#[test]
fn head_script_waits_for_parsed_tree() {
    // A script in <head> runs while the document is still loading; the
    // toggle in <body> must not be looked up until the tree is parsed.
    assert!(!ReadyState::Loading.is_parsed());
    assert!(ReadyState::Interactive.is_parsed());
    assert!(ReadyState::Complete.is_parsed());
}

#[test]
fn only_complete_skips_the_load_event() {
    assert!(!ReadyState::Loading.is_complete());
    assert!(!ReadyState::Interactive.is_complete());
    assert!(ReadyState::Complete.is_complete());
}
