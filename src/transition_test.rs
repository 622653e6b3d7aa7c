use super::*;

fn machine() -> TransitionMachine {
    TransitionMachine::new(vec!["background-color".into(), "color".into()])
}

fn idle_machine() -> TransitionMachine {
    let mut m = machine();
    assert!(m.settle());
    m
}

#[test]
fn starts_settling_and_disabled() {
    let m = machine();
    assert_eq!(m.phase(), TransitionPhase::Settling);
    assert!(!m.is_enabled());
}

#[test]
fn settle_enables_once() {
    let mut m = machine();
    assert!(m.settle());
    assert_eq!(m.phase(), TransitionPhase::Idle);
    assert!(m.is_enabled());
    assert!(!m.settle());
}

#[test]
fn mode_change_while_settling_does_not_animate() {
    let mut m = machine();
    assert_eq!(m.on_mode_changed(), None);
    assert_eq!(m.phase(), TransitionPhase::Settling);
}

#[test]
fn mode_change_while_idle_animates() {
    let mut m = idle_machine();
    assert_eq!(m.on_mode_changed(), Some(1));
    assert_eq!(m.phase(), TransitionPhase::Animating { generation: 1 });
}

#[test]
fn watched_transition_end_returns_to_idle() {
    let mut m = idle_machine();
    m.on_mode_changed();
    assert!(m.on_transition_end("color"));
    assert_eq!(m.phase(), TransitionPhase::Idle);
}

#[test]
fn unrelated_property_is_ignored() {
    let mut m = idle_machine();
    m.on_mode_changed();
    assert!(!m.on_transition_end("opacity"));
    assert_eq!(m.phase(), TransitionPhase::Animating { generation: 1 });
}

#[test]
fn transition_end_while_idle_is_ignored() {
    let mut m = idle_machine();
    assert!(!m.on_transition_end("color"));
    assert_eq!(m.phase(), TransitionPhase::Idle);
}

#[test]
fn timeout_unsticks_animation() {
    let mut m = idle_machine();
    let g = m.on_mode_changed().unwrap();
    assert!(m.on_timeout(g));
    assert_eq!(m.phase(), TransitionPhase::Idle);
}

#[test]
fn stale_timeout_does_not_end_newer_animation() {
    let mut m = idle_machine();
    let first = m.on_mode_changed().unwrap();
    let second = m.on_mode_changed().unwrap();
    assert!(second > first);
    assert!(!m.on_timeout(first));
    assert_eq!(m.phase(), TransitionPhase::Animating { generation: second });
    assert!(m.on_timeout(second));
}

#[test]
fn timeout_after_transition_end_is_noop() {
    let mut m = idle_machine();
    let g = m.on_mode_changed().unwrap();
    assert!(m.on_transition_end("background-color"));
    assert!(!m.on_timeout(g));
    assert_eq!(m.phase(), TransitionPhase::Idle);
}

#[test]
fn suppress_abandons_animation() {
    let mut m = idle_machine();
    let g = m.on_mode_changed().unwrap();
    m.suppress();
    assert_eq!(m.phase(), TransitionPhase::Settling);
    assert!(!m.on_timeout(g));
    assert!(m.settle());
}
