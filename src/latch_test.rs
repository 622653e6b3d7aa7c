use super::*;

#[test]
fn new_latch_is_open() {
    let latch = SettleOnce::new();
    assert!(!latch.is_settled());
    assert_eq!(latch.winner(), None);
}

#[test]
fn first_settle_wins_and_names_loser() {
    let mut latch = SettleOnce::new();
    assert_eq!(latch.settle(ExitSignal::TransitionEnd), Some(ExitSignal::Fallback));
    assert!(latch.is_settled());
    assert_eq!(latch.winner(), Some(ExitSignal::TransitionEnd));
}

#[test]
fn fallback_can_win() {
    let mut latch = SettleOnce::new();
    assert_eq!(latch.settle(ExitSignal::Fallback), Some(ExitSignal::TransitionEnd));
    assert_eq!(latch.winner(), Some(ExitSignal::Fallback));
}

#[test]
fn late_participant_is_refused() {
    let mut latch = SettleOnce::new();
    latch.settle(ExitSignal::TransitionEnd);
    assert_eq!(latch.settle(ExitSignal::Fallback), None);
    assert_eq!(latch.winner(), Some(ExitSignal::TransitionEnd));
}

#[test]
fn same_participant_twice_is_refused() {
    let mut latch = SettleOnce::new();
    latch.settle(ExitSignal::Fallback);
    assert_eq!(latch.settle(ExitSignal::Fallback), None);
}

#[test]
fn other_is_an_involution() {
    for signal in [ExitSignal::TransitionEnd, ExitSignal::Fallback] {
        assert_ne!(signal.other(), signal);
        assert_eq!(signal.other().other(), signal);
    }
}
