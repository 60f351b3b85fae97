//! End-to-end call lifecycle scenarios
//!
//! Tokio time is paused, so the blocked auto-clear and the duration ticker
//! fire deterministically. Wall-clock durations come from a ManualClock.

use mockphone_core::{
    CallController, CallPhase, ContactDirectory, ContactId, HistoryKind, ManualClock, PhoneConfig,
    PhoneError, PhoneEvent, TransitionOutcome,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;

fn controller(clock: &ManualClock) -> CallController {
    CallController::builder()
        .config(PhoneConfig::new().without_simulated_incoming())
        .directory(ContactDirectory::with_default_contacts())
        .clock(Arc::new(clock.clone()))
        .build()
        .unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_blocked_contact_clears_after_three_seconds() {
    let clock = ManualClock::default();
    let phone = controller(&clock);

    phone.place_call(&ContactId::from("3")).unwrap();
    assert_eq!(phone.phase(), CallPhase::Blocked);
    assert_eq!(phone.history().len(), 1);
    assert_eq!(phone.history()[0].kind, HistoryKind::Blocked);

    tokio::time::sleep(Duration::from_millis(2900)).await;
    assert_eq!(phone.phase(), CallPhase::Blocked);

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(phone.phase(), CallPhase::Idle);
    assert!(phone.current_call().is_none());
    assert_eq!(phone.history().len(), 1);
    assert!(!phone.pending_timers().any());
}

#[tokio::test(start_paused = true)]
async fn test_blocked_contact_never_becomes_active() {
    let phone = controller(&ManualClock::default());
    let mut events = phone.subscribe_simple();

    phone.place_call(&ContactId::from("3")).unwrap();
    for command in [phone.answer(), phone.decline()] {
        assert!(!command.unwrap().is_applied());
    }
    tokio::time::sleep(Duration::from_secs(4)).await;
    phone.shutdown();

    let mut phases = Vec::new();
    while let Some(event) = events.next().await {
        match event {
            PhoneEvent::CallStateChanged { current, .. } => phases.push(current),
            PhoneEvent::ShutDown => break,
            _ => {}
        }
    }
    assert_eq!(phases, vec![CallPhase::Blocked, CallPhase::Idle]);
}

#[tokio::test(start_paused = true)]
async fn test_blocked_caller_rings_but_cannot_be_answered() {
    let phone = controller(&ManualClock::default());

    phone.simulate_incoming(&ContactId::from("3")).unwrap();
    assert_eq!(phone.phase(), CallPhase::Incoming);

    let outcome = phone.answer().unwrap();
    assert!(!outcome.is_applied());
    assert_eq!(phone.phase(), CallPhase::Incoming);
    assert!(!phone.pending_timers().duration_ticker);

    phone.decline().unwrap();
    assert_eq!(phone.phase(), CallPhase::Idle);
    assert_eq!(phone.missed_call_count(), 1);
    assert_eq!(phone.history()[0].kind, HistoryKind::Missed);
}

#[tokio::test]
async fn test_blocked_caller_answer_is_an_error_under_strict_policy() {
    let phone = CallController::builder()
        .config(
            PhoneConfig::new()
                .without_simulated_incoming()
                .with_transition_policy(mockphone_core::TransitionPolicy::Strict),
        )
        .build()
        .unwrap();

    phone.simulate_incoming(&ContactId::from("3")).unwrap();
    assert!(phone.answer().unwrap_err().is_invalid_transition());
    assert_eq!(phone.phase(), CallPhase::Incoming);
}

#[tokio::test]
async fn test_outgoing_call_duration() {
    let clock = ManualClock::default();
    let phone = controller(&clock);

    phone.place_call(&ContactId::from("1")).unwrap();
    assert_eq!(phone.phase(), CallPhase::Outgoing);
    clock.advance_secs(10);
    phone.end_call().unwrap();

    let history = phone.history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].kind, HistoryKind::Outgoing);
    assert_eq!(history[0].duration_secs, Some(10));
    assert_eq!(history[0].contact.id, ContactId::from("1"));
}

#[tokio::test]
async fn test_backwards_clock_gives_no_duration() {
    let clock = ManualClock::default();
    let phone = controller(&clock);

    phone.place_call(&ContactId::from("1")).unwrap();
    clock.advance_secs(-5);
    phone.end_call().unwrap();
    assert_eq!(phone.history()[0].duration_secs, None);
}

#[tokio::test(start_paused = true)]
async fn test_answered_call_is_logged_once_with_duration() {
    let clock = ManualClock::default();
    let phone = controller(&clock);

    phone.simulate_incoming(&ContactId::from("2")).unwrap();
    assert_eq!(phone.phase(), CallPhase::Incoming);
    phone.answer().unwrap();
    assert_eq!(phone.phase(), CallPhase::Active);
    assert!(phone.history().is_empty());

    clock.advance_secs(5);
    tokio::time::sleep(Duration::from_millis(5100)).await;
    assert_eq!(phone.active_elapsed_secs(), Some(5));
    phone.end_call().unwrap();

    let history = phone.history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].kind, HistoryKind::Incoming);
    assert_eq!(history[0].duration_secs, Some(5));
    assert!(phone.missed_calls().is_empty());
}

#[tokio::test]
async fn test_declined_call_is_missed() {
    let phone = controller(&ManualClock::default());
    let mut events = phone.subscribe_simple();

    phone.simulate_incoming(&ContactId::from("4")).unwrap();
    phone.decline().unwrap();

    assert_eq!(phone.phase(), CallPhase::Idle);
    assert_eq!(phone.missed_call_count(), 1);
    assert_eq!(phone.missed_calls()[0].contact.id, ContactId::from("4"));
    assert_eq!(phone.history().len(), 1);
    assert_eq!(phone.history()[0].kind, HistoryKind::Missed);

    assert!(matches!(
        events.next().await,
        Some(PhoneEvent::CallStateChanged { current: CallPhase::Incoming, .. })
    ));
    assert!(matches!(
        events.next().await,
        Some(PhoneEvent::CallStateChanged { current: CallPhase::Idle, .. })
    ));
    assert!(matches!(events.next().await, Some(PhoneEvent::MissedCallAppended(_))));
    assert!(matches!(events.next().await, Some(PhoneEvent::HistoryAppended(_))));
}

#[tokio::test]
async fn test_second_call_while_live_is_ignored() {
    let phone = controller(&ManualClock::default());
    phone.place_call(&ContactId::from("1")).unwrap();
    let before = phone.current_call().unwrap();

    let outcome = phone.place_call(&ContactId::from("2")).unwrap();
    assert!(matches!(outcome, TransitionOutcome::Ignored { phase: CallPhase::Outgoing, .. }));
    assert!(!phone.simulate_incoming(&ContactId::from("5")).unwrap().is_applied());

    assert_eq!(phone.current_call().unwrap(), before);
    assert!(phone.history().is_empty());
}

#[tokio::test]
async fn test_illegal_commands_when_idle_change_nothing() {
    let phone = controller(&ManualClock::default());
    for outcome in [phone.answer(), phone.decline(), phone.end_call()] {
        assert!(!outcome.unwrap().is_applied());
    }
    assert_eq!(phone.phase(), CallPhase::Idle);
    assert!(phone.history().is_empty());
    assert!(phone.missed_calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_cancels_pending_timers() {
    let phone = controller(&ManualClock::default());
    phone.place_call(&ContactId::from("3")).unwrap();
    assert!(phone.pending_timers().blocked_clear);

    phone.shutdown();
    assert!(!phone.pending_timers().any());
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(phone.phase(), CallPhase::Blocked);
    assert!(matches!(phone.end_call(), Err(PhoneError::ShutDown)));
}

#[tokio::test(start_paused = true)]
async fn test_dropping_controller_stops_timers() {
    let phone = controller(&ManualClock::default());
    let mut events = phone.subscribe_simple();
    phone.simulate_incoming(&ContactId::from("1")).unwrap();
    phone.answer().unwrap();
    drop(phone);

    tokio::time::sleep(Duration::from_secs(3)).await;
    let mut saw_tick = false;
    while let Some(event) = events.next().await {
        saw_tick |= matches!(event, PhoneEvent::DurationTick { .. });
    }
    assert!(!saw_tick);
}
