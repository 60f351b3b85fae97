//! Lifecycle properties over arbitrary contacts, command sequences and clock
//! offsets, checked directly against the store and the default table.

use chrono::{DateTime, Duration, TimeZone, Utc};
use mockphone_core::state_table::DEFAULT_TABLE;
use mockphone_core::{
    CallPhase, Command, Contact, HistoryKind, PhoneStore, TransitionOutcome, TransitionPolicy,
};
use proptest::prelude::*;

fn t0() -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000, 0).unwrap()
}

fn apply(store: &mut PhoneStore, command: Command, at: DateTime<Utc>) -> TransitionOutcome {
    store
        .apply(command, &DEFAULT_TABLE, TransitionPolicy::Permissive, at)
        .unwrap()
}

prop_compose! {
    fn any_contact(blocked: bool)(
        id in "[a-z0-9]{1,8}",
        name in "\\PC{0,20}",
        phone in "[0-9+ ()-]{0,16}",
    ) -> Contact {
        let contact = Contact::new(id, name, phone);
        if blocked { contact.blocked() } else { contact }
    }
}

fn callable() -> impl Strategy<Value = Contact> {
    any_contact(false)
}

fn blocked() -> impl Strategy<Value = Contact> {
    any_contact(true)
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Place,
    Ring,
    Answer,
    Decline,
    End,
    Timeout,
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        Just(Step::Place),
        Just(Step::Ring),
        Just(Step::Answer),
        Just(Step::Decline),
        Just(Step::End),
        Just(Step::Timeout),
    ]
}

/// Drive the store into a live phase: 0 outgoing, 1 incoming, 2 active, 3 blocked
fn enter_live_phase(store: &mut PhoneStore, which: u8, contact: Contact) {
    let now = t0();
    match which {
        0 => {
            apply(store, Command::PlaceCall(contact), now);
        }
        1 => {
            apply(store, Command::SimulatedIncoming(contact), now);
        }
        2 => {
            apply(store, Command::SimulatedIncoming(contact), now);
            apply(store, Command::Answer, now);
        }
        _ => {
            apply(store, Command::PlaceCall(contact.blocked()), now);
        }
    }
}

proptest! {
    #[test]
    fn blocked_contact_is_never_active(
        contact in blocked(),
        steps in prop::collection::vec(step(), 0..40),
    ) {
        let mut store = PhoneStore::new();
        let mut entered_blocked = 0;
        let mut now = t0();

        for step in steps {
            now += Duration::seconds(1);
            let command = match step {
                Step::Place => Command::PlaceCall(contact.clone()),
                Step::Ring => Command::SimulatedIncoming(contact.clone()),
                Step::Answer => Command::Answer,
                Step::Decline => Command::Decline,
                Step::End => Command::EndCall,
                Step::Timeout => match store.live_call() {
                    Some(call) => Command::BlockedTimeout(call.id),
                    None => continue,
                },
            };
            if let TransitionOutcome::Applied(applied) = apply(&mut store, command, now) {
                if applied.to == CallPhase::Blocked {
                    entered_blocked += 1;
                }
            }
            prop_assert_ne!(store.phase(), CallPhase::Active);
        }

        let blocked_entries = store
            .history()
            .iter()
            .filter(|e| e.kind == HistoryKind::Blocked)
            .count();
        prop_assert_eq!(blocked_entries, entered_blocked);
        prop_assert!(store.history().iter().all(|e| e.kind != HistoryKind::Incoming));
    }

    #[test]
    fn blocked_call_logs_once_until_cleared(
        contact in blocked(),
        other in callable(),
        clear_after in 0i64..10,
    ) {
        let mut store = PhoneStore::new();
        let outcome = apply(&mut store, Command::PlaceCall(contact.clone()), t0());
        let call_id = outcome.applied().unwrap().call_id;

        for command in [
            Command::Answer,
            Command::Decline,
            Command::PlaceCall(other.clone()),
            Command::SimulatedIncoming(other),
        ] {
            prop_assert!(!apply(&mut store, command, t0()).is_applied());
            prop_assert_eq!(store.phase(), CallPhase::Blocked);
        }

        let cleared = apply(&mut store, Command::BlockedTimeout(call_id), t0() + Duration::seconds(clear_after));
        prop_assert!(cleared.is_applied());
        prop_assert_eq!(store.phase(), CallPhase::Idle);
        prop_assert_eq!(store.history().len(), 1);
        let entry = store.history().latest().unwrap();
        prop_assert_eq!(entry.kind, HistoryKind::Blocked);
        prop_assert_eq!(&entry.contact, &contact);
        prop_assert!(store.missed_calls().is_empty());
    }

    #[test]
    fn declined_call_is_missed_once(contact in any::<bool>().prop_flat_map(any_contact), offset in -100i64..5000) {
        let mut store = PhoneStore::new();
        apply(&mut store, Command::SimulatedIncoming(contact.clone()), t0());
        let outcome = apply(&mut store, Command::Decline, t0() + Duration::seconds(offset));

        prop_assert!(outcome.is_applied());
        prop_assert_eq!(store.phase(), CallPhase::Idle);
        prop_assert_eq!(store.missed_calls().len(), 1);
        prop_assert_eq!(&store.missed_calls().latest().unwrap().contact, &contact);
        prop_assert_eq!(store.history().len(), 1);
        let entry = store.history().latest().unwrap();
        prop_assert_eq!(entry.kind, HistoryKind::Missed);
        prop_assert_eq!(entry.duration_secs, None);
    }

    #[test]
    fn answered_call_lasts_from_answer_to_end(
        contact in callable(),
        ring_for in 0i64..600,
        talk_for in -100i64..5000,
    ) {
        let mut store = PhoneStore::new();
        let answered_at = t0() + Duration::seconds(ring_for);
        apply(&mut store, Command::SimulatedIncoming(contact.clone()), t0());
        prop_assert!(apply(&mut store, Command::Answer, answered_at).is_applied());
        prop_assert!(store.history().is_empty());

        apply(&mut store, Command::EndCall, answered_at + Duration::seconds(talk_for));
        prop_assert_eq!(store.phase(), CallPhase::Idle);
        prop_assert_eq!(store.history().len(), 1);
        let entry = store.history().latest().unwrap();
        prop_assert_eq!(entry.kind, HistoryKind::Incoming);
        prop_assert_eq!(&entry.contact, &contact);
        let expected = if talk_for > 0 { Some(talk_for as u64) } else { None };
        prop_assert_eq!(entry.duration_secs, expected);
        prop_assert!(store.missed_calls().is_empty());
    }

    #[test]
    fn second_call_while_live_changes_nothing(
        which in 0u8..4,
        first in callable(),
        second in any::<bool>().prop_flat_map(any_contact),
    ) {
        let mut store = PhoneStore::new();
        enter_live_phase(&mut store, which, first);
        let before = store.live_call().cloned();
        let history = store.history().len();
        let missed = store.missed_calls().len();
        prop_assert!(before.is_some());

        for command in [Command::PlaceCall(second.clone()), Command::SimulatedIncoming(second)] {
            let outcome = apply(&mut store, command, t0() + Duration::seconds(1));
            let ignored = matches!(outcome, TransitionOutcome::Ignored { .. });
            prop_assert!(ignored);
        }
        prop_assert_eq!(store.live_call().cloned(), before);
        prop_assert_eq!(store.history().len(), history);
        prop_assert_eq!(store.missed_calls().len(), missed);
    }
}
