use super::builder::StateTableBuilder;
use super::types::{Action, EventType, Guard, Transition};
use crate::types::{CallPhase, HistoryKind};

/// Add the full call lifecycle to the builder
pub fn add_lifecycle_transitions(builder: &mut StateTableBuilder) {
    add_outgoing_transitions(builder);
    add_incoming_transitions(builder);
    add_blocked_transitions(builder);
}

fn add_outgoing_transitions(builder: &mut StateTableBuilder) {
    // Idle -> Outgoing: dial a callable contact
    builder.add_guarded(
        CallPhase::Idle,
        EventType::PlaceCall,
        Guard::ContactCallable,
        CallPhase::Outgoing,
        &[Action::RecordCallStart],
    );

    // Outgoing -> Idle: hang up before connection
    builder.add_transition(
        CallPhase::Outgoing,
        EventType::EndCall,
        Transition::to(CallPhase::Idle)
            .with_action(Action::AppendHistoryWithDuration(HistoryKind::Outgoing)),
    );
}

fn add_incoming_transitions(builder: &mut StateTableBuilder) {
    builder.add_phase_change(CallPhase::Idle, EventType::SimulatedIncoming, CallPhase::Incoming);

    // Incoming -> Active: the answer time becomes the call start.
    // History is written once, when the call ends. A blocked caller can
    // only be declined.
    builder.add_transition(
        CallPhase::Incoming,
        EventType::Answer,
        Transition::to(CallPhase::Active)
            .guarded_by(Guard::ContactCallable)
            .with_action(Action::RecordCallStart)
            .with_action(Action::StartDurationTicker),
    );

    // Incoming -> Idle: declined, counts as missed
    builder.add_transition(
        CallPhase::Incoming,
        EventType::Decline,
        Transition::to(CallPhase::Idle)
            .with_action(Action::AppendMissedCall)
            .with_action(Action::AppendHistory(HistoryKind::Missed)),
    );

    builder.add_transition(
        CallPhase::Active,
        EventType::EndCall,
        Transition::to(CallPhase::Idle)
            .with_action(Action::StopDurationTicker)
            .with_action(Action::AppendHistoryWithDuration(HistoryKind::Incoming)),
    );
}

fn add_blocked_transitions(builder: &mut StateTableBuilder) {
    // Idle -> Blocked: never connects, recorded immediately
    builder.add_guarded(
        CallPhase::Idle,
        EventType::PlaceCall,
        Guard::ContactBlocked,
        CallPhase::Blocked,
        &[
            Action::AppendHistory(HistoryKind::Blocked),
            Action::ScheduleBlockedClear,
        ],
    );

    builder.add_phase_change(CallPhase::Blocked, EventType::BlockedTimeout, CallPhase::Idle);

    // Dismissed before the timer fired
    builder.add_transition(
        CallPhase::Blocked,
        EventType::EndCall,
        Transition::to(CallPhase::Idle).with_action(Action::CancelBlockedClear),
    );
}
