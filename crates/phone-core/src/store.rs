//! Phone state and the reducer that advances it
//!
//! [`PhoneStore`] is the single owned state struct: the live call (if any)
//! and the two logs. [`PhoneStore::apply`] looks a command up in the
//! transition table and executes the data side of the transition in one
//! step. Timer actions are handed back to the caller.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::config::TransitionPolicy;
use crate::error::{PhoneError, PhoneResult};
use crate::logs::CallLog;
use crate::state_table::{Action, EventType, StateKey, TransitionTable};
use crate::types::{
    call_duration_secs, CallId, CallPhase, CallRecord, Contact, HistoryEntry, LiveCall,
    MissedCallEntry,
};

/// Inputs to the reducer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    PlaceCall(Contact),
    SimulatedIncoming(Contact),
    Answer,
    Decline,
    EndCall,
    /// Auto-clear for the blocked call with this id
    BlockedTimeout(CallId),
}

impl Command {
    pub fn event_type(&self) -> EventType {
        match self {
            Command::PlaceCall(_) => EventType::PlaceCall,
            Command::SimulatedIncoming(_) => EventType::SimulatedIncoming,
            Command::Answer => EventType::Answer,
            Command::Decline => EventType::Decline,
            Command::EndCall => EventType::EndCall,
            Command::BlockedTimeout(_) => EventType::BlockedTimeout,
        }
    }

    /// Contact carried by call-initiating commands
    pub fn contact(&self) -> Option<&Contact> {
        match self {
            Command::PlaceCall(c) | Command::SimulatedIncoming(c) => Some(c),
            _ => None,
        }
    }
}

/// A transition that was taken
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedTransition {
    pub call_id: CallId,
    pub contact: Contact,
    pub from: CallPhase,
    pub to: CallPhase,
    pub actions: Vec<Action>,
    pub history: Option<HistoryEntry>,
    pub missed: Option<MissedCallEntry>,
}

impl AppliedTransition {
    /// Actions the controller must carry out
    pub fn timer_actions(&self) -> impl Iterator<Item = Action> + '_ {
        self.actions.iter().copied().filter(Action::is_timer_action)
    }
}

/// Result of feeding one command to the reducer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionOutcome {
    Applied(AppliedTransition),
    /// No transition exists; nothing changed
    Ignored { phase: CallPhase, event: EventType },
}

impl TransitionOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, TransitionOutcome::Applied(_))
    }

    pub fn applied(&self) -> Option<&AppliedTransition> {
        match self {
            TransitionOutcome::Applied(t) => Some(t),
            TransitionOutcome::Ignored { .. } => None,
        }
    }
}

/// Live call plus the two append-only logs
#[derive(Debug, Default)]
pub struct PhoneStore {
    live: Option<LiveCall>,
    missed: CallLog<MissedCallEntry>,
    history: CallLog<HistoryEntry>,
}

impl PhoneStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> CallPhase {
        self.live.as_ref().map_or(CallPhase::Idle, LiveCall::phase)
    }

    pub fn live_call(&self) -> Option<&LiveCall> {
        self.live.as_ref()
    }

    pub fn history(&self) -> &CallLog<HistoryEntry> {
        &self.history
    }

    pub fn missed_calls(&self) -> &CallLog<MissedCallEntry> {
        &self.missed
    }

    /// Apply `command` at time `now`.
    ///
    /// Illegal commands leave the store untouched. They are reported as
    /// [`TransitionOutcome::Ignored`] under the permissive policy and as
    /// [`PhoneError::InvalidTransition`] under the strict one. Internal timer
    /// events that arrive late are always ignored.
    pub fn apply(
        &mut self,
        command: Command,
        table: &TransitionTable,
        policy: TransitionPolicy,
        now: DateTime<Utc>,
    ) -> PhoneResult<TransitionOutcome> {
        let phase = self.phase();
        let event = command.event_type();

        if let Command::BlockedTimeout(id) = &command {
            if self.live.as_ref().map(|c| c.id) != Some(*id) {
                debug!("Dropping stale blocked timeout for {}", id);
                return Ok(TransitionOutcome::Ignored { phase, event });
            }
        }

        let guard_contact = command
            .contact()
            .or_else(|| self.live.as_ref().map(LiveCall::contact));
        let transition = match table.resolve(&StateKey::new(phase, event), guard_contact) {
            Some(t) => t.clone(),
            None => return Self::reject(phase, event, policy),
        };

        // Idle transitions start a new call; all others continue the live one
        let mut call = match (self.live.take(), command) {
            (Some(live), _) => live,
            (None, Command::PlaceCall(contact)) | (None, Command::SimulatedIncoming(contact)) => {
                match CallRecord::for_phase(transition.next_phase, contact) {
                    Some(record) => LiveCall::new(record),
                    None => return Self::reject(phase, event, policy),
                }
            }
            (None, _) => return Self::reject(phase, event, policy),
        };

        let mut history = None;
        let mut missed = None;
        for action in &transition.actions {
            match action {
                Action::RecordCallStart => call.started_at = Some(now),
                Action::AppendHistory(kind) => {
                    history = Some(HistoryEntry::new(call.contact().clone(), *kind, now));
                }
                Action::AppendHistoryWithDuration(kind) => {
                    let duration = call.started_at.and_then(|start| call_duration_secs(start, now));
                    history = Some(
                        HistoryEntry::new(call.contact().clone(), *kind, now).with_duration(duration),
                    );
                }
                Action::AppendMissedCall => {
                    missed = Some(MissedCallEntry::new(call.contact().clone(), now));
                }
                _ => {}
            }
        }

        if let Some(entry) = &missed {
            self.missed.push(entry.clone());
        }
        if let Some(entry) = &history {
            self.history.push(entry.clone());
        }

        let applied = AppliedTransition {
            call_id: call.id,
            contact: call.contact().clone(),
            from: phase,
            to: transition.next_phase,
            actions: transition.actions.clone(),
            history,
            missed,
        };

        self.live = if transition.next_phase.is_idle() {
            None
        } else {
            let next = transition.next_phase;
            call.record.clone().into_phase(next).map(|record| LiveCall { record, ..call })
        };

        info!(
            "{} {} -> {} via {} ({})",
            applied.call_id,
            applied.from,
            applied.to,
            event.type_name(),
            applied.contact.name
        );
        Ok(TransitionOutcome::Applied(applied))
    }

    fn reject(
        phase: CallPhase,
        event: EventType,
        policy: TransitionPolicy,
    ) -> PhoneResult<TransitionOutcome> {
        if event.is_internal() || policy == TransitionPolicy::Permissive {
            debug!("Ignoring {} while {}", event.type_name(), phase);
            Ok(TransitionOutcome::Ignored { phase, event })
        } else {
            Err(PhoneError::InvalidTransition { phase, event })
        }
    }
}
