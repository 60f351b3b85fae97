use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::types::{CallPhase, Contact, HistoryKind};

/// Event types that trigger transitions
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum EventType {
    // User commands
    PlaceCall,
    Answer,
    Decline,
    EndCall,

    // External trigger
    SimulatedIncoming,

    // Internal timer
    BlockedTimeout,
}

impl EventType {
    pub fn type_name(&self) -> &'static str {
        match self {
            EventType::PlaceCall => "PlaceCall",
            EventType::Answer => "Answer",
            EventType::Decline => "Decline",
            EventType::EndCall => "EndCall",
            EventType::SimulatedIncoming => "SimulatedIncoming",
            EventType::BlockedTimeout => "BlockedTimeout",
        }
    }

    /// Events raised by the controller itself rather than by a caller
    pub fn is_internal(&self) -> bool {
        matches!(self, EventType::BlockedTimeout)
    }
}

/// Key for looking up transitions in the table
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct StateKey {
    pub phase: CallPhase,
    pub event: EventType,
}

impl StateKey {
    pub fn new(phase: CallPhase, event: EventType) -> Self {
        Self { phase, event }
    }
}

/// Conditions that must hold for a transition to be taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Guard {
    /// The event's contact, or else the live call's, is blocked
    ContactBlocked,
    /// The event's contact, or else the live call's, is not blocked
    ContactCallable,
}

impl Guard {
    pub fn check(&self, contact: Option<&Contact>) -> bool {
        match self {
            Guard::ContactBlocked => contact.map_or(false, |c| c.blocked),
            Guard::ContactCallable => contact.map_or(false, |c| !c.blocked),
        }
    }
}

/// Side effects executed during a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    // Data actions, executed by the store
    RecordCallStart,
    AppendHistory(HistoryKind),
    AppendHistoryWithDuration(HistoryKind),
    AppendMissedCall,

    // Timer actions, executed by the controller
    ScheduleBlockedClear,
    CancelBlockedClear,
    StartDurationTicker,
    StopDurationTicker,
}

impl Action {
    pub fn is_timer_action(&self) -> bool {
        matches!(
            self,
            Action::ScheduleBlockedClear
                | Action::CancelBlockedClear
                | Action::StartDurationTicker
                | Action::StopDurationTicker
        )
    }
}

/// What happens when an event occurs in a phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub guards: Vec<Guard>,
    pub actions: Vec<Action>,
    pub next_phase: CallPhase,
}

impl Transition {
    pub fn to(next_phase: CallPhase) -> Self {
        Self {
            guards: vec![],
            actions: vec![],
            next_phase,
        }
    }

    pub fn guarded_by(mut self, guard: Guard) -> Self {
        self.guards.push(guard);
        self
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    pub fn guards_pass(&self, contact: Option<&Contact>) -> bool {
        self.guards.iter().all(|g| g.check(contact))
    }
}

/// Transition table: every legal (phase, event) pair and its candidates
#[derive(Debug, Clone, Default)]
pub struct TransitionTable {
    transitions: HashMap<StateKey, Vec<Transition>>,
}

impl TransitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a candidate; candidates for one key are tried in insertion order
    pub fn insert(&mut self, key: StateKey, transition: Transition) {
        self.transitions.entry(key).or_default().push(transition);
    }

    /// First candidate whose guards pass for `contact`
    pub fn resolve(&self, key: &StateKey, contact: Option<&Contact>) -> Option<&Transition> {
        self.transitions
            .get(key)?
            .iter()
            .find(|t| t.guards_pass(contact))
    }

    pub fn has_transition(&self, key: &StateKey) -> bool {
        self.transitions.contains_key(key)
    }

    pub fn transition_count(&self) -> usize {
        self.transitions.values().map(Vec::len).sum()
    }

    /// Events accepted in `phase`, in a stable order
    pub fn accepted_events(&self, phase: CallPhase) -> Vec<EventType> {
        let mut events: Vec<EventType> = self
            .transitions
            .keys()
            .filter(|k| k.phase == phase)
            .map(|k| k.event)
            .collect();
        events.sort_by_key(|e| e.type_name());
        events
    }

    /// Collect all phases referenced in this table
    pub fn collect_used_phases(&self) -> HashSet<CallPhase> {
        let mut phases = HashSet::new();
        for (key, candidates) in &self.transitions {
            phases.insert(key.phase);
            for transition in candidates {
                phases.insert(transition.next_phase);
            }
        }
        phases
    }

    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        let used = self.collect_used_phases();

        for phase in used.iter().filter(|p| !p.is_idle()) {
            let has_exit = self
                .transitions
                .iter()
                .any(|(k, candidates)| k.phase == *phase && candidates.iter().any(|t| t.next_phase != *phase));
            if !has_exit {
                errors.push(format!("Phase {:?} has no exit transitions", phase));
            }
        }

        let reaches_idle = self
            .transitions
            .values()
            .flatten()
            .any(|t| t.next_phase.is_idle());
        if !used.is_empty() && !reaches_idle {
            errors.push("No transition returns to Idle".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
