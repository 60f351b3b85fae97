use super::types::{Action, EventType, Guard, StateKey, Transition, TransitionTable};
use crate::types::CallPhase;

/// Incremental construction of a [`TransitionTable`]
pub struct StateTableBuilder {
    table: TransitionTable,
}

impl StateTableBuilder {
    pub fn new() -> Self {
        Self {
            table: TransitionTable::new(),
        }
    }

    pub fn add_transition(&mut self, phase: CallPhase, event: EventType, transition: Transition) -> &mut Self {
        self.table.insert(StateKey::new(phase, event), transition);
        self
    }

    /// A transition with no guards and no side effects
    pub fn add_phase_change(&mut self, phase: CallPhase, event: EventType, next: CallPhase) -> &mut Self {
        self.add_transition(phase, event, Transition::to(next))
    }

    pub fn add_guarded(
        &mut self,
        phase: CallPhase,
        event: EventType,
        guard: Guard,
        next: CallPhase,
        actions: &[Action],
    ) -> &mut Self {
        let transition = Transition {
            guards: vec![guard],
            actions: actions.to_vec(),
            next_phase: next,
        };
        self.add_transition(phase, event, transition)
    }

    pub fn build(self) -> Result<TransitionTable, Vec<String>> {
        self.table.validate()?;
        Ok(self.table)
    }
}

impl Default for StateTableBuilder {
    fn default() -> Self {
        Self::new()
    }
}
