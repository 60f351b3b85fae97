//! Call lifecycle controller
//!
//! The controller owns the single live call, the missed-call log and the call
//! history, and is the only thing that mutates them. Views issue commands
//! (place call, answer, decline, end call) and re-render from the read
//! models; the simulated incoming call and the blocked-screen auto-clear
//! enter through the same command path.
//!
//! ```text
//!  view command ─┐
//!  timer event ──┼─► dispatch ─► PhoneStore::apply ─► timer actions
//!  simulator ────┘                    │                    │
//!                                     ▼                    ▼
//!                               PhoneEvent bus       ScheduledTask slots
//! ```
//!
//! Commands run to completion under one lock, so transitions never
//! interleave. Every timer holds only a weak reference back to the
//! controller and is cancelled on shutdown or drop.
//!
//! # Example
//!
//! ```rust,no_run
//! use mockphone_core::{CallController, ContactDirectory, ContactId, PhoneConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let controller = CallController::builder()
//!     .config(PhoneConfig::new().without_simulated_incoming())
//!     .directory(ContactDirectory::with_default_contacts())
//!     .build()?;
//!
//! controller.place_call(&ContactId::from("1"))?;
//! controller.end_call()?;
//! assert_eq!(controller.history().len(), 1);
//! # Ok(())
//! # }
//! ```

use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use tokio::runtime::Handle;
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::PhoneConfig;
use crate::directory::ContactDirectory;
use crate::error::{PhoneError, PhoneResult};
use crate::events::{EventEmitter, EventIterator, EventStream, PhoneEvent};
use crate::simulator::{IncomingCallSimulator, IncomingCallSink};
use crate::state_table::{Action, TransitionTable, DEFAULT_TABLE};
use crate::store::{AppliedTransition, Command, PhoneStore, TransitionOutcome};
use crate::timers::ScheduledTask;
use crate::types::{CallId, CallPhase, Contact, ContactId, HistoryEntry, LiveCall, MissedCallEntry};

/// Timers owned by the controller
#[derive(Default)]
struct TimerSlots {
    blocked_clear: Option<ScheduledTask>,
    duration_ticker: Option<ScheduledTask>,
    incoming_call: Option<ScheduledTask>,
}

impl TimerSlots {
    fn cancel_all(&mut self) {
        for task in [
            self.blocked_clear.take(),
            self.duration_ticker.take(),
            self.incoming_call.take(),
        ]
        .into_iter()
        .flatten()
        {
            debug!("Cancelling {} timer", task.name());
            task.cancel();
        }
    }
}

/// Which timers are still waiting to fire
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PendingTimers {
    pub blocked_clear: bool,
    pub duration_ticker: bool,
    pub incoming_call: bool,
}

impl PendingTimers {
    pub fn any(&self) -> bool {
        self.blocked_clear || self.duration_ticker || self.incoming_call
    }
}

fn pending(slot: &Option<ScheduledTask>) -> bool {
    slot.as_ref().map_or(false, |t| !t.is_finished())
}

struct ControllerState {
    store: PhoneStore,
    timers: TimerSlots,
    /// Ticks counted by the duration ticker for the active call
    elapsed_ticks: u64,
    shut_down: bool,
}

struct Inner {
    me: Weak<Inner>,
    config: PhoneConfig,
    directory: ContactDirectory,
    table: Arc<TransitionTable>,
    clock: Arc<dyn Clock>,
    events: EventEmitter,
    runtime: Handle,
    state: Mutex<ControllerState>,
}

impl Inner {
    fn dispatch(&self, command: Command) -> PhoneResult<TransitionOutcome> {
        let mut state = self.state.lock();
        if state.shut_down {
            return Err(PhoneError::ShutDown);
        }

        let now = self.clock.now();
        let outcome = state
            .store
            .apply(command, &self.table, self.config.transition_policy, now)?;

        // Emitted under the lock so subscribers see changes in commit order
        match &outcome {
            TransitionOutcome::Applied(applied) => {
                self.run_timer_actions(&mut state, applied);
                for event in transition_events(applied) {
                    self.events.emit(event);
                }
            }
            TransitionOutcome::Ignored { phase, event } => {
                if !event.is_internal() {
                    self.events.emit(PhoneEvent::CommandIgnored {
                        phase: *phase,
                        event: *event,
                    });
                }
            }
        }
        Ok(outcome)
    }

    fn run_timer_actions(&self, state: &mut ControllerState, applied: &AppliedTransition) {
        // Leaving the blocked screen for any reason disarms its auto-clear
        if applied.from == CallPhase::Blocked {
            if let Some(task) = state.timers.blocked_clear.take() {
                task.cancel();
            }
        }

        for action in applied.timer_actions() {
            match action {
                Action::ScheduleBlockedClear => {
                    let weak = self.me.clone();
                    let call_id = applied.call_id;
                    let task = ScheduledTask::once(
                        &self.runtime,
                        "blocked-clear",
                        self.config.blocked_clear_delay,
                        async move {
                            if let Some(inner) = weak.upgrade() {
                                if let Err(e) = inner.dispatch(Command::BlockedTimeout(call_id)) {
                                    debug!("Blocked auto-clear for {} not applied: {}", call_id, e);
                                }
                            }
                        },
                    );
                    state.timers.blocked_clear = Some(task);
                }
                Action::CancelBlockedClear => {
                    if let Some(task) = state.timers.blocked_clear.take() {
                        task.cancel();
                    }
                }
                Action::StartDurationTicker => {
                    state.elapsed_ticks = 0;
                    let weak = self.me.clone();
                    let call_id = applied.call_id;
                    let task = ScheduledTask::repeating(
                        &self.runtime,
                        "duration-ticker",
                        self.config.duration_tick_interval,
                        move |count| match weak.upgrade() {
                            Some(inner) => inner.on_tick(call_id, count),
                            None => false,
                        },
                    );
                    state.timers.duration_ticker = Some(task);
                }
                Action::StopDurationTicker => {
                    if let Some(task) = state.timers.duration_ticker.take() {
                        task.cancel();
                    }
                    state.elapsed_ticks = 0;
                }
                _ => {}
            }
        }
    }

    /// Returns `false` once the call is no longer the active one
    fn on_tick(&self, call_id: CallId, count: u64) -> bool {
        let mut state = self.state.lock();
        let still_active = !state.shut_down
            && state
                .store
                .live_call()
                .map_or(false, |c| c.id == call_id && c.phase() == CallPhase::Active);
        if !still_active {
            return false;
        }
        state.elapsed_ticks = count;
        self.events.emit(PhoneEvent::DurationTick {
            call_id,
            elapsed_secs: count,
        });
        true
    }

    fn shutdown(&self) {
        let mut state = self.state.lock();
        if state.shut_down {
            return;
        }
        state.shut_down = true;
        state.timers.cancel_all();
        self.events.emit(PhoneEvent::ShutDown);
        info!("Call controller shut down");
    }
}

impl IncomingCallSink for Inner {
    fn ring(&self, contact: Contact) {
        match self.dispatch(Command::SimulatedIncoming(contact.clone())) {
            Ok(outcome) if outcome.is_applied() => {}
            Ok(_) | Err(PhoneError::InvalidTransition { .. }) => {
                warn!("Dropping simulated incoming call from {}: line busy", contact.name);
                self.events.emit(PhoneEvent::IncomingCallDropped { contact });
            }
            Err(e) => debug!("Simulated incoming call not delivered: {}", e),
        }
    }
}

fn transition_events(applied: &AppliedTransition) -> Vec<PhoneEvent> {
    let mut events = vec![PhoneEvent::CallStateChanged {
        call_id: applied.call_id,
        previous: applied.from,
        current: applied.to,
        contact: applied.contact.clone(),
    }];
    if let Some(entry) = &applied.missed {
        events.push(PhoneEvent::MissedCallAppended(entry.clone()));
    }
    if let Some(entry) = &applied.history {
        events.push(PhoneEvent::HistoryAppended(entry.clone()));
    }
    events
}

/// Builder for [`CallController`]
pub struct CallControllerBuilder {
    config: PhoneConfig,
    directory: ContactDirectory,
    clock: Arc<dyn Clock>,
    table: Arc<TransitionTable>,
}

impl CallControllerBuilder {
    pub fn new() -> Self {
        Self {
            config: PhoneConfig::default(),
            directory: ContactDirectory::with_default_contacts(),
            clock: Arc::new(SystemClock),
            table: DEFAULT_TABLE.clone(),
        }
    }

    pub fn config(mut self, config: PhoneConfig) -> Self {
        self.config = config;
        self
    }

    pub fn directory(mut self, directory: ContactDirectory) -> Self {
        self.directory = directory;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the lifecycle table; it is validated on build
    pub fn table(mut self, table: Arc<TransitionTable>) -> Self {
        self.table = table;
        self
    }

    /// Build the controller inside the current tokio runtime.
    ///
    /// Arms the simulated incoming call when the configuration enables it.
    pub fn build(self) -> PhoneResult<CallController> {
        self.config.validate()?;
        self.table.validate().map_err(|errors| {
            PhoneError::config(format!("Invalid transition table: {}", errors.join("; ")))
        })?;
        let runtime = Handle::try_current()
            .map_err(|e| PhoneError::runtime(format!("Call controller needs a tokio runtime: {}", e)))?;

        let events = EventEmitter::new(self.config.event_capacity);
        let inner = Arc::new_cyclic(|me| Inner {
            me: me.clone(),
            config: self.config,
            directory: self.directory,
            table: self.table,
            clock: self.clock,
            events,
            runtime,
            state: Mutex::new(ControllerState {
                store: PhoneStore::new(),
                timers: TimerSlots::default(),
                elapsed_ticks: 0,
                shut_down: false,
            }),
        });

        let controller = CallController { inner };
        info!(
            "Call controller ready with {} contacts ({:?} policy)",
            controller.inner.directory.len(),
            controller.inner.config.transition_policy
        );
        if controller.inner.config.simulate_incoming {
            controller.start_incoming_simulator()?;
        }
        Ok(controller)
    }
}

impl Default for CallControllerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Owner of the call lifecycle. Dropping it cancels every pending timer.
pub struct CallController {
    inner: Arc<Inner>,
}

impl CallController {
    pub fn builder() -> CallControllerBuilder {
        CallControllerBuilder::new()
    }

    /// Controller with the given config and directory and the system clock
    pub fn new(config: PhoneConfig, directory: ContactDirectory) -> PhoneResult<Self> {
        Self::builder().config(config).directory(directory).build()
    }

    // ===== COMMANDS =====

    /// Dial a directory contact
    pub fn place_call(&self, id: &ContactId) -> PhoneResult<TransitionOutcome> {
        let contact = self.inner.directory.require(id)?.clone();
        self.place_call_to(contact)
    }

    /// Dial a contact that need not be in the directory (e.g. from history)
    pub fn place_call_to(&self, contact: Contact) -> PhoneResult<TransitionOutcome> {
        self.inner.dispatch(Command::PlaceCall(contact))
    }

    /// Ring the phone with a directory contact right now
    pub fn simulate_incoming(&self, id: &ContactId) -> PhoneResult<TransitionOutcome> {
        let contact = self.inner.directory.require(id)?.clone();
        self.inner.dispatch(Command::SimulatedIncoming(contact))
    }

    pub fn answer(&self) -> PhoneResult<TransitionOutcome> {
        self.inner.dispatch(Command::Answer)
    }

    pub fn decline(&self) -> PhoneResult<TransitionOutcome> {
        self.inner.dispatch(Command::Decline)
    }

    pub fn end_call(&self) -> PhoneResult<TransitionOutcome> {
        self.inner.dispatch(Command::EndCall)
    }

    // ===== LIFECYCLE =====

    /// Arm the one-shot simulated incoming call, replacing any pending one
    pub fn start_incoming_simulator(&self) -> PhoneResult<()> {
        let inner = &self.inner;
        let simulator = IncomingCallSimulator::new(
            inner.directory.clone(),
            inner.config.incoming_call_delay,
            inner.config.rng_seed,
        );

        let mut state = inner.state.lock();
        if state.shut_down {
            return Err(PhoneError::ShutDown);
        }
        let delay = simulator.delay();
        let task = simulator.schedule(&inner.runtime, inner.me.clone());
        if let Some(previous) = state.timers.incoming_call.replace(task) {
            previous.cancel();
        }
        debug!("Simulated incoming call armed for {:?}", delay);
        Ok(())
    }

    /// Cancel all timers and refuse further commands. Idempotent.
    pub fn shutdown(&self) {
        self.inner.shutdown();
    }

    pub fn is_shut_down(&self) -> bool {
        self.inner.state.lock().shut_down
    }

    // ===== READ MODELS =====

    pub fn current_call(&self) -> Option<LiveCall> {
        self.inner.state.lock().store.live_call().cloned()
    }

    pub fn phase(&self) -> CallPhase {
        self.inner.state.lock().store.phase()
    }

    /// Newest first
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.inner.state.lock().store.history().to_vec()
    }

    /// Newest first
    pub fn missed_calls(&self) -> Vec<MissedCallEntry> {
        self.inner.state.lock().store.missed_calls().to_vec()
    }

    pub fn missed_call_count(&self) -> usize {
        self.inner.state.lock().store.missed_calls().len()
    }

    pub fn directory(&self) -> &ContactDirectory {
        &self.inner.directory
    }

    pub fn config(&self) -> &PhoneConfig {
        &self.inner.config
    }

    /// Seconds shown on the call timer; `None` unless a call is active
    pub fn active_elapsed_secs(&self) -> Option<u64> {
        let state = self.inner.state.lock();
        match state.store.phase() {
            CallPhase::Active => Some(state.elapsed_ticks),
            _ => None,
        }
    }

    pub fn pending_timers(&self) -> PendingTimers {
        let state = self.inner.state.lock();
        PendingTimers {
            blocked_clear: pending(&state.timers.blocked_clear),
            duration_ticker: pending(&state.timers.duration_ticker),
            incoming_call: pending(&state.timers.incoming_call),
        }
    }

    // ===== EVENTS =====

    pub fn subscribe(&self) -> EventStream {
        self.inner.events.subscribe()
    }

    pub fn subscribe_simple(&self) -> EventIterator {
        self.inner.events.subscribe_simple()
    }
}

impl Drop for CallController {
    fn drop(&mut self) {
        self.inner.shutdown();
    }
}
