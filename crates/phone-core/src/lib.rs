//! # Mockphone Core - Simulated Phone Call Lifecycle
//!
//! This crate drives a mock telephony front-end. There is no signalling and
//! no media: calls are a state machine that the user steps through, with
//! timers standing in for the network.
//!
//! - **state_table**: declarative `(phase, event) -> transition` table
//! - **store**: the reducer that owns the live call and the two call logs
//! - **controller**: commands, timers, the simulated incoming call and events
//! - **views**: display-ready view-models for any front-end
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mockphone_core::{CallController, ContactId, PhoneConfig, PhoneEvent};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let controller = CallController::builder()
//!         .config(PhoneConfig::from_env()?)
//!         .build()?;
//!     let mut events = controller.subscribe_simple();
//!
//!     controller.place_call(&ContactId::from("1"))?;
//!     controller.end_call()?;
//!
//!     while let Some(event) = events.next().await {
//!         if let PhoneEvent::HistoryAppended(entry) = event {
//!             println!("{} call with {}", entry.kind.as_str(), entry.contact.name);
//!             break;
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Call lifecycle
//!
//! ```text
//!              place-call (callable)           end-call
//!   idle ───────────────────────────► outgoing ────────► idle
//!   idle ── simulated-incoming ─► incoming ── answer ─► active ── end-call ─► idle
//!                                    └─────── decline ──────────────────────► idle
//!   idle ── place-call (blocked) ─► blocked ── timeout / end-call ──────────► idle
//! ```

pub mod clock;
pub mod config;
pub mod controller;
pub mod directory;
pub mod error;
pub mod events;
pub mod logs;
pub mod registration;
pub mod simulator;
pub mod state_table;
pub mod store;
pub mod timers;
pub mod types;
pub mod views;

// Re-export main types
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{PhoneConfig, TransitionPolicy};
pub use controller::{CallController, CallControllerBuilder, PendingTimers};
pub use directory::ContactDirectory;
pub use error::{PhoneError, PhoneResult};
pub use events::{EventEmitter, EventIterator, EventStream, PhoneEvent};
pub use registration::{Profile, RegistrationForm};
pub use store::{AppliedTransition, Command, PhoneStore, TransitionOutcome};
pub use types::{
    CallId, CallPhase, CallRecord, Contact, ContactId, EntryId, HistoryEntry, HistoryKind, LiveCall,
    MissedCallEntry,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
