//! Core types for the phone core library
//!
//! Identifiers, contacts, the live call record and the entries written to the
//! missed-call and history logs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque contact identifier as supplied by the directory
#[derive(Debug, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactId(pub String);

impl ContactId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ContactId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Identifier of a single live call, from initiation to termination
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct CallId(pub Uuid);

impl CallId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "call-{}", self.0)
    }
}

/// Identifier of a log entry
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct EntryId(pub Uuid);

impl EntryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A callable entity from the directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    pub phone: String,
    /// Blocked contacts can never be connected
    #[serde(default)]
    pub blocked: bool,
}

impl Contact {
    pub fn new(id: impl Into<String>, name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            id: ContactId::new(id),
            name: name.into(),
            phone: phone.into(),
            blocked: false,
        }
    }

    pub fn blocked(mut self) -> Self {
        self.blocked = true;
        self
    }
}

/// Payload-less call phase, used as the transition table key
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallPhase {
    Idle,
    Incoming,
    Outgoing,
    Active,
    Blocked,
}

impl CallPhase {
    pub fn is_idle(&self) -> bool {
        matches!(self, CallPhase::Idle)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CallPhase::Idle => "idle",
            CallPhase::Incoming => "incoming",
            CallPhase::Outgoing => "outgoing",
            CallPhase::Active => "active",
            CallPhase::Blocked => "blocked",
        }
    }
}

impl fmt::Display for CallPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The live call. Absence of a record means the phone is idle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "contact", rename_all = "lowercase")]
pub enum CallRecord {
    Incoming(Contact),
    Outgoing(Contact),
    Active(Contact),
    Blocked(Contact),
}

impl CallRecord {
    pub fn phase(&self) -> CallPhase {
        match self {
            CallRecord::Incoming(_) => CallPhase::Incoming,
            CallRecord::Outgoing(_) => CallPhase::Outgoing,
            CallRecord::Active(_) => CallPhase::Active,
            CallRecord::Blocked(_) => CallPhase::Blocked,
        }
    }

    pub fn contact(&self) -> &Contact {
        match self {
            CallRecord::Incoming(c)
            | CallRecord::Outgoing(c)
            | CallRecord::Active(c)
            | CallRecord::Blocked(c) => c,
        }
    }

    /// Build a record for `phase` carrying `contact`; `None` for idle
    pub fn for_phase(phase: CallPhase, contact: Contact) -> Option<Self> {
        match phase {
            CallPhase::Idle => None,
            CallPhase::Incoming => Some(CallRecord::Incoming(contact)),
            CallPhase::Outgoing => Some(CallRecord::Outgoing(contact)),
            CallPhase::Active => Some(CallRecord::Active(contact)),
            CallPhase::Blocked => Some(CallRecord::Blocked(contact)),
        }
    }

    /// Move the same contact into another phase
    pub fn into_phase(self, phase: CallPhase) -> Option<Self> {
        let contact = match self {
            CallRecord::Incoming(c)
            | CallRecord::Outgoing(c)
            | CallRecord::Active(c)
            | CallRecord::Blocked(c) => c,
        };
        Self::for_phase(phase, contact)
    }
}

/// The live call together with the controller-tracked start time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveCall {
    pub id: CallId,
    pub record: CallRecord,
    /// Set on placement (outgoing) or answer (active)
    pub started_at: Option<DateTime<Utc>>,
}

impl LiveCall {
    pub fn new(record: CallRecord) -> Self {
        Self {
            id: CallId::new(),
            record,
            started_at: None,
        }
    }

    pub fn phase(&self) -> CallPhase {
        self.record.phase()
    }

    pub fn contact(&self) -> &Contact {
        self.record.contact()
    }
}

/// Outcome tag of a history entry
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryKind {
    Incoming,
    Outgoing,
    Missed,
    Blocked,
}

impl HistoryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryKind::Incoming => "incoming",
            HistoryKind::Outgoing => "outgoing",
            HistoryKind::Missed => "missed",
            HistoryKind::Blocked => "blocked",
        }
    }
}

/// Terminal record of a call outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: EntryId,
    pub contact: Contact,
    #[serde(rename = "type")]
    pub kind: HistoryKind,
    pub timestamp: DateTime<Utc>,
    /// Seconds; only present for calls with a positive elapsed time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<u64>,
}

impl HistoryEntry {
    pub fn new(contact: Contact, kind: HistoryKind, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: EntryId::new(),
            contact,
            kind,
            timestamp,
            duration_secs: None,
        }
    }

    pub fn with_duration(mut self, duration_secs: Option<u64>) -> Self {
        self.duration_secs = duration_secs;
        self
    }
}

/// A declined incoming call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissedCallEntry {
    pub id: EntryId,
    pub contact: Contact,
    pub timestamp: DateTime<Utc>,
}

impl MissedCallEntry {
    pub fn new(contact: Contact, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: EntryId::new(),
            contact,
            timestamp,
        }
    }
}

/// Whole seconds between `start` and `end`.
///
/// Zero or negative spans (clock skew) yield `None` instead of being clamped.
pub fn call_duration_secs(start: DateTime<Utc>, end: DateTime<Utc>) -> Option<u64> {
    let secs = end.signed_duration_since(start).num_seconds();
    if secs > 0 {
        Some(secs as u64)
    } else {
        None
    }
}
