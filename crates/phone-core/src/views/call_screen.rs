//! Full-screen call view

use serde::Serialize;

use super::format::format_call_timer;
use crate::types::{CallId, CallPhase, LiveCall};

/// Background colour family of the call screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CallTone {
    Ringing,
    Connected,
    Alert,
}

/// Buttons at the bottom of the call screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CallControls {
    AnswerDecline,
    EndCall,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallScreenView {
    pub call_id: CallId,
    pub phase: CallPhase,
    /// Avatar letter
    pub initial: String,
    pub name: String,
    pub phone: String,
    pub status: String,
    pub subtitle: Option<&'static str>,
    pub tone: CallTone,
    pub controls: CallControls,
}

impl CallScreenView {
    /// `elapsed_secs` is only shown for an active call
    pub fn build(call: &LiveCall, elapsed_secs: u64) -> Self {
        let contact = call.contact();
        let phase = call.phase();

        let status = match phase {
            CallPhase::Incoming => "Incoming call...".to_string(),
            CallPhase::Outgoing => "Calling...".to_string(),
            CallPhase::Active => format_call_timer(elapsed_secs),
            CallPhase::Blocked => "Contact is blocked".to_string(),
            CallPhase::Idle => String::new(),
        };
        let tone = match phase {
            CallPhase::Blocked => CallTone::Alert,
            CallPhase::Incoming => CallTone::Ringing,
            _ => CallTone::Connected,
        };
        let controls = match phase {
            CallPhase::Incoming => CallControls::AnswerDecline,
            _ => CallControls::EndCall,
        };

        Self {
            call_id: call.id,
            phase,
            initial: avatar_initial(&contact.name),
            name: contact.name.clone(),
            phone: contact.phone.clone(),
            status,
            subtitle: (phase == CallPhase::Blocked).then_some("Unable to place the call"),
            tone,
            controls,
        }
    }
}

fn avatar_initial(name: &str) -> String {
    match name.trim().chars().next() {
        Some(c) => c.to_uppercase().collect(),
        None => "?".to_string(),
    }
}
