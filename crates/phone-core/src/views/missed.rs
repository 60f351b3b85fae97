//! Missed calls screen

use serde::Serialize;

use super::format::ViewContext;
use crate::types::{Contact, EntryId, MissedCallEntry};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissedCallRow {
    pub entry_id: EntryId,
    pub contact: Contact,
    pub when: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissedCallsView {
    pub rows: Vec<MissedCallRow>,
}

impl MissedCallsView {
    pub fn build(entries: &[MissedCallEntry], ctx: &ViewContext) -> Self {
        let rows = entries
            .iter()
            .map(|entry| MissedCallRow {
                entry_id: entry.id,
                contact: entry.contact.clone(),
                when: ctx.relative_time(entry.timestamp),
            })
            .collect();
        Self { rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
