//! Call history tab

use serde::Serialize;

use super::format::{format_history_duration, DayLabel, ViewContext};
use crate::types::{Contact, EntryId, HistoryEntry, HistoryKind};

fn kind_label(kind: HistoryKind) -> &'static str {
    match kind {
        HistoryKind::Incoming => "Incoming",
        HistoryKind::Outgoing => "Outgoing",
        HistoryKind::Missed => "Missed",
        HistoryKind::Blocked => "Blocked",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryRow {
    pub entry_id: EntryId,
    pub contact: Contact,
    pub kind: HistoryKind,
    pub kind_label: &'static str,
    /// `M:SS`, empty when the call had no measurable duration
    pub duration: String,
    pub time: String,
    /// Blocked contacts cannot be called back from the history
    pub can_call_back: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryGroup {
    pub label: DayLabel,
    pub rows: Vec<HistoryRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryView {
    pub groups: Vec<HistoryGroup>,
}

impl HistoryView {
    /// `entries` newest first. Groups keep the order in which their label is
    /// first seen.
    pub fn build(entries: &[HistoryEntry], ctx: &ViewContext) -> Self {
        let mut groups: Vec<HistoryGroup> = Vec::new();
        for entry in entries {
            let label = ctx.day_label(entry.timestamp);
            let row = HistoryRow {
                entry_id: entry.id,
                contact: entry.contact.clone(),
                kind: entry.kind,
                kind_label: kind_label(entry.kind),
                duration: format_history_duration(entry.duration_secs),
                time: ctx.time_of_day(entry.timestamp),
                can_call_back: !entry.contact.blocked,
            };
            match groups.iter_mut().find(|g| g.label == label) {
                Some(group) => group.rows.push(row),
                None => groups.push(HistoryGroup {
                    label,
                    rows: vec![row],
                }),
            }
        }
        Self { groups }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.groups.iter().map(|g| g.rows.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_history() {
        let view = HistoryView::build(&[], &ViewContext::utc(Utc::now()));
        assert!(view.is_empty());
        assert_eq!(view.row_count(), 0);
    }

    #[test]
    fn test_groups_by_day_newest_first() {
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 18, 0, 0).unwrap();
        let alice = Contact::new("1", "Alice", "100");
        let dmitry = Contact::new("3", "Dmitry", "300").blocked();

        let entries = vec![
            HistoryEntry::new(alice.clone(), HistoryKind::Outgoing, now - Duration::minutes(10))
                .with_duration(Some(65)),
            HistoryEntry::new(dmitry.clone(), HistoryKind::Blocked, now - Duration::hours(2)),
            HistoryEntry::new(alice.clone(), HistoryKind::Missed, now - Duration::days(1)),
            HistoryEntry::new(alice, HistoryKind::Incoming, now - Duration::days(30)),
        ];

        let view = HistoryView::build(&entries, &ViewContext::utc(now));
        let labels: Vec<String> = view.groups.iter().map(|g| g.label.to_string()).collect();
        assert_eq!(labels, vec!["Today", "Yesterday", "10 April"]);
        assert_eq!(view.row_count(), 4);

        let today = &view.groups[0].rows;
        assert_eq!(today[0].duration, "1:05");
        assert_eq!(today[0].time, "17:50");
        assert_eq!(today[0].kind_label, "Outgoing");
        assert!(today[0].can_call_back);
        assert_eq!(today[1].kind_label, "Blocked");
        assert_eq!(today[1].duration, "");
        assert!(!today[1].can_call_back);
    }
}
