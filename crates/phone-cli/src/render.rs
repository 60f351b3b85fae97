//! Plain-text rendering of the view-models

use colored::Colorize;
use mockphone_core::views::{
    CallControls, CallScreenView, CallTone, ContactListView, HistoryView, MissedCallsView, Tab,
};
use std::fmt::Write;

const RULE: &str = "────────────────────────────────────────";

pub fn tab_bar(active: Tab) -> String {
    let label = |tab: Tab, text: &str| {
        if tab == active {
            format!("[{}]", text).bold().to_string()
        } else {
            format!(" {} ", text)
        }
    };
    format!(
        "{}  {}\n{}",
        label(Tab::Contacts, "Contacts"),
        label(Tab::History, "History"),
        RULE
    )
}

pub fn contact_list(view: &ContactListView) -> String {
    let mut out = String::new();
    if let Some(count) = view.missed_banner {
        let _ = writeln!(out, "{}", format!("Missed calls: {} (type 'missed')", count).red());
    }
    if !view.query.is_empty() {
        let _ = writeln!(out, "Search: {}", view.query);
    }
    if view.is_empty() {
        let _ = writeln!(out, "{}", "No contacts found".dimmed());
        return out;
    }
    for row in &view.rows {
        let badge = if row.blocked {
            format!(" {}", "Blocked".red())
        } else {
            String::new()
        };
        let _ = writeln!(out, "{:>3}  {}{}  {}", row.id, row.name, badge, row.phone.dimmed());
    }
    out
}

pub fn call_screen(view: &CallScreenView) -> String {
    let status = match view.tone {
        CallTone::Ringing => view.status.blue(),
        CallTone::Connected => view.status.green(),
        CallTone::Alert => view.status.red(),
    };

    let mut out = String::new();
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "  ( {} )  {}", view.initial.bold(), view.name.bold());
    let _ = writeln!(out, "          {}", view.phone);
    let _ = writeln!(out, "          {}", status);
    if let Some(subtitle) = view.subtitle {
        let _ = writeln!(out, "          {}", subtitle);
    }
    let controls = match view.controls {
        CallControls::AnswerDecline => "answer | decline",
        CallControls::EndCall => "hangup",
    };
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "  {}", controls.dimmed());
    out
}

pub fn history(view: &HistoryView) -> String {
    if view.is_empty() {
        return format!("{}\n", "Call history is empty".dimmed());
    }
    let mut out = String::new();
    for group in &view.groups {
        let _ = writeln!(out, "{}", group.label.to_string().bold());
        for row in &group.rows {
            let mut meta = row.kind_label.to_string();
            if !row.duration.is_empty() {
                let _ = write!(meta, " • {}", row.duration);
            }
            let _ = write!(meta, " • {}", row.time);
            let action = if row.can_call_back {
                format!("call {}", row.contact.id)
            } else {
                "Blocked".red().to_string()
            };
            let _ = writeln!(out, "  {:<24} {}  [{}]", row.contact.name, meta.dimmed(), action);
        }
    }
    out
}

pub fn missed_calls(view: &MissedCallsView) -> String {
    let mut out = format!("{}\n", "Missed calls".bold());
    if view.is_empty() {
        let _ = writeln!(out, "{}", "No missed calls".dimmed());
    }
    for row in &view.rows {
        let _ = writeln!(
            out,
            "  {:<24} {}  [call {}]",
            row.contact.name,
            row.when.dimmed(),
            row.contact.id
        );
    }
    let _ = writeln!(out, "{}", "back".dimmed());
    out
}
