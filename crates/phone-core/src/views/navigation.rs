//! Which screen is on display

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PhoneError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Contacts,
    History,
}

impl Tab {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tab::Contacts => "contacts",
            Tab::History => "history",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tab {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "contacts" => Ok(Tab::Contacts),
            "history" => Ok(Tab::History),
            other => Err(PhoneError::config(format!("Unknown tab: {}", other))),
        }
    }
}

/// Navigation state outside of calls
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Navigator {
    active_tab: Tab,
    showing_missed: bool,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    pub fn is_showing_missed(&self) -> bool {
        self.showing_missed
    }

    /// Switching tabs also closes the missed-calls screen
    pub fn select_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
        self.showing_missed = false;
    }

    pub fn show_missed(&mut self) {
        self.showing_missed = true;
    }

    pub fn back(&mut self) {
        self.showing_missed = false;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Call,
    MissedCalls,
    Tab(Tab),
}

impl Screen {
    /// A live call covers everything, then the missed-calls screen, then
    /// the active tab
    pub fn resolve(call_live: bool, navigator: &Navigator) -> Self {
        if call_live {
            Screen::Call
        } else if navigator.is_showing_missed() {
            Screen::MissedCalls
        } else {
            Screen::Tab(navigator.active_tab())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_screen_wins() {
        let mut nav = Navigator::new();
        nav.show_missed();
        assert_eq!(Screen::resolve(true, &nav), Screen::Call);
        assert_eq!(Screen::resolve(false, &nav), Screen::MissedCalls);
        nav.back();
        assert_eq!(Screen::resolve(false, &nav), Screen::Tab(Tab::Contacts));
    }

    #[test]
    fn test_select_tab_closes_missed() {
        let mut nav = Navigator::new();
        nav.show_missed();
        nav.select_tab(Tab::History);
        assert!(!nav.is_showing_missed());
        assert_eq!(Screen::resolve(false, &nav), Screen::Tab(Tab::History));
    }

    #[test]
    fn test_parse_tab() {
        assert_eq!("History".parse::<Tab>().unwrap(), Tab::History);
        assert!("dialpad".parse::<Tab>().is_err());
    }
}
