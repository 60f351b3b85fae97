//! Presentation view-models
//!
//! Pure functions from controller read models to display-ready structs.
//! Front-ends render these and never look at the store directly.

pub mod call_screen;
pub mod contacts;
pub mod format;
pub mod history;
pub mod missed;
pub mod navigation;

pub use call_screen::{CallControls, CallScreenView, CallTone};
pub use contacts::{ContactListView, ContactRow};
pub use format::{format_call_timer, format_history_duration, relative_time, DayLabel, ViewContext};
pub use history::{HistoryGroup, HistoryRow, HistoryView};
pub use missed::{MissedCallRow, MissedCallsView};
pub use navigation::{Navigator, Screen, Tab};
