//! Contact list screen

use serde::Serialize;

use crate::directory::ContactDirectory;
use crate::types::{Contact, ContactId};

/// One row of the contact list. Every row has a call button; blocked
/// contacts additionally show a badge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactRow {
    pub id: ContactId,
    pub name: String,
    pub phone: String,
    pub blocked: bool,
}

impl From<&Contact> for ContactRow {
    fn from(contact: &Contact) -> Self {
        Self {
            id: contact.id.clone(),
            name: contact.name.clone(),
            phone: contact.phone.clone(),
            blocked: contact.blocked,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactListView {
    pub query: String,
    pub rows: Vec<ContactRow>,
    /// Shown only while there is at least one missed call
    pub missed_banner: Option<usize>,
}

impl ContactListView {
    pub fn build(directory: &ContactDirectory, query: &str, missed_count: usize) -> Self {
        Self {
            query: query.to_string(),
            rows: directory.search(query).into_iter().map(ContactRow::from).collect(),
            missed_banner: (missed_count > 0).then_some(missed_count),
        }
    }

    /// True when the search matched nothing
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
