//! Contact directory
//!
//! The static list of callable entities, loaded once at startup and never
//! mutated afterwards.

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;
use std::path::Path;

use crate::error::{PhoneError, PhoneResult};
use crate::types::{Contact, ContactId};

/// Immutable, ordered contact list
#[derive(Debug, Clone)]
pub struct ContactDirectory {
    contacts: Vec<Contact>,
}

impl ContactDirectory {
    /// Create a directory, rejecting empty lists and duplicate ids
    pub fn new(contacts: Vec<Contact>) -> PhoneResult<Self> {
        if contacts.is_empty() {
            return Err(PhoneError::config("Contact directory must not be empty"));
        }

        let mut seen = HashSet::new();
        for contact in &contacts {
            if !seen.insert(contact.id.clone()) {
                return Err(PhoneError::config(format!(
                    "Duplicate contact id: {}",
                    contact.id
                )));
            }
        }

        Ok(Self { contacts })
    }

    /// The built-in directory shipped with the simulator
    pub fn with_default_contacts() -> Self {
        Self {
            contacts: vec![
                Contact::new("1", "Алексей Иванов", "+7 (999) 123-45-67"),
                Contact::new("2", "Мария Петрова", "+7 (999) 234-56-78"),
                Contact::new("3", "Дмитрий Смирнов", "+7 (999) 345-67-89").blocked(),
                Contact::new("4", "Елена Кузнецова", "+7 (999) 456-78-90"),
                Contact::new("5", "Сергей Попов", "+7 (999) 567-89-01"),
                Contact::new("6", "Анна Соколова", "+7 (999) 678-90-12"),
                Contact::new("7", "Игорь Новиков", "+7 (999) 789-01-23"),
            ],
        }
    }

    /// Load a directory from a JSON array of contacts
    pub fn load_json(path: impl AsRef<Path>) -> PhoneResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let contacts: Vec<Contact> = serde_json::from_str(&raw)?;
        tracing::info!("Loaded {} contacts from {}", contacts.len(), path.display());
        Self::new(contacts)
    }

    pub fn get(&self, id: &ContactId) -> Option<&Contact> {
        self.contacts.iter().find(|c| &c.id == id)
    }

    /// Like [`get`](Self::get) but reports a missing contact as an error
    pub fn require(&self, id: &ContactId) -> PhoneResult<&Contact> {
        self.get(id)
            .ok_or_else(|| PhoneError::contact_not_found(id.as_str()))
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    /// Filter by case-insensitive name match or plain phone substring.
    ///
    /// An empty query returns the whole directory in order.
    pub fn search(&self, query: &str) -> Vec<&Contact> {
        if query.is_empty() {
            return self.contacts.iter().collect();
        }
        let needle = query.to_lowercase();
        self.contacts
            .iter()
            .filter(|c| c.name.to_lowercase().contains(&needle) || c.phone.contains(query))
            .collect()
    }

    /// Pick a contact uniformly at random, blocked contacts included
    pub fn choose_random<R: Rng + ?Sized>(&self, rng: &mut R) -> &Contact {
        // Non-empty by construction
        self.contacts
            .choose(rng)
            .unwrap_or(&self.contacts[0])
    }
}

impl Default for ContactDirectory {
    fn default() -> Self {
        Self::with_default_contacts()
    }
}
