//! Registration form
//!
//! The phone shows a sign-up form before the main screen. Nothing is sent
//! anywhere and nothing is authenticated: the form only checks that every
//! field is filled in and that the consent box is ticked.

use serde::{Deserialize, Serialize};

use crate::error::{PhoneError, PhoneResult};

/// Raw form input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationForm {
    pub full_name: String,
    pub email: String,
    pub pin_code: String,
    pub consented: bool,
}

/// Accepted profile. The PIN is not retained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub full_name: String,
    pub email: String,
}

impl RegistrationForm {
    pub fn new(
        full_name: impl Into<String>,
        email: impl Into<String>,
        pin_code: impl Into<String>,
    ) -> Self {
        Self {
            full_name: full_name.into(),
            email: email.into(),
            pin_code: pin_code.into(),
            consented: false,
        }
    }

    pub fn with_consent(mut self, consented: bool) -> Self {
        self.consented = consented;
        self
    }

    /// Whitespace-only fields count as missing. Missing fields are reported
    /// before missing consent.
    pub fn validate(&self) -> PhoneResult<Profile> {
        let full_name = self.full_name.trim();
        let email = self.email.trim();
        if full_name.is_empty() || email.is_empty() || self.pin_code.trim().is_empty() {
            return Err(PhoneError::registration("All fields are required"));
        }
        if !self.consented {
            return Err(PhoneError::registration("Consent to data processing is required"));
        }
        Ok(Profile {
            full_name: full_name.to_string(),
            email: email.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_form_is_accepted() {
        let profile = RegistrationForm::new(" Maria Ivanova ", "maria@example.com", "1234")
            .with_consent(true)
            .validate()
            .unwrap();
        assert_eq!(profile.full_name, "Maria Ivanova");
        assert_eq!(profile.email, "maria@example.com");
    }

    #[test]
    fn test_missing_field_reported_before_consent() {
        let err = RegistrationForm::new("Maria", "", "1234").validate().unwrap_err();
        assert_eq!(err.to_string(), "Registration error: All fields are required");

        let err = RegistrationForm::new("Maria", "m@example.com", "   ")
            .with_consent(true)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("All fields are required"));
    }

    #[test]
    fn test_consent_required() {
        let err = RegistrationForm::new("Maria", "m@example.com", "1234")
            .validate()
            .unwrap_err();
        assert!(matches!(err, PhoneError::Registration { .. }));
        assert!(err.to_string().contains("Consent"));
    }
}
