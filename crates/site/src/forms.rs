//! Guest form validation.
//!
//! Rules for the reservation form: first name, last name, and email are
//! required; the first name must be at least three characters; the email
//! must be syntactically valid. Failures accumulate per-field messages for
//! re-rendering - a validation failure is an HTTP 200 with the form marked
//! up, never an error response.

use std::collections::BTreeMap;

use serde::Deserialize;

use harborview_core::Email;

/// Minimum length for the guest's first name.
const FIRST_NAME_MIN_LENGTH: usize = 3;

/// Raw guest fields as submitted by the reservation form.
///
/// Fields default to empty so a missing input is a validation message, not
/// a deserialization rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GuestForm {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

/// Validated guest details, ready for the booking transaction.
#[derive(Debug, Clone)]
pub struct GuestDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub phone: String,
}

/// Per-field validation messages, in stable field order.
#[derive(Debug, Clone, Default)]
pub struct FormErrors {
    errors: BTreeMap<String, Vec<String>>,
}

impl FormErrors {
    /// Record a message against a field.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_owned())
            .or_default()
            .push(message.into());
    }

    /// Whether the form passed validation.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// First message for a field, for inline display next to the input.
    #[must_use]
    pub fn first(&self, field: &str) -> Option<&String> {
        self.errors.get(field).and_then(|msgs| msgs.first())
    }
}

impl GuestForm {
    /// Validate the submitted fields.
    ///
    /// # Errors
    ///
    /// Returns the accumulated per-field messages when any rule fails; the
    /// submitted values are left untouched for re-rendering.
    pub fn validate(&self) -> Result<GuestDetails, FormErrors> {
        let mut errors = FormErrors::default();

        let first_name = self.first_name.trim();
        let last_name = self.last_name.trim();
        let email_input = self.email.trim();

        for (field, value) in [
            ("first_name", first_name),
            ("last_name", last_name),
            ("email", email_input),
        ] {
            if value.is_empty() {
                errors.add(field, "This field cannot be blank");
            }
        }

        if !first_name.is_empty() && first_name.chars().count() < FIRST_NAME_MIN_LENGTH {
            errors.add(
                "first_name",
                format!("This field must be at least {FIRST_NAME_MIN_LENGTH} characters long"),
            );
        }

        let email = match Email::parse(email_input) {
            Ok(email) => Some(email),
            Err(_) => {
                if !email_input.is_empty() {
                    errors.add("email", "Invalid email address");
                }
                None
            }
        };

        match email {
            Some(email) if errors.is_empty() => Ok(GuestDetails {
                first_name: first_name.to_owned(),
                last_name: last_name.to_owned(),
                email,
                phone: self.phone.trim().to_owned(),
            }),
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form(first: &str, last: &str, email: &str) -> GuestForm {
        GuestForm {
            first_name: first.to_owned(),
            last_name: last.to_owned(),
            email: email.to_owned(),
            phone: "555-0100".to_owned(),
        }
    }

    #[test]
    fn test_valid_form() {
        let details = form("John", "Smith", "john@example.com").validate().unwrap();
        assert_eq!(details.first_name, "John");
        assert_eq!(details.email.as_str(), "john@example.com");
    }

    #[test]
    fn test_blank_fields() {
        let errors = form("", "", "").validate().unwrap_err();
        for field in ["first_name", "last_name", "email"] {
            assert_eq!(
                errors.first(field).map(String::as_str),
                Some("This field cannot be blank"),
                "{field}"
            );
        }
    }

    #[test]
    fn test_first_name_min_length() {
        let errors = form("J", "Smith", "j@example.com").validate().unwrap_err();
        assert!(errors.first("first_name").unwrap().contains("at least 3"));
        assert!(errors.first("last_name").is_none());
    }

    #[test]
    fn test_invalid_email() {
        let errors = form("John", "Smith", "not-an-email").validate().unwrap_err();
        assert_eq!(
            errors.first("email").map(String::as_str),
            Some("Invalid email address")
        );
    }

    #[test]
    fn test_values_trimmed() {
        let details = form("  John ", " Smith ", " john@example.com ")
            .validate()
            .unwrap();
        assert_eq!(details.first_name, "John");
        assert_eq!(details.last_name, "Smith");
        assert_eq!(details.phone, "555-0100");
    }

    #[test]
    fn test_phone_is_optional() {
        let guest = GuestForm {
            phone: String::new(),
            ..form("John", "Smith", "john@example.com")
        };
        assert!(guest.validate().is_ok());
    }
}
