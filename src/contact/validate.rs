use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use super::model::{ContactField, ContactForm};
use crate::form::ValidationError;

pub const MIN_NAME_CHARS: usize = 2;
pub const MIN_MESSAGE_CHARS: usize = 10;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum ContactFieldError {
    #[error("{0} is required")]
    Required(ContactField),
    #[error("{field} must be at least {min} characters")]
    TooShort { field: ContactField, min: usize },
    #[error("invalid email format")]
    InvalidEmail,
}

impl ContactFieldError {
    pub fn field(&self) -> ContactField {
        match self {
            ContactFieldError::Required(field) => *field,
            ContactFieldError::TooShort { field, .. } => *field,
            ContactFieldError::InvalidEmail => ContactField::Email,
        }
    }
}

impl ValidationError for ContactFieldError {
    fn message_key(&self) -> &'static str {
        match self {
            ContactFieldError::Required(ContactField::Name) => "contact.errors.name_required",
            ContactFieldError::Required(ContactField::Email) => "contact.errors.email_required",
            ContactFieldError::Required(ContactField::Message) => "contact.errors.message_required",
            ContactFieldError::Required(_) => "contact.errors.required",
            ContactFieldError::TooShort {
                field: ContactField::Name,
                ..
            } => "contact.errors.name_too_short",
            ContactFieldError::TooShort {
                field: ContactField::Message,
                ..
            } => "contact.errors.message_too_short",
            ContactFieldError::TooShort { .. } => "contact.errors.too_short",
            ContactFieldError::InvalidEmail => "contact.errors.email_invalid",
        }
    }

    fn message_params(&self) -> Vec<(&'static str, String)> {
        match self {
            ContactFieldError::TooShort { min, .. } => vec![("min", min.to_string())],
            _ => Vec::new(),
        }
    }
}

/// Checks one field value. Pure, so it is safe to run on every keystroke.
///
/// Lengths are counted in characters of the trimmed value. The email pattern
/// is matched against the raw value, so surrounding whitespace is a format
/// error.
pub fn validate_field(field: ContactField, value: &str) -> Option<ContactFieldError> {
    let trimmed = value.trim();
    match field {
        ContactField::Name => {
            if trimmed.is_empty() {
                Some(ContactFieldError::Required(field))
            } else if trimmed.chars().count() < MIN_NAME_CHARS {
                Some(ContactFieldError::TooShort {
                    field,
                    min: MIN_NAME_CHARS,
                })
            } else {
                None
            }
        }
        ContactField::Email => {
            if trimmed.is_empty() {
                Some(ContactFieldError::Required(field))
            } else if !EMAIL_PATTERN.is_match(value) {
                Some(ContactFieldError::InvalidEmail)
            } else {
                None
            }
        }
        ContactField::Message => {
            if trimmed.is_empty() {
                Some(ContactFieldError::Required(field))
            } else if trimmed.chars().count() < MIN_MESSAGE_CHARS {
                Some(ContactFieldError::TooShort {
                    field,
                    min: MIN_MESSAGE_CHARS,
                })
            } else {
                None
            }
        }
        ContactField::Company | ContactField::Phone => None,
    }
}

/// Errors of the required fields, in field order.
pub fn validate_required(form: &ContactForm) -> Vec<ContactFieldError> {
    ContactField::REQUIRED
        .into_iter()
        .filter_map(|field| validate_field(field, form.value(field)))
        .collect()
}
