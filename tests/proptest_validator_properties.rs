//! Property tests for the contact field validator.
//!
//! Verifies:
//! 1. Blank values are "required" errors for name, email and message.
//! 2. Company and phone accept any value.
//! 3. Name length is checked on the trimmed value (minimum 2 characters).
//! 4. Message length is checked on the trimmed value (minimum 10 characters).
//! 5. Values matching the email pattern pass; other non-blank values are
//!    format errors.
//! 6. Validation is a pure function of (field, value).

use proptest::prelude::*;
use starkmind::contact::{
    ContactField, ContactFieldError, MIN_MESSAGE_CHARS, MIN_NAME_CHARS, validate_field,
};

fn arb_field() -> impl Strategy<Value = ContactField> {
    prop::sample::select(ContactField::ALL.to_vec())
}

fn arb_required_field() -> impl Strategy<Value = ContactField> {
    prop_oneof![
        Just(ContactField::Name),
        Just(ContactField::Email),
        Just(ContactField::Message),
    ]
}

fn arb_blank() -> impl Strategy<Value = String> {
    "[ \t\r\n]{0,8}"
}

fn arb_valid_email() -> impl Strategy<Value = String> {
    "[a-z0-9._+-]{1,12}@[a-z0-9-]{1,10}\\.[a-z]{2,6}"
}

fn arb_malformed_email() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z0-9]{1,12}",
        "[a-z]{1,6}@[a-z]{1,6}",
        "@[a-z]{1,6}\\.[a-z]{2,3}",
        " [a-z]{1,6}@[a-z]{1,6}\\.[a-z]{2,3}",
        "[a-z]{1,6} [a-z]{1,6}@[a-z]{1,6}\\.[a-z]{2,3}",
    ]
}

proptest! {
    #[test]
    fn blank_required_fields_are_required(field in arb_required_field(), value in arb_blank()) {
        prop_assert_eq!(validate_field(field, &value), Some(ContactFieldError::Required(field)));
    }

    #[test]
    fn optional_fields_accept_anything(value in any::<String>()) {
        prop_assert_eq!(validate_field(ContactField::Company, &value), None);
        prop_assert_eq!(validate_field(ContactField::Phone, &value), None);
    }

    #[test]
    fn single_character_names_are_too_short(
        letter in "[a-zA-Zñáéíóú]",
        left in "[ ]{0,3}",
        right in "[ ]{0,3}",
    ) {
        let value = format!("{left}{letter}{right}");
        prop_assert_eq!(
            validate_field(ContactField::Name, &value),
            Some(ContactFieldError::TooShort { field: ContactField::Name, min: MIN_NAME_CHARS })
        );
    }

    #[test]
    fn names_of_two_or_more_characters_pass(value in "[ ]{0,2}[a-zA-Zñ][a-zA-Zñ ]{0,20}[a-zA-Zñ][ ]{0,2}") {
        prop_assert_eq!(validate_field(ContactField::Name, &value), None);
    }

    #[test]
    fn message_length_uses_trimmed_characters(body in "[a-zé]{1,30}", padding in "[ \n]{0,12}") {
        let value = format!("{padding}{body}{padding}");
        let expected = (body.chars().count() < MIN_MESSAGE_CHARS).then_some(
            ContactFieldError::TooShort { field: ContactField::Message, min: MIN_MESSAGE_CHARS },
        );
        prop_assert_eq!(validate_field(ContactField::Message, &value), expected);
    }

    #[test]
    fn well_formed_emails_pass(value in arb_valid_email()) {
        prop_assert_eq!(validate_field(ContactField::Email, &value), None);
    }

    #[test]
    fn malformed_emails_are_format_errors(value in arb_malformed_email()) {
        prop_assert_eq!(
            validate_field(ContactField::Email, &value),
            Some(ContactFieldError::InvalidEmail)
        );
    }

    #[test]
    fn validation_is_idempotent(field in arb_field(), value in any::<String>()) {
        prop_assert_eq!(validate_field(field, &value), validate_field(field, &value));
    }
}
