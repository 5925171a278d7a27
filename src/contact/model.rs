use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::form::{FieldKey, FormModel};

/// Values of the contact form, serialized as-is into the request body.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize, FormModel)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub phone: String,
    pub message: String,
}

impl ContactForm {
    pub fn value(&self, field: ContactField) -> &str {
        match field {
            ContactField::Name => &self.name,
            ContactField::Email => &self.email,
            ContactField::Company => &self.company,
            ContactField::Phone => &self.phone,
            ContactField::Message => &self.message,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum ContactField {
    Name,
    Email,
    Company,
    Phone,
    Message,
}

impl ContactField {
    pub const ALL: [ContactField; 5] = [
        ContactField::Name,
        ContactField::Email,
        ContactField::Company,
        ContactField::Phone,
        ContactField::Message,
    ];

    pub const REQUIRED: [ContactField; 3] =
        [ContactField::Name, ContactField::Email, ContactField::Message];

    pub const fn as_str(self) -> &'static str {
        match self {
            ContactField::Name => "name",
            ContactField::Email => "email",
            ContactField::Company => "company",
            ContactField::Phone => "phone",
            ContactField::Message => "message",
        }
    }

    pub const fn key(self) -> FieldKey {
        FieldKey::new(self.as_str())
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.as_str() == key)
    }

    pub const fn is_required(self) -> bool {
        matches!(
            self,
            ContactField::Name | ContactField::Email | ContactField::Message
        )
    }

    pub fn placeholder_key(self) -> String {
        format!("contact.placeholders.{}", self.as_str())
    }
}

impl Display for ContactField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
