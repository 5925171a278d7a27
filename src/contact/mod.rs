//! The consultation request form of the site.

#[cfg(feature = "http")]
mod http;
mod model;
mod section;
mod transport;
mod validate;

#[cfg(feature = "http")]
pub use http::HttpTransport;
pub use model::{ContactField, ContactForm, ContactFormFields};
pub use section::{Banner, BannerKind, ContactController, ContactOutcome, ContactSection};
pub use transport::{
    CONTACT_ENDPOINT, MessageTransport, SubmitError, SubmitReceipt, TransportFuture,
    interpret_response,
};
pub use validate::{
    ContactFieldError, MIN_MESSAGE_CHARS, MIN_NAME_CHARS, validate_field, validate_required,
};
