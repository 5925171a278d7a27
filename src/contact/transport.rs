use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;

use super::model::ContactForm;
use crate::form::{SubmitErrorKind, SubmitFailure};

/// Path of the backend endpoint that relays contact messages by email.
pub const CONTACT_ENDPOINT: &str = "/api/send-email";

pub type TransportFuture<'a> =
    Pin<Box<dyn Future<Output = Result<SubmitReceipt, SubmitError>> + Send + 'a>>;

/// Delivers one contact message to the backend.
pub trait MessageTransport: Send + Sync {
    fn send<'a>(&'a self, message: &'a ContactForm) -> TransportFuture<'a>;
}

impl<T> MessageTransport for Arc<T>
where
    T: MessageTransport + ?Sized,
{
    fn send<'a>(&'a self, message: &'a ContactForm) -> TransportFuture<'a> {
        (**self).send(message)
    }
}

/// Backend acknowledgement of a delivered message.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SubmitReceipt {
    pub message: Option<String>,
}

#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum SubmitError {
    /// The backend answered but did not accept the message.
    #[error("message rejected with status {status}: {}", .message.as_deref().unwrap_or("no details"))]
    Rejected {
        status: u16,
        message: Option<String>,
    },
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("malformed response with status {status}: {reason}")]
    Malformed { status: u16, reason: String },
}

impl SubmitErrorKind for SubmitError {
    fn failure(&self) -> SubmitFailure {
        match self {
            SubmitError::Rejected { .. } => SubmitFailure::Rejected,
            SubmitError::Transport(_) | SubmitError::Malformed { .. } => SubmitFailure::Transport,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ResponseBody {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

/// Maps a backend reply to a receipt. Only a 2xx status whose JSON body has
/// `success: true` counts as delivered; a body that is not JSON is a
/// transport-level failure whatever the status.
pub fn interpret_response(status: u16, body: &[u8]) -> Result<SubmitReceipt, SubmitError> {
    let parsed: ResponseBody =
        serde_json::from_slice(body).map_err(|error| SubmitError::Malformed {
            status,
            reason: error.to_string(),
        })?;

    if (200..300).contains(&status) && parsed.success {
        Ok(SubmitReceipt {
            message: parsed.message,
        })
    } else {
        Err(SubmitError::Rejected {
            status,
            message: parsed.message,
        })
    }
}
