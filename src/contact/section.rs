use std::sync::Arc;

use gpui::SharedString;

use super::model::{ContactField, ContactForm};
use super::transport::{MessageTransport, SubmitError, SubmitReceipt};
use super::validate::{ContactFieldError, validate_field};
use crate::form::{
    FormController, FormModel, FormOptions, FormResult, FormSnapshot, SubmitOutcome, SubmitState,
};
use crate::i18n::I18nManager;
use crate::runtime::SharedSpawner;

/// Binds `$lens` to the derived lens of a runtime `ContactField`.
macro_rules! with_lens {
    ($field:expr, |$lens:ident| $body:expr) => {{
        let fields = ContactForm::fields();
        match $field {
            ContactField::Name => {
                let $lens = fields.name();
                $body
            }
            ContactField::Email => {
                let $lens = fields.email();
                $body
            }
            ContactField::Company => {
                let $lens = fields.company();
                $body
            }
            ContactField::Phone => {
                let $lens = fields.phone();
                $body
            }
            ContactField::Message => {
                let $lens = fields.message();
                $body
            }
        }
    }};
}

pub type ContactController = FormController<ContactForm, ContactFieldError>;
pub type ContactOutcome = SubmitOutcome<SubmitReceipt, SubmitError>;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BannerKind {
    Success,
    Error,
}

/// Page-level result banner shown while the form is in a terminal state.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Banner {
    pub kind: BannerKind,
    pub title: SharedString,
    pub body: SharedString,
}

/// Event handlers and display state of the contact section.
#[derive(Clone)]
pub struct ContactSection {
    controller: ContactController,
    transport: Arc<dyn MessageTransport>,
    i18n: I18nManager,
}

impl ContactSection {
    pub fn new(
        i18n: I18nManager,
        transport: Arc<dyn MessageTransport>,
        options: FormOptions,
    ) -> FormResult<Self> {
        let controller = ContactController::new(ContactForm::default(), options);
        register_rules(&controller)?;
        Ok(Self {
            controller,
            transport,
            i18n,
        })
    }

    pub fn with_spawner(mut self, spawner: SharedSpawner) -> Self {
        self.controller = self.controller.with_spawner(spawner);
        self
    }

    pub fn controller(&self) -> &ContactController {
        &self.controller
    }

    pub fn on_change(&self, field: ContactField, value: impl Into<String>) -> FormResult<()> {
        let value = value.into();
        with_lens!(field, |lens| self.controller.set(lens, value))
    }

    pub fn on_blur(&self, field: ContactField, value: impl Into<String>) -> FormResult<()> {
        let value = value.into();
        with_lens!(field, |lens| self.controller.blur(lens, value))
    }

    /// Validates and, when the form is clean, posts it once. Failures never
    /// escape as errors; they land in the form state and the log.
    pub async fn submit(&self) -> FormResult<ContactOutcome> {
        let transport = self.transport.clone();
        let outcome = self
            .controller
            .submit_with(move |model| async move { transport.send(&model).await })
            .await?;

        match &outcome {
            SubmitOutcome::Accepted(receipt) => {
                tracing::info!(
                    reply = receipt.message.as_deref().unwrap_or_default(),
                    "contact message delivered"
                );
            }
            SubmitOutcome::Rejected(error @ SubmitError::Rejected { status, .. }) => {
                tracing::warn!(status, %error, "contact message rejected by server");
            }
            SubmitOutcome::Rejected(error) => {
                tracing::error!(%error, "contact message could not be delivered");
            }
            SubmitOutcome::Invalid => {
                tracing::debug!("contact form has validation errors");
            }
            SubmitOutcome::Discarded => {}
        }
        Ok(outcome)
    }

    pub fn banner(&self) -> FormResult<Option<Banner>> {
        let banner = match self.controller.submit_state()? {
            SubmitState::Submitted => Some(Banner {
                kind: BannerKind::Success,
                title: self.i18n.t("contact.banner.success_title"),
                body: self.i18n.t("contact.banner.success_body"),
            }),
            SubmitState::Failed => Some(Banner {
                kind: BannerKind::Error,
                title: self.i18n.t("contact.banner.error_title"),
                body: self.i18n.t("contact.banner.error_body"),
            }),
            SubmitState::Idle | SubmitState::Submitting => None,
        };
        Ok(banner)
    }

    pub fn field_error(&self, field: ContactField) -> FormResult<Option<SharedString>> {
        with_lens!(field, |lens| self.controller.field_error_message(lens, &self.i18n))
    }

    /// Whether the field is registered as required, for the label marker.
    pub fn is_required(&self, field: ContactField) -> FormResult<bool> {
        with_lens!(field, |lens| self.controller.is_required(lens))
    }

    pub fn placeholder(&self, field: ContactField) -> SharedString {
        self.i18n.t(&field.placeholder_key())
    }

    pub fn submit_label(&self) -> FormResult<SharedString> {
        Ok(match self.controller.submit_state()? {
            SubmitState::Submitting => self.i18n.t("contact.submitting"),
            _ => self.i18n.t("contact.submit"),
        })
    }

    pub fn is_submit_disabled(&self) -> FormResult<bool> {
        Ok(!self.controller.is_submit_enabled()?)
    }

    pub fn snapshot(&self) -> FormResult<FormSnapshot<ContactForm, ContactFieldError>> {
        self.controller.snapshot()
    }

    pub fn teardown(&self) -> FormResult<()> {
        self.controller.teardown()
    }
}

fn register_rules(controller: &ContactController) -> FormResult<()> {
    for field in ContactField::ALL.into_iter().filter(|field| field.is_required()) {
        with_lens!(field, |lens| controller.register_required_field(lens))?;
    }

    let fields = ContactForm::fields();

    controller.register_field_validator(fields.name(), |_: &ContactForm, value: &String| {
        check(ContactField::Name, value)
    })?;
    controller.register_field_validator(fields.email(), |_: &ContactForm, value: &String| {
        check(ContactField::Email, value)
    })?;
    controller.register_field_validator(fields.message(), |_: &ContactForm, value: &String| {
        check(ContactField::Message, value)
    })?;
    Ok(())
}

fn check(field: ContactField, value: &str) -> Result<(), ContactFieldError> {
    validate_field(field, value).map_or(Ok(()), Err)
}
