pub use crate::contact::{
    Banner, BannerKind, ContactField, ContactForm, ContactSection, MessageTransport,
    SubmitError, SubmitReceipt,
};
#[cfg(feature = "http")]
pub use crate::contact::HttpTransport;
pub use crate::demo::{DemoFrame, DemoKind, DemoScript};
pub use crate::form::{
    FieldLens, FormController, FormModel, FormOptions, FormResult, SubmitOutcome, SubmitState,
    ValidationMode,
};
pub use crate::runtime::{GpuiSpawner, QueueSpawner, SharedSpawner};
pub use crate::session::{DemoSession, DemoView, FlagStore, InMemoryFlagStore};
pub use crate::{I18nManager, Language, Locale, SiteContext};
