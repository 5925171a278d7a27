extern crate self as starkmind;

pub mod contact;
pub mod demo;
pub mod form;
pub mod i18n;
pub mod prelude;
pub mod runtime;
pub mod session;
pub mod site;

pub use i18n::{I18nManager, Language, Locale};
pub use site::SiteContext;
