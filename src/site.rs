use std::sync::Arc;

use gpui::SharedString;

use crate::contact::{ContactSection, MessageTransport};
use crate::form::{FormOptions, FormResult};
use crate::i18n::{I18nManager, Language};
use crate::runtime::SharedSpawner;
use crate::session::{DemoSession, FlagStore, InMemoryFlagStore};

/// Page sections in navigation order.
pub const NAV_SECTIONS: [&str; 7] = [
    "services",
    "development",
    "portfolio",
    "demos",
    "technology",
    "company",
    "contact",
];

/// Everything the page sections share, created once at startup and handed
/// to each section explicitly.
pub struct SiteContext<S: FlagStore = InMemoryFlagStore> {
    i18n: I18nManager,
    session: DemoSession<S>,
    spawner: Option<SharedSpawner>,
    form_options: FormOptions,
}

impl SiteContext<InMemoryFlagStore> {
    pub fn in_memory(i18n: I18nManager) -> Self {
        Self::new(i18n, InMemoryFlagStore::new())
    }
}

impl<S: FlagStore> SiteContext<S> {
    pub fn new(i18n: I18nManager, store: S) -> Self {
        Self {
            i18n,
            session: DemoSession::new(store),
            spawner: None,
            form_options: FormOptions::default(),
        }
    }

    pub fn with_spawner(mut self, spawner: SharedSpawner) -> Self {
        self.spawner = Some(spawner);
        self
    }

    pub fn with_form_options(mut self, options: FormOptions) -> Self {
        self.form_options = options;
        self
    }

    pub fn i18n(&self) -> &I18nManager {
        &self.i18n
    }

    pub fn session(&self) -> &DemoSession<S> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut DemoSession<S> {
        &mut self.session
    }

    pub fn language(&self) -> Language {
        self.i18n.language()
    }

    pub fn toggle_language(&self) -> Language {
        self.i18n.toggle_language()
    }

    /// Contact section sharing this site's catalog, options and spawner.
    pub fn contact_section(
        &self,
        transport: Arc<dyn MessageTransport>,
    ) -> FormResult<ContactSection> {
        let section = ContactSection::new(self.i18n.clone(), transport, self.form_options)?;
        Ok(match &self.spawner {
            Some(spawner) => section.with_spawner(spawner.clone()),
            None => section,
        })
    }

    pub fn page_title(&self) -> SharedString {
        self.i18n.t("site.title")
    }

    pub fn page_description(&self) -> SharedString {
        self.i18n.t("site.description")
    }

    pub fn navigation(&self) -> Vec<(&'static str, SharedString)> {
        NAV_SECTIONS
            .iter()
            .map(|section| (*section, self.i18n.t(&format!("nav.{section}"))))
            .collect()
    }
}
