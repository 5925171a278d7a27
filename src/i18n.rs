use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use gpui::SharedString;

mod generated {
    include!(concat!(env!("OUT_DIR"), "/starkmind_i18n_generated.rs"));
}

/// The two locales the site ships content for.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Language {
    Es,
    En,
}

impl Language {
    pub const fn tag(self) -> &'static str {
        match self {
            Language::Es => "es",
            Language::En => "en",
        }
    }

    pub const fn toggled(self) -> Self {
        match self {
            Language::Es => Language::En,
            Language::En => Language::Es,
        }
    }

    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "es" => Some(Language::Es),
            "en" => Some(Language::En),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Default)]
pub enum Locale {
    #[default]
    System,
    Tag(String),
}

impl From<String> for Locale {
    fn from(value: String) -> Self {
        if value.trim().eq_ignore_ascii_case("system") {
            return Self::System;
        }
        Self::Tag(value.trim().to_string())
    }
}

impl From<&str> for Locale {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<Language> for Locale {
    fn from(value: Language) -> Self {
        Self::Tag(value.tag().to_string())
    }
}

/// Content lookup shared by every section of the site. Clones share the
/// selected locale.
#[derive(Clone)]
pub struct I18nManager {
    catalog: Arc<I18nCatalog>,
    locale: Arc<RwLock<Locale>>,
}

impl Default for I18nManager {
    fn default() -> Self {
        Self::new()
    }
}

impl I18nManager {
    pub fn new() -> Self {
        Self::with_locale(Locale::System)
    }

    pub fn with_locale(locale: impl Into<Locale>) -> Self {
        Self {
            catalog: Arc::new(I18nCatalog::load()),
            locale: Arc::new(RwLock::new(locale.into())),
        }
    }

    pub fn locale(&self) -> Locale {
        match self.locale.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn set_locale(&self, locale: impl Into<Locale>) {
        let mut guard = match self.locale.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = locale.into();
    }

    pub fn default_locale(&self) -> &'static str {
        self.catalog.default_locale
    }

    pub fn resolved_locale(&self) -> &'static str {
        self.catalog
            .resolve_locale(self.requested_locale().as_deref())
    }

    pub fn language(&self) -> Language {
        Language::from_tag(self.resolved_locale()).unwrap_or(Language::Es)
    }

    /// Switches between Spanish and English and returns the new language.
    pub fn toggle_language(&self) -> Language {
        let next = self.language().toggled();
        self.set_locale(next);
        tracing::debug!(language = next.tag(), "site language toggled");
        next
    }

    pub fn has_key(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    pub fn t(&self, key: &str) -> SharedString {
        match self.lookup(key) {
            Some(value) => value.into(),
            None => key.to_string().into(),
        }
    }

    pub fn t_with(&self, key: &str, params: &[(&str, &str)]) -> SharedString {
        let template = self.lookup(key);
        if params.is_empty() {
            return self.t(key);
        }
        format_template(template.unwrap_or(key), params).into()
    }

    fn requested_locale(&self) -> Option<String> {
        match self.locale() {
            Locale::System => system_locale(),
            Locale::Tag(tag) => Some(tag),
        }
    }

    fn lookup(&self, key: &str) -> Option<&'static str> {
        let resolved = self.resolved_locale();
        self.catalog.lookup(resolved, key)
    }
}

#[cfg(feature = "system-locale")]
fn system_locale() -> Option<String> {
    sys_locale::get_locale()
}

#[cfg(not(feature = "system-locale"))]
fn system_locale() -> Option<String> {
    None
}

struct I18nCatalog {
    default_locale: &'static str,
    locales: HashMap<&'static str, HashMap<&'static str, &'static str>>,
}

impl I18nCatalog {
    fn load() -> Self {
        let mut locales = generated::LOCALES
            .iter()
            .map(|(locale, entries)| (*locale, entries.iter().copied().collect::<HashMap<_, _>>()))
            .collect::<HashMap<_, _>>();
        locales.entry(generated::DEFAULT_LOCALE).or_default();

        Self {
            default_locale: generated::DEFAULT_LOCALE,
            locales,
        }
    }

    /// Both shipped locales are bare language tags, so any regional variant
    /// (`es-PA`, `en_US.UTF-8`) resolves by its language subtag.
    fn resolve_locale(&self, requested: Option<&str>) -> &'static str {
        let Some(requested) = requested else {
            return self.default_locale;
        };

        let normalized = normalize_locale_tag(requested);
        let language = normalized.split('-').next().unwrap_or_default();
        self.locales
            .keys()
            .copied()
            .find(|locale| *locale == language)
            .unwrap_or(self.default_locale)
    }

    fn lookup(&self, locale: &'static str, key: &str) -> Option<&'static str> {
        self.locales
            .get(locale)
            .and_then(|entries| entries.get(key).copied())
    }
}

fn normalize_locale_tag(tag: &str) -> String {
    let trimmed = tag.trim();
    let without_encoding = trimmed.split('.').next().unwrap_or(trimmed);
    let without_variant = without_encoding
        .split('@')
        .next()
        .unwrap_or(without_encoding);
    without_variant
        .replace('_', "-")
        .split('-')
        .filter(|segment| !segment.is_empty())
        .map(|segment| segment.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

fn format_template(template: &str, params: &[(&str, &str)]) -> String {
    let values = params.iter().copied().collect::<HashMap<&str, &str>>();
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        output.push_str(&rest[..open]);
        let after_open = &rest[open + 1..];
        let Some(close) = after_open.find('}') else {
            output.push_str(&rest[open..]);
            return output;
        };
        let token = &after_open[..close];
        match values.get(token) {
            Some(value) => output.push_str(value),
            None => output.push_str(&rest[open..open + close + 2]),
        }
        rest = &after_open[close + 1..];
    }
    output.push_str(rest);
    output
}

#[cfg(test)]
mod tests {
    use super::{I18nManager, Language, format_template, normalize_locale_tag};

    #[test]
    fn missing_translation_shows_key() {
        let i18n = I18nManager::with_locale("en");
        assert_eq!(i18n.t("nav.not_there").to_string(), "nav.not_there");
    }

    #[test]
    fn default_locale_is_spanish() {
        let i18n = I18nManager::with_locale("de-DE");
        assert_eq!(i18n.default_locale(), "es");
        assert_eq!(i18n.t("nav.contact").to_string(), "Consultoría");
    }

    #[test]
    fn regional_tags_resolve_to_language() {
        let i18n = I18nManager::with_locale("en_US.UTF-8");
        assert_eq!(i18n.resolved_locale(), "en");
        i18n.set_locale("es-PA");
        assert_eq!(i18n.resolved_locale(), "es");
        i18n.set_locale("fr-FR");
        assert_eq!(i18n.resolved_locale(), "es");
    }

    #[test]
    fn toggle_flips_between_both_languages() {
        let i18n = I18nManager::with_locale(Language::Es);
        assert_eq!(i18n.toggle_language(), Language::En);
        assert_eq!(i18n.t("nav.contact").to_string(), "Consultation");
        assert_eq!(i18n.toggle_language(), Language::Es);
    }

    #[test]
    fn clones_share_the_selected_locale() {
        let i18n = I18nManager::with_locale("es");
        let other = i18n.clone();
        other.set_locale("en");
        assert_eq!(i18n.language(), Language::En);
    }

    #[test]
    fn supports_placeholder_interpolation() {
        let i18n = I18nManager::with_locale("en");
        assert_eq!(
            i18n.t_with("contact.errors.message_too_short", &[("min", "10")])
                .to_string(),
            "Message must be at least 10 characters"
        );
    }

    #[test]
    fn template_keeps_unknown_and_unclosed_tokens() {
        assert_eq!(format_template("{a}-{b}", &[("a", "1")]), "1-{b}");
        assert_eq!(format_template("x {open", &[("open", "1")]), "x {open");
    }

    #[test]
    fn normalizes_encoding_and_variant() {
        assert_eq!(normalize_locale_tag(" es_PA.UTF-8@euro "), "es-pa");
    }
}
