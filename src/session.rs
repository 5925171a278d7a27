//! Toy password gate in front of the demo videos. Not a security boundary.

use std::collections::BTreeMap;
use std::convert::Infallible;
use std::sync::{Arc, RwLock};

pub const DEMO_PASSWORD: &str = "demo123";
pub const DEMO_FLAG_KEY: &str = "demo_authenticated";

/// Persists boolean flags between visits (browser storage on the site).
pub trait FlagStore: Send + Sync + 'static {
    type Error: std::error::Error + Send + Sync + 'static;

    fn get(&self, key: &str) -> Result<bool, Self::Error>;
    fn set(&self, key: &str, value: bool) -> Result<(), Self::Error>;
    fn clear(&self, key: &str) -> Result<(), Self::Error>;
}

#[derive(Clone, Default)]
pub struct InMemoryFlagStore {
    flags: Arc<RwLock<BTreeMap<String, bool>>>,
}

impl InMemoryFlagStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FlagStore for InMemoryFlagStore {
    type Error = Infallible;

    fn get(&self, key: &str) -> Result<bool, Self::Error> {
        let flags = match self.flags.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        Ok(flags.get(key).copied().unwrap_or(false))
    }

    fn set(&self, key: &str, value: bool) -> Result<(), Self::Error> {
        let mut flags = match self.flags.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        flags.insert(key.to_string(), value);
        Ok(())
    }

    fn clear(&self, key: &str) -> Result<(), Self::Error> {
        let mut flags = match self.flags.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        flags.remove(key);
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum DemoView {
    #[default]
    Home,
    Login,
    Videos,
}

pub struct DemoSession<S: FlagStore> {
    store: S,
    authenticated: bool,
    view: DemoView,
}

impl<S: FlagStore> DemoSession<S> {
    /// Restores a previous login from the store. A store that cannot be read
    /// counts as logged out.
    pub fn new(store: S) -> Self {
        let authenticated = match store.get(DEMO_FLAG_KEY) {
            Ok(value) => value,
            Err(error) => {
                tracing::warn!(%error, "failed to read demo session flag");
                false
            }
        };
        Self {
            store,
            authenticated,
            view: DemoView::Home,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn view(&self) -> DemoView {
        self.view
    }

    pub fn set_view(&mut self, view: DemoView) {
        self.view = view;
    }

    /// Opens the login view when the page query carries `demo=access`.
    pub fn apply_query(&mut self, query: &str) -> bool {
        let query = query.strip_prefix('?').unwrap_or(query);
        let requested = query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .any(|(key, value)| key == "demo" && value == "access");
        if requested {
            self.view = DemoView::Login;
        }
        requested
    }

    pub fn login(&mut self, password: &str) -> bool {
        if password != DEMO_PASSWORD {
            tracing::info!("demo login rejected");
            return false;
        }
        if let Err(error) = self.store.set(DEMO_FLAG_KEY, true) {
            tracing::warn!(%error, "failed to persist demo session flag");
        }
        self.authenticated = true;
        self.view = DemoView::Videos;
        tracing::info!("demo login accepted");
        true
    }

    pub fn logout(&mut self) {
        if let Err(error) = self.store.clear(DEMO_FLAG_KEY) {
            tracing::warn!(%error, "failed to clear demo session flag");
        }
        self.authenticated = false;
        self.view = DemoView::Home;
        tracing::info!("demo session closed");
    }
}

#[cfg(test)]
mod tests {
    use super::{DEMO_FLAG_KEY, DemoSession, DemoView, FlagStore, InMemoryFlagStore};

    #[test]
    fn wrong_password_keeps_gate_closed() {
        let mut session = DemoSession::new(InMemoryFlagStore::new());
        session.set_view(DemoView::Login);
        assert!(!session.login("demo"));
        assert!(!session.is_authenticated());
        assert_eq!(session.view(), DemoView::Login);
        assert!(!session.store().get(DEMO_FLAG_KEY).unwrap());
    }

    #[test]
    fn login_persists_flag_and_opens_videos() {
        let store = InMemoryFlagStore::new();
        let mut session = DemoSession::new(store.clone());
        assert!(session.login("demo123"));
        assert_eq!(session.view(), DemoView::Videos);

        let restored = DemoSession::new(store);
        assert!(restored.is_authenticated());
        assert_eq!(restored.view(), DemoView::Home);
    }

    #[test]
    fn logout_clears_flag() {
        let store = InMemoryFlagStore::new();
        let mut session = DemoSession::new(store.clone());
        session.login("demo123");
        session.logout();
        assert!(!session.is_authenticated());
        assert_eq!(session.view(), DemoView::Home);
        assert!(!store.get(DEMO_FLAG_KEY).unwrap());
    }

    #[test]
    fn access_query_opens_login() {
        let mut session = DemoSession::new(InMemoryFlagStore::new());
        assert!(!session.apply_query("?lang=en"));
        assert_eq!(session.view(), DemoView::Home);
        assert!(session.apply_query("?lang=en&demo=access"));
        assert_eq!(session.view(), DemoView::Login);
    }
}
