use anyhow::Result;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::store::{keys, KeyValueStore};
use crate::theme::Theme;

use super::CredentialRecord;

/// Label used when the service does not supply an admin name
pub const DEFAULT_ADMIN_NAME: &str = "Admin";

/// An authenticated admin session.
///
/// There is no local expiry: the token stays usable until the service says
/// otherwise or the operator logs out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminSession {
    pub token: String,
    pub display_name: String,
    pub signed_in_at: DateTime<Utc>,
    /// Accepted without a verification round-trip because the service was unreachable
    pub trusted_offline: bool,
}

impl AdminSession {
    pub fn new(token: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            display_name: display_name.into(),
            signed_in_at: Utc::now(),
            trusted_offline: false,
        }
    }

    pub fn offline(token: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            trusted_offline: true,
            ..Self::new(token, display_name)
        }
    }

    /// Minutes since sign-in (for display)
    pub fn minutes_signed_in(&self) -> i64 {
        (Utc::now() - self.signed_in_at).num_minutes().max(0)
    }
}

/// Typed view of the persisted session settings.
pub struct SessionStore<S> {
    inner: S,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    // ===== Bearer token =====

    /// Stored token; an empty string counts as absent
    pub fn token(&self) -> Option<String> {
        self.inner
            .get_string(keys::AUTH_TOKEN)
            .filter(|t| !t.is_empty())
    }

    pub fn set_token(&mut self, token: &str) -> Result<()> {
        self.inner.set(keys::AUTH_TOKEN, Value::from(token))
    }

    pub fn clear_token(&mut self) -> Result<()> {
        self.inner.remove(keys::AUTH_TOKEN)
    }

    // ===== Display name =====

    pub fn admin_name(&self) -> String {
        self.inner
            .get_string(keys::ADMIN_NAME)
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| DEFAULT_ADMIN_NAME.to_string())
    }

    pub fn set_admin_name(&mut self, name: &str) -> Result<()> {
        self.inner.set(keys::ADMIN_NAME, Value::from(name))
    }

    // ===== Remember-me =====

    /// Remembered credentials, only when the remember flag is set
    pub fn remembered(&self) -> Option<CredentialRecord> {
        if !self.inner.get_bool(keys::REMEMBER_ME, false) {
            return None;
        }
        Some(CredentialRecord {
            id_number: self.inner.get_string(keys::ID_NUMBER).unwrap_or_default(),
            password: self.inner.get_string(keys::PASSWORD).unwrap_or_default(),
            remember: true,
        })
    }

    /// Persist the pair when `remember` is set, otherwise wipe any stored pair
    pub fn save_credentials(&mut self, record: &CredentialRecord) -> Result<()> {
        if record.remember {
            self.inner.set(keys::REMEMBER_ME, Value::Bool(true))?;
            self.inner.set(keys::ID_NUMBER, Value::from(record.id_number.as_str()))?;
            self.inner.set(keys::PASSWORD, Value::from(record.password.as_str()))?;
        } else {
            self.inner.set(keys::REMEMBER_ME, Value::Bool(false))?;
            self.inner.remove(keys::ID_NUMBER)?;
            self.inner.remove(keys::PASSWORD)?;
        }
        Ok(())
    }

    // ===== Theme =====

    pub fn theme(&self) -> Theme {
        self.inner
            .get_string(keys::THEME)
            .map(|t| Theme::parse(&t))
            .unwrap_or_default()
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<()> {
        self.inner.set(keys::THEME, Value::from(theme.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    #[test]
    fn test_empty_token_is_absent() {
        let mut store = SessionStore::new(MemoryStore::new());
        assert!(store.token().is_none());
        store.set_token("").unwrap();
        assert!(store.token().is_none());
        store.set_token("abc").unwrap();
        assert_eq!(store.token().as_deref(), Some("abc"));
        store.clear_token().unwrap();
        assert!(store.token().is_none());
    }

    #[test]
    fn test_admin_name_default() {
        let mut store = SessionStore::new(MemoryStore::new());
        assert_eq!(store.admin_name(), DEFAULT_ADMIN_NAME);
        store.set_admin_name("Jane").unwrap();
        assert_eq!(store.admin_name(), "Jane");
    }

    #[test]
    fn test_remember_round_trip_and_forget() {
        let mut store = SessionStore::new(MemoryStore::new());
        let record = CredentialRecord {
            id_number: "2021-0001".into(),
            password: "pw".into(),
            remember: true,
        };
        store.save_credentials(&record).unwrap();
        assert_eq!(store.remembered(), Some(record.clone()));

        store
            .save_credentials(&CredentialRecord {
                remember: false,
                ..record
            })
            .unwrap();
        assert!(store.remembered().is_none());
        assert!(!store.inner().contains(keys::ID_NUMBER));
        assert!(!store.inner().contains(keys::PASSWORD));
    }

    #[test]
    fn test_remember_flag_stored_as_text() {
        let mut inner = MemoryStore::new();
        inner.set(keys::REMEMBER_ME, json!("true")).unwrap();
        inner.set(keys::ID_NUMBER, json!("2021-0002")).unwrap();
        let store = SessionStore::new(inner);
        let record = store.remembered().unwrap();
        assert_eq!(record.id_number, "2021-0002");
        assert_eq!(record.password, "");
    }

    #[test]
    fn test_theme_persistence() {
        let mut store = SessionStore::new(MemoryStore::new());
        assert_eq!(store.theme(), Theme::Light);
        store.set_theme(Theme::Dark).unwrap();
        assert_eq!(store.theme(), Theme::Dark);
    }
}
