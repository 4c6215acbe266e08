use anyhow::{Context, Result};
use keyring::Entry;
use serde_json::Value;
use tracing::warn;

use super::{keys, KeyValueStore};

const SERVICE_NAME: &str = "aisat-admin";

/// Each key is one entry in the OS keychain. Values are stored as text.
pub struct KeyringStore {
    service: String,
}

impl KeyringStore {
    pub fn new() -> Self {
        Self::with_service(SERVICE_NAME)
    }

    pub fn with_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(&self, key: &str) -> Result<Entry> {
        Entry::new(&self.service, key).context("Failed to create keyring entry")
    }
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for KeyringStore {
    fn get(&self, key: &str) -> Option<Value> {
        let entry = match self.entry(key) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(key, error = %e, "Keychain unavailable");
                return None;
            }
        };
        match entry.get_password() {
            Ok(secret) => Some(Value::String(secret)),
            Err(keyring::Error::NoEntry) => None,
            Err(e) => {
                warn!(key, error = %e, "Failed to read from keychain");
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        let text = match value {
            Value::String(s) => s,
            other => other.to_string(),
        };
        self.entry(key)?
            .set_password(&text)
            .context("Failed to store secret in keychain")?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        match self.entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e).context("Failed to delete secret from keychain"),
        }
    }
}

/// Routes the sensitive keys to `secrets` and everything else to `plain`.
pub struct SecureStore<P, S> {
    plain: P,
    secrets: S,
}

impl<P: KeyValueStore, S: KeyValueStore> SecureStore<P, S> {
    pub fn new(plain: P, secrets: S) -> Self {
        Self { plain, secrets }
    }

    fn is_sensitive(key: &str) -> bool {
        keys::SENSITIVE.contains(&key)
    }
}

impl<P: KeyValueStore, S: KeyValueStore> KeyValueStore for SecureStore<P, S> {
    fn get(&self, key: &str) -> Option<Value> {
        if Self::is_sensitive(key) {
            self.secrets.get(key)
        } else {
            self.plain.get(key)
        }
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        if Self::is_sensitive(key) {
            self.secrets.set(key, value)
        } else {
            self.plain.set(key, value)
        }
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if Self::is_sensitive(key) {
            // A secret written by an older plain-text setup must not linger
            self.plain.remove(key)?;
            self.secrets.remove(key)
        } else {
            self.plain.remove(key)
        }
    }
}
