//! Persistent key/value settings used by the session lifecycle.
//!
//! This module provides:
//! - `KeyValueStore`: the get/set/remove interface with typed readers
//! - `MemoryStore`: an in-process store for tests and ephemeral runs
//! - `JsonFileStore`: a single JSON document on disk
//! - `KeyringStore` / `SecureStore`: OS keychain storage for the sensitive keys

pub mod file;
pub mod memory;
pub mod secret;

pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use secret::{KeyringStore, SecureStore};

use anyhow::Result;
use serde_json::Value;

/// Well-known setting names
pub mod keys {
    pub const REMEMBER_ME: &str = "remember_me";
    pub const ID_NUMBER: &str = "idno";
    pub const PASSWORD: &str = "password";
    pub const AUTH_TOKEN: &str = "auth_token";
    pub const ADMIN_NAME: &str = "admin_name";
    pub const THEME: &str = "theme";

    /// Keys that never belong in a plain-text settings file
    pub const SENSITIVE: [&str; 2] = [PASSWORD, AUTH_TOKEN];
}

pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Option<Value>;

    fn set(&mut self, key: &str, value: Value) -> Result<()>;

    /// Removing an absent key is not an error
    fn remove(&mut self, key: &str) -> Result<()>;

    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Read a value as text. Numbers and bools are rendered; null reads as absent.
    fn get_string(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(s) => Some(s),
            Value::Bool(b) => Some(b.to_string()),
            Value::Number(n) => Some(n.to_string()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }

    /// Read a value as a flag, falling back to `default` when absent or unrecognised.
    fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.get(key) {
            Some(value) => coerce_bool(&value).unwrap_or(default),
            None => default,
        }
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Option<Value> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" | "" => Some(false),
            _ => None,
        },
        _ => None,
    }
}
