//! Request and response bodies of the remote service.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub idno: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default, deserialize_with = "truthy")]
    pub is_admin: bool,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegistrationRequest {
    pub full_name: String,
    pub id_no: String,
    pub email: String,
    pub contact_no: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VerifyResponse {
    #[serde(default, deserialize_with = "truthy")]
    pub valid: bool,
    #[serde(default, deserialize_with = "truthy")]
    pub is_admin: bool,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewUserRequest {
    pub idno: String,
    pub name: String,
    pub email: String,
    pub level: String,
    pub cell: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ActiveStatusRequest {
    pub is_active: &'static str,
}

impl ActiveStatusRequest {
    pub fn new(active: bool) -> Self {
        Self {
            is_active: yes_no(active),
        }
    }
}

pub(crate) fn yes_no(active: bool) -> &'static str {
    if active {
        "yes"
    } else {
        "no"
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminProfile {
    #[serde(default)]
    id: Option<Value>,
}

impl AdminProfile {
    /// Admin id as sent back in query strings; numeric and text ids are both accepted
    pub fn id(&self) -> Option<String> {
        match self.id.as_ref()? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

impl ErrorBody {
    pub fn into_message(self) -> Option<String> {
        self.error.filter(|m| !m.trim().is_empty())
    }
}

/// Accept `true`, `1` or `"true"` style flags; the service is not consistent.
fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => matches!(s.to_ascii_lowercase().as_str(), "true" | "1" | "yes"),
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_response_flag_shapes() {
        let a: LoginResponse =
            serde_json::from_str(r#"{"token": "t", "is_admin": 1, "name": "Jane"}"#).unwrap();
        assert!(a.is_admin);
        let b: LoginResponse = serde_json::from_str(r#"{"token": "t", "is_admin": null}"#).unwrap();
        assert!(!b.is_admin);
        let c: LoginResponse = serde_json::from_str(r#"{"token": "t"}"#).unwrap();
        assert!(!c.is_admin);
        assert!(c.name.is_none());
    }

    #[test]
    fn test_verify_response_defaults() {
        let v: VerifyResponse = serde_json::from_str("{}").unwrap();
        assert!(!v.valid);
        assert!(!v.is_admin);
    }

    #[test]
    fn test_admin_profile_id() {
        let numeric: AdminProfile = serde_json::from_str(r#"{"id": 17}"#).unwrap();
        assert_eq!(numeric.id().as_deref(), Some("17"));
        let text: AdminProfile = serde_json::from_str(r#"{"id": "a-17"}"#).unwrap();
        assert_eq!(text.id().as_deref(), Some("a-17"));
        let missing: AdminProfile = serde_json::from_str(r#"{"name": "x"}"#).unwrap();
        assert_eq!(missing.id(), None);
    }

    #[test]
    fn test_active_status_body() {
        let body = serde_json::to_value(ActiveStatusRequest::new(false)).unwrap();
        assert_eq!(body, serde_json::json!({"is_active": "no"}));
    }
}
