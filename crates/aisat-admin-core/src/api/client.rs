//! API client for communicating with the AISAT registration service.
//!
//! This module provides the `ApiClient` struct for the authentication,
//! user-creation and admin presence endpoints.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::Config;

use super::models::{
    yes_no, ActiveStatusRequest, AdminProfile, LoginRequest, LoginResponse, NewUserRequest,
    RegistrationRequest, VerifyResponse,
};
use super::{ApiError, AuthService, PresenceService, UserService};

// ============================================================================
// Constants
// ============================================================================

const LOGIN_PATH: &str = "/api/auth/login";
const REGISTER_PATH: &str = "/api/auth/register";
const VERIFY_PATH: &str = "/api/auth/verify";
const CREATE_USER_PATH: &str = "/api/auth/create_public_user";
const ACTIVE_STATUS_PATH: &str = "/api/admin/update-active-status";
const PROFILE_PATH: &str = "/api/admin/profile";
const DIRECT_ACTIVE_PATH: &str = "/api/set_admin_active";

/// Login, registration and verification fail fast; an operator is waiting.
const DEFAULT_AUTH_TIMEOUT: Duration = Duration::from_secs(5);

const DEFAULT_ADMIN_TIMEOUT: Duration = Duration::from_secs(10);

/// API client for the registration service.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    auth_timeout: Duration,
    admin_timeout: Duration,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth_timeout: DEFAULT_AUTH_TIMEOUT,
            admin_timeout: DEFAULT_ADMIN_TIMEOUT,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(&config.api_base_url)?
            .with_timeouts(config.auth_timeout(), config.admin_timeout()))
    }

    pub fn with_timeouts(mut self, auth: Duration, admin: Duration) -> Self {
        self.auth_timeout = auth;
        self.admin_timeout = admin;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request, mapping non-success statuses to `ApiError::Rejected`.
    async fn send(request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await?;
        Self::check_response(response).await
    }

    async fn check_response(response: Response) -> Result<Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl AuthService for ApiClient {
    async fn login(&self, id_number: &str, password: &str) -> Result<LoginResponse, ApiError> {
        debug!(idno = %id_number, "Sending login request");
        let request = self
            .client
            .post(self.url(LOGIN_PATH))
            .timeout(self.auth_timeout)
            .json(&LoginRequest {
                idno: id_number,
                password,
            });
        let response = Self::send(request).await?;
        Self::read_json(response).await
    }

    async fn register(&self, registration: &RegistrationRequest) -> Result<(), ApiError> {
        debug!(idno = %registration.id_no, "Sending registration request");
        let request = self
            .client
            .post(self.url(REGISTER_PATH))
            .timeout(self.auth_timeout)
            .json(registration);
        Self::send(request).await?;
        Ok(())
    }

    async fn verify(&self, token: &str) -> Result<VerifyResponse, ApiError> {
        let request = self
            .client
            .get(self.url(VERIFY_PATH))
            .bearer_auth(token)
            .timeout(self.auth_timeout);
        let response = Self::send(request).await?;
        Self::read_json(response).await
    }
}

#[async_trait]
impl PresenceService for ApiClient {
    async fn update_active_status(&self, token: &str, active: bool) -> Result<(), ApiError> {
        let request = self
            .client
            .post(self.url(ACTIVE_STATUS_PATH))
            .bearer_auth(token)
            .timeout(self.admin_timeout)
            .json(&ActiveStatusRequest::new(active));
        Self::send(request).await?;
        Ok(())
    }

    async fn fetch_profile(&self, token: &str) -> Result<AdminProfile, ApiError> {
        let request = self
            .client
            .get(self.url(PROFILE_PATH))
            .bearer_auth(token)
            .timeout(self.admin_timeout);
        let response = Self::send(request).await?;
        Self::read_json(response).await
    }

    async fn set_active_direct(&self, admin_id: &str, active: bool) -> Result<(), ApiError> {
        warn!(admin_id, active, "Using unauthenticated active-status endpoint");
        let request = self
            .client
            .get(self.url(DIRECT_ACTIVE_PATH))
            .query(&[("admin_id", admin_id), ("is_active", yes_no(active))])
            .timeout(self.admin_timeout);
        Self::send(request).await?;
        Ok(())
    }
}

#[async_trait]
impl UserService for ApiClient {
    async fn create_public_user(&self, token: &str, user: &NewUserRequest) -> Result<(), ApiError> {
        debug!(idno = %user.idno, level = %user.level, "Creating user");
        let request = self
            .client
            .post(self.url(CREATE_USER_PATH))
            .bearer_auth(token)
            .timeout(self.admin_timeout)
            .json(user);
        Self::send(request).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash() {
        let client = ApiClient::new("http://localhost:5000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(client.url(LOGIN_PATH), "http://localhost:5000/api/auth/login");
    }

    #[test]
    fn test_from_config_timeouts() {
        let config = Config {
            auth_timeout_secs: 7,
            admin_timeout_secs: 9,
            ..Config::default()
        };
        let client = ApiClient::from_config(&config).unwrap();
        assert_eq!(client.auth_timeout, Duration::from_secs(7));
        assert_eq!(client.admin_timeout, Duration::from_secs(9));
        assert_eq!(client.base_url(), crate::config::DEFAULT_API_BASE_URL);
    }

    #[tokio::test]
    async fn test_connection_refused_is_connectivity_error() {
        // Port 9 (discard) on localhost is closed in test environments
        let client = ApiClient::new("http://127.0.0.1:9")
            .unwrap()
            .with_timeouts(Duration::from_secs(2), Duration::from_secs(2));
        let err = client.verify("token").await.unwrap_err();
        assert!(err.is_connectivity(), "unexpected error: {err:?}");
    }
}
