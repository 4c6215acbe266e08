use async_trait::async_trait;

use super::models::{
    AdminProfile, LoginResponse, NewUserRequest, RegistrationRequest, VerifyResponse,
};
use super::ApiError;

/// Login, registration and token verification endpoints.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Submit credentials. Any non-success status is `ApiError::Rejected`.
    async fn login(&self, id_number: &str, password: &str) -> Result<LoginResponse, ApiError>;

    async fn register(&self, registration: &RegistrationRequest) -> Result<(), ApiError>;

    /// Check a bearer token. A non-success status is `ApiError::Rejected`.
    async fn verify(&self, token: &str) -> Result<VerifyResponse, ApiError>;
}

/// Admin active/inactive reporting.
#[async_trait]
pub trait PresenceService: Send + Sync {
    async fn update_active_status(&self, token: &str, active: bool) -> Result<(), ApiError>;

    async fn fetch_profile(&self, token: &str) -> Result<AdminProfile, ApiError>;

    /// Unauthenticated fallback keyed by admin id
    async fn set_active_direct(&self, admin_id: &str, active: bool) -> Result<(), ApiError>;
}

/// Account management performed by a signed-in admin.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Create a regular (non-admin) user. A 401 means the admin's token expired.
    async fn create_public_user(&self, token: &str, user: &NewUserRequest) -> Result<(), ApiError>;
}
