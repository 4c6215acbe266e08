//! Session lifecycle: decides at startup whether the stored session is
//! usable, and drives login, registration and logout.
//!
//! ```text
//!   NoSession ──login──▶ Authenticated
//!   Verifying ──valid admin / unreachable──▶ Authenticated
//!   Verifying ──invalid / non-admin──▶ Rejected ──(token purged)──▶ NoSession
//! ```

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::api::{ApiError, AuthService};
use crate::store::KeyValueStore;

use super::session::{AdminSession, SessionStore, DEFAULT_ADMIN_NAME};
use super::{AuthError, CredentialRecord, LoginForm, RegistrationForm};

const LOGIN_FALLBACK_MESSAGE: &str = "Invalid credentials";
const REGISTER_FALLBACK_MESSAGE: &str = "Registration failed";
const SESSION_NOT_SAVED: &str = "Session could not be saved; you will need to log in again next time";
const CREDENTIALS_NOT_SAVED: &str = "Login details could not be saved";

/// What to do with a stored token when the verification server can't be reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfflinePolicy {
    /// Accept the token and the cached display name
    Trust,
    /// Ask for a fresh login, keeping the token for the next start
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    NoSession,
    Verifying,
    Authenticated(AdminSession),
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Service reported the token invalid
    Invalid,
    /// Token is valid but the account lacks admin privilege
    NotAdmin,
    /// Service answered with a non-success status
    Status(u16),
}

/// Result of checking the stored session at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    NoToken,
    Verified,
    TrustedOffline,
    Rejected(RejectReason),
    /// Service unreachable and the offline policy refused the cached token
    Unreachable,
}

impl RestoreOutcome {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, RestoreOutcome::Verified | RestoreOutcome::TrustedOffline)
    }
}

pub struct SessionManager<A, S> {
    api: A,
    store: SessionStore<S>,
    state: SessionState,
    offline_policy: OfflinePolicy,
    storage_warning: Option<String>,
}

impl<A: AuthService, S: KeyValueStore> SessionManager<A, S> {
    /// Initial state is `Verifying` when a token is stored, else `NoSession`.
    pub fn new(api: A, store: S) -> Self {
        let store = SessionStore::new(store);
        let state = if store.token().is_some() {
            SessionState::Verifying
        } else {
            SessionState::NoSession
        };
        debug!(?state, "Session manager created");
        Self {
            api,
            store,
            state,
            offline_policy: OfflinePolicy::Trust,
            storage_warning: None,
        }
    }

    pub fn with_offline_policy(mut self, policy: OfflinePolicy) -> Self {
        self.offline_policy = policy;
        self
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn session(&self) -> Option<&AdminSession> {
        match &self.state {
            SessionState::Authenticated(session) => Some(session),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session().is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.session().map(|s| s.token.as_str())
    }

    pub fn display_name(&self) -> Option<&str> {
        self.session().map(|s| s.display_name.as_str())
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn store(&self) -> &SessionStore<S> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut SessionStore<S> {
        &mut self.store
    }

    /// The last login's persistence failure, if any. Reading it clears it.
    pub fn take_storage_warning(&mut self) -> Option<String> {
        self.storage_warning.take()
    }

    /// Credentials for prefilling the login form
    pub fn remembered_credentials(&self) -> Option<CredentialRecord> {
        self.store.remembered()
    }

    /// Verify the stored token against the service.
    ///
    /// A rejected session has its token purged and ends in `NoSession`.
    pub async fn restore(&mut self) -> RestoreOutcome {
        if let SessionState::Authenticated(session) = &self.state {
            return if session.trusted_offline {
                RestoreOutcome::TrustedOffline
            } else {
                RestoreOutcome::Verified
            };
        }

        let Some(token) = self.store.token() else {
            self.state = SessionState::NoSession;
            return RestoreOutcome::NoToken;
        };

        self.state = SessionState::Verifying;
        debug!("Verifying stored session");

        match self.api.verify(&token).await {
            Ok(response) if response.valid && response.is_admin => {
                let name = response
                    .name
                    .filter(|n| !n.is_empty())
                    .unwrap_or_else(|| DEFAULT_ADMIN_NAME.to_string());
                if let Err(e) = self.store.set_admin_name(&name) {
                    warn!(error = %e, "Failed to cache admin name");
                }
                info!(admin = %name, "Stored session verified");
                self.state = SessionState::Authenticated(AdminSession::new(token, name));
                RestoreOutcome::Verified
            }
            Ok(response) => {
                let reason = if response.valid {
                    RejectReason::NotAdmin
                } else {
                    RejectReason::Invalid
                };
                self.reject(reason)
            }
            Err(e) if e.is_connectivity() => self.handle_unreachable(token, &e),
            Err(e) => self.reject(RejectReason::Status(e.status().unwrap_or_default())),
        }
    }

    fn handle_unreachable(&mut self, token: String, error: &ApiError) -> RestoreOutcome {
        match self.offline_policy {
            OfflinePolicy::Trust => {
                let name = self.store.admin_name();
                warn!(error = %error, admin = %name, "Verification server unreachable, trusting cached session");
                self.state = SessionState::Authenticated(AdminSession::offline(token, name));
                RestoreOutcome::TrustedOffline
            }
            OfflinePolicy::Reject => {
                warn!(error = %error, "Verification server unreachable, login required");
                self.state = SessionState::NoSession;
                RestoreOutcome::Unreachable
            }
        }
    }

    fn reject(&mut self, reason: RejectReason) -> RestoreOutcome {
        self.state = SessionState::Rejected;
        info!(?reason, "Stored session rejected, purging token");
        if let Err(e) = self.store.clear_token() {
            warn!(error = %e, "Failed to purge rejected token");
        }
        self.state = SessionState::NoSession;
        RestoreOutcome::Rejected(reason)
    }

    /// Log in with the operator's credentials.
    ///
    /// Nothing is persisted unless the account is an admin. The credential
    /// pair is kept only when the form's remember flag is set.
    pub async fn login(&mut self, form: &LoginForm) -> Result<AdminSession, AuthError> {
        form.validate()?;

        let response = self
            .api
            .login(&form.id_number, &form.password)
            .await
            .map_err(|e| map_api_error(e, LOGIN_FALLBACK_MESSAGE))?;

        if !response.is_admin {
            warn!(idno = %form.id_number, "Login refused: account lacks admin privilege");
            return Err(AuthError::PrivilegeDenied);
        }

        let token = response
            .token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AuthError::Connectivity("malformed response: missing token".to_string()))?;
        let name = response
            .name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| DEFAULT_ADMIN_NAME.to_string());

        self.storage_warning = None;
        if let Err(e) = self.store.save_credentials(&form.to_record()) {
            warn!(error = %e, "Failed to save remembered credentials");
            self.storage_warning = Some(CREDENTIALS_NOT_SAVED.to_string());
        }
        if let Err(e) = self.store.set_token(&token) {
            warn!(error = %e, "Failed to persist session token");
            self.storage_warning = Some(SESSION_NOT_SAVED.to_string());
        }
        if let Err(e) = self.store.set_admin_name(&name) {
            warn!(error = %e, "Failed to cache admin name");
        }

        let session = AdminSession::new(token, name);
        self.state = SessionState::Authenticated(session.clone());
        info!(admin = %session.display_name, "Login successful");
        Ok(session)
    }

    /// Create an admin account. Success hands control back to login.
    pub async fn register(&self, form: &RegistrationForm) -> Result<(), AuthError> {
        let request = form.validate()?;
        self.api
            .register(&request)
            .await
            .map_err(|e| map_api_error(e, REGISTER_FALLBACK_MESSAGE))?;
        info!(idno = %request.id_no, "Admin account registered");
        Ok(())
    }

    /// Clear the stored token and return it, so the caller can tell the
    /// service the admin went inactive. Remembered credentials are untouched.
    ///
    /// The manager is signed out even when the purge fails; the error is
    /// still returned so the caller can report it.
    pub fn logout(&mut self) -> Result<Option<String>> {
        let token = self
            .token()
            .map(str::to_string)
            .or_else(|| self.store.token());
        self.state = SessionState::NoSession;
        match self.store.clear_token() {
            Ok(()) => {
                info!("Logged out");
                Ok(token)
            }
            Err(e) => {
                warn!(error = %e, "Logged out, but the stored token could not be removed");
                Err(e)
            }
        }
    }
}

/// Server rejections keep their message; transport failures stay distinct.
pub(crate) fn map_api_error(error: ApiError, fallback: &str) -> AuthError {
    match error {
        ApiError::Rejected { message, .. } => {
            AuthError::Rejected(message.unwrap_or_else(|| fallback.to_string()))
        }
        other => AuthError::Connectivity(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{LoginResponse, VerifyResponse};
    use crate::auth::ValidationError;
    use crate::store::{keys, MemoryStore};
    use crate::testing::FakeAuth;
    use serde_json::json;

    /// Memory store that refuses to write or delete one key
    struct StuckKey {
        inner: MemoryStore,
        key: &'static str,
    }

    impl KeyValueStore for StuckKey {
        fn get(&self, key: &str) -> Option<serde_json::Value> {
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: serde_json::Value) -> Result<()> {
            if key == self.key {
                anyhow::bail!("{} is read-only", key);
            }
            self.inner.set(key, value)
        }

        fn remove(&mut self, key: &str) -> Result<()> {
            if key == self.key {
                anyhow::bail!("{} is read-only", key);
            }
            self.inner.remove(key)
        }
    }

    fn store_with_token(token: &str, cached_name: Option<&str>) -> MemoryStore {
        let mut store = MemoryStore::new();
        store.set(keys::AUTH_TOKEN, json!(token)).unwrap();
        if let Some(name) = cached_name {
            store.set(keys::ADMIN_NAME, json!(name)).unwrap();
        }
        store
    }

    fn verify(valid: bool, is_admin: bool, name: Option<&str>) -> VerifyResponse {
        VerifyResponse {
            valid,
            is_admin,
            name: name.map(str::to_string),
        }
    }

    fn admin_login(token: &str, name: &str) -> LoginResponse {
        LoginResponse {
            token: Some(token.to_string()),
            is_admin: true,
            name: Some(name.to_string()),
        }
    }

    // -------------------------------------------------------------------------
    // Startup verification
    // -------------------------------------------------------------------------

    #[test]
    fn test_initial_state_follows_stored_token() {
        let empty = SessionManager::new(FakeAuth::new(), MemoryStore::new());
        assert_eq!(empty.state(), &SessionState::NoSession);

        let stored = SessionManager::new(FakeAuth::new(), store_with_token("tok", None));
        assert_eq!(stored.state(), &SessionState::Verifying);
    }

    #[tokio::test]
    async fn test_no_token_skips_verification() {
        let mut manager = SessionManager::new(FakeAuth::new(), MemoryStore::new());
        assert_eq!(manager.restore().await, RestoreOutcome::NoToken);
        assert_eq!(manager.api().calls(), 0);
    }

    #[tokio::test]
    async fn test_valid_admin_is_authenticated_with_response_name() {
        let api = FakeAuth::new().with_verify(Ok(verify(true, true, Some("Maria"))));
        let mut manager = SessionManager::new(api, store_with_token("tok", Some("Old")));

        assert_eq!(manager.restore().await, RestoreOutcome::Verified);
        let session = manager.session().unwrap();
        assert_eq!(session.display_name, "Maria");
        assert_eq!(session.token, "tok");
        assert!(!session.trusted_offline);
        assert_eq!(manager.api().last_token().as_deref(), Some("tok"));
    }

    #[tokio::test]
    async fn test_valid_admin_without_name_uses_default_label() {
        let api = FakeAuth::new().with_verify(Ok(verify(true, true, None)));
        let mut manager = SessionManager::new(api, store_with_token("tok", None));

        manager.restore().await;
        assert_eq!(manager.display_name(), Some(DEFAULT_ADMIN_NAME));
    }

    #[tokio::test]
    async fn test_invalid_token_is_purged() {
        let api = FakeAuth::new().with_verify(Ok(verify(false, false, None)));
        let mut manager = SessionManager::new(api, store_with_token("tok", None));

        assert_eq!(
            manager.restore().await,
            RestoreOutcome::Rejected(RejectReason::Invalid)
        );
        assert_eq!(manager.state(), &SessionState::NoSession);
        assert!(manager.store().token().is_none());
    }

    #[tokio::test]
    async fn test_non_admin_token_is_purged() {
        let api = FakeAuth::new().with_verify(Ok(verify(true, false, Some("Student"))));
        let mut manager = SessionManager::new(api, store_with_token("tok", None));

        assert_eq!(
            manager.restore().await,
            RestoreOutcome::Rejected(RejectReason::NotAdmin)
        );
        assert_eq!(manager.state(), &SessionState::NoSession);
        assert!(manager.store().token().is_none());
    }

    #[tokio::test]
    async fn test_error_status_is_purged() {
        let api = FakeAuth::new().with_verify(Err(ApiError::Rejected {
            status: 401,
            message: Some("Token expired".into()),
        }));
        let mut manager = SessionManager::new(api, store_with_token("tok", None));

        assert_eq!(
            manager.restore().await,
            RestoreOutcome::Rejected(RejectReason::Status(401))
        );
        assert!(manager.store().token().is_none());
    }

    #[tokio::test]
    async fn test_unreachable_server_trusts_cached_session() {
        let api = FakeAuth::new().with_verify(Err(ApiError::Network("connection refused".into())));
        let mut manager = SessionManager::new(api, store_with_token("tok", Some("Jane")));

        assert_eq!(manager.restore().await, RestoreOutcome::TrustedOffline);
        let session = manager.session().unwrap();
        assert_eq!(session.display_name, "Jane");
        assert!(session.trusted_offline);
        assert_eq!(manager.store().token().as_deref(), Some("tok"));
    }

    #[tokio::test]
    async fn test_malformed_verification_body_counts_as_unreachable() {
        let api = FakeAuth::new().with_verify(Err(ApiError::InvalidResponse("expected value".into())));
        let mut manager = SessionManager::new(api, store_with_token("tok", None));

        assert_eq!(manager.restore().await, RestoreOutcome::TrustedOffline);
        assert_eq!(manager.display_name(), Some(DEFAULT_ADMIN_NAME));
    }

    #[tokio::test]
    async fn test_reject_policy_keeps_token_but_requires_login() {
        let api = FakeAuth::new().with_verify(Err(ApiError::Network("timed out".into())));
        let mut manager = SessionManager::new(api, store_with_token("tok", Some("Jane")))
            .with_offline_policy(OfflinePolicy::Reject);

        assert_eq!(manager.restore().await, RestoreOutcome::Unreachable);
        assert_eq!(manager.state(), &SessionState::NoSession);
        assert_eq!(manager.store().token().as_deref(), Some("tok"));
    }

    #[tokio::test]
    async fn test_restore_when_authenticated_does_not_call_service() {
        let api = FakeAuth::new()
            .with_login(Ok(admin_login("fresh", "Jane")))
            .with_verify(Ok(verify(false, false, None)));
        let mut manager = SessionManager::new(api, MemoryStore::new());
        manager.login(&LoginForm::new("2021-0001", "pw", false)).await.unwrap();

        assert_eq!(manager.restore().await, RestoreOutcome::Verified);
        assert_eq!(manager.api().calls(), 1);
    }

    // -------------------------------------------------------------------------
    // Login
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_login_empty_password_never_calls_service() {
        let mut manager = SessionManager::new(FakeAuth::new(), MemoryStore::new());
        let err = manager
            .login(&LoginForm::new("2021-0001", "", true))
            .await
            .unwrap_err();

        assert_eq!(err, AuthError::Validation(ValidationError::MissingCredentials));
        assert_eq!(manager.api().calls(), 0);
    }

    #[tokio::test]
    async fn test_login_success_persists_token_and_name() {
        let api = FakeAuth::new().with_login(Ok(admin_login("tok-1", "Jane")));
        let mut manager = SessionManager::new(api, MemoryStore::new());

        let session = manager
            .login(&LoginForm::new("2021-0001", "pw", false))
            .await
            .unwrap();

        assert_eq!(session.display_name, "Jane");
        assert!(manager.is_authenticated());
        assert_eq!(manager.store().token().as_deref(), Some("tok-1"));
        assert_eq!(manager.store().admin_name(), "Jane");
    }

    #[tokio::test]
    async fn test_login_non_admin_persists_nothing() {
        let api = FakeAuth::new().with_login(Ok(LoginResponse {
            token: Some("student-token".into()),
            is_admin: false,
            name: Some("Student".into()),
        }));
        let mut manager = SessionManager::new(api, MemoryStore::new());

        let err = manager
            .login(&LoginForm::new("2021-0001", "pw", true))
            .await
            .unwrap_err();

        assert_eq!(err, AuthError::PrivilegeDenied);
        assert!(manager.store().token().is_none());
        assert!(manager.remembered_credentials().is_none());
        assert_eq!(manager.state(), &SessionState::NoSession);
    }

    #[tokio::test]
    async fn test_login_remember_unchecked_keeps_no_credentials() {
        let mut store = MemoryStore::new();
        store.set(keys::REMEMBER_ME, json!(true)).unwrap();
        store.set(keys::ID_NUMBER, json!("old-id")).unwrap();
        store.set(keys::PASSWORD, json!("old-pw")).unwrap();
        let api = FakeAuth::new().with_login(Ok(admin_login("tok", "Jane")));
        let mut manager = SessionManager::new(api, store);

        manager
            .login(&LoginForm::new("2021-0001", "pw", false))
            .await
            .unwrap();

        assert!(manager.remembered_credentials().is_none());
        assert!(!manager.store().inner().contains(keys::ID_NUMBER));
        assert!(!manager.store().inner().contains(keys::PASSWORD));
    }

    #[tokio::test]
    async fn test_login_remember_checked_keeps_credentials() {
        let api = FakeAuth::new().with_login(Ok(admin_login("tok", "Jane")));
        let mut manager = SessionManager::new(api, MemoryStore::new());

        manager
            .login(&LoginForm::new("2021-0001", "pw", true))
            .await
            .unwrap();

        let record = manager.remembered_credentials().unwrap();
        assert_eq!(record.id_number, "2021-0001");
        assert_eq!(record.password, "pw");
        assert_eq!(manager.store().inner().get_string(keys::PASSWORD).as_deref(), Some("pw"));
    }

    #[tokio::test]
    async fn test_login_rejection_uses_server_message() {
        let api = FakeAuth::new().with_login(Err(ApiError::Rejected {
            status: 401,
            message: Some("Wrong password".into()),
        }));
        let mut manager = SessionManager::new(api, MemoryStore::new());

        let err = manager
            .login(&LoginForm::new("2021-0001", "pw", false))
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::Rejected("Wrong password".into()));
    }

    #[tokio::test]
    async fn test_login_rejection_without_message_is_generic() {
        let api = FakeAuth::new().with_login(Err(ApiError::Rejected {
            status: 401,
            message: None,
        }));
        let mut manager = SessionManager::new(api, MemoryStore::new());

        let err = manager
            .login(&LoginForm::new("2021-0001", "pw", false))
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::Rejected(LOGIN_FALLBACK_MESSAGE.into()));
    }

    #[tokio::test]
    async fn test_login_network_failure_is_connectivity_error() {
        let api = FakeAuth::new().with_login(Err(ApiError::Network("connection refused".into())));
        let mut manager = SessionManager::new(api, MemoryStore::new());

        let err = manager
            .login(&LoginForm::new("2021-0001", "pw", false))
            .await
            .unwrap_err();
        match err {
            AuthError::Connectivity(detail) => assert!(detail.contains("connection refused")),
            other => panic!("expected connectivity error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_login_without_token_is_not_persisted() {
        let api = FakeAuth::new().with_login(Ok(LoginResponse {
            token: None,
            is_admin: true,
            name: Some("Jane".into()),
        }));
        let mut manager = SessionManager::new(api, MemoryStore::new());

        let err = manager
            .login(&LoginForm::new("2021-0001", "pw", true))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Connectivity(_)));
        assert!(manager.store().token().is_none());
        assert!(manager.remembered_credentials().is_none());
    }

    // -------------------------------------------------------------------------
    // Registration
    // -------------------------------------------------------------------------

    fn registration(password: &str, confirm: &str) -> RegistrationForm {
        RegistrationForm {
            full_name: "Jane Cruz".into(),
            id_number: "2021-0001".into(),
            email: "jane@aisat.edu.ph".into(),
            contact_number: "09171234567".into(),
            password: password.into(),
            confirm_password: confirm.into(),
        }
    }

    #[tokio::test]
    async fn test_register_mismatch_never_calls_service() {
        let manager = SessionManager::new(FakeAuth::new(), MemoryStore::new());
        let err = manager.register(&registration("a", "b")).await.unwrap_err();

        assert_eq!(err, AuthError::Validation(ValidationError::PasswordMismatch));
        assert_eq!(manager.api().calls(), 0);
    }

    #[tokio::test]
    async fn test_register_success() {
        let manager = SessionManager::new(FakeAuth::new().with_register(Ok(())), MemoryStore::new());
        manager.register(&registration("pw", "pw")).await.unwrap();
        assert_eq!(manager.api().calls(), 1);
        assert!(!manager.is_authenticated());
    }

    #[tokio::test]
    async fn test_register_server_error_verbatim_or_generic() {
        let api = FakeAuth::new().with_register(Err(ApiError::Rejected {
            status: 409,
            message: Some("ID number already exists".into()),
        }));
        let manager = SessionManager::new(api, MemoryStore::new());
        let err = manager.register(&registration("pw", "pw")).await.unwrap_err();
        assert_eq!(err, AuthError::Rejected("ID number already exists".into()));

        let api = FakeAuth::new().with_register(Err(ApiError::Rejected {
            status: 500,
            message: None,
        }));
        let manager = SessionManager::new(api, MemoryStore::new());
        let err = manager.register(&registration("pw", "pw")).await.unwrap_err();
        assert_eq!(err, AuthError::Rejected(REGISTER_FALLBACK_MESSAGE.into()));
    }

    // -------------------------------------------------------------------------
    // Logout
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_logout_clears_token_only() {
        let api = FakeAuth::new().with_login(Ok(admin_login("tok", "Jane")));
        let mut manager = SessionManager::new(api, MemoryStore::new());
        manager
            .login(&LoginForm::new("2021-0001", "pw", true))
            .await
            .unwrap();

        let token = manager.logout().unwrap();

        assert_eq!(token.as_deref(), Some("tok"));
        assert_eq!(manager.state(), &SessionState::NoSession);
        assert!(manager.store().token().is_none());
        assert!(manager.remembered_credentials().is_some());
    }

    #[tokio::test]
    async fn test_logout_signs_out_even_if_token_cannot_be_removed() {
        let api = FakeAuth::new().with_login(Ok(admin_login("tok", "Jane")));
        let store = StuckKey {
            inner: store_with_token("old", None),
            key: keys::AUTH_TOKEN,
        };
        let mut manager = SessionManager::new(api, store);
        manager
            .login(&LoginForm::new("2021-0001", "pw", false))
            .await
            .unwrap();
        assert!(manager.is_authenticated());

        assert!(manager.logout().is_err());
        assert_eq!(manager.state(), &SessionState::NoSession);
        assert!(!manager.is_authenticated());
        assert!(manager.token().is_none());
    }

    // -------------------------------------------------------------------------
    // Storage failures during login
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_login_reports_unsaved_token_but_still_signs_in() {
        let api = FakeAuth::new().with_login(Ok(admin_login("tok", "Jane")));
        let store = StuckKey {
            inner: MemoryStore::new(),
            key: keys::AUTH_TOKEN,
        };
        let mut manager = SessionManager::new(api, store);

        let session = manager
            .login(&LoginForm::new("2021-0001", "pw", true))
            .await
            .unwrap();

        assert_eq!(session.token, "tok");
        assert!(manager.is_authenticated());
        assert_eq!(manager.take_storage_warning().as_deref(), Some(SESSION_NOT_SAVED));
        assert!(manager.take_storage_warning().is_none());
    }

    #[tokio::test]
    async fn test_clean_login_has_no_storage_warning() {
        let api = FakeAuth::new().with_login(Ok(admin_login("tok", "Jane")));
        let mut manager = SessionManager::new(api, MemoryStore::new());
        manager
            .login(&LoginForm::new("2021-0001", "pw", true))
            .await
            .unwrap();
        assert!(manager.take_storage_warning().is_none());
    }
}
