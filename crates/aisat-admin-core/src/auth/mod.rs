//! Authentication module for managing admin sessions and credentials.
//!
//! This module provides:
//! - `SessionManager`: the startup verification / login / logout state machine
//! - `SessionStore`: typed access to the persisted token, admin name,
//!   remember-me credentials and theme
//! - `LoginForm` / `RegistrationForm`: operator input with local validation
//!
//! Sessions carry no local expiry; only the remote service decides when a
//! token stops being valid.

pub mod credentials;
pub mod error;
pub mod lifecycle;
pub mod session;

pub use credentials::{CredentialRecord, LoginForm, RegistrationForm};
pub use error::{AuthError, ValidationError};
pub use lifecycle::{OfflinePolicy, RejectReason, RestoreOutcome, SessionManager, SessionState};
pub use session::{AdminSession, SessionStore, DEFAULT_ADMIN_NAME};
