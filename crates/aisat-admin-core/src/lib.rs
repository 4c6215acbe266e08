//! Session and service layer for the AISAT registration admin console.
//!
//! The front end (terminal UI) owns presentation only; everything that
//! touches the registration service or persisted state lives here.

pub mod api;
pub mod auth;
pub mod config;
pub mod panels;
pub mod presence;
pub mod store;
pub mod theme;
pub mod users;

pub use api::{ApiClient, ApiError, AuthService, PresenceService, UserService};
pub use auth::{
    AdminSession, AuthError, LoginForm, OfflinePolicy, RegistrationForm, RestoreOutcome,
    SessionManager, SessionState, ValidationError,
};
pub use config::Config;
pub use panels::{Panel, PanelHandle, PanelRegistry};
pub use presence::PresenceReport;
pub use store::KeyValueStore;
pub use theme::Theme;
pub use users::{NewUserForm, UserLevel};
