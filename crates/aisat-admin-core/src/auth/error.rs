use thiserror::Error;

/// Input problems caught before any network call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter both ID number and password.")]
    MissingCredentials,

    #[error("Please fill in all required fields.")]
    MissingFields,

    #[error("Passwords do not match.")]
    PasswordMismatch,

    #[error("Level must be either 'College' or 'SHS'.")]
    InvalidLevel,
}

/// Failures surfaced to the operator by login, registration and admin actions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Credentials were accepted but the account is not an admin
    #[error("You do not have admin privileges.")]
    PrivilegeDenied,

    /// The server refused the request; the message is shown verbatim
    #[error("{0}")]
    Rejected(String),

    /// The bearer token is missing or no longer accepted
    #[error("Your session has expired. Please log in again.")]
    SessionExpired,

    #[error("Could not connect to server: {0}")]
    Connectivity(String),
}

impl AuthError {
    /// Short heading for dialogs and status lines
    pub fn title(&self) -> &'static str {
        match self {
            AuthError::Validation(_) => "Input Error",
            AuthError::PrivilegeDenied => "Access Denied",
            AuthError::Rejected(_) => "Request Failed",
            AuthError::SessionExpired => "Authentication Error",
            AuthError::Connectivity(_) => "Connection Error",
        }
    }
}
