//! Creating regular user accounts from the admin console.

use tracing::{error, info};

use crate::api::{ApiError, NewUserRequest, UserService};
use crate::auth::{AuthError, ValidationError};

const CREATE_FALLBACK_MESSAGE: &str = "An unknown error occurred.";

/// Academic level of a new user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UserLevel {
    #[default]
    College,
    Shs,
}

impl UserLevel {
    /// Exact match on the wire names
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "College" => Some(UserLevel::College),
            "SHS" => Some(UserLevel::Shs),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserLevel::College => "College",
            UserLevel::Shs => "SHS",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            UserLevel::College => UserLevel::Shs,
            UserLevel::Shs => UserLevel::College,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserForm {
    pub id_number: String,
    pub name: String,
    pub email: String,
    pub level: String,
    pub contact: String,
    pub password: String,
}

impl Default for NewUserForm {
    fn default() -> Self {
        Self {
            id_number: String::new(),
            name: String::new(),
            email: String::new(),
            level: UserLevel::default().as_str().to_string(),
            contact: String::new(),
            password: String::new(),
        }
    }
}

impl NewUserForm {
    pub fn validate(&self) -> Result<NewUserRequest, ValidationError> {
        let fields = [
            &self.id_number,
            &self.name,
            &self.email,
            &self.level,
            &self.contact,
            &self.password,
        ];
        if fields.iter().any(|f| f.is_empty()) {
            return Err(ValidationError::MissingFields);
        }
        let level = UserLevel::parse(&self.level).ok_or(ValidationError::InvalidLevel)?;
        Ok(NewUserRequest {
            idno: self.id_number.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            level: level.as_str().to_string(),
            cell: self.contact.clone(),
            password: self.password.clone(),
        })
    }
}

/// Validate and submit a new user.
///
/// `AuthError::SessionExpired` means the caller must log the admin out.
pub async fn create_user<U: UserService + ?Sized>(
    service: &U,
    token: Option<&str>,
    form: &NewUserForm,
) -> Result<(), AuthError> {
    let request = form.validate()?;
    let token = token
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::SessionExpired)?;

    match service.create_public_user(token, &request).await {
        Ok(()) => {
            info!(idno = %request.idno, "User registered");
            Ok(())
        }
        Err(e) if e.is_unauthorized() => {
            error!("User creation refused: session expired");
            Err(AuthError::SessionExpired)
        }
        Err(ApiError::Rejected { message, .. }) => {
            let message = message.unwrap_or_else(|| CREATE_FALLBACK_MESSAGE.to_string());
            error!(error = %message, "User creation failed");
            Err(AuthError::Rejected(message))
        }
        Err(e) => {
            error!(error = %e, "User creation failed");
            Err(AuthError::Connectivity(e.to_string()))
        }
    }
}
