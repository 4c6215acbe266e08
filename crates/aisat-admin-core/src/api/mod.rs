//! REST API client module for the AISAT registration service.
//!
//! This module provides the `ApiClient` for the login, registration,
//! verification, user-creation and admin presence endpoints, and the
//! `AuthService` / `PresenceService` traits the session logic is written
//! against.
//!
//! Authenticated calls carry the session's bearer token in the
//! `Authorization` header.

pub mod client;
pub mod error;
pub mod models;
pub mod service;

pub use client::ApiClient;
pub use error::ApiError;
pub use models::{AdminProfile, LoginResponse, NewUserRequest, RegistrationRequest, VerifyResponse};
pub use service::{AuthService, PresenceService, UserService};
