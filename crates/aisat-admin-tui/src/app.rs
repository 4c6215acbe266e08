//! Application state management for the admin console.
//!
//! This module contains the core `App` struct that owns the session manager,
//! the panel registry and all overlay form state, and runs the operator
//! actions (login, registration, user creation, logout) against the service.

use std::io;
use std::time::Duration;

use anyhow::Result;
use tracing::{debug, error, info, warn};

use aisat_admin_core::api::{ApiClient, PresenceService};
use aisat_admin_core::auth::{
    AuthError, LoginForm, RegistrationForm, RestoreOutcome, SessionManager,
};
use aisat_admin_core::config::Config;
use aisat_admin_core::panels::{Panel, PanelRegistry};
use aisat_admin_core::presence::{self, PresenceReport};
use aisat_admin_core::store::{JsonFileStore, KeyValueStore, KeyringStore, SecureStore};
use aisat_admin_core::theme::Theme;
use aisat_admin_core::users::{self, NewUserForm, UserLevel};

// ============================================================================
// Constants
// ============================================================================

/// Maximum length for ID number input.
const MAX_ID_LENGTH: usize = 50;

/// Maximum length for every other text field (names, emails, passwords).
const MAX_FIELD_LENGTH: usize = 128;

/// Wait on the exit presence report when no config is at hand
const DEFAULT_EXIT_TIMEOUT: Duration = Duration::from_secs(10);

/// Runtime-selected settings backend
pub type Store = Box<dyn KeyValueStore>;

pub type Sessions = SessionManager<ApiClient, Store>;

/// Hands a page URL to whatever displays it
pub type Launcher = fn(&str) -> io::Result<()>;

// ============================================================================
// UI State Types
// ============================================================================

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    LoggingIn,
    Registering,
    AddingUser,
    ShowingHelp,
    ConfirmingLogout,
    ConfirmingQuit,
    Quitting,
}

/// Login form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFocus {
    IdNumber,
    Password,
    Remember,
    Button,
    Register,
}

impl LoginFocus {
    pub fn next(&self) -> Self {
        match self {
            LoginFocus::IdNumber => LoginFocus::Password,
            LoginFocus::Password => LoginFocus::Remember,
            LoginFocus::Remember => LoginFocus::Button,
            LoginFocus::Button => LoginFocus::Register,
            LoginFocus::Register => LoginFocus::IdNumber,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            LoginFocus::IdNumber => LoginFocus::Register,
            LoginFocus::Password => LoginFocus::IdNumber,
            LoginFocus::Remember => LoginFocus::Password,
            LoginFocus::Button => LoginFocus::Remember,
            LoginFocus::Register => LoginFocus::Button,
        }
    }
}

/// Registration form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterFocus {
    FullName,
    IdNumber,
    Email,
    Contact,
    Password,
    ConfirmPassword,
    Button,
}

impl RegisterFocus {
    pub const ORDER: [RegisterFocus; 7] = [
        RegisterFocus::FullName,
        RegisterFocus::IdNumber,
        RegisterFocus::Email,
        RegisterFocus::Contact,
        RegisterFocus::Password,
        RegisterFocus::ConfirmPassword,
        RegisterFocus::Button,
    ];

    pub fn next(&self) -> Self {
        cycle(&Self::ORDER, *self, 1)
    }

    pub fn prev(&self) -> Self {
        cycle(&Self::ORDER, *self, Self::ORDER.len() - 1)
    }
}

/// Add-user form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddUserFocus {
    IdNumber,
    Name,
    Email,
    Level,
    Contact,
    Password,
    Button,
}

impl AddUserFocus {
    pub const ORDER: [AddUserFocus; 7] = [
        AddUserFocus::IdNumber,
        AddUserFocus::Name,
        AddUserFocus::Email,
        AddUserFocus::Level,
        AddUserFocus::Contact,
        AddUserFocus::Password,
        AddUserFocus::Button,
    ];

    pub fn next(&self) -> Self {
        cycle(&Self::ORDER, *self, 1)
    }

    pub fn prev(&self) -> Self {
        cycle(&Self::ORDER, *self, Self::ORDER.len() - 1)
    }
}

fn cycle<T: Copy + PartialEq>(order: &[T], current: T, step: usize) -> T {
    let index = order.iter().position(|f| *f == current).unwrap_or(0);
    order[(index + step) % order.len()]
}

/// Sidebar entries: every panel, then the add-user action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    Panel(Panel),
    AddUser,
}

impl MenuItem {
    pub const COUNT: usize = Panel::ALL.len() + 1;

    pub fn at(index: usize) -> Self {
        Panel::ALL
            .get(index)
            .copied()
            .map(MenuItem::Panel)
            .unwrap_or(MenuItem::AddUser)
    }

    pub fn title(&self) -> &'static str {
        match self {
            MenuItem::Panel(panel) => panel.title(),
            MenuItem::AddUser => "Add User",
        }
    }
}

// ============================================================================
// Main Application Struct
// ============================================================================

/// Main application state container
pub struct App {
    // Core services
    pub api: ApiClient,
    pub sessions: Sessions,
    pub panels: PanelRegistry,

    // UI State
    pub state: AppState,
    pub theme: Theme,
    pub menu_selection: usize,
    /// Panel shown in the content pane
    pub active_panel: Option<Panel>,

    // Login form state
    pub login: LoginForm,
    pub login_focus: LoginFocus,
    pub login_error: Option<String>,
    pub login_notice: Option<String>,

    // Registration form state
    pub registration: RegistrationForm,
    pub register_focus: RegisterFocus,
    pub register_error: Option<String>,

    // Add-user form state
    pub new_user: NewUserForm,
    pub add_user_focus: AddUserFocus,
    pub add_user_error: Option<String>,

    // Status message
    pub status_message: Option<String>,

    /// Opens panel pages outside the terminal
    pub launcher: Launcher,
    /// Longest wait for the inactive report on quit
    pub exit_timeout: Duration,
}

impl App {
    /// Create a new application instance
    pub fn new(config: &Config) -> Result<Self> {
        debug!(base_url = %config.api_base_url, "App::new() starting");
        let api = ApiClient::from_config(config)?;
        let store = open_store(config)?;
        let sessions = SessionManager::new(api.clone(), store)
            .with_offline_policy(config.offline_policy());
        let panels = PanelRegistry::new(&config.pages_dir, api.base_url())?;
        let theme = sessions.store().theme();
        debug!(pages_dir = ?panels.pages_dir(), theme = theme.as_str(), "Panels configured");

        let mut app = Self::with_parts(api, sessions, panels, theme);
        app.exit_timeout = config.admin_timeout();
        Ok(app)
    }

    fn with_parts(
        api: ApiClient,
        sessions: Sessions,
        panels: PanelRegistry,
        theme: Theme,
    ) -> Self {
        Self {
            api,
            sessions,
            panels,

            state: AppState::LoggingIn,
            theme,
            menu_selection: 0,
            active_panel: None,

            login: LoginForm::default(),
            login_focus: LoginFocus::IdNumber,
            login_error: None,
            login_notice: None,

            registration: RegistrationForm::default(),
            register_focus: RegisterFocus::FullName,
            register_error: None,

            new_user: NewUserForm::default(),
            add_user_focus: AddUserFocus::IdNumber,
            add_user_error: None,

            status_message: None,

            launcher: open_in_browser,
            exit_timeout: DEFAULT_EXIT_TIMEOUT,
        }
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    pub fn is_authenticated(&self) -> bool {
        self.sessions.is_authenticated()
    }

    /// Check the stored session and either enter the console or show login.
    pub async fn restore_session(&mut self) -> RestoreOutcome {
        let outcome = self.sessions.restore().await;
        info!(?outcome, "Startup session check finished");
        match outcome {
            RestoreOutcome::Verified | RestoreOutcome::TrustedOffline => {
                if outcome == RestoreOutcome::TrustedOffline {
                    self.status_message =
                        Some("Server unreachable - using cached session".to_string());
                }
                self.enter_console();
            }
            RestoreOutcome::Rejected(_) => {
                self.start_login();
                self.login_notice =
                    Some("Your previous session is no longer valid.".to_string());
            }
            RestoreOutcome::Unreachable => {
                self.start_login();
                self.login_notice = Some("Could not reach the server.".to_string());
            }
            RestoreOutcome::NoToken => self.start_login(),
        }
        outcome
    }

    /// Show the login overlay, prefilled from remembered credentials
    pub fn start_login(&mut self) {
        self.state = AppState::LoggingIn;
        self.login = self
            .sessions
            .remembered_credentials()
            .map(LoginForm::from)
            .unwrap_or_default();
        self.login_focus = if self.login.id_number.is_empty() {
            LoginFocus::IdNumber
        } else {
            LoginFocus::Password
        };
        self.login_error = None;
        self.login_notice = None;
    }

    /// Attempt login with the credentials from the login form
    pub async fn attempt_login(&mut self) {
        self.login_error = None;
        self.login_notice = None;

        match self.sessions.login(&self.login).await {
            Ok(session) => {
                info!(admin = %session.display_name, "Operator signed in");
                self.login.password.clear();
                self.status_message = self.sessions.take_storage_warning();
                self.enter_console();
            }
            Err(e) => {
                error!(error = %e, "Login failed");
                self.login_error = Some(describe_error(&e));
            }
        }
    }

    pub fn start_registration(&mut self) {
        self.state = AppState::Registering;
        self.registration = RegistrationForm::default();
        self.register_focus = RegisterFocus::FullName;
        self.register_error = None;
    }

    /// Submit the registration form; success returns to login
    pub async fn attempt_registration(&mut self) {
        self.register_error = None;
        match self.sessions.register(&self.registration).await {
            Ok(()) => {
                let id_number = self.registration.id_number.clone();
                self.start_login();
                self.login.id_number = id_number;
                self.login.password.clear();
                self.login_focus = LoginFocus::Password;
                self.login_notice =
                    Some("Registration successful. You can now log in.".to_string());
            }
            Err(e) => {
                error!(error = %e, "Registration failed");
                self.register_error = Some(describe_error(&e));
            }
        }
    }

    fn enter_console(&mut self) {
        self.state = AppState::Normal;
        self.theme = self.sessions.store().theme();
        self.panels.set_theme(self.theme);
        if let Some(token) = self.sessions.token().map(str::to_string) {
            let api = self.api.clone();
            tokio::spawn(async move {
                presence::mark_active(&api, &token).await;
            });
        }
    }

    /// Log out, tell the service in the background, and return to login.
    pub fn logout(&mut self) {
        let signed_in = self.sessions.token().map(str::to_string);
        let token = match self.sessions.logout() {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "Failed to clear stored session");
                signed_in
            }
        };
        if let Some(token) = token {
            let api = self.api.clone();
            tokio::spawn(async move {
                presence::mark_inactive(&api, &token).await;
            });
        }
        self.panels.clear();
        self.active_panel = None;
        self.menu_selection = 0;
        self.status_message = None;
        self.start_login();
    }

    /// Report the admin inactive before the process exits, giving up
    /// after `exit_timeout` so a dead server can't hold the quit.
    pub async fn shutdown(&mut self) {
        if let Some(token) = self.sessions.token().map(str::to_string) {
            match report_exit(&self.api, &token, self.exit_timeout).await {
                Some(report) => debug!(?report, "Presence updated on exit"),
                None => warn!(
                    timeout_secs = self.exit_timeout.as_secs_f32(),
                    "Presence update on exit timed out"
                ),
            }
        }
    }

    // =========================================================================
    // Console
    // =========================================================================

    pub fn selected_item(&self) -> MenuItem {
        MenuItem::at(self.menu_selection)
    }

    pub fn select_next(&mut self) {
        self.menu_selection = (self.menu_selection + 1) % MenuItem::COUNT;
    }

    pub fn select_prev(&mut self) {
        self.menu_selection = (self.menu_selection + MenuItem::COUNT - 1) % MenuItem::COUNT;
    }

    /// Open the selected sidebar entry.
    pub fn open_selected(&mut self) {
        match self.selected_item() {
            MenuItem::Panel(panel) => self.open_panel(panel),
            MenuItem::AddUser => self.start_add_user(),
        }
    }

    pub fn open_panel(&mut self, panel: Panel) {
        let Some(token) = self.sessions.token().map(str::to_string) else {
            warn!("Panel requested without a session");
            self.logout();
            return;
        };
        let page_exists = self.panels.open(panel, &token, self.theme).page_exists();
        self.active_panel = Some(panel);
        if page_exists {
            self.launch_active_panel();
        } else {
            warn!(page = panel.page(), "Panel page not found");
            self.status_message = Some(format!("Page not found: {}", panel.page()));
        }
    }

    /// Open the shown panel's page, with the session in its launch URL.
    pub fn launch_active_panel(&mut self) {
        let Some(handle) = self.active_panel.and_then(|p| self.panels.get(p)) else {
            return;
        };
        let title = handle.panel.title();
        let result = handle
            .launch_url()
            .and_then(|url| (self.launcher)(url.as_str()).map_err(anyhow::Error::from));
        self.status_message = Some(match result {
            Ok(()) => {
                info!(panel = title, "Panel page launched");
                format!("Opened {} in the browser", title)
            }
            Err(e) => {
                warn!(panel = title, error = %e, "Failed to launch panel page");
                format!("Could not open {}: {}", title, e)
            }
        });
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggle();
        if let Err(e) = self.sessions.store_mut().set_theme(self.theme) {
            warn!(error = %e, "Failed to save theme");
        }
        self.panels.set_theme(self.theme);
        self.status_message = Some(format!("{} theme", self.theme.label()));
    }

    pub fn start_add_user(&mut self) {
        self.state = AppState::AddingUser;
        self.new_user = NewUserForm::default();
        self.add_user_focus = AddUserFocus::IdNumber;
        self.add_user_error = None;
    }

    pub fn cycle_new_user_level(&mut self) {
        let level = UserLevel::parse(&self.new_user.level).unwrap_or_default();
        self.new_user.level = level.next().as_str().to_string();
    }

    /// Submit the add-user form. An expired session logs the operator out.
    pub async fn attempt_add_user(&mut self) {
        self.add_user_error = None;
        let token = self.sessions.token().map(str::to_string);
        match users::create_user(&self.api, token.as_deref(), &self.new_user).await {
            Ok(()) => {
                self.status_message =
                    Some(format!("User {} registered successfully!", self.new_user.name));
                self.new_user = NewUserForm::default();
                self.state = AppState::Normal;
            }
            Err(AuthError::SessionExpired) => {
                self.logout();
                self.login_error = Some(AuthError::SessionExpired.to_string());
            }
            Err(e) => {
                self.add_user_error = Some(describe_error(&e));
            }
        }
    }

    /// Text field under the cursor, with its length limit
    pub fn focused_field(&mut self) -> Option<(&mut String, usize)> {
        match self.state {
            AppState::LoggingIn => match self.login_focus {
                LoginFocus::IdNumber => Some((&mut self.login.id_number, MAX_ID_LENGTH)),
                LoginFocus::Password => Some((&mut self.login.password, MAX_FIELD_LENGTH)),
                _ => None,
            },
            AppState::Registering => {
                let form = &mut self.registration;
                match self.register_focus {
                    RegisterFocus::FullName => Some((&mut form.full_name, MAX_FIELD_LENGTH)),
                    RegisterFocus::IdNumber => Some((&mut form.id_number, MAX_ID_LENGTH)),
                    RegisterFocus::Email => Some((&mut form.email, MAX_FIELD_LENGTH)),
                    RegisterFocus::Contact => Some((&mut form.contact_number, MAX_FIELD_LENGTH)),
                    RegisterFocus::Password => Some((&mut form.password, MAX_FIELD_LENGTH)),
                    RegisterFocus::ConfirmPassword => {
                        Some((&mut form.confirm_password, MAX_FIELD_LENGTH))
                    }
                    RegisterFocus::Button => None,
                }
            }
            AppState::AddingUser => {
                let form = &mut self.new_user;
                match self.add_user_focus {
                    AddUserFocus::IdNumber => Some((&mut form.id_number, MAX_ID_LENGTH)),
                    AddUserFocus::Name => Some((&mut form.name, MAX_FIELD_LENGTH)),
                    AddUserFocus::Email => Some((&mut form.email, MAX_FIELD_LENGTH)),
                    AddUserFocus::Contact => Some((&mut form.contact, MAX_FIELD_LENGTH)),
                    AddUserFocus::Password => Some((&mut form.password, MAX_FIELD_LENGTH)),
                    AddUserFocus::Level | AddUserFocus::Button => None,
                }
            }
            _ => None,
        }
    }

    pub fn display_name(&self) -> &str {
        self.sessions.display_name().unwrap_or_default()
    }

    pub fn is_offline_session(&self) -> bool {
        self.sessions.session().is_some_and(|s| s.trusted_offline)
    }
}

/// Pick the settings backend the config asks for
fn open_store(config: &Config) -> Result<Store> {
    let file = JsonFileStore::open(config.settings_path()?)?;
    if config.secure_storage {
        Ok(Box::new(SecureStore::new(file, KeyringStore::new())))
    } else {
        Ok(Box::new(file))
    }
}

fn open_in_browser(url: &str) -> io::Result<()> {
    open::that_detached(url)
}

/// Inactive report bounded by `limit`; `None` when it ran out of time
async fn report_exit<P: PresenceService + ?Sized>(
    service: &P,
    token: &str,
    limit: Duration,
) -> Option<PresenceReport> {
    tokio::time::timeout(limit, presence::mark_inactive(service, token))
        .await
        .ok()
}

/// Operator-facing text for a failed action
pub fn describe_error(error: &AuthError) -> String {
    match error {
        AuthError::Validation(_) | AuthError::PrivilegeDenied | AuthError::SessionExpired => {
            error.to_string()
        }
        _ => format!("{}: {}", error.title(), error),
    }
}

// ============================================================================
// Input validation helpers (exported for use in input.rs)
// ============================================================================

/// Check if a character is valid for input (no control characters)
fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

/// Check if a character may be appended to a field of the given limit
pub fn can_add_char(current_len: usize, limit: usize, c: char) -> bool {
    current_len < limit && is_valid_input_char(c)
}

// ============================================================================
// Tests
// ============================================================================
