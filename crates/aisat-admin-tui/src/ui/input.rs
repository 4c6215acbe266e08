//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{can_add_char, AddUserFocus, App, AppState, LoginFocus, RegisterFocus};

/// Handle keyboard input. Returns true if the app should quit.
pub async fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match app.state {
        AppState::LoggingIn => return handle_login_input(app, key).await,
        AppState::Registering => {
            handle_register_input(app, key).await;
            return Ok(false);
        }
        AppState::AddingUser => {
            handle_add_user_input(app, key).await;
            return Ok(false);
        }
        AppState::ShowingHelp => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                app.state = AppState::Normal;
            }
            return Ok(false);
        }
        AppState::ConfirmingLogout => {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => app.logout(),
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    app.state = AppState::Normal;
                }
                _ => {}
            }
            return Ok(false);
        }
        AppState::ConfirmingQuit => {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    app.state = AppState::Quitting;
                    return Ok(true);
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    app.state = AppState::Normal;
                }
                _ => {}
            }
            return Ok(false);
        }
        AppState::Quitting => return Ok(true),
        AppState::Normal => {}
    }

    // Console keys
    match key.code {
        KeyCode::Char('q') => app.state = AppState::ConfirmingQuit,
        KeyCode::Char('l') => app.state = AppState::ConfirmingLogout,
        KeyCode::Char('?') => app.state = AppState::ShowingHelp,
        KeyCode::Char('t') => app.toggle_theme(),
        KeyCode::Char('a') => app.start_add_user(),
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Enter => app.open_selected(),
        KeyCode::Char('o') => app.launch_active_panel(),
        KeyCode::Esc => app.active_panel = None,
        _ => {}
    }
    Ok(false)
}

/// Append or delete a character in the focused text field
fn edit_focused_field(app: &mut App, code: KeyCode) {
    let Some((field, limit)) = app.focused_field() else {
        return;
    };
    match code {
        KeyCode::Backspace => {
            field.pop();
        }
        KeyCode::Char(c) => {
            if can_add_char(field.chars().count(), limit, c) {
                field.push(c);
            }
        }
        _ => {}
    }
}

async fn handle_login_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => {
            // Cancelled login ends the program
            app.state = AppState::Quitting;
            return Ok(true);
        }
        KeyCode::Down | KeyCode::Tab => app.login_focus = app.login_focus.next(),
        KeyCode::Up | KeyCode::BackTab => app.login_focus = app.login_focus.prev(),
        KeyCode::Enter => match app.login_focus {
            LoginFocus::IdNumber | LoginFocus::Password => {
                if app.login.id_number.is_empty() || app.login.password.is_empty() {
                    app.login_focus = app.login_focus.next();
                } else {
                    app.attempt_login().await;
                }
            }
            LoginFocus::Remember => app.login.remember = !app.login.remember,
            LoginFocus::Button => app.attempt_login().await,
            LoginFocus::Register => app.start_registration(),
        },
        KeyCode::Char(' ') if app.login_focus == LoginFocus::Remember => {
            app.login.remember = !app.login.remember;
        }
        code @ (KeyCode::Backspace | KeyCode::Char(_)) => edit_focused_field(app, code),
        _ => {}
    }
    Ok(false)
}

async fn handle_register_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.start_login(),
        KeyCode::Down | KeyCode::Tab => app.register_focus = app.register_focus.next(),
        KeyCode::Up | KeyCode::BackTab => app.register_focus = app.register_focus.prev(),
        KeyCode::Enter => match app.register_focus {
            RegisterFocus::Button => app.attempt_registration().await,
            _ => app.register_focus = app.register_focus.next(),
        },
        code @ (KeyCode::Backspace | KeyCode::Char(_)) => edit_focused_field(app, code),
        _ => {}
    }
}

async fn handle_add_user_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.state = AppState::Normal,
        KeyCode::Down | KeyCode::Tab => app.add_user_focus = app.add_user_focus.next(),
        KeyCode::Up | KeyCode::BackTab => app.add_user_focus = app.add_user_focus.prev(),
        KeyCode::Enter => match app.add_user_focus {
            AddUserFocus::Button => app.attempt_add_user().await,
            AddUserFocus::Level => app.cycle_new_user_level(),
            _ => app.add_user_focus = app.add_user_focus.next(),
        },
        KeyCode::Left | KeyCode::Right | KeyCode::Char(' ')
            if app.add_user_focus == AddUserFocus::Level =>
        {
            app.cycle_new_user_level();
        }
        code @ (KeyCode::Backspace | KeyCode::Char(_)) => edit_focused_field(app, code),
        _ => {}
    }
}
