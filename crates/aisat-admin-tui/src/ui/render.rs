use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use aisat_admin_core::theme::Theme;

use crate::app::{AddUserFocus, App, AppState, LoginFocus, MenuItem, RegisterFocus};

use super::styles;

/// Width of the visible part of a form field
const FIELD_WIDTH: usize = 22;

const LOGO: [&str; 2] = ["     AISAT  Registrar", "     Admin Console"];

pub fn render(frame: &mut Frame, app: &App) {
    let theme = app.theme;
    frame.render_widget(Block::default().style(styles::base_style(theme)), frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(10),   // Sidebar + content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(30), Constraint::Min(20)])
        .split(chunks[1]);

    if app.is_authenticated() {
        render_menu(frame, app, body[0]);
        render_content(frame, app, body[1]);
    }
    render_status_bar(frame, app, chunks[2]);

    // Render overlays
    match app.state {
        AppState::ShowingHelp => render_help_overlay(frame, theme),
        AppState::LoggingIn => render_login_overlay(frame, app),
        AppState::Registering => render_register_overlay(frame, app),
        AppState::AddingUser => render_add_user_overlay(frame, app),
        AppState::ConfirmingLogout => render_confirm_overlay(
            frame,
            theme,
            "   Are you sure you want to logout?",
            " to logout, ",
        ),
        AppState::ConfirmingQuit => render_confirm_overlay(
            frame,
            theme,
            "   Are you sure you want to quit?",
            " to quit, ",
        ),
        AppState::Normal | AppState::Quitting => {}
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let theme = app.theme;
    let title = "  AISAT Admin";
    let welcome = if app.is_authenticated() {
        let marker = if app.is_offline_session() { " (offline)" } else { "" };
        format!("Welcome, {}{}", app.display_name(), marker)
    } else {
        String::new()
    };
    let help_hint = "[?] Help";
    let used = title.len() + welcome.chars().count() + help_hint.len() + 6;
    let padding = (area.width as usize).saturating_sub(used) / 2;

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style(theme)),
        Span::raw(" ".repeat(padding)),
        Span::styled(welcome, styles::highlight_style(theme)),
        Span::raw(" ".repeat(padding)),
        Span::styled(help_hint, styles::muted_style(theme)),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style(theme));

    frame.render_widget(Paragraph::new(title_line).block(block), area);
}

fn render_menu(frame: &mut Frame, app: &App, area: Rect) {
    let theme = app.theme;
    let items: Vec<ListItem> = (0..MenuItem::COUNT)
        .map(|i| {
            let item = MenuItem::at(i);
            let open = match item {
                MenuItem::Panel(panel) => app.panels.is_open(panel),
                MenuItem::AddUser => false,
            };
            let marker = if open { "•" } else { " " };
            ListItem::new(Line::from(vec![
                Span::styled(format!(" {} ", marker), styles::success_style(theme)),
                Span::styled(item.title(), styles::list_item_style(theme)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title(" Menu ")
                .borders(Borders::ALL)
                .border_style(styles::border_style(theme, true)),
        )
        .highlight_style(styles::selected_style(theme));

    let mut state = ListState::default();
    state.select(Some(app.menu_selection));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_content(frame: &mut Frame, app: &App, area: Rect) {
    let theme = app.theme;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(theme, false));

    let Some(panel) = app.active_panel else {
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("  Welcome, {}", app.display_name()),
                styles::title_style(theme),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "  Select a panel from the menu and press Enter.",
                styles::muted_style(theme),
            )),
        ];
        frame.render_widget(Paragraph::new(lines).block(block), area);
        return;
    };

    let block = block.title(format!(" {} ", panel.title()));
    let mut lines = vec![Line::from("")];

    match app.panels.get(panel) {
        Some(handle) => {
            let status = if handle.page_exists() {
                Span::styled("ready", styles::success_style(theme))
            } else {
                Span::styled("page missing", styles::error_style(theme))
            };
            lines.push(labelled("Page", handle.page_path.display().to_string(), theme));
            lines.push(Line::from(vec![
                Span::styled("  Status:      ", styles::muted_style(theme)),
                status,
            ]));
            lines.push(labelled(
                "Starts with",
                panel.initial_call().unwrap_or("-").to_string(),
                theme,
            ));
            lines.push(labelled("Theme", handle.theme.label().to_string(), theme));
            lines.push(labelled("Service", app.api.base_url().to_string(), theme));
            lines.push(Line::from(""));
            let launch = match handle.launch_url() {
                Ok(_) if handle.page_exists() => Span::styled(
                    "  Opens in the system browser, signed in. Press o to open it again.",
                    styles::muted_style(theme),
                ),
                Ok(_) => Span::styled(
                    "  The page cannot be opened until it is installed.",
                    styles::error_style(theme),
                ),
                Err(e) => Span::styled(format!("  {}", e), styles::error_style(theme)),
            };
            lines.push(Line::from(launch));
        }
        None => lines.push(Line::from(Span::styled(
            "  Not opened yet.",
            styles::muted_style(theme),
        ))),
    }

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn labelled(label: &str, value: String, theme: Theme) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<13}", format!("{}:", label)), styles::muted_style(theme)),
        Span::styled(value, styles::list_item_style(theme)),
    ])
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let theme = app.theme;
    let shortcuts = if app.is_authenticated() {
        "[a]dd user | [t]heme | [l]ogout | [q]uit"
    } else {
        "[Esc] quit"
    };

    let left_text = match (&app.status_message, app.sessions.session()) {
        (Some(msg), _) => format!(" {} ", msg),
        (None, Some(session)) => format!(
            " Signed in {} min | {} theme ",
            session.minutes_signed_in(),
            theme.label()
        ),
        (None, None) => " Not signed in ".to_string(),
    };
    let right_text = format!(" {} ", shortcuts);

    let width = area.width as usize;
    let padding_len = width
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.len());
    let status_line = Line::from(vec![
        Span::styled(left_text, styles::muted_style(theme)),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style(theme)),
    ]);
    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style(theme));
    frame.render_widget(paragraph, area);
}

fn render_help_overlay(frame: &mut Frame, theme: Theme) {
    let area = centered_rect_fixed(52, 21, frame.area());
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");
    let key_line = |key: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(key, styles::help_key_style(theme)),
            Span::styled(desc, styles::help_desc_style(theme)),
        ])
    };

    let mut help_text = logo_lines(theme);
    help_text.push(Line::from(Span::styled(
        format!("     version {}", version),
        styles::muted_style(theme),
    )));
    help_text.extend([
        Line::from(""),
        Line::from(Span::styled(" Navigation", styles::highlight_style(theme))),
        key_line("  ↑/↓       ", "Move through the menu"),
        key_line("  Enter     ", "Open panel"),
        key_line("  o         ", "Open panel page again"),
        key_line("  Esc       ", "Close panel"),
        Line::from(""),
        Line::from(Span::styled(" Actions", styles::highlight_style(theme))),
        key_line("  a         ", "Add a user account"),
        key_line("  t         ", "Toggle light/dark theme"),
        key_line("  l         ", "Logout"),
        key_line("  q         ", "Quit"),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Press ", styles::muted_style(theme)),
            Span::styled("?", styles::help_key_style(theme)),
            Span::styled(" or ", styles::muted_style(theme)),
            Span::styled("Esc", styles::help_key_style(theme)),
            Span::styled(" to close", styles::muted_style(theme)),
        ]),
    ]);

    frame.render_widget(Paragraph::new(help_text).block(overlay_block(theme)), area);
}

fn logo_lines(theme: Theme) -> Vec<Line<'static>> {
    LOGO.iter()
        .map(|l| Line::from(Span::styled(*l, styles::title_style(theme))))
        .collect()
}

fn overlay_block(theme: Theme) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(theme, true))
        .style(styles::base_style(theme))
}

/// One `Label: [value]` form row
fn field_line(label: &str, value: &str, focused: bool, masked: bool, theme: Theme) -> Line<'static> {
    let shown: String = if masked {
        "*".repeat(value.chars().count())
    } else {
        value.to_string()
    };
    // Keep the tail visible while typing past the field width
    let skip = shown.chars().count().saturating_sub(FIELD_WIDTH);
    let shown: String = shown.chars().skip(skip).collect();
    let style = if focused {
        styles::selected_style(theme)
    } else {
        styles::list_item_style(theme)
    };
    let cursor = if focused { "▌" } else { "" };
    Line::from(vec![
        Span::styled(format!("  {:>16} [", label), styles::muted_style(theme)),
        Span::styled(format!("{:<width$}{}", shown, cursor, width = FIELD_WIDTH), style),
        Span::styled("]", styles::muted_style(theme)),
    ])
}

fn button_line(label: &str, focused: bool, theme: Theme) -> Line<'static> {
    let text = if focused {
        format!(" ▶ {} ◀ ", label)
    } else {
        format!("   {}   ", label)
    };
    let style = if focused {
        styles::selected_style(theme)
    } else {
        styles::list_item_style(theme)
    };
    Line::from(vec![
        Span::raw("                  ["),
        Span::styled(text, style),
        Span::raw("]"),
    ])
}

fn message_lines(lines: &mut Vec<Line<'static>>, error: Option<&String>, notice: Option<&String>, theme: Theme) {
    if let Some(error) = error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(format!(" {}", error), styles::error_style(theme))));
    } else if let Some(notice) = notice {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(format!(" {}", notice), styles::success_style(theme))));
    }
}

fn render_login_overlay(frame: &mut Frame, app: &App) {
    let theme = app.theme;
    let has_message = app.login_error.is_some() || app.login_notice.is_some();
    let height = if has_message { 15 } else { 13 };
    let area = centered_rect_fixed(60, height, frame.area());
    frame.render_widget(Clear, area);

    let focus = app.login_focus;
    let mut lines = logo_lines(theme);
    lines.push(Line::from(""));
    lines.push(field_line("ID Number:", &app.login.id_number, focus == LoginFocus::IdNumber, false, theme));
    lines.push(field_line("Password:", &app.login.password, focus == LoginFocus::Password, true, theme));

    let checkbox = if app.login.remember { "[x]" } else { "[ ]" };
    let remember_style = if focus == LoginFocus::Remember {
        styles::selected_style(theme)
    } else {
        styles::list_item_style(theme)
    };
    lines.push(Line::from(vec![
        Span::raw("                   "),
        Span::styled(format!("{} Remember me", checkbox), remember_style),
    ]));
    lines.push(Line::from(""));
    lines.push(button_line("Login", focus == LoginFocus::Button, theme));

    let register_style = if focus == LoginFocus::Register {
        styles::selected_style(theme)
    } else {
        styles::muted_style(theme)
    };
    lines.push(Line::from(vec![
        Span::raw("            "),
        Span::styled("No account yet? Register", register_style),
    ]));

    message_lines(&mut lines, app.login_error.as_ref(), app.login_notice.as_ref(), theme);

    let block = overlay_block(theme).title(" Admin Login ");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_register_overlay(frame: &mut Frame, app: &App) {
    let theme = app.theme;
    let height = if app.register_error.is_some() { 16 } else { 14 };
    let area = centered_rect_fixed(60, height, frame.area());
    frame.render_widget(Clear, area);

    let form = &app.registration;
    let focus = app.register_focus;
    let mut lines = logo_lines(theme);
    lines.push(Line::from(""));
    lines.push(field_line("Full Name:", &form.full_name, focus == RegisterFocus::FullName, false, theme));
    lines.push(field_line("ID Number:", &form.id_number, focus == RegisterFocus::IdNumber, false, theme));
    lines.push(field_line("Email:", &form.email, focus == RegisterFocus::Email, false, theme));
    lines.push(field_line("Contact No.:", &form.contact_number, focus == RegisterFocus::Contact, false, theme));
    lines.push(field_line("Password:", &form.password, focus == RegisterFocus::Password, true, theme));
    lines.push(field_line(
        "Confirm:",
        &form.confirm_password,
        focus == RegisterFocus::ConfirmPassword,
        true,
        theme,
    ));
    lines.push(Line::from(""));
    lines.push(button_line("Register", focus == RegisterFocus::Button, theme));
    message_lines(&mut lines, app.register_error.as_ref(), None, theme);

    let block = overlay_block(theme).title(" Register Admin (Esc: back) ");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_add_user_overlay(frame: &mut Frame, app: &App) {
    let theme = app.theme;
    let height = if app.add_user_error.is_some() { 14 } else { 12 };
    let area = centered_rect_fixed(60, height, frame.area());
    frame.render_widget(Clear, area);

    let form = &app.new_user;
    let focus = app.add_user_focus;
    let mut lines = vec![Line::from("")];
    lines.push(field_line("ID Number:", &form.id_number, focus == AddUserFocus::IdNumber, false, theme));
    lines.push(field_line("Name:", &form.name, focus == AddUserFocus::Name, false, theme));
    lines.push(field_line("Email:", &form.email, focus == AddUserFocus::Email, false, theme));
    lines.push(field_line(
        "Level (←/→):",
        &form.level,
        focus == AddUserFocus::Level,
        false,
        theme,
    ));
    lines.push(field_line("Contact No.:", &form.contact, focus == AddUserFocus::Contact, false, theme));
    lines.push(field_line("Password:", &form.password, focus == AddUserFocus::Password, true, theme));
    lines.push(Line::from(""));
    lines.push(button_line("Add User", focus == AddUserFocus::Button, theme));
    message_lines(&mut lines, app.add_user_error.as_ref(), None, theme);

    let block = overlay_block(theme).title(" Add User (Esc: cancel) ");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

fn render_confirm_overlay(frame: &mut Frame, theme: Theme, question: &'static str, action: &'static str) {
    let area = centered_rect_fixed(46, 9, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = logo_lines(theme);
    lines.extend([
        Line::from(""),
        Line::from(Span::styled(question, styles::highlight_style(theme))),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style(theme)),
            Span::styled("[Y]", styles::help_key_style(theme)),
            Span::styled(action, styles::muted_style(theme)),
            Span::styled("[N]", styles::help_key_style(theme)),
            Span::styled(" to cancel", styles::muted_style(theme)),
        ]),
    ]);

    frame.render_widget(Paragraph::new(lines).block(overlay_block(theme)), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_fixed() {
        let outer = Rect::new(0, 0, 100, 40);
        assert_eq!(centered_rect_fixed(46, 10, outer), Rect::new(27, 15, 46, 10));
        // Clamped to a small terminal
        let small = Rect::new(0, 0, 30, 5);
        assert_eq!(centered_rect_fixed(46, 10, small), Rect::new(0, 0, 30, 5));
    }

    #[test]
    fn test_field_line_masks_and_scrolls() {
        let line = field_line("Password:", "secret", false, true, Theme::Light);
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(text.contains("******"));
        assert!(!text.contains("secret"));

        let long = "x".repeat(FIELD_WIDTH + 5) + "end";
        let line = field_line("Name:", &long, true, false, Theme::Dark);
        assert!(line.spans[1].content.starts_with('x'));
        assert!(line.spans[1].content.contains("end▌"));
    }
}
