use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, AppState, LoginFocus};
use crate::models::Role;

use super::screens::{patient, triage};
use super::styles;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_main_content(frame, app, chunks[1]);
    render_status_bar(frame, app, chunks[2]);

    // Render overlays
    if matches!(app.state, AppState::Login) {
        render_login_overlay(frame, app);
    }

    if matches!(app.state, AppState::ShowingHelp) {
        render_help_overlay(frame);
    }

    if matches!(app.state, AppState::ConfirmingQuit) {
        render_quit_overlay(frame);
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  MedMap Triage";
    let help_hint = "[?] Help";

    let signed_in = match (app.session.username(), app.role()) {
        (Some(username), Some(role)) => format!("{} ({})", username, role),
        _ => "not signed in".to_string(),
    };

    let padding = area
        .width
        .saturating_sub((title.len() + signed_in.len() + help_hint.len() + 7) as u16)
        as usize;

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(padding)),
        Span::styled(signed_in, styles::muted_style()),
        Span::raw("   "),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(title_line).block(block), area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    // Role decides the screen; no session means the login overlay is up
    // and the backdrop stays empty.
    match app.role() {
        Some(Role::Patient) => patient::render(frame, app, area),
        Some(Role::HealthWorker) => triage::render(frame, app, area),
        None => {
            let paragraph = Paragraph::new(Line::from(Span::styled(
                " Please sign in to continue.",
                styles::muted_style(),
            )));
            frame.render_widget(paragraph, area);
        }
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = match app.role() {
        Some(Role::Patient) => "[space] toggle | [l]anguage | sign [o]ut | [q]uit",
        Some(Role::HealthWorker) => "[f]ilter | [u]rgency sort | [t]reated | sign [o]ut | [q]uit",
        None => "[Tab] next field | [Enter] submit | [Esc] quit",
    };

    let left_text = if let Some(ref msg) = app.status_message {
        format!(" {} ", msg)
    } else {
        String::from(" ")
    };
    let right_text = format!(" {} ", shortcuts);

    let padding = (area.width as usize)
        .saturating_sub(left_text.len())
        .saturating_sub(right_text.len());

    let status_line = Line::from(vec![
        Span::styled(left_text, styles::highlight_style()),
        Span::raw(" ".repeat(padding)),
        Span::styled(right_text, styles::muted_style()),
    ]);

    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

fn render_login_overlay(frame: &mut Frame, app: &App) {
    let height = if app.login_error.is_some() || app.status_message.is_some() {
        15
    } else {
        13
    };
    let area = centered_rect_fixed(46, height, frame.area());

    frame.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(Span::styled(
            "        ╔╦╗╔═╗╔╦╗╔╦╗╔═╗╔═╗",
            styles::title_style(),
        )),
        Line::from(Span::styled(
            "        ║║║║╣  ║║║║║╠═╣╠═╝",
            styles::title_style(),
        )),
        Line::from(Span::styled(
            "        ╩ ╩╚═╝═╩╝╩ ╩╩ ╩╩    triage",
            styles::title_style(),
        )),
        Line::from(""),
    ];

    // Username field
    let username_focused = app.login_focus == LoginFocus::Username;
    let username_style = if username_focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let cursor = if username_focused { "▌" } else { "" };
    lines.push(Line::from(vec![
        Span::raw("   "),
        Span::styled("Username: [", styles::muted_style()),
        Span::styled(
            format!("{:<20}{}", app.login_username, cursor),
            username_style,
        ),
        Span::styled("]", styles::muted_style()),
    ]));

    // Password field (masked)
    let password_focused = app.login_focus == LoginFocus::Password;
    let password_style = if password_focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let masked: String = "*".repeat(app.login_password.len().min(20));
    let cursor = if password_focused { "▌" } else { "" };
    lines.push(Line::from(vec![
        Span::raw("   "),
        Span::styled("Password: [", styles::muted_style()),
        Span::styled(format!("{:<20}{}", masked, cursor), password_style),
        Span::styled("]", styles::muted_style()),
    ]));

    // Role selector (used by sign-up)
    let role_focused = app.login_focus == LoginFocus::Role;
    let role_style = if role_focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    lines.push(Line::from(vec![
        Span::raw("   "),
        Span::styled("Role:     ", styles::muted_style()),
        Span::styled(format!("◂ {} ▸", app.login_role), role_style),
    ]));

    lines.push(Line::from(""));

    // Buttons
    let button = |label: &str, focused: bool| {
        if focused {
            Span::styled(format!(" ▶ {} ◀ ", label), styles::selected_style())
        } else {
            Span::styled(format!("   {}   ", label), styles::list_item_style())
        }
    };
    lines.push(Line::from(vec![
        Span::raw("       ["),
        button("Sign In", app.login_focus == LoginFocus::SignIn),
        Span::raw("]  ["),
        button("Sign Up", app.login_focus == LoginFocus::SignUp),
        Span::raw("]"),
    ]));

    if let Some(ref error) = app.login_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(" {}", error),
            styles::error_style(),
        )));
    } else if let Some(ref msg) = app.status_message {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(" {}", msg),
            styles::success_style(),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(52, 20, frame.area());

    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let key = |k: &str, desc: &str| {
        Line::from(vec![
            Span::styled(format!("  {:<10}", k), styles::help_key_style()),
            Span::styled(desc.to_string(), styles::help_desc_style()),
        ])
    };

    let help_text = vec![
        Line::from(Span::styled(
            format!("  MedMap Triage  v{}", version),
            styles::title_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(" General", styles::highlight_style())),
        key("↑/↓", "Navigate list"),
        key("o", "Sign out"),
        key("q", "Quit"),
        key("?", "Toggle this help"),
        Line::from(""),
        Line::from(Span::styled(" Patient", styles::highlight_style())),
        key("Space", "Toggle symptom"),
        key("←/→", "Adjust urgency estimate"),
        key("Tab", "Switch symptoms / slider focus"),
        key("l", "Cycle language"),
        Line::from(""),
        Line::from(Span::styled(" Health Worker", styles::highlight_style())),
        key("f", "Cycle status filter"),
        key("u", "Toggle urgency sort"),
        key("t", "Mark selected case treated"),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Press ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(help_text).block(block), area);
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(46, 7, frame.area());

    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Are you sure you want to quit?",
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to quit, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}
