use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use coursebook_core::models::Category;

use crate::app::{App, AppState, CourseForm, EditFocus, LoginFocus};

use super::styles;
use super::tabs::home;

pub fn render(frame: &mut Frame, app: &App) {
    let messages_height = if app.error_messages.is_empty() {
        0
    } else {
        app.error_messages.len().min(4) as u16 + 2
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),               // Title bar
            Constraint::Length(messages_height), // Messages panel
            Constraint::Min(10),                 // Main content
            Constraint::Length(2),               // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    if messages_height > 0 {
        render_messages(frame, app, chunks[1]);
    }
    home::render(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);

    // Render overlays
    match app.state {
        AppState::ShowingHelp => render_help_overlay(frame),
        AppState::LoggingIn => render_login_overlay(frame, app),
        AppState::EditingCourse => {
            if let Some(ref form) = app.course_form {
                render_edit_overlay(frame, form);
            }
        }
        AppState::ConfirmingQuit => render_quit_overlay(frame),
        AppState::Normal | AppState::Quitting => {}
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  Coursebook";
    let session_hint = if app.logged_in.get() {
        "[l]ogout"
    } else {
        "[l] Login"
    };
    let help_hint = "  [?] Help";
    let hints_len = session_hint.len() + help_hint.len();

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(
            (area.width as usize).saturating_sub(title.len() + hints_len + 2),
        )),
        Span::styled(session_hint, styles::highlight_style()),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(title_line).block(block);
    frame.render_widget(paragraph, area);
}

fn render_messages(frame: &mut Frame, app: &App, area: Rect) {
    let lines: Vec<Line> = app
        .error_messages
        .iter()
        .rev()
        .take(4)
        .rev()
        .map(|message| Line::from(Span::styled(format!(" {}", message), styles::error_style())))
        .collect();

    let block = Block::default()
        .title(" Errors - [x] dismiss ")
        .title_style(styles::error_style())
        .borders(Borders::ALL)
        .border_style(styles::error_style());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = "[Tab] column | [Enter] edit | [q]uit";

    let (left_text, left_style) = if app.loading.is_loading() {
        (" Loading... ".to_string(), styles::loading_style())
    } else if let Some(ref msg) = app.status_message {
        (format!(" {} ", msg), styles::muted_style())
    } else {
        (format!(" Updated {} ", app.courses_age()), styles::muted_style())
    };

    let right_text = format!(" {} ", shortcuts);
    let padding_len = (area.width as usize)
        .saturating_sub(left_text.len())
        .saturating_sub(right_text.len());

    let status_line = Line::from(vec![
        Span::styled(left_text, left_style),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

fn help_line(key: &'static str, desc: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<10}", key), styles::help_key_style()),
        Span::styled(desc, styles::help_desc_style()),
    ])
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(52, 20, frame.area());
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let help_text = vec![
        Line::from(Span::styled("  Coursebook", styles::title_style())),
        Line::from(Span::styled(
            format!("  version {}", version),
            styles::muted_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(" Navigation", styles::highlight_style())),
        help_line("Tab ←/→", "Switch column"),
        help_line("↑/↓ j/k", "Navigate list"),
        help_line("Enter e", "Edit selected course"),
        help_line("Esc", "Close dialog"),
        Line::from(""),
        Line::from(Span::styled(" Actions", styles::highlight_style())),
        help_line("l", "Login / logout"),
        help_line("x", "Dismiss errors"),
        help_line("q", "Quit"),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Press ", styles::muted_style()),
            Span::styled("?", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
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

/// Bracketed input field with a cursor when focused
fn field_line(label: &str, value: &str, width: usize, focused: bool) -> Line<'static> {
    let style = if focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    // Show the tail so the cursor stays visible
    let visible: String = {
        let count = value.chars().count();
        value.chars().skip(count.saturating_sub(width)).collect()
    };
    let cursor = if focused { "▌" } else { "" };
    Line::from(vec![
        Span::styled(format!("  {:<10}[", label), styles::muted_style()),
        Span::styled(format!("{:<width$}{}", visible, cursor, width = width), style),
        Span::styled("]", styles::muted_style()),
    ])
}

fn button_line(label: &str, focused: bool) -> Line<'static> {
    if focused {
        Line::from(vec![
            Span::raw("            ["),
            Span::styled(format!(" ▶ {} ◀ ", label), styles::selected_style()),
            Span::raw("]"),
        ])
    } else {
        Line::from(vec![
            Span::raw("            ["),
            Span::styled(format!("   {}   ", label), styles::list_item_style()),
            Span::raw("]"),
        ])
    }
}

fn render_login_overlay(frame: &mut Frame, app: &App) {
    let height = if app.login_error.is_some() { 11 } else { 9 };
    let area = centered_rect_fixed(50, height, frame.area());
    frame.render_widget(Clear, area);

    let password_masked = "*".repeat(app.login_password.chars().count());

    let mut lines = vec![
        Line::from(""),
        field_line("Email:", &app.login_email, 28, app.login_focus == LoginFocus::Email),
        field_line(
            "Password:",
            &password_masked,
            28,
            app.login_focus == LoginFocus::Password,
        ),
        Line::from(""),
    ];

    if app.is_logging_in() {
        lines.push(Line::from(Span::styled(
            "            Signing in...",
            styles::loading_style(),
        )));
    } else {
        lines.push(button_line("Login", app.login_focus == LoginFocus::Button));
    }

    if let Some(ref error) = app.login_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  {}", error),
            styles::error_style(),
        )));
    }

    let block = Block::default()
        .title(" Login ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_edit_overlay(frame: &mut Frame, form: &CourseForm) {
    let height = if form.error.is_some() { 14 } else { 12 };
    let area = centered_rect_fixed(64, height, frame.area());
    frame.render_widget(Clear, area);

    let category_focused = form.focus == EditFocus::Category;
    let category_span = |category: Category| {
        let label = format!(" {} ", category.label());
        if form.category == category {
            Span::styled(label, styles::selected_style())
        } else {
            Span::styled(label, styles::muted_style())
        }
    };

    let mut lines = vec![
        Line::from(""),
        field_line(
            "Title:",
            &form.description,
            40,
            form.focus == EditFocus::Description,
        ),
        Line::from(vec![
            Span::styled(
                "  Category: ",
                if category_focused {
                    styles::highlight_style()
                } else {
                    styles::muted_style()
                },
            ),
            category_span(Category::Beginner),
            Span::raw(" "),
            category_span(Category::Advanced),
        ]),
        field_line(
            "About:",
            &form.long_description,
            40,
            form.focus == EditFocus::LongDescription,
        ),
        Line::from(""),
        button_line("Save", form.focus == EditFocus::Save),
        Line::from(""),
        Line::from(Span::styled(
            "  [Tab] next field  [←/→] category  [Esc] cancel",
            styles::muted_style(),
        )),
    ];

    if let Some(ref error) = form.error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  {}", error),
            styles::error_style(),
        )));
    }

    let block = Block::default()
        .title(format!(" Edit Course {} ", form.course_id))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
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
