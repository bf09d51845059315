//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{can_add_email_char, can_add_password_char, App, AppState, EditFocus, LoginFocus};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> bool {
    match app.state {
        AppState::LoggingIn => handle_login_input(app, key),
        AppState::EditingCourse => handle_edit_input(app, key),
        AppState::ShowingHelp => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                app.state = AppState::Normal;
            }
        }
        AppState::ConfirmingQuit => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Quitting;
                return true;
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        },
        AppState::Normal => handle_home_input(app, key),
        AppState::Quitting => return true,
    }
    false
}

fn handle_home_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.state = AppState::ConfirmingQuit,
        KeyCode::Char('?') => app.state = AppState::ShowingHelp,
        KeyCode::Char('l') => {
            if app.logged_in.get() {
                app.logout();
            } else {
                app.start_login();
            }
        }
        KeyCode::Char('x') | KeyCode::Esc => app.dismiss_errors(),
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Left | KeyCode::Right => app.switch_column(),
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Enter | KeyCode::Char('e') => app.start_edit(),
        _ => {}
    }
}

fn handle_login_input(app: &mut App, key: KeyEvent) {
    // Fields are frozen while a request is in flight
    if app.is_logging_in() {
        return;
    }

    match key.code {
        KeyCode::Esc => {
            // Keep browsing logged out
            app.login_error = None;
            app.state = AppState::Normal;
        }
        KeyCode::Down | KeyCode::Tab => {
            app.login_focus = match app.login_focus {
                LoginFocus::Email => LoginFocus::Password,
                LoginFocus::Password => LoginFocus::Button,
                LoginFocus::Button => LoginFocus::Email,
            };
        }
        KeyCode::Up | KeyCode::BackTab => {
            app.login_focus = match app.login_focus {
                LoginFocus::Email => LoginFocus::Button,
                LoginFocus::Password => LoginFocus::Email,
                LoginFocus::Button => LoginFocus::Password,
            };
        }
        KeyCode::Enter => match app.login_focus {
            LoginFocus::Email => app.login_focus = LoginFocus::Password,
            LoginFocus::Password | LoginFocus::Button => app.attempt_login(),
        },
        KeyCode::Backspace => match app.login_focus {
            LoginFocus::Email => {
                app.login_email.pop();
            }
            LoginFocus::Password => {
                app.login_password.pop();
            }
            LoginFocus::Button => {}
        },
        KeyCode::Char(c) => match app.login_focus {
            LoginFocus::Email => {
                if can_add_email_char(app.login_email.chars().count(), c) {
                    app.login_email.push(c);
                }
            }
            LoginFocus::Password => {
                if can_add_password_char(app.login_password.chars().count(), c) {
                    app.login_password.push(c);
                }
            }
            LoginFocus::Button => {}
        },
        _ => {}
    }
}

fn handle_edit_input(app: &mut App, key: KeyEvent) {
    let Some(form) = app.course_form.as_mut() else {
        app.state = AppState::Normal;
        return;
    };

    match key.code {
        KeyCode::Esc => app.cancel_edit(),
        KeyCode::Tab | KeyCode::Down => form.focus = form.focus.next(),
        KeyCode::BackTab | KeyCode::Up => form.focus = form.focus.prev(),
        KeyCode::Left | KeyCode::Right if form.focus == EditFocus::Category => {
            form.toggle_category();
        }
        KeyCode::Enter => match form.focus {
            EditFocus::Save => app.submit_edit(),
            _ => form.focus = form.focus.next(),
        },
        KeyCode::Backspace => form.pop_char(),
        KeyCode::Char(c) => form.push_char(c),
        _ => {}
    }
}
