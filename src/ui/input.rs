//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{
    can_add_password_char, can_add_username_char, App, AppState, LoginFocus, PatientFocus,
};
use crate::models::Role;

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Handle login screen
    if matches!(app.state, AppState::Login) {
        return handle_login_input(app, key);
    }

    // Handle help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.state = AppState::Normal;
        }
        return Ok(false);
    }

    // Handle quit confirmation
    if matches!(app.state, AppState::ConfirmingQuit) {
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

    // Global keys
    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
            return Ok(false);
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
            return Ok(false);
        }
        KeyCode::Char('o') => {
            app.sign_out();
            return Ok(false);
        }
        _ => {}
    }

    // Role-specific keys
    match app.role() {
        Some(Role::Patient) => handle_patient_input(app, key),
        Some(Role::HealthWorker) => handle_triage_input(app, key),
        None => {
            // Session vanished underneath us, fall back to login
            app.state = AppState::Login;
            Ok(false)
        }
    }
}

fn handle_login_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => {
            // Quit if on login screen
            app.state = AppState::Quitting;
            return Ok(true);
        }
        KeyCode::Down | KeyCode::Tab => {
            app.login_focus = app.login_focus.next();
        }
        KeyCode::Up | KeyCode::BackTab => {
            app.login_focus = app.login_focus.prev();
        }
        KeyCode::Left | KeyCode::Right => {
            if app.login_focus == LoginFocus::Role {
                app.login_role = app.login_role.toggle();
            }
        }
        KeyCode::Enter => match app.login_focus {
            LoginFocus::Username => app.login_focus = LoginFocus::Password,
            LoginFocus::Password | LoginFocus::SignIn => app.submit_sign_in(),
            LoginFocus::Role => app.login_focus = LoginFocus::SignIn,
            LoginFocus::SignUp => app.submit_sign_up(),
        },
        KeyCode::Backspace => match app.login_focus {
            LoginFocus::Username => {
                app.login_username.pop();
            }
            LoginFocus::Password => {
                app.login_password.pop();
            }
            _ => {}
        },
        KeyCode::Char(c) => match app.login_focus {
            LoginFocus::Username => {
                if can_add_username_char(app.login_username.len(), c) {
                    app.login_username.push(c);
                }
            }
            LoginFocus::Password => {
                if can_add_password_char(app.login_password.len(), c) {
                    app.login_password.push(c);
                }
            }
            _ => {}
        },
        _ => {}
    }
    Ok(false)
}

fn handle_patient_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Tab => {
            app.patient_focus = match app.patient_focus {
                PatientFocus::Symptoms => PatientFocus::UrgencySlider,
                PatientFocus::UrgencySlider => PatientFocus::Symptoms,
            };
        }
        KeyCode::Up => app.move_symptom_cursor(-1),
        KeyCode::Down => app.move_symptom_cursor(1),
        KeyCode::Char(' ') | KeyCode::Enter => {
            if app.patient_focus == PatientFocus::Symptoms {
                app.toggle_symptom();
            }
        }
        KeyCode::Left => app.adjust_urgency_estimate(-5),
        KeyCode::Right => app.adjust_urgency_estimate(5),
        KeyCode::Char('l') => app.cycle_language(),
        _ => {}
    }
    Ok(false)
}

fn handle_triage_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Up => app.move_case_selection(-1),
        KeyCode::Down => app.move_case_selection(1),
        KeyCode::Char('f') => app.cycle_status_filter(),
        KeyCode::Char('u') => app.toggle_urgency_sort(),
        KeyCode::Char('t') => app.mark_selected_treated(),
        _ => {}
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crossterm::event::{KeyEventKind, KeyEventState, KeyModifiers};
    use tempfile::TempDir;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn signed_in_app(role: Role) -> (TempDir, App) {
        let dir = TempDir::new().unwrap();
        let mut app = App::with_data_dir(Config::default(), dir.path().to_path_buf()).unwrap();
        app.login_username = "tester".to_string();
        app.login_password = "pw".to_string();
        app.login_role = role;
        app.submit_sign_up();
        app.login_password = "pw".to_string();
        app.submit_sign_in();
        (dir, app)
    }

    #[test]
    fn test_typed_login_credentials_sign_in() {
        let dir = TempDir::new().unwrap();
        let mut app = App::with_data_dir(Config::default(), dir.path().to_path_buf()).unwrap();

        for c in "alice".chars() {
            handle_input(&mut app, key(KeyCode::Char(c))).unwrap();
        }
        handle_input(&mut app, key(KeyCode::Tab)).unwrap();
        for c in "pw1".chars() {
            handle_input(&mut app, key(KeyCode::Char(c))).unwrap();
        }
        // Register via the Sign Up button, then sign in with Enter
        app.login_focus = LoginFocus::SignUp;
        handle_input(&mut app, key(KeyCode::Enter)).unwrap();
        assert!(app.login_error.is_none());

        app.login_focus = LoginFocus::Password;
        for c in "pw1".chars() {
            handle_input(&mut app, key(KeyCode::Char(c))).unwrap();
        }
        handle_input(&mut app, key(KeyCode::Enter)).unwrap();
        assert_eq!(app.state, AppState::Normal);
        assert_eq!(app.role(), Some(Role::Patient));
    }

    #[test]
    fn test_comma_is_ignored_in_username_field() {
        let dir = TempDir::new().unwrap();
        let mut app = App::with_data_dir(Config::default(), dir.path().to_path_buf()).unwrap();
        for c in "a,b".chars() {
            handle_input(&mut app, key(KeyCode::Char(c))).unwrap();
        }
        assert_eq!(app.login_username, "ab");
    }

    #[test]
    fn test_role_selector_toggles() {
        let dir = TempDir::new().unwrap();
        let mut app = App::with_data_dir(Config::default(), dir.path().to_path_buf()).unwrap();
        app.login_focus = LoginFocus::Role;
        handle_input(&mut app, key(KeyCode::Right)).unwrap();
        assert_eq!(app.login_role, Role::HealthWorker);
        handle_input(&mut app, key(KeyCode::Left)).unwrap();
        assert_eq!(app.login_role, Role::Patient);
    }

    #[test]
    fn test_worker_filter_and_treat_keys() {
        let (_dir, mut app) = signed_in_app(Role::HealthWorker);
        handle_input(&mut app, key(KeyCode::Char('f'))).unwrap();
        assert_eq!(app.status_filter.to_string(), "New");

        handle_input(&mut app, key(KeyCode::Char('t'))).unwrap();
        // First New case (John Smith) is now treated and leaves the filter
        let visible = app.visible_cases();
        assert!(visible.iter().all(|&i| app.cases[i].name != "John Smith"));
    }

    #[test]
    fn test_patient_space_toggles_symptom() {
        let (_dir, mut app) = signed_in_app(Role::Patient);
        handle_input(&mut app, key(KeyCode::Down)).unwrap();
        handle_input(&mut app, key(KeyCode::Char(' '))).unwrap();
        assert_eq!(app.selected_symptom_names(), vec!["Headache"]);
    }

    #[test]
    fn test_sign_out_key_returns_to_login() {
        let (_dir, mut app) = signed_in_app(Role::Patient);
        handle_input(&mut app, key(KeyCode::Char('o'))).unwrap();
        assert_eq!(app.state, AppState::Login);
        assert!(!app.is_authenticated());
    }

    #[test]
    fn test_quit_confirmation_flow() {
        let (_dir, mut app) = signed_in_app(Role::Patient);
        handle_input(&mut app, key(KeyCode::Char('q'))).unwrap();
        assert_eq!(app.state, AppState::ConfirmingQuit);
        handle_input(&mut app, key(KeyCode::Char('n'))).unwrap();
        assert_eq!(app.state, AppState::Normal);

        handle_input(&mut app, key(KeyCode::Char('q'))).unwrap();
        let quit = handle_input(&mut app, key(KeyCode::Char('y'))).unwrap();
        assert!(quit);
        assert_eq!(app.state, AppState::Quitting);
    }
}
