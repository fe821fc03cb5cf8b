//! Application state management for the triage demo.
//!
//! This module contains the core `App` struct that manages all application
//! state: the login flow, the active session, the in-memory caseload, and
//! the patient symptom checker.

use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::Result;
use tracing::{error, info, warn};

use crate::auth::{AuthError, CredentialStore, FileCredentialStore, Session};
use crate::config::Config;
use crate::models::{
    seed_cases, visible_case_indices, Role, StatusFilter, TriageCase,
};

// ============================================================================
// Constants
// ============================================================================

/// Maximum length for username input.
const MAX_USERNAME_LENGTH: usize = 50;

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
const MAX_PASSWORD_LENGTH: usize = 128;

/// Languages offered by the preference selector
pub const LANGUAGES: [&str; 4] = ["English", "Tamil", "Hindi", "Telugu"];

/// Symptoms offered by the patient checklist
pub const SYMPTOMS: [&str; 6] = [
    "Fever",
    "Headache",
    "Cough",
    "Chest Pain",
    "Nausea",
    "Dizziness",
];

/// Initial position of the urgency estimate slider
const DEFAULT_URGENCY_ESTIMATE: u8 = 50;

// ============================================================================
// UI State Types
// ============================================================================

/// Top-level application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Login,
    Normal,
    ShowingHelp,
    ConfirmingQuit,
    Quitting,
}

/// Focused field on the login screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFocus {
    Username,
    Password,
    Role,
    SignIn,
    SignUp,
}

impl LoginFocus {
    pub fn next(&self) -> Self {
        match self {
            LoginFocus::Username => LoginFocus::Password,
            LoginFocus::Password => LoginFocus::Role,
            LoginFocus::Role => LoginFocus::SignIn,
            LoginFocus::SignIn => LoginFocus::SignUp,
            LoginFocus::SignUp => LoginFocus::Username,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            LoginFocus::Username => LoginFocus::SignUp,
            LoginFocus::Password => LoginFocus::Username,
            LoginFocus::Role => LoginFocus::Password,
            LoginFocus::SignIn => LoginFocus::Role,
            LoginFocus::SignUp => LoginFocus::SignIn,
        }
    }
}

/// Focused section on the patient screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatientFocus {
    Symptoms,
    UrgencySlider,
}

/// Band the urgency estimate slider falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrgencyBand {
    Normal,
    Moderate,
    Critical,
}

impl UrgencyBand {
    pub fn from_estimate(estimate: u8) -> Self {
        if estimate < 40 {
            UrgencyBand::Normal
        } else if estimate < 70 {
            UrgencyBand::Moderate
        } else {
            UrgencyBand::Critical
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UrgencyBand::Normal => "Normal urgency",
            UrgencyBand::Moderate => "Moderate urgency",
            UrgencyBand::Critical => "Critical urgency",
        }
    }
}

// ============================================================================
// App
// ============================================================================

pub struct App {
    pub config: Config,
    pub session: Session,
    store: FileCredentialStore,

    pub state: AppState,
    pub status_message: Option<String>,

    // Login form
    pub login_focus: LoginFocus,
    pub login_username: String,
    pub login_password: String,
    pub login_role: Role,
    pub login_error: Option<String>,

    // Health worker caseload (in-memory only, resets on restart)
    pub cases: Vec<TriageCase>,
    pub status_filter: StatusFilter,
    pub sort_by_urgency: bool,
    pub case_selection: usize,

    // Patient symptom checker
    pub patient_focus: PatientFocus,
    pub symptom_cursor: usize,
    pub selected_symptoms: HashSet<usize>,
    pub urgency_estimate: u8,
    pub language_index: usize,
}

impl App {
    /// Construct against an explicit data directory. Resumes a saved
    /// session if one is on disk; an unreadable session file is ignored.
    pub fn with_data_dir(config: Config, data_dir: PathBuf) -> Result<Self> {
        let store = FileCredentialStore::new(&data_dir);
        let mut session = Session::new(data_dir);
        match session.load() {
            Ok(true) => info!(username = ?session.username(), "Resumed saved session"),
            Ok(false) => {}
            Err(e) => warn!("Ignoring unreadable session file: {:#}", e),
        }

        let state = if session.is_active() {
            AppState::Normal
        } else {
            AppState::Login
        };

        let login_username = config.last_username.clone().unwrap_or_default();
        let language_index = config
            .language
            .as_deref()
            .and_then(|lang| LANGUAGES.iter().position(|l| *l == lang))
            .unwrap_or(0);

        Ok(App {
            config,
            session,
            store,
            state,
            status_message: None,
            login_focus: LoginFocus::Username,
            login_username,
            login_password: String::new(),
            login_role: Role::Patient,
            login_error: None,
            cases: seed_cases(),
            status_filter: StatusFilter::All,
            sort_by_urgency: false,
            case_selection: 0,
            patient_focus: PatientFocus::Symptoms,
            symptom_cursor: 0,
            selected_symptoms: HashSet::new(),
            urgency_estimate: DEFAULT_URGENCY_ESTIMATE,
            language_index,
        })
    }

    /// Role of the signed-in user, if any.
    pub fn role(&self) -> Option<Role> {
        self.session.role()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_active()
    }

    // ------------------------------------------------------------------------
    // Login flow
    // ------------------------------------------------------------------------

    pub fn submit_sign_in(&mut self) {
        match self
            .store
            .authenticate(&self.login_username, &self.login_password)
        {
            Ok(role) => {
                if let Err(e) = self.session.issue(&self.login_username, role) {
                    error!("Failed to persist session: {:#}", e);
                }
                self.config.last_username = Some(self.login_username.clone());
                if let Err(e) = self.config.save() {
                    warn!("Failed to save config: {:#}", e);
                }
                info!(username = %self.login_username, %role, "Signed in");
                self.status_message = Some(format!("Signed in as {}", role));
                self.login_password.clear();
                self.login_error = None;
                self.state = AppState::Normal;
            }
            Err(AuthError::InvalidCredentials) => {
                self.login_error = Some("Invalid username or password".to_string());
            }
            Err(e) => {
                // Store-level faults get logged, the user sees the same
                // generic message as any other failed attempt.
                error!("Authentication error: {:#}", e);
                self.login_error = Some("Invalid username or password".to_string());
            }
        }
    }

    pub fn submit_sign_up(&mut self) {
        match self
            .store
            .register(&self.login_username, &self.login_password, self.login_role)
        {
            Ok(()) => {
                info!(username = %self.login_username, role = %self.login_role, "Registered");
                self.login_error = None;
                self.login_password.clear();
                self.status_message =
                    Some("User registered successfully! Please sign in.".to_string());
            }
            Err(e @ (AuthError::DuplicateUsername(_) | AuthError::InvalidUsername)) => {
                self.login_error = Some(e.to_string());
            }
            Err(e) => {
                error!("Registration error: {:#}", e);
                self.login_error = Some("Registration failed".to_string());
            }
        }
    }

    pub fn sign_out(&mut self) {
        if let Err(e) = self.session.clear() {
            error!("Failed to clear session: {:#}", e);
        }
        info!("Signed out");
        self.login_password.clear();
        self.login_error = None;
        self.login_focus = LoginFocus::Username;
        self.status_message = None;
        self.state = AppState::Login;
    }

    // ------------------------------------------------------------------------
    // Health worker caseload
    // ------------------------------------------------------------------------

    /// Indices into `cases` for the rows currently shown, after applying
    /// the status filter and optional urgency sort.
    pub fn visible_cases(&self) -> Vec<usize> {
        visible_case_indices(&self.cases, self.status_filter, self.sort_by_urgency)
    }

    /// The case currently highlighted in the table, if any rows are visible.
    pub fn selected_case(&self) -> Option<&TriageCase> {
        self.visible_cases()
            .get(self.case_selection)
            .map(|&i| &self.cases[i])
    }

    pub fn cycle_status_filter(&mut self) {
        self.status_filter = self.status_filter.next();
        self.clamp_case_selection();
    }

    pub fn toggle_urgency_sort(&mut self) {
        self.sort_by_urgency = !self.sort_by_urgency;
        self.clamp_case_selection();
    }

    pub fn move_case_selection(&mut self, delta: i32) {
        let len = self.visible_cases().len();
        if len == 0 {
            self.case_selection = 0;
            return;
        }
        let current = self.case_selection as i32;
        self.case_selection = current.saturating_add(delta).clamp(0, len as i32 - 1) as usize;
    }

    /// Mark the highlighted case as treated. In-memory only.
    pub fn mark_selected_treated(&mut self) {
        if let Some(&index) = self.visible_cases().get(self.case_selection) {
            self.cases[index].status = crate::models::CaseStatus::Treated;
            self.status_message = Some(format!("{} marked as treated", self.cases[index].name));
            self.clamp_case_selection();
        }
    }

    fn clamp_case_selection(&mut self) {
        let len = self.visible_cases().len();
        if self.case_selection >= len {
            self.case_selection = len.saturating_sub(1);
        }
    }

    // ------------------------------------------------------------------------
    // Patient symptom checker
    // ------------------------------------------------------------------------

    pub fn move_symptom_cursor(&mut self, delta: i32) {
        let current = self.symptom_cursor as i32;
        self.symptom_cursor =
            current.saturating_add(delta).clamp(0, SYMPTOMS.len() as i32 - 1) as usize;
    }

    pub fn toggle_symptom(&mut self) {
        if !self.selected_symptoms.remove(&self.symptom_cursor) {
            self.selected_symptoms.insert(self.symptom_cursor);
        }
    }

    pub fn selected_symptom_names(&self) -> Vec<&'static str> {
        SYMPTOMS
            .iter()
            .enumerate()
            .filter(|(i, _)| self.selected_symptoms.contains(i))
            .map(|(_, s)| *s)
            .collect()
    }

    pub fn adjust_urgency_estimate(&mut self, delta: i16) {
        let adjusted = (self.urgency_estimate as i16).saturating_add(delta);
        self.urgency_estimate = adjusted.clamp(0, 100) as u8;
    }

    pub fn urgency_band(&self) -> UrgencyBand {
        UrgencyBand::from_estimate(self.urgency_estimate)
    }

    pub fn cycle_language(&mut self) {
        self.language_index = (self.language_index + 1) % LANGUAGES.len();
        self.config.language = Some(LANGUAGES[self.language_index].to_string());
        if let Err(e) = self.config.save() {
            warn!("Failed to save config: {:#}", e);
        }
    }

    pub fn language(&self) -> &'static str {
        LANGUAGES[self.language_index]
    }
}

// ============================================================================
// Input Validation
// ============================================================================

/// Check if a character is printable (not a control character)
fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

/// Check if a username character should be accepted.
/// Commas are rejected because the credential file has no escaping.
pub fn can_add_username_char(current_len: usize, c: char) -> bool {
    current_len < MAX_USERNAME_LENGTH && is_valid_input_char(c) && c != ','
}

/// Check if a password character should be accepted
pub fn can_add_password_char(current_len: usize, c: char) -> bool {
    current_len < MAX_PASSWORD_LENGTH && is_valid_input_char(c)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CaseStatus;
    use tempfile::TempDir;

    fn app() -> (TempDir, App) {
        let dir = TempDir::new().unwrap();
        let config = Config::default();
        let app = App::with_data_dir(config, dir.path().to_path_buf()).unwrap();
        (dir, app)
    }

    // -------------------------------------------------------------------------
    // Login Flow Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_sign_up_then_sign_in() {
        let (_dir, mut app) = app();
        assert_eq!(app.state, AppState::Login);

        app.login_username = "alice".to_string();
        app.login_password = "pw1".to_string();
        app.login_role = Role::Patient;
        app.submit_sign_up();
        assert!(app.login_error.is_none());
        assert_eq!(app.state, AppState::Login);

        app.login_password = "pw1".to_string();
        app.submit_sign_in();
        assert_eq!(app.state, AppState::Normal);
        assert_eq!(app.role(), Some(Role::Patient));
        assert!(app.login_password.is_empty());
    }

    #[test]
    fn test_sign_in_failure_shows_generic_message() {
        let (_dir, mut app) = app();
        app.login_username = "alice".to_string();
        app.login_password = "pw1".to_string();
        app.submit_sign_up();

        app.login_password = "wrong".to_string();
        app.submit_sign_in();
        assert_eq!(app.state, AppState::Login);
        assert_eq!(
            app.login_error.as_deref(),
            Some("Invalid username or password")
        );
    }

    #[test]
    fn test_duplicate_sign_up_shows_error() {
        let (_dir, mut app) = app();
        app.login_username = "alice".to_string();
        app.login_password = "pw1".to_string();
        app.submit_sign_up();
        app.submit_sign_up();
        assert!(app.login_error.as_deref().unwrap().contains("already registered"));
    }

    #[test]
    fn test_sign_out_returns_to_login() {
        let (dir, mut app) = app();
        app.login_username = "alice".to_string();
        app.login_password = "pw1".to_string();
        app.submit_sign_up();
        app.login_password = "pw1".to_string();
        app.submit_sign_in();
        assert!(app.is_authenticated());

        app.sign_out();
        assert!(!app.is_authenticated());
        assert_eq!(app.state, AppState::Login);

        // Session is gone on disk as well
        let reloaded = App::with_data_dir(Config::default(), dir.path().to_path_buf()).unwrap();
        assert_eq!(reloaded.state, AppState::Login);
    }

    #[test]
    fn test_session_resumes_across_restart() {
        let (dir, mut app) = app();
        app.login_username = "carol".to_string();
        app.login_password = "pw".to_string();
        app.login_role = Role::HealthWorker;
        app.submit_sign_up();
        app.login_password = "pw".to_string();
        app.submit_sign_in();

        let reloaded = App::with_data_dir(Config::default(), dir.path().to_path_buf()).unwrap();
        assert_eq!(reloaded.state, AppState::Normal);
        assert_eq!(reloaded.role(), Some(Role::HealthWorker));
    }

    // -------------------------------------------------------------------------
    // Caseload Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_filter_and_sort_interact() {
        let (_dir, mut app) = app();
        app.status_filter = StatusFilter::Only(CaseStatus::New);
        app.sort_by_urgency = true;
        let visible = app.visible_cases();
        let names: Vec<&str> = visible.iter().map(|&i| app.cases[i].name.as_str()).collect();
        // John Smith (High) before Carlos Garcia (Low)
        assert_eq!(names, vec!["John Smith", "Carlos Garcia"]);
    }

    #[test]
    fn test_filter_change_clamps_selection() {
        let (_dir, mut app) = app();
        app.case_selection = 4;
        app.cycle_status_filter(); // -> New, only two rows
        assert!(app.case_selection < app.visible_cases().len());
    }

    #[test]
    fn test_mark_treated_is_not_persisted() {
        let (dir, mut app) = app();
        app.mark_selected_treated();
        assert_eq!(app.cases[0].status, CaseStatus::Treated);

        // A fresh app sees the seed data again
        let reloaded = App::with_data_dir(Config::default(), dir.path().to_path_buf()).unwrap();
        assert_eq!(reloaded.cases[0].status, CaseStatus::New);
    }

    #[test]
    fn test_move_case_selection_clamps() {
        let (_dir, mut app) = app();
        app.move_case_selection(-3);
        assert_eq!(app.case_selection, 0);
        app.move_case_selection(100);
        assert_eq!(app.case_selection, app.visible_cases().len() - 1);
    }

    // -------------------------------------------------------------------------
    // Patient Screen Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_symptom_toggle() {
        let (_dir, mut app) = app();
        app.symptom_cursor = 3;
        app.toggle_symptom();
        assert_eq!(app.selected_symptom_names(), vec!["Chest Pain"]);
        app.toggle_symptom();
        assert!(app.selected_symptom_names().is_empty());
    }

    #[test]
    fn test_urgency_bands() {
        assert_eq!(UrgencyBand::from_estimate(0), UrgencyBand::Normal);
        assert_eq!(UrgencyBand::from_estimate(39), UrgencyBand::Normal);
        assert_eq!(UrgencyBand::from_estimate(40), UrgencyBand::Moderate);
        assert_eq!(UrgencyBand::from_estimate(69), UrgencyBand::Moderate);
        assert_eq!(UrgencyBand::from_estimate(70), UrgencyBand::Critical);
        assert_eq!(UrgencyBand::from_estimate(100), UrgencyBand::Critical);
    }

    #[test]
    fn test_urgency_estimate_clamps() {
        let (_dir, mut app) = app();
        app.urgency_estimate = 5;
        app.adjust_urgency_estimate(-10);
        assert_eq!(app.urgency_estimate, 0);
        app.adjust_urgency_estimate(200);
        assert_eq!(app.urgency_estimate, 100);
    }

    // -------------------------------------------------------------------------
    // Input Validation Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_can_add_username_char() {
        assert!(can_add_username_char(0, 'a'));
        assert!(can_add_username_char(49, 'z'));
        assert!(!can_add_username_char(50, 'a'));
        // Commas would corrupt the credential file rows
        assert!(!can_add_username_char(0, ','));
        assert!(!can_add_username_char(0, '\n'));
    }

    #[test]
    fn test_can_add_password_char() {
        assert!(can_add_password_char(0, 'a'));
        assert!(can_add_password_char(127, '!'));
        assert!(!can_add_password_char(128, 'a'));
        assert!(!can_add_password_char(0, '\x00'));
    }
}
