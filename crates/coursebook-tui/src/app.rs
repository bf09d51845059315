//! Application state management for Coursebook.
//!
//! `App` owns the stores and the UI state. Rendering reads the stores' live
//! views directly; the main loop calls `check_background_tasks` on every tick
//! to pick up error batches and finished logins.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use coursebook_core::api::ApiClient;
use coursebook_core::config::Config;
use coursebook_core::models::{Category, Course, CourseChanges, CourseId};
use coursebook_core::storage::FileStorage;
use coursebook_core::store::{CourseStore, CourseView, LoginHandle, SessionStore, SessionView};
use coursebook_core::{LoadingIndicator, MessagesChannel, MessagesSubscription, StoreError};

// ============================================================================
// Constants
// ============================================================================

/// Maximum length for the email field.
const MAX_EMAIL_LENGTH: usize = 80;

/// Maximum length for the password field.
const MAX_PASSWORD_LENGTH: usize = 128;

/// Maximum length for the course description field.
const MAX_DESCRIPTION_LENGTH: usize = 120;

/// Maximum length for the long description field.
const MAX_LONG_DESCRIPTION_LENGTH: usize = 1000;

/// Error lines kept for the messages panel; older ones are dropped.
const MAX_ERROR_MESSAGES: usize = 50;

/// Shown for any failed login, whatever the cause.
pub const LOGIN_FAILED_MESSAGE: &str = "Login Failed";

// ============================================================================
// UI State Types
// ============================================================================

/// The two category columns of the home listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Beginner,
    Advanced,
}

impl Column {
    pub fn category(&self) -> Category {
        match self {
            Column::Beginner => Category::Beginner,
            Column::Advanced => Category::Advanced,
        }
    }

    pub fn other(&self) -> Self {
        match self {
            Column::Beginner => Column::Advanced,
            Column::Advanced => Column::Beginner,
        }
    }
}

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    ShowingHelp,
    LoggingIn,
    EditingCourse,
    ConfirmingQuit,
    Quitting,
}

/// Login form focus state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoginFocus {
    Email,
    Password,
    Button,
}

/// Course dialog focus state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditFocus {
    Description,
    Category,
    LongDescription,
    Save,
}

impl EditFocus {
    pub fn next(&self) -> Self {
        match self {
            EditFocus::Description => EditFocus::Category,
            EditFocus::Category => EditFocus::LongDescription,
            EditFocus::LongDescription => EditFocus::Save,
            EditFocus::Save => EditFocus::Description,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            EditFocus::Description => EditFocus::Save,
            EditFocus::Category => EditFocus::Description,
            EditFocus::LongDescription => EditFocus::Category,
            EditFocus::Save => EditFocus::LongDescription,
        }
    }
}

/// Working copy of the course being edited
#[derive(Debug, Clone)]
pub struct CourseForm {
    pub course_id: CourseId,
    original: Course,
    pub description: String,
    pub category: Category,
    pub long_description: String,
    pub focus: EditFocus,
    pub error: Option<String>,
}

impl CourseForm {
    pub fn from_course(course: &Course) -> Self {
        Self {
            course_id: course.id.clone(),
            original: course.clone(),
            description: course.description.clone(),
            category: course.category.clone(),
            long_description: course.long_description.clone().unwrap_or_default(),
            focus: EditFocus::Description,
            error: None,
        }
    }

    /// Flip between the two known categories. Unknown categories switch to
    /// beginner.
    pub fn toggle_category(&mut self) {
        self.category = match self.category {
            Category::Beginner => Category::Advanced,
            _ => Category::Beginner,
        };
    }

    /// Required-field check, then the fields that differ from the course.
    pub fn to_changes(&self) -> Result<CourseChanges, &'static str> {
        let description = self.description.trim();
        if description.is_empty() {
            return Err("Description is required");
        }

        let mut changes = CourseChanges::new();
        if description != self.original.description.trim() {
            changes = changes.description(description);
        }
        if self.category != self.original.category {
            changes = changes.category(self.category.clone());
        }
        let long_description = self.long_description.trim();
        if long_description != self.original.long_description.as_deref().unwrap_or_default().trim() {
            changes = changes.long_description(long_description);
        }
        Ok(changes)
    }

    pub fn push_char(&mut self, c: char) {
        match self.focus {
            EditFocus::Description => {
                if can_add_char(self.description.chars().count(), MAX_DESCRIPTION_LENGTH, c) {
                    self.description.push(c);
                }
            }
            EditFocus::LongDescription => {
                if can_add_char(self.long_description.chars().count(), MAX_LONG_DESCRIPTION_LENGTH, c) {
                    self.long_description.push(c);
                }
            }
            EditFocus::Category => {
                if c == ' ' {
                    self.toggle_category();
                }
            }
            EditFocus::Save => {}
        }
    }

    pub fn pop_char(&mut self) {
        match self.focus {
            EditFocus::Description => {
                self.description.pop();
            }
            EditFocus::LongDescription => {
                self.long_description.pop();
            }
            EditFocus::Category | EditFocus::Save => {}
        }
    }
}

// ============================================================================
// Main Application Struct
// ============================================================================

/// Main application state container
pub struct App {
    // Core services
    pub config: Config,
    /// Where `config` is written back; `None` keeps it in memory only
    pub config_path: Option<PathBuf>,
    pub courses: CourseStore,
    pub session: SessionStore,
    pub loading: LoadingIndicator,
    errors: MessagesSubscription,

    // Live views
    pub beginner_courses: CourseView,
    pub advanced_courses: CourseView,
    pub logged_in: SessionView<bool>,

    // UI State
    pub state: AppState,
    pub column: Column,
    pub beginner_selection: usize,
    pub advanced_selection: usize,

    // Login form state
    pub login_email: String,
    pub login_password: String,
    pub login_focus: LoginFocus,
    pub login_error: Option<String>,
    pending_login: Option<LoginHandle>,

    // Course dialog state
    pub course_form: Option<CourseForm>,

    // Error batches from the messages channel, shown until dismissed
    pub error_messages: Vec<String>,

    // Status message
    pub status_message: Option<String>,
}

impl App {
    /// Create a new application instance. Starts loading courses.
    pub fn new(config: Config) -> Result<Self> {
        let base_url = config.api_base_url();
        debug!(base_url = %base_url, "Using backend");
        let api = Arc::new(ApiClient::new(&base_url)?);

        let data_dir = config.data_dir().unwrap_or_else(|e| {
            warn!(error = %e, "No data directory, using ./data");
            PathBuf::from("./data")
        });
        let storage = Arc::new(
            FileStorage::new(data_dir.clone())
                .with_context(|| format!("Failed to open storage in {}", data_dir.display()))?,
        );

        let loading = LoadingIndicator::new();
        let messages = MessagesChannel::new();
        // Subscribe before the store starts so a failed first load is seen
        let errors = messages.subscribe();

        let courses = CourseStore::new(api.clone(), loading.clone(), messages);
        let session = SessionStore::new(api, storage);

        let mut app = Self::with_stores(config, courses, session, loading, errors);
        app.config_path = Config::config_path()
            .map_err(|e| warn!(error = %e, "Config will not be saved"))
            .ok();
        Ok(app)
    }

    /// Assemble the app around already constructed stores.
    pub fn with_stores(
        config: Config,
        courses: CourseStore,
        session: SessionStore,
        loading: LoadingIndicator,
        errors: MessagesSubscription,
    ) -> Self {
        let login_email = config.login_email();
        let login_password = config.login_password();

        let mut app = Self {
            beginner_courses: courses.filter_by_category(Category::Beginner),
            advanced_courses: courses.filter_by_category(Category::Advanced),
            logged_in: session.is_logged_in(),

            config,
            config_path: None,
            courses,
            session,
            loading,
            errors,

            state: AppState::Normal,
            column: Column::Beginner,
            beginner_selection: 0,
            advanced_selection: 0,

            login_email,
            login_password,
            login_focus: LoginFocus::Email,
            login_error: None,
            pending_login: None,

            course_form: None,
            error_messages: Vec::new(),
            status_message: None,
        };

        if !app.logged_in.get() {
            app.start_login();
        }
        app
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Show the login form
    pub fn start_login(&mut self) {
        self.state = AppState::LoggingIn;
        self.login_focus = if self.login_email.is_empty() {
            LoginFocus::Email
        } else {
            LoginFocus::Password
        };
        self.login_error = None;
    }

    /// Submit the login form
    pub fn attempt_login(&mut self) {
        if self.pending_login.is_some() {
            return;
        }
        let email = self.login_email.trim().to_string();
        if email.is_empty() || self.login_password.is_empty() {
            self.login_error = Some("Email and password are required".to_string());
            return;
        }

        self.login_error = None;
        self.status_message = Some("Signing in...".to_string());
        self.pending_login = Some(self.session.login(&email, &self.login_password));
    }

    pub fn is_logging_in(&self) -> bool {
        self.pending_login.is_some()
    }

    fn check_pending_login(&mut self) {
        let outcome = match self.pending_login.as_ref().and_then(|handle| handle.peek()) {
            Some(outcome) => outcome,
            None => return,
        };
        self.pending_login = None;
        self.status_message = None;

        match outcome {
            Ok(user) => {
                info!(user = %user.display_name(), "Signed in");
                self.login_password.clear();
                self.login_error = None;
                self.state = AppState::Normal;

                self.config.last_email = Some(self.login_email.trim().to_string());
                if let Some(ref path) = self.config_path {
                    if let Err(e) = self.config.save_to(path) {
                        warn!(error = %e, "Failed to save config");
                    }
                }
            }
            Err(e) => {
                debug!(error = %e, "Login attempt failed");
                self.login_error = Some(LOGIN_FAILED_MESSAGE.to_string());
            }
        }
    }

    pub fn logout(&mut self) {
        self.session.logout();
        self.course_form = None;
        self.start_login();
    }

    // =========================================================================
    // Background results
    // =========================================================================

    /// Pick up error batches and finished logins
    pub fn check_background_tasks(&mut self) {
        while let Some(batch) = self.errors.try_recv() {
            self.error_messages.extend(batch);
        }
        if self.error_messages.len() > MAX_ERROR_MESSAGES {
            let excess = self.error_messages.len() - MAX_ERROR_MESSAGES;
            self.error_messages.drain(..excess);
        }
        self.check_pending_login();
        self.clamp_selections();
    }

    pub fn dismiss_errors(&mut self) {
        self.error_messages.clear();
    }

    // =========================================================================
    // Course listing
    // =========================================================================

    pub fn column_courses(&self, column: Column) -> Vec<Course> {
        match column {
            Column::Beginner => self.beginner_courses.get(),
            Column::Advanced => self.advanced_courses.get(),
        }
    }

    pub fn selection(&self, column: Column) -> usize {
        match column {
            Column::Beginner => self.beginner_selection,
            Column::Advanced => self.advanced_selection,
        }
    }

    fn selection_mut(&mut self, column: Column) -> &mut usize {
        match column {
            Column::Beginner => &mut self.beginner_selection,
            Column::Advanced => &mut self.advanced_selection,
        }
    }

    pub fn selected_course(&self) -> Option<Course> {
        self.column_courses(self.column)
            .get(self.selection(self.column))
            .cloned()
    }

    pub fn select_next(&mut self) {
        let len = self.column_courses(self.column).len();
        let selection = self.selection_mut(self.column);
        if *selection + 1 < len {
            *selection += 1;
        }
    }

    pub fn select_prev(&mut self) {
        let selection = self.selection_mut(self.column);
        *selection = selection.saturating_sub(1);
    }

    pub fn switch_column(&mut self) {
        self.column = self.column.other();
    }

    /// Keep selections inside their lists after edits move courses around
    fn clamp_selections(&mut self) {
        for column in [Column::Beginner, Column::Advanced] {
            let len = self.column_courses(column).len();
            let selection = self.selection_mut(column);
            if *selection >= len {
                *selection = len.saturating_sub(1);
            }
        }
    }

    // =========================================================================
    // Course editing
    // =========================================================================

    /// Open the edit dialog for the selected course
    pub fn start_edit(&mut self) {
        if let Some(course) = self.selected_course() {
            self.course_form = Some(CourseForm::from_course(&course));
            self.state = AppState::EditingCourse;
        }
    }

    pub fn cancel_edit(&mut self) {
        self.course_form = None;
        self.state = AppState::Normal;
    }

    /// Validate and save the dialog. The store applies the change right away,
    /// so the dialog closes without waiting for the backend.
    pub fn submit_edit(&mut self) {
        let Some(form) = self.course_form.as_mut() else {
            return;
        };
        let changes = match form.to_changes() {
            Ok(changes) => changes,
            Err(message) => {
                form.error = Some(message.to_string());
                return;
            }
        };

        if changes.is_empty() {
            self.cancel_edit();
            return;
        }

        match self.courses.save_course(form.course_id.clone(), changes) {
            Ok(_pending) => {
                debug!(course_id = %form.course_id, "Course edit submitted");
                self.course_form = None;
                self.state = AppState::Normal;
                self.clamp_selections();
            }
            Err(StoreError::CourseNotFound(_)) => {
                form.error = Some("This course no longer exists".to_string());
            }
            Err(e) => {
                form.error = Some(e.to_string());
            }
        }
    }

    /// Human-readable age of the course list for the status bar
    pub fn courses_age(&self) -> String {
        match self.courses.loaded_at() {
            Some(at) => crate::utils::format_age(at),
            None => "never".to_string(),
        }
    }
}

// ============================================================================
// Input validation helpers (exported for use in input.rs)
// ============================================================================

/// Check if a character is valid for input (no control characters)
fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

fn can_add_char(current_len: usize, max_len: usize, c: char) -> bool {
    current_len < max_len && is_valid_input_char(c)
}

/// Check if an email character should be accepted
pub fn can_add_email_char(current_len: usize, c: char) -> bool {
    can_add_char(current_len, MAX_EMAIL_LENGTH, c) && !c.is_whitespace()
}

/// Check if a password character should be accepted
pub fn can_add_password_char(current_len: usize, c: char) -> bool {
    can_add_char(current_len, MAX_PASSWORD_LENGTH, c)
}

// ============================================================================
// Tests
// ============================================================================
