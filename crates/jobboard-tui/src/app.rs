//! Application state management for the job board client.
//!
//! This module contains the core `App` struct that owns the session, the API
//! client and all view state, and coordinates background requests. Every
//! navigation goes through the route guard, and the guard is re-evaluated on
//! each frame so a logout immediately hides protected views.

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use jobboard_core::api::{ApiClient, ApiError};
use jobboard_core::auth::{guard, Route, SessionStore};
use jobboard_core::config::Config;
use jobboard_core::models::{
    has_applied, Application, Job, JobDraft, NewApplication, Profile, SignupForm,
};

use crate::form::{Form, FormField, MAX_SHORT_LENGTH, MAX_TEXT_LENGTH};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
const CHANNEL_BUFFER_SIZE: usize = 32;

/// Number of items to scroll on page up/down.
pub const PAGE_SCROLL_SIZE: usize = 10;

/// How long the signup success message stays before returning to login.
const SIGNUP_REDIRECT_DELAY: Duration = Duration::from_secs(2);

// Form field indices
pub const LOGIN_USERNAME: usize = 0;
pub const LOGIN_PASSWORD: usize = 1;
pub const LOGIN_SUBMIT: usize = 0;
pub const LOGIN_SIGNUP_LINK: usize = 1;

pub const SIGNUP_SUBMIT: usize = 0;
pub const SIGNUP_BACK: usize = 1;

pub const JOB_SAVE: usize = 0;
pub const JOB_CANCEL: usize = 1;

pub const APPLY_SUBMIT: usize = 0;

// ============================================================================
// UI State Types
// ============================================================================

/// Overall application state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppState {
    Normal,
    Searching,
    ShowingHelp,
    Applying,
    Confirming(Confirmation),
    Quitting,
}

/// Actions that need a yes/no before they run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirmation {
    Quit,
    DeleteJob(String),
    Withdraw(String),
}

impl Confirmation {
    pub fn prompt(&self) -> &'static str {
        match self {
            Confirmation::Quit => "Are you sure you want to quit?",
            Confirmation::DeleteJob(_) => "Are you sure you want to delete this job?",
            Confirmation::Withdraw(_) => "Are you sure you want to withdraw this application?",
        }
    }
}

/// A remote resource as seen by a view.
#[derive(Debug, Clone)]
pub enum Loadable<T> {
    NotLoaded,
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> Loadable<T> {
    pub fn loaded(&self) -> Option<&T> {
        match self {
            Loadable::Loaded(value) => Some(value),
            _ => None,
        }
    }
}

/// Outcome of the signup form, shown under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Error(String),
    Success(String),
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Results sent back from spawned requests through the MPSC channel.
///
/// Spawned tasks only perform I/O. All state changes, including session
/// transitions, happen when the main loop processes these messages.
#[derive(Debug)]
pub enum BackgroundResult {
    Login(Result<String, ApiError>),
    RestoredTokenChecked {
        token: String,
        result: Result<Profile, ApiError>,
    },
    Jobs {
        jobs: Result<Vec<Job>, ApiError>,
        applications: Result<Vec<Application>, ApiError>,
    },
    Applications(Result<Vec<Application>, ApiError>),
    JobDetail(Result<Job, ApiError>),
    JobForEdit(Result<Job, ApiError>),
    JobSaved {
        editing: Option<String>,
        result: Result<Job, ApiError>,
    },
    JobDeleted(Result<(), ApiError>),
    Applied(Result<Application, ApiError>),
    Withdrawn(Result<(), ApiError>),
    Profile(Result<Profile, ApiError>),
    ProfileSaved(Result<Profile, ApiError>),
    Signup(Result<(), ApiError>),
    SignupRedirect,
}

// ============================================================================
// Main Application Struct
// ============================================================================

/// Main application state container
pub struct App {
    // Core services
    pub config: Config,
    persist_config: bool,
    pub session: SessionStore,
    pub api: ApiClient,

    // UI State
    pub state: AppState,
    pub route: Route,
    pub search_query: String,
    pub status_message: Option<String>,

    // Forms
    pub login_form: Form,
    pub signup_form: Form,
    pub signup_notice: Option<Notice>,
    pub job_form: Form,
    pub job_form_error: Option<String>,
    pub profile_form: Form,
    pub apply_form: Form,

    // Remote data
    pub jobs: Loadable<Vec<Job>>,
    pub applications: Loadable<Vec<Application>>,
    pub job_detail: Loadable<Job>,
    pub profile: Loadable<Profile>,

    // Selection indices
    pub job_selection: usize,
    pub application_selection: usize,

    // Background task channel
    result_rx: mpsc::Receiver<BackgroundResult>,
    result_tx: mpsc::Sender<BackgroundResult>,
}

impl App {
    /// Create the application from configuration, restoring any remembered
    /// token from the durable slot.
    pub fn new(config: Config, session: SessionStore, mut api: ApiClient) -> Self {
        if let Some(token) = session.token() {
            api.set_token(token.to_string());
        }

        let (result_tx, result_rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        let mut login_form = Form::new(
            vec![
                FormField::text("Username", MAX_SHORT_LENGTH),
                FormField::masked("Password"),
            ],
            vec!["Sign in", "Sign Up"],
        );
        if let Some(ref username) = config.last_username {
            login_form.set_value(LOGIN_USERNAME, username);
            login_form.focus_field(LOGIN_PASSWORD);
        }

        Self {
            config,
            persist_config: true,
            session,
            api,

            state: AppState::Normal,
            route: Route::Login,
            search_query: String::new(),
            status_message: None,

            login_form,
            signup_form: Form::new(
                vec![
                    FormField::text("Username", MAX_SHORT_LENGTH),
                    FormField::text("Email", MAX_SHORT_LENGTH),
                    FormField::masked("Password"),
                    FormField::masked("Confirm Password"),
                ],
                vec!["Sign Up", "Back to Login"],
            ),
            signup_notice: None,
            job_form: Form::new(
                vec![
                    FormField::text("Title", MAX_SHORT_LENGTH * 4),
                    FormField::text("Description", MAX_TEXT_LENGTH),
                    FormField::text("Location", MAX_SHORT_LENGTH * 4),
                    FormField::text("Salary", MAX_SHORT_LENGTH),
                ],
                vec!["Save", "Cancel"],
            ),
            job_form_error: None,
            profile_form: Form::new(
                vec![
                    FormField::text("Bio", MAX_TEXT_LENGTH),
                    FormField::text("Skills", MAX_TEXT_LENGTH),
                    FormField::text("Contact", MAX_SHORT_LENGTH * 4),
                ],
                vec!["Update Profile"],
            ),
            apply_form: Form::new(
                vec![FormField::text("Cover letter", MAX_TEXT_LENGTH)],
                vec!["Apply", "Cancel"],
            ),

            jobs: Loadable::NotLoaded,
            applications: Loadable::NotLoaded,
            job_detail: Loadable::NotLoaded,
            profile: Loadable::NotLoaded,

            job_selection: 0,
            application_selection: 0,

            result_rx,
            result_tx,
        }
    }

    /// Keep configuration changes in memory only.
    pub fn without_config_persistence(mut self) -> Self {
        self.persist_config = false;
        self
    }

    /// Kick off startup work: optionally confirm a remembered token.
    pub fn start(&mut self) {
        let remembered = self.session.token().map(str::to_string);
        if let Some(token) = remembered.filter(|_| self.config.verify_restored_token) {
            info!("Verifying remembered token");
            self.status_message = Some("Checking saved session...".to_string());
            self.spawn(|api| async move {
                let result = api.fetch_my_profile().await;
                BackgroundResult::RestoredTokenChecked { token, result }
            });
        }
        self.navigate(Route::Jobs);
    }

    /// Run a request on the runtime and deliver its result to the main loop.
    fn spawn<F, Fut>(&self, task: F)
    where
        F: FnOnce(ApiClient) -> Fut + Send + 'static,
        Fut: Future<Output = BackgroundResult> + Send + 'static,
    {
        let api = self.api.clone();
        let tx = self.result_tx.clone();
        tokio::spawn(async move {
            let result = task(api).await;
            if tx.send(result).await.is_err() {
                debug!("Result channel closed, dropping background result");
            }
        });
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Move to `target`, subject to the route guard.
    pub fn navigate(&mut self, target: Route) {
        let target = if target == Route::Login && self.session.is_authenticated() {
            Route::Jobs
        } else {
            target
        };

        let decision = guard(self.session.state(), target);
        if decision.is_redirect() {
            debug!(route = ?decision.route(), "Guard redirected navigation");
        }
        self.route = decision.into_route();
        self.state = AppState::Normal;
        self.enter_route();
    }

    /// Re-check the guard for the current route. Called once per frame.
    pub fn enforce_guard(&mut self) {
        let decision = guard(self.session.state(), self.route.clone());
        if decision.is_redirect() {
            self.route = decision.into_route();
            if matches!(self.state, AppState::Applying | AppState::Searching) {
                self.state = AppState::Normal;
            }
        }
    }

    /// Load whatever the newly entered route displays.
    fn enter_route(&mut self) {
        match self.route.clone() {
            Route::Login => {
                if self.login_form.value(LOGIN_USERNAME).is_empty() {
                    self.login_form.focus_field(LOGIN_USERNAME);
                } else {
                    self.login_form.focus_field(LOGIN_PASSWORD);
                }
            }
            Route::Signup => {
                self.signup_form.clear();
                self.signup_notice = None;
            }
            Route::Jobs => self.refresh_jobs(),
            Route::JobDetail(id) => {
                self.job_detail = Loadable::Loading;
                self.spawn(move |api| async move {
                    BackgroundResult::JobDetail(api.fetch_job(&id).await)
                });
            }
            Route::NewJob => {
                self.job_form.clear();
                self.job_form_error = None;
            }
            Route::EditJob(id) => {
                self.job_form.clear();
                self.job_form_error = None;
                match self.job_detail.loaded().filter(|job| job.id == id) {
                    Some(job) => {
                        let draft = job.to_draft();
                        self.fill_job_form(&draft);
                    }
                    None => self.spawn(move |api| async move {
                        BackgroundResult::JobForEdit(api.fetch_job(&id).await)
                    }),
                }
            }
            Route::MyApplications => self.refresh_applications(),
            Route::Profile => self.refresh_profile(),
        }
    }

    /// Reload the data behind the current view.
    pub fn refresh_current(&mut self) {
        match self.route {
            Route::Jobs | Route::JobDetail(_) | Route::MyApplications | Route::Profile => {
                self.enter_route()
            }
            _ => {}
        }
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Submit the login form. A second submit while one is outstanding is
    /// refused by the session itself.
    pub fn submit_login(&mut self) {
        if let Err(e) = self.session.begin_login() {
            warn!(error = %e, "Ignoring login submit");
            return;
        }
        let username = self.login_form.value(LOGIN_USERNAME).to_string();
        let password = self.login_form.value(LOGIN_PASSWORD).to_string();
        info!(%username, "Attempting login");
        self.spawn(move |api| async move {
            BackgroundResult::Login(api.obtain_token(&username, &password).await)
        });
    }

    fn handle_login_result(&mut self, outcome: Result<String, ApiError>) {
        self.session.finish_login(outcome);

        if let Some(token) = self.session.token() {
            self.api.set_token(token.to_string());
        } else {
            self.api.clear_token();
        }

        if self.session.is_authenticated() {
            self.login_form.set_value(LOGIN_PASSWORD, "");
            let username = self.login_form.value(LOGIN_USERNAME).to_string();
            self.config.last_username = Some(username);
            if self.persist_config {
                if let Err(e) = self.config.save() {
                    warn!(error = %e, "Failed to save config");
                }
            }
            if self.route == Route::Login {
                self.navigate(Route::Jobs);
            }
        }
    }

    /// Apply the startup check of a remembered token. The answer is dropped
    /// once the session has moved on: a login started, succeeded or replaced
    /// the token, or the user logged out.
    fn handle_restored_token_result(&mut self, token: String, result: Result<Profile, ApiError>) {
        self.status_message = None;
        let still_pending = self.session.token() == Some(token.as_str())
            && !self.session.is_authenticated()
            && !self.session.is_loading();
        if !still_pending {
            debug!("Discarding outdated remembered token check");
            return;
        }

        match result {
            Ok(profile) => {
                info!("Remembered token accepted");
                self.session.confirm_restored_token();
                self.profile = Loadable::Loaded(profile);
                if self.route == Route::Login {
                    self.navigate(Route::Jobs);
                }
            }
            Err(ApiError::Unauthorized) => {
                info!("Remembered token rejected, clearing it");
                self.session.logout();
                self.api.clear_token();
            }
            Err(e) => {
                warn!(error = %e, "Could not verify remembered token");
            }
        }
    }

    /// Log out locally and return to the login view.
    pub fn logout(&mut self) {
        self.session.logout();
        self.api.clear_token();
        self.jobs = Loadable::NotLoaded;
        self.applications = Loadable::NotLoaded;
        self.job_detail = Loadable::NotLoaded;
        self.profile = Loadable::NotLoaded;
        self.profile_form.clear();
        self.search_query.clear();
        self.status_message = None;
        self.navigate(Route::Login);
    }

    pub fn submit_signup(&mut self) {
        let form = SignupForm {
            username: self.signup_form.value(0).to_string(),
            email: self.signup_form.value(1).to_string(),
            password: self.signup_form.value(2).to_string(),
            password2: self.signup_form.value(3).to_string(),
            ..SignupForm::default()
        };

        self.signup_notice = None;
        if let Err(e) = form.validate() {
            self.signup_notice = Some(Notice::Error(e.to_string()));
            return;
        }

        self.spawn(move |api| async move { BackgroundResult::Signup(api.signup(&form).await) });
    }

    fn handle_signup_result(&mut self, result: Result<(), ApiError>) {
        match result {
            Ok(()) => {
                info!("Signup successful");
                let username = self.signup_form.value(0).to_string();
                self.login_form.set_value(LOGIN_USERNAME, &username);
                self.signup_notice = Some(Notice::Success(
                    "Signup successful! Redirecting to login...".to_string(),
                ));
                self.spawn(|_| async move {
                    tokio::time::sleep(SIGNUP_REDIRECT_DELAY).await;
                    BackgroundResult::SignupRedirect
                });
            }
            Err(e) => {
                warn!(error = %e, "Signup failed");
                let message = e
                    .field_message()
                    .unwrap_or_else(|| "Signup failed.".to_string());
                self.signup_notice = Some(Notice::Error(message));
            }
        }
    }

    // =========================================================================
    // Jobs
    // =========================================================================

    /// Fetch job listings and the user's applications together, so the list
    /// can mark jobs already applied to.
    pub fn refresh_jobs(&mut self) {
        self.jobs = Loadable::Loading;
        self.applications = Loadable::Loading;
        self.spawn(|api| async move {
            let (jobs, applications) =
                futures::join!(api.fetch_jobs(), api.fetch_applications());
            BackgroundResult::Jobs { jobs, applications }
        });
    }

    pub fn refresh_applications(&mut self) {
        self.applications = Loadable::Loading;
        self.spawn(|api| async move {
            BackgroundResult::Applications(api.fetch_applications().await)
        });
    }

    /// Jobs matching the current search, in server order.
    pub fn filtered_jobs(&self) -> Vec<&Job> {
        self.jobs
            .loaded()
            .map(|jobs| jobs.iter().filter(|j| j.matches(&self.search_query)).collect())
            .unwrap_or_default()
    }

    pub fn selected_job(&self) -> Option<&Job> {
        self.filtered_jobs().get(self.job_selection).copied()
    }

    pub fn has_applied(&self, job_id: &str) -> bool {
        self.applications
            .loaded()
            .map(|apps| has_applied(apps, job_id))
            .unwrap_or(false)
    }

    pub fn open_selected_job(&mut self) {
        if let Some(id) = self.selected_job().map(|j| j.id.clone()) {
            self.navigate(Route::JobDetail(id));
        }
    }

    fn fill_job_form(&mut self, draft: &JobDraft) {
        self.job_form.set_value(0, &draft.title);
        self.job_form.set_value(1, &draft.description);
        self.job_form.set_value(2, &draft.location);
        self.job_form.set_value(3, &draft.salary);
    }

    pub fn job_form_draft(&self) -> JobDraft {
        JobDraft {
            title: self.job_form.value(0).to_string(),
            description: self.job_form.value(1).to_string(),
            location: self.job_form.value(2).to_string(),
            salary: self.job_form.value(3).to_string(),
        }
    }

    pub fn submit_job_form(&mut self) {
        let draft = self.job_form_draft();
        if let Err(e) = draft.validate() {
            self.job_form_error = Some(e.to_string());
            return;
        }
        self.job_form_error = None;

        let editing = match self.route {
            Route::EditJob(ref id) => Some(id.clone()),
            _ => None,
        };
        self.spawn(move |api| async move {
            let result = match editing {
                Some(ref id) => api.update_job(id, &draft).await,
                None => api.create_job(&draft).await,
            };
            BackgroundResult::JobSaved { editing, result }
        });
    }

    /// Leave the job form without saving.
    pub fn cancel_job_form(&mut self) {
        match self.route.clone() {
            Route::EditJob(id) => self.navigate(Route::JobDetail(id)),
            _ => self.navigate(Route::Jobs),
        }
    }

    fn handle_job_saved(&mut self, editing: Option<String>, result: Result<Job, ApiError>) {
        match result {
            Ok(job) => {
                info!(job_id = %job.id, "Job saved");
                self.status_message = Some("Job saved.".to_string());
                match editing {
                    Some(id) => self.navigate(Route::JobDetail(id)),
                    None => self.navigate(Route::Jobs),
                }
            }
            Err(e) => {
                warn!(error = %e, "Failed to save job");
                self.job_form_error = Some("Failed to save job.".to_string());
            }
        }
    }

    pub fn delete_job(&mut self, id: String) {
        self.spawn(move |api| async move { BackgroundResult::JobDeleted(api.delete_job(&id).await) });
    }

    // =========================================================================
    // Applications
    // =========================================================================

    pub fn start_apply(&mut self) {
        if let Route::JobDetail(ref id) = self.route {
            if self.has_applied(id) {
                self.status_message = Some("You have already applied to this job.".to_string());
                return;
            }
            self.apply_form.clear();
            self.state = AppState::Applying;
        }
    }

    pub fn submit_apply(&mut self) {
        self.state = AppState::Normal;
        let Route::JobDetail(ref id) = self.route else {
            return;
        };
        let application = NewApplication::new(id.clone(), self.apply_form.value(0).trim());
        self.spawn(move |api| async move {
            BackgroundResult::Applied(api.apply(&application).await)
        });
    }

    pub fn selected_application(&self) -> Option<&Application> {
        self.applications
            .loaded()
            .and_then(|apps| apps.get(self.application_selection))
    }

    pub fn withdraw(&mut self, id: String) {
        self.spawn(move |api| async move {
            BackgroundResult::Withdrawn(api.withdraw_application(&id).await)
        });
    }

    // =========================================================================
    // Profile
    // =========================================================================

    pub fn refresh_profile(&mut self) {
        self.profile = Loadable::Loading;
        self.spawn(|api| async move { BackgroundResult::Profile(api.fetch_my_profile().await) });
    }

    pub fn submit_profile(&mut self) {
        let Some(profile) = self.profile.loaded() else {
            return;
        };
        let id = profile.id.clone();
        let mut update = profile.to_update();
        update.bio = self.profile_form.value(0).to_string();
        update.skills = self.profile_form.value(1).to_string();
        update.contact = self.profile_form.value(2).to_string();

        self.spawn(move |api| async move {
            BackgroundResult::ProfileSaved(api.update_profile(&id, &update).await)
        });
    }

    fn fill_profile_form(&mut self, profile: &Profile) {
        self.profile_form.set_value(0, &profile.bio);
        self.profile_form.set_value(1, &profile.skills);
        self.profile_form.set_value(2, &profile.contact);
    }

    // =========================================================================
    // Background results
    // =========================================================================

    /// Apply every result that has arrived since the last frame.
    pub fn check_background_tasks(&mut self) {
        while let Ok(result) = self.result_rx.try_recv() {
            self.process_result(result);
        }
    }

    /// Wait for the next background result and apply it.
    #[cfg(test)]
    pub async fn wait_for_result(&mut self) -> Option<()> {
        let result = self.result_rx.recv().await?;
        self.process_result(result);
        Some(())
    }

    fn process_result(&mut self, result: BackgroundResult) {
        match result {
            BackgroundResult::Login(outcome) => self.handle_login_result(outcome),
            BackgroundResult::RestoredTokenChecked { token, result } => {
                self.handle_restored_token_result(token, result)
            }
            BackgroundResult::Jobs { jobs, applications } => {
                self.jobs = match jobs {
                    Ok(jobs) => {
                        debug!(count = jobs.len(), "Jobs loaded");
                        self.job_selection = self.job_selection.min(jobs.len().saturating_sub(1));
                        Loadable::Loaded(jobs)
                    }
                    Err(e) => {
                        warn!(error = %e, "Failed to load jobs");
                        Loadable::Failed("Failed to load jobs.".to_string())
                    }
                };
                self.process_result(BackgroundResult::Applications(applications));
            }
            BackgroundResult::Applications(result) => {
                self.applications = match result {
                    Ok(apps) => {
                        self.application_selection =
                            self.application_selection.min(apps.len().saturating_sub(1));
                        Loadable::Loaded(apps)
                    }
                    Err(e) => {
                        warn!(error = %e, "Failed to load applications");
                        Loadable::Failed("Failed to load applications.".to_string())
                    }
                };
            }
            BackgroundResult::JobDetail(result) => {
                self.job_detail = match result {
                    Ok(job) => Loadable::Loaded(job),
                    Err(e) => {
                        warn!(error = %e, "Failed to load job details");
                        Loadable::Failed("Error loading job details.".to_string())
                    }
                };
            }
            BackgroundResult::JobForEdit(result) => match result {
                Ok(job) => {
                    if self.route == Route::EditJob(job.id.clone()) {
                        self.fill_job_form(&job.to_draft());
                    }
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load job for editing");
                    self.job_form_error = Some("Error loading job details.".to_string());
                }
            },
            BackgroundResult::JobSaved { editing, result } => self.handle_job_saved(editing, result),
            BackgroundResult::JobDeleted(result) => match result {
                Ok(()) => {
                    self.status_message = Some("Job deleted.".to_string());
                    self.navigate(Route::Jobs);
                }
                Err(e) => {
                    warn!(error = %e, "Failed to delete job");
                    self.status_message = Some("Failed to delete job.".to_string());
                }
            },
            BackgroundResult::Applied(result) => match result {
                Ok(_) => {
                    self.status_message = Some("Application submitted.".to_string());
                    self.refresh_applications();
                }
                Err(e) => {
                    warn!(error = %e, "Failed to apply");
                    let message = e
                        .field_message()
                        .unwrap_or_else(|| "Failed to apply.".to_string());
                    self.status_message = Some(message);
                }
            },
            BackgroundResult::Withdrawn(result) => match result {
                Ok(()) => {
                    self.status_message = Some("Application withdrawn.".to_string());
                    self.refresh_applications();
                }
                Err(e) => {
                    warn!(error = %e, "Failed to withdraw application");
                    self.status_message = Some("Failed to withdraw application.".to_string());
                }
            },
            BackgroundResult::Profile(result) => {
                self.profile = match result {
                    Ok(profile) => {
                        self.fill_profile_form(&profile);
                        Loadable::Loaded(profile)
                    }
                    Err(e) => {
                        warn!(error = %e, "Failed to load profile");
                        Loadable::Failed("Failed to load profile.".to_string())
                    }
                };
            }
            BackgroundResult::ProfileSaved(result) => match result {
                Ok(_) => {
                    self.status_message = Some("Profile updated successfully!".to_string());
                    self.refresh_profile();
                }
                Err(e) => {
                    warn!(error = %e, "Failed to update profile");
                    self.status_message = Some("Failed to update profile.".to_string());
                }
            },
            BackgroundResult::Signup(result) => self.handle_signup_result(result),
            BackgroundResult::SignupRedirect => {
                if self.route == Route::Signup {
                    self.navigate(Route::Login);
                }
            }
        }
    }

    /// Ask for confirmation before running `action`.
    pub fn confirm(&mut self, action: Confirmation) {
        self.state = AppState::Confirming(action);
    }

    /// Run a confirmed action.
    pub fn run_confirmed(&mut self, action: Confirmation) {
        self.state = AppState::Normal;
        match action {
            Confirmation::Quit => self.state = AppState::Quitting,
            Confirmation::DeleteJob(id) => self.delete_job(id),
            Confirmation::Withdraw(id) => self.withdraw(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobboard_core::auth::{MemoryTokenStore, TokenStore};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn app_for(server: &MockServer, store: &MemoryTokenStore, config: Config) -> App {
        let api = ApiClient::new(&format!("{}/api", server.uri()))
            .expect("client should build")
            .with_initial_backoff(Duration::from_millis(1));
        let session = SessionStore::initialize(Box::new(store.clone()));
        App::new(config, session, api).without_config_persistence()
    }

    async fn mount_token(server: &MockServer, status: u16, expected_calls: u64) {
        let response = if status == 200 {
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"access": "abc123"}))
        } else {
            ResponseTemplate::new(status)
        };
        Mock::given(method("POST"))
            .and(path("/api/auth/token/"))
            .respond_with(response)
            .expect(expected_calls)
            .mount(server)
            .await;
    }

    fn type_credentials(app: &mut App) {
        app.login_form.set_value(LOGIN_USERNAME, "alice");
        app.login_form.set_value(LOGIN_PASSWORD, "Secret1!");
    }

    #[tokio::test]
    async fn test_starts_on_login_when_not_authenticated() {
        let server = MockServer::start().await;
        let store = MemoryTokenStore::new();
        let mut app = app_for(&server, &store, Config::default());

        app.start();
        assert_eq!(app.route, Route::Login);

        app.navigate(Route::Profile);
        assert_eq!(app.route, Route::Login);
    }

    #[tokio::test]
    async fn test_successful_login_opens_jobs() {
        let server = MockServer::start().await;
        mount_token(&server, 200, 1).await;
        Mock::given(method("GET"))
            .and(path("/api/jobs/"))
            .and(header("authorization", "Bearer abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": "j1", "title": "Rust Developer", "description": "d",
                 "location": "Remote", "salary": "100000"}
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/applications/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let store = MemoryTokenStore::new();
        let mut app = app_for(&server, &store, Config::default());
        type_credentials(&mut app);

        app.submit_login();
        assert!(app.session.is_loading());
        app.wait_for_result().await.expect("login result");

        assert!(app.session.is_authenticated());
        assert_eq!(app.route, Route::Jobs);
        assert_eq!(store.load().expect("load").as_deref(), Some("abc123"));
        assert_eq!(app.login_form.value(LOGIN_PASSWORD), "");
        assert_eq!(app.config.last_username.as_deref(), Some("alice"));

        app.wait_for_result().await.expect("jobs result");
        assert_eq!(app.filtered_jobs().len(), 1);
        assert!(!app.has_applied("j1"));
    }

    #[tokio::test]
    async fn test_rejected_login_shows_message() {
        let server = MockServer::start().await;
        mount_token(&server, 401, 1).await;

        let store = MemoryTokenStore::new();
        let mut app = app_for(&server, &store, Config::default());
        type_credentials(&mut app);

        app.submit_login();
        app.wait_for_result().await.expect("login result");

        assert!(!app.session.is_authenticated());
        assert_eq!(app.session.error(), Some("Wrong username/password"));
        assert_eq!(app.route, Route::Login);
        assert_eq!(store.load().expect("load"), None);
    }

    #[tokio::test]
    async fn test_server_error_is_network_error() {
        let server = MockServer::start().await;
        mount_token(&server, 500, 1).await;

        let store = MemoryTokenStore::new();
        let mut app = app_for(&server, &store, Config::default());
        type_credentials(&mut app);

        app.submit_login();
        app.wait_for_result().await.expect("login result");
        assert_eq!(app.session.error(), Some("Network error"));
    }

    #[tokio::test]
    async fn test_second_submit_while_loading_is_ignored() {
        let server = MockServer::start().await;
        mount_token(&server, 401, 1).await;

        let store = MemoryTokenStore::new();
        let mut app = app_for(&server, &store, Config::default());
        type_credentials(&mut app);

        app.submit_login();
        app.submit_login();
        app.wait_for_result().await.expect("login result");
        assert!(!app.session.is_loading());
    }

    #[tokio::test]
    async fn test_logout_redirects_protected_views() {
        let server = MockServer::start().await;
        mount_token(&server, 200, 1).await;

        let store = MemoryTokenStore::new();
        let mut app = app_for(&server, &store, Config::default());
        type_credentials(&mut app);
        app.submit_login();
        app.wait_for_result().await.expect("login result");
        assert!(app.session.is_authenticated());

        app.logout();
        assert_eq!(app.route, Route::Login);
        assert!(!app.api.has_token());
        assert_eq!(store.load().expect("load"), None);

        app.route = Route::MyApplications;
        app.enforce_guard();
        assert_eq!(app.route, Route::Login);
    }

    #[tokio::test]
    async fn test_restored_token_is_not_trusted_by_default() {
        let server = MockServer::start().await;
        let store = MemoryTokenStore::with_token("saved");
        let mut app = app_for(&server, &store, Config::default());

        assert!(app.api.has_token());
        app.start();
        assert!(!app.session.is_authenticated());
        assert_eq!(app.route, Route::Login);
    }

    #[tokio::test]
    async fn test_verified_restored_token_signs_in() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/profiles/me/"))
            .and(header("authorization", "Bearer saved"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                serde_json::json!({"id": "p1", "bio": "b", "skills": "rust", "contact": "c"}),
            ))
            .expect(1)
            .mount(&server)
            .await;

        let store = MemoryTokenStore::with_token("saved");
        let config = Config {
            verify_restored_token: true,
            ..Config::default()
        };
        let mut app = app_for(&server, &store, config);

        app.start();
        assert_eq!(app.route, Route::Login);
        app.wait_for_result().await.expect("verification result");

        assert!(app.session.is_authenticated());
        assert_eq!(app.route, Route::Jobs);
    }

    #[tokio::test]
    async fn test_rejected_restored_token_is_cleared() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/profiles/me/"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let store = MemoryTokenStore::with_token("stale");
        let config = Config {
            verify_restored_token: true,
            ..Config::default()
        };
        let mut app = app_for(&server, &store, config);

        app.start();
        app.wait_for_result().await.expect("verification result");

        assert!(!app.session.is_authenticated());
        assert!(!app.api.has_token());
        assert_eq!(store.load().expect("load"), None);
        assert_eq!(app.route, Route::Login);
    }

    #[tokio::test]
    async fn test_late_rejection_of_remembered_token_keeps_new_login() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/profiles/me/"))
            .and(header("authorization", "Bearer stale"))
            .respond_with(ResponseTemplate::new(401).set_delay(Duration::from_millis(300)))
            .mount(&server)
            .await;
        mount_token(&server, 200, 1).await;

        let store = MemoryTokenStore::with_token("stale");
        let config = Config {
            verify_restored_token: true,
            ..Config::default()
        };
        let mut app = app_for(&server, &store, config);

        app.start();
        type_credentials(&mut app);
        app.submit_login();

        // Login result, the jobs load it triggers, then the delayed check.
        for _ in 0..3 {
            app.wait_for_result().await.expect("background result");
        }

        assert!(app.session.is_authenticated());
        assert_eq!(app.session.token(), Some("abc123"));
        assert_eq!(store.load().expect("load").as_deref(), Some("abc123"));
        assert!(app.api.has_token());
        assert_eq!(app.route, Route::Jobs);
    }

    #[tokio::test]
    async fn test_remembered_token_check_ignored_after_logout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/profiles/me/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"id": "p1", "bio": "", "skills": "", "contact": ""}))
                    .set_delay(Duration::from_millis(200)),
            )
            .mount(&server)
            .await;

        let store = MemoryTokenStore::with_token("saved");
        let config = Config {
            verify_restored_token: true,
            ..Config::default()
        };
        let mut app = app_for(&server, &store, config);

        app.start();
        app.logout();
        app.wait_for_result().await.expect("verification result");

        assert!(!app.session.is_authenticated());
        assert_eq!(app.route, Route::Login);
        assert_eq!(store.load().expect("load"), None);
    }

    #[tokio::test]
    async fn test_signup_validation_stays_local() {
        let server = MockServer::start().await;
        let store = MemoryTokenStore::new();
        let mut app = app_for(&server, &store, Config::default());

        app.navigate(Route::Signup);
        app.signup_form.set_value(0, "bob");
        app.signup_form.set_value(1, "bob@example.com");
        app.signup_form.set_value(2, "Secret1!");
        app.signup_form.set_value(3, "Secret2!");
        app.submit_signup();

        assert_eq!(
            app.signup_notice,
            Some(Notice::Error("Passwords do not match.".to_string()))
        );
    }

    #[tokio::test]
    async fn test_signup_server_error_uses_field_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/signup/"))
            .respond_with(ResponseTemplate::new(400).set_body_json(
                serde_json::json!({"username": ["A user with that username already exists."]}),
            ))
            .mount(&server)
            .await;

        let store = MemoryTokenStore::new();
        let mut app = app_for(&server, &store, Config::default());
        app.navigate(Route::Signup);
        app.signup_form.set_value(0, "bob");
        app.signup_form.set_value(1, "bob@example.com");
        app.signup_form.set_value(2, "Secret1!");
        app.signup_form.set_value(3, "Secret1!");
        app.submit_signup();
        app.wait_for_result().await.expect("signup result");

        assert_eq!(
            app.signup_notice,
            Some(Notice::Error(
                "A user with that username already exists.".to_string()
            ))
        );
    }

    #[test]
    fn test_loadable_accessors() {
        let loaded: Loadable<Vec<u8>> = Loadable::Loaded(vec![1]);
        assert_eq!(loaded.loaded().map(Vec::len), Some(1));
        assert!(Loadable::<u8>::Loading.loaded().is_none());
        assert!(Loadable::<u8>::Failed("x".to_string()).loaded().is_none());
    }
}
