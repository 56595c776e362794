//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes. Form views receive every key while a text
//! field has focus; global shortcuts apply once focus is on a button.

use crossterm::event::{KeyCode, KeyEvent};

use jobboard_core::auth::Route;

use crate::app::{
    App, AppState, Confirmation, APPLY_SUBMIT, JOB_CANCEL, JOB_SAVE, LOGIN_SIGNUP_LINK,
    LOGIN_SUBMIT, PAGE_SCROLL_SIZE, SIGNUP_BACK, SIGNUP_SUBMIT,
};
use crate::form::FormAction;

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> bool {
    match app.state.clone() {
        AppState::ShowingHelp => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                app.state = AppState::Normal;
            }
            false
        }
        AppState::Confirming(action) => {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    app.run_confirmed(action);
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    app.state = AppState::Normal;
                }
                _ => {}
            }
            app.state == AppState::Quitting
        }
        AppState::Applying => {
            match app.apply_form.handle_key(key) {
                FormAction::Button(APPLY_SUBMIT) => app.submit_apply(),
                FormAction::Button(_) | FormAction::Cancel => app.state = AppState::Normal,
                FormAction::None => {}
            }
            false
        }
        AppState::Searching => {
            handle_search_input(app, key);
            false
        }
        AppState::Quitting => true,
        AppState::Normal => {
            handle_normal_input(app, key);
            app.state == AppState::Quitting
        }
    }
}

fn handle_search_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.search_query.clear();
            app.state = AppState::Normal;
        }
        KeyCode::Enter => app.state = AppState::Normal,
        KeyCode::Backspace => {
            app.search_query.pop();
        }
        KeyCode::Char(c) => app.search_query.push(c),
        _ => return,
    }
    app.job_selection = 0;
}

fn handle_normal_input(app: &mut App, key: KeyEvent) {
    if route_has_text_focus(app) {
        handle_form_input(app, key);
        return;
    }

    if handle_global_key(app, key) {
        return;
    }

    match app.route.clone() {
        Route::Login | Route::Signup | Route::NewJob | Route::EditJob(_) | Route::Profile => {
            handle_form_input(app, key)
        }
        Route::Jobs => handle_jobs_input(app, key),
        Route::JobDetail(id) => handle_detail_input(app, key, id),
        Route::MyApplications => handle_applications_input(app, key),
    }
}

/// Whether the current view is a form with a text field focused.
fn route_has_text_focus(app: &App) -> bool {
    let form = match app.route {
        Route::Login => &app.login_form,
        Route::Signup => &app.signup_form,
        Route::NewJob | Route::EditJob(_) => &app.job_form,
        Route::Profile => &app.profile_form,
        _ => return false,
    };
    form.focused_field().is_some()
}

/// Shortcuts available from every view. Returns true if the key was used.
fn handle_global_key(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('?') => app.state = AppState::ShowingHelp,
        KeyCode::Char('q') => app.confirm(Confirmation::Quit),
        _ if !app.session.is_authenticated() => return false,
        KeyCode::Char('1') => app.navigate(Route::Jobs),
        KeyCode::Char('2') => app.navigate(Route::MyApplications),
        KeyCode::Char('3') => app.navigate(Route::Profile),
        KeyCode::Char('L') => app.logout(),
        _ => return false,
    }
    true
}

fn handle_form_input(app: &mut App, key: KeyEvent) {
    match app.route.clone() {
        Route::Login => match app.login_form.handle_key(key) {
            FormAction::Button(LOGIN_SUBMIT) => app.submit_login(),
            FormAction::Button(LOGIN_SIGNUP_LINK) => app.navigate(Route::Signup),
            FormAction::Cancel => app.confirm(Confirmation::Quit),
            _ => {}
        },
        Route::Signup => match app.signup_form.handle_key(key) {
            FormAction::Button(SIGNUP_SUBMIT) => app.submit_signup(),
            FormAction::Button(SIGNUP_BACK) | FormAction::Cancel => app.navigate(Route::Login),
            _ => {}
        },
        Route::NewJob | Route::EditJob(_) => match app.job_form.handle_key(key) {
            FormAction::Button(JOB_SAVE) => app.submit_job_form(),
            FormAction::Button(JOB_CANCEL) | FormAction::Cancel => app.cancel_job_form(),
            _ => {}
        },
        Route::Profile => match app.profile_form.handle_key(key) {
            FormAction::Button(_) => app.submit_profile(),
            FormAction::Cancel => app.navigate(Route::Jobs),
            FormAction::None => {}
        },
        _ => {}
    }
}

/// Move a list selection by `delta`, clamped to `len`.
fn move_selection(selection: &mut usize, len: usize, delta: isize) {
    if len == 0 {
        *selection = 0;
        return;
    }
    let next = (*selection as isize + delta).clamp(0, len as isize - 1);
    *selection = next as usize;
}

fn list_delta(code: KeyCode) -> Option<isize> {
    match code {
        KeyCode::Up | KeyCode::Char('k') => Some(-1),
        KeyCode::Down | KeyCode::Char('j') => Some(1),
        KeyCode::PageUp => Some(-(PAGE_SCROLL_SIZE as isize)),
        KeyCode::PageDown => Some(PAGE_SCROLL_SIZE as isize),
        KeyCode::Home => Some(isize::MIN / 2),
        KeyCode::End => Some(isize::MAX / 2),
        _ => None,
    }
}

fn handle_jobs_input(app: &mut App, key: KeyEvent) {
    if let Some(delta) = list_delta(key.code) {
        let len = app.filtered_jobs().len();
        move_selection(&mut app.job_selection, len, delta);
        return;
    }
    match key.code {
        KeyCode::Enter => app.open_selected_job(),
        KeyCode::Char('/') => app.state = AppState::Searching,
        KeyCode::Char('n') => app.navigate(Route::NewJob),
        KeyCode::Char('r') => app.refresh_current(),
        KeyCode::Esc => {
            app.search_query.clear();
            app.job_selection = 0;
        }
        _ => {}
    }
}

fn handle_detail_input(app: &mut App, key: KeyEvent, id: String) {
    match key.code {
        KeyCode::Char('a') => app.start_apply(),
        KeyCode::Char('e') => app.navigate(Route::EditJob(id)),
        KeyCode::Char('D') => app.confirm(Confirmation::DeleteJob(id)),
        KeyCode::Char('r') => app.refresh_current(),
        KeyCode::Esc | KeyCode::Backspace => app.navigate(Route::Jobs),
        _ => {}
    }
}

fn handle_applications_input(app: &mut App, key: KeyEvent) {
    if let Some(delta) = list_delta(key.code) {
        let len = app.applications.loaded().map(Vec::len).unwrap_or(0);
        move_selection(&mut app.application_selection, len, delta);
        return;
    }
    match key.code {
        KeyCode::Enter => {
            if let Some(job_id) = app.selected_application().map(|a| a.job.id.clone()) {
                app.navigate(Route::JobDetail(job_id));
            }
        }
        KeyCode::Char('w') => {
            if let Some(id) = app.selected_application().map(|a| a.id.clone()) {
                app.confirm(Confirmation::Withdraw(id));
            }
        }
        KeyCode::Char('r') => app.refresh_current(),
        _ => {}
    }
}
