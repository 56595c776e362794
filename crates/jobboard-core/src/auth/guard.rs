//! Route guarding.
//!
//! `guard` decides, from the current session value alone, whether a view is
//! rendered or the user is sent to the login view. It performs no I/O.

use super::SessionState;

/// Views of the job board client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Signup,
    Jobs,
    JobDetail(String),
    NewJob,
    EditJob(String),
    MyApplications,
    Profile,
}

impl Route {
    /// Whether the route requires an authenticated session.
    pub fn is_protected(&self) -> bool {
        !matches!(self, Route::Login | Route::Signup)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Login => "Login",
            Route::Signup => "Sign Up",
            Route::Jobs => "Job Listings",
            Route::JobDetail(_) => "Job Details",
            Route::NewJob => "Create Job",
            Route::EditJob(_) => "Edit Job",
            Route::MyApplications => "My Applications",
            Route::Profile => "My Profile",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Render(Route),
    Redirect(Route),
}

impl GuardDecision {
    /// The route that ends up on screen.
    pub fn route(&self) -> &Route {
        match self {
            GuardDecision::Render(route) | GuardDecision::Redirect(route) => route,
        }
    }

    pub fn into_route(self) -> Route {
        match self {
            GuardDecision::Render(route) | GuardDecision::Redirect(route) => route,
        }
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, GuardDecision::Redirect(_))
    }
}

/// Whether protected content is currently reachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessState {
    GuardedOut,
    GuardedIn,
}

impl AccessState {
    pub fn of(session: &SessionState) -> Self {
        if session.is_authenticated() {
            AccessState::GuardedIn
        } else {
            AccessState::GuardedOut
        }
    }
}

/// Render `target` if allowed, otherwise redirect to the login view.
pub fn guard(session: &SessionState, target: Route) -> GuardDecision {
    if !target.is_protected() || session.is_authenticated() {
        GuardDecision::Render(target)
    } else {
        GuardDecision::Redirect(Route::Login)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::session::SessionEvent;

    fn authenticated() -> SessionState {
        SessionState::default()
            .apply(SessionEvent::LoginStarted)
            .and_then(|t| t.state.apply(SessionEvent::LoginSucceeded("abc123".to_string())))
            .expect("transition")
            .state
    }

    #[test]
    fn test_unauthenticated_redirects_to_login() {
        let session = SessionState::default();
        assert_eq!(guard(&session, Route::Jobs), GuardDecision::Redirect(Route::Login));
        assert_eq!(
            guard(&session, Route::JobDetail("j1".to_string())),
            GuardDecision::Redirect(Route::Login)
        );
        assert_eq!(guard(&session, Route::Profile), GuardDecision::Redirect(Route::Login));
    }

    #[test]
    fn test_authenticated_renders() {
        let session = authenticated();
        assert_eq!(guard(&session, Route::Jobs), GuardDecision::Render(Route::Jobs));
        assert_eq!(
            guard(&session, Route::MyApplications),
            GuardDecision::Render(Route::MyApplications)
        );
    }

    #[test]
    fn test_public_routes_always_render() {
        let session = SessionState::default();
        assert_eq!(guard(&session, Route::Login), GuardDecision::Render(Route::Login));
        assert_eq!(guard(&session, Route::Signup), GuardDecision::Render(Route::Signup));
    }

    #[test]
    fn test_restored_token_still_redirects() {
        let session = SessionState::restored(Some("xyz".to_string()));
        assert_eq!(session.token(), Some("xyz"));
        let decision = guard(&session, Route::Jobs);
        assert!(decision.is_redirect());
        assert_eq!(decision.route(), &Route::Login);
        assert_eq!(AccessState::of(&session), AccessState::GuardedOut);
    }

    #[test]
    fn test_access_state_follows_session() {
        let session = authenticated();
        assert_eq!(AccessState::of(&session), AccessState::GuardedIn);

        let logged_out = session
            .apply(SessionEvent::LoggedOut)
            .expect("transition")
            .state;
        assert_eq!(AccessState::of(&logged_out), AccessState::GuardedOut);
    }
}
