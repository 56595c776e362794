//! Session lifecycle.
//!
//! `SessionState` is a plain value and `SessionState::apply` computes the
//! next state for an event without touching storage. The transition carries
//! the durable write or removal it requires as a `StorageEffect`, which
//! `SessionStore` executes against its `TokenStore` after swapping in the new
//! state.

use std::future::Future;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::api::{ApiClient, ApiError};

use super::token_store::TokenStore;

/// Message shown when the server rejects the credentials.
pub const WRONG_CREDENTIALS_MESSAGE: &str = "Wrong username/password";

/// Message shown for every other login failure.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("A login request is already in flight")]
    LoginInFlight,
    #[error("No login request is in flight")]
    NoLoginInFlight,
}

/// Why a credential exchange failed, as far as the user is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFailure {
    /// The server answered 401.
    CredentialsRejected,
    /// Anything else: no response, timeout, 5xx, malformed body.
    Network,
}

impl LoginFailure {
    pub fn classify(error: &ApiError) -> Self {
        if error.is_unauthorized() {
            LoginFailure::CredentialsRejected
        } else {
            LoginFailure::Network
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            LoginFailure::CredentialsRejected => WRONG_CREDENTIALS_MESSAGE,
            LoginFailure::Network => NETWORK_ERROR_MESSAGE,
        }
    }
}

/// Inputs to the session state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    LoginStarted,
    LoginSucceeded(String),
    LoginFailed(LoginFailure),
    LoggedOut,
    /// A token restored from storage was accepted by the server.
    RestoredTokenConfirmed,
}

/// Durable-storage work a transition asks its holder to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageEffect {
    Persist(String),
    Clear,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: SessionState,
    pub effect: Option<StorageEffect>,
}

impl Transition {
    fn pure(state: SessionState) -> Self {
        Self { state, effect: None }
    }
}

/// The in-memory record of the current user's authentication status.
///
/// Invariant: `is_authenticated` implies `token` is present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    is_authenticated: bool,
    token: Option<String>,
    loading: bool,
    error: Option<String>,
}

impl SessionState {
    /// State for a fresh process. A remembered token is carried, but the
    /// session is not authenticated until a login or an explicit confirmation.
    pub fn restored(token: Option<String>) -> Self {
        Self {
            token,
            ..Self::default()
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Compute the next state for an event.
    ///
    /// Rejects a second `LoginStarted` while one is outstanding, and a login
    /// outcome when none is. `RestoredTokenConfirmed` without a token is a
    /// no-op.
    pub fn apply(&self, event: SessionEvent) -> Result<Transition, SessionError> {
        let transition = match event {
            SessionEvent::LoginStarted => {
                if self.loading {
                    return Err(SessionError::LoginInFlight);
                }
                Transition::pure(Self {
                    loading: true,
                    error: None,
                    ..self.clone()
                })
            }
            SessionEvent::LoginSucceeded(_) | SessionEvent::LoginFailed(_) if !self.loading => {
                return Err(SessionError::NoLoginInFlight);
            }
            SessionEvent::LoginSucceeded(token) => Transition {
                state: Self {
                    is_authenticated: true,
                    token: Some(token.clone()),
                    loading: false,
                    error: None,
                },
                effect: Some(StorageEffect::Persist(token)),
            },
            SessionEvent::LoginFailed(failure) => Transition::pure(Self {
                is_authenticated: false,
                token: None,
                loading: false,
                error: Some(failure.message().to_string()),
            }),
            SessionEvent::LoggedOut => Transition {
                state: Self {
                    is_authenticated: false,
                    token: None,
                    ..self.clone()
                },
                effect: Some(StorageEffect::Clear),
            },
            SessionEvent::RestoredTokenConfirmed => Transition::pure(Self {
                is_authenticated: self.token.is_some(),
                ..self.clone()
            }),
        };
        Ok(transition)
    }
}

/// The credential exchange a login performs.
pub trait CredentialExchange {
    fn exchange(
        &self,
        username: &str,
        password: &str,
    ) -> impl Future<Output = Result<String, ApiError>> + Send;
}

impl CredentialExchange for ApiClient {
    fn exchange(
        &self,
        username: &str,
        password: &str,
    ) -> impl Future<Output = Result<String, ApiError>> + Send {
        self.obtain_token(username, password)
    }
}

/// Owns the session state and the durable token slot.
///
/// Created once by the application root and passed by reference to whatever
/// needs to read or change the session.
pub struct SessionStore {
    state: SessionState,
    storage: Box<dyn TokenStore>,
}

impl SessionStore {
    /// Build the store, seeding the token from durable storage.
    /// A storage read failure is logged and treated as an empty slot.
    pub fn initialize(storage: Box<dyn TokenStore>) -> Self {
        let token = match storage.load() {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "Failed to read stored token");
                None
            }
        };
        debug!(has_token = token.is_some(), "Session initialized");
        Self {
            state: SessionState::restored(token),
            storage,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.is_authenticated()
    }

    pub fn token(&self) -> Option<&str> {
        self.state.token()
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn error(&self) -> Option<&str> {
        self.state.error()
    }

    fn dispatch(&mut self, event: SessionEvent) -> Result<(), SessionError> {
        let Transition { state, effect } = self.state.apply(event)?;
        self.state = state;
        if let Some(effect) = effect {
            self.run_effect(effect);
        }
        Ok(())
    }

    fn run_effect(&self, effect: StorageEffect) {
        let (action, result) = match effect {
            StorageEffect::Persist(ref token) => ("persist", self.storage.save(token)),
            StorageEffect::Clear => ("clear", self.storage.clear()),
        };
        if let Err(e) = result {
            warn!(error = %e, action, "Failed to update stored token");
        }
    }

    /// Mark a login as outstanding. Rejects a second one while loading.
    pub fn begin_login(&mut self) -> Result<(), SessionError> {
        self.dispatch(SessionEvent::LoginStarted)
    }

    /// Resolve the outstanding login with the credential exchange outcome.
    pub fn finish_login(&mut self, outcome: Result<String, ApiError>) {
        let event = match outcome {
            Ok(token) => {
                info!("Login successful");
                SessionEvent::LoginSucceeded(token)
            }
            Err(e) => {
                let failure = LoginFailure::classify(&e);
                warn!(error = %e, ?failure, "Login failed");
                SessionEvent::LoginFailed(failure)
            }
        };
        if let Err(e) = self.dispatch(event) {
            warn!(error = %e, "Ignoring login outcome");
        }
    }

    /// Run a whole login: begin, exchange credentials, resolve.
    pub async fn login<C: CredentialExchange>(
        &mut self,
        exchange: &C,
        username: &str,
        password: &str,
    ) -> Result<(), SessionError> {
        self.begin_login()?;
        let outcome = exchange.exchange(username, password).await;
        self.finish_login(outcome);
        Ok(())
    }

    /// Drop the session locally and forget the stored token. The server is
    /// not contacted.
    pub fn logout(&mut self) {
        info!("Logging out");
        let _ = self.dispatch(SessionEvent::LoggedOut);
    }

    /// Trust the restored token after the server accepted it.
    pub fn confirm_restored_token(&mut self) {
        let _ = self.dispatch(SessionEvent::RestoredTokenConfirmed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MemoryTokenStore;

    /// Credential exchange that returns a fixed outcome.
    struct FixedExchange(fn() -> Result<String, ApiError>);

    impl CredentialExchange for FixedExchange {
        fn exchange(
            &self,
            _username: &str,
            _password: &str,
        ) -> impl Future<Output = Result<String, ApiError>> + Send {
            let outcome = (self.0)();
            async move { outcome }
        }
    }

    fn store_with(slot: &MemoryTokenStore) -> SessionStore {
        SessionStore::initialize(Box::new(slot.clone()))
    }

    fn loading() -> SessionState {
        SessionState::default()
            .apply(SessionEvent::LoginStarted)
            .expect("transition")
            .state
    }

    // -------------------------------------------------------------------------
    // Pure transitions
    // -------------------------------------------------------------------------

    #[test]
    fn test_login_started_clears_error() {
        let state = SessionState {
            error: Some(NETWORK_ERROR_MESSAGE.to_string()),
            ..SessionState::default()
        };
        let t = state.apply(SessionEvent::LoginStarted).expect("transition");
        assert!(t.state.is_loading());
        assert_eq!(t.state.error(), None);
        assert_eq!(t.effect, None);
    }

    #[test]
    fn test_second_login_rejected() {
        let loading = SessionState::default()
            .apply(SessionEvent::LoginStarted)
            .expect("transition")
            .state;
        assert_eq!(
            loading.apply(SessionEvent::LoginStarted),
            Err(SessionError::LoginInFlight)
        );
    }

    #[test]
    fn test_login_succeeded_persists() {
        let t = loading()
            .apply(SessionEvent::LoginSucceeded("abc123".to_string()))
            .expect("transition");
        assert!(t.state.is_authenticated());
        assert!(!t.state.is_loading());
        assert_eq!(t.state.token(), Some("abc123"));
        assert_eq!(t.effect, Some(StorageEffect::Persist("abc123".to_string())));
    }

    #[test]
    fn test_login_failed_has_no_effect() {
        let state = SessionState {
            token: Some("old".to_string()),
            loading: true,
            ..SessionState::default()
        };
        let t = state
            .apply(SessionEvent::LoginFailed(LoginFailure::Network))
            .expect("transition");
        assert!(!t.state.is_authenticated());
        assert_eq!(t.state.token(), None);
        assert_eq!(t.effect, None);
    }

    #[test]
    fn test_logged_out_clears() {
        let authed = loading()
            .apply(SessionEvent::LoginSucceeded("abc".to_string()))
            .expect("transition")
            .state;
        let t = authed.apply(SessionEvent::LoggedOut).expect("transition");
        assert!(!t.state.is_authenticated());
        assert_eq!(t.state.token(), None);
        assert_eq!(t.effect, Some(StorageEffect::Clear));
    }

    #[test]
    fn test_outcome_without_login_rejected() {
        let idle = SessionState::restored(Some("xyz".to_string()));
        assert_eq!(
            idle.apply(SessionEvent::LoginSucceeded("stray".to_string())),
            Err(SessionError::NoLoginInFlight)
        );
        assert_eq!(
            idle.apply(SessionEvent::LoginFailed(LoginFailure::Network)),
            Err(SessionError::NoLoginInFlight)
        );
    }

    #[test]
    fn test_confirm_without_token_is_noop() {
        let t = SessionState::default()
            .apply(SessionEvent::RestoredTokenConfirmed)
            .expect("transition");
        assert!(!t.state.is_authenticated());

        let t = SessionState::restored(Some("xyz".to_string()))
            .apply(SessionEvent::RestoredTokenConfirmed)
            .expect("transition");
        assert!(t.state.is_authenticated());
        assert_eq!(t.effect, None);
    }

    #[test]
    fn test_classify() {
        assert_eq!(
            LoginFailure::classify(&ApiError::Unauthorized),
            LoginFailure::CredentialsRejected
        );
        assert_eq!(
            LoginFailure::classify(&ApiError::ServerError("boom".to_string())),
            LoginFailure::Network
        );
        assert_eq!(
            LoginFailure::classify(&ApiError::BadRequest("{}".to_string())),
            LoginFailure::Network
        );
    }

    // -------------------------------------------------------------------------
    // Store
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_successful_login() {
        let slot = MemoryTokenStore::new();
        let mut store = store_with(&slot);

        store
            .login(&FixedExchange(|| Ok("abc123".to_string())), "alice", "pw")
            .await
            .expect("login");

        assert!(store.is_authenticated());
        assert_eq!(store.token(), Some("abc123"));
        assert_eq!(slot.load().expect("load").as_deref(), Some("abc123"));
        assert!(!store.is_loading());
        assert_eq!(store.error(), None);
    }

    #[tokio::test]
    async fn test_unauthorized_login() {
        let slot = MemoryTokenStore::new();
        let mut store = store_with(&slot);

        store
            .login(&FixedExchange(|| Err(ApiError::Unauthorized)), "alice", "bad")
            .await
            .expect("login");

        assert!(!store.is_authenticated());
        assert_eq!(store.token(), None);
        assert!(!store.is_loading());
        assert_eq!(store.error(), Some("Wrong username/password"));
    }

    #[tokio::test]
    async fn test_other_failure_is_network_error() {
        let mut store = store_with(&MemoryTokenStore::new());

        store
            .login(
                &FixedExchange(|| Err(ApiError::ServerError("502".to_string()))),
                "alice",
                "pw",
            )
            .await
            .expect("login");

        assert_eq!(store.error(), Some("Network error"));
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
            listener.local_addr().expect("addr").port()
        };
        let client = ApiClient::new(&format!("http://127.0.0.1:{}/api/", port))
            .expect("client should build");

        let direct = client.obtain_token("alice", "pw").await.unwrap_err();
        assert!(matches!(direct, ApiError::NetworkError(_)));
        assert_eq!(LoginFailure::classify(&direct), LoginFailure::Network);

        let slot = MemoryTokenStore::new();
        let mut store = store_with(&slot);
        store.login(&client, "alice", "pw").await.expect("login");

        assert_eq!(store.error(), Some("Network error"));
        assert_eq!(store.token(), None);
        assert!(!store.is_authenticated());
        assert!(!store.is_loading());
        assert_eq!(slot.load().expect("load"), None);
    }

    #[tokio::test]
    async fn test_error_cleared_on_next_attempt() {
        let mut store = store_with(&MemoryTokenStore::new());
        store
            .login(&FixedExchange(|| Err(ApiError::Unauthorized)), "alice", "bad")
            .await
            .expect("login");
        assert!(store.error().is_some());

        store.begin_login().expect("begin");
        assert_eq!(store.error(), None);
        assert!(store.is_loading());
    }

    #[test]
    fn test_overlapping_login_rejected_by_store() {
        let mut store = store_with(&MemoryTokenStore::new());
        store.begin_login().expect("first begin");
        let before = store.state().clone();
        assert_eq!(store.begin_login(), Err(SessionError::LoginInFlight));
        assert_eq!(store.state(), &before);
    }

    #[tokio::test]
    async fn test_login_rejected_while_loading_skips_exchange() {
        let mut store = store_with(&MemoryTokenStore::new());
        store.begin_login().expect("begin");
        let result = store
            .login(&FixedExchange(|| Ok("never".to_string())), "alice", "pw")
            .await;
        assert_eq!(result, Err(SessionError::LoginInFlight));
        assert_eq!(store.token(), None);
    }

    #[test]
    fn test_stray_outcome_leaves_store_untouched() {
        let slot = MemoryTokenStore::with_token("xyz");
        let mut store = store_with(&slot);

        store.finish_login(Ok("stray".to_string()));
        assert!(!store.is_authenticated());
        assert_eq!(store.token(), Some("xyz"));
        assert_eq!(slot.load().expect("load").as_deref(), Some("xyz"));

        store.finish_login(Err(ApiError::Unauthorized));
        assert_eq!(store.token(), Some("xyz"));
        assert_eq!(store.error(), None);
    }

    #[test]
    fn test_logout_is_idempotent() {
        let slot = MemoryTokenStore::with_token("abc");
        let mut store = store_with(&slot);
        store.begin_login().expect("begin");
        store.finish_login(Ok("abc".to_string()));
        assert!(store.is_authenticated());

        for _ in 0..3 {
            store.logout();
            assert!(!store.is_authenticated());
            assert_eq!(store.token(), None);
            assert_eq!(slot.load().expect("load"), None);
        }
    }

    #[test]
    fn test_restart_with_stored_token() {
        let slot = MemoryTokenStore::with_token("xyz");
        let store = store_with(&slot);
        assert_eq!(store.token(), Some("xyz"));
        assert!(!store.is_authenticated());
        assert!(!store.is_loading());
    }

    #[test]
    fn test_confirm_restored_token() {
        let mut store = store_with(&MemoryTokenStore::with_token("xyz"));
        store.confirm_restored_token();
        assert!(store.is_authenticated());
        assert_eq!(store.token(), Some("xyz"));
    }

    #[test]
    fn test_storage_failure_is_not_fatal() {
        struct BrokenStore;
        impl TokenStore for BrokenStore {
            fn load(&self) -> anyhow::Result<Option<String>> {
                Err(anyhow::anyhow!("disk on fire"))
            }
            fn save(&self, _token: &str) -> anyhow::Result<()> {
                Err(anyhow::anyhow!("disk on fire"))
            }
            fn clear(&self) -> anyhow::Result<()> {
                Err(anyhow::anyhow!("disk on fire"))
            }
        }

        let mut store = SessionStore::initialize(Box::new(BrokenStore));
        assert_eq!(store.token(), None);
        store.begin_login().expect("begin");
        store.finish_login(Ok("abc".to_string()));
        assert!(store.is_authenticated());
        store.logout();
        assert!(!store.is_authenticated());
    }
}
