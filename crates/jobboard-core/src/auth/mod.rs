//! Authentication module for the session lifecycle and access gating.
//!
//! This module provides:
//! - `SessionStore`: owns the session state and executes its storage effects
//! - `TokenStore`: the durable bearer-token slot (file, keychain or memory)
//! - `guard`: the predicate deciding whether a route renders or redirects
//!
//! A token remembered from a previous run is loaded on startup but does not
//! authenticate the session by itself.

pub mod guard;
pub mod session;
pub mod token_store;

pub use guard::{guard, AccessState, GuardDecision, Route};
pub use session::{
    CredentialExchange, LoginFailure, SessionError, SessionEvent, SessionState, SessionStore,
    StorageEffect, Transition,
};
pub use token_store::{FileTokenStore, KeyringTokenStore, MemoryTokenStore, TokenStore};
