//! Core library for the job board client.
//!
//! This crate holds everything that is independent of the terminal UI:
//!
//! - `auth`: session lifecycle, durable token slot, and the route guard
//! - `api`: REST client for the job board backend
//! - `models`: jobs, applications, profiles and signup forms
//! - `config`: persisted user configuration
//! - `utils`: small formatting helpers shared by front ends

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod utils;

pub use api::{ApiClient, ApiError};
pub use auth::{GuardDecision, Route, SessionState, SessionStore};
pub use config::Config;
