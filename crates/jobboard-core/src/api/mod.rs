//! REST API client module for the job board backend.
//!
//! This module provides the `ApiClient` for exchanging credentials for a
//! bearer token and for the job, application, profile and signup resources.
//! Once a token is set, every request carries it as a bearer credential.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
