//! API client for communicating with the job board REST API.
//!
//! This module provides the `ApiClient` struct for exchanging credentials
//! and for making authenticated requests against the job, application,
//! profile and signup endpoints.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::{
    Application, Job, JobDraft, NewApplication, Profile, ProfileUpdate, SignupForm,
};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Default backend location when nothing is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api/";

/// HTTP request timeout in seconds.
/// A login that times out resolves as a network failure.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum number of retries for rate-limited (429) requests.
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Initial backoff delay in milliseconds for rate limiting.
const INITIAL_BACKOFF_MS: u64 = 1000;

#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access: String,
}

/// API client for the job board backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
    initial_backoff: Duration,
}

impl ApiClient {
    /// Create a new API client rooted at `base_url`.
    ///
    /// Paths are resolved relative to the base, so a missing trailing slash
    /// is added (`http://host/api` becomes `http://host/api/`).
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to build HTTP client")?;

        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        let base_url = Url::parse(&normalized)
            .with_context(|| format!("Invalid API base URL: {}", base_url))?;

        Ok(Self {
            client,
            base_url,
            token: None,
            initial_backoff: Duration::from_millis(INITIAL_BACKOFF_MS),
        })
    }

    /// Set the bearer token for authenticated requests
    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    /// Stop attaching a bearer token to requests
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Override the first rate-limit backoff delay.
    pub fn with_initial_backoff(mut self, backoff: Duration) -> Self {
        self.initial_backoff = backoff;
        self
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", path, e)))
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let request = self.client.request(method, url);
        match self.token {
            Some(ref token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Check if response is successful, returning an error with body if not.
    /// Returns Ok(Some(response)) for success, Ok(None) for rate limit (should retry),
    /// or Err for other errors.
    async fn check_response_for_retry(response: Response) -> Result<Option<Response>, ApiError> {
        if response.status().is_success() {
            Ok(Some(response))
        } else if response.status().as_u16() == 429 {
            Ok(None)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: Response) -> Result<Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    /// Send a request, retrying with exponential backoff while rate limited.
    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Response, ApiError> {
        let url = self.url(path)?;
        let mut retries = 0;
        let mut backoff = self.initial_backoff;

        loop {
            let mut request = self.request(method.clone(), url.clone());
            if let Some(body) = body {
                request = request.json(body);
            }

            debug!(%method, %url, "Sending request");
            let response = request.send().await?;

            match Self::check_response_for_retry(response).await? {
                Some(response) => return Ok(response),
                None if retries < MAX_RATE_LIMIT_RETRIES => {
                    retries += 1;
                    warn!(%url, retries, backoff_ms = backoff.as_millis() as u64, "Rate limited, backing off");
                    tokio::time::sleep(backoff).await;
                    backoff *= 2;
                }
                None => return Err(ApiError::RateLimited),
            }
        }
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to parse response: {}", e))
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send::<()>(Method::GET, path, None).await?;
        Self::parse(response).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.send(Method::POST, path, Some(body)).await?;
        Self::parse(response).await
    }

    async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.send(Method::PUT, path, Some(body)).await?;
        Self::parse(response).await
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send::<()>(Method::DELETE, path, None).await?;
        Ok(())
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Exchange a username and password for a bearer token.
    ///
    /// This is a single request: it is never retried and never carries an
    /// existing token.
    pub async fn obtain_token(&self, username: &str, password: &str) -> Result<String, ApiError> {
        let url = self.url("auth/token/")?;

        let response = self
            .client
            .post(url)
            .json(&TokenRequest { username, password })
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        let token: TokenResponse = Self::parse(response).await?;
        Ok(token.access)
    }

    /// Register a new account.
    pub async fn signup(&self, form: &SignupForm) -> Result<(), ApiError> {
        let url = self.url("signup/")?;
        let response = self.client.post(url).json(form).send().await?;
        Self::check_response(response).await?;
        Ok(())
    }

    // =========================================================================
    // Jobs
    // =========================================================================

    pub async fn fetch_jobs(&self) -> Result<Vec<Job>, ApiError> {
        self.get("jobs/").await
    }

    pub async fn fetch_job(&self, id: &str) -> Result<Job, ApiError> {
        self.get(&format!("jobs/{}/", id)).await
    }

    pub async fn create_job(&self, draft: &JobDraft) -> Result<Job, ApiError> {
        self.post("jobs/", draft).await
    }

    pub async fn update_job(&self, id: &str, draft: &JobDraft) -> Result<Job, ApiError> {
        self.put(&format!("jobs/{}/", id), draft).await
    }

    pub async fn delete_job(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("jobs/{}/", id)).await
    }

    // =========================================================================
    // Applications
    // =========================================================================

    pub async fn fetch_applications(&self) -> Result<Vec<Application>, ApiError> {
        self.get("applications/").await
    }

    pub async fn apply(&self, application: &NewApplication) -> Result<Application, ApiError> {
        self.post("applications/", application).await
    }

    pub async fn withdraw_application(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("applications/{}/", id)).await
    }

    // =========================================================================
    // Profiles
    // =========================================================================

    pub async fn fetch_my_profile(&self) -> Result<Profile, ApiError> {
        self.get("profiles/me/").await
    }

    pub async fn update_profile(&self, id: &str, update: &ProfileUpdate) -> Result<Profile, ApiError> {
        self.put(&format!("profiles/{}/", id), update).await
    }
}
