//! API client for the course catalog backend.
//!
//! Every call is a single request with no retry. Failures surface to the
//! caller immediately as `ApiError` wrapped in `anyhow::Error`.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{header, Client};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::models::{Course, CourseChanges, CourseId, CoursesResponse, LoginRequest, User};

use super::gateway::{AuthGateway, CourseGateway};
use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds, applied client-wide.
const REQUEST_TIMEOUT_SECS: u64 = 30;

const COURSES_PATH: &str = "/api/courses";
const LOGIN_PATH: &str = "/api/login";

/// API client for the course backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Arc<str>,
}

impl ApiClient {
    /// Create a client for the backend at `base_url` (e.g. `http://localhost:9000`).
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: Arc::from(base_url.trim_end_matches('/')),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(ApiError::from)
            .with_context(|| format!("Failed to send GET request to {}", url))?;

        let response = Self::check_response(response).await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", url))
    }

    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(&self, url: &str, body: &B) -> Result<T> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(ApiError::from)
            .with_context(|| format!("Failed to send POST request to {}", url))?;

        let response = Self::check_response(response).await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", url))
    }

    /// PUT whose response body is not used.
    async fn put<B: Serialize + ?Sized>(&self, url: &str, body: &B) -> Result<()> {
        let response = self
            .client
            .put(url)
            .json(body)
            .send()
            .await
            .map_err(ApiError::from)
            .with_context(|| format!("Failed to send PUT request to {}", url))?;

        Self::check_response(response).await?;
        Ok(())
    }

    // =========================================================================
    // Courses
    // =========================================================================

    pub async fn fetch_courses(&self) -> Result<Vec<Course>> {
        let url = self.url(COURSES_PATH);
        let response: CoursesResponse = self.get(&url).await?;
        let received = response.payload.len();
        let courses = response.into_courses();
        debug!(received, count = courses.len(), "Fetched courses");
        Ok(courses)
    }

    pub async fn update_course(&self, id: &CourseId, changes: &CourseChanges) -> Result<()> {
        let url = self.url(&format!("{}/{}", COURSES_PATH, id));
        self.put(&url, changes).await?;
        debug!(course_id = %id, "Course saved");
        Ok(())
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User> {
        let url = self.url(LOGIN_PATH);
        let user: User = self
            .post(&url, &LoginRequest { email, password })
            .await
            .context("Authentication request failed")?;
        debug!(email = email, "Authenticated");
        Ok(user)
    }
}

#[async_trait]
impl CourseGateway for ApiClient {
    async fn load_all_courses(&self) -> Result<Vec<Course>> {
        self.fetch_courses().await
    }

    async fn save_course(&self, id: &CourseId, changes: &CourseChanges) -> Result<()> {
        self.update_course(id, changes).await
    }
}

#[async_trait]
impl AuthGateway for ApiClient {
    async fn login(&self, email: &str, password: &str) -> Result<User> {
        self.authenticate(email, password).await
    }
}
