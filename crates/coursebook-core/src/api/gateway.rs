//! Gateway seams between the stores and the backend.
//!
//! Each operation is one request/response. Stores hold these as trait
//! objects so tests can swap in in-memory doubles.

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{Course, CourseChanges, CourseId, User};

#[async_trait]
pub trait CourseGateway: Send + Sync {
    /// Fetch the full course list.
    async fn load_all_courses(&self) -> Result<Vec<Course>>;

    /// Persist a partial update of one course.
    async fn save_course(&self, id: &CourseId, changes: &CourseChanges) -> Result<()>;
}

#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Exchange credentials for a user object.
    async fn login(&self, email: &str, password: &str) -> Result<User>;
}
