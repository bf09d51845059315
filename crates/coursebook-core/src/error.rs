use std::sync::Arc;

use thiserror::Error;

use crate::models::CourseId;

/// Errors returned by store operations.
///
/// Cloneable so one outcome can be handed to several waiters.
#[derive(Error, Debug, Clone)]
pub enum StoreError {
    #[error("Course not found: {0}")]
    CourseNotFound(CourseId),

    #[error("Invalid course changes: {0}")]
    InvalidChanges(String),

    #[error("{0:#}")]
    Remote(Arc<anyhow::Error>),

    #[error("Background task failed: {0}")]
    TaskFailed(String),
}

impl From<anyhow::Error> for StoreError {
    fn from(e: anyhow::Error) -> Self {
        StoreError::Remote(Arc::new(e))
    }
}

impl StoreError {
    /// The underlying `ApiError`, if the failure came from the HTTP layer.
    pub fn api_error(&self) -> Option<&crate::api::ApiError> {
        match self {
            StoreError::Remote(e) => e.downcast_ref(),
            _ => None,
        }
    }
}
