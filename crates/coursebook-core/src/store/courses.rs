//! In-memory course store.
//!
//! Holds the full course list, loads it once from the gateway when the store
//! is created, and hands out live views. Edits are applied locally before the
//! remote write starts and are not rolled back if the write fails.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::api::CourseGateway;
use crate::error::StoreError;
use crate::loading::LoadingIndicator;
use crate::messages::MessagesChannel;
use crate::models::{sort_courses_by_seq_no, Category, Course, CourseChanges, CourseId};
use crate::view::View;

pub const LOAD_ERROR_MESSAGE: &str = "Could not load courses";
pub const SAVE_ERROR_MESSAGE: &str = "Could not save course";

/// Live list of courses derived from the store.
pub type CourseView = View<Vec<Course>, Vec<Course>>;

/// Handle to a cheaply cloneable course store.
#[derive(Clone)]
pub struct CourseStore {
    inner: Arc<Inner>,
}

struct Inner {
    courses: watch::Sender<Vec<Course>>,
    load_finished: watch::Sender<bool>,
    loaded_at: Mutex<Option<DateTime<Utc>>>,
    gateway: Arc<dyn CourseGateway>,
    loading: LoadingIndicator,
    messages: MessagesChannel,
}

impl CourseStore {
    /// Create the store and start loading the course list in the background.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(
        gateway: Arc<dyn CourseGateway>,
        loading: LoadingIndicator,
        messages: MessagesChannel,
    ) -> Self {
        let (courses, _) = watch::channel(Vec::new());
        let (load_finished, _) = watch::channel(false);

        let store = Self {
            inner: Arc::new(Inner {
                courses,
                load_finished,
                loaded_at: Mutex::new(None),
                gateway,
                loading,
                messages,
            }),
        };

        let loader = store.clone();
        tokio::spawn(async move {
            loader.load_all_courses().await;
        });

        store
    }

    async fn load_all_courses(&self) {
        debug!("Loading all courses");
        let result = self
            .inner
            .loading
            .show_until_completed(self.inner.gateway.load_all_courses())
            .await;

        match result {
            Ok(courses) => {
                info!(count = courses.len(), "Courses loaded");
                *self.lock_loaded_at() = Some(Utc::now());
                self.inner.courses.send_replace(courses);
            }
            Err(e) => {
                error!(error = %format!("{:#}", e), "{}", LOAD_ERROR_MESSAGE);
                self.inner.messages.show_errors([LOAD_ERROR_MESSAGE]);
            }
        }

        self.inner.load_finished.send_replace(true);
    }

    fn lock_loaded_at(&self) -> std::sync::MutexGuard<'_, Option<DateTime<Utc>>> {
        self.inner
            .loaded_at
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Wait until the initial load has finished, successfully or not.
    pub async fn wait_until_loaded(&self) {
        let mut rx = self.inner.load_finished.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait
        let _ = rx.wait_for(|finished| *finished).await;
    }

    /// When the course list was last loaded from the backend.
    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        *self.lock_loaded_at()
    }

    /// Snapshot of the full collection.
    pub fn courses(&self) -> Vec<Course> {
        self.inner.courses.borrow().clone()
    }

    pub fn course(&self, id: &CourseId) -> Option<Course> {
        self.inner
            .courses
            .borrow()
            .iter()
            .find(|c| &c.id == id)
            .cloned()
    }

    /// Live view of the full collection, in backend order.
    pub fn subscribe(&self) -> CourseView {
        View::new(self.inner.courses.subscribe(), |courses: &Vec<Course>| courses.clone())
    }

    /// Live view of the courses in `category`, ordered by sequence number.
    pub fn filter_by_category(&self, category: Category) -> CourseView {
        View::new(self.inner.courses.subscribe(), move |courses: &Vec<Course>| {
            let mut matching: Vec<Course> = courses
                .iter()
                .filter(|c| c.category == category)
                .cloned()
                .collect();
            matching.sort_by(sort_courses_by_seq_no);
            matching
        })
    }

    /// Apply `changes` to a course and persist them.
    ///
    /// The local collection is updated before this returns; the remote write
    /// runs in the background and its outcome is available from the returned
    /// handle. A failed write is reported on the messages channel and the
    /// local edit stays in place.
    pub fn save_course(
        &self,
        id: impl Into<CourseId>,
        changes: CourseChanges,
    ) -> Result<PendingSave, StoreError> {
        let id = id.into();
        let mut outcome = Ok(());

        self.inner.courses.send_if_modified(|courses| {
            let Some(index) = courses.iter().position(|c| c.id == id) else {
                outcome = Err(StoreError::CourseNotFound(id.clone()));
                return false;
            };
            match courses[index].merged(&changes) {
                Ok(updated) => {
                    courses[index] = updated;
                    true
                }
                Err(e) => {
                    outcome = Err(StoreError::InvalidChanges(e.to_string()));
                    false
                }
            }
        });
        outcome?;
        debug!(course_id = %id, "Applied course changes locally");

        let store = self.clone();
        let handle = tokio::spawn(async move { store.persist_course(id, changes).await });

        Ok(PendingSave { handle })
    }

    async fn persist_course(&self, id: CourseId, changes: CourseChanges) -> Result<(), StoreError> {
        match self.inner.gateway.save_course(&id, &changes).await {
            Ok(()) => {
                info!(course_id = %id, "Course saved");
                Ok(())
            }
            Err(e) => {
                error!(course_id = %id, error = %format!("{:#}", e), "{}", SAVE_ERROR_MESSAGE);
                self.inner.messages.show_errors([SAVE_ERROR_MESSAGE]);
                Err(e.into())
            }
        }
    }
}

/// Remote half of a course save.
///
/// Dropping it does not cancel the write.
pub struct PendingSave {
    handle: JoinHandle<Result<(), StoreError>>,
}

impl PendingSave {
    pub async fn wait(self) -> Result<(), StoreError> {
        self.handle
            .await
            .map_err(|e| StoreError::TaskFailed(e.to_string()))?
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

// ============================================================================
// Tests
// ============================================================================
