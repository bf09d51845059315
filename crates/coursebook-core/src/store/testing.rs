//! In-memory gateway doubles for store tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::Map;
use tokio::sync::{watch, Notify};

use crate::api::{ApiError, AuthGateway, CourseGateway};
use crate::models::{Category, Course, CourseChanges, CourseId, User};
use crate::storage::{KeyValueStorage, StorageError, StorageResult};

pub fn course(id: i64, seq_no: i64, category: Category) -> Course {
    Course {
        id: CourseId::Number(id),
        description: format!("Course {}", id),
        category,
        seq_no: seq_no as f64,
        long_description: None,
        url: None,
        icon_url: None,
        course_list_icon: None,
        lessons_count: None,
        promo: false,
        extra: Map::new(),
    }
}

pub fn user(email: &str) -> User {
    User {
        id: Some(serde_json::json!(1)),
        email: Some(email.to_string()),
        picture_url: None,
        extra: Map::new(),
    }
}

/// Gate that blocks callers until opened. Open by default.
struct Gate {
    open: watch::Sender<bool>,
}

impl Gate {
    fn new() -> Self {
        let (open, _) = watch::channel(true);
        Self { open }
    }

    fn close(&self) {
        self.open.send_replace(false);
    }

    fn open(&self) {
        self.open.send_replace(true);
    }

    async fn pass(&self) {
        let mut rx = self.open.subscribe();
        let _ = rx.wait_for(|open| *open).await;
    }
}

pub struct FakeCourseGateway {
    courses: Vec<Course>,
    fail_loads: bool,
    fail_saves: AtomicBool,
    load_calls: AtomicUsize,
    load_started: Notify,
    load_gate: Gate,
    save_gate: Gate,
    saved: Mutex<Vec<(CourseId, CourseChanges)>>,
}

impl FakeCourseGateway {
    fn build(courses: Vec<Course>, fail_loads: bool) -> Arc<Self> {
        Arc::new(Self {
            courses,
            fail_loads,
            fail_saves: AtomicBool::new(false),
            load_calls: AtomicUsize::new(0),
            load_started: Notify::new(),
            load_gate: Gate::new(),
            save_gate: Gate::new(),
            saved: Mutex::new(Vec::new()),
        })
    }

    pub fn with_courses(courses: Vec<Course>) -> Arc<Self> {
        Self::build(courses, false)
    }

    pub fn failing_loads() -> Arc<Self> {
        Self::build(Vec::new(), true)
    }

    pub fn fail_saves(&self) {
        self.fail_saves.store(true, Ordering::SeqCst);
    }

    pub fn hold_loads(&self) {
        self.load_gate.close();
    }

    pub fn release_loads(&self) {
        self.load_gate.open();
    }

    pub fn hold_saves(&self) {
        self.save_gate.close();
    }

    pub fn release_saves(&self) {
        self.save_gate.open();
    }

    pub async fn wait_for_load_started(&self) {
        if self.load_calls() > 0 {
            return;
        }
        self.load_started.notified().await;
    }

    pub fn load_calls(&self) -> usize {
        self.load_calls.load(Ordering::SeqCst)
    }

    pub fn saved(&self) -> Vec<(CourseId, CourseChanges)> {
        self.saved.lock().unwrap().clone()
    }
}

#[async_trait]
impl CourseGateway for FakeCourseGateway {
    async fn load_all_courses(&self) -> Result<Vec<Course>> {
        self.load_calls.fetch_add(1, Ordering::SeqCst);
        self.load_started.notify_one();
        self.load_gate.pass().await;
        if self.fail_loads {
            return Err(ApiError::ServerError("boom".to_string()).into());
        }
        Ok(self.courses.clone())
    }

    async fn save_course(&self, id: &CourseId, changes: &CourseChanges) -> Result<()> {
        self.save_gate.pass().await;
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(anyhow!("connection reset"));
        }
        self.saved.lock().unwrap().push((id.clone(), changes.clone()));
        Ok(())
    }
}

pub struct FakeAuthGateway {
    user: Option<User>,
    calls: AtomicUsize,
    gate: Gate,
}

impl FakeAuthGateway {
    pub fn accepting(user: User) -> Arc<Self> {
        Arc::new(Self {
            user: Some(user),
            calls: AtomicUsize::new(0),
            gate: Gate::new(),
        })
    }

    pub fn rejecting() -> Arc<Self> {
        Arc::new(Self {
            user: None,
            calls: AtomicUsize::new(0),
            gate: Gate::new(),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn hold(&self) {
        self.gate.close();
    }

    pub fn release(&self) {
        self.gate.open();
    }
}

#[async_trait]
impl AuthGateway for FakeAuthGateway {
    async fn login(&self, _email: &str, _password: &str) -> Result<User> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.gate.pass().await;
        match self.user {
            Some(ref user) => Ok(user.clone()),
            None => Err(ApiError::Unauthorized("bad credentials".to_string()).into()),
        }
    }
}

/// Storage that reads as empty and refuses every write.
pub struct ReadOnlyStorage;

impl ReadOnlyStorage {
    fn denied(key: &str) -> StorageError {
        StorageError::Io {
            key: key.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        }
    }
}

impl KeyValueStorage for ReadOnlyStorage {
    fn get(&self, _key: &str) -> StorageResult<Option<String>> {
        Ok(None)
    }

    fn set(&self, key: &str, _value: &str) -> StorageResult<()> {
        Err(Self::denied(key))
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        Err(Self::denied(key))
    }
}
