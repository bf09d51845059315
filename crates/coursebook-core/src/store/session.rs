//! Session store: the signed-in user, mirrored to durable storage.
//!
//! A user saved by a previous run is restored on construction without
//! contacting the backend. Logging in replaces it; logging out clears both
//! memory and storage.

use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::api::AuthGateway;
use crate::error::StoreError;
use crate::models::User;
use crate::storage::KeyValueStorage;
use crate::view::View;

/// Storage key the user object is persisted under.
pub const AUTH_DATA_KEY: &str = "auth_data";

pub type SessionView<T> = View<Option<User>, T>;

#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

struct Inner {
    user: watch::Sender<Option<User>>,
    gateway: Arc<dyn AuthGateway>,
    storage: Arc<dyn KeyValueStorage>,
}

impl SessionStore {
    pub fn new(gateway: Arc<dyn AuthGateway>, storage: Arc<dyn KeyValueStorage>) -> Self {
        let restored = Self::restore(storage.as_ref());
        let (user, _) = watch::channel(restored);

        Self {
            inner: Arc::new(Inner {
                user,
                gateway,
                storage,
            }),
        }
    }

    fn restore(storage: &dyn KeyValueStorage) -> Option<User> {
        match storage.get(AUTH_DATA_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => {
                    info!("Restored saved session");
                    Some(user)
                }
                Err(e) => {
                    warn!(error = %e, "Ignoring unreadable saved session");
                    None
                }
            },
            Ok(None) => {
                debug!("No saved session");
                None
            }
            Err(e) => {
                warn!(error = %e, "Failed to read saved session");
                None
            }
        }
    }

    /// Authenticate and, on success, make the returned user current.
    ///
    /// The request starts immediately. Every clone of the returned handle,
    /// including clones made after completion, yields the same result.
    pub fn login(&self, email: &str, password: &str) -> LoginHandle {
        let store = self.clone();
        let email = email.to_string();
        let password = password.to_string();

        let task = tokio::spawn(async move { store.authenticate(&email, &password).await });
        let result = async move {
            match task.await {
                Ok(result) => result,
                Err(e) => Err(StoreError::TaskFailed(e.to_string())),
            }
        }
        .boxed()
        .shared();

        LoginHandle { result }
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<User, StoreError> {
        match self.inner.gateway.login(email, password).await {
            Ok(user) => {
                self.inner.user.send_replace(Some(user.clone()));
                self.persist(&user);
                info!(email = email, "Login successful");
                Ok(user)
            }
            Err(e) => {
                error!(error = %format!("{:#}", e), "Login failed");
                Err(e.into())
            }
        }
    }

    fn persist(&self, user: &User) {
        let raw = match serde_json::to_string(user) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "Failed to serialize session");
                return;
            }
        };
        if let Err(e) = self.inner.storage.set(AUTH_DATA_KEY, &raw) {
            warn!(error = %e, "Failed to save session");
        }
    }

    /// Forget the current user, in memory and in storage.
    pub fn logout(&self) {
        self.inner.user.send_replace(None);
        if let Err(e) = self.inner.storage.remove(AUTH_DATA_KEY) {
            warn!(error = %e, "Failed to remove saved session");
        }
        info!("Logged out");
    }

    pub fn user(&self) -> Option<User> {
        self.inner.user.borrow().clone()
    }

    pub fn subscribe(&self) -> SessionView<Option<User>> {
        View::new(self.inner.user.subscribe(), |user: &Option<User>| user.clone())
    }

    pub fn is_logged_in(&self) -> SessionView<bool> {
        View::new(self.inner.user.subscribe(), |user: &Option<User>| user.is_some())
    }

    pub fn is_logged_out(&self) -> SessionView<bool> {
        self.is_logged_in().map(|logged_in| !logged_in)
    }
}

/// Shared outcome of one login attempt.
#[derive(Clone)]
pub struct LoginHandle {
    result: Shared<BoxFuture<'static, Result<User, StoreError>>>,
}

impl LoginHandle {
    pub async fn wait(&self) -> Result<User, StoreError> {
        self.result.clone().await
    }

    /// The outcome, if the attempt has finished.
    pub fn peek(&self) -> Option<Result<User, StoreError>> {
        self.result.peek().cloned()
    }
}

// ============================================================================
// Tests
// ============================================================================
