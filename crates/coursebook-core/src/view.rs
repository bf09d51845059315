//! Live, derived views over store state.
//!
//! A `View` holds a `watch` receiver on some source state and a projection
//! applied on every read. New views see the latest source value immediately;
//! earlier values are never replayed.

use std::fmt;
use std::sync::Arc;

use futures::stream::{self, Stream};
use tokio::sync::watch;

type Projection<S, T> = Arc<dyn Fn(&S) -> T + Send + Sync>;

pub struct View<S, T> {
    rx: watch::Receiver<S>,
    project: Projection<S, T>,
}

impl<S, T> Clone for View<S, T> {
    fn clone(&self) -> Self {
        Self {
            rx: self.rx.clone(),
            project: Arc::clone(&self.project),
        }
    }
}

impl<S, T> fmt::Debug for View<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("View").finish_non_exhaustive()
    }
}

impl<S, T> View<S, T>
where
    S: Send + Sync + 'static,
    T: Send + 'static,
{
    pub fn new(rx: watch::Receiver<S>, project: impl Fn(&S) -> T + Send + Sync + 'static) -> Self {
        Self {
            rx,
            project: Arc::new(project),
        }
    }

    /// Current projected value.
    pub fn get(&self) -> T {
        (self.project)(&self.rx.borrow())
    }

    /// Whether the source changed since this view last marked it seen.
    /// A closed source counts as unchanged.
    pub fn has_changed(&self) -> bool {
        self.rx.has_changed().unwrap_or(false)
    }

    /// Current projected value, marking it seen.
    pub fn get_and_mark_seen(&mut self) -> T {
        (self.project)(&self.rx.borrow_and_update())
    }

    /// Wait for the next change of the source. Returns `None` once the
    /// owning store is gone.
    pub async fn changed(&mut self) -> Option<T> {
        self.rx.changed().await.ok()?;
        Some(self.get_and_mark_seen())
    }

    /// Further projection of this view.
    pub fn map<U, F>(self, f: F) -> View<S, U>
    where
        U: Send + 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        let inner = self.project;
        View {
            rx: self.rx,
            project: Arc::new(move |s: &S| f(inner(s))),
        }
    }

    /// Stream that yields the current value first and then every change.
    pub fn into_stream(self) -> impl Stream<Item = T> + Send
    where
        S: Send + Sync,
    {
        stream::unfold((self, true), |(mut view, first)| async move {
            if first {
                let value = view.get_and_mark_seen();
                Some((value, (view, false)))
            } else {
                let value = view.changed().await?;
                Some((value, (view, false)))
            }
        })
    }
}
