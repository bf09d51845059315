//! Busy indicator shared by everything that talks to the network.

use std::future::Future;

use tokio::sync::watch;

use crate::view::View;

/// Boolean "in-flight" signal.
///
/// Tracks a count of running operations so overlapping work keeps the
/// indicator on until the last operation finishes.
#[derive(Clone)]
pub struct LoadingIndicator {
    tx: watch::Sender<usize>,
}

impl Default for LoadingIndicator {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadingIndicator {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(0);
        Self { tx }
    }

    pub fn is_loading(&self) -> bool {
        *self.tx.borrow() > 0
    }

    pub fn loading_on(&self) {
        self.tx.send_modify(|n| *n += 1);
    }

    pub fn loading_off(&self) {
        self.tx.send_modify(|n| *n = n.saturating_sub(1));
    }

    /// Run `operation` with the indicator on. The indicator goes off when the
    /// operation completes or is dropped.
    pub async fn show_until_completed<F: Future>(&self, operation: F) -> F::Output {
        let _guard = LoadingGuard::new(self);
        operation.await
    }

    /// Live view of the indicator.
    pub fn subscribe(&self) -> View<usize, bool> {
        View::new(self.tx.subscribe(), |count| *count > 0)
    }
}

struct LoadingGuard<'a> {
    indicator: &'a LoadingIndicator,
}

impl<'a> LoadingGuard<'a> {
    fn new(indicator: &'a LoadingIndicator) -> Self {
        indicator.loading_on();
        Self { indicator }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.indicator.loading_off();
    }
}
