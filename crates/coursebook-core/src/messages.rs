//! Notification channel for user-facing error messages.
//!
//! Batches are broadcast to the subscribers attached at send time only.
//! Nothing is buffered for late subscribers, and empty batches are dropped.

use tokio::sync::broadcast;
use tracing::debug;

/// How many undelivered batches a slow subscriber may fall behind by.
const CHANNEL_CAPACITY: usize = 16;

#[derive(Clone)]
pub struct MessagesChannel {
    tx: broadcast::Sender<Vec<String>>,
}

impl Default for MessagesChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl MessagesChannel {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Deliver one batch of error messages to every current subscriber.
    pub fn show_errors<I, S>(&self, messages: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let batch: Vec<String> = messages.into_iter().map(Into::into).collect();
        if batch.is_empty() {
            debug!("Dropping empty message batch");
            return;
        }
        if self.tx.send(batch).is_err() {
            debug!("No message subscribers attached");
        }
    }

    pub fn subscribe(&self) -> MessagesSubscription {
        MessagesSubscription {
            rx: self.tx.subscribe(),
        }
    }
}

pub struct MessagesSubscription {
    rx: broadcast::Receiver<Vec<String>>,
}

impl MessagesSubscription {
    /// Wait for the next batch. Returns `None` once the channel is gone.
    pub async fn recv(&mut self) -> Option<Vec<String>> {
        loop {
            match self.rx.recv().await {
                Ok(batch) => return Some(batch),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!(skipped, "Message subscriber lagged");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Take the next batch if one is already waiting.
    pub fn try_recv(&mut self) -> Option<Vec<String>> {
        loop {
            match self.rx.try_recv() {
                Ok(batch) => return Some(batch),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    debug!(skipped, "Message subscriber lagged");
                }
                Err(_) => return None,
            }
        }
    }
}
