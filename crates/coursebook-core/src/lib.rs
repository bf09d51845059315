//! Core library for coursebook.
//!
//! Provides the pieces the front end is built from:
//!
//! - `api`: HTTP gateways for the course and login endpoints
//! - `store`: the course and session stores with their live views
//! - `messages` / `loading`: the error notification and busy-indicator channels
//! - `storage`: durable key-value storage backing the session
//! - `config`: user configuration and data locations

pub mod api;
pub mod config;
pub mod error;
pub mod loading;
pub mod messages;
pub mod models;
pub mod storage;
pub mod store;
pub mod view;

pub use error::StoreError;
pub use loading::LoadingIndicator;
pub use messages::{MessagesChannel, MessagesSubscription};
pub use view::View;
