//! Client-side stores.
//!
//! - `CourseStore`: the course list, loaded once and edited optimistically
//! - `SessionStore`: the signed-in user, mirrored to durable storage
//!
//! Stores are cheap-to-clone handles; every clone shares the same state.

pub mod courses;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use courses::{CourseStore, CourseView, PendingSave, LOAD_ERROR_MESSAGE, SAVE_ERROR_MESSAGE};
pub use session::{LoginHandle, SessionStore, SessionView, AUTH_DATA_KEY};
