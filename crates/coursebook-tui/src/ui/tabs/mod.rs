//! Content areas rendered below the title bar.

pub mod home;
