//! Data models for the course catalog.
//!
//! - `Course`, `CourseId`, `Category`: catalog entries as sent by the backend
//! - `CourseChanges`: partial course used for edits
//! - `User`: the opaque session object returned by the login endpoint

pub mod course;
pub mod user;

pub use course::{sort_courses_by_seq_no, Category, Course, CourseChanges, CourseId, CoursesResponse};
pub use user::{LoginRequest, User};
