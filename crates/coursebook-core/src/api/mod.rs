//! REST API client for the course catalog backend.
//!
//! `ApiClient` talks to three endpoints:
//!
//! - `GET /api/courses` lists all courses
//! - `PUT /api/courses/{id}` saves a partial course
//! - `POST /api/login` authenticates and returns the user object
//!
//! The stores depend on the `CourseGateway` and `AuthGateway` traits rather
//! than on the client directly.

pub mod client;
pub mod error;
pub mod gateway;

pub use client::ApiClient;
pub use error::ApiError;
pub use gateway::{AuthGateway, CourseGateway};
