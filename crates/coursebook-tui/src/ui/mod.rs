//! Terminal UI module using ratatui.
//!
//! - `render`: frame layout, status bar and overlays
//! - `input`: keyboard event handling
//! - `styles`: colors and text styling
//! - `tabs`: the course listing

pub mod input;
pub mod render;
pub mod styles;
pub mod tabs;
