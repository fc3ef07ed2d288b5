//! Terminal UI components.
//!
//! This module contains all UI-related code including:
//! - [`viewport`]: Scroll position and visible window over the document
//! - [`layout`]: Geometry of the centered, bordered box
//! - [`style`]: Theming and colors

pub mod layout;
pub mod style;
pub mod viewport;

mod render;

pub use render::{LOADING, compose_box, render};
