//! View layer
//!
//! Turns editor state into terminal output.

pub mod compositor;
pub mod status_bar;
