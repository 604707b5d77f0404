//! Low-level primitives
//!
//! Tab expansion, syntax profiles and the row highlighter.

pub mod display_width;
pub mod highlighter;
pub mod syntax;
