//! Document model
//!
//! Rows and their derived display state, the row store, editing operations,
//! the cursor and the file store the document is loaded from and saved to.

pub mod cursor;
pub mod document;
pub mod edit;
pub mod filesystem;
pub mod row;
