//! Input handling: byte decoding and key bindings

pub mod decoder;
pub mod keybindings;
