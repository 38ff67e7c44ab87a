//! Terminal UI pieces for the hookline CLI
//!
//! - Status icons used in command output
//! - The console implementation of the engine's IO interface

pub mod console;
pub mod icons;

pub use console::ConsoleIo;
pub use icons::{Icons, StatusIcon};
