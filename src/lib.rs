//! syllabus-tui: browse a curriculum and track earned credits in the terminal.

pub mod config;
pub mod layout;
pub mod loader;
pub mod tui;
pub mod types;
