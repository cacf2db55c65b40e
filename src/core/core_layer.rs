// The core module contains all client logic.
// Nothing in here knows about reqwest, files, or the command line.

#[path = "config/mod.rs"]
pub mod config;

#[path = "drive_integration/mod.rs"]
pub mod drive_integration;
