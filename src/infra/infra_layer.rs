// The infra module contains implementations of core traits.
// Each feature implementation goes in its own submodule.

#[path = "drive_integration/mod.rs"]
pub mod drive_integration;
