//! Small helpers shared across the workspace binaries.

pub mod env;
