//! Shared constants for animey: app metadata and runtime defaults.

pub mod app;
pub mod defaults;
