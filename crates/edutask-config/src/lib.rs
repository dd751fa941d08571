//! # Edutask Config
//!
//! Configuration management for Edutask.
//! Supports layered configuration from files and environment variables.
//! This is the only place in the workspace that reads the process
//! environment; everything downstream receives explicit config structs.

mod app_config;
mod loader;
mod validation;

pub use app_config::*;
pub use loader::*;
pub use validation::*;
