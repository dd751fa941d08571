//! # Edutask Core
//!
//! Core types, traits, and error definitions for Edutask.
//! This crate provides the identifier model and error taxonomy shared by
//! the data access, controller and application layers.

pub mod error;
pub mod id;
pub mod result;
pub mod telemetry;
pub mod traits;
pub mod validation;

pub use error::*;
pub use id::*;
pub use result::*;
pub use telemetry::*;
pub use traits::*;
pub use validation::*;

// Re-export shaku for dependency injection
pub use shaku::{module, Component, HasComponent, Interface};

// Re-export bson so downstream crates agree on one version
pub use bson;
