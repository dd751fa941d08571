//! # Edutask App
//!
//! Composition root for the `edutask` binary: dependency injection wiring
//! and the operator commands it exposes.

pub mod app;
pub mod di;

pub use app::App;
pub use di::{build_edutask_module, ControllerResolver, EdutaskModule, USER_COLLECTION};
