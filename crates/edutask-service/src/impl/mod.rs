//! Controller implementations.
//!
//! Trait definitions live in the parent module (e.g. `user_controller.rs`).

pub mod user_controller_impl;

pub use user_controller_impl::UserControllerComponent;
