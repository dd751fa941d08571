//! # Edutask Service
//!
//! Controllers on top of the DAO layer. They depend only on the
//! [`edutask_repository::Dao`] trait and never on a concrete store.

pub mod controller;
pub mod r#impl;
pub mod user_controller;

pub use controller::Controller;
pub use r#impl::UserControllerComponent;
pub use user_controller::UserController;
