//! DAO implementations.
//!
//! The trait definition lives in the parent `dao/` module. The store behind
//! an implementation is chosen when it is opened.

pub mod dao_impl;

pub use dao_impl::{DaoImpl, DaoImplParameters};
