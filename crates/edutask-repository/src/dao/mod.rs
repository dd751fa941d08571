//! DAO (Data Access Object) layer.
//!
//! A DAO owns one collection handle and exposes record-level CRUD on it.
//!
//! Hierarchy:
//! ```text
//! Controller → DAO (interface + impl) → DocumentStore (MongoDB / memory)
//! ```

pub mod collection_dao;
pub mod r#impl;

pub use collection_dao::Dao;
pub use r#impl::{DaoImpl, DaoImplParameters};
