//! # Edutask Repository
//!
//! Record gateways over a document database:
//!
//! ```text
//! Controller
//!   ↓  Arc<dyn Dao>             (DAO interface)
//! DaoImpl                       (id parsing, transport form)
//!   ↓  Arc<dyn DocumentStore>   (store interface)
//! MongoCollectionStore | InMemoryStore
//!   ↓
//! MongoDB
//! ```
//!
//! ## Structure
//!
//! ```text
//! src/
//!   traits.rs                    ← DocumentStore / DocumentDatabase traits
//!   schema/                      ← SchemaDescriptor, ValidatorProvider
//!   dao/
//!     collection_dao.rs          ← Dao trait
//!     impl/
//!       dao_impl.rs              ← DaoImpl
//!   mongo/                       ← MongoConnection, MongoCollectionStore
//!   memory/                      ← InMemoryDatabase, InMemoryStore
//! ```
//!
//! A collection is created together with its validator the first time a
//! DAO is opened on it; see [`DaoImpl::open`].

pub mod dao;
pub mod memory;
pub mod mongo;
pub mod schema;
pub mod traits;

pub use dao::{Dao, DaoImpl, DaoImplParameters};
pub use memory::{InMemoryDatabase, InMemoryStore};
pub use mongo::{MongoCollectionStore, MongoConnection};
pub use schema::*;
pub use traits::*;
