//! MongoDB implementations.

mod collection;
mod pool;

pub use collection::MongoCollectionStore;
pub use pool::MongoConnection;
