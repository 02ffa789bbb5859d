mod store;

pub use store::{SqliteStore, SqliteStoreFactory};
