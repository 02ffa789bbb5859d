pub mod calculations;
pub mod format;
pub mod models;
pub mod records;
pub mod store;

pub use models::*;
pub use store::{KeyValueStore, StoreError};
