//! Persisted route list.
//!
//! Routes are written to a JSON file after every successful insert and read
//! back once when a session starts. Whether the file survives the end of a
//! session is an explicit [`ExitPolicy`].

mod error;
mod file;

pub use error::StoreError;
pub use file::{ExitPolicy, InvalidExitPolicy, RouteStore, RouteStoreConfig, StoredRoute};
