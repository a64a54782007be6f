pub mod json;
pub mod memory;
mod session;

pub use session::{SessionStore, StorageError, get, modify};
