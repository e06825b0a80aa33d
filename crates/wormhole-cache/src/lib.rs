//! Local cache of the short URLs this client created.
//!
//! [`LocalCache`] keeps an ordered, most-recent-first list of
//! [`UrlRecord`](wormhole_core::UrlRecord)s in memory and rewrites it
//! wholesale to a [`CacheBackend`] after every mutation.

pub mod backend;
pub mod error;
pub mod file;
pub mod memory;
pub mod store;

pub use backend::{CacheBackend, STORAGE_KEY};
pub use error::{PersistenceError, Result};
pub use file::FileBackend;
pub use memory::MemoryBackend;
pub use store::LocalCache;
