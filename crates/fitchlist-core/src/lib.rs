//! Leaf building blocks shared by the engine and the runtime:
//! - `query`: view state -> request parameters
//! - `storage`: key-value persistence for list view state
//! - `path`: data directory resolution and storage key derivation

pub mod error;
pub mod path;
pub mod query;
pub mod storage;

pub use error::{Error, Result};
pub use path::{expand_tilde, resolve_data_dir, storage_key};
pub use query::{FilterEncoding, QueryParams, encode_sort, parse_sort};
pub use storage::{KeyValueStore, MemoryStore, SqliteStore, load_view_state, save_view_state};
