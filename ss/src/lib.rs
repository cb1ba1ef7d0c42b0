//! SessionStore - keyed record store for pipeline state
//!
//! Holds serializable records grouped by collection. A store is either purely
//! in-memory or backed by a directory, in which case every write is mirrored
//! to disk and reloaded on the next open.
//!
//! # Layout
//!
//! ```text
//! .sessionstore/
//! └── {collection}/
//!     ├── {id}.json
//!     └── ...
//! ```
//!
//! # Example
//!
//! ```ignore
//! use sessionstore::Store;
//!
//! let mut store = Store::open(".sessionstore")?;
//! store.put(&session)?;
//! let loaded: Option<Session> = store.get(&session.id)?;
//! ```

mod record;
mod store;

pub use record::{Record, generate_id, now_ms};
pub use store::{Store, StoreStats};
