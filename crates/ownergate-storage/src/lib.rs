//! ownergate-storage: Storage abstraction layer
//!
//! This crate provides the storage abstraction for ownergate, including:
//! - DataStore trait for users, news, comments and notes
//! - In-memory implementation used by the server and by tests
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │             ownergate-storage                │
//! ├─────────────────────────────────────────────┤
//! │  traits.rs   - DataStore trait definition   │
//! │  memory.rs   - In-memory implementation     │
//! │  error.rs    - Storage errors               │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Lookups by id or slug return `Ok(None)` for missing rows: absence is an
//! answer the authorizer needs, not a failure. Errors are reserved for
//! conflicts and for the backend itself misbehaving.

pub mod error;
pub mod memory;
pub mod traits;

// Re-export commonly used types
pub use error::{StorageError, StorageResult};
pub use memory::MemoryDataStore;
pub use traits::{DataStore, HealthStatus, NewComment, NewNews};
