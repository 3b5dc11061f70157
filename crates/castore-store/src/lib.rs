//! Content-addressed object storage on the local filesystem.
//!
//! A [`ContentStore`] accepts arbitrary byte streams and stores each one under
//! the hex digest of its content, analogous to git's `.git/objects/`
//! directory. Identical content always maps to the same key and the same file.
//!
//! # Layout
//!
//! ```text
//! <base_path>/
//!   .staging/                  private in-progress puts
//!   <segment>/.../<key>        committed objects
//! ```
//!
//! The directory segments come from the configured [`PathMapper`]:
//! [`FlatMapper`] (the default) uses none, [`DepthMapper`] buckets objects by
//! the leading characters of their key.
//!
//! # Design Rules
//!
//! 1. Keys are derived from content, never chosen by callers.
//! 2. Stage, then commit: bytes are hashed while they stream into a private
//!    staging file, which becomes visible only through one atomic rename.
//! 3. Inputs larger than the configured ceiling are rejected in full.
//! 4. No staging artifact survives a failed put.
//! 5. A missing object is `Ok(None)`, never an error.
//! 6. Reads trust the write path: stored bytes are not re-hashed on `get`.

pub mod config;
pub mod copy;
pub mod error;
pub mod mapper;
pub mod store;

// Re-export primary types at crate root for ergonomic imports.
pub use castore_crypto::{Blake3, HashAlgorithm, HashKind, Sha256};
pub use castore_types::ObjectKey;
pub use config::{StoreConfig, StoreOptions, DEFAULT_MAX_OBJECT_SIZE, STAGING_DIR_NAME};
pub use copy::{copy_limited, CopyOutcome, COPY_BUFFER_SIZE};
pub use error::{StoreError, StoreResult};
pub use mapper::{DepthMapper, FlatMapper, Layout, PathMapper};
pub use store::ContentStore;
