//! Foundation types for castore.
//!
//! Every object in a castore is named by its [`ObjectKey`]: the lowercase hex
//! encoding of the digest of the object's exact bytes. Keys are derived from
//! content, never chosen by callers.

pub mod error;
pub mod key;

pub use error::TypeError;
pub use key::ObjectKey;
