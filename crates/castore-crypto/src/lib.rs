//! Content hashing for castore.
//!
//! A [`HashAlgorithm`] is a digest constructor: every call to
//! [`HashAlgorithm::new_hasher`] hands out a fresh, independent
//! [`ContentHasher`] accumulator. The store feeds bytes into the accumulator as
//! they stream to disk and names the object after the finalized digest.
//!
//! All digests wrap established libraries (`sha2`, `blake3`), no custom
//! cryptography.

pub mod hasher;
pub mod writer;

pub use hasher::{Blake3, ContentHasher, HashAlgorithm, HashError, HashKind, Sha256};
pub use writer::HashingWriter;
