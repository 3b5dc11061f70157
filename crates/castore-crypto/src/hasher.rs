use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use castore_types::ObjectKey;
use serde::{Deserialize, Serialize};

/// An in-progress digest computation.
pub trait ContentHasher: Send {
    /// Feed more bytes into the digest.
    fn update(&mut self, data: &[u8]);

    /// Consume the accumulator and return the raw digest bytes.
    fn finalize(self: Box<Self>) -> Vec<u8>;
}

/// A digest constructor.
///
/// Implementations must be deterministic: the same bytes fed into two hashers
/// from the same algorithm produce the same digest.
pub trait HashAlgorithm: Send + Sync + fmt::Debug {
    /// Short lowercase name (e.g. `"sha256"`).
    fn name(&self) -> &'static str;

    /// A fresh accumulator, independent of any other.
    fn new_hasher(&self) -> Box<dyn ContentHasher>;

    /// Digest an in-memory buffer and return its key.
    fn key_of(&self, data: &[u8]) -> ObjectKey {
        let mut hasher = self.new_hasher();
        hasher.update(data);
        ObjectKey::from_digest(&hasher.finalize())
    }
}

/// SHA-256, the default algorithm.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Sha256;

impl HashAlgorithm for Sha256 {
    fn name(&self) -> &'static str {
        "sha256"
    }

    fn new_hasher(&self) -> Box<dyn ContentHasher> {
        Box::new(<sha2::Sha256 as sha2::Digest>::new())
    }
}

impl ContentHasher for sha2::Sha256 {
    fn update(&mut self, data: &[u8]) {
        <sha2::Sha256 as sha2::Digest>::update(self, data);
    }

    fn finalize(self: Box<Self>) -> Vec<u8> {
        <sha2::Sha256 as sha2::Digest>::finalize(*self).to_vec()
    }
}

/// BLAKE3 (256-bit output).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Blake3;

impl HashAlgorithm for Blake3 {
    fn name(&self) -> &'static str {
        "blake3"
    }

    fn new_hasher(&self) -> Box<dyn ContentHasher> {
        Box::new(blake3::Hasher::new())
    }
}

impl ContentHasher for blake3::Hasher {
    fn update(&mut self, data: &[u8]) {
        blake3::Hasher::update(self, data);
    }

    fn finalize(self: Box<Self>) -> Vec<u8> {
        blake3::Hasher::finalize(&self).as_bytes().to_vec()
    }
}

/// Named selector for the built-in algorithms, used by configuration files
/// and the command line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashKind {
    #[default]
    Sha256,
    Blake3,
}

impl HashKind {
    /// The algorithm this selector names.
    pub fn algorithm(self) -> Arc<dyn HashAlgorithm> {
        match self {
            Self::Sha256 => Arc::new(Sha256),
            Self::Blake3 => Arc::new(Blake3),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            Self::Blake3 => "blake3",
        }
    }
}

impl fmt::Display for HashKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashKind {
    type Err = HashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sha256" | "sha-256" => Ok(Self::Sha256),
            "blake3" => Ok(Self::Blake3),
            _ => Err(HashError::UnknownAlgorithm(s.to_string())),
        }
    }
}

/// Errors from hashing operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HashError {
    #[error("unknown hash algorithm: {0} (expected sha256 or blake3)")]
    UnknownAlgorithm(String),
}
