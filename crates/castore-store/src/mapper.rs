use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Maps an object key to the directories it is stored under.
///
/// For example, a mapper that turns `"abcdef"` into `["ab", "cd"]` places the
/// object at `<base>/ab/cd/abcdef`.
///
/// Implementations must be pure and deterministic: `put` and `get` call the
/// same mapper with the same key and must land on the same path. Each
/// segment must be a single directory name; the store rejects empty, `.`,
/// `..`, absolute, or separator-bearing segments with
/// [`StoreError::InvalidSegment`].
pub trait PathMapper: Send + Sync + fmt::Debug {
    /// The ordered directory segments for `key`.
    fn segments(&self, key: &str) -> StoreResult<Vec<String>>;
}

/// Every object sits directly under the base path.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FlatMapper;

impl PathMapper for FlatMapper {
    fn segments(&self, _key: &str) -> StoreResult<Vec<String>> {
        Ok(Vec::new())
    }
}

/// Buckets objects by the leading characters of their key.
///
/// Depth `d` yields the first `d` two-character slices of the key: depth 2 on
/// `"abcdef..."` gives `["ab", "cd"]`. Keys shorter than `2 * d` characters
/// are rejected with [`StoreError::KeyTooShort`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DepthMapper {
    depth: usize,
}

impl DepthMapper {
    /// Create a mapper with the given depth. Depth must be at least 1.
    pub fn new(depth: usize) -> StoreResult<Self> {
        if depth == 0 {
            return Err(StoreError::InvalidConfig(
                "depth mapper requires a depth of at least 1".into(),
            ));
        }
        Ok(Self { depth })
    }

    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl PathMapper for DepthMapper {
    fn segments(&self, key: &str) -> StoreResult<Vec<String>> {
        let required = self.depth * 2;
        let prefix: Vec<char> = key.chars().take(required).collect();
        if prefix.len() < required {
            return Err(StoreError::KeyTooShort {
                key: key.to_string(),
                required,
            });
        }
        Ok(prefix.chunks(2).map(|pair| pair.iter().collect()).collect())
    }
}

/// Serializable selector for the built-in mappers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Layout {
    #[default]
    Flat,
    Depth { depth: usize },
}

impl Layout {
    /// Build the mapper this layout describes.
    pub fn mapper(self) -> StoreResult<Arc<dyn PathMapper>> {
        match self {
            Self::Flat => Ok(Arc::new(FlatMapper)),
            Self::Depth { depth } => Ok(Arc::new(DepthMapper::new(depth)?)),
        }
    }
}
