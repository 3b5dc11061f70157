use std::path::{Path, PathBuf};
use std::sync::Arc;

use castore_crypto::{HashAlgorithm, HashKind};
use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};
use crate::mapper::{Layout, PathMapper};

/// Ceiling applied when no positive `max_object_size` is configured (10 MiB).
pub const DEFAULT_MAX_OBJECT_SIZE: u64 = 10 * 1024 * 1024;

/// Staging directory created under the base path when none is configured.
///
/// Keys are hex, so a dot-prefixed name can never collide with an object.
pub const STAGING_DIR_NAME: &str = ".staging";

/// Options for opening a [`ContentStore`](crate::ContentStore).
///
/// Only `base_path` is required. Unset fields fall back to SHA-256, the flat
/// layout, and a 10 MiB ceiling when the store is opened.
#[derive(Clone, Debug)]
pub struct StoreOptions {
    pub base_path: PathBuf,
    pub hash_algorithm: Option<Arc<dyn HashAlgorithm>>,
    pub path_mapper: Option<Arc<dyn PathMapper>>,
    /// Non-positive values select [`DEFAULT_MAX_OBJECT_SIZE`].
    pub max_object_size: i64,
    /// Where puts stage their data. Defaults to `<base_path>/.staging`.
    /// Must be on the same filesystem as `base_path`.
    pub staging_dir: Option<PathBuf>,
    /// `fsync` staged data before it is renamed into place.
    pub sync_on_commit: bool,
}

impl StoreOptions {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            hash_algorithm: None,
            path_mapper: None,
            max_object_size: 0,
            staging_dir: None,
            sync_on_commit: false,
        }
    }

    pub fn hash_algorithm(mut self, algorithm: Arc<dyn HashAlgorithm>) -> Self {
        self.hash_algorithm = Some(algorithm);
        self
    }

    pub fn path_mapper(mut self, mapper: Arc<dyn PathMapper>) -> Self {
        self.path_mapper = Some(mapper);
        self
    }

    pub fn max_object_size(mut self, bytes: i64) -> Self {
        self.max_object_size = bytes;
        self
    }

    /// Stage puts in `dir` instead of `<base_path>/.staging`.
    ///
    /// `dir` must be on the same filesystem as the base path. Commits are a
    /// rename, and a rename across mounts fails, so every `put` into a store
    /// staged on another filesystem returns [`StoreError::Io`] with the OS
    /// cross-device error (`EXDEV` on Unix).
    pub fn staging_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.staging_dir = Some(dir.into());
        self
    }

    pub fn sync_on_commit(mut self, sync: bool) -> Self {
        self.sync_on_commit = sync;
        self
    }

    /// The ceiling the store will enforce.
    pub fn effective_max_object_size(&self) -> u64 {
        u64::try_from(self.max_object_size)
            .ok()
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_MAX_OBJECT_SIZE)
    }
}

/// File form of [`StoreOptions`], loaded from TOML.
///
/// ```toml
/// base_path = "/var/lib/castore"
/// hash = "sha256"
/// layout = { kind = "depth", depth = 2 }
/// max_object_size = 1048576
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    pub base_path: PathBuf,
    pub hash: HashKind,
    pub layout: Layout,
    pub max_object_size: i64,
    pub staging_dir: Option<PathBuf>,
    pub sync_on_commit: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_path: PathBuf::new(),
            hash: HashKind::default(),
            layout: Layout::default(),
            max_object_size: DEFAULT_MAX_OBJECT_SIZE as i64,
            staging_dir: None,
            sync_on_commit: false,
        }
    }
}

impl StoreConfig {
    pub fn from_toml_str(s: &str) -> StoreResult<Self> {
        toml::from_str(s).map_err(|e| StoreError::InvalidConfig(e.to_string()))
    }

    /// Read and parse a TOML config file.
    pub fn load(path: &Path) -> StoreResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Resolve the named hash and layout into store options.
    pub fn into_options(self) -> StoreResult<StoreOptions> {
        let mut options = StoreOptions::new(self.base_path)
            .hash_algorithm(self.hash.algorithm())
            .path_mapper(self.layout.mapper()?)
            .max_object_size(self.max_object_size)
            .sync_on_commit(self.sync_on_commit);
        options.staging_dir = self.staging_dir;
        Ok(options)
    }
}
