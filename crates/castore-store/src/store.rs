use std::fs::{self, File};
use std::io::{ErrorKind, Read};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use castore_crypto::{HashAlgorithm, HashingWriter, Sha256};
use castore_types::ObjectKey;
use tempfile::TempPath;
use tracing::{debug, trace, warn};

use crate::config::{StoreOptions, STAGING_DIR_NAME};
use crate::copy::copy_limited;
use crate::error::{StoreError, StoreResult};
use crate::mapper::{FlatMapper, PathMapper};

/// Content-addressed object store rooted at a directory.
///
/// Objects live at `<base>/<mapper segments...>/<key>`, where the key is the
/// hex digest of the object's bytes. There is no index or sidecar metadata:
/// the directory tree is the index.
///
/// Puts stream into a private staging file and become visible only through a
/// single atomic rename, so concurrent readers never observe a partially
/// written object. Reads do not re-verify that the stored bytes still hash to
/// their key; anything that modifies files under the base path out of band is
/// trusted.
#[derive(Debug)]
pub struct ContentStore {
    base_path: PathBuf,
    staging_dir: PathBuf,
    hash: Arc<dyn HashAlgorithm>,
    mapper: Arc<dyn PathMapper>,
    max_object_size: u64,
    sync_on_commit: bool,
}

impl ContentStore {
    /// Open a store, creating the base and staging directories if needed.
    ///
    /// Fails with [`StoreError::NoBasePath`] if no base path is given, and
    /// with [`StoreError::Io`] if either directory cannot be created.
    pub fn new(options: StoreOptions) -> StoreResult<Self> {
        if options.base_path.as_os_str().is_empty() {
            return Err(StoreError::NoBasePath);
        }
        let max_object_size = options.effective_max_object_size();
        let StoreOptions {
            base_path,
            hash_algorithm,
            path_mapper,
            staging_dir,
            sync_on_commit,
            ..
        } = options;

        fs::create_dir_all(&base_path)?;
        let staging_dir = staging_dir.unwrap_or_else(|| base_path.join(STAGING_DIR_NAME));
        fs::create_dir_all(&staging_dir)?;

        let hash = hash_algorithm.unwrap_or_else(|| Arc::new(Sha256));
        let mapper = path_mapper.unwrap_or_else(|| Arc::new(FlatMapper));

        debug!(
            base = %base_path.display(),
            hash = hash.name(),
            max_object_size,
            "opened content store"
        );

        Ok(Self {
            base_path,
            staging_dir,
            hash,
            mapper,
            max_object_size,
            sync_on_commit,
        })
    }

    /// Open a store with default options.
    pub fn open(base_path: impl Into<PathBuf>) -> StoreResult<Self> {
        Self::new(StoreOptions::new(base_path))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn staging_dir(&self) -> &Path {
        &self.staging_dir
    }

    pub fn max_object_size(&self) -> u64 {
        self.max_object_size
    }

    pub fn hash_algorithm(&self) -> &dyn HashAlgorithm {
        self.hash.as_ref()
    }

    /// Store everything `reader` yields and return its key.
    ///
    /// The data is hashed while it streams into a staging file. Inputs longer
    /// than the configured ceiling fail with [`StoreError::SizeExceeded`].
    /// No file is left behind on any failure path. Storing content that is
    /// already present rewrites the same path with the same bytes.
    pub fn put<R: Read>(&self, mut reader: R) -> StoreResult<ObjectKey> {
        let (file, staged) = tempfile::Builder::new()
            .prefix("put-")
            .tempfile_in(&self.staging_dir)?
            .into_parts();

        let mut writer = HashingWriter::new(file, self.hash.new_hasher());
        let copied = copy_limited(&mut reader, &mut writer, self.max_object_size).and_then(
            |outcome| {
                if self.sync_on_commit && !outcome.exceeded {
                    writer.get_ref().sync_all()?;
                }
                Ok(outcome)
            },
        );
        // The staging handle is closed here whatever the outcome.
        let (file, key) = writer.finish();
        drop(file);

        let outcome = match copied {
            Ok(outcome) => outcome,
            Err(e) => return Err(discard(staged, e.into())),
        };
        if outcome.exceeded {
            return Err(discard(
                staged,
                StoreError::SizeExceeded {
                    limit: self.max_object_size,
                },
            ));
        }

        let dest = match self.prepare_destination(&key) {
            Ok(dest) => dest,
            Err(e) => return Err(discard(staged, e)),
        };
        if let Err(e) = staged.persist(&dest) {
            return Err(discard(e.path, e.error.into()));
        }

        debug!(
            key = %key,
            bytes = outcome.written,
            path = %dest.display(),
            "committed object"
        );
        Ok(key)
    }

    /// Store an in-memory buffer.
    pub fn put_bytes(&self, data: &[u8]) -> StoreResult<ObjectKey> {
        self.put(data)
    }

    /// Store the UTF-8 bytes of a string.
    pub fn put_str(&self, text: &str) -> StoreResult<ObjectKey> {
        self.put_bytes(text.as_bytes())
    }

    /// Stream a file from disk into the store.
    pub fn put_file(&self, path: impl AsRef<Path>) -> StoreResult<ObjectKey> {
        let file = File::open(path)?;
        self.put(file)
    }

    /// Open the object stored under `key`.
    ///
    /// Returns `Ok(None)` if no such object exists. The returned file is owned
    /// by the caller and closed when dropped. Its contents are not checked
    /// against the key.
    pub fn get(&self, key: &str) -> StoreResult<Option<File>> {
        let path = self.object_path(key)?;
        match File::open(&path) {
            Ok(file) => Ok(Some(file)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                trace!(key, "object not found");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Size in bytes of the object stored under `key`, without opening it.
    ///
    /// Returns `Ok(None)` if no such object exists.
    pub fn size(&self, key: &str) -> StoreResult<Option<u64>> {
        let path = self.object_path(key)?;
        match fs::metadata(&path) {
            Ok(meta) => Ok(Some(meta.len())),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                trace!(key, "object not found");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Whether an object is stored under `key`.
    pub fn contains(&self, key: &str) -> StoreResult<bool> {
        Ok(self.size(key)?.is_some())
    }

    /// The path `key` is stored at (whether or not it exists).
    pub fn object_path(&self, key: &str) -> StoreResult<PathBuf> {
        Ok(self.object_dir(key)?.join(key))
    }

    fn object_dir(&self, key: &str) -> StoreResult<PathBuf> {
        check_key(key)?;
        let mut dir = self.base_path.clone();
        for segment in self.mapper.segments(key)? {
            check_segment(key, &segment)?;
            dir.push(segment);
        }
        Ok(dir)
    }

    fn prepare_destination(&self, key: &ObjectKey) -> StoreResult<PathBuf> {
        let dir = self.object_dir(key)?;
        fs::create_dir_all(&dir)?;
        Ok(dir.join(key.as_str()))
    }
}

/// Keys become filenames, so they must not be able to leave the base path
/// or address the staging directory.
fn check_key(key: &str) -> StoreResult<()> {
    if key.is_empty() || key.starts_with('.') || key.contains(|c| c == '/' || c == '\\') {
        return Err(StoreError::InvalidKey(key.to_string()));
    }
    Ok(())
}

/// A segment must be exactly one normal directory name, so a mapper cannot
/// replace the base path or climb out of it.
fn check_segment(key: &str, segment: &str) -> StoreResult<()> {
    let mut parts = Path::new(segment).components();
    let single = matches!(
        (parts.next(), parts.next()),
        (Some(Component::Normal(_)), None)
    );
    if !single || segment.contains(|c| c == '/' || c == '\\') {
        return Err(StoreError::InvalidSegment {
            key: key.to_string(),
            segment: segment.to_string(),
        });
    }
    Ok(())
}

/// Remove a staging file, returning the error that caused the discard.
fn discard(staged: TempPath, cause: StoreError) -> StoreError {
    let path = staged.to_path_buf();
    if let Err(e) = staged.close() {
        warn!(path = %path.display(), error = %e, "failed to remove staging file");
    }
    cause
}
