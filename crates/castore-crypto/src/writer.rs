use std::io::{self, Write};

use castore_types::ObjectKey;

use crate::hasher::ContentHasher;

/// A writer that mirrors every byte accepted by `inner` into a hasher.
///
/// Only the bytes the inner writer reports as written are hashed, so the
/// digest always describes exactly what reached the sink.
pub struct HashingWriter<W> {
    inner: W,
    hasher: Box<dyn ContentHasher>,
}

impl<W: Write> HashingWriter<W> {
    pub fn new(inner: W, hasher: Box<dyn ContentHasher>) -> Self {
        Self { inner, hasher }
    }

    /// Finish hashing, returning the inner writer and the content key.
    pub fn finish(self) -> (W, ObjectKey) {
        let key = ObjectKey::from_digest(&self.hasher.finalize());
        (self.inner, key)
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }
}

impl<W: Write> Write for HashingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.hasher.update(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
