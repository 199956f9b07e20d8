//! Single-pass body encoding with a running SHA-256.

use std::io::{self, Write};

use sha2::{Digest, Sha256};

/// Writer that forwards every byte to `inner` and into a SHA-256 digest.
///
/// Encoding a request body through this writer guarantees that the digest
/// the signer sees covers exactly the bytes that go on the wire.
pub(crate) struct DigestWriter<W> {
    inner: W,
    hasher: Sha256,
}

impl<W: Write> DigestWriter<W> {
    pub(crate) fn new(inner: W) -> Self {
        Self {
            inner,
            hasher: Sha256::new(),
        }
    }

    /// Returns the inner writer and the digest of everything written.
    pub(crate) fn finish(self) -> (W, [u8; 32]) {
        (self.inner, self.hasher.finalize().into())
    }
}

impl<W: Write> Write for DigestWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.hasher.update(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
