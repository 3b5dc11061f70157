use std::io::{self, ErrorKind, Read, Write};

/// Chunk size for streaming copies.
pub const COPY_BUFFER_SIZE: usize = 32 * 1024;

/// Result of a [`copy_limited`] call that did not fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CopyOutcome {
    /// Bytes handed to the destination.
    pub written: u64,
    /// The source had more than `limit` bytes. The excess was not written.
    pub exceeded: bool,
}

/// Copy `src` into `dst`, stopping once `limit` bytes have been written.
///
/// Reads never ask for more than the remaining allowance, so at most `limit`
/// bytes reach `dst`. Once the allowance is spent, a single one-byte probe
/// tells a source of exactly `limit` bytes (end of stream, success) apart
/// from a longer one (`exceeded`).
///
/// A destination that accepts fewer bytes than it was given fails the copy
/// with [`ErrorKind::WriteZero`]. Read errors other than
/// [`ErrorKind::Interrupted`] are returned as-is.
pub fn copy_limited<R, W>(src: &mut R, dst: &mut W, limit: u64) -> io::Result<CopyOutcome>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut buffer = vec![0u8; COPY_BUFFER_SIZE];
    let mut remaining = limit;
    let mut written = 0u64;

    loop {
        if remaining == 0 {
            let mut probe = [0u8; 1];
            let extra = read_retrying(src, &mut probe)?;
            return Ok(CopyOutcome {
                written,
                exceeded: extra > 0,
            });
        }

        let want = usize::try_from(remaining)
            .unwrap_or(usize::MAX)
            .min(buffer.len());
        let nr = read_retrying(src, &mut buffer[..want])?;
        if nr == 0 {
            return Ok(CopyOutcome {
                written,
                exceeded: false,
            });
        }
        remaining -= nr as u64;

        let nw = dst.write(&buffer[..nr])?;
        written += nw as u64;
        if nw != nr {
            return Err(io::Error::new(
                ErrorKind::WriteZero,
                format!("short write: destination accepted {nw} of {nr} bytes"),
            ));
        }
    }
}

fn read_retrying<R: Read + ?Sized>(src: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    loop {
        match src.read(buf) {
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            other => return other,
        }
    }
}
