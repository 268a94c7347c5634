//! Bounded copy from an archive entry into a file.
//!
//! Read failures come from decoding the archive and are reported as
//! `Format`; write failures come from storage and stay `Io`.

use std::io::Read;
use std::io::Write;
use std::io::{self};

use crate::ExtractionError;
use crate::error::QuotaResource;

/// Buffer size for entry copies (64KB).
const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Reusable buffer shared by every entry of one extraction.
#[derive(Debug)]
pub struct CopyBuffer {
    buf: Box<[u8]>,
}

impl CopyBuffer {
    /// Creates a new zeroed copy buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: vec![0u8; COPY_BUFFER_SIZE].into_boxed_slice(),
        }
    }

    /// Returns the buffer size in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.buf.len()
    }
}

impl Default for CopyBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Copies at most `limit` bytes from `reader` to `writer`.
///
/// Returns the number of bytes copied. Data beyond `limit` is never read,
/// so the caller decides whether hitting the limit is an error.
///
/// # Errors
///
/// - `Format` if the reader fails (corrupt or undecodable entry data)
/// - `Io` if the writer fails
///
/// # Examples
///
/// ```
/// use mockup_core::copy::{CopyBuffer, copy_bounded};
///
/// let mut buffer = CopyBuffer::new();
/// let mut out = Vec::new();
/// let copied = copy_bounded(&mut &b"abcdef"[..], &mut out, 4, &mut buffer)?;
/// assert_eq!(copied, 4);
/// assert_eq!(out, b"abcd");
/// # Ok::<(), mockup_core::ExtractionError>(())
/// ```
pub fn copy_bounded<R: Read, W: Write>(
    reader: &mut R,
    writer: &mut W,
    limit: u64,
    buffer: &mut CopyBuffer,
) -> Result<u64, ExtractionError> {
    let mut limited = reader.take(limit);
    let mut total: u64 = 0;

    loop {
        let bytes_read = match limited.read(&mut buffer.buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                return Err(ExtractionError::Format(format!(
                    "cannot decode entry data: {e}"
                )));
            }
        };

        writer
            .write_all(&buffer.buf[..bytes_read])
            .map_err(ExtractionError::Io)?;

        total = total
            .checked_add(bytes_read as u64)
            .ok_or(ExtractionError::QuotaExceeded {
                resource: QuotaResource::IntegerOverflow,
            })?;
    }

    Ok(total)
}
