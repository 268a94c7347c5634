//! Cumulative decompressed-size budget.

use crate::ExtractionError;
use crate::Result;
use crate::error::QuotaResource;

/// Tracks decompressed bytes across an entire archive.
#[derive(Debug)]
pub struct QuotaTracker {
    max_total_size: u64,
    bytes_written: u64,
}

impl QuotaTracker {
    /// Creates a tracker with the given ceiling.
    #[must_use]
    pub fn new(max_total_size: u64) -> Self {
        Self {
            max_total_size,
            bytes_written: 0,
        }
    }

    /// Upper bound for the next copy: remaining budget plus one byte.
    ///
    /// Reading one byte past the budget is what makes crossing the ceiling
    /// observable without reading the rest of an oversized entry.
    #[must_use]
    pub fn next_read_limit(&self) -> u64 {
        self.max_total_size
            .saturating_sub(self.bytes_written)
            .saturating_add(1)
    }

    /// Records bytes copied for one file.
    ///
    /// # Errors
    ///
    /// Returns `QuotaExceeded` once the cumulative total is above the ceiling.
    pub fn record(&mut self, size: u64) -> Result<()> {
        self.bytes_written =
            self.bytes_written
                .checked_add(size)
                .ok_or(ExtractionError::QuotaExceeded {
                    resource: QuotaResource::IntegerOverflow,
                })?;

        if self.bytes_written > self.max_total_size {
            return Err(ExtractionError::QuotaExceeded {
                resource: QuotaResource::TotalSize {
                    current: self.bytes_written,
                    max: self.max_total_size,
                },
            });
        }

        Ok(())
    }

    /// Returns the total bytes recorded so far.
    #[must_use]
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }
}
