//! Shared capture buffer
//!
//! One statically allocated region written by the sample interrupt and read
//! by any number of foreground decoders without locks:
//!
//! - `storage[..committed]` holds complete records and never changes again
//!   (until an explicit reset).
//! - The tail `{duration, levels}` describes the interval that is still open.
//!   Its duration only grows; its levels only change when it is promoted to
//!   a record, which also advances `committed`.
//!
//! The writer publishes in this order: record bytes, tail duration = 0,
//! tail levels, `committed`. Readers sample `committed`, then the tail
//! levels, then the duration, then `committed` again, and discard the
//! sample if the count moved. See [`CaptureBuffer::tail`].

use portable_atomic::{AtomicBool, AtomicU64, AtomicU8, AtomicUsize, Ordering};

use super::record::{self, RECORD_MAX_BYTES};
use super::CaptureError;
use crate::event::Levels;
use crate::stream::CaptureDecoder;

/// Consistent snapshot of the open interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tail {
    /// Ticks elapsed since the last committed record
    pub duration: u64,
    /// Levels held during that time
    pub levels: Levels,
}

/// Append-only transition log plus live tail
///
/// Typically placed in a `static` so both the interrupt handler and the
/// foreground can reach it:
///
/// ```
/// use quadlogic_core::CaptureBuffer;
///
/// static BUFFER: CaptureBuffer<25_000> = CaptureBuffer::new();
///
/// let writer = BUFFER.writer().unwrap();
/// let decoder = BUFFER.decoder();
/// # drop((writer, decoder));
/// ```
pub struct CaptureBuffer<const N: usize> {
    storage: [AtomicU8; N],
    committed: AtomicUsize,
    tail_duration: AtomicU64,
    tail_levels: AtomicU8,
    writer_taken: AtomicBool,
}

impl<const N: usize> Default for CaptureBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> CaptureBuffer<N> {
    /// Create an empty buffer
    pub const fn new() -> Self {
        Self {
            storage: [const { AtomicU8::new(0) }; N],
            committed: AtomicUsize::new(0),
            tail_duration: AtomicU64::new(0),
            tail_levels: AtomicU8::new(0),
            writer_taken: AtomicBool::new(false),
        }
    }

    /// Take the exclusive write handle
    ///
    /// Returns `None` while another writer is alive.
    pub fn writer(&self) -> Option<CaptureWriter<'_, N>> {
        if self.writer_taken.swap(true, Ordering::AcqRel) {
            return None;
        }

        Some(CaptureWriter {
            buffer: self,
            len: self.committed.load(Ordering::Acquire),
        })
    }

    /// Create a new independent decoder positioned at the start of the log
    pub fn decoder(&self) -> CaptureDecoder<'_, N> {
        CaptureDecoder::new(self)
    }

    /// Storage size in bytes
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Number of bytes holding complete records
    #[inline]
    pub fn committed_len(&self) -> usize {
        self.committed.load(Ordering::Acquire)
    }

    /// How full the log is, rounded to the nearest percent
    pub fn fill_percent(&self) -> u8 {
        if N == 0 {
            return 100;
        }
        let used = self.committed_len() as u64 * 100;
        ((used + N as u64 / 2) / N as u64).min(100) as u8
    }

    /// Read one committed byte
    #[inline]
    pub(crate) fn byte_at(&self, offset: usize) -> u8 {
        self.storage[offset].load(Ordering::Relaxed)
    }

    /// Sample the tail as it stood when the log held `committed` bytes
    ///
    /// Returns `None` if the writer promoted the tail meanwhile; the caller
    /// should decode the new record instead.
    pub fn tail(&self, committed: usize) -> Option<Tail> {
        let levels = Levels::from_bits(self.tail_levels.load(Ordering::Acquire));
        let duration = self.tail_duration.load(Ordering::Acquire);

        if self.committed.load(Ordering::Acquire) != committed {
            return None;
        }

        Some(Tail { duration, levels })
    }
}

/// Exclusive write handle held by the capture encoder
///
/// Dropping the handle makes [`CaptureBuffer::writer`] available again.
pub struct CaptureWriter<'a, const N: usize> {
    buffer: &'a CaptureBuffer<N>,
    /// Local copy of the committed count; only this handle advances it
    len: usize,
}

impl<'a, const N: usize> CaptureWriter<'a, N> {
    /// The buffer this handle writes to
    pub fn buffer(&self) -> &'a CaptureBuffer<N> {
        self.buffer
    }

    /// Bytes still free in the log
    pub fn remaining(&self) -> usize {
        N - self.len
    }

    /// Check if a worst-case record still fits
    #[inline]
    pub fn has_room(&self) -> bool {
        self.remaining() >= RECORD_MAX_BYTES
    }

    /// Levels of the open interval
    pub fn tail_levels(&self) -> Levels {
        Levels::from_bits(self.buffer.tail_levels.load(Ordering::Relaxed))
    }

    /// Close the open interval after `duration` ticks and start a new one
    /// holding `next_levels`
    pub fn promote_tail(&mut self, duration: u64, next_levels: Levels) -> Result<(), CaptureError> {
        if !self.has_room() {
            return Err(CaptureError::BufferExhausted);
        }

        let mut bytes = [0u8; RECORD_MAX_BYTES];
        let len = record::encode(record::pack(duration, self.tail_levels()), &mut bytes);
        for (offset, &byte) in bytes[..len].iter().enumerate() {
            self.buffer.storage[self.len + offset].store(byte, Ordering::Relaxed);
        }
        self.len += len;

        // A zero duration hides the tail from readers while its levels change
        self.buffer.tail_duration.store(0, Ordering::Release);
        self.buffer
            .tail_levels
            .store(next_levels.bits(), Ordering::Release);
        self.buffer.committed.store(self.len, Ordering::Release);
        Ok(())
    }

    /// Replace the levels of an interval that has not lasted any time yet
    pub fn restart_tail(&mut self, levels: Levels) {
        self.buffer.tail_duration.store(0, Ordering::Release);
        self.buffer.tail_levels.store(levels.bits(), Ordering::Release);
    }

    /// Publish how long the open interval has lasted so far
    #[inline]
    pub fn set_tail_duration(&mut self, duration: u64) {
        self.buffer.tail_duration.store(duration, Ordering::Release);
    }

    /// Discard all records and the tail
    ///
    /// Readers see the committed count drop and must seek again.
    pub fn clear(&mut self) {
        self.len = 0;
        self.buffer.tail_duration.store(0, Ordering::Release);
        self.buffer.tail_levels.store(0, Ordering::Release);
        self.buffer.committed.store(0, Ordering::Release);
    }
}

impl<const N: usize> Drop for CaptureWriter<'_, N> {
    fn drop(&mut self) {
        self.buffer.writer_taken.store(false, Ordering::Release);
    }
}
