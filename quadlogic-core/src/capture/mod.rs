//! Transition capture
//!
//! The capture encoder runs in the sample interrupt and appends one record
//! per transition to the shared [`CaptureBuffer`]. The interval that is
//! still open is published separately as the buffer's tail so readers see
//! it grow without waiting for the next edge.

pub mod buffer;
pub mod encoder;
pub mod record;

pub use buffer::{CaptureBuffer, CaptureWriter, Tail};
pub use encoder::{CaptureEncoder, CaptureStatus};
pub use record::RECORD_MAX_BYTES;

use core::fmt;

/// Capture-path failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CaptureError {
    /// No room left for a worst-case record; the log stays valid
    BufferExhausted,
    /// Raw word had bits set outside the expected layout (lost word sync)
    FramingInconsistency,
    /// DMA channel reported a bus error
    DmaTransferError,
    /// Both FIFO halves filled before the encoder caught up
    SampleOverrun,
}

impl CaptureError {
    /// Check if the error can only be cleared by a power cycle
    pub const fn is_fatal(&self) -> bool {
        !matches!(self, CaptureError::BufferExhausted)
    }
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::BufferExhausted => f.write_str("capture buffer full"),
            CaptureError::FramingInconsistency => f.write_str("lost sample word sync"),
            CaptureError::DmaTransferError => f.write_str("sample DMA transfer error"),
            CaptureError::SampleOverrun => f.write_str("sample FIFO overrun"),
        }
    }
}
