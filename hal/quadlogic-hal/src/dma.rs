//! Sample DMA abstractions
//!
//! The sampling hardware streams raw words into a circular FIFO split in two
//! halves. The DMA channel raises a flag when each half is full; the encoder
//! consumes that half while the hardware fills the other one.

/// Snapshot of the DMA channel status flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DmaFlags {
    /// First half of the FIFO has been written
    pub half_transfer: bool,
    /// Second half of the FIFO has been written
    pub transfer_complete: bool,
    /// Bus error during transfer
    pub transfer_error: bool,
}

impl DmaFlags {
    /// Flags with nothing pending
    pub const fn idle() -> Self {
        Self {
            half_transfer: false,
            transfer_complete: false,
            transfer_error: false,
        }
    }
}

/// Double-buffered sample DMA channel
pub trait SampleDma {
    /// Read the current status flags
    fn flags(&self) -> DmaFlags;

    /// Acknowledge the half-transfer flag
    fn clear_half_transfer(&mut self);

    /// Acknowledge the transfer-complete flag
    fn clear_transfer_complete(&mut self);
}
