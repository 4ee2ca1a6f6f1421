//! Capture interrupt line
//!
//! The encoder runs inside the sample interrupt. When it can no longer
//! write safely it masks its own interrupt source, which is the only way
//! capture ever stops.

/// Interrupt line that triggers the capture encoder
///
/// Implementations typically wrap one NVIC line (e.g. the DMA channel
/// interrupt that fires on each half of the sample FIFO).
pub trait CaptureIrq {
    /// Unmask the interrupt so capture resumes
    fn enable(&mut self);

    /// Mask the interrupt so no further chunks are delivered
    fn disable(&mut self);

    /// Check if the interrupt is currently unmasked
    fn is_enabled(&self) -> bool;
}
