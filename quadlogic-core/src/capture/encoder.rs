//! Capture encoder
//!
//! Runs inside the sample DMA interrupt. Each invocation scans one half of
//! the sample FIFO for edges, appends a record per edge and publishes the
//! length of the open interval before returning. It never blocks and never
//! allocates.

use quadlogic_hal::{CaptureIrq, SampleDma};

use super::buffer::CaptureWriter;
use super::CaptureError;
use crate::config::CaptureConfig;

/// Capture session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CaptureStatus {
    /// Interrupt enabled, log growing
    Running,
    /// Stopped cleanly; the log is complete and a reset restarts capture
    Halted(CaptureError),
    /// Stopped on a hardware fault; stays latched until power cycle
    Faulted(CaptureError),
}

impl CaptureStatus {
    /// Check if samples are still being recorded
    pub const fn is_running(&self) -> bool {
        matches!(self, CaptureStatus::Running)
    }
}

/// Edge-detecting transition encoder
pub struct CaptureEncoder<'a, I, const N: usize> {
    writer: CaptureWriter<'a, N>,
    irq: I,
    config: CaptureConfig,
    /// Masked value of the most recent sample
    masked: u32,
    /// Ticks since the last edge
    count: u64,
    status: CaptureStatus,
}

impl<'a, I: CaptureIrq, const N: usize> CaptureEncoder<'a, I, N> {
    /// Create an encoder and start a fresh session
    ///
    /// Clears whatever the buffer held and enables the capture interrupt.
    pub fn new(writer: CaptureWriter<'a, N>, irq: I, config: CaptureConfig) -> Self {
        let mut encoder = Self {
            writer,
            irq,
            config,
            masked: 0,
            count: 0,
            status: CaptureStatus::Running,
        };
        encoder.writer.clear();
        encoder.irq.enable();
        encoder
    }

    /// Current session state
    pub fn status(&self) -> CaptureStatus {
        self.status
    }

    /// Active word layout
    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    /// Access the interrupt line
    pub fn irq(&self) -> &I {
        &self.irq
    }

    /// Discard the log and resume capture
    ///
    /// Fails with the latched error if capture stopped on a hardware fault.
    pub fn reset(&mut self) -> Result<(), CaptureError> {
        if let CaptureStatus::Faulted(err) = self.status {
            return Err(err);
        }

        self.irq.disable();
        self.writer.clear();
        self.masked = 0;
        self.count = 0;
        self.status = CaptureStatus::Running;
        self.irq.enable();
        info!("capture reset");
        Ok(())
    }

    /// Interrupt handler body for the double-buffered sample FIFO
    ///
    /// `fifo` is the whole circular buffer; the half that just completed is
    /// encoded. Finding the other half already complete means samples were
    /// overwritten before they were read.
    pub fn on_dma_interrupt<D: SampleDma>(
        &mut self,
        dma: &mut D,
        fifo: &[u32],
    ) -> Result<(), CaptureError> {
        let (first, second) = fifo.split_at(fifo.len() / 2);
        let flags = dma.flags();

        if flags.transfer_error {
            error!("sample DMA transfer error");
            return Err(self.fault(CaptureError::DmaTransferError));
        }

        if flags.half_transfer {
            let result = self.process_chunk(first);
            dma.clear_half_transfer();
            if dma.flags().transfer_complete {
                error!("sample FIFO overrun in first half");
                return Err(self.fault(CaptureError::SampleOverrun));
            }
            result
        } else if flags.transfer_complete {
            let result = self.process_chunk(second);
            dma.clear_transfer_complete();
            if dma.flags().half_transfer {
                error!("sample FIFO overrun in second half");
                return Err(self.fault(CaptureError::SampleOverrun));
            }
            result
        } else {
            Ok(())
        }
    }

    /// Encode one chunk of raw sample words
    pub fn process_chunk(&mut self, samples: &[u32]) -> Result<(), CaptureError> {
        match self.status {
            CaptureStatus::Running => {}
            CaptureStatus::Halted(err) | CaptureStatus::Faulted(err) => return Err(err),
        }

        let mask = self.config.edge_mask;
        let mut pos = 0;

        loop {
            let edge = pos + find_edge(&samples[pos..], mask, self.masked);
            self.count += (edge - pos) as u64;
            pos = edge;

            if pos == samples.len() {
                break;
            }

            let word = samples[pos];
            if !self.config.is_framed(word) {
                error!("lost sample word sync: {=u32:#x}", word);
                self.writer.set_tail_duration(self.count);
                return Err(self.fault(CaptureError::FramingInconsistency));
            }

            let levels = self.config.levels_of(word);
            if self.count == 0 {
                // Edge on the very first sample of the session
                self.writer.restart_tail(levels);
            } else if let Err(err) = self.writer.promote_tail(self.count, levels) {
                self.writer.set_tail_duration(self.count);
                return Err(self.halt(err));
            }

            self.masked = word & mask;
            self.count = 0;
        }

        self.writer.set_tail_duration(self.count);
        Ok(())
    }

    fn halt(&mut self, err: CaptureError) -> CaptureError {
        self.irq.disable();
        warn!(
            "capture halted: {} of {} bytes used",
            N - self.writer.remaining(),
            N
        );
        self.status = CaptureStatus::Halted(err);
        err
    }

    fn fault(&mut self, err: CaptureError) -> CaptureError {
        self.irq.disable();
        self.status = CaptureStatus::Faulted(err);
        err
    }
}

/// Index of the first sample whose masked bits differ from `old`
///
/// Returns `samples.len()` if there is none. Compares four samples per step
/// so the common no-edge case is one branch per quad.
#[inline]
pub fn find_edge(samples: &[u32], mask: u32, old: u32) -> usize {
    let mut quads = samples.chunks_exact(4);
    let mut base = 0;

    for quad in quads.by_ref() {
        let diff = ((quad[0] & mask) ^ old)
            | ((quad[1] & mask) ^ old)
            | ((quad[2] & mask) ^ old)
            | ((quad[3] & mask) ^ old);
        if diff != 0 {
            return base + first_change(quad, mask, old);
        }
        base += 4;
    }

    base + first_change(quads.remainder(), mask, old)
}

fn first_change(samples: &[u32], mask: u32, old: u32) -> usize {
    samples
        .iter()
        .position(|&word| word & mask != old)
        .unwrap_or(samples.len())
}
