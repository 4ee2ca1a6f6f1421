//! Quadlogic Hardware Abstraction Layer
//!
//! This crate defines the hardware seams of the capture path. A chip-specific
//! HAL implements them for the sampling DMA channel and its interrupt line,
//! and the board-agnostic encoder in `quadlogic-core` drives them.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Capture encoder (quadlogic-core)       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  quadlogic-hal (this crate - traits)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  chip HAL: DMA channel + NVIC line      │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`irq::CaptureIrq`] - Enable/disable the sample interrupt
//! - [`dma::SampleDma`] - Double-buffered sample DMA status flags

#![no_std]
#![deny(unsafe_code)]

pub mod dma;
pub mod irq;

// Re-export key traits at crate root for convenience
pub use dma::{DmaFlags, SampleDma};
pub use irq::CaptureIrq;
