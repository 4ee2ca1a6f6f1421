//! Board-agnostic core of the quadlogic handheld logic analyzer
//!
//! This crate contains everything between the sample DMA and the screen
//! that does not depend on a specific chip:
//!
//! - Event model (time spans, 4-channel level vectors)
//! - Shared capture buffer (append-only transition log + live tail)
//! - Capture encoder (runs in the sample interrupt)
//! - Signal streams (log decoder, synthetic pattern source)
//! - Time-position mapper (time <=> pixel with idle collapsing)
//! - Configuration type definitions
//!
//! # Data flow
//!
//! ```text
//! DMA ──► CaptureEncoder ──► CaptureBuffer ──► CaptureDecoder (one per viewer)
//!          (interrupt)        (lock-free)              │
//!                                                      ▼
//!                                               TimeMapper ──► renderer
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

// This must go first so the logging macros are visible to all other modules.
#[macro_use]
mod fmt;

pub mod capture;
pub mod config;
pub mod event;
pub mod mapper;
pub mod stream;
pub mod timefmt;

pub use capture::{
    CaptureBuffer, CaptureEncoder, CaptureError, CaptureStatus, CaptureWriter, RECORD_MAX_BYTES,
};
pub use config::{CaptureConfig, ConfigError, MapperConfig};
pub use event::{Channel, Event, Levels, SignalEvent, SignalTime};
pub use mapper::{Break, TimeMapper};
pub use stream::{CaptureDecoder, PatternStream, SignalStream, StreamError};
pub use timefmt::format_duration;
