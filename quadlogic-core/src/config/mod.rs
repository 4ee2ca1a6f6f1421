//! Configuration types
//!
//! Board-agnostic capture and display settings. With the `serde` feature the
//! structures can be persisted as postcard binary data.

pub mod capture;
pub mod mapper;

pub use capture::*;
pub use mapper::*;

use core::fmt;

/// Errors from configuration validation or persistence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A channel bit is zero or has more than one bit set
    InvalidChannelBits,
    /// A channel bit is not covered by the edge mask
    ChannelOutsideMask,
    /// Framing mask overlaps the edge mask
    FramingOverlapsMask,
    /// Screen width or collapse parameters out of range
    InvalidCollapse,
    /// Zoom limits are inverted
    InvalidZoomRange,
    /// Stored bytes could not be decoded
    Deserialize,
    /// Output buffer too small for the encoded configuration
    Serialize,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidChannelBits => f.write_str("channel bit must be a single bit"),
            ConfigError::ChannelOutsideMask => f.write_str("channel bit outside edge mask"),
            ConfigError::FramingOverlapsMask => f.write_str("framing mask overlaps edge mask"),
            ConfigError::InvalidCollapse => f.write_str("invalid screen or collapse settings"),
            ConfigError::InvalidZoomRange => f.write_str("invalid zoom range"),
            ConfigError::Deserialize => f.write_str("stored configuration is corrupted"),
            ConfigError::Serialize => f.write_str("buffer too small for configuration"),
        }
    }
}
