//! Capture configuration
//!
//! Describes the layout of the raw words delivered by the sampling hardware.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::event::{Channel, Levels};

/// Default tick frequency (ticks per second)
pub const DEFAULT_TICK_HZ: u32 = 500_000;

/// Bits compared for edge detection in the FPGA word
pub const DEFAULT_EDGE_MASK: u32 = 0x0003_4040;

/// Per-channel bits in the FPGA word, channel A..D
pub const DEFAULT_CHANNEL_BITS: [u32; 4] = [0x0000_0040, 0x0000_4000, 0x0001_0000, 0x0002_0000];

/// Bits that are never set in a correctly framed word
pub const DEFAULT_FRAMING_MASK: u32 = 0xFF00_0000;

/// Raw sample word layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CaptureConfig {
    /// Bits compared between consecutive samples
    pub edge_mask: u32,
    /// Bit carrying each channel's level, indexed by [`Channel`]
    pub channel_bits: [u32; 4],
    /// Bits that indicate lost word sync when set
    pub framing_mask: u32,
    /// Sample rate after decimation (ticks per second)
    pub tick_hz: u32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            edge_mask: DEFAULT_EDGE_MASK,
            channel_bits: DEFAULT_CHANNEL_BITS,
            framing_mask: DEFAULT_FRAMING_MASK,
            tick_hz: DEFAULT_TICK_HZ,
        }
    }
}

impl CaptureConfig {
    /// Check the word layout is self-consistent
    pub fn validate(&self) -> Result<(), ConfigError> {
        for &bit in &self.channel_bits {
            if bit.count_ones() != 1 {
                return Err(ConfigError::InvalidChannelBits);
            }
            if bit & self.edge_mask == 0 {
                return Err(ConfigError::ChannelOutsideMask);
            }
        }

        if self.framing_mask & self.edge_mask != 0 {
            return Err(ConfigError::FramingOverlapsMask);
        }

        Ok(())
    }

    /// Extract the channel levels from a raw word
    #[inline]
    pub fn levels_of(&self, word: u32) -> Levels {
        let mut levels = Levels::LOW;
        for channel in Channel::ALL {
            if word & self.channel_bits[channel.index()] != 0 {
                levels = levels.with(channel, true);
            }
        }
        levels
    }

    /// Check a raw word for framing errors
    #[inline]
    pub fn is_framed(&self, word: u32) -> bool {
        word & self.framing_mask == 0
    }

    /// Serialize with postcard into `buffer`, returning the used part
    #[cfg(feature = "serde")]
    pub fn to_bytes<'b>(&self, buffer: &'b mut [u8]) -> Result<&'b mut [u8], ConfigError> {
        postcard::to_slice(self, buffer).map_err(|_| ConfigError::Serialize)
    }

    /// Deserialize from postcard bytes and validate
    #[cfg(feature = "serde")]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = postcard::from_bytes(bytes).map_err(|_| ConfigError::Deserialize)?;
        config.validate()?;
        Ok(config)
    }
}
