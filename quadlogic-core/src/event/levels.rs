//! Channel level vectors

use core::fmt;

/// Number of captured channels
pub const CHANNEL_COUNT: usize = 4;

/// Mask of the valid level bits
pub const LEVEL_MASK: u8 = 0x0F;

/// Digital input channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Channel {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
}

impl Channel {
    /// All channels in bit order
    pub const ALL: [Channel; CHANNEL_COUNT] = [Channel::A, Channel::B, Channel::C, Channel::D];

    /// Bit index of this channel in a [`Levels`] vector
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Create a channel from its bit index
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// 4-bit vector of channel levels, bit 0 = channel A
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Levels(u8);

impl Levels {
    /// All channels low
    pub const LOW: Levels = Levels(0);

    /// Create from raw bits; bits above channel D are dropped
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & LEVEL_MASK)
    }

    /// Raw bits
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Check if a channel is high
    pub const fn is_high(self, channel: Channel) -> bool {
        self.0 & (1 << channel as u8) != 0
    }

    /// Return a copy with one channel set to `high`
    pub const fn with(self, channel: Channel, high: bool) -> Self {
        let bit = 1 << channel as u8;
        if high {
            Self(self.0 | bit)
        } else {
            Self(self.0 & !bit)
        }
    }
}

/// Renders channel D first, e.g. `0110` for B and C high
impl fmt::Display for Levels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for channel in Channel::ALL.iter().rev() {
            f.write_str(if self.is_high(*channel) { "1" } else { "0" })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bits_masks_upper_nibble() {
        assert_eq!(Levels::from_bits(0xF6).bits(), 0x06);
    }

    #[test]
    fn test_channel_bits() {
        let levels = Levels::LOW.with(Channel::B, true).with(Channel::C, true);
        assert!(!levels.is_high(Channel::A));
        assert!(levels.is_high(Channel::B));
        assert!(levels.is_high(Channel::C));
        assert!(!levels.is_high(Channel::D));
        assert_eq!(levels.with(Channel::B, false).bits(), 0b0100);
    }

    #[test]
    fn test_display_msb_first() {
        assert_eq!(std::format!("{}", Levels::from_bits(0b0110)), "0110");
        assert_eq!(std::format!("{}", Levels::from_bits(0b1000)), "1000");
    }

    #[test]
    fn test_channel_from_index() {
        assert_eq!(Channel::from_index(3), Some(Channel::D));
        assert_eq!(Channel::from_index(4), None);
    }
}
