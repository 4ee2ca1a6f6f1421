//! Time-position mapper configuration

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Width of the waveform area on the handheld's LCD
pub const DEFAULT_SCREEN_WIDTH: i32 = 400;

/// Most zoomed-out level the UI allows (2^-30 pixels per tick)
pub const DEFAULT_MIN_ZOOM: i32 = -30;

/// Most zoomed-in level the UI allows (256 pixels per tick)
pub const DEFAULT_MAX_ZOOM: i32 = 8;

/// Screen geometry and idle-collapsing parameters, all in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MapperConfig {
    /// Width of the time axis
    pub screen_width: i32,
    /// Intervals longer than this on screen are collapsed
    pub collapse_threshold_px: i32,
    /// Width a collapsed interval occupies on screen
    pub collapse_width_px: i32,
    /// Lowest accepted zoom exponent
    pub min_zoom: i32,
    /// Highest accepted zoom exponent
    pub max_zoom: i32,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self::for_width(DEFAULT_SCREEN_WIDTH)
    }
}

impl MapperConfig {
    /// Defaults scaled to a screen width: collapse anything wider than the
    /// screen down to a quarter of it
    pub const fn for_width(screen_width: i32) -> Self {
        Self {
            screen_width,
            collapse_threshold_px: screen_width,
            collapse_width_px: screen_width / 4,
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
        }
    }

    /// Check the parameters are usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.screen_width <= 0 || self.collapse_threshold_px <= 0 {
            return Err(ConfigError::InvalidCollapse);
        }

        if self.collapse_width_px < 0 || self.collapse_width_px > self.collapse_threshold_px {
            return Err(ConfigError::InvalidCollapse);
        }

        if self.min_zoom > self.max_zoom || self.min_zoom < -62 || self.max_zoom > 30 {
            return Err(ConfigError::InvalidZoomRange);
        }

        Ok(())
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_handheld() {
        let config = MapperConfig::default();
        assert_eq!(config.screen_width, 400);
        assert_eq!(config.collapse_threshold_px, 400);
        assert_eq!(config.collapse_width_px, 100);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_rejects_collapse_wider_than_threshold() {
        let config = MapperConfig {
            collapse_width_px: 500,
            ..MapperConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidCollapse));
    }

    #[test]
    fn test_rejects_inverted_zoom_range() {
        let config = MapperConfig {
            min_zoom: 4,
            max_zoom: 3,
            ..MapperConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidZoomRange));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_postcard_persistence() {
        let config = MapperConfig::for_width(320);
        let mut buffer = [0u8; 64];
        let bytes = config.to_bytes(&mut buffer).unwrap();
        assert_eq!(MapperConfig::from_bytes(bytes).unwrap(), config);
    }
}
