//! Time-position mapper
//!
//! Converts between capture time and horizontal screen pixels. Zoom is a
//! power of two: zoom `z` shows `2^z` pixels per tick, so positive values
//! zoom in.
//!
//! Intervals whose on-screen length exceeds the collapse threshold are
//! squeezed to a fixed width and recorded as [`Break`]s, so a capture with
//! long idle stretches still fits on one screen:
//!
//! ```text
//!   time:   |--|-|----------- idle -----------|-|--|
//!   screen: |--|-|--/ /--|-|--|
//!                   ^ Break.x
//! ```
//!
//! Every operation that moves the view recomputes the left edge and the
//! Break list from scratch by walking a private clone of the stream.

use heapless::Vec;

use crate::config::{ConfigError, MapperConfig};
use crate::event::SignalTime;
use crate::stream::SignalStream;

/// Maximum number of Breaks tracked for one screen
pub const MAX_BREAKS: usize = 32;

/// A collapsed interval of the time axis
///
/// Every time in `left..=right` maps to the pixel `x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Break {
    /// Screen position of the collapse
    pub x: i32,
    /// First collapsed tick
    pub left: SignalTime,
    /// Last collapsed tick
    pub right: SignalTime,
}

impl Break {
    /// Real duration hidden by this Break
    pub const fn hidden(&self) -> SignalTime {
        self.right - self.left
    }
}

/// Bidirectional time <=> pixel mapping with idle collapsing
pub struct TimeMapper<S> {
    stream: S,
    config: MapperConfig,
    zoom: i32,
    /// Time shown at the screen's horizontal midpoint
    center: SignalTime,
    /// Time shown at pixel 0
    left_edge: SignalTime,
    breaks: Vec<Break, MAX_BREAKS>,
}

impl<S: SignalStream> TimeMapper<S> {
    /// Create a mapper over a clone of `stream`, centered on time 0
    pub fn new(stream: &S, config: MapperConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(stream, config))
    }

    /// Create a mapper with [`MapperConfig::default`]
    pub fn with_defaults(stream: &S) -> Self {
        Self::build(stream, MapperConfig::default())
    }

    fn build(stream: &S, config: MapperConfig) -> Self {
        let mut mapper = Self {
            stream: stream.clone(),
            config,
            zoom: 0,
            center: 0,
            left_edge: 0,
            breaks: Vec::new(),
        };
        mapper.refresh();
        mapper
    }

    /// Active screen and collapse settings
    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    /// Current zoom exponent
    pub fn get_zoom(&self) -> i32 {
        self.zoom
    }

    /// Change the zoom level, clamped to the configured range
    pub fn set_zoom(&mut self, zoom: i32) {
        self.zoom = zoom.clamp(self.config.min_zoom, self.config.max_zoom);
        self.refresh();
    }

    /// Time at the screen's midpoint
    pub fn get_xpos(&self) -> SignalTime {
        self.center
    }

    /// Center the view on `time`
    pub fn set_xpos(&mut self, time: SignalTime) {
        self.center = time.max(0);
        self.refresh();
    }

    /// Scroll the view by `pixels` (positive moves towards later times)
    pub fn move_xpos(&mut self, pixels: i32) {
        let x = self.get_x(self.center).saturating_add(pixels);
        self.center = self.get_time(x).max(0);
        self.refresh();
    }

    /// Time shown at pixel 0
    pub fn left_edge_time(&self) -> SignalTime {
        self.left_edge
    }

    /// Breaks on the current screen, ordered by position
    pub fn get_breaks(&self) -> &[Break] {
        &self.breaks
    }

    /// Recompute the view for the current zoom and center
    ///
    /// Call this periodically during a live capture so new data scrolls in.
    pub fn refresh(&mut self) {
        self.left_edge = self.find_left_edge();
        self.find_breaks();
    }

    /// Time shown at pixel `x`
    pub fn get_time(&self, x: i32) -> SignalTime {
        let mut time = self.left_edge.saturating_add(self.pixels_to_ticks(x));
        for brk in self.breaks.iter().take_while(|brk| brk.x < x) {
            time += brk.hidden();
        }
        time
    }

    /// Pixel showing `time`
    ///
    /// Every time inside a Break maps to that Break's `x`.
    pub fn get_x(&self, time: SignalTime) -> i32 {
        let mut gaps = 0;
        for brk in &self.breaks {
            if brk.right < time {
                gaps += brk.hidden();
            } else if brk.left <= time {
                return brk.x;
            } else {
                break;
            }
        }

        self.ticks_to_pixels(time - gaps - self.left_edge)
    }

    fn ticks_to_pixels(&self, ticks: SignalTime) -> i32 {
        let pixels = if self.zoom >= 0 {
            ticks.saturating_mul(1 << self.zoom)
        } else {
            ticks >> -self.zoom
        };
        pixels.clamp(i32::MIN as i64, i32::MAX as i64) as i32
    }

    fn pixels_to_ticks(&self, pixels: i32) -> SignalTime {
        let pixels = pixels as SignalTime;
        if self.zoom >= 0 {
            pixels >> self.zoom
        } else {
            pixels.saturating_mul(1 << -self.zoom)
        }
    }

    /// Check if an interval is drawn collapsed at the current zoom
    fn is_collapsed(&self, len: SignalTime) -> bool {
        len > 0 && self.ticks_to_pixels(len) > self.config.collapse_threshold_px
    }

    /// Walk back from the center until half a screen is filled
    ///
    /// The last interval of the data is never collapsed, matching
    /// [`find_breaks`](Self::find_breaks) which drops a trailing Break.
    fn find_left_edge(&mut self) -> SignalTime {
        let center = self.center;
        let half_width = self.pixels_to_ticks(self.config.screen_width / 2);
        let half_collapsed = self.pixels_to_ticks(self.config.collapse_width_px) / 2;
        let collapsed_len = 2 * half_collapsed;

        if self.stream.seek(center).is_err() {
            trace!("center {} is past the end of data", center);
        }
        let mut at_last = match self.stream.read_forwards() {
            Some(_) => self.stream.clone().read_forwards().is_none(),
            None => true,
        };

        // Ticks of signal covered, and ticks of screen width they occupy
        let mut signal_ticks: SignalTime = 0;
        let mut screen_ticks: SignalTime = 0;

        while screen_ticks < half_width {
            let Some(event) = self.stream.read_backwards() else {
                break;
            };

            let real_len = event.len();
            let partial_len = (event.end.min(center) - event.start).max(0);
            let collapsed = !at_last && self.is_collapsed(real_len);
            at_last = false;

            if !collapsed {
                signal_ticks += partial_len;
                screen_ticks += partial_len;
            } else if partial_len < half_collapsed {
                // Center is on the left side of the Break
                signal_ticks += partial_len;
                screen_ticks += partial_len;
            } else if screen_ticks + half_collapsed < half_width {
                // Center is on the right side; the Break fits entirely
                let hidden_right = (real_len - partial_len).min(half_collapsed);
                signal_ticks += partial_len;
                screen_ticks += collapsed_len - hidden_right;
            } else {
                // Break reaches the left edge of the screen
                signal_ticks += half_collapsed;
                screen_ticks += half_collapsed;
            }
        }

        signal_ticks -= screen_ticks - half_width;
        (center - signal_ticks).max(0)
    }

    /// Walk forward from the left edge collecting Breaks
    fn find_breaks(&mut self) {
        let half_collapsed = self.pixels_to_ticks(self.config.collapse_width_px) / 2;
        self.breaks.clear();

        if self.stream.seek(self.left_edge).is_err() {
            return;
        }

        let mut last_start = self.left_edge;
        while let Some(event) = self.stream.read_forwards() {
            last_start = event.start;
            if self.get_x(event.start) >= self.config.screen_width {
                break;
            }

            if !self.is_collapsed(event.len()) {
                continue;
            }

            let left = (event.start + half_collapsed).max(self.left_edge);
            let right = event.end - half_collapsed;
            if right <= left {
                continue;
            }

            let brk = Break {
                x: self.get_x(left),
                left,
                right,
            };
            if brk.x >= self.config.screen_width {
                break;
            }
            if self.breaks.push(brk).is_err() {
                warn!("break list full at x={}", brk.x);
                break;
            }
        }

        // Nothing to show after the last Break
        if let Some(last) = self.breaks.last() {
            if last_start < last.left && self.stream.read_forwards().is_none() {
                self.breaks.pop();
            }
        }

        trace!(
            "left edge {} zoom {} breaks {}",
            self.left_edge,
            self.zoom,
            self.breaks.len()
        );
    }
}
