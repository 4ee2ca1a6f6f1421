//! Event model
//!
//! Plain value types shared by the encoder, the streams and the mapper.
//! Time is measured in capture ticks from the start of the session.

pub mod levels;

pub use levels::{Channel, Levels};

/// Absolute time in capture ticks
pub type SignalTime = i64;

/// Half-open time interval `[start, end)`
///
/// Invariant: `start <= end`. A zero-length event marks an instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Event {
    /// First tick covered by the event
    pub start: SignalTime,
    /// First tick after the event
    pub end: SignalTime,
}

impl Event {
    /// Create a new event
    pub const fn new(start: SignalTime, end: SignalTime) -> Self {
        Self { start, end }
    }

    /// Length in ticks
    pub const fn len(&self) -> SignalTime {
        self.end - self.start
    }

    /// Check if the event covers no time at all
    pub const fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Check if `time` falls inside `[start, end)`
    pub const fn contains(&self, time: SignalTime) -> bool {
        self.start <= time && time < self.end
    }
}

/// One stretch of constant channel levels
///
/// Produced at genuine transitions, except for the synthetic live-tail event
/// and events at the edges of a synthetic source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SignalEvent {
    /// Tick at which `levels` took effect
    pub start: SignalTime,
    /// Tick at which `levels` stopped holding
    pub end: SignalTime,
    /// Levels immediately before `start`
    pub old_levels: Levels,
    /// Levels held through `[start, end)`
    pub levels: Levels,
}

impl SignalEvent {
    /// The time span of this event
    pub const fn span(&self) -> Event {
        Event::new(self.start, self.end)
    }

    /// Length in ticks
    pub const fn len(&self) -> SignalTime {
        self.end - self.start
    }

    /// Check if the event covers no time at all
    pub const fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Channels that changed at `start`
    pub const fn toggled(&self) -> Levels {
        Levels::from_bits(self.old_levels.bits() ^ self.levels.bits())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_contains_is_half_open() {
        let event = Event::new(3, 8);
        assert!(event.contains(3));
        assert!(event.contains(7));
        assert!(!event.contains(8));
        assert_eq!(event.len(), 5);
    }

    #[test]
    fn test_empty_event() {
        assert!(Event::new(4, 4).is_empty());
        assert!(!Event::new(4, 5).is_empty());
    }

    #[test]
    fn test_toggled_channels() {
        let event = SignalEvent {
            start: 0,
            end: 1,
            old_levels: Levels::from_bits(0b0010),
            levels: Levels::from_bits(0b0100),
        };
        assert_eq!(event.toggled().bits(), 0b0110);
        assert_eq!(event.span(), Event::new(0, 1));
    }
}
