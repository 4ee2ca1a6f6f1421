//! Synthetic signal source
//!
//! Plays back one string per channel: `'_'` is low, any other character is
//! high. Handy for exercising consumers without a capture session:
//!
//! ```
//! use quadlogic_core::{PatternStream, SignalStream};
//!
//! let mut stream = PatternStream::single("_--_");
//! let event = stream.read_forwards().unwrap();
//! assert_eq!((event.start, event.end), (0, 1));
//! ```

use super::{SignalStream, StreamError};
use crate::event::{Channel, Levels, SignalEvent, SignalTime};

/// Stream over fixed per-channel strings, one character per tick
#[derive(Debug, Clone)]
pub struct PatternStream<'a> {
    channels: [&'a [u8]; 4],
    /// Length of the longest channel
    len: SignalTime,
    /// Start of the next event
    time: SignalTime,
}

impl<'a> PatternStream<'a> {
    /// Create a stream from channel A..D patterns
    pub fn new(a: &'a str, b: &'a str, c: &'a str, d: &'a str) -> Self {
        let channels = [a.as_bytes(), b.as_bytes(), c.as_bytes(), d.as_bytes()];
        let len = channels.iter().map(|c| c.len()).max().unwrap_or(0) as SignalTime;
        Self {
            channels,
            len,
            time: 0,
        }
    }

    /// Create a stream with only channel A
    pub fn single(a: &'a str) -> Self {
        Self::new(a, "", "", "")
    }

    /// Total length in ticks
    pub fn len(&self) -> SignalTime {
        self.len
    }

    /// Check if every pattern is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Levels at one tick; outside a pattern a channel reads low
    pub fn levels_at(&self, time: SignalTime) -> Levels {
        let mut levels = Levels::LOW;
        if time < 0 {
            return levels;
        }

        for channel in Channel::ALL {
            let high = self.channels[channel.index()]
                .get(time as usize)
                .is_some_and(|&c| c != b'_');
            levels = levels.with(channel, high);
        }
        levels
    }

    /// First tick of the constant run containing `time`
    fn run_start(&self, mut time: SignalTime) -> SignalTime {
        let levels = self.levels_at(time);
        while time > 0 && self.levels_at(time - 1) == levels {
            time -= 1;
        }
        time
    }
}

impl SignalStream for PatternStream<'_> {
    fn seek(&mut self, time: SignalTime) -> Result<(), StreamError> {
        if time <= 0 {
            self.time = 0;
        } else if time < self.len {
            self.time = self.run_start(time);
        } else if time == self.len {
            self.time = self.run_start(time - 1);
        } else {
            self.time = self.len;
            return Err(StreamError::SeekOutOfRange);
        }
        Ok(())
    }

    fn read_forwards(&mut self) -> Option<SignalEvent> {
        if self.time >= self.len {
            return None;
        }

        let start = self.time;
        let levels = self.levels_at(start);
        let mut end = start + 1;
        while end < self.len && self.levels_at(end) == levels {
            end += 1;
        }
        self.time = end;

        Some(SignalEvent {
            start,
            end,
            old_levels: self.levels_at(start - 1),
            levels,
        })
    }

    fn read_backwards(&mut self) -> Option<SignalEvent> {
        if self.time <= 0 {
            return None;
        }

        let end = self.time;
        let start = self.run_start(end - 1);
        self.time = start;

        Some(SignalEvent {
            start,
            end,
            old_levels: self.levels_at(start - 1),
            levels: self.levels_at(start),
        })
    }
}
