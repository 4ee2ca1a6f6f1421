//! Signal event streams
//!
//! A [`SignalStream`] is a seekable, bidirectional cursor over signal events.
//! Every consumer (mapper, exporter, measurement) works on its own clone, so
//! moving one cursor never disturbs another.
//!
//! Two sources implement it:
//! - [`CaptureDecoder`] replays the live capture log
//! - [`PatternStream`] plays back fixed strings, for tests and demos

pub mod decoder;
pub mod pattern;

pub use decoder::CaptureDecoder;
pub use pattern::PatternStream;

use core::fmt;

use crate::event::{SignalEvent, SignalTime};

/// Errors from stream positioning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StreamError {
    /// Seek target lies after the end of the data; the cursor is parked at
    /// the end until the next successful seek
    SeekOutOfRange,
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamError::SeekOutOfRange => f.write_str("seek past end of data"),
        }
    }
}

/// Seekable bidirectional event stream
///
/// `Clone` yields an independent cursor over the same backing data.
pub trait SignalStream: Clone {
    /// Position so the next [`read_forwards`](Self::read_forwards) returns
    /// the event with `start <= time < end`
    ///
    /// Seeking exactly to the end of the data positions on the last event.
    /// `seek(0)` always rewinds to the first event.
    fn seek(&mut self, time: SignalTime) -> Result<(), StreamError>;

    /// Read the next event, or `None` at the end of the data
    fn read_forwards(&mut self) -> Option<SignalEvent>;

    /// Read the event before the cursor and move the cursor before it
    ///
    /// Right after `read_forwards` this returns the same event again.
    fn read_backwards(&mut self) -> Option<SignalEvent>;

    /// Iterate forwards from the current position
    fn events(&mut self) -> Events<'_, Self> {
        Events { stream: self }
    }
}

/// Forward iterator over a stream, see [`SignalStream::events`]
pub struct Events<'s, S> {
    stream: &'s mut S,
}

impl<S: SignalStream> Iterator for Events<'_, S> {
    type Item = SignalEvent;

    fn next(&mut self) -> Option<SignalEvent> {
        self.stream.read_forwards()
    }
}
