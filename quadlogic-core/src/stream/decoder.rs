//! Capture log decoder
//!
//! Replays a [`CaptureBuffer`] as a stream of [`SignalEvent`]s. The decoder
//! only ever reads the buffer, so any number of them can run alongside the
//! encoder and each other.
//!
//! Cursor model: `pos` is the byte offset of the next record, `prev` is the
//! event that ends at that offset. When the committed log is exhausted the
//! open interval is synthesized once from the buffer's tail; `at_tail` then
//! stays set until the cursor moves back or seeks.

use super::{SignalStream, StreamError};
use crate::capture::{record, CaptureBuffer};
use crate::event::{Event, Levels, SignalEvent, SignalTime};

/// Independent cursor over a capture log
pub struct CaptureDecoder<'a, const N: usize> {
    buffer: &'a CaptureBuffer<N>,
    /// Offset of the next record to decode forwards
    pos: usize,
    /// Span of the event just before `pos` (or the synthesized tail)
    prev: Event,
    /// Levels held during `prev`
    prev_levels: Levels,
    /// `prev` was synthesized from the tail
    at_tail: bool,
}

impl<const N: usize> Clone for CaptureDecoder<'_, N> {
    fn clone(&self) -> Self {
        Self {
            buffer: self.buffer,
            pos: self.pos,
            prev: self.prev,
            prev_levels: self.prev_levels,
            at_tail: self.at_tail,
        }
    }
}

impl<'a, const N: usize> CaptureDecoder<'a, N> {
    pub(crate) fn new(buffer: &'a CaptureBuffer<N>) -> Self {
        Self {
            buffer,
            pos: 0,
            prev: Event::default(),
            prev_levels: Levels::LOW,
            at_tail: false,
        }
    }

    /// Byte offset of the next record
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Check if the cursor sits after the synthesized tail event
    pub fn at_tail(&self) -> bool {
        self.at_tail
    }

    /// Move back to the first event
    pub fn rewind(&mut self) {
        self.pos = 0;
        self.prev = Event::default();
        self.prev_levels = Levels::LOW;
        self.at_tail = false;
    }

    fn decode(&self, pos: usize, committed: usize) -> Option<(SignalTime, Levels, usize)> {
        let (value, len) = record::decode_at(pos, committed, |i| self.buffer.byte_at(i))?;
        let (duration, levels) = record::unpack(value);
        Some((duration, levels, len))
    }

    /// Decode the record ending at `end`, returning its start offset
    fn decode_before(&self, end: usize, committed: usize) -> Option<(SignalTime, Levels, usize)> {
        let start = record::start_before(end, |i| self.buffer.byte_at(i));
        let (duration, levels, _) = self.decode(start, committed)?;
        Some((duration, levels, start))
    }

    /// Step off the synthesized tail so the cursor sits on a record boundary
    fn leave_tail(&mut self) {
        if self.at_tail {
            self.read_backwards();
        }
    }
}

impl<const N: usize> SignalStream for CaptureDecoder<'_, N> {
    fn seek(&mut self, time: SignalTime) -> Result<(), StreamError> {
        if time <= 0 || self.pos > self.buffer.committed_len() {
            self.rewind();
            if time <= 0 {
                return Ok(());
            }
        }

        self.leave_tail();

        // Walking back costs about as much per record as walking forwards,
        // so restart when the target is estimated to be nearer the start.
        if time < self.prev.start && self.prev.end > 0 {
            let estimate = (time as i128 * self.pos as i128 / self.prev.end as i128) as usize;
            if estimate < self.pos - estimate {
                self.rewind();
            }
        }

        while self.prev.end <= time {
            if self.read_forwards().is_none() {
                break;
            }
        }

        while self.prev.end > time {
            if self.read_backwards().is_none() {
                break;
            }
        }

        // Here prev.end <= time and the next event starts at prev.end
        let mut probe = self.clone();
        match probe.read_forwards() {
            Some(_) => Ok(()),
            None if self.prev.end == time && self.prev.end > 0 => {
                // Exactly at the end of the data: position on the last event
                self.read_backwards();
                Ok(())
            }
            None => {
                debug!("seek to {} past end of data at {}", time, self.prev.end);
                // Park after the last event so forward reads report nothing
                while self.read_forwards().is_some() {}
                Err(StreamError::SeekOutOfRange)
            }
        }
    }

    fn read_forwards(&mut self) -> Option<SignalEvent> {
        if self.at_tail {
            // Only a seek or a backward step leaves this state
            return None;
        }

        loop {
            let committed = self.buffer.committed_len();
            if self.pos > committed {
                // Log was cleared under us
                return None;
            }

            let start = self.prev.end;

            if self.pos < committed {
                let (duration, levels, len) = self.decode(self.pos, committed)?;
                self.pos += len;
                return Some(self.advance(start, start + duration, levels));
            }

            let Some(tail) = self.buffer.tail(committed) else {
                // Tail was promoted while we sampled it; decode the new record
                continue;
            };

            let end = start + tail.duration as SignalTime;
            if start >= end {
                return None;
            }

            self.at_tail = true;
            return Some(self.advance(start, end, tail.levels));
        }
    }

    fn read_backwards(&mut self) -> Option<SignalEvent> {
        let committed = self.buffer.committed_len();
        if self.pos > committed {
            return None;
        }

        if self.at_tail {
            // The tail has no bytes; pos already sits at its start
            self.at_tail = false;
        } else if self.pos == 0 {
            return None;
        } else {
            self.pos = record::start_before(self.pos, |i| self.buffer.byte_at(i));
        }

        let mut event = SignalEvent {
            start: self.prev.start,
            end: self.prev.end,
            old_levels: Levels::LOW,
            levels: self.prev_levels,
        };

        if self.pos == 0 {
            self.prev = Event::default();
            self.prev_levels = Levels::LOW;
        } else {
            let (duration, levels, _) = self.decode_before(self.pos, committed)?;
            event.old_levels = levels;
            self.prev = Event::new(event.start - duration, event.start);
            self.prev_levels = levels;
        }

        Some(event)
    }
}

impl<const N: usize> CaptureDecoder<'_, N> {
    fn advance(&mut self, start: SignalTime, end: SignalTime, levels: Levels) -> SignalEvent {
        let event = SignalEvent {
            start,
            end,
            old_levels: self.prev_levels,
            levels,
        };
        self.prev = event.span();
        self.prev_levels = levels;
        event
    }
}
