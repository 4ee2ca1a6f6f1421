//! Binary record format
//!
//! Each record is one base-128 varint (7 payload bits per byte, least
//! significant group first, `0x80` set on every byte but the last). The
//! decoded value is `(duration_ticks << 4) | level_bits`.

use crate::event::{Levels, SignalTime};

/// Continuation flag on all but the final byte of a record
pub const CONTINUATION: u8 = 0x80;

/// Payload bits per byte
const PAYLOAD_MASK: u8 = 0x7F;

/// Number of low bits holding the level vector
pub const LEVEL_BITS: u32 = 4;

/// Worst-case encoded size of a 64-bit value
pub const RECORD_MAX_BYTES: usize = 10;

/// Longest duration a single record can carry
pub const MAX_RECORD_DURATION: u64 = u64::MAX >> LEVEL_BITS;

/// Combine a duration and a level vector into a record value
#[inline]
pub fn pack(duration: u64, levels: Levels) -> u64 {
    (duration.min(MAX_RECORD_DURATION) << LEVEL_BITS) | levels.bits() as u64
}

/// Split a record value into duration and level vector
#[inline]
pub fn unpack(value: u64) -> (SignalTime, Levels) {
    ((value >> LEVEL_BITS) as SignalTime, Levels::from_bits(value as u8))
}

/// Encode `value` into `out`, returning the number of bytes used
///
/// Zero encodes as a single `0x00` byte.
pub fn encode(mut value: u64, out: &mut [u8; RECORD_MAX_BYTES]) -> usize {
    let mut len = 0;
    loop {
        let byte = value as u8 & PAYLOAD_MASK;
        value >>= 7;
        if value == 0 {
            out[len] = byte;
            return len + 1;
        }
        out[len] = byte | CONTINUATION;
        len += 1;
    }
}

/// Decode the record starting at `pos`
///
/// `byte_at` is only called for offsets below `limit`. Returns the value and
/// the record length, or `None` if the record is truncated at `limit` or
/// longer than [`RECORD_MAX_BYTES`].
pub fn decode_at(
    pos: usize,
    limit: usize,
    mut byte_at: impl FnMut(usize) -> u8,
) -> Option<(u64, usize)> {
    let mut value = 0u64;
    let mut shift = 0u32;
    let mut offset = pos;

    while offset < limit && offset - pos < RECORD_MAX_BYTES {
        let byte = byte_at(offset);
        value |= ((byte & PAYLOAD_MASK) as u64) << shift;
        offset += 1;
        shift += 7;
        if byte & CONTINUATION == 0 {
            return Some((value, offset - pos));
        }
    }

    None
}

/// Find the start of the record that ends just before `end`
///
/// Walks backwards over continuation-tagged bytes; `end` must be a record
/// boundary greater than zero.
pub fn start_before(end: usize, mut byte_at: impl FnMut(usize) -> u8) -> usize {
    let mut start = end - 1;
    while start > 0 && byte_at(start - 1) & CONTINUATION != 0 {
        start -= 1;
    }
    start
}
