//! Human-readable durations for Break labels

use core::fmt::Write;

use heapless::String;

use crate::event::SignalTime;

const UNITS: [(u128, &str); 3] = [(1_000, "us"), (1_000_000, "ms"), (1_000_000_000, "s")];

/// Format `ticks` at `tick_hz` with two significant digits
///
/// ```
/// use quadlogic_core::format_duration;
///
/// assert_eq!(format_duration(750, 500_000).as_str(), "1.5 ms");
/// ```
pub fn format_duration(ticks: SignalTime, tick_hz: u32) -> String<16> {
    let mut out = String::new();
    let nanos = ticks.unsigned_abs() as u128 * 1_000_000_000 / tick_hz.max(1) as u128;
    let sign = if ticks < 0 { "-" } else { "" };

    // Output is at most 16 bytes unless the duration exceeds ~10^10 s,
    // in which case the label is truncated.
    if nanos < 1_000 {
        let _ = write!(out, "{}{} ns", sign, nanos);
        return out;
    }

    let mut unit = UNITS[0];
    for next in &UNITS[1..] {
        if nanos < next.0 {
            break;
        }
        unit = *next;
    }

    let (divider, name) = unit;
    let integer = nanos / divider;
    if integer < 10 {
        let fraction = (nanos % divider) * 10 / divider;
        let _ = write!(out, "{}{}.{} {}", sign, integer, fraction, name);
    } else {
        let _ = write!(out, "{}{} {}", sign, integer, name);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const MHZ: u32 = 1_000_000;

    #[test]
    fn test_nanoseconds() {
        assert_eq!(format_duration(0, MHZ).as_str(), "0 ns");
        assert_eq!(format_duration(1, 2 * MHZ).as_str(), "500 ns");
    }

    #[test]
    fn test_scaled_units() {
        assert_eq!(format_duration(1, MHZ).as_str(), "1.0 us");
        assert_eq!(format_duration(12, MHZ).as_str(), "12 us");
        assert_eq!(format_duration(1_500, MHZ).as_str(), "1.5 ms");
        assert_eq!(format_duration(999_999, MHZ).as_str(), "999 ms");
        assert_eq!(format_duration(3_000_000, MHZ).as_str(), "3.0 s");
        assert_eq!(format_duration(120_000_000, MHZ).as_str(), "120 s");
    }

    #[test]
    fn test_negative() {
        assert_eq!(format_duration(-2_500, MHZ).as_str(), "-2.5 ms");
    }
}
