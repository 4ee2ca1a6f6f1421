//! Property-based invariant tests for the capture log and its decoder.
//!
//! Samples go through the real encoder, so these cover the whole path from
//! raw words to events:
//!
//! 1. Decoded events reproduce the sampled runs exactly
//! 2. Events are contiguous and every event changes the levels
//! 3. read_backwards retraces read_forwards
//! 4. seek(T) positions on the event containing T
//! 5. Clones are independent cursors
//! 6. The capture decoder and the pattern source agree

use proptest::prelude::*;
use quadlogic_core::{
    CaptureBuffer, CaptureConfig, CaptureEncoder, Channel, Levels, PatternStream, SignalEvent,
    SignalStream, SignalTime, StreamError,
};
use quadlogic_hal::CaptureIrq;

const N: usize = 2048;

#[derive(Default)]
struct NoIrq(bool);

impl CaptureIrq for NoIrq {
    fn enable(&mut self) {
        self.0 = true;
    }

    fn disable(&mut self) {
        self.0 = false;
    }

    fn is_enabled(&self) -> bool {
        self.0
    }
}

// ── Strategies ──────────────────────────────────────────────────────────

/// Runs of (levels, ticks) with no two neighbours sharing levels
fn runs_strategy() -> impl Strategy<Value = Vec<(u8, u64)>> {
    prop::collection::vec((0u8..16, 1u64..40), 1..60).prop_map(|raw| {
        let mut runs: Vec<(u8, u64)> = Vec::new();
        for (levels, len) in raw {
            match runs.last_mut() {
                Some(last) if last.0 == levels => last.1 += len,
                _ => runs.push((levels, len)),
            }
        }
        runs
    })
}

// ── Helpers ─────────────────────────────────────────────────────────────

fn word_for(config: &CaptureConfig, levels: u8) -> u32 {
    Channel::ALL
        .iter()
        .filter(|c| levels & (1 << c.index()) != 0)
        .map(|c| config.channel_bits[c.index()])
        .sum()
}

fn samples(runs: &[(u8, u64)]) -> Vec<u32> {
    let config = CaptureConfig::default();
    runs.iter()
        .flat_map(|&(levels, len)| std::iter::repeat(word_for(&config, levels)).take(len as usize))
        .collect()
}

/// Feed `runs` through an encoder in chunks of `chunk` samples
fn capture(buffer: &CaptureBuffer<N>, runs: &[(u8, u64)], chunk: usize) {
    let writer = buffer.writer().unwrap();
    let mut encoder = CaptureEncoder::new(writer, NoIrq::default(), CaptureConfig::default());
    for part in samples(runs).chunks(chunk) {
        encoder.process_chunk(part).unwrap();
    }
}

fn expected(runs: &[(u8, u64)]) -> Vec<SignalEvent> {
    let mut events = Vec::new();
    let mut time: SignalTime = 0;
    let mut old = Levels::LOW;
    for &(levels, len) in runs {
        let levels = Levels::from_bits(levels);
        let end = time + len as SignalTime;
        events.push(SignalEvent {
            start: time,
            end,
            old_levels: old,
            levels,
        });
        time = end;
        old = levels;
    }
    events
}

fn patterns(runs: &[(u8, u64)]) -> [String; 4] {
    let mut out: [String; 4] = Default::default();
    for &(levels, len) in runs {
        for channel in Channel::ALL {
            let c = if levels & (1 << channel.index()) != 0 {
                '-'
            } else {
                '_'
            };
            out[channel.index()].extend(std::iter::repeat(c).take(len as usize));
        }
    }
    out
}

fn total(runs: &[(u8, u64)]) -> SignalTime {
    runs.iter().map(|r| r.1 as SignalTime).sum()
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Round trip
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn decoded_events_match_samples(runs in runs_strategy(), chunk in 1usize..64) {
        let buffer = CaptureBuffer::<N>::new();
        capture(&buffer, &runs, chunk);

        let mut decoder = buffer.decoder();
        let events: Vec<_> = decoder.events().collect();
        prop_assert_eq!(events, expected(&runs));
        prop_assert!(decoder.at_tail());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Contiguity
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn events_are_contiguous(runs in runs_strategy()) {
        let buffer = CaptureBuffer::<N>::new();
        capture(&buffer, &runs, 32);

        let mut prev: Option<SignalEvent> = None;
        for event in buffer.decoder().events() {
            prop_assert!(event.start < event.end);
            if let Some(prev) = prev {
                prop_assert_eq!(prev.end, event.start);
                prop_assert_eq!(prev.levels, event.old_levels);
                prop_assert_ne!(event.old_levels, event.levels);
            } else {
                prop_assert_eq!(event.start, 0);
            }
            prev = Some(event);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Bidirectional symmetry
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn backwards_retraces_forwards(runs in runs_strategy(), steps in 1usize..80) {
        let buffer = CaptureBuffer::<N>::new();
        capture(&buffer, &runs, 16);

        let mut decoder = buffer.decoder();
        let mut last = None;
        for _ in 0..steps {
            match decoder.read_forwards() {
                Some(event) => last = Some(event),
                None => break,
            }
        }
        prop_assert_eq!(decoder.read_backwards(), last);
        prop_assert_eq!(decoder.read_forwards(), last);
    }

    #[test]
    fn full_backward_pass_reverses(runs in runs_strategy()) {
        let buffer = CaptureBuffer::<N>::new();
        capture(&buffer, &runs, 16);

        let mut decoder = buffer.decoder();
        while decoder.read_forwards().is_some() {}

        let mut backwards = Vec::new();
        while let Some(event) = decoder.read_backwards() {
            backwards.push(event);
        }
        backwards.reverse();
        prop_assert_eq!(backwards, expected(&runs));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Seek
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn seek_lands_on_containing_event(
        runs in runs_strategy(),
        targets in prop::collection::vec(any::<prop::sample::Index>(), 1..10),
    ) {
        let buffer = CaptureBuffer::<N>::new();
        capture(&buffer, &runs, 16);
        let end = total(&runs);

        // One decoder for every target, so seeks start from arbitrary places
        let mut decoder = buffer.decoder();
        for target in targets {
            let time = target.index(end as usize) as SignalTime;
            prop_assert_eq!(decoder.seek(time), Ok(()));
            let event = decoder.read_forwards().unwrap();
            prop_assert!(event.start <= time && time < event.end);
        }
    }

    #[test]
    fn seek_to_end_and_beyond(runs in runs_strategy(), beyond in 1i64..100) {
        let buffer = CaptureBuffer::<N>::new();
        capture(&buffer, &runs, 16);
        let end = total(&runs);
        let last = *expected(&runs).last().unwrap();

        let mut decoder = buffer.decoder();
        prop_assert_eq!(decoder.seek(end), Ok(()));
        prop_assert_eq!(decoder.read_forwards(), Some(last));

        prop_assert_eq!(decoder.seek(end + beyond), Err(StreamError::SeekOutOfRange));
        prop_assert_eq!(decoder.read_forwards(), None);

        prop_assert_eq!(decoder.seek(0), Ok(()));
        prop_assert_eq!(decoder.read_forwards(), expected(&runs).first().copied());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Clone independence
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn clones_do_not_share_cursor(runs in runs_strategy(), skip in 0usize..20) {
        let buffer = CaptureBuffer::<N>::new();
        capture(&buffer, &runs, 16);

        let mut a = buffer.decoder();
        let first = a.read_forwards();
        let mut b = a.clone();
        for _ in 0..skip {
            b.read_forwards();
        }
        b.seek(0).unwrap();
        b.read_forwards();

        let second = expected(&runs).get(1).copied();
        prop_assert_eq!(a.read_forwards(), second);
        prop_assert_eq!(b.read_forwards(), second);
        prop_assert!(first.is_some());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Sources agree
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn pattern_matches_capture(runs in runs_strategy(), time in 0i64..2000) {
        let buffer = CaptureBuffer::<N>::new();
        capture(&buffer, &runs, 8);

        let [a, b, c, d] = patterns(&runs);
        let mut pattern = PatternStream::new(&a, &b, &c, &d);
        let mut decoder = buffer.decoder();

        let all: Vec<_> = pattern.clone().events().collect();
        prop_assert_eq!(&all, &expected(&runs));

        prop_assert_eq!(pattern.seek(time), decoder.seek(time));
        prop_assert_eq!(pattern.read_forwards(), decoder.read_forwards());
        prop_assert_eq!(pattern.read_backwards(), decoder.read_backwards());
        prop_assert_eq!(pattern.read_backwards(), decoder.read_backwards());
    }
}

// ── Fixed scenarios ─────────────────────────────────────────────────────

#[test]
fn three_interval_capture() {
    let buffer = CaptureBuffer::<N>::new();
    capture(&buffer, &[(0b0010, 3), (0b0100, 5), (0b0110, 8)], 4);

    let mut decoder = buffer.decoder();
    let events: Vec<_> = decoder
        .events()
        .map(|e| (e.start, e.end, e.old_levels.bits(), e.levels.bits()))
        .collect();
    assert_eq!(events, [(0, 3, 0, 2), (3, 8, 2, 4), (8, 16, 4, 6)]);
    assert_eq!(decoder.read_forwards(), None);
}

#[test]
fn live_tail_grows_between_reads() {
    let buffer = CaptureBuffer::<N>::new();
    let writer = buffer.writer().unwrap();
    let config = CaptureConfig::default();
    let word = word_for(&config, 0b0001);
    let mut encoder = CaptureEncoder::new(writer, NoIrq::default(), config);

    encoder.process_chunk(&[word; 4]).unwrap();
    let mut decoder = buffer.decoder();
    assert_eq!(decoder.read_forwards().map(|e| e.end), Some(4));

    encoder.process_chunk(&[word; 6]).unwrap();
    decoder.seek(0).unwrap();
    assert_eq!(decoder.read_forwards().map(|e| e.end), Some(10));

    encoder.process_chunk(&[0; 2]).unwrap();
    decoder.seek(0).unwrap();
    let events: Vec<_> = decoder.events().map(|e| (e.start, e.end)).collect();
    assert_eq!(events, [(0, 10), (10, 12)]);
}
