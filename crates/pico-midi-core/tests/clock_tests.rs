//! Word-clock decimation and release signal semantics.

use std::time::Duration;

use pico_midi_core::clock::{ClockDecimator, ReleaseSignal};

#[test]
fn release_only_on_every_divisor_th_edge() {
    let clock = ClockDecimator::new(32);

    for edge in 1..=31 {
        assert!(!clock.on_edge(), "edge {edge} must not release");
        assert!(!clock.signal().is_pending());
    }
    assert!(clock.on_edge(), "edge 32 releases");
    assert!(clock.try_acquire());
    assert!(!clock.try_acquire(), "exactly one release per divisor edges");
}

#[test]
fn counter_stays_within_divisor() {
    let clock = ClockDecimator::new(4);
    assert_eq!(clock.remaining(), 4);
    for _ in 0..10 {
        clock.on_edge();
        assert!((1..=4).contains(&clock.remaining()));
    }
    // 10 edges: releases at 4 and 8, two edges into the next period.
    assert_eq!(clock.remaining(), 2);
}

#[test]
fn divisor_of_one_releases_every_edge() {
    let clock = ClockDecimator::new(1);
    for _ in 0..5 {
        assert!(clock.on_edge());
        assert!(clock.try_acquire());
    }
}

#[test]
#[should_panic(expected = "divisor must be non-zero")]
fn zero_divisor_is_rejected() {
    let _ = ClockDecimator::new(0);
}

#[test]
fn releases_do_not_accumulate() {
    let clock = ClockDecimator::new(2);
    for _ in 0..20 {
        clock.on_edge();
    }
    assert!(clock.try_acquire());
    assert!(!clock.try_acquire());
}

#[test]
fn signal_is_capped_at_one() {
    let signal = ReleaseSignal::new();
    assert!(!signal.try_acquire());

    signal.release();
    signal.release();
    signal.release();
    assert!(signal.is_pending());
    assert!(signal.try_acquire());
    assert!(!signal.try_acquire());
}

#[test]
fn wait_returns_after_release_from_other_thread() {
    let clock = ClockDecimator::new(8);

    std::thread::scope(|s| {
        let waiter = s.spawn(|| {
            clock.wait_for_release();
            true
        });
        std::thread::sleep(Duration::from_millis(10));
        for _ in 0..8 {
            clock.on_edge();
        }
        assert!(waiter.join().unwrap());
    });

    assert!(!clock.signal().is_pending(), "the waiter consumed the release");
}

#[test]
fn static_decimator_is_usable() {
    static CLOCK: ClockDecimator = ClockDecimator::new(3);
    CLOCK.on_edge();
    CLOCK.on_edge();
    assert!(CLOCK.on_edge());
    CLOCK.wait_for_release();
    assert_eq!(CLOCK.divisor(), 3);
}

#[test]
fn concurrent_edges_are_each_counted_once() {
    let clock = ClockDecimator::new(32);
    let releases = std::sync::atomic::AtomicU32::new(0);

    std::thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                for _ in 0..3200 {
                    if clock.on_edge() {
                        releases.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
                    }
                }
            });
        }
    });

    assert_eq!(releases.into_inner(), 4 * 3200 / 32);
    assert_eq!(clock.remaining(), 32);
}
