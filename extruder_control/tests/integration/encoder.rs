//! Quadrature decoding driven through pin levels.

use extruder_common::hal::{Level, MemoryHal, Pin, QuadratureChannel};
use extruder_common::motor::config::EncoderConfig;
use extruder_control::encoder::EncoderTracker;

const A: Pin = Pin(3);
const B: Pin = Pin(2);

/// Gray sequence of (A, B) for forward rotation.
const FORWARD: [(Level, Level); 4] = [
    (Level::High, Level::Low),
    (Level::High, Level::High),
    (Level::Low, Level::High),
    (Level::Low, Level::Low),
];

fn tracker() -> EncoderTracker {
    EncoderTracker::new(EncoderConfig { a_pin: A, b_pin: B })
}

/// Move the pins to `(a, b)` and report the edge on the channel that changed.
fn step(hal: &mut MemoryHal, enc: &EncoderTracker, (a, b): (Level, Level)) {
    let channel = if hal.level(A) != a {
        QuadratureChannel::A
    } else {
        QuadratureChannel::B
    };
    hal.set_input(A, a);
    hal.set_input(B, b);
    enc.on_edge(hal, channel);
}

#[test]
fn forward_cycle_counts_up_monotonically() {
    let mut hal = MemoryHal::new();
    let enc = tracker();
    let mut prev = enc.position().raw();
    for _ in 0..3 {
        for levels in FORWARD {
            step(&mut hal, &enc, levels);
            let now = enc.position().raw();
            assert_eq!(now, prev + 1);
            prev = now;
        }
    }
    assert_eq!(enc.position().raw(), 12);
}

#[test]
fn reverse_cycle_counts_down() {
    let mut hal = MemoryHal::new();
    let enc = tracker();
    // Reverse walks the Gray sequence backwards from (Low, Low).
    for &levels in FORWARD.iter().rev().skip(1).chain(FORWARD.last()) {
        step(&mut hal, &enc, levels);
    }
    assert_eq!(enc.position().raw(), -4);
}

#[test]
fn full_cycle_there_and_back_has_no_drift() {
    let mut hal = MemoryHal::new();
    let enc = tracker();
    for levels in FORWARD {
        step(&mut hal, &enc, levels);
    }
    assert_eq!(enc.position().raw(), 4);
    for &levels in FORWARD.iter().rev().skip(1).chain(FORWARD.last()) {
        step(&mut hal, &enc, levels);
    }
    assert_eq!(enc.position().raw(), 0);
    assert_eq!((hal.level(A), hal.level(B)), (Level::Low, Level::Low));
}
