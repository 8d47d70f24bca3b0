//! Integration tests for debouncing and press classification

mod common;
use common::*;

use prop_controller::{ActiveLevel, DebouncedInput, PressClassifier, PressConfig, PressEvent};

const CONFIG: PressConfig<TestDuration> = PressConfig {
    debounce: TestDuration(10),
    long_press_threshold: TestDuration(1000),
    hard_timeout: Some(TestDuration(3000)),
};

fn classifier() -> PressClassifier<TestInstant> {
    PressClassifier::new(true, ActiveLevel::Low, CONFIG, TestInstant(0))
}

/// Drives `classifier` with `level` sampled every `step` ms over `[from, to)`.
fn hold(
    classifier: &mut PressClassifier<TestInstant>,
    level: bool,
    from: u64,
    to: u64,
    step: u64,
    seen: &mut heapless::Vec<PressEvent, 32>,
) {
    let mut t = from;
    while t < to {
        for event in classifier.update(level, TestInstant(t)) {
            let _ = seen.push(event);
        }
        t += step;
    }
}

fn terminal_count(events: &[PressEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, PressEvent::ShortPress | PressEvent::LongPress))
        .count()
}

#[test]
fn chatter_changes_stable_level_at_most_once_per_interval() {
    let mut input = DebouncedInput::new(true, TestDuration(10), TestInstant(0));
    let mut changes: heapless::Vec<u64, 32> = heapless::Vec::new();

    // Irregular bounce sampled every millisecond, starting low: runs shorter
    // than the interval must not flip the stable level.
    let runs = [3u64, 15, 2, 25, 11, 1, 40, 9, 12, 30, 4, 18, 11, 11, 11];
    let mut raw = false;
    let mut t = 0u64;
    for run in runs {
        for _ in 0..run {
            input.update(raw, TestInstant(t));
            if input.rose() || input.fell() {
                changes.push(t).unwrap();
                assert_eq!(input.last_change(), TestInstant(t));
            }
            t += 1;
        }
        raw = !raw;
    }

    assert_eq!(changes.as_slice(), &[55, 128, 180, 191, 202]);
    for pair in changes.windows(2) {
        assert!(pair[1] - pair[0] >= 10, "changes at {} and {}", pair[0], pair[1]);
    }
    assert!(!input.level());
}

#[test]
fn noise_shorter_than_debounce_is_ignored() {
    let mut input = DebouncedInput::new(true, TestDuration(10), TestInstant(0));
    for t in 0..5u64 {
        input.update(false, TestInstant(t));
    }
    input.update(true, TestInstant(5));
    for t in 6..30u64 {
        input.update(true, TestInstant(t));
        assert!(!input.fell());
    }
    assert!(input.level());
    assert_eq!(input.last_change(), TestInstant(0));
}

#[test]
fn level_is_accepted_after_full_interval() {
    let mut input = DebouncedInput::new(true, TestDuration(10), TestInstant(0));
    input.update(false, TestInstant(100));
    input.update(false, TestInstant(109));
    assert!(input.level());

    input.update(false, TestInstant(110));
    assert!(!input.level());
    assert!(input.fell());
    assert_eq!(input.last_change(), TestInstant(110));

    input.update(false, TestInstant(111));
    assert!(!input.fell());
    assert_eq!(input.stable_for(TestInstant(150)), TestDuration(40));
}

#[test]
fn every_press_gets_exactly_one_classification() {
    for hold_ms in [20u64, 500, 990, 1000, 1010, 1500, 2500, 3500] {
        let mut c = classifier();
        let mut seen = heapless::Vec::new();

        hold(&mut c, false, 0, hold_ms + 10, 10, &mut seen);
        hold(&mut c, true, hold_ms + 10, hold_ms + 60, 10, &mut seen);

        assert_eq!(seen.first(), Some(&PressEvent::Pressed), "hold {hold_ms}");
        assert_eq!(terminal_count(&seen), 1, "hold {hold_ms}: {seen:?}");
        assert!(!c.is_pressed());
    }
}

#[test]
fn short_and_long_split_at_threshold() {
    let mut short = classifier();
    let mut seen = heapless::Vec::new();
    // Press accepted at 10, release seen at 1010 and accepted at 1020: held 1010 ms.
    hold(&mut short, false, 0, 1010, 10, &mut seen);
    hold(&mut short, true, 1010, 1050, 10, &mut seen);
    assert!(seen.contains(&PressEvent::LongPress));
    assert!(!seen.contains(&PressEvent::ShortPress));

    let mut quick = classifier();
    let mut seen = heapless::Vec::new();
    hold(&mut quick, false, 0, 500, 10, &mut seen);
    hold(&mut quick, true, 500, 550, 10, &mut seen);
    assert!(seen.contains(&PressEvent::ShortPress));
    assert!(!seen.contains(&PressEvent::LongPress));
}

#[test]
fn long_press_fires_while_still_held() {
    let mut c = classifier();
    let mut seen = heapless::Vec::new();
    hold(&mut c, false, 0, 1100, 10, &mut seen);

    assert_eq!(seen.as_slice(), &[PressEvent::Pressed, PressEvent::LongPress]);
    assert!(c.is_pressed());
    assert_eq!(c.press_start(), Some(TestInstant(10)));
}

#[test]
fn hard_timeout_follows_long_press_and_release_is_silent() {
    let mut c = classifier();
    let mut seen = heapless::Vec::new();
    hold(&mut c, false, 0, 3200, 10, &mut seen);
    hold(&mut c, true, 3200, 3250, 10, &mut seen);

    assert_eq!(
        seen.as_slice(),
        &[
            PressEvent::Pressed,
            PressEvent::LongPress,
            PressEvent::HeldPastTimeout,
            PressEvent::Released,
        ]
    );
}

#[test]
fn no_timeout_configured_never_reports_it() {
    let config = PressConfig {
        hard_timeout: None,
        ..CONFIG
    };
    let mut c = PressClassifier::new(true, ActiveLevel::Low, config, TestInstant(0));
    let mut seen = heapless::Vec::new();
    hold(&mut c, false, 0, 10_000, 10, &mut seen);

    assert!(!seen.contains(&PressEvent::HeldPastTimeout));
    assert_eq!(terminal_count(&seen), 1);
}
