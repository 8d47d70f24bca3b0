//! Press classification on top of a debounced input.
//!
//! [`PressClassifier`] tracks one in-flight press and reports what happened
//! on each update as a short list of [`PressEvent`]s. Every press cycle ends
//! in exactly one terminal classification: either a [`PressEvent::ShortPress`]
//! on release, or a [`PressEvent::LongPress`] once the hold crosses the
//! threshold (in which case the release only reports [`PressEvent::Released`]).

use crate::debounce::DebouncedInput;
use crate::time::{TimeDuration, TimeInstant, millis_since};
use crate::types::ActiveLevel;
use heapless::Vec;

/// Upper bound of events a single update can report.
pub const MAX_PRESS_EVENTS: usize = 4;

/// Events reported by one classifier update.
pub type PressEvents = Vec<PressEvent, MAX_PRESS_EVENTS>;

/// A classified button event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PressEvent {
    /// Debounced press edge.
    Pressed,
    /// Released within the long-press threshold.
    ShortPress,
    /// Held past the long-press threshold. Reported once per press.
    LongPress,
    /// Held past the hard timeout. Reported once per press.
    HeldPastTimeout,
    /// Released after a long press or timeout; carries no action.
    Released,
}

/// Timing thresholds for press classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PressConfig<D: TimeDuration> {
    /// Debounce interval of the underlying input.
    pub debounce: D,

    /// Holds strictly longer than this are long presses.
    pub long_press_threshold: D,

    /// Holds strictly longer than this report [`PressEvent::HeldPastTimeout`].
    pub hard_timeout: Option<D>,
}

/// Classifies presses of one button.
///
/// # Type Parameters
/// * `I` - Time instant type
#[derive(Debug, Clone, Copy)]
pub struct PressClassifier<I: TimeInstant> {
    input: DebouncedInput<I>,
    active: ActiveLevel,
    long_press_threshold: I::Duration,
    hard_timeout: Option<I::Duration>,
    press_start: Option<I>,
    long_signaled: bool,
    timeout_signaled: bool,
}

impl<I: TimeInstant> PressClassifier<I> {
    /// Creates a classifier for an input currently reading `initial_level`.
    ///
    /// A button that is already held at construction is not treated as a
    /// press; it has to be released first.
    pub fn new(
        initial_level: bool,
        active: ActiveLevel,
        config: PressConfig<I::Duration>,
        now: I,
    ) -> Self {
        Self {
            input: DebouncedInput::new(initial_level, config.debounce, now),
            active,
            long_press_threshold: config.long_press_threshold,
            hard_timeout: config.hard_timeout,
            press_start: None,
            long_signaled: false,
            timeout_signaled: false,
        }
    }

    /// Feeds one raw sample and returns the events it produced, in order.
    pub fn update(&mut self, raw_level: bool, now: I) -> PressEvents {
        let mut events = PressEvents::new();
        self.input.update(raw_level, now);

        let changed = self.input.rose() || self.input.fell();
        let pressed = self.active.is_pressed(self.input.level());

        if changed && pressed {
            self.press_start = Some(now);
            self.long_signaled = false;
            self.timeout_signaled = false;
            push(&mut events, PressEvent::Pressed);
            return events;
        }

        let Some(start) = self.press_start else {
            return events;
        };
        let held = millis_since(now, start);

        if changed {
            // Release edge
            if self.long_signaled || self.timeout_signaled {
                push(&mut events, PressEvent::Released);
            } else if held <= self.long_press_threshold.as_millis() {
                push(&mut events, PressEvent::ShortPress);
            } else {
                // Threshold crossed between two polls; classify before releasing.
                push(&mut events, PressEvent::LongPress);
                push(&mut events, PressEvent::Released);
            }
            self.press_start = None;
            self.long_signaled = false;
            self.timeout_signaled = false;
            return events;
        }

        if pressed {
            if !self.long_signaled && held > self.long_press_threshold.as_millis() {
                self.long_signaled = true;
                push(&mut events, PressEvent::LongPress);
            }
            if let Some(timeout) = self.hard_timeout {
                if !self.timeout_signaled && held > timeout.as_millis() {
                    self.timeout_signaled = true;
                    push(&mut events, PressEvent::HeldPastTimeout);
                }
            }
        }

        events
    }

    /// True while a press is in flight.
    #[inline]
    pub fn is_pressed(&self) -> bool {
        self.press_start.is_some()
    }

    /// Start of the in-flight press, if any.
    #[inline]
    pub fn press_start(&self) -> Option<I> {
        self.press_start
    }

    /// The underlying debounced input.
    #[inline]
    pub fn input(&self) -> &DebouncedInput<I> {
        &self.input
    }
}

#[inline]
fn push(events: &mut PressEvents, event: PressEvent) {
    // One update reports at most three events.
    let _ = events.push(event);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::{MillisDuration, MillisInstant};

    const CONFIG: PressConfig<MillisDuration> = PressConfig {
        debounce: MillisDuration(0),
        long_press_threshold: MillisDuration(1000),
        hard_timeout: Some(MillisDuration(3000)),
    };

    fn classifier() -> PressClassifier<MillisInstant> {
        PressClassifier::new(true, ActiveLevel::Low, CONFIG, MillisInstant(0))
    }

    fn events(list: &[PressEvent]) -> PressEvents {
        PressEvents::from_slice(list).unwrap()
    }

    #[test]
    fn short_press_is_reported_on_release() {
        let mut c = classifier();
        assert_eq!(c.update(false, MillisInstant(100)), events(&[PressEvent::Pressed]));
        assert!(c.is_pressed());
        assert!(c.update(false, MillisInstant(600)).is_empty());
        assert_eq!(c.update(true, MillisInstant(1100)), events(&[PressEvent::ShortPress]));
        assert!(!c.is_pressed());
    }

    #[test]
    fn release_exactly_at_threshold_is_short() {
        let mut c = classifier();
        c.update(false, MillisInstant(0));
        c.update(false, MillisInstant(1000));
        assert_eq!(c.update(true, MillisInstant(1000)), events(&[PressEvent::ShortPress]));
    }

    #[test]
    fn long_press_fires_once_while_held_and_suppresses_short() {
        let mut c = classifier();
        c.update(false, MillisInstant(0));
        assert!(c.update(false, MillisInstant(1000)).is_empty());
        assert_eq!(c.update(false, MillisInstant(1001)), events(&[PressEvent::LongPress]));
        assert!(c.update(false, MillisInstant(1500)).is_empty());
        assert_eq!(c.update(true, MillisInstant(2000)), events(&[PressEvent::Released]));
    }

    #[test]
    fn late_release_past_threshold_classifies_as_long() {
        let mut c = classifier();
        c.update(false, MillisInstant(0));
        assert_eq!(
            c.update(true, MillisInstant(1200)),
            events(&[PressEvent::LongPress, PressEvent::Released])
        );
    }

    #[test]
    fn hold_past_timeout_reports_once() {
        let mut c = classifier();
        c.update(false, MillisInstant(0));
        c.update(false, MillisInstant(1010));
        assert_eq!(
            c.update(false, MillisInstant(3010)),
            events(&[PressEvent::HeldPastTimeout])
        );
        assert!(c.update(false, MillisInstant(5000)).is_empty());
        assert_eq!(c.update(true, MillisInstant(5100)), events(&[PressEvent::Released]));
    }

    #[test]
    fn active_high_button_is_supported() {
        let mut c = PressClassifier::new(false, ActiveLevel::High, CONFIG, MillisInstant(0));
        assert_eq!(c.update(true, MillisInstant(10)), events(&[PressEvent::Pressed]));
        assert_eq!(c.update(false, MillisInstant(200)), events(&[PressEvent::ShortPress]));
    }

    #[test]
    fn button_held_at_startup_needs_release_first() {
        let mut c = PressClassifier::new(false, ActiveLevel::Low, CONFIG, MillisInstant(0));
        assert!(c.update(false, MillisInstant(5000)).is_empty());
        assert!(c.update(true, MillisInstant(5010)).is_empty());
        assert_eq!(c.update(false, MillisInstant(5020)), events(&[PressEvent::Pressed]));
    }
}
