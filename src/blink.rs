//! Per-LED blink scheduling.
//!
//! Provides [`BlinkScheduler`], which owns one indicator pin and advances its
//! on/off phase on a fixed interval, or holds it at the LED's disabled level.

use crate::time::{TimeDuration, TimeInstant, millis_since};
use embedded_hal::digital::{OutputPin, PinState};

/// Blink state of one LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedPattern<I: TimeInstant> {
    /// Toggle on `interval`; otherwise hold `disabled_level`.
    pub blink_enabled: bool,

    /// Toggle interval.
    pub interval: I::Duration,

    /// Level shown while blinking is disabled (solid on or solid off).
    pub disabled_level: bool,

    /// Instant of the last toggle.
    pub last_toggle: I,

    /// Current output level.
    pub level: bool,
}

/// Drives one indicator LED.
///
/// The pin is written once at construction and afterwards only when the
/// level changes. Write errors are logged and otherwise ignored; an LED that
/// cannot be driven must not stall the control loop.
///
/// # Type Parameters
/// * `I` - Time instant type
/// * `P` - Output pin
pub struct BlinkScheduler<I: TimeInstant, P: OutputPin> {
    pin: P,
    pattern: LedPattern<I>,
}

impl<I: TimeInstant, P: OutputPin> BlinkScheduler<I, P> {
    /// Creates a scheduler with blinking disabled and the LED at its disabled level.
    pub fn new(pin: P, disabled_level: bool, interval: I::Duration, now: I) -> Self {
        let mut scheduler = Self {
            pin,
            pattern: LedPattern {
                blink_enabled: false,
                interval,
                disabled_level,
                last_toggle: now,
                level: disabled_level,
            },
        };
        scheduler.write(disabled_level);
        scheduler
    }

    /// Changes the blink pattern.
    ///
    /// Switching from disabled to blinking restarts the phase at `now`, so the
    /// first toggle comes one full interval later. Re-applying the current
    /// pattern leaves the phase untouched.
    pub fn set_pattern(&mut self, blink_enabled: bool, interval: I::Duration, now: I) {
        if blink_enabled && !self.pattern.blink_enabled {
            self.pattern.last_toggle = now;
        }
        self.pattern.blink_enabled = blink_enabled;
        self.pattern.interval = interval;
    }

    /// Disables blinking and shows the disabled level immediately.
    pub fn force_disabled(&mut self) {
        self.pattern.blink_enabled = false;
        let level = self.pattern.disabled_level;
        self.set_level(level);
    }

    /// Advances the LED to `now`.
    pub fn update(&mut self, now: I) {
        if !self.pattern.blink_enabled {
            let level = self.pattern.disabled_level;
            self.set_level(level);
            return;
        }

        if millis_since(now, self.pattern.last_toggle) >= self.pattern.interval.as_millis() {
            let level = !self.pattern.level;
            self.set_level(level);
            self.pattern.last_toggle = now;
        }
    }

    /// Current output level.
    #[inline]
    pub fn level(&self) -> bool {
        self.pattern.level
    }

    /// True if the LED is currently blinking.
    #[inline]
    pub fn is_blinking(&self) -> bool {
        self.pattern.blink_enabled
    }

    /// The LED's pattern state.
    #[inline]
    pub fn pattern(&self) -> &LedPattern<I> {
        &self.pattern
    }

    fn set_level(&mut self, level: bool) {
        if level != self.pattern.level {
            self.pattern.level = level;
            self.write(level);
        }
    }

    fn write(&mut self, level: bool) {
        if self.pin.set_state(PinState::from(level)).is_err() {
            warn!("led: pin write failed");
        }
    }
}
