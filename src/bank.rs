//! Fixed-size bank of indicator LEDs.
//!
//! [`LedBank`] owns one [`BlinkScheduler`] per LED and applies a mode's LED
//! pattern set in one call, so the state machine never has to address
//! individual pins.

use crate::blink::BlinkScheduler;
use crate::time::{TimeDuration, TimeInstant};
use crate::types::LedSetting;
use embedded_hal::digital::OutputPin;

/// An identifier for an LED within a bank.
///
/// A plain index into the bank, in the order the pins were supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LedId(pub usize);

impl From<usize> for LedId {
    fn from(id: usize) -> Self {
        LedId(id)
    }
}

impl From<LedId> for usize {
    fn from(id: LedId) -> Self {
        id.0
    }
}

/// Manages all indicator LEDs of the prop.
///
/// # Type Parameters
/// * `I` - Time instant type
/// * `P` - Output pin type (same for every LED)
/// * `N` - Number of LEDs
pub struct LedBank<I: TimeInstant, P: OutputPin, const N: usize> {
    leds: [BlinkScheduler<I, P>; N],
}

impl<I: TimeInstant, P: OutputPin, const N: usize> LedBank<I, P, N> {
    /// Creates a bank with every LED at its disabled level.
    ///
    /// # Arguments
    /// * `pins` - One output per LED; the array index becomes the [`LedId`]
    /// * `disabled_levels` - Level each LED shows while not blinking
    /// * `now` - Current time
    pub fn new(pins: [P; N], disabled_levels: [bool; N], now: I) -> Self {
        let mut idx = 0;
        let leds = pins.map(|pin| {
            let disabled_level = disabled_levels[idx];
            idx += 1;
            BlinkScheduler::new(pin, disabled_level, I::Duration::ZERO, now)
        });

        Self { leds }
    }

    /// Binds a pattern set: one setting per LED, by index.
    pub fn apply(&mut self, settings: &[LedSetting<I::Duration>; N], now: I) {
        for (led, setting) in self.leds.iter_mut().zip(settings.iter()) {
            led.set_pattern(setting.blink_enabled, setting.interval, now);
        }
    }

    /// Disables blinking on every LED and shows each LED's disabled level now.
    pub fn force_disabled(&mut self) {
        for led in &mut self.leds {
            led.force_disabled();
        }
    }

    /// Advances every LED to `now`.
    pub fn service_all(&mut self, now: I) {
        for led in &mut self.leds {
            led.update(now);
        }
    }

    /// Returns the scheduler of the given LED.
    pub fn get(&self, id: LedId) -> Option<&BlinkScheduler<I, P>> {
        self.leds.get(id.0)
    }

    /// Current output level of every LED.
    pub fn levels(&self) -> [bool; N] {
        core::array::from_fn(|idx| self.leds[idx].level())
    }

    /// True if every LED shows its disabled level and none is blinking.
    pub fn all_disabled(&self) -> bool {
        self.leds.iter().all(|led| {
            let pattern = led.pattern();
            !pattern.blink_enabled && pattern.level == pattern.disabled_level
        })
    }

    /// Number of LEDs in the bank.
    pub const fn len(&self) -> usize {
        N
    }

    /// True if the bank has no LEDs.
    pub const fn is_empty(&self) -> bool {
        N == 0
    }
}
