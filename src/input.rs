//! Physical inputs: buttons and the limit switch.
//!
//! Each input owns its pin and turns raw reads into debounced events. A pin
//! that fails to read is treated as stuck at its last known level; the fault
//! is logged once and never propagated.

use crate::debounce::DebouncedInput;
use crate::press::{PressClassifier, PressConfig, PressEvents};
use crate::time::TimeInstant;
use crate::types::ActiveLevel;
use embedded_hal::digital::InputPin;

/// Reads `pin`, falling back to `last` on error.
fn read_level<P: InputPin>(pin: &mut P, last: bool, faulted: &mut bool) -> bool {
    match pin.is_high() {
        Ok(level) => {
            *faulted = false;
            level
        }
        Err(_) => {
            if !*faulted {
                warn!("input: pin read failed, holding last level");
                *faulted = true;
            }
            last
        }
    }
}

/// A push button with press classification.
///
/// # Type Parameters
/// * `P` - Input pin
/// * `I` - Time instant type
pub struct ButtonInput<P: InputPin, I: TimeInstant> {
    pin: P,
    classifier: PressClassifier<I>,
    last_raw: bool,
    faulted: bool,
}

impl<P: InputPin, I: TimeInstant> ButtonInput<P, I> {
    /// Creates a button, reading its current level as the stable start level.
    ///
    /// An unreadable pin starts at the released level.
    pub fn new(mut pin: P, active: ActiveLevel, config: PressConfig<I::Duration>, now: I) -> Self {
        let released = !active.is_pressed(true);
        let mut faulted = false;
        let initial = read_level(&mut pin, released, &mut faulted);

        Self {
            pin,
            classifier: PressClassifier::new(initial, active, config, now),
            last_raw: initial,
            faulted,
        }
    }

    /// Samples the pin and returns the classified events.
    pub fn poll(&mut self, now: I) -> PressEvents {
        self.last_raw = read_level(&mut self.pin, self.last_raw, &mut self.faulted);
        self.classifier.update(self.last_raw, now)
    }

    /// The button's classifier.
    #[inline]
    pub fn classifier(&self) -> &PressClassifier<I> {
        &self.classifier
    }

    /// True if the last read failed.
    #[inline]
    pub fn is_faulted(&self) -> bool {
        self.faulted
    }
}

/// A limit switch reporting debounced falling edges.
///
/// # Type Parameters
/// * `P` - Input pin
/// * `I` - Time instant type
pub struct LimitSwitch<P: InputPin, I: TimeInstant> {
    pin: P,
    input: DebouncedInput<I>,
    last_raw: bool,
    faulted: bool,
}

impl<P: InputPin, I: TimeInstant> LimitSwitch<P, I> {
    /// Creates a limit switch, reading its current level as the stable start level.
    ///
    /// An unreadable pin starts high (open switch with pull-up).
    pub fn new(mut pin: P, debounce: I::Duration, now: I) -> Self {
        let mut faulted = false;
        let initial = read_level(&mut pin, true, &mut faulted);

        Self {
            pin,
            input: DebouncedInput::new(initial, debounce, now),
            last_raw: initial,
            faulted,
        }
    }

    /// Samples the pin; returns true on a debounced falling edge.
    pub fn poll(&mut self, now: I) -> bool {
        self.last_raw = read_level(&mut self.pin, self.last_raw, &mut self.faulted);
        self.input.update(self.last_raw, now);
        self.input.fell()
    }

    /// The debounced input.
    #[inline]
    pub fn input(&self) -> &DebouncedInput<I> {
        &self.input
    }

    /// True if the last read failed.
    #[inline]
    pub fn is_faulted(&self) -> bool {
        self.faulted
    }
}
