//! Fixed-width trigger pulse for the companion board.
//!
//! [`PulseEmitter::fire`] blocks the caller for the whole pulse width. The
//! control loop polls nothing while a pulse is active; pulses are short
//! (a few hundred milliseconds) and this matches how the companion board
//! samples its trigger line.

use crate::time::TimeDuration;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{OutputPin, PinState};

/// Shape of the trigger pulse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PulseSpec<D: TimeDuration> {
    /// Level driven while the pulse is active.
    pub active_high: bool,

    /// How long the output stays active.
    pub active_duration: D,
}

impl<D: TimeDuration> PulseSpec<D> {
    /// Pin state while active.
    #[inline]
    pub fn active_state(&self) -> PinState {
        PinState::from(self.active_high)
    }

    /// Pin state while idle.
    #[inline]
    pub fn inactive_state(&self) -> PinState {
        PinState::from(!self.active_high)
    }
}

/// Trait for abstracting the pulse output.
///
/// The state machine only needs to say "fire"; how the pulse is shaped is up
/// to the implementation.
pub trait PulseOutput {
    /// Emits one pulse. May block for the pulse width.
    fn fire(&mut self);
}

/// Drives an output pin active for a fixed duration.
///
/// # Type Parameters
/// * `P` - Output pin
/// * `T` - Delay provider used to hold the pulse
/// * `D` - Duration type of the [`PulseSpec`]
pub struct PulseEmitter<P: OutputPin, T: DelayNs, D: TimeDuration> {
    pin: P,
    delay: T,
    spec: PulseSpec<D>,
    fired: u32,
}

impl<P: OutputPin, T: DelayNs, D: TimeDuration> PulseEmitter<P, T, D> {
    /// Creates an emitter and drives the pin to its inactive level.
    pub fn new(mut pin: P, delay: T, spec: PulseSpec<D>) -> Self {
        if pin.set_state(spec.inactive_state()).is_err() {
            warn!("pulse output: failed to set idle level");
        }

        Self {
            pin,
            delay,
            spec,
            fired: 0,
        }
    }

    /// Number of pulses emitted so far.
    #[inline]
    pub fn fired(&self) -> u32 {
        self.fired
    }
}

impl<P: OutputPin, T: DelayNs, D: TimeDuration> PulseOutput for PulseEmitter<P, T, D> {
    fn fire(&mut self) {
        let millis = self.spec.active_duration.as_millis();
        debug!("pulse: firing for {} ms", millis);

        if self.pin.set_state(self.spec.active_state()).is_err() {
            warn!("pulse output: failed to set active level");
        }
        self.delay.delay_ms(u32::try_from(millis).unwrap_or(u32::MAX));
        if self.pin.set_state(self.spec.inactive_state()).is_err() {
            warn!("pulse output: failed to set idle level");
        }

        self.fired = self.fired.wrapping_add(1);
    }
}
