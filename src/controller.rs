//! The control loop.
//!
//! [`PropController`] owns every piece of runtime state: inputs, state
//! machine, LEDs, audio, pulse output and the tick delay. One tick always
//! runs in the same order:
//!
//! 1. poll every input (primary, secondary, limit switch),
//! 2. feed the resulting events to the state machine,
//! 3. advance every LED.
//!
//! [`PropController::run`] boots and then ticks forever, sleeping a fixed
//! interval between ticks. Nothing runs concurrently: a pulse or a
//! play-once asset holds the loop until it completes.

use crate::audio::{AudioOutcome, AudioService};
use crate::bank::LedBank;
use crate::config::PropConfig;
use crate::input::{ButtonInput, LimitSwitch};
use crate::machine::{PropEvent, PropStateMachine, Transition};
use crate::pulse::PulseOutput;
use crate::time::{TimeDuration, TimeInstant, TimeSource};
use crate::types::{ActiveLevel, PropMode};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use heapless::Vec;

/// Upper bound of events gathered in one tick.
pub const MAX_TICK_EVENTS: usize = 8;

/// Transitions committed during one tick.
pub type TickTransitions = Vec<Transition, MAX_TICK_EVENTS>;

/// Pins the controller takes ownership of.
///
/// # Type Parameters
/// * `In` - Input pin type for buttons and limit switch
/// * `Led` - Output pin type for the indicator LEDs
/// * `N` - Number of LEDs
pub struct PropHardware<In: InputPin, Led: OutputPin, const N: usize> {
    /// Main button: short press, long press, hard stop.
    pub primary: In,
    /// Optional second button cycling levels.
    pub secondary: Option<In>,
    /// Optional limit switch returning to Idle.
    pub limit_switch: Option<In>,
    /// Indicator LEDs, in the order the configuration's LED settings use.
    pub leds: [Led; N],
}

/// The prop's control loop and owner of all runtime state.
///
/// # Type Parameters
/// * `'t` - Lifetime of the time source reference
/// * `I` - Time instant type
/// * `T` - Time source implementation type
/// * `A` - Audio service
/// * `In` - Input pin type
/// * `Led` - LED output pin type
/// * `Pu` - Pulse output
/// * `Dl` - Delay used between ticks
/// * `N` - Number of LEDs
pub struct PropController<'t, I, T, A, In, Led, Pu, Dl, const N: usize>
where
    I: TimeInstant,
    T: TimeSource<I>,
    A: AudioService,
    In: InputPin,
    Led: OutputPin,
    Pu: PulseOutput,
    Dl: DelayNs,
{
    time_source: &'t T,
    machine: PropStateMachine<I::Duration, N>,
    primary: ButtonInput<In, I>,
    secondary: Option<ButtonInput<In, I>>,
    limit_switch: Option<LimitSwitch<In, I>>,
    leds: LedBank<I, Led, N>,
    audio: A,
    pulse: Pu,
    delay: Dl,
}

impl<'t, I, T, A, In, Led, Pu, Dl, const N: usize> PropController<'t, I, T, A, In, Led, Pu, Dl, N>
where
    I: TimeInstant,
    T: TimeSource<I>,
    A: AudioService,
    In: InputPin,
    Led: OutputPin,
    Pu: PulseOutput,
    Dl: DelayNs,
{
    /// Creates a controller in [`PropMode::Booting`].
    ///
    /// Reads every input once to establish its resting level and drives all
    /// LEDs to their disabled level.
    pub fn new(
        time_source: &'t T,
        config: PropConfig<I::Duration, N>,
        hardware: PropHardware<In, Led, N>,
        audio: A,
        pulse: Pu,
        delay: Dl,
    ) -> Self {
        let now = time_source.now();
        let press = config.press();
        let active = config.active_level();

        // Only the primary button performs the hard stop.
        let mut secondary_press = press;
        secondary_press.hard_timeout = None;

        let primary = ButtonInput::new(hardware.primary, active, press, now);
        let secondary = hardware
            .secondary
            .map(|pin| ButtonInput::new(pin, active, secondary_press, now));
        let limit_switch = hardware
            .limit_switch
            .map(|pin| LimitSwitch::new(pin, press.debounce, now));
        let leds = LedBank::new(hardware.leds, config.led_disabled_levels(), now);

        Self {
            time_source,
            machine: PropStateMachine::new(config),
            primary,
            secondary,
            limit_switch,
            leds,
            audio,
            pulse,
            delay,
        }
    }

    /// Runs the startup sequence: startup asset (blocking), settle delay,
    /// then Idle.
    ///
    /// Returns `None` if already booted.
    pub fn boot(&mut self) -> Option<Transition> {
        let now = self.time_source.now();
        let startup = self.machine.begin_boot(now, &mut self.audio, &mut self.leds)?;
        if let AudioOutcome::Failed(asset, err) = startup {
            warn!("startup asset {:?} failed ({:?}), continuing", asset, err);
        }

        let settle = self.machine.config().boot_settle().as_millis();
        if settle > 0 {
            self.delay.delay_ms(to_u32(settle));
        }

        let now = self.time_source.now();
        let transition =
            self.machine
                .finish_boot(now, &mut self.audio, &mut self.leds, &mut self.pulse)?;
        info!("booted, idling");
        Some(transition)
    }

    /// Runs one control loop iteration without sleeping.
    ///
    /// Returns the transitions committed in this tick, in event order.
    pub fn tick(&mut self) -> TickTransitions {
        let now = self.time_source.now();
        let mut events: Vec<PropEvent, MAX_TICK_EVENTS> = Vec::new();

        for event in self.primary.poll(now) {
            let _ = events.push(PropEvent::Primary(event));
        }
        if let Some(secondary) = &mut self.secondary {
            for event in secondary.poll(now) {
                let _ = events.push(PropEvent::Secondary(event));
            }
        }
        if self.limit_switch.as_mut().is_some_and(|switch| switch.poll(now)) {
            let _ = events.push(PropEvent::LimitSwitch);
        }

        let mut transitions = TickTransitions::new();
        for event in events {
            trace!("event {:?}", event);
            // A pulse blocks; new LED phases start from the current time.
            let now = self.time_source.now();
            if let Some(transition) =
                self.machine
                    .handle(event, now, &mut self.audio, &mut self.leds, &mut self.pulse)
            {
                let _ = transitions.push(transition);
            }
        }

        self.leds.service_all(self.time_source.now());
        transitions
    }

    /// Sleeps for the configured tick interval.
    pub fn sleep(&mut self) {
        let millis = self.machine.config().tick_interval().as_millis();
        self.delay.delay_ms(to_u32(millis));
    }

    /// One tick followed by the tick sleep.
    pub fn step(&mut self) -> TickTransitions {
        let transitions = self.tick();
        self.sleep();
        transitions
    }

    /// Boots and runs the control loop forever.
    pub fn run(&mut self) -> ! {
        self.boot();
        loop {
            self.step();
        }
    }

    /// Current mode.
    #[inline]
    pub fn mode(&self) -> PropMode {
        self.machine.mode()
    }

    /// True after a hard stop, until the next transition.
    #[inline]
    pub fn is_muted(&self) -> bool {
        self.machine.is_muted()
    }

    /// Wiring of the buttons.
    #[inline]
    pub fn active_level(&self) -> ActiveLevel {
        self.machine.config().active_level()
    }

    /// The state machine.
    #[inline]
    pub fn machine(&self) -> &PropStateMachine<I::Duration, N> {
        &self.machine
    }

    /// The LED bank.
    #[inline]
    pub fn leds(&self) -> &LedBank<I, Led, N> {
        &self.leds
    }

    /// The audio service.
    #[inline]
    pub fn audio(&self) -> &A {
        &self.audio
    }

    /// The pulse output.
    #[inline]
    pub fn pulse(&self) -> &Pu {
        &self.pulse
    }
}

#[inline]
fn to_u32(millis: u64) -> u32 {
    u32::try_from(millis).unwrap_or(u32::MAX)
}
