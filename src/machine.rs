//! Mode state machine.
//!
//! [`PropStateMachine`] owns the current [`PropMode`] and turns classified
//! input events into transitions. Deciding is pure ([`PropStateMachine::decide`]);
//! committing a transition runs the side effects in a fixed order:
//!
//! 1. stop or replace the active audio,
//! 2. bind the new mode's LED pattern set,
//! 3. fire the pulse if the target mode's policy asks for it.
//!
//! Audio failures never block a transition. They are logged and reported in
//! the returned [`Transition`].

use crate::audio::{AssetId, AudioBinding, AudioOutcome, AudioService};
use crate::bank::LedBank;
use crate::config::PropConfig;
use crate::press::PressEvent;
use crate::pulse::PulseOutput;
use crate::time::{TimeDuration, TimeInstant};
use crate::types::{LoopRestart, PropMode, SecondaryTrigger, ShortPressBehavior, Trigger};
use embedded_hal::digital::OutputPin;

/// Input event fed to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PropEvent {
    /// Event from the primary button.
    Primary(PressEvent),
    /// Event from the secondary button.
    Secondary(PressEvent),
    /// Debounced falling edge of the limit switch.
    LimitSwitch,
}

/// What the state machine decided to do with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Decision {
    /// Enter `mode` because of `trigger`.
    Enter(PropMode, Trigger),
    /// Hard stop: silence, LEDs to disabled level, back to Idle.
    Mute,
}

/// Record of a committed transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Transition {
    /// Mode before the transition.
    pub from: PropMode,
    /// Mode after the transition.
    pub to: PropMode,
    /// What caused it.
    pub trigger: Trigger,
    /// What happened to the audio output.
    pub audio: AudioOutcome,
    /// True if the pulse was fired.
    pub pulse_fired: bool,
}

/// The prop's central authority over mode, audio, LEDs and pulse.
///
/// # Type Parameters
/// * `D` - The duration type
/// * `N` - Number of indicator LEDs
pub struct PropStateMachine<D: TimeDuration, const N: usize> {
    config: PropConfig<D, N>,
    mode: PropMode,
    muted: bool,
    current_loop: Option<AssetId>,
}

impl<D: TimeDuration, const N: usize> PropStateMachine<D, N> {
    /// Creates a state machine in [`PropMode::Booting`].
    pub fn new(config: PropConfig<D, N>) -> Self {
        Self {
            config,
            mode: PropMode::Booting,
            muted: false,
            current_loop: None,
        }
    }

    /// Current mode.
    #[inline]
    pub fn mode(&self) -> PropMode {
        self.mode
    }

    /// True after a hard stop, until the next transition.
    #[inline]
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Loop the state machine believes is playing.
    #[inline]
    pub fn current_loop(&self) -> Option<AssetId> {
        self.current_loop
    }

    /// The configuration.
    #[inline]
    pub fn config(&self) -> &PropConfig<D, N> {
        &self.config
    }

    /// Decides what `event` does in the current mode, without side effects.
    ///
    /// Returns `None` for events that change nothing: anything while
    /// booting, non-terminal press events, a long press outside the
    /// escalation list, secondary presses or limit-switch edges while idle,
    /// and any request for the mode that is already active.
    pub fn decide(&self, event: PropEvent) -> Option<Decision> {
        if self.mode == PropMode::Booting {
            return None;
        }

        match event {
            PropEvent::Primary(PressEvent::ShortPress) => {
                let entry = self.config.entry_mode();
                let target = match (self.config.short_press(), self.mode) {
                    (ShortPressBehavior::Toggle, PropMode::Idle) => entry,
                    (ShortPressBehavior::Toggle, _) => PropMode::Idle,
                    (ShortPressBehavior::Activate, _) => entry,
                };
                self.enter(target, Trigger::ShortPress)
            }
            PropEvent::Primary(PressEvent::LongPress) => {
                let target = next_in(self.config.escalation(), self.mode)?;
                self.enter(target, Trigger::LongPress)
            }
            PropEvent::Primary(PressEvent::HeldPastTimeout) => Some(Decision::Mute),
            PropEvent::Primary(_) => None,
            PropEvent::Secondary(press) => {
                let wanted = match self.config.secondary_trigger() {
                    SecondaryTrigger::Press => PressEvent::Pressed,
                    SecondaryTrigger::ShortPress => PressEvent::ShortPress,
                };
                if press != wanted || self.mode == PropMode::Idle {
                    return None;
                }
                let cycle = self.config.secondary_cycle();
                let target = next_in(cycle, self.mode).or_else(|| cycle.first().copied())?;
                self.enter(target, Trigger::Secondary)
            }
            PropEvent::LimitSwitch => self.enter(PropMode::Idle, Trigger::LimitSwitch),
        }
    }

    /// Handles one event, committing the resulting transition if any.
    pub fn handle<I, P, A, Pu>(
        &mut self,
        event: PropEvent,
        now: I,
        audio: &mut A,
        leds: &mut LedBank<I, P, N>,
        pulse: &mut Pu,
    ) -> Option<Transition>
    where
        I: TimeInstant<Duration = D>,
        P: OutputPin,
        A: AudioService,
        Pu: PulseOutput,
    {
        let transition = match self.decide(event)? {
            Decision::Enter(target, trigger) => {
                self.commit(target, trigger, now, audio, leds, pulse)
            }
            Decision::Mute => self.mute(audio, leds),
        };
        Some(transition)
    }

    /// Starts booting: binds the Booting LED set and plays the startup asset
    /// once, blocking until it finishes.
    ///
    /// Returns `None` if the machine has already booted.
    pub fn begin_boot<I, P, A>(
        &mut self,
        now: I,
        audio: &mut A,
        leds: &mut LedBank<I, P, N>,
    ) -> Option<AudioOutcome>
    where
        I: TimeInstant<Duration = D>,
        P: OutputPin,
        A: AudioService,
    {
        if self.mode != PropMode::Booting {
            return None;
        }

        info!("booting");
        let profile = *self.config.profile(PropMode::Booting);
        leds.apply(&profile.leds, now);

        let outcome = match profile.audio {
            Some(binding) => self.play(binding, audio),
            None => AudioOutcome::Stopped,
        };
        Some(outcome)
    }

    /// Finishes booting by entering Idle.
    ///
    /// Returns `None` if the machine has already booted.
    pub fn finish_boot<I, P, A, Pu>(
        &mut self,
        now: I,
        audio: &mut A,
        leds: &mut LedBank<I, P, N>,
        pulse: &mut Pu,
    ) -> Option<Transition>
    where
        I: TimeInstant<Duration = D>,
        P: OutputPin,
        A: AudioService,
        Pu: PulseOutput,
    {
        if self.mode != PropMode::Booting {
            return None;
        }
        Some(self.commit(PropMode::Idle, Trigger::Boot, now, audio, leds, pulse))
    }

    fn enter(&self, target: PropMode, trigger: Trigger) -> Option<Decision> {
        (target != self.mode).then_some(Decision::Enter(target, trigger))
    }

    fn commit<I, P, A, Pu>(
        &mut self,
        target: PropMode,
        trigger: Trigger,
        now: I,
        audio: &mut A,
        leds: &mut LedBank<I, P, N>,
        pulse: &mut Pu,
    ) -> Transition
    where
        I: TimeInstant<Duration = D>,
        P: OutputPin,
        A: AudioService,
        Pu: PulseOutput,
    {
        let from = self.mode;
        let profile = *self.config.profile(target);

        if trigger == Trigger::LimitSwitch {
            audio.stop();
            self.current_loop = None;
        }
        let audio_outcome = match profile.audio {
            Some(binding) => self.play(binding, audio),
            None => {
                audio.stop();
                self.current_loop = None;
                AudioOutcome::Stopped
            }
        };

        self.mode = target;
        self.muted = false;

        leds.apply(&profile.leds, now);

        let pulse_fired = profile.pulse.fires_on(trigger);
        if pulse_fired {
            pulse.fire();
        }

        info!("mode {:?} -> {:?} on {:?}", from, target, trigger);

        Transition {
            from,
            to: target,
            trigger,
            audio: audio_outcome,
            pulse_fired,
        }
    }

    fn mute<I, P, A>(&mut self, audio: &mut A, leds: &mut LedBank<I, P, N>) -> Transition
    where
        I: TimeInstant<Duration = D>,
        P: OutputPin,
        A: AudioService,
    {
        let from = self.mode;

        audio.stop();
        self.current_loop = None;
        leds.force_disabled();
        self.mode = PropMode::Idle;
        self.muted = true;

        info!("hard stop from {:?}", from);

        Transition {
            from,
            to: PropMode::Idle,
            trigger: Trigger::Mute,
            audio: AudioOutcome::Stopped,
            pulse_fired: false,
        }
    }

    fn play<A: AudioService>(&mut self, binding: AudioBinding, audio: &mut A) -> AudioOutcome {
        let asset = binding.asset;

        if !binding.looping {
            self.current_loop = None;
            return match audio.start_once(asset) {
                Ok(()) => AudioOutcome::PlayedOnce(asset),
                Err(err) => {
                    warn!("audio: {:?} failed: {:?}", asset, err);
                    AudioOutcome::Failed(asset, err)
                }
            };
        }

        if self.config.loop_restart() == LoopRestart::KeepPlaying
            && self.current_loop == Some(asset)
            && audio.is_playing()
        {
            return AudioOutcome::Kept(asset);
        }

        match audio.start_loop(asset) {
            Ok(()) => {
                self.current_loop = Some(asset);
                AudioOutcome::Looping(asset)
            }
            Err(err) => {
                warn!("audio: {:?} failed: {:?}", asset, err);
                self.current_loop = None;
                AudioOutcome::Failed(asset, err)
            }
        }
    }
}

/// Mode following `current` in `cycle`, wrapping around. `None` if `current`
/// is not in the cycle.
fn next_in(cycle: &[PropMode], current: PropMode) -> Option<PropMode> {
    let idx = cycle.iter().position(|mode| *mode == current)?;
    cycle.get((idx + 1) % cycle.len()).copied()
}
