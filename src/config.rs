//! Static prop configuration.
//!
//! Everything that distinguishes one prop build from another lives in a
//! [`PropConfig`]: timing thresholds, the escalation order, what the buttons
//! do, and what each mode plays and shows. It is validated once by
//! [`PropConfigBuilder::build`] and read-only afterwards.

use crate::audio::AudioBinding;
use crate::press::PressConfig;
use crate::time::TimeDuration;
use crate::types::{
    ActiveLevel, LedSetting, LoopRestart, PropMode, PulsePolicy, SecondaryTrigger,
    ShortPressBehavior,
};
use heapless::Vec;

/// Maximum length of the escalation list and the secondary cycle.
pub const MAX_LEVELS: usize = 3;

/// What a mode plays, shows and whether entering it fires the pulse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModeProfile<D: TimeDuration, const N: usize> {
    /// Audio started on entry. `None` stops playback.
    pub audio: Option<AudioBinding>,

    /// LED pattern set, one setting per LED.
    pub leds: [LedSetting<D>; N],

    /// Which triggers fire the pulse when entering this mode.
    pub pulse: PulsePolicy,
}

impl<D: TimeDuration, const N: usize> ModeProfile<D, N> {
    /// Silent profile with every LED at its disabled level.
    pub fn silent() -> Self {
        Self {
            audio: None,
            leds: [LedSetting::disabled(D::ZERO); N],
            pulse: PulsePolicy::NEVER,
        }
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// The hard timeout does not exceed the long-press threshold.
    TimeoutNotAboveLongPress,

    /// The escalation list has no entries.
    EmptyEscalation,

    /// A mode list holds a mode that is not an escalation level.
    NotALevel(PropMode),

    /// A mode list holds the same mode twice.
    DuplicateMode(PropMode),

    /// A mode list exceeds [`MAX_LEVELS`].
    CapacityExceeded,

    /// The startup asset is bound as a loop and would never finish.
    LoopingStartupAsset,

    /// A blinking LED has a zero interval.
    ZeroBlinkInterval {
        /// Mode whose profile is invalid.
        mode: PropMode,
        /// Index of the LED.
        led: usize,
    },

    /// The control loop tick interval is zero.
    ZeroTickInterval,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::TimeoutNotAboveLongPress => {
                write!(f, "hard timeout must be longer than the long-press threshold")
            }
            ConfigError::EmptyEscalation => {
                write!(f, "escalation list must have at least one level")
            }
            ConfigError::NotALevel(mode) => {
                write!(f, "{:?} is not an escalation level", mode)
            }
            ConfigError::DuplicateMode(mode) => {
                write!(f, "{:?} appears more than once", mode)
            }
            ConfigError::CapacityExceeded => {
                write!(f, "mode list capacity of {} exceeded", MAX_LEVELS)
            }
            ConfigError::LoopingStartupAsset => {
                write!(f, "startup asset must play once, not loop")
            }
            ConfigError::ZeroBlinkInterval { mode, led } => {
                write!(f, "LED {} blinks with a zero interval in {:?}", led, mode)
            }
            ConfigError::ZeroTickInterval => {
                write!(f, "tick interval must be non-zero")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// Validated, read-only prop configuration.
///
/// # Type Parameters
/// * `D` - The duration type
/// * `N` - Number of indicator LEDs
#[derive(Debug, Clone)]
pub struct PropConfig<D: TimeDuration, const N: usize> {
    press: PressConfig<D>,
    active_level: ActiveLevel,
    tick_interval: D,
    boot_settle: D,
    short_press: ShortPressBehavior,
    secondary_trigger: SecondaryTrigger,
    loop_restart: LoopRestart,
    escalation: Vec<PropMode, MAX_LEVELS>,
    secondary_cycle: Vec<PropMode, MAX_LEVELS>,
    led_disabled_levels: [bool; N],
    profiles: [ModeProfile<D, N>; PropMode::COUNT],
}

impl<D: TimeDuration, const N: usize> PropConfig<D, N> {
    /// Creates a new configuration builder.
    pub fn builder() -> PropConfigBuilder<D, N> {
        PropConfigBuilder::new()
    }

    /// Press classification thresholds shared by all buttons.
    ///
    /// Only the primary button uses the hard timeout.
    pub fn press(&self) -> PressConfig<D> {
        self.press
    }

    /// Electrical level at which the buttons read as pressed.
    pub fn active_level(&self) -> ActiveLevel {
        self.active_level
    }

    /// Sleep between control loop ticks.
    pub fn tick_interval(&self) -> D {
        self.tick_interval
    }

    /// Pause between the startup asset and entering Idle.
    pub fn boot_settle(&self) -> D {
        self.boot_settle
    }

    /// Primary short-press behavior.
    pub fn short_press(&self) -> ShortPressBehavior {
        self.short_press
    }

    /// Secondary button trigger.
    pub fn secondary_trigger(&self) -> SecondaryTrigger {
        self.secondary_trigger
    }

    /// Loop restart policy.
    pub fn loop_restart(&self) -> LoopRestart {
        self.loop_restart
    }

    /// Levels visited by long presses, in order.
    pub fn escalation(&self) -> &[PropMode] {
        &self.escalation
    }

    /// Levels visited by the secondary button, in order.
    pub fn secondary_cycle(&self) -> &[PropMode] {
        &self.secondary_cycle
    }

    /// The level a short press enters from Idle.
    pub fn entry_mode(&self) -> PropMode {
        // Non-empty after validation.
        self.escalation.first().copied().unwrap_or(PropMode::Level1)
    }

    /// Level each LED shows while not blinking.
    pub fn led_disabled_levels(&self) -> [bool; N] {
        self.led_disabled_levels
    }

    /// Profile of `mode`.
    pub fn profile(&self, mode: PropMode) -> &ModeProfile<D, N> {
        &self.profiles[mode.index()]
    }
}

/// Builder for constructing a validated [`PropConfig`].
#[derive(Debug, Clone)]
pub struct PropConfigBuilder<D: TimeDuration, const N: usize> {
    config: PropConfig<D, N>,
}

impl<D: TimeDuration, const N: usize> PropConfigBuilder<D, N> {
    /// Creates a builder with the reference timing: 10 ms debounce and tick,
    /// 1 s long press, 3 s hard timeout, escalation
    /// `Level1 → Level2 → Level3`, secondary cycle `Level1 ↔ Level2`, and
    /// silent profiles with every LED solid on.
    pub fn new() -> Self {
        let mut escalation = Vec::new();
        let mut secondary_cycle = Vec::new();
        for mode in [PropMode::Level1, PropMode::Level2, PropMode::Level3] {
            let _ = escalation.push(mode);
        }
        for mode in [PropMode::Level1, PropMode::Level2] {
            let _ = secondary_cycle.push(mode);
        }

        Self {
            config: PropConfig {
                press: PressConfig {
                    debounce: D::from_millis(10),
                    long_press_threshold: D::from_millis(1000),
                    hard_timeout: Some(D::from_millis(3000)),
                },
                active_level: ActiveLevel::Low,
                tick_interval: D::from_millis(10),
                boot_settle: D::ZERO,
                short_press: ShortPressBehavior::default(),
                secondary_trigger: SecondaryTrigger::default(),
                loop_restart: LoopRestart::default(),
                escalation,
                secondary_cycle,
                led_disabled_levels: [true; N],
                profiles: [ModeProfile::silent(); PropMode::COUNT],
            },
        }
    }

    /// Sets the debounce interval.
    pub fn debounce(mut self, debounce: D) -> Self {
        self.config.press.debounce = debounce;
        self
    }

    /// Sets the long-press threshold.
    pub fn long_press_threshold(mut self, threshold: D) -> Self {
        self.config.press.long_press_threshold = threshold;
        self
    }

    /// Sets the hard-stop timeout. `None` disables hard stop.
    pub fn hard_timeout(mut self, timeout: Option<D>) -> Self {
        self.config.press.hard_timeout = timeout;
        self
    }

    /// Sets the button wiring.
    pub fn active_level(mut self, level: ActiveLevel) -> Self {
        self.config.active_level = level;
        self
    }

    /// Sets the control loop tick interval.
    pub fn tick_interval(mut self, interval: D) -> Self {
        self.config.tick_interval = interval;
        self
    }

    /// Sets the pause after the startup asset.
    pub fn boot_settle(mut self, settle: D) -> Self {
        self.config.boot_settle = settle;
        self
    }

    /// Sets the primary short-press behavior.
    pub fn short_press(mut self, behavior: ShortPressBehavior) -> Self {
        self.config.short_press = behavior;
        self
    }

    /// Sets what advances the secondary cycle.
    pub fn secondary_trigger(mut self, trigger: SecondaryTrigger) -> Self {
        self.config.secondary_trigger = trigger;
        self
    }

    /// Sets the loop restart policy.
    pub fn loop_restart(mut self, policy: LoopRestart) -> Self {
        self.config.loop_restart = policy;
        self
    }

    /// Sets the long-press escalation order.
    ///
    /// # Errors
    /// * `CapacityExceeded` - More than [`MAX_LEVELS`] modes
    pub fn escalation(mut self, modes: &[PropMode]) -> Result<Self, ConfigError> {
        self.config.escalation =
            Vec::from_slice(modes).map_err(|_| ConfigError::CapacityExceeded)?;
        Ok(self)
    }

    /// Sets the secondary button cycle. An empty cycle disables the button.
    ///
    /// # Errors
    /// * `CapacityExceeded` - More than [`MAX_LEVELS`] modes
    pub fn secondary_cycle(mut self, modes: &[PropMode]) -> Result<Self, ConfigError> {
        self.config.secondary_cycle =
            Vec::from_slice(modes).map_err(|_| ConfigError::CapacityExceeded)?;
        Ok(self)
    }

    /// Sets the level each LED shows while not blinking.
    pub fn led_disabled_levels(mut self, levels: [bool; N]) -> Self {
        self.config.led_disabled_levels = levels;
        self
    }

    /// Sets the profile of `mode`.
    pub fn profile(mut self, mode: PropMode, profile: ModeProfile<D, N>) -> Self {
        self.config.profiles[mode.index()] = profile;
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    /// * `TimeoutNotAboveLongPress` - Hard timeout at or below the long-press threshold
    /// * `EmptyEscalation` - No escalation levels
    /// * `NotALevel` / `DuplicateMode` - Invalid escalation or secondary cycle entry
    /// * `LoopingStartupAsset` - Booting profile binds a looping asset
    /// * `ZeroBlinkInterval` - A blinking LED has a zero interval
    /// * `ZeroTickInterval` - Tick interval is zero
    pub fn build(self) -> Result<PropConfig<D, N>, ConfigError> {
        let config = self.config;

        if let Some(timeout) = config.press.hard_timeout {
            if timeout.as_millis() <= config.press.long_press_threshold.as_millis() {
                return Err(ConfigError::TimeoutNotAboveLongPress);
            }
        }

        if config.escalation.is_empty() {
            return Err(ConfigError::EmptyEscalation);
        }
        validate_levels(&config.escalation)?;
        validate_levels(&config.secondary_cycle)?;

        if config
            .profile(PropMode::Booting)
            .audio
            .is_some_and(|binding| binding.looping)
        {
            return Err(ConfigError::LoopingStartupAsset);
        }

        for mode in PropMode::ALL {
            for (led, setting) in config.profile(mode).leds.iter().enumerate() {
                if setting.blink_enabled && setting.interval.as_millis() == 0 {
                    return Err(ConfigError::ZeroBlinkInterval { mode, led });
                }
            }
        }

        if config.tick_interval.as_millis() == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }

        Ok(config)
    }
}

impl<D: TimeDuration, const N: usize> Default for PropConfigBuilder<D, N> {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_levels(modes: &[PropMode]) -> Result<(), ConfigError> {
    for (idx, mode) in modes.iter().enumerate() {
        if !mode.is_level() {
            return Err(ConfigError::NotALevel(*mode));
        }
        if modes[..idx].contains(mode) {
            return Err(ConfigError::DuplicateMode(*mode));
        }
    }
    Ok(())
}

/// Reference build: the PKE meter replica.
///
/// Two buttons (active-low), five indicator LEDs, an I2S amplifier and a
/// trigger line into the meter's own board, which swings the wings.
///
/// [`config`] reproduces the device as shipped. [`three_level_config`] is the
/// same hardware with long-press escalation through a third level.
pub mod pke {
    use super::*;
    use crate::pulse::PulseSpec;

    /// Number of indicator LEDs.
    pub const LED_COUNT: usize = 5;

    /// First white LED.
    pub const LED_1: usize = 0;
    /// Second white LED.
    pub const LED_2: usize = 1;
    /// Yellow LED.
    pub const LED_YELLOW: usize = 2;
    /// Red LED; dark while not blinking.
    pub const LED_RED: usize = 3;
    /// Green LED.
    pub const LED_GREEN: usize = 4;

    /// Played once at power-up.
    pub const STARTUP: AudioBinding = AudioBinding::once("sounds/startup.wav");
    /// Idle hum.
    pub const IDLE: AudioBinding = AudioBinding::looped("sounds/idle.wav");
    /// First active level.
    pub const ACTIVE_1: AudioBinding = AudioBinding::looped("sounds/active1.wav");
    /// Second active level.
    pub const ACTIVE_2: AudioBinding = AudioBinding::looped("sounds/active2.wav");
    /// Third active level. Not on the stock SD card; add it before using
    /// [`three_level_config`].
    pub const ACTIVE_3: AudioBinding = AudioBinding::looped("sounds/active3.wav");

    /// Blink interval of each LED in milliseconds.
    const INTERVALS_MS: [u64; LED_COUNT] = [1000, 500, 500, 250, 1000];

    fn leds<D: TimeDuration>(blink: [bool; LED_COUNT]) -> [LedSetting<D>; LED_COUNT] {
        core::array::from_fn(|idx| LedSetting {
            blink_enabled: blink[idx],
            interval: D::from_millis(INTERVALS_MS[idx]),
        })
    }

    /// Trigger pulse into the meter board: 500 ms, active low.
    pub fn pulse<D: TimeDuration>() -> PulseSpec<D> {
        PulseSpec {
            active_high: false,
            active_duration: D::from_millis(500),
        }
    }

    /// Profiles shared by both presets. The red LED goes dark when not
    /// blinking; the others go solid on.
    fn base<D: TimeDuration>() -> PropConfigBuilder<D, LED_COUNT> {
        PropConfig::builder()
            .boot_settle(D::from_millis(1000))
            .led_disabled_levels([true, true, true, false, true])
            .profile(
                PropMode::Booting,
                ModeProfile {
                    audio: Some(STARTUP),
                    leds: leds([false; LED_COUNT]),
                    pulse: PulsePolicy::NEVER,
                },
            )
            .profile(
                PropMode::Idle,
                ModeProfile {
                    audio: Some(IDLE),
                    leds: leds([true, true, true, false, true]),
                    pulse: PulsePolicy::SHORT_PRESS,
                },
            )
            .profile(
                PropMode::Level1,
                ModeProfile {
                    audio: Some(ACTIVE_1),
                    leds: leds([false, true, true, false, false]),
                    pulse: PulsePolicy::SHORT_PRESS,
                },
            )
            .profile(
                PropMode::Level2,
                ModeProfile {
                    audio: Some(ACTIVE_2),
                    leds: leds([false, false, false, true, false]),
                    pulse: PulsePolicy::NEVER,
                },
            )
    }

    /// Builds the PKE meter as shipped.
    ///
    /// Holding the primary button longer than one second mutes, from any
    /// mode. There is no long-press escalation: Level2 is reached only with
    /// the secondary button, and there is no Level3.
    pub fn config<D: TimeDuration>() -> Result<PropConfig<D, LED_COUNT>, ConfigError> {
        base()
            .long_press_threshold(D::from_millis(999))
            .hard_timeout(Some(D::from_millis(1000)))
            .escalation(&[PropMode::Level1])?
            .build()
    }

    /// PKE hardware with long-press escalation `Level1 → Level2 → Level3`
    /// after one second and the mute moved out to three seconds.
    ///
    /// Level3 blinks every LED and loops [`ACTIVE_3`].
    pub fn three_level_config<D: TimeDuration>() -> Result<PropConfig<D, LED_COUNT>, ConfigError>
    {
        base()
            .long_press_threshold(D::from_millis(1000))
            .hard_timeout(Some(D::from_millis(3000)))
            .escalation(&[PropMode::Level1, PropMode::Level2, PropMode::Level3])?
            .profile(
                PropMode::Level3,
                ModeProfile {
                    audio: Some(ACTIVE_3),
                    leds: leds([true; LED_COUNT]),
                    pulse: PulsePolicy::NEVER,
                },
            )
            .build()
    }
}
