//! Core types shared by the classifier, state machine and configuration.

use crate::time::TimeDuration;

/// Operating mode of the prop.
///
/// Exactly one mode is active at a time. A hard-stop mute is not a mode of its
/// own: it lands in [`PropMode::Idle`] with the state machine's muted flag set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PropMode {
    /// Startup asset playing; input is ignored.
    Booting,
    /// Idle loop playing, waiting for the user.
    Idle,
    /// First escalation level.
    Level1,
    /// Second escalation level.
    Level2,
    /// Third escalation level.
    Level3,
}

impl PropMode {
    /// Number of modes.
    pub const COUNT: usize = 5;

    /// All modes in declaration order.
    pub const ALL: [PropMode; Self::COUNT] = [
        PropMode::Booting,
        PropMode::Idle,
        PropMode::Level1,
        PropMode::Level2,
        PropMode::Level3,
    ];

    /// Stable index used for per-mode tables.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            PropMode::Booting => 0,
            PropMode::Idle => 1,
            PropMode::Level1 => 2,
            PropMode::Level2 => 3,
            PropMode::Level3 => 4,
        }
    }

    /// Returns true for the escalation levels (everything except Booting and Idle).
    #[inline]
    pub const fn is_level(self) -> bool {
        matches!(self, PropMode::Level1 | PropMode::Level2 | PropMode::Level3)
    }
}

/// Electrical level at which a button reads as pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActiveLevel {
    /// Pressed pulls the pin low (pull-up wiring).
    #[default]
    Low,
    /// Pressed drives the pin high (pull-down wiring).
    High,
}

impl ActiveLevel {
    /// Returns true if `level` means "pressed" for this wiring.
    #[inline]
    pub fn is_pressed(self, level: bool) -> bool {
        match self {
            ActiveLevel::Low => !level,
            ActiveLevel::High => level,
        }
    }
}

/// What caused a state transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Trigger {
    /// Startup asset finished.
    Boot,
    /// Primary button short press.
    ShortPress,
    /// Primary button long press.
    LongPress,
    /// Secondary button.
    Secondary,
    /// Limit switch falling edge.
    LimitSwitch,
    /// Primary button held past the hard timeout.
    Mute,
}

/// How the primary short press behaves once a level is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ShortPressBehavior {
    /// Idle enters the first level, any level returns to Idle.
    #[default]
    Toggle,
    /// Always targets the first level; returning to Idle is left to the limit switch.
    Activate,
}

/// Which secondary-button event advances the secondary cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SecondaryTrigger {
    /// Advance as soon as the press is debounced.
    #[default]
    Press,
    /// Advance on a classified short press.
    ShortPress,
}

/// What to do when a transition asks for the loop that is already playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LoopRestart {
    /// Leave a playing identical loop alone.
    #[default]
    KeepPlaying,
    /// Restart the loop from the beginning.
    Restart,
}

/// Per-LED setting for one mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LedSetting<D: TimeDuration> {
    /// Blink on `interval`; otherwise hold the LED's disabled level.
    pub blink_enabled: bool,

    /// Toggle interval while blinking.
    pub interval: D,
}

impl<D: TimeDuration> LedSetting<D> {
    /// Blinking with the given interval.
    #[inline]
    pub fn blink(interval: D) -> Self {
        Self {
            blink_enabled: true,
            interval,
        }
    }

    /// Held at the LED's disabled level. The interval is kept for when
    /// blinking is re-enabled.
    #[inline]
    pub fn disabled(interval: D) -> Self {
        Self {
            blink_enabled: false,
            interval,
        }
    }
}

/// Triggers that fire the output pulse when entering a mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PulsePolicy {
    /// Entered by a primary short press.
    pub on_short_press: bool,
    /// Entered by a primary long press.
    pub on_long_press: bool,
    /// Entered by the secondary button.
    pub on_secondary: bool,
    /// Entered by the limit switch.
    pub on_limit_switch: bool,
}

impl PulsePolicy {
    /// Never fire.
    pub const NEVER: Self = Self {
        on_short_press: false,
        on_long_press: false,
        on_secondary: false,
        on_limit_switch: false,
    };

    /// Fire only when entered by a primary short press.
    pub const SHORT_PRESS: Self = Self {
        on_short_press: true,
        ..Self::NEVER
    };

    /// Returns true if entering via `trigger` fires the pulse.
    pub fn fires_on(&self, trigger: Trigger) -> bool {
        match trigger {
            Trigger::ShortPress => self.on_short_press,
            Trigger::LongPress => self.on_long_press,
            Trigger::Secondary => self.on_secondary,
            Trigger::LimitSwitch => self.on_limit_switch,
            Trigger::Boot | Trigger::Mute => false,
        }
    }
}
