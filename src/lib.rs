#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`PropController`**: Owns all runtime state and runs the poll → decide → blink loop
//! - **`PropStateMachine`**: Turns input events into mode transitions and their side effects
//! - **`PropMode`**: `Booting`, `Idle` and the active levels `Level1`..`Level3`
//! - **`PressClassifier`**: Debounced short/long press and hard-timeout classification
//! - **`BlinkScheduler`** / **`LedBank`**: Non-blocking per-LED blinking at independent intervals
//! - **`AudioService`**: Trait to implement for your audio backend (looping and play-once assets)
//! - **`PulseOutput`**: Trait for the one-shot trigger pulse; `PulseEmitter` drives a GPIO
//! - **`PropConfig`**: Validated timing, wiring and per-mode profiles; `config::pke` is a ready preset
//! - **`TimeSource`**: Trait to implement for your timing system
//!
//! Pins and delays come from `embedded-hal` 1.0. Logging goes through `defmt` or
//! `log`, selected by cargo feature.

// Must come first so the logging macros are visible to every module.
mod fmt;

pub mod audio;
pub mod bank;
pub mod blink;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod input;
pub mod machine;
pub mod press;
pub mod pulse;
pub mod time;
pub mod types;

pub use audio::{AssetId, AudioBinding, AudioOutcome, AudioService, PlaybackError, PlaybackResult};
pub use bank::{LedBank, LedId};
pub use blink::{BlinkScheduler, LedPattern};
pub use config::{ConfigError, ModeProfile, PropConfig, PropConfigBuilder};
pub use controller::{PropController, PropHardware, TickTransitions};
pub use debounce::DebouncedInput;
pub use input::{ButtonInput, LimitSwitch};
pub use machine::{Decision, PropEvent, PropStateMachine, Transition};
pub use press::{PressClassifier, PressConfig, PressEvent, PressEvents};
pub use pulse::{PulseEmitter, PulseOutput, PulseSpec};
pub use time::{MillisDuration, MillisInstant, TimeDuration, TimeInstant, TimeSource};
pub use types::{
    ActiveLevel, LedSetting, LoopRestart, PropMode, PulsePolicy, SecondaryTrigger,
    ShortPressBehavior, Trigger,
};
