//! Shared test infrastructure for prop-controller integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use core::cell::Cell;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorKind, ErrorType, InputPin, OutputPin};
use prop_controller::config::pke;
use prop_controller::{
    AssetId, AudioService, PlaybackError, PlaybackResult, PropConfig, PropController,
    PropHardware, PulseEmitter, PulseOutput, TimeDuration, TimeInstant, TimeSource, Transition,
};

// ============================================================================
// Mock Time Types
// ============================================================================

/// Mock duration type for testing (wraps milliseconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestDuration(pub u64);

impl TimeDuration for TestDuration {
    const ZERO: Self = TestDuration(0);

    fn as_millis(&self) -> u64 {
        self.0
    }

    fn from_millis(millis: u64) -> Self {
        TestDuration(millis)
    }
}

/// Mock instant type for testing
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestInstant(pub u64);

impl TimeInstant for TestInstant {
    type Duration = TestDuration;

    fn duration_since(&self, earlier: Self) -> Self::Duration {
        TestDuration(self.0 - earlier.0)
    }
}

// ============================================================================
// Mock Time Source and Delay
// ============================================================================

/// Mock time source with controllable time advancement
pub struct MockTimeSource {
    current_time: Cell<TestInstant>,
}

impl MockTimeSource {
    pub fn new() -> Self {
        Self {
            current_time: Cell::new(TestInstant(0)),
        }
    }

    /// Advance time by the given duration
    pub fn advance(&self, duration: TestDuration) {
        let current = self.current_time.get();
        self.current_time.set(TestInstant(current.0 + duration.0));
    }

    pub fn set_time(&self, time: TestInstant) {
        self.current_time.set(time);
    }
}

impl TimeSource<TestInstant> for MockTimeSource {
    fn now(&self) -> TestInstant {
        self.current_time.get()
    }
}

/// Delay that advances the mock clock instead of sleeping
pub struct MockDelay<'a> {
    clock: &'a MockTimeSource,
}

impl<'a> MockDelay<'a> {
    pub fn new(clock: &'a MockTimeSource) -> Self {
        Self { clock }
    }
}

impl DelayNs for MockDelay<'_> {
    fn delay_ns(&mut self, ns: u32) {
        self.clock.advance(TestDuration(u64::from(ns) / 1_000_000));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.clock.advance(TestDuration(u64::from(ms)));
    }
}

// ============================================================================
// Mock Pins
// ============================================================================

/// Error reported by a faulted mock pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinFault;

impl embedded_hal::digital::Error for PinFault {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// One wire: a level plus a fault switch that makes reads fail
pub struct Line {
    pub level: Cell<bool>,
    pub fault: Cell<bool>,
}

impl Line {
    pub fn new(level: bool) -> Self {
        Self {
            level: Cell::new(level),
            fault: Cell::new(false),
        }
    }

    pub fn set(&self, level: bool) {
        self.level.set(level);
    }

    pub fn get(&self) -> bool {
        self.level.get()
    }
}

/// Input pin reading a [`Line`]
pub struct MockInput<'a>(pub &'a Line);

impl ErrorType for MockInput<'_> {
    type Error = PinFault;
}

impl InputPin for MockInput<'_> {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        if self.0.fault.get() {
            return Err(PinFault);
        }
        Ok(self.0.level.get())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|level| !level)
    }
}

/// Output pin driving a [`Line`]
pub struct MockOutput<'a>(pub &'a Line);

impl ErrorType for MockOutput<'_> {
    type Error = PinFault;
}

impl OutputPin for MockOutput<'_> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.0.level.set(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.0.level.set(true);
        Ok(())
    }
}

// ============================================================================
// Mock Audio
// ============================================================================

/// One call made to the audio service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCall {
    StartLoop(AssetId),
    StartOnce(AssetId),
    Stop,
}

/// Mock audio player that records every call
pub struct MockAudio {
    calls: heapless::Vec<AudioCall, 64>,
    playing: Option<AssetId>,
    failing: Option<AssetId>,
}

impl MockAudio {
    pub fn new() -> Self {
        Self {
            calls: heapless::Vec::new(),
            playing: None,
            failing: None,
        }
    }

    /// Player that cannot find `asset`
    pub fn failing_on(asset: &'static str) -> Self {
        Self {
            failing: Some(AssetId(asset)),
            ..Self::new()
        }
    }

    pub fn calls(&self) -> &[AudioCall] {
        &self.calls
    }

    pub fn last_call(&self) -> Option<AudioCall> {
        self.calls.last().copied()
    }

    pub fn playing(&self) -> Option<AssetId> {
        self.playing
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    fn record(&mut self, call: AudioCall) {
        let _ = self.calls.push(call);
    }

    fn check(&self, asset: AssetId) -> PlaybackResult {
        if self.failing == Some(asset) {
            return Err(PlaybackError::AssetNotFound);
        }
        Ok(())
    }
}

impl AudioService for MockAudio {
    fn start_loop(&mut self, asset: AssetId) -> PlaybackResult {
        self.record(AudioCall::StartLoop(asset));
        self.playing = None;
        self.check(asset)?;
        self.playing = Some(asset);
        Ok(())
    }

    fn start_once(&mut self, asset: AssetId) -> PlaybackResult {
        self.record(AudioCall::StartOnce(asset));
        self.playing = None;
        self.check(asset)
    }

    fn stop(&mut self) {
        self.record(AudioCall::Stop);
        self.playing = None;
    }

    fn is_playing(&self) -> bool {
        self.playing.is_some()
    }
}

// ============================================================================
// Mock Pulse
// ============================================================================

/// Pulse output that only counts
pub struct MockPulse {
    pub fired: u32,
}

impl MockPulse {
    pub fn new() -> Self {
        Self { fired: 0 }
    }
}

impl PulseOutput for MockPulse {
    fn fire(&mut self) {
        self.fired += 1;
    }
}

// ============================================================================
// PKE rig
// ============================================================================

/// Every wire of a PKE build, idle levels applied (buttons and limit switch high)
pub struct PkeLines {
    pub primary: Line,
    pub secondary: Line,
    pub limit: Line,
    pub leds: [Line; pke::LED_COUNT],
    pub trigger: Line,
}

impl PkeLines {
    pub fn new() -> Self {
        Self {
            primary: Line::new(true),
            secondary: Line::new(true),
            limit: Line::new(true),
            leds: core::array::from_fn(|_| Line::new(false)),
            trigger: Line::new(false),
        }
    }

    pub fn led_levels(&self) -> [bool; pke::LED_COUNT] {
        core::array::from_fn(|idx| self.leds[idx].get())
    }
}

pub type PkePulse<'a> = PulseEmitter<MockOutput<'a>, MockDelay<'a>, TestDuration>;

pub type PkeController<'a> = PropController<
    'a,
    TestInstant,
    MockTimeSource,
    MockAudio,
    MockInput<'a>,
    MockOutput<'a>,
    PkePulse<'a>,
    MockDelay<'a>,
    { pke::LED_COUNT },
>;

/// Stock PKE controller wired to `lines`, with a blocking pulse on the trigger line
pub fn pke_controller<'a>(
    clock: &'a MockTimeSource,
    lines: &'a PkeLines,
    audio: MockAudio,
) -> PkeController<'a> {
    pke_controller_with(clock, lines, audio, pke::config().unwrap())
}

/// PKE rig running `config`
pub fn pke_controller_with<'a>(
    clock: &'a MockTimeSource,
    lines: &'a PkeLines,
    audio: MockAudio,
    config: PropConfig<TestDuration, { pke::LED_COUNT }>,
) -> PkeController<'a> {
    let pulse = PulseEmitter::new(
        MockOutput(&lines.trigger),
        MockDelay::new(clock),
        pke::pulse(),
    );
    let hardware = PropHardware {
        primary: MockInput(&lines.primary),
        secondary: Some(MockInput(&lines.secondary)),
        limit_switch: Some(MockInput(&lines.limit)),
        leds: [
            MockOutput(&lines.leds[0]),
            MockOutput(&lines.leds[1]),
            MockOutput(&lines.leds[2]),
            MockOutput(&lines.leds[3]),
            MockOutput(&lines.leds[4]),
        ],
    };
    PropController::new(clock, config, hardware, audio, pulse, MockDelay::new(clock))
}

/// Runs `steps` control loop iterations, collecting every transition
pub fn run_steps(prop: &mut PkeController<'_>, steps: usize) -> heapless::Vec<Transition, 16> {
    let mut all = heapless::Vec::new();
    for _ in 0..steps {
        for transition in prop.step() {
            let _ = all.push(transition);
        }
    }
    all
}

/// Holds an active-low `line` for `hold_steps` iterations, then releases it
/// and runs until the release is debounced
pub fn press_for(
    prop: &mut PkeController<'_>,
    line: &Line,
    hold_steps: usize,
) -> heapless::Vec<Transition, 16> {
    let mut all = heapless::Vec::new();
    line.set(false);
    for transition in run_steps(prop, hold_steps) {
        let _ = all.push(transition);
    }
    line.set(true);
    for transition in run_steps(prop, 3) {
        let _ = all.push(transition);
    }
    all
}
