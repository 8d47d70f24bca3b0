//! Time-based debouncing of a raw digital level.
//!
//! [`DebouncedInput`] turns a noisy boolean signal into a stable level plus
//! per-update edge flags. A new level is accepted only after the raw signal
//! has disagreed with the stable level continuously for the debounce
//! interval, so the stable level changes at most once per interval no matter
//! how much the contacts chatter.

use crate::time::{TimeDuration, TimeInstant, millis_since};

/// Debounced view of one digital input.
///
/// # Type Parameters
/// * `I` - Time instant type
#[derive(Debug, Clone, Copy)]
pub struct DebouncedInput<I: TimeInstant> {
    level: bool,
    rose: bool,
    fell: bool,
    interval: I::Duration,
    last_change: I,
    candidate_since: Option<I>,
}

impl<I: TimeInstant> DebouncedInput<I> {
    /// Creates a debouncer that starts stable at `initial_level`.
    pub fn new(initial_level: bool, interval: I::Duration, now: I) -> Self {
        Self {
            level: initial_level,
            rose: false,
            fell: false,
            interval,
            last_change: now,
            candidate_since: None,
        }
    }

    /// Feeds one raw sample.
    ///
    /// Clears the edge flags from the previous update, then accepts
    /// `raw_level` as the new stable level if it has differed from the stable
    /// level since at least `interval` ago.
    pub fn update(&mut self, raw_level: bool, now: I) {
        self.rose = false;
        self.fell = false;

        if raw_level == self.level {
            self.candidate_since = None;
            return;
        }

        let since = *self.candidate_since.get_or_insert(now);
        if millis_since(now, since) >= self.interval.as_millis() {
            self.level = raw_level;
            self.rose = raw_level;
            self.fell = !raw_level;
            self.last_change = now;
            self.candidate_since = None;
        }
    }

    /// Current stable level.
    #[inline]
    pub fn level(&self) -> bool {
        self.level
    }

    /// True if the last update changed the level from low to high.
    #[inline]
    pub fn rose(&self) -> bool {
        self.rose
    }

    /// True if the last update changed the level from high to low.
    #[inline]
    pub fn fell(&self) -> bool {
        self.fell
    }

    /// Instant of the last accepted level change (or construction).
    #[inline]
    pub fn last_change(&self) -> I {
        self.last_change
    }

    /// How long the stable level has been held.
    pub fn stable_for(&self, now: I) -> I::Duration {
        now.duration_since(self.last_change)
    }

    /// Configured debounce interval.
    #[inline]
    pub fn interval(&self) -> I::Duration {
        self.interval
    }
}
