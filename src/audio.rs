//! Audio playback collaborator.
//!
//! The control core never touches samples or codecs. It asks an
//! [`AudioService`] to start or stop assets and treats every failure as
//! non-fatal: mode and LED logic proceed as if playback had succeeded.

/// Identifier of a sound asset (typically a path on the board's filesystem).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AssetId(pub &'static str);

impl core::fmt::Display for AssetId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.0)
    }
}

/// Audio asset bound to a mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AudioBinding {
    /// Asset to play on entering the mode.
    pub asset: AssetId,

    /// Loop until replaced, or play once (blocking).
    pub looping: bool,
}

impl AudioBinding {
    /// A looping binding.
    #[inline]
    pub const fn looped(asset: &'static str) -> Self {
        Self {
            asset: AssetId(asset),
            looping: true,
        }
    }

    /// A play-once binding.
    #[inline]
    pub const fn once(asset: &'static str) -> Self {
        Self {
            asset: AssetId(asset),
            looping: false,
        }
    }
}

/// Playback failures reported by an [`AudioService`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlaybackError {
    /// The asset could not be opened.
    AssetNotFound,

    /// The asset could not be decoded or the output device refused it.
    DeviceError,
}

impl core::fmt::Display for PlaybackError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PlaybackError::AssetNotFound => write!(f, "audio asset not found"),
            PlaybackError::DeviceError => write!(f, "audio device error"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PlaybackError {}

/// Result of a playback request.
pub type PlaybackResult = Result<(), PlaybackError>;

/// Trait for abstracting the audio player.
///
/// Implement this for your playback hardware (I2S amplifier, DAC, PWM audio).
/// Only one asset plays at a time; starting a new one replaces the current.
pub trait AudioService {
    /// Starts `asset` looping and returns immediately.
    fn start_loop(&mut self, asset: AssetId) -> PlaybackResult;

    /// Plays `asset` once and returns when it has finished.
    fn start_once(&mut self, asset: AssetId) -> PlaybackResult;

    /// Stops whatever is playing. Stopping silence is a no-op.
    fn stop(&mut self);

    /// Returns true while an asset is playing.
    fn is_playing(&self) -> bool;
}

/// What a transition did to the audio output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AudioOutcome {
    /// A loop was started (or restarted).
    Looping(AssetId),

    /// The requested loop was already playing and left alone.
    Kept(AssetId),

    /// A play-once asset ran to completion.
    PlayedOnce(AssetId),

    /// Audio was stopped and nothing new started.
    Stopped,

    /// Playback of the asset failed; the transition went ahead regardless.
    Failed(AssetId, PlaybackError),
}
