//! Audio output and streaming
//!
//! Real-time playback of rendered theme buffers via rodio. The controller
//! renders a whole event plan up front and hands the buffer to an
//! [`AudioDevice`]; the audio thread drains it autonomously against the device
//! clock while control returns to the caller immediately.

mod audio_device;

pub use audio_device::{AudioDevice, PlaybackStats};

/// Default output sample rate in Hz
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Stream configuration for audio playback
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StreamConfig {
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of audio channels (1 = mono)
    pub channels: u16,
}

impl Default for StreamConfig {
    fn default() -> Self {
        StreamConfig {
            sample_rate: DEFAULT_SAMPLE_RATE,
            channels: 1,
        }
    }
}

impl StreamConfig {
    /// Mono configuration at the given sample rate
    pub fn mono(sample_rate: u32) -> Self {
        StreamConfig {
            sample_rate,
            channels: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StreamConfig::default();
        assert_eq!(config.sample_rate, DEFAULT_SAMPLE_RATE);
        assert_eq!(config.channels, 1);
    }

    #[test]
    fn test_mono_config() {
        let config = StreamConfig::mono(48_000);
        assert_eq!(config.sample_rate, 48_000);
        assert_eq!(config.channels, 1);
    }
}
