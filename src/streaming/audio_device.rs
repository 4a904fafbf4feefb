//! Audio device integration using rodio
//!
//! Plays a fully pre-rendered sample buffer to the system audio device. The
//! source iterator runs on rodio's audio thread; stop coordination goes
//! through an atomic flag and shared playback stats, so halting a session is
//! immediate and safe at any point in the buffer.

use super::StreamConfig;
use crate::{MolsongError, Result};
use parking_lot::Mutex;
use rodio::{OutputStream, Sink, Source};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Playback statistics updated from the audio thread
#[derive(Debug, Clone, Default)]
pub struct PlaybackStats {
    /// Number of samples handed to the sink so far
    pub samples_played: usize,
    /// True once the buffer drained naturally (not via stop)
    pub finished: bool,
}

/// Audio source that drains a pre-rendered buffer
struct BufferSource {
    samples: Vec<f32>,
    position: usize,
    sample_rate: u32,
    channels: u16,
    stopped: Arc<AtomicBool>,
    stats: Arc<Mutex<PlaybackStats>>,
}

impl Source for BufferSource {
    fn current_frame_len(&self) -> Option<usize> {
        Some(self.samples.len().saturating_sub(self.position).max(1))
    }

    fn channels(&self) -> u16 {
        self.channels
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(Duration::from_secs_f64(
            self.samples.len() as f64 / self.sample_rate as f64,
        ))
    }
}

impl Iterator for BufferSource {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.stopped.load(Ordering::Relaxed) {
            return None;
        }

        match self.samples.get(self.position) {
            Some(&sample) => {
                self.position += 1;
                // Batch the lock: update shared stats every 1024 samples
                if self.position % 1024 == 0 {
                    self.stats.lock().samples_played = self.position;
                }
                Some(sample)
            }
            None => {
                let mut stats = self.stats.lock();
                stats.samples_played = self.position;
                stats.finished = true;
                None
            }
        }
    }
}

/// Audio playback device using rodio
///
/// Owns the output stream and sink for one playback session. Dropping the
/// device stops playback and releases the device.
pub struct AudioDevice {
    _stream: OutputStream,
    sink: Sink,
    stopped: Arc<AtomicBool>,
    stats: Arc<Mutex<PlaybackStats>>,
}

impl AudioDevice {
    /// Create a device and start playing `samples` immediately.
    ///
    /// Control returns as soon as the buffer is appended to the sink; the
    /// audio thread drains it against the device clock. Fails with
    /// [`MolsongError::AudioDevice`] when no output device is available —
    /// the rendered data and its theme remain valid for a later retry.
    pub fn play(config: StreamConfig, samples: Vec<f32>) -> Result<Self> {
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| MolsongError::AudioDevice(format!("failed to create audio stream: {e}")))?;

        let sink = Sink::try_new(&stream_handle)
            .map_err(|e| MolsongError::AudioDevice(format!("failed to create audio sink: {e}")))?;

        let stopped = Arc::new(AtomicBool::new(false));
        let stats = Arc::new(Mutex::new(PlaybackStats::default()));

        let source = BufferSource {
            samples,
            position: 0,
            sample_rate: config.sample_rate,
            channels: config.channels,
            stopped: Arc::clone(&stopped),
            stats: Arc::clone(&stats),
        };
        sink.append(source);

        Ok(AudioDevice {
            _stream: stream,
            sink,
            stopped,
            stats,
        })
    }

    /// Halt playback immediately and release queued samples.
    ///
    /// Idempotent: calling again, or after the buffer already drained
    /// naturally, is a no-op.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Relaxed);
        self.sink.stop();
    }

    /// True once the buffer drained naturally or the device was stopped.
    pub fn is_finished(&self) -> bool {
        self.stopped.load(Ordering::Relaxed) || self.stats.lock().finished
    }

    /// Current playback statistics
    pub fn stats(&self) -> PlaybackStats {
        self.stats.lock().clone()
    }

    /// Block until the sink drains (natural end of the buffer).
    pub fn wait_for_finish(&self) {
        self.sink.sleep_until_end();
    }
}

impl Drop for AudioDevice {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn try_device(samples: Vec<f32>) -> Option<AudioDevice> {
        match AudioDevice::play(StreamConfig::default(), samples) {
            Ok(device) => Some(device),
            Err(err) => {
                eprintln!("Skipping streaming::audio_device test (audio backend unavailable): {err}");
                None
            }
        }
    }

    #[test]
    fn test_device_plays_and_stops() {
        // ~10s of silence so the sink cannot drain before the assertions run
        let Some(device) = try_device(vec![0.0; 441_000]) else {
            return;
        };
        assert!(!device.is_finished());
        device.stop();
        assert!(device.is_finished());
    }

    #[test]
    fn test_stop_is_idempotent() {
        let Some(device) = try_device(vec![0.0; 4096]) else {
            return;
        };
        device.stop();
        device.stop();
        assert!(device.is_finished());
    }

    #[test]
    fn test_buffer_source_drains_to_finished() {
        let stopped = Arc::new(AtomicBool::new(false));
        let stats = Arc::new(Mutex::new(PlaybackStats::default()));
        let mut source = BufferSource {
            samples: vec![0.25; 8],
            position: 0,
            sample_rate: 44_100,
            channels: 1,
            stopped,
            stats: Arc::clone(&stats),
        };

        for _ in 0..8 {
            assert_eq!(source.next(), Some(0.25));
        }
        assert_eq!(source.next(), None);
        let stats = stats.lock();
        assert!(stats.finished);
        assert_eq!(stats.samples_played, 8);
    }

    #[test]
    fn test_buffer_source_honors_stop_flag() {
        let stopped = Arc::new(AtomicBool::new(false));
        let mut source = BufferSource {
            samples: vec![0.5; 64],
            position: 0,
            sample_rate: 44_100,
            channels: 1,
            stopped: Arc::clone(&stopped),
            stats: Arc::new(Mutex::new(PlaybackStats::default())),
        };

        assert!(source.next().is_some());
        stopped.store(true, Ordering::Relaxed);
        assert_eq!(source.next(), None);
    }

    #[test]
    fn test_buffer_source_reports_format() {
        let source = BufferSource {
            samples: vec![0.0; 16],
            position: 0,
            sample_rate: 48_000,
            channels: 1,
            stopped: Arc::new(AtomicBool::new(false)),
            stats: Arc::new(Mutex::new(PlaybackStats::default())),
        };
        assert_eq!(source.sample_rate(), 48_000);
        assert_eq!(source.channels(), 1);
        assert!(source.total_duration().is_some());
    }
}
