//! Theme to timed sound events
//!
//! Pure scheduling: turns a [`Theme`] into a batch of future-timed sound
//! events (drone, percussive clicks, pitched tones) relative to one fixed t=0
//! origin. Every start time is computed by multiplication from that origin —
//! never by accumulating per-event offsets — so timing drift cannot build up
//! from repeat to repeat.
//!
//! Nothing here touches an audio device; the plan is handed to the offline
//! renderer and, under the `streaming` feature, from there to the sink.

use crate::theme::{Slot, Theme, GRID_SLOTS};

/// Beats per grid slot (quarter-beat grid)
pub const SLOT_BEATS: f64 = 0.25;

/// Number of times the 16-slot grid repeats per playback
pub const GRID_REPEATS: usize = 4;

/// A percussive click lands on every Nth slot (downbeat emphasis)
pub const CLICK_INTERVAL: usize = 4;

/// Drone sits two octaves below the root
pub const DRONE_OFFSET_SEMITONES: i32 = -24;

/// Peak gain for pitched note tones
pub const TONE_GAIN: f32 = 0.22;
/// Peak gain for percussive clicks
pub const CLICK_GAIN: f32 = 0.3;
/// Sustained gain for the drone
pub const DRONE_GAIN: f32 = 0.07;

/// Oscillator waveform for a scheduled tone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Waveform {
    /// Pure sine
    Sine,
    /// Triangle (used for the melodic tones)
    Triangle,
}

/// One pitched tone with a fast attack / exponential decay envelope.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ToneEvent {
    /// Start time in seconds from the plan origin
    pub start_secs: f64,
    /// Envelope length in seconds
    pub duration_secs: f64,
    /// Oscillator frequency in Hz
    pub frequency: f64,
    /// Peak gain
    pub gain: f32,
    /// Oscillator waveform
    pub waveform: Waveform,
}

/// One short percussive noise click.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClickEvent {
    /// Start time in seconds from the plan origin
    pub start_secs: f64,
    /// Peak gain
    pub gain: f32,
}

/// The sustained low drone underpinning the whole playback.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DroneEvent {
    /// Oscillator frequency in Hz
    pub frequency: f64,
    /// Duration in seconds (the full grid span)
    pub duration_secs: f64,
    /// Sustained gain
    pub gain: f32,
}

/// A complete scheduled playback: every event with a bounded, precomputed
/// start and end time.
#[derive(Clone, Debug, PartialEq)]
pub struct EventPlan {
    /// Pitched tones, one per occupied slot per repeat, in schedule order
    pub tones: Vec<ToneEvent>,
    /// Downbeat clicks, one per [`CLICK_INTERVAL`] slots per repeat
    pub clicks: Vec<ClickEvent>,
    /// The sustained drone
    pub drone: DroneEvent,
    /// Total playback length in seconds, including the decay tail
    pub total_secs: f64,
}

/// Convert a MIDI-like semitone number to a frequency in Hz.
///
/// Standard equal temperament referenced to 440 Hz concert pitch at
/// semitone 69.
///
/// # Examples
///
/// ```
/// use molsong::midi_to_freq;
///
/// assert_eq!(midi_to_freq(69), 440.0);
/// assert!((midi_to_freq(81) - 880.0).abs() < 1e-9);
/// ```
#[inline]
pub fn midi_to_freq(pitch: i32) -> f64 {
    440.0 * 2.0_f64.powf((pitch - 69) as f64 / 12.0)
}

/// Schedule a theme into a concrete event plan.
///
/// Four repeats of the 16-slot grid at quarter-beat spacing derived from the
/// theme's tempo, plus one drone spanning the whole grid. All times are
/// relative to t = 0.
pub fn schedule_theme(theme: &Theme) -> EventPlan {
    let beat_secs = 60.0 / theme.tempo_bpm as f64;
    let slot_secs = SLOT_BEATS * beat_secs;
    let grid_secs = (GRID_REPEATS * GRID_SLOTS) as f64 * slot_secs;

    let mut tones = Vec::new();
    let mut clicks = Vec::new();

    for repeat in 0..GRID_REPEATS {
        for (index, slot) in theme.slots.iter().enumerate() {
            // Absolute slot position from the origin, not from the previous event
            let position = (repeat * GRID_SLOTS + index) as f64;
            let start_secs = position * slot_secs;

            if index % CLICK_INTERVAL == 0 {
                clicks.push(ClickEvent {
                    start_secs,
                    gain: CLICK_GAIN,
                });
            }

            if let Slot::Note(note) = slot {
                tones.push(ToneEvent {
                    start_secs,
                    duration_secs: note.duration_beats * beat_secs,
                    frequency: midi_to_freq(note.pitch),
                    gain: TONE_GAIN,
                    waveform: Waveform::Triangle,
                });
            }
        }
    }

    let drone = DroneEvent {
        frequency: midi_to_freq(theme.root_pitch + DRONE_OFFSET_SEMITONES),
        duration_secs: grid_secs,
        gain: DRONE_GAIN,
    };

    EventPlan {
        tones,
        clicks,
        drone,
        // One beat of tail so the final notes' decay has a bounded end time
        total_secs: grid_secs + beat_secs,
    }
}
